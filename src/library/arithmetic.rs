use crate::error::{Error, Result};
use crate::interpreter::{Context, Value};

use super::arg;

fn number(name: &str, value: &Value) -> Result<f64> {
    value.as_number().ok_or_else(|| {
        Error::host(format!(
            "{} expects numbers, found {}",
            name,
            value.type_name()
        ))
    })
}

fn numbers(name: &str, args: &[Value]) -> Result<Vec<f64>> {
    args.iter().map(|v| number(name, v)).collect()
}

/// Numbers add up until a string shows up on either side; from then on the
/// running total is a string and everything is appended to it.
fn add(acc: Value, next: &Value) -> Result<Value> {
    match (&acc, next) {
        (Value::Str(_), _) | (_, Value::Str(_)) => Ok(Value::from(format!("{}{}", acc, next))),
        _ => Ok(Value::Number(number("+", &acc)? + number("+", next)?)),
    }
}

/// Folds the tail of the arguments into the head, as in `-(10 1 2)`.
fn fold_from_first(name: &'static str, op: fn(f64, f64) -> f64) -> Value {
    Value::native(name, move |args| {
        let args = numbers(name, args)?;
        let (first, rest) = args
            .split_first()
            .ok_or_else(|| Error::host(format!("{} expects at least one argument", name)))?;
        Ok(Value::Number(rest.iter().copied().fold(*first, op)))
    })
}

/// Each argument must stand in `cmp` to the next; numbers and strings only.
fn chained(name: &'static str, cmp: fn(std::cmp::Ordering) -> bool) -> Value {
    Value::native(name, move |args| {
        for pair in args.windows(2) {
            let ordering = match (&pair[0], &pair[1]) {
                (Value::Number(a), Value::Number(b)) => a.partial_cmp(b),
                (Value::Str(a), Value::Str(b)) => Some(a.cmp(b)),
                (a, b) => {
                    return Err(Error::host(format!(
                        "cannot compare {} with {}",
                        a.type_name(),
                        b.type_name()
                    )))
                }
            };
            if !ordering.is_some_and(cmp) {
                return Ok(Value::Bool(false));
            }
        }
        Ok(Value::Bool(true))
    })
}

pub(super) fn register(lib: &Context) -> Result<()> {
    lib.define(
        "+",
        Value::native("+", |args| {
            let Some((first, rest)) = args.split_first() else {
                return Ok(Value::Number(0.0));
            };
            let first = match first {
                Value::Str(_) => first.clone(),
                other => Value::Number(number("+", other)?),
            };
            rest.iter().try_fold(first, add)
        }),
    )?;
    lib.define("-", fold_from_first("-", |a, b| a - b))?;
    lib.define(
        "*",
        Value::native("*", |args| {
            Ok(Value::Number(numbers("*", args)?.into_iter().product()))
        }),
    )?;
    lib.define("/", fold_from_first("/", |a, b| a / b))?;
    lib.define(
        "mod",
        Value::native("mod", |args| {
            Ok(Value::Number(
                number("mod", &arg(args, 0))? % number("mod", &arg(args, 1))?,
            ))
        }),
    )?;
    lib.define(
        "pow",
        Value::native("pow", |args| {
            Ok(Value::Number(
                number("pow", &arg(args, 0))?.powf(number("pow", &arg(args, 1))?),
            ))
        }),
    )?;
    lib.define(
        "sqrt",
        Value::native("sqrt", |args| {
            Ok(Value::Number(number("sqrt", &arg(args, 0))?.sqrt()))
        }),
    )?;

    lib.define("true", true)?;
    lib.define("false", false)?;

    lib.define(
        "is",
        Value::native("is", |args| {
            Ok(Value::Bool(match args.split_first() {
                Some((first, rest)) => rest.iter().all(|v| first.strict_eq(v)),
                None => true,
            }))
        }),
    )?;
    lib.define(
        "and",
        Value::native("and", |args| Ok(Value::Bool(args.iter().all(Value::is_truthy)))),
    )?;
    lib.define(
        "or",
        Value::native("or", |args| Ok(Value::Bool(args.iter().any(Value::is_truthy)))),
    )?;
    lib.define(
        "xor",
        Value::native("xor", |args| {
            Ok(Value::Bool(arg(args, 0).is_truthy() != arg(args, 1).is_truthy()))
        }),
    )?;
    lib.define(
        "not",
        Value::native("not", |args| Ok(Value::Bool(!arg(args, 0).is_truthy()))),
    )?;

    lib.define("<", chained("<", |o| o.is_lt()))?;
    lib.define(">", chained(">", |o| o.is_gt()))?;
    lib.define("<=", chained("<=", |o| o.is_le()))?;
    lib.define(">=", chained(">=", |o| o.is_ge()))
}
