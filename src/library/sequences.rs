use crate::error::{Error, Result};
use crate::interpreter::{Context, Sequence, Value};

use super::arg;

/// `assign` may grow a list with `undefined` padding, but not past this.
const MAX_LIST_LEN: usize = 1 << 24;

fn list(name: &str, value: &Value) -> Result<Sequence> {
    value
        .as_list()
        .cloned()
        .ok_or_else(|| Error::host(format!("{} expects a list, found {}", name, value.type_name())))
}

/// Only non-negative whole numbers index anything.
fn position(value: &Value) -> Option<usize> {
    match value {
        Value::Number(n) if *n >= 0.0 && n.fract() == 0.0 => Some(*n as usize),
        _ => None,
    }
}

pub(super) fn register(lib: &Context) -> Result<()> {
    lib.define(
        "length",
        Value::native("length", |args| match arg(args, 0) {
            Value::List(l) => Ok(Value::Number(l.len() as f64)),
            Value::Str(s) => Ok(Value::Number(s.chars().count() as f64)),
            other => Err(Error::host(format!(
                "length expects a list or string, found {}",
                other.type_name()
            ))),
        }),
    )?;
    lib.define(
        "index",
        Value::native("index", |args| {
            let Some(i) = position(&arg(args, 1)) else {
                return Ok(Value::Undefined);
            };
            match arg(args, 0) {
                Value::List(l) => Ok(l.get(i).unwrap_or_default()),
                Value::Str(s) => Ok(s
                    .chars()
                    .nth(i)
                    .map(|c| Value::from(c.to_string()))
                    .unwrap_or_default()),
                other => Err(Error::host(format!(
                    "cannot index into {}",
                    other.type_name()
                ))),
            }
        }),
    )?;
    lib.define(
        "append",
        Value::native("append", |args| {
            let target = list("append", &arg(args, 0))?;
            target
                .borrow_mut()
                .extend(args.iter().skip(1).cloned());
            Ok(Value::Undefined)
        }),
    )?;
    lib.define(
        "assign",
        Value::native("assign", |args| {
            let target = list("assign", &arg(args, 0))?;
            let i = position(&arg(args, 1))
                .ok_or_else(|| Error::host("assign expects a non-negative integer index"))?;
            let len = i
                .checked_add(1)
                .filter(|len| *len <= MAX_LIST_LEN)
                .ok_or_else(|| Error::host("assign index out of range"))?;
            let mut items = target.borrow_mut();
            if len > items.len() {
                items.resize(len, Value::Undefined);
            }
            items[i] = arg(args, 2);
            Ok(Value::Undefined)
        }),
    )
}
