//! The standard library: the bindings every program can see.
//!
//! Everything here goes through the same registration path an embedder
//! would use ([`Context::define`]); the evaluator knows nothing about any
//! particular name. The one binding a program cannot do without is `do`,
//! since every program is parsed into a call of it.

use std::rc::Rc;

use crate::error::{Error, Result};
use crate::interpreter::{
    evaluate, evaluate_funcall, evaluate_list, CallStack, Context, Function, Value,
};
use crate::parser::{Coords, FunCall, List, Node, Symbol};

mod arithmetic;
mod sequences;

/// The standard library with `print` writing to stdout.
pub fn standard() -> Result<Context> {
    with_output(|line| println!("{}", line))
}

/// The standard library with `print` handing each printed line to `output`.
pub fn with_output<F>(output: F) -> Result<Context>
where
    F: Fn(&str) + 'static,
{
    let lib = Context::new();
    arithmetic::register(&lib)?;
    sequences::register(&lib)?;
    register_control_flow(&lib)?;
    register_variables(&lib)?;
    register_functions(&lib)?;

    lib.define(
        "print",
        Value::native("print", move |args| {
            let line: Vec<String> = args.iter().map(Value::to_string).collect();
            output(&line.join(" "));
            Ok(Value::Undefined)
        }),
    )?;
    Ok(lib)
}

fn arg(args: &[Value], index: usize) -> Value {
    args.get(index).cloned().unwrap_or_default()
}

fn node<'a>(stack: &CallStack, args: &'a List, index: usize, what: &str) -> Result<&'a Node> {
    args.get(index)
        .ok_or_else(|| Error::runtime(format!("missing {}", what), stack.current_coords(), stack))
}

fn register_control_flow(lib: &Context) -> Result<()> {
    lib.define(
        "do",
        Value::native("do", |args| Ok(args.last().cloned().unwrap_or_default())),
    )?;
    lib.define(
        "if",
        Value::new_macro("if", |stack, ctx, args| {
            let cond = node(stack, args, 0, "condition")?;
            let cond = evaluate(stack, ctx, cond)?;
            let branch = if cond.is_truthy() { args.get(1) } else { args.get(2) };
            match branch {
                Some(branch) => evaluate(stack, ctx, branch),
                None => Ok(Value::Undefined),
            }
        }),
    )?;
    lib.define(
        "while",
        Value::new_macro("while", |stack, ctx, args| {
            let cond = node(stack, args, 0, "condition")?;
            let mut ret = Value::Undefined;
            while evaluate(stack, ctx, cond)?.is_truthy() {
                if let Some(body) = args.get(1) {
                    ret = evaluate(stack, ctx, body)?;
                }
            }
            Ok(ret)
        }),
    )?;
    lib.define(
        "for",
        Value::new_macro("for", |stack, ctx, args| {
            let clauses = args
                .get(0)
                .and_then(Node::as_list)
                .filter(|l| l.len() == 3)
                .ok_or_else(|| {
                    Error::runtime("missing iteration list", stack.current_coords(), stack)
                })?;
            let (init, cond, step) = (&clauses.items()[0], &clauses.items()[1], &clauses.items()[2]);
            let scope = ctx.child();
            evaluate(stack, &scope, init)?;
            let mut ret = Value::Undefined;
            while evaluate(stack, &scope, cond)?.is_truthy() {
                if let Some(body) = args.get(1) {
                    ret = evaluate(stack, &scope, body)?;
                }
                evaluate(stack, &scope, step)?;
            }
            Ok(ret)
        }),
    )
}

/// Declares (or only sets) the atom at the head of `values`, taking the
/// optional second element as its value.
fn bind(stack: &CallStack, ctx: &Context, values: &[Value], declare: bool) -> Result<()> {
    let Some(name) = values.first().and_then(Value::as_atom) else {
        let msg = if declare { "cannot declare non-atom" } else { "cannot define non-atom" };
        return Err(Error::runtime(msg, stack.current_coords(), stack));
    };
    if declare {
        ctx.declare(stack, name)?;
        if let Some(value) = values.get(1) {
            ctx.set(stack, name, value.clone())?;
        }
        Ok(())
    } else {
        ctx.set(stack, name, arg(values, 1))
    }
}

/// `dec('x 1)` binds one name; `dec(('x 1) ('y 2))` binds one per list.
fn bind_all(stack: &mut CallStack, ctx: &Context, args: &List, declare: bool) -> Result<Value> {
    let values = evaluate_list(stack, ctx, args)?;
    if values.iter().all(|v| v.as_list().is_some()) {
        for pair in values.iter().filter_map(Value::as_list) {
            let pair = pair.borrow().clone();
            bind(stack, ctx, &pair, declare)?;
        }
    } else {
        bind(stack, ctx, &values, declare)?;
    }
    Ok(Value::Undefined)
}

fn register_variables(lib: &Context) -> Result<()> {
    lib.define(
        "dec",
        Value::new_macro("dec", |stack, ctx, args| bind_all(stack, ctx, args, true)),
    )?;
    lib.define(
        "def",
        Value::new_macro("def", |stack, ctx, args| bind_all(stack, ctx, args, false)),
    )?;
    lib.define(
        "inc",
        Value::new_macro("inc", |stack, ctx, args| {
            let values = evaluate_list(stack, ctx, args)?;
            let names: Vec<&Symbol> = values.iter().filter_map(Value::as_atom).collect();
            if names.len() != values.len() {
                return Err(Error::runtime(
                    "cannot define non-atom",
                    stack.current_coords(),
                    stack,
                ));
            }
            for name in names {
                let Value::Number(n) = ctx.get(stack, name)? else {
                    return Err(Error::runtime(
                        format!("cannot increment non-number {}", name.name()),
                        stack.current_coords(),
                        stack,
                    ));
                };
                ctx.set(stack, name, Value::Number(n + 1.0))?;
            }
            Ok(Value::Undefined)
        }),
    )
}

fn register_functions(lib: &Context) -> Result<()> {
    lib.define(
        "function",
        Value::new_macro("function", |stack, ctx, args| {
            let params = args.get(0).and_then(Node::as_list).ok_or_else(|| {
                Error::runtime("missing argument list", stack.current_coords(), stack)
            })?;
            let params = evaluate_list(stack, ctx, params)?
                .iter()
                .map(|p| {
                    p.as_atom().cloned().ok_or_else(|| {
                        Error::runtime("non-atom in argument list", stack.current_coords(), stack)
                    })
                })
                .collect::<Result<Vec<_>>>()?;
            let body = List::new(args.items()[1..].to_vec(), args.coords.clone());
            Ok(Value::Function(Rc::new(Function::new(params, body, ctx.clone()))))
        }),
    )?;
    lib.define(
        "variadic",
        Value::native("variadic", |args| {
            let fun = arg(args, 0);
            Ok(Value::new_macro("variadic", move |stack, ctx, raw| {
                let all = Node::List(Rc::new(raw.clone()));
                let call = FunCall::new(
                    Node::Literal(fun.clone(), Coords::Native),
                    Rc::new(List::new(vec![all], Coords::Native)),
                    Coords::Native,
                );
                evaluate_funcall(stack, ctx, &call)
            }))
        }),
    )
}
