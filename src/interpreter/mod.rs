mod callstack;
mod context;
mod value;

pub use callstack::{CallStack, Frame};
pub use context::Context;
pub use value::{Function, Macro, MacroFn, Native, NativeFn, Sequence, Value};

use crate::error::{Error, Result};
use crate::parser::{parse, tokenize_string, FunCall, List, Locatable, Node, Symbol};

/// Tokenizes, parses and evaluates a whole program. The program runs in an
/// immutable scope whose only parent is `library`, so it can read every
/// library binding but never replace one.
pub fn run(library: &Context, source: &str, file: &str) -> Result<Value> {
    let tokens = tokenize_string(source, file)?;
    let program = parse(&tokens)?;
    let root = Context::immutable(vec![library.clone()]);
    log::debug!("evaluating {}", file);
    evaluate(&mut CallStack::new(), &root, &program)
}

pub fn evaluate(stack: &mut CallStack, ctx: &Context, node: &Node) -> Result<Value> {
    match node {
        Node::Literal(value, _) => Ok(value.clone()),
        Node::Atom(symbol) => Ok(Value::Atom(symbol.clone())),
        Node::Binding(symbol) => evaluate_binding(stack, ctx, symbol),
        Node::List(list) => evaluate_list(stack, ctx, list).map(Value::list),
        Node::FunCall(call) => evaluate_funcall(stack, ctx, call),
    }
}

pub fn evaluate_binding(stack: &mut CallStack, ctx: &Context, symbol: &Symbol) -> Result<Value> {
    ctx.get(stack, symbol)
}

/// Evaluates every element in one new child scope of `ctx`, so earlier
/// elements' declarations are visible to later ones but not outside.
pub fn evaluate_list(stack: &mut CallStack, ctx: &Context, list: &List) -> Result<Vec<Value>> {
    let local = ctx.child();
    list.items()
        .iter()
        .map(|item| evaluate(stack, &local, item))
        .collect()
}

pub fn evaluate_funcall(stack: &mut CallStack, ctx: &Context, call: &FunCall) -> Result<Value> {
    let callee = evaluate(stack, ctx, call.target())?;
    stack.push(Frame {
        coords: call.coords(),
        kind: callee.type_name().to_string(),
        name: call.target().to_string(),
    });
    let result = invoke(stack, ctx, call, &callee).map_err(|e| e.at(call.coords()).within(stack));
    stack.pop();
    result
}

fn invoke(stack: &mut CallStack, ctx: &Context, call: &FunCall, callee: &Value) -> Result<Value> {
    match callee {
        Value::Macro(m) => (m.body)(stack, ctx, call.args()),
        Value::Function(f) => {
            let args = evaluate_list(stack, ctx, call.args())?;
            call_function(stack, f, args)
        }
        Value::Native(n) => {
            let args = evaluate_list(stack, ctx, call.args())?;
            (n.body)(&args)
        }
        _ => Err(Error::runtime(
            "cannot call non-function",
            call.coords(),
            stack,
        )),
    }
}

/// Binds `args` to the function's parameters in a fresh scope and evaluates
/// the body with that scope in front of the closure. Missing arguments leave
/// their parameter declared but unset; extra arguments are ignored.
pub fn call_function(stack: &mut CallStack, function: &Function, args: Vec<Value>) -> Result<Value> {
    let params = Context::new();
    let mut args = args.into_iter();
    for param in function.params.iter() {
        params.declare(stack, param)?;
        if let Some(value) = args.next() {
            params.set(stack, param, value)?;
        }
    }
    let scope = Context::with_parents(vec![params, function.closure.clone()]);
    let results = evaluate_list(stack, &scope, &function.body)?;
    Ok(results.into_iter().last().unwrap_or_default())
}

#[cfg(test)]
mod test;
