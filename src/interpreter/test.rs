use std::cell::Cell;
use std::rc::Rc;

use super::*;
use crate::error::ErrorKind;
use crate::parser::{Coords, Symbol};

fn sym(name: &str) -> Symbol {
    Symbol::new(name, Coords::new(Rc::from("test.jyf"), 1, 1))
}

/// A minimal library: `do`, a counting native, and an `if` macro.
fn minimal_library(counter: Rc<Cell<u32>>) -> Context {
    let lib = Context::new();
    lib.define(
        "do",
        Value::native("do", |args| Ok(args.last().cloned().unwrap_or_default())),
    )
    .unwrap();
    lib.define(
        "tick",
        Value::native("tick", move |_| {
            counter.set(counter.get() + 1);
            Ok(Value::Number(counter.get() as f64))
        }),
    )
    .unwrap();
    lib.define(
        "if",
        Value::new_macro("if", |stack, ctx, args| {
            let cond = evaluate(stack, ctx, &args.items()[0])?;
            let branch = if cond.is_truthy() { 1 } else { 2 };
            evaluate(stack, ctx, &args.items()[branch])
        }),
    )
    .unwrap();
    lib.define(
        "choose",
        Value::native("choose", |args| {
            Ok(if args[0].is_truthy() { args[1].clone() } else { args[2].clone() })
        }),
    )
    .unwrap();
    lib.define(
        "fail",
        Value::native("fail", |_| Err(Error::host("failed on purpose"))),
    )
    .unwrap();
    lib.define("yes", true).unwrap();
    lib
}

fn run_counting(source: &str) -> (Result<Value>, u32) {
    let counter = Rc::new(Cell::new(0));
    let lib = minimal_library(counter.clone());
    let result = run(&lib, source, "test.jyf");
    (result, counter.get())
}

#[test]
fn test_child_scope_shadows_and_undeclare_exposes_parent() {
    let stack = CallStack::new();
    let parent = Context::new();
    parent.define("x", 1.0).unwrap();
    let child = parent.child();
    let x = sym("x");

    child.declare(&stack, &x).unwrap();
    child.set(&stack, &x, Value::Number(2.0)).unwrap();
    assert_eq!(child.get(&stack, &x).unwrap().as_number(), Some(2.0));
    assert_eq!(parent.get(&stack, &x).unwrap().as_number(), Some(1.0));

    child.undeclare(&stack, &x).unwrap();
    assert!(!child.has(&x));
    assert!(child.contains(&x));
    assert_eq!(child.get(&stack, &x).unwrap().as_number(), Some(1.0));
}

#[test]
fn test_declare_sets_null_and_rejects_redeclaration() {
    let stack = CallStack::new();
    let ctx = Context::new();
    let x = sym("x");
    ctx.declare(&stack, &x).unwrap();
    assert!(matches!(ctx.get(&stack, &x).unwrap(), Value::Null));
    let err = ctx.declare(&stack, &x).unwrap_err();
    assert_eq!(err.kind, ErrorKind::Runtime);
    assert_eq!(err.message, "x is already declared");
    assert_eq!(err.coords.as_ref().and_then(Coords::line), Some(1));
}

#[test]
fn test_set_reaches_the_declaring_ancestor() {
    let stack = CallStack::new();
    let root = Context::new();
    root.define("n", 1.0).unwrap();
    let inner = root.child().child();
    inner.set(&stack, &sym("n"), Value::Number(5.0)).unwrap();
    assert_eq!(root.get(&stack, &sym("n")).unwrap().as_number(), Some(5.0));
}

#[test]
fn test_undeclared_lookups_fail() {
    let stack = CallStack::new();
    let ctx = Context::new().child();
    for err in [
        ctx.get(&stack, &sym("nope")).unwrap_err(),
        ctx.set(&stack, &sym("nope"), Value::Null).unwrap_err(),
        ctx.undeclare(&stack, &sym("nope")).unwrap_err(),
    ] {
        assert_eq!(err.kind, ErrorKind::Runtime);
        assert_eq!(err.message, "nope is not declared");
    }
}

#[test]
fn test_parents_are_searched_in_order() {
    let stack = CallStack::new();
    let first = Context::new();
    let second = Context::new();
    first.define("v", "first").unwrap();
    second.define("v", "second").unwrap();
    second.define("w", "only second").unwrap();
    let both = Context::with_parents(vec![first.clone(), second.clone()]);
    assert_eq!(both.get(&stack, &sym("v")).unwrap().to_string(), "first");
    assert_eq!(both.get(&stack, &sym("w")).unwrap().to_string(), "only second");

    both.set(&stack, &sym("v"), Value::from("changed")).unwrap();
    assert_eq!(first.get(&stack, &sym("v")).unwrap().to_string(), "changed");
    assert_eq!(second.get(&stack, &sym("v")).unwrap().to_string(), "second");
}

#[test]
fn test_immutable_context_is_read_only() {
    let stack = CallStack::new();
    let lib = Context::new();
    lib.define("x", 3.0).unwrap();
    let root = Context::immutable(vec![lib.clone()]);
    let x = sym("x");
    assert!(root.is_immutable());
    assert!(!lib.is_immutable());

    assert_eq!(root.get(&stack, &x).unwrap().as_number(), Some(3.0));
    let errors = [
        root.declare(&stack, &sym("y")).unwrap_err(),
        root.set(&stack, &x, Value::Null).unwrap_err(),
        root.undeclare(&stack, &x).unwrap_err(),
    ];
    for err in &errors {
        assert_eq!(err.kind, ErrorKind::Runtime);
    }
    assert_eq!(errors[0].message, "cannot declare binding in an immutable context");
    assert_eq!(errors[1].message, "cannot set binding in an immutable context");
    assert_eq!(errors[2].message, "cannot undeclare binding in an immutable context");

    // Children of the immutable scope are ordinary scopes.
    let child = root.child();
    assert!(!child.is_immutable());
    child.declare(&stack, &sym("y")).unwrap();
    assert!(child.has(&sym("y")));
}

#[test]
fn test_program_value_is_last_expression() {
    let (result, _) = run_counting("1 \"two\" 'three");
    assert!(matches!(result.unwrap(), Value::Atom(s) if s.name() == "three"));
    let (result, _) = run_counting("");
    assert!(matches!(result.unwrap(), Value::Undefined));
}

#[test]
fn test_list_evaluates_to_all_results() {
    let (result, ticks) = run_counting("(tick() tick() 'x)");
    let list = result.unwrap();
    assert_eq!(list.pretty(), "(1 2 'x)");
    assert_eq!(ticks, 2);
}

#[test]
fn test_macro_only_evaluates_selected_branch() {
    let (result, ticks) = run_counting("if(yes tick() (tick() tick()))");
    assert_eq!(result.unwrap().as_number(), Some(1.0));
    assert_eq!(ticks, 1);
}

#[test]
fn test_function_arguments_are_all_evaluated() {
    let (result, ticks) = run_counting("choose(yes tick() (tick() tick()))");
    assert_eq!(result.unwrap().as_number(), Some(1.0));
    assert_eq!(ticks, 3);
}

#[test]
fn test_calling_a_non_function() {
    let (result, _) = run_counting("(1 2)(3)");
    let err = result.unwrap_err();
    assert_eq!(err.kind, ErrorKind::Runtime);
    assert_eq!(err.message, "cannot call non-function");
    let frames = err.callstack.unwrap();
    assert_eq!(frames[0].kind, "list");
    assert_eq!(frames[0].name, "(1 2)");
}

#[test]
fn test_native_errors_get_location_and_stack() {
    let (result, _) = run_counting("do(\n  fail())");
    let err = result.unwrap_err();
    assert_eq!(err.message, "failed on purpose");
    assert_eq!(err.coords.as_ref().and_then(Coords::line), Some(2));
    let names: Vec<String> = err.callstack.unwrap().into_iter().map(|f| f.name).collect();
    assert_eq!(names, vec!["fail", "do", "do"]);
}

#[test]
fn test_callstack_is_unwound_after_errors() {
    let counter = Rc::new(Cell::new(0));
    let lib = minimal_library(counter);
    let root = Context::immutable(vec![lib]);
    let program = crate::parser::parse(
        &crate::parser::tokenize_string("do(tick() fail())", "test.jyf").unwrap(),
    )
    .unwrap();
    let mut stack = CallStack::new();
    assert!(evaluate(&mut stack, &root, &program).is_err());
    assert!(stack.is_empty());
}

#[test]
fn test_function_call_protocol() {
    let stack = &mut CallStack::new();
    let closure = Context::new();
    closure.define("offset", 10.0).unwrap();
    let lib = minimal_library(Rc::new(Cell::new(0)));
    let tokens = crate::parser::tokenize_string("a b offset", "f.jyf").unwrap();
    let body = match crate::parser::parse(&tokens).unwrap() {
        Node::FunCall(call) => call.args().clone(),
        _ => unreachable!(),
    };
    let f = Function::new(
        vec![sym("a"), sym("b")],
        body,
        Context::with_parents(vec![closure, lib]),
    );

    let result = call_function(stack, &f, vec![Value::Number(1.0)]).unwrap();
    assert_eq!(result.as_number(), Some(10.0));
    assert!(stack.is_empty());

    let results = evaluate_list(
        stack,
        &Context::new(),
        &crate::parser::List::new(vec![], Coords::Native),
    )
    .unwrap();
    assert!(results.is_empty());
}
