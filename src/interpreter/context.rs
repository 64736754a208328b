use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use super::{CallStack, Value};
use crate::error::{Error, Result};
use crate::parser::{Locatable, Symbol};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mutability {
    Mutable,
    Immutable,
}

#[derive(Debug)]
struct Scope {
    bindings: RefCell<HashMap<Rc<str>, Value>>,
    parents: Vec<Context>,
    mutability: Mutability,
}

/// A scope of named values. Names not found locally are looked up in the
/// parents, in the order they were given, depth first.
#[derive(Debug, Clone)]
pub struct Context(Rc<Scope>);

impl Default for Context {
    fn default() -> Self {
        Self::new()
    }
}

impl Context {
    pub fn new() -> Self {
        Self::with_parents(vec![])
    }

    pub fn with_parents(parents: Vec<Context>) -> Self {
        Self::build(parents, Mutability::Mutable)
    }

    pub fn child(&self) -> Self {
        Self::with_parents(vec![self.clone()])
    }

    /// A scope that can be read through but never declared in, set or
    /// undeclared from.
    pub fn immutable(parents: Vec<Context>) -> Self {
        Self::build(parents, Mutability::Immutable)
    }

    fn build(parents: Vec<Context>, mutability: Mutability) -> Self {
        Self(Rc::new(Scope {
            bindings: RefCell::new(HashMap::new()),
            parents,
            mutability,
        }))
    }

    pub fn is_immutable(&self) -> bool {
        self.0.mutability == Mutability::Immutable
    }

    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }

    pub fn has(&self, name: &Symbol) -> bool {
        self.0.bindings.borrow().contains_key(name.name())
    }

    pub fn contains(&self, name: &Symbol) -> bool {
        self.has(name) || self.0.parents.iter().any(|p| p.contains(name))
    }

    fn find(&self, stack: &CallStack, name: &Symbol) -> Result<&Context> {
        self.0
            .parents
            .iter()
            .find(|p| p.contains(name))
            .ok_or_else(|| {
                Error::runtime(
                    format!("{} is not declared", name.name()),
                    name.coords(),
                    stack,
                )
            })
    }

    pub fn get(&self, stack: &CallStack, name: &Symbol) -> Result<Value> {
        if let Some(value) = self.0.bindings.borrow().get(name.name()) {
            return Ok(value.clone());
        }
        self.find(stack, name)?.get(stack, name)
    }

    pub fn declare(&self, stack: &CallStack, name: &Symbol) -> Result<()> {
        self.check_mutable(stack, name, "declare")?;
        if self.has(name) {
            return Err(Error::runtime(
                format!("{} is already declared", name.name()),
                name.coords(),
                stack,
            ));
        }
        self.0
            .bindings
            .borrow_mut()
            .insert(name.name.clone(), Value::Null);
        Ok(())
    }

    pub fn undeclare(&self, stack: &CallStack, name: &Symbol) -> Result<()> {
        self.check_mutable(stack, name, "undeclare")?;
        if self.0.bindings.borrow_mut().remove(name.name()).is_some() {
            return Ok(());
        }
        self.find(stack, name)?.undeclare(stack, name)
    }

    pub fn set(&self, stack: &CallStack, name: &Symbol, value: Value) -> Result<()> {
        self.check_mutable(stack, name, "set")?;
        if let Some(slot) = self.0.bindings.borrow_mut().get_mut(name.name()) {
            *slot = value;
            return Ok(());
        }
        self.find(stack, name)?.set(stack, name, value)
    }

    /// Declares and sets a host-provided binding. Meant for populating a
    /// library before any program runs.
    pub fn define(&self, name: &str, value: impl Into<Value>) -> Result<()> {
        let stack = CallStack::new();
        let name = Symbol::native(name);
        self.declare(&stack, &name)?;
        self.set(&stack, &name, value.into())
    }

    fn check_mutable(&self, stack: &CallStack, name: &Symbol, op: &str) -> Result<()> {
        match self.0.mutability {
            Mutability::Mutable => Ok(()),
            Mutability::Immutable => Err(Error::runtime(
                format!("cannot {} binding in an immutable context", op),
                name.coords(),
                stack,
            )),
        }
    }
}
