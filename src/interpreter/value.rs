use std::cell::{Ref, RefCell, RefMut};
use std::rc::Rc;

use derivative::Derivative;

use super::{CallStack, Context};
use crate::error::Result;
use crate::parser::{List, Symbol};

pub type MacroFn = dyn Fn(&mut CallStack, &Context, &List) -> Result<Value>;
pub type NativeFn = dyn Fn(&[Value]) -> Result<Value>;

#[derive(Debug, Clone, Default)]
pub enum Value {
    /// The result of something that produced nothing.
    #[default]
    Undefined,
    /// The value of a binding that was declared but never set.
    Null,
    Bool(bool),
    Number(f64),
    Str(Rc<str>),
    Atom(Symbol),
    List(Sequence),
    Function(Rc<Function>),
    Macro(Rc<Macro>),
    Native(Rc<Native>),
}

/// A shared, mutable sequence of values. Clones alias the same storage.
#[derive(Clone, Default)]
pub struct Sequence(Rc<RefCell<Vec<Value>>>);

impl Sequence {
    pub fn new(items: Vec<Value>) -> Self {
        Self(Rc::new(RefCell::new(items)))
    }

    pub fn borrow(&self) -> Ref<'_, Vec<Value>> {
        self.0.borrow()
    }

    pub fn borrow_mut(&self) -> RefMut<'_, Vec<Value>> {
        self.0.borrow_mut()
    }

    pub fn len(&self) -> usize {
        self.0.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.borrow().is_empty()
    }

    pub fn get(&self, index: usize) -> Option<Value> {
        self.0.borrow().get(index).cloned()
    }

    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl std::fmt::Debug for Sequence {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.0.borrow().iter()).finish()
    }
}

/// A user-defined function: its parameters, its body, and the scope it was
/// created in.
#[derive(Derivative)]
#[derivative(Debug)]
pub struct Function {
    pub(crate) params: Vec<Symbol>,
    pub(crate) body: List,
    #[derivative(Debug = "ignore")]
    pub(crate) closure: Context,
}

impl Function {
    pub fn new(params: Vec<Symbol>, body: List, closure: Context) -> Self {
        Self {
            params,
            body,
            closure,
        }
    }

    pub fn params(&self) -> &[Symbol] {
        &self.params
    }
}

#[derive(Derivative)]
#[derivative(Debug)]
pub struct Macro {
    pub(crate) name: String,
    #[derivative(Debug = "ignore")]
    pub(crate) body: Box<MacroFn>,
}

#[derive(Derivative)]
#[derivative(Debug)]
pub struct Native {
    pub(crate) name: String,
    #[derivative(Debug = "ignore")]
    pub(crate) body: Box<NativeFn>,
}

impl Macro {
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl Native {
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl Value {
    pub fn native<F>(name: &str, body: F) -> Self
    where
        F: Fn(&[Value]) -> Result<Value> + 'static,
    {
        Self::Native(Rc::new(Native {
            name: name.to_string(),
            body: Box::new(body),
        }))
    }

    pub fn new_macro<F>(name: &str, body: F) -> Self
    where
        F: Fn(&mut CallStack, &Context, &List) -> Result<Value> + 'static,
    {
        Self::Macro(Rc::new(Macro {
            name: name.to_string(),
            body: Box::new(body),
        }))
    }

    pub fn list(items: Vec<Value>) -> Self {
        Self::List(Sequence::new(items))
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Undefined => "undefined",
            Self::Null => "null",
            Self::Bool(_) => "boolean",
            Self::Number(_) => "number",
            Self::Str(_) => "string",
            Self::Atom(_) => "atom",
            Self::List(_) => "list",
            Self::Function(_) => "fun",
            Self::Macro(_) => "macro",
            Self::Native(_) => "native",
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            Self::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_atom(&self) -> Option<&Symbol> {
        match self {
            Self::Atom(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&Sequence> {
        match self {
            Self::List(l) => Some(l),
            _ => None,
        }
    }

    pub fn is_truthy(&self) -> bool {
        match self {
            Self::Undefined | Self::Null => false,
            Self::Bool(b) => *b,
            Self::Number(n) => *n != 0.0 && !n.is_nan(),
            Self::Str(s) => !s.is_empty(),
            _ => true,
        }
    }

    /// Identity for shared values, content for everything else.
    pub fn strict_eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Undefined, Self::Undefined) | (Self::Null, Self::Null) => true,
            (Self::Bool(a), Self::Bool(b)) => a == b,
            (Self::Number(a), Self::Number(b)) => a == b,
            (Self::Str(a), Self::Str(b)) => a == b,
            (Self::Atom(a), Self::Atom(b)) => a == b,
            (Self::List(a), Self::List(b)) => a.ptr_eq(b),
            (Self::Function(a), Self::Function(b)) => Rc::ptr_eq(a, b),
            (Self::Macro(a), Self::Macro(b)) => Rc::ptr_eq(a, b),
            (Self::Native(a), Self::Native(b)) => Rc::ptr_eq(a, b),
            _ => false,
        }
    }

    /// The source-like rendering used in call-stack labels and error
    /// messages. Strings are quoted, callables are placeholders.
    pub fn pretty(&self) -> String {
        match self {
            Self::Str(s) => format!("{:?}", s),
            Self::Atom(s) => format!("'{}", s.name()),
            Self::List(l) => {
                let items: Vec<String> = l.borrow().iter().map(Value::pretty).collect();
                format!("({})", items.join(" "))
            }
            Self::Function(_) => "<fun>".to_string(),
            Self::Macro(_) => "<macro>".to_string(),
            Self::Native(_) => "<native>".to_string(),
            other => other.to_string(),
        }
    }
}

fn format_number(n: f64) -> String {
    if n.is_infinite() {
        let sign = if n > 0.0 { "" } else { "-" };
        format!("{}Infinity", sign)
    } else if n == 0.0 {
        "0".to_string()
    } else {
        n.to_string()
    }
}

impl std::fmt::Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Undefined => write!(f, "undefined"),
            Self::Null => write!(f, "null"),
            Self::Bool(b) => write!(f, "{}", b),
            Self::Number(n) => write!(f, "{}", format_number(*n)),
            Self::Str(s) => write!(f, "{}", s),
            other => write!(f, "{}", other.pretty()),
        }
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Self::Str(Rc::from(value))
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Self::Str(Rc::from(value))
    }
}

impl From<Vec<Value>> for Value {
    fn from(value: Vec<Value>) -> Self {
        Self::list(value)
    }
}
