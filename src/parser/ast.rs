use std::rc::Rc;

use super::locations::Coords;
use super::tokenizer::{Token, TokenType as TT};
use crate::interpreter::Value;

/// A name as written in the source, with the position it was written at.
#[derive(Clone)]
pub struct Symbol {
    pub(crate) name: Rc<str>,
    pub(crate) coords: Coords,
}

impl Symbol {
    pub fn new(name: &str, coords: Coords) -> Self {
        Self {
            name: Rc::from(name),
            coords,
        }
    }

    /// A symbol that does not originate from any source file.
    pub fn native(name: &str) -> Self {
        Self::new(name, Coords::Native)
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

impl PartialEq for Symbol {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl std::fmt::Debug for Symbol {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", self.name)
    }
}

impl From<Token> for Symbol {
    fn from(value: Token) -> Self {
        match value.typ {
            TT::ATOM => Self::new(&value.lexeme[1..], value.coords),
            TT::BINDING => Self::new(&value.lexeme, value.coords),
            _ => unreachable!(),
        }
    }
}

#[derive(Clone)]
pub struct List {
    pub(crate) items: Vec<Node>,
    pub(crate) coords: Coords,
}

impl List {
    pub fn new(items: Vec<Node>, coords: Coords) -> Self {
        Self { items, coords }
    }

    pub fn items(&self) -> &[Node] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Node> {
        self.items.get(index)
    }
}

impl std::fmt::Debug for List {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.items.iter()).finish()
    }
}

#[derive(Clone)]
pub struct FunCall {
    pub(crate) target: Node,
    pub(crate) args: Rc<List>,
    pub(crate) coords: Coords,
}

impl FunCall {
    pub fn new(target: Node, args: Rc<List>, coords: Coords) -> Self {
        Self {
            target,
            args,
            coords,
        }
    }

    pub fn target(&self) -> &Node {
        &self.target
    }

    pub fn args(&self) -> &List {
        &self.args
    }
}

#[derive(Clone)]
pub enum Node {
    Literal(Value, Coords),
    Atom(Symbol),
    Binding(Symbol),
    List(Rc<List>),
    FunCall(Rc<FunCall>),
}

impl Node {
    pub fn as_list(&self) -> Option<&Rc<List>> {
        match self {
            Self::List(l) => Some(l),
            _ => None,
        }
    }
}

impl std::fmt::Debug for Node {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Literal(value, _) => write!(f, "{:?}", value),
            Self::Atom(s) => write!(f, "Atom({:?})", s),
            Self::Binding(s) => write!(f, "Binding({:?})", s),
            Self::List(l) => write!(f, "List({:?})", l),
            Self::FunCall(call) => write!(f, "FunCall({:?}, {:?})", call.target, call.args),
        }
    }
}

impl std::fmt::Display for List {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "(")?;
        for (index, item) in self.items.iter().enumerate() {
            if index != 0 {
                write!(f, " ")?;
            }
            write!(f, "{}", item)?;
        }
        write!(f, ")")
    }
}

impl std::fmt::Display for Node {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Literal(value, _) => write!(f, "{}", value.pretty()),
            Self::Atom(s) => write!(f, "'{}", s.name),
            Self::Binding(s) => write!(f, "{}", s.name),
            Self::List(l) => write!(f, "{}", l),
            Self::FunCall(call) => write!(f, "{}{}", call.target, call.args),
        }
    }
}
