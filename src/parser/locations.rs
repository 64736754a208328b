use std::rc::Rc;

use super::ast::{FunCall, List, Node, Symbol};
use super::tokenizer::Token;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Location {
    pub file: Rc<str>,
    pub line: usize,
    pub column: usize,
}

impl std::fmt::Display for Location {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}:{}", self.file, self.line, self.column)
    }
}

/// Where a token or node came from. Host-synthesized tokens and nodes have
/// no position in any file and report as `native`.
#[derive(Clone, Default, Debug, PartialEq, Eq)]
pub enum Coords {
    #[default]
    Native,
    Source(Location),
}

impl Coords {
    pub fn new(file: Rc<str>, line: usize, column: usize) -> Self {
        Self::Source(Location { file, line, column })
    }

    pub fn line(&self) -> Option<usize> {
        match self {
            Self::Native => None,
            Self::Source(loc) => Some(loc.line),
        }
    }

    pub fn column(&self) -> Option<usize> {
        match self {
            Self::Native => None,
            Self::Source(loc) => Some(loc.column),
        }
    }
}

impl std::fmt::Display for Coords {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Native => write!(f, "native"),
            Self::Source(loc) => write!(f, "{}", loc),
        }
    }
}

pub trait Locatable {
    fn coords(&self) -> Coords;
}

impl Locatable for Token {
    fn coords(&self) -> Coords {
        self.coords.clone()
    }
}

impl Locatable for Symbol {
    fn coords(&self) -> Coords {
        self.coords.clone()
    }
}

impl Locatable for List {
    fn coords(&self) -> Coords {
        self.coords.clone()
    }
}

impl Locatable for FunCall {
    fn coords(&self) -> Coords {
        self.coords.clone()
    }
}

impl Locatable for Node {
    fn coords(&self) -> Coords {
        match self {
            Self::Literal(_, c) => c.clone(),
            Self::Atom(s) | Self::Binding(s) => s.coords(),
            Self::List(l) => l.coords(),
            Self::FunCall(call) => call.coords(),
        }
    }
}

impl<R> Locatable for Rc<R>
where
    R: Locatable,
{
    fn coords(&self) -> Coords {
        (**self).coords()
    }
}
