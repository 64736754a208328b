use crate::interpreter::{CallStack, Frame};
use crate::parser::Coords;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Tokenize,
    Parse,
    Runtime,
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Tokenize => write!(f, "Tokenize"),
            Self::Parse => write!(f, "Parse"),
            Self::Runtime => write!(f, "Runtime"),
        }
    }
}

/// A diagnostic for the user: what went wrong, where, and which calls were
/// in progress. The call stack is stored innermost frame first.
#[derive(thiserror::Error, Debug, Clone)]
#[error("{kind}Error: {message}")]
pub struct Error {
    pub kind: ErrorKind,
    pub message: String,
    pub coords: Option<Coords>,
    pub callstack: Option<Vec<Frame>>,
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            coords: None,
            callstack: None,
        }
    }

    pub fn tokenize(message: impl Into<String>, coords: Coords) -> Self {
        Self::new(ErrorKind::Tokenize, message).at(coords)
    }

    pub fn parse(message: impl Into<String>, coords: Coords) -> Self {
        Self::new(ErrorKind::Parse, message).at(coords)
    }

    pub fn runtime(message: impl Into<String>, coords: Coords, stack: &CallStack) -> Self {
        Self::new(ErrorKind::Runtime, message)
            .at(coords)
            .within(stack)
    }

    /// A runtime error raised by host code that knows neither where it was
    /// called from nor the call stack; the evaluator fills both in.
    pub fn host(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Runtime, message)
    }

    pub fn at(mut self, coords: Coords) -> Self {
        self.coords.get_or_insert(coords);
        self
    }

    pub fn within(mut self, stack: &CallStack) -> Self {
        self.callstack.get_or_insert_with(|| stack.snapshot());
        self
    }

    /// Renders the message line followed by one line per frame, outermost
    /// call first.
    pub fn report(&self) -> String {
        let mut out = self.to_string();
        if let Some(coords) = &self.coords {
            out.push_str(&format!(", at {}", coords));
        }
        if let Some(frames) = &self.callstack {
            for frame in frames.iter().rev() {
                out.push_str(&format!("\n  {}() at {}", frame.name, frame.coords));
            }
        }
        out
    }
}
