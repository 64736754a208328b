mod error;
pub use error::{Error, ErrorKind, Result};

pub mod parser;
pub use parser::{parse, tokenize_string, Coords, Node};

pub mod interpreter;
pub use interpreter::{run, CallStack, Context, Frame, Value};

pub mod library;
