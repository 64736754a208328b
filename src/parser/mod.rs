mod ast;
mod grammar;
mod literal;
mod locations;
pub mod tokenizer;

pub use ast::*;
pub use grammar::{parse, PROGRAM_BINDING};
pub use locations::{Coords, Locatable, Location};
pub use tokenizer::tokenize_string;

#[cfg(test)]
mod test;
