// src/protocol/mod.rs - Wire command grammar: verb(arg1,arg2,...);?
use thiserror::Error;

pub mod parser;
#[cfg(test)]
mod parser_tests;

pub use parser::parse_command;

/// A successfully parsed control command: verb plus ordered arguments.
///
/// Arguments are individually trimmed and, when wrapped in a matching pair
/// of double quotes, unquoted. A malformed line never produces a `Command`;
/// it surfaces as [`ParseError::Malformed`] instead.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Command {
    pub verb: String,
    pub args: Vec<String>,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("Invalid message command: {0}")]
    Malformed(String),
}
