use std::{error::Error, fmt, io, path::PathBuf};

use crate::Word;

/// What an out-of-bounds access was aimed at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bounds {
    Cell(Word),
    Message { index: Word, length: usize },
    MessageLength(Word),
    Script { offset: Word, length: usize },
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ArithmeticError {
    DivisionByZero,
    ShiftOutOfRange(Word),
}

/// A node-local, terminal error. Setting one moves the node to
/// [`NodeState::Faulted`](crate::NodeState::Faulted).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Fault {
    OutOfBounds(Bounds),
    StackOverflow,
    StackUnderflow,
    UnknownWord(String),
    UnknownNode(Word),
    BadLiteral(String),
    Unterminated(char),
    NoMessage,
    NothingReceived,
    Arithmetic(ArithmeticError),
    Output(String),
}

impl fmt::Display for Bounds {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Bounds::Cell(index) => write!(f, "cell {index}"),
            Bounds::Message { index, length } => {
                write!(f, "message index {index} (length {length})")
            }
            Bounds::MessageLength(length) => write!(f, "message length {length}"),
            Bounds::Script { offset, length } => {
                write!(f, "script offset {offset} (length {length})")
            }
        }
    }
}

impl fmt::Display for ArithmeticError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArithmeticError::DivisionByZero => f.write_str("division by zero"),
            ArithmeticError::ShiftOutOfRange(amount) => write!(f, "shift by {amount} out of range"),
        }
    }
}

impl fmt::Display for Fault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Fault::OutOfBounds(bounds) => write!(f, "out of bounds: {bounds}"),
            Fault::StackOverflow => f.write_str("call stack overflow"),
            Fault::StackUnderflow => f.write_str("call stack underflow"),
            Fault::UnknownWord(word) => write!(f, "unknown word `{word}`"),
            Fault::UnknownNode(id) => write!(f, "no node with id {id}"),
            Fault::BadLiteral(token) => write!(f, "bad literal `{token}`"),
            Fault::Unterminated(open) => write!(f, "unterminated `{open}`"),
            Fault::NoMessage => f.write_str("no message composed"),
            Fault::NothingReceived => f.write_str("no message received"),
            Fault::Arithmetic(err) => write!(f, "arithmetic fault: {err}"),
            Fault::Output(err) => write!(f, "output failed: {err}"),
        }
    }
}

impl Error for Fault {}

impl From<ArithmeticError> for Fault {
    fn from(err: ArithmeticError) -> Self {
        Fault::Arithmetic(err)
    }
}

impl From<io::Error> for Fault {
    fn from(err: io::Error) -> Self {
        Fault::Output(err.to_string())
    }
}

/// Errors raised while turning sources into nodes.
#[derive(Debug)]
pub enum LoadError {
    Io { path: PathBuf, source: io::Error },
    NotUtf8 { path: PathBuf },
    Unbalanced { node: String, open: char, offset: usize },
    ReservedName(String),
    DuplicateName(String),
}

impl fmt::Display for LoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoadError::Io { path, source } => write!(f, "reading {}: {source}", path.display()),
            LoadError::NotUtf8 { path } => write!(f, "{} is not valid utf-8", path.display()),
            LoadError::Unbalanced { node, open, offset } => {
                write!(f, "{node}: unmatched `{open}` at offset {offset}")
            }
            LoadError::ReservedName(name) => write!(f, "node name `{name}` shadows a primitive"),
            LoadError::DuplicateName(name) => write!(f, "node `{name}` is defined twice"),
        }
    }
}

impl Error for LoadError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            LoadError::Io { source, .. } => Some(source),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RuntimeError {
    UnknownEntry(String),
}

impl fmt::Display for RuntimeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RuntimeError::UnknownEntry(name) => write!(f, "`{name}` does not name a node"),
        }
    }
}

impl Error for RuntimeError {}
