mod dictionary;
mod fault;
mod interpreter;
mod lexer;
pub mod loader;
mod message;
mod node;
mod output;
mod primitives;
mod runtime;
mod scheduler;

pub use dictionary::*;
pub use fault::*;
pub use interpreter::*;
pub use lexer::*;
pub use loader::{NODE_SUFFIX, load_dir};
pub use message::*;
pub use node::*;
pub use output::OutputCapture;
pub use primitives::{
    ExecutionResult, PRIMITIVES, Primitive, PrimitiveContext, PrimitiveDesc, PrimitiveFunction,
};
pub use runtime::Runtime;
pub use scheduler::*;

/// Machine word stored in node memory and message payloads.
pub type Word = i64;

/// Memory cells per node.
pub const CELLS: usize = 1000;
/// Maximum call depth.
pub const STACK: usize = 25;
/// Inbox capacity.
pub const QUEUE: usize = 10;
