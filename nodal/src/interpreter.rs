use std::io::Write;

use log::{trace, warn};

use crate::{
    BlockReason, Dictionary, Entry, ExecutionResult, Fault, Lexeme, Node, NodeId, NodeState,
    ParsedToken, PrimitiveContext, Word, lexer::classify,
};

/// Every node except the one being ticked.
pub struct Peers<'n> {
    before: &'n mut [Node],
    after: &'n mut [Node],
}

impl<'n> Peers<'n> {
    pub fn empty() -> Self {
        Self {
            before: Default::default(),
            after: Default::default(),
        }
    }

    /// Splits `nodes` into the node at `index` and everyone else.
    pub fn split(nodes: &'n mut [Node], index: usize) -> Option<(&'n mut Node, Self)> {
        if index >= nodes.len() {
            return None;
        }
        let (before, rest) = nodes.split_at_mut(index);
        let (node, after) = rest.split_first_mut()?;
        Some((node, Self { before, after }))
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.before
            .iter()
            .chain(self.after.iter())
            .any(|n| n.id == id)
    }

    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.before
            .iter_mut()
            .chain(self.after.iter_mut())
            .find(|n| n.id == id)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickStatus {
    /// Not ready, nothing ran.
    Idle,
    /// Ran off the end of the script.
    Completed,
    Blocked(BlockReason),
    Faulted,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tick {
    pub instructions: u64,
    pub status: TickStatus,
}

impl Tick {
    pub const IDLE: Tick = Tick {
        instructions: 0,
        status: TickStatus::Idle,
    };
}

/// Executes one node's script against its own memory.
pub struct Interpreter<'a> {
    node: &'a mut Node,
    peers: Peers<'a>,
    dictionary: &'a Dictionary,
    output: &'a mut dyn Write,
    instructions: u64,
}

impl<'a> Interpreter<'a> {
    pub fn new(
        node: &'a mut Node,
        peers: Peers<'a>,
        dictionary: &'a Dictionary,
        output: &'a mut dyn Write,
    ) -> Self {
        Self {
            node,
            peers,
            dictionary,
            output,
            instructions: 0,
        }
    }

    pub fn instructions(&self) -> u64 {
        self.instructions
    }

    /// Runs until the script ends, a primitive yields or a fault occurs.
    pub fn run(&mut self) -> Result<ExecutionResult, Fault> {
        loop {
            match self.step()? {
                None => return Ok(ExecutionResult::Normal),
                Some(ExecutionResult::Normal) => {}
                Some(result) => return Ok(result),
            }
        }
    }

    /// Executes a single lexeme. `None` once the script is exhausted.
    pub fn step(&mut self) -> Result<Option<ExecutionResult>, Fault> {
        self.node.resume_mark = self.node.cursor();
        let Some(lexeme) = self.node.script.next_lexeme()? else {
            return Ok(None);
        };

        let token = match lexeme {
            Lexeme::Comment => return Ok(Some(ExecutionResult::Normal)),
            Lexeme::Block { start } => {
                self.node.set_current_value(start as Word);
                return Ok(Some(ExecutionResult::Normal));
            }
            Lexeme::Token(token) => token,
        };

        // the script is shared, so holding a clone keeps `text` alive while
        // the node itself is mutated
        let script = self.node.script.clone();
        let text = script.get_token_string(token)?;
        self.execute_token(text).map(Some)
    }

    fn execute_token(&mut self, text: &str) -> Result<ExecutionResult, Fault> {
        match classify(text)? {
            ParsedToken::Return => {
                self.node.return_from_call()?;
                return Ok(ExecutionResult::Normal);
            }
            ParsedToken::Char(value) | ParsedToken::Literal(value) => {
                self.node.set_current_value(value);
            }
            ParsedToken::Pointer(index) => self.node.point_at(index)?,
            ParsedToken::Label(name) => {
                let here = self.node.current;
                self.node.labels.insert(name.to_string(), here);
            }
            ParsedToken::Word(name) => return self.execute_word(name),
        }
        self.instructions += 1;
        Ok(ExecutionResult::Normal)
    }

    fn execute_word(&mut self, name: &str) -> Result<ExecutionResult, Fault> {
        if let Some(&cell) = self.node.labels.get(name) {
            self.node.previous = self.node.current;
            self.node.current = cell;
            return Ok(ExecutionResult::Normal);
        }

        match self.dictionary.lookup(name) {
            Some(Entry::Primitive(primitive)) => {
                trace!("{}: {}", self.node.name, primitive.name());
                let mut ctx = PrimitiveContext {
                    node: &mut *self.node,
                    peers: &mut self.peers,
                    output: &mut *self.output,
                };
                let result = primitive.execute(&mut ctx)?;
                if result == ExecutionResult::Normal {
                    self.instructions += 1;
                }
                Ok(result)
            }
            Some(Entry::Node(id)) => {
                self.node.point_at(id.0)?;
                self.instructions += 1;
                Ok(ExecutionResult::Normal)
            }
            None => Err(Fault::UnknownWord(name.to_string())),
        }
    }
}

/// Gives `node` one turn. A paused node resumes at its resume mark, a
/// runnable one with input starts from the top. Anything else stays idle
/// and only has its cursor rewound.
pub fn tick(
    node: &mut Node,
    peers: Peers<'_>,
    dictionary: &Dictionary,
    output: &mut dyn Write,
) -> Tick {
    if !node.is_ready() {
        node.script.rewind();
        return Tick::IDLE;
    }

    node.script.offset = if node.is_paused() { node.resume_mark } else { 0 };
    node.state = NodeState::Runnable;

    let mut interpreter = Interpreter::new(node, peers, dictionary, output);
    let result = interpreter.run();
    let instructions = interpreter.instructions();

    let status = match result {
        Ok(ExecutionResult::Normal) => {
            node.script.rewind();
            TickStatus::Completed
        }
        Ok(ExecutionResult::Yield(reason)) => {
            node.script.offset = node.resume_mark;
            node.state = NodeState::Paused(reason);
            TickStatus::Blocked(reason)
        }
        Err(fault) => {
            warn!("{} ({}) faulted: {fault}", node.name, node.id);
            node.script.rewind();
            node.state = NodeState::Faulted(fault);
            TickStatus::Faulted
        }
    };

    Tick {
        instructions,
        status,
    }
}
