use std::{collections::HashMap, fmt, sync::Arc};

use crate::{Bounds, CELLS, Fault, Inbox, Lexer, Message, STACK, Word};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub Word);

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Why a node is waiting. Blocking is expected control flow, not a fault.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockReason {
    InboxFull(NodeId),
    InboxEmpty,
    /// Forced awake by a startup entry, not yet ticked.
    Seeded,
}

impl fmt::Display for BlockReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BlockReason::InboxFull(target) => write!(f, "waiting for room in {target}"),
            BlockReason::InboxEmpty => f.write_str("waiting for input"),
            BlockReason::Seeded => f.write_str("seeded, never ran"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeState {
    Runnable,
    Paused(BlockReason),
    Faulted(Fault),
}

/// Index into node memory, always inside `[0, CELLS)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Cell(usize);

impl Cell {
    pub fn new(index: Word) -> Result<Self, Fault> {
        usize::try_from(index)
            .ok()
            .filter(|&i| i < CELLS)
            .map(Cell)
            .ok_or(Fault::OutOfBounds(Bounds::Cell(index)))
    }

    #[inline]
    pub fn index(self) -> usize {
        self.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Flags {
    pub equal: bool,
    pub less: bool,
    pub greater: bool,
}

impl Flags {
    pub fn compare(left: Word, right: Word) -> Self {
        Self {
            equal: left == right,
            less: left < right,
            greater: left > right,
        }
    }
}

/// Fixed-depth stack of script offsets.
#[derive(Debug, Clone)]
pub struct CallStack {
    frames: [usize; STACK],
    depth: usize,
}

impl Default for CallStack {
    fn default() -> Self {
        Self::new()
    }
}

impl CallStack {
    pub fn new() -> Self {
        Self {
            frames: [0; STACK],
            depth: 0,
        }
    }

    #[inline]
    pub fn depth(&self) -> usize {
        self.depth
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.depth == 0
    }

    pub fn push(&mut self, offset: usize) -> Result<(), Fault> {
        if self.depth == STACK {
            return Err(Fault::StackOverflow);
        }
        self.frames[self.depth] = offset;
        self.depth += 1;
        Ok(())
    }

    pub fn pop(&mut self) -> Result<usize, Fault> {
        if self.depth == 0 {
            return Err(Fault::StackUnderflow);
        }
        self.depth -= 1;
        Ok(self.frames[self.depth])
    }

    /// Returns the active frames, oldest first.
    pub fn frames(&self) -> &[usize] {
        &self.frames[..self.depth]
    }
}

pub struct Node {
    pub id: NodeId,
    pub name: String,
    pub state: NodeState,
    pub memory: Box<[Word; CELLS]>,
    pub current: Cell,
    pub previous: Cell,
    pub call_stack: CallStack,
    pub flags: Flags,
    /// Owns the source text; its offset is the cursor.
    pub script: Lexer,
    pub resume_mark: usize,
    pub labels: HashMap<String, Cell>,
    pub inbox: Inbox,
    pub outbox: Option<Message>,
    pub last_received: Option<Message>,
}

impl Node {
    pub fn new(id: NodeId, name: impl Into<String>, source: &str) -> Self {
        Self {
            id,
            name: name.into(),
            state: NodeState::Runnable,
            memory: Box::new([0; CELLS]),
            current: Cell::default(),
            previous: Cell::default(),
            call_stack: CallStack::new(),
            flags: Flags::default(),
            script: Lexer::from_shared(Arc::from(source.as_bytes())),
            resume_mark: 0,
            labels: HashMap::new(),
            inbox: Inbox::new(),
            outbox: None,
            last_received: None,
        }
    }

    #[inline]
    pub fn cursor(&self) -> usize {
        self.script.offset
    }

    #[inline]
    pub fn source(&self) -> &[u8] {
        &self.script.code
    }

    #[inline]
    pub fn load(&self, cell: Cell) -> Word {
        self.memory[cell.index()]
    }

    #[inline]
    pub fn store(&mut self, cell: Cell, value: Word) {
        self.memory[cell.index()] = value;
    }

    #[inline]
    pub fn current_value(&self) -> Word {
        self.load(self.current)
    }

    #[inline]
    pub fn previous_value(&self) -> Word {
        self.load(self.previous)
    }

    #[inline]
    pub fn set_current_value(&mut self, value: Word) {
        self.store(self.current, value);
    }

    /// `previous = current; current = index`.
    pub fn point_at(&mut self, index: Word) -> Result<(), Fault> {
        let cell = Cell::new(index)?;
        self.previous = self.current;
        self.current = cell;
        Ok(())
    }

    /// Pops the call stack and continues at the saved offset.
    pub fn return_from_call(&mut self) -> Result<(), Fault> {
        let offset = self.call_stack.pop()?;
        self.script.offset = offset;
        Ok(())
    }

    pub fn is_paused(&self) -> bool {
        matches!(self.state, NodeState::Paused(_))
    }

    pub fn is_faulted(&self) -> bool {
        matches!(self.state, NodeState::Faulted(_))
    }

    /// Paused, or runnable with input waiting.
    pub fn is_ready(&self) -> bool {
        match self.state {
            NodeState::Paused(_) => true,
            NodeState::Runnable => !self.inbox.is_empty(),
            NodeState::Faulted(_) => false,
        }
    }

    pub fn fault_reason(&self) -> Option<String> {
        match &self.state {
            NodeState::Faulted(fault) => Some(fault.to_string()),
            _ => None,
        }
    }
}

impl fmt::Debug for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Node")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("state", &self.state)
            .field("current", &self.current)
            .field("previous", &self.previous)
            .field("cursor", &self.cursor())
            .field("call_depth", &self.call_stack.depth())
            .field("inbox", &self.inbox.len())
            .finish_non_exhaustive()
    }
}
