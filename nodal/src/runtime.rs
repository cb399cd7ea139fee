use std::io::{self, Write};

use log::{debug, info};

use crate::{
    BlockReason, Dictionary, Entry, LoadError, Node, NodeId, NodeState, Peers, RuntimeError, Tick,
    Word, interpreter, lexer::find_unbalanced,
};

/// Everything a run needs: the nodes in load order, the word table and the
/// byte sink that `emit` writes to.
pub struct Runtime {
    dictionary: Dictionary,
    nodes: Vec<Node>,
    output: Box<dyn Write>,
}

impl Runtime {
    pub fn new(output: impl Write + 'static) -> Self {
        Self {
            dictionary: Dictionary::with_primitives(),
            nodes: Vec::new(),
            output: Box::new(output),
        }
    }

    /// Registers a node under `name`. Ids are handed out in call order,
    /// starting at 1.
    pub fn add_node(&mut self, name: &str, source: &str) -> Result<NodeId, LoadError> {
        match self.dictionary.lookup(name) {
            Some(Entry::Primitive(_)) => {
                return Err(LoadError::ReservedName(name.to_string()));
            }
            Some(Entry::Node(_)) => {
                return Err(LoadError::DuplicateName(name.to_string()));
            }
            None => {}
        }
        if let Some((open, offset)) = find_unbalanced(source.as_bytes()) {
            return Err(LoadError::Unbalanced {
                node: name.to_string(),
                open,
                offset,
            });
        }

        let id = NodeId(self.nodes.len() as Word + 1);
        self.nodes.push(Node::new(id, name, source));
        self.dictionary.register(name, Entry::Node(id));
        info!("loaded {name} as {id} ({} bytes)", source.len());
        Ok(id)
    }

    /// Forces the named node awake and gives it one tick.
    pub fn seed(&mut self, name: &str) -> Result<Tick, RuntimeError> {
        let index = self
            .nodes
            .iter()
            .position(|node| node.name == name)
            .ok_or_else(|| RuntimeError::UnknownEntry(name.to_string()))?;

        let node = &mut self.nodes[index];
        if node.is_faulted() {
            return Ok(Tick::IDLE);
        }
        if !node.is_paused() {
            node.resume_mark = 0;
        }
        node.state = NodeState::Paused(BlockReason::Seeded);
        debug!("seeding {name} ({})", node.id);
        Ok(self.tick_node(index))
    }

    /// Ticks the node at `index` in load order.
    pub fn tick_node(&mut self, index: usize) -> Tick {
        let Some((node, peers)) = Peers::split(&mut self.nodes, index) else {
            return Tick::IDLE;
        };
        interpreter::tick(node, peers, &self.dictionary, &mut *self.output)
    }

    #[inline]
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn node(&self, id: NodeId) -> Option<&Node> {
        let index = usize::try_from(id.0).ok()?.checked_sub(1)?;
        self.nodes.get(index)
    }

    pub fn node_by_name(&self, name: &str) -> Option<&Node> {
        match self.dictionary.lookup(name)? {
            Entry::Node(id) => self.node(id),
            Entry::Primitive(_) => None,
        }
    }

    pub fn dictionary(&self) -> &Dictionary {
        &self.dictionary
    }

    pub fn flush(&mut self) -> io::Result<()> {
        self.output.flush()
    }
}
