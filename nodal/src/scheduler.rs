use log::{debug, info};

use crate::{NodeId, NodeState, Runtime};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SchedulerConfig {
    /// Stop the whole run as soon as any node has faulted.
    pub halt_on_fault: bool,
    /// Upper bound on rounds, `None` runs until the stop rule fires.
    pub max_rounds: Option<u64>,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            halt_on_fault: true,
            max_rounds: None,
        }
    }
}

/// Totals observed at the end of one round.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RoundStats {
    pub instructions: u64,
    /// Messages queued in the inboxes of nodes that can still run.
    pub pending_inputs: usize,
    pub paused: usize,
    pub faulted: usize,
}

impl RoundStats {
    pub fn is_quiescent(&self) -> bool {
        self.pending_inputs == 0 && self.paused == 0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// No input pending and nobody paused.
    Quiescent,
    /// A full round executed nothing.
    Stalled,
    Faulted,
    RoundLimit,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeReport {
    pub id: NodeId,
    pub name: String,
    pub state: NodeState,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunReport {
    pub rounds: u64,
    pub instructions: u64,
    pub stop: StopReason,
    pub nodes: Vec<NodeReport>,
}

impl RunReport {
    /// A run succeeds only if no node faulted.
    pub fn success(&self) -> bool {
        self.faulted().next().is_none()
    }

    pub fn faulted(&self) -> impl Iterator<Item = &NodeReport> {
        self.nodes
            .iter()
            .filter(|n| matches!(n.state, NodeState::Faulted(_)))
    }

    pub fn paused(&self) -> impl Iterator<Item = &NodeReport> {
        self.nodes
            .iter()
            .filter(|n| matches!(n.state, NodeState::Paused(_)))
    }
}

/// Round-robin driver: each round ticks every node once in load order.
pub struct Scheduler {
    config: SchedulerConfig,
    rounds: u64,
    instructions: u64,
}

impl Scheduler {
    pub fn new(config: SchedulerConfig) -> Self {
        Self {
            config,
            rounds: 0,
            instructions: 0,
        }
    }

    pub fn rounds(&self) -> u64 {
        self.rounds
    }

    pub fn round(&mut self, runtime: &mut Runtime) -> RoundStats {
        let mut stats = RoundStats::default();
        for index in 0..runtime.len() {
            stats.instructions += runtime.tick_node(index).instructions;
        }

        for node in runtime.nodes() {
            match node.state {
                NodeState::Faulted(_) => stats.faulted += 1,
                NodeState::Paused(_) => {
                    stats.paused += 1;
                    stats.pending_inputs += node.inbox.len();
                }
                NodeState::Runnable => stats.pending_inputs += node.inbox.len(),
            }
        }

        self.rounds += 1;
        self.instructions += stats.instructions;
        debug!("round {}: {stats:?}", self.rounds);
        stats
    }

    pub fn run(&mut self, runtime: &mut Runtime) -> RunReport {
        let stop = loop {
            if self.config.max_rounds.is_some_and(|max| self.rounds >= max) {
                break StopReason::RoundLimit;
            }
            let stats = self.round(runtime);
            if self.config.halt_on_fault && stats.faulted > 0 {
                break StopReason::Faulted;
            }
            if stats.is_quiescent() {
                break StopReason::Quiescent;
            }
            if stats.instructions == 0 {
                break StopReason::Stalled;
            }
        };
        info!(
            "stopped after {} rounds, {} instructions: {stop:?}",
            self.rounds, self.instructions
        );

        RunReport {
            rounds: self.rounds,
            instructions: self.instructions,
            stop,
            nodes: runtime
                .nodes()
                .iter()
                .map(|node| NodeReport {
                    id: node.id,
                    name: node.name.clone(),
                    state: node.state.clone(),
                })
                .collect(),
        }
    }
}
