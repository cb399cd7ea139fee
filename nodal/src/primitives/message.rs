use log::debug;

use crate::{BlockReason, ExecutionResult, Fault, Message, NodeId, PrimitiveContext, Word};

/// Starts a fresh outbox message of `memory[current]` zeroed words.
pub fn msg(ctx: &mut PrimitiveContext) -> Result<ExecutionResult, Fault> {
    let length = ctx.node.current_value();
    ctx.node.outbox = Some(Message::new(length)?);
    Ok(ExecutionResult::Normal)
}

/// `outbox[memory[current]] = memory[previous]`
pub fn set(ctx: &mut PrimitiveContext) -> Result<ExecutionResult, Fault> {
    let index = ctx.node.current_value();
    let value = ctx.node.previous_value();
    let outbox = ctx.node.outbox.as_mut().ok_or(Fault::NoMessage)?;
    outbox.set(index, value)?;
    Ok(ExecutionResult::Normal)
}

/// `memory[current] = last_received[memory[previous]]`
pub fn get(ctx: &mut PrimitiveContext) -> Result<ExecutionResult, Fault> {
    let index = ctx.node.previous_value();
    let received =
        ctx.node.last_received.as_ref().ok_or(Fault::NothingReceived)?;
    let value = received.get(index)?;
    ctx.node.set_current_value(value);
    Ok(ExecutionResult::Normal)
}

/// Moves the outbox into the inbox of node `current`. Yields, keeping the
/// outbox, while that inbox is full.
pub fn send(ctx: &mut PrimitiveContext) -> Result<ExecutionResult, Fault> {
    let target = NodeId(ctx.node.current.index() as Word);
    let from = ctx.node.id;

    if target != from && !ctx.peers.contains(target) {
        return Err(Fault::UnknownNode(target.0));
    }
    let message = ctx.node.outbox.take().ok_or(Fault::NoMessage)?;
    let length = message.header();

    let inbox = if target == from {
        &mut ctx.node.inbox
    } else {
        match ctx.peers.get_mut(target) {
            Some(peer) => &mut peer.inbox,
            None => return Err(Fault::UnknownNode(target.0)),
        }
    };

    match inbox.push(message) {
        Ok(()) => {
            debug!("{from} => {target} ({length})");
            Ok(ExecutionResult::Normal)
        }
        Err(message) => {
            ctx.node.outbox = Some(message);
            Ok(ExecutionResult::Yield(BlockReason::InboxFull(target)))
        }
    }
}

/// Dequeues the oldest inbox message and stores its length in
/// `memory[current]`. Yields while the inbox is empty.
pub fn read(ctx: &mut PrimitiveContext) -> Result<ExecutionResult, Fault> {
    let Some(message) = ctx.node.inbox.pop() else {
        return Ok(ExecutionResult::Yield(BlockReason::InboxEmpty));
    };
    debug!("{} <= ({})", ctx.node.id, message.header());
    ctx.node.set_current_value(message.header());
    ctx.node.last_received = Some(message);
    Ok(ExecutionResult::Normal)
}

#[cfg(test)]
mod tests {
    use crate::{
        BlockReason, Bounds, ExecutionResult, Fault, Message, Node, NodeId, Peers, Primitive,
        PrimitiveContext, QUEUE, primitives::test_support::{binary, run},
    };

    fn run_with(
        nodes: &mut [Node],
        index: usize,
        primitive: Primitive,
    ) -> Result<ExecutionResult, Fault> {
        let (node, mut peers) = Peers::split(nodes, index).unwrap();
        let mut output = Vec::new();
        let mut ctx = PrimitiveContext {
            node,
            peers: &mut peers,
            output: &mut output,
        };
        primitive.execute(&mut ctx)
    }

    #[test]
    fn msg_then_set_fills_payload() {
        // cell 0 = value, cell 1 = index, length comes from cell 1 first
        let mut node = binary(0, 3);
        run(&mut node, Primitive::Msg, &mut Vec::new()).unwrap();
        node.memory[0] = 77;
        node.memory[1] = 2;
        run(&mut node, Primitive::Set, &mut Vec::new()).unwrap();

        let outbox = node.outbox.as_ref().unwrap();
        assert_eq!(outbox.header(), 3);
        assert_eq!(outbox.payload(), &[0, 0, 77]);

        node.memory[1] = 3;
        assert_eq!(
            run(&mut node, Primitive::Set, &mut Vec::new()),
            Err(Fault::OutOfBounds(Bounds::Message {
                index: 3,
                length: 3
            }))
        );
    }

    #[test]
    fn set_without_outbox_faults() {
        let mut node = binary(1, 0);
        assert_eq!(
            run(&mut node, Primitive::Set, &mut Vec::new()),
            Err(Fault::NoMessage)
        );
    }

    #[test]
    fn read_then_get() {
        let mut node = binary(1, 0);
        node.inbox.push(Message::from_payload(&[10, 20])).unwrap();
        run(&mut node, Primitive::Read, &mut Vec::new()).unwrap();
        assert_eq!(node.memory[1], 2);

        node.memory[0] = 1;
        run(&mut node, Primitive::Get, &mut Vec::new()).unwrap();
        assert_eq!(node.memory[1], 20);
    }

    #[test]
    fn get_before_read_faults() {
        let mut node = binary(0, 0);
        assert_eq!(
            run(&mut node, Primitive::Get, &mut Vec::new()),
            Err(Fault::NothingReceived)
        );
    }

    #[test]
    fn read_on_empty_inbox_yields() {
        let mut node = binary(0, 0);
        assert_eq!(
            run(&mut node, Primitive::Read, &mut Vec::new()),
            Ok(ExecutionResult::Yield(BlockReason::InboxEmpty))
        );
        assert_eq!(node.memory[1], 0);
    }

    #[test]
    fn read_is_fifo() {
        let mut node = binary(0, 0);
        node.inbox.push(Message::from_payload(&[1])).unwrap();
        node.inbox.push(Message::from_payload(&[2, 2])).unwrap();
        run(&mut node, Primitive::Read, &mut Vec::new()).unwrap();
        assert_eq!(node.last_received.as_ref().unwrap().payload(), &[1]);
    }

    #[test]
    fn send_moves_outbox_to_peer() {
        let mut nodes = vec![
            Node::new(NodeId(1), "a", ""),
            Node::new(NodeId(2), "b", ""),
        ];
        nodes[0].outbox = Some(Message::from_payload(&[5]));
        nodes[0].point_at(2).unwrap();

        assert_eq!(
            run_with(&mut nodes, 0, Primitive::Send),
            Ok(ExecutionResult::Normal)
        );
        assert!(nodes[0].outbox.is_none());
        assert_eq!(nodes[1].inbox.len(), 1);
    }

    #[test]
    fn send_to_self() {
        let mut nodes = vec![Node::new(NodeId(1), "a", "")];
        nodes[0].outbox = Some(Message::from_payload(&[5]));
        nodes[0].point_at(1).unwrap();
        run_with(&mut nodes, 0, Primitive::Send).unwrap();
        assert_eq!(nodes[0].inbox.len(), 1);
    }

    #[test]
    fn send_to_full_inbox_keeps_outbox() {
        let mut nodes = vec![
            Node::new(NodeId(1), "a", ""),
            Node::new(NodeId(2), "b", ""),
        ];
        for _ in 0..QUEUE {
            nodes[1].inbox.push(Message::from_payload(&[0])).unwrap();
        }
        nodes[0].outbox = Some(Message::from_payload(&[9, 9]));
        nodes[0].point_at(2).unwrap();

        assert_eq!(
            run_with(&mut nodes, 0, Primitive::Send),
            Ok(ExecutionResult::Yield(BlockReason::InboxFull(NodeId(2))))
        );
        assert_eq!(
            nodes[0].outbox.as_ref().map(Message::payload),
            Some(&[9, 9][..])
        );
        assert_eq!(nodes[1].inbox.len(), QUEUE);
    }

    #[test]
    fn send_errors() {
        let mut nodes = vec![Node::new(NodeId(1), "a", "")];
        nodes[0].point_at(1).unwrap();
        assert_eq!(
            run_with(&mut nodes, 0, Primitive::Send),
            Err(Fault::NoMessage)
        );

        nodes[0].outbox = Some(Message::from_payload(&[]));
        nodes[0].point_at(42).unwrap();
        assert_eq!(
            run_with(&mut nodes, 0, Primitive::Send),
            Err(Fault::UnknownNode(42))
        );
        assert!(nodes[0].outbox.is_some());
    }
}
