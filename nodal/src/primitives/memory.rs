use crate::{Cell, ExecutionResult, Fault, PrimitiveContext, Word};

pub fn copy(ctx: &mut PrimitiveContext) -> Result<ExecutionResult, Fault> {
    let value = ctx.node.previous_value();
    ctx.node.set_current_value(value);
    Ok(ExecutionResult::Normal)
}

pub fn self_id(ctx: &mut PrimitiveContext) -> Result<ExecutionResult, Fault> {
    let id = ctx.node.id.0;
    ctx.node.set_current_value(id);
    Ok(ExecutionResult::Normal)
}

/// `current = previous + memory[current]`, previous is left alone.
pub fn at(ctx: &mut PrimitiveContext) -> Result<ExecutionResult, Fault> {
    let base = ctx.node.previous.index() as Word;
    let offset = ctx.node.current_value();
    ctx.node.current = Cell::new(base.wrapping_add(offset))?;
    Ok(ExecutionResult::Normal)
}

/// Writes the low byte of `memory[current]`.
pub fn emit(ctx: &mut PrimitiveContext) -> Result<ExecutionResult, Fault> {
    let byte = ctx.node.current_value() as u8;
    ctx.output.write_all(&[byte])?;
    Ok(ExecutionResult::Normal)
}
