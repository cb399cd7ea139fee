use crate::{ExecutionResult, Fault, PrimitiveContext};

fn jump_if(ctx: &mut PrimitiveContext<'_, '_>, taken: bool) -> Result<ExecutionResult, Fault> {
    if taken {
        let target = ctx.node.current_value();
        ctx.node.script.seek(target)?;
    }
    Ok(ExecutionResult::Normal)
}

// an empty call stack faults even when the branch is not taken
fn return_if(ctx: &mut PrimitiveContext<'_, '_>, taken: bool) -> Result<ExecutionResult, Fault> {
    if ctx.node.call_stack.is_empty() {
        return Err(Fault::StackUnderflow);
    }
    if taken {
        ctx.node.return_from_call()?;
    }
    Ok(ExecutionResult::Normal)
}

/// Pushes the offset after `call` and continues at `memory[current]`.
pub fn call(ctx: &mut PrimitiveContext) -> Result<ExecutionResult, Fault> {
    let target = ctx.node.current_value();
    let back = ctx.node.cursor();
    ctx.node.call_stack.push(back)?;
    ctx.node.script.seek(target)?;
    Ok(ExecutionResult::Normal)
}

pub fn jump(ctx: &mut PrimitiveContext) -> Result<ExecutionResult, Fault> {
    jump_if(ctx, true)
}

pub fn je(ctx: &mut PrimitiveContext) -> Result<ExecutionResult, Fault> {
    let taken = ctx.node.flags.equal;
    jump_if(ctx, taken)
}

pub fn jn(ctx: &mut PrimitiveContext) -> Result<ExecutionResult, Fault> {
    let taken = !ctx.node.flags.equal;
    jump_if(ctx, taken)
}

pub fn jl(ctx: &mut PrimitiveContext) -> Result<ExecutionResult, Fault> {
    let taken = ctx.node.flags.less;
    jump_if(ctx, taken)
}

pub fn jg(ctx: &mut PrimitiveContext) -> Result<ExecutionResult, Fault> {
    let taken = ctx.node.flags.greater;
    jump_if(ctx, taken)
}

pub fn re(ctx: &mut PrimitiveContext) -> Result<ExecutionResult, Fault> {
    let taken = ctx.node.flags.equal;
    return_if(ctx, taken)
}

pub fn rn(ctx: &mut PrimitiveContext) -> Result<ExecutionResult, Fault> {
    let taken = !ctx.node.flags.equal;
    return_if(ctx, taken)
}

pub fn rl(ctx: &mut PrimitiveContext) -> Result<ExecutionResult, Fault> {
    let taken = ctx.node.flags.less;
    return_if(ctx, taken)
}

pub fn rg(ctx: &mut PrimitiveContext) -> Result<ExecutionResult, Fault> {
    let taken = ctx.node.flags.greater;
    return_if(ctx, taken)
}
