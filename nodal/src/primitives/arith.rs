use crate::{ArithmeticError, ExecutionResult, Fault, Flags, PrimitiveContext, Word};

type WordBinop = fn(left: Word, right: Word) -> Result<Word, ArithmeticError>;

/// `memory[current] = op(memory[previous], memory[current])`
fn word_binop(ctx: &mut PrimitiveContext<'_, '_>, op: WordBinop) -> Result<ExecutionResult, Fault> {
    let left = ctx.node.previous_value();
    let right = ctx.node.current_value();
    let result = op(left, right)?;
    ctx.node.set_current_value(result);
    Ok(ExecutionResult::Normal)
}

fn word_unop(
    ctx: &mut PrimitiveContext<'_, '_>,
    op: fn(Word) -> Word,
) -> Result<ExecutionResult, Fault> {
    let value = op(ctx.node.current_value());
    ctx.node.set_current_value(value);
    Ok(ExecutionResult::Normal)
}

fn shift_amount(amount: Word) -> Result<u32, ArithmeticError> {
    u32::try_from(amount)
        .ok()
        .filter(|&n| n < Word::BITS)
        .ok_or(ArithmeticError::ShiftOutOfRange(amount))
}

pub fn add(ctx: &mut PrimitiveContext) -> Result<ExecutionResult, Fault> {
    word_binop(ctx, |a, b| Ok(a.wrapping_add(b)))
}

pub fn sub(ctx: &mut PrimitiveContext) -> Result<ExecutionResult, Fault> {
    word_binop(ctx, |a, b| Ok(a.wrapping_sub(b)))
}

pub fn mul(ctx: &mut PrimitiveContext) -> Result<ExecutionResult, Fault> {
    word_binop(ctx, |a, b| Ok(a.wrapping_mul(b)))
}

pub fn div(ctx: &mut PrimitiveContext) -> Result<ExecutionResult, Fault> {
    word_binop(ctx, |a, b| {
        if b == 0 {
            return Err(ArithmeticError::DivisionByZero);
        }
        Ok(a.wrapping_div(b))
    })
}

pub fn modulo(ctx: &mut PrimitiveContext) -> Result<ExecutionResult, Fault> {
    word_binop(ctx, |a, b| {
        if b == 0 {
            return Err(ArithmeticError::DivisionByZero);
        }
        Ok(a.wrapping_rem(b))
    })
}

pub fn and(ctx: &mut PrimitiveContext) -> Result<ExecutionResult, Fault> {
    word_binop(ctx, |a, b| Ok(a & b))
}

pub fn or(ctx: &mut PrimitiveContext) -> Result<ExecutionResult, Fault> {
    word_binop(ctx, |a, b| Ok(a | b))
}

pub fn xor(ctx: &mut PrimitiveContext) -> Result<ExecutionResult, Fault> {
    word_binop(ctx, |a, b| Ok(a ^ b))
}

pub fn shl(ctx: &mut PrimitiveContext) -> Result<ExecutionResult, Fault> {
    word_binop(ctx, |a, b| Ok(a << shift_amount(b)?))
}

// arithmetic shift, the sign is kept
pub fn shr(ctx: &mut PrimitiveContext) -> Result<ExecutionResult, Fault> {
    word_binop(ctx, |a, b| Ok(a >> shift_amount(b)?))
}

pub fn inc(ctx: &mut PrimitiveContext) -> Result<ExecutionResult, Fault> {
    word_unop(ctx, |a| a.wrapping_add(1))
}

pub fn dec(ctx: &mut PrimitiveContext) -> Result<ExecutionResult, Fault> {
    word_unop(ctx, |a| a.wrapping_sub(1))
}

pub fn neg(ctx: &mut PrimitiveContext) -> Result<ExecutionResult, Fault> {
    word_unop(ctx, Word::wrapping_neg)
}

pub fn cmp(ctx: &mut PrimitiveContext) -> Result<ExecutionResult, Fault> {
    ctx.node.flags = Flags::compare(ctx.node.previous_value(), ctx.node.current_value());
    Ok(ExecutionResult::Normal)
}

#[cfg(test)]
mod tests {
    use crate::{
        ArithmeticError, Fault, Node, NodeId, Primitive, primitives::test_support::{binary, run},
    };

    fn eval(primitive: Primitive, left: i64, right: i64) -> Result<i64, Fault> {
        let mut node = binary(left, right);
        run(&mut node, primitive, &mut Vec::new())?;
        assert_eq!(node.memory[0], left, "left operand must not change");
        Ok(node.memory[1])
    }

    #[test]
    fn binops_take_previous_as_left() {
        assert_eq!(eval(Primitive::Add, 7, 3), Ok(10));
        assert_eq!(eval(Primitive::Sub, 7, 3), Ok(4));
        assert_eq!(eval(Primitive::Mul, 7, 3), Ok(21));
        assert_eq!(eval(Primitive::Div, 7, 3), Ok(2));
        assert_eq!(eval(Primitive::Mod, 7, 3), Ok(1));
        assert_eq!(eval(Primitive::And, 0b1100, 0b1010), Ok(0b1000));
        assert_eq!(eval(Primitive::Or, 0b1100, 0b1010), Ok(0b1110));
        assert_eq!(eval(Primitive::Xor, 0b1100, 0b1010), Ok(0b0110));
        assert_eq!(eval(Primitive::Shl, 1, 4), Ok(16));
        assert_eq!(eval(Primitive::Shr, -16, 2), Ok(-4));
    }

    #[test]
    fn arithmetic_wraps() {
        assert_eq!(eval(Primitive::Add, i64::MAX, 1), Ok(i64::MIN));
        assert_eq!(eval(Primitive::Sub, i64::MIN, 1), Ok(i64::MAX));
        assert_eq!(eval(Primitive::Div, i64::MIN, -1), Ok(i64::MIN));
        assert_eq!(eval(Primitive::Mod, i64::MIN, -1), Ok(0));
    }

    #[test]
    fn division_by_zero_faults() {
        let zero = Err(Fault::Arithmetic(ArithmeticError::DivisionByZero));
        assert_eq!(eval(Primitive::Div, 10, 0), zero);
        assert_eq!(eval(Primitive::Mod, 10, 0), zero);
    }

    #[test]
    fn shift_range_is_checked() {
        assert_eq!(
            eval(Primitive::Shl, 1, 64),
            Err(Fault::Arithmetic(ArithmeticError::ShiftOutOfRange(64)))
        );
        assert!(eval(Primitive::Shr, 1, -1).is_err());
        assert_eq!(eval(Primitive::Shl, 1, 63), Ok(i64::MIN));
    }

    #[test]
    fn unary_ops_work_in_place() {
        let mut node = Node::new(NodeId(1), "t", "");
        node.memory[0] = 5;
        let out = &mut Vec::new();
        run(&mut node, Primitive::Inc, out).unwrap();
        run(&mut node, Primitive::Inc, out).unwrap();
        run(&mut node, Primitive::Dec, out).unwrap();
        assert_eq!(node.memory[0], 6);
        run(&mut node, Primitive::Neg, out).unwrap();
        assert_eq!(node.memory[0], -6);
    }

    #[test]
    fn mixed_sequence_equals_wrapping_sum() {
        let ops: [(Primitive, i64); 7] = [
            (Primitive::Inc, 0),
            (Primitive::Add, i64::MAX),
            (Primitive::Dec, 0),
            (Primitive::Add, 7),
            (Primitive::Sub, 0),
            (Primitive::Add, i64::MIN),
            (Primitive::Inc, 0),
        ];
        // cell 0 holds the operand, cell 1 accumulates
        let mut node = binary(0, 0);
        let out = &mut Vec::new();
        let mut expected = 0i64;

        for (primitive, operand) in ops {
            node.memory[0] = operand;
            run(&mut node, primitive, out).unwrap();
            expected = match primitive {
                Primitive::Inc => expected.wrapping_add(1),
                Primitive::Dec => expected.wrapping_sub(1),
                Primitive::Add => operand.wrapping_add(expected),
                Primitive::Sub => operand.wrapping_sub(expected),
                _ => unreachable!(),
            };
            assert_eq!(node.memory[1], expected);
        }
    }

    #[test]
    fn cmp_sets_flags_from_previous_and_current() {
        let mut node = binary(1, 2);
        run(&mut node, Primitive::Cmp, &mut Vec::new()).unwrap();
        assert!(node.flags.less);
        assert!(!node.flags.equal);
        assert!(!node.flags.greater);
    }
}
