use std::io::Write;

use crate::{BlockReason, Fault, Node, Peers};

mod arith;
mod control;
mod memory;
mod message;

/// What a primitive asks of the interpreter loop once it returns.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ExecutionResult {
    Normal,
    Yield(BlockReason),
}

pub type PrimitiveFunction = fn(&mut PrimitiveContext<'_, '_>) -> Result<ExecutionResult, Fault>;

pub struct PrimitiveContext<'ex, 'n> {
    pub node: &'ex mut Node,
    pub peers: &'ex mut Peers<'n>,
    pub output: &'ex mut dyn Write,
}

/// The closed set of built-in words. Discriminants index [`PRIMITIVES`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Primitive {
    Add,
    Inc,
    Sub,
    Dec,
    Mul,
    Div,
    Mod,
    Emit,
    Copy,
    At,
    Cmp,
    Neg,
    Or,
    And,
    Xor,
    Shl,
    Shr,
    Read,
    Send,
    Msg,
    Set,
    Get,
    SelfId,
    Call,
    Jump,
    Je,
    Jn,
    Jl,
    Jg,
    Re,
    Rn,
    Rl,
    Rg,
}

#[derive(Debug, Copy, Clone)]
pub struct PrimitiveDesc {
    pub name: &'static str,
    pub primitive: Primitive,
    pub func: PrimitiveFunction,
}

impl PrimitiveDesc {
    pub const fn new(name: &'static str, primitive: Primitive, func: PrimitiveFunction) -> Self {
        Self {
            name,
            primitive,
            func,
        }
    }
}

pub const PRIMITIVES: &[PrimitiveDesc] = &[
    PrimitiveDesc::new("add", Primitive::Add, arith::add),
    PrimitiveDesc::new("inc", Primitive::Inc, arith::inc),
    PrimitiveDesc::new("sub", Primitive::Sub, arith::sub),
    PrimitiveDesc::new("dec", Primitive::Dec, arith::dec),
    PrimitiveDesc::new("mul", Primitive::Mul, arith::mul),
    PrimitiveDesc::new("div", Primitive::Div, arith::div),
    PrimitiveDesc::new("mod", Primitive::Mod, arith::modulo),
    PrimitiveDesc::new("emit", Primitive::Emit, memory::emit),
    PrimitiveDesc::new("copy", Primitive::Copy, memory::copy),
    PrimitiveDesc::new("at", Primitive::At, memory::at),
    PrimitiveDesc::new("cmp", Primitive::Cmp, arith::cmp),
    PrimitiveDesc::new("neg", Primitive::Neg, arith::neg),
    PrimitiveDesc::new("or", Primitive::Or, arith::or),
    PrimitiveDesc::new("and", Primitive::And, arith::and),
    PrimitiveDesc::new("xor", Primitive::Xor, arith::xor),
    PrimitiveDesc::new("shl", Primitive::Shl, arith::shl),
    PrimitiveDesc::new("shr", Primitive::Shr, arith::shr),
    PrimitiveDesc::new("read", Primitive::Read, message::read),
    PrimitiveDesc::new("send", Primitive::Send, message::send),
    PrimitiveDesc::new("msg", Primitive::Msg, message::msg),
    PrimitiveDesc::new("set", Primitive::Set, message::set),
    PrimitiveDesc::new("get", Primitive::Get, message::get),
    PrimitiveDesc::new("self", Primitive::SelfId, memory::self_id),
    PrimitiveDesc::new("call", Primitive::Call, control::call),
    PrimitiveDesc::new("jump", Primitive::Jump, control::jump),
    PrimitiveDesc::new("je", Primitive::Je, control::je),
    PrimitiveDesc::new("jn", Primitive::Jn, control::jn),
    PrimitiveDesc::new("jl", Primitive::Jl, control::jl),
    PrimitiveDesc::new("jg", Primitive::Jg, control::jg),
    PrimitiveDesc::new("re", Primitive::Re, control::re),
    PrimitiveDesc::new("rn", Primitive::Rn, control::rn),
    PrimitiveDesc::new("rl", Primitive::Rl, control::rl),
    PrimitiveDesc::new("rg", Primitive::Rg, control::rg),
];

impl Primitive {
    #[inline]
    pub fn desc(self) -> &'static PrimitiveDesc {
        debug_assert!((self as usize) < PRIMITIVES.len());
        &PRIMITIVES[self as usize]
    }

    #[inline]
    pub fn name(self) -> &'static str {
        self.desc().name
    }

    pub fn execute(self, ctx: &mut PrimitiveContext<'_, '_>) -> Result<ExecutionResult, Fault> {
        (self.desc().func)(ctx)
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_matches_discriminants() {
        for (index, desc) in PRIMITIVES.iter().enumerate() {
            assert_eq!(desc.primitive as usize, index, "{}", desc.name);
            assert_eq!(desc.primitive.name(), desc.name);
        }
        assert_eq!(PRIMITIVES.len(), 33);
    }

    #[test]
    fn names_are_unique() {
        let mut names: Vec<_> = PRIMITIVES.iter().map(|d| d.name).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), PRIMITIVES.len());
    }
}
