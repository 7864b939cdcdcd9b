//! Decoded machine instructions.
//!
//! This module holds [`SimInstr`], the tagged representation of one machine
//! word after dispatch. [`SimInstr::decode`] is the only place raw
//! instruction bits are inspected; every instruction semantic in the
//! simulator acts on an already-decoded value.

use crate::ast::{OperandSpec, Reg};
use crate::sim::SimErr;

/// A decoded machine instruction.
///
/// Two-operand instructions carry their source and destination specifiers in
/// that order. Branch offsets are stored sign-extended; the `2*offset` byte
/// displacement is applied by the simulator.
#[derive(Debug, PartialEq, Eq, Hash, Clone, Copy)]
pub enum SimInstr {
    /// `MOV src, dst`: copy the source operand to the destination.
    Mov(OperandSpec, OperandSpec),
    /// `CMP src, dst`: set condition codes from `src - dst`, writing nothing.
    Cmp(OperandSpec, OperandSpec),
    /// `ADD src, dst`: `dst <- dst + src`.
    Add(OperandSpec, OperandSpec),
    /// `SUB src, dst`: `dst <- dst - src`.
    Sub(OperandSpec, OperandSpec),
    /// `ASR dst`: arithmetic shift right by one, preserving the sign bit.
    Asr(OperandSpec),
    /// `ASL dst`: arithmetic shift left by one.
    Asl(OperandSpec),
    /// `BR offset`: unconditional branch.
    Br(i8),
    /// `BNE offset`: branch when Z = 0.
    Bne(i8),
    /// `BEQ offset`: branch when Z = 1.
    Beq(i8),
    /// `SOB reg, offset`: decrement the register and branch backwards
    /// while it is nonzero. The offset is an unsigned word displacement.
    Sob(Reg, u8),
    /// `HALT`: stop the fetch loop cleanly.
    Halt,
}

impl SimInstr {
    /// Decodes a 16-bit instruction word, matching the longest opcode
    /// prefix first.
    ///
    /// The precedence is: the 16-bit HALT, the 10-bit shifts, the 8-bit
    /// branches, the 7-bit SOB, and finally the 4-bit two-operand opcodes.
    /// A word matching none of these raises [`SimErr::IllegalOpcode`].
    pub fn decode(word: u16) -> Result<Self, SimErr> {
        if word == 0 {
            return Ok(SimInstr::Halt);
        }

        match word >> 6 {
            0o0062 => return Ok(SimInstr::Asr(OperandSpec::from_bits(word))),
            0o0063 => return Ok(SimInstr::Asl(OperandSpec::from_bits(word))),
            _ => {}
        }

        // The branch offset occupies the low byte, signed.
        let b_off = word as u8 as i8;
        match word >> 8 {
            0o001 => return Ok(SimInstr::Br(b_off)),
            0o002 => return Ok(SimInstr::Bne(b_off)),
            0o003 => return Ok(SimInstr::Beq(b_off)),
            _ => {}
        }

        if word >> 9 == 0o077 {
            let reg = Reg::try_from((word >> 6) & 0o7)
                .unwrap_or_else(|_| unreachable!("register fits in 3 bits"));
            return Ok(SimInstr::Sob(reg, (word & 0o77) as u8));
        }

        let src = OperandSpec::from_bits(word >> 6);
        let dst = OperandSpec::from_bits(word);
        match word >> 12 {
            0o01 => Ok(SimInstr::Mov(src, dst)),
            0o02 => Ok(SimInstr::Cmp(src, dst)),
            0o06 => Ok(SimInstr::Add(src, dst)),
            0o16 => Ok(SimInstr::Sub(src, dst)),
            _ => Err(SimErr::IllegalOpcode(word)),
        }
    }

    /// The lowercase mnemonic for this instruction, as it appears in traces.
    pub fn mnemonic(&self) -> &'static str {
        match self {
            SimInstr::Mov(..) => "mov",
            SimInstr::Cmp(..) => "cmp",
            SimInstr::Add(..) => "add",
            SimInstr::Sub(..) => "sub",
            SimInstr::Asr(..) => "asr",
            SimInstr::Asl(..) => "asl",
            SimInstr::Br(..)  => "br",
            SimInstr::Bne(..) => "bne",
            SimInstr::Beq(..) => "beq",
            SimInstr::Sob(..) => "sob",
            SimInstr::Halt    => "halt",
        }
    }
}
