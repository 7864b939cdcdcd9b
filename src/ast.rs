//! Components relating to the decoded representation of PDP-11 machine words.
//!
//! These components together are used to construct
//! [`sim::SimInstr`] (a data structure holding a decoded machine instruction),
//! which the simulator executes without reinspecting raw bits.

pub mod sim;

/// A register. Must be between 0 and 7.
///
/// This `Reg` struct can either be constructed by selecting a register from
/// [`reg_consts`], or by using [`Reg::try_from`].
///
/// `R7` doubles as the program counter; `R6` is conventionally the stack
/// pointer, but the simulator gives it no special treatment.
#[derive(Debug, PartialEq, Eq, Hash, Clone, Copy)]
pub struct Reg(pub(crate) u8);

/// Register constants!
pub mod reg_consts {
    use super::Reg;

    /// The 0th register in the register file.
    pub const R0: Reg = Reg(0);
    /// The 1st register in the register file.
    pub const R1: Reg = Reg(1);
    /// The 2nd register in the register file.
    pub const R2: Reg = Reg(2);
    /// The 3rd register in the register file.
    pub const R3: Reg = Reg(3);
    /// The 4th register in the register file.
    pub const R4: Reg = Reg(4);
    /// The 5th register in the register file.
    pub const R5: Reg = Reg(5);
    /// The 6th register in the register file (conventionally the stack pointer).
    pub const R6: Reg = Reg(6);
    /// The 7th register in the register file (the program counter).
    pub const R7: Reg = Reg(7);
}
impl Reg {
    /// Gets the register number of this [`Reg`]. This is always between 0 and 7.
    pub fn reg_no(self) -> u8 {
        self.0
    }
}
impl std::fmt::Display for Reg {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "R{}", self.0)
    }
}
impl From<Reg> for usize {
    // Used for indexing the reg file in [`sim::mem::RegFile`].
    fn from(value: Reg) -> Self {
        usize::from(value.0)
    }
}
impl TryFrom<u16> for Reg {
    type Error = FieldOutOfRange;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        match value {
            0..=7 => Ok(Reg(value as u8)),
            _     => Err(FieldOutOfRange(value)),
        }
    }
}

/// One of the eight PDP-11 addressing modes.
///
/// The variants correspond to mode numbers 0 through 7 of the
/// mode field in an operand specifier. Resolution of a mode into an
/// operand value (with its auto-increment/decrement and PC side effects)
/// is performed by the simulator, not here.
#[derive(Debug, PartialEq, Eq, Hash, Clone, Copy)]
pub enum AddrMode {
    /// Mode 0: the operand is the register itself.
    Register,
    /// Mode 1: the register holds the operand's address.
    RegisterDeferred,
    /// Mode 2: like mode 1, then the register is incremented by 2.
    /// With `R7`, the operand is the next instruction word (immediate).
    AutoIncrement,
    /// Mode 3: the register points at the operand's address, then the
    /// register is incremented by 2. With `R7`, the next instruction word
    /// is the operand's address (absolute).
    AutoIncrementDeferred,
    /// Mode 4: the register is decremented by 2, then holds the operand's
    /// address.
    AutoDecrement,
    /// Mode 5: the register is decremented by 2, then points at the
    /// operand's address.
    AutoDecrementDeferred,
    /// Mode 6: the next instruction word plus the register is the operand's
    /// address. With `R7`, this is PC-relative addressing.
    Index,
    /// Mode 7: the next instruction word plus the register points at the
    /// operand's address.
    IndexDeferred,
}
impl AddrMode {
    /// Gets the mode number of this [`AddrMode`]. This is always between 0 and 7.
    pub fn mode_no(self) -> u8 {
        match self {
            AddrMode::Register              => 0,
            AddrMode::RegisterDeferred      => 1,
            AddrMode::AutoIncrement         => 2,
            AddrMode::AutoIncrementDeferred => 3,
            AddrMode::AutoDecrement         => 4,
            AddrMode::AutoDecrementDeferred => 5,
            AddrMode::Index                 => 6,
            AddrMode::IndexDeferred         => 7,
        }
    }
}
impl TryFrom<u16> for AddrMode {
    type Error = FieldOutOfRange;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(AddrMode::Register),
            1 => Ok(AddrMode::RegisterDeferred),
            2 => Ok(AddrMode::AutoIncrement),
            3 => Ok(AddrMode::AutoIncrementDeferred),
            4 => Ok(AddrMode::AutoDecrement),
            5 => Ok(AddrMode::AutoDecrementDeferred),
            6 => Ok(AddrMode::Index),
            7 => Ok(AddrMode::IndexDeferred),
            _ => Err(FieldOutOfRange(value)),
        }
    }
}

/// Error raised when a mode or register field does not fit in 3 bits.
///
/// The decoder always masks fields to their bit widths, so this cannot occur
/// during normal decoding; it exists so out-of-range values handed in from
/// elsewhere are rejected rather than wrapped.
#[derive(Debug, PartialEq, Eq, Hash, Clone, Copy)]
pub struct FieldOutOfRange(pub u16);

impl std::fmt::Display for FieldOutOfRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "value {} does not fit a 3-bit operand field", self.0)
    }
}
impl std::error::Error for FieldOutOfRange {}

/// A 6-bit operand specifier: an addressing mode paired with a register.
///
/// Two-operand instructions carry two of these (source then destination);
/// the shifts carry one. The specifier says *how* to find the operand;
/// the simulator's operand resolver turns it into a concrete location.
#[derive(Debug, PartialEq, Eq, Hash, Clone, Copy)]
pub struct OperandSpec {
    /// The addressing mode (bits 3-5 of the field).
    pub mode: AddrMode,
    /// The register (bits 0-2 of the field).
    pub reg: Reg,
}
impl OperandSpec {
    /// Builds an operand specifier from the low 6 bits of the given field.
    ///
    /// Bits above the low 6 are ignored, so this cannot fail.
    pub fn from_bits(field: u16) -> Self {
        let mode = AddrMode::try_from((field >> 3) & 0o7)
            .unwrap_or_else(|_| unreachable!("mode fits in 3 bits"));
        let reg = Reg::try_from(field & 0o7)
            .unwrap_or_else(|_| unreachable!("register fits in 3 bits"));
        OperandSpec { mode, reg }
    }
}
