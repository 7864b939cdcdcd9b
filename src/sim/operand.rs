//! Operand resolution.
//!
//! Resolving a 6-bit operand specifier applies the addressing mode's side
//! effects (auto-increment/decrement, consuming index and immediate words
//! from the instruction stream) and yields an [`Operand`]: a concrete
//! location that can then be read or written. Reading and writing are
//! separate operations on the same resolved location, so a
//! read-modify-write instruction stores back to exactly the place it read,
//! even when resolution moved a register along the way.
//!
//! Every memory reference is counted at the point it happens, and data
//! references are presented to the attached cache model. Words consumed
//! from the instruction stream (immediates, absolute and index words)
//! count as instruction fetches, not data reads.

use crate::ast::reg_consts::R7;
use crate::ast::{AddrMode, OperandSpec, Reg};

use super::{SimErr, Simulator};

/// A resolved operand location.
#[derive(Debug, PartialEq, Eq, Hash, Clone, Copy)]
pub enum Operand {
    /// The operand is the register itself.
    Reg(Reg),
    /// The operand is the word at this byte address.
    Mem(u16),
    /// The operand is the word at this byte address, which was consumed
    /// from the instruction stream (an immediate). Its fetch was already
    /// accounted during resolution; writing to it is an ordinary data
    /// write into the program text.
    Fetched(u16),
}

impl Simulator {
    /// Resolves an operand specifier into a location, applying the
    /// addressing mode's side effects.
    ///
    /// Auto-increment and auto-decrement move their register by 2 here;
    /// index and deferred modes chase their pointer word here. Source
    /// operands must therefore be resolved before destination operands,
    /// as the machine does.
    pub fn resolve_operand(&mut self, spec: OperandSpec) -> Result<Operand, SimErr> {
        let OperandSpec { mode, reg } = spec;
        match mode {
            AddrMode::Register => Ok(Operand::Reg(reg)),
            AddrMode::RegisterDeferred => Ok(Operand::Mem(self.reg_file[reg])),
            AddrMode::AutoIncrement => {
                let addr = self.reg_file[reg];
                self.reg_file[reg] = addr.wrapping_add(2);
                match reg == R7 {
                    // the word at the old PC is an immediate, consumed
                    // from the instruction stream
                    true => {
                        self.stats.inst_fetches += 1;
                        Ok(Operand::Fetched(addr))
                    }
                    false => Ok(Operand::Mem(addr)),
                }
            }
            AddrMode::AutoIncrementDeferred => {
                let ptr = self.reg_file[reg];
                self.reg_file[reg] = ptr.wrapping_add(2);
                let addr = match reg == R7 {
                    // absolute: the pointer word is part of the instruction
                    true => {
                        self.stats.inst_fetches += 1;
                        self.mem.read_word(ptr)?
                    }
                    false => self.data_read(ptr)?,
                };
                Ok(Operand::Mem(addr))
            }
            AddrMode::AutoDecrement => {
                let addr = self.reg_file[reg].wrapping_sub(2);
                self.reg_file[reg] = addr;
                Ok(Operand::Mem(addr))
            }
            AddrMode::AutoDecrementDeferred => {
                let ptr = self.reg_file[reg].wrapping_sub(2);
                self.reg_file[reg] = ptr;
                Ok(Operand::Mem(self.data_read(ptr)?))
            }
            AddrMode::Index => {
                // For R7 the base is the PC after this fetch: PC-relative.
                let index = self.fetch_word()?;
                Ok(Operand::Mem(index.wrapping_add(self.reg_file[reg])))
            }
            AddrMode::IndexDeferred => {
                let index = self.fetch_word()?;
                let ptr = index.wrapping_add(self.reg_file[reg]);
                Ok(Operand::Mem(self.data_read(ptr)?))
            }
        }
    }

    /// Reads the value of a resolved operand.
    ///
    /// Memory locations count one data read and are observed by the cache;
    /// registers and already-fetched immediates add no counts.
    pub fn read_operand(&mut self, operand: Operand) -> Result<u16, SimErr> {
        match operand {
            Operand::Reg(reg) => Ok(self.reg_file[reg]),
            Operand::Mem(addr) => self.data_read(addr),
            Operand::Fetched(addr) => self.mem.read_word(addr),
        }
    }

    /// Writes a value back to a resolved operand.
    ///
    /// Memory locations count one data write and are observed by the
    /// cache; registers add no counts.
    pub fn write_operand(&mut self, operand: Operand, data: u16) -> Result<(), SimErr> {
        match operand {
            Operand::Reg(reg) => {
                self.reg_file[reg] = data;
                Ok(())
            }
            Operand::Mem(addr) | Operand::Fetched(addr) => self.data_write(addr, data),
        }
    }
}
