//! Simulating and execution of machine code.
//!
//! This module is focused on executing a loaded memory image.
//!
//! This module consists of:
//! - [`Simulator`]: the struct that interprets loaded code.
//! - [`mem`]: the module handling memory, the register file, and the
//!   condition codes.
//! - [`operand`]: the module handling operand resolution.
//! - [`cache`]: the module handling the data-cache model.

pub mod cache;
pub mod mem;
pub mod operand;

use crate::ast::reg_consts::R7;
use crate::ast::sim::SimInstr;

use cache::{AccessKind, Cache, CacheStats};
use mem::{Flags, Mem, RegFile, MEMSIZE};

/// Errors that can occur during simulation.
///
/// Every variant is fatal: the machine has no recoverable error class, so
/// the driver reports the error and exits. The program-counter value to
/// report alongside is available from [`Simulator::prefetch_pc`].
#[derive(Debug, PartialEq, Eq, Hash, Clone, Copy)]
pub enum SimErr {
    /// The word was fetched, but it matches no opcode prefix.
    IllegalOpcode(u16),
    /// An access named a byte address at or beyond the end of memory.
    AddressOutOfRange(u16),
    /// An access named an odd byte address, which cannot hold a word.
    OddAddress(u16),
    /// The PC advanced past the end of memory without reaching a HALT.
    PcOutOfBounds(u16),
}
impl std::fmt::Display for SimErr {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SimErr::IllegalOpcode(word) => write!(f, "illegal instruction word {word:06o}"),
            SimErr::AddressOutOfRange(addr) => write!(f, "address {addr:06o} is outside memory"),
            SimErr::OddAddress(addr) => write!(f, "odd address {addr:06o} cannot hold a word"),
            SimErr::PcOutOfBounds(pc) => write!(f, "PC {pc:06o} ran past the end of memory"),
        }
    }
}
impl std::error::Error for SimErr {}
impl crate::err::Error for SimErr {
    fn help(&self) -> Option<std::borrow::Cow<str>> {
        match self {
            SimErr::IllegalOpcode(_) => {
                Some("the simulated subset is MOV, CMP, ADD, SUB, ASR, ASL, BR, BNE, BEQ, SOB, and HALT".into())
            }
            SimErr::AddressOutOfRange(_) => {
                Some(format!("memory spans byte addresses [000000, {:06o}]", MEMSIZE - 1).into())
            }
            SimErr::OddAddress(_) => Some("word accesses must use even byte addresses".into()),
            SimErr::PcOutOfBounds(_) => Some("programs should end with a HALT (000000) word".into()),
        }
    }
}

/// Configuration flags for [`Simulator`].
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub struct SimFlags {
    /// Whether to attach the data-cache model.
    ///
    /// When set, every data read and write the core issues is presented
    /// to a [`Cache`], whose counters appear in the final statistics.
    /// Instruction-stream fetches are not data accesses and bypass it.
    pub cache: bool,
}
impl Default for SimFlags {
    /// The default flags: the data cache is attached.
    fn default() -> Self {
        Self { cache: true }
    }
}

/// Execution counters, maintained by the simulator as it runs.
///
/// All counters are monotonic and only reset by building a fresh
/// [`Simulator`].
#[derive(Debug, Default, PartialEq, Eq, Clone, Copy)]
pub struct Stats {
    /// Instructions successfully dispatched.
    pub inst_execs: u64,
    /// Words consumed from the instruction stream: opcodes, immediates,
    /// absolute pointer words, and index words.
    pub inst_fetches: u64,
    /// Data words read from memory.
    pub memory_reads: u64,
    /// Data words written to memory.
    pub memory_writes: u64,
    /// Branch-class instructions executed (BR, BNE, BEQ, SOB).
    pub branch_execs: u64,
    /// Branch-class instructions that redirected the PC.
    pub branch_taken: u64,
}

/// What one [`Simulator::step`] did, for tracing.
///
/// Fields that do not apply to the executed instruction are `None`
/// (e.g., branches carry no operand values, HALT carries nothing).
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub struct StepTrace {
    /// The byte address the instruction word was fetched from.
    pub at: u16,
    /// The decoded instruction.
    pub instr: SimInstr,
    /// The source operand's value, where one was read.
    pub src: Option<u16>,
    /// The destination operand's value before the instruction, where it
    /// was read.
    pub dst: Option<u16>,
    /// The result the instruction produced (the value written, or the
    /// comparison result for CMP).
    pub result: Option<u16>,
    /// Whether a branch-class instruction redirected the PC.
    pub taken: Option<bool>,
}
impl StepTrace {
    fn new(at: u16, instr: SimInstr) -> Self {
        Self { at, instr, src: None, dst: None, result: None, taken: None }
    }
}

/// Interprets loaded code.
///
/// All architectural state lives here (memory, registers, condition
/// codes, counters, and the optional cache directory) and is only
/// mutated through [`Simulator::step`] (or [`Simulator::run`], which
/// loops it). `R7` of the register file is the program counter.
#[derive(Debug)]
pub struct Simulator {
    /// The simulator's memory.
    pub mem: Mem,

    /// The simulator's register file.
    pub reg_file: RegFile,

    /// The condition codes.
    pub flags: Flags,

    /// The execution counters.
    pub stats: Stats,

    /// The data-cache model, when one is attached.
    cache: Option<Cache>,

    /// Set by HALT; nothing executes once this is set.
    halted: bool,

    /// The address of the instruction currently (or last) executed.
    /// Used to report the PC alongside errors, since the PC itself has
    /// usually advanced past the offending word.
    instr_pc: u16,
}

impl Simulator {
    /// Creates a new simulator with zeroed state and no loaded image.
    ///
    /// Execution begins at byte address 0 (all registers, including the
    /// PC, start at zero).
    pub fn new(flags: SimFlags) -> Self {
        Self {
            mem: Mem::new(),
            reg_file: RegFile::new(),
            flags: Flags::new(),
            stats: Stats::default(),
            cache: flags.cache.then(Cache::new),
            halted: false,
            instr_pc: 0,
        }
    }

    /// Loads an image's words into memory, the Nth word at byte address `2*N`.
    pub fn load_image(&mut self, words: &[u16]) {
        self.mem.load_words(words);
    }

    /// The current program counter (`R7`).
    pub fn pc(&self) -> u16 {
        self.reg_file[R7]
    }

    /// The byte address of the instruction currently (or last) executed.
    ///
    /// This is the value to report as "the PC" in diagnostics: during
    /// execution the architectural PC has already moved past the
    /// instruction word and any immediates it consumed.
    pub fn prefetch_pc(&self) -> u16 {
        self.instr_pc
    }

    /// Whether a HALT has been executed.
    pub fn halted(&self) -> bool {
        self.halted
    }

    /// The attached cache's counters, if a cache is attached.
    pub fn cache_stats(&self) -> Option<&CacheStats> {
        self.cache.as_ref().map(Cache::stats)
    }

    /// Consumes the word at the PC from the instruction stream.
    pub(crate) fn fetch_word(&mut self) -> Result<u16, SimErr> {
        let pc = self.pc();
        let word = self.mem.read_word(pc)?;
        self.reg_file[R7] = pc.wrapping_add(2);
        self.stats.inst_fetches += 1;
        Ok(word)
    }

    /// Reads a data word, counting the reference and presenting it to the
    /// cache.
    pub(crate) fn data_read(&mut self, addr: u16) -> Result<u16, SimErr> {
        let word = self.mem.read_word(addr)?;
        self.stats.memory_reads += 1;
        if let Some(cache) = &mut self.cache {
            cache.access(u32::from(addr), AccessKind::Read);
        }
        Ok(word)
    }

    /// Writes a data word, counting the reference and presenting it to the
    /// cache.
    pub(crate) fn data_write(&mut self, addr: u16, data: u16) -> Result<(), SimErr> {
        self.mem.write_word(addr, data)?;
        self.stats.memory_writes += 1;
        if let Some(cache) = &mut self.cache {
            cache.access(u32::from(addr), AccessKind::Write);
        }
        Ok(())
    }

    /// Sets the PC from a 32-bit intermediate, masking back to 16 bits.
    ///
    /// Branch arithmetic is done in `i32` so sign extension cannot be
    /// mangled by 16-bit wrapping; a PC that lands outside memory is
    /// caught at the next fetch.
    fn set_pc(&mut self, pc: i32) {
        self.reg_file[R7] = pc as u16;
    }

    /// Executes a branch-class PC update and counts it.
    fn branch(&mut self, taken: bool, off: i8) {
        self.stats.branch_execs += 1;
        if taken {
            self.stats.branch_taken += 1;
            self.set_pc(i32::from(self.pc()) + 2 * i32::from(off));
        }
    }

    /// Simulates one instruction, reporting what it did.
    ///
    /// Does nothing after a HALT has executed. Any error is fatal; the
    /// offending instruction's address is [`Simulator::prefetch_pc`].
    pub fn step(&mut self) -> Result<StepTrace, SimErr> {
        let at = self.pc();
        self.instr_pc = at;

        if self.halted {
            return Ok(StepTrace::new(at, SimInstr::Halt));
        }
        if usize::from(at) >= MEMSIZE {
            return Err(SimErr::PcOutOfBounds(at));
        }

        let word = self.fetch_word()?;
        let instr = SimInstr::decode(word)?;
        self.stats.inst_execs += 1;
        log::trace!("at {at:06o}: {}", instr.mnemonic());

        let mut trace = StepTrace::new(at, instr);
        match instr {
            SimInstr::Mov(src, dst) => {
                let src_op = self.resolve_operand(src)?;
                let value = self.read_operand(src_op)?;
                let dst_op = self.resolve_operand(dst)?;
                self.write_operand(dst_op, value)?;

                self.flags.set_nz(value);
                self.flags.v = false;
                self.flags.c = false;
                trace.src = Some(value);
                trace.result = Some(value);
            }
            SimInstr::Cmp(src, dst) => {
                let src_op = self.resolve_operand(src)?;
                let sv = self.read_operand(src_op)?;
                let dst_op = self.resolve_operand(dst)?;
                let dv = self.read_operand(dst_op)?;

                // CMP is src - dst; the destination is not written.
                let result = sv.wrapping_sub(dv);
                self.flags.set_nz(result);
                self.flags.v = (sv ^ dv) & 0x8000 != 0 && (result ^ sv) & 0x8000 != 0;
                self.flags.c = sv < dv;
                trace.src = Some(sv);
                trace.dst = Some(dv);
                trace.result = Some(result);
            }
            SimInstr::Add(src, dst) => {
                let src_op = self.resolve_operand(src)?;
                let sv = self.read_operand(src_op)?;
                let dst_op = self.resolve_operand(dst)?;
                let dv = self.read_operand(dst_op)?;

                let sum = u32::from(dv) + u32::from(sv);
                let result = sum as u16;
                self.write_operand(dst_op, result)?;

                self.flags.set_nz(result);
                self.flags.v = (dv ^ sv) & 0x8000 == 0 && (result ^ sv) & 0x8000 != 0;
                self.flags.c = sum > 0xFFFF;
                trace.src = Some(sv);
                trace.dst = Some(dv);
                trace.result = Some(result);
            }
            SimInstr::Sub(src, dst) => {
                let src_op = self.resolve_operand(src)?;
                let sv = self.read_operand(src_op)?;
                let dst_op = self.resolve_operand(dst)?;
                let dv = self.read_operand(dst_op)?;

                let result = dv.wrapping_sub(sv);
                self.write_operand(dst_op, result)?;

                self.flags.set_nz(result);
                self.flags.v = (dv ^ sv) & 0x8000 != 0 && (result ^ dv) & 0x8000 != 0;
                self.flags.c = dv < sv;
                trace.src = Some(sv);
                trace.dst = Some(dv);
                trace.result = Some(result);
            }
            SimInstr::Asr(dst) => {
                let dst_op = self.resolve_operand(dst)?;
                let old = self.read_operand(dst_op)?;
                let result = ((old as i16) >> 1) as u16;
                self.write_operand(dst_op, result)?;

                self.flags.set_nz(result);
                self.flags.c = old & 1 != 0;
                self.flags.v = self.flags.n ^ self.flags.c;
                trace.dst = Some(old);
                trace.result = Some(result);
            }
            SimInstr::Asl(dst) => {
                let dst_op = self.resolve_operand(dst)?;
                let old = self.read_operand(dst_op)?;
                let result = old << 1;
                self.write_operand(dst_op, result)?;

                self.flags.set_nz(result);
                self.flags.c = old & 0x8000 != 0;
                self.flags.v = self.flags.n ^ self.flags.c;
                trace.dst = Some(old);
                trace.result = Some(result);
            }
            SimInstr::Br(off) => {
                self.branch(true, off);
                trace.taken = Some(true);
            }
            SimInstr::Bne(off) => {
                let taken = !self.flags.z;
                self.branch(taken, off);
                trace.taken = Some(taken);
            }
            SimInstr::Beq(off) => {
                let taken = self.flags.z;
                self.branch(taken, off);
                trace.taken = Some(taken);
            }
            SimInstr::Sob(reg, off) => {
                let result = self.reg_file[reg].wrapping_sub(1);
                self.reg_file[reg] = result;

                self.stats.branch_execs += 1;
                let taken = result != 0;
                if taken {
                    self.stats.branch_taken += 1;
                    self.set_pc(i32::from(self.pc()) - 2 * i32::from(off));
                }
                trace.result = Some(result);
                trace.taken = Some(taken);
            }
            SimInstr::Halt => {
                self.halted = true;
            }
        }

        Ok(trace)
    }

    /// Executes until a HALT.
    ///
    /// Any error is fatal and ends the run; the offending instruction's
    /// address is [`Simulator::prefetch_pc`].
    pub fn run(&mut self) -> Result<(), SimErr> {
        while !self.halted {
            self.step()?;
        }
        Ok(())
    }
}
impl Default for Simulator {
    fn default() -> Self {
        Self::new(Default::default())
    }
}

#[cfg(test)]
mod tests {
    use crate::ast::reg_consts::{R0, R1, R2, R7};

    use super::{SimErr, SimFlags, Simulator, Stats};

    /// Runs an octal program to completion, expecting a clean halt.
    fn run_words(words: &[u16]) -> Simulator {
        let mut sim = Simulator::new(Default::default());
        sim.load_image(words);
        sim.run().unwrap();
        sim
    }

    #[test]
    fn test_minimal_halt() {
        let sim = run_words(&[0o000000]);
        assert!(sim.halted());
        assert_eq!(
            sim.stats,
            Stats { inst_execs: 1, inst_fetches: 1, ..Default::default() }
        );
    }

    #[test]
    fn test_immediate_mov() {
        // MOV #5, R0; HALT
        let sim = run_words(&[0o012700, 0o000005, 0o000000]);
        assert_eq!(sim.reg_file[R0], 5);
        assert_eq!(
            sim.stats,
            Stats { inst_execs: 2, inst_fetches: 3, ..Default::default() }
        );
    }

    #[test]
    fn test_sob_counted_loop() {
        // MOV #3, R0; SOB R0, .-1 word; HALT
        let sim = run_words(&[0o012700, 0o000003, 0o077001, 0o000000]);
        assert_eq!(sim.reg_file[R0], 0);
        assert_eq!(sim.stats.branch_execs, 3);
        assert_eq!(sim.stats.branch_taken, 2);
        assert_eq!(sim.stats.inst_execs, 5);
    }

    #[test]
    fn test_add_overflow_flags() {
        // MOV #077777, R0; MOV #1, R1; ADD R1, R0; HALT
        let sim = run_words(&[0o012700, 0o077777, 0o012701, 0o000001, 0o060100, 0o000000]);
        assert_eq!(sim.reg_file[R0], 0x8000);
        assert!(sim.flags.n);
        assert!(!sim.flags.z);
        assert!(sim.flags.v);
        assert!(!sim.flags.c);
    }

    #[test]
    fn test_add_carry_flag() {
        // MOV #177777, R0; ADD #1, R0; HALT
        let sim = run_words(&[0o012700, 0o177777, 0o062700, 0o000001, 0o000000]);
        assert_eq!(sim.reg_file[R0], 0);
        assert!(sim.flags.z);
        assert!(sim.flags.c);
        assert!(!sim.flags.v);
        assert!(!sim.flags.n);
    }

    #[test]
    fn test_sub_equal_operands() {
        // MOV #5, R0; MOV #5, R1; SUB R1, R0; HALT
        let sim = run_words(&[0o012700, 0o000005, 0o012701, 0o000005, 0o160100, 0o000000]);
        assert_eq!(sim.reg_file[R0], 0);
        assert!(sim.flags.z);
        assert!(!sim.flags.n);
        assert!(!sim.flags.v);
        assert!(!sim.flags.c);
    }

    #[test]
    fn test_sub_borrow() {
        // MOV #2, R0; MOV #3, R1; SUB R1, R0; HALT; 2 - 3 borrows
        let sim = run_words(&[0o012700, 0o000002, 0o012701, 0o000003, 0o160100, 0o000000]);
        assert_eq!(sim.reg_file[R0], 0xFFFF);
        assert!(sim.flags.n);
        assert!(sim.flags.c);
        assert!(!sim.flags.v);
    }

    #[test]
    fn test_cmp_sets_flags_without_writing() {
        // MOV #2, R0; MOV #3, R1; CMP R0, R1; HALT; 2 - 3 borrows
        let sim = run_words(&[0o012700, 0o000002, 0o012701, 0o000003, 0o020001, 0o000000]);
        assert_eq!(sim.reg_file[R0], 2);
        assert_eq!(sim.reg_file[R1], 3);
        assert!(sim.flags.n);
        assert!(sim.flags.c);
        assert_eq!(sim.stats.memory_writes, 0);
    }

    #[test]
    fn test_cmp_equal_sets_z() {
        // MOV #7, R0; CMP #7, R0; BEQ +1; HALT; MOV #1, R2; HALT
        let sim = run_words(&[
            0o012700, 0o000007, // MOV #7, R0
            0o022700, 0o000007, // CMP #7, R0
            0o001401,           // BEQ .+1 word
            0o000000,           // HALT (skipped)
            0o012702, 0o000001, // MOV #1, R2
            0o000000,           // HALT
        ]);
        assert_eq!(sim.reg_file[R2], 1);
        assert_eq!(sim.stats.branch_execs, 1);
        assert_eq!(sim.stats.branch_taken, 1);
    }

    #[test]
    fn test_bne_loop() {
        // Count R0 down from 3 with SUB; BNE loops back until zero.
        let sim = run_words(&[
            0o012700, 0o000003, // MOV #3, R0
            0o162700, 0o000001, // SUB #1, R0
            0o001375,           // BNE .-3 words (back to the SUB)
            0o000000,           // HALT
        ]);
        assert_eq!(sim.reg_file[R0], 0);
        assert_eq!(sim.stats.branch_execs, 3);
        assert_eq!(sim.stats.branch_taken, 2);
    }

    #[test]
    fn test_br_is_always_taken() {
        // BR +1 word; HALT (skipped); HALT
        let sim = run_words(&[0o000401, 0o000000, 0o000000]);
        assert_eq!(sim.stats.inst_execs, 2);
        assert_eq!(sim.stats.branch_execs, 1);
        assert_eq!(sim.stats.branch_taken, 1);
        // the skipped HALT at byte 2 was never executed
        assert_eq!(sim.prefetch_pc(), 4);
    }

    #[test]
    fn test_branch_offset_extremes() {
        // BR with offset 0x7F jumps forward 254 bytes.
        let mut words = vec![0u16; 130];
        words[0] = 0o000577; // BR +127 words
        let mut sim = Simulator::new(Default::default());
        sim.load_image(&words);
        sim.step().unwrap();
        assert_eq!(sim.pc(), 2 + 254);

        // A branch with offset 0x80 jumps backward 256 bytes.
        let mut words = vec![0u16; 200];
        words[130] = 0o000600; // BR -128 words, at byte 260
        let mut sim = Simulator::new(Default::default());
        sim.load_image(&words);
        sim.reg_file[R7] = 260;
        sim.step().unwrap();
        assert_eq!(sim.pc(), 262 - 256);
    }

    #[test]
    fn test_asl_boundary() {
        // MOV #100000, R0; ASL R0; HALT
        let sim = run_words(&[0o012700, 0o100000, 0o006300, 0o000000]);
        assert_eq!(sim.reg_file[R0], 0);
        assert!(sim.flags.z);
        assert!(!sim.flags.n);
        assert!(sim.flags.v);
        assert!(sim.flags.c);
    }

    #[test]
    fn test_asr_preserves_sign() {
        // MOV #100001, R0; ASR R0; HALT
        let sim = run_words(&[0o012700, 0o100001, 0o006200, 0o000000]);
        assert_eq!(sim.reg_file[R0], 0o140000);
        assert!(sim.flags.n);
        assert!(sim.flags.c);
        // V = N xor C = 0
        assert!(!sim.flags.v);
    }

    #[test]
    fn test_asr_of_one() {
        // MOV #1, R0; ASR R0; HALT
        let sim = run_words(&[0o012700, 0o000001, 0o006200, 0o000000]);
        assert_eq!(sim.reg_file[R0], 0);
        assert!(sim.flags.z);
        assert!(sim.flags.c);
        // V = N xor C = 1
        assert!(sim.flags.v);
    }

    #[test]
    fn test_mov_clears_v_and_c() {
        // ADD #1, R0 twice to set C via 177777 + 1, then MOV #1, R1
        let sim = run_words(&[
            0o012700, 0o177777, // MOV #177777, R0
            0o062700, 0o000001, // ADD #1, R0 (sets C)
            0o012701, 0o000001, // MOV #1, R1
            0o000000,
        ]);
        assert!(!sim.flags.c);
        assert!(!sim.flags.v);
        assert!(!sim.flags.z);
        assert!(!sim.flags.n);
    }

    #[test]
    fn test_memory_operands_count_and_cache() {
        // MOV #123, @#100; MOV @#100, R0; HALT
        let sim = run_words(&[
            0o012737, 0o000123, 0o000100, // MOV #123, @#100
            0o013700, 0o000100,           // MOV @#100, R0
            0o000000,
        ]);
        assert_eq!(sim.reg_file[R0], 0o123);
        assert_eq!(sim.mem.get_raw(0o100), 0o123);
        assert_eq!(sim.stats.memory_writes, 1);
        assert_eq!(sim.stats.memory_reads, 1);
        // 3 opcodes, 2 stream words for the first MOV, 1 for the second
        assert_eq!(sim.stats.inst_fetches, 6);

        // both data references touched the same line: one miss, one hit
        let cache = sim.cache_stats().unwrap();
        assert_eq!(cache.writes, 1);
        assert_eq!(cache.reads, 1);
        assert_eq!(cache.misses, 1);
        assert_eq!(cache.hits, 1);
        assert_eq!(cache.write_backs, 0);
    }

    #[test]
    fn test_cache_can_be_detached() {
        let mut sim = Simulator::new(SimFlags { cache: false });
        sim.load_image(&[0o012737, 0o000123, 0o000100, 0o000000]);
        sim.run().unwrap();
        assert_eq!(sim.stats.memory_writes, 1);
        assert_eq!(sim.cache_stats(), None);
    }

    #[test]
    fn test_autoincrement_walks_a_table() {
        // Sum the two words at 100/102 into R0 through (R1)+.
        let mut sim = Simulator::new(Default::default());
        sim.load_image(&[
            0o012701, 0o000100, // MOV #100, R1
            0o062100,           // ADD (R1)+, R0
            0o062100,           // ADD (R1)+, R0
            0o000000,
        ]);
        sim.mem.write_word(0o100, 30).unwrap();
        sim.mem.write_word(0o102, 12).unwrap();
        sim.run().unwrap();

        assert_eq!(sim.reg_file[R0], 42);
        assert_eq!(sim.reg_file[R1], 0o104);
        assert_eq!(sim.stats.memory_reads, 2);
    }

    #[test]
    fn test_autodecrement_push() {
        // MOV #100, R1; MOV #7, -(R1); HALT stores 7 at byte 76.
        let sim = run_words(&[0o012701, 0o000100, 0o012741, 0o000007, 0o000000]);
        assert_eq!(sim.reg_file[R1], 0o76);
        assert_eq!(sim.mem.get_raw(0o76), 7);
        assert_eq!(sim.stats.memory_writes, 1);
    }

    #[test]
    fn test_illegal_opcode_is_fatal() {
        let mut sim = Simulator::new(Default::default());
        sim.load_image(&[0o050000]);
        assert_eq!(sim.run(), Err(SimErr::IllegalOpcode(0o050000)));
        assert_eq!(sim.prefetch_pc(), 0);
        assert_eq!(sim.stats.inst_execs, 0);
    }

    #[test]
    fn test_pc_runaway_is_fatal() {
        // Execute a MOV in the last word of memory; the PC advances past
        // the end without a HALT.
        let last = (super::mem::MEMSIZE - 2) as u16;
        let mut sim = Simulator::new(Default::default());
        sim.reg_file[R7] = last;
        sim.mem.write_word(last, 0o010001).unwrap(); // MOV R0, R1
        assert_eq!(sim.run(), Err(SimErr::PcOutOfBounds(last + 2)));
        assert_eq!(sim.stats.inst_execs, 1);
    }

    #[test]
    fn test_halted_simulator_stays_halted() {
        let mut sim = run_words(&[0o000000]);
        let execs = sim.stats.inst_execs;
        sim.step().unwrap();
        assert_eq!(sim.stats.inst_execs, execs);
    }

    #[test]
    fn test_pc_stays_even_and_bounded() {
        let sim = run_words(&[0o012700, 0o000003, 0o077001, 0o000000]);
        assert_eq!(sim.pc() % 2, 0);
        assert!(usize::from(sim.pc()) < super::mem::MEMSIZE);
    }
}
