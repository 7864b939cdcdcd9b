//! Rendering traces and statistics.
//!
//! Everything here consumes the simulator's observable state through
//! read-only queries; nothing in this module mutates or advances the
//! machine. The formats follow the course tool this simulator models:
//! seven-digit zero-padded octal for addresses and values, and the
//! `... statistics (in decimal)` blocks after a run.
//!
//! This module consists of:
//! - [`trace_line`]: the one-line instruction trace (`-t`).
//! - [`verbose_detail`]: the operand/flag/register detail lines (`-v`).
//! - [`exec_stats`]: the execution-statistics block.
//! - [`memory_dump`]: the post-run dump of the first words of memory.
//! - [`cache_stats`]: the cache-statistics block.

use std::fmt::Write as _;

use crate::ast::sim::SimInstr;
use crate::ast::OperandSpec;
use crate::sim::cache::CacheStats;
use crate::sim::mem::Mem;
use crate::sim::{Simulator, Stats, StepTrace};

/// How many words of memory the post-run dump shows.
const DUMP_WORDS: u16 = 20;

/// Formats the one-line trace for an executed instruction.
///
/// Two-operand instructions show their source and destination mode and
/// register fields; shifts show the destination field; branches show
/// their offset in words.
pub fn trace_line(trace: &StepTrace) -> String {
    let at = trace.at;
    let mn = trace.instr.mnemonic();
    match trace.instr {
        SimInstr::Mov(src, dst)
        | SimInstr::Cmp(src, dst)
        | SimInstr::Add(src, dst)
        | SimInstr::Sub(src, dst) => {
            let OperandSpec { mode: sm, reg: sr } = src;
            let OperandSpec { mode: dm, reg: dr } = dst;
            format!(
                "at {at:07o}: {mn} instruction sm {}, sr {}, dm {}, dr {}",
                sm.mode_no(),
                sr.reg_no(),
                dm.mode_no(),
                dr.reg_no()
            )
        }
        SimInstr::Asr(dst) | SimInstr::Asl(dst) => {
            let OperandSpec { mode: dm, reg: dr } = dst;
            format!("at {at:07o}: {mn} instruction dm {}, dr {}", dm.mode_no(), dr.reg_no())
        }
        SimInstr::Br(off) | SimInstr::Bne(off) | SimInstr::Beq(off) => {
            format!("at {at:07o}: {mn} instruction offset {off}")
        }
        SimInstr::Sob(reg, off) => {
            format!("at {at:07o}: {mn} instruction reg {}, offset {off}", reg.reg_no())
        }
        SimInstr::Halt => format!("at {at:07o}: {mn} instruction"),
    }
}

/// Formats the verbose detail for an executed instruction: the operand
/// values it saw, the condition codes after it, and a register dump.
pub fn verbose_detail(sim: &Simulator, trace: &StepTrace) -> String {
    let mut out = String::new();

    let mut values = vec![];
    if let Some(src) = trace.src {
        values.push(format!("src.value = {src:07o}"));
    }
    if let Some(dst) = trace.dst {
        values.push(format!("dst.value = {dst:07o}"));
    }
    if let Some(result) = trace.result {
        values.push(format!("result = {result:07o}"));
    }
    if let Some(taken) = trace.taken {
        values.push(format!("taken = {}", if taken { "yes" } else { "no" }));
    }
    if !values.is_empty() {
        let _ = writeln!(out, "{}", values.join(", "));
    }

    let _ = writeln!(out, "nzvc bits = {}", sim.flags);

    let reg = |n: u8| {
        let r = crate::ast::Reg::try_from(u16::from(n))
            .unwrap_or_else(|_| unreachable!("register fits in 3 bits"));
        sim.reg_file[r]
    };
    let _ = writeln!(
        out,
        "\tR0:{:07o} R2:{:07o} R4:{:07o} R6:{:07o}",
        reg(0), reg(2), reg(4), reg(6)
    );
    let _ = write!(
        out,
        "\tR1:{:07o} R3:{:07o} R5:{:07o} R7:{:07o}",
        reg(1), reg(3), reg(5), reg(7)
    );

    out
}

/// Formats the execution-statistics block shown after a run.
pub fn exec_stats(stats: &Stats) -> String {
    let taken_pct = match stats.branch_execs {
        0 => 0.0,
        n => 100.0 * stats.branch_taken as f64 / n as f64,
    };

    let mut out = String::new();
    let _ = writeln!(out, "execution statistics (in decimal):");
    let _ = writeln!(out, "  instructions executed     = {}", stats.inst_execs);
    let _ = writeln!(out, "  instruction words fetched = {}", stats.inst_fetches);
    let _ = writeln!(out, "  data words read           = {}", stats.memory_reads);
    let _ = writeln!(out, "  data words written        = {}", stats.memory_writes);
    let _ = writeln!(out, "  branches executed         = {}", stats.branch_execs);
    let _ = write!(
        out,
        "  branches taken            = {} ({taken_pct:.1}%)",
        stats.branch_taken
    );
    out
}

/// Formats the first 20 words of memory, one per line.
pub fn memory_dump(mem: &Mem) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "first {DUMP_WORDS} words of memory (in octal):");
    for n in 0..DUMP_WORDS {
        let addr = 2 * n;
        let _ = writeln!(out, "  {addr:07o}: {:06o}", mem.get_raw(addr));
    }
    out.pop(); // drop the trailing newline for symmetry with the blocks above
    out
}

/// Formats the cache-statistics block shown after a run.
pub fn cache_stats(stats: &CacheStats) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "cache statistics (in decimal):");
    let _ = writeln!(out, "  cache reads       = {}", stats.reads);
    let _ = writeln!(out, "  cache writes      = {}", stats.writes);
    let _ = writeln!(out, "  cache hits        = {}", stats.hits);
    let _ = writeln!(out, "  cache misses      = {}", stats.misses);
    let _ = write!(out, "  cache write backs = {}", stats.write_backs);
    out
}

#[cfg(test)]
mod tests {
    use crate::sim::{SimFlags, Simulator, Stats};

    use super::{exec_stats, memory_dump, trace_line, verbose_detail};

    fn stepped(words: &[u16]) -> (Simulator, crate::sim::StepTrace) {
        let mut sim = Simulator::new(SimFlags { cache: false });
        sim.load_image(words);
        let trace = sim.step().unwrap();
        (sim, trace)
    }

    #[test]
    fn test_trace_line_two_operand() {
        let (_, trace) = stepped(&[0o012700, 0o000005, 0o000000]);
        assert_eq!(
            trace_line(&trace),
            "at 0000000: mov instruction sm 2, sr 7, dm 0, dr 0"
        );
    }

    #[test]
    fn test_trace_line_sob() {
        let (_, trace) = stepped(&[0o077102, 0o000000]);
        assert_eq!(trace_line(&trace), "at 0000000: sob instruction reg 1, offset 2");
    }

    #[test]
    fn test_trace_line_branch_offset_is_signed() {
        let (_, trace) = stepped(&[0o000777]);
        assert_eq!(trace_line(&trace), "at 0000000: br instruction offset -1");
    }

    #[test]
    fn test_verbose_detail_mov() {
        let (sim, trace) = stepped(&[0o012700, 0o000005, 0o000000]);
        let detail = verbose_detail(&sim, &trace);
        assert!(detail.starts_with("src.value = 0000005, result = 0000005\n"));
        assert!(detail.contains("nzvc bits = 0000\n"));
        assert!(detail.contains("\tR0:0000005 "));
        assert!(detail.ends_with("R7:0000004"));
    }

    #[test]
    fn test_exec_stats_percentage() {
        let stats = Stats {
            inst_execs: 5,
            inst_fetches: 6,
            branch_execs: 3,
            branch_taken: 2,
            ..Default::default()
        };
        let block = exec_stats(&stats);
        assert!(block.starts_with("execution statistics (in decimal):\n"));
        assert!(block.contains("  branches executed         = 3\n"));
        assert!(block.ends_with("  branches taken            = 2 (66.7%)"));

        // no branches: the percentage degrades to zero rather than NaN
        let block = exec_stats(&Stats::default());
        assert!(block.ends_with("= 0 (0.0%)"));
    }

    #[test]
    fn test_memory_dump_shape() {
        let mut sim = Simulator::new(SimFlags { cache: false });
        sim.load_image(&[0o012700, 0o000005]);
        let dump = memory_dump(&sim.mem);
        let lines: Vec<_> = dump.lines().collect();
        assert_eq!(lines.len(), 21); // header + 20 words
        assert_eq!(lines[1], "  0000000: 012700");
        assert_eq!(lines[2], "  0000002: 000005");
        assert_eq!(lines[3], "  0000004: 000000");
        assert_eq!(lines[20], "  0000046: 000000");
    }
}
