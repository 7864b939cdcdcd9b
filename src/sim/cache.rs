//! A structural model of the data cache.
//!
//! This models a 4 KiB, four-way set-associative, write-back data cache
//! with 32-byte lines and pseudo-LRU replacement. Only the cache
//! *directory* is simulated: the valid, dirty, and tag bits of each line
//! plus the per-set replacement state. That is enough to determine the
//! hit, miss, and write-back counts from the addresses and kinds of the
//! accesses; line contents are never stored.
//!
//! A 32-bit byte address is partitioned into a 22-bit tag, a 5-bit set
//! index, and a 5-bit byte offset (ignored by the directory).
//!
//! Replacement uses the three-bit pseudo-LRU scheme for a 4-way set: each
//! bit is one branch point of a binary decision tree, with a 1 meaning the
//! left side was referenced more recently than the right. Bit 0 selects
//! between the halves, bit 1 breaks the tie in the left pair (ways 0/1),
//! and bit 2 in the right pair (ways 2/3).

/// The number of sets in the cache.
pub const SETS: usize = 32;
/// The number of ways (banks) per set.
pub const WAYS: usize = 4;

const INDEX_BITS: u32 = 5;
const OFFSET_BITS: u32 = 5;

/// Replacement choice by PLRU state, for sets whose ways are all valid.
const PLRU_VICTIM: [usize; 8] = [0, 0, 1, 1, 2, 3, 2, 3];

/// Next PLRU state, indexed by `(state << 2) | way`.
const PLRU_NEXT: [u8; 32] = [
    6, 4, 1, 0, //
    7, 5, 1, 0, //
    6, 4, 3, 2, //
    7, 5, 3, 2, //
    6, 4, 1, 0, //
    7, 5, 1, 0, //
    6, 4, 3, 2, //
    7, 5, 3, 2, //
];

/// Whether an access reads or writes the addressed word.
#[derive(Debug, PartialEq, Eq, Hash, Clone, Copy)]
pub enum AccessKind {
    /// A data read.
    Read,
    /// A data write.
    Write,
}

/// What a single [`Cache::access`] did to the directory.
#[derive(Debug, PartialEq, Eq, Hash, Clone, Copy)]
pub enum Access {
    /// The addressed line was present; `way` is where it was found.
    Hit {
        /// The way the line was found in.
        way: usize,
    },
    /// The addressed line was absent and installed into `way`.
    Miss {
        /// The way chosen as the victim.
        way: usize,
        /// Whether the displaced line was valid and dirty, costing a
        /// write-back.
        write_back: bool,
    },
}

/// Counters accumulated over the lifetime of a [`Cache`].
#[derive(Debug, Default, PartialEq, Eq, Clone, Copy)]
pub struct CacheStats {
    /// Read accesses presented to the cache.
    pub reads: u64,
    /// Write accesses presented to the cache.
    pub writes: u64,
    /// Accesses that found their line in the directory.
    pub hits: u64,
    /// Accesses that missed and installed a line.
    pub misses: u64,
    /// Dirty lines displaced by an install.
    pub write_backs: u64,
}

/// One line's directory entry. The tag and dirty bit are meaningless
/// while `valid` is false.
#[derive(Debug, Default, Clone, Copy)]
struct Line {
    valid: bool,
    dirty: bool,
    tag: u32,
}

/// One set: four lines plus the replacement state for the set.
#[derive(Debug, Default, Clone, Copy)]
struct Set {
    lines: [Line; WAYS],
    plru: u8,
}

/// The cache directory.
///
/// Created cold (all bits zero) by [`Cache::new`]; every data access the
/// CPU core issues is presented to [`Cache::access`], which updates the
/// directory and the [`CacheStats`] counters.
#[derive(Debug, Default)]
pub struct Cache {
    sets: [Set; SETS],
    stats: CacheStats,
}

impl Cache {
    /// Creates a cold cache: every valid bit clear, every counter zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// The counters accumulated so far.
    pub fn stats(&self) -> &CacheStats {
        &self.stats
    }

    /// Simulates one access to the given byte address.
    ///
    /// The four ways of the addressed set are probed for a valid matching
    /// tag. On a miss, the victim is the lowest-numbered invalid way, or
    /// the way named by the PLRU state when all four are valid; a valid
    /// dirty victim counts one write-back. Hit or miss, the set's PLRU
    /// state then advances by the referenced way, and a write marks the
    /// line dirty.
    pub fn access(&mut self, address: u32, kind: AccessKind) -> Access {
        match kind {
            AccessKind::Read => self.stats.reads += 1,
            AccessKind::Write => self.stats.writes += 1,
        }

        let index = ((address >> OFFSET_BITS) & (SETS as u32 - 1)) as usize;
        let tag = address >> (OFFSET_BITS + INDEX_BITS);
        let set = &mut self.sets[index];

        let probe = set
            .lines
            .iter()
            .position(|line| line.valid && line.tag == tag);

        let outcome = match probe {
            Some(way) => {
                self.stats.hits += 1;
                Access::Hit { way }
            }
            None => {
                self.stats.misses += 1;

                let way = set
                    .lines
                    .iter()
                    .position(|line| !line.valid)
                    .unwrap_or(PLRU_VICTIM[usize::from(set.plru)]);

                let victim = &mut set.lines[way];
                let write_back = victim.valid && victim.dirty;
                if write_back {
                    self.stats.write_backs += 1;
                    log::trace!(
                        "cache: set {index} way {way} write-back (tag {:o})",
                        victim.tag
                    );
                }

                *victim = Line { valid: true, dirty: false, tag };
                Access::Miss { way, write_back }
            }
        };

        let way = match outcome {
            Access::Hit { way } | Access::Miss { way, .. } => way,
        };
        set.plru = PLRU_NEXT[usize::from(set.plru) << 2 | way];

        if kind == AccessKind::Write {
            set.lines[way].dirty = true;
        }

        outcome
    }
}

#[cfg(test)]
mod tests {
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    use super::{Access, AccessKind, Cache, PLRU_NEXT, SETS, WAYS};

    /// Byte address with the given tag and set index.
    fn addr(tag: u32, set: u32) -> u32 {
        (tag << 10) | (set << 5)
    }

    #[test]
    fn test_cold_cache_is_all_zero() {
        let cache = Cache::new();
        assert_eq!(*cache.stats(), Default::default());
        for set in &cache.sets {
            assert_eq!(set.plru, 0);
            assert!(set.lines.iter().all(|line| !line.valid));
        }
    }

    #[test]
    fn test_cold_miss_then_hit() {
        let mut cache = Cache::new();
        assert_eq!(cache.access(0x0000, AccessKind::Read), Access::Miss { way: 0, write_back: false });
        assert_eq!(cache.access(0x0000, AccessKind::Read), Access::Hit { way: 0 });

        let stats = cache.stats();
        assert_eq!(stats.reads, 2);
        assert_eq!(stats.hits, 1);
        assert_eq!(stats.misses, 1);
        assert_eq!(stats.write_backs, 0);
    }

    #[test]
    fn test_same_line_hits_after_first() {
        let mut cache = Cache::new();
        let a = addr(0x155, 9);
        for _ in 0..12 {
            cache.access(a, AccessKind::Read);
        }
        assert_eq!(cache.stats().misses, 1);
        assert_eq!(cache.stats().hits, 11);
    }

    #[test]
    fn test_offset_does_not_split_lines() {
        // all 32 byte offsets land in the same line
        let mut cache = Cache::new();
        for offset in 0..32 {
            cache.access(addr(3, 7) + offset, AccessKind::Read);
        }
        assert_eq!(cache.stats().misses, 1);
        assert_eq!(cache.stats().hits, 31);
    }

    #[test]
    fn test_invalid_ways_fill_in_order() {
        let mut cache = Cache::new();
        for tag in 0..WAYS as u32 {
            let access = cache.access(addr(tag, 0), AccessKind::Read);
            assert_eq!(access, Access::Miss { way: tag as usize, write_back: false });
        }
        assert_eq!(cache.stats().misses, 4);
    }

    #[test]
    fn test_plru_victim_after_fill() {
        // Referencing ways 0..3 in order walks the next-state table
        // 0 -> 6 -> 4 -> 1 -> 0, and state 0 names way 0 as the victim:
        // the least recently used line.
        let mut cache = Cache::new();
        for tag in 0..WAYS as u32 {
            cache.access(addr(tag, 0), AccessKind::Read);
        }
        assert_eq!(cache.sets[0].plru, 0);
        assert_eq!(
            cache.access(addr(100, 0), AccessKind::Read),
            Access::Miss { way: 0, write_back: false }
        );
    }

    #[test]
    fn test_write_back_on_dirty_eviction() {
        let mut cache = Cache::new();
        for tag in 0..WAYS as u32 {
            cache.access(addr(tag, 0), AccessKind::Write);
        }
        assert_eq!(cache.stats().write_backs, 0);

        // every way is dirty, so whichever victim PLRU picks costs a write-back
        let access = cache.access(addr(100, 0), AccessKind::Write);
        assert!(matches!(access, Access::Miss { write_back: true, .. }));
        assert_eq!(cache.stats().write_backs, 1);
    }

    #[test]
    fn test_clean_eviction_costs_nothing() {
        let mut cache = Cache::new();
        for tag in 0..WAYS as u32 {
            cache.access(addr(tag, 0), AccessKind::Read);
        }
        let access = cache.access(addr(100, 0), AccessKind::Read);
        assert!(matches!(access, Access::Miss { write_back: false, .. }));
        assert_eq!(cache.stats().write_backs, 0);
    }

    #[test]
    fn test_sets_are_independent() {
        let mut cache = Cache::new();
        cache.access(addr(1, 0), AccessKind::Read);
        cache.access(addr(1, 1), AccessKind::Read);
        cache.access(addr(1, 31), AccessKind::Read);
        assert_eq!(cache.stats().misses, 3);
        assert_eq!(cache.stats().hits, 0);
    }

    #[test]
    fn test_plru_next_state_table() {
        // Check the table against the tree interpretation: a reference
        // to way 0 sets the half and left-pair bits, leaving the right
        // pair's tie-breaker alone; a reference to way 3 clears the half
        // and right-pair bits, leaving the left pair's alone.
        for state in 0..8u8 {
            assert_eq!(PLRU_NEXT[usize::from(state) << 2], (state & 0b001) | 0b110);
            assert_eq!(PLRU_NEXT[usize::from(state) << 2 | 3], state & 0b010);
        }

        let mut cache = Cache::new();
        let mut rng = StdRng::seed_from_u64(0x5EED);
        for _ in 0..10_000 {
            let set = rng.gen_range(0..SETS as u32);
            let tag = rng.gen_range(0..6);
            let state = cache.sets[set as usize].plru;
            let access = cache.access(addr(tag, set), AccessKind::Read);
            let way = match access {
                Access::Hit { way } | Access::Miss { way, .. } => way,
            };
            assert_eq!(cache.sets[set as usize].plru, PLRU_NEXT[usize::from(state) << 2 | way]);
            assert!(cache.sets[set as usize].plru < 8);
        }
    }

    #[test]
    fn test_counter_invariants_random_sweep() {
        let mut cache = Cache::new();
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..50_000 {
            let address = rng.gen::<u32>() & 0xFFFF;
            let kind = match rng.gen::<bool>() {
                true => AccessKind::Read,
                false => AccessKind::Write,
            };
            cache.access(address, kind);

            let stats = cache.stats();
            assert_eq!(stats.hits + stats.misses, stats.reads + stats.writes);
            assert!(stats.write_backs <= stats.misses);
        }
    }
}
