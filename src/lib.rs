//! A PDP-11 subset simulator with a write-back data-cache model.
//!
//! This crate interprets a fixed subset of the PDP-11 instruction set
//! (MOV, CMP, ADD, SUB, ASR, ASL, BR, BNE, BEQ, SOB, HALT) over a 32 KiB
//! word memory, maintaining the architectural register file and the NZVC
//! condition codes, and counting instruction fetches, data references, and
//! branch outcomes as it goes. A structural model of a 4 KiB four-way
//! set-associative write-back data cache with pseudo-LRU replacement can be
//! attached to observe every data reference the core issues.
//!
//! # Usage
//!
//! A memory image is a sequence of octal words, one per line. It must be
//! parsed and loaded before execution:
//! ```
//! use pdp11_sim::parse::parse_image;
//! use pdp11_sim::sim::Simulator;
//! use pdp11_sim::ast::reg_consts::R0;
//!
//! // MOV #5, R0; HALT
//! let image = parse_image("012700\n000005\n000000\n").unwrap();
//!
//! let mut simulator = Simulator::new(Default::default());
//! simulator.load_image(&image);
//! simulator.run().unwrap(); // <-- Result can be handled accordingly
//!
//! assert_eq!(simulator.reg_file[R0], 5);
//! ```
//!
//! If more granularity is needed, [`Simulator::step`] executes a single
//! instruction and reports what it did. See the [`sim`] module for details.
//!
//! [`Simulator::step`]: sim::Simulator::step
#![warn(missing_docs)]

pub mod parse;
pub mod ast;
pub mod sim;
pub mod trace;
pub mod err;
