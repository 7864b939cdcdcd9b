//! Error interface for this crate.
//!
//! All of the fatal error types this crate produces ([`LoadErr`], [`SimErr`])
//! implement the [`Error`] trait, which extends [`std::error::Error`] with an
//! optional help message. The binary uses [`report`] to surface either kind
//! as a short diagnostic on stderr before exiting.
//!
//! [`LoadErr`]: crate::parse::LoadErr
//! [`SimErr`]: crate::sim::SimErr

use std::borrow::Cow;

/// Unified error interface for this crate's fatal errors.
pub trait Error: std::error::Error {
    /// A short hint on how to resolve the error, if one applies.
    fn help(&self) -> Option<Cow<str>> {
        None
    }
}

/// Writes an error (and its help message, if any) to stderr.
///
/// The diagnostic is one line per error in the shape `pdp11-sim: <message>`,
/// matching the usual short-and-fatal reporting of command-line tools.
pub fn report(err: &dyn Error) {
    eprintln!("pdp11-sim: {err}");
    if let Some(help) = err.help() {
        eprintln!("help: {help}");
    }
}
