//! Parsing memory images.
//!
//! A memory image is ASCII text holding one octal-encoded word per line,
//! optionally preceded by whitespace. [`parse_image`] converts such text
//! into the list of machine words to load, where the Nth word of the list
//! belongs at byte address `2*N`.
//!
//! This module consists of:
//! - [`parse_image`]: the main function converting image text into words.
//! - [`lex`]: the module tokenizing the image text.
//! - [`LoadErr`]: the errors raised while loading an image.

pub mod lex;

use logos::Logos;

use crate::sim::mem::MEMSIZE;
use lex::{LexErr, Token};

/// Parses a memory image into the machine words it lists.
///
/// The Nth word returned (0-indexed) belongs at byte address `2*N`.
/// Blank lines are ignored; any line that does not hold a single octal
/// word of at most 6 digits fails the load.
///
/// # Example
/// ```
/// use pdp11_sim::parse::parse_image;
///
/// let words = parse_image("012700\n000005\n000000\n").unwrap();
/// assert_eq!(words, vec![0o012700, 0o000005, 0o000000]);
/// ```
pub fn parse_image(src: &str) -> Result<Vec<u16>, LoadErr> {
    let mut words = vec![];
    let mut line = 1;

    for token in Token::lexer(src) {
        match token {
            Ok(Token::Word(w)) => {
                if words.len() >= MEMSIZE / 2 {
                    return Err(LoadErr::ImageTooBig);
                }
                words.push(w);
            }
            Ok(Token::NewLine) => line += 1,
            Err(e) => return Err(LoadErr::Lex { err: e, line }),
        }
    }

    Ok(words)
}

/// Errors that can occur while loading a memory image.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum LoadErr {
    /// A line of the image failed to tokenize.
    Lex {
        /// What was wrong with the line.
        err: LexErr,
        /// The 1-indexed line the error occurred on.
        line: usize,
    },
    /// The image holds more words than memory can.
    ImageTooBig,
}
impl std::fmt::Display for LoadErr {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LoadErr::Lex { err, line } => write!(f, "line {line}: {err}"),
            LoadErr::ImageTooBig => write!(f, "image exceeds {} words of memory", MEMSIZE / 2),
        }
    }
}
impl std::error::Error for LoadErr {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            LoadErr::Lex { err, .. } => Some(err),
            LoadErr::ImageTooBig => None,
        }
    }
}
impl crate::err::Error for LoadErr {
    fn help(&self) -> Option<std::borrow::Cow<str>> {
        match self {
            LoadErr::Lex { err, .. } => crate::err::Error::help(err),
            LoadErr::ImageTooBig => Some("memory is 32768 bytes; trim the image".into()),
        }
    }
}
