//! Tokenizing octal memory images.
//!
//! This module holds the tokens that characterize a memory image listing
//! ([`Token`]): octal-encoded words separated by line breaks. It is used by
//! [`parse_image`] to turn the text on standard input into machine words.
//!
//! [`parse_image`]: crate::parse::parse_image

use std::num::IntErrorKind;

use logos::{Lexer, Logos};

/// A unit of information in a memory image listing.
#[derive(Debug, Logos, PartialEq, Eq)]
#[logos(skip r"[ \t\r]+", error = LexErr)]
pub enum Token {
    // The regex spans over tokens that are technically invalid
    // (e.g., 01890 matches even though 8 and 9 are not octal digits).
    // This is intended: it collects one discernable unit and validates
    // it in the callback.

    /// An octal-encoded 16-bit word (e.g., `012700`).
    #[regex(r"\w+", lex_word)]
    Word(u16),

    /// A new line, separating one word from the next.
    #[regex(r"\n")]
    NewLine,
}

/// Any errors raised in attempting to tokenize a memory image.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Default)]
pub enum LexErr {
    /// Word has more than 6 octal digits.
    TooManyDigits,
    /// Word does not fit within the range of a u16.
    DoesNotFitU16,
    /// Word has digits or characters outside 0-7.
    InvalidOctal,
    /// A symbol was used which is not allowed in a memory image.
    #[default]
    InvalidSymbol,
}
impl std::fmt::Display for LexErr {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LexErr::TooManyDigits => f.write_str("octal word has too many digits"),
            LexErr::DoesNotFitU16 => f.write_str("octal word does not fit 16-bit unsigned integer"),
            LexErr::InvalidOctal  => f.write_str("invalid octal literal"),
            LexErr::InvalidSymbol => f.write_str("unrecognized symbol"),
        }
    }
}
impl std::error::Error for LexErr {}
impl crate::err::Error for LexErr {
    fn help(&self) -> Option<std::borrow::Cow<str>> {
        match self {
            LexErr::TooManyDigits => Some("words are at most 6 octal digits".into()),
            LexErr::DoesNotFitU16 => Some(format!("the range for a 16-bit word is [000000, {:o}]", u16::MAX).into()),
            LexErr::InvalidOctal  => Some("an octal literal only consists of digits 0-7".into()),
            LexErr::InvalidSymbol => Some("a memory image holds one octal word per line".into()),
        }
    }
}

fn lex_word(lx: &Lexer<'_, Token>) -> Result<u16, LexErr> {
    let string = lx.slice();
    if string.len() > 6 {
        return Err(LexErr::TooManyDigits);
    }

    u16::from_str_radix(string, 8).map_err(|e| match e.kind() {
        IntErrorKind::InvalidDigit => LexErr::InvalidOctal,
        IntErrorKind::PosOverflow  => LexErr::DoesNotFitU16,
        _ => LexErr::InvalidOctal,
    })
}
