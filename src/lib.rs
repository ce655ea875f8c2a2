//! A small parser-combinator engine: compose primitives (literal text,
//! character classes, regular expressions) with combinators (sequencing,
//! choice, repetition, separators) into grammars that run over a positioned
//! cursor and fail with mergeable, caret-annotated errors.

/// The combinator algebra: repetition, choice, sequencing, lookahead.
pub mod combinators;
pub mod comment;
/// Positions and the cursor a parse moves through a source text.
pub mod cursor;
pub mod error;
pub mod parser;
pub mod primitives;


use cursor::Cursor;
use parser::{ParseResult, Parser};

/// Runs `parser` over `source` from the very beginning, under the default
/// source name.
pub fn parse_string<T>(parser: &Parser<T>, source: &str) -> ParseResult<T> {
    parse_string_named(parser, source, "<string>")
}

/// Runs `parser` over `source` with `name` attached to every position and
/// error produced.
pub fn parse_string_named<T>(parser: &Parser<T>, source: &str, name: &str) -> ParseResult<T> {
    let mut cursor = Cursor::new(source, name);
    parser.parse(&mut cursor)
}

// Re-export
pub mod prelude {
    pub use super::combinators::{
        at_least, at_most, between, choice, count, end_by, end_by1, get, lazy, left, many,
        many_till, named, not_followed_by, option, optional, right, sep_by, sep_by1, sep_end_by,
        sep_end_by1, seq, sequence, skip, skip_at_least, skip_at_most, skip_count, skip_many,
        skip_some, skip_times, some, times, wrap,
    };
    pub use super::comment::CommentStyle;
    pub use super::cursor::{Cursor, Pos};
    pub use super::error::ParseError;
    pub use super::parser::{ParseResult, Parser};
    pub use super::primitives::{
        alpha_num, any_char, digit, empty, error, expected, hex_digit, letter, literal, lower,
        newline, not_char, oct_digit, regex, satisfy, space, spaces, tab, upper,
    };
    pub use super::{parse_string, parse_string_named};
}
