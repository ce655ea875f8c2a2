//! Skipping whitespace and comments: a comment syntax described once, then
//! assembled into a skip-parser from the core algebra.

use crate::combinators::{choice, lazy, many_till, right, skip, skip_many, skip_some};
use crate::parser::Parser;
use crate::primitives::{any_char, literal, not_char};

/// A comment syntax: a line-comment marker and/or a block-comment pair,
/// which may nest. An empty string switches a form off.
#[derive(Clone, Debug, Default)]
pub struct CommentStyle {
    start: String,
    end: String,
    line: String,
    nested: bool,
}

impl CommentStyle {
    pub fn new(
        start: impl Into<String>,
        end: impl Into<String>,
        line: impl Into<String>,
        nested: bool,
    ) -> Self {
        CommentStyle {
            start: start.into(),
            end: end.into(),
            line: line.into(),
            nested,
        }
    }

    /// `//` line comments and non-nesting `/* */` blocks.
    pub fn c_style() -> Self {
        CommentStyle::new("/*", "*/", "//", false)
    }

    /// One or more units of whitespace or comment, results discarded.
    /// `space` is the atomic whitespace parser to build on; a line comment
    /// runs to (but not through) the newline, and a block comment runs
    /// from `start` to `end`, recursing when the style nests.
    pub fn skip_some_space(&self, space: Parser<String>) -> Parser<()> {
        let mut units = vec![skip(space)];
        if !self.line.is_empty() {
            units.push(right(
                literal(self.line.clone()),
                skip_many(not_char('\n')),
            ));
        }
        if !self.start.is_empty() {
            units.push(block_comment(
                self.start.clone(),
                self.end.clone(),
                self.nested,
            ));
        }
        skip_some(choice(units))
    }
}

fn block_comment(start: String, end: String, nested: bool) -> Parser<()> {
    // Deferred so the nested case can refer back to itself; each level of
    // nesting builds one more parser, at parse time.
    lazy(move || {
        let unit = if nested {
            choice(vec![
                block_comment(start.clone(), end.clone(), true),
                skip(any_char()),
            ])
        } else {
            skip(any_char())
        };
        skip(right(
            literal(start.clone()),
            many_till(unit, literal(end.clone())),
        ))
    })
}
