//! Tracking where we are inside a source text.

use derive_more::Display;
use std::rc::Rc;

/// A position in some source code.
#[derive(Clone, Copy, Debug, Display, PartialEq, Eq)]
#[display("{line}:{column}")]
pub struct Pos {
    /// Byte offset into the source. Starts at 0.
    pub offset: usize,
    /// Starts at 1.
    pub line: usize,
    /// Starts at 1. Counted in characters, not bytes.
    pub column: usize,
}

impl Pos {
    pub const fn start() -> Self {
        Pos {
            offset: 0,
            line: 1,
            column: 1,
        }
    }
}

impl Default for Pos {
    fn default() -> Self {
        Pos::start()
    }
}

/// The cursor of a single parse attempt: the source text, the name it goes
/// by in diagnostics, and the position reached so far. The source and name
/// are shared and read-only; the position is the only thing that moves.
#[derive(Clone, Debug)]
pub struct Cursor {
    source: Rc<str>,
    name: Rc<str>,
    pos: Pos,
}

impl Cursor {
    pub fn new(source: impl Into<Rc<str>>, name: impl Into<Rc<str>>) -> Self {
        Cursor {
            source: source.into(),
            name: name.into(),
            pos: Pos::start(),
        }
    }

    pub fn source(&self) -> &Rc<str> {
        &self.source
    }

    pub fn name(&self) -> &Rc<str> {
        &self.name
    }

    pub const fn pos(&self) -> Pos {
        self.pos
    }

    /// The part of the source that has not been consumed yet.
    pub fn rest(&self) -> &str {
        &self.source[self.pos.offset..]
    }

    /// The character at the current position, `None` past end of input.
    pub fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    /// The character `n` characters past the current position.
    pub fn peek_at(&self, n: usize) -> Option<char> {
        self.rest().chars().nth(n)
    }

    /// Move past `consumed`, keeping line and column in step with the
    /// offset. Call only after the match is confirmed; a failing parser
    /// must leave the cursor untouched.
    pub fn advance(&mut self, consumed: &str) {
        debug_assert!(self.rest().starts_with(consumed));
        self.pos.offset += consumed.len();
        for c in consumed.chars() {
            if c == '\n' {
                self.pos.line += 1;
                self.pos.column = 1;
            } else {
                self.pos.column += 1;
            }
        }
    }

    /// Snapshot of everything that can change during a parse. The source
    /// is immutable for the whole parse, so the position is the snapshot.
    pub const fn checkpoint(&self) -> Pos {
        self.pos
    }

    /// Rewind to an earlier [`checkpoint`](Cursor::checkpoint), discarding
    /// everything consumed since it was taken.
    pub fn restore(&mut self, checkpoint: Pos) {
        self.pos = checkpoint;
    }
}
