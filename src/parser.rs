//! This module is responsible for declaring the parser type, and ways to
//! create parsers. The primitives and the combinator algebra are both built
//! on what is defined here.

use crate::cursor::Cursor;
use crate::error::ParseError;
use std::fmt;
use std::rc::Rc;

/// What running a parser yields: a value, or the failure that stopped it.
pub type ParseResult<T> = Result<T, ParseError>;

/// A parser is a named function of the cursor. On success it advances the
/// cursor and returns a value. On failure it returns a [`ParseError`];
/// whether anything stays consumed is part of each combinator's contract.
///
/// Parsers are plain values: cloning shares the underlying closure, and a
/// parser holds no state of its own, so one parser can serve any number of
/// cursors.
pub struct Parser<T> {
    name: String,
    parse: Rc<dyn Fn(&mut Cursor) -> ParseResult<T>>,
}

impl<T> Clone for Parser<T> {
    fn clone(&self) -> Self {
        Parser {
            name: self.name.clone(),
            parse: Rc::clone(&self.parse),
        }
    }
}

impl<T> fmt::Debug for Parser<T> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("Parser").field("name", &self.name).finish()
    }
}

// How a parser is used

impl<T> Parser<T> {
    pub fn parse(&self, cursor: &mut Cursor) -> ParseResult<T> {
        (self.parse)(cursor)
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

// How parsers are made

impl<T> Parser<T> {
    pub fn from_fn(
        name: impl Into<String>,
        parse: impl Fn(&mut Cursor) -> ParseResult<T> + 'static,
    ) -> Self {
        Parser {
            name: name.into(),
            parse: Rc::new(parse),
        }
    }

    pub(crate) fn with_name(self, name: String) -> Self {
        Parser { name, ..self }
    }
}

impl<T: 'static> Parser<T> {
    /// Consumes nothing and returns a copy of `value`.
    pub fn ret(value: T) -> Self
    where
        T: Clone,
    {
        Parser::from_fn("Ret", move |_| Ok(value.clone()))
    }

    pub fn map<U: 'static>(self, f: impl Fn(T) -> U + 'static) -> Parser<U> {
        let name = format!("Map({})", self.name);
        Parser::from_fn(name, move |cursor| self.parse(cursor).map(&f))
    }

    pub fn and_then<U: 'static>(self, f: impl Fn(T) -> Parser<U> + 'static) -> Parser<U> {
        let name = format!("AndThen({})", self.name);
        Parser::from_fn(name, move |cursor| {
            let value = self.parse(cursor)?;
            f(value).parse(cursor)
        })
    }
}
