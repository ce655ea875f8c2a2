//! The combinator algebra: everything that sequences, repeats, chooses
//! between, or looks ahead over other parsers. Backtracking is a checkpoint
//! taken before an attempt and restored after a failure; which failures a
//! combinator absorbs and which it propagates is spelled out per function.

use crate::cursor::Pos;
use crate::error::ParseError;
use crate::parser::Parser;
use once_cell::unsync::OnceCell;
use std::fmt;

// Repetition

/// The workhorse behind every quantity combinator: between `min` and `max`
/// repetitions of `parser`, collected in order.
///
/// Every attempt starts from a checkpoint. A failure before `min` successes
/// propagates as-is, with the cursor wherever the failing attempt left it.
/// A failure after that rewinds to the last success and ends the loop
/// normally.
pub fn count<T: 'static>(min: usize, max: usize, parser: Parser<T>) -> Parser<Vec<T>> {
    let name = format!("Count({min}, {max}, {})", parser.name());
    Parser::from_fn(name, move |cursor| {
        let mut results = Vec::new();
        let mut save = cursor.checkpoint();
        while results.len() < max {
            match parser.parse(cursor) {
                Ok(value) => {
                    results.push(value);
                    save = cursor.checkpoint();
                }
                Err(e) if results.len() < min => return Err(e),
                Err(_) => {
                    cursor.restore(save);
                    break;
                }
            }
        }
        Ok(results)
    })
}

/// Zero or more.
pub fn many<T: 'static>(parser: Parser<T>) -> Parser<Vec<T>> {
    let name = format!("Many({})", parser.name());
    count(0, usize::MAX, parser).with_name(name)
}

/// One or more.
pub fn some<T: 'static>(parser: Parser<T>) -> Parser<Vec<T>> {
    let name = format!("Some({})", parser.name());
    count(1, usize::MAX, parser).with_name(name)
}

pub fn at_least<T: 'static>(min: usize, parser: Parser<T>) -> Parser<Vec<T>> {
    count(min, usize::MAX, parser)
}

pub fn at_most<T: 'static>(max: usize, parser: Parser<T>) -> Parser<Vec<T>> {
    count(0, max, parser)
}

/// Exactly `n` repetitions.
pub fn times<T: 'static>(n: usize, parser: Parser<T>) -> Parser<Vec<T>> {
    count(n, n, parser)
}

// The same family with the results thrown away

/// Runs `parser` and discards the value.
pub fn skip<T: 'static>(parser: Parser<T>) -> Parser<()> {
    let name = format!("Skip({})", parser.name());
    parser.map(|_| ()).with_name(name)
}

/// [`count`] without collecting anything.
pub fn skip_count<T: 'static>(min: usize, max: usize, parser: Parser<T>) -> Parser<()> {
    let name = format!("SkipCount({min}, {max}, {})", parser.name());
    Parser::from_fn(name, move |cursor| {
        let mut done = 0;
        let mut save = cursor.checkpoint();
        while done < max {
            match parser.parse(cursor) {
                Ok(_) => {
                    done += 1;
                    save = cursor.checkpoint();
                }
                Err(e) if done < min => return Err(e),
                Err(_) => {
                    cursor.restore(save);
                    break;
                }
            }
        }
        Ok(())
    })
}

pub fn skip_many<T: 'static>(parser: Parser<T>) -> Parser<()> {
    let name = format!("SkipMany({})", parser.name());
    skip_count(0, usize::MAX, parser).with_name(name)
}

pub fn skip_some<T: 'static>(parser: Parser<T>) -> Parser<()> {
    let name = format!("SkipSome({})", parser.name());
    skip_count(1, usize::MAX, parser).with_name(name)
}

pub fn skip_at_least<T: 'static>(min: usize, parser: Parser<T>) -> Parser<()> {
    skip_count(min, usize::MAX, parser)
}

pub fn skip_at_most<T: 'static>(max: usize, parser: Parser<T>) -> Parser<()> {
    skip_count(0, max, parser)
}

pub fn skip_times<T: 'static>(n: usize, parser: Parser<T>) -> Parser<()> {
    skip_count(n, n, parser)
}

// Choice and optionality

/// Attempts `parser`; on failure rewinds and yields `default` instead.
/// This is the one single-attempt combinator that absorbs a failure.
pub fn option<T: Clone + 'static>(default: T, parser: Parser<T>) -> Parser<T> {
    let name = format!("Option({})", parser.name());
    Parser::from_fn(name, move |cursor| {
        let save = cursor.checkpoint();
        match parser.parse(cursor) {
            Ok(value) => Ok(value),
            Err(_) => {
                cursor.restore(save);
                Ok(default.clone())
            }
        }
    })
}

/// [`option`] with nothing as the default.
pub fn optional<T: 'static>(parser: Parser<T>) -> Parser<Option<T>> {
    let name = format!("Optional({})", parser.name());
    Parser::from_fn(name, move |cursor| {
        let save = cursor.checkpoint();
        match parser.parse(cursor) {
            Ok(value) => Ok(Some(value)),
            Err(_) => {
                cursor.restore(save);
                Ok(None)
            }
        }
    })
}

/// Tries each alternative in turn from the same starting point and returns
/// the first success. The cursor is rewound before every attempt and again
/// on overall failure, so alternatives do not have to be failure-atomic.
/// When everything fails, the failures merge under the farthest-failure
/// rule and the merged error is returned.
pub fn choice<T: 'static>(alternatives: Vec<Parser<T>>) -> Parser<T> {
    assert!(!alternatives.is_empty(), "choice requires at least one alternative");
    let name = format!(
        "Choice({})",
        alternatives.iter().map(|p| p.name()).collect::<Vec<_>>().join(" | ")
    );
    Parser::from_fn(name, move |cursor| {
        let save = cursor.checkpoint();
        let mut merged: Option<ParseError> = None;
        for alternative in &alternatives {
            cursor.restore(save);
            match alternative.parse(cursor) {
                Ok(value) => return Ok(value),
                Err(e) => {
                    merged = Some(match merged.take() {
                        Some(previous) => previous.merge(e),
                        None => e,
                    });
                }
            }
        }
        cursor.restore(save);
        match merged {
            Some(e) => Err(e),
            None => unreachable!("choice requires at least one alternative"),
        }
    })
}

// Sequencing and projections

/// Runs each parser in turn and collects the results. No backtracking: a
/// failure at step k leaves everything steps 1..k consumed, so the error
/// points at the farthest position reached.
pub fn sequence<T: 'static>(parsers: Vec<Parser<T>>) -> Parser<Vec<T>> {
    let name = format!(
        "Sequence({})",
        parsers.iter().map(|p| p.name()).collect::<Vec<_>>().join(", ")
    );
    Parser::from_fn(name, move |cursor| {
        let mut results = Vec::with_capacity(parsers.len());
        for parser in &parsers {
            results.push(parser.parse(cursor)?);
        }
        Ok(results)
    })
}

/// [`sequence`], then hand the results to `combine` along with the
/// position the sequence started from.
pub fn seq<T: 'static, U: 'static>(
    parsers: Vec<Parser<T>>,
    combine: impl Fn(Pos, Vec<T>) -> U + 'static,
) -> Parser<U> {
    let inner = sequence(parsers);
    let name = format!("Seq({})", inner.name());
    Parser::from_fn(name, move |cursor| {
        let start = cursor.checkpoint();
        let results = inner.parse(cursor)?;
        Ok(combine(start, results))
    })
}

/// Projection of [`sequence`] keeping only the `n`-th result.
pub fn get<T: 'static>(n: usize, parsers: Vec<Parser<T>>) -> Parser<T> {
    assert!(
        n < parsers.len(),
        "get: index {n} out of range for {} parsers",
        parsers.len()
    );
    let name = format!(
        "Get({n}, {})",
        parsers.iter().map(|p| p.name()).collect::<Vec<_>>().join(", ")
    );
    seq(parsers, move |_, mut results| results.swap_remove(n)).with_name(name)
}

/// Both parsers in order, keeping the first result.
pub fn left<A: 'static, B: 'static>(a: Parser<A>, b: Parser<B>) -> Parser<A> {
    let name = format!("Left({}, {})", a.name(), b.name());
    Parser::from_fn(name, move |cursor| {
        let value = a.parse(cursor)?;
        b.parse(cursor)?;
        Ok(value)
    })
}

/// Both parsers in order, keeping the last result.
pub fn right<A: 'static, B: 'static>(a: Parser<A>, b: Parser<B>) -> Parser<B> {
    let name = format!("Right({}, {})", a.name(), b.name());
    Parser::from_fn(name, move |cursor| {
        a.parse(cursor)?;
        b.parse(cursor)
    })
}

/// The middle of three parsers; the brackets are thrown away.
pub fn between<A: 'static, T: 'static, B: 'static>(
    open: Parser<A>,
    parser: Parser<T>,
    close: Parser<B>,
) -> Parser<T> {
    let name = format!("Between({}, {}, {})", open.name(), parser.name(), close.name());
    Parser::from_fn(name, move |cursor| {
        open.parse(cursor)?;
        let value = parser.parse(cursor)?;
        close.parse(cursor)?;
        Ok(value)
    })
}

// Separators and terminators

/// One value, then any number of (separator, value) pairs. A separator
/// that is not followed by a value is rewound and left unconsumed.
pub fn sep_by1<T: 'static, S: 'static>(parser: Parser<T>, separator: Parser<S>) -> Parser<Vec<T>> {
    let name = format!("SepBy1({}, {})", parser.name(), separator.name());
    Parser::from_fn(name, move |cursor| {
        let mut results = vec![parser.parse(cursor)?];
        loop {
            let save = cursor.checkpoint();
            let next = separator.parse(cursor).and_then(|_| parser.parse(cursor));
            match next {
                Ok(value) => results.push(value),
                Err(_) => {
                    cursor.restore(save);
                    return Ok(results);
                }
            }
        }
    })
}

/// Like [`sep_by1`], but an empty list is fine too.
pub fn sep_by<T: 'static, S: 'static>(parser: Parser<T>, separator: Parser<S>) -> Parser<Vec<T>> {
    let inner = sep_by1(parser, separator);
    let name = format!("SepBy({})", inner.name());
    Parser::from_fn(name, move |cursor| {
        let save = cursor.checkpoint();
        match inner.parse(cursor) {
            Ok(results) => Ok(results),
            Err(_) => {
                cursor.restore(save);
                Ok(Vec::new())
            }
        }
    })
}

/// One or more values, each followed by `end`.
pub fn end_by1<T: 'static, E: 'static>(parser: Parser<T>, end: Parser<E>) -> Parser<Vec<T>> {
    let name = format!("EndBy1({}, {})", parser.name(), end.name());
    some(left(parser, end)).with_name(name)
}

/// Zero or more values, each followed by `end`.
pub fn end_by<T: 'static, E: 'static>(parser: Parser<T>, end: Parser<E>) -> Parser<Vec<T>> {
    let name = format!("EndBy({}, {})", parser.name(), end.name());
    many(left(parser, end)).with_name(name)
}

/// [`sep_by1`] tolerating one trailing separator.
pub fn sep_end_by1<T: 'static, S: 'static>(
    parser: Parser<T>,
    separator: Parser<S>,
) -> Parser<Vec<T>> {
    let name = format!("SepEndBy1({}, {})", parser.name(), separator.name());
    left(sep_by1(parser, separator.clone()), optional(separator)).with_name(name)
}

/// [`sep_end_by1`], but an empty list is fine too.
pub fn sep_end_by<T: 'static, S: 'static>(
    parser: Parser<T>,
    separator: Parser<S>,
) -> Parser<Vec<T>> {
    let inner = sep_end_by1(parser, separator);
    let name = format!("SepEndBy({})", inner.name());
    Parser::from_fn(name, move |cursor| {
        let save = cursor.checkpoint();
        match inner.parse(cursor) {
            Ok(results) => Ok(results),
            Err(_) => {
                cursor.restore(save);
                Ok(Vec::new())
            }
        }
    })
}

// Lookahead

/// Negative lookahead: succeeds exactly when `parser` fails, consuming
/// nothing either way. The failure carries what `parser` matched as the
/// unexpected token, positioned where the lookahead began.
pub fn not_followed_by<T: fmt::Debug + 'static>(parser: Parser<T>) -> Parser<()> {
    let name = format!("NotFollowedBy({})", parser.name());
    Parser::from_fn(name, move |cursor| {
        let save = cursor.checkpoint();
        match parser.parse(cursor) {
            Ok(value) => {
                cursor.restore(save);
                Err(ParseError::new(cursor, None, vec![], Some(format!("{value:?}"))))
            }
            Err(_) => {
                cursor.restore(save);
                Ok(())
            }
        }
    })
}

/// Zero or more `parser` until `end` matches. Each round tries `end` from
/// a checkpoint; a failed try is rewound, and when `end` finally matches
/// it stays consumed. `parser` failing before `end` ever matches
/// propagates.
pub fn many_till<T: 'static, E: 'static>(parser: Parser<T>, end: Parser<E>) -> Parser<Vec<T>> {
    let name = format!("ManyTill({}, {})", parser.name(), end.name());
    Parser::from_fn(name, move |cursor| {
        let mut results = Vec::new();
        loop {
            let save = cursor.checkpoint();
            match end.parse(cursor) {
                Ok(_) => return Ok(results),
                Err(_) => cursor.restore(save),
            }
            results.push(parser.parse(cursor)?);
        }
    })
}

// Deferred construction and labeling

/// Defers building the parser until it first runs, then keeps it. This is
/// what lets mutually-recursive rules be defined without recursing forever
/// at construction time.
pub fn lazy<T: 'static>(thunk: impl Fn() -> Parser<T> + 'static) -> Parser<T> {
    let cell: OnceCell<Parser<T>> = OnceCell::new();
    Parser::from_fn("Lazy", move |cursor| cell.get_or_init(&thunk).parse(cursor))
}

/// Like [`lazy`] but re-evaluates the thunk on every run, for rules that
/// must pick up a fresh definition each time.
pub fn wrap<T: 'static>(thunk: impl Fn() -> Parser<T> + 'static) -> Parser<T> {
    Parser::from_fn("Wrap", move |cursor| thunk().parse(cursor))
}

/// Gives a composite rule one human-readable name: a failure coming out of
/// `parser` keeps its position, message and unexpected token, but its
/// expected-set becomes just `label`.
pub fn named<T: 'static>(label: impl Into<String>, parser: Parser<T>) -> Parser<T> {
    let label: String = label.into();
    let name = label.clone();
    Parser::from_fn(name, move |cursor| {
        parser
            .parse(cursor)
            .map_err(|e| e.with_expected(vec![label.clone()]))
    })
}
