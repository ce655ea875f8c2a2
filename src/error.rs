//! This module is responsible for describing why a parse failed.

use crate::cursor::{Cursor, Pos};
use derive_more::Display;
use std::rc::Rc;

/// A parse failure: where it happened, what would have been accepted there,
/// and what was actually found.
///
/// Failures merge under the farthest-failure rule: the attempt that
/// consumed the most input is the one worth reporting, and competing
/// expectations at the same spot pool into one expected-set.
#[derive(Clone, Debug, Display, PartialEq, Eq)]
#[display("{}\n{}", self.describe(), self.show_line())]
pub struct ParseError {
    source: Rc<str>,
    name: Rc<str>,
    /// `None` only for the synthetic empty error, which has no position.
    pos: Option<Pos>,
    message: Option<String>,
    expected: Vec<String>,
    unexpected: Option<String>,
}

impl std::error::Error for ParseError {}

impl ParseError {
    pub fn new(
        cursor: &Cursor,
        message: Option<String>,
        expected: Vec<String>,
        unexpected: Option<String>,
    ) -> Self {
        ParseError {
            source: Rc::clone(cursor.source()),
            name: Rc::clone(cursor.name()),
            pos: Some(cursor.pos()),
            message,
            expected,
            unexpected,
        }
    }

    /// An error with no position at all. It loses every merge against a
    /// positioned error, which makes it a neutral starting value.
    pub fn empty(cursor: &Cursor) -> Self {
        ParseError {
            source: Rc::clone(cursor.source()),
            name: Rc::clone(cursor.name()),
            pos: None,
            message: Some("empty error".to_string()),
            expected: vec![],
            unexpected: None,
        }
    }

    pub const fn pos(&self) -> Option<Pos> {
        self.pos
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// The raw expected-set, in arrival order. Sorting and deduplication
    /// happen in [`describe`](ParseError::describe).
    pub fn expected(&self) -> &[String] {
        &self.expected
    }

    pub fn unexpected(&self) -> Option<&str> {
        self.unexpected.as_deref()
    }

    /// Same failure, different expected-set. This is what the labeling
    /// combinator uses to swap a rule's inner expectations for one name.
    pub fn with_expected(self, expected: Vec<String>) -> Self {
        ParseError { expected, ..self }
    }

    /// Keep the failure that made it farther; pool expectations on a tie,
    /// preferring the left-hand message and unexpected token. Errors from
    /// different sources must never meet here.
    pub fn merge(self, other: ParseError) -> ParseError {
        assert_eq!(
            self.name, other.name,
            "cannot merge parse errors from different sources"
        );

        // `None < Some(..)`, so the positionless error always loses.
        let own = self.pos.map(|p| p.offset);
        let rival = other.pos.map(|p| p.offset);
        if own > rival {
            return self;
        }
        if own < rival {
            return other;
        }

        let mut expected = self.expected;
        expected.extend(other.expected);
        ParseError {
            source: self.source,
            name: self.name,
            pos: self.pos,
            message: self.message.or(other.message),
            expected,
            unexpected: self.unexpected.or(other.unexpected),
        }
    }

    /// The one-line account of the failure. A literal message override
    /// wins verbatim; otherwise the expected-set is sorted, deduplicated
    /// and joined here, at display time.
    pub fn describe(&self) -> String {
        if let Some(message) = &self.message {
            return message.clone();
        }

        let mut expected: Vec<&str> = self.expected.iter().map(String::as_str).collect();
        expected.sort_unstable();
        expected.dedup();

        let mut out = match self.pos {
            Some(pos) => format!("{}:{}: ", self.name, pos.line),
            None => format!("{}: ", self.name),
        };
        match expected.as_slice() {
            [] => {
                out.push_str("unexpected ");
                out.push_str(self.unexpected.as_deref().unwrap_or("input"));
            }
            [only] => {
                out.push_str("expected ");
                out.push_str(only);
                if let Some(unexpected) = &self.unexpected {
                    out.push_str(", but found ");
                    out.push_str(unexpected);
                }
            }
            [init @ .., last] => {
                out.push_str("expected ");
                out.push_str(&init.join(", "));
                out.push_str(" and ");
                out.push_str(last);
                if let Some(unexpected) = &self.unexpected {
                    out.push_str(", but found ");
                    out.push_str(unexpected);
                }
            }
        }
        out
    }

    /// The failing line with a caret under the failing column. Long lines
    /// are windowed to 79 characters with the caret pinned 21 characters
    /// in; a position the source cannot account for renders a fixed
    /// placeholder.
    pub fn show_line(&self) -> String {
        const WIDTH: usize = 79;
        const LEAD: usize = 21;

        let not_found = || "<source not found>".to_string();
        let Some(pos) = self.pos else {
            return not_found();
        };
        if self.source.is_empty() {
            return not_found();
        }
        let Some(line) = self.source.split('\n').nth(pos.line - 1) else {
            return not_found();
        };
        if line.chars().count() + 1 < pos.column {
            return not_found();
        }

        if pos.column <= WIDTH {
            let shown: String = line.chars().take(WIDTH).collect();
            format!("{}\n{}^", shown, " ".repeat(pos.column - 1))
        } else {
            let shown: String = line.chars().skip(pos.column - LEAD).take(WIDTH).collect();
            format!("{}\n{}^", shown, " ".repeat(LEAD - 1))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SOURCE: &str = "abcdefghij";

    fn cursor_past(prefix: &str) -> Cursor {
        let mut cursor = Cursor::new(SOURCE, "<test>");
        cursor.advance(prefix);
        cursor
    }

    fn expecting(prefix: &str, labels: &[&str]) -> ParseError {
        let labels = labels.iter().map(|l| l.to_string()).collect();
        ParseError::new(&cursor_past(prefix), None, labels, None)
    }

    #[test]
    fn merge_keeps_the_farther_failure() {
        let near = expecting("abc", &["near"]);
        let far = expecting("abcdefg", &["far"]);
        let merged = near.clone().merge(far.clone());
        assert_eq!(merged.pos().unwrap().offset, 7);
        assert_eq!(merged.expected(), ["far"]);
        // Commutative in outcome.
        let merged = far.merge(near);
        assert_eq!(merged.pos().unwrap().offset, 7);
        assert_eq!(merged.expected(), ["far"]);
    }

    #[test]
    fn merge_pools_expectations_at_equal_offsets() {
        let a = expecting("abc", &["\"x\""]);
        let b = expecting("abc", &["\"y\"", "\"x\""]);
        let merged = a.merge(b);
        assert_eq!(merged.expected(), ["\"x\"", "\"y\"", "\"x\""]);
        assert_eq!(merged.describe(), "<test>:1: expected \"x\" and \"y\"");
    }

    #[test]
    fn merge_prefers_left_hand_unexpected() {
        let a = ParseError::new(&cursor_past("ab"), None, vec![], Some("left".into()));
        let b = ParseError::new(&cursor_past("ab"), None, vec![], Some("right".into()));
        assert_eq!(a.merge(b).unexpected(), Some("left"));
    }

    #[test]
    fn empty_error_loses_every_merge() {
        let empty = ParseError::empty(&cursor_past(""));
        let real = expecting("", &["\"a\""]);
        let merged = empty.merge(real);
        assert_eq!(merged.pos().unwrap().offset, 0);
        assert_eq!(merged.expected(), ["\"a\""]);
    }

    #[test]
    #[should_panic]
    fn merge_rejects_different_sources() {
        let a = ParseError::new(&Cursor::new("x", "a.txt"), None, vec![], None);
        let b = ParseError::new(&Cursor::new("x", "b.txt"), None, vec![], None);
        let _ = a.merge(b);
    }

    #[test]
    fn describe_without_expectations() {
        let err = ParseError::new(&cursor_past(""), None, vec![], Some("\"z\"".into()));
        assert_eq!(err.describe(), "<test>:1: unexpected \"z\"");
    }

    #[test]
    fn describe_single_expectation_with_found() {
        let err = ParseError::new(
            &cursor_past("a"),
            None,
            vec!["\"b\"".into()],
            Some("\"c\"".into()),
        );
        assert_eq!(err.describe(), "<test>:1: expected \"b\", but found \"c\"");
    }

    #[test]
    fn describe_joins_many_expectations() {
        let err = expecting("", &["<digit>", "\"b\"", "\"a\"", "\"b\""]);
        assert_eq!(err.describe(), "<test>:1: expected \"a\", \"b\" and <digit>");
    }

    #[test]
    fn describe_message_override_wins_verbatim() {
        let err = ParseError::new(
            &cursor_past("abc"),
            Some("mismatched bracket".into()),
            vec!["\"x\"".into()],
            None,
        );
        assert_eq!(err.describe(), "mismatched bracket");
    }

    #[test]
    fn show_line_points_at_the_column() {
        let mut cursor = Cursor::new("hello\nworld", "<test>");
        cursor.advance("hello\nwo");
        let err = ParseError::new(&cursor, None, vec![], None);
        assert_eq!(err.show_line(), "world\n  ^");
    }

    #[test]
    fn show_line_windows_long_lines() {
        let long = "a".repeat(100);
        let mut cursor = Cursor::new(long.as_str(), "<test>");
        cursor.advance(&long[..89]);
        let err = ParseError::new(&cursor, None, vec![], None);
        // Column 90: a 79-character window starting 20 characters earlier,
        // caret fixed at the 21st position. Only 31 characters remain.
        assert_eq!(err.show_line(), format!("{}\n{}^", "a".repeat(31), " ".repeat(20)));
    }

    #[test]
    fn show_line_for_positionless_error() {
        let err = ParseError::empty(&Cursor::new("anything", "<test>"));
        assert_eq!(err.show_line(), "<source not found>");
        assert_eq!(err.describe(), "empty error");
    }

    #[test]
    fn display_is_description_then_excerpt() {
        let err = ParseError::new(&cursor_past(""), None, vec!["\"x\"".into()], None);
        assert_eq!(err.to_string(), "<test>:1: expected \"x\"\nabcdefghij\n^");
    }
}
