//! Atomic recognizers. Each one either consumes input and returns a value,
//! or fails with the cursor exactly where it was, so the combinators above
//! them can treat "failed" and "consumed nothing" as the same observation.

use crate::combinators::named;
use crate::cursor::Cursor;
use crate::error::ParseError;
use crate::parser::Parser;
use regex::Regex;

fn quoted(text: &str) -> String {
    format!("{text:?}")
}

/// What the cursor is looking at, quoted for an error message.
fn found(cursor: &Cursor) -> String {
    match cursor.peek() {
        Some(c) => quoted(&c.to_string()),
        None => "end of file".to_string(),
    }
}

// Always-failing parsers, for grammar authors who need to raise their own
// failures at the current position.

/// Always fails, with full control over the error's parts.
pub fn error<T: 'static>(
    message: Option<String>,
    expected: Vec<String>,
    unexpected: Option<String>,
) -> Parser<T> {
    Parser::from_fn("Error", move |cursor| {
        Err(ParseError::new(
            cursor,
            message.clone(),
            expected.clone(),
            unexpected.clone(),
        ))
    })
}

/// Always fails with the given expected-set.
pub fn expected<T: 'static>(labels: Vec<String>, unexpected: Option<String>) -> Parser<T> {
    error(None, labels, unexpected).with_name("Expected".to_string())
}

/// Always fails with the positionless empty error.
pub fn empty<T: 'static>() -> Parser<T> {
    Parser::from_fn("Empty", |cursor| Err(ParseError::empty(cursor)))
}

// The recognizers proper

/// Matches `text` exactly and returns it.
pub fn literal(text: impl Into<String>) -> Parser<String> {
    let text = text.into();
    let label = quoted(&text);
    Parser::from_fn(label.clone(), move |cursor| {
        if cursor.rest().starts_with(text.as_str()) {
            cursor.advance(&text);
            Ok(text.clone())
        } else {
            let wanted = text.chars().count();
            let actual: String = cursor.rest().chars().take(wanted).collect();
            let unexpected = if actual.is_empty() {
                "end of file".to_string()
            } else {
                quoted(&actual)
            };
            Err(ParseError::new(cursor, None, vec![label.clone()], Some(unexpected)))
        }
    })
}

/// Consumes one character for which `pred` holds. `label` is the name that
/// goes into the expected-set when it does not.
pub fn satisfy(pred: impl Fn(char) -> bool + 'static, label: impl Into<String>) -> Parser<char> {
    let label = label.into();
    Parser::from_fn(label.clone(), move |cursor| match cursor.peek() {
        Some(c) if pred(c) => {
            cursor.advance(c.encode_utf8(&mut [0; 4]));
            Ok(c)
        }
        _ => {
            let unexpected = found(cursor);
            Err(ParseError::new(cursor, None, vec![label.clone()], Some(unexpected)))
        }
    })
}

/// Matches `pattern` anchored at the cursor and returns the matched text.
/// Inline flags such as `(?i)` apply. An invalid pattern is caller misuse
/// and panics at construction.
pub fn regex(pattern: &str) -> Parser<String> {
    let anchored = Regex::new(&format!("^(?:{pattern})"))
        .unwrap_or_else(|e| panic!("invalid regular expression /{pattern}/: {e}"));
    let label = format!("/{pattern}/");
    Parser::from_fn(label.clone(), move |cursor| {
        let matched = anchored.find(cursor.rest()).map(|m| m.as_str().to_string());
        match matched {
            Some(text) => {
                cursor.advance(&text);
                Ok(text)
            }
            None => Err(ParseError::new(cursor, None, vec![label.clone()], None)),
        }
    })
}

/// Consumes any single character.
pub fn any_char() -> Parser<char> {
    Parser::from_fn("AnyChar", |cursor| match cursor.peek() {
        Some(c) => {
            cursor.advance(c.encode_utf8(&mut [0; 4]));
            Ok(c)
        }
        None => Err(ParseError::new(
            cursor,
            None,
            vec!["any character".to_string()],
            Some("end of file".to_string()),
        )),
    })
}

/// Consumes any single character except `forbidden`.
pub fn not_char(forbidden: char) -> Parser<char> {
    let shown = quoted(&forbidden.to_string());
    let name = format!("NotChar({shown})");
    Parser::from_fn(name, move |cursor| match cursor.peek() {
        Some(c) if c == forbidden => {
            Err(ParseError::new(cursor, None, vec![], Some(shown.clone())))
        }
        Some(c) => {
            cursor.advance(c.encode_utf8(&mut [0; 4]));
            Ok(c)
        }
        None => Err(ParseError::new(
            cursor,
            None,
            vec![format!("not {shown}")],
            Some("end of file".to_string()),
        )),
    })
}

// Character classes, all `satisfy` under a bracket-angled label.

macro_rules! char_class {
    ($(#[$doc:meta])* $name:ident, $label:literal, $pred:expr) => {
        $(#[$doc])*
        pub fn $name() -> Parser<char> {
            satisfy($pred, $label)
        }
    };
}

char_class!(digit, "<digit>", |c: char| c.is_ascii_digit());
char_class!(hex_digit, "<hex digit>", |c: char| c.is_ascii_hexdigit());
char_class!(oct_digit, "<octal digit>", |c: char| ('0'..='7').contains(&c));
char_class!(lower, "<lowercase letter>", |c: char| c.is_ascii_lowercase());
char_class!(upper, "<uppercase letter>", |c: char| c.is_ascii_uppercase());
char_class!(letter, "<letter>", |c: char| c.is_ascii_alphabetic());
char_class!(
    alpha_num,
    "<letter or digit>",
    |c: char| c.is_ascii_alphanumeric()
);

// Whitespace

/// A single whitespace character.
pub fn space() -> Parser<String> {
    named("space", regex(r"\s"))
}

/// One or more whitespace characters.
pub fn spaces() -> Parser<String> {
    named("spaces", regex(r"\s+"))
}

pub fn newline() -> Parser<String> {
    literal("\n")
}

pub fn tab() -> Parser<String> {
    literal("\t")
}

#[cfg(test)]
mod tests {
    use super::*;

    macro_rules! accepts {
        (
            name = $name:ident,
            parser = $parser:expr,
            input = $input:literal,
            value = $value:expr,
            offset = $offset:expr,
        ) => {
            #[test]
            fn $name() {
                let mut cursor = Cursor::new($input, "<test>");
                assert_eq!($parser.parse(&mut cursor), Ok($value));
                assert_eq!(cursor.pos().offset, $offset);
            }
        };
    }

    accepts! {
        name = literal_matches_and_advances,
        parser = literal("module"),
        input = "module foo",
        value = "module".to_string(),
        offset = 6,
    }

    accepts! {
        name = regex_takes_the_full_anchored_match,
        parser = regex("[a-z]+"),
        input = "abc123",
        value = "abc".to_string(),
        offset = 3,
    }

    accepts! {
        name = any_char_consumes_one,
        parser = any_char(),
        input = "xy",
        value = 'x',
        offset = 1,
    }

    accepts! {
        name = not_char_consumes_anything_else,
        parser = not_char('\n'),
        input = "a\n",
        value = 'a',
        offset = 1,
    }

    accepts! {
        name = spaces_take_a_whole_run,
        parser = spaces(),
        input = " \t\n x",
        value = " \t\n ".to_string(),
        offset = 4,
    }

    #[test]
    fn literal_fails_without_consuming() {
        let mut cursor = Cursor::new("axc", "<test>");
        let err = literal("ab").parse(&mut cursor).unwrap_err();
        assert_eq!(cursor.pos().offset, 0);
        assert_eq!(err.expected(), ["\"ab\""]);
        assert_eq!(err.unexpected(), Some("\"ax\""));
    }

    #[test]
    fn literal_at_end_of_file() {
        let mut cursor = Cursor::new("", "<test>");
        let err = literal("ab").parse(&mut cursor).unwrap_err();
        assert_eq!(err.unexpected(), Some("end of file"));
    }

    #[test]
    fn failure_is_idempotent() {
        let mut cursor = Cursor::new("b", "<test>");
        let parser = literal("a");
        let first = parser.parse(&mut cursor).unwrap_err();
        let second = parser.parse(&mut cursor).unwrap_err();
        assert_eq!(first, second);
        assert_eq!(cursor.pos().offset, 0);
    }

    #[test]
    fn satisfy_labels_its_expectation() {
        let mut cursor = Cursor::new("x7", "<test>");
        let err = digit().parse(&mut cursor).unwrap_err();
        assert_eq!(err.expected(), ["<digit>"]);
        assert_eq!(err.unexpected(), Some("\"x\""));
        assert_eq!(cursor.pos().offset, 0);
    }

    #[test]
    fn regex_is_anchored_at_the_cursor() {
        let mut cursor = Cursor::new("ab", "<test>");
        let err = regex("b").parse(&mut cursor).unwrap_err();
        assert_eq!(err.expected(), ["/b/"]);
        assert_eq!(cursor.pos().offset, 0);
    }

    #[test]
    fn any_char_reports_end_of_file() {
        let mut cursor = Cursor::new("", "<test>");
        let err = any_char().parse(&mut cursor).unwrap_err();
        assert_eq!(err.expected(), ["any character"]);
        assert_eq!(err.unexpected(), Some("end of file"));
    }

    #[test]
    fn not_char_rejects_the_forbidden_character() {
        let mut cursor = Cursor::new("\nx", "<test>");
        let err = not_char('\n').parse(&mut cursor).unwrap_err();
        assert!(err.expected().is_empty());
        assert_eq!(err.unexpected(), Some("\"\\n\""));
        assert_eq!(cursor.pos().offset, 0);
    }

    #[test]
    fn not_char_rejects_end_of_file() {
        let mut cursor = Cursor::new("", "<test>");
        let err = not_char('x').parse(&mut cursor).unwrap_err();
        assert_eq!(err.expected(), ["not \"x\""]);
        assert_eq!(err.unexpected(), Some("end of file"));
    }

    #[test]
    fn character_classes_accept_their_ranges() {
        for (parser, yes, no) in [
            (digit(), '5', 'a'),
            (hex_digit(), 'F', 'g'),
            (oct_digit(), '7', '8'),
            (lower(), 'q', 'Q'),
            (upper(), 'Q', 'q'),
            (letter(), 'z', '1'),
            (alpha_num(), '1', '_'),
        ] {
            let mut cursor = Cursor::new(yes.to_string(), "<test>");
            assert_eq!(parser.parse(&mut cursor), Ok(yes), "{}", parser.name());
            let mut cursor = Cursor::new(no.to_string(), "<test>");
            assert!(parser.parse(&mut cursor).is_err(), "{}", parser.name());
        }
    }

    #[test]
    fn expected_fails_at_the_current_position() {
        let mut cursor = Cursor::new("abc", "<test>");
        cursor.advance("ab");
        let err = expected::<char>(vec!["<thing>".into()], None)
            .parse(&mut cursor)
            .unwrap_err();
        assert_eq!(err.pos().unwrap().offset, 2);
        assert_eq!(err.expected(), ["<thing>"]);
    }

    #[test]
    fn error_overrides_the_message() {
        let mut cursor = Cursor::new("x", "<test>");
        let err = error::<()>(Some("boom".into()), vec![], None)
            .parse(&mut cursor)
            .unwrap_err();
        assert_eq!(err.describe(), "boom");
    }

    #[test]
    #[should_panic]
    fn regex_rejects_invalid_patterns() {
        let _ = regex("(unclosed");
    }
}
