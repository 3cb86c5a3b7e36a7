//! Lenient event scanner.
//!
//! [`scan`] recognizes exactly one unit starting at the cursor and returns
//! its event. The scanner keeps no state between calls - a position and the
//! bytes are all it needs - so a session can rerun it from the last committed
//! position whenever more input arrives.
//!
//! Recovery policy: every malformed construct degrades to either a
//! best-effort event or a literal Text event, and every call that sees at
//! least one byte consumes at least one byte. Nothing is ever discarded
//! wholesale.
//!
//! | Input after `<`  | Unit                      | Event                         |
//! |------------------|---------------------------|-------------------------------|
//! | `/`              | closing tag               | `ElementEnd`                  |
//! | `!--`            | comment                   | `Comment`                     |
//! | `!` (other)      | declaration               | `Text` with the literal       |
//! | `?`              | processing instruction    | `ProcessingInstruction`       |
//! | anything else    | opening tag               | `ElementStart`                |
//! | end of input     | lone angle bracket        | `Text("<")`                   |

use crate::cursor::{is_whitespace, Cursor};
use crate::error::{ErrorCode, ParseError};
use crate::event::{Attributes, Event};
use crate::span::{Location, Span};

/// One scanned unit: the event plus the error recovered while reading it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Scanned {
    pub event: Event,
    pub error: Option<ParseError>,
}

impl Scanned {
    fn ok(event: Event) -> Self {
        Self { event, error: None }
    }

    fn with_error(event: Event, error: Option<ParseError>) -> Self {
        Self { event, error }
    }
}

/// Kind of unit, decided from the bytes right after `<`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Unit {
    CloseTag,
    Comment,
    Declaration,
    ProcessingInstruction,
    OpenTag,
    LoneAngle,
}

/// Scan one unit. Returns `None` only when no bytes remain.
pub fn scan(cursor: &mut Cursor<'_>) -> Option<Scanned> {
    let start = cursor.location();
    if cursor.peek()? != b'<' {
        let content = cursor.read_until_byte(b'<');
        return Some(Scanned::ok(Event::Text {
            content: lossy(content),
            span: span_from(start, cursor),
        }));
    }

    cursor.advance();
    let scanned = match classify(cursor) {
        Unit::CloseTag => scan_close_tag(cursor, start),
        Unit::Comment => scan_comment(cursor, start),
        Unit::Declaration => scan_declaration(cursor, start),
        Unit::ProcessingInstruction => scan_processing_instruction(cursor, start),
        Unit::OpenTag => scan_open_tag(cursor, start),
        Unit::LoneAngle => Scanned::ok(Event::Text {
            content: "<".to_string(),
            span: span_from(start, cursor),
        }),
    };
    Some(scanned)
}

/// Scan a complete input in one pass, with no session.
///
/// Returns every event and the first error in document order.
pub fn scan_all(input: &[u8]) -> (Vec<Event>, Option<ParseError>) {
    let mut cursor = Cursor::new(input);
    let mut events = Vec::new();
    let mut first_error = None;
    while let Some(Scanned { event, error }) = scan(&mut cursor) {
        if first_error.is_none() {
            first_error = error;
        }
        events.push(event);
    }
    (events, first_error)
}

/// Classify the unit after `<` and consume its opener.
fn classify(cursor: &mut Cursor<'_>) -> Unit {
    match cursor.peek() {
        None => Unit::LoneAngle,
        Some(b'/') => {
            cursor.advance();
            Unit::CloseTag
        }
        Some(b'!') => {
            cursor.advance();
            if cursor.starts_with(b"--") {
                cursor.advance_by(2);
                Unit::Comment
            } else {
                Unit::Declaration
            }
        }
        Some(b'?') => {
            cursor.advance();
            Unit::ProcessingInstruction
        }
        Some(_) => Unit::OpenTag,
    }
}

fn scan_close_tag(cursor: &mut Cursor<'_>, start: Location) -> Scanned {
    let name = match cursor.read_name() {
        Ok(name) => lossy(name),
        Err(code) => return name_error(cursor, start, code),
    };

    // Anything up to `>` is ignored, attributes included.
    cursor.read_until_byte(b'>');
    cursor.eat(b'>');

    Scanned::ok(Event::ElementEnd {
        name,
        span: span_from(start, cursor),
    })
}

fn scan_comment(cursor: &mut Cursor<'_>, start: Location) -> Scanned {
    let (body, error) = match cursor.read_until(b"-->") {
        Ok(body) => (body, None),
        Err(unterminated) => {
            let partial = lossy(unterminated.partial);
            let error = ParseError::new(ErrorCode::UnterminatedComment, start, partial);
            (unterminated.partial, Some(error))
        }
    };

    Scanned::with_error(
        Event::Comment {
            content: lossy(body),
            span: span_from(start, cursor),
        },
        error,
    )
}

fn scan_declaration(cursor: &mut Cursor<'_>, start: Location) -> Scanned {
    cursor.read_until_byte(b'>');
    cursor.eat(b'>');

    Scanned::ok(Event::Text {
        content: lossy(cursor.consumed_since(start.offset)),
        span: span_from(start, cursor),
    })
}

fn scan_processing_instruction(cursor: &mut Cursor<'_>, start: Location) -> Scanned {
    let target = match cursor.read_name() {
        Ok(target) => lossy(target),
        Err(code) => return name_error(cursor, start, code),
    };

    let (data, error) = match cursor.read_until(b"?>") {
        Ok(data) => (data, None),
        Err(unterminated) => {
            let error = ParseError::new(
                ErrorCode::UnterminatedProcessingInstruction,
                start,
                lossy(unterminated.partial),
            );
            (unterminated.partial, Some(error))
        }
    };

    Scanned::with_error(
        Event::ProcessingInstruction {
            target,
            data: lossy(data).trim().to_string(),
            span: span_from(start, cursor),
        },
        error,
    )
}

fn scan_open_tag(cursor: &mut Cursor<'_>, start: Location) -> Scanned {
    let name = match cursor.read_name() {
        Ok(name) => lossy(name),
        Err(code) => return name_error(cursor, start, code),
    };

    let mut attributes = Attributes::new();
    let mut error = None;

    while let Some(byte) = cursor.peek() {
        if byte == b'>' || byte == b'/' {
            break;
        }
        cursor.skip_whitespace();
        if matches!(cursor.peek(), None | Some(b'>') | Some(b'/')) {
            break;
        }
        // A malformed attribute ends the attribute list; whatever is left
        // gets rescanned as content by the next step.
        let Some(attribute) = scan_attribute(cursor) else {
            break;
        };
        if error.is_none() {
            error = attribute.error;
        }
        attributes.insert(attribute.name, attribute.value);
    }

    let self_closing = cursor.eat(b'/');
    cursor.eat(b'>');

    Scanned::with_error(
        Event::ElementStart {
            name,
            attributes,
            self_closing,
            span: span_from(start, cursor),
        },
        error,
    )
}

struct ScannedAttribute {
    name: String,
    value: String,
    error: Option<ParseError>,
}

/// `name`, `name=value`, `name="value"` or `name='value'`.
///
/// Returns `None` when no attribute name can be read.
fn scan_attribute(cursor: &mut Cursor<'_>) -> Option<ScannedAttribute> {
    let name = lossy(cursor.read_name().ok()?);

    cursor.skip_whitespace();
    if !cursor.eat(b'=') {
        return Some(ScannedAttribute {
            name,
            value: String::new(),
            error: None,
        });
    }
    cursor.skip_whitespace();

    let (value, error) = match cursor.peek() {
        None => (String::new(), None),
        Some(quote @ (b'"' | b'\'')) => {
            let opened_at = cursor.location();
            cursor.advance();
            match cursor.read_until(&[quote]) {
                Ok(value) => (lossy(value), None),
                Err(unterminated) => {
                    let value = lossy(unterminated.partial);
                    let error = ParseError::new(
                        ErrorCode::UnterminatedAttributeValue,
                        opened_at,
                        value.clone(),
                    );
                    (value, Some(error))
                }
            }
        }
        Some(_) => {
            let value_start = cursor.offset();
            while let Some(byte) = cursor.peek() {
                if is_whitespace(byte) || byte == b'>' || byte == b'/' {
                    break;
                }
                cursor.advance();
            }
            (lossy(cursor.consumed_since(value_start)), None)
        }
    };

    Some(ScannedAttribute { name, value, error })
}

/// Keep the consumed markup opener as literal text and report the error.
fn name_error(cursor: &mut Cursor<'_>, start: Location, code: ErrorCode) -> Scanned {
    let literal = lossy(cursor.consumed_since(start.offset));
    let error = ParseError::new(code, cursor.location(), literal.clone());
    Scanned::with_error(
        Event::Text {
            content: literal,
            span: span_from(start, cursor),
        },
        Some(error),
    )
}

#[inline]
fn span_from(start: Location, cursor: &Cursor<'_>) -> Span {
    Span::new(start.offset, cursor.offset())
}

/// Bytes to an owned string, replacing invalid UTF-8.
fn lossy(bytes: &[u8]) -> String {
    String::from_utf8_lossy(bytes).into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn events(input: &str) -> Vec<Event> {
        scan_all(input.as_bytes()).0
    }

    fn text(content: &str, start: usize, end: usize) -> Event {
        Event::Text {
            content: content.to_string(),
            span: Span::new(start, end),
        }
    }

    #[test]
    fn test_simple_element() {
        assert_eq!(
            events("<a>hi</a>"),
            vec![
                Event::ElementStart {
                    name: "a".into(),
                    attributes: Attributes::new(),
                    self_closing: false,
                    span: Span::new(0, 3),
                },
                text("hi", 3, 5),
                Event::ElementEnd {
                    name: "a".into(),
                    span: Span::new(5, 9),
                },
            ]
        );
    }

    #[test]
    fn test_lenient_attributes() {
        let evs = events(r#"<e a b=c d="e f" g='h i'>"#);
        let Event::ElementStart { attributes, self_closing, .. } = &evs[0] else {
            panic!("expected element start, got {:?}", evs[0]);
        };
        assert!(!self_closing);
        let pairs: Vec<_> = attributes.iter().collect();
        assert_eq!(pairs, vec![("a", ""), ("b", "c"), ("d", "e f"), ("g", "h i")]);
        assert_eq!(evs.len(), 1);
    }

    #[test]
    fn test_self_closing() {
        let evs = events(r#"<user name="John" age="30" />"#);
        assert!(matches!(
            &evs[..],
            [Event::ElementStart { name, self_closing: true, .. }] if name == "user"
        ));
    }

    #[test]
    fn test_closing_tag_ignores_junk() {
        let evs = events("</a junk='1' >rest");
        assert_eq!(
            evs,
            vec![
                Event::ElementEnd {
                    name: "a".into(),
                    span: Span::new(0, 14),
                },
                text("rest", 14, 18),
            ]
        );
    }

    #[test]
    fn test_comment() {
        let (evs, err) = scan_all(b"<!-- note -->");
        assert_eq!(
            evs,
            vec![Event::Comment {
                content: " note ".into(),
                span: Span::new(0, 13),
            }]
        );
        assert!(err.is_none());
    }

    #[test]
    fn test_unterminated_comment_keeps_body() {
        let (evs, err) = scan_all(b"<!-- comment");
        assert_eq!(
            evs,
            vec![Event::Comment {
                content: " comment".into(),
                span: Span::new(0, 12),
            }]
        );
        let err = err.unwrap();
        assert_eq!(err.code, ErrorCode::UnterminatedComment);
        assert_eq!(err.partial, " comment");
        assert_eq!(err.location.offset, 0);
    }

    #[test]
    fn test_declaration_is_text() {
        assert_eq!(
            events("<!DOCTYPE html><p/>")[0],
            text("<!DOCTYPE html>", 0, 15)
        );
        // `<!-` is not a comment opener
        assert_eq!(events("<!-x>"), vec![text("<!-x>", 0, 5)]);
    }

    #[test]
    fn test_processing_instruction() {
        let evs = events(r#"<?xml version="1.0" ?>"#);
        assert_eq!(
            evs,
            vec![Event::ProcessingInstruction {
                target: "xml".into(),
                data: r#"version="1.0""#.into(),
                span: Span::new(0, 22),
            }]
        );
    }

    #[test]
    fn test_unterminated_processing_instruction() {
        let (evs, err) = scan_all(b"<?xml");
        assert!(matches!(
            &evs[..],
            [Event::ProcessingInstruction { target, data, .. }] if target == "xml" && data.is_empty()
        ));
        assert_eq!(err.unwrap().code, ErrorCode::UnterminatedProcessingInstruction);
    }

    #[test]
    fn test_lone_angle_at_end() {
        assert_eq!(events("a<"), vec![text("a", 0, 1), text("<", 1, 2)]);
    }

    #[test]
    fn test_invalid_name_resynchronizes() {
        let (evs, err) = scan_all(b"1 <3 b");
        assert_eq!(
            evs,
            vec![text("1 ", 0, 2), text("<", 2, 3), text("3 b", 3, 6)]
        );
        let err = err.unwrap();
        assert_eq!(err.code, ErrorCode::InvalidName);
        assert_eq!(err.partial, "<");
    }

    #[test]
    fn test_whitespace_before_name_is_skipped() {
        let evs = events("< b>");
        assert!(matches!(&evs[..], [Event::ElementStart { name, .. }] if name == "b"));
    }

    #[test]
    fn test_malformed_attribute_halts_attribute_scan() {
        let evs = events(r#"<a x=1 "y">z"#);
        assert_eq!(evs.len(), 2);
        let Event::ElementStart { attributes, .. } = &evs[0] else {
            panic!("expected element start");
        };
        assert_eq!(attributes.get("x"), Some("1"));
        assert_eq!(evs[1], text(r#""y">z"#, 7, 12));
    }

    #[test]
    fn test_unterminated_attribute_value() {
        let (evs, err) = scan_all(br#"<tag attribute="value"#);
        let Event::ElementStart { name, attributes, .. } = &evs[0] else {
            panic!("expected element start");
        };
        assert_eq!(name, "tag");
        assert_eq!(attributes.get("attribute"), Some("value"));
        assert_eq!(err.unwrap().code, ErrorCode::UnterminatedAttributeValue);
    }

    #[test]
    fn test_scan_always_progresses() {
        for input in ["<", "</", "<?", "<!", "<!-", "< ", "<a", "<a b=", "<a/", "</ >"] {
            let mut cursor = Cursor::new(input.as_bytes());
            let mut steps = 0;
            while scan(&mut cursor).is_some() {
                steps += 1;
                assert!(steps <= input.len(), "no progress on {input:?}");
            }
            assert!(cursor.remaining().is_empty());
        }
    }
}
