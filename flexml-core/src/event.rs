//! Scanner events - one per recognized markup unit.
//!
//! This is a SAX-style event model: each event describes one unit, and
//! nesting is only implied by ElementStart/ElementEnd pairs. Nothing here
//! checks that those pairs balance; the tree builder decides what a stray
//! or mismatched end tag means.

use crate::span::Span;

/// Structural events produced by the scanner.
///
/// Events own their text, so they can outlive the session buffer they were
/// scanned from.
///
/// ## Event Sequences
///
/// `<a x="1">hi<br/></a>` emits:
/// ```text
/// ElementStart { name: "a", attributes: {x: "1"}, self_closing: false }
/// Text("hi")
/// ElementStart { name: "br", self_closing: true }
/// ElementEnd { name: "a" }
/// ```
///
/// Declarations (`<!DOCTYPE ...>`) are not modeled; they arrive as Text
/// containing the literal markup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// Opening or self-closing tag: `<name attr="v">` / `<name/>`
    ElementStart {
        name: String,
        attributes: Attributes,
        self_closing: bool,
        span: Span,
    },

    /// Closing tag: `</name>`
    ElementEnd { name: String, span: Span },

    /// Character run (also used for declarations and unparseable markup)
    Text { content: String, span: Span },

    /// Comment body between `<!--` and `-->`
    Comment { content: String, span: Span },

    /// Processing instruction: `<?target data?>`
    ProcessingInstruction {
        target: String,
        data: String,
        span: Span,
    },
}

impl Event {
    /// Get the span for this event.
    pub fn span(&self) -> Span {
        match self {
            Event::ElementStart { span, .. } => *span,
            Event::ElementEnd { span, .. } => *span,
            Event::Text { span, .. } => *span,
            Event::Comment { span, .. } => *span,
            Event::ProcessingInstruction { span, .. } => *span,
        }
    }

    /// Check if this event opens an element that expects a matching end.
    pub fn is_open(&self) -> bool {
        matches!(
            self,
            Event::ElementStart {
                self_closing: false,
                ..
            }
        )
    }

    /// Check if this event produces a leaf node (no children).
    pub fn is_leaf(&self) -> bool {
        matches!(
            self,
            Event::Text { .. } | Event::Comment { .. } | Event::ProcessingInstruction { .. }
        )
    }
}

/// Element attributes in first-insertion order.
///
/// Keys are unique. Inserting an existing key replaces its value in place,
/// so the last occurrence of a duplicate wins.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Attributes {
    entries: Vec<(String, String)>,
}

impl Attributes {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace. Returns the previous value for the key.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) -> Option<String> {
        let name = name.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(key, _)| *key == name) {
            Some((_, slot)) => Some(std::mem::replace(slot, value)),
            None => {
                self.entries.push((name, value));
                None
            }
        }
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Attributes {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut attrs = Attributes::new();
        for (k, v) in iter {
            attrs.insert(k, v);
        }
        attrs
    }
}
