//! Test infrastructure for the FlexML parser
//!
//! Provides stochastic generation, chunked feeding and a span-free tree
//! shape for structural comparisons.

#![allow(dead_code)]

mod generators;

pub use generators::Gen;

use flexml_core::{Document, Event, Node, NodeKind, ParseError, Session};

/// Simplified node representation for comparisons (no ids, no spans).
#[derive(Debug, Clone, PartialEq)]
pub enum Shape {
    Element {
        name: String,
        attributes: Vec<(String, String)>,
        children: Vec<Shape>,
    },
    Text(String),
    Comment(String),
    Pi(String, String),
}

impl Shape {
    pub fn of(node: Node<'_>) -> Shape {
        match node.kind() {
            NodeKind::Element { name, attributes } => Shape::Element {
                name: name.clone(),
                attributes: attributes
                    .iter()
                    .map(|(k, v)| (k.to_string(), v.to_string()))
                    .collect(),
                children: node.children().map(Shape::of).collect(),
            },
            NodeKind::Text(text) => Shape::Text(text.clone()),
            NodeKind::Comment(body) => Shape::Comment(body.clone()),
            NodeKind::ProcessingInstruction { target, data } => {
                Shape::Pi(target.clone(), data.clone())
            }
        }
    }
}

pub fn el(name: &str, children: Vec<Shape>) -> Shape {
    Shape::Element {
        name: name.to_string(),
        attributes: Vec::new(),
        children,
    }
}

pub fn text(content: &str) -> Shape {
    Shape::Text(content.to_string())
}

/// Top-level shapes of a document.
pub fn shapes(doc: &Document) -> Vec<Shape> {
    doc.children().map(Shape::of).collect()
}

/// Feed `input` split at `cuts`, draining after every chunk, then close.
pub fn events_in_chunks(input: &[u8], cuts: &[usize]) -> (Vec<Event>, Option<ParseError>) {
    let mut session = Session::new();
    let mut events = Vec::new();
    let mut from = 0;
    for &cut in cuts.iter().chain(std::iter::once(&input.len())) {
        session.feed(&input[from..cut]);
        events.extend(session.by_ref());
        from = cut;
    }
    session.close();
    events.extend(session.by_ref());
    let error = session.error().cloned();
    (events, error)
}

/// Route parser logs to the test writer. Filter with `RUST_LOG`, e.g.
/// `RUST_LOG=flexml_core=trace`.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}
