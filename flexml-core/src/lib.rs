//! FlexML Core Parser
//!
//! Forgiving, resumable parser for XML-like markup. Recovers a usable tree
//! from input that is truncated, misnested, or arriving in arbitrary chunks.
//! Parsing never fails outright: the first recovered error is reported
//! next to whatever structure could be built.
//!
//! # Architecture
//!
//! - **cursor.rs** - Byte position with line/column tracking and scan primitives
//! - **scanner.rs** - Stateless lenient scanner, one event per call
//! - **session.rs** - Growable buffer with feed/advance/close
//! - **builder.rs** - Tree materializer (whole document or top-level nodes)
//! - **tree.rs** - Arena trees, Document and StreamDocument
//! - **reader.rs** - `std::io::Read` adapters
//! - **render.rs** - Compact and indented rendering
//! - **span.rs** - Span/Location types
//!
//! # Example
//!
//! ```
//! let (doc, error) = flexml_core::parse("<outer><inner>Content</outer>");
//! assert!(error.is_none());
//!
//! let outer = doc.find_one("outer").unwrap();
//! assert_eq!(outer.find_one("inner").unwrap().text(), "Content");
//! ```

pub mod builder;
pub mod cursor;
pub mod error;
pub mod event;
pub mod options;
pub mod reader;
pub mod render;
pub mod scanner;
pub mod session;
pub mod span;
pub mod tree;

pub use builder::{parse, NodeStream};
pub use cursor::Cursor;
pub use error::{ErrorCode, ParseError};
pub use event::{Attributes, Event};
pub use options::Options;
pub use reader::{parse_reader, NodeReader};
pub use render::Pretty;
pub use scanner::{scan, scan_all, Scanned};
pub use session::Session;
pub use span::{Location, Span};
pub use tree::{Document, ElementView, Node, NodeId, NodeKind, StreamDocument, Tree};
