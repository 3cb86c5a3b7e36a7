//! Adapters from `std::io::Read` sources to the push interface.
//!
//! The parser core never performs I/O; these wrappers pull fixed-size
//! blocks, feed them, and close the session when the source reports EOF.

use std::io::{self, ErrorKind, Read};

use tracing::trace;

use crate::builder::{build_document, NodeStream};
use crate::error::ParseError;
use crate::options::Options;
use crate::session::Session;
use crate::tree::{Document, StreamDocument, Tree};

/// Reads top-level trees from a byte source, one at a time.
///
/// ```
/// use flexml_core::NodeReader;
///
/// let input: &[u8] = b"<a>1</a> <b/>";
/// let names: Vec<_> = NodeReader::new(input)
///     .map(|tree| tree.unwrap().root().name().map(str::to_owned))
///     .collect();
/// assert_eq!(names, vec![Some("a".into()), None, Some("b".into())]);
/// ```
pub struct NodeReader<R: Read> {
    reader: R,
    stream: NodeStream,
    block: Vec<u8>,
    eof: bool,
}

impl<R: Read> NodeReader<R> {
    pub fn new(reader: R) -> Self {
        Self::with_options(reader, Options::default())
    }

    pub fn with_options(reader: R, options: Options) -> Self {
        NodeReader {
            reader,
            stream: NodeStream::with_options(options),
            block: vec![0u8; options.get_block_size()],
            eof: false,
        }
    }

    /// Next top-level tree, reading more input as needed.
    /// `Ok(None)` once the source is exhausted and every node was returned.
    pub fn read_node(&mut self) -> io::Result<Option<Tree>> {
        loop {
            if let Some(tree) = self.stream.next_node() {
                return Ok(Some(tree));
            }
            if self.stream.is_finished() {
                return Ok(None);
            }
            self.fill()?;
        }
    }

    /// First recovered parse error so far.
    pub fn error(&self) -> Option<&ParseError> {
        self.stream.error()
    }

    pub fn into_inner(self) -> R {
        self.reader
    }

    /// Read one block into the stream, closing it on EOF.
    fn fill(&mut self) -> io::Result<()> {
        if self.eof {
            // Already closed; next_node will drain and finish.
            return Ok(());
        }
        let read = read_block(&mut self.reader, &mut self.block)?;
        if read == 0 {
            trace!("source exhausted");
            self.eof = true;
            self.stream.close();
        } else {
            self.stream.feed(&self.block[..read]);
        }
        Ok(())
    }
}

impl<R: Read> Iterator for NodeReader<R> {
    type Item = io::Result<Tree>;

    fn next(&mut self) -> Option<Self::Item> {
        self.read_node().transpose()
    }
}

/// Parse everything a reader yields into one [`Document`].
///
/// I/O errors are fatal; parse errors are not (see [`crate::parse`]).
pub fn parse_reader<R: Read>(mut reader: R) -> io::Result<(Document, Option<ParseError>)> {
    let options = Options::default();
    let mut session = Session::with_options(options);
    let mut block = vec![0u8; options.get_block_size()];
    loop {
        let read = read_block(&mut reader, &mut block)?;
        if read == 0 {
            break;
        }
        session.feed(&block[..read]);
    }
    session.close();
    Ok(build_document(session))
}

impl StreamDocument {
    /// Collect every top-level tree of a complete input.
    pub fn parse(input: impl AsRef<[u8]>) -> (StreamDocument, Option<ParseError>) {
        let mut stream = NodeStream::new();
        stream.feed(input.as_ref());
        stream.close();
        let doc = stream.by_ref().collect();
        (doc, stream.error().cloned())
    }

    /// Collect every top-level tree a reader yields.
    pub fn from_reader<R: Read>(reader: R) -> io::Result<(StreamDocument, Option<ParseError>)> {
        let mut nodes = NodeReader::new(reader);
        let mut doc = StreamDocument::new();
        while let Some(tree) = nodes.read_node()? {
            doc.push(tree);
        }
        let error = nodes.error().cloned();
        Ok((doc, error))
    }
}

/// `read` that retries on `Interrupted`.
fn read_block<R: Read>(reader: &mut R, block: &mut [u8]) -> io::Result<usize> {
    loop {
        match reader.read(block) {
            Err(err) if err.kind() == ErrorKind::Interrupted => continue,
            result => return result,
        }
    }
}
