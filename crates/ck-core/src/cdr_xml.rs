//! CDR document splitter.
//!
//! Splits a vendor CDR document into the raw XML of each per-record
//! `<cdrData>` element under `/broadWorksCDR/cdrData`. Field-level decoding
//! of a fragment into a charging record belongs to downstream decoders.
//!
//! The parse is relaxed the way the legacy collector's was: end tags are
//! matched by depth, not by name, so mismatched closers inside a record are
//! tolerated. A document that ends inside an open element, or that carries
//! no root element at all, fails at [`CdrXmlSplitter::open`] before any
//! record is produced.

use std::io::Read;

use quick_xml::Reader;
use quick_xml::events::Event;
use serde::{Deserialize, Serialize};

use crate::error::{Result, XmlError};

/// Root element of a BroadWorks CDR document.
pub const CDR_ROOT_ELEMENT: &str = "broadWorksCDR";

/// Per-record element split out of the document.
pub const CDR_DATA_ELEMENT: &str = "cdrData";

/// One undecoded record fragment: the raw XML of a `<cdrData>` element.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CdrRecord {
    pub raw_xml: String,
}

/// Splits a CDR document and hands out one fragment's records per call.
///
/// The input stream is consumed in full by [`open`](Self::open) and dropped
/// on every exit path; an open splitter holds no live resources.
#[derive(Debug)]
pub struct CdrXmlSplitter {
    fragments: Vec<String>,
    processed: u64,
}

impl CdrXmlSplitter {
    /// Read `reader` to completion and split out every record fragment.
    ///
    /// Fails fast on unreadable input, a document without a root element,
    /// or a document that ends while an element is still open; no partial
    /// splitter is ever returned. A well-formed document with a different
    /// root simply yields zero fragments.
    pub fn open(mut reader: impl Read) -> Result<Self> {
        let mut bytes = Vec::new();
        reader.read_to_end(&mut bytes).map_err(XmlError::Read)?;
        drop(reader);

        let fragments = split_fragments(&bytes)?;
        tracing::debug!(
            fragments = fragments.len(),
            bytes = bytes.len(),
            "split CDR document"
        );
        Ok(Self {
            fragments,
            processed: 0,
        })
    }

    /// Records of the next pending fragment, or `None` once every fragment
    /// has been processed.
    ///
    /// Each successful call consumes exactly one fragment and increments
    /// [`processed_count`](Self::processed_count) once, regardless of how
    /// many records the fragment yields. Decoding is left to downstream
    /// consumers, so a fragment yields exactly one [`CdrRecord`] wrapping
    /// its raw XML.
    pub fn next_batch(&mut self) -> Option<Vec<CdrRecord>> {
        let fragment = self.fragments.get(self.processed as usize)?;
        let records = vec![CdrRecord {
            raw_xml: fragment.clone(),
        }];
        self.processed += 1;
        Some(records)
    }

    /// Number of fragments processed so far; monotonically non-decreasing.
    #[must_use]
    pub fn processed_count(&self) -> u64 {
        self.processed
    }

    /// Total number of record fragments found in the document.
    #[must_use]
    pub fn fragment_count(&self) -> usize {
        self.fragments.len()
    }
}

impl Iterator for CdrXmlSplitter {
    type Item = Vec<CdrRecord>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_batch()
    }
}

/// Walk the document once, capturing the byte span of every `<cdrData>`
/// element sitting directly under a `broadWorksCDR` root.
fn split_fragments(bytes: &[u8]) -> Result<Vec<String>> {
    let mut reader = Reader::from_reader(bytes);
    // Match end tags by depth, not by name.
    reader.config_mut().check_end_names = false;
    reader.config_mut().allow_unmatched_ends = true;

    let mut fragments = Vec::new();
    let mut stack: Vec<String> = Vec::new();
    let mut saw_root = false;
    let mut root_is_cdr = false;
    let mut capture_start: Option<u64> = None;
    let mut buf = Vec::new();

    loop {
        let event_start = reader.buffer_position();
        match reader.read_event_into(&mut buf) {
            Err(source) => {
                return Err(XmlError::Parse {
                    position: reader.error_position(),
                    source,
                }
                .into());
            }
            Ok(Event::Start(e)) => {
                if stack.is_empty() {
                    saw_root = true;
                    root_is_cdr = e.local_name().as_ref() == CDR_ROOT_ELEMENT.as_bytes();
                } else if stack.len() == 1
                    && root_is_cdr
                    && e.local_name().as_ref() == CDR_DATA_ELEMENT.as_bytes()
                {
                    capture_start = Some(event_start);
                }
                stack.push(String::from_utf8_lossy(e.name().as_ref()).into_owned());
            }
            Ok(Event::End(_)) => {
                // Stray end tags below the root are ignored entirely.
                stack.pop();
                if stack.len() == 1 {
                    if let Some(start) = capture_start.take() {
                        fragments.push(fragment_string(bytes, start, reader.buffer_position())?);
                    }
                }
            }
            Ok(Event::Empty(e)) => {
                if stack.is_empty() {
                    saw_root = true;
                    root_is_cdr = e.local_name().as_ref() == CDR_ROOT_ELEMENT.as_bytes();
                } else if stack.len() == 1
                    && root_is_cdr
                    && e.local_name().as_ref() == CDR_DATA_ELEMENT.as_bytes()
                {
                    fragments.push(fragment_string(bytes, event_start, reader.buffer_position())?);
                }
            }
            Ok(Event::Eof) => break,
            Ok(_) => {}
        }
        buf.clear();
    }

    if !saw_root {
        return Err(XmlError::MissingRoot.into());
    }
    if let Some(element) = stack.pop() {
        return Err(XmlError::Truncated { element }.into());
    }
    Ok(fragments)
}

fn fragment_string(bytes: &[u8], start: u64, end: u64) -> Result<String> {
    let raw = &bytes[start as usize..end as usize];
    match std::str::from_utf8(raw) {
        Ok(text) => Ok(text.to_string()),
        Err(_) => Err(XmlError::NonUtf8 { position: start }.into()),
    }
}
