// Dweve OSMStat - OpenStreetMap archive statistics
//
// Copyright (c) 2025 Dweve IP B.V. and individual contributors.
//
// SPDX-License-Identifier: Apache-2.0
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License in the LICENSE file at the
// root of this repository or at: http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Forward-only structural event scanner.
//!
//! [`EventScanner`] pulls one [`StructuralEvent`] at a time from a decoded XML
//! byte stream. Only element boundaries are reported; text, comments,
//! processing instructions and declarations are skipped. A single read buffer
//! is reused for every event, so memory use does not grow with the document.
//! Attribute values are left escaped in the raw tag until they are asked for.
//!
//! # Examples
//!
//! ```rust
//! use osmstat::scanner::{EventScanner, StructuralEvent};
//! use std::io::Cursor;
//!
//! let xml = r#"<osm><node user="alice"/></osm>"#;
//! let names: Vec<String> = EventScanner::new(Cursor::new(xml))
//!     .map(|event| event.map(|e| e.name().to_string()))
//!     .collect::<Result<_, _>>()?;
//!
//! assert_eq!(names, ["osm", "node", "node", "osm"]);
//! # Ok::<(), osmstat::StatsError>(())
//! ```

use crate::error::{StatsError, StatsResult};
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use std::borrow::Cow;
use std::io::BufRead;
use std::iter::FusedIterator;
use std::path::PathBuf;

/// Attributes of an opened element, kept as the raw start tag.
///
/// Nothing is parsed or unescaped until a value is looked up, so elements
/// whose attributes are never read cost one copy of the tag and no more.
/// Lookups match the full qualified name: `user` does not match `o:user`.
#[derive(Debug, Clone)]
pub struct Attributes {
    raw: BytesStart<'static>,
    position: usize,
}

impl Attributes {
    fn new(raw: BytesStart<'static>, position: usize) -> Self {
        Self { raw, position }
    }

    /// Unescaped value of the attribute named exactly `key`.
    ///
    /// # Errors
    ///
    /// Returns [`StatsError::Scan`] if the attribute list is malformed up to
    /// and including the match, or the matched value has a bad escape.
    pub fn get(&self, key: &str) -> StatsResult<Option<Cow<'_, str>>> {
        for attr in self.raw.attributes() {
            let attr = attr.map_err(|e| StatsError::scan(self.position, e.to_string()))?;
            if attr.key.as_ref() == key.as_bytes() {
                let value = attr
                    .unescape_value()
                    .map_err(|e| StatsError::scan(self.position, e.to_string()))?;
                return Ok(Some(value));
            }
        }
        Ok(None)
    }
}

impl PartialEq for Attributes {
    fn eq(&self, other: &Self) -> bool {
        *self.raw == *other.raw
    }
}

impl Eq for Attributes {}

/// An element boundary observed in the document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StructuralEvent {
    /// Start of an element, including self-closing elements.
    ElementOpen {
        /// Local element name (namespace prefix stripped)
        name: String,
        /// Attributes, parsed on lookup
        attributes: Attributes,
    },
    /// End of an element.
    ElementClose {
        /// Local element name (namespace prefix stripped)
        name: String,
    },
}

impl StructuralEvent {
    /// Build an open event from name/value pairs. Values are escaped as
    /// they would be in a document.
    pub fn open(name: &str, attributes: &[(&str, &str)]) -> Self {
        let raw = BytesStart::new(name.to_owned()).with_attributes(attributes.iter().copied());
        Self::ElementOpen {
            name: name.to_owned(),
            attributes: Attributes::new(raw, 0),
        }
    }

    /// Build a close event.
    pub fn close(name: &str) -> Self {
        Self::ElementClose {
            name: name.to_owned(),
        }
    }

    /// Local name of the element.
    pub fn name(&self) -> &str {
        match self {
            Self::ElementOpen { name, .. } | Self::ElementClose { name } => name,
        }
    }

    /// Value of an attribute on an open event. Close events have none.
    ///
    /// # Errors
    ///
    /// See [`Attributes::get`].
    pub fn attribute(&self, key: &str) -> StatsResult<Option<Cow<'_, str>>> {
        match self {
            Self::ElementOpen { attributes, .. } => attributes.get(key),
            Self::ElementClose { .. } => Ok(None),
        }
    }

    /// True for an open event of the given element.
    pub fn opens(&self, element: &str) -> bool {
        matches!(self, Self::ElementOpen { name, .. } if name == element)
    }

    /// True for a close event of the given element.
    pub fn closes(&self, element: &str) -> bool {
        matches!(self, Self::ElementClose { name } if name == element)
    }
}

/// Pull-based scanner yielding [`StructuralEvent`]s.
///
/// The iterator is fused: after the first error or the end of the document
/// it keeps returning `None`.
pub struct EventScanner<R: BufRead> {
    reader: Reader<R>,
    buf: Vec<u8>,
    origin: PathBuf,
    pending_close: Option<String>,
    depth: usize,
    exhausted: bool,
}

impl<R: BufRead> EventScanner<R> {
    /// Create a scanner over a decoded byte stream.
    pub fn new(reader: R) -> Self {
        let mut xml_reader = Reader::from_reader(reader);
        xml_reader.trim_text(true);
        xml_reader.check_end_names(true);
        Self {
            reader: xml_reader,
            buf: Vec::with_capacity(8192),
            origin: PathBuf::from("<stream>"),
            pending_close: None,
            depth: 0,
            exhausted: false,
        }
    }

    /// Name the stream for read failures of the underlying decoder.
    pub fn with_origin(mut self, origin: impl Into<PathBuf>) -> Self {
        self.origin = origin.into();
        self
    }

    /// Byte offset reached in the decoded stream.
    pub fn position(&self) -> usize {
        self.reader.buffer_position()
    }

    fn read_next(&mut self) -> StatsResult<Option<StructuralEvent>> {
        if let Some(name) = self.pending_close.take() {
            return Ok(Some(StructuralEvent::ElementClose { name }));
        }

        loop {
            self.buf.clear();
            match self.reader.read_event_into(&mut self.buf) {
                Ok(Event::Start(e)) => {
                    let event = open_event(e, self.reader.buffer_position());
                    self.depth += 1;
                    return Ok(Some(event));
                }
                Ok(Event::Empty(e)) => {
                    let event = open_event(e, self.reader.buffer_position());
                    self.pending_close = Some(event.name().to_string());
                    return Ok(Some(event));
                }
                Ok(Event::End(e)) => {
                    self.depth = self.depth.saturating_sub(1);
                    return Ok(Some(StructuralEvent::ElementClose {
                        name: decode_name(e.local_name().as_ref()),
                    }));
                }
                Ok(Event::Eof) => {
                    if self.depth > 0 {
                        return Err(StatsError::scan(
                            self.reader.buffer_position(),
                            format!("unexpected end of document, {} element(s) left open", self.depth),
                        ));
                    }
                    return Ok(None);
                }
                Ok(_) => {}
                Err(quick_xml::Error::Io(e)) => {
                    return Err(StatsError::source(
                        self.origin.clone(),
                        format!("decompression failed: {}", e),
                    ))
                }
                Err(e) => {
                    return Err(StatsError::scan(
                        self.reader.buffer_position(),
                        e.to_string(),
                    ))
                }
            }
        }
    }
}

impl<R: BufRead> Iterator for EventScanner<R> {
    type Item = StatsResult<StructuralEvent>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.exhausted {
            return None;
        }

        match self.read_next() {
            Ok(Some(event)) => Some(Ok(event)),
            Ok(None) => {
                self.exhausted = true;
                None
            }
            Err(e) => {
                self.exhausted = true;
                Some(Err(e))
            }
        }
    }
}

impl<R: BufRead> FusedIterator for EventScanner<R> {}

fn open_event(start: BytesStart<'_>, position: usize) -> StructuralEvent {
    StructuralEvent::ElementOpen {
        name: decode_name(start.local_name().as_ref()),
        attributes: Attributes::new(start.into_owned(), position),
    }
}

fn decode_name(raw: &[u8]) -> String {
    String::from_utf8_lossy(raw).into_owned()
}
