//! Boundary detection for the elements of a flat top-level JSON array.
//!
//! The scanner never parses values. It only tracks whether it is inside an
//! element, inside a string literal, or right after a backslash, and that
//! lexical state survives from one chunk to the next.

use crate::ReassemblyError;

/// A complete element found in one chunk.
///
/// `start` is `None` when the element began in an earlier chunk; its bytes in
/// this chunk are then `chunk[..end]` and the rest lives in the carry buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ElementSpan {
    pub start: Option<usize>,
    pub end: usize,
}

/// An element still open when the chunk ran out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpenElement {
    /// The carried element neither closed nor was joined by another one.
    Continued,
    /// A new element started at this offset and did not close.
    StartedAt(usize),
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScanResult {
    pub spans: Vec<ElementSpan>,
    pub open: Option<OpenElement>,
    /// Offset of the top-level `]`, if it was in this chunk.
    pub terminator: Option<usize>,
    /// Bytes after the terminator that were not looked at.
    pub trailing: usize,
}

impl ScanResult {
    /// Offset of the first element that starts in this chunk and also closes in it.
    pub fn first_start(&self) -> Option<usize> {
        self.spans.iter().find_map(|span| span.start)
    }

    /// One past the `}` of the last complete element.
    pub fn last_end(&self) -> Option<usize> {
        self.spans.last().map(|span| span.end)
    }

    pub fn is_terminated(&self) -> bool {
        self.terminator.is_some()
    }

    pub fn has_open_element(&self) -> bool {
        self.open.is_some()
    }
}

/// What the depth-0 grammar accepts next.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
enum Expect {
    #[default]
    ArrayOpen,
    FirstElementOrEnd,
    Element,
    SeparatorOrEnd,
}

#[derive(Debug, Default)]
pub struct ChunkScanner {
    depth: u32,
    in_string: bool,
    escaped: bool,
    expect: Expect,
    terminated: bool,
    position: u64,
}

impl ChunkScanner {
    pub fn new() -> Self {
        Self::default()
    }

    /// True while an element is open across the last chunk edge.
    pub fn in_element(&self) -> bool {
        self.depth > 0
    }

    pub fn is_terminated(&self) -> bool {
        self.terminated
    }

    /// Total bytes scanned so far, across all chunks.
    pub fn position(&self) -> u64 {
        self.position
    }

    pub fn scan(&mut self, chunk: &[u8]) -> Result<ScanResult, ReassemblyError> {
        let mut result = ScanResult::default();
        let mut start = None;

        for (i, &byte) in chunk.iter().enumerate() {
            if self.depth > 0 {
                if self.in_string {
                    match (self.escaped, byte) {
                        (true, _) => self.escaped = false,
                        (false, b'\\') => self.escaped = true,
                        (false, b'"') => self.in_string = false,
                        _ => {}
                    }
                    continue;
                }
                match byte {
                    b'"' => self.in_string = true,
                    b'}' => {
                        self.depth -= 1;
                        self.expect = Expect::SeparatorOrEnd;
                        result.spans.push(ElementSpan {
                            start: start.take(),
                            end: i + 1,
                        });
                    }
                    b'{' | b'[' => {
                        return Err(self.malformed(i, "nested containers are not supported"))
                    }
                    b']' => return Err(self.malformed(i, "array terminator inside an open element")),
                    _ => {}
                }
                continue;
            }

            match (self.expect, byte) {
                (_, b' ' | b'\t' | b'\n' | b'\r') => {}
                (Expect::ArrayOpen, b'[') => self.expect = Expect::FirstElementOrEnd,
                (Expect::ArrayOpen, _) => {
                    return Err(self.malformed(i, "body does not start with a JSON array"))
                }
                (Expect::FirstElementOrEnd | Expect::Element, b'{') => {
                    self.depth = 1;
                    start = Some(i);
                }
                (Expect::SeparatorOrEnd, b',') => self.expect = Expect::Element,
                (Expect::FirstElementOrEnd | Expect::SeparatorOrEnd, b']') => {
                    self.terminated = true;
                    result.terminator = Some(i);
                    result.trailing = chunk.len() - (i + 1);
                    break;
                }
                (_, b'}') => return Err(self.malformed(i, "unmatched closing brace")),
                (_, b'[') => return Err(self.malformed(i, "second top-level array")),
                (Expect::SeparatorOrEnd, b'{') => {
                    return Err(self.malformed(i, "missing comma between elements"))
                }
                (_, b',') => return Err(self.malformed(i, "comma without a preceding element")),
                (Expect::Element, b']') => {
                    return Err(self.malformed(i, "trailing comma before array terminator"))
                }
                _ => return Err(self.malformed(i, "unexpected byte between elements")),
            }
        }

        if self.depth > 0 {
            result.open = Some(match start {
                Some(offset) => OpenElement::StartedAt(offset),
                None => OpenElement::Continued,
            });
        }
        self.position += chunk.len() as u64;
        Ok(result)
    }

    fn malformed(&self, index: usize, reason: &'static str) -> ReassemblyError {
        ReassemblyError::MalformedBoundary {
            offset: self.position + index as u64,
            reason,
        }
    }
}
