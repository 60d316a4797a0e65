//! Unit entry reader - decode unit definitions from a JSON array
//!
//! The stream is read once, on the first pull, and released right away.
//! Array elements are then decoded one at a time; the first error ends the
//! sequence.

use std::io::Read;

use refscale_core::{RefscaleError, Result};
use serde::Deserialize;
use serde_json::error::Category;

/// Bytes of surrounding input quoted in structural errors
const SNIPPET_LEN: usize = 32;

/// A single raw unit definition
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UnitEntry {
    /// Canonical unit name (e.g., "kilometer")
    #[serde(default)]
    pub name: String,
    /// How many base units one of this unit equals
    #[serde(default)]
    pub value: f64,
    /// Extra names the unit answers to (e.g., "km", "kilometers")
    #[serde(default)]
    pub aliases: Vec<String>,
}

impl UnitEntry {
    pub fn new(name: &str, value: f64, aliases: &[&str]) -> Self {
        UnitEntry {
            name: name.to_string(),
            value,
            aliases: aliases.iter().map(|a| a.to_string()).collect(),
        }
    }

    fn validate(&self, raw: &str) -> Result<()> {
        if self.name.is_empty() {
            return Err(RefscaleError::validation("name", "unit name cannot be empty", raw));
        }
        if self.value <= 0.0 || !self.value.is_finite() {
            return Err(RefscaleError::validation(
                "value",
                "unit value must be positive non-zero",
                raw,
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum State {
    Start,
    Elements { first: bool },
    Done,
}

/// Lazy sequence of validated unit entries
pub struct UnitEntries<R> {
    source: Option<R>,
    buf: Vec<u8>,
    pos: usize,
    state: State,
}

/// Iterate over the unit entries of a JSON array
///
/// Expected input: `[{"name": "kilometer", "value": 1000.0, "aliases": ["km"]}, ...]`
pub fn read_unit_entries<R: Read>(source: R) -> UnitEntries<R> {
    UnitEntries {
        source: Some(source),
        buf: Vec::new(),
        pos: 0,
        state: State::Start,
    }
}

impl<R: Read> UnitEntries<R> {
    fn fill(&mut self) -> Result<()> {
        if let Some(mut source) = self.source.take() {
            source
                .read_to_end(&mut self.buf)
                .map_err(|e| RefscaleError::io("unit entries", e))?;
        }
        Ok(())
    }

    fn skip_whitespace(&mut self) {
        while let Some(b' ' | b'\t' | b'\n' | b'\r') = self.peek() {
            self.pos += 1;
        }
    }

    fn peek(&self) -> Option<u8> {
        self.buf.get(self.pos).copied()
    }

    fn snippet(&self, from: usize) -> String {
        let end = (from + SNIPPET_LEN).min(self.buf.len());
        String::from_utf8_lossy(&self.buf[from.min(end)..end]).into_owned()
    }

    fn structural(&self, message: &str) -> RefscaleError {
        RefscaleError::parse(self.pos, message, self.snippet(self.pos))
    }

    fn open_array(&mut self) -> Result<()> {
        self.fill()?;
        self.skip_whitespace();
        match self.peek() {
            Some(b'[') => {
                self.pos += 1;
                Ok(())
            }
            Some(_) => Err(self.structural("unexpected token, expected '['")),
            None => Err(self.structural("unexpected end of input, expected '['")),
        }
    }

    /// Advance to the next element; `None` once the closing `]` is consumed
    fn next_element(&mut self, first: bool) -> Result<Option<UnitEntry>> {
        self.skip_whitespace();
        match self.peek() {
            None => return Err(self.structural("unexpected end of input, expected ']'")),
            Some(b']') => {
                self.pos += 1;
                self.skip_whitespace();
                if self.pos < self.buf.len() {
                    return Err(self.structural("unexpected trailing content after ']'"));
                }
                return Ok(None);
            }
            Some(b',') if !first => {
                self.pos += 1;
                self.skip_whitespace();
            }
            Some(_) if !first => return Err(self.structural("expected ',' or ']'")),
            Some(_) => {}
        }

        self.decode_element().map(Some)
    }

    fn decode_element(&mut self) -> Result<UnitEntry> {
        let start = self.pos;
        let mut stream =
            serde_json::Deserializer::from_slice(&self.buf[start..]).into_iter::<serde_json::Value>();

        let value = match stream.next() {
            Some(Ok(value)) => value,
            Some(Err(e)) => {
                return Err(RefscaleError::parse(
                    start,
                    format!("reading JSON: {}", e),
                    self.snippet(start),
                ));
            }
            None => return Err(self.structural("unexpected end of input, expected entry")),
        };

        let end = start + stream.byte_offset();
        let raw = String::from_utf8_lossy(&self.buf[start..end]).into_owned();
        self.pos = end;

        let entry: UnitEntry = serde_json::from_value(value).map_err(|e| {
            let message = match e.classify() {
                Category::Data => format!("cannot unmarshal into unit entry: {}", e),
                _ => format!("unsupported JSON error: {}", e),
            };
            RefscaleError::parse(start, message, raw.clone())
        })?;

        entry
            .validate(&raw)
            .map_err(|e| e.context("error validating entry"))?;

        Ok(entry)
    }
}

impl<R: Read> Iterator for UnitEntries<R> {
    type Item = Result<UnitEntry>;

    fn next(&mut self) -> Option<Self::Item> {
        let first = match self.state {
            State::Done => return None,
            State::Start => {
                if let Err(e) = self.open_array() {
                    self.state = State::Done;
                    return Some(Err(e));
                }
                true
            }
            State::Elements { first } => first,
        };

        match self.next_element(first) {
            Ok(Some(entry)) => {
                self.state = State::Elements { first: false };
                Some(Ok(entry))
            }
            Ok(None) => {
                self.state = State::Done;
                None
            }
            Err(e) => {
                self.state = State::Done;
                Some(Err(e))
            }
        }
    }
}

impl<R: Read> std::iter::FusedIterator for UnitEntries<R> {}
