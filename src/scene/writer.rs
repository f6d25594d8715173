use std::fmt::Display;
use std::io;

use anyhow::Context as _;
use quick_xml::Writer;
use quick_xml::events::{BytesEnd, BytesStart, BytesText, Event};

use crate::foundation::error::DeckResult;

/// Streaming XML writer producing the canonical textual scene form.
///
/// A thin stack-tracking layer over [`quick_xml::Writer`]: the start tag of the innermost element
/// stays pending until content is written or the element is closed, so attributes can be added
/// after [`XmlWriter::element`] and childless elements come out self-closed. Output is
/// deterministic for a given call sequence, which is what page content hashing relies on.
pub struct XmlWriter {
    writer: Writer<Vec<u8>>,
    pending: Option<BytesStart<'static>>,
    stack: Vec<String>,
    error: Option<io::Error>,
}

impl Default for XmlWriter {
    fn default() -> Self {
        Self {
            writer: Writer::new(Vec::new()),
            pending: None,
            stack: Vec::new(),
            error: None,
        }
    }
}

impl std::fmt::Debug for XmlWriter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("XmlWriter")
            .field("open", &self.stack)
            .finish_non_exhaustive()
    }
}

impl XmlWriter {
    /// Empty writer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a child element.
    pub fn element(&mut self, name: &str) {
        self.flush_start();
        self.pending = Some(BytesStart::new(name.to_string()));
        self.stack.push(name.to_string());
    }

    /// Add an attribute to the element just started. Ignored once content has been written.
    pub fn set(&mut self, key: &str, value: impl Display) {
        if let Some(start) = self.pending.as_mut() {
            start.push_attribute((key, value.to_string().as_str()));
        }
    }

    /// Write escaped character data.
    pub fn text(&mut self, text: &str) {
        self.flush_start();
        self.emit(Event::Text(BytesText::new(text)));
    }

    /// Write pre-serialized markup verbatim.
    pub fn raw(&mut self, markup: &str) {
        self.flush_start();
        self.emit(Event::Text(BytesText::from_escaped(markup)));
    }

    /// Close the innermost open element.
    pub fn close(&mut self) {
        let Some(name) = self.stack.pop() else {
            return;
        };
        match self.pending.take() {
            Some(start) => self.emit(Event::Empty(start)),
            None => self.emit(Event::End(BytesEnd::new(name))),
        }
    }

    /// Number of currently open elements.
    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    /// Close everything still open and return the document.
    pub fn finish(mut self) -> DeckResult<String> {
        while !self.stack.is_empty() {
            self.close();
        }
        if let Some(e) = self.error {
            return Err(anyhow::Error::from(e).context("failed to serialize xml").into());
        }
        Ok(String::from_utf8(self.writer.into_inner()).context("serialized xml is not utf-8")?)
    }

    fn flush_start(&mut self) {
        if let Some(start) = self.pending.take() {
            self.emit(Event::Start(start));
        }
    }

    fn emit(&mut self, event: Event<'_>) {
        if self.error.is_some() {
            return;
        }
        if let Err(e) = self.writer.write_event(event) {
            self.error = Some(e);
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/scene/writer.rs"]
mod tests;
