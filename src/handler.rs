//! The text handler turning records into lines on a shared sink.
//!
//! A [`TextHandler`] is an immutable value: [`TextHandler::with_attrs`] and
//! [`TextHandler::with_group`] return new handlers with one more bound frame and never
//! touch the handler they were derived from. All handlers derived from the same root share
//! its sink and the mutex guarding it, so lines written concurrently never interleave.

use crate::attr::Attr;
use crate::error::{RenderError, RenderResult};
use crate::render::{self, Frame};
use chrono::{DateTime, FixedOffset, Local};
use parking_lot::Mutex;
use std::env;
use std::io::Write;
use std::sync::Arc;
use tracing::Level;
use tracing::level_filters::LevelFilter;

/// Initial capacity of the per-record line buffer.
const LINE_CAPACITY: usize = 1024;

/// Call site of a log statement.
#[derive(Clone, Debug, PartialEq)]
pub struct Source {
    pub file: String,
    pub line: u32,
}

/// A single log event handed to a [`TextHandler`].
#[derive(Clone, Debug)]
pub struct Record {
    pub time: DateTime<FixedOffset>,
    pub level: Level,
    pub message: String,
    pub source: Option<Source>,
    pub attrs: Vec<Attr>,
}

impl Record {
    /// Creates a record stamped with the current local time.
    pub fn new(level: Level, message: impl Into<String>) -> Self {
        Record {
            time: Local::now().fixed_offset(),
            level,
            message: message.into(),
            source: None,
            attrs: Vec::new(),
        }
    }

    pub fn with_time(mut self, time: DateTime<FixedOffset>) -> Self {
        self.time = time;
        self
    }

    pub fn with_source(mut self, file: impl Into<String>, line: u32) -> Self {
        self.source = Some(Source {
            file: file.into(),
            line,
        });
        self
    }

    pub fn with_attrs(mut self, attrs: Vec<Attr>) -> Self {
        self.attrs.extend(attrs);
        self
    }

    pub fn add_attr(&mut self, attr: Attr) {
        self.attrs.push(attr);
    }
}

/// Options for a [`TextHandler`].
#[derive(Clone, Debug, PartialEq)]
pub struct HandlerOptions {
    /// Minimum level of records to emit.
    pub level: LevelFilter,
    /// Prefix the message with `<file>:<line>` of the call site.
    pub add_source: bool,
}

impl Default for HandlerOptions {
    fn default() -> Self {
        HandlerOptions {
            level: LevelFilter::INFO,
            add_source: false,
        }
    }
}

impl HandlerOptions {
    /// Reads options from the environment.
    ///
    /// - `LOG_LEVEL`: `trace`, `debug`, `info`, `warn`, `error` or `off` (default `info`)
    /// - `LOG_SOURCE`: `true`/`1` to include the call site (default off)
    pub fn from_env() -> Self {
        Self::from_lookup(|name| env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();

        HandlerOptions {
            level: lookup("LOG_LEVEL")
                .and_then(|level| level.trim().parse().ok())
                .unwrap_or(defaults.level),
            add_source: lookup("LOG_SOURCE")
                .map(|s| s == "true" || s == "1")
                .unwrap_or(defaults.add_source),
        }
    }

    pub fn with_level(mut self, level: LevelFilter) -> Self {
        self.level = level;
        self
    }

    pub fn with_source(mut self, add_source: bool) -> Self {
        self.add_source = add_source;
        self
    }
}

/// Renders records as single lines of text and writes them to a shared sink.
pub struct TextHandler<W> {
    sink: Arc<Mutex<W>>,
    options: HandlerOptions,
    frames: Arc<[Frame]>,
}

impl<W> Clone for TextHandler<W> {
    fn clone(&self) -> Self {
        TextHandler {
            sink: self.sink.clone(),
            options: self.options.clone(),
            frames: self.frames.clone(),
        }
    }
}

impl<W: Write> TextHandler<W> {
    pub fn new(sink: W, options: HandlerOptions) -> Self {
        TextHandler {
            sink: Arc::new(Mutex::new(sink)),
            options,
            frames: Arc::from(Vec::new()),
        }
    }

    pub fn options(&self) -> &HandlerOptions {
        &self.options
    }

    pub fn enabled(&self, level: Level) -> bool {
        level <= self.options.level
    }

    /// Returns a handler which renders `attrs` ahead of each record's own attributes.
    ///
    /// Empty attributes are dropped. If nothing remains, the handler is returned as is.
    pub fn with_attrs(&self, attrs: Vec<Attr>) -> Self {
        let attrs: Vec<Attr> = attrs.into_iter().filter(|attr| !attr.is_empty()).collect();
        if attrs.is_empty() {
            return self.clone();
        }

        self.with_frame(Frame::attrs(attrs))
    }

    /// Returns a handler which nests everything bound or logged afterwards under `name`.
    ///
    /// An empty name returns the handler as is.
    pub fn with_group(&self, name: impl Into<String>) -> Self {
        let name = name.into();
        if name.is_empty() {
            return self.clone();
        }

        self.with_frame(Frame::group(name))
    }

    fn with_frame(&self, frame: Frame) -> Self {
        let mut frames = Vec::with_capacity(self.frames.len() + 1);
        frames.extend_from_slice(&self.frames);
        frames.push(frame);

        TextHandler {
            sink: self.sink.clone(),
            options: self.options.clone(),
            frames: frames.into(),
        }
    }

    /// Renders the record into a line and writes it to the sink with a single write call.
    ///
    /// The line is built without holding the sink lock. A write accepting fewer bytes than
    /// the line holds is reported as [`RenderError::ShortWrite`].
    pub fn handle(&self, record: &Record) -> RenderResult<()> {
        let line = self.render(record)?;

        let mut sink = self.sink.lock();
        let written = sink.write(line.as_bytes())?;
        if written != line.len() {
            return Err(RenderError::ShortWrite {
                expected: line.len(),
                actual: written,
            });
        }

        Ok(())
    }

    fn render(&self, record: &Record) -> RenderResult<String> {
        let mut line = String::with_capacity(LINE_CAPACITY);
        render::write_header(&mut line, record, self.options.add_source)?;
        render::write_region(&mut line, &self.frames, &record.attrs)?;
        line.push('\n');

        Ok(line)
    }

    /// Flushes the underlying sink.
    pub fn flush(&self) -> RenderResult<()> {
        self.sink.lock().flush()?;

        Ok(())
    }
}
