//! Bridges `tracing` events into [`TextHandler`] records.
//!
//! Every span in an event's scope contributes its name as a group and its fields as bound
//! attributes, outermost span first:
//! ```text
//! 2024-03-01T12:30:05.042+01:00 INFO served (request=(id=7, status=200))
//! ```

use crate::attr::{Attr, Value};
use crate::handler::{Record, TextHandler};
use std::fmt::Debug;
use std::io::Write;
use tracing::field::{Field, Visit};
use tracing::span::{self, Id};
use tracing::{Event, Metadata, Subscriber};
use tracing_subscriber::Layer;
use tracing_subscriber::layer::Context;
use tracing_subscriber::registry::LookupSpan;

/// Field carrying the log message of an event.
const MESSAGE_FIELD: &str = "message";

/// A [`Layer`] writing each event as one line through a [`TextHandler`].
pub struct TextLayer<W> {
    handler: TextHandler<W>,
}

impl<W: Write> TextLayer<W> {
    pub fn new(handler: TextHandler<W>) -> Self {
        TextLayer { handler }
    }
}

/// Fields recorded for a span, stored in the span's extensions.
struct SpanAttrs(Vec<Attr>);

impl<S, W> Layer<S> for TextLayer<W>
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    W: Write + Send + 'static,
{
    fn enabled(&self, metadata: &Metadata<'_>, _ctx: Context<'_, S>) -> bool {
        self.handler.enabled(*metadata.level())
    }

    fn on_new_span(&self, attrs: &span::Attributes<'_>, id: &Id, ctx: Context<'_, S>) {
        let Some(span) = ctx.span(id) else {
            return;
        };

        let mut visitor = FieldVisitor::for_span();
        attrs.record(&mut visitor);
        span.extensions_mut().insert(SpanAttrs(visitor.attrs));
    }

    fn on_record(&self, id: &Id, values: &span::Record<'_>, ctx: Context<'_, S>) {
        let Some(span) = ctx.span(id) else {
            return;
        };

        let mut visitor = FieldVisitor::for_span();
        values.record(&mut visitor);

        let mut extensions = span.extensions_mut();
        match extensions.get_mut::<SpanAttrs>() {
            Some(SpanAttrs(attrs)) => {
                for attr in visitor.attrs {
                    match attrs.iter_mut().find(|existing| existing.key == attr.key) {
                        Some(existing) => existing.value = attr.value,
                        None => attrs.push(attr),
                    }
                }
            }
            None => extensions.insert(SpanAttrs(visitor.attrs)),
        }
    }

    fn on_event(&self, event: &Event<'_>, ctx: Context<'_, S>) {
        let metadata = event.metadata();
        if !self.handler.enabled(*metadata.level()) {
            return;
        }

        let mut handler = self.handler.clone();
        if let Some(scope) = ctx.event_scope(event) {
            for span in scope.from_root() {
                handler = handler.with_group(span.name());

                let extensions = span.extensions();
                if let Some(SpanAttrs(attrs)) = extensions.get::<SpanAttrs>() {
                    handler = handler.with_attrs(attrs.clone());
                }
            }
        }

        let mut visitor = FieldVisitor::for_event();
        event.record(&mut visitor);

        let mut record = Record::new(*metadata.level(), visitor.message.unwrap_or_default())
            .with_attrs(visitor.attrs);
        if let (Some(file), Some(line)) = (metadata.file(), metadata.line()) {
            record = record.with_source(file, line);
        }

        if let Err(err) = handler.handle(&record) {
            eprintln!("Failed to write log record: {}", err);
        }
    }
}

/// Collects the fields of an event or span as scalar attributes.
///
/// Only events carry a message. Span fields named `message` stay regular attributes.
struct FieldVisitor {
    extract_message: bool,
    message: Option<String>,
    attrs: Vec<Attr>,
}

impl FieldVisitor {
    fn for_event() -> Self {
        FieldVisitor {
            extract_message: true,
            message: None,
            attrs: Vec::new(),
        }
    }

    fn for_span() -> Self {
        FieldVisitor {
            extract_message: false,
            ..Self::for_event()
        }
    }

    fn push(&mut self, field: &Field, value: Value) {
        if self.extract_message && field.name() == MESSAGE_FIELD {
            self.message = Some(value.to_string());
        } else {
            self.attrs.push(Attr::new(field.name(), value));
        }
    }
}

impl Visit for FieldVisitor {
    fn record_f64(&mut self, field: &Field, value: f64) {
        self.push(field, value.into());
    }

    fn record_i64(&mut self, field: &Field, value: i64) {
        self.push(field, value.into());
    }

    fn record_u64(&mut self, field: &Field, value: u64) {
        self.push(field, value.into());
    }

    fn record_bool(&mut self, field: &Field, value: bool) {
        self.push(field, value.into());
    }

    fn record_str(&mut self, field: &Field, value: &str) {
        self.push(field, value.into());
    }

    fn record_debug(&mut self, field: &Field, value: &dyn Debug) {
        self.push(field, Value::scalar(format_args!("{:?}", value)));
    }
}
