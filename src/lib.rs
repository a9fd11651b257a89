//! # rawlog
//!
//! A structured log handler producing lightweight, human-readable lines:
//!
//! ```text
//! 2024-03-01T12:30:05.042+01:00 INFO request served (http=(method=GET, status=200), took=12ms)
//! ```
//!
//! Attributes follow the message in parentheses, separated by `, `. Groups nest their
//! attributes in another pair of parentheses. The output is meant for people, not parsers:
//! values are written as they are, without escaping.
//!
//! ## Quick Start
//!
//! ```
//! use rawlog::attrs;
//! use rawlog::handler::{HandlerOptions, Record, TextHandler};
//! use tracing::Level;
//!
//! let handler = TextHandler::new(std::io::stdout(), HandlerOptions::default())
//!     .with_group("request")
//!     .with_attrs(attrs!["id" => 7]);
//!
//! handler
//!     .handle(&Record::new(Level::INFO, "served").with_attrs(attrs!["status" => 200]))
//!     .unwrap();
//! // ... INFO served (request=(id=7, status=200))
//! ```
//!
//! ## Modules
//!
//! - [`attr`] - Attributes and their values
//! - [`handler`] - Records, options and the [`TextHandler`](handler::TextHandler)
//! - [`render`] - Line rendering
//! - [`logging`] - `tracing` layer and subscriber setup
//!
//! ## Feature Flags
//!
//! - `pretty_logs` - Colors the level of each line

/// Attributes attached to records.
pub mod attr;

/// Render and write errors.
pub mod error;

/// The text handler and its records.
pub mod handler;

/// Tracing layer and subscriber setup.
pub mod logging;

/// Rendering of headers and attribute regions.
pub mod render;

pub use attr::{Attr, Value};
pub use error::{RenderError, RenderResult};
pub use handler::{HandlerOptions, Record, TextHandler};
