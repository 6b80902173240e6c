//! Hardware tree markup
//!
//! A small indentation-based markup language used to persist node trees.
//!
//! # Format
//!
//! Every line is an element `name` or `name: value`. Children are indented
//! deeper than their parent. Values that span several lines are written as
//! continuation lines (`: text`) indented below their element:
//!
//! ```text
//! node: system
//!   name: console
//!   attribute
//!     name: region
//!     value: NTSC-U
//!   description
//!     : first line
//!     : second line
//! ```
//!
//! # Example
//!
//! ```rust
//! use hwtree_markup::{Document, Writer};
//!
//! let mut writer = Writer::new();
//! writer.line(0, "node", "system");
//! writer.line(1, "name", "console");
//! let text = writer.finish();
//!
//! let document = Document::parse(&text).unwrap();
//! let node = document.get("node").unwrap();
//! assert_eq!(node.value(), "system");
//! assert_eq!(node.text("name"), "console");
//! ```

#![warn(missing_docs)]

mod element;
mod error;
mod parse;
mod writer;

pub use element::{Document, Element};
pub use error::MarkupError;
pub use writer::{Writer, INDENT};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
