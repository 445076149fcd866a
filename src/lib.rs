//! # kodeks-convert
//!
//! Converts documents in the Kodeks legacy markup dialect into HTML with an
//! embedded stylesheet.
//!
//! The source dialect uses flat uppercase tags: `P` paragraphs, `CHAPMARK`
//! chapter markers, character styles (`B`, `I`, `U`, `STRIKE`, `FONT`),
//! `EXTERNAL` cross-document links and `PICTURE` elements carrying base64
//! image data as text. Each source tag is rewritten by [`mapping`], the
//! output tree is grown event by event in [`builder`], and a fixed
//! [`stylesheet`] is appended before rendering.
//!
//! ## Quick Start
//!
//! ```no_run
//! use kodeks_convert::convert_file;
//!
//! let report = convert_file("data/sourceDoc.xml", "data/test.xml").unwrap();
//! println!("{} paragraphs", report.paragraphs);
//! ```
//!
//! ## Pipeline
//!
//! ```text
//! source text ─▶ source::feed ─▶ TreeBuilder ─▶ inject_stylesheet
//!                                                      │
//!              output ◀─ strip_wrapper ◀─ render ◀─────┘
//! ```

pub mod builder;
pub mod convert;
pub mod dom;
pub mod error;
pub mod mapping;
pub mod postprocess;
pub mod serialize;
pub mod source;
pub mod stylesheet;
pub(crate) mod util;

pub use builder::TreeBuilder;
pub use convert::{ConvertConfig, ConvertReport, Converter, convert_file, convert_str};
pub use dom::{Attributes, NodeId, OutputDom};
pub use error::{Error, ParseError, ParseErrorKind, Result};
pub use source::{EventSink, feed};
