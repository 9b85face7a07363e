//! Diagnostics reported while importing a diagram document.
//!
//! The import never stops at a bad node or edge. Each problem becomes a
//! warning [`Diagnostic`] returned alongside the network, and only a document
//! that cannot be read at all produces a [`ParseError`].
//!
//! # Example
//!
//! ```
//! # use railmap_parser::error::{Diagnostic, ErrorCode};
//! # use railmap_parser::Span;
//! let diag = Diagnostic::warning("edge `line_a` references unknown node `stn_q`")
//!     .with_code(ErrorCode::E200)
//!     .with_label(Span::new(100..107), "not a node of this document")
//!     .with_help("the edge is skipped");
//! assert_eq!(diag.code(), Some(ErrorCode::E200));
//! ```

mod collector;
mod diagnostic;
mod error_code;
mod label;
mod parse_error;
mod severity;

pub(crate) use collector::DiagnosticCollector;

pub use diagnostic::Diagnostic;
pub use error_code::ErrorCode;
pub use label::Label;
pub use parse_error::ParseError;
pub use severity::Severity;
