//! Report formatters: text summary, LCOV trace, HTML artifact.
//!
//! JSON export goes straight through serde on `CoverageOutcome` and needs
//! no formatter of its own.

mod html;
mod lcov;
mod text;

pub use html::{HtmlFormatter, HtmlReportConfig, Theme};
pub use lcov::LcovFormatter;
pub use text::TextFormatter;
