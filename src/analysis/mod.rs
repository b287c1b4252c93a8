//! Client-side derivations over loaded analyses and matches.
//!
//! Everything here is pure: grouping by match, search/sort/paging, and
//! turning markdown-like analysis text into display markup.

pub mod filter;
pub mod format;
pub mod grouping;

pub use filter::{AnalysisStats, SortOrder, relative_time};
pub use format::{Inline, LineKind, MarkupLine, preview, to_html, to_markup};
pub use grouping::{GroupedMatch, group_by_match};
