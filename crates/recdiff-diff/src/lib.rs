//! Structural diff engine for recdiff.
//!
//! Compares a *test* record against a *sample* record and produces an
//! aligned, classified line view of their differences, then rebuilds that
//! view into two parallel annotated trees for side-by-side rendering.
//!
//! # Pipeline
//!
//! 1. [`align_services`] -- reorder the sample's service list to follow the test's
//! 2. [`flatten`] -- turn each record into ordered `(path, value)` entries
//! 3. [`merge_lines`] -- merge both entry lists into one [`DiffLineSequence`]
//! 4. [`build_tree`] -- rebuild an [`AnnotatedTree`] per [`Side`]
//! 5. [`render_markup`] -- emit a markup fragment per tree
//!
//! [`compare_records`] runs the whole pipeline over decoded records, and
//! [`Comparator`] adds record lookup through a [`RecordStore`](recdiff_store::RecordStore).

pub mod align;
pub mod annotate;
pub mod config;
pub mod error;
pub mod flatten;
pub mod merge;
pub mod pipeline;
pub mod render;

pub use align::{align_services, services_equivalent};
pub use annotate::{build_tree, AnnotatedTree, Side};
pub use config::DiffConfig;
pub use error::{DiffError, DiffResult};
pub use flatten::flatten;
pub use merge::{merge_lines, Classification, DiffLine, DiffLineSequence, DiffSummary};
pub use pipeline::{compare_records, Comparator, Comparison, RenderedViews};
pub use render::render_markup;
