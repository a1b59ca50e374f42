// Layout engine: résumé document in, positioned pages out.
// Layout is synchronous and CPU-bound; async callers run it inside
// tokio::task::spawn_blocking.

pub mod blocks;
pub mod composer;
pub mod config;
pub mod font_metrics;
pub mod page;
pub mod pager;
pub mod sections;

// Re-export the public API consumed by the export handlers.
pub use composer::compose_document;
pub use config::LayoutConfig;
pub use font_metrics::FontStyle;
pub use page::{DrawOp, LineSegment, Page, TextRun};
