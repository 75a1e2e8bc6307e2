// Layout primitives: font metrics, word wrap, block flow and pagination.
// Everything here is synchronous and CPU-bound; callers on the async side run
// it inside tokio::task::spawn_blocking.

pub mod flow;
pub mod font_metrics;
pub mod wrap;

// Re-export the public API consumed by the renderer.
pub use flow::{
    paginate, Align, Block, BoxBorder, Columns, DrawOp, ImageBlock, PageGeometry, PageSize,
    QrBlock, Stroke, Table, TextStyle,
};
pub use font_metrics::PdfFont;
