// Template registry and the style resolution pipeline.

pub mod color;
pub mod handlers;
pub mod registry;
pub mod style;

pub use registry::{TemplateKey, TemplateRegistry};
pub use style::{resolve_style, RenderOptions, RenderRequest, ResolvedStyle, StyleOverrides};
