//! Document renderer.
//!
//! # Flow
//! 1. The layout variant of the resolved style picks a builder, which turns
//!    the resume into a `Vec<Block>`.
//! 2. `layout::paginate` places the blocks onto pages.
//! 3. Page chrome is painted under each page's content.
//! 4. `pdf::write_pdf` serializes the result.
//!
//! Everything here is synchronous and CPU-bound. The HTTP layer runs it
//! inside `tokio::task::spawn_blocking`.

pub mod chrome;
pub mod media;
pub mod pdf;
pub mod single;
pub mod text;
pub mod two_column;

use thiserror::Error;
use tracing::debug;

use crate::layout::{paginate, Block, DrawOp, PageGeometry, TextStyle};
use crate::models::Resume;
use crate::templates::style::{Layout, RenderOptions, ResolvedStyle};

#[derive(Debug, Error)]
pub enum RenderError {
    /// Flow content that cannot be placed on a page.
    #[error("Layout error: {0}")]
    Layout(String),

    #[error("PDF writer error: {0}")]
    Pdf(String),
}

/// Appends `text` as a paragraph unless it is blank.
pub(crate) fn push_text(out: &mut Vec<Block>, text: impl AsRef<str>, style: &TextStyle) {
    let text = text.as_ref().trim();
    if !text.is_empty() {
        out.push(Block::text(text, style));
    }
}

/// Builds the flowing content for `resume` without paginating it.
pub fn build_document(
    resume: &Resume,
    resolved: &ResolvedStyle,
    options: &RenderOptions,
    geometry: &PageGeometry,
) -> Vec<Block> {
    let header = options.header_layout.unwrap_or(resolved.header_layout);
    match &resolved.layout {
        Layout::Single(config) => {
            single::build(resume, resolved, config, options, geometry.content_width())
        }
        Layout::TwoColumn(config) => {
            two_column::build(resume, resolved, config, header, geometry.content_width())
        }
    }
}

/// Renders `resume` to PDF bytes. Either a complete document or an error;
/// never partial output.
pub fn render_pdf(
    resume: &Resume,
    resolved: &ResolvedStyle,
    options: &RenderOptions,
) -> Result<Vec<u8>, RenderError> {
    let geometry = PageGeometry::new(options.page_size, resolved.margin_pt);
    let blocks = build_document(resume, resolved, options, &geometry);
    let content = paginate(&blocks, &geometry)?;

    let chrome = chrome::page_chrome(&resolved.style, geometry.width, geometry.height);
    let pages: Vec<Vec<DrawOp>> = content
        .into_iter()
        .map(|ops| chrome.iter().cloned().chain(ops).collect())
        .collect();

    debug!(
        template = %resolved.key,
        pages = pages.len(),
        blocks = blocks.len(),
        "resume laid out"
    );
    pdf::write_pdf(&format!("Resume - {}", resume.full_name), &geometry, &pages)
}


#[cfg(test)]
mod tests {
    use super::fixtures::sample_resume;
    use super::*;
    use crate::layout::PageSize;
    use crate::templates::style::{resolve_style, RenderRequest, StyleOverrides};
    use crate::templates::TemplateRegistry;

    fn render(template: &str, resume: &Resume, json: serde_json::Value) -> Vec<u8> {
        let request: RenderRequest = serde_json::from_value(json).unwrap();
        let registry = TemplateRegistry::builtin("modern");
        let resolved = resolve_style(&registry, template, &StyleOverrides::from_request(&request));
        render_pdf(resume, &resolved, &RenderOptions::from_request(&request)).unwrap()
    }

    #[test]
    fn test_name_only_resume_renders() {
        let resume = Resume {
            full_name: "Only Name".into(),
            ..Default::default()
        };
        let bytes = render("modern", &resume, serde_json::json!({}));
        assert!(bytes.starts_with(b"%PDF"));
    }

    #[test]
    fn test_every_template_renders_full_resume() {
        let registry = TemplateRegistry::builtin("modern");
        let resume = sample_resume();
        for summary in registry.catalog() {
            let resolved = resolve_style(&registry, summary.key.as_str(), &StyleOverrides::default());
            let bytes = render_pdf(&resume, &resolved, &RenderOptions::default())
                .unwrap_or_else(|e| panic!("{} failed: {e}", summary.key));
            assert!(bytes.starts_with(b"%PDF"), "{}", summary.key);
        }
    }

    #[test]
    fn test_modes_and_page_sizes_render() {
        let resume = sample_resume();
        for json in [
            serde_json::json!({"page_size": "a4", "compact_mode": true}),
            serde_json::json!({"ats_safe_mode": true, "font_scale": 1.3}),
            serde_json::json!({"layout_override": "two", "header_layout": "split"}),
            serde_json::json!({"margin_preset": "wide", "heading_align": "bogus"}),
        ] {
            assert!(render("classic", &resume, json).starts_with(b"%PDF"));
        }
    }

    #[test]
    fn test_profile_photo_is_embedded() {
        let mut resume = sample_resume();
        resume.profile_pic = Some(media::fixtures::tiny_png());
        let registry = TemplateRegistry::builtin("modern");
        let resolved = resolve_style(&registry, "contemporary_photo", &StyleOverrides::default());
        let geometry = PageGeometry::new(PageSize::Letter, resolved.margin_pt);
        let blocks = build_document(&resume, &resolved, &RenderOptions::default(), &geometry);
        assert!(matches!(blocks[0], Block::Image(_)));
        assert!(render_pdf(&resume, &resolved, &RenderOptions::default()).is_ok());
    }

    #[test]
    fn test_corrupt_photo_does_not_abort() {
        let mut resume = sample_resume();
        resume.profile_pic = Some(b"not an image".to_vec());
        assert!(render("modern", &resume, serde_json::json!({})).starts_with(b"%PDF"));
    }

    #[test]
    fn test_long_resume_spans_pages() {
        let mut resume = sample_resume();
        resume.skills = (0..150).map(|i| format!("Skill {i:03}")).collect();
        let registry = TemplateRegistry::builtin("modern");
        let resolved = resolve_style(&registry, "modern", &StyleOverrides::default());
        let options = RenderOptions::default();
        let geometry = PageGeometry::new(options.page_size, resolved.margin_pt);
        let pages = paginate(&build_document(&resume, &resolved, &options, &geometry), &geometry).unwrap();
        assert!(pages.len() >= 2);
        assert!(render_pdf(&resume, &resolved, &options).is_ok());
    }

    #[test]
    fn test_non_latin_text_renders() {
        let mut resume = sample_resume();
        resume.full_name = "Zoë Ångström".into();
        resume.summary = "Built “résumé” tooling – fast…\n東京".into();
        assert!(render("modern", &resume, serde_json::json!({})).starts_with(b"%PDF"));
    }
}
