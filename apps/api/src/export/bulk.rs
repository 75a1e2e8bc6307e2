//! One resume rendered in several templates, packed into a ZIP.

use tracing::{debug, info};

use crate::export::{write_zip, ExportError};
use crate::models::Resume;
use crate::render::render_pdf;
use crate::templates::{resolve_style, RenderOptions, RenderRequest, StyleOverrides, TemplateKey, TemplateRegistry};

/// Canonical keys for `names`: unknown names dropped, duplicates collapsed
/// (first occurrence wins), at most `limit` entries. Blank input selects the
/// registry default.
pub fn select_templates(registry: &TemplateRegistry, names: &[String], limit: usize) -> Vec<TemplateKey> {
    let names: Vec<&str> = names
        .iter()
        .map(|n| n.trim())
        .filter(|n| !n.is_empty())
        .collect();
    if names.is_empty() {
        return vec![registry.default_key().clone()];
    }

    let mut selected: Vec<TemplateKey> = Vec::new();
    for name in names {
        match registry.lookup(name) {
            Some(key) if !selected.contains(&key) => selected.push(key),
            Some(_) => {}
            None => debug!(name, "bulk export skipping unknown template"),
        }
    }
    selected.truncate(limit.max(1));
    selected
}

/// Renders `resume` once per selected template. Entries are named
/// `{stem}_{key}.pdf` and keep selection order.
pub fn render_bulk(
    registry: &TemplateRegistry,
    resume: &Resume,
    names: &[String],
    request: &RenderRequest,
    limit: usize,
) -> Result<Vec<u8>, ExportError> {
    let selected = select_templates(registry, names, limit);
    if selected.is_empty() {
        return Err(ExportError::NoTemplates);
    }

    let overrides = StyleOverrides::from_request(request);
    let options = RenderOptions::from_request(request);
    let stem = resume.file_stem();
    let mut entries = Vec::with_capacity(selected.len());
    for key in &selected {
        let resolved = resolve_style(registry, key.as_str(), &overrides);
        entries.push((format!("{stem}_{key}.pdf"), render_pdf(resume, &resolved, &options)?));
    }

    let archive = write_zip(entries)?;
    info!(
        name = resume.display_name(),
        templates = selected.len(),
        bytes = archive.len(),
        "bulk export packed"
    );
    Ok(archive)
}
