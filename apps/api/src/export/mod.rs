//! Export formats built on top of the renderer: PDF, RTF, multi-template ZIP
//! and the branding pack.

pub mod branding;
pub mod bulk;
pub mod handlers;
pub mod rtf;

use std::io::{Cursor, Write};

use thiserror::Error;
use tracing::info;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

use crate::models::Resume;
use crate::render::{render_pdf, RenderError};
use crate::templates::{resolve_style, RenderOptions, RenderRequest, StyleOverrides, TemplateRegistry};

#[derive(Debug, Error)]
pub enum ExportError {
    #[error(transparent)]
    Render(#[from] RenderError),

    #[error("Archive error: {0}")]
    Zip(#[from] zip::result::ZipError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("No valid templates selected")]
    NoTemplates,
}

/// Resolves the requested template (or the registry default) and renders.
pub fn export_pdf(
    registry: &TemplateRegistry,
    resume: &Resume,
    request: &RenderRequest,
) -> Result<Vec<u8>, ExportError> {
    let template = request
        .template
        .as_deref()
        .unwrap_or_else(|| registry.default_key().as_str());
    let resolved = resolve_style(registry, template, &StyleOverrides::from_request(request));
    let bytes = render_pdf(resume, &resolved, &RenderOptions::from_request(request))?;
    info!(
        name = resume.display_name(),
        template = %resolved.key,
        bytes = bytes.len(),
        "PDF exported"
    );
    Ok(bytes)
}

/// Packs `(name, contents)` pairs into a deflated ZIP, in the given order.
pub(crate) fn write_zip<N, D>(entries: impl IntoIterator<Item = (N, D)>) -> Result<Vec<u8>, ExportError>
where
    N: Into<String>,
    D: AsRef<[u8]>,
{
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);
    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
    for (name, data) in entries {
        zip.start_file(name.into(), options)?;
        zip.write_all(data.as_ref())?;
    }
    Ok(zip.finish()?.into_inner())
}

#[cfg(test)]
pub(crate) mod archive {
    use std::io::{Cursor, Read};

    /// Entry names and contents of a ZIP produced by `write_zip`.
    pub fn entries(bytes: &[u8]) -> Vec<(String, Vec<u8>)> {
        let mut archive = zip::ZipArchive::new(Cursor::new(bytes)).unwrap();
        (0..archive.len())
            .map(|i| {
                let mut file = archive.by_index(i).unwrap();
                let mut data = Vec::new();
                file.read_to_end(&mut data).unwrap();
                (file.name().to_string(), data)
            })
            .collect()
    }
}
