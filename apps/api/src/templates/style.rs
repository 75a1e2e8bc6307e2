//! Style resolution: turns a template name plus per-request overrides into a
//! fully resolved, render-ready style.
//!
//! # Pipeline
//! 1. base descriptor from the registry
//! 2. personality overlay
//! 3. explicit overrides (layout, alignment, accent, font, page border)
//! 4. alignment normalization (done while parsing the request: invalid → left)
//! 5. compact mode scaling
//! 6. ATS-safe stripping, which wins over everything before it
//! 7. font scale, clamped and floored
//! 8. margin preset
//!
//! Every stage is a pure function over `TemplateStyle` values. Nothing here
//! fails: malformed input is normalized or ignored at the boundary.

use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize};
use tracing::debug;

use crate::layout::{Align, PageSize, PdfFont};
use crate::templates::color::HexColor;
use crate::templates::registry::{
    HeaderLayout, LayoutKind, TemplateKey, TemplateRegistry, TemplateStyle,
};

// ────────────────────────────────────────────────────────────────────────────
// Wire request
// ────────────────────────────────────────────────────────────────────────────

/// Render options as sent by clients. Loosely typed on purpose; see
/// `StyleOverrides::from_request` and `RenderOptions::from_request`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderRequest {
    #[serde(alias = "template_name", alias = "template_key")]
    pub template: Option<String>,
    pub page_size: Option<String>,
    #[serde(alias = "page_layout")]
    pub layout_override: Option<String>,
    #[serde(alias = "heading_align")]
    pub heading_align_override: Option<String>,
    #[serde(alias = "body_align")]
    pub body_align_override: Option<String>,
    pub accent_color_override: Option<String>,
    pub font_override: Option<String>,
    pub page_border_override: Option<bool>,
    pub compact_mode: bool,
    pub ats_safe_mode: bool,
    pub section_order: Option<Vec<String>>,
    pub section_visibility: Option<BTreeMap<String, bool>>,
    #[serde(deserialize_with = "lenient_number")]
    pub font_scale: Option<f64>,
    pub margin_preset: Option<String>,
    #[serde(alias = "headerLayout")]
    pub header_layout: Option<String>,
}

/// Accepts a number or a numeric string; anything else becomes `None`.
fn lenient_number<'de, D: Deserializer<'de>>(d: D) -> Result<Option<f64>, D::Error> {
    let value = serde_json::Value::deserialize(d)?;
    Ok(match value {
        serde_json::Value::Number(n) => n.as_f64(),
        serde_json::Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    })
}

// ────────────────────────────────────────────────────────────────────────────
// Typed overrides
// ────────────────────────────────────────────────────────────────────────────

/// Heading/body font pair for a font-family override.
pub fn font_pair(family: &str) -> (PdfFont, PdfFont) {
    let normalized: String = family
        .chars()
        .filter(|c| !c.is_whitespace() && *c != '-' && *c != '_')
        .collect::<String>()
        .to_ascii_lowercase();
    let body = match normalized.as_str() {
        "helvetica" | "poppins" | "montserrat" | "nunito" | "firasans" => PdfFont::Helvetica,
        "times" | "georgia" | "lora" | "merriweather" | "robotoslab" | "playfairdisplay"
        | "librebaskerville" => PdfFont::TimesRoman,
        "courier" => PdfFont::Courier,
        _ => PdfFont::Helvetica,
    };
    (body.bold(), body)
}

/// Margin in points for a preset name. `None` means the `normal` preset.
pub fn margin_for(preset: Option<&str>) -> f32 {
    let name = preset.map(|p| p.trim().to_ascii_lowercase());
    match name.as_deref().unwrap_or("normal") {
        "narrow" | "compact" | "normal" => 54.0,
        "wide" | "relaxed" => 90.0,
        _ => 72.0,
    }
}

fn normalize_align(raw: &str) -> Align {
    Align::parse(raw).unwrap_or(Align::Left)
}

/// Overrides after boundary validation. Absent fields leave the template alone.
#[derive(Debug, Clone, PartialEq)]
pub struct StyleOverrides {
    pub layout: Option<LayoutKind>,
    pub heading_align: Option<Align>,
    pub body_align: Option<Align>,
    pub accent: Option<HexColor>,
    /// (heading, body)
    pub fonts: Option<(PdfFont, PdfFont)>,
    pub page_border: Option<bool>,
    pub compact: bool,
    pub ats_safe: bool,
    pub font_scale: f64,
    pub margin_pt: f32,
}

impl Default for StyleOverrides {
    fn default() -> Self {
        Self {
            layout: None,
            heading_align: None,
            body_align: None,
            accent: None,
            fonts: None,
            page_border: None,
            compact: false,
            ats_safe: false,
            font_scale: 1.0,
            margin_pt: margin_for(None),
        }
    }
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

impl StyleOverrides {
    pub fn from_request(req: &RenderRequest) -> Self {
        let layout = non_blank(&req.layout_override).and_then(|raw| {
            let parsed = LayoutKind::parse(raw);
            if parsed.is_none() {
                debug!(layout = raw, "ignoring unknown layout override");
            }
            parsed
        });
        let accent = non_blank(&req.accent_color_override).and_then(|raw| {
            let parsed = HexColor::parse(raw);
            if parsed.is_none() {
                debug!(accent = raw, "ignoring malformed accent color");
            }
            parsed
        });
        let font_scale = match req.font_scale {
            Some(v) if v.is_finite() => v,
            _ => 1.0,
        };
        Self {
            layout,
            heading_align: non_blank(&req.heading_align_override).map(normalize_align),
            body_align: non_blank(&req.body_align_override).map(normalize_align),
            accent,
            fonts: non_blank(&req.font_override).map(font_pair),
            page_border: req.page_border_override,
            compact: req.compact_mode,
            ats_safe: req.ats_safe_mode,
            font_scale,
            margin_pt: margin_for(non_blank(&req.margin_preset)),
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Sections and per-render options
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SectionKey {
    Summary,
    Experience,
    Education,
    Projects,
    Skills,
    Achievements,
    Custom,
    Certifications,
    Languages,
    References,
}

impl SectionKey {
    /// Sections callers may reorder, in their canonical order.
    pub const ORDERABLE: [SectionKey; 7] = [
        SectionKey::Summary,
        SectionKey::Experience,
        SectionKey::Education,
        SectionKey::Projects,
        SectionKey::Skills,
        SectionKey::Achievements,
        SectionKey::Custom,
    ];

    /// Always rendered after the orderable block, in this order.
    pub const FIXED_TAIL: [SectionKey; 3] = [
        SectionKey::Certifications,
        SectionKey::Languages,
        SectionKey::References,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            SectionKey::Summary => "summary",
            SectionKey::Experience => "experience",
            SectionKey::Education => "education",
            SectionKey::Projects => "projects",
            SectionKey::Skills => "skills",
            SectionKey::Achievements => "achievements",
            SectionKey::Custom => "custom",
            SectionKey::Certifications => "certifications",
            SectionKey::Languages => "languages",
            SectionKey::References => "references",
        }
    }

    /// Parses only the orderable keys.
    pub fn parse_orderable(raw: &str) -> Option<Self> {
        let wanted = raw.trim().to_ascii_lowercase();
        Self::ORDERABLE.into_iter().find(|k| k.as_str() == wanted)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RenderOptions {
    pub page_size: PageSize,
    /// Explicit caller order; empty means canonical order.
    pub section_order: Vec<SectionKey>,
    /// Lowercased keys; missing keys are visible.
    pub visibility: BTreeMap<String, bool>,
    /// `None` means the template's default header layout.
    pub header_layout: Option<HeaderLayout>,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            page_size: PageSize::Letter,
            section_order: Vec::new(),
            visibility: BTreeMap::new(),
            header_layout: None,
        }
    }
}

impl RenderOptions {
    pub fn from_request(req: &RenderRequest) -> Self {
        let mut section_order = Vec::new();
        for raw in req.section_order.iter().flatten() {
            if let Some(key) = SectionKey::parse_orderable(raw) {
                if !section_order.contains(&key) {
                    section_order.push(key);
                }
            }
        }
        let visibility = req
            .section_visibility
            .iter()
            .flatten()
            .map(|(k, v)| (k.trim().to_ascii_lowercase(), *v))
            .collect();
        let header_layout = non_blank(&req.header_layout)
            .map(|raw| HeaderLayout::parse(raw).unwrap_or(HeaderLayout::Default));
        Self {
            page_size: req
                .page_size
                .as_deref()
                .map(PageSize::parse)
                .unwrap_or_default(),
            section_order,
            visibility,
            header_layout,
        }
    }

    pub fn is_ordered(&self) -> bool {
        !self.section_order.is_empty()
    }

    pub fn is_visible(&self, key: SectionKey) -> bool {
        self.visibility.get(key.as_str()).copied().unwrap_or(true)
    }

    /// Sections to attempt, in emission order: the caller's order (or the
    /// canonical one) followed by the fixed tail. Visibility is applied here.
    pub fn sections(&self) -> Vec<SectionKey> {
        let head: &[SectionKey] = if self.is_ordered() {
            &self.section_order
        } else {
            &SectionKey::ORDERABLE
        };
        head.iter()
            .chain(SectionKey::FIXED_TAIL.iter())
            .copied()
            .filter(|k| self.is_visible(*k))
            .collect()
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Resolved style
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SummaryLabel {
    Summary,
    AboutMe,
}

impl SummaryLabel {
    pub fn text(self) -> &'static str {
        match self {
            SummaryLabel::Summary => "SUMMARY",
            SummaryLabel::AboutMe => "ABOUT ME",
        }
    }

    fn for_key(key: &TemplateKey) -> Self {
        match key.as_str() {
            "corporate" | "elegant_light" => SummaryLabel::AboutMe,
            _ => SummaryLabel::Summary,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SingleConfig {
    pub education_table: bool,
    pub references_two_column: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TwoColumnConfig {
    /// Fraction of content width given to the sidebar, in `[0.22, 0.45]`.
    pub left_ratio: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Layout {
    Single(SingleConfig),
    TwoColumn(TwoColumnConfig),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResolvedStyle {
    pub key: TemplateKey,
    pub style: TemplateStyle,
    pub margin_pt: f32,
    pub summary_label: SummaryLabel,
    pub header_layout: HeaderLayout,
    pub layout: Layout,
}

pub const MIN_TITLE_SIZE: u32 = 14;
pub const MIN_HEADING_SIZE: u32 = 9;
pub const MIN_BODY_SIZE: u32 = 7;

fn scaled(value: u32, factor: f64, floor: u32) -> u32 {
    ((f64::from(value) * factor).floor() as u32).max(floor)
}

/// Stage 3.
fn apply_overrides(style: TemplateStyle, o: &StyleOverrides) -> TemplateStyle {
    let (font_heading, font_body) = o.fonts.unwrap_or((style.font_heading, style.font_body));
    TemplateStyle {
        layout: o.layout.unwrap_or(style.layout),
        heading_align: o.heading_align.unwrap_or(style.heading_align),
        body_align: o.body_align.unwrap_or(style.body_align),
        accent: o.accent.unwrap_or(style.accent),
        font_heading,
        font_body,
        page_border: o.page_border.unwrap_or(style.page_border),
        ..style
    }
}

/// Stage 5.
fn apply_compact(style: TemplateStyle) -> TemplateStyle {
    TemplateStyle {
        font_size_title: scaled(style.font_size_title, 0.88, 18),
        font_size_heading: scaled(style.font_size_heading, 0.9, 10),
        font_size_body: scaled(style.font_size_body, 0.92, 8),
        spacing: scaled(style.spacing, 0.75, 8),
        ..style
    }
}

/// Stage 6.
fn apply_ats_safe(style: TemplateStyle) -> TemplateStyle {
    TemplateStyle {
        contact_icons: false,
        page_border: false,
        section_border: false,
        font_body: PdfFont::Helvetica,
        font_heading: PdfFont::HelveticaBold,
        accent: HexColor::new(0x11, 0x11, 0x11),
        bullet: "-".to_string(),
        background: HexColor::WHITE,
        bg_art: None,
        ..style
    }
}

/// Stage 7.
fn apply_font_scale(style: TemplateStyle, scale: f64) -> TemplateStyle {
    let fs = if scale.is_finite() { scale.clamp(0.8, 1.3) } else { 1.0 };
    TemplateStyle {
        font_size_title: scaled(style.font_size_title, fs, MIN_TITLE_SIZE),
        font_size_heading: scaled(style.font_size_heading, fs, MIN_HEADING_SIZE),
        font_size_body: scaled(style.font_size_body, fs, MIN_BODY_SIZE),
        ..style
    }
}

/// Runs the full pipeline. Deterministic and total.
pub fn resolve_style(
    registry: &TemplateRegistry,
    template: &str,
    overrides: &StyleOverrides,
) -> ResolvedStyle {
    let key = registry.resolve(template);
    let mut style = registry.get(&key).patched(registry.personality(&key));
    style = apply_overrides(style, overrides);
    if overrides.compact {
        style = apply_compact(style);
    }
    if overrides.ats_safe {
        style = apply_ats_safe(style);
    }
    style = apply_font_scale(style, overrides.font_scale);

    let layout = match style.layout {
        LayoutKind::Single => Layout::Single(SingleConfig {
            education_table: style.education_table,
            references_two_column: style.references_two_column,
        }),
        LayoutKind::TwoColumn => Layout::TwoColumn(TwoColumnConfig {
            left_ratio: if style.left_column_ratio.is_finite() {
                style.left_column_ratio.clamp(0.22, 0.45)
            } else {
                0.32
            },
        }),
    };
    ResolvedStyle {
        summary_label: SummaryLabel::for_key(&key),
        header_layout: style.header_layout,
        margin_pt: overrides.margin_pt,
        key,
        style,
        layout,
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
