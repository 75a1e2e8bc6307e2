//! Template registry: canonical keys, base style descriptors, the alias table
//! for historical/external identifiers, and per-template personality overlays.
//!
//! Built once at startup and shared behind an `Arc`; every lookup is pure.

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::layout::{Align, PdfFont};
use crate::templates::color::HexColor;

/// Key used when neither the request nor the configured default is known.
pub const FALLBACK_TEMPLATE: &str = "modern";

// ────────────────────────────────────────────────────────────────────────────
// Descriptor types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LayoutKind {
    Single,
    TwoColumn,
}

impl LayoutKind {
    /// Accepts the layout override vocabulary; anything else is `None`.
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "single" | "single_column" | "one_column" => Some(Self::Single),
            "two" | "two_column" | "two-column" => Some(Self::TwoColumn),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HeaderLayout {
    #[default]
    Default,
    Left,
    Center,
    Split,
}

impl HeaderLayout {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "default" => Some(Self::Default),
            "left" => Some(Self::Left),
            "center" => Some(Self::Center),
            "split" => Some(Self::Split),
            _ => None,
        }
    }
}

/// Decorative motif drawn under the content of every page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BackgroundArt {
    TopBand,
    LeftRail,
    DoubleRule,
    CornerMark,
    ExecutivePanel,
    SoftOrb,
    MinimalLine,
    SplitRail,
    CreativeBlock,
    ImpactBand,
    PhotoCorner,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TemplateGroup {
    Legacy,
    Signature,
}

/// Canonical template key. Only the registry hands these out, so every key is
/// known to resolve.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct TemplateKey(String);

impl TemplateKey {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TemplateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Complete style descriptor. No optional fields: defaults are filled in when
/// the registry is built.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TemplateStyle {
    pub name: String,
    pub font_heading: PdfFont,
    pub font_body: PdfFont,
    pub font_size_title: u32,
    pub font_size_heading: u32,
    pub font_size_body: u32,
    pub accent: HexColor,
    pub background: HexColor,
    pub section_border: bool,
    pub layout: LayoutKind,
    pub left_column_ratio: f32,
    pub heading_align: Align,
    pub body_align: Align,
    pub bullet: String,
    pub show_date_on_right: bool,
    /// Pattern with `{start}` and `{end}` placeholders.
    pub date_format: String,
    pub spacing: u32,
    pub border_radius: f32,
    pub page_border: bool,
    pub contact_icons: bool,
    pub education_table: bool,
    pub references_two_column: bool,
    pub header_layout: HeaderLayout,
    pub bg_art: Option<BackgroundArt>,
}

/// Partial style layered over a base descriptor.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StylePatch {
    pub font_size_title: Option<u32>,
    pub font_size_heading: Option<u32>,
    pub font_size_body: Option<u32>,
    pub heading_align: Option<Align>,
    pub body_align: Option<Align>,
    pub section_border: Option<bool>,
    pub border_radius: Option<f32>,
    pub bullet: Option<String>,
    pub header_layout: Option<HeaderLayout>,
    pub bg_art: Option<BackgroundArt>,
    pub layout: Option<LayoutKind>,
    pub left_column_ratio: Option<f32>,
    pub page_border: Option<bool>,
    pub contact_icons: Option<bool>,
}

impl TemplateStyle {
    /// Returns a new descriptor with every `Some` field of `patch` applied.
    pub fn patched(&self, patch: &StylePatch) -> TemplateStyle {
        let mut out = self.clone();
        if let Some(v) = patch.font_size_title {
            out.font_size_title = v;
        }
        if let Some(v) = patch.font_size_heading {
            out.font_size_heading = v;
        }
        if let Some(v) = patch.font_size_body {
            out.font_size_body = v;
        }
        if let Some(v) = patch.heading_align {
            out.heading_align = v;
        }
        if let Some(v) = patch.body_align {
            out.body_align = v;
        }
        if let Some(v) = patch.section_border {
            out.section_border = v;
        }
        if let Some(v) = patch.border_radius {
            out.border_radius = v;
        }
        if let Some(v) = &patch.bullet {
            out.bullet = v.clone();
        }
        if let Some(v) = patch.header_layout {
            out.header_layout = v;
        }
        if let Some(v) = patch.bg_art {
            out.bg_art = Some(v);
        }
        if let Some(v) = patch.layout {
            out.layout = v;
        }
        if let Some(v) = patch.left_column_ratio {
            out.left_column_ratio = v;
        }
        if let Some(v) = patch.page_border {
            out.page_border = v;
        }
        if let Some(v) = patch.contact_icons {
            out.contact_icons = v;
        }
        out
    }
}

/// One row of `GET /api/v1/templates`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TemplateSummary {
    pub key: TemplateKey,
    pub name: String,
    pub group: TemplateGroup,
    pub layout: LayoutKind,
}

// ────────────────────────────────────────────────────────────────────────────
// Registry
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
struct TemplateEntry {
    key: TemplateKey,
    group: TemplateGroup,
    style: TemplateStyle,
    personality: StylePatch,
}

#[derive(Debug, Clone)]
pub struct TemplateRegistry {
    entries: Vec<TemplateEntry>,
    index: HashMap<String, usize>,
    default_index: usize,
}

/// Historical and external identifiers mapped onto canonical keys.
const ALIASES: &[(&str, &str)] = &[
    ("mod_clean", "modern"),
    ("mod_zen", "harsh_minimal"),
    ("corp_royal", "corporate"),
    ("corp_slate", "executive"),
    ("classic_ink", "classic"),
    ("classic_paper", "classic"),
    ("creative_amber", "snack_gray"),
    ("creative_blue", "vision_blue"),
    ("ats_fast", "compact"),
    ("ats_plain", "modern"),
    ("two_column_tech", "javid_split"),
    ("canva_mint_pro", "javid_split"),
    ("canva_editorial_rose", "modern"),
    ("canva_neo_charcoal", "executive"),
    ("canva_skyline_aqua", "vision_blue"),
    ("canva_portfolio_craft", "creative_split"),
    ("canva_aurora_green", "teal_modern"),
    ("canva_midnight_navy", "executive_slate"),
    ("canva_sunset_coral", "snack_gray"),
    ("canva_lilac_lite", "creative_split"),
    ("canva_forest_charcoal", "metro_sidebar"),
    ("canva_ice_blue", "astra_clean"),
    ("canva_gold_ink", "classic_clarity"),
    ("canva_ruby_panel", "impact_panel"),
    ("canva_slate_frost", "mono_compact"),
    ("canva_ocean_pro", "metro_sidebar"),
];

/// Lowercase, trim, and fold `-`/space into `_`.
fn normalize_name(raw: &str) -> String {
    raw.trim().to_lowercase().replace(['-', ' '], "_")
}

impl TemplateRegistry {
    /// Builds the registry of built-in templates. An unknown `default_key`
    /// falls back to `modern`.
    pub fn builtin(default_key: &str) -> Self {
        let entries: Vec<TemplateEntry> = builtin_templates()
            .into_iter()
            .map(|(key, group, style)| TemplateEntry {
                personality: personality_for(key),
                key: TemplateKey(key.to_string()),
                group,
                style,
            })
            .collect();
        let index: HashMap<String, usize> = entries
            .iter()
            .enumerate()
            .map(|(i, e)| (e.key.0.clone(), i))
            .collect();
        let wanted = normalize_name(default_key);
        let default_index = index
            .get(&wanted)
            .or_else(|| index.get(FALLBACK_TEMPLATE))
            .copied()
            .unwrap_or(0);
        Self {
            entries,
            index,
            default_index,
        }
    }

    pub fn default_key(&self) -> &TemplateKey {
        &self.entries[self.default_index].key
    }

    /// Normalizes and de-aliases `name` without falling back.
    pub fn lookup(&self, name: &str) -> Option<TemplateKey> {
        let normalized = normalize_name(name);
        let canonical = ALIASES
            .iter()
            .find(|(alias, _)| *alias == normalized)
            .map(|(_, target)| (*target).to_string())
            .unwrap_or(normalized);
        self.index
            .get(&canonical)
            .map(|&i| self.entries[i].key.clone())
    }

    /// Like `lookup` but unknown names resolve to the default key.
    pub fn resolve(&self, name: &str) -> TemplateKey {
        self.lookup(name)
            .unwrap_or_else(|| self.default_key().clone())
    }

    fn entry(&self, key: &TemplateKey) -> &TemplateEntry {
        let i = self.index.get(key.as_str()).copied().unwrap_or(self.default_index);
        &self.entries[i]
    }

    /// Base descriptor for `key`.
    pub fn get(&self, key: &TemplateKey) -> &TemplateStyle {
        &self.entry(key).style
    }

    /// Personality overlay for `key` (empty patch when the key has none).
    pub fn personality(&self, key: &TemplateKey) -> &StylePatch {
        &self.entry(key).personality
    }

    /// All templates in registry order, with the layout they render in.
    pub fn catalog(&self) -> Vec<TemplateSummary> {
        self.entries
            .iter()
            .map(|e| TemplateSummary {
                key: e.key.clone(),
                name: e.style.name.clone(),
                group: e.group,
                layout: e.personality.layout.unwrap_or(e.style.layout),
            })
            .collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Built-in data
// ────────────────────────────────────────────────────────────────────────────

fn color(raw: &str) -> HexColor {
    HexColor::parse(raw).unwrap_or(HexColor::BLACK)
}

/// Single-column Helvetica descriptor with the registry-wide defaults; each
/// template overrides what differs.
fn base(name: &str, sizes: (u32, u32, u32), accent: &str, spacing: u32) -> TemplateStyle {
    TemplateStyle {
        name: name.to_string(),
        font_heading: PdfFont::HelveticaBold,
        font_body: PdfFont::Helvetica,
        font_size_title: sizes.0,
        font_size_heading: sizes.1,
        font_size_body: sizes.2,
        accent: color(accent),
        background: HexColor::WHITE,
        section_border: false,
        layout: LayoutKind::Single,
        left_column_ratio: 0.32,
        heading_align: Align::Left,
        body_align: Align::Left,
        bullet: "-".to_string(),
        show_date_on_right: true,
        date_format: "{start} - {end}".to_string(),
        spacing,
        border_radius: 0.0,
        page_border: true,
        contact_icons: false,
        education_table: false,
        references_two_column: false,
        header_layout: HeaderLayout::Default,
        bg_art: None,
    }
}

fn times(style: TemplateStyle) -> TemplateStyle {
    TemplateStyle {
        font_heading: PdfFont::TimesBold,
        font_body: PdfFont::TimesRoman,
        bullet: "*".to_string(),
        ..style
    }
}

fn two_column(style: TemplateStyle, ratio: f32) -> TemplateStyle {
    TemplateStyle {
        layout: LayoutKind::TwoColumn,
        left_column_ratio: ratio,
        page_border: false,
        ..style
    }
}

fn builtin_templates() -> Vec<(&'static str, TemplateGroup, TemplateStyle)> {
    use TemplateGroup::{Legacy, Signature};
    vec![
        (
            "modern",
            Legacy,
            TemplateStyle {
                border_radius: 4.0,
                references_two_column: true,
                ..base("Modern Premium", (26, 13, 10), "#1e293b", 14)
            },
        ),
        (
            "corporate",
            Legacy,
            TemplateStyle {
                references_two_column: true,
                ..base("Corporate", (28, 14, 11), "#1e3a5f", 14)
            },
        ),
        ("classic", Legacy, times(base("Classic", (27, 13, 10), "#2b3a55", 12))),
        ("compact", Legacy, base("Compact", (22, 12, 9), "#0f766e", 10)),
        (
            "executive",
            Legacy,
            TemplateStyle {
                border_radius: 2.0,
                references_two_column: true,
                ..times(base("Executive", (30, 14, 11), "#111827", 15))
            },
        ),
        (
            "snack_gray",
            Legacy,
            TemplateStyle {
                background: color("#f3f4f6"),
                page_border: false,
                ..base("Snack Gray", (25, 12, 9), "#d65b2e", 11)
            },
        ),
        (
            "vision_blue",
            Legacy,
            TemplateStyle {
                page_border: false,
                ..base("Vision Blue", (24, 12, 9), "#1f4e96", 10)
            },
        ),
        (
            "harsh_minimal",
            Legacy,
            TemplateStyle {
                heading_align: Align::Center,
                page_border: false,
                ..base("Harsh Minimal", (26, 11, 9), "#111827", 10)
            },
        ),
        (
            "javid_split",
            Legacy,
            two_column(base("Javid Split", (32, 10, 9), "#6b7280", 10), 0.32),
        ),
        (
            "teal_modern",
            Legacy,
            TemplateStyle {
                date_format: "{start} | {end}".to_string(),
                border_radius: 3.0,
                page_border: false,
                references_two_column: true,
                ..base("Teal Modern", (28, 13, 10), "#008080", 13)
            },
        ),
        (
            "astra_clean",
            Signature,
            TemplateStyle {
                page_border: false,
                references_two_column: true,
                ..base("Astra Clean", (27, 13, 10), "#0f766e", 13)
            },
        ),
        (
            "metro_sidebar",
            Signature,
            two_column(base("Metro Sidebar", (31, 11, 9), "#155e75", 10), 0.33),
        ),
        (
            "executive_slate",
            Signature,
            TemplateStyle {
                border_radius: 2.0,
                references_two_column: true,
                ..times(base("Executive Slate", (32, 14, 11), "#1f2937", 15))
            },
        ),
        (
            "creative_split",
            Signature,
            two_column(base("Creative Split", (30, 11, 9), "#9333ea", 10), 0.34),
        ),
        ("mono_compact", Signature, base("Mono Compact", (23, 11, 9), "#111827", 9)),
        (
            "classic_clarity",
            Signature,
            base("Classic Clarity", (28, 12, 9), "#2563eb", 11),
        ),
        (
            "impact_panel",
            Signature,
            TemplateStyle {
                page_border: true,
                ..two_column(base("Impact Panel", (31, 11, 9), "#6b7280", 10), 0.31)
            },
        ),
        (
            "contemporary_photo",
            Signature,
            base("Contemporary Photo", (29, 12, 9), "#1d4ed8", 11),
        ),
    ]
}

fn personality_for(key: &str) -> StylePatch {
    let sizes = |t: u32, h: u32, b: u32| StylePatch {
        font_size_title: Some(t),
        font_size_heading: Some(h),
        font_size_body: Some(b),
        ..Default::default()
    };
    let aligned = |heading: Align, body: Align, patch: StylePatch| StylePatch {
        heading_align: Some(heading),
        body_align: Some(body),
        section_border: Some(patch.section_border.unwrap_or(false)),
        ..patch
    };
    let look = |header: HeaderLayout, art: BackgroundArt| StylePatch {
        header_layout: Some(header),
        bg_art: Some(art),
        ..Default::default()
    };
    let split = |ratio: f32, art: BackgroundArt| StylePatch {
        layout: Some(LayoutKind::TwoColumn),
        left_column_ratio: Some(ratio),
        ..look(HeaderLayout::Split, art)
    };
    let bullet = |b: &str| Some(b.to_string());
    use Align::{Center, Justify, Left};
    use BackgroundArt::*;

    match key {
        "modern" => aligned(
            Left,
            Justify,
            StylePatch {
                border_radius: Some(4.0),
                bullet: bullet("-"),
                ..merge(sizes(26, 13, 10), look(HeaderLayout::Default, TopBand))
            },
        ),
        "corporate" => aligned(
            Left,
            Left,
            StylePatch {
                section_border: Some(true),
                border_radius: Some(2.0),
                bullet: bullet("-"),
                ..merge(sizes(28, 14, 11), look(HeaderLayout::Split, LeftRail))
            },
        ),
        "classic" => aligned(
            Center,
            Left,
            StylePatch {
                border_radius: Some(0.0),
                bullet: bullet("*"),
                ..merge(sizes(27, 13, 10), look(HeaderLayout::Center, DoubleRule))
            },
        ),
        "compact" => aligned(
            Left,
            Left,
            StylePatch {
                border_radius: Some(0.0),
                bullet: bullet("-"),
                ..merge(sizes(22, 12, 9), look(HeaderLayout::Default, CornerMark))
            },
        ),
        "executive" => aligned(
            Left,
            Justify,
            StylePatch {
                section_border: Some(true),
                border_radius: Some(2.0),
                bullet: bullet("*"),
                ..merge(sizes(30, 14, 11), look(HeaderLayout::Split, ExecutivePanel))
            },
        ),
        "snack_gray" => aligned(Left, Left, look(HeaderLayout::Left, SoftOrb)),
        "vision_blue" => aligned(Left, Justify, look(HeaderLayout::Default, TopBand)),
        "harsh_minimal" => aligned(
            Center,
            Left,
            StylePatch {
                bullet: bullet("-"),
                ..merge(sizes(26, 11, 9), look(HeaderLayout::Center, MinimalLine))
            },
        ),
        "javid_split" => aligned(Left, Left, split(0.32, SplitRail)),
        "teal_modern" => aligned(
            Left,
            Left,
            StylePatch {
                border_radius: Some(5.0),
                bullet: bullet("-"),
                page_border: Some(false),
                contact_icons: Some(false),
                ..merge(sizes(28, 13, 10), look(HeaderLayout::Default, TopBand))
            },
        ),
        "astra_clean" => aligned(Left, Justify, look(HeaderLayout::Default, MinimalLine)),
        "metro_sidebar" => aligned(Left, Left, split(0.33, SplitRail)),
        "executive_slate" => aligned(
            Left,
            Justify,
            StylePatch {
                section_border: Some(true),
                border_radius: Some(2.0),
                ..look(HeaderLayout::Split, ExecutivePanel)
            },
        ),
        "creative_split" => aligned(
            Left,
            Left,
            StylePatch {
                bullet: bullet("\u{2022}"),
                ..split(0.34, CreativeBlock)
            },
        ),
        "mono_compact" => aligned(Left, Left, look(HeaderLayout::Left, CornerMark)),
        "classic_clarity" => aligned(Left, Justify, look(HeaderLayout::Default, DoubleRule)),
        "impact_panel" => aligned(
            Left,
            Left,
            StylePatch {
                section_border: Some(true),
                bullet: bullet("\u{2022}"),
                ..split(0.31, ImpactBand)
            },
        ),
        "contemporary_photo" => aligned(Left, Justify, look(HeaderLayout::Left, PhotoCorner)),
        _ => StylePatch::default(),
    }
}

/// Field-wise union; `overlay` wins where both are set.
fn merge(base: StylePatch, overlay: StylePatch) -> StylePatch {
    StylePatch {
        font_size_title: overlay.font_size_title.or(base.font_size_title),
        font_size_heading: overlay.font_size_heading.or(base.font_size_heading),
        font_size_body: overlay.font_size_body.or(base.font_size_body),
        heading_align: overlay.heading_align.or(base.heading_align),
        body_align: overlay.body_align.or(base.body_align),
        section_border: overlay.section_border.or(base.section_border),
        border_radius: overlay.border_radius.or(base.border_radius),
        bullet: overlay.bullet.or(base.bullet),
        header_layout: overlay.header_layout.or(base.header_layout),
        bg_art: overlay.bg_art.or(base.bg_art),
        layout: overlay.layout.or(base.layout),
        left_column_ratio: overlay.left_column_ratio.or(base.left_column_ratio),
        page_border: overlay.page_border.or(base.page_border),
        contact_icons: overlay.contact_icons.or(base.contact_icons),
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
