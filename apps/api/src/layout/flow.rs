//! Flowing block model and paginator.
//!
//! # Architecture
//! - Builders emit a `Vec<Block>` describing content top to bottom.
//! - `layout` turns blocks into unbreakable atoms (one per wrapped line, one
//!   per table row, one per heading/image/rule) with ops relative to the atom.
//! - `paginate` walks the atoms with a cursor and places them on pages. Side by
//!   side columns paginate independently from the same cursor and the flow
//!   resumes below whichever column ended lower.
//!
//! All coordinates are PDF points measured from the page's top-left corner.
//! The writer flips the y axis.

use std::sync::Arc;

use printpdf::image_crate::DynamicImage;
use serde::{Deserialize, Serialize};

use crate::layout::font_metrics::{base14_text, get_metrics, PdfFont};
use crate::layout::wrap::wrap_text;
use crate::render::RenderError;
use crate::templates::color::Rgb;

const EPSILON: f32 = 0.01;

// ────────────────────────────────────────────────────────────────────────────
// Geometry
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Align {
    #[default]
    Left,
    Center,
    Right,
    Justify,
}

impl Align {
    /// Case-insensitive parse of `left|center|right|justify`.
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "left" => Some(Self::Left),
            "center" => Some(Self::Center),
            "right" => Some(Self::Right),
            "justify" => Some(Self::Justify),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PageSize {
    #[default]
    Letter,
    A4,
}

impl PageSize {
    /// `a4` (any case) selects A4; everything else is US letter.
    pub fn parse(raw: &str) -> Self {
        if raw.trim().eq_ignore_ascii_case("a4") {
            Self::A4
        } else {
            Self::Letter
        }
    }

    /// Width and height in points.
    pub fn dimensions(self) -> (f32, f32) {
        match self {
            Self::Letter => (612.0, 792.0),
            Self::A4 => (595.28, 841.89),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageGeometry {
    pub width: f32,
    pub height: f32,
    /// Same inset on all four sides.
    pub margin: f32,
}

impl PageGeometry {
    pub fn new(size: PageSize, margin: f32) -> Self {
        let (width, height) = size.dimensions();
        Self {
            width,
            height,
            margin,
        }
    }

    pub fn content_width(&self) -> f32 {
        self.width - 2.0 * self.margin
    }

    pub fn content_height(&self) -> f32 {
        self.height - 2.0 * self.margin
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Drawing primitives
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Stroke {
    pub color: Rgb,
    pub width: f32,
}

#[derive(Debug, Clone)]
pub enum DrawOp {
    Text {
        x: f32,
        baseline: f32,
        text: String,
        font: PdfFont,
        size: f32,
        color: Rgb,
    },
    /// Closed polygon.
    Shape {
        points: Vec<(f32, f32)>,
        fill: Option<Rgb>,
        stroke: Option<Stroke>,
    },
    /// Open polyline.
    Line {
        points: Vec<(f32, f32)>,
        stroke: Stroke,
    },
    Image {
        x: f32,
        y: f32,
        width: f32,
        height: f32,
        image: Arc<DynamicImage>,
    },
}

impl DrawOp {
    pub fn rect(x: f32, y: f32, w: f32, h: f32, fill: Option<Rgb>, stroke: Option<Stroke>) -> Self {
        DrawOp::Shape {
            points: vec![(x, y), (x + w, y), (x + w, y + h), (x, y + h)],
            fill,
            stroke,
        }
    }

    /// Rectangle with corners approximated by quarter-circle arcs.
    pub fn rounded_rect(
        x: f32,
        y: f32,
        w: f32,
        h: f32,
        radius: f32,
        fill: Option<Rgb>,
        stroke: Option<Stroke>,
    ) -> Self {
        let r = radius.min(w / 2.0).min(h / 2.0);
        if r <= EPSILON {
            return Self::rect(x, y, w, h, fill, stroke);
        }
        const STEPS: usize = 6;
        // Corner centers paired with the starting angle of each arc, clockwise
        // on screen (y grows downward).
        let corners = [
            (x + w - r, y + r, -90.0_f32),
            (x + w - r, y + h - r, 0.0),
            (x + r, y + h - r, 90.0),
            (x + r, y + r, 180.0),
        ];
        let mut points = Vec::with_capacity(4 * (STEPS + 1));
        for (cx, cy, start) in corners {
            for i in 0..=STEPS {
                let angle = (start + 90.0 * i as f32 / STEPS as f32).to_radians();
                points.push((cx + r * angle.cos(), cy + r * angle.sin()));
            }
        }
        DrawOp::Shape {
            points,
            fill,
            stroke,
        }
    }

    pub fn circle(cx: f32, cy: f32, r: f32, fill: Option<Rgb>) -> Self {
        const SEGMENTS: usize = 32;
        let points = (0..SEGMENTS)
            .map(|i| {
                let angle = std::f32::consts::TAU * i as f32 / SEGMENTS as f32;
                (cx + r * angle.cos(), cy + r * angle.sin())
            })
            .collect();
        DrawOp::Shape {
            points,
            fill,
            stroke: None,
        }
    }

    pub fn hline(x1: f32, x2: f32, y: f32, stroke: Stroke) -> Self {
        DrawOp::Line {
            points: vec![(x1, y), (x2, y)],
            stroke,
        }
    }

    pub fn translated(self, dx: f32, dy: f32) -> Self {
        let shift = |pts: Vec<(f32, f32)>| -> Vec<(f32, f32)> {
            pts.into_iter().map(|(x, y)| (x + dx, y + dy)).collect()
        };
        match self {
            DrawOp::Text {
                x,
                baseline,
                text,
                font,
                size,
                color,
            } => DrawOp::Text {
                x: x + dx,
                baseline: baseline + dy,
                text,
                font,
                size,
                color,
            },
            DrawOp::Shape {
                points,
                fill,
                stroke,
            } => DrawOp::Shape {
                points: shift(points),
                fill,
                stroke,
            },
            DrawOp::Line { points, stroke } => DrawOp::Line {
                points: shift(points),
                stroke,
            },
            DrawOp::Image {
                x,
                y,
                width,
                height,
                image,
            } => DrawOp::Image {
                x: x + dx,
                y: y + dy,
                width,
                height,
                image,
            },
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Block model
// ────────────────────────────────────────────────────────────────────────────

/// Outline drawn around a paragraph (section headings with a border).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoxBorder {
    pub color: Rgb,
    pub width: f32,
    pub radius: f32,
    pub padding: f32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TextStyle {
    pub font: PdfFont,
    pub size: f32,
    pub leading: f32,
    pub color: Rgb,
    pub align: Align,
    pub space_before: f32,
    pub space_after: f32,
    pub border: Option<BoxBorder>,
}

impl TextStyle {
    /// Left-aligned, leading `size + 2`, no extra spacing.
    pub fn new(font: PdfFont, size: f32, color: Rgb) -> Self {
        Self {
            font,
            size,
            leading: size + 2.0,
            color,
            align: Align::Left,
            space_before: 0.0,
            space_after: 0.0,
            border: None,
        }
    }

    pub fn leading(mut self, leading: f32) -> Self {
        self.leading = leading;
        self
    }

    pub fn aligned(mut self, align: Align) -> Self {
        self.align = align;
        self
    }

    pub fn spaced(mut self, before: f32, after: f32) -> Self {
        self.space_before = before;
        self.space_after = after;
        self
    }

    pub fn bordered(mut self, border: Option<BoxBorder>) -> Self {
        self.border = border;
        self
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Paragraph {
    pub text: String,
    pub style: TextStyle,
}

#[derive(Debug, Clone)]
pub struct Table {
    /// Absolute column widths in points.
    pub widths: Vec<f32>,
    pub rows: Vec<Vec<Vec<Block>>>,
    /// Inset applied on every side of every cell.
    pub padding: f32,
}

#[derive(Debug, Clone)]
pub struct Columns {
    pub left: Vec<Block>,
    pub right: Vec<Block>,
    /// Width of the left column including its right padding.
    pub left_width: f32,
    pub left_padding: f32,
    pub right_padding: f32,
}

#[derive(Debug, Clone)]
pub struct ImageBlock {
    pub image: Arc<DynamicImage>,
    pub width: f32,
    pub height: f32,
    pub align: Align,
}

/// A QR symbol as a square grid of dark/light modules.
#[derive(Debug, Clone, PartialEq)]
pub struct QrBlock {
    pub dark: Vec<bool>,
    pub modules_per_side: usize,
    pub size: f32,
    pub align: Align,
}

#[derive(Debug, Clone)]
pub enum Block {
    /// Kept on the same page as whatever follows it.
    Heading(Paragraph),
    Text(Paragraph),
    /// Vertical gap; dropped at the top of a page.
    Spacer(f32),
    Rule {
        color: Rgb,
        thickness: f32,
        space_before: f32,
        space_after: f32,
    },
    Table(Table),
    Columns(Columns),
    Image(ImageBlock),
    QrCode(QrBlock),
}

impl Block {
    pub fn heading(text: impl Into<String>, style: &TextStyle) -> Self {
        Block::Heading(Paragraph {
            text: text.into(),
            style: style.clone(),
        })
    }

    pub fn text(text: impl Into<String>, style: &TextStyle) -> Self {
        Block::Text(Paragraph {
            text: text.into(),
            style: style.clone(),
        })
    }

    /// Flattens every piece of text (headings and paragraphs, including table
    /// cells and columns) in document order.
    #[cfg(test)]
    pub fn collect_text(blocks: &[Block]) -> Vec<String> {
        let mut out = Vec::new();
        for block in blocks {
            match block {
                Block::Heading(p) | Block::Text(p) => out.push(p.text.clone()),
                Block::Table(t) => {
                    for row in &t.rows {
                        for cell in row {
                            out.extend(Block::collect_text(cell));
                        }
                    }
                }
                Block::Columns(c) => {
                    out.extend(Block::collect_text(&c.left));
                    out.extend(Block::collect_text(&c.right));
                }
                _ => {}
            }
        }
        out
    }

    /// Text of top-level headings only.
    #[cfg(test)]
    pub fn heading_texts(blocks: &[Block]) -> Vec<String> {
        blocks
            .iter()
            .filter_map(|b| match b {
                Block::Heading(p) => Some(p.text.clone()),
                _ => None,
            })
            .collect()
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Atoms
// ────────────────────────────────────────────────────────────────────────────

/// Unbreakable unit of vertical content.
#[derive(Debug, Clone, Default)]
pub struct Atom {
    pub space_before: f32,
    pub height: f32,
    pub space_after: f32,
    /// Ops relative to the atom's top-left corner (after `space_before`).
    pub ops: Vec<DrawOp>,
    pub keep_with_next: bool,
    /// Spacers: skipped when they would start a page.
    pub discardable: bool,
}

#[derive(Debug, Clone)]
enum Item {
    Atom(Atom),
    Split {
        left: Vec<Item>,
        right: Vec<Item>,
        left_x: f32,
        right_x: f32,
    },
}

fn layout(blocks: &[Block], width: f32) -> Vec<Item> {
    let mut items = Vec::new();
    for block in blocks {
        match block {
            Block::Heading(p) => {
                if let Some(mut atom) = paragraph_as_single_atom(p, width) {
                    atom.keep_with_next = true;
                    items.push(Item::Atom(atom));
                }
            }
            Block::Text(p) => {
                if p.style.border.is_some() {
                    items.extend(paragraph_as_single_atom(p, width).map(Item::Atom));
                } else {
                    items.extend(paragraph_lines(p, width).into_iter().map(Item::Atom));
                }
            }
            Block::Spacer(h) => items.push(Item::Atom(Atom {
                height: *h,
                discardable: true,
                ..Default::default()
            })),
            Block::Rule {
                color,
                thickness,
                space_before,
                space_after,
            } => items.push(Item::Atom(Atom {
                space_before: *space_before,
                height: *thickness,
                space_after: *space_after,
                ops: vec![DrawOp::hline(
                    0.0,
                    width,
                    thickness / 2.0,
                    Stroke {
                        color: *color,
                        width: *thickness,
                    },
                )],
                ..Default::default()
            })),
            Block::Table(table) => {
                for row in &table.rows {
                    items.push(Item::Atom(table_row(row, &table.widths, table.padding)));
                }
            }
            Block::Columns(cols) => {
                let left_w = (cols.left_width - cols.left_padding).max(1.0);
                let right_x = cols.left_width + cols.right_padding;
                let right_w = (width - right_x).max(1.0);
                items.push(Item::Split {
                    left: layout(&cols.left, left_w),
                    right: layout(&cols.right, right_w),
                    left_x: 0.0,
                    right_x,
                });
            }
            Block::Image(img) => {
                let x = aligned_x(img.align, img.width, width);
                items.push(Item::Atom(Atom {
                    height: img.height,
                    ops: vec![DrawOp::Image {
                        x,
                        y: 0.0,
                        width: img.width,
                        height: img.height,
                        image: Arc::clone(&img.image),
                    }],
                    ..Default::default()
                }));
            }
            Block::QrCode(qr) => items.push(Item::Atom(qr_atom(qr, width))),
        }
    }
    items
}

fn aligned_x(align: Align, content_width: f32, frame_width: f32) -> f32 {
    match align {
        Align::Center => ((frame_width - content_width) / 2.0).max(0.0),
        Align::Right => (frame_width - content_width).max(0.0),
        Align::Left | Align::Justify => 0.0,
    }
}

/// Baseline offset of a line within its leading box.
fn baseline_offset(style: &TextStyle) -> f32 {
    style.size * 0.8 + (style.leading - style.size).max(0.0) / 2.0
}

/// Text ops for one wrapped line placed at `top` inside a frame of `width`.
fn line_ops(
    line: &crate::layout::wrap::WrappedLine,
    style: &TextStyle,
    width: f32,
    top: f32,
) -> Vec<DrawOp> {
    if line.words.is_empty() {
        return Vec::new();
    }
    let baseline = top + baseline_offset(style);
    let text_op = |x: f32, text: String| DrawOp::Text {
        x,
        baseline,
        text,
        font: style.font,
        size: style.size,
        color: style.color,
    };

    if style.align == Align::Justify && !line.ends_paragraph && line.words.len() > 1 {
        let metrics = get_metrics(style.font);
        let gaps = (line.words.len() - 1) as f32;
        let extra = ((width - line.width) / gaps).max(0.0);
        let space = metrics.space_width * style.size + extra;
        let mut x = 0.0;
        return line
            .words
            .iter()
            .map(|word| {
                let op = text_op(x, word.clone());
                x += metrics.width_pt(word, style.size) + space;
                op
            })
            .collect();
    }
    vec![text_op(aligned_x(style.align, line.width, width), line.text())]
}

fn paragraph_lines(p: &Paragraph, width: f32) -> Vec<Atom> {
    let style = &p.style;
    let lines = wrap_text(&base14_text(&p.text), get_metrics(style.font), style.size, width);
    let count = lines.len();
    lines
        .iter()
        .enumerate()
        .map(|(i, line)| Atom {
            space_before: if i == 0 { style.space_before } else { 0.0 },
            height: style.leading,
            space_after: if i + 1 == count { style.space_after } else { 0.0 },
            ops: line_ops(line, style, width, 0.0),
            ..Default::default()
        })
        .collect()
}

fn paragraph_as_single_atom(p: &Paragraph, width: f32) -> Option<Atom> {
    let style = &p.style;
    let pad = style.border.map(|b| b.padding).unwrap_or(0.0);
    let inner = (width - 2.0 * pad).max(1.0);
    let lines = wrap_text(&base14_text(&p.text), get_metrics(style.font), style.size, inner);
    if lines.is_empty() {
        return None;
    }
    let text_height = lines.len() as f32 * style.leading;
    let height = text_height + 2.0 * pad;
    let mut ops = Vec::new();
    if let Some(border) = style.border {
        ops.push(DrawOp::rounded_rect(
            0.0,
            0.0,
            width,
            height,
            border.radius,
            None,
            Some(Stroke {
                color: border.color,
                width: border.width,
            }),
        ));
    }
    for (i, line) in lines.iter().enumerate() {
        let top = pad + i as f32 * style.leading;
        ops.extend(line_ops(line, style, inner, top).into_iter().map(|op| op.translated(pad, 0.0)));
    }
    Some(Atom {
        space_before: style.space_before,
        height,
        space_after: style.space_after,
        ops,
        ..Default::default()
    })
}

fn table_row(row: &[Vec<Block>], widths: &[f32], padding: f32) -> Atom {
    let mut ops = Vec::new();
    let mut height = 0.0_f32;
    let mut x = 0.0;
    for (i, cell) in row.iter().enumerate() {
        let col_w = widths.get(i).copied().unwrap_or(0.0);
        let inner = (col_w - 2.0 * padding).max(1.0);
        let (cell_h, cell_ops) = stack(&layout(cell, inner));
        ops.extend(cell_ops.into_iter().map(|op| op.translated(x + padding, padding)));
        height = height.max(cell_h);
        x += col_w;
    }
    Atom {
        height: height + 2.0 * padding,
        ops,
        ..Default::default()
    }
}

/// Lays items out without page breaks; used inside table cells.
fn stack(items: &[Item]) -> (f32, Vec<DrawOp>) {
    let mut y = 0.0_f32;
    let mut ops = Vec::new();
    for item in items {
        match item {
            Item::Atom(atom) => {
                let top = if y <= EPSILON { y } else { y + atom.space_before };
                ops.extend(atom.ops.iter().cloned().map(|op| op.translated(0.0, top)));
                y = top + atom.height + atom.space_after;
            }
            Item::Split {
                left,
                right,
                left_x,
                right_x,
            } => {
                let (lh, lops) = stack(left);
                let (rh, rops) = stack(right);
                ops.extend(lops.into_iter().map(|op| op.translated(*left_x, y)));
                ops.extend(rops.into_iter().map(|op| op.translated(*right_x, y)));
                y += lh.max(rh);
            }
        }
    }
    (y, ops)
}

fn qr_atom(qr: &QrBlock, width: f32) -> Atom {
    let n = qr.modules_per_side.max(1);
    let module = qr.size / n as f32;
    let x0 = aligned_x(qr.align, qr.size, width);
    let mut ops = Vec::new();
    for row in 0..n {
        let mut col = 0;
        while col < n {
            if !qr.dark.get(row * n + col).copied().unwrap_or(false) {
                col += 1;
                continue;
            }
            let start = col;
            while col < n && qr.dark.get(row * n + col).copied().unwrap_or(false) {
                col += 1;
            }
            ops.push(DrawOp::rect(
                x0 + start as f32 * module,
                row as f32 * module,
                (col - start) as f32 * module,
                module,
                Some(Rgb::BLACK),
                None,
            ));
        }
    }
    Atom {
        height: qr.size,
        space_after: 2.0,
        ops,
        ..Default::default()
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Pagination
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq)]
struct Cursor {
    page: usize,
    y: f32,
}

impl Cursor {
    fn later(self, other: Cursor) -> Cursor {
        if other.page > self.page || (other.page == self.page && other.y > self.y) {
            other
        } else {
            self
        }
    }
}

struct Paginator<'g> {
    geometry: &'g PageGeometry,
    pages: Vec<Vec<DrawOp>>,
}

impl<'g> Paginator<'g> {
    fn top(&self) -> f32 {
        self.geometry.margin
    }

    fn bottom(&self) -> f32 {
        self.geometry.height - self.geometry.margin
    }

    fn next_page(&self, cur: Cursor) -> Cursor {
        Cursor {
            page: cur.page + 1,
            y: self.top(),
        }
    }

    fn emit(&mut self, page: usize, ops: impl IntoIterator<Item = DrawOp>) {
        while self.pages.len() <= page {
            self.pages.push(Vec::new());
        }
        self.pages[page].extend(ops);
    }

    fn place(&mut self, items: &[Item], x: f32, mut cur: Cursor) -> Result<Cursor, RenderError> {
        for (i, item) in items.iter().enumerate() {
            match item {
                Item::Atom(atom) => {
                    if atom.height > self.geometry.content_height() + EPSILON {
                        return Err(RenderError::Layout(format!(
                            "content block of {:.1}pt does not fit a page area of {:.1}pt",
                            atom.height,
                            self.geometry.content_height()
                        )));
                    }
                    let at_top = cur.y <= self.top() + EPSILON;
                    if atom.discardable && at_top {
                        continue;
                    }
                    let mut before = if at_top { 0.0 } else { atom.space_before };
                    let mut needed = before + atom.height;
                    if atom.keep_with_next {
                        needed += items.get(i + 1).map(lead_height).unwrap_or(0.0);
                    }
                    if !at_top && cur.y + needed > self.bottom() + EPSILON {
                        cur = self.next_page(cur);
                        if atom.discardable {
                            continue;
                        }
                        before = 0.0;
                    }
                    let top = cur.y + before;
                    self.emit(
                        cur.page,
                        atom.ops.iter().cloned().map(|op| op.translated(x, top)),
                    );
                    cur.y = top + atom.height + atom.space_after;
                }
                Item::Split {
                    left,
                    right,
                    left_x,
                    right_x,
                } => {
                    let l = self.place(left, x + left_x, cur)?;
                    let r = self.place(right, x + right_x, cur)?;
                    cur = l.later(r);
                }
            }
        }
        Ok(cur)
    }
}

/// Height the first piece of `item` needs on the current page.
fn lead_height(item: &Item) -> f32 {
    match item {
        Item::Atom(atom) => atom.space_before + atom.height,
        Item::Split { left, right, .. } => {
            let first = |items: &Vec<Item>| items.first().map(lead_height).unwrap_or(0.0);
            first(left).max(first(right))
        }
    }
}

/// Lays out and paginates `blocks`. Returns the content ops of every page,
/// always at least one page.
pub fn paginate(blocks: &[Block], geometry: &PageGeometry) -> Result<Vec<Vec<DrawOp>>, RenderError> {
    let items = layout(blocks, geometry.content_width());
    let mut paginator = Paginator {
        geometry,
        pages: vec![Vec::new()],
    };
    let start = Cursor {
        page: 0,
        y: geometry.margin,
    };
    paginator.place(&items, geometry.margin, start)?;
    Ok(paginator.pages)
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn body() -> TextStyle {
        TextStyle::new(PdfFont::Helvetica, 10.0, Rgb::BLACK)
    }

    fn geometry() -> PageGeometry {
        PageGeometry::new(PageSize::Letter, 72.0)
    }

    fn texts(page: &[DrawOp]) -> Vec<String> {
        page.iter()
            .filter_map(|op| match op {
                DrawOp::Text { text, .. } => Some(text.clone()),
                _ => None,
            })
            .collect()
    }

    fn text_y(page: &[DrawOp], needle: &str) -> Option<f32> {
        page.iter().find_map(|op| match op {
            DrawOp::Text { text, baseline, .. } if text == needle => Some(*baseline),
            _ => None,
        })
    }

    #[test]
    fn test_page_size_parse() {
        assert_eq!(PageSize::parse("A4"), PageSize::A4);
        assert_eq!(PageSize::parse("legal"), PageSize::Letter);
        assert_eq!(PageSize::A4.dimensions(), (595.28, 841.89));
    }

    #[test]
    fn test_align_parse() {
        assert_eq!(Align::parse(" Justify "), Some(Align::Justify));
        assert_eq!(Align::parse("middle"), None);
    }

    #[test]
    fn test_empty_flow_still_has_one_page() {
        let pages = paginate(&[], &geometry()).unwrap();
        assert_eq!(pages.len(), 1);
        assert!(pages[0].is_empty());
    }

    #[test]
    fn test_lines_flow_onto_second_page() {
        // 648pt of content height / 12pt leading = 54 lines per page.
        let blocks: Vec<Block> = (0..60).map(|i| Block::text(format!("line {i}"), &body())).collect();
        let pages = paginate(&blocks, &geometry()).unwrap();
        assert_eq!(pages.len(), 2);
        assert_eq!(texts(&pages[0]).len(), 54);
        assert_eq!(texts(&pages[1])[0], "line 54");
    }

    #[test]
    fn test_heading_keeps_with_next_line() {
        let mut blocks: Vec<Block> = (0..53).map(|i| Block::text(format!("line {i}"), &body())).collect();
        blocks.push(Block::heading("SKILLS", &body()));
        blocks.push(Block::text("Rust", &body()));
        let pages = paginate(&blocks, &geometry()).unwrap();
        assert_eq!(pages.len(), 2);
        assert!(!texts(&pages[0]).contains(&"SKILLS".to_string()));
        assert_eq!(texts(&pages[1]), vec!["SKILLS", "Rust"]);
    }

    #[test]
    fn test_spacer_dropped_at_page_top() {
        let mut blocks: Vec<Block> = (0..54).map(|i| Block::text(format!("line {i}"), &body())).collect();
        blocks.push(Block::Spacer(30.0));
        blocks.push(Block::text("next", &body()));
        let pages = paginate(&blocks, &geometry()).unwrap();
        let y = text_y(&pages[1], "next").unwrap();
        assert!(y < 72.0 + 12.0, "spacer leaked onto new page: baseline {y}");
    }

    #[test]
    fn test_oversized_atom_is_layout_error() {
        let row = vec![vec![Block::Spacer(900.0)]];
        let table = Block::Table(Table {
            widths: vec![100.0],
            rows: vec![row],
            padding: 0.0,
        });
        let err = paginate(&[table], &geometry()).unwrap_err();
        assert!(matches!(err, RenderError::Layout(_)));
    }

    #[test]
    fn test_center_and_right_alignment() {
        let g = geometry();
        let style = body().aligned(Align::Right);
        let pages = paginate(&[Block::text("Rust", &style)], &g).unwrap();
        let x = match &pages[0][0] {
            DrawOp::Text { x, .. } => *x,
            other => panic!("unexpected op {other:?}"),
        };
        // "Rust" is 20.56pt wide at 10pt.
        assert!((x - (72.0 + g.content_width() - 20.56)).abs() < 0.01);
    }

    #[test]
    fn test_justify_spreads_all_but_last_line() {
        let style = body().aligned(Align::Justify);
        let text = "alpha beta gamma delta epsilon zeta eta theta iota kappa lambda mu";
        let pages = paginate(
            &[Block::Columns(Columns {
                left: vec![Block::text(text, &style)],
                right: vec![],
                left_width: 120.0,
                left_padding: 0.0,
                right_padding: 0.0,
            })],
            &geometry(),
        )
        .unwrap();
        // Justified lines emit one op per word; the last line stays whole.
        let ops = texts(&pages[0]);
        let words: usize = ops.iter().map(|t| t.split_whitespace().count()).sum();
        assert_eq!(words, text.split_whitespace().count());
        assert!(ops.len() > 3);
        let first_line_last_word_end = pages[0]
            .iter()
            .filter_map(|op| match op {
                DrawOp::Text { x, baseline, text, size, font, .. } => Some((*x, *baseline, text.clone(), *size, *font)),
                _ => None,
            })
            .filter(|(_, b, ..)| (*b - text_y(&pages[0], "alpha").unwrap()).abs() < 0.01)
            .map(|(x, _, t, s, f)| x + get_metrics(f).width_pt(&t, s))
            .fold(0.0_f32, f32::max);
        assert!((first_line_last_word_end - (72.0 + 120.0)).abs() < 0.05);
    }

    #[test]
    fn test_columns_paginate_independently() {
        let left: Vec<Block> = (0..5).map(|i| Block::text(format!("L{i}"), &body())).collect();
        let right: Vec<Block> = (0..70).map(|i| Block::text(format!("R{i}"), &body())).collect();
        let blocks = vec![
            Block::Columns(Columns {
                left,
                right,
                left_width: 150.0,
                left_padding: 12.0,
                right_padding: 8.0,
            }),
            Block::text("after", &body()),
        ];
        let pages = paginate(&blocks, &geometry()).unwrap();
        assert_eq!(pages.len(), 2);
        // Both columns start on the first line.
        assert_eq!(text_y(&pages[0], "L0"), text_y(&pages[0], "R0"));
        // Flow resumes below the longer (right) column.
        assert!(text_y(&pages[1], "after").unwrap() > text_y(&pages[1], "R69").unwrap());
    }

    #[test]
    fn test_table_row_height_is_tallest_cell() {
        let row = vec![
            vec![Block::text("a", &body()), Block::text("b", &body())],
            vec![Block::text("c", &body())],
        ];
        let blocks = vec![
            Block::Table(Table {
                widths: vec![200.0, 200.0],
                rows: vec![row],
                padding: 2.0,
            }),
            Block::text("below", &body()),
        ];
        let pages = paginate(&blocks, &geometry()).unwrap();
        let below = text_y(&pages[0], "below").unwrap();
        let a = text_y(&pages[0], "a").unwrap();
        // The row is 28pt tall and "a" sits 2pt of padding below its top.
        assert!((below - a - 26.0).abs() < 0.01);
        assert_eq!(text_y(&pages[0], "c"), Some(a));
    }

    #[test]
    fn test_bordered_heading_draws_box() {
        let style = body().bordered(Some(BoxBorder {
            color: Rgb::BLACK,
            width: 1.0,
            radius: 3.0,
            padding: 3.0,
        }));
        let pages = paginate(&[Block::heading("EXPERIENCE", &style)], &geometry()).unwrap();
        assert!(pages[0].iter().any(|op| matches!(op, DrawOp::Shape { stroke: Some(_), .. })));
    }

    #[test]
    fn test_qr_modules_become_filled_runs() {
        let qr = QrBlock {
            dark: vec![true, true, false, true],
            modules_per_side: 2,
            size: 20.0,
            align: Align::Left,
        };
        let pages = paginate(&[Block::QrCode(qr)], &geometry()).unwrap();
        let shapes = pages[0].iter().filter(|op| matches!(op, DrawOp::Shape { .. })).count();
        assert_eq!(shapes, 2);
    }
}
