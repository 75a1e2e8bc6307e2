//! Writes paginated draw ops into a PDF with `printpdf`.
//!
//! Ops arrive in points from the page's top-left corner; printpdf wants
//! millimetres from the bottom-left, so every coordinate goes through `mm`
//! and every y through `flip`.

use std::collections::HashMap;

use printpdf::image_crate::GenericImageView;
use printpdf::{
    BuiltinFont, Color, Image, ImageTransform, IndirectFontRef, Line, Mm,
    PdfDocument, PdfDocumentReference, PdfLayerReference, Point, Polygon,
};
use printpdf::path::{PaintMode, WindingOrder};

use crate::layout::{DrawOp, PageGeometry, PdfFont, Stroke};
use crate::render::RenderError;
use crate::templates::color::Rgb;

fn mm(pt: f32) -> Mm {
    Mm(pt * 25.4 / 72.0)
}

fn color(c: Rgb) -> Color {
    Color::Rgb(printpdf::Rgb::new(c.r, c.g, c.b, None))
}

fn builtin(font: PdfFont) -> BuiltinFont {
    match font {
        PdfFont::Helvetica => BuiltinFont::Helvetica,
        PdfFont::HelveticaBold => BuiltinFont::HelveticaBold,
        PdfFont::TimesRoman => BuiltinFont::TimesRoman,
        PdfFont::TimesBold => BuiltinFont::TimesBold,
        PdfFont::Courier => BuiltinFont::Courier,
        PdfFont::CourierBold => BuiltinFont::CourierBold,
    }
}

struct Writer<'a> {
    doc: &'a PdfDocumentReference,
    fonts: HashMap<PdfFont, IndirectFontRef>,
    height: f32,
}

impl Writer<'_> {
    fn flip(&self, y: f32) -> f32 {
        self.height - y
    }

    fn point(&self, (x, y): (f32, f32)) -> Point {
        Point::new(mm(x), mm(self.flip(y)))
    }

    fn font(&mut self, font: PdfFont) -> Result<IndirectFontRef, RenderError> {
        if let Some(f) = self.fonts.get(&font) {
            return Ok(f.clone());
        }
        let added = self
            .doc
            .add_builtin_font(builtin(font))
            .map_err(|e| RenderError::Pdf(format!("font {font:?}: {e}")))?;
        self.fonts.insert(font, added.clone());
        Ok(added)
    }

    fn apply_stroke(layer: &PdfLayerReference, stroke: &Stroke) {
        layer.set_outline_color(color(stroke.color));
        layer.set_outline_thickness(stroke.width);
    }

    fn draw(&mut self, layer: &PdfLayerReference, op: &DrawOp) -> Result<(), RenderError> {
        match op {
            DrawOp::Text {
                x,
                baseline,
                text,
                font,
                size,
                color: c,
            } => {
                let font_ref = self.font(*font)?;
                layer.set_fill_color(color(*c));
                layer.use_text(text.as_str(), *size, mm(*x), mm(self.flip(*baseline)), &font_ref);
            }
            DrawOp::Shape {
                points,
                fill,
                stroke,
            } => {
                let mode = match (fill, stroke) {
                    (Some(_), Some(_)) => PaintMode::FillStroke,
                    (Some(_), None) => PaintMode::Fill,
                    (None, Some(_)) => PaintMode::Stroke,
                    (None, None) => return Ok(()),
                };
                if let Some(f) = fill {
                    layer.set_fill_color(color(*f));
                }
                if let Some(s) = stroke {
                    Self::apply_stroke(layer, s);
                }
                layer.add_polygon(Polygon {
                    rings: vec![points.iter().map(|p| (self.point(*p), false)).collect()],
                    mode,
                    winding_order: WindingOrder::NonZero,
                });
            }
            DrawOp::Line { points, stroke } => {
                Self::apply_stroke(layer, stroke);
                layer.add_line(Line {
                    points: points.iter().map(|p| (self.point(*p), false)).collect(),
                    is_closed: false,
                });
            }
            DrawOp::Image {
                x,
                y,
                width,
                height,
                image,
            } => {
                let (px_w, px_h) = GenericImageView::dimensions(image.as_ref());
                let (px_w, px_h) = (px_w.max(1) as f32, px_h.max(1) as f32);
                Image::from_dynamic_image(image).add_to_layer(
                    layer.clone(),
                    ImageTransform {
                        translate_x: Some(mm(*x)),
                        translate_y: Some(mm(self.flip(y + height))),
                        scale_x: Some(width / px_w),
                        scale_y: Some(height / px_h),
                        dpi: Some(72.0),
                        ..Default::default()
                    },
                );
            }
        }
        Ok(())
    }
}

/// Serializes `pages` (already in paint order) into PDF bytes. An empty
/// `pages` still yields one blank page.
pub fn write_pdf(
    title: &str,
    geometry: &PageGeometry,
    pages: &[Vec<DrawOp>],
) -> Result<Vec<u8>, RenderError> {
    let (w, h) = (mm(geometry.width), mm(geometry.height));
    let (doc, first_page, first_layer) = PdfDocument::new(title, w, h, "content");
    let mut layers = vec![doc.get_page(first_page).get_layer(first_layer)];
    for i in 1..pages.len() {
        let (page, layer) = doc.add_page(w, h, format!("content {}", i + 1));
        layers.push(doc.get_page(page).get_layer(layer));
    }

    let mut writer = Writer {
        doc: &doc,
        fonts: HashMap::new(),
        height: geometry.height,
    };
    for (ops, layer) in pages.iter().zip(&layers) {
        for op in ops {
            writer.draw(layer, op)?;
        }
    }
    drop(writer);
    doc.save_to_bytes()
        .map_err(|e| RenderError::Pdf(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::PageSize;

    #[test]
    fn test_blank_document_is_pdf() {
        let bytes = write_pdf("Resume - Nobody", &PageGeometry::new(PageSize::Letter, 54.0), &[]).unwrap();
        assert!(bytes.starts_with(b"%PDF"));
    }

    #[test]
    fn test_pages_and_shapes_are_written() {
        let ops = vec![
            DrawOp::rect(0.0, 0.0, 20.0, 20.0, Some(Rgb::BLACK), None),
            DrawOp::hline(
                10.0,
                100.0,
                40.0,
                Stroke {
                    color: Rgb::GRAY,
                    width: 1.0,
                },
            ),
            DrawOp::Text {
                x: 54.0,
                baseline: 70.0,
                text: "Ada Lovelace".into(),
                font: PdfFont::TimesBold,
                size: 20.0,
                color: Rgb::BLACK,
            },
        ];
        let pages = vec![ops.clone(), ops];
        let one = write_pdf("t", &PageGeometry::new(PageSize::A4, 54.0), &pages[..1]).unwrap();
        let two = write_pdf("t", &PageGeometry::new(PageSize::A4, 54.0), &pages).unwrap();
        assert!(two.len() > one.len());
    }

    #[test]
    fn test_point_conversion() {
        assert!((mm(72.0).0 - 25.4).abs() < 1e-4);
    }
}
