//! Per-page decoration drawn underneath the flowing content: background
//! fill, the template's background-art motif and the optional page border.
//!
//! Chrome is computed from the page size alone and never moves content.

use crate::layout::{DrawOp, Stroke};
use crate::templates::color::Rgb;
use crate::templates::registry::{BackgroundArt, TemplateStyle};

pub const BORDER_INSET: f32 = 18.0;
const RULE_INSET: f32 = 36.0;

/// Ops for one page, in paint order.
pub fn page_chrome(style: &TemplateStyle, width: f32, height: f32) -> Vec<DrawOp> {
    let mut ops = Vec::new();
    let accent = style.accent.rgb();

    if !style.background.is_white() {
        ops.push(DrawOp::rect(0.0, 0.0, width, height, Some(style.background.rgb()), None));
    }
    if let Some(art) = style.bg_art {
        ops.extend(background_art(art, accent, width, height));
    }
    if style.page_border {
        ops.push(DrawOp::rect(
            BORDER_INSET,
            BORDER_INSET,
            width - 2.0 * BORDER_INSET,
            height - 2.0 * BORDER_INSET,
            None,
            Some(Stroke {
                color: accent,
                width: 1.0,
            }),
        ));
    }
    ops
}

fn background_art(art: BackgroundArt, accent: Rgb, w: f32, h: f32) -> Vec<DrawOp> {
    let fill = Some(accent.soften(0.9));
    let line = |y: f32, width: f32| {
        DrawOp::hline(
            RULE_INSET,
            w - RULE_INSET,
            y,
            Stroke {
                color: accent.soften(0.8),
                width,
            },
        )
    };
    let rect = |x: f32, y: f32, rw: f32, rh: f32| DrawOp::rect(x, y, rw, rh, fill, None);

    match art {
        BackgroundArt::TopBand => vec![rect(0.0, 8.0, w, 20.0), line(30.0, 0.7)],
        BackgroundArt::LeftRail => vec![rect(0.0, 0.0, 18.0, h)],
        BackgroundArt::DoubleRule => vec![line(36.0, 0.8), line(42.0, 0.8)],
        BackgroundArt::CornerMark => vec![
            rect(w - 58.0, 30.0, 28.0, 28.0),
            rect(w - 28.0, 18.0, 10.0, 10.0),
        ],
        BackgroundArt::ExecutivePanel => vec![rect(0.0, 22.0, w, 16.0), rect(0.0, 0.0, 10.0, h)],
        BackgroundArt::SoftOrb => vec![
            DrawOp::circle(w - 34.0, 30.0, 14.0, fill),
            DrawOp::circle(w - 16.0, 16.0, 7.0, fill),
        ],
        BackgroundArt::MinimalLine => vec![line(26.0, 1.0)],
        BackgroundArt::SplitRail => vec![rect(0.0, 0.0, (w * 0.08).floor().max(36.0), h)],
        BackgroundArt::CreativeBlock => vec![rect(0.0, 22.0, 84.0, 22.0), rect(w - 84.0, 0.0, 84.0, 22.0)],
        BackgroundArt::ImpactBand => vec![rect(0.0, 30.0, w, 18.0), rect(w - 20.0, 0.0, 20.0, h)],
        BackgroundArt::PhotoCorner => vec![
            rect(w - 78.0, 28.0, 50.0, 50.0),
            DrawOp::circle(w - 28.0, 28.0, 8.0, fill),
        ],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::templates::color::HexColor;
    use crate::templates::TemplateRegistry;

    fn style(key: &str) -> TemplateStyle {
        let registry = TemplateRegistry::builtin("modern");
        let key = registry.resolve(key);
        registry.get(&key).patched(registry.personality(&key))
    }

    fn bounds(op: &DrawOp) -> (f32, f32, f32, f32) {
        let points = match op {
            DrawOp::Shape { points, .. } | DrawOp::Line { points, .. } => points,
            other => panic!("unexpected op {other:?}"),
        };
        let xs = points.iter().map(|p| p.0);
        let ys = points.iter().map(|p| p.1);
        (
            xs.clone().fold(f32::MAX, f32::min),
            ys.clone().fold(f32::MAX, f32::min),
            xs.fold(f32::MIN, f32::max),
            ys.fold(f32::MIN, f32::max),
        )
    }

    #[test]
    fn test_plain_style_has_no_chrome() {
        let mut s = style("modern");
        s.page_border = false;
        s.bg_art = None;
        s.background = HexColor::WHITE;
        assert!(page_chrome(&s, 612.0, 792.0).is_empty());
    }

    #[test]
    fn test_page_border_is_inset() {
        let mut s = style("modern");
        s.page_border = true;
        s.bg_art = None;
        let ops = page_chrome(&s, 612.0, 792.0);
        let border = ops.last().unwrap();
        assert_eq!(bounds(border), (18.0, 18.0, 594.0, 774.0));
        assert!(matches!(border, DrawOp::Shape { fill: None, stroke: Some(_), .. }));
    }

    #[test]
    fn test_background_fill_comes_first() {
        let mut s = style("modern");
        s.background = HexColor::new(0xf8, 0xfa, 0xfc);
        s.bg_art = Some(BackgroundArt::LeftRail);
        let ops = page_chrome(&s, 612.0, 792.0);
        assert_eq!(bounds(&ops[0]), (0.0, 0.0, 612.0, 792.0));
        assert_eq!(bounds(&ops[1]), (0.0, 0.0, 18.0, 792.0));
    }

    #[test]
    fn test_split_rail_width_has_floor() {
        let ops = background_art(BackgroundArt::SplitRail, Rgb::BLACK, 300.0, 400.0);
        assert_eq!(bounds(&ops[0]).2, 36.0);
        let ops = background_art(BackgroundArt::SplitRail, Rgb::BLACK, 612.0, 792.0);
        assert_eq!(bounds(&ops[0]).2, 48.0);
    }

    #[test]
    fn test_art_is_tinted_accent() {
        let ops = background_art(BackgroundArt::TopBand, Rgb::BLACK, 612.0, 792.0);
        match &ops[0] {
            DrawOp::Shape { fill: Some(c), .. } => assert!((c.r - 0.9).abs() < 1e-6),
            other => panic!("unexpected op {other:?}"),
        }
        match &ops[1] {
            DrawOp::Line { stroke, points } => {
                assert!((stroke.color.r - 0.8).abs() < 1e-6);
                assert_eq!(points[0], (36.0, 30.0));
            }
            other => panic!("unexpected op {other:?}"),
        }
    }

    #[test]
    fn test_every_motif_draws_inside_page() {
        let all = [
            BackgroundArt::TopBand,
            BackgroundArt::LeftRail,
            BackgroundArt::DoubleRule,
            BackgroundArt::CornerMark,
            BackgroundArt::ExecutivePanel,
            BackgroundArt::SoftOrb,
            BackgroundArt::MinimalLine,
            BackgroundArt::SplitRail,
            BackgroundArt::CreativeBlock,
            BackgroundArt::ImpactBand,
            BackgroundArt::PhotoCorner,
        ];
        for art in all {
            for op in background_art(art, Rgb::BLACK, 595.28, 841.89) {
                let (x0, y0, x1, y1) = bounds(&op);
                assert!(x0 >= -0.01 && y0 >= -0.01, "{art:?} leaks past top-left");
                assert!(x1 <= 595.29 && y1 <= 841.9, "{art:?} leaks past bottom-right");
            }
        }
    }
}
