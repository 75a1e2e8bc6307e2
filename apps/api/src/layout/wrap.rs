//! Greedy word wrap over the static font metrics.
//!
//! Hard newlines always break. A word wider than the whole line is split by
//! character so nothing ever overflows the frame horizontally.

use crate::layout::font_metrics::FontMetricTable;

/// One wrapped output line.
#[derive(Debug, Clone, PartialEq)]
pub struct WrappedLine {
    pub words: Vec<String>,
    /// Natural width in points with single spaces between words.
    pub width: f32,
    /// True for the last line of a hard-broken paragraph (never justified).
    pub ends_paragraph: bool,
}

impl WrappedLine {
    pub fn text(&self) -> String {
        self.words.join(" ")
    }
}

/// Wraps `text` into lines no wider than `max_width` points at `size_pt`.
///
/// Empty hard lines are kept (as lines with no words) so explicit blank lines
/// in a summary survive. An entirely blank input returns no lines.
pub fn wrap_text(
    text: &str,
    metrics: &FontMetricTable,
    size_pt: f32,
    max_width: f32,
) -> Vec<WrappedLine> {
    if text.trim().is_empty() {
        return Vec::new();
    }
    let space_w = metrics.space_width * size_pt;
    let mut lines = Vec::new();

    for hard_line in text.split('\n') {
        let mut words: Vec<String> = Vec::new();
        let mut current_width = 0.0_f32;

        for raw_word in hard_line.split_whitespace() {
            for word in split_oversized(raw_word, metrics, size_pt, max_width) {
                let word_w = metrics.width_pt(&word, size_pt);
                let gap = if words.is_empty() { 0.0 } else { space_w };

                if !words.is_empty() && current_width + gap + word_w > max_width {
                    lines.push(WrappedLine {
                        words: std::mem::take(&mut words),
                        width: current_width,
                        ends_paragraph: false,
                    });
                    current_width = word_w;
                    words.push(word);
                } else {
                    current_width += gap + word_w;
                    words.push(word);
                }
            }
        }
        lines.push(WrappedLine {
            words,
            width: current_width,
            ends_paragraph: true,
        });
    }
    lines
}

/// Splits a single word into chunks that each fit `max_width`.
fn split_oversized(
    word: &str,
    metrics: &FontMetricTable,
    size_pt: f32,
    max_width: f32,
) -> Vec<String> {
    if metrics.width_pt(word, size_pt) <= max_width {
        return vec![word.to_string()];
    }
    let mut chunks = Vec::new();
    let mut current = String::new();
    for c in word.chars() {
        let mut candidate = current.clone();
        candidate.push(c);
        if !current.is_empty() && metrics.width_pt(&candidate, size_pt) > max_width {
            chunks.push(std::mem::take(&mut current));
            current.push(c);
        } else {
            current = candidate;
        }
    }
    if !current.is_empty() {
        chunks.push(current);
    }
    chunks
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::font_metrics::{get_metrics, PdfFont};

    #[test]
    fn test_blank_text_has_no_lines() {
        let m = get_metrics(PdfFont::Helvetica);
        assert!(wrap_text("   ", m, 10.0, 200.0).is_empty());
    }

    #[test]
    fn test_short_text_is_single_line() {
        let m = get_metrics(PdfFont::Helvetica);
        let lines = wrap_text("Rust engineer", m, 10.0, 200.0);
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].text(), "Rust engineer");
        assert!(lines[0].ends_paragraph);
    }

    #[test]
    fn test_long_text_wraps_within_width() {
        let m = get_metrics(PdfFont::Helvetica);
        let text = "Architected a distributed caching layer using consistent hashing, \
                    reducing p99 latency by forty percent under peak load";
        let lines = wrap_text(text, m, 10.0, 150.0);
        assert!(lines.len() > 2);
        for line in &lines {
            assert!(line.width <= 150.0 + 1e-3, "line too wide: {}", line.width);
        }
        assert!(!lines[0].ends_paragraph);
        assert!(lines.last().unwrap().ends_paragraph);
        let rejoined: Vec<String> = lines.iter().map(|l| l.text()).collect();
        assert_eq!(rejoined.join(" "), text.split_whitespace().collect::<Vec<_>>().join(" "));
    }

    #[test]
    fn test_hard_newlines_break() {
        let m = get_metrics(PdfFont::TimesRoman);
        let lines = wrap_text("first\nsecond", m, 10.0, 400.0);
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[1].text(), "second");
        assert!(lines[0].ends_paragraph);
    }

    #[test]
    fn test_oversized_word_is_split() {
        let m = get_metrics(PdfFont::Courier);
        // 6pt per char at 10pt; 30pt fits 5 chars.
        let lines = wrap_text("abcdefghijkl", m, 10.0, 30.0);
        let texts: Vec<String> = lines.iter().map(|l| l.text()).collect();
        assert_eq!(texts, vec!["abcde", "fghij", "kl"]);
    }
}
