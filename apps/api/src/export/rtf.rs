//! Word-compatible export as plain RTF. One fixed look, no template system.

use crate::models::Resume;
use crate::render::text::{format_date_range, format_location, join_non_empty, sorted_skills};

/// Escapes text for an RTF body. Printable ASCII passes through; everything
/// else becomes `\uN?` with N the signed 16-bit UTF-16 unit, so characters
/// beyond the BMP turn into a surrogate pair.
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '\\' => out.push_str("\\\\"),
            '{' => out.push_str("\\{"),
            '}' => out.push_str("\\}"),
            '\n' => out.push_str("\\line "),
            '\r' => {}
            '\t' => out.push_str("\\tab "),
            ' '..='~' => out.push(ch),
            _ => {
                let mut units = [0u16; 2];
                for unit in ch.encode_utf16(&mut units) {
                    out.push_str(&format!("\\u{}?", *unit as i16));
                }
            }
        }
    }
    out
}

fn dated(head: String, start: &str, end: &str) -> String {
    let range = format_date_range(start, end, "{start} - {end}", true);
    if range.is_empty() {
        head
    } else if head.is_empty() {
        format!("({range})")
    } else {
        format!("{head} ({range})")
    }
}

/// `a` joined to `b` with `sep`, or whichever side is present.
fn joined(a: &str, sep: &str, b: &str) -> String {
    let (a, b) = (a.trim(), b.trim());
    match (a.is_empty(), b.is_empty()) {
        (false, false) => format!("{a}{sep}{b}"),
        (false, true) => a.to_string(),
        (true, _) => b.to_string(),
    }
}

#[derive(Default)]
struct Rtf {
    lines: Vec<String>,
}

impl Rtf {
    fn raw(&mut self, line: impl Into<String>) {
        self.lines.push(line.into());
    }

    fn para(&mut self, text: &str) {
        if !text.trim().is_empty() {
            self.raw(format!("\\pard {}\\par", escape(text)));
        }
    }

    fn bold(&mut self, text: &str) {
        if !text.trim().is_empty() {
            self.raw(format!("\\pard\\b {}\\b0\\par", escape(text)));
        }
    }

    fn italic(&mut self, text: &str) {
        if !text.trim().is_empty() {
            self.raw(format!("\\pard\\i {}\\i0\\par", escape(text)));
        }
    }

    fn labelled(&mut self, label: &str, value: &str) {
        if !value.trim().is_empty() {
            self.raw(format!("\\pard {label}: {}\\par", escape(value.trim())));
        }
    }

    fn heading(&mut self, title: &str) {
        self.raw(format!("\\pard\\b\\fs28 {}\\b0\\fs22\\par", escape(title)));
    }

    fn gap(&mut self) {
        self.raw("\\par");
    }
}

/// Renders the whole resume as an RTF document.
pub fn render_rtf(resume: &Resume) -> Vec<u8> {
    let mut doc = Rtf::default();
    doc.raw("{\\rtf1\\ansi\\deff0");
    doc.raw("{\\fonttbl{\\f0 Calibri;}{\\f1 Calibri;}}");
    doc.raw("\\viewkind4\\uc1\\pard\\sa140\\sl276\\slmult1\\f0\\fs22");

    if !resume.full_name.trim().is_empty() {
        doc.raw(format!("\\pard\\b\\fs40 {}\\b0\\fs22\\par", escape(resume.full_name.trim())));
    }
    doc.italic(&resume.profile_title);

    let email = labelled_part("Email", &resume.email);
    let phone = labelled_part("Phone", &resume.phone);
    let location = labelled_part("Location", &format_location(resume));
    doc.para(&join_non_empty([email.as_str(), phone.as_str(), location.as_str()], " | "));
    doc.gap();

    if !resume.summary.trim().is_empty() {
        doc.heading("SUMMARY");
        doc.para(&resume.summary);
        doc.gap();
    }

    if !resume.experiences.is_empty() {
        doc.heading("WORK EXPERIENCE");
        for exp in &resume.experiences {
            doc.bold(&dated(joined(&exp.job_title, " at ", &exp.company), &exp.start_date, &exp.end_date));
            doc.para(&exp.description);
            doc.gap();
        }
    }

    if !resume.educations.is_empty() {
        doc.heading("EDUCATION");
        for edu in &resume.educations {
            doc.bold(&dated(joined(&edu.degree, " at ", &edu.institution), &edu.start_date, &edu.end_date));
            doc.para(&edu.description);
            doc.gap();
        }
    }

    if !resume.projects.is_empty() {
        doc.heading("PROJECTS");
        for proj in &resume.projects {
            doc.bold(&joined(&proj.name, " - ", &proj.role));
            doc.labelled("Technologies", &proj.technologies);
            doc.para(&proj.description);
            doc.labelled("Link", &proj.link);
            doc.gap();
        }
    }

    if !resume.certifications.is_empty() {
        doc.heading("CERTIFICATIONS");
        for cert in &resume.certifications {
            let mut head = joined(&cert.name, " - ", &cert.issuer);
            if !cert.date.trim().is_empty() {
                head = joined(&head, " ", &format!("({})", cert.date.trim()));
            }
            doc.bold(&head);
            doc.labelled("Credential", &cert.link);
            doc.gap();
        }
    }

    if !resume.languages.is_empty() {
        doc.heading("LANGUAGES");
        for lang in &resume.languages {
            doc.para(&joined(&lang.name, " - ", &lang.proficiency));
        }
        doc.gap();
    }

    if !resume.skills.is_empty() {
        doc.heading("SKILLS");
        for skill in sorted_skills(&resume.skills) {
            doc.para(&format!("- {skill}"));
        }
        doc.gap();
    }

    if !resume.achievements.is_empty() {
        doc.heading("ACHIEVEMENTS");
        for ach in &resume.achievements {
            doc.bold(&ach.title);
            doc.italic(&ach.subtitle);
            doc.para(&ach.description);
            doc.gap();
        }
    }

    if !resume.references.is_empty() {
        doc.heading("REFERENCES");
        for r in &resume.references {
            doc.bold(&joined(&joined(&r.name, " - ", &r.title), ", ", &r.company));
            doc.labelled("Phone", &r.phone);
            doc.labelled("Email", &r.email);
            doc.labelled("Web", &r.website);
            doc.gap();
        }
    }

    doc.raw("}");
    doc.lines.join("\n").into_bytes()
}

fn labelled_part(label: &str, value: &str) -> String {
    let value = value.trim();
    if value.is_empty() {
        String::new()
    } else {
        format!("{label}: {value}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::fixtures::sample_resume;

    fn rtf(resume: &Resume) -> String {
        String::from_utf8(render_rtf(resume)).unwrap()
    }

    #[test]
    fn test_escape_control_characters() {
        assert_eq!(escape(r"a\b{c}"), r"a\\b\{c\}");
        assert_eq!(escape("one\ntwo"), "one\\line two");
    }

    #[test]
    fn test_escape_unicode_as_signed_utf16() {
        assert_eq!(escape("é"), "\\u233?");
        // U+FFFD is above i16::MAX.
        assert_eq!(escape("\u{fffd}"), "\\u-3?");
        // U+1F600 → D83D DE00.
        assert_eq!(escape("😀"), "\\u-10179?\\u-8704?");
    }

    #[test]
    fn test_document_is_wrapped_and_ascii() {
        let out = rtf(&sample_resume());
        assert!(out.starts_with("{\\rtf1\\ansi"));
        assert!(out.ends_with('}'));
        assert!(out.is_ascii());
        assert!(out.contains("\\fonttbl{\\f0 Calibri;}"));
    }

    #[test]
    fn test_sections_in_fixed_order() {
        let out = rtf(&sample_resume());
        let order = [
            "SUMMARY",
            "WORK EXPERIENCE",
            "EDUCATION",
            "PROJECTS",
            "CERTIFICATIONS",
            "LANGUAGES",
            "SKILLS",
            "ACHIEVEMENTS",
            "REFERENCES",
        ];
        let positions: Vec<usize> = order
            .iter()
            .map(|h| out.find(&format!("\\fs28 {h}\\b0")).unwrap())
            .collect();
        assert!(positions.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_entry_lines() {
        let out = rtf(&sample_resume());
        assert!(out.contains("\\pard\\b Lead Analyst at Analytical Engines Ltd (2019 - Present)\\b0\\par"));
        assert!(out.contains("Email: ada@example.com | Phone: +44 20 7946 0000 | Location: London"));
        assert!(out.contains("\\pard\\b Royal Society Fellow - Royal Society (1843)\\b0\\par"));
        assert!(out.contains("\\pard\\b Charles Babbage - Professor, Cambridge\\b0\\par"));
        let skills: Vec<usize> = ["- AWS", "- Docker", "- Python"]
            .iter()
            .map(|s| out.find(&format!("\\pard {s}\\par")).unwrap())
            .collect();
        assert!(skills.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_empty_resume_has_no_sections() {
        let out = rtf(&Resume::default());
        assert!(!out.contains("\\fs28"));
        assert!(out.ends_with('}'));
    }
}
