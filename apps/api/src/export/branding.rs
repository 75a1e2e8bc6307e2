//! Branding pack: the resume JSON plus caller-supplied cover letter,
//! interview questions and localized preview, and a standalone portfolio
//! page, all in one ZIP.

use serde::Deserialize;
use tracing::info;

use crate::export::{write_zip, ExportError};
use crate::models::Resume;
use crate::render::text::{format_date_range, format_location, join_non_empty};

/// Free text that travels with the resume into the pack.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct BrandingContent {
    pub cover_letter: String,
    pub interview_questions: Vec<String>,
    #[serde(alias = "preview_text")]
    pub language_preview: String,
}

pub fn build_branding_pack(resume: &Resume, content: &BrandingContent) -> Result<Vec<u8>, ExportError> {
    let stem = resume.file_stem();
    let json = serde_json::to_string_pretty(resume)?;
    let questions = content
        .interview_questions
        .iter()
        .map(|q| q.trim())
        .filter(|q| !q.is_empty())
        .collect::<Vec<_>>()
        .join("\n");

    let archive = write_zip([
        (format!("{stem}.json"), json),
        (format!("{stem}_cover_letter.txt"), content.cover_letter.clone()),
        (format!("{stem}_interview_questions.txt"), questions),
        (format!("{stem}_portfolio.html"), portfolio_html(resume)),
        (format!("{stem}_language_variant.txt"), content.language_preview.clone()),
    ])?;
    info!(name = resume.display_name(), bytes = archive.len(), "branding pack built");
    Ok(archive)
}

fn escape_html(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for ch in raw.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

/// Escaped, with newlines kept as `<br/>`.
fn multiline(raw: &str) -> String {
    escape_html(raw.trim()).replace('\n', "<br/>")
}

fn or_default<'a>(value: &'a str, fallback: &'a str) -> &'a str {
    let value = value.trim();
    if value.is_empty() {
        fallback
    } else {
        value
    }
}

const PORTFOLIO_CSS: &str = "\
body{font-family:Arial,Helvetica,sans-serif;margin:0;background:#f5f7f9;color:#111827}
.wrap{max-width:900px;margin:24px auto;padding:20px;background:#fff;border:1px solid #d1d5db;border-radius:12px}
h1{margin:0 0 6px} h2{margin:22px 0 8px;border-bottom:2px solid #0f766e;padding-bottom:6px}
.meta{color:#4b5563} ul{padding-left:18px} li{margin-bottom:10px;line-height:1.4}";

/// Single-file HTML portfolio page. Empty sections get a placeholder line.
pub fn portfolio_html(resume: &Resume) -> String {
    let name = escape_html(or_default(&resume.full_name, "Your Name"));
    let role = escape_html(or_default(&resume.profile_title, "Professional"));
    let location = format_location(resume);
    let contact = escape_html(&join_non_empty(
        [
            resume.email.as_str(),
            resume.phone.as_str(),
            location.as_str(),
            resume.website.as_str(),
            resume.linkedin.as_str(),
            resume.github.as_str(),
        ],
        " | ",
    ));

    let experience: String = resume
        .experiences
        .iter()
        .map(|e| {
            let company = if e.company.trim().is_empty() {
                String::new()
            } else {
                format!(" at {}", escape_html(e.company.trim()))
            };
            let dates = format_date_range(&e.start_date, &e.end_date, "{start} - {end}", true);
            format!(
                "<li><strong>{}</strong>{company}<br/><small>{}</small><br/>{}</li>",
                escape_html(e.job_title.trim()),
                escape_html(&dates),
                multiline(&e.description)
            )
        })
        .collect();
    let projects: String = resume
        .projects
        .iter()
        .map(|p| {
            let role = if p.role.trim().is_empty() {
                String::new()
            } else {
                format!(" - {}", escape_html(p.role.trim()))
            };
            format!(
                "<li><strong>{}</strong>{role}<br/>{}</li>",
                escape_html(p.name.trim()),
                multiline(&p.description)
            )
        })
        .collect();
    let skills = escape_html(&join_non_empty(resume.skills.iter().map(String::as_str), ", "));

    let placeholder = |html: String, text: &str| {
        if html.is_empty() {
            text.to_string()
        } else {
            html
        }
    };

    format!(
        "<!doctype html>
<html><head><meta charset=\"utf-8\"><meta name=\"viewport\" content=\"width=device-width,initial-scale=1\">
<title>{name} - Portfolio</title>
<style>
{PORTFOLIO_CSS}
</style></head>
<body><div class=\"wrap\">
<h1>{name}</h1>
<div class=\"meta\">{role}</div>
<div class=\"meta\">{contact}</div>
<h2>Summary</h2><p>{summary}</p>
<h2>Experience</h2><ul>{experience}</ul>
<h2>Projects</h2><ul>{projects}</ul>
<h2>Skills</h2><p>{skills}</p>
</div></body></html>",
        summary = multiline(&resume.summary),
        experience = placeholder(experience, "<li>Add experience details</li>"),
        projects = placeholder(projects, "<li>Add project details</li>"),
        skills = placeholder(skills, "Add skills"),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::export::archive;
    use crate::render::fixtures::sample_resume;

    #[test]
    fn test_pack_contains_five_named_entries() {
        let content = BrandingContent {
            cover_letter: "Dear team,".into(),
            interview_questions: vec!["Why Rust?".into(), " ".into(), "Why now?".into()],
            language_preview: "Resumen".into(),
        };
        let zip = build_branding_pack(&sample_resume(), &content).unwrap();
        let entries = archive::entries(&zip);
        let names: Vec<&str> = entries.iter().map(|(n, _)| n.as_str()).collect();
        assert_eq!(
            names,
            vec![
                "Ada_Lovelace.json",
                "Ada_Lovelace_cover_letter.txt",
                "Ada_Lovelace_interview_questions.txt",
                "Ada_Lovelace_portfolio.html",
                "Ada_Lovelace_language_variant.txt",
            ]
        );
        assert_eq!(entries[2].1, b"Why Rust?\nWhy now?".to_vec());
        assert_eq!(entries[4].1, b"Resumen".to_vec());
    }

    #[test]
    fn test_pack_json_round_trips() {
        let resume = sample_resume();
        let zip = build_branding_pack(&resume, &BrandingContent::default()).unwrap();
        let json = &archive::entries(&zip)[0].1;
        let back: Resume = serde_json::from_slice(json).unwrap();
        assert_eq!(back, resume);
    }

    #[test]
    fn test_unnamed_resume_uses_fallback_stem() {
        let zip = build_branding_pack(&Resume::default(), &BrandingContent::default()).unwrap();
        assert_eq!(archive::entries(&zip)[0].0, "resume.json");
    }

    #[test]
    fn test_portfolio_escapes_markup() {
        let mut resume = sample_resume();
        resume.full_name = "<script>alert(1)</script>".into();
        resume.summary = "R&D\nlead".into();
        let html = portfolio_html(&resume);
        assert!(!html.contains("<script>"));
        assert!(html.contains("&lt;script&gt;alert(1)&lt;/script&gt;"));
        assert!(html.contains("<p>R&amp;D<br/>lead</p>"));
    }

    #[test]
    fn test_portfolio_placeholders_for_empty_sections() {
        let html = portfolio_html(&Resume::default());
        assert!(html.contains("<title>Your Name - Portfolio</title>"));
        assert!(html.contains("<li>Add experience details</li>"));
        assert!(html.contains("<li>Add project details</li>"));
        assert!(html.contains("<p>Add skills</p>"));
    }

    #[test]
    fn test_portfolio_lists_entries() {
        let html = portfolio_html(&sample_resume());
        assert!(html.contains("<strong>Lead Analyst</strong> at Analytical Engines Ltd<br/><small>2019 - Present</small>"));
        assert!(html.contains("<strong>Note G</strong> - Author"));
        assert!(html.contains("<p>Python, AWS, Docker</p>"));
        assert!(html.contains("ada@example.com | +44 20 7946 0000 | London | ada.dev"));
    }
}
