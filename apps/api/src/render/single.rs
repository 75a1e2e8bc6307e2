//! Single-column builder: header, accent rule, then one block group per
//! section in the caller's order (or the canonical one) followed by the
//! fixed certifications/languages/references tail.

use crate::layout::{Align, Block, BoxBorder, Table, TextStyle};
use crate::models::{Education, Reference, Resume};
use crate::render::media::{profile_image_block, qr_block};
use crate::render::push_text;
use crate::render::text::{
    description_lines, format_date_range, format_location, normalize_url, sorted_skills,
};
use crate::templates::color::{hex, Rgb};
use crate::templates::registry::{HeaderLayout, TemplateStyle};
use crate::templates::style::{RenderOptions, ResolvedStyle, SectionKey, SingleConfig, SummaryLabel};

/// Left share of a label/date row.
const META_SPLIT: f32 = 0.72;
/// Left share of the split header.
pub(crate) const HEADER_SPLIT: f32 = 0.62;
/// Gap below the profile photo (0.1in).
const PHOTO_GAP: f32 = 7.2;

struct Styles {
    title: TextStyle,
    profile_title: TextStyle,
    heading: TextStyle,
    body: TextStyle,
    body_small: TextStyle,
    contact: TextStyle,
}

/// Vertical rhythm derived from the template's spacing unit.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Spacing {
    section: f32,
    item: f32,
    tail: f32,
}

impl Spacing {
    fn from_unit(spacing: u32) -> Self {
        let section = ((f64::from(spacing) * 0.30).floor() as u32).max(2);
        let item = (section / 2).max(1);
        Self {
            section: section as f32,
            item: item as f32,
            tail: item as f32,
        }
    }
}

fn styles(style: &TemplateStyle, spacing: Spacing) -> Styles {
    let t = style.font_size_title as f32;
    let h = style.font_size_heading as f32;
    let b = style.font_size_body as f32;
    let accent = style.accent.rgb();
    let heading_align = style.heading_align;

    let border = style.section_border.then_some(BoxBorder {
        color: accent,
        width: 1.0,
        radius: style.border_radius,
        padding: 3.0,
    });
    let small_align = if style.show_date_on_right {
        Align::Right
    } else {
        style.body_align
    };

    Styles {
        title: TextStyle::new(style.font_heading, t, accent)
            .aligned(heading_align)
            .spaced(0.0, 3.0),
        profile_title: TextStyle::new(style.font_body, (t - 8.0).max(1.0), Rgb::GRAY)
            .leading((t - 4.0).max(1.0))
            .aligned(heading_align)
            .spaced(1.0, 2.0),
        heading: TextStyle::new(style.font_heading, h, accent)
            .aligned(heading_align)
            .spaced((spacing.section - 1.0).max(2.0), 1.0)
            .bordered(border),
        body: TextStyle::new(style.font_body, b, Rgb::BLACK)
            .aligned(style.body_align)
            .spaced(0.0, 1.0),
        body_small: TextStyle::new(style.font_body, (b - 1.0).max(1.0), hex("#4b5563"))
            .leading(b + 1.0)
            .aligned(small_align),
        contact: TextStyle::new(style.font_body, (b - 1.0).max(1.0), hex("#374151"))
            .leading(b + 1.0)
            .aligned(heading_align),
    }
}

struct SingleBuilder<'a> {
    resume: &'a Resume,
    style: &'a TemplateStyle,
    config: SingleConfig,
    summary_label: SummaryLabel,
    width: f32,
    styles: Styles,
    spacing: Spacing,
    blocks: Vec<Block>,
}

/// Builds the block list for the single-column layout.
pub fn build(
    resume: &Resume,
    resolved: &ResolvedStyle,
    config: &SingleConfig,
    options: &RenderOptions,
    content_width: f32,
) -> Vec<Block> {
    let spacing = Spacing::from_unit(resolved.style.spacing);
    let mut builder = SingleBuilder {
        resume,
        style: &resolved.style,
        config: *config,
        summary_label: resolved.summary_label,
        width: content_width,
        styles: styles(&resolved.style, spacing),
        spacing,
        blocks: Vec::new(),
    };
    builder.header(options.header_layout.unwrap_or(resolved.header_layout));
    for section in options.sections() {
        builder.section(section);
    }
    builder.blocks
}

impl SingleBuilder<'_> {
    fn text(&mut self, text: impl AsRef<str>, style: &TextStyle) {
        push_text(&mut self.blocks, text, style);
    }

    fn body(&mut self, text: impl AsRef<str>) {
        push_text(&mut self.blocks, text, &self.styles.body);
    }

    fn heading(&mut self, label: &str) {
        self.blocks.push(Block::heading(label, &self.styles.heading));
    }

    fn bullet(&mut self, line: &str) {
        let text = format!("{} {}", self.style.bullet, line.trim());
        self.blocks.push(Block::text(text, &self.styles.body));
    }

    fn tail(&mut self) {
        self.blocks.push(Block::Spacer(self.spacing.tail));
    }

    /// Label on the left, date or meta on the right. Falls back to a single
    /// paragraph when either side is blank.
    fn meta_row(&mut self, left: &str, right: &str) {
        let (left, right) = (left.trim(), right.trim());
        match (left.is_empty(), right.is_empty()) {
            (false, false) => {
                let row = vec![
                    vec![Block::text(left, &self.styles.body)],
                    vec![Block::text(right, &self.styles.body_small)],
                ];
                self.blocks.push(Block::Table(Table {
                    widths: vec![self.width * META_SPLIT, self.width * (1.0 - META_SPLIT)],
                    rows: vec![row],
                    padding: 0.0,
                }));
            }
            (false, true) => self.body(left),
            (true, false) => {
                let small = self.styles.body_small.clone();
                self.text(right, &small);
            }
            (true, true) => {}
        }
    }

    // ── Header ──────────────────────────────────────────────────────────────

    fn contact_text(&self) -> String {
        let r = self.resume;
        let location = format_location(r);
        let mut personal: Vec<(&str, String)> = vec![
            ("Email", r.email.trim().to_string()),
            ("Phone", r.phone.trim().to_string()),
            ("Location", location),
        ];
        if self.style.contact_icons {
            personal.swap(0, 1);
        }
        let social = [
            ("LinkedIn", normalize_url(&r.linkedin)),
            ("GitHub", normalize_url(&r.github)),
            ("Twitter", normalize_url(&r.twitter)),
            ("Web", normalize_url(&r.website)),
        ];
        let parts: Vec<String> = personal
            .into_iter()
            .chain(social)
            .filter(|(_, value)| !value.is_empty())
            .map(|(label, value)| format!("{label}: {value}"))
            .collect();
        let sep = if self.style.contact_icons { " | " } else { "\n" };
        parts.join(sep)
    }

    fn header(&mut self, layout: HeaderLayout) {
        let r = self.resume;
        if let Some(img) = profile_image_block(r.profile_pic.as_deref(), self.style.heading_align) {
            self.blocks.push(Block::Image(img));
            self.blocks.push(Block::Spacer(PHOTO_GAP));
        }

        let contact = self.contact_text();
        match layout {
            HeaderLayout::Split => {
                let mut left = Vec::new();
                push_text(&mut left, &r.full_name, &self.styles.title.clone().aligned(Align::Left));
                push_text(
                    &mut left,
                    &r.profile_title,
                    &self.styles.profile_title.clone().aligned(Align::Left),
                );
                let mut right = Vec::new();
                push_text(&mut right, &contact, &self.styles.contact.clone().aligned(Align::Right));
                self.blocks.push(Block::Table(Table {
                    widths: vec![self.width * HEADER_SPLIT, self.width * (1.0 - HEADER_SPLIT)],
                    rows: vec![vec![left, right]],
                    padding: 0.0,
                }));
                self.tail();
            }
            HeaderLayout::Default | HeaderLayout::Left | HeaderLayout::Center => {
                let align = match layout {
                    HeaderLayout::Center => Align::Center,
                    HeaderLayout::Left => Align::Left,
                    _ => self.style.heading_align,
                };
                let title = self.styles.title.clone().aligned(align);
                let profile = self.styles.profile_title.clone().aligned(align);
                let contact_style = self.styles.contact.clone().aligned(align);
                self.text(&r.full_name, &title);
                self.text(&r.profile_title, &profile);
                if !contact.is_empty() {
                    self.text(&contact, &contact_style);
                    self.blocks.push(Block::Spacer((self.spacing.item - 1.0).max(1.0)));
                }
            }
        }

        let qr = r.qr_link.trim();
        if !qr.is_empty() {
            if let Some(block) = qr_block(qr, Align::Left) {
                self.blocks.push(Block::QrCode(block));
            }
            self.body(format!("QR: {qr}"));
            self.tail();
        }

        self.blocks.push(Block::Rule {
            color: self.style.accent.rgb(),
            thickness: 0.8,
            space_before: 1.0,
            space_after: (self.spacing.section - 1.0).max(2.0),
        });
    }

    // ── Sections ────────────────────────────────────────────────────────────

    fn section(&mut self, key: SectionKey) {
        match key {
            SectionKey::Summary => self.summary(),
            SectionKey::Experience => self.experience(),
            SectionKey::Education => self.education(),
            SectionKey::Projects => self.projects(),
            SectionKey::Skills => self.skills(),
            SectionKey::Achievements => self.achievements(),
            SectionKey::Custom => self.custom_sections(),
            SectionKey::Certifications => self.certifications(),
            SectionKey::Languages => self.languages(),
            SectionKey::References => self.references(),
        }
    }

    fn summary(&mut self) {
        let summary = self.resume.summary.trim();
        if summary.is_empty() {
            return;
        }
        self.heading(self.summary_label.text());
        self.body(summary);
        self.tail();
    }

    fn experience(&mut self) {
        if self.resume.experiences.is_empty() {
            return;
        }
        self.heading("WORK EXPERIENCE");
        let resume = self.resume;
        for exp in &resume.experiences {
            let mut label = exp.job_title.trim().to_string();
            if !exp.company.trim().is_empty() {
                label.push_str(&format!(" at {}", exp.company.trim()));
            }
            let has_date = !exp.start_date.trim().is_empty() || !exp.end_date.trim().is_empty();
            if has_date {
                let date = format_date_range(&exp.start_date, &exp.end_date, &self.style.date_format, true);
                self.meta_row(&label, &date);
            } else {
                self.body(&label);
            }
            for line in description_lines(&exp.description) {
                self.bullet(line);
            }
            self.tail();
        }
    }

    fn education(&mut self) {
        if self.resume.educations.is_empty() {
            return;
        }
        self.heading("EDUCATION");
        if self.config.education_table {
            let rows = self
                .resume
                .educations
                .iter()
                .map(|edu| {
                    let cell = [edu.degree.trim(), edu.institution.trim()]
                        .into_iter()
                        .filter(|s| !s.is_empty())
                        .collect::<Vec<_>>()
                        .join("\n");
                    let mut blocks = Vec::new();
                    push_text(&mut blocks, cell, &self.styles.body);
                    vec![blocks]
                })
                .collect();
            self.blocks.push(Block::Table(Table {
                widths: vec![self.width],
                rows,
                padding: 2.0,
            }));
            self.tail();
            return;
        }
        let resume = self.resume;
        for edu in &resume.educations {
            self.education_row(edu);
            if !edu.description.trim().is_empty() {
                self.body(&edu.description);
            }
            self.tail();
        }
    }

    fn education_row(&mut self, edu: &Education) {
        let mut label = edu.degree.trim().to_string();
        if !edu.institution.trim().is_empty() {
            label.push_str(&format!(" at {}", edu.institution.trim()));
        }
        let date = format_date_range(&edu.start_date, &edu.end_date, &self.style.date_format, false);
        let already_shown = !date.is_empty() && label.to_lowercase().contains(&date.to_lowercase());
        if date.is_empty() || already_shown {
            self.body(&label);
        } else {
            self.meta_row(&label, &date);
        }
    }

    fn projects(&mut self) {
        if self.resume.projects.is_empty() {
            return;
        }
        self.heading("PROJECTS");
        let resume = self.resume;
        for proj in &resume.projects {
            let mut label = proj.name.trim().to_string();
            if !proj.role.trim().is_empty() {
                label.push_str(&format!(" - {}", proj.role.trim()));
            }
            if !proj.start_date.trim().is_empty() || !proj.end_date.trim().is_empty() {
                let date = format_date_range(&proj.start_date, &proj.end_date, &self.style.date_format, false);
                self.meta_row(&label, &date);
            } else {
                self.body(&label);
            }
            if !proj.technologies.trim().is_empty() {
                self.body(format!("Technologies: {}", proj.technologies.trim()));
            }
            for line in description_lines(&proj.description) {
                self.bullet(line);
            }
            if !proj.link.trim().is_empty() {
                self.body(format!("Link: {}", proj.link.trim()));
            }
            self.tail();
        }
    }

    fn skills(&mut self) {
        if self.resume.skills.is_empty() {
            return;
        }
        self.heading("SKILLS");
        let resume = self.resume;
        for skill in sorted_skills(&resume.skills) {
            if !skill.trim().is_empty() {
                self.bullet(skill);
            }
        }
        self.tail();
    }

    fn achievements(&mut self) {
        if self.resume.achievements.is_empty() {
            return;
        }
        self.heading("ACHIEVEMENTS");
        let resume = self.resume;
        for ach in &resume.achievements {
            self.body(&ach.title);
            let small = self.styles.body_small.clone();
            self.text(&ach.subtitle, &small);
            self.body(&ach.description);
            self.tail();
        }
    }

    fn custom_sections(&mut self) {
        let resume = self.resume;
        for section in &resume.custom_sections {
            let title = section.title.trim();
            let items: Vec<&str> = section
                .items
                .iter()
                .map(|i| i.trim())
                .filter(|i| !i.is_empty())
                .collect();
            if title.is_empty() || items.is_empty() {
                continue;
            }
            self.heading(&title.to_uppercase());
            for item in items {
                self.bullet(item);
            }
            self.tail();
        }
    }

    fn certifications(&mut self) {
        if self.resume.certifications.is_empty() {
            return;
        }
        self.heading("CERTIFICATIONS");
        let resume = self.resume;
        for cert in &resume.certifications {
            let mut label = cert.name.trim().to_string();
            if !cert.issuer.trim().is_empty() {
                label.push_str(&format!(" - {}", cert.issuer.trim()));
            }
            self.meta_row(&label, &cert.date);
            if !cert.link.trim().is_empty() {
                self.body(format!("Credential: {}", cert.link.trim()));
            }
            self.tail();
        }
    }

    fn languages(&mut self) {
        if self.resume.languages.is_empty() {
            return;
        }
        self.heading("LANGUAGES");
        let resume = self.resume;
        for lang in &resume.languages {
            self.meta_row(&lang.name, &lang.proficiency);
        }
        self.tail();
    }

    fn references(&mut self) {
        if self.resume.references.is_empty() {
            return;
        }
        self.heading("REFERENCES");
        if self.config.references_two_column {
            let cell = |reference: &Reference, style: &TextStyle| {
                let mut blocks = Vec::new();
                push_text(&mut blocks, reference_card(reference), style);
                blocks
            };
            let rows = self
                .resume
                .references
                .chunks(2)
                .map(|pair| {
                    let left = cell(&pair[0], &self.styles.body);
                    let right = pair.get(1).map(|r| cell(r, &self.styles.body)).unwrap_or_default();
                    vec![left, right]
                })
                .collect();
            let col = self.width / 2.0 - 12.0;
            self.blocks.push(Block::Table(Table {
                widths: vec![col, col],
                rows,
                padding: 2.0,
            }));
            return;
        }
        let resume = self.resume;
        for reference in &resume.references {
            let mut line = reference.name.trim().to_string();
            if !reference.title.trim().is_empty() {
                line.push_str(&format!(" - {}", reference.title.trim()));
            }
            if !reference.company.trim().is_empty() {
                line.push_str(&format!(", {}", reference.company.trim()));
            }
            self.body(&line);
            for contact in reference_contacts(reference) {
                self.body(&contact);
            }
            self.tail();
        }
    }
}

fn reference_contacts(reference: &Reference) -> Vec<String> {
    [
        ("Phone", &reference.phone),
        ("Email", &reference.email),
        ("Web", &reference.website),
    ]
    .into_iter()
    .filter(|(_, v)| !v.trim().is_empty())
    .map(|(label, v)| format!("{label}: {}", v.trim()))
    .collect()
}

/// Stacked name/title/company/contact lines for the two-up reference table.
fn reference_card(reference: &Reference) -> String {
    let mut lines: Vec<String> = [&reference.name, &reference.title, &reference.company]
        .into_iter()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect();
    lines.extend(reference_contacts(reference));
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CustomSection, Experience, Language};
    use crate::render::fixtures::sample_resume;
    use crate::templates::style::{resolve_style, RenderRequest, StyleOverrides};
    use crate::templates::TemplateRegistry;

    const WIDTH: f32 = 504.0;

    fn render_with(template: &str, resume: &Resume, json: serde_json::Value) -> Vec<Block> {
        let request: RenderRequest = serde_json::from_value(json).unwrap();
        let registry = TemplateRegistry::builtin("modern");
        let resolved = resolve_style(&registry, template, &StyleOverrides::from_request(&request));
        let options = RenderOptions::from_request(&request);
        let config = match resolved.layout {
            crate::templates::style::Layout::Single(c) => c,
            other => panic!("expected single layout, got {other:?}"),
        };
        build(resume, &resolved, &config, &options, WIDTH)
    }

    fn render(template: &str, resume: &Resume) -> Vec<Block> {
        render_with(template, resume, serde_json::json!({}))
    }

    fn tables(blocks: &[Block]) -> Vec<&Table> {
        blocks
            .iter()
            .filter_map(|b| match b {
                Block::Table(t) => Some(t),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_spacing_rhythm() {
        assert_eq!(
            Spacing::from_unit(12),
            Spacing {
                section: 3.0,
                item: 1.0,
                tail: 1.0
            }
        );
        assert_eq!(Spacing::from_unit(20).section, 6.0);
        assert_eq!(Spacing::from_unit(20).item, 3.0);
        assert_eq!(Spacing::from_unit(0).section, 2.0);
    }

    #[test]
    fn test_canonical_order_then_tail() {
        let headings = Block::heading_texts(&render("modern", &sample_resume()));
        assert_eq!(
            headings,
            vec![
                "SUMMARY",
                "WORK EXPERIENCE",
                "EDUCATION",
                "PROJECTS",
                "SKILLS",
                "ACHIEVEMENTS",
                "OPEN SOURCE",
                "CERTIFICATIONS",
                "LANGUAGES",
                "REFERENCES"
            ]
        );
    }

    #[test]
    fn test_explicit_order_with_hidden_experience() {
        let mut resume = sample_resume();
        resume.certifications.clear();
        resume.languages.clear();
        resume.references.clear();
        let blocks = render_with(
            "modern",
            &resume,
            serde_json::json!({
                "section_order": ["skills", "summary"],
                "section_visibility": { "experience": false }
            }),
        );
        assert_eq!(Block::heading_texts(&blocks), vec!["SKILLS", "SUMMARY"]);
        let text = Block::collect_text(&blocks).join("\n");
        assert!(!text.contains("Analytical Engines Ltd"));
    }

    #[test]
    fn test_tail_follows_explicit_order_and_respects_visibility() {
        let blocks = render_with(
            "modern",
            &sample_resume(),
            serde_json::json!({
                "section_order": ["projects"],
                "section_visibility": { "languages": false }
            }),
        );
        assert_eq!(
            Block::heading_texts(&blocks),
            vec!["PROJECTS", "CERTIFICATIONS", "REFERENCES"]
        );
    }

    #[test]
    fn test_about_me_label_for_corporate() {
        let headings = Block::heading_texts(&render("corporate", &sample_resume()));
        assert_eq!(headings[0], "ABOUT ME");
        assert!(!headings.contains(&"SUMMARY".to_string()));
    }

    #[test]
    fn test_skills_sorted_with_bullet() {
        let blocks = render("modern", &sample_resume());
        let bullet = {
            let registry = TemplateRegistry::builtin("modern");
            resolve_style(&registry, "modern", &StyleOverrides::default()).style.bullet
        };
        let skills: Vec<String> = Block::collect_text(&blocks)
            .into_iter()
            .filter(|t| ["AWS", "Docker", "Python"].iter().any(|s| t.ends_with(s)))
            .collect();
        assert_eq!(
            skills,
            vec![
                format!("{bullet} AWS"),
                format!("{bullet} Docker"),
                format!("{bullet} Python")
            ]
        );
    }

    #[test]
    fn test_meta_row_only_when_both_sides_present() {
        let resume = Resume {
            full_name: "Ada".into(),
            experiences: vec![
                Experience {
                    job_title: "Dated".into(),
                    start_date: "2020".into(),
                    ..Default::default()
                },
                Experience {
                    job_title: "Undated".into(),
                    ..Default::default()
                },
            ],
            ..Default::default()
        };
        let blocks = render("modern", &resume);
        let rows = tables(&blocks);
        assert_eq!(rows.len(), 1);
        let row_text = Block::collect_text(&[Block::Table(rows[0].clone())]);
        assert_eq!(row_text, vec!["Dated", "2020 - Present"]);
        assert!((rows[0].widths[0] - WIDTH * 0.72).abs() < 0.01);
        assert!(Block::collect_text(&blocks).contains(&"Undated".to_string()));
    }

    #[test]
    fn test_education_date_not_repeated() {
        let resume = Resume {
            educations: vec![Education {
                degree: "BSc Mathematics 2015 - 2019".into(),
                institution: "UCL".into(),
                start_date: "2015".into(),
                end_date: "2019".into(),
                ..Default::default()
            }],
            ..Default::default()
        };
        let blocks = render("modern", &resume);
        assert!(tables(&blocks).is_empty());
        assert!(Block::collect_text(&blocks).contains(&"BSc Mathematics 2015 - 2019 at UCL".to_string()));
    }

    #[test]
    fn test_education_table_stacks_degree_and_institution() {
        let mut resume = sample_resume();
        resume.educations.truncate(1);
        let registry = TemplateRegistry::builtin("modern");
        let resolved = resolve_style(&registry, "modern", &StyleOverrides::default());
        let config = SingleConfig {
            education_table: true,
            references_two_column: false,
        };
        let blocks = build(&resume, &resolved, &config, &RenderOptions::default(), WIDTH);
        let edu = tables(&blocks)
            .into_iter()
            .find(|t| t.widths.len() == 1)
            .unwrap();
        assert_eq!(edu.padding, 2.0);
        assert_eq!(
            Block::collect_text(&[Block::Table(edu.clone())]),
            vec!["BSc Mathematics\nUniversity of London"]
        );
    }

    #[test]
    fn test_references_two_up_pads_odd_count() {
        let mut resume = sample_resume();
        resume.references.push(Reference {
            name: "Third Ref".into(),
            ..Default::default()
        });
        assert_eq!(resume.references.len(), 3);
        let registry = TemplateRegistry::builtin("modern");
        let resolved = resolve_style(&registry, "modern", &StyleOverrides::default());
        let config = SingleConfig {
            education_table: false,
            references_two_column: true,
        };
        let blocks = build(&resume, &resolved, &config, &RenderOptions::default(), WIDTH);
        let refs = tables(&blocks)
            .into_iter()
            .find(|t| (t.widths[0] - (WIDTH / 2.0 - 12.0)).abs() < 0.01)
            .unwrap();
        assert_eq!(refs.rows.len(), 2);
        assert!(refs.rows[1][1].is_empty());
        let first = Block::collect_text(&refs.rows[0][0]);
        assert_eq!(first, vec!["Charles Babbage\nProfessor\nCambridge\nEmail: cb@example.com"]);
    }

    #[test]
    fn test_custom_sections_need_title_and_items() {
        let resume = Resume {
            custom_sections: vec![
                CustomSection {
                    title: "Talks".into(),
                    items: vec!["RustConf".into()],
                },
                CustomSection {
                    title: "  ".into(),
                    items: vec!["orphan".into()],
                },
                CustomSection {
                    title: "Empty".into(),
                    items: vec![],
                },
            ],
            ..Default::default()
        };
        let headings = Block::heading_texts(&render("modern", &resume));
        assert_eq!(headings, vec!["TALKS"]);
    }

    #[test]
    fn test_name_only_resume_has_no_sections() {
        let resume = Resume {
            full_name: "Only Name".into(),
            ..Default::default()
        };
        let blocks = render("modern", &resume);
        assert!(Block::heading_texts(&blocks).is_empty());
        assert_eq!(Block::collect_text(&blocks), vec!["Only Name"]);
    }

    #[test]
    fn test_contact_lines_plain_and_icon_variants() {
        let resume = sample_resume();
        let plain = Block::collect_text(&render("modern", &resume));
        assert!(plain.iter().any(|t| t.starts_with("Email: ada@example.com\nPhone: ")));
        assert!(plain.iter().any(|t| t.contains("LinkedIn: https://linkedin.com/in/ada")));

        let mut resolved = {
            let registry = TemplateRegistry::builtin("modern");
            resolve_style(&registry, "modern", &StyleOverrides::default())
        };
        resolved.style.contact_icons = true;
        let config = SingleConfig {
            education_table: false,
            references_two_column: false,
        };
        let blocks = build(&resume, &resolved, &config, &RenderOptions::default(), WIDTH);
        let texts = Block::collect_text(&blocks);
        assert!(texts
            .iter()
            .any(|t| t.starts_with("Phone: +44 20 7946 0000 | Email: ada@example.com | Location: London")));
    }

    #[test]
    fn test_split_header_is_two_cell_table() {
        let blocks = render_with("modern", &sample_resume(), serde_json::json!({"header_layout": "split"}));
        match &blocks[0] {
            Block::Table(t) => {
                assert!((t.widths[0] - WIDTH * 0.62).abs() < 0.01);
                assert_eq!(Block::collect_text(&t.rows[0][0]), vec!["Ada Lovelace", "Analyst"]);
            }
            other => panic!("expected header table, got {other:?}"),
        }
    }

    #[test]
    fn test_center_header_centers_title() {
        let blocks = render_with("modern", &sample_resume(), serde_json::json!({"header_layout": "center"}));
        match &blocks[0] {
            Block::Text(p) => assert_eq!(p.style.align, Align::Center),
            other => panic!("expected title paragraph, got {other:?}"),
        }
    }

    #[test]
    fn test_qr_block_and_caption() {
        let mut resume = sample_resume();
        resume.qr_link = "https://ada.dev".into();
        let blocks = render("modern", &resume);
        assert!(blocks.iter().any(|b| matches!(b, Block::QrCode(_))));
        assert!(Block::collect_text(&blocks).contains(&"QR: https://ada.dev".to_string()));

        resume.qr_link = "x".repeat(5000);
        let blocks = render("modern", &resume);
        assert!(!blocks.iter().any(|b| matches!(b, Block::QrCode(_))));
        assert!(Block::collect_text(&blocks).iter().any(|t| t.starts_with("QR: xxx")));
    }

    #[test]
    fn test_section_border_boxes_headings() {
        let mut resume = sample_resume();
        resume.languages = vec![Language {
            name: "French".into(),
            proficiency: "Native".into(),
        }];
        let registry = TemplateRegistry::builtin("modern");
        let mut resolved = resolve_style(&registry, "modern", &StyleOverrides::default());
        resolved.style.section_border = true;
        let config = SingleConfig {
            education_table: false,
            references_two_column: false,
        };
        let blocks = build(&resume, &resolved, &config, &RenderOptions::default(), WIDTH);
        let bordered = blocks.iter().all(|b| match b {
            Block::Heading(p) => p.style.border.is_some(),
            _ => true,
        });
        assert!(bordered);
    }
}
