//! Two-column builder: a sidebar (objective, education, links, skills) and a
//! main column (experience, projects, training, achievements) placed side by
//! side under a shared header.
//!
//! The section set is fixed per column; caller section order and visibility
//! do not apply here.

use crate::layout::{Align, Block, Columns, Table, TextStyle};
use crate::models::Resume;
use crate::render::media::profile_image_block;
use crate::render::push_text;
use crate::render::single::HEADER_SPLIT;
use crate::render::text::{
    description_lines, format_date_range, format_location, join_non_empty, normalize_url,
    sorted_skills,
};
use crate::templates::color::hex;
use crate::templates::registry::{HeaderLayout, TemplateStyle};
use crate::templates::style::{ResolvedStyle, TwoColumnConfig};

const LEFT_GUTTER: f32 = 12.0;
const RIGHT_GUTTER: f32 = 8.0;
/// Gap below the profile photo (0.08in).
const PHOTO_GAP: f32 = 5.76;

struct Styles {
    title: TextStyle,
    subtitle: TextStyle,
    heading: TextStyle,
    body: TextStyle,
    meta: TextStyle,
}

impl Styles {
    fn new(style: &TemplateStyle) -> Self {
        let t = style.font_size_title as f32;
        let h = style.font_size_heading as f32;
        let b = style.font_size_body as f32;
        Self {
            title: TextStyle::new(style.font_heading, t, hex("#4b5563"))
                .aligned(Align::Center)
                .spaced(0.0, 2.0),
            subtitle: TextStyle::new(style.font_body, b + 1.0, hex("#6b7280"))
                .leading(b + 2.0)
                .aligned(Align::Center)
                .spaced(0.0, 1.0),
            heading: TextStyle::new(style.font_heading, h + 2.0, style.accent.rgb())
                .leading(h + 2.0)
                .spaced(4.0, 1.0),
            body: TextStyle::new(style.font_body, b, hex("#4b5563")).leading(b + 1.0),
            meta: TextStyle::new(style.font_body, (b - 1.0).max(7.0), hex("#6b7280")).leading(b + 1.0),
        }
    }
}

/// Builds the block list for the two-column layout.
pub fn build(
    resume: &Resume,
    resolved: &ResolvedStyle,
    config: &TwoColumnConfig,
    header: HeaderLayout,
    content_width: f32,
) -> Vec<Block> {
    let styles = Styles::new(&resolved.style);
    let mut blocks = header_blocks(resume, &styles, header, content_width);
    blocks.push(Block::Rule {
        color: hex("#9ca3af"),
        thickness: 0.9,
        space_before: 2.0,
        space_after: 4.0,
    });
    blocks.push(Block::Columns(Columns {
        left: sidebar(resume, &styles),
        right: main_column(resume, &styles, &resolved.style),
        left_width: content_width * config.left_ratio,
        left_padding: LEFT_GUTTER,
        right_padding: RIGHT_GUTTER,
    }));
    blocks
}

fn header_blocks(resume: &Resume, styles: &Styles, layout: HeaderLayout, width: f32) -> Vec<Block> {
    let mut blocks = Vec::new();
    let image_align = if layout == HeaderLayout::Center {
        Align::Center
    } else {
        Align::Left
    };
    if let Some(img) = profile_image_block(resume.profile_pic.as_deref(), image_align) {
        blocks.push(Block::Image(img));
        blocks.push(Block::Spacer(PHOTO_GAP));
    }

    let location = format_location(resume);
    let website = normalize_url(&resume.website);
    let contact = join_non_empty(
        [
            website.as_str(),
            resume.email.as_str(),
            resume.phone.as_str(),
            location.as_str(),
        ],
        " | ",
    );

    if layout == HeaderLayout::Split {
        let mut left = Vec::new();
        push_text(&mut left, &resume.full_name, &styles.title.clone().aligned(Align::Left));
        push_text(
            &mut left,
            &resume.profile_title,
            &styles.subtitle.clone().aligned(Align::Left),
        );
        let mut right = Vec::new();
        push_text(&mut right, &contact, &styles.subtitle.clone().aligned(Align::Right));
        blocks.push(Block::Table(Table {
            widths: vec![width * HEADER_SPLIT, width * (1.0 - HEADER_SPLIT)],
            rows: vec![vec![left, right]],
            padding: 0.0,
        }));
        return blocks;
    }

    let align = if layout == HeaderLayout::Center {
        Align::Center
    } else {
        Align::Left
    };
    let subtitle = styles.subtitle.clone().aligned(align);
    push_text(&mut blocks, &resume.full_name, &styles.title.clone().aligned(align));
    push_text(&mut blocks, &resume.profile_title, &subtitle);
    push_text(&mut blocks, &contact, &subtitle);
    blocks
}

fn sidebar(resume: &Resume, styles: &Styles) -> Vec<Block> {
    let mut col = Vec::new();

    if !resume.summary.trim().is_empty() {
        col.push(Block::heading("OBJECTIVE", &styles.heading));
        push_text(&mut col, &resume.summary, &styles.body);
    }

    if !resume.educations.is_empty() {
        col.push(Block::heading("EDUCATION", &styles.heading));
        for edu in &resume.educations {
            push_text(&mut col, &edu.institution, &styles.body);
            push_text(&mut col, &edu.degree, &styles.body);
            push_text(
                &mut col,
                join_non_empty([edu.start_date.as_str(), edu.end_date.as_str()], " - "),
                &styles.meta,
            );
            push_text(&mut col, &edu.description, &styles.meta);
            col.push(Block::Spacer(1.0));
        }
    }

    let links: Vec<String> = [
        ("LinkedIn", &resume.linkedin),
        ("GitHub", &resume.github),
        ("Twitter", &resume.twitter),
        ("Website", &resume.website),
    ]
    .into_iter()
    .filter(|(_, url)| !url.trim().is_empty())
    .map(|(label, url)| format!("{label}: {}", normalize_url(url)))
    .collect();
    if !links.is_empty() {
        col.push(Block::heading("LINKS", &styles.heading));
        for line in links {
            push_text(&mut col, line, &styles.meta);
        }
    }

    if !resume.skills.is_empty() {
        col.push(Block::heading("SKILLS", &styles.heading));
        for skill in sorted_skills(&resume.skills) {
            push_text(&mut col, skill, &styles.body);
        }
    }
    col
}

fn main_column(resume: &Resume, styles: &Styles, style: &TemplateStyle) -> Vec<Block> {
    let mut col = Vec::new();
    let (bullet, pattern) = (style.bullet.as_str(), style.date_format.as_str());
    let location = format_location(resume);

    if !resume.experiences.is_empty() {
        col.push(Block::heading("EXPERIENCE", &styles.heading));
        for exp in &resume.experiences {
            let top_line = join_non_empty([exp.company.as_str(), exp.job_title.as_str()], " | ");
            push_text(&mut col, top_line.to_uppercase(), &styles.body);

            let has_date = !exp.start_date.trim().is_empty() || !exp.end_date.trim().is_empty();
            let date = if has_date {
                format_date_range(&exp.start_date, &exp.end_date, pattern, true)
            } else {
                String::new()
            };
            push_text(
                &mut col,
                join_non_empty([date.as_str(), location.as_str()], " | "),
                &styles.meta,
            );
            for line in description_lines(&exp.description) {
                push_text(&mut col, format!("{bullet} {line}"), &styles.body);
            }
            col.push(Block::Spacer(1.0));
        }
    }

    if !resume.projects.is_empty() {
        col.push(Block::heading("PROJECTS", &styles.heading));
        for proj in &resume.projects {
            push_text(&mut col, proj.name.to_uppercase(), &styles.body);
            let date = format_date_range(&proj.start_date, &proj.end_date, pattern, false);
            push_text(
                &mut col,
                join_non_empty([date.as_str(), proj.role.as_str()], " | "),
                &styles.meta,
            );
            push_text(&mut col, &proj.description, &styles.body);
            col.push(Block::Spacer(1.0));
        }
    }

    if !resume.certifications.is_empty() {
        col.push(Block::heading("TRAINING", &styles.heading));
        for cert in &resume.certifications {
            push_text(&mut col, cert.name.to_uppercase(), &styles.body);
            push_text(
                &mut col,
                join_non_empty([cert.issuer.as_str(), cert.date.as_str()], " | "),
                &styles.meta,
            );
            push_text(&mut col, &cert.link, &styles.meta);
        }
    }

    if !resume.achievements.is_empty() {
        col.push(Block::heading("ACHIEVEMENTS", &styles.heading));
        for ach in &resume.achievements {
            push_text(&mut col, &ach.title, &styles.body);
            push_text(&mut col, &ach.subtitle, &styles.meta);
            push_text(&mut col, &ach.description, &styles.body);
        }
    }
    col
}
