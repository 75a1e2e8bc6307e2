//! Resume aggregate: personal fields plus ordered child collections.
//!
//! Collection order is display order everywhere: the transport JSON, the
//! `resume_items.sort_order` column, and every renderer.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Resume {
    pub id: Option<Uuid>,
    pub title: String,
    pub created: Option<DateTime<Utc>>,
    pub updated: Option<DateTime<Utc>>,

    pub full_name: String,
    pub profile_title: String,
    pub email: String,
    pub phone: String,
    pub city: String,
    pub address: String,
    pub summary: String,
    /// Raw image bytes; base64 on the wire.
    #[serde(with = "profile_pic")]
    pub profile_pic: Option<Vec<u8>>,

    pub linkedin: String,
    pub github: String,
    pub twitter: String,
    pub website: String,
    /// Payload encoded into the header QR code.
    pub qr_link: String,

    pub experiences: Vec<Experience>,
    pub educations: Vec<Education>,
    pub projects: Vec<Project>,
    pub certifications: Vec<Certification>,
    pub languages: Vec<Language>,
    pub skills: Vec<String>,
    pub achievements: Vec<Achievement>,
    pub references: Vec<Reference>,
    pub custom_sections: Vec<CustomSection>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Experience {
    pub job_title: String,
    pub company: String,
    pub start_date: String,
    pub end_date: String,
    pub description: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Education {
    pub degree: String,
    pub institution: String,
    pub start_date: String,
    pub end_date: String,
    pub description: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Project {
    pub name: String,
    pub role: String,
    pub technologies: String,
    pub start_date: String,
    pub end_date: String,
    pub description: String,
    pub link: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Certification {
    pub name: String,
    pub issuer: String,
    pub date: String,
    pub link: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Language {
    pub name: String,
    /// Basic, Conversational, Professional, Native, Fluent.
    pub proficiency: String,
}

impl Default for Language {
    fn default() -> Self {
        Self {
            name: String::new(),
            proficiency: "Fluent".to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Achievement {
    pub title: String,
    /// e.g. "Best Manager - 2020"
    pub subtitle: String,
    pub description: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Reference {
    pub name: String,
    pub title: String,
    pub company: String,
    pub phone: String,
    pub email: String,
    pub website: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CustomSection {
    pub title: String,
    pub items: Vec<String>,
}

impl Resume {
    /// A resume without an id has never been persisted.
    pub fn is_new(&self) -> bool {
        self.id.is_none()
    }

    /// Trimmed full name, or `"resume"` when blank.
    pub fn display_name(&self) -> &str {
        let name = self.full_name.trim();
        if name.is_empty() {
            "resume"
        } else {
            name
        }
    }

    /// File-name-safe stem used for every download and archive entry.
    pub fn file_stem(&self) -> String {
        self.display_name()
            .chars()
            .map(|c| {
                if c.is_whitespace() || matches!(c, '/' | '\\' | ':') {
                    '_'
                } else {
                    c
                }
            })
            .collect()
    }
}

/// Decodes a base64 image payload as sent by browsers.
///
/// Accepts `data:image/...;base64,` prefixes, stray whitespace, missing padding,
/// and the URL-safe alphabet. Returns `None` for anything undecodable.
pub fn decode_image_payload(raw: &str) -> Option<Vec<u8>> {
    use base64::engine::general_purpose::{STANDARD, URL_SAFE};
    use base64::Engine;

    let payload = match raw.split_once(',') {
        Some((_, rest)) => rest,
        None => raw,
    };
    let mut compact: String = payload.chars().filter(|c| !c.is_whitespace()).collect();
    if compact.is_empty() {
        return None;
    }
    let rem = compact.len() % 4;
    if rem != 0 {
        compact.push_str(&"=".repeat(4 - rem));
    }
    STANDARD
        .decode(&compact)
        .or_else(|_| URL_SAFE.decode(&compact))
        .ok()
        .filter(|bytes| !bytes.is_empty())
}

mod profile_pic {
    use base64::engine::general_purpose::STANDARD;
    use base64::Engine;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &Option<Vec<u8>>, s: S) -> Result<S::Ok, S::Error> {
        match value {
            Some(bytes) => s.serialize_some(&STANDARD.encode(bytes)),
            None => s.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Option<Vec<u8>>, D::Error> {
        let raw: Option<String> = Option::deserialize(d)?;
        Ok(raw.as_deref().and_then(super::decode_image_payload))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn populated() -> Resume {
        Resume {
            id: Some(Uuid::new_v4()),
            title: "Backend".into(),
            created: Some(Utc::now()),
            updated: Some(Utc::now()),
            full_name: "Ada Lovelace".into(),
            profile_title: "Engineer".into(),
            email: "ada@example.com".into(),
            city: "London".into(),
            profile_pic: Some(vec![0x89, b'P', b'N', b'G', 1, 2, 3]),
            qr_link: "https://ada.dev".into(),
            experiences: vec![
                Experience {
                    job_title: "Second".into(),
                    ..Default::default()
                },
                Experience {
                    job_title: "First".into(),
                    ..Default::default()
                },
            ],
            skills: vec!["Rust".into(), "Go".into(), "C".into()],
            languages: vec![Language {
                name: "French".into(),
                proficiency: "Professional".into(),
            }],
            custom_sections: vec![CustomSection {
                title: "Talks".into(),
                items: vec!["RustConf".into()],
            }],
            ..Default::default()
        }
    }

    #[test]
    fn test_round_trip_preserves_every_field_and_order() {
        let resume = populated();
        let json = serde_json::to_string(&resume).unwrap();
        let back: Resume = serde_json::from_str(&json).unwrap();
        assert_eq!(back, resume);
        assert_eq!(back.experiences[0].job_title, "Second");
        assert_eq!(back.skills, vec!["Rust", "Go", "C"]);
    }

    #[test]
    fn test_missing_fields_default_to_empty() {
        let resume: Resume = serde_json::from_str(r#"{"full_name": "Only Name"}"#).unwrap();
        assert!(resume.is_new());
        assert_eq!(resume.email, "");
        assert!(resume.experiences.is_empty());
        assert!(resume.profile_pic.is_none());
    }

    #[test]
    fn test_language_proficiency_defaults_to_fluent() {
        let lang: Language = serde_json::from_str(r#"{"name": "German"}"#).unwrap();
        assert_eq!(lang.proficiency, "Fluent");
    }

    #[test]
    fn test_profile_pic_accepts_data_url_without_padding() {
        // "hello" => aGVsbG8=
        let resume: Resume =
            serde_json::from_str(r#"{"profile_pic": "data:image/png;base64,aGVsbG8"}"#).unwrap();
        assert_eq!(resume.profile_pic.as_deref(), Some(&b"hello"[..]));
    }

    #[test]
    fn test_corrupt_profile_pic_is_dropped() {
        let resume: Resume = serde_json::from_str(r#"{"profile_pic": "!!!not base64!!!"}"#).unwrap();
        assert!(resume.profile_pic.is_none());
    }

    #[test]
    fn test_file_stem_replaces_whitespace_and_separators() {
        let resume = Resume {
            full_name: "  Jane van/Doe ".into(),
            ..Default::default()
        };
        assert_eq!(resume.file_stem(), "Jane_van_Doe");
        assert_eq!(Resume::default().file_stem(), "resume");
    }
}
