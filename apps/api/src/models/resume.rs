//! Résumé document as supplied by the editor.
//!
//! The wire format is the editor's camelCase JSON. Parsing is lenient: a malformed
//! `sections` value, a section that is not an object, or `items` that is not an array
//! is logged and treated as absent instead of rejecting the whole document. Text
//! fields are trimmed on the way in and blank values become `None`, so every
//! `Some(_)` below is non-blank.

use serde::{de::Deserializer, Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::warn;

// ────────────────────────────────────────────────────────────────────────────
// Document
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResumeDocument {
    #[serde(default, deserialize_with = "lenient_personal_info")]
    pub personal_info: PersonalInfo,
    /// Render order.
    #[serde(default, deserialize_with = "lenient_sections")]
    pub sections: Vec<Section>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonalInfo {
    #[serde(default, deserialize_with = "lenient_text")]
    pub full_name: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub job_title: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub email: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub phone: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub address: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub summary: Option<String>,
}

// ────────────────────────────────────────────────────────────────────────────
// Sections
// ────────────────────────────────────────────────────────────────────────────

/// Section archetype. Decides the layout strategy and which item fields are read.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum SectionKind {
    WorkExperience,
    Education,
    Skills,
    Projects,
    Languages,
    Certifications,
    Custom,
    /// Anything else the editor sends; rendered with the generic fallback.
    Unknown(String),
}

impl SectionKind {
    pub fn parse(raw: &str) -> Self {
        match raw {
            "workExperience" => SectionKind::WorkExperience,
            "education" => SectionKind::Education,
            "skills" => SectionKind::Skills,
            "projects" => SectionKind::Projects,
            "languages" => SectionKind::Languages,
            "certifications" => SectionKind::Certifications,
            "custom" => SectionKind::Custom,
            other => SectionKind::Unknown(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            SectionKind::WorkExperience => "workExperience",
            SectionKind::Education => "education",
            SectionKind::Skills => "skills",
            SectionKind::Projects => "projects",
            SectionKind::Languages => "languages",
            SectionKind::Certifications => "certifications",
            SectionKind::Custom => "custom",
            SectionKind::Unknown(raw) => raw,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Section {
    /// Editor identifier; layout never reads it.
    pub id: Option<String>,
    pub kind: SectionKind,
    pub title: String,
    pub items: Vec<SectionItem>,
}

impl Section {
    /// Builds a section from one JSON array entry. `None` if the entry is not an object.
    pub fn from_value(value: &Value) -> Option<Self> {
        let fields = value.as_object()?;
        let kind = SectionKind::parse(fields.get("type").and_then(Value::as_str).unwrap_or(""));

        let items = match fields.get("items") {
            Some(Value::Array(entries)) => entries
                .iter()
                .filter_map(|entry| match entry.as_object() {
                    Some(map) => Some(SectionItem::from_fields(&kind, map)),
                    None => {
                        warn!(section = kind.as_str(), "Skipping item that is not an object");
                        None
                    }
                })
                .collect(),
            None | Some(Value::Null) => Vec::new(),
            Some(other) => {
                warn!(
                    section = kind.as_str(),
                    found = json_kind(other),
                    "Section `items` is not an array; treating as empty"
                );
                Vec::new()
            }
        };

        Some(Section {
            id: text_field(fields, "id"),
            title: text_field(fields, "title").unwrap_or_default(),
            kind,
            items,
        })
    }

    /// Items that pass their kind's required-field check, in order.
    pub fn valid_items(&self) -> Vec<&SectionItem> {
        self.items.iter().filter(|item| item.is_valid()).collect()
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Items
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq)]
pub struct WorkItem {
    pub job_title: Option<String>,
    pub company: Option<String>,
    pub date: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct EducationItem {
    pub degree: Option<String>,
    pub institution: Option<String>,
    pub date: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SkillItem {
    pub name: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProjectItem {
    pub name: Option<String>,
    pub link: Option<String>,
    pub date: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct LanguageItem {
    pub name: Option<String>,
    pub level: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CertificationItem {
    pub name: Option<String>,
    pub issuer: Option<String>,
    pub date: Option<String>,
    pub description: Option<String>,
    pub credential_id: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CustomItem {
    pub title: Option<String>,
    pub date: Option<String>,
    pub description: Option<String>,
}

/// Item of a section whose kind is not recognised.
///
/// `name` is only a display fallback for a missing `title`; it does not make the
/// item valid on its own.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GenericItem {
    pub title: Option<String>,
    pub name: Option<String>,
    pub description: Option<String>,
}

/// One entry of a section; the variant always matches the owning section's kind.
#[derive(Debug, Clone, PartialEq)]
pub enum SectionItem {
    Work(WorkItem),
    Education(EducationItem),
    Skill(SkillItem),
    Project(ProjectItem),
    Language(LanguageItem),
    Certification(CertificationItem),
    Custom(CustomItem),
    Generic(GenericItem),
}

impl SectionItem {
    /// Reads the fields `kind` uses from a loose JSON object.
    ///
    /// `description` falls back to `details` for every kind that has one.
    pub fn from_fields(kind: &SectionKind, fields: &Map<String, Value>) -> Self {
        let text = |key: &str| text_field(fields, key);
        let description = || text("description").or_else(|| text("details"));

        match kind {
            SectionKind::WorkExperience => SectionItem::Work(WorkItem {
                job_title: text("jobTitle"),
                company: text("company"),
                date: text("date"),
                description: description(),
            }),
            SectionKind::Education => SectionItem::Education(EducationItem {
                degree: text("degree"),
                institution: text("institution"),
                date: text("date"),
                description: description(),
            }),
            SectionKind::Skills => SectionItem::Skill(SkillItem { name: text("name") }),
            SectionKind::Projects => SectionItem::Project(ProjectItem {
                name: text("name"),
                link: text("link"),
                date: text("date"),
                description: description(),
            }),
            SectionKind::Languages => SectionItem::Language(LanguageItem {
                name: text("name"),
                level: text("level"),
            }),
            SectionKind::Certifications => SectionItem::Certification(CertificationItem {
                name: text("name"),
                issuer: text("issuer"),
                date: text("date"),
                description: description(),
                credential_id: text("credentialId"),
            }),
            SectionKind::Custom => SectionItem::Custom(CustomItem {
                title: text("title"),
                date: text("date"),
                description: description(),
            }),
            SectionKind::Unknown(_) => SectionItem::Generic(GenericItem {
                title: text("title"),
                name: text("name"),
                description: description(),
            }),
        }
    }

    /// Required-field check: at least one required field is non-blank.
    pub fn is_valid(&self) -> bool {
        match self {
            SectionItem::Work(item) => item.job_title.is_some(),
            SectionItem::Education(item) => item.degree.is_some(),
            SectionItem::Skill(item) => item.name.is_some(),
            SectionItem::Project(item) => item.name.is_some(),
            SectionItem::Language(item) => item.name.is_some(),
            SectionItem::Certification(item) => item.name.is_some(),
            SectionItem::Custom(item) => item.title.is_some() || item.description.is_some(),
            SectionItem::Generic(item) => item.title.is_some() || item.description.is_some(),
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Lenient field readers
// ────────────────────────────────────────────────────────────────────────────

/// Strings are trimmed; numbers and booleans are stringified; anything else,
/// and anything blank, is absent.
fn text_value(value: &Value) -> Option<String> {
    let text = match value {
        Value::String(s) => s.trim().to_string(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        _ => return None,
    };
    (!text.is_empty()).then_some(text)
}

fn text_field(fields: &Map<String, Value>, key: &str) -> Option<String> {
    fields.get(key).and_then(text_value)
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

fn lenient_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(text_value(&value))
}

fn lenient_personal_info<'de, D>(deserializer: D) -> Result<PersonalInfo, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    match value {
        Value::Object(_) => PersonalInfo::deserialize(value).map_err(serde::de::Error::custom),
        Value::Null => Ok(PersonalInfo::default()),
        other => {
            warn!(
                found = json_kind(&other),
                "`personalInfo` is not an object; rendering without a header"
            );
            Ok(PersonalInfo::default())
        }
    }
}

fn lenient_sections<'de, D>(deserializer: D) -> Result<Vec<Section>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    match value {
        Value::Array(entries) => Ok(entries
            .iter()
            .enumerate()
            .filter_map(|(index, entry)| {
                let section = Section::from_value(entry);
                if section.is_none() {
                    warn!(index, "Skipping section that is not an object");
                }
                section
            })
            .collect()),
        Value::Null => Ok(Vec::new()),
        other => {
            warn!(
                found = json_kind(&other),
                "`sections` is not an array; rendering header and profile only"
            );
            Ok(Vec::new())
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
