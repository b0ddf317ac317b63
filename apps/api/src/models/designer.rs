use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A designer profile as stored.
///
/// `skills` is always plain strings. Legacy clients send duck-typed skill
/// entries on the wire (`SkillTag`); those are collapsed at the profile
/// boundary so nothing downstream has to disambiguate a union type.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DesignerProfile {
    pub id: Uuid,
    pub name: String,
    pub headline: String,
    pub skills: Vec<String>,
    pub bio: String,
    pub budget_range: Option<String>,
    pub avatar_url: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// A skill entry as it arrives on the wire: either `"logo design"` or
/// `{"id": 3, "text": "logo design"}`. Both shapes are live in the field.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum SkillTag {
    Plain(String),
    Tagged {
        #[serde(default)]
        id: Option<serde_json::Value>,
        text: String,
    },
}

impl SkillTag {
    /// Collapses the wire union to the skill text.
    pub fn into_text(self) -> String {
        match self {
            SkillTag::Plain(text) => text,
            SkillTag::Tagged { text, .. } => text,
        }
    }
}

/// Normalizes a wire skill list: union shapes collapsed, whitespace trimmed,
/// empties dropped.
pub fn normalize_skills(tags: Vec<SkillTag>) -> Vec<String> {
    tags.into_iter()
        .map(SkillTag::into_text)
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_skill_tag_plain_string_deserializes() {
        let tag: SkillTag = serde_json::from_str(r#""logo design""#).unwrap();
        assert_eq!(tag.into_text(), "logo design");
    }

    #[test]
    fn test_skill_tag_object_deserializes() {
        let tag: SkillTag = serde_json::from_str(r#"{"id": 7, "text": "branding"}"#).unwrap();
        assert_eq!(tag.into_text(), "branding");
    }

    #[test]
    fn test_skill_tag_object_with_string_id() {
        let tag: SkillTag = serde_json::from_str(r#"{"id": "sk-7", "text": "branding"}"#).unwrap();
        assert_eq!(tag.into_text(), "branding");
    }

    #[test]
    fn test_normalize_skills_mixed_shapes() {
        let tags: Vec<SkillTag> =
            serde_json::from_str(r#"["ui", {"id": 1, "text": "ux research"}, "  ", "typography "]"#)
                .unwrap();
        let skills = normalize_skills(tags);
        assert_eq!(skills, vec!["ui", "ux research", "typography"]);
    }

    #[test]
    fn test_normalize_skills_empty_input() {
        assert!(normalize_skills(vec![]).is_empty());
    }
}
