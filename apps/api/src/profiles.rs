//! Profile directory — the collaborator that owns designer profile data.
//!
//! The evaluation core never reads profiles directly. It asks this module
//! for a prompt-ready descriptor string (the correlation key sent to the
//! summarization backend) and, separately, for display details. The
//! descriptor is an opaque derived string, NOT a stable identifier: two
//! designers with byte-identical profile text produce identical
//! descriptors, which is why reconciliation keeps a fallback match.

use std::sync::Arc;

use async_trait::async_trait;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::designer::DesignerProfile;
use crate::store::MarketStore;

/// Max characters of bio carried into a descriptor.
const BIO_EXCERPT_CHARS: usize = 240;

#[async_trait]
pub trait ProfileDirectory: Send + Sync {
    /// Builds the descriptor used as the correlation key with the
    /// summarization backend. Must be byte-identical across calls while the
    /// underlying profile is unchanged; callers tolerate violations of that
    /// via the fallback match, but exact reconciliation depends on it.
    async fn build_descriptor(&self, designer_id: Uuid) -> Result<String, AppError>;

    /// Display enrichment only (name, headline, avatar) — never part of the
    /// ranking or reconciliation contract.
    async fn designer_details(&self, designer_id: Uuid)
        -> Result<Option<DesignerProfile>, AppError>;
}

/// Directory backed by the in-memory marketplace store.
pub struct InMemoryProfileDirectory {
    store: Arc<MarketStore>,
}

impl InMemoryProfileDirectory {
    pub fn new(store: Arc<MarketStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl ProfileDirectory for InMemoryProfileDirectory {
    async fn build_descriptor(&self, designer_id: Uuid) -> Result<String, AppError> {
        let profile = self.store.get_designer(designer_id).ok_or_else(|| {
            AppError::NotFound(format!("Designer {designer_id} not found"))
        })?;
        Ok(render_descriptor(&profile))
    }

    async fn designer_details(
        &self,
        designer_id: Uuid,
    ) -> Result<Option<DesignerProfile>, AppError> {
        Ok(self.store.get_designer(designer_id))
    }
}

/// Renders a profile into descriptor form.
///
/// Field order and separators are fixed: any change here alters descriptors
/// for in-flight calls and silently degrades exact-match reconciliation to
/// the fallback path.
pub fn render_descriptor(profile: &DesignerProfile) -> String {
    let bio_excerpt: String = profile.bio.chars().take(BIO_EXCERPT_CHARS).collect();
    let mut parts = vec![
        format!("Name: {}", profile.name),
        format!("Headline: {}", profile.headline),
        format!("Skills: {}", profile.skills.join(", ")),
        format!("Bio: {bio_excerpt}"),
    ];
    if let Some(range) = &profile.budget_range {
        parts.push(format!("Budget range: {range}"));
    }
    parts.join(" | ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn profile(bio: &str, budget_range: Option<&str>) -> DesignerProfile {
        DesignerProfile {
            id: Uuid::new_v4(),
            name: "Ada".to_string(),
            headline: "Brand designer".to_string(),
            skills: vec!["branding".to_string(), "typography".to_string()],
            bio: bio.to_string(),
            budget_range: budget_range.map(str::to_string),
            avatar_url: None,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_descriptor_is_deterministic() {
        let p = profile("Ten years of identity work.", Some("£1000-£3000"));
        assert_eq!(render_descriptor(&p), render_descriptor(&p));
    }

    #[test]
    fn test_descriptor_includes_all_profile_parts() {
        let p = profile("Ten years of identity work.", Some("£1000-£3000"));
        let descriptor = render_descriptor(&p);
        assert!(descriptor.contains("Name: Ada"));
        assert!(descriptor.contains("Headline: Brand designer"));
        assert!(descriptor.contains("Skills: branding, typography"));
        assert!(descriptor.contains("Bio: Ten years"));
        assert!(descriptor.contains("Budget range: £1000-£3000"));
    }

    #[test]
    fn test_descriptor_omits_missing_budget_range() {
        let p = profile("bio", None);
        assert!(!render_descriptor(&p).contains("Budget range"));
    }

    #[test]
    fn test_descriptor_truncates_bio_by_characters() {
        // 300 multi-byte chars; truncation must not split one
        let bio: String = "é".repeat(300);
        let p = profile(&bio, None);
        let descriptor = render_descriptor(&p);
        let bio_part = descriptor.split("Bio: ").nth(1).unwrap();
        assert_eq!(bio_part.chars().count(), BIO_EXCERPT_CHARS);
    }

    #[tokio::test]
    async fn test_directory_builds_descriptor_from_store() {
        let store = Arc::new(MarketStore::new());
        let registered = store.register_designer(
            "Ada".to_string(),
            "Brand designer".to_string(),
            vec!["branding".to_string()],
            "bio".to_string(),
            None,
            None,
        );
        let directory = InMemoryProfileDirectory::new(store);

        let descriptor = directory.build_descriptor(registered.id).await.unwrap();
        assert!(descriptor.contains("Name: Ada"));

        let missing = directory.build_descriptor(Uuid::new_v4()).await;
        assert!(matches!(missing, Err(AppError::NotFound(_))));
    }
}
