//! Career profiles: generation, listing and saved-item updates.
//!
//! Every operation is scoped to the calling user; another user's profile is
//! indistinguishable from a missing one.

use std::sync::Arc;

use super::providers::{CareerInput, RecommendationProvider};
use super::store::CareerProfileStore;
use super::ServiceError;
use crate::models::{CareerProfile, ProfileSummary, Recommendations, RecommendationsPatch, Skill};

const PROFILE: &str = "Career profile";

/// Background submitted for a new recommendation.
#[derive(Debug, Clone)]
pub struct NewProfile {
    pub education: String,
    pub interests: Vec<String>,
    pub goals: String,
    pub skills: Vec<Skill>,
}

#[derive(Clone)]
pub struct CareerService {
    profiles: Arc<dyn CareerProfileStore>,
    provider: Arc<dyn RecommendationProvider>,
}

impl CareerService {
    pub fn new(
        profiles: Arc<dyn CareerProfileStore>,
        provider: Arc<dyn RecommendationProvider>,
    ) -> Self {
        Self { profiles, provider }
    }

    /// Generate recommendations and persist them as a new profile.
    pub async fn generate(
        &self,
        user_id: &str,
        input: NewProfile,
    ) -> Result<(Recommendations, String), ServiceError> {
        let education = input.education.trim().to_string();
        let goals = input.goals.trim().to_string();
        let interests: Vec<String> = input
            .interests
            .iter()
            .map(|i| i.trim().to_string())
            .filter(|i| !i.is_empty())
            .collect();

        if education.is_empty() || goals.is_empty() || interests.is_empty() {
            return Err(ServiceError::Validation(
                "Education, interests, and goals are required".to_string(),
            ));
        }

        let career_input = CareerInput {
            education,
            interests,
            goals,
        };

        let recommendations = self.provider.recommend(&career_input).await.map_err(|e| {
            tracing::error!(user_id = %user_id, error = %e, "Failed to generate career recommendations");
            ServiceError::Provider(e)
        })?;

        let profile = CareerProfile::new(
            user_id.to_string(),
            career_input.education,
            career_input.interests,
            career_input.goals,
            input.skills,
            recommendations.clone(),
        );
        self.profiles.insert_profile(&profile).await?;

        tracing::info!(user_id = %user_id, profile_id = %profile.id, "Career profile created");

        Ok((recommendations, profile.id))
    }

    /// Whether the recommendation provider can currently serve requests.
    pub async fn provider_ready(&self) -> bool {
        match self.provider.health_check().await {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!(error = %e, "Recommendation provider unavailable");
                false
            }
        }
    }

    pub async fn list(&self, user_id: &str) -> Result<Vec<ProfileSummary>, ServiceError> {
        Ok(self.profiles.list_profiles(user_id).await?)
    }

    pub async fn get(&self, user_id: &str, profile_id: &str) -> Result<CareerProfile, ServiceError> {
        self.profiles
            .find_profile(profile_id, user_id)
            .await?
            .ok_or(ServiceError::NotFound(PROFILE))
    }

    /// Apply item-level changes to a profile's recommendations.
    pub async fn update(
        &self,
        user_id: &str,
        profile_id: &str,
        patch: Option<RecommendationsPatch>,
    ) -> Result<CareerProfile, ServiceError> {
        let mut profile = self.get(user_id, profile_id).await?;

        if let Some(patch) = patch {
            profile.recommendations.apply(patch);
        }
        profile.touch();

        if !self.profiles.replace_profile(&profile).await? {
            return Err(ServiceError::NotFound(PROFILE));
        }

        tracing::info!(user_id = %user_id, profile_id = %profile_id, "Career profile updated");
        Ok(profile)
    }

    pub async fn delete(&self, user_id: &str, profile_id: &str) -> Result<(), ServiceError> {
        if !self.profiles.delete_profile(profile_id, user_id).await? {
            return Err(ServiceError::NotFound(PROFILE));
        }

        tracing::info!(user_id = %user_id, profile_id = %profile_id, "Career profile deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::memory::InMemoryStore;
    use crate::services::providers::MockProvider;

    fn service(enabled: bool) -> (CareerService, Arc<InMemoryStore>) {
        let store = Arc::new(InMemoryStore::new());
        let service = CareerService::new(store.clone(), Arc::new(MockProvider::new(enabled)));
        (service, store)
    }

    fn input() -> NewProfile {
        NewProfile {
            education: "BSc Computer Science".to_string(),
            interests: vec!["AI".to_string()],
            goals: "Become a data scientist".to_string(),
            skills: vec![],
        }
    }

    #[tokio::test]
    async fn test_generate_persists_profile() {
        let (service, store) = service(true);

        let (recs, profile_id) = service.generate("user-1", input()).await.expect("generate");

        assert_eq!(recs.career_paths.len(), 3);
        assert_eq!(store.profile_count(), 1);
        let profile = service.get("user-1", &profile_id).await.expect("get");
        assert_eq!(profile.recommendations, recs);
    }

    #[tokio::test]
    async fn test_generate_requires_background() {
        let (service, store) = service(true);
        let mut missing_goals = input();
        missing_goals.goals = "  ".to_string();

        assert!(matches!(
            service.generate("user-1", missing_goals).await,
            Err(ServiceError::Validation(_))
        ));
        assert_eq!(store.profile_count(), 0);
    }

    #[tokio::test]
    async fn test_provider_failure_persists_nothing() {
        let (service, store) = service(false);

        assert!(matches!(
            service.generate("user-1", input()).await,
            Err(ServiceError::Provider(_))
        ));
        assert_eq!(store.profile_count(), 0);
    }

    #[tokio::test]
    async fn test_provider_readiness() {
        assert!(service(true).0.provider_ready().await);
        assert!(!service(false).0.provider_ready().await);
    }

    #[tokio::test]
    async fn test_update_marks_item_saved() {
        let (service, _store) = service(true);
        let (recs, profile_id) = service.generate("user-1", input()).await.expect("generate");
        let before = service.get("user-1", &profile_id).await.expect("get").updated_at;

        let patch: RecommendationsPatch = serde_json::from_value(serde_json::json!({
            "career_paths": [{"id": recs.career_paths[1].id, "is_saved": true}]
        }))
        .expect("patch");

        let updated = service
            .update("user-1", &profile_id, Some(patch))
            .await
            .expect("update");

        assert!(updated.recommendations.career_paths[1].is_saved);
        assert!(!updated.recommendations.career_paths[0].is_saved);
        assert!(updated.updated_at >= before);
    }

    #[tokio::test]
    async fn test_other_users_profiles_are_not_found() {
        let (service, _store) = service(true);
        let (_, profile_id) = service.generate("owner", input()).await.expect("generate");

        assert!(matches!(
            service.get("intruder", &profile_id).await,
            Err(ServiceError::NotFound(_))
        ));
        assert!(matches!(
            service.update("intruder", &profile_id, None).await,
            Err(ServiceError::NotFound(_))
        ));
        assert!(matches!(
            service.delete("intruder", &profile_id).await,
            Err(ServiceError::NotFound(_))
        ));

        service.delete("owner", &profile_id).await.expect("delete");
        assert!(service.list("owner").await.expect("list").is_empty());
    }
}
