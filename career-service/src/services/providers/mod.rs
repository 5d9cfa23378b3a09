//! Recommendation providers.
//!
//! A provider turns a user's background into structured career advice. The
//! Gemini implementation calls Google's generative API; the mock serves tests.

pub mod gemini;
pub mod mock;

use async_trait::async_trait;
use thiserror::Error;

use crate::models::Recommendations;

pub use gemini::GeminiProvider;
pub use mock::MockProvider;

/// Error type for provider operations.
#[derive(Error, Debug)]
pub enum ProviderError {
    #[error("Provider not configured: {0}")]
    NotConfigured(String),

    #[error("API error: {0}")]
    ApiError(String),

    #[error("Rate limited")]
    RateLimited,

    #[error("Content filtered")]
    ContentFiltered,

    #[error("Network error: {0}")]
    NetworkError(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

/// Background a recommendation is generated from.
#[derive(Debug, Clone)]
pub struct CareerInput {
    pub education: String,
    pub interests: Vec<String>,
    pub goals: String,
}

#[async_trait]
pub trait RecommendationProvider: Send + Sync {
    async fn recommend(&self, input: &CareerInput) -> Result<Recommendations, ProviderError>;

    async fn health_check(&self) -> Result<(), ProviderError>;
}

/// Career-counsellor prompt asking for the exact JSON shape of `Recommendations`.
pub fn build_prompt(input: &CareerInput) -> String {
    format!(
        r#"Act as a career counselor. Based on the user's background, suggest:
  - 3 relevant career paths with brief descriptions
  - 5 key skills to learn with importance levels
  - 3 online courses with platforms and URLs
  - 2 job/internship roles with potential companies

  User Info:
  Education: {education}
  Interests: {interests}
  Goals: {goals}

  Return the response as a valid JSON object with this exact structure:
  {{
    "career_paths": [
      {{"title": "Career Title", "description": "Brief description"}}
    ],
    "skills_to_learn": [
      {{"skill": "Skill Name", "importance": "High/Medium/Low"}}
    ],
    "recommended_courses": [
      {{"title": "Course Title", "platform": "Platform Name", "url": "Course URL"}}
    ],
    "job_roles": [
      {{"role": "Job Role", "companies": ["Company 1", "Company 2"]}}
    ]
  }}"#,
        education = input.education,
        interests = input.interests.join(", "),
        goals = input.goals,
    )
}

/// Parse model output: the span from the first `{` to the last `}` must be a
/// `Recommendations` object. Items get fresh ids and start unsaved.
pub fn parse_recommendations(text: &str) -> Result<Recommendations, ProviderError> {
    let start = text.find('{');
    let end = text.rfind('}');

    let json = match (start, end) {
        (Some(start), Some(end)) if start < end => &text[start..=end],
        _ => {
            return Err(ProviderError::InvalidResponse(
                "no JSON object in model output".to_string(),
            ))
        }
    };

    let mut recommendations: Recommendations = serde_json::from_str(json)
        .map_err(|e| ProviderError::InvalidResponse(format!("unparsable JSON: {}", e)))?;
    recommendations.reset_items();

    Ok(recommendations)
}
