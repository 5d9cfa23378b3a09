use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::{Recommendations, RecommendationsPatch, Skill};

/// Interests may be sent as one string or a list.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum Interests {
    One(String),
    Many(Vec<String>),
}

impl Default for Interests {
    fn default() -> Self {
        Interests::Many(Vec::new())
    }
}

impl From<Interests> for Vec<String> {
    fn from(interests: Interests) -> Self {
        match interests {
            Interests::One(one) => vec![one],
            Interests::Many(many) => many,
        }
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct RecommendationRequest {
    #[serde(default)]
    #[validate(length(max = 2000, message = "Education is too long"))]
    pub education: String,

    #[serde(default)]
    pub interests: Interests,

    #[serde(default)]
    #[validate(length(max = 2000, message = "Goals are too long"))]
    pub goals: String,

    #[serde(default)]
    pub skills: Vec<Skill>,
}

#[derive(Debug, Serialize)]
pub struct RecommendationResponse {
    pub success: bool,
    pub data: Recommendations,
    pub profile_id: String,
}

#[derive(Debug, Default, Deserialize, Validate)]
pub struct UpdateProfileRequest {
    #[serde(default)]
    pub updates: ProfileUpdates,
}

#[derive(Debug, Default, Deserialize)]
pub struct ProfileUpdates {
    pub recommendations: Option<RecommendationsPatch>,
}

#[derive(Debug, Deserialize)]
pub struct CoursesQuery {
    /// Comma-separated skill names.
    pub skills: Option<String>,
}

impl CoursesQuery {
    pub fn skill_list(&self) -> Vec<String> {
        self.skills
            .as_deref()
            .unwrap_or_default()
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect()
    }
}

#[derive(Debug, Deserialize)]
pub struct JobsQuery {
    pub role: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct StatsQuery {
    pub career_path: Option<String>,
}
