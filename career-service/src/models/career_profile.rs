//! Career profile: a user's background plus the recommendations generated for it.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

fn new_item_id() -> String {
    Uuid::new_v4().to_string()
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Proficiency {
    #[default]
    Beginner,
    Intermediate,
    Advanced,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Skill {
    pub name: String,
    #[serde(default)]
    pub proficiency: Proficiency,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CareerPath {
    #[serde(default = "new_item_id")]
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub is_saved: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkillToLearn {
    #[serde(default = "new_item_id")]
    pub id: String,
    #[serde(default)]
    pub skill: String,
    #[serde(default)]
    pub importance: String,
    #[serde(default)]
    pub is_saved: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CourseRecommendation {
    #[serde(default = "new_item_id")]
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub platform: String,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub is_saved: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobRole {
    #[serde(default = "new_item_id")]
    pub id: String,
    #[serde(default)]
    pub role: String,
    #[serde(default)]
    pub companies: Vec<String>,
    #[serde(default)]
    pub is_saved: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Recommendations {
    #[serde(default)]
    pub career_paths: Vec<CareerPath>,
    #[serde(default)]
    pub skills_to_learn: Vec<SkillToLearn>,
    #[serde(default)]
    pub recommended_courses: Vec<CourseRecommendation>,
    #[serde(default)]
    pub job_roles: Vec<JobRole>,
}

impl Recommendations {
    /// Give every item a fresh id and mark it unsaved.
    ///
    /// Generated output is untrusted, so ids it may carry are discarded.
    pub fn reset_items(&mut self) {
        for item in &mut self.career_paths {
            item.id = new_item_id();
            item.is_saved = false;
        }
        for item in &mut self.skills_to_learn {
            item.id = new_item_id();
            item.is_saved = false;
        }
        for item in &mut self.recommended_courses {
            item.id = new_item_id();
            item.is_saved = false;
        }
        for item in &mut self.job_roles {
            item.id = new_item_id();
            item.is_saved = false;
        }
    }

    /// Apply a patch item by item. Items whose id is unknown are ignored.
    pub fn apply(&mut self, patch: RecommendationsPatch) {
        for p in patch.career_paths.unwrap_or_default() {
            if let Some(item) = self.career_paths.iter_mut().find(|i| i.id == p.id) {
                set_if_some(&mut item.title, p.title);
                set_if_some(&mut item.description, p.description);
                set_if_some(&mut item.is_saved, p.is_saved);
            }
        }
        for p in patch.skills_to_learn.unwrap_or_default() {
            if let Some(item) = self.skills_to_learn.iter_mut().find(|i| i.id == p.id) {
                set_if_some(&mut item.skill, p.skill);
                set_if_some(&mut item.importance, p.importance);
                set_if_some(&mut item.is_saved, p.is_saved);
            }
        }
        for p in patch.recommended_courses.unwrap_or_default() {
            if let Some(item) = self.recommended_courses.iter_mut().find(|i| i.id == p.id) {
                set_if_some(&mut item.title, p.title);
                set_if_some(&mut item.platform, p.platform);
                set_if_some(&mut item.url, p.url);
                set_if_some(&mut item.is_saved, p.is_saved);
            }
        }
        for p in patch.job_roles.unwrap_or_default() {
            if let Some(item) = self.job_roles.iter_mut().find(|i| i.id == p.id) {
                set_if_some(&mut item.role, p.role);
                set_if_some(&mut item.companies, p.companies);
                set_if_some(&mut item.is_saved, p.is_saved);
            }
        }
    }
}

fn set_if_some<T>(slot: &mut T, value: Option<T>) {
    if let Some(value) = value {
        *slot = value;
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RecommendationsPatch {
    pub career_paths: Option<Vec<CareerPathPatch>>,
    pub skills_to_learn: Option<Vec<SkillToLearnPatch>>,
    pub recommended_courses: Option<Vec<CoursePatch>>,
    pub job_roles: Option<Vec<JobRolePatch>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CareerPathPatch {
    pub id: String,
    pub title: Option<String>,
    pub description: Option<String>,
    pub is_saved: Option<bool>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SkillToLearnPatch {
    pub id: String,
    pub skill: Option<String>,
    pub importance: Option<String>,
    pub is_saved: Option<bool>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CoursePatch {
    pub id: String,
    pub title: Option<String>,
    pub platform: Option<String>,
    pub url: Option<String>,
    pub is_saved: Option<bool>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct JobRolePatch {
    pub id: String,
    pub role: Option<String>,
    pub companies: Option<Vec<String>>,
    pub is_saved: Option<bool>,
}

/// Career profile stored in MongoDB, owned by exactly one user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CareerProfile {
    #[serde(rename = "_id")]
    pub id: String,
    pub user: String,
    pub education: String,
    pub interests: Vec<String>,
    pub goals: String,
    #[serde(default)]
    pub skills: Vec<Skill>,
    #[serde(default)]
    pub recommendations: Recommendations,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub created_at: DateTime<Utc>,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub updated_at: DateTime<Utc>,
}

impl CareerProfile {
    pub fn new(
        user: String,
        education: String,
        interests: Vec<String>,
        goals: String,
        skills: Vec<Skill>,
        recommendations: Recommendations,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4().to_string(),
            user,
            education,
            interests,
            goals,
            skills,
            recommendations,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }

    pub fn summary(&self) -> ProfileSummary {
        ProfileSummary {
            id: self.id.clone(),
            user: self.user.clone(),
            education: self.education.clone(),
            interests: self.interests.clone(),
            goals: self.goals.clone(),
            skills: self.skills.clone(),
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

/// Profile listing entry; recommendations are omitted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfileSummary {
    pub id: String,
    pub user: String,
    pub education: String,
    pub interests: Vec<String>,
    pub goals: String,
    pub skills: Vec<Skill>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
