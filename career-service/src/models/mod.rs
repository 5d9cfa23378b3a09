pub mod career_profile;
pub mod user;

pub use career_profile::{
    CareerPath, CareerProfile, CourseRecommendation, JobRole, ProfileSummary, Proficiency,
    Recommendations, RecommendationsPatch, Skill, SkillToLearn,
};
pub use user::{normalize_email, PublicUser, RefreshGrant, User};
