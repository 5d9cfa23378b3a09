//! Mock provider for testing.

use super::{parse_recommendations, CareerInput, ProviderError, RecommendationProvider};
use crate::models::Recommendations;
use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};

const CANNED_OUTPUT: &str = r#"{
  "career_paths": [
    {"title": "Data Scientist", "description": "Builds predictive models from data"},
    {"title": "Machine Learning Engineer", "description": "Ships models to production"},
    {"title": "Data Analyst", "description": "Turns data into business insight"}
  ],
  "skills_to_learn": [
    {"skill": "Python", "importance": "High"},
    {"skill": "Statistics", "importance": "High"},
    {"skill": "SQL", "importance": "Medium"},
    {"skill": "Machine Learning", "importance": "High"},
    {"skill": "Communication", "importance": "Medium"}
  ],
  "recommended_courses": [
    {"title": "Machine Learning Fundamentals", "platform": "Coursera", "url": "https://www.coursera.org/learn/fundamentals-of-machine-learning-and-artificial-intelligence"},
    {"title": "Data Science with Python", "platform": "edX", "url": "https://www.edx.org/learn/data-science/harvard-university-introduction-to-data-science-with-python"},
    {"title": "AI for Everyone", "platform": "Coursera", "url": "https://www.coursera.org/learn/ai-for-everyone"}
  ],
  "job_roles": [
    {"role": "Data Science Intern", "companies": ["Amazon", "Microsoft"]},
    {"role": "Junior Data Analyst", "companies": ["Twitter", "Spotify"]}
  ]
}"#;

/// Provider returning a fixed set of recommendations, or failing on demand.
pub struct MockProvider {
    enabled: bool,
    calls: AtomicUsize,
}

impl MockProvider {
    pub fn new(enabled: bool) -> Self {
        Self {
            enabled,
            calls: AtomicUsize::new(0),
        }
    }

    /// Number of `recommend` calls received.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl RecommendationProvider for MockProvider {
    async fn recommend(&self, _input: &CareerInput) -> Result<Recommendations, ProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        if !self.enabled {
            return Err(ProviderError::NotConfigured(
                "Mock provider not enabled".to_string(),
            ));
        }

        parse_recommendations(CANNED_OUTPUT)
    }

    async fn health_check(&self) -> Result<(), ProviderError> {
        if self.enabled {
            Ok(())
        } else {
            Err(ProviderError::NotConfigured(
                "Mock provider not enabled".to_string(),
            ))
        }
    }
}
