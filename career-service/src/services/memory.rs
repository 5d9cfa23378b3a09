//! In-process storage used by tests and database-less local runs.

use async_trait::async_trait;
use dashmap::{mapref::entry::Entry, DashMap};

use super::store::{CareerProfileStore, StoreError, UserStore};
use crate::models::{CareerProfile, ProfileSummary, RefreshGrant, User};

#[derive(Default)]
pub struct InMemoryStore {
    users: DashMap<String, User>,
    /// email -> user id; the entry lock makes email claims exclusive.
    emails: DashMap<String, String>,
    profiles: DashMap<String, CareerProfile>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn user_count(&self) -> usize {
        self.users.len()
    }

    pub fn profile_count(&self) -> usize {
        self.profiles.len()
    }
}

#[async_trait]
impl UserStore for InMemoryStore {
    async fn insert_user(&self, user: &User) -> Result<(), StoreError> {
        match self.emails.entry(user.email.clone()) {
            Entry::Occupied(_) => Err(StoreError::Duplicate),
            Entry::Vacant(slot) => {
                self.users.insert(user.id.clone(), user.clone());
                slot.insert(user.id.clone());
                Ok(())
            }
        }
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        let id = match self.emails.get(email) {
            Some(id) => id.value().clone(),
            None => return Ok(None),
        };
        Ok(self.users.get(&id).map(|u| u.value().clone()))
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<User>, StoreError> {
        Ok(self.users.get(id).map(|u| u.value().clone()))
    }

    async fn set_refresh_token(&self, id: &str, grant: &RefreshGrant) -> Result<bool, StoreError> {
        match self.users.get_mut(id) {
            Some(mut user) => {
                user.set_refresh_grant(grant);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn clear_refresh_token(&self, id: &str) -> Result<(), StoreError> {
        if let Some(mut user) = self.users.get_mut(id) {
            user.clear_refresh_grant();
        }
        Ok(())
    }

    async fn health_check(&self) -> Result<(), StoreError> {
        Ok(())
    }
}

#[async_trait]
impl CareerProfileStore for InMemoryStore {
    async fn insert_profile(&self, profile: &CareerProfile) -> Result<(), StoreError> {
        match self.profiles.entry(profile.id.clone()) {
            Entry::Occupied(_) => Err(StoreError::Duplicate),
            Entry::Vacant(slot) => {
                slot.insert(profile.clone());
                Ok(())
            }
        }
    }

    async fn list_profiles(&self, user: &str) -> Result<Vec<ProfileSummary>, StoreError> {
        let mut owned: Vec<ProfileSummary> = self
            .profiles
            .iter()
            .filter(|p| p.user == user)
            .map(|p| p.summary())
            .collect();
        owned.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(owned)
    }

    async fn find_profile(
        &self,
        id: &str,
        user: &str,
    ) -> Result<Option<CareerProfile>, StoreError> {
        Ok(self
            .profiles
            .get(id)
            .filter(|p| p.user == user)
            .map(|p| p.value().clone()))
    }

    async fn replace_profile(&self, profile: &CareerProfile) -> Result<bool, StoreError> {
        match self.profiles.get_mut(&profile.id) {
            Some(mut stored) if stored.user == profile.user => {
                *stored = profile.clone();
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn delete_profile(&self, id: &str, user: &str) -> Result<bool, StoreError> {
        Ok(self.profiles.remove_if(id, |_, p| p.user == user).is_some())
    }
}
