//! MongoDB storage for users and career profiles.

use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::{
    bson::doc,
    error::{ErrorKind, WriteFailure},
    options::{FindOptions, IndexOptions},
    Client as MongoClient, Collection, Database, IndexModel,
};
use service_core::error::AppError;

use super::store::{CareerProfileStore, StoreError, UserStore};
use crate::models::{CareerProfile, ProfileSummary, RefreshGrant, User};

const DUPLICATE_KEY_CODE: i32 = 11000;

fn is_duplicate_key(err: &mongodb::error::Error) -> bool {
    matches!(
        err.kind.as_ref(),
        ErrorKind::Write(WriteFailure::WriteError(we)) if we.code == DUPLICATE_KEY_CODE
    )
}

#[derive(Clone)]
pub struct MongoStore {
    client: MongoClient,
    db: Database,
}

impl MongoStore {
    pub async fn connect(uri: &str, database: &str) -> Result<Self, AppError> {
        tracing::info!("Connecting to MongoDB");
        let client = MongoClient::with_uri_str(uri).await.map_err(|e| {
            tracing::error!("Failed to connect to MongoDB: {}", e);
            AppError::DatabaseError(anyhow::anyhow!(e.to_string()))
        })?;
        let db = client.database(database);
        tracing::info!(database = %database, "Successfully connected to MongoDB database");
        Ok(Self { client, db })
    }

    pub async fn initialize_indexes(&self) -> Result<(), AppError> {
        tracing::info!("Creating MongoDB indexes for career-service");

        // Unique index on email
        let email_index = IndexModel::builder()
            .keys(doc! { "email": 1 })
            .options(
                IndexOptions::builder()
                    .name("email_unique_idx".to_string())
                    .unique(true)
                    .build(),
            )
            .build();

        self.users()
            .create_index(email_index, None)
            .await
            .map_err(|e| {
                tracing::error!("Failed to create email index: {}", e);
                AppError::DatabaseError(anyhow::anyhow!(e.to_string()))
            })?;

        // Owner + recency for profile listings
        let owner_index = IndexModel::builder()
            .keys(doc! { "user": 1, "created_at": -1 })
            .options(
                IndexOptions::builder()
                    .name("user_created_at_idx".to_string())
                    .build(),
            )
            .build();

        self.profiles()
            .create_index(owner_index, None)
            .await
            .map_err(|e| {
                tracing::error!("Failed to create profile owner index: {}", e);
                AppError::DatabaseError(anyhow::anyhow!(e.to_string()))
            })?;

        tracing::info!("Successfully created all MongoDB indexes");
        Ok(())
    }

    // Collection accessors

    pub fn users(&self) -> Collection<User> {
        self.db.collection("users")
    }

    pub fn profiles(&self) -> Collection<CareerProfile> {
        self.db.collection("career_profiles")
    }
}

#[async_trait]
impl UserStore for MongoStore {
    async fn insert_user(&self, user: &User) -> Result<(), StoreError> {
        match self.users().insert_one(user, None).await {
            Ok(_) => Ok(()),
            Err(e) if is_duplicate_key(&e) => Err(StoreError::Duplicate),
            Err(e) => {
                tracing::error!("Failed to insert user: {}", e);
                Err(e.into())
            }
        }
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        Ok(self.users().find_one(doc! { "email": email }, None).await?)
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<User>, StoreError> {
        Ok(self.users().find_one(doc! { "_id": id }, None).await?)
    }

    async fn set_refresh_token(&self, id: &str, grant: &RefreshGrant) -> Result<bool, StoreError> {
        let result = self
            .users()
            .update_one(
                doc! { "_id": id },
                doc! {
                    "$set": {
                        "refresh_token": &grant.token,
                        "refresh_token_expiry": grant.expires_at.timestamp_millis()
                    }
                },
                None,
            )
            .await
            .map_err(|e| {
                tracing::error!(user_id = %id, "Failed to store refresh token: {}", e);
                e
            })?;

        Ok(result.matched_count > 0)
    }

    async fn clear_refresh_token(&self, id: &str) -> Result<(), StoreError> {
        self.users()
            .update_one(
                doc! { "_id": id },
                doc! { "$unset": { "refresh_token": "", "refresh_token_expiry": "" } },
                None,
            )
            .await
            .map_err(|e| {
                tracing::error!(user_id = %id, "Failed to clear refresh token: {}", e);
                e
            })?;
        Ok(())
    }

    async fn health_check(&self) -> Result<(), StoreError> {
        self.client
            .database("admin")
            .run_command(doc! { "ping": 1 }, None)
            .await
            .map_err(|e| {
                tracing::error!("MongoDB health check failed: {}", e);
                e
            })?;
        Ok(())
    }
}

#[async_trait]
impl CareerProfileStore for MongoStore {
    async fn insert_profile(&self, profile: &CareerProfile) -> Result<(), StoreError> {
        self.profiles().insert_one(profile, None).await.map_err(|e| {
            tracing::error!("Failed to insert career profile: {}", e);
            e
        })?;
        Ok(())
    }

    async fn list_profiles(&self, user: &str) -> Result<Vec<ProfileSummary>, StoreError> {
        let options = FindOptions::builder()
            .sort(doc! { "created_at": -1 })
            .projection(doc! { "recommendations": 0 })
            .build();

        let cursor = self.profiles().find(doc! { "user": user }, options).await?;
        let profiles: Vec<CareerProfile> = cursor.try_collect().await?;

        Ok(profiles.iter().map(CareerProfile::summary).collect())
    }

    async fn find_profile(
        &self,
        id: &str,
        user: &str,
    ) -> Result<Option<CareerProfile>, StoreError> {
        Ok(self
            .profiles()
            .find_one(doc! { "_id": id, "user": user }, None)
            .await?)
    }

    async fn replace_profile(&self, profile: &CareerProfile) -> Result<bool, StoreError> {
        let result = self
            .profiles()
            .replace_one(
                doc! { "_id": &profile.id, "user": &profile.user },
                profile,
                None,
            )
            .await
            .map_err(|e| {
                tracing::error!(profile_id = %profile.id, "Failed to update career profile: {}", e);
                e
            })?;

        Ok(result.matched_count > 0)
    }

    async fn delete_profile(&self, id: &str, user: &str) -> Result<bool, StoreError> {
        let result = self
            .profiles()
            .delete_one(doc! { "_id": id, "user": user }, None)
            .await?;

        Ok(result.deleted_count > 0)
    }
}
