//! In-memory local repository implementation.
//!
//! This module provides a local implementation of all repository traits
//! suitable for unit testing and local development. All data is stored in memory using HashMap and Vec
//! structures, providing fast, deterministic, and isolated execution.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use serde::Deserialize;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::time::Duration;

use crate::db::repository::*;
use crate::models::{
    ActivityId, ActivityRecord, CustomProgramme, Heatmap, NewActivity, NewCustomProgramme,
    Streamer, StreamerId, UserId,
};

/// In-memory local repository.
///
/// Besides the store traits it exposes seeding helpers and fault injection
/// (`set_healthy`, `inject_failure`, `set_latency`) so service behaviour under
/// store failures and slow stores can be exercised without a database.
///
/// # Example
/// ```
/// use stream_programme::db::repositories::LocalRepository;
/// use stream_programme::db::repository::FollowRepository;
/// use stream_programme::models::{StreamerId, UserId};
///
/// # tokio_test_block_on(async {
/// let repo = LocalRepository::new();
/// repo.add_user(UserId::new("alice"));
/// repo.add_follow(&UserId::new("alice"), StreamerId::new("shroud"));
///
/// let follows = repo.followed_streamers(&UserId::new("alice")).await.unwrap();
/// assert_eq!(follows, vec![StreamerId::new("shroud")]);
/// # });
/// # fn tokio_test_block_on<F: std::future::Future>(f: F) -> F::Output {
/// #     tokio::runtime::Runtime::new().unwrap().block_on(f)
/// # }
/// ```
#[derive(Clone)]
pub struct LocalRepository {
    data: Arc<RwLock<LocalData>>,
}

struct LocalData {
    users: HashSet<UserId>,
    streamers: Vec<Streamer>,
    follows: HashMap<UserId, Vec<StreamerId>>,
    activities: Vec<ActivityRecord>,
    heatmaps: HashMap<StreamerId, Heatmap>,
    custom_programmes: HashMap<String, CustomProgramme>,

    // ID counters
    next_activity_id: i64,

    // Fault injection
    is_healthy: bool,
    latency: Option<Duration>,
    failures: HashSet<(String, String)>,
}

impl Default for LocalData {
    fn default() -> Self {
        Self {
            users: HashSet::new(),
            streamers: Vec::new(),
            follows: HashMap::new(),
            activities: Vec::new(),
            heatmaps: HashMap::new(),
            custom_programmes: HashMap::new(),
            next_activity_id: 1,
            is_healthy: true,
            latency: None,
            failures: HashSet::new(),
        }
    }
}

/// Fixture data for populating a [`LocalRepository`] (e.g. from a JSON file).
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct LocalSeed {
    pub users: Vec<UserId>,
    pub streamers: Vec<Streamer>,
    pub follows: Vec<FollowSeed>,
    pub activities: Vec<NewActivity>,
    pub custom_programmes: Vec<NewCustomProgramme>,
}

/// One follow edge in a [`LocalSeed`].
#[derive(Debug, Clone, Deserialize)]
pub struct FollowSeed {
    pub user_id: UserId,
    pub streamer_id: StreamerId,
}

impl LocalRepository {
    /// Create a new empty local repository.
    pub fn new() -> Self {
        Self {
            data: Arc::new(RwLock::new(LocalData::default())),
        }
    }

    /// Create a repository populated from seed data.
    pub fn from_seed(seed: LocalSeed) -> Self {
        let repo = Self::new();
        repo.apply_seed(seed);
        repo
    }

    /// Load seed data into the repository.
    pub fn apply_seed(&self, seed: LocalSeed) {
        for user in seed.users {
            self.add_user(user);
        }
        for streamer in seed.streamers {
            self.add_streamer(streamer);
        }
        for follow in seed.follows {
            self.add_user(follow.user_id.clone());
            self.add_follow(&follow.user_id, follow.streamer_id);
        }
        for activity in seed.activities {
            self.insert_activity(&activity);
        }
        for programme in seed.custom_programmes {
            self.insert_custom_programme(&programme);
        }
    }

    /// Register a user.
    pub fn add_user(&self, user_id: UserId) {
        self.data.write().users.insert(user_id);
    }

    /// Add or replace a streamer. New streamers are enumerated after existing ones.
    pub fn add_streamer(&self, streamer: Streamer) {
        let mut data = self.data.write();
        match data.streamers.iter_mut().find(|s| s.id == streamer.id) {
            Some(existing) => *existing = streamer,
            None => data.streamers.push(streamer),
        }
    }

    /// Record that `user_id` follows `streamer_id`. The user is registered if needed.
    pub fn add_follow(&self, user_id: &UserId, streamer_id: StreamerId) {
        let mut data = self.data.write();
        data.users.insert(user_id.clone());
        let follows = data.follows.entry(user_id.clone()).or_default();
        if !follows.contains(&streamer_id) {
            follows.push(streamer_id);
        }
    }

    /// Append an activity without health checks or latency.
    pub fn insert_activity(&self, activity: &NewActivity) -> ActivityRecord {
        let mut data = self.data.write();
        let record = ActivityRecord {
            id: ActivityId::new(data.next_activity_id),
            streamer_id: activity.streamer_id.clone(),
            start_time: activity.start_time,
            end_time: activity.end_time,
            platform: activity.platform,
            created_at: activity.created_at,
        };
        data.next_activity_id += 1;
        data.activities.push(record.clone());
        record
    }

    fn insert_custom_programme(&self, programme: &NewCustomProgramme) -> CustomProgramme {
        let stored = CustomProgramme {
            id: uuid::Uuid::new_v4().to_string(),
            user_id: programme.user_id.clone(),
            streamer_ids: programme.streamer_ids.clone(),
            created_at: programme.created_at,
            updated_at: programme.created_at,
        };
        self.data
            .write()
            .custom_programmes
            .insert(stored.id.clone(), stored.clone());
        stored
    }

    /// Set the health status for testing connection failures.
    pub fn set_healthy(&self, healthy: bool) {
        self.data.write().is_healthy = healthy;
    }

    /// Delay every store call by `latency` (for cancellation/timeout tests).
    pub fn set_latency(&self, latency: Option<Duration>) {
        self.data.write().latency = latency;
    }

    /// Make `operation` fail for one key (a streamer or user ID).
    ///
    /// `operation` is the trait method name, e.g. `"follower_count"`.
    pub fn inject_failure(&self, operation: &str, key: &str) {
        self.data
            .write()
            .failures
            .insert((operation.to_string(), key.to_string()));
    }

    /// Clear all data (fault injection settings are kept).
    pub fn clear(&self) {
        let mut data = self.data.write();
        *data = LocalData {
            is_healthy: data.is_healthy,
            latency: data.latency,
            failures: std::mem::take(&mut data.failures),
            ..Default::default()
        };
    }

    /// Number of stored activity records.
    pub fn activity_count(&self) -> usize {
        self.data.read().activities.len()
    }

    /// Number of stored heatmaps.
    pub fn heatmap_count(&self) -> usize {
        self.data.read().heatmaps.len()
    }

    /// Common prologue for store calls: latency, health, injected failures.
    async fn enter(&self, operation: &str, key: &str) -> RepositoryResult<()> {
        let latency = self.data.read().latency;
        if let Some(latency) = latency {
            tokio::time::sleep(latency).await;
        }

        let data = self.data.read();
        if !data.is_healthy {
            return Err(RepositoryError::connection_with_context(
                "Store is not healthy",
                ErrorContext::new(operation),
            ));
        }
        if data
            .failures
            .contains(&(operation.to_string(), key.to_string()))
        {
            return Err(RepositoryError::QueryError {
                message: "injected failure".to_string(),
                context: ErrorContext::new(operation).with_entity_id(key),
            });
        }
        Ok(())
    }
}

impl Default for LocalRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ActivityRepository for LocalRepository {
    async fn append_activity(&self, activity: &NewActivity) -> RepositoryResult<ActivityRecord> {
        self.enter("append_activity", activity.streamer_id.as_str())
            .await?;
        Ok(self.insert_activity(activity))
    }

    async fn activities_since(
        &self,
        streamer_id: &StreamerId,
        since: DateTime<Utc>,
    ) -> RepositoryResult<Vec<ActivityRecord>> {
        self.enter("activities_since", streamer_id.as_str()).await?;
        let data = self.data.read();
        Ok(data
            .activities
            .iter()
            .filter(|a| &a.streamer_id == streamer_id && a.start_time >= since)
            .cloned()
            .collect())
    }
}

#[async_trait]
impl HeatmapRepository for LocalRepository {
    async fn get_heatmap(&self, streamer_id: &StreamerId) -> RepositoryResult<Option<Heatmap>> {
        self.enter("get_heatmap", streamer_id.as_str()).await?;
        Ok(self.data.read().heatmaps.get(streamer_id).cloned())
    }

    async fn create_heatmap(&self, heatmap: &Heatmap) -> RepositoryResult<()> {
        self.enter("create_heatmap", heatmap.streamer_id.as_str())
            .await?;
        self.data
            .write()
            .heatmaps
            .insert(heatmap.streamer_id.clone(), heatmap.clone());
        Ok(())
    }

    async fn update_heatmap(&self, heatmap: &Heatmap) -> RepositoryResult<()> {
        self.enter("update_heatmap", heatmap.streamer_id.as_str())
            .await?;
        let mut data = self.data.write();
        match data.heatmaps.get_mut(&heatmap.streamer_id) {
            Some(existing) => {
                *existing = heatmap.clone();
                Ok(())
            }
            None => Err(RepositoryError::not_found_with_context(
                format!("Heatmap for streamer {} not found", heatmap.streamer_id),
                ErrorContext::new("update_heatmap")
                    .with_entity("heatmap")
                    .with_entity_id(&heatmap.streamer_id),
            )),
        }
    }
}

#[async_trait]
impl FollowRepository for LocalRepository {
    async fn followed_streamers(&self, user_id: &UserId) -> RepositoryResult<Vec<StreamerId>> {
        self.enter("followed_streamers", user_id.as_str()).await?;
        let data = self.data.read();
        if !data.users.contains(user_id) {
            return Err(RepositoryError::not_found_with_context(
                format!("User {} not found", user_id),
                ErrorContext::new("followed_streamers")
                    .with_entity("user")
                    .with_entity_id(user_id),
            ));
        }
        Ok(data.follows.get(user_id).cloned().unwrap_or_default())
    }

    async fn follower_count(&self, streamer_id: &StreamerId) -> RepositoryResult<u64> {
        self.enter("follower_count", streamer_id.as_str()).await?;
        let data = self.data.read();
        let count = data
            .follows
            .values()
            .filter(|follows| follows.contains(streamer_id))
            .count();
        Ok(count as u64)
    }
}

#[async_trait]
impl StreamerRepository for LocalRepository {
    async fn health_check(&self) -> RepositoryResult<bool> {
        Ok(self.data.read().is_healthy)
    }

    async fn get_streamer(&self, streamer_id: &StreamerId) -> RepositoryResult<Streamer> {
        self.enter("get_streamer", streamer_id.as_str()).await?;
        let data = self.data.read();
        data.streamers
            .iter()
            .find(|s| &s.id == streamer_id)
            .cloned()
            .ok_or_else(|| {
                RepositoryError::not_found_with_context(
                    format!("Streamer {} not found", streamer_id),
                    ErrorContext::new("get_streamer")
                        .with_entity("streamer")
                        .with_entity_id(streamer_id),
                )
            })
    }

    async fn get_streamers(&self, streamer_ids: &[StreamerId]) -> RepositoryResult<Vec<Streamer>> {
        self.enter("get_streamers", "").await?;
        let data = self.data.read();
        Ok(streamer_ids
            .iter()
            .filter_map(|id| data.streamers.iter().find(|s| &s.id == id).cloned())
            .collect())
    }

    async fn list_streamers(&self, limit: Option<usize>) -> RepositoryResult<Vec<Streamer>> {
        self.enter("list_streamers", "").await?;
        let data = self.data.read();
        let take = limit.unwrap_or(data.streamers.len());
        Ok(data.streamers.iter().take(take).cloned().collect())
    }
}

#[async_trait]
impl CustomProgrammeRepository for LocalRepository {
    async fn get_custom_programme(
        &self,
        user_id: &UserId,
    ) -> RepositoryResult<Option<CustomProgramme>> {
        self.enter("get_custom_programme", user_id.as_str()).await?;
        let data = self.data.read();
        Ok(data
            .custom_programmes
            .values()
            .find(|p| p.user_id.as_ref() == Some(user_id))
            .cloned())
    }

    async fn get_custom_programme_by_id(
        &self,
        programme_id: &str,
    ) -> RepositoryResult<Option<CustomProgramme>> {
        self.enter("get_custom_programme_by_id", programme_id)
            .await?;
        Ok(self.data.read().custom_programmes.get(programme_id).cloned())
    }

    async fn create_custom_programme(
        &self,
        programme: &NewCustomProgramme,
    ) -> RepositoryResult<CustomProgramme> {
        let key = programme
            .user_id
            .as_ref()
            .map(|u| u.as_str().to_string())
            .unwrap_or_default();
        self.enter("create_custom_programme", &key).await?;
        Ok(self.insert_custom_programme(programme))
    }

    async fn update_custom_programme(&self, programme: &CustomProgramme) -> RepositoryResult<()> {
        self.enter("update_custom_programme", &programme.id).await?;
        let mut data = self.data.write();
        match data.custom_programmes.get_mut(&programme.id) {
            Some(existing) => {
                *existing = programme.clone();
                Ok(())
            }
            None => Err(RepositoryError::not_found_with_context(
                format!("Custom programme {} not found", programme.id),
                ErrorContext::new("update_custom_programme")
                    .with_entity("custom_programme")
                    .with_entity_id(&programme.id),
            )),
        }
    }

    async fn delete_custom_programme(&self, user_id: &UserId) -> RepositoryResult<bool> {
        self.enter("delete_custom_programme", user_id.as_str())
            .await?;
        let mut data = self.data.write();
        let before = data.custom_programmes.len();
        data.custom_programmes
            .retain(|_, p| p.user_id.as_ref() != Some(user_id));
        Ok(data.custom_programmes.len() != before)
    }
}
