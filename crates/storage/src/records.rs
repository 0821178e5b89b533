//! Named records persisted through a [`KeyValueStore`].
//!
//! Nothing here returns an error to the caller: failures are logged with
//! `tracing::warn!`, reads fall back to absent/empty and writes are dropped.

use std::sync::Arc;

use quiz_core::Clock;
use quiz_core::model::{QuizId, UserData, UserId, UserProgress, upsert_progress};
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::repository::{KeyValueStore, Storage};

/// Active-session pointer, stored as the raw user id.
pub const CURRENT_USER_KEY: &str = "currentUser";
/// Flat progress list that predates per-user records.
pub const LEGACY_PROGRESS_KEY: &str = "quiz_progress";
/// Every known user profile.
pub const USER_DATA_KEY: &str = "quiz_user_data";

/// Typed access to the app's named records.
#[derive(Clone)]
pub struct LocalStore {
    kv: Arc<dyn KeyValueStore>,
    clock: Clock,
}

impl LocalStore {
    #[must_use]
    pub fn new(storage: &Storage, clock: Clock) -> Self {
        Self {
            kv: Arc::clone(&storage.kv),
            clock,
        }
    }

    #[must_use]
    pub fn clock(&self) -> &Clock {
        &self.clock
    }

    //
    // ─── CURRENT USER ──────────────────────────────────────────────────────────
    //

    pub async fn set_current_user(&self, user: &UserId) {
        if let Err(err) = self.kv.set(CURRENT_USER_KEY, user.as_str()).await {
            tracing::warn!(key = CURRENT_USER_KEY, %err, "failed to store current user");
        }
    }

    pub async fn current_user(&self) -> Option<UserId> {
        let raw = match self.kv.get(CURRENT_USER_KEY).await {
            Ok(raw) => raw?,
            Err(err) => {
                tracing::warn!(key = CURRENT_USER_KEY, %err, "failed to read current user");
                return None;
            }
        };
        match UserId::new(raw) {
            Ok(user) => Some(user),
            Err(err) => {
                tracing::warn!(key = CURRENT_USER_KEY, %err, "ignoring stored current user");
                None
            }
        }
    }

    pub async fn clear_current_user(&self) {
        if let Err(err) = self.kv.remove(CURRENT_USER_KEY).await {
            tracing::warn!(key = CURRENT_USER_KEY, %err, "failed to clear current user");
        }
    }

    //
    // ─── USER DATA ─────────────────────────────────────────────────────────────
    //

    pub async fn all_user_data(&self) -> Vec<UserData> {
        self.read_json(USER_DATA_KEY).await.unwrap_or_default()
    }

    pub async fn user_data(&self, user: &UserId) -> Option<UserData> {
        self.all_user_data()
            .await
            .into_iter()
            .find(|data| data.user_id() == user)
    }

    /// Insert or replace the record for `data.user_id()`.
    ///
    /// Replacing an existing record stamps `last_login_at` with the store
    /// clock; a first insert keeps the supplied value.
    pub async fn save_user_data(&self, data: UserData) {
        let mut all = self.all_user_data().await;
        match all.iter_mut().find(|d| d.user_id() == data.user_id()) {
            Some(slot) => {
                let mut data = data;
                data.set_last_login_at(self.clock.now());
                *slot = data;
            }
            None => all.push(data),
        }
        self.write_json(USER_DATA_KEY, &all).await;
    }

    pub async fn user_progress(&self, user: &UserId, quiz_id: QuizId) -> Option<UserProgress> {
        self.user_data(user).await?.progress_for(quiz_id).cloned()
    }

    /// Upsert one progress record inside the user's profile.
    ///
    /// Does nothing when the user has no stored profile. The profile is
    /// rewritten in place so `last_login_at` is left untouched.
    pub async fn save_user_progress(&self, user: &UserId, progress: UserProgress) {
        let mut all = self.all_user_data().await;
        let Some(data) = all.iter_mut().find(|d| d.user_id() == user) else {
            tracing::debug!(user = %user, "no profile for progress write");
            return;
        };
        data.record_progress(progress);
        self.write_json(USER_DATA_KEY, &all).await;
    }

    //
    // ─── LEGACY PROGRESS ───────────────────────────────────────────────────────
    //

    pub async fn progress(&self) -> Vec<UserProgress> {
        self.read_json(LEGACY_PROGRESS_KEY).await.unwrap_or_default()
    }

    pub async fn save_progress(&self, progress: UserProgress) {
        let mut all = self.progress().await;
        upsert_progress(&mut all, progress);
        self.write_json(LEGACY_PROGRESS_KEY, &all).await;
    }

    pub async fn quiz_progress(&self, quiz_id: QuizId) -> Option<UserProgress> {
        self.progress()
            .await
            .into_iter()
            .find(|p| p.quiz_id() == quiz_id)
    }

    pub async fn clear_all_progress(&self) {
        if let Err(err) = self.kv.remove(LEGACY_PROGRESS_KEY).await {
            tracing::warn!(key = LEGACY_PROGRESS_KEY, %err, "failed to clear progress");
        }
    }

    // ─── helpers ───────────────────────────────────────────────────────────────

    async fn read_json<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let raw = match self.kv.get(key).await {
            Ok(raw) => raw?,
            Err(err) => {
                tracing::warn!(key, %err, "failed to read record");
                return None;
            }
        };
        match serde_json::from_str(&raw) {
            Ok(value) => Some(value),
            Err(err) => {
                tracing::warn!(key, %err, "failed to parse record");
                None
            }
        }
    }

    async fn write_json<T: Serialize + ?Sized>(&self, key: &str, value: &T) {
        let raw = match serde_json::to_string(value) {
            Ok(raw) => raw,
            Err(err) => {
                tracing::warn!(key, %err, "failed to encode record");
                return;
            }
        };
        if let Err(err) = self.kv.set(key, &raw).await {
            tracing::warn!(key, %err, "failed to write record");
        }
    }
}
