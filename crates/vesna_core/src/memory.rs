//! Conversation memory collaborator contract.
//!
//! The persistent store is an external collaborator — only its interface is
//! owned here. `InMemoryStore` is the bounded in-process implementation used
//! by the CLI and tests.

use crate::emotion::EmotionTag;
use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use tokio::sync::Mutex;

/// One persisted exchange. Read-only for the engine: it appends turns but
/// never rewrites history.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversationTurn {
    pub user_text: String,
    pub assistant_text: String,
    pub emotion: EmotionTag,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UserProfile {
    pub name: Option<String>,
    pub gender: Option<String>,
}

#[async_trait]
pub trait MemoryStore: Send + Sync {
    async fn recent_turns(&self, limit: usize) -> anyhow::Result<Vec<ConversationTurn>>;

    /// Elapsed time since the most recent turn; `None` for a fresh store.
    async fn time_since_last_turn(&self, now: DateTime<Utc>) -> anyhow::Result<Option<Duration>>;

    async fn user_profile(&self) -> anyhow::Result<UserProfile>;

    async fn append_turn(
        &self,
        user_text: &str,
        assistant_text: &str,
        emotion: EmotionTag,
        now: DateTime<Utc>,
    ) -> anyhow::Result<()>;
}

/// Bounded in-process store.
pub struct InMemoryStore {
    turns: Mutex<VecDeque<ConversationTurn>>,
    profile: UserProfile,
    capacity: usize,
}

impl InMemoryStore {
    pub fn new(profile: UserProfile) -> Self {
        Self {
            turns: Mutex::new(VecDeque::new()),
            profile,
            capacity: 200,
        }
    }
}

#[async_trait]
impl MemoryStore for InMemoryStore {
    async fn recent_turns(&self, limit: usize) -> anyhow::Result<Vec<ConversationTurn>> {
        let turns = self.turns.lock().await;
        Ok(turns.iter().rev().take(limit).rev().cloned().collect())
    }

    async fn time_since_last_turn(&self, now: DateTime<Utc>) -> anyhow::Result<Option<Duration>> {
        let turns = self.turns.lock().await;
        Ok(turns.back().map(|t| now - t.timestamp))
    }

    async fn user_profile(&self) -> anyhow::Result<UserProfile> {
        Ok(self.profile.clone())
    }

    async fn append_turn(
        &self,
        user_text: &str,
        assistant_text: &str,
        emotion: EmotionTag,
        now: DateTime<Utc>,
    ) -> anyhow::Result<()> {
        let mut turns = self.turns.lock().await;
        if turns.len() >= self.capacity {
            turns.pop_front();
        }
        turns.push_back(ConversationTurn {
            user_text: user_text.to_string(),
            assistant_text: assistant_text.to_string(),
            emotion,
            timestamp: now,
        });
        Ok(())
    }
}
