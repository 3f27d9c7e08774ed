//! Persistence for bot configuration and analysis history
//!
//! Everything goes through the key-value contract below; the stores on top
//! own the record formats. Writes are last-write-wins with no concurrency
//! control.

pub mod file;
pub mod mock;

pub use file::FileKvStore;
pub use mock::MockKvStore;

use crate::models::{AnalysisResult, BotConfig, BotRole, HistoryItem, DEFAULT_TEMPERATURE};
use crate::prompts;
use crate::{Error, Result};
use async_trait::async_trait;
use std::sync::Arc;

const BOT_CONFIG_KEY: &str = "bot_config";
const HISTORY_KEY: &str = "history";

#[async_trait]
pub trait KvStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<String>>;
    async fn set(&self, key: &str, value: &str) -> Result<()>;
    async fn remove(&self, key: &str) -> Result<()>;
}

/// Resolves effective generation parameters for a bot role, merging a
/// persisted user override on top of the built-in default.
#[derive(Clone)]
pub struct BotConfigStore {
    kv: Arc<dyn KvStore>,
}

impl BotConfigStore {
    pub fn new(kv: Arc<dyn KvStore>) -> Self {
        Self { kv }
    }

    /// Built-in parameters used when no override is persisted.
    pub fn default_config(role: BotRole) -> BotConfig {
        let system_prompt = match role {
            BotRole::Outreach => prompts::OUTREACH_SYSTEM,
            BotRole::Interview => prompts::INTERVIEW_SYSTEM,
        };
        BotConfig {
            role,
            system_prompt: system_prompt.to_string(),
            temperature: DEFAULT_TEMPERATURE,
        }
    }

    /// Effective configuration for `role`. Absence of an override is
    /// expected and yields the built-in default; only storage failures
    /// propagate. The returned value is a snapshot; mutating it changes
    /// nothing until an explicit `persist`.
    pub async fn resolve(&self, role: BotRole) -> Result<BotConfig> {
        let configs = self.load_all().await?;
        Ok(configs
            .into_iter()
            .find(|config| config.role == role)
            .unwrap_or_else(|| Self::default_config(role)))
    }

    /// Replace the record for `config.role` in full. Last write wins.
    pub async fn persist(&self, config: &BotConfig) -> Result<()> {
        let mut configs = self.load_all().await?;
        match configs.iter_mut().find(|c| c.role == config.role) {
            Some(existing) => *existing = config.clone(),
            None => configs.push(config.clone()),
        }
        self.kv
            .set(BOT_CONFIG_KEY, &serde_json::to_string(&configs)?)
            .await
    }

    async fn load_all(&self) -> Result<Vec<BotConfig>> {
        match self.kv.get(BOT_CONFIG_KEY).await? {
            Some(json) => serde_json::from_str(&json)
                .map_err(|e| Error::Storage(format!("corrupt bot config record: {}", e))),
            None => Ok(Vec::new()),
        }
    }
}

/// Records completed analyses for the history view, newest first.
#[derive(Clone)]
pub struct HistoryStore {
    kv: Arc<dyn KvStore>,
}

impl HistoryStore {
    pub fn new(kv: Arc<dyn KvStore>) -> Self {
        Self { kv }
    }

    pub async fn save(
        &self,
        user_id: &str,
        job_description: &str,
        result: AnalysisResult,
    ) -> Result<HistoryItem> {
        let item = HistoryItem::new(
            user_id,
            result.job_title_detected.clone(),
            job_description,
            result,
        );

        let mut items = self.load_all().await?;
        items.insert(0, item.clone());
        self.kv
            .set(HISTORY_KEY, &serde_json::to_string(&items)?)
            .await?;
        Ok(item)
    }

    pub async fn for_user(&self, user_id: &str) -> Result<Vec<HistoryItem>> {
        Ok(self
            .load_all()
            .await?
            .into_iter()
            .filter(|item| item.user_id == user_id)
            .collect())
    }

    pub async fn delete(&self, id: &str) -> Result<()> {
        let mut items = self.load_all().await?;
        items.retain(|item| item.id != id);
        self.kv
            .set(HISTORY_KEY, &serde_json::to_string(&items)?)
            .await
    }

    async fn load_all(&self) -> Result<Vec<HistoryItem>> {
        match self.kv.get(HISTORY_KEY).await? {
            Some(json) => serde_json::from_str(&json)
                .map_err(|e| Error::Storage(format!("corrupt history record: {}", e))),
            None => Ok(Vec::new()),
        }
    }
}
