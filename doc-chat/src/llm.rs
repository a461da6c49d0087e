//! Process-wide memoization of completion calls.
//!
//! Identical `(model, prompt)` pairs reuse the earlier answer instead of
//! calling the platform again. The cache is bounded; when full, the oldest
//! entry is evicted.

use std::collections::HashMap;
use tokio::sync::RwLock;
use tracing::debug;

use crate::error::ChatResult;
use crate::platform::DocPlatform;

/// Default number of cached answers.
pub const DEFAULT_CACHE_ENTRIES: usize = 256;

type CacheKey = (String, String);

struct CachedAnswer {
    answer: String,
    seq: u64,
}

/// Bounded `(model, prompt) -> answer` map shared by all sessions.
pub struct CompletionCache {
    entries: RwLock<Entries>,
    max_entries: usize,
}

#[derive(Default)]
struct Entries {
    map: HashMap<CacheKey, CachedAnswer>,
    next_seq: u64,
}

impl CompletionCache {
    /// `max_entries == 0` disables caching.
    pub fn new(max_entries: usize) -> Self {
        Self {
            entries: RwLock::new(Entries::default()),
            max_entries,
        }
    }

    pub async fn get(&self, model: &str, prompt: &str) -> Option<String> {
        let entries = self.entries.read().await;
        entries
            .map
            .get(&(model.to_string(), prompt.to_string()))
            .map(|c| c.answer.clone())
    }

    pub async fn insert(&self, model: &str, prompt: &str, answer: &str) {
        if self.max_entries == 0 {
            return;
        }
        let mut entries = self.entries.write().await;
        let key = (model.to_string(), prompt.to_string());
        if entries.map.len() >= self.max_entries && !entries.map.contains_key(&key) {
            let oldest = entries
                .map
                .iter()
                .min_by_key(|(_, v)| v.seq)
                .map(|(k, _)| k.clone());
            if let Some(k) = oldest {
                entries.map.remove(&k);
            }
        }
        let seq = entries.next_seq;
        entries.next_seq += 1;
        entries.map.insert(
            key,
            CachedAnswer {
                answer: answer.to_string(),
                seq,
            },
        );
    }

    pub async fn len(&self) -> usize {
        self.entries.read().await.map.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.map.is_empty()
    }

    /// Cached answer or one platform call; failures are not cached.
    ///
    /// # Errors
    /// Propagates the platform's completion error unchanged.
    pub async fn get_or_complete<P: DocPlatform>(
        &self,
        platform: &P,
        model: &str,
        prompt: &str,
    ) -> ChatResult<String> {
        if let Some(hit) = self.get(model, prompt).await {
            debug!(model, "completion cache hit");
            return Ok(hit);
        }
        let answer = platform.complete(model, prompt).await?;
        self.insert(model, prompt, &answer).await;
        Ok(answer)
    }
}

impl Default for CompletionCache {
    fn default() -> Self {
        Self::new(DEFAULT_CACHE_ENTRIES)
    }
}
