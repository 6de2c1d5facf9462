//! Keyed single-flight cache for computed classifications.
//!
//! Classification needs several upstream fetches, so repeated requests for
//! the same summoner must share one computation. Keys are normalized
//! summoner names.

use std::{collections::HashMap, future::Future, sync::Arc};

use tokio::sync::{Mutex, OnceCell};

use super::Classification;
use crate::error::AppError;

#[derive(Debug, Default)]
pub struct ClassificationCache {
    entries: Mutex<HashMap<String, Arc<OnceCell<Arc<Classification>>>>>,
}

impl ClassificationCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Runs `compute` at most once per key; concurrent callers for the same
    /// key await the same flight. A failed computation stores nothing, so no
    /// partial classification ever survives an aborted run.
    pub async fn get_or_compute<F, Fut>(
        &self,
        key: &str,
        compute: F,
    ) -> Result<Arc<Classification>, AppError>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<Classification, AppError>>,
    {
        let cell = {
            let mut entries = self.entries.lock().await;
            entries.entry(key.to_string()).or_default().clone()
        };

        cell.get_or_try_init(|| async { compute().await.map(Arc::new) })
            .await
            .cloned()
    }

    /// Drops a cached classification so the next request recomputes it.
    pub async fn invalidate(&self, key: &str) {
        self.entries.lock().await.remove(key);
    }
}
