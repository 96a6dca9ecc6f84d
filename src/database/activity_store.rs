use std::sync::Arc;

use tokio::sync::RwLock;

use crate::models::ActivityDirectory;

/// In-memory activity directory shared by all handlers.
///
/// Cloning is cheap and every clone sees the same directory. Mutations go
/// through [`ActivityStore::update`], which holds the write lock for the
/// whole check-then-mutate closure.
#[derive(Debug, Clone, Default)]
pub struct ActivityStore {
    inner: Arc<RwLock<ActivityDirectory>>,
}

impl ActivityStore {
    pub fn new(directory: ActivityDirectory) -> Self {
        Self {
            inner: Arc::new(RwLock::new(directory)),
        }
    }

    pub async fn snapshot(&self) -> ActivityDirectory {
        self.inner.read().await.clone()
    }

    pub async fn participants(&self, activity_name: &str) -> Option<Vec<String>> {
        self.inner
            .read()
            .await
            .get(activity_name)
            .map(|a| a.participants.clone())
    }

    pub async fn update<T>(&self, f: impl FnOnce(&mut ActivityDirectory) -> T) -> T {
        let mut guard = self.inner.write().await;
        f(&mut guard)
    }
}
