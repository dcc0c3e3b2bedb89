use std::collections::HashMap;
use std::path::PathBuf;

use tokio::sync::RwLock;

use crate::{error::AppResult, models::Profile};

/// Persistence for user profiles
///
/// Stores are keyed by the profile's normalized username. Callers normalize
/// before calling in; stores do not second-guess the key.
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait ProfileStore: Send + Sync {
    /// Loads a profile, returning `None` when the user has none yet
    async fn load(&self, username: &str) -> AppResult<Option<Profile>>;

    /// Creates or overwrites the stored profile
    async fn save(&self, profile: &Profile) -> AppResult<()>;

    /// Store name for logging
    fn name(&self) -> &'static str;
}

/// One pretty-printed JSON document per user under a directory
pub struct JsonFileStore {
    dir: PathBuf,
}

impl JsonFileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn path_for(&self, username: &str) -> PathBuf {
        self.dir.join(format!("{}.json", username))
    }
}

#[async_trait::async_trait]
impl ProfileStore for JsonFileStore {
    async fn load(&self, username: &str) -> AppResult<Option<Profile>> {
        let path = self.path_for(username);
        let raw = match tokio::fs::read_to_string(&path).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        let profile: Profile = serde_json::from_str(&raw)?;
        tracing::debug!(
            username = %username,
            ratings = profile.ratings.len(),
            path = %path.display(),
            "Profile loaded"
        );
        Ok(Some(profile))
    }

    async fn save(&self, profile: &Profile) -> AppResult<()> {
        tokio::fs::create_dir_all(&self.dir).await?;

        let path = self.path_for(&profile.username);
        let body = serde_json::to_string_pretty(profile)?;
        tokio::fs::write(&path, body).await?;

        tracing::info!(
            username = %profile.username,
            ratings = profile.ratings.len(),
            path = %path.display(),
            "Profile saved"
        );
        Ok(())
    }

    fn name(&self) -> &'static str {
        "json-file"
    }
}

/// Process-local store; profiles are lost on restart
#[derive(Default)]
pub struct InMemoryStore {
    profiles: RwLock<HashMap<String, Profile>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait::async_trait]
impl ProfileStore for InMemoryStore {
    async fn load(&self, username: &str) -> AppResult<Option<Profile>> {
        Ok(self.profiles.read().await.get(username).cloned())
    }

    async fn save(&self, profile: &Profile) -> AppResult<()> {
        self.profiles
            .write()
            .await
            .insert(profile.username.clone(), profile.clone());
        Ok(())
    }

    fn name(&self) -> &'static str {
        "in-memory"
    }
}
