//! Bearer token persistence

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::error::{ClientError, ClientResult};

/// Where the session token lives between requests and restarts.
///
/// The display name of the logged-in user is kept alongside it and goes
/// away with it on `clear`.
#[async_trait]
pub trait TokenStore: Send + Sync {
    async fn load(&self) -> ClientResult<Option<String>>;
    async fn save(&self, token: &str) -> ClientResult<()>;
    async fn load_user(&self) -> ClientResult<Option<String>>;
    async fn save_user(&self, name: &str) -> ClientResult<()>;
    async fn clear(&self) -> ClientResult<()>;
}

/// Token kept in a single file, the server-side stand-in for browser local storage.
/// The user name goes to a sibling file with a `.user` suffix.
pub struct FileTokenStore {
    path: PathBuf,
}

impl FileTokenStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn user_path(&self) -> PathBuf {
        let mut name = self.path.file_name().map(|n| n.to_os_string()).unwrap_or_default();
        name.push(".user");
        self.path.with_file_name(name)
    }
}

async fn read_value(path: &Path) -> ClientResult<Option<String>> {
    match tokio::fs::read_to_string(path).await {
        Ok(content) => {
            let value = content.trim();
            Ok((!value.is_empty()).then(|| value.to_string()))
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(ClientError::TokenStore(format!("cannot read {}: {}", path.display(), e))),
    }
}

async fn write_value(path: &Path, value: &str) -> ClientResult<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent).await.map_err(|e| {
            ClientError::TokenStore(format!("cannot create {}: {}", parent.display(), e))
        })?;
    }
    tokio::fs::write(path, value)
        .await
        .map_err(|e| ClientError::TokenStore(format!("cannot write {}: {}", path.display(), e)))
}

async fn remove_value(path: &Path) -> ClientResult<()> {
    match tokio::fs::remove_file(path).await {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(ClientError::TokenStore(format!("cannot remove {}: {}", path.display(), e))),
    }
}

#[async_trait]
impl TokenStore for FileTokenStore {
    async fn load(&self) -> ClientResult<Option<String>> {
        read_value(&self.path).await
    }

    async fn save(&self, token: &str) -> ClientResult<()> {
        write_value(&self.path, token).await
    }

    async fn load_user(&self) -> ClientResult<Option<String>> {
        read_value(&self.user_path()).await
    }

    async fn save_user(&self, name: &str) -> ClientResult<()> {
        write_value(&self.user_path(), name).await
    }

    async fn clear(&self) -> ClientResult<()> {
        remove_value(&self.path).await?;
        remove_value(&self.user_path()).await
    }
}

/// In-memory token store
#[derive(Default)]
pub struct MemoryTokenStore {
    token: RwLock<Option<String>>,
    user: RwLock<Option<String>>,
}

impl MemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_token(token: &str) -> Self {
        Self {
            token: RwLock::new(Some(token.to_string())),
            ..Self::default()
        }
    }

    pub fn with_user(self, name: &str) -> Self {
        Self {
            user: RwLock::new(Some(name.to_string())),
            ..self
        }
    }
}

#[async_trait]
impl TokenStore for MemoryTokenStore {
    async fn load(&self) -> ClientResult<Option<String>> {
        Ok(self.token.read().await.clone())
    }

    async fn save(&self, token: &str) -> ClientResult<()> {
        *self.token.write().await = Some(token.to_string());
        Ok(())
    }

    async fn load_user(&self) -> ClientResult<Option<String>> {
        Ok(self.user.read().await.clone())
    }

    async fn save_user(&self, name: &str) -> ClientResult<()> {
        let name = name.trim();
        *self.user.write().await = (!name.is_empty()).then(|| name.to_string());
        Ok(())
    }

    async fn clear(&self) -> ClientResult<()> {
        *self.token.write().await = None;
        *self.user.write().await = None;
        Ok(())
    }
}
