//! Durable token persistence
//!
//! The bearer token is the only durable client-side value. The file
//! store is the native analogue of the browser's single local-storage
//! key: presence of the file is the sole input to session restoration.

use std::fs;
use std::io;
use std::path::PathBuf;
use std::sync::Mutex;

use crate::error::Result;

/// Storage for the persisted bearer token
pub trait TokenStore: Send + Sync {
    /// Load the persisted token, if any
    fn load(&self) -> Result<Option<String>>;
    /// Persist the token, replacing any previous value
    fn save(&self, token: &str) -> Result<()>;
    /// Remove the persisted token; a no-op when none exists
    fn clear(&self) -> Result<()>;
}

/// File-backed token store
pub struct FsTokenStore {
    path: PathBuf,
}

impl FsTokenStore {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }
}

impl TokenStore for FsTokenStore {
    fn load(&self) -> Result<Option<String>> {
        match fs::read_to_string(&self.path) {
            Ok(contents) => {
                let token = contents.trim();
                if token.is_empty() {
                    Ok(None)
                } else {
                    Ok(Some(token.to_string()))
                }
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn save(&self, token: &str) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.path, token)?;
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

/// In-memory token store for tests
#[derive(Default)]
pub struct MemoryTokenStore {
    token: Mutex<Option<String>>,
}

impl MemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_token(token: &str) -> Self {
        Self {
            token: Mutex::new(Some(token.to_string())),
        }
    }
}

impl TokenStore for MemoryTokenStore {
    fn load(&self) -> Result<Option<String>> {
        Ok(self.token.lock().expect("token lock poisoned").clone())
    }

    fn save(&self, token: &str) -> Result<()> {
        *self.token.lock().expect("token lock poisoned") = Some(token.to_string());
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        self.token.lock().expect("token lock poisoned").take();
        Ok(())
    }
}
