//! Named secret storage.
//!
//! The access gate only needs to get, set and delete one named value, so it
//! talks to this trait instead of the filesystem. `FileSecretStore` keeps each
//! secret in its own dot-file under a root directory; `MemorySecretStore`
//! keeps them in a map.

use crate::errors::{AppResult, AuthError};
use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::debug;

/// Get/set/delete access to named secrets.
pub trait SecretStore {
    /// Returns the secret, or `None` if it has never been set or was deleted.
    fn get(&self, name: &str) -> AppResult<Option<String>>;

    /// Stores the secret, replacing any previous value.
    fn set(&self, name: &str, value: &str) -> AppResult<()>;

    /// Removes the secret. Removing a missing secret is not an error.
    fn delete(&self, name: &str) -> AppResult<()>;
}

/// Secrets stored as `<root>/.<name>` files.
///
/// Each file holds the secret text and nothing else. It is rewritten in full
/// on every set and removed on delete.
#[derive(Debug, Clone)]
pub struct FileSecretStore {
    root: PathBuf,
}

impl FileSecretStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Path of the file backing `name`.
    pub fn path_for(&self, name: &str) -> PathBuf {
        self.root.join(format!(".{}", name))
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn ensure_root(&self) -> io::Result<()> {
        if self.root.exists() {
            return Ok(());
        }
        fs::create_dir_all(&self.root)?;
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(
                &self.root,
                fs::Permissions::from_mode(crate::constants::DEFAULT_DIR_PERMISSIONS),
            )?;
        }
        Ok(())
    }
}

fn store_error(path: PathBuf, source: io::Error) -> AuthError {
    AuthError::SecretStore { path, source }
}

impl SecretStore for FileSecretStore {
    fn get(&self, name: &str) -> AppResult<Option<String>> {
        let path = self.path_for(name);
        match fs::read_to_string(&path) {
            Ok(value) => {
                let value = value.trim().to_string();
                if value.is_empty() {
                    Ok(None)
                } else {
                    Ok(Some(value))
                }
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(store_error(path, e).into()),
        }
    }

    fn set(&self, name: &str, value: &str) -> AppResult<()> {
        let path = self.path_for(name);
        self.ensure_root()
            .map_err(|e| store_error(self.root.clone(), e))?;
        fs::write(&path, value).map_err(|e| store_error(path.clone(), e))?;
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(
                &path,
                fs::Permissions::from_mode(crate::constants::DEFAULT_FILE_PERMISSIONS),
            )
            .map_err(|e| store_error(path.clone(), e))?;
        }
        debug!("Stored secret '{}'", name);
        Ok(())
    }

    fn delete(&self, name: &str) -> AppResult<()> {
        let path = self.path_for(name);
        match fs::remove_file(&path) {
            Ok(()) => {
                debug!("Removed secret '{}'", name);
                Ok(())
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(store_error(path, e).into()),
        }
    }
}

/// In-memory secrets, for tests and throwaway sessions.
#[derive(Debug, Default)]
pub struct MemorySecretStore {
    values: Mutex<HashMap<String, String>>,
}

impl MemorySecretStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SecretStore for MemorySecretStore {
    fn get(&self, name: &str) -> AppResult<Option<String>> {
        let values = self.values.lock().unwrap_or_else(|e| e.into_inner());
        Ok(values.get(name).cloned())
    }

    fn set(&self, name: &str, value: &str) -> AppResult<()> {
        let mut values = self.values.lock().unwrap_or_else(|e| e.into_inner());
        values.insert(name.to_string(), value.to_string());
        Ok(())
    }

    fn delete(&self, name: &str) -> AppResult<()> {
        let mut values = self.values.lock().unwrap_or_else(|e| e.into_inner());
        values.remove(name);
        Ok(())
    }
}
