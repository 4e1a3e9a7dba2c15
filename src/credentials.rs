//! Opt-in storage for the text-generation API key.
//!
//! The OS keyring is tried first. When it is unavailable (or disabled with
//! `AURALEARN_DISABLE_KEYRING=1`) the key is sealed with ChaCha20-Poly1305 into
//! `<app root>/secrets`, next to a random per-install file key.

use std::io::Write;
use std::path::{Path, PathBuf};

use chacha20poly1305::aead::{Aead, KeyInit};
use chacha20poly1305::{ChaCha20Poly1305, Nonce};

use crate::app_dirs;

const KEYRING_SERVICE: &str = "auralearn";
const KEYRING_USER: &str = "auralearn_api_key";
const DISABLE_KEYRING_ENV: &str = "AURALEARN_DISABLE_KEYRING";
const SEALED_FILE: &str = "api_key.bin";
const FILE_KEY: &str = "api_key.key";
const NONCE_LEN: usize = 12;
const FILE_KEY_LEN: usize = 32;

#[derive(Debug, thiserror::Error)]
pub enum CredentialStoreError {
    #[error("Credential store unavailable: {0}")]
    Unavailable(String),
    #[error("Credential file error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Credential encryption failed: {0}")]
    Crypto(String),
    #[error("Stored credential is corrupt: {0}")]
    Corrupt(String),
    #[error(transparent)]
    AppDir(#[from] app_dirs::AppDirError),
}

/// Remembers one API key between launches.
#[derive(Clone, Debug)]
pub struct ApiKeyStore {
    secrets_dir: PathBuf,
    use_keyring: bool,
}

impl ApiKeyStore {
    /// Store rooted in the app secrets directory.
    pub fn new() -> Result<Self, CredentialStoreError> {
        Ok(Self {
            secrets_dir: app_dirs::secrets_dir()?,
            use_keyring: !keyring_disabled(),
        })
    }

    /// Store that never touches the OS keyring.
    pub fn file_only(secrets_dir: impl Into<PathBuf>) -> Self {
        Self {
            secrets_dir: secrets_dir.into(),
            use_keyring: false,
        }
    }

    pub fn load(&self) -> Result<Option<String>, CredentialStoreError> {
        if let Some(key) = self.keyring_load() {
            return Ok(Some(key));
        }
        self.file_load()
    }

    /// Save a key; blank input is ignored.
    pub fn save(&self, api_key: &str) -> Result<(), CredentialStoreError> {
        let api_key = api_key.trim();
        if api_key.is_empty() {
            return Ok(());
        }
        match self.keyring_save(api_key) {
            Ok(()) => {
                self.file_clear();
                Ok(())
            }
            Err(err) => {
                tracing::debug!("Keyring save failed, using sealed file: {err}");
                self.file_save(api_key)
            }
        }
    }

    pub fn clear(&self) {
        if let Some(entry) = self.keyring_entry() {
            let _ = entry.delete_credential();
        }
        self.file_clear();
    }

    fn keyring_entry(&self) -> Option<keyring::Entry> {
        if !self.use_keyring {
            return None;
        }
        keyring::Entry::new(KEYRING_SERVICE, KEYRING_USER).ok()
    }

    fn keyring_load(&self) -> Option<String> {
        self.keyring_entry()?.get_password().ok()
    }

    fn keyring_save(&self, api_key: &str) -> Result<(), CredentialStoreError> {
        let entry = self
            .keyring_entry()
            .ok_or_else(|| CredentialStoreError::Unavailable("keyring disabled".into()))?;
        entry
            .set_password(api_key)
            .map_err(|err| CredentialStoreError::Unavailable(err.to_string()))
    }

    fn sealed_path(&self) -> PathBuf {
        self.secrets_dir.join(SEALED_FILE)
    }

    fn file_key_path(&self) -> PathBuf {
        self.secrets_dir.join(FILE_KEY)
    }

    fn file_load(&self) -> Result<Option<String>, CredentialStoreError> {
        let sealed_path = self.sealed_path();
        if !sealed_path.exists() {
            return Ok(None);
        }
        let sealed = std::fs::read(&sealed_path)?;
        if sealed.len() <= NONCE_LEN {
            return Err(CredentialStoreError::Corrupt("sealed file too short".into()));
        }
        let file_key = std::fs::read(self.file_key_path())?;
        let (nonce, ciphertext) = sealed.split_at(NONCE_LEN);
        let plaintext = cipher(&file_key)?
            .decrypt(Nonce::from_slice(nonce), ciphertext)
            .map_err(|err| CredentialStoreError::Crypto(err.to_string()))?;
        String::from_utf8(plaintext)
            .map(Some)
            .map_err(|err| CredentialStoreError::Corrupt(err.to_string()))
    }

    fn file_save(&self, api_key: &str) -> Result<(), CredentialStoreError> {
        std::fs::create_dir_all(&self.secrets_dir)?;
        let key_path = self.file_key_path();
        let file_key = if key_path.exists() {
            std::fs::read(&key_path)?
        } else {
            let fresh = random_bytes(FILE_KEY_LEN)?;
            write_private(&key_path, &fresh)?;
            fresh
        };
        let nonce = random_bytes(NONCE_LEN)?;
        let ciphertext = cipher(&file_key)?
            .encrypt(Nonce::from_slice(&nonce), api_key.as_bytes())
            .map_err(|err| CredentialStoreError::Crypto(err.to_string()))?;
        let mut sealed = nonce;
        sealed.extend_from_slice(&ciphertext);
        write_private(&self.sealed_path(), &sealed)
    }

    fn file_clear(&self) {
        let _ = std::fs::remove_file(self.sealed_path());
        let _ = std::fs::remove_file(self.file_key_path());
    }
}

fn keyring_disabled() -> bool {
    std::env::var(DISABLE_KEYRING_ENV)
        .map(|value| value == "1" || value.eq_ignore_ascii_case("true"))
        .unwrap_or(false)
}

fn cipher(file_key: &[u8]) -> Result<ChaCha20Poly1305, CredentialStoreError> {
    if file_key.len() != FILE_KEY_LEN {
        return Err(CredentialStoreError::Corrupt("file key has wrong length".into()));
    }
    ChaCha20Poly1305::new_from_slice(file_key)
        .map_err(|err| CredentialStoreError::Crypto(err.to_string()))
}

fn random_bytes(len: usize) -> Result<Vec<u8>, CredentialStoreError> {
    use rand::TryRngCore;
    let mut out = vec![0u8; len];
    rand::rngs::OsRng
        .try_fill_bytes(&mut out)
        .map_err(|err| CredentialStoreError::Unavailable(err.to_string()))?;
    Ok(out)
}

fn write_private(path: &Path, bytes: &[u8]) -> Result<(), CredentialStoreError> {
    let mut file = std::fs::OpenOptions::new()
        .create(true)
        .truncate(true)
        .write(true)
        .open(path)?;
    file.write_all(bytes)?;
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let _ = std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o600));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn sealed_file_round_trip() {
        let dir = tempdir().unwrap();
        let store = ApiKeyStore::file_only(dir.path().join("secrets"));
        assert_eq!(store.load().unwrap(), None);
        store.save("  gsk_abcdefghijklmnopqrstuvwxyz  ").unwrap();
        assert_eq!(
            store.load().unwrap().as_deref(),
            Some("gsk_abcdefghijklmnopqrstuvwxyz")
        );
        let sealed = std::fs::read(dir.path().join("secrets").join(SEALED_FILE)).unwrap();
        assert!(!String::from_utf8_lossy(&sealed).contains("gsk_"));
        store.clear();
        assert_eq!(store.load().unwrap(), None);
    }

    #[test]
    fn blank_key_is_not_saved() {
        let dir = tempdir().unwrap();
        let store = ApiKeyStore::file_only(dir.path());
        store.save("   ").unwrap();
        assert!(!dir.path().join(SEALED_FILE).exists());
    }

    #[test]
    fn truncated_file_reports_corruption() {
        let dir = tempdir().unwrap();
        let store = ApiKeyStore::file_only(dir.path());
        store.save("gsk_key").unwrap();
        std::fs::write(dir.path().join(SEALED_FILE), [1u8, 2, 3]).unwrap();
        assert!(matches!(
            store.load(),
            Err(CredentialStoreError::Corrupt(_))
        ));
    }
}
