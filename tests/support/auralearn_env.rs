use std::{
    path::PathBuf,
    sync::{Mutex, OnceLock},
};

const CONFIG_HOME_ENV: &str = "AURALEARN_CONFIG_HOME";
const DISABLE_KEYRING_ENV: &str = "AURALEARN_DISABLE_KEYRING";

static ENV_LOCK: OnceLock<Mutex<()>> = OnceLock::new();

/// Points the app root at a temp dir and keeps the OS keyring out of tests.
pub struct AuralearnEnvGuard {
    previous: Vec<(&'static str, Option<String>)>,
    _lock: std::sync::MutexGuard<'static, ()>,
}

impl AuralearnEnvGuard {
    pub fn set_config_home(path: PathBuf) -> Self {
        let lock = ENV_LOCK
            .get_or_init(|| Mutex::new(()))
            .lock()
            .unwrap_or_else(|err| err.into_inner());
        let previous = [CONFIG_HOME_ENV, DISABLE_KEYRING_ENV]
            .into_iter()
            .map(|name| (name, std::env::var(name).ok()))
            .collect();
        // SAFETY: tests run under a global lock to prevent concurrent env mutations.
        unsafe {
            std::env::set_var(CONFIG_HOME_ENV, path);
            std::env::set_var(DISABLE_KEYRING_ENV, "1");
        }
        Self {
            previous,
            _lock: lock,
        }
    }
}

impl Drop for AuralearnEnvGuard {
    fn drop(&mut self) {
        for (name, value) in self.previous.drain(..) {
            // SAFETY: tests run under a global lock to prevent concurrent env mutations.
            unsafe {
                match value {
                    Some(value) => std::env::set_var(name, value),
                    None => std::env::remove_var(name),
                }
            }
        }
    }
}
