use super::*;

impl EguiController {
    pub(super) fn attach_key_store(&mut self, store: ApiKeyStore) {
        if self.settings.ui.remember_api_key {
            match store.load() {
                Ok(Some(key)) => {
                    self.ui.api_key = key;
                    tracing::info!("Restored remembered API key");
                }
                Ok(None) => {}
                Err(err) => tracing::warn!("Failed to load remembered API key: {err}"),
            }
        }
        self.key_store = Some(store);
    }

    /// Toggle "Remember key", persisting the preference to `config.toml`.
    pub fn set_remember_api_key(&mut self, remember: bool) {
        self.ui.remember_api_key = remember;
        if self.settings.ui.remember_api_key == remember {
            return;
        }
        self.settings.ui.remember_api_key = remember;
        if let Err(err) = config::save(&self.settings) {
            tracing::warn!("Failed to save config: {err}");
            self.set_status(format!("Failed to save settings: {err}"), StatusTone::Warning);
        }
        if remember {
            self.remember_api_key_if_enabled();
        } else if let Some(store) = &self.key_store {
            store.clear();
            self.set_status("Remembered API key removed", StatusTone::Info);
        }
    }

    pub(super) fn remember_api_key_if_enabled(&mut self) {
        if !self.settings.ui.remember_api_key || self.ui.api_key.trim().is_empty() {
            return;
        }
        let Some(store) = &self.key_store else {
            return;
        };
        if let Err(err) = store.save(&self.ui.api_key) {
            tracing::warn!("Failed to remember API key: {err}");
            self.set_status(format!("Could not remember API key: {err}"), StatusTone::Warning);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app_dirs::ConfigBaseGuard;
    use crate::planner::{GenerationError, PlanPrompt};
    use tempfile::tempdir;

    struct Offline;

    impl PlanService for Offline {
        fn generate(
            &self,
            _prompt: &PlanPrompt,
            _api_key: &str,
        ) -> Result<String, GenerationError> {
            Err(GenerationError::Transport("offline".into()))
        }
    }

    #[test]
    fn remembered_key_survives_a_restart() {
        let dir = tempdir().unwrap();
        let _guard = ConfigBaseGuard::set(dir.path().to_path_buf());
        let secrets = dir.path().join("secrets");

        let mut settings = AppSettings::default();
        settings.storage.data_dir = Some(dir.path().join("data"));
        let mut first = EguiController::new(settings.clone(), Arc::new(Offline)).unwrap();
        first.attach_key_store(ApiKeyStore::file_only(&secrets));
        first.ui.api_key = "gsk_remembered".into();
        first.set_remember_api_key(true);

        let saved = config::load_or_default().unwrap();
        assert!(saved.ui.remember_api_key);

        let mut second = EguiController::new(saved, Arc::new(Offline)).unwrap();
        second.attach_key_store(ApiKeyStore::file_only(&secrets));
        assert_eq!(second.ui.api_key, "gsk_remembered");
        assert!(second.ui.remember_api_key);

        second.set_remember_api_key(false);
        assert_eq!(ApiKeyStore::file_only(&secrets).load().unwrap(), None);
    }

    #[test]
    fn key_is_not_stored_without_opt_in() {
        let dir = tempdir().unwrap();
        let secrets = dir.path().join("secrets");
        let mut settings = AppSettings::default();
        settings.storage.data_dir = Some(dir.path().join("data"));
        let mut controller = EguiController::new(settings, Arc::new(Offline)).unwrap();
        controller.attach_key_store(ApiKeyStore::file_only(&secrets));
        controller.ui.api_key = "gsk_secret".into();
        controller.remember_api_key_if_enabled();
        assert_eq!(ApiKeyStore::file_only(&secrets).load().unwrap(), None);
    }
}
