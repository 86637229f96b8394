//! Explicit backend selection by platform.

use crate::backend::AccountBackend;
use crate::config::FilesConfig;
use crate::error::{CoreError, CoreResult};
use crate::files::FilesBackend;
use crate::platform::Platform;
use std::collections::HashMap;
use std::sync::Arc;

/// Maps platforms to backend implementations.
///
/// A registry is an ordinary value the caller constructs and passes where
/// needed — there is no process-wide selection state, so tests register
/// substitutes without touching anything shared.
#[derive(Default)]
pub struct BackendRegistry {
    backends: HashMap<Platform, Arc<dyn AccountBackend>>,
}

impl BackendRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a registry with the flat-file backend registered for the
    /// current platform, using the default `/etc` layout.
    #[must_use]
    pub fn native() -> Self {
        let mut registry = Self::new();
        registry.register(
            Platform::current(),
            Arc::new(FilesBackend::new(FilesConfig::default())),
        );
        registry
    }

    /// Registers a backend for a platform, replacing any existing one.
    pub fn register(&mut self, platform: Platform, backend: Arc<dyn AccountBackend>) {
        self.backends.insert(platform, backend);
    }

    /// Removes a platform's backend.
    pub fn unregister(&mut self, platform: Platform) {
        self.backends.remove(&platform);
    }

    /// Returns the backend for a platform.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::Unsupported`] when no backend is registered
    /// for `platform`.
    pub fn backend_for(&self, platform: Platform) -> CoreResult<Arc<dyn AccountBackend>> {
        self.backends
            .get(&platform)
            .cloned()
            .ok_or_else(|| CoreError::unsupported("platform support", platform))
    }

    /// Returns the backend for the platform this process runs on.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::Unsupported`] when the current platform has
    /// no registered backend.
    pub fn current(&self) -> CoreResult<Arc<dyn AccountBackend>> {
        self.backend_for(Platform::current())
    }

    /// Lists the registered platforms.
    #[must_use]
    pub fn platforms(&self) -> Vec<Platform> {
        self.backends.keys().copied().collect()
    }
}

impl std::fmt::Debug for BackendRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BackendRegistry")
            .field("platforms", &self.platforms())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn empty_registry_rejects_lookup() {
        let registry = BackendRegistry::new();
        let err = registry.backend_for(Platform::Linux).unwrap_err();
        assert!(matches!(
            err,
            CoreError::Unsupported {
                operation: "platform support",
                platform: Platform::Linux,
            }
        ));
    }

    #[test]
    fn register_and_resolve() {
        let dir = tempdir().unwrap();
        let mut registry = BackendRegistry::new();
        registry.register(
            Platform::Linux,
            Arc::new(FilesBackend::new(FilesConfig::in_dir(dir.path()))),
        );

        let backend = registry.backend_for(Platform::Linux).unwrap();
        assert!(backend.capabilities().locking);
        assert_eq!(registry.platforms(), vec![Platform::Linux]);
    }

    #[test]
    fn unregister_removes() {
        let dir = tempdir().unwrap();
        let mut registry = BackendRegistry::new();
        registry.register(
            Platform::Linux,
            Arc::new(FilesBackend::new(FilesConfig::in_dir(dir.path()))),
        );
        registry.unregister(Platform::Linux);
        assert!(registry.backend_for(Platform::Linux).is_err());
    }

    #[test]
    fn substitution_replaces_in_place() {
        let dir_a = tempdir().unwrap();
        let dir_b = tempdir().unwrap();
        std::fs::write(dir_b.path().join("passwd"), "subbed:x:1:1::/:/bin/sh\n").unwrap();

        let mut registry = BackendRegistry::new();
        registry.register(
            Platform::Linux,
            Arc::new(FilesBackend::new(FilesConfig::in_dir(dir_a.path()))),
        );
        registry.register(
            Platform::Linux,
            Arc::new(FilesBackend::new(FilesConfig::in_dir(dir_b.path()))),
        );

        let users = registry
            .backend_for(Platform::Linux)
            .unwrap()
            .users()
            .unwrap();
        assert_eq!(users[0].name, "subbed");
    }

    #[test]
    fn native_registers_current_platform() {
        let registry = BackendRegistry::native();
        assert!(registry.current().is_ok());
    }
}
