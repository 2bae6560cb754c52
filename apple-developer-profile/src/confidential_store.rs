// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Confidential storage of developer profile archives.
//!
//! Developer profile archives contain private keys. They are kept in a
//! keyed confidential store that protects them at rest. How the protection
//! works is up to the [ConfidentialStore] implementation.

use {
    crate::error::DeveloperProfileError,
    std::{
        collections::HashMap,
        sync::{Arc, RwLock},
    },
    zeroize::Zeroizing,
};

/// A keyed store of secret binary blobs.
///
/// Each key holds at most one blob. Storing replaces the whole value and
/// readers never observe a partially written blob. Implementations must not
/// reveal blob content through any other channel, including logs and errors.
pub trait ConfidentialStore: Send + Sync {
    /// Store `data` under `key`, replacing any existing value.
    fn store(&self, key: &str, data: &[u8]) -> Result<(), DeveloperProfileError>;

    /// Load the most recently stored value for `key`.
    fn load(&self, key: &str) -> Result<Option<Zeroizing<Vec<u8>>>, DeveloperProfileError>;
}

/// A [ConfidentialStore] holding blobs in process memory.
///
/// Blobs are wiped when replaced or dropped.
#[derive(Default)]
pub struct InMemoryConfidentialStore {
    blobs: RwLock<HashMap<String, Arc<Zeroizing<Vec<u8>>>>>,
}

impl std::fmt::Debug for InMemoryConfidentialStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InMemoryConfidentialStore")
            .finish_non_exhaustive()
    }
}

impl InMemoryConfidentialStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ConfidentialStore for InMemoryConfidentialStore {
    fn store(&self, key: &str, data: &[u8]) -> Result<(), DeveloperProfileError> {
        let blob = Arc::new(Zeroizing::new(data.to_vec()));

        self.blobs
            .write()
            .map_err(|_| DeveloperProfileError::ConfidentialStore("lock poisoned".into()))?
            .insert(key.to_string(), blob);

        Ok(())
    }

    fn load(&self, key: &str) -> Result<Option<Zeroizing<Vec<u8>>>, DeveloperProfileError> {
        let blob = self
            .blobs
            .read()
            .map_err(|_| DeveloperProfileError::ConfidentialStore("lock poisoned".into()))?
            .get(key)
            .cloned();

        Ok(blob.map(|blob| Zeroizing::new(blob.as_slice().to_vec())))
    }
}

/// A single named secret within a [ConfidentialStore].
///
/// The key name is formed from a namespace identifying the kind of secret
/// and an identifier of the owning object, so unrelated kinds of secrets
/// sharing a store never collide.
#[derive(Clone)]
pub struct ConfidentialKey {
    name: String,
    store: Arc<dyn ConfidentialStore>,
}

impl std::fmt::Debug for ConfidentialKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConfidentialKey")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

impl ConfidentialKey {
    pub fn new(store: Arc<dyn ConfidentialStore>, namespace: &str, id: &str) -> Self {
        Self {
            name: Self::key_name(namespace, id),
            store,
        }
    }

    /// Obtain the store key name for an object in a namespace.
    pub fn key_name(namespace: &str, id: &str) -> String {
        format!("{}.{}", namespace, id)
    }

    /// The full name of this key within the store.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn store(&self, data: &[u8]) -> Result<(), DeveloperProfileError> {
        self.store.store(&self.name, data)
    }

    pub fn load(&self) -> Result<Option<Zeroizing<Vec<u8>>>, DeveloperProfileError> {
        self.store.load(&self.name)
    }
}
