// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Certificate extraction settings.

/// File name suffix identifying PKCS#12 keystores within a profile archive.
pub const DEFAULT_KEYSTORE_EXTENSION: &str = ".p12";

/// Settings influencing how certificates are extracted from profile archives.
///
/// Instances are constructed with [Default] and then customized via the
/// `set_*` functions.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ExtractionSettings {
    keystore_extension: String,
    max_archive_size: Option<usize>,
}

impl Default for ExtractionSettings {
    fn default() -> Self {
        Self {
            keystore_extension: DEFAULT_KEYSTORE_EXTENSION.to_string(),
            max_archive_size: None,
        }
    }
}

impl ExtractionSettings {
    /// The file name suffix of archive entries decoded as keystores.
    ///
    /// Matching is case-sensitive.
    pub fn keystore_extension(&self) -> &str {
        &self.keystore_extension
    }

    /// Set the file name suffix of archive entries decoded as keystores.
    pub fn set_keystore_extension(&mut self, extension: impl ToString) {
        self.keystore_extension = extension.to_string();
    }

    /// The maximum size in bytes of an archive we are willing to decode.
    pub fn max_archive_size(&self) -> Option<usize> {
        self.max_archive_size
    }

    /// Bound the size of archives we decode.
    ///
    /// Archives larger than this are rejected before any parsing occurs.
    /// `None` removes the bound.
    pub fn set_max_archive_size(&mut self, size: Option<usize>) {
        self.max_archive_size = size;
    }

    /// Whether an archive entry name denotes a keystore.
    pub fn is_keystore_entry(&self, name: &str) -> bool {
        name.ends_with(&self.keystore_extension)
    }
}
