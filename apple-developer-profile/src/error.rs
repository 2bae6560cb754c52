// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use {thiserror::Error, x509_certificate::X509CertificateError};

/// Unified error type for developer profile operations.
#[derive(Debug, Error)]
pub enum DeveloperProfileError {
    #[error("developer profile archive is not a valid zip container: {0}")]
    ArchiveFormat(#[from] zip::result::ZipError),

    #[error("developer profile archive is {size} bytes; exceeds limit of {limit} bytes")]
    ArchiveTooLarge { size: usize, limit: usize },

    #[error("unable to open keystore {entry}: {source}")]
    KeystoreDecode {
        entry: String,
        #[source]
        source: KeystoreError,
    },

    #[error("no archive has been stored for developer profile {id}")]
    BlobNotFound { id: String },

    #[error("confidential store error: {0}")]
    ConfidentialStore(String),
}

/// Errors encountered when opening a single PKCS#12 keystore.
#[derive(Debug, Error)]
pub enum KeystoreError {
    #[error("error parsing PFX data: {0}")]
    Malformed(String),

    #[error("incorrect password given when decrypting PFX data")]
    BadPassword,

    #[error("unsupported PFX content: {0}")]
    Unsupported(String),

    #[error("X.509 certificate handler error: {0}")]
    Certificate(#[from] X509CertificateError),
}

impl DeveloperProfileError {
    /// Whether this error was caused by a keystore rejecting the passphrase.
    pub fn is_bad_password(&self) -> bool {
        matches!(
            self,
            Self::KeystoreDecode {
                source: KeystoreError::BadPassword,
                ..
            }
        )
    }
}
