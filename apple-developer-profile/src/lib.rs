// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Apple developer profile management.
//!
//! An Apple developer profile bundles one or more PKCS#12 (`.p12`)
//! keystores (each a code signing certificate plus its private key) and
//! mobile provisioning profiles into a single zip archive. This crate
//! stores such archives in a confidential store and inspects the X.509
//! certificates within them, e.g. to let people pick a signing identity.
//!
//! # Features and Capabilities
//!
//! This crate can:
//!
//! * Store and retrieve profile archives through a keyed confidential store.
//!   (See [ConfidentialStore] and [InMemoryConfidentialStore].)
//! * Find PKCS#12 keystores in a zip archive and extract the X.509
//!   certificate of every keystore entry using a passphrase. (See
//!   [ArchiveCertificateExtractor].)
//! * Decode a single PFX keystore. (See [parse_pfx_certificates].)
//! * Derive human readable names from certificate subjects. (See
//!   [display_name].)
//! * Tie all of the above together. (See [DeveloperProfile].)
//!
//! How stored archives are protected at rest is up to the [ConfidentialStore]
//! implementation. The in-memory store provided here performs no encryption.
//!
//! Extraction is all or nothing: a keystore that can't be opened with the
//! passphrase fails the whole operation rather than yielding a partial
//! certificate list.

mod archive;
pub use archive::*;
mod confidential_store;
pub use confidential_store::*;
mod error;
pub use error::*;
mod keystore;
pub use keystore::*;
mod passphrase;
pub use passphrase::*;
mod profile;
pub use profile::*;
mod settings;
pub use settings::*;
mod subject;
pub use subject::*;

#[cfg(test)]
mod testutil;
