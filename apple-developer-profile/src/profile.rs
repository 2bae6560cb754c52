// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Apple developer profiles.

use {
    crate::{
        archive::{ArchiveCertificate, ArchiveCertificateExtractor},
        confidential_store::{ConfidentialKey, ConfidentialStore},
        error::DeveloperProfileError,
        passphrase::Passphrase,
        settings::ExtractionSettings,
        subject::display_name,
    },
    log::info,
    std::sync::Arc,
    x509_certificate::CapturedX509Certificate,
    zeroize::Zeroizing,
};

/// Namespace of developer profile archives within a [ConfidentialStore].
pub const CONFIDENTIAL_KEY_NAMESPACE: &str = "apple-developer-profile.DeveloperProfile";

/// Obtain the confidential store key holding the archive of a profile.
pub fn key_for(id: &str) -> String {
    ConfidentialKey::key_name(CONFIDENTIAL_KEY_NAMESPACE, id)
}

/// Apple developer profile.
///
/// A developer profile consists of any number of PKCS#12 keystores holding
/// a code signing certificate and its private key, plus mobile provisioning
/// profiles, all delivered as a single zip archive.
///
/// The archive lives in a [ConfidentialStore]. The profile itself only
/// remembers the identifier under which it is stored. Certificates are
/// decoded from the stored archive every time they are requested, so they
/// always reflect the current archive.
#[derive(Clone, Debug)]
pub struct DeveloperProfile {
    id: String,
    description: String,
    passphrase: Passphrase,
    key: ConfidentialKey,
    extractor: ArchiveCertificateExtractor,
}

impl DeveloperProfile {
    /// Display name of this kind of credential.
    pub const TYPE_DISPLAY_NAME: &'static str = "Apple Developer Profile";

    /// Construct a developer profile.
    ///
    /// A random identifier is generated if `id` is not given. If `image` holds
    /// a non-empty archive, it is stored under the profile's key, replacing
    /// any archive stored previously. Otherwise the stored archive is left
    /// alone.
    pub fn new(
        store: Arc<dyn ConfidentialStore>,
        id: Option<&str>,
        description: impl ToString,
        passphrase: Passphrase,
        image: Option<&[u8]>,
    ) -> Result<Self, DeveloperProfileError> {
        let mut builder = DeveloperProfileBuilder::new(passphrase).description(description);

        if let Some(id) = id {
            builder = builder.id(id);
        }
        if let Some(image) = image {
            builder = builder.image(image);
        }

        builder.build(store)
    }

    /// Random generated unique ID that identifies this profile among others.
    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    /// Password of the PKCS#12 keystores inside the profile.
    pub fn passphrase(&self) -> &Passphrase {
        &self.passphrase
    }

    /// The name of the confidential store key holding the archive.
    pub fn key_name(&self) -> &str {
        self.key.name()
    }

    /// Retrieve the stored archive.
    pub fn image(&self) -> Result<Option<Zeroizing<Vec<u8>>>, DeveloperProfileError> {
        self.key.load()
    }

    fn require_image(&self) -> Result<Zeroizing<Vec<u8>>, DeveloperProfileError> {
        self.image()?.ok_or_else(|| DeveloperProfileError::BlobNotFound {
            id: self.id.clone(),
        })
    }

    /// Obtain the X.509 certificates in this developer profile.
    pub fn certificates(&self) -> Result<Vec<CapturedX509Certificate>, DeveloperProfileError> {
        let image = self.require_image()?;

        self.extractor.extract(&image, &self.passphrase)
    }

    /// Obtain the X.509 certificates in this profile along with where they came from.
    pub fn archive_certificates(&self) -> Result<Vec<ArchiveCertificate>, DeveloperProfileError> {
        let image = self.require_image()?;

        self.extractor.extract_entries(&image, &self.passphrase)
    }

    /// Obtain a human readable name for a certificate.
    pub fn display_name_of(&self, cert: &CapturedX509Certificate) -> String {
        display_name(cert)
    }
}

/// Constructs [DeveloperProfile] instances.
pub struct DeveloperProfileBuilder<'a> {
    id: Option<String>,
    description: String,
    passphrase: Passphrase,
    image: Option<&'a [u8]>,
    settings: ExtractionSettings,
}

impl<'a> DeveloperProfileBuilder<'a> {
    pub fn new(passphrase: Passphrase) -> Self {
        Self {
            id: None,
            description: String::new(),
            passphrase,
            image: None,
            settings: ExtractionSettings::default(),
        }
    }

    /// Use an existing identifier instead of generating one.
    ///
    /// A blank identifier is treated as absent.
    #[must_use]
    pub fn id(mut self, id: impl ToString) -> Self {
        let id = id.to_string();
        self.id = if id.trim().is_empty() { None } else { Some(id) };
        self
    }

    #[must_use]
    pub fn description(mut self, description: impl ToString) -> Self {
        self.description = description.to_string();
        self
    }

    /// Archive data uploaded for this profile.
    #[must_use]
    pub fn image(mut self, data: &'a [u8]) -> Self {
        self.image = Some(data);
        self
    }

    #[must_use]
    pub fn settings(mut self, settings: ExtractionSettings) -> Self {
        self.settings = settings;
        self
    }

    /// Construct the profile, storing the uploaded archive if there is one.
    pub fn build(
        self,
        store: Arc<dyn ConfidentialStore>,
    ) -> Result<DeveloperProfile, DeveloperProfileError> {
        let id = self
            .id
            .unwrap_or_else(|| uuid::Uuid::new_v4().to_string());

        let key = ConfidentialKey::new(store, CONFIDENTIAL_KEY_NAMESPACE, &id);

        match self.image {
            Some(data) if !data.is_empty() => {
                info!("storing archive for developer profile {}", id);
                key.store(data)?;
            }
            _ => {}
        }

        Ok(DeveloperProfile {
            id,
            description: self.description,
            passphrase: self.passphrase,
            key,
            extractor: ArchiveCertificateExtractor::new(self.settings),
        })
    }
}
