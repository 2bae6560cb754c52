// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Certificate extraction from developer profile archives.
//!
//! A developer profile is uploaded as a zip file holding any number of
//! PKCS#12 keystores plus other material such as mobile provisioning
//! profiles. Only the keystores are of interest here.

use {
    crate::{
        error::DeveloperProfileError, keystore::parse_pfx_certificates, passphrase::Passphrase,
        settings::ExtractionSettings,
    },
    log::{debug, info},
    std::{
        io::{Cursor, Read},
        ops::Deref,
    },
    x509_certificate::CapturedX509Certificate,
    zip::result::ZipError,
};

/// An X.509 certificate found inside a developer profile archive.
#[derive(Clone, Debug)]
pub struct ArchiveCertificate {
    /// Name of the archive entry holding the keystore the certificate came from.
    pub entry_name: String,

    /// Alias of the certificate within its keystore, if it has one.
    pub friendly_name: Option<String>,

    pub certificate: CapturedX509Certificate,
}

impl Deref for ArchiveCertificate {
    type Target = CapturedX509Certificate;

    fn deref(&self) -> &Self::Target {
        &self.certificate
    }
}

impl From<ArchiveCertificate> for CapturedX509Certificate {
    fn from(v: ArchiveCertificate) -> Self {
        v.certificate
    }
}

/// Extracts X.509 certificates from keystores within a zip archive.
///
/// Extraction is all or nothing: if any keystore entry cannot be opened, the
/// whole operation fails and no certificates are returned.
#[derive(Clone, Debug, Default)]
pub struct ArchiveCertificateExtractor {
    settings: ExtractionSettings,
}

impl ArchiveCertificateExtractor {
    pub fn new(settings: ExtractionSettings) -> Self {
        Self { settings }
    }

    pub fn settings(&self) -> &ExtractionSettings {
        &self.settings
    }

    /// Obtain the X.509 certificates of keystore entries within zip archive data.
    ///
    /// Certificates are returned in archive entry order, then in the order
    /// they occur within each keystore.
    pub fn extract(
        &self,
        data: &[u8],
        passphrase: &Passphrase,
    ) -> Result<Vec<CapturedX509Certificate>, DeveloperProfileError> {
        Ok(self
            .extract_entries(data, passphrase)?
            .into_iter()
            .map(CapturedX509Certificate::from)
            .collect())
    }

    /// Like [Self::extract] but retains the provenance of each certificate.
    pub fn extract_entries(
        &self,
        data: &[u8],
        passphrase: &Passphrase,
    ) -> Result<Vec<ArchiveCertificate>, DeveloperProfileError> {
        if let Some(limit) = self.settings.max_archive_size() {
            if data.len() > limit {
                return Err(DeveloperProfileError::ArchiveTooLarge {
                    size: data.len(),
                    limit,
                });
            }
        }

        let mut archive = zip::ZipArchive::new(Cursor::new(data))?;

        let mut res = vec![];

        for index in 0..archive.len() {
            let mut file = archive.by_index(index)?;

            if file.is_dir() || !self.settings.is_keystore_entry(file.name()) {
                continue;
            }

            let entry_name = file.name().to_string();
            debug!("decoding keystore {}", entry_name);

            // The declared size comes from the archive itself and is only a hint.
            let declared_size = file.size();
            let mut keystore =
                Vec::with_capacity(declared_size.min(data.len() as u64) as usize);
            (&mut file)
                .take(declared_size.saturating_add(1))
                .read_to_end(&mut keystore)
                .map_err(ZipError::from)?;

            if keystore.len() as u64 != declared_size {
                return Err(DeveloperProfileError::ArchiveFormat(ZipError::InvalidArchive(
                    "entry size does not match its declared size",
                )));
            }

            let certs = parse_pfx_certificates(&keystore, passphrase.plain_text()).map_err(
                |source| DeveloperProfileError::KeystoreDecode {
                    entry: entry_name.clone(),
                    source,
                },
            )?;

            debug!("found {} certificates in {}", certs.len(), entry_name);

            res.extend(certs.into_iter().map(|c| ArchiveCertificate {
                entry_name: entry_name.clone(),
                friendly_name: c.friendly_name,
                certificate: c.certificate,
            }));
        }

        info!("extracted {} certificates from archive", res.len());

        Ok(res)
    }
}
