// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! PKCS#12 (PFX) keystore decoding.
//!
//! Developer profiles carry the code signing identity as PFX data, commonly
//! encountered in `.p12` files created by exporting certificates from Apple's
//! `Keychain Access` application. We only care about the certificates of the
//! entries in these keystores. Private keys are left encrypted.

use {
    crate::error::KeystoreError,
    log::debug,
    x509_certificate::CapturedX509Certificate,
};

/// An X.509 certificate held in a PFX keystore.
#[derive(Clone, Debug)]
pub struct PfxCertificate {
    /// The `friendlyName` attribute of the certificate bag.
    ///
    /// This is the alias under which keystore tooling presents the entry.
    pub friendly_name: Option<String>,

    /// The decoded certificate.
    pub certificate: CapturedX509Certificate,
}

pub(crate) fn bmp_string(s: &str) -> Vec<u8> {
    let utf16: Vec<u16> = s.encode_utf16().collect();

    let mut bytes = Vec::with_capacity(utf16.len() * 2 + 2);
    for c in utf16 {
        bytes.push((c / 256) as u8);
        bytes.push((c % 256) as u8);
    }
    bytes.push(0x00);
    bytes.push(0x00);

    bytes
}

fn friendly_name(attributes: &[p12::PKCS12Attribute]) -> Option<String> {
    attributes.iter().find_map(|attr| match attr {
        p12::PKCS12Attribute::FriendlyName(name) => Some(name.clone()),
        _ => None,
    })
}

fn local_key_id(attributes: &[p12::PKCS12Attribute]) -> Option<&[u8]> {
    attributes.iter().find_map(|attr| match attr {
        p12::PKCS12Attribute::LocalKeyId(id) => Some(id.as_slice()),
        _ => None,
    })
}

/// OID of the attribute marking a certificate bag as a trusted certificate entry.
///
/// 2.16.840.1.113894.746875.1.1. This is how Java keystore tooling records
/// certificates imported without a private key.
const OID_TRUSTED_KEY_USAGE: &[u64] = &[2, 16, 840, 1, 113894, 746875, 1, 1];

fn is_trusted_certificate(attributes: &[p12::PKCS12Attribute]) -> bool {
    attributes.iter().any(|attr| match attr {
        p12::PKCS12Attribute::Other(other) => {
            other.oid.components().as_slice() == OID_TRUSTED_KEY_USAGE
        }
        _ => false,
    })
}

/// Parse PFX data and obtain the X.509 certificates of its entries.
///
/// The integrity MAC is verified with `password` before anything else is
/// looked at, so a wrong password is reported as [KeystoreError::BadPassword]
/// rather than as garbage data. If no password was provided to create the
/// PFX data, the password may be the empty string.
///
/// An entry is either a private key plus the certificate bag sharing its
/// `localKeyId`, or a certificate bag flagged as a trusted certificate. Other
/// certificate bags, such as the CA chain stored alongside a signing
/// identity, are not entries of their own and are not returned. Certificate
/// bags holding non-X.509 (SDSI) certificates are skipped.
pub fn parse_pfx_certificates(
    data: &[u8],
    password: &str,
) -> Result<Vec<PfxCertificate>, KeystoreError> {
    let pfx = p12::PFX::parse(data).map_err(|e| {
        KeystoreError::Malformed(format!("data does not appear to be PFX: {:?}", e))
    })?;

    if !pfx.verify_mac(password) {
        return Err(KeystoreError::BadPassword);
    }

    let data = match pfx.auth_safe {
        p12::ContentInfo::Data(data) => data,
        _ => {
            return Err(KeystoreError::Unsupported(
                "authenticated safe is not plain data".to_string(),
            ));
        }
    };

    let content_infos = yasna::parse_der(&data, |reader| {
        reader.collect_sequence_of(p12::ContentInfo::parse)
    })
    .map_err(|e| KeystoreError::Malformed(format!("failed parsing inner ContentInfo: {:?}", e)))?;

    let bmp_password = bmp_string(password);

    let mut bags = vec![];

    for content in content_infos {
        let bags_data = match content {
            p12::ContentInfo::Data(inner) => inner,
            p12::ContentInfo::EncryptedData(encrypted) => {
                encrypted.data(&bmp_password).ok_or_else(|| {
                    KeystoreError::Malformed("failed decrypting inner EncryptedData".to_string())
                })?
            }
            p12::ContentInfo::OtherContext(_) => {
                return Err(KeystoreError::Unsupported(
                    "unexpected OtherContent content in inner PFX data".to_string(),
                ));
            }
        };

        bags.extend(
            yasna::parse_ber(&bags_data, |reader| {
                reader.collect_sequence_of(p12::SafeBag::parse)
            })
            .map_err(|e| {
                KeystoreError::Malformed(format!(
                    "failed parsing SafeBag within inner Data: {:?}",
                    e
                ))
            })?,
        );
    }

    // Key bags may follow the certificate bags they belong to.
    let key_ids = bags
        .iter()
        .filter(|bag| matches!(bag.bag, p12::SafeBagKind::Pkcs8ShroudedKeyBag(_)))
        .filter_map(|bag| local_key_id(&bag.attributes))
        .collect::<Vec<_>>();

    let mut certificates = vec![];

    for bag in &bags {
        match &bag.bag {
            p12::SafeBagKind::CertBag(p12::CertBag::X509(cert_data)) => {
                let has_key = local_key_id(&bag.attributes)
                    .map(|id| key_ids.contains(&id))
                    .unwrap_or(false);

                if !has_key && !is_trusted_certificate(&bag.attributes) {
                    debug!("skipping certificate bag not associated with a keystore entry");
                    continue;
                }

                certificates.push(PfxCertificate {
                    friendly_name: friendly_name(&bag.attributes),
                    certificate: CapturedX509Certificate::from_der(cert_data.clone())?,
                });
            }
            p12::SafeBagKind::CertBag(p12::CertBag::SDSI(_)) => {
                debug!("skipping non-X.509 certificate bag");
            }
            p12::SafeBagKind::Pkcs8ShroudedKeyBag(_) | p12::SafeBagKind::OtherBagKind(_) => {}
        }
    }

    Ok(certificates)
}
