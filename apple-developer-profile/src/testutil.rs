// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use {
    crate::keystore::bmp_string,
    std::io::{Cursor, Write},
    x509_certificate::{CapturedX509Certificate, KeyAlgorithm, X509CertificateBuilder},
};

/// Create a self-signed certificate with the given common name.
///
/// Returns the certificate and the PKCS#8 DER of its private key.
pub fn self_signed_certificate(common_name: &str) -> (CapturedX509Certificate, Vec<u8>) {
    let mut builder = X509CertificateBuilder::new(KeyAlgorithm::Ed25519);
    builder
        .subject()
        .append_common_name_utf8_string(common_name)
        .unwrap();
    builder
        .subject()
        .append_organization_utf8_string("Example Corp")
        .unwrap();
    builder.validity_duration(chrono::Duration::hours(1));

    let (cert, _, document) = builder.create_with_random_keypair().unwrap();

    (cert, document.as_ref().to_vec())
}

/// Create a self-signed certificate whose subject has no common name.
pub fn organization_certificate() -> CapturedX509Certificate {
    let mut builder = X509CertificateBuilder::new(KeyAlgorithm::Ed25519);
    builder
        .subject()
        .append_organization_utf8_string("Example Corp")
        .unwrap();
    builder
        .subject()
        .append_country_utf8_string("US")
        .unwrap();
    builder.validity_duration(chrono::Duration::hours(1));

    builder.create_with_random_keypair().unwrap().0
}

/// Produce PFX data holding a certificate, its key and an optional CA certificate.
pub fn pfx_data(
    cert: &CapturedX509Certificate,
    key: &[u8],
    ca: Option<&CapturedX509Certificate>,
    password: &str,
    name: &str,
) -> Vec<u8> {
    p12::PFX::new(
        cert.constructed_data(),
        key,
        ca.map(|ca| ca.constructed_data()),
        password,
        name,
    )
    .unwrap()
    .to_der()
}

/// Produce PFX data for a fresh self-signed certificate.
pub fn pfx_for_common_name(common_name: &str, password: &str) -> Vec<u8> {
    let (cert, key) = self_signed_certificate(common_name);

    pfx_data(&cert, &key, None, password, common_name)
}

/// Obtain the decrypted safe bags of PFX data as [pfx_data] produces it.
pub fn pfx_bags(
    cert: &CapturedX509Certificate,
    key: &[u8],
    ca: Option<&CapturedX509Certificate>,
    password: &str,
    name: &str,
) -> Vec<p12::SafeBag> {
    p12::PFX::parse(&pfx_data(cert, key, ca, password, name))
        .unwrap()
        .bags(password)
        .unwrap()
}

/// Produce PFX data holding the given safe bags in a single unencrypted safe.
pub fn pfx_from_bags(bags: &[p12::SafeBag], password: &str) -> Vec<u8> {
    let safe = yasna::construct_der(|w| {
        w.write_sequence_of(|w| {
            for bag in bags {
                bag.write(w.next());
            }
        })
    });

    let contents = yasna::construct_der(|w| {
        w.write_sequence_of(|w| {
            p12::ContentInfo::Data(safe).write(w.next());
        })
    });

    let mac_data = p12::MacData::new(&contents, &bmp_string(password));

    p12::PFX {
        version: 3,
        auth_safe: p12::ContentInfo::Data(contents),
        mac_data: Some(mac_data),
    }
    .to_der()
}

/// A certificate bag flagged as a trusted certificate entry.
pub fn trusted_certificate_bag(cert: &CapturedX509Certificate, name: &str) -> p12::SafeBag {
    // anyExtendedKeyUsage
    let usage = yasna::construct_der(|w| {
        w.write_oid(&yasna::models::ObjectIdentifier::from_slice(&[
            2, 5, 29, 37, 0,
        ]))
    });

    p12::SafeBag {
        bag: p12::SafeBagKind::CertBag(p12::CertBag::X509(cert.constructed_data().to_vec())),
        attributes: vec![
            p12::PKCS12Attribute::FriendlyName(name.to_string()),
            p12::PKCS12Attribute::Other(p12::OtherAttribute {
                oid: yasna::models::ObjectIdentifier::from_slice(&[
                    2, 16, 840, 1, 113894, 746875, 1, 1,
                ]),
                data: vec![usage],
            }),
        ],
    }
}

/// Produce zip file data from `(name, content)` pairs, in order.
pub fn zip_archive(entries: &[(&str, &[u8])]) -> Vec<u8> {
    let mut zf = zip::ZipWriter::new(Cursor::new(vec![]));

    for (name, data) in entries {
        zf.start_file(*name, zip::write::FileOptions::default())
            .unwrap();
        zf.write_all(data).unwrap();
    }

    zf.finish().unwrap().into_inner()
}

/// Produce a zip archive with a single empty stored entry that claims to be
/// `declared_size` bytes once extracted.
pub fn zip_archive_with_declared_size(name: &str, declared_size: u64) -> Vec<u8> {
    let name = name.as_bytes();
    let mut res = vec![];

    // Local file header. Sizes and CRC32 of an empty entry are all 0.
    res.extend_from_slice(&0x04034b50u32.to_le_bytes());
    res.extend_from_slice(&45u16.to_le_bytes());
    res.extend_from_slice(&0u16.to_le_bytes());
    res.extend_from_slice(&0u16.to_le_bytes());
    res.extend_from_slice(&0u16.to_le_bytes());
    res.extend_from_slice(&0x21u16.to_le_bytes());
    res.extend_from_slice(&0u32.to_le_bytes());
    res.extend_from_slice(&0u32.to_le_bytes());
    res.extend_from_slice(&0u32.to_le_bytes());
    res.extend_from_slice(&(name.len() as u16).to_le_bytes());
    res.extend_from_slice(&0u16.to_le_bytes());
    res.extend_from_slice(name);

    let central_start = res.len();

    // Central directory header with the uncompressed size in a zip64 extra field.
    res.extend_from_slice(&0x02014b50u32.to_le_bytes());
    res.extend_from_slice(&45u16.to_le_bytes());
    res.extend_from_slice(&45u16.to_le_bytes());
    res.extend_from_slice(&0u16.to_le_bytes());
    res.extend_from_slice(&0u16.to_le_bytes());
    res.extend_from_slice(&0u16.to_le_bytes());
    res.extend_from_slice(&0x21u16.to_le_bytes());
    res.extend_from_slice(&0u32.to_le_bytes());
    res.extend_from_slice(&0u32.to_le_bytes());
    res.extend_from_slice(&0xffffffffu32.to_le_bytes());
    res.extend_from_slice(&(name.len() as u16).to_le_bytes());
    res.extend_from_slice(&12u16.to_le_bytes());
    res.extend_from_slice(&0u16.to_le_bytes());
    res.extend_from_slice(&0u16.to_le_bytes());
    res.extend_from_slice(&0u16.to_le_bytes());
    res.extend_from_slice(&0u32.to_le_bytes());
    res.extend_from_slice(&0u32.to_le_bytes());
    res.extend_from_slice(name);
    res.extend_from_slice(&0x0001u16.to_le_bytes());
    res.extend_from_slice(&8u16.to_le_bytes());
    res.extend_from_slice(&declared_size.to_le_bytes());

    let central_size = res.len() - central_start;

    // End of central directory record.
    res.extend_from_slice(&0x06054b50u32.to_le_bytes());
    res.extend_from_slice(&0u16.to_le_bytes());
    res.extend_from_slice(&0u16.to_le_bytes());
    res.extend_from_slice(&1u16.to_le_bytes());
    res.extend_from_slice(&1u16.to_le_bytes());
    res.extend_from_slice(&(central_size as u32).to_le_bytes());
    res.extend_from_slice(&(central_start as u32).to_le_bytes());
    res.extend_from_slice(&0u16.to_le_bytes());

    res
}

/// Corrupt the CRC32 recorded for every entry in a zip archive's central directory.
pub fn corrupt_zip_crc(data: &mut [u8]) {
    let mut offset = 0;
    while offset + 20 <= data.len() {
        if data[offset..offset + 4] == [0x50, 0x4b, 0x01, 0x02] {
            data[offset + 16] ^= 0xff;
        }
        offset += 1;
    }
}
