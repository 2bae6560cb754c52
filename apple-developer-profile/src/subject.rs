// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Human readable names for certificate subjects.
//!
//! Certificates are presented to people by the Common Name (CN) of their
//! subject, e.g. `Apple Development: Joe Developer (ABCDE12345)`. When a
//! subject has no CN, the whole RFC 4514 distinguished name string is shown
//! instead.

use {
    const_oid::db::rfc4519,
    log::debug,
    std::str::FromStr,
    x509_cert::{
        der::{
            asn1::{Ia5StringRef, PrintableStringRef, TeletexStringRef, Utf8StringRef},
            Any, Decode,
        },
        name::RdnSequence,
    },
    x509_certificate::CapturedX509Certificate,
};

fn attribute_value_string(value: &Any) -> Option<String> {
    if let Ok(s) = Utf8StringRef::try_from(value) {
        Some(s.to_string())
    } else if let Ok(s) = PrintableStringRef::try_from(value) {
        Some(s.to_string())
    } else if let Ok(s) = Ia5StringRef::try_from(value) {
        Some(s.to_string())
    } else if let Ok(s) = TeletexStringRef::try_from(value) {
        Some(s.to_string())
    } else {
        None
    }
}

/// Obtain the RFC 4514 string form of a certificate's subject.
///
/// RDNs are emitted in reverse order of the ASN.1 sequence, so the most
/// specific component (typically the CN) comes first.
pub fn subject_string(cert: &CapturedX509Certificate) -> Option<String> {
    match x509_cert::Certificate::from_der(cert.constructed_data()) {
        Ok(cert) => Some(cert.tbs_certificate.subject.to_string()),
        Err(e) => {
            debug!("unable to decode certificate subject: {}", e);
            None
        }
    }
}

/// Resolve the display name of a distinguished name string.
///
/// The string is parsed per RFC 4514. The value of the first Common Name
/// component, scanning in parsed order, is returned. If the string can't be
/// parsed, there is no Common Name, or its value isn't a character string,
/// the string is returned unmodified.
pub fn display_name_from_subject(subject: &str) -> String {
    let rdns = match RdnSequence::from_str(subject) {
        Ok(rdns) => rdns,
        Err(_) => return subject.to_string(),
    };

    rdns.0
        .iter()
        .flat_map(|rdn| rdn.0.iter())
        .find(|atv| atv.oid == rfc4519::CN)
        .and_then(|atv| attribute_value_string(&atv.value))
        .unwrap_or_else(|| subject.to_string())
}

/// Resolve the display name of a certificate.
///
/// This is the Common Name of the certificate's subject, or the full subject
/// string if it has no Common Name.
pub fn display_name(cert: &CapturedX509Certificate) -> String {
    match subject_string(cert) {
        Some(subject) => display_name_from_subject(&subject),
        None => String::new(),
    }
}
