// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Secret passphrase handling.

use {
    std::fmt::{Debug, Formatter},
    zeroize::Zeroizing,
};

/// Passphrase protecting the PKCS#12 keystores inside a developer profile.
///
/// The plain text is only handed out via [Passphrase::plain_text] and is
/// wiped from memory when the instance is dropped. Formatting never reveals
/// the value.
#[derive(Clone, Default, Eq, PartialEq)]
pub struct Passphrase(Zeroizing<String>);

impl Passphrase {
    pub fn new(value: impl Into<String>) -> Self {
        Self(Zeroizing::new(value.into()))
    }

    /// Obtain the plain text value of the passphrase.
    pub fn plain_text(&self) -> &str {
        self.0.as_str()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Debug for Passphrase {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str("Passphrase(<redacted>)")
    }
}

impl From<&str> for Passphrase {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for Passphrase {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}
