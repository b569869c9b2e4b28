//! Signing key access.
//!
//! The realm key manager is an external collaborator; the generator only
//! needs the published certificates and the active RSA signing key.

use base64::Engine;

use crate::error::SpidResult;

/// A certificate published in the SP key descriptors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SigningCertificate {
    /// Key ID, published as `ds:KeyName`.
    pub kid: String,
    /// X.509 certificate in DER format.
    pub certificate_der: Vec<u8>,
    /// Whether the key is active. Passive keys still verify signatures
    /// but must not be offered for encryption.
    pub active: bool,
}

impl SigningCertificate {
    /// Base64 DER certificate for `ds:X509Certificate`.
    #[must_use]
    pub fn certificate_b64(&self) -> String {
        base64::engine::general_purpose::STANDARD.encode(&self.certificate_der)
    }
}

/// The active RSA signing key.
#[derive(Clone)]
pub struct SigningKey {
    /// Key ID.
    pub kid: String,
    /// Private key in DER format (PKCS#8 or PKCS#1).
    pub private_key_der: Vec<u8>,
    /// X.509 certificate in DER format.
    pub certificate_der: Vec<u8>,
}

impl std::fmt::Debug for SigningKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SigningKey")
            .field("kid", &self.kid)
            .field("private_key_der", &"[REDACTED]")
            .finish_non_exhaustive()
    }
}

impl SigningKey {
    /// Loads a key pair from PEM.
    ///
    /// # Errors
    ///
    /// Returns an error if either PEM block is missing or malformed.
    pub fn from_pem(
        kid: impl Into<String>,
        private_key_pem: &str,
        certificate_pem: &str,
    ) -> SpidResult<Self> {
        Ok(Self {
            kid: kid.into(),
            private_key_der: kc_crypto::decode_pem(
                private_key_pem,
                &["PRIVATE KEY", "RSA PRIVATE KEY"],
            )?,
            certificate_der: kc_crypto::decode_pem(certificate_pem, &["CERTIFICATE"])?,
        })
    }

    /// The certificate of this key.
    #[must_use]
    pub fn certificate(&self) -> SigningCertificate {
        SigningCertificate {
            kid: self.kid.clone(),
            certificate_der: self.certificate_der.clone(),
            active: true,
        }
    }
}

/// Source of realm signing keys.
pub trait SigningKeySource {
    /// Certificates of the enabled RSA signing keys, active and passive,
    /// active ones first.
    ///
    /// # Errors
    ///
    /// Returns an error if the keys cannot be loaded.
    fn signing_certificates(&self) -> SpidResult<Vec<SigningCertificate>>;

    /// The active RSA signing key.
    ///
    /// # Errors
    ///
    /// Returns an error if there is no usable active key.
    fn active_signing_key(&self) -> SpidResult<SigningKey>;
}

/// A single static key is its own source.
impl SigningKeySource for SigningKey {
    fn signing_certificates(&self) -> SpidResult<Vec<SigningCertificate>> {
        Ok(vec![self.certificate()])
    }

    fn active_signing_key(&self) -> SpidResult<SigningKey> {
        Ok(self.clone())
    }
}
