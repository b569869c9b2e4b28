//! SPID metadata error types.
//!
//! Provides the error type for metadata generation: configuration mapping,
//! XML serialization and XML signature creation.

use thiserror::Error;

/// Result type for SPID metadata operations.
pub type SpidResult<T> = Result<T, SpidError>;

/// SPID metadata generation errors.
#[derive(Debug, Error)]
pub enum SpidError {
    /// Provider configuration cannot be turned into metadata.
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// The realm has no enabled SPID identity provider.
    #[error("no enabled SPID identity providers in realm {0}")]
    NoIdentityProviders(String),

    /// Serializing the metadata document failed.
    #[error("XML write error: {0}")]
    XmlWrite(String),

    /// XML parsing error.
    #[error("XML parsing error: {0}")]
    XmlParse(String),

    /// XML signature creation failed.
    #[error("signature creation failed: {0}")]
    SignatureCreation(String),

    /// Cryptographic operation error.
    #[error("crypto error: {0}")]
    Crypto(String),

    /// Internal error.
    #[error("internal error: {0}")]
    Internal(String),
}

impl SpidError {
    /// Returns the HTTP status code the metadata endpoint answers with.
    #[must_use]
    pub const fn http_status(&self) -> u16 {
        match self {
            Self::NoIdentityProviders(_) => 404,
            _ => 500,
        }
    }
}

impl From<quick_xml::Error> for SpidError {
    fn from(err: quick_xml::Error) -> Self {
        Self::XmlParse(err.to_string())
    }
}

impl From<quick_xml::events::attributes::AttrError> for SpidError {
    fn from(err: quick_xml::events::attributes::AttrError) -> Self {
        Self::XmlParse(err.to_string())
    }
}

impl From<std::io::Error> for SpidError {
    fn from(err: std::io::Error) -> Self {
        Self::XmlWrite(err.to_string())
    }
}

impl From<std::string::FromUtf8Error> for SpidError {
    fn from(err: std::string::FromUtf8Error) -> Self {
        Self::XmlWrite(err.to_string())
    }
}

impl From<kc_crypto::CryptoError> for SpidError {
    fn from(err: kc_crypto::CryptoError) -> Self {
        Self::Crypto(err.to_string())
    }
}
