//! SAML metadata and SPID constants.
//!
//! Namespace URIs, binding URIs, name ID formats and the XML-DSig algorithm
//! identifiers used when publishing SPID service-provider metadata.

/// SAML 2.0 metadata namespace URI.
pub const MD_NS: &str = "urn:oasis:names:tc:SAML:2.0:metadata";

/// SAML 2.0 protocol namespace URI.
pub const SAMLP_NS: &str = "urn:oasis:names:tc:SAML:2.0:protocol";

/// XML Digital Signature namespace URI.
pub const XMLDSIG_NS: &str = "http://www.w3.org/2000/09/xmldsig#";

/// Namespace bound to the reserved `xml` prefix.
pub const XML_NS: &str = "http://www.w3.org/XML/1998/namespace";

/// SPID SAML extensions namespace URI.
pub const SPID_NS: &str = "https://spid.gov.it/saml-extensions";

/// SPID e-invoicing extensions namespace URI.
pub const FPA_NS: &str = "https://spid.gov.it/invoicing-extensions";

/// Locale used when neither the entry nor the realm names one.
pub const DEFAULT_LOCALE: &str = "en";

// ============================================================================
// Binding URIs
// ============================================================================

/// SAML binding types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SamlBinding {
    /// HTTP POST binding.
    HttpPost,
    /// HTTP Redirect binding.
    HttpRedirect,
}

impl SamlBinding {
    /// Returns the URI for this binding.
    #[must_use]
    pub const fn uri(&self) -> &'static str {
        match self {
            Self::HttpPost => "urn:oasis:names:tc:SAML:2.0:bindings:HTTP-POST",
            Self::HttpRedirect => "urn:oasis:names:tc:SAML:2.0:bindings:HTTP-Redirect",
        }
    }
}

// ============================================================================
// Name ID Formats
// ============================================================================

/// SAML Name ID formats an SP may request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum NameIdFormat {
    /// Unspecified name ID format.
    Unspecified,
    /// Email address format.
    Email,
    /// Persistent identifier format.
    Persistent,
    /// Transient identifier format, the SPID default.
    #[default]
    Transient,
}

impl NameIdFormat {
    /// Returns the URI for this name ID format.
    #[must_use]
    pub const fn uri(&self) -> &'static str {
        match self {
            Self::Unspecified => "urn:oasis:names:tc:SAML:1.1:nameid-format:unspecified",
            Self::Email => "urn:oasis:names:tc:SAML:1.1:nameid-format:emailAddress",
            Self::Persistent => "urn:oasis:names:tc:SAML:2.0:nameid-format:persistent",
            Self::Transient => "urn:oasis:names:tc:SAML:2.0:nameid-format:transient",
        }
    }
}

/// Attribute name formats.
pub mod attribute_name_formats {
    /// Basic attribute name format, used by SPID attributes.
    pub const BASIC: &str = "urn:oasis:names:tc:SAML:2.0:attrname-format:basic";

    /// URI attribute name format.
    pub const URI: &str = "urn:oasis:names:tc:SAML:2.0:attrname-format:uri";

    /// Unspecified attribute name format.
    pub const UNSPECIFIED: &str = "urn:oasis:names:tc:SAML:2.0:attrname-format:unspecified";
}

// ============================================================================
// Signature Algorithms
// ============================================================================

/// XML signature algorithms.
pub mod signature_algorithms {
    /// RSA-SHA1 signature algorithm, legacy use only.
    pub const RSA_SHA1: &str = "http://www.w3.org/2000/09/xmldsig#rsa-sha1";

    /// RSA-SHA256 signature algorithm.
    pub const RSA_SHA256: &str = "http://www.w3.org/2001/04/xmldsig-more#rsa-sha256";

    /// RSA-SHA384 signature algorithm.
    pub const RSA_SHA384: &str = "http://www.w3.org/2001/04/xmldsig-more#rsa-sha384";

    /// RSA-SHA512 signature algorithm.
    pub const RSA_SHA512: &str = "http://www.w3.org/2001/04/xmldsig-more#rsa-sha512";
}

/// Digest algorithms.
pub mod digest_algorithms {
    /// SHA-1 digest algorithm, legacy use only.
    pub const SHA1: &str = "http://www.w3.org/2000/09/xmldsig#sha1";

    /// SHA-256 digest algorithm.
    pub const SHA256: &str = "http://www.w3.org/2001/04/xmlenc#sha256";

    /// SHA-384 digest algorithm.
    pub const SHA384: &str = "http://www.w3.org/2001/04/xmldsig-more#sha384";

    /// SHA-512 digest algorithm.
    pub const SHA512: &str = "http://www.w3.org/2001/04/xmlenc#sha512";
}

/// Canonicalization algorithms.
pub mod canonicalization_algorithms {
    /// Exclusive C14N without comments.
    pub const EXCLUSIVE_C14N: &str = "http://www.w3.org/2001/10/xml-exc-c14n#";
}

/// Transform algorithms.
pub mod transforms {
    /// Enveloped signature transform.
    pub const ENVELOPED_SIGNATURE: &str = "http://www.w3.org/2000/09/xmldsig#enveloped-signature";
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn binding_uris() {
        assert_eq!(
            SamlBinding::HttpPost.uri(),
            "urn:oasis:names:tc:SAML:2.0:bindings:HTTP-POST"
        );
        assert_eq!(
            SamlBinding::HttpRedirect.uri(),
            "urn:oasis:names:tc:SAML:2.0:bindings:HTTP-Redirect"
        );
    }

    #[test]
    fn name_id_format_default_is_transient() {
        assert_eq!(NameIdFormat::default(), NameIdFormat::Transient);
        assert_eq!(
            NameIdFormat::default().uri(),
            "urn:oasis:names:tc:SAML:2.0:nameid-format:transient"
        );
    }
}
