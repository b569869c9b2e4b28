//! X.509 certificate inspection.

use x509_parser::objects::{oid2abbrev, oid_registry};
use x509_parser::prelude::*;

use crate::error::CryptoError;

/// Returns the subject distinguished name of a DER certificate.
///
/// RDNs are listed most specific first and joined with `", "`, as in
/// `CN=sp.example.it, O=Example, C=IT`. Multi-valued RDNs are joined
/// with `" + "`.
///
/// # Errors
///
/// Returns [`CryptoError::InvalidCertificate`] if the certificate cannot
/// be parsed or a subject attribute is not a string.
pub fn certificate_subject(cert_der: &[u8]) -> Result<String, CryptoError> {
    let (_, cert) = X509Certificate::from_der(cert_der)
        .map_err(|e| CryptoError::InvalidCertificate(format!("failed to parse certificate: {e}")))?;

    let mut rdns = Vec::new();
    for rdn in cert.subject().iter() {
        let mut attributes = Vec::new();
        for attribute in rdn.iter() {
            let oid = attribute.attr_type();
            let key = oid2abbrev(oid, oid_registry())
                .map_or_else(|_| oid.to_id_string(), String::from);
            let value = attribute.as_str().map_err(|e| {
                CryptoError::InvalidCertificate(format!("subject attribute {key}: {e}"))
            })?;
            attributes.push(format!("{key}={value}"));
        }
        rdns.push(attributes.join(" + "));
    }
    rdns.reverse();

    Ok(rdns.join(", "))
}
