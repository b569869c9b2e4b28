//! PEM decoding.
//!
//! The key manager hands out keys and certificates as PEM text; XML-DSig
//! needs the DER bytes (for signing) and their base64 body (for
//! `ds:X509Certificate`).

use base64::Engine;

use crate::error::CryptoError;

/// Extracts the DER payload of the first PEM block carrying `label`.
///
/// Returns `None` if no such block exists or its body is not valid base64.
#[must_use]
pub fn pem_to_der(pem: &str, label: &str) -> Option<Vec<u8>> {
    let begin = format!("-----BEGIN {label}-----");
    let end = format!("-----END {label}-----");

    let start = pem.find(&begin)? + begin.len();
    let end_pos = start + pem[start..].find(&end)?;

    let b64_data: String = pem[start..end_pos]
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect();

    base64::engine::general_purpose::STANDARD.decode(b64_data).ok()
}

/// Decodes the first PEM block matching any of `labels`, in order.
///
/// # Errors
///
/// Returns [`CryptoError::InvalidPem`] if none of the labels is present.
pub fn decode_pem(pem: &str, labels: &[&str]) -> Result<Vec<u8>, CryptoError> {
    labels
        .iter()
        .find_map(|label| pem_to_der(pem, label))
        .ok_or_else(|| CryptoError::InvalidPem(format!("no block labelled {}", labels.join(" or "))))
}
