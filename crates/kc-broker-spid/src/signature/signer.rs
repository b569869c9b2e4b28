//! XML Signature creation.
//!
//! Signs metadata documents with an enveloped signature over the root
//! element, referenced through its `ID` attribute.

use base64::Engine;
use quick_xml::escape::escape;
use quick_xml::events::Event;
use quick_xml::Reader;
use tracing::debug;

use crate::error::{SpidError, SpidResult};
use crate::types::{transforms, XMLDSIG_NS};
use crate::xml::{canonicalize, escape_text};

use super::{DigestAlgorithm, SignatureAlgorithm, SignatureConfig};

/// XML document signer.
///
/// Signs metadata documents using the configured private key.
pub struct XmlSigner {
    /// The private key in DER format.
    private_key_der: Vec<u8>,
    /// The X.509 certificate in DER format (optional).
    certificate_der: Option<Vec<u8>>,
    /// Key ID published as `ds:KeyName`, subject to the transformer.
    key_id: Option<String>,
    /// Signature configuration.
    config: SignatureConfig,
}

/// The signed root element.
struct RootElement {
    id: String,
    /// Byte offset just past the root start tag.
    content_start: usize,
}

impl XmlSigner {
    /// Creates a new signer with an RSA private key.
    ///
    /// # Arguments
    ///
    /// * `private_key_der` - The private key in DER format (PKCS#8 or PKCS#1)
    /// * `certificate_der` - Optional X.509 certificate in DER format
    #[must_use]
    pub fn new(private_key_der: Vec<u8>, certificate_der: Option<Vec<u8>>) -> Self {
        Self {
            private_key_der,
            certificate_der,
            key_id: None,
            config: SignatureConfig::default(),
        }
    }

    /// Creates a new signer from PEM-encoded key and certificate.
    ///
    /// # Errors
    ///
    /// Returns an error if the key or certificate PEM cannot be decoded.
    pub fn from_pem(private_key_pem: &str, certificate_pem: Option<&str>) -> SpidResult<Self> {
        let private_key_der =
            kc_crypto::decode_pem(private_key_pem, &["PRIVATE KEY", "RSA PRIVATE KEY"])?;
        let certificate_der = certificate_pem
            .map(|pem| kc_crypto::decode_pem(pem, &["CERTIFICATE"]))
            .transpose()?;

        Ok(Self::new(private_key_der, certificate_der))
    }

    /// Sets the key ID.
    #[must_use]
    pub fn with_key_id(mut self, key_id: impl Into<String>) -> Self {
        self.key_id = Some(key_id.into());
        self
    }

    /// Sets the signature configuration.
    #[must_use]
    pub fn with_config(mut self, config: SignatureConfig) -> Self {
        self.config = config;
        self
    }

    /// Signs an XML document.
    ///
    /// The root element must carry an `ID` attribute; the returned document
    /// has `<ds:Signature>` inserted as its first child.
    ///
    /// # Errors
    ///
    /// Returns an error if the document cannot be parsed, the root has no
    /// `ID` or no content, or the key cannot sign.
    pub fn sign(&self, xml: &str) -> SpidResult<String> {
        let root = find_root(xml)?;
        debug!(
            reference = %root.id,
            algorithm = self.config.algorithm.uri(),
            "Signing SP metadata"
        );

        let canonical = canonicalize(xml, true)?;
        let digest = kc_crypto::digest(self.config.digest.hash_algorithm(), canonical.as_bytes());
        let digest_b64 = base64::engine::general_purpose::STANDARD.encode(digest);

        let signed_info = build_signed_info(&root.id, &digest_b64, &self.config);
        let canonical_signed_info = canonicalize(&signed_info, false)?;

        let signature_value = kc_crypto::rsa_sign(
            &self.private_key_der,
            canonical_signed_info.as_bytes(),
            self.config.algorithm.rsa_algorithm(),
        )
        .map_err(|e| SpidError::SignatureCreation(format!("RSA signing failed: {e}")))?;
        let signature_b64 = base64::engine::general_purpose::STANDARD.encode(signature_value);

        let key_name = self
            .config
            .key_name_transformer
            .key_name(self.key_id.as_deref(), self.certificate_der.as_deref())?;
        let signature_element = build_signature_element(
            &canonical_signed_info,
            &signature_b64,
            key_name.as_deref(),
            self.certificate_der.as_deref(),
        );

        Ok(insert_signature(xml, root.content_start, &signature_element))
    }
}

/// Signs a metadata document.
///
/// # Errors
///
/// Returns an error if the document cannot be parsed or the key cannot
/// sign.
pub fn sign_metadata(
    xml: &str,
    private_key_der: &[u8],
    certificate_der: Option<&[u8]>,
    algorithm: SignatureAlgorithm,
    digest: DigestAlgorithm,
) -> SpidResult<String> {
    XmlSigner::new(private_key_der.to_vec(), certificate_der.map(<[u8]>::to_vec))
        .with_config(SignatureConfig::with_algorithm(algorithm).with_digest(digest))
        .sign(xml)
}

fn find_root(xml: &str) -> SpidResult<RootElement> {
    let mut reader = Reader::from_str(xml);

    loop {
        match reader.read_event()? {
            Event::Start(e) => {
                let mut id = None;
                for attr in e.attributes() {
                    let attr = attr?;
                    if attr.key.as_ref() == b"ID" {
                        id = Some(attr.unescape_value()?.into_owned());
                    }
                }
                let id = id.ok_or_else(|| {
                    SpidError::SignatureCreation("root element has no ID attribute".to_string())
                })?;
                let content_start = usize::try_from(reader.buffer_position())
                    .map_err(|e| SpidError::Internal(e.to_string()))?;
                return Ok(RootElement { id, content_start });
            }
            Event::Empty(_) => {
                return Err(SpidError::SignatureCreation(
                    "root element has no content".to_string(),
                ));
            }
            Event::Eof => {
                return Err(SpidError::SignatureCreation(
                    "document has no root element".to_string(),
                ));
            }
            _ => {}
        }
    }
}

fn build_signed_info(reference_id: &str, digest_b64: &str, config: &SignatureConfig) -> String {
    let c14n = config.canonicalization_uri();
    format!(
        "<ds:SignedInfo xmlns:ds=\"{XMLDSIG_NS}\">\
         <ds:CanonicalizationMethod Algorithm=\"{c14n}\"/>\
         <ds:SignatureMethod Algorithm=\"{}\"/>\
         <ds:Reference URI=\"#{}\">\
         <ds:Transforms>\
         <ds:Transform Algorithm=\"{}\"/>\
         <ds:Transform Algorithm=\"{c14n}\"/>\
         </ds:Transforms>\
         <ds:DigestMethod Algorithm=\"{}\"/>\
         <ds:DigestValue>{digest_b64}</ds:DigestValue>\
         </ds:Reference>\
         </ds:SignedInfo>",
        config.algorithm.uri(),
        escape(reference_id),
        transforms::ENVELOPED_SIGNATURE,
        config.digest.uri(),
    )
}

fn build_signature_element(
    canonical_signed_info: &str,
    signature_b64: &str,
    key_name: Option<&str>,
    certificate_der: Option<&[u8]>,
) -> String {
    let mut key_info = String::new();
    if let Some(name) = key_name {
        key_info.push_str(&format!("<ds:KeyName>{}</ds:KeyName>", escape_text(name)));
    }
    if let Some(cert) = certificate_der {
        let cert_b64 = base64::engine::general_purpose::STANDARD.encode(cert);
        key_info.push_str(&format!(
            "<ds:X509Data><ds:X509Certificate>{cert_b64}</ds:X509Certificate></ds:X509Data>"
        ));
    }
    if !key_info.is_empty() {
        key_info = format!("<ds:KeyInfo>{key_info}</ds:KeyInfo>");
    }

    format!(
        "<ds:Signature xmlns:ds=\"{XMLDSIG_NS}\">{canonical_signed_info}\
         <ds:SignatureValue>{signature_b64}</ds:SignatureValue>\
         {key_info}</ds:Signature>"
    )
}

fn insert_signature(xml: &str, position: usize, signature: &str) -> String {
    let mut signed = String::with_capacity(xml.len() + signature.len());
    signed.push_str(&xml[..position]);
    signed.push_str(signature);
    signed.push_str(&xml[position..]);
    signed
}
