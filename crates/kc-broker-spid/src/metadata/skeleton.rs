//! Baseline SP descriptor.
//!
//! Builds the generic SAML SP metadata the SPID customizers start from:
//! key descriptors, one logout endpoint, one name ID format and one
//! assertion consumer endpoint.

use uuid::Uuid;

use super::SigningCertificate;
use crate::types::{
    Endpoint, EntityDescriptor, IndexedEndpoint, KeyDescriptor, KeyUse, SamlBinding,
    SpSsoDescriptor,
};

/// Index of the assertion consumer endpoint in the baseline descriptor.
const BASELINE_ACS_INDEX: u32 = 1;

/// Parameters of the baseline SP descriptor.
#[derive(Debug, Clone)]
pub struct SpDescriptorSkeleton {
    /// SP entity ID.
    pub entity_id: String,
    /// Binding of the assertion consumer endpoint.
    pub login_binding: SamlBinding,
    /// Binding of the single logout endpoint.
    pub logout_binding: SamlBinding,
    /// Assertion consumer endpoint.
    pub assertion_endpoint: String,
    /// Single logout endpoint.
    pub logout_endpoint: String,
    /// `AuthnRequestsSigned` flag.
    pub authn_requests_signed: bool,
    /// `WantAssertionsSigned` flag.
    pub want_assertions_signed: bool,
    /// Publish active certificates for encryption too.
    pub want_assertions_encrypted: bool,
    /// Name ID format URI.
    pub name_id_format: String,
    /// Certificates to publish.
    pub certificates: Vec<SigningCertificate>,
}

impl SpDescriptorSkeleton {
    /// Builds the baseline entity descriptor with a fresh document ID.
    #[must_use]
    pub fn build(self) -> EntityDescriptor {
        let mut key_descriptors = Vec::new();
        for cert in &self.certificates {
            let certificate = cert.certificate_b64();
            key_descriptors.push(KeyDescriptor {
                key_use: KeyUse::Signing,
                key_name: Some(cert.kid.clone()),
                certificate: certificate.clone(),
            });
            if self.want_assertions_encrypted && cert.active {
                key_descriptors.push(KeyDescriptor {
                    key_use: KeyUse::Encryption,
                    key_name: Some(cert.kid.clone()),
                    certificate,
                });
            }
        }

        EntityDescriptor {
            id: format!("_{}", Uuid::new_v4()),
            entity_id: self.entity_id,
            sp_sso_descriptor: SpSsoDescriptor {
                authn_requests_signed: self.authn_requests_signed,
                want_assertions_signed: self.want_assertions_signed,
                key_descriptors,
                single_logout_services: vec![Endpoint::new(
                    self.logout_binding,
                    self.logout_endpoint,
                )],
                name_id_formats: vec![self.name_id_format],
                assertion_consumer_services: vec![IndexedEndpoint {
                    binding: self.login_binding,
                    location: self.assertion_endpoint,
                    index: BASELINE_ACS_INDEX,
                    is_default: true,
                }],
                attribute_consuming_services: Vec::new(),
            },
            organization: None,
            contact_persons: Vec::new(),
        }
    }
}
