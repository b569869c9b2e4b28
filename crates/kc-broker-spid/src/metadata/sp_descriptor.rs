//! SP descriptor customizer.
//!
//! One SPID metadata document serves every SPID identity provider of the
//! realm, so the baseline endpoints are replaced by one endpoint per
//! provider alias.

use tracing::debug;

use crate::types::{
    AttributeConsumingService, Endpoint, IndexedEndpoint, LocalizedValue, RequestedAttribute,
    SamlBinding,
};

/// Replacement endpoint lists for `md:SPSSODescriptor`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SpEndpoints {
    /// Assertion consumer endpoints, indexed from 0.
    pub assertion_consumer_services: Vec<IndexedEndpoint>,
    /// Single logout endpoints.
    pub single_logout_services: Vec<Endpoint>,
}

/// Builds the endpoint lists that replace the baseline ones.
///
/// Assertion consumer endpoints get indices `0..N`; index 0 is the
/// default.
#[must_use]
pub fn customize_sp_descriptor(
    login_binding: SamlBinding,
    logout_binding: SamlBinding,
    assertion_endpoints: &[String],
    logout_endpoints: &[String],
) -> SpEndpoints {
    debug!(
        assertion_endpoints = assertion_endpoints.len(),
        logout_endpoints = logout_endpoints.len(),
        "Replacing SP endpoints"
    );

    SpEndpoints {
        assertion_consumer_services: (0u32..)
            .zip(assertion_endpoints)
            .map(|(index, location)| IndexedEndpoint {
                binding: login_binding,
                location: location.clone(),
                index,
                is_default: index == 0,
            })
            .collect(),
        single_logout_services: logout_endpoints
            .iter()
            .map(|location| Endpoint::new(logout_binding, location.as_str()))
            .collect(),
    }
}

/// Builds the default `md:AttributeConsumingService`.
///
/// Service names are `locale|name` entries; entries without a locale use
/// `default_locale`.
#[must_use]
pub fn build_attribute_consuming_service(
    index: u32,
    service_names: &[String],
    default_locale: &str,
    requested_attributes: &[RequestedAttribute],
) -> AttributeConsumingService {
    AttributeConsumingService {
        index,
        is_default: true,
        service_names: service_names
            .iter()
            .map(|entry| LocalizedValue::parse_or_default(entry, default_locale))
            .collect(),
        requested_attributes: requested_attributes.to_vec(),
    }
}
