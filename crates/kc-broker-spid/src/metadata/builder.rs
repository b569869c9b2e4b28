//! Metadata assembly.
//!
//! Customizers hand their fragments to [`SpMetadataBuilder`], which applies
//! them to the baseline descriptor in one pass. The result does not depend
//! on the order in which fragments were supplied.

use super::SpEndpoints;
use crate::types::{AttributeConsumingService, ContactPerson, EntityDescriptor, Organization};

/// Assembles the final entity descriptor from the baseline and fragments.
#[derive(Debug, Clone)]
pub struct SpMetadataBuilder {
    baseline: EntityDescriptor,
    organization: Option<Organization>,
    contact_persons: Vec<ContactPerson>,
    endpoints: Option<SpEndpoints>,
    attribute_consuming_services: Vec<AttributeConsumingService>,
}

impl SpMetadataBuilder {
    /// Starts from a baseline descriptor.
    #[must_use]
    pub fn new(baseline: EntityDescriptor) -> Self {
        Self {
            baseline,
            organization: None,
            contact_persons: Vec::new(),
            endpoints: None,
            attribute_consuming_services: Vec::new(),
        }
    }

    /// Replaces the baseline organization when `Some`.
    #[must_use]
    pub fn with_organization(mut self, organization: Option<Organization>) -> Self {
        if organization.is_some() {
            self.organization = organization;
        }
        self
    }

    /// Adds contact persons.
    #[must_use]
    pub fn with_contact_persons(mut self, contact_persons: Vec<ContactPerson>) -> Self {
        self.contact_persons.extend(contact_persons);
        self
    }

    /// Replaces all baseline assertion consumer and single logout
    /// endpoints.
    #[must_use]
    pub fn with_endpoints(mut self, endpoints: SpEndpoints) -> Self {
        self.endpoints = Some(endpoints);
        self
    }

    /// Adds an attribute consuming service.
    #[must_use]
    pub fn with_attribute_consuming_service(mut self, service: AttributeConsumingService) -> Self {
        self.attribute_consuming_services.push(service);
        self
    }

    /// Builds the entity descriptor.
    #[must_use]
    pub fn build(self) -> EntityDescriptor {
        let mut descriptor = self.baseline;

        if let Some(organization) = self.organization {
            descriptor.organization = Some(organization);
        }
        descriptor.contact_persons.extend(self.contact_persons);

        let sp = &mut descriptor.sp_sso_descriptor;
        if let Some(endpoints) = self.endpoints {
            sp.assertion_consumer_services = endpoints.assertion_consumer_services;
            sp.single_logout_services = endpoints.single_logout_services;
        }
        sp.attribute_consuming_services
            .extend(self.attribute_consuming_services);

        descriptor
    }
}
