//! SAML metadata descriptor model.
//!
//! An owned tree covering the parts of `md:EntityDescriptor` an SPID
//! service provider publishes. Children are kept in schema order by the
//! writer, not by the order fields are filled.

use crate::types::{LocalizedValue, SamlBinding};
use crate::xml::XmlElement;

/// Root of a SAML metadata document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntityDescriptor {
    /// Document ID, referenced by the enveloped signature.
    pub id: String,
    /// SP entity ID.
    pub entity_id: String,
    /// The SP role descriptor.
    pub sp_sso_descriptor: SpSsoDescriptor,
    /// Organization information.
    pub organization: Option<Organization>,
    /// Contact persons.
    pub contact_persons: Vec<ContactPerson>,
}

/// `md:SPSSODescriptor`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SpSsoDescriptor {
    /// `AuthnRequestsSigned` attribute.
    pub authn_requests_signed: bool,
    /// `WantAssertionsSigned` attribute.
    pub want_assertions_signed: bool,
    /// Key descriptors.
    pub key_descriptors: Vec<KeyDescriptor>,
    /// Single logout endpoints.
    pub single_logout_services: Vec<Endpoint>,
    /// Supported name ID format URIs.
    pub name_id_formats: Vec<String>,
    /// Assertion consumer endpoints.
    pub assertion_consumer_services: Vec<IndexedEndpoint>,
    /// Attribute consuming services.
    pub attribute_consuming_services: Vec<AttributeConsumingService>,
}

/// Intended use of a published key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyUse {
    /// Signature verification.
    Signing,
    /// Encryption.
    Encryption,
}

impl KeyUse {
    /// Value of the `use` attribute.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Signing => "signing",
            Self::Encryption => "encryption",
        }
    }
}

/// `md:KeyDescriptor` carrying an X.509 certificate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyDescriptor {
    /// Key use.
    pub key_use: KeyUse,
    /// Optional `ds:KeyName`.
    pub key_name: Option<String>,
    /// Base64 DER certificate.
    pub certificate: String,
}

/// A SAML endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoint {
    /// Binding.
    pub binding: SamlBinding,
    /// Location URL.
    pub location: String,
}

impl Endpoint {
    /// Creates an endpoint.
    #[must_use]
    pub fn new(binding: SamlBinding, location: impl Into<String>) -> Self {
        Self {
            binding,
            location: location.into(),
        }
    }
}

/// An indexed SAML endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexedEndpoint {
    /// Binding.
    pub binding: SamlBinding,
    /// Location URL.
    pub location: String,
    /// Endpoint index.
    pub index: u32,
    /// Whether this is the default endpoint.
    pub is_default: bool,
}

/// `md:AttributeConsumingService`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttributeConsumingService {
    /// Service index.
    pub index: u32,
    /// Whether this is the default service.
    pub is_default: bool,
    /// Localized service names.
    pub service_names: Vec<LocalizedValue>,
    /// Requested attributes.
    pub requested_attributes: Vec<RequestedAttribute>,
}

/// `md:RequestedAttribute`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestedAttribute {
    /// Attribute name (e.g. `fiscalNumber`).
    pub name: String,
    /// Friendly name.
    pub friendly_name: Option<String>,
    /// Name format URI.
    pub name_format: Option<String>,
    /// Whether the attribute is required.
    pub is_required: bool,
}

impl RequestedAttribute {
    /// Creates a requested attribute with no friendly name or format.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            friendly_name: None,
            name_format: None,
            is_required: false,
        }
    }

    /// Sets the friendly name.
    #[must_use]
    pub fn with_friendly_name(mut self, friendly_name: impl Into<String>) -> Self {
        self.friendly_name = Some(friendly_name.into());
        self
    }

    /// Sets the name format.
    #[must_use]
    pub fn with_name_format(mut self, name_format: impl Into<String>) -> Self {
        self.name_format = Some(name_format.into());
        self
    }

    /// Sets the required flag.
    #[must_use]
    pub fn with_required(mut self, is_required: bool) -> Self {
        self.is_required = is_required;
        self
    }
}

/// `md:Organization`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Organization {
    /// `md:OrganizationName` entries.
    pub names: Vec<LocalizedValue>,
    /// `md:OrganizationDisplayName` entries.
    pub display_names: Vec<LocalizedValue>,
    /// `md:OrganizationURL` entries.
    pub urls: Vec<LocalizedValue>,
}

/// `contactType` values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContactType {
    /// Technical contact.
    Technical,
    /// Support contact.
    Support,
    /// Administrative contact.
    Administrative,
    /// Billing contact.
    Billing,
    /// Other contact.
    Other,
}

impl ContactType {
    /// Value of the `contactType` attribute.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Technical => "technical",
            Self::Support => "support",
            Self::Administrative => "administrative",
            Self::Billing => "billing",
            Self::Other => "other",
        }
    }
}

/// `md:ContactPerson`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactPerson {
    /// Contact type.
    pub contact_type: ContactType,
    /// Children of `md:Extensions`; the element is omitted when empty.
    pub extensions: Vec<XmlElement>,
    /// Company name.
    pub company: Option<String>,
    /// Email addresses.
    pub email_addresses: Vec<String>,
    /// Telephone numbers.
    pub telephone_numbers: Vec<String>,
}

impl ContactPerson {
    /// Creates an empty contact of the given type.
    #[must_use]
    pub fn new(contact_type: ContactType) -> Self {
        Self {
            contact_type,
            extensions: Vec::new(),
            company: None,
            email_addresses: Vec::new(),
            telephone_numbers: Vec::new(),
        }
    }

    /// Appends an extension element.
    #[must_use]
    pub fn with_extension(mut self, element: XmlElement) -> Self {
        self.extensions.push(element);
        self
    }

    /// Appends an extension element if present.
    #[must_use]
    pub fn with_optional_extension(mut self, element: Option<XmlElement>) -> Self {
        self.extensions.extend(element);
        self
    }

    /// Sets company, email and phone, skipping empty values.
    #[must_use]
    pub fn with_details(
        mut self,
        company: Option<&str>,
        email: Option<&str>,
        phone: Option<&str>,
    ) -> Self {
        let non_empty = |v: Option<&str>| v.filter(|s| !s.is_empty()).map(String::from);
        self.company = non_empty(company);
        self.email_addresses.extend(non_empty(email));
        self.telephone_numbers.extend(non_empty(phone));
        self
    }

    /// Finds an extension element by local name.
    #[must_use]
    pub fn extension(&self, name: &str) -> Option<&XmlElement> {
        self.extensions.iter().find(|e| e.name == name)
    }
}
