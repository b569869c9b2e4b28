//! SPID identity provider configuration.
//!
//! Mirrors the identity-provider model stored by the realm: an alias, an
//! enabled flag and a flat string-to-string config map edited from the
//! admin console. Typed accessors read the keys the metadata engine needs.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::types::{SamlBinding, DEFAULT_LOCALE};

/// Provider ID of SPID identity providers.
pub const SPID_PROVIDER_ID: &str = "spid";

/// Default `AttributeConsumingService` index.
pub const DEFAULT_ATTRIBUTE_CONSUMING_SERVICE_INDEX: u32 = 1;

/// Config map keys.
pub mod keys {
    /// Whether the service provider is a private company.
    pub const OTHER_CONTACT_SP_PRIVATE: &str = "otherContactIsSpPrivate";
    /// IPA code of a public administration.
    pub const OTHER_CONTACT_IPA_CODE: &str = "otherContactIpaCode";
    /// VAT number, country code included (e.g. `IT12345678901`).
    pub const OTHER_CONTACT_VAT_NUMBER: &str = "otherContactVatNumber";
    /// Fiscal code.
    pub const OTHER_CONTACT_FISCAL_CODE: &str = "otherContactFiscalCode";
    /// Company of the "other" contact.
    pub const OTHER_CONTACT_COMPANY: &str = "otherContactCompany";
    /// Phone of the "other" contact.
    pub const OTHER_CONTACT_PHONE: &str = "otherContactPhone";
    /// Email of the "other" contact.
    pub const OTHER_CONTACT_EMAIL: &str = "otherContactEmail";

    /// Company of the billing contact.
    pub const BILLING_CONTACT_COMPANY: &str = "billingContactCompany";
    /// Phone of the billing contact.
    pub const BILLING_CONTACT_PHONE: &str = "billingContactPhone";
    /// Email of the billing contact.
    pub const BILLING_CONTACT_EMAIL: &str = "billingContactEmail";
    /// Registry name (`Denominazione`) of the billing contact.
    pub const BILLING_CONTACT_REGISTRY_NAME: &str = "billingContactRegistryName";
    /// Street of the billing site.
    pub const BILLING_CONTACT_SITE_ADDRESS: &str = "billingContactSiteAddress";
    /// Street number of the billing site.
    pub const BILLING_CONTACT_SITE_NUMBER: &str = "billingContactSiteNumber";
    /// City of the billing site.
    pub const BILLING_CONTACT_SITE_CITY: &str = "billingContactSiteCity";
    /// Postal code of the billing site.
    pub const BILLING_CONTACT_SITE_POSTAL_CODE: &str = "billingContactSitePostalCode";
    /// Province of the billing site.
    pub const BILLING_CONTACT_SITE_PROVINCE: &str = "billingContactSiteProvince";
    /// Country code of the billing site.
    pub const BILLING_CONTACT_SITE_COUNTRY: &str = "billingContactSiteCountry";

    /// Comma-separated `locale|name` organization names.
    pub const ORGANIZATION_NAMES: &str = "organizationNames";
    /// Comma-separated `locale|name` organization display names.
    pub const ORGANIZATION_DISPLAY_NAMES: &str = "organizationDisplayNames";
    /// Comma-separated `locale|url` organization URLs.
    pub const ORGANIZATION_URLS: &str = "organizationUrls";

    /// Index of the `AttributeConsumingService`.
    pub const ATTRIBUTE_CONSUMING_SERVICE_INDEX: &str = "attributeConsumingServiceIndex";
    /// Comma-separated `locale|name` service names.
    pub const ATTRIBUTE_CONSUMING_SERVICE_NAME: &str = "attributeConsumingServiceName";

    /// Explicit SP entity ID.
    pub const ENTITY_ID: &str = "entityId";
    /// Requested NameID format.
    pub const NAME_ID_POLICY_FORMAT: &str = "nameIDPolicyFormat";
    /// Send AuthnRequests with the HTTP-POST binding.
    pub const POST_BINDING_AUTHN_REQUEST: &str = "postBindingAuthnRequest";
    /// `AuthnRequestsSigned` flag.
    pub const WANT_AUTHN_REQUESTS_SIGNED: &str = "wantAuthnRequestsSigned";
    /// `WantAssertionsSigned` flag.
    pub const WANT_ASSERTIONS_SIGNED: &str = "wantAssertionsSigned";
    /// Publish an encryption key descriptor.
    pub const WANT_ASSERTIONS_ENCRYPTED: &str = "wantAssertionsEncrypted";
    /// Sign the generated metadata.
    pub const SIGN_SP_METADATA: &str = "signSpMetadata";
    /// Signature algorithm name (`RSA_SHA256`, ...).
    pub const SIGNATURE_ALGORITHM: &str = "signatureAlgorithm";
    /// `ds:KeyName` transformer (`NONE`, `KEY_ID`).
    pub const XML_SIG_KEY_INFO_KEY_NAME_TRANSFORMER: &str = "xmlSigKeyInfoKeyNameTransformer";
}

/// Configuration of one SPID identity provider.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpidProviderConfig {
    /// Provider alias, unique within the realm.
    pub alias: String,

    /// Provider type; SPID providers use [`SPID_PROVIDER_ID`].
    pub provider_id: String,

    /// Whether the provider is enabled.
    pub enabled: bool,

    /// Provider-specific configuration.
    #[serde(default)]
    pub config: HashMap<String, String>,
}

impl SpidProviderConfig {
    /// Creates an enabled SPID provider with an empty config map.
    #[must_use]
    pub fn new(alias: impl Into<String>) -> Self {
        Self {
            alias: alias.into(),
            provider_id: SPID_PROVIDER_ID.to_string(),
            enabled: true,
            config: HashMap::new(),
        }
    }

    /// Sets a config value.
    #[must_use]
    pub fn with(mut self, key: &str, value: impl Into<String>) -> Self {
        self.config.insert(key.to_string(), value.into());
        self
    }

    /// Sets the enabled flag.
    #[must_use]
    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    /// Returns true if this is an enabled SPID provider.
    #[must_use]
    pub fn is_enabled_spid(&self) -> bool {
        self.enabled && self.provider_id == SPID_PROVIDER_ID
    }

    /// Gets a config value by key.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.config.get(key).map(String::as_str)
    }

    /// Gets a config value, treating the empty string as absent.
    #[must_use]
    pub fn get_non_empty(&self, key: &str) -> Option<&str> {
        self.get(key).filter(|v| !v.is_empty())
    }

    /// Gets a config value as bool.
    ///
    /// Only `true`, in any letter case, is true; any other present value
    /// is false.
    #[must_use]
    pub fn get_bool(&self, key: &str) -> Option<bool> {
        self.get(key).map(|v| v.eq_ignore_ascii_case("true"))
    }

    /// Gets a config value as u32.
    #[must_use]
    pub fn get_u32(&self, key: &str) -> Option<u32> {
        self.get(key).and_then(|v| v.trim().parse().ok())
    }

    /// Gets a comma-separated config value as a list.
    ///
    /// Entries are trimmed; empty entries are dropped.
    #[must_use]
    pub fn get_list(&self, key: &str) -> Vec<String> {
        self.get(key)
            .map(|v| {
                v.split(',')
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .map(String::from)
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Returns true if the SP is a private company.
    #[must_use]
    pub fn is_sp_private(&self) -> bool {
        self.get_bool(keys::OTHER_CONTACT_SP_PRIVATE).unwrap_or(false)
    }

    /// Returns true if the metadata must be signed.
    #[must_use]
    pub fn sign_sp_metadata(&self) -> bool {
        self.get_bool(keys::SIGN_SP_METADATA).unwrap_or(false)
    }

    /// Binding used for both login and logout endpoints.
    #[must_use]
    pub fn authn_binding(&self) -> SamlBinding {
        if self.get_bool(keys::POST_BINDING_AUTHN_REQUEST).unwrap_or(false) {
            SamlBinding::HttpPost
        } else {
            SamlBinding::HttpRedirect
        }
    }

    /// Returns the `AttributeConsumingService` index, defaulting to 1.
    #[must_use]
    pub fn attribute_consuming_service_index(&self) -> u32 {
        self.get_u32(keys::ATTRIBUTE_CONSUMING_SERVICE_INDEX)
            .unwrap_or(DEFAULT_ATTRIBUTE_CONSUMING_SERVICE_INDEX)
    }
}

/// Realm information supplied by the session context.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RealmContext {
    /// Realm name.
    pub name: String,

    /// Server base URL (e.g. `https://sso.example.it/auth`).
    pub base_url: String,

    /// Realm default locale.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_locale: Option<String>,
}

impl RealmContext {
    /// Creates a realm context without a default locale.
    #[must_use]
    pub fn new(name: impl Into<String>, base_url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            base_url: base_url.into(),
            default_locale: None,
        }
    }

    /// Sets the default locale.
    #[must_use]
    pub fn with_default_locale(mut self, locale: impl Into<String>) -> Self {
        self.default_locale = Some(locale.into());
        self
    }

    /// Realm default locale, or `en`.
    #[must_use]
    pub fn locale(&self) -> &str {
        self.default_locale
            .as_deref()
            .filter(|l| !l.is_empty())
            .unwrap_or(DEFAULT_LOCALE)
    }

    /// `{base}/realms/{realm}`, the entity ID used when none is configured.
    #[must_use]
    pub fn realm_url(&self) -> String {
        format!(
            "{}/realms/{}",
            self.base_url.trim_end_matches('/'),
            urlencoding::encode(&self.name)
        )
    }

    /// Broker endpoint of the provider with the given alias.
    #[must_use]
    pub fn broker_endpoint(&self, alias: &str) -> String {
        format!(
            "{}/broker/{}/endpoint",
            self.realm_url(),
            urlencoding::encode(alias)
        )
    }
}
