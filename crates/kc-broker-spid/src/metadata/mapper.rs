//! Configuration mapper.
//!
//! Turns the provider config map into contact value objects. A contact is
//! only materialized when at least one of its gate fields is set, so an
//! unconfigured provider produces no `md:ContactPerson` at all.

use tracing::error;

use crate::config::{keys, SpidProviderConfig};
use crate::error::SpidResult;
use crate::types::{BillingContactInfo, OfficeInfo, OtherContactInfo, VatId};

/// Fields whose presence materializes the "other" contact.
const OTHER_CONTACT_FIELDS: [&str; 7] = [
    keys::OTHER_CONTACT_SP_PRIVATE,
    keys::OTHER_CONTACT_IPA_CODE,
    keys::OTHER_CONTACT_VAT_NUMBER,
    keys::OTHER_CONTACT_FISCAL_CODE,
    keys::OTHER_CONTACT_COMPANY,
    keys::OTHER_CONTACT_PHONE,
    keys::OTHER_CONTACT_EMAIL,
];

/// Fields whose presence materializes the billing contact.
const BILLING_CONTACT_FIELDS: [&str; 3] = [
    keys::BILLING_CONTACT_COMPANY,
    keys::BILLING_CONTACT_PHONE,
    keys::BILLING_CONTACT_EMAIL,
];

fn any_present(config: &SpidProviderConfig, fields: &[&str]) -> bool {
    fields.iter().any(|key| config.get_non_empty(key).is_some())
}

fn value(config: &SpidProviderConfig, key: &str) -> Option<String> {
    config.get_non_empty(key).map(String::from)
}

/// Maps the "other" contact.
///
/// Returns `None` unless one of the seven "other" contact fields is set.
#[must_use]
pub fn map_other_contact(config: &SpidProviderConfig) -> Option<OtherContactInfo> {
    if !any_present(config, &OTHER_CONTACT_FIELDS) {
        return None;
    }

    Some(OtherContactInfo {
        is_private: config.is_sp_private(),
        ipa_code: value(config, keys::OTHER_CONTACT_IPA_CODE),
        vat_number: value(config, keys::OTHER_CONTACT_VAT_NUMBER),
        fiscal_code: value(config, keys::OTHER_CONTACT_FISCAL_CODE),
        company: value(config, keys::OTHER_CONTACT_COMPANY),
        phone: value(config, keys::OTHER_CONTACT_PHONE),
        email: value(config, keys::OTHER_CONTACT_EMAIL),
    })
}

/// Maps the billing contact of a private SP.
///
/// Returns `Ok(None)` for public SPs and when no billing company, phone or
/// email is set. VAT country code and number are sliced from the
/// configured VAT number.
///
/// # Errors
///
/// Returns [`crate::SpidError::InvalidConfiguration`] if the VAT number is
/// missing or shorter than 13 characters.
pub fn map_billing_contact(config: &SpidProviderConfig) -> SpidResult<Option<BillingContactInfo>> {
    if !config.is_sp_private() || !any_present(config, &BILLING_CONTACT_FIELDS) {
        return Ok(None);
    }

    let vat = config.get(keys::OTHER_CONTACT_VAT_NUMBER).unwrap_or_default();
    let vat = VatId::parse(vat).map_err(|e| {
        error!(provider = %config.alias, error = %e, "Cannot build billing contact");
        e
    })?;

    Ok(Some(BillingContactInfo {
        company: value(config, keys::BILLING_CONTACT_COMPANY),
        phone: value(config, keys::BILLING_CONTACT_PHONE),
        email: value(config, keys::BILLING_CONTACT_EMAIL),
        registry_name: value(config, keys::BILLING_CONTACT_REGISTRY_NAME),
        vat_number: Some(vat.number),
        vat_country_code: Some(vat.country_code),
        office: Some(OfficeInfo {
            address: value(config, keys::BILLING_CONTACT_SITE_ADDRESS),
            number: value(config, keys::BILLING_CONTACT_SITE_NUMBER),
            postal_code: value(config, keys::BILLING_CONTACT_SITE_POSTAL_CODE),
            province: value(config, keys::BILLING_CONTACT_SITE_PROVINCE),
            city: value(config, keys::BILLING_CONTACT_SITE_CITY),
            country_code: value(config, keys::BILLING_CONTACT_SITE_COUNTRY),
        }),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SpidError;

    fn private_sp() -> SpidProviderConfig {
        SpidProviderConfig::new("spid")
            .with(keys::OTHER_CONTACT_SP_PRIVATE, "true")
            .with(keys::OTHER_CONTACT_VAT_NUMBER, "IT86334519757")
            .with(keys::OTHER_CONTACT_FISCAL_CODE, "86334519757")
            .with(keys::BILLING_CONTACT_COMPANY, "ACME S.p.A.")
            .with(keys::BILLING_CONTACT_SITE_ADDRESS, "via Galileo Galilei")
            .with(keys::BILLING_CONTACT_SITE_NUMBER, "1")
    }

    #[test]
    fn no_fields_no_other_contact() {
        let config = SpidProviderConfig::new("spid").with(keys::OTHER_CONTACT_EMAIL, "");
        assert!(map_other_contact(&config).is_none());
    }

    #[test]
    fn any_field_materializes_other_contact() {
        let config = SpidProviderConfig::new("spid").with(keys::OTHER_CONTACT_PHONE, "+39061234");
        let contact = map_other_contact(&config).unwrap();
        assert!(!contact.is_private);
        assert_eq!(contact.phone.as_deref(), Some("+39061234"));
        assert!(contact.company.is_none());
    }

    #[test]
    fn public_flag_alone_materializes_other_contact() {
        let config =
            SpidProviderConfig::new("spid").with(keys::OTHER_CONTACT_SP_PRIVATE, "false");
        let contact = map_other_contact(&config).unwrap();
        assert!(!contact.is_private);
    }

    #[test]
    fn billing_contact_derives_vat() {
        let billing = map_billing_contact(&private_sp()).unwrap().unwrap();
        assert_eq!(billing.vat_country_code.as_deref(), Some("IT"));
        assert_eq!(billing.vat_number.as_deref(), Some("6334519757"));
        assert_eq!(billing.company.as_deref(), Some("ACME S.p.A."));

        let office = billing.office.unwrap();
        assert_eq!(office.address.as_deref(), Some("via Galileo Galilei"));
        assert_eq!(office.number.as_deref(), Some("1"));
        assert!(office.city.is_none());
    }

    #[test]
    fn billing_requires_private_sp() {
        let config = private_sp().with(keys::OTHER_CONTACT_SP_PRIVATE, "false");
        assert!(map_billing_contact(&config).unwrap().is_none());
    }

    #[test]
    fn billing_requires_a_billing_field() {
        let config = private_sp().with(keys::BILLING_CONTACT_COMPANY, "");
        assert!(map_billing_contact(&config).unwrap().is_none());

        let config = config.with(keys::BILLING_CONTACT_EMAIL, "fatture@acme.it");
        assert!(map_billing_contact(&config).unwrap().is_some());
    }

    #[test]
    fn vat_is_sliced_as_configured() {
        let config = private_sp().with(keys::OTHER_CONTACT_VAT_NUMBER, " IT86334519757");
        let billing = map_billing_contact(&config).unwrap().unwrap();
        assert_eq!(billing.vat_country_code.as_deref(), Some(" I"));
        assert_eq!(billing.vat_number.as_deref(), Some("8633451975"));
    }

    #[test]
    fn short_vat_fails_billing_mapping() {
        let config = private_sp().with(keys::OTHER_CONTACT_VAT_NUMBER, "IT863");
        let err = map_billing_contact(&config).unwrap_err();
        assert!(matches!(err, SpidError::InvalidConfiguration(_)));
    }

    #[test]
    fn missing_vat_fails_billing_mapping() {
        let mut config = private_sp();
        config.config.remove(keys::OTHER_CONTACT_VAT_NUMBER);
        assert!(map_billing_contact(&config).is_err());
    }
}
