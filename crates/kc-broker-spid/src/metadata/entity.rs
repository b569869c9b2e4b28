//! Entity descriptor customizer.
//!
//! Produces the `md:Organization` and `md:ContactPerson` fragments of SPID
//! metadata from configured organization entries and mapped contacts.

use tracing::{debug, warn};

use crate::types::{
    BillingContactInfo, ContactPerson, ContactType, LocalizedValue, OfficeInfo, Organization,
    OtherContactInfo,
};
use crate::xml::{XmlElement, FPA, SPID};

/// Fragments contributed to the entity descriptor.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EntityCustomization {
    /// Organization, or `None` to keep the baseline one.
    pub organization: Option<Organization>,
    /// Contact persons to add.
    pub contact_persons: Vec<ContactPerson>,
}

/// Builds the organization and contact fragments.
///
/// Nothing is contributed unless at least one organization list is
/// non-empty; contacts are only published alongside an organization.
#[must_use]
pub fn customize_entity_descriptor(
    organization_names: &[String],
    organization_display_names: &[String],
    organization_urls: &[String],
    other_contact: Option<&OtherContactInfo>,
    billing_contact: Option<&BillingContactInfo>,
) -> EntityCustomization {
    let Some(organization) =
        build_organization(organization_names, organization_display_names, organization_urls)
    else {
        debug!("No organization configured, skipping organization and contacts");
        return EntityCustomization::default();
    };

    EntityCustomization {
        organization: Some(organization),
        contact_persons: build_contact_persons(other_contact, billing_contact),
    }
}

/// Builds `md:Organization` from `locale|value` entries.
///
/// Returns `None` when all three lists are empty. Entries without a locale
/// are skipped, and so are URLs that do not parse as a URI.
#[must_use]
pub fn build_organization(
    names: &[String],
    display_names: &[String],
    urls: &[String],
) -> Option<Organization> {
    if names.is_empty() && display_names.is_empty() && urls.is_empty() {
        return None;
    }

    let urls = parse_entries(urls)
        .filter(|url| {
            let valid = is_valid_url(&url.value);
            if !valid {
                warn!(lang = %url.lang, url = %url.value, "Skipping malformed organization URL");
            }
            valid
        })
        .collect();

    Some(Organization {
        names: parse_entries(names).collect(),
        display_names: parse_entries(display_names).collect(),
        urls,
    })
}

fn parse_entries(entries: &[String]) -> impl Iterator<Item = LocalizedValue> + '_ {
    entries.iter().filter_map(|entry| {
        let parsed = LocalizedValue::parse(entry);
        if parsed.is_none() {
            debug!(entry = %entry, "Skipping entry without locale");
        }
        parsed
    })
}

/// Builds the contact persons.
///
/// A private SP gets an "other" contact with its VAT number and fiscal
/// code, plus the billing contact if one was mapped. A public
/// administration gets an "other" contact with its IPA code. Without an
/// "other" contact nothing is added.
#[must_use]
pub fn build_contact_persons(
    other_contact: Option<&OtherContactInfo>,
    billing_contact: Option<&BillingContactInfo>,
) -> Vec<ContactPerson> {
    let Some(other) = other_contact else {
        return Vec::new();
    };

    let contact = ContactPerson::new(ContactType::Other).with_details(
        other.company.as_deref(),
        other.email.as_deref(),
        other.phone.as_deref(),
    );

    if !other.is_private {
        let public = contact
            .with_optional_extension(XmlElement::text(
                SPID,
                "IPACode",
                other.ipa_code.as_deref(),
            ))
            .with_extension(XmlElement::new(SPID, "Public"));
        return vec![public];
    }

    let private = contact
        .with_optional_extension(XmlElement::text(
            SPID,
            "VATNumber",
            other.vat_number.as_deref(),
        ))
        .with_optional_extension(XmlElement::text(
            SPID,
            "FiscalCode",
            other.fiscal_code.as_deref(),
        ))
        .with_extension(XmlElement::new(SPID, "Private"));

    let mut contacts = vec![private];
    if let Some(billing) = billing_contact {
        contacts.push(billing_contact_person(billing));
    }
    contacts
}

fn billing_contact_person(billing: &BillingContactInfo) -> ContactPerson {
    let id_fiscale_iva = XmlElement::new(FPA, "IdFiscaleIVA")
        .with_optional_child(XmlElement::text(
            FPA,
            "IdPaese",
            billing.vat_country_code.as_deref(),
        ))
        .with_optional_child(XmlElement::text(
            FPA,
            "IdCodice",
            billing.vat_number.as_deref(),
        ));

    let anagrafica = XmlElement::new(FPA, "Anagrafica").with_optional_child(XmlElement::text(
        FPA,
        "Denominazione",
        billing.registry_name.as_deref(),
    ));

    let dati_anagrafici = XmlElement::new(FPA, "DatiAnagrafici")
        .with_child(id_fiscale_iva)
        .with_child(anagrafica);

    let cessionario = XmlElement::new(FPA, "CessionarioCommittente")
        .with_child(dati_anagrafici)
        .with_optional_child(billing.office.as_ref().map(sede));

    ContactPerson::new(ContactType::Billing)
        .with_extension(cessionario)
        .with_details(
            billing.company.as_deref(),
            billing.email.as_deref(),
            billing.phone.as_deref(),
        )
}

fn sede(office: &OfficeInfo) -> XmlElement {
    [
        ("Indirizzo", &office.address),
        ("NumeroCivico", &office.number),
        ("CAP", &office.postal_code),
        ("Comune", &office.city),
        ("Provincia", &office.province),
        ("Nazione", &office.country_code),
    ]
    .into_iter()
    .fold(XmlElement::new(FPA, "Sede"), |sede, (name, value)| {
        sede.with_optional_child(XmlElement::text(FPA, name, value.as_deref()))
    })
}

/// Checks that a value is a syntactically valid URI reference.
///
/// Bare host names such as `www.example.it` are accepted as relative
/// references; whitespace, stray `%` and other illegal characters are not.
pub(crate) fn is_valid_url(value: &str) -> bool {
    if value.is_empty() || !has_valid_uri_chars(value) {
        return false;
    }

    matches!(
        url::Url::parse(value),
        Ok(_) | Err(url::ParseError::RelativeUrlWithoutBase)
    )
}

fn has_valid_uri_chars(value: &str) -> bool {
    const ALLOWED: &str = "-._~:/?#[]@!$&'()*+,;=";

    let mut chars = value.chars();
    while let Some(c) = chars.next() {
        if c == '%' {
            let hex = [chars.next(), chars.next()];
            if !hex.iter().all(|h| h.is_some_and(|h| h.is_ascii_hexdigit())) {
                return false;
            }
        } else if !(c.is_alphanumeric() || ALLOWED.contains(c)) {
            return false;
        }
    }
    true
}
