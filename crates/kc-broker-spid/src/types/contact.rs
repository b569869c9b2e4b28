//! Contact value objects.
//!
//! Built once per generation request from the provider configuration and
//! dropped after serialization. Absent contacts are modelled as `None` by
//! the mapper, so a present value always carries at least one field.

use serde::{Deserialize, Serialize};

use crate::error::{SpidError, SpidResult};

/// Minimum length of a VAT string (`IT` + separator digit + 10 digits).
pub const MIN_VAT_LENGTH: usize = 13;

/// The "other" contact of the SP.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OtherContactInfo {
    /// Private company (true) or public administration (false).
    pub is_private: bool,
    /// IPA code of a public administration.
    pub ipa_code: Option<String>,
    /// VAT number, as configured.
    pub vat_number: Option<String>,
    /// Fiscal code.
    pub fiscal_code: Option<String>,
    /// Company name.
    pub company: Option<String>,
    /// Phone number.
    pub phone: Option<String>,
    /// Email address.
    pub email: Option<String>,
}

/// Postal address of the billing contact.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OfficeInfo {
    /// Street.
    pub address: Option<String>,
    /// Street number.
    pub number: Option<String>,
    /// Postal code.
    pub postal_code: Option<String>,
    /// Province.
    pub province: Option<String>,
    /// City.
    pub city: Option<String>,
    /// Country code.
    pub country_code: Option<String>,
}

/// The billing contact of a private SP.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BillingContactInfo {
    /// Company name.
    pub company: Option<String>,
    /// Phone number.
    pub phone: Option<String>,
    /// Email address.
    pub email: Option<String>,
    /// Registry name (`Denominazione`).
    pub registry_name: Option<String>,
    /// VAT number without the country code.
    pub vat_number: Option<String>,
    /// VAT country code.
    pub vat_country_code: Option<String>,
    /// Office address.
    pub office: Option<OfficeInfo>,
}

/// A VAT identifier split into country code and number.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VatId {
    /// First two characters.
    pub country_code: String,
    /// Characters 4 to 13.
    pub number: String,
}

impl VatId {
    /// Splits a VAT string such as `IT86334519757`.
    ///
    /// The third character is skipped and anything after the 13th is
    /// ignored. Slicing is done on characters, not bytes.
    ///
    /// # Errors
    ///
    /// Returns [`SpidError::InvalidConfiguration`] if the value is shorter
    /// than [`MIN_VAT_LENGTH`] characters.
    pub fn parse(value: &str) -> SpidResult<Self> {
        let chars: Vec<char> = value.chars().collect();
        if chars.len() < MIN_VAT_LENGTH {
            return Err(SpidError::InvalidConfiguration(format!(
                "VAT number '{value}' must have at least {MIN_VAT_LENGTH} characters"
            )));
        }

        Ok(Self {
            country_code: chars[..2].iter().collect(),
            number: chars[3..MIN_VAT_LENGTH].iter().collect(),
        })
    }
}
