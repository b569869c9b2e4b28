//! # kc-broker-spid
//!
//! SPID service-provider metadata for the Keycloak identity broker.
//!
//! Builds the SAML 2.0 metadata document a realm publishes to SPID
//! identity providers: SP endpoints for every enabled SPID provider,
//! organization information and the contact persons required by the SPID
//! technical rules, with the `spid` and `fpa` (e-invoicing) extensions.
//! The document can be signed with an enveloped XML-DSig signature.
//!
//! ## Modules
//!
//! - [`config`] - Provider configuration and realm context
//! - [`types`] - Contact value objects and the metadata model
//! - [`xml`] - Extension elements, serialization, canonicalization
//! - [`metadata`] - Mapping, customizers and the generator
//! - [`signature`] - XML signature creation
//!
//! ## Example
//!
//! ```no_run
//! use kc_broker_spid::config::{keys, RealmContext, SpidProviderConfig};
//! use kc_broker_spid::metadata::{MetadataGenerator, SigningKey};
//!
//! # fn example(key_pem: &str, cert_pem: &str) -> kc_broker_spid::SpidResult<()> {
//! let realm = RealmContext::new("spid", "https://sso.example.it/auth");
//! let provider = SpidProviderConfig::new("spid-aruba")
//!     .with(keys::OTHER_CONTACT_IPA_CODE, "c_h501")
//!     .with(keys::ORGANIZATION_NAMES, "it|Comune di Roma")
//!     .with(keys::SIGN_SP_METADATA, "true");
//! let key = SigningKey::from_pem("kid-1", key_pem, cert_pem)?;
//!
//! let xml = MetadataGenerator::new().generate(&realm, &[provider], &[], &key)?;
//! # let _ = xml;
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod config;
pub mod error;
pub mod metadata;
pub mod signature;
pub mod types;
pub mod xml;

pub use config::{RealmContext, SpidProviderConfig};
pub use error::{SpidError, SpidResult};
pub use metadata::MetadataGenerator;
