//! SP metadata generation.
//!
//! Ties the pipeline together: provider selection, baseline descriptor,
//! contact mapping, customizers, serialization and optional signing.

use tracing::debug;

use super::{
    build_attribute_consuming_service, customize_entity_descriptor, customize_sp_descriptor,
    map_billing_contact, map_other_contact, SigningKeySource, SpDescriptorSkeleton,
    SpMetadataBuilder,
};
use crate::config::{keys, RealmContext, SpidProviderConfig};
use crate::error::{SpidError, SpidResult};
use crate::signature::{KeyNameTransformer, SignatureAlgorithm, SignatureConfig, XmlSigner};
use crate::types::{NameIdFormat, RequestedAttribute};
use crate::xml::write_entity_descriptor;

/// Generates SPID SP metadata for a realm.
#[derive(Debug, Clone, Copy, Default)]
pub struct MetadataGenerator;

impl MetadataGenerator {
    /// Creates a generator.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Generates the metadata document.
    ///
    /// Enabled SPID providers are sorted by alias; the first one supplies
    /// the configuration and every one contributes an assertion consumer
    /// and a single logout endpoint.
    ///
    /// # Errors
    ///
    /// Returns [`SpidError::NoIdentityProviders`] if the realm has no
    /// enabled SPID provider, and propagates mapping, serialization, key
    /// and signing failures.
    pub fn generate<K>(
        &self,
        realm: &RealmContext,
        providers: &[SpidProviderConfig],
        requested_attributes: &[RequestedAttribute],
        key_source: &K,
    ) -> SpidResult<String>
    where
        K: SigningKeySource + ?Sized,
    {
        let mut providers: Vec<&SpidProviderConfig> =
            providers.iter().filter(|p| p.is_enabled_spid()).collect();
        providers.sort_by(|a, b| a.alias.cmp(&b.alias));

        let config = *providers
            .first()
            .ok_or_else(|| SpidError::NoIdentityProviders(realm.name.clone()))?;
        debug!(
            realm = %realm.name,
            provider = %config.alias,
            providers = providers.len(),
            "Generating SPID SP metadata"
        );

        let binding = config.authn_binding();
        let primary_endpoint = realm.broker_endpoint(&config.alias);
        let endpoints: Vec<String> = providers
            .iter()
            .map(|p| realm.broker_endpoint(&p.alias))
            .collect();
        let entity_id = config
            .get_non_empty(keys::ENTITY_ID)
            .map_or_else(|| realm.realm_url(), String::from);

        let baseline = SpDescriptorSkeleton {
            entity_id,
            login_binding: binding,
            logout_binding: binding,
            assertion_endpoint: primary_endpoint.clone(),
            logout_endpoint: primary_endpoint,
            authn_requests_signed: config
                .get_bool(keys::WANT_AUTHN_REQUESTS_SIGNED)
                .unwrap_or(false),
            want_assertions_signed: config.get_bool(keys::WANT_ASSERTIONS_SIGNED).unwrap_or(false),
            want_assertions_encrypted: config
                .get_bool(keys::WANT_ASSERTIONS_ENCRYPTED)
                .unwrap_or(false),
            name_id_format: config
                .get_non_empty(keys::NAME_ID_POLICY_FORMAT)
                .unwrap_or(NameIdFormat::default().uri())
                .to_string(),
            certificates: key_source.signing_certificates()?,
        }
        .build();

        let other_contact = map_other_contact(config);
        let billing_contact = map_billing_contact(config)?;
        let entity = customize_entity_descriptor(
            &config.get_list(keys::ORGANIZATION_NAMES),
            &config.get_list(keys::ORGANIZATION_DISPLAY_NAMES),
            &config.get_list(keys::ORGANIZATION_URLS),
            other_contact.as_ref(),
            billing_contact.as_ref(),
        );

        let descriptor = SpMetadataBuilder::new(baseline)
            .with_organization(entity.organization)
            .with_contact_persons(entity.contact_persons)
            .with_endpoints(customize_sp_descriptor(
                binding, binding, &endpoints, &endpoints,
            ))
            .with_attribute_consuming_service(build_attribute_consuming_service(
                config.attribute_consuming_service_index(),
                &config.get_list(keys::ATTRIBUTE_CONSUMING_SERVICE_NAME),
                realm.locale(),
                requested_attributes,
            ))
            .build();

        let xml = write_entity_descriptor(&descriptor)?;
        if !config.sign_sp_metadata() {
            return Ok(xml);
        }

        let signature_config = signature_config(config)?;
        let key = key_source.active_signing_key()?;
        debug!(realm = %realm.name, kid = %key.kid, "Signing SPID SP metadata");
        XmlSigner::new(key.private_key_der, Some(key.certificate_der))
            .with_key_id(key.kid)
            .with_config(signature_config)
            .sign(&xml)
    }
}

fn signature_config(config: &SpidProviderConfig) -> SpidResult<SignatureConfig> {
    let algorithm = match config.get_non_empty(keys::SIGNATURE_ALGORITHM) {
        Some(name) => SignatureAlgorithm::from_name(name).ok_or_else(|| {
            SpidError::InvalidConfiguration(format!("unsupported signature algorithm '{name}'"))
        })?,
        None => SignatureAlgorithm::default(),
    };
    let transformer = match config.get_non_empty(keys::XML_SIG_KEY_INFO_KEY_NAME_TRANSFORMER) {
        Some(name) => KeyNameTransformer::from_name(name).ok_or_else(|| {
            SpidError::InvalidConfiguration(format!("unsupported key name transformer '{name}'"))
        })?,
        None => KeyNameTransformer::default(),
    };

    Ok(SignatureConfig::with_algorithm(algorithm).with_key_name_transformer(transformer))
}
