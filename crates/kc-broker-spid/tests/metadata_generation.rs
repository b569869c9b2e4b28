//! End-to-end metadata generation tests.

mod common;

use common::{parse, private_sp, public_sp, realm, signing_key, Node};
use kc_broker_spid::config::keys;
use kc_broker_spid::metadata::{SigningCertificate, SigningKey, SigningKeySource};
use kc_broker_spid::types::{attribute_name_formats, RequestedAttribute, SamlBinding};
use kc_broker_spid::{MetadataGenerator, RealmContext, SpidError, SpidProviderConfig, SpidResult};

fn generate(providers: &[SpidProviderConfig]) -> anyhow::Result<Node> {
    generate_with(&realm(), providers, &[])
}

fn generate_with(
    realm: &RealmContext,
    providers: &[SpidProviderConfig],
    requested: &[RequestedAttribute],
) -> anyhow::Result<Node> {
    common::init_tracing();
    let key = signing_key()?;
    let xml = MetadataGenerator::new().generate(realm, providers, requested, &key)?;
    parse(&xml)
}

fn contact<'a>(root: &'a Node, contact_type: &str) -> Option<&'a Node> {
    root.children_named("ContactPerson")
        .into_iter()
        .find(|c| c.attr("contactType") == Some(contact_type))
}

fn localized<'a>(nodes: &[&'a Node], lang: &str) -> Option<&'a str> {
    nodes
        .iter()
        .find(|n| n.attr("xml:lang") == Some(lang))
        .map(|n| n.text.as_str())
}

#[test]
fn public_administration_metadata() -> anyhow::Result<()> {
    let root = generate(&[public_sp("spid")])?;
    assert_eq!(root.name, "md:EntityDescriptor");
    assert!(root.attr("ID").is_some_and(|id| id.starts_with('_')));

    let organization = root.child("Organization").expect("organization");
    let names = organization.children_named("OrganizationName");
    assert_eq!(localized(&names, "en"), Some("Company name"));
    assert_eq!(localized(&names, "it"), Some("Nome azienda"));
    let urls = organization.children_named("OrganizationURL");
    assert_eq!(localized(&urls, "it"), Some("https://www.example.it"));

    let other = contact(&root, "other").expect("other contact");
    let extensions = other.child("Extensions").expect("extensions");
    assert_eq!(extensions.child_names(), vec!["IPACode", "Public"]);
    assert_eq!(extensions.child("IPACode").map(|n| n.text.as_str()), Some("IPACODE"));
    assert_eq!(
        extensions.child("IPACode").and_then(|n| n.attr("xmlns:spid")),
        Some("https://spid.gov.it/saml-extensions")
    );
    assert!(extensions.child("Private").is_none());
    assert_eq!(other.child("Company").map(|n| n.text.as_str()), Some("Comune di Roma"));
    assert_eq!(
        other.child("EmailAddress").map(|n| n.text.as_str()),
        Some("spid@comune.roma.it")
    );

    assert!(contact(&root, "billing").is_none());
    Ok(())
}

#[test]
fn public_administration_ignores_billing_fields() -> anyhow::Result<()> {
    let provider = public_sp("spid").with(keys::BILLING_CONTACT_COMPANY, "ACME");
    let root = generate(&[provider])?;
    assert_eq!(root.children_named("ContactPerson").len(), 1);
    Ok(())
}

#[test]
fn private_sp_metadata() -> anyhow::Result<()> {
    let root = generate(&[private_sp("spid")])?;
    assert_eq!(root.children_named("ContactPerson").len(), 2);

    let other = contact(&root, "other").expect("other contact");
    let extensions = other.child("Extensions").expect("extensions");
    assert_eq!(extensions.child_names(), vec!["VATNumber", "FiscalCode", "Private"]);
    assert_eq!(
        extensions.child("VATNumber").map(|n| n.text.as_str()),
        Some("IT86334519757")
    );
    assert!(extensions.child("Public").is_none());
    assert_eq!(
        other.child("TelephoneNumber").map(|n| n.text.as_str()),
        Some("+390612345678")
    );

    let billing = contact(&root, "billing").expect("billing contact");
    let cessionario = billing
        .find(&["Extensions", "CessionarioCommittente"])
        .expect("cessionario committente");
    assert_eq!(
        cessionario.attr("xmlns:fpa"),
        Some("https://spid.gov.it/invoicing-extensions")
    );
    let id_fiscale = cessionario
        .find(&["DatiAnagrafici", "IdFiscaleIVA"])
        .expect("IdFiscaleIVA");
    assert_eq!(id_fiscale.child("IdPaese").map(|n| n.text.as_str()), Some("IT"));
    assert_eq!(
        id_fiscale.child("IdCodice").map(|n| n.text.as_str()),
        Some("6334519757")
    );
    assert_eq!(
        cessionario
            .find(&["DatiAnagrafici", "Anagrafica", "Denominazione"])
            .map(|n| n.text.as_str()),
        Some("ACME")
    );

    let sede = cessionario.child("Sede").expect("sede");
    assert_eq!(
        sede.child_names(),
        vec!["Indirizzo", "NumeroCivico", "CAP", "Comune", "Provincia", "Nazione"]
    );
    assert_eq!(
        sede.child("Indirizzo").map(|n| n.text.as_str()),
        Some("via Galileo Galilei")
    );
    assert_eq!(billing.child("Company").map(|n| n.text.as_str()), Some("ACME Billing S.r.l."));
    Ok(())
}

#[test]
fn private_sp_with_short_vat_number_fails() -> anyhow::Result<()> {
    let provider = private_sp("spid").with(keys::OTHER_CONTACT_VAT_NUMBER, "IT123");
    let err = MetadataGenerator::new()
        .generate(&realm(), &[provider], &[], &signing_key()?)
        .unwrap_err();
    assert!(matches!(err, SpidError::InvalidConfiguration(_)));
    assert_eq!(err.http_status(), 500);
    Ok(())
}

#[test]
fn unconfigured_provider_has_no_contacts_or_organization() -> anyhow::Result<()> {
    let root = generate(&[SpidProviderConfig::new("spid")])?;
    assert!(root.children_named("ContactPerson").is_empty());
    assert!(root.child("Organization").is_none());
    assert_eq!(root.child_names(), vec!["SPSSODescriptor"]);
    Ok(())
}

#[test]
fn contacts_are_not_published_without_organization() -> anyhow::Result<()> {
    let provider = SpidProviderConfig::new("spid")
        .with(keys::OTHER_CONTACT_IPA_CODE, "IPACODE")
        .with(keys::OTHER_CONTACT_EMAIL, "spid@comune.roma.it");
    let root = generate(&[provider])?;
    assert!(root.child("Organization").is_none());
    assert!(root.children_named("ContactPerson").is_empty());
    Ok(())
}

#[test]
fn boolean_settings_ignore_case() -> anyhow::Result<()> {
    let provider = private_sp("spid").with(keys::OTHER_CONTACT_SP_PRIVATE, "TRUE");
    let root = generate(&[provider])?;
    assert!(contact(&root, "billing").is_some());
    Ok(())
}

/// A key manager holding an active key and a passive, rotated-out one.
struct RotatedKeys {
    active: SigningKey,
}

impl SigningKeySource for RotatedKeys {
    fn signing_certificates(&self) -> SpidResult<Vec<SigningCertificate>> {
        let passive = SigningCertificate {
            kid: "passive-kid".to_string(),
            active: false,
            ..self.active.certificate()
        };
        Ok(vec![self.active.certificate(), passive])
    }

    fn active_signing_key(&self) -> SpidResult<SigningKey> {
        Ok(self.active.clone())
    }
}

#[test]
fn passive_keys_are_not_offered_for_encryption() -> anyhow::Result<()> {
    common::init_tracing();
    let key_source = RotatedKeys {
        active: signing_key()?,
    };
    let provider = SpidProviderConfig::new("spid").with(keys::WANT_ASSERTIONS_ENCRYPTED, "true");
    let xml = MetadataGenerator::new().generate(&realm(), &[provider], &[], &key_source)?;
    let root = parse(&xml)?;

    let published: Vec<(Option<&str>, Option<&str>)> = root
        .child("SPSSODescriptor")
        .expect("sp descriptor")
        .children_named("KeyDescriptor")
        .iter()
        .map(|k| {
            (
                k.attr("use"),
                k.find(&["KeyInfo", "KeyName"]).map(|n| n.text.as_str()),
            )
        })
        .collect();
    assert_eq!(
        published,
        vec![
            (Some("signing"), Some(common::KID)),
            (Some("encryption"), Some(common::KID)),
            (Some("signing"), Some("passive-kid")),
        ]
    );
    Ok(())
}

#[test]
fn malformed_organization_url_is_skipped() -> anyhow::Result<()> {
    let provider = SpidProviderConfig::new("spid")
        .with(keys::ORGANIZATION_NAMES, "it|Nome azienda")
        .with(keys::ORGANIZATION_URLS, "en|not a url,it|https://www.example.it");
    let root = generate(&[provider])?;

    let urls = root
        .child("Organization")
        .expect("organization")
        .children_named("OrganizationURL");
    assert_eq!(urls.len(), 1);
    assert_eq!(urls[0].attr("xml:lang"), Some("it"));
    assert_eq!(urls[0].text, "https://www.example.it");
    Ok(())
}

#[test]
fn one_endpoint_per_provider() -> anyhow::Result<()> {
    let providers = [
        SpidProviderConfig::new("spid-c"),
        SpidProviderConfig::new("spid-a"),
        SpidProviderConfig::new("spid-disabled").with_enabled(false),
        SpidProviderConfig::new("spid-b"),
    ];
    let root = generate(&providers)?;
    let sp = root.child("SPSSODescriptor").expect("sp descriptor");

    let acs = sp.children_named("AssertionConsumerService");
    assert_eq!(acs.len(), 3);
    let indices: Vec<&str> = acs.iter().filter_map(|e| e.attr("index")).collect();
    assert_eq!(indices, vec!["0", "1", "2"]);
    assert_eq!(acs[0].attr("isDefault"), Some("true"));
    assert!(acs[1..].iter().all(|e| e.attr("isDefault").is_none()));

    let locations: Vec<&str> = acs.iter().filter_map(|e| e.attr("Location")).collect();
    assert_eq!(
        locations,
        vec![
            "https://sso.example.it/realms/spid/broker/spid-a/endpoint",
            "https://sso.example.it/realms/spid/broker/spid-b/endpoint",
            "https://sso.example.it/realms/spid/broker/spid-c/endpoint",
        ]
    );

    let slo = sp.children_named("SingleLogoutService");
    assert_eq!(slo.len(), 3);
    assert!(slo.iter().all(|e| e.attr("Binding") == Some(SamlBinding::HttpRedirect.uri())));
    Ok(())
}

#[test]
fn sp_descriptor_children_follow_schema_order() -> anyhow::Result<()> {
    let providers = [SpidProviderConfig::new("spid-a"), SpidProviderConfig::new("spid-b")];
    let root = generate(&providers)?;
    let sp = root.child("SPSSODescriptor").expect("sp descriptor");

    assert_eq!(
        sp.child_names(),
        vec![
            "KeyDescriptor",
            "SingleLogoutService",
            "SingleLogoutService",
            "NameIDFormat",
            "AssertionConsumerService",
            "AssertionConsumerService",
            "AttributeConsumingService",
        ]
    );
    assert_eq!(
        sp.attr("protocolSupportEnumeration"),
        Some("urn:oasis:names:tc:SAML:2.0:protocol")
    );
    assert_eq!(
        sp.child("NameIDFormat").map(|n| n.text.as_str()),
        Some("urn:oasis:names:tc:SAML:2.0:nameid-format:transient")
    );

    let key = sp.child("KeyDescriptor").expect("key descriptor");
    assert_eq!(key.attr("use"), Some("signing"));
    assert_eq!(
        key.find(&["KeyInfo", "KeyName"]).map(|n| n.text.as_str()),
        Some(common::KID)
    );
    assert!(key
        .find(&["KeyInfo", "X509Data", "X509Certificate"])
        .is_some_and(|n| n.text.starts_with("MII")));
    Ok(())
}

#[test]
fn post_binding_and_sp_flags() -> anyhow::Result<()> {
    let provider = SpidProviderConfig::new("spid")
        .with(keys::POST_BINDING_AUTHN_REQUEST, "true")
        .with(keys::WANT_AUTHN_REQUESTS_SIGNED, "true")
        .with(keys::WANT_ASSERTIONS_SIGNED, "true")
        .with(keys::WANT_ASSERTIONS_ENCRYPTED, "true");
    let root = generate(&[provider])?;
    let sp = root.child("SPSSODescriptor").expect("sp descriptor");

    assert_eq!(sp.attr("AuthnRequestsSigned"), Some("true"));
    assert_eq!(sp.attr("WantAssertionsSigned"), Some("true"));
    let post = SamlBinding::HttpPost.uri();
    assert_eq!(
        sp.child("AssertionConsumerService").and_then(|e| e.attr("Binding")),
        Some(post)
    );
    assert_eq!(
        sp.child("SingleLogoutService").and_then(|e| e.attr("Binding")),
        Some(post)
    );

    let uses: Vec<&str> = sp
        .children_named("KeyDescriptor")
        .iter()
        .filter_map(|k| k.attr("use"))
        .collect();
    assert_eq!(uses, vec!["signing", "encryption"]);
    Ok(())
}

#[test]
fn attribute_consuming_service() -> anyhow::Result<()> {
    let provider = SpidProviderConfig::new("spid")
        .with(keys::ATTRIBUTE_CONSUMING_SERVICE_INDEX, "3")
        .with(keys::ATTRIBUTE_CONSUMING_SERVICE_NAME, "it|Servizio online,Online service");
    let requested = [
        RequestedAttribute::new("fiscalNumber")
            .with_name_format(attribute_name_formats::BASIC)
            .with_required(true),
        RequestedAttribute::new("email").with_friendly_name("E-mail"),
    ];
    let realm = realm().with_default_locale("de");
    let root = generate_with(&realm, &[provider], &requested)?;

    let service = root
        .find(&["SPSSODescriptor", "AttributeConsumingService"])
        .expect("attribute consuming service");
    assert_eq!(service.attr("index"), Some("3"));
    assert_eq!(service.attr("isDefault"), Some("true"));

    let names = service.children_named("ServiceName");
    assert_eq!(localized(&names, "it"), Some("Servizio online"));
    assert_eq!(localized(&names, "de"), Some("Online service"));

    let attributes = service.children_named("RequestedAttribute");
    assert_eq!(attributes.len(), 2);
    assert_eq!(attributes[0].attr("Name"), Some("fiscalNumber"));
    assert_eq!(attributes[0].attr("NameFormat"), Some(attribute_name_formats::BASIC));
    assert_eq!(attributes[0].attr("isRequired"), Some("true"));
    assert_eq!(attributes[1].attr("FriendlyName"), Some("E-mail"));
    assert!(attributes[1].attr("isRequired").is_none());
    Ok(())
}

#[test]
fn configured_entity_id_is_used() -> anyhow::Result<()> {
    let provider = SpidProviderConfig::new("spid").with(keys::ENTITY_ID, "https://sp.example.it/spid");
    let root = generate(&[provider])?;
    assert_eq!(root.attr("entityID"), Some("https://sp.example.it/spid"));
    Ok(())
}

#[test]
fn realm_without_spid_providers_fails() -> anyhow::Result<()> {
    let mut saml = SpidProviderConfig::new("saml");
    saml.provider_id = "saml".to_string();

    let err = MetadataGenerator::new()
        .generate(&realm(), &[saml], &[], &signing_key()?)
        .unwrap_err();
    assert!(matches!(err, SpidError::NoIdentityProviders(_)));
    assert_eq!(err.http_status(), 404);
    Ok(())
}

#[test]
fn provider_configs_deserialize_from_json() -> anyhow::Result<()> {
    let provider: SpidProviderConfig = serde_json::from_value(serde_json::json!({
        "alias": "spid",
        "providerId": "spid",
        "enabled": true,
        "config": {
            "otherContactIpaCode": "IPACODE",
            "organizationNames": "it|Nome azienda"
        }
    }))?;
    let root = generate(&[provider])?;
    assert!(root.child("Organization").is_some());
    assert_eq!(root.children_named("ContactPerson").len(), 1);
    Ok(())
}
