//! Common test utilities and fixtures.

#![allow(dead_code)]

use anyhow::Context;
use quick_xml::events::Event;
use quick_xml::Reader;

use kc_broker_spid::config::keys;
use kc_broker_spid::metadata::SigningKey;
use kc_broker_spid::{RealmContext, SpidProviderConfig};

const KEY_PEM: &str = include_str!("../fixtures/sp-signing-key.pem");
const CERT_PEM: &str = include_str!("../fixtures/sp-signing-cert.pem");

/// Key ID of the fixture key.
pub const KID: &str = "test-kid";

/// Initializes tracing once for the test binary.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter("kc_broker_spid=debug")
        .with_test_writer()
        .try_init();
}

/// The fixture signing key.
pub fn signing_key() -> anyhow::Result<SigningKey> {
    Ok(SigningKey::from_pem(KID, KEY_PEM, CERT_PEM)?)
}

/// The test realm.
pub fn realm() -> RealmContext {
    RealmContext::new("spid", "https://sso.example.it")
}

/// A public administration SP.
pub fn public_sp(alias: &str) -> SpidProviderConfig {
    SpidProviderConfig::new(alias)
        .with(keys::OTHER_CONTACT_SP_PRIVATE, "false")
        .with(keys::OTHER_CONTACT_IPA_CODE, "IPACODE")
        .with(keys::OTHER_CONTACT_COMPANY, "Comune di Roma")
        .with(keys::OTHER_CONTACT_EMAIL, "spid@comune.roma.it")
        .with(keys::ORGANIZATION_NAMES, "en|Company name,it|Nome azienda")
        .with(keys::ORGANIZATION_DISPLAY_NAMES, "en|Company,it|Azienda")
        .with(keys::ORGANIZATION_URLS, "en|https://www.example.it/en,it|https://www.example.it")
}

/// A private SP with a billing contact.
pub fn private_sp(alias: &str) -> SpidProviderConfig {
    SpidProviderConfig::new(alias)
        .with(keys::ORGANIZATION_NAMES, "it|ACME S.p.A.")
        .with(keys::OTHER_CONTACT_SP_PRIVATE, "true")
        .with(keys::OTHER_CONTACT_VAT_NUMBER, "IT86334519757")
        .with(keys::OTHER_CONTACT_FISCAL_CODE, "86334519757")
        .with(keys::OTHER_CONTACT_COMPANY, "ACME S.p.A.")
        .with(keys::OTHER_CONTACT_PHONE, "+390612345678")
        .with(keys::BILLING_CONTACT_COMPANY, "ACME Billing S.r.l.")
        .with(keys::BILLING_CONTACT_EMAIL, "billing@acme.it")
        .with(keys::BILLING_CONTACT_REGISTRY_NAME, "ACME")
        .with(keys::BILLING_CONTACT_SITE_ADDRESS, "via Galileo Galilei")
        .with(keys::BILLING_CONTACT_SITE_NUMBER, "12")
        .with(keys::BILLING_CONTACT_SITE_POSTAL_CODE, "00100")
        .with(keys::BILLING_CONTACT_SITE_CITY, "Roma")
        .with(keys::BILLING_CONTACT_SITE_PROVINCE, "RM")
        .with(keys::BILLING_CONTACT_SITE_COUNTRY, "IT")
}

/// A parsed XML element.
#[derive(Debug, Clone)]
pub struct Node {
    /// Qualified name.
    pub name: String,
    /// Attributes in document order.
    pub attributes: Vec<(String, String)>,
    /// Concatenated text content.
    pub text: String,
    /// Child elements.
    pub children: Vec<Node>,
}

impl Node {
    /// Name without prefix.
    pub fn local_name(&self) -> &str {
        self.name.rsplit(':').next().unwrap_or(&self.name)
    }

    /// Attribute value by qualified name.
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    /// First child with the given local name.
    pub fn child(&self, local_name: &str) -> Option<&Node> {
        self.children.iter().find(|c| c.local_name() == local_name)
    }

    /// All children with the given local name.
    pub fn children_named(&self, local_name: &str) -> Vec<&Node> {
        self.children
            .iter()
            .filter(|c| c.local_name() == local_name)
            .collect()
    }

    /// All descendants with the given local name, in document order.
    pub fn descendants(&self, local_name: &str) -> Vec<&Node> {
        let mut found = Vec::new();
        for child in &self.children {
            if child.local_name() == local_name {
                found.push(child);
            }
            found.extend(child.descendants(local_name));
        }
        found
    }

    /// Follows a path of child local names.
    pub fn find(&self, path: &[&str]) -> Option<&Node> {
        path.iter().try_fold(self, |node, name| node.child(name))
    }

    /// Local names of the children, in document order.
    pub fn child_names(&self) -> Vec<&str> {
        self.children.iter().map(Node::local_name).collect()
    }
}

/// Parses a document into its root element.
pub fn parse(xml: &str) -> anyhow::Result<Node> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);
    reader.config_mut().expand_empty_elements = true;

    let mut stack: Vec<Node> = Vec::new();
    loop {
        match reader.read_event()? {
            Event::Start(e) => {
                let mut attributes = Vec::new();
                for attr in e.attributes() {
                    let attr = attr?;
                    attributes.push((
                        String::from_utf8(attr.key.as_ref().to_vec())?,
                        attr.unescape_value()?.into_owned(),
                    ));
                }
                stack.push(Node {
                    name: String::from_utf8(e.name().as_ref().to_vec())?,
                    attributes,
                    text: String::new(),
                    children: Vec::new(),
                });
            }
            Event::Text(t) => {
                if let Some(node) = stack.last_mut() {
                    node.text.push_str(&t.unescape()?);
                }
            }
            Event::End(_) => {
                let node = stack.pop().context("unbalanced end tag")?;
                match stack.last_mut() {
                    Some(parent) => parent.children.push(node),
                    None => return Ok(node),
                }
            }
            Event::Eof => anyhow::bail!("document has no root element"),
            _ => {}
        }
    }
}
