//! Metadata serialization.
//!
//! Writes an [`EntityDescriptor`] as an indented UTF-8 document with the
//! `md` and `ds` prefixes bound on the root. Extension elements bind
//! their own prefix wherever their parent is in another namespace.
//!
//! Carriage returns in text, and tabs and line breaks in attribute
//! values, are written as character references so that a parser's
//! end-of-line and attribute-value normalization leaves the signed
//! content unchanged.

use std::borrow::Cow;

use quick_xml::escape::escape;
use quick_xml::events::attributes::Attribute;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::name::QName;
use quick_xml::Writer;
use tracing::debug;

use crate::error::SpidResult;
use crate::types::{
    AttributeConsumingService, ContactPerson, EntityDescriptor, KeyDescriptor, Organization,
    SpSsoDescriptor, MD_NS, SAMLP_NS, XMLDSIG_NS,
};
use crate::xml::{Namespace, XmlElement};

type XmlWriter = Writer<Vec<u8>>;

const INDENT_SIZE: usize = 4;

/// Serializes an entity descriptor.
///
/// # Errors
///
/// Returns an error if writing to the in-memory buffer fails.
pub fn write_entity_descriptor(descriptor: &EntityDescriptor) -> SpidResult<String> {
    let mut writer = Writer::new_with_indent(Vec::new(), b' ', INDENT_SIZE);
    writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;

    let mut root = BytesStart::new("md:EntityDescriptor");
    root.push_attribute(attribute("xmlns:md", MD_NS));
    root.push_attribute(attribute("xmlns:ds", XMLDSIG_NS));
    root.push_attribute(attribute("ID", descriptor.id.as_str()));
    root.push_attribute(attribute("entityID", descriptor.entity_id.as_str()));
    writer.write_event(Event::Start(root))?;

    write_sp_sso_descriptor(&mut writer, &descriptor.sp_sso_descriptor)?;
    if let Some(organization) = &descriptor.organization {
        write_organization(&mut writer, organization)?;
    }
    for contact in &descriptor.contact_persons {
        write_contact_person(&mut writer, contact)?;
    }

    writer.write_event(Event::End(BytesEnd::new("md:EntityDescriptor")))?;

    let xml = String::from_utf8(writer.into_inner())?;
    debug!(id = %descriptor.id, bytes = xml.len(), "Serialized SP metadata");
    Ok(xml)
}

fn write_sp_sso_descriptor(writer: &mut XmlWriter, sp: &SpSsoDescriptor) -> SpidResult<()> {
    let mut start = BytesStart::new("md:SPSSODescriptor");
    start.push_attribute(attribute("protocolSupportEnumeration", SAMLP_NS));
    start.push_attribute(attribute("AuthnRequestsSigned", bool_str(sp.authn_requests_signed)));
    start.push_attribute(attribute("WantAssertionsSigned", bool_str(sp.want_assertions_signed)));
    writer.write_event(Event::Start(start))?;

    for key in &sp.key_descriptors {
        write_key_descriptor(writer, key)?;
    }

    for slo in &sp.single_logout_services {
        let mut el = BytesStart::new("md:SingleLogoutService");
        el.push_attribute(attribute("Binding", slo.binding.uri()));
        el.push_attribute(attribute("Location", slo.location.as_str()));
        writer.write_event(Event::Empty(el))?;
    }

    for format in &sp.name_id_formats {
        write_text_element(writer, BytesStart::new("md:NameIDFormat"), format)?;
    }

    for acs in &sp.assertion_consumer_services {
        let index = acs.index.to_string();
        let mut el = BytesStart::new("md:AssertionConsumerService");
        el.push_attribute(attribute("Binding", acs.binding.uri()));
        el.push_attribute(attribute("Location", acs.location.as_str()));
        el.push_attribute(attribute("index", index.as_str()));
        if acs.is_default {
            el.push_attribute(attribute("isDefault", "true"));
        }
        writer.write_event(Event::Empty(el))?;
    }

    for service in &sp.attribute_consuming_services {
        write_attribute_consuming_service(writer, service)?;
    }

    writer.write_event(Event::End(BytesEnd::new("md:SPSSODescriptor")))?;
    Ok(())
}

fn write_key_descriptor(writer: &mut XmlWriter, key: &KeyDescriptor) -> SpidResult<()> {
    let mut start = BytesStart::new("md:KeyDescriptor");
    start.push_attribute(attribute("use", key.key_use.as_str()));
    writer.write_event(Event::Start(start))?;
    writer.write_event(Event::Start(BytesStart::new("ds:KeyInfo")))?;

    if let Some(key_name) = &key.key_name {
        write_text_element(writer, BytesStart::new("ds:KeyName"), key_name)?;
    }
    writer.write_event(Event::Start(BytesStart::new("ds:X509Data")))?;
    write_text_element(writer, BytesStart::new("ds:X509Certificate"), &key.certificate)?;
    writer.write_event(Event::End(BytesEnd::new("ds:X509Data")))?;

    writer.write_event(Event::End(BytesEnd::new("ds:KeyInfo")))?;
    writer.write_event(Event::End(BytesEnd::new("md:KeyDescriptor")))?;
    Ok(())
}

fn write_attribute_consuming_service(
    writer: &mut XmlWriter,
    service: &AttributeConsumingService,
) -> SpidResult<()> {
    let index = service.index.to_string();
    let mut start = BytesStart::new("md:AttributeConsumingService");
    start.push_attribute(attribute("index", index.as_str()));
    if service.is_default {
        start.push_attribute(attribute("isDefault", "true"));
    }
    writer.write_event(Event::Start(start))?;

    for name in &service.service_names {
        let mut el = BytesStart::new("md:ServiceName");
        el.push_attribute(attribute("xml:lang", name.lang.as_str()));
        write_text_element(writer, el, &name.value)?;
    }

    for attr in &service.requested_attributes {
        let mut el = BytesStart::new("md:RequestedAttribute");
        el.push_attribute(attribute("Name", attr.name.as_str()));
        if let Some(friendly_name) = &attr.friendly_name {
            el.push_attribute(attribute("FriendlyName", friendly_name.as_str()));
        }
        if let Some(name_format) = &attr.name_format {
            el.push_attribute(attribute("NameFormat", name_format.as_str()));
        }
        if attr.is_required {
            el.push_attribute(attribute("isRequired", "true"));
        }
        writer.write_event(Event::Empty(el))?;
    }

    writer.write_event(Event::End(BytesEnd::new("md:AttributeConsumingService")))?;
    Ok(())
}

fn write_organization(writer: &mut XmlWriter, organization: &Organization) -> SpidResult<()> {
    writer.write_event(Event::Start(BytesStart::new("md:Organization")))?;

    let groups = [
        ("md:OrganizationName", &organization.names),
        ("md:OrganizationDisplayName", &organization.display_names),
        ("md:OrganizationURL", &organization.urls),
    ];
    for (tag, values) in groups {
        for value in values {
            let mut el = BytesStart::new(tag);
            el.push_attribute(attribute("xml:lang", value.lang.as_str()));
            write_text_element(writer, el, &value.value)?;
        }
    }

    writer.write_event(Event::End(BytesEnd::new("md:Organization")))?;
    Ok(())
}

fn write_contact_person(writer: &mut XmlWriter, contact: &ContactPerson) -> SpidResult<()> {
    let mut start = BytesStart::new("md:ContactPerson");
    start.push_attribute(attribute("contactType", contact.contact_type.as_str()));
    writer.write_event(Event::Start(start))?;

    if !contact.extensions.is_empty() {
        writer.write_event(Event::Start(BytesStart::new("md:Extensions")))?;
        for element in &contact.extensions {
            write_extension(writer, element, None)?;
        }
        writer.write_event(Event::End(BytesEnd::new("md:Extensions")))?;
    }

    if let Some(company) = &contact.company {
        write_text_element(writer, BytesStart::new("md:Company"), company)?;
    }
    for email in &contact.email_addresses {
        write_text_element(writer, BytesStart::new("md:EmailAddress"), email)?;
    }
    for phone in &contact.telephone_numbers {
        write_text_element(writer, BytesStart::new("md:TelephoneNumber"), phone)?;
    }

    writer.write_event(Event::End(BytesEnd::new("md:ContactPerson")))?;
    Ok(())
}

fn write_extension(
    writer: &mut XmlWriter,
    element: &XmlElement,
    parent: Option<Namespace>,
) -> SpidResult<()> {
    let name = element.qualified_name();
    let mut start = BytesStart::new(name.as_str());
    if parent != Some(element.namespace) {
        let xmlns = format!("xmlns:{}", element.namespace.prefix);
        start.push_attribute(attribute(xmlns.as_str(), element.namespace.uri));
    }

    if element.is_empty() {
        writer.write_event(Event::Empty(start))?;
        return Ok(());
    }

    writer.write_event(Event::Start(start))?;
    if let Some(text) = &element.text {
        writer.write_event(Event::Text(BytesText::from_escaped(escape_text(text))))?;
    }
    for child in &element.children {
        write_extension(writer, child, Some(element.namespace))?;
    }
    writer.write_event(Event::End(BytesEnd::new(name.as_str())))?;
    Ok(())
}

fn write_text_element(writer: &mut XmlWriter, start: BytesStart<'_>, text: &str) -> SpidResult<()> {
    let end = start.to_end().into_owned();
    writer.write_event(Event::Start(start))?;
    writer.write_event(Event::Text(BytesText::from_escaped(escape_text(text))))?;
    writer.write_event(Event::End(end))?;
    Ok(())
}

fn attribute<'a>(key: &'a str, value: &str) -> Attribute<'a> {
    Attribute {
        key: QName(key.as_bytes()),
        value: Cow::Owned(escape_attribute(value).into_bytes()),
    }
}

/// Escapes element content, keeping `\r` as a character reference.
pub(crate) fn escape_text(value: &str) -> String {
    escape(value).replace('\r', "&#13;")
}

fn escape_attribute(value: &str) -> String {
    escape(value)
        .replace('\t', "&#9;")
        .replace('\n', "&#10;")
        .replace('\r', "&#13;")
}

const fn bool_str(value: bool) -> &'static str {
    if value {
        "true"
    } else {
        "false"
    }
}
