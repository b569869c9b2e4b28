//! Exclusive XML canonicalization (without comments).
//!
//! Covers what enveloped metadata signatures need: the whole document is
//! the node set, optionally minus `ds:Signature` subtrees. Namespace
//! declarations are rendered only where visibly utilized and not already
//! rendered by an output ancestor.

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

use crate::error::{SpidError, SpidResult};
use crate::types::{XMLDSIG_NS, XML_NS};

/// A namespace declaration: `(prefix, uri)`, the default namespace having
/// an empty prefix.
type NsDecl = (String, String);

#[derive(Default)]
struct Scope {
    declared: Vec<NsDecl>,
    rendered: Vec<NsDecl>,
}

struct Canonicalizer {
    scopes: Vec<Scope>,
    output: String,
    exclude_signature: bool,
    skip_depth: usize,
}

/// Canonicalizes an XML document.
///
/// When `exclude_signature` is set, every `ds:Signature` element is left
/// out together with its content (the enveloped-signature transform).
///
/// # Errors
///
/// Returns an error if the document is not well-formed or uses an unbound
/// prefix.
pub fn canonicalize(xml: &str, exclude_signature: bool) -> SpidResult<String> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().expand_empty_elements = true;

    let mut c14n = Canonicalizer {
        scopes: Vec::new(),
        output: String::with_capacity(xml.len()),
        exclude_signature,
        skip_depth: 0,
    };

    loop {
        match reader.read_event()? {
            Event::Start(e) => c14n.start(&e)?,
            Event::End(e) => c14n.end(utf8(e.name().as_ref())?)?,
            Event::Text(e) => {
                if c14n.in_output() {
                    let text = e.unescape()?;
                    escape_text(&text, &mut c14n.output);
                }
            }
            Event::CData(e) => {
                if c14n.in_output() {
                    let text = std::str::from_utf8(&e)
                        .map_err(|err| SpidError::XmlParse(err.to_string()))?;
                    escape_text(text, &mut c14n.output);
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    if !c14n.scopes.is_empty() {
        return Err(SpidError::XmlParse("unexpected end of document".to_string()));
    }

    Ok(c14n.output)
}

impl Canonicalizer {
    /// Text is only part of the output inside the root element and outside
    /// skipped subtrees.
    fn in_output(&self) -> bool {
        !self.scopes.is_empty() && self.skip_depth == 0
    }

    fn start(&mut self, e: &BytesStart<'_>) -> SpidResult<()> {
        if self.skip_depth > 0 {
            self.skip_depth += 1;
            return Ok(());
        }

        let qname = utf8(e.name().as_ref())?.to_string();
        let mut scope = Scope::default();
        let mut attributes: Vec<(String, String)> = Vec::new();

        for attr in e.attributes() {
            let attr = attr?;
            let key = utf8(attr.key.as_ref())?.to_string();
            let value = attr.unescape_value()?.into_owned();
            if key == "xmlns" {
                scope.declared.push((String::new(), value));
            } else if let Some(prefix) = key.strip_prefix("xmlns:") {
                scope.declared.push((prefix.to_string(), value));
            } else {
                attributes.push((key, value));
            }
        }
        self.scopes.push(scope);

        let (element_prefix, local_name) = split_qname(&qname);
        if self.exclude_signature
            && local_name == "Signature"
            && self.lookup_declared(element_prefix).as_deref() == Some(XMLDSIG_NS)
        {
            self.scopes.pop();
            self.skip_depth = 1;
            return Ok(());
        }

        // Visibly utilized prefixes: the element's own and those of its
        // prefixed attributes.
        let mut utilized = vec![element_prefix.to_string()];
        for (key, _) in &attributes {
            let (prefix, _) = split_qname(key);
            if !prefix.is_empty() && prefix != "xml" && !utilized.iter().any(|p| p == prefix) {
                utilized.push(prefix.to_string());
            }
        }

        let mut ns_output: Vec<NsDecl> = Vec::new();
        for prefix in utilized {
            let uri = match self.lookup_declared(&prefix) {
                Some(uri) => uri,
                None if prefix.is_empty() => String::new(),
                None => {
                    return Err(SpidError::XmlParse(format!("unbound prefix '{prefix}'")));
                }
            };
            let rendered = self.lookup_rendered(&prefix).unwrap_or_default();
            if rendered != uri {
                ns_output.push((prefix, uri));
            }
        }
        ns_output.sort();

        let mut sorted_attributes = Vec::with_capacity(attributes.len());
        for (key, value) in attributes {
            let (prefix, local) = split_qname(&key);
            let ns = match prefix {
                "" => String::new(),
                "xml" => XML_NS.to_string(),
                p => self
                    .lookup_declared(p)
                    .ok_or_else(|| SpidError::XmlParse(format!("unbound prefix '{p}'")))?,
            };
            sorted_attributes.push((ns, local.to_string(), key.clone(), value));
        }
        sorted_attributes.sort_by(|a, b| (&a.0, &a.1).cmp(&(&b.0, &b.1)));

        self.output.push('<');
        self.output.push_str(&qname);
        for (prefix, uri) in &ns_output {
            self.output.push_str(" xmlns");
            if !prefix.is_empty() {
                self.output.push(':');
                self.output.push_str(prefix);
            }
            self.output.push_str("=\"");
            escape_attribute(uri, &mut self.output);
            self.output.push('"');
        }
        for (_, _, key, value) in &sorted_attributes {
            self.output.push(' ');
            self.output.push_str(key);
            self.output.push_str("=\"");
            escape_attribute(value, &mut self.output);
            self.output.push('"');
        }
        self.output.push('>');

        if let Some(scope) = self.scopes.last_mut() {
            scope.rendered = ns_output;
        }
        Ok(())
    }

    fn end(&mut self, qname: &str) -> SpidResult<()> {
        if self.skip_depth > 0 {
            self.skip_depth -= 1;
            return Ok(());
        }
        if self.scopes.pop().is_none() {
            return Err(SpidError::XmlParse(format!("unexpected end tag '{qname}'")));
        }
        self.output.push_str("</");
        self.output.push_str(qname);
        self.output.push('>');
        Ok(())
    }

    fn lookup_declared(&self, prefix: &str) -> Option<String> {
        self.scopes
            .iter()
            .rev()
            .flat_map(|s| s.declared.iter().rev())
            .find(|(p, _)| p == prefix)
            .map(|(_, uri)| uri.clone())
    }

    fn lookup_rendered(&self, prefix: &str) -> Option<String> {
        self.scopes
            .iter()
            .rev()
            .flat_map(|s| s.rendered.iter().rev())
            .find(|(p, _)| p == prefix)
            .map(|(_, uri)| uri.clone())
    }
}

fn utf8(bytes: &[u8]) -> SpidResult<&str> {
    std::str::from_utf8(bytes).map_err(|e| SpidError::XmlParse(e.to_string()))
}

fn split_qname(qname: &str) -> (&str, &str) {
    qname.split_once(':').unwrap_or(("", qname))
}

fn escape_text(text: &str, out: &mut String) {
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '\r' => out.push_str("&#xD;"),
            c => out.push(c),
        }
    }
}

fn escape_attribute(value: &str, out: &mut String) {
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '"' => out.push_str("&quot;"),
            '\t' => out.push_str("&#x9;"),
            '\n' => out.push_str("&#xA;"),
            '\r' => out.push_str("&#xD;"),
            c => out.push(c),
        }
    }
}
