//! Namespaced extension elements.
//!
//! SPID contact extensions are small trees of elements in the `spid` and
//! `fpa` namespaces. Leaves are built from optional configuration values
//! and vanish when the value is absent or empty; containers are always
//! built and keep whatever leaves survive.

use crate::types::{FPA_NS, SPID_NS};

/// A namespace prefix binding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Namespace {
    /// Prefix used in qualified names.
    pub prefix: &'static str,
    /// Namespace URI.
    pub uri: &'static str,
}

/// SPID SAML extensions.
pub const SPID: Namespace = Namespace {
    prefix: "spid",
    uri: SPID_NS,
};

/// SPID e-invoicing extensions.
pub const FPA: Namespace = Namespace {
    prefix: "fpa",
    uri: FPA_NS,
};

/// An element in an extension namespace.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct XmlElement {
    /// Element namespace.
    pub namespace: Namespace,
    /// Local name.
    pub name: String,
    /// Text content.
    pub text: Option<String>,
    /// Child elements.
    pub children: Vec<XmlElement>,
}

impl XmlElement {
    /// Creates an element with no content.
    #[must_use]
    pub fn new(namespace: Namespace, name: impl Into<String>) -> Self {
        Self {
            namespace,
            name: name.into(),
            text: None,
            children: Vec::new(),
        }
    }

    /// Creates a text leaf, or `None` if the value is absent or empty.
    #[must_use]
    pub fn text(namespace: Namespace, name: &str, value: Option<&str>) -> Option<Self> {
        let value = value.filter(|v| !v.is_empty())?;
        Some(Self {
            text: Some(value.to_string()),
            ..Self::new(namespace, name)
        })
    }

    /// Appends a child element.
    #[must_use]
    pub fn with_child(mut self, child: Self) -> Self {
        self.children.push(child);
        self
    }

    /// Appends a child element if present.
    #[must_use]
    pub fn with_optional_child(mut self, child: Option<Self>) -> Self {
        self.children.extend(child);
        self
    }

    /// Returns `prefix:name`.
    #[must_use]
    pub fn qualified_name(&self) -> String {
        format!("{}:{}", self.namespace.prefix, self.name)
    }

    /// Returns true if the element has neither text nor children.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.text.is_none() && self.children.is_empty()
    }

    /// Finds the first child with the given local name.
    #[must_use]
    pub fn child(&self, name: &str) -> Option<&Self> {
        self.children.iter().find(|c| c.name == name)
    }

    /// Follows a path of local names down the tree.
    #[must_use]
    pub fn find(&self, path: &[&str]) -> Option<&Self> {
        path.iter().try_fold(self, |node, name| node.child(name))
    }
}
