//! # Attribute Targets
//!
//! The synchronizer never talks to a DOM directly. It writes through the
//! [`AttributeTarget`] trait, which any host can implement: a `web_sys`
//! element, a virtual-DOM node, or the in-memory [`ElementAttributes`] used by
//! the CLI and the tests.

use crate::error::{DatattrError, Result};
use indexmap::IndexMap;

/// Anything that carries string attributes.
pub trait AttributeTarget {
    /// Create or overwrite an attribute.
    fn set_attribute(&mut self, name: &str, value: &str) -> Result<()>;

    /// Remove an attribute. Removing a missing attribute is a no-op.
    fn remove_attribute(&mut self, name: &str) -> Result<()>;
}

impl<T: AttributeTarget + ?Sized> AttributeTarget for &mut T {
    fn set_attribute(&mut self, name: &str, value: &str) -> Result<()> {
        (**self).set_attribute(name, value)
    }

    fn remove_attribute(&mut self, name: &str) -> Result<()> {
        (**self).remove_attribute(name)
    }
}

/// In-memory element attributes, kept in the order they were first set.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ElementAttributes {
    attributes: IndexMap<String, String>,
}

impl ElementAttributes {
    pub fn new() -> Self {
        Self::default()
    }

    /// Case-insensitive, like the names `set_attribute` stores.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.attributes
            .get(&name.to_ascii_lowercase())
            .map(String::as_str)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.attributes.contains_key(&name.to_ascii_lowercase())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.attributes
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.attributes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.attributes.is_empty()
    }
}

impl AttributeTarget for ElementAttributes {
    fn set_attribute(&mut self, name: &str, value: &str) -> Result<()> {
        validate_name(name)?;
        // HTML attribute names are case-insensitive
        self.attributes
            .insert(name.to_ascii_lowercase(), value.to_string());
        Ok(())
    }

    fn remove_attribute(&mut self, name: &str) -> Result<()> {
        self.attributes.shift_remove(&name.to_ascii_lowercase());
        Ok(())
    }
}

/// Rejects names a browser would refuse in `setAttribute`.
pub fn validate_name(name: &str) -> Result<()> {
    let invalid = name.is_empty()
        || name.chars().any(|c| {
            c.is_whitespace()
                || c.is_control()
                || matches!(c, '"' | '\'' | '>' | '<' | '/' | '=')
        });
    if invalid {
        return Err(DatattrError::InvalidAttributeName(name.to_string()));
    }
    Ok(())
}
