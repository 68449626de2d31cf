//! Organization domain model
//!
//! This module provides the Organization entity as callers submit it for
//! creation and update. Reads come back from the store as composed JSON
//! documents and are not deserialized into this type.

use serde::{Deserialize, Serialize};

/// An organization represents a tenant that owns repositories and members.
///
/// The user who creates an organization becomes its first owner. Organizations
/// are never hard-deleted by the manager.
///
/// # Examples
///
/// ```
/// use hub_org::Organization;
///
/// let org = Organization::new("acme-corp")
///     .with_display_name("Acme Corp")
///     .with_home_url("https://acme.example.com");
/// assert_eq!(org.name, "acme-corp");
/// assert_eq!(org.display_name.as_deref(), Some("Acme Corp"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Organization {
    /// Unique, URL-friendly name
    pub name: String,

    /// Human-readable name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,

    /// Optional description
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Primary website URL
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub home_url: Option<String>,

    /// ID of the organization's logo in the image store
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logo_image_id: Option<String>,
}

impl Organization {
    /// Creates an organization with only its name set.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Set the display name.
    pub fn with_display_name(mut self, display_name: impl Into<String>) -> Self {
        self.display_name = Some(display_name.into());
        self
    }

    /// Set the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Set the home URL.
    pub fn with_home_url(mut self, home_url: impl Into<String>) -> Self {
        self.home_url = Some(home_url.into());
        self
    }

    /// Set the logo image ID.
    pub fn with_logo_image_id(mut self, logo_image_id: impl Into<String>) -> Self {
        self.logo_image_id = Some(logo_image_id.into());
        self
    }

    /// JSON document handed to the store.
    pub fn to_document(&self) -> serde_json::Value {
        serde_json::json!(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_organization_creation() {
        let org = Organization::new("org1");
        assert_eq!(org.name, "org1");
        assert!(org.display_name.is_none());
        assert!(org.logo_image_id.is_none());
    }

    #[test]
    fn test_document_skips_unset_fields() {
        let doc = Organization::new("org1")
            .with_description("Packages for org1")
            .to_document();

        assert_eq!(doc["name"], "org1");
        assert_eq!(doc["description"], "Packages for org1");
        assert!(doc.get("display_name").is_none());
        assert!(doc.get("logo_image_id").is_none());
    }

    #[test]
    fn test_deserialization() {
        let org: Organization = serde_json::from_str(
            r#"{"name":"org1","display_name":"Org 1","home_url":"https://org1.example.com"}"#,
        )
        .unwrap();
        assert_eq!(org.name, "org1");
        assert_eq!(org.home_url.as_deref(), Some("https://org1.example.com"));
        assert!(org.description.is_none());
    }
}
