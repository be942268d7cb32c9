//! View descriptors returned by controller handlers

use serde::Serialize;
use serde_json::Value;

pub const VIEWS_OWNER_CREATE_OR_UPDATE_FORM: &str = "owners/createOrUpdateOwnerForm";
pub const VIEWS_FIND_OWNERS: &str = "owners/findOwners";
pub const VIEWS_OWNERS_LIST: &str = "owners/ownersList";
pub const VIEWS_OWNER_DETAILS: &str = "owners/ownerDetails";

/// What a handler wants rendered: a template with its model, or a redirect.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum View {
    Template { name: &'static str, model: Value },
    Redirect { location: String },
}

impl View {
    pub fn template(name: &'static str, model: Value) -> Self {
        View::Template { name, model }
    }

    pub fn redirect(location: impl Into<String>) -> Self {
        View::Redirect {
            location: location.into(),
        }
    }

    /// Template name, if this view renders one.
    pub fn template_name(&self) -> Option<&'static str> {
        match self {
            View::Template { name, .. } => Some(*name),
            View::Redirect { .. } => None,
        }
    }

    pub fn model(&self) -> Option<&Value> {
        match self {
            View::Template { model, .. } => Some(model),
            View::Redirect { .. } => None,
        }
    }

    /// Redirect target, if this view is a redirect.
    pub fn redirect_location(&self) -> Option<&str> {
        match self {
            View::Redirect { location } => Some(location),
            View::Template { .. } => None,
        }
    }
}
