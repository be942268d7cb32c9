//! Owner form binding and validation

use crate::model::Owner;
use serde::{Deserialize, Serialize};

/// One rejected form field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldError {
    pub field: String,
    pub code: String,
    pub message: String,
}

/// Field errors collected while binding a form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BindingErrors {
    errors: Vec<FieldError>,
}

impl BindingErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reject_value(
        &mut self,
        field: impl Into<String>,
        code: impl Into<String>,
        message: impl Into<String>,
    ) {
        self.errors.push(FieldError {
            field: field.into(),
            code: code.into(),
            message: message.into(),
        });
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    pub fn field_errors(&self, field: &str) -> impl Iterator<Item = &FieldError> + '_ {
        let field = field.to_string();
        self.errors.iter().filter(move |e| e.field == field)
    }

    pub fn errors(&self) -> &[FieldError] {
        &self.errors
    }
}

/// Owner fields as submitted by the create and edit forms.
///
/// The id is never bound from a form; it comes from the request path.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct OwnerForm {
    pub first_name: String,
    pub last_name: String,
    pub address: String,
    pub city: String,
    pub telephone: String,
}

impl OwnerForm {
    /// Check required fields and the telephone format (1 to 10 digits).
    pub fn validate(&self) -> BindingErrors {
        let mut errors = BindingErrors::new();
        for (field, value) in [
            ("firstName", &self.first_name),
            ("lastName", &self.last_name),
            ("address", &self.address),
            ("city", &self.city),
        ] {
            if value.trim().is_empty() {
                errors.reject_value(field, "NotEmpty", "must not be empty");
            }
        }

        let telephone = self.telephone.trim();
        if telephone.is_empty() {
            errors.reject_value("telephone", "NotEmpty", "must not be empty");
        } else if telephone.len() > 10 || !telephone.chars().all(|c| c.is_ascii_digit()) {
            errors.reject_value(
                "telephone",
                "Digits",
                "numeric value out of bounds (<10 digits>.<0 digits> expected)",
            );
        }
        errors
    }

    /// Build a new, unsaved owner from the trimmed fields.
    pub fn into_owner(self) -> Owner {
        let form = self.trimmed();
        Owner::new(
            form.first_name,
            form.last_name,
            form.address,
            form.city,
            form.telephone,
        )
    }

    /// Copy the trimmed form fields onto an existing owner, keeping its id
    /// and pets.
    pub fn apply_to(self, owner: &mut Owner) {
        let form = self.trimmed();
        owner.first_name = form.first_name;
        owner.last_name = form.last_name;
        owner.address = form.address;
        owner.city = form.city;
        owner.telephone = form.telephone;
    }

    /// The values `validate` checks.
    fn trimmed(self) -> Self {
        Self {
            first_name: self.first_name.trim().to_string(),
            last_name: self.last_name.trim().to_string(),
            address: self.address.trim().to_string(),
            city: self.city.trim().to_string(),
            telephone: self.telephone.trim().to_string(),
        }
    }
}

impl From<&Owner> for OwnerForm {
    fn from(owner: &Owner) -> Self {
        Self {
            first_name: owner.first_name.clone(),
            last_name: owner.last_name.clone(),
            address: owner.address.clone(),
            city: owner.city.clone(),
            telephone: owner.telephone.clone(),
        }
    }
}
