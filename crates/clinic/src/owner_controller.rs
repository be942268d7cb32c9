//! Owner handlers
//!
//! Every handler is marked with `#[log_execution_time]`, so each call is
//! timed through the controller's [`Interceptor`] and reported to its sink.

use crate::error::{ClinicError, ClinicResult};
use crate::form::{BindingErrors, OwnerForm};
use crate::model::Owner;
use crate::repository::{OwnerRepository, VisitRepository};
use crate::view::{
    View, VIEWS_FIND_OWNERS, VIEWS_OWNERS_LIST, VIEWS_OWNER_CREATE_OR_UPDATE_FORM,
    VIEWS_OWNER_DETAILS,
};
use serde_json::json;
use std::sync::Arc;
use timing::{log_execution_time, Instrumented, Interceptor};

pub struct OwnerController {
    owners: Arc<dyn OwnerRepository>,
    visits: Arc<dyn VisitRepository>,
    interceptor: Interceptor,
}

impl Instrumented for OwnerController {
    fn interceptor(&self) -> &Interceptor {
        &self.interceptor
    }
}

impl OwnerController {
    pub fn new(
        owners: Arc<dyn OwnerRepository>,
        visits: Arc<dyn VisitRepository>,
        interceptor: Interceptor,
    ) -> Self {
        Self {
            owners,
            visits,
            interceptor,
        }
    }

    /// `GET /owners/new`
    #[log_execution_time]
    pub fn init_creation_form(&self) -> ClinicResult<View> {
        Ok(View::template(
            VIEWS_OWNER_CREATE_OR_UPDATE_FORM,
            json!({ "owner": serde_json::to_value(OwnerForm::default())? }),
        ))
    }

    /// `POST /owners/new`
    #[log_execution_time]
    pub fn process_creation_form(&self, form: OwnerForm) -> ClinicResult<View> {
        let errors = form.validate();
        if errors.has_errors() {
            return form_with_errors(&form, &errors);
        }

        let id = self.owners.save(form.into_owner())?;
        tracing::info!(target: "clinic::owners", owner_id = id, "owner created");
        Ok(View::redirect(format!("/owners/{id}")))
    }

    /// `GET /owners/find`
    #[log_execution_time]
    pub fn init_find_form(&self) -> ClinicResult<View> {
        Ok(View::template(
            VIEWS_FIND_OWNERS,
            json!({ "owner": serde_json::to_value(OwnerForm::default())? }),
        ))
    }

    /// `GET /owners?firstName=...`
    ///
    /// A missing name searches for everyone.
    #[log_execution_time]
    pub fn process_find_form(&self, first_name: Option<&str>) -> ClinicResult<View> {
        let first_name = first_name.unwrap_or("");
        let results = self.owners.find_by_first_name(first_name)?;

        match results.as_slice() {
            [] => {
                let mut errors = BindingErrors::new();
                errors.reject_value("firstName", "notFound", "not found");
                Ok(View::template(
                    VIEWS_FIND_OWNERS,
                    json!({
                        "owner": { "firstName": first_name },
                        "errors": serde_json::to_value(&errors)?,
                    }),
                ))
            }
            [owner] => Ok(View::redirect(owner_location(owner.id)?)),
            selections => Ok(View::template(
                VIEWS_OWNERS_LIST,
                json!({ "selections": serde_json::to_value(selections)? }),
            )),
        }
    }

    /// `GET /owners/{ownerId}/edit`
    #[log_execution_time]
    pub fn init_update_owner_form(&self, owner_id: u32) -> ClinicResult<View> {
        let owner = self.load_owner(owner_id)?;
        Ok(View::template(
            VIEWS_OWNER_CREATE_OR_UPDATE_FORM,
            json!({ "owner": serde_json::to_value(&owner)? }),
        ))
    }

    /// `POST /owners/{ownerId}/edit`
    #[log_execution_time]
    pub fn process_update_owner_form(&self, owner_id: u32, form: OwnerForm) -> ClinicResult<View> {
        let errors = form.validate();
        if errors.has_errors() {
            return form_with_errors(&form, &errors);
        }

        let mut owner = self.load_owner(owner_id)?;
        form.apply_to(&mut owner);
        self.owners.save(owner)?;
        tracing::info!(target: "clinic::owners", owner_id, "owner updated");
        Ok(View::redirect(format!("/owners/{owner_id}")))
    }

    /// `GET /owners/{ownerId}`
    #[log_execution_time]
    pub fn show_owner(&self, owner_id: u32) -> ClinicResult<View> {
        let mut owner = self.load_owner(owner_id)?;
        for pet in &mut owner.pets {
            if let Some(pet_id) = pet.id {
                pet.visits = self.visits.find_by_pet_id(pet_id)?;
            }
        }
        Ok(View::template(
            VIEWS_OWNER_DETAILS,
            json!({ "owner": serde_json::to_value(&owner)? }),
        ))
    }

    fn load_owner(&self, owner_id: u32) -> ClinicResult<Owner> {
        self.owners
            .find_by_id(owner_id)?
            .ok_or(ClinicError::OwnerNotFound(owner_id))
    }
}

fn form_with_errors(form: &OwnerForm, errors: &BindingErrors) -> ClinicResult<View> {
    Ok(View::template(
        VIEWS_OWNER_CREATE_OR_UPDATE_FORM,
        json!({
            "owner": serde_json::to_value(form)?,
            "errors": serde_json::to_value(errors)?,
        }),
    ))
}

fn owner_location(id: Option<u32>) -> ClinicResult<String> {
    id.map(|id| format!("/owners/{id}"))
        .ok_or_else(|| ClinicError::Storage("stored owner has no id".to_string()))
}
