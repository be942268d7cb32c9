//! Integration tests for the owner handlers
//! Each handler is driven through its public API and must both behave like
//! a plain handler and leave exactly one timing report per call.

use chrono::NaiveDate;
use clinic::view::{
    VIEWS_FIND_OWNERS, VIEWS_OWNERS_LIST, VIEWS_OWNER_CREATE_OR_UPDATE_FORM, VIEWS_OWNER_DETAILS,
};
use clinic::{
    ClinicError, InMemoryOwnerRepository, InMemoryVisitRepository, Owner, OwnerController,
    OwnerForm, OwnerRepository, Pet, Visit, VisitRepository,
};
use std::sync::Arc;
use timing::{Interceptor, MemorySink, Outcome};

/// Test harness with seeded repositories and a capturing sink
struct Clinic {
    controller: OwnerController,
    owners: Arc<InMemoryOwnerRepository>,
    sink: Arc<MemorySink>,
}

impl Clinic {
    fn new() -> Self {
        let owners = Arc::new(InMemoryOwnerRepository::new());
        let visits = Arc::new(InMemoryVisitRepository::new());

        let george = Owner::new("George", "Franklin", "110 W. Liberty St.", "Madison", "6085551023")
            .with_pet(Pet::new("Leo", "cat", NaiveDate::from_ymd_opt(2010, 9, 7)));
        owners.save(george).unwrap();
        owners
            .save(Owner::new("Betty", "Davis", "638 Cardinal Ave.", "Sun Prairie", "6085551749"))
            .unwrap();
        owners
            .save(Owner::new("Harold", "Davis", "563 Friendly St.", "Windsor", "6085553198"))
            .unwrap();

        let leo = owners.find_by_id(1).unwrap().unwrap().pets[0].id.unwrap();
        visits
            .save(Visit::new(leo, NaiveDate::from_ymd_opt(2013, 1, 1).unwrap(), "rabies shot"))
            .unwrap();

        let sink = Arc::new(MemorySink::new());
        let controller = OwnerController::new(
            owners.clone(),
            visits,
            Interceptor::from_arc(sink.clone()),
        );

        Self {
            controller,
            owners,
            sink,
        }
    }

    fn reported(&self, handler: &str) -> Vec<Outcome> {
        self.sink
            .measurements_for(&format!("clinic::owner_controller::OwnerController::{handler}"))
            .unwrap()
            .iter()
            .map(|m| m.outcome())
            .collect()
    }
}

fn form(first_name: &str, telephone: &str) -> OwnerForm {
    OwnerForm {
        first_name: first_name.to_string(),
        last_name: "Black".to_string(),
        address: "1450 Oak Blvd.".to_string(),
        city: "Monona".to_string(),
        telephone: telephone.to_string(),
    }
}

#[test]
fn creation_form_renders_empty_owner() {
    let clinic = Clinic::new();
    let view = clinic.controller.init_creation_form().unwrap();

    assert_eq!(view.template_name(), Some(VIEWS_OWNER_CREATE_OR_UPDATE_FORM));
    assert_eq!(view.model().unwrap()["owner"]["firstName"], "");
    assert_eq!(clinic.reported("init_creation_form"), vec![Outcome::Completed]);
}

#[test]
fn valid_creation_redirects_to_new_owner() {
    let clinic = Clinic::new();
    let view = clinic
        .controller
        .process_creation_form(form("Jeff", "6085555387"))
        .unwrap();

    assert_eq!(view.redirect_location(), Some("/owners/4"));
    assert_eq!(clinic.owners.len(), 4);
    assert_eq!(clinic.reported("process_creation_form"), vec![Outcome::Completed]);
}

#[test]
fn invalid_creation_rerenders_form_with_errors() {
    let clinic = Clinic::new();
    let view = clinic
        .controller
        .process_creation_form(form("Jeff", "not-a-phone"))
        .unwrap();

    assert_eq!(view.template_name(), Some(VIEWS_OWNER_CREATE_OR_UPDATE_FORM));
    let errors = &view.model().unwrap()["errors"]["errors"];
    assert_eq!(errors[0]["field"], "telephone");
    assert_eq!(clinic.owners.len(), 3);
}

#[test]
fn find_form_renders() {
    let clinic = Clinic::new();
    let view = clinic.controller.init_find_form().unwrap();
    assert_eq!(view.template_name(), Some(VIEWS_FIND_OWNERS));
}

#[test]
fn find_without_name_lists_everyone() {
    let clinic = Clinic::new();
    let view = clinic.controller.process_find_form(None).unwrap();

    assert_eq!(view.template_name(), Some(VIEWS_OWNERS_LIST));
    assert_eq!(view.model().unwrap()["selections"].as_array().unwrap().len(), 3);
}

#[test]
fn find_single_match_redirects() {
    let clinic = Clinic::new();
    let view = clinic.controller.process_find_form(Some("Geo")).unwrap();
    assert_eq!(view.redirect_location(), Some("/owners/1"));
}

#[test]
fn find_no_match_reports_not_found() {
    let clinic = Clinic::new();
    let view = clinic.controller.process_find_form(Some("Unknown")).unwrap();

    assert_eq!(view.template_name(), Some(VIEWS_FIND_OWNERS));
    let model = view.model().unwrap();
    assert_eq!(model["errors"]["errors"][0]["code"], "notFound");
    assert_eq!(model["owner"]["firstName"], "Unknown");
}

#[test]
fn update_form_for_unknown_owner_fails_and_is_reported() {
    let clinic = Clinic::new();
    let err = clinic.controller.init_update_owner_form(99).unwrap_err();

    assert!(matches!(err, ClinicError::OwnerNotFound(99)));
    assert_eq!(clinic.reported("init_update_owner_form"), vec![Outcome::Failed]);
}

#[test]
fn update_keeps_pets_and_redirects() {
    let clinic = Clinic::new();
    let view = clinic
        .controller
        .process_update_owner_form(1, OwnerForm {
            city: "Middleton".to_string(),
            ..OwnerForm::from(&clinic.owners.find_by_id(1).unwrap().unwrap())
        })
        .unwrap();

    assert_eq!(view.redirect_location(), Some("/owners/1"));
    let owner = clinic.owners.find_by_id(1).unwrap().unwrap();
    assert_eq!(owner.city, "Middleton");
    assert_eq!(owner.pets.len(), 1);
}

#[test]
fn show_owner_attaches_visits() {
    let clinic = Clinic::new();
    let view = clinic.controller.show_owner(1).unwrap();

    assert_eq!(view.template_name(), Some(VIEWS_OWNER_DETAILS));
    let visits = &view.model().unwrap()["owner"]["pets"][0]["visits"];
    assert_eq!(visits[0]["description"], "rabies shot");
    assert_eq!(clinic.reported("show_owner"), vec![Outcome::Completed]);
}

#[test]
fn every_handler_call_is_reported_once() {
    let clinic = Clinic::new();
    let c = &clinic.controller;

    c.init_creation_form().unwrap();
    c.init_find_form().unwrap();
    c.process_find_form(Some("Davis")).unwrap();
    c.show_owner(2).unwrap();
    let _ = c.show_owner(42);

    assert_eq!(clinic.sink.len(), 5);
}

#[test]
fn disabled_interceptor_changes_nothing_but_reporting() {
    let sink = Arc::new(MemorySink::new());
    let mut interceptor = Interceptor::from_arc(sink.clone());
    interceptor.set_enabled(false);
    let controller = OwnerController::new(
        Arc::new(InMemoryOwnerRepository::new()),
        Arc::new(InMemoryVisitRepository::new()),
        interceptor,
    );

    let view = controller.process_creation_form(form("Carlos", "6085557683")).unwrap();

    assert_eq!(view.redirect_location(), Some("/owners/1"));
    assert!(sink.is_empty());
}
