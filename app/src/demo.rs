//! Demo run over seeded in-memory repositories

use chrono::NaiveDate;
use clinic::{
    Cash, ClinicResult, InMemoryOwnerRepository, InMemoryVisitRepository, Owner,
    OwnerController, OwnerForm, OwnerRepository, Pet, Store, TimedPayment, Visit,
    VisitRepository,
};
use std::sync::Arc;
use timing::{log_execution_time, Interceptor, ReportSink};

/// Drive every owner handler and both payment paths once.
pub fn run(interceptor: Interceptor, sink: Arc<dyn ReportSink>) -> ClinicResult<()> {
    let owners = Arc::new(InMemoryOwnerRepository::new());
    let visits = Arc::new(InMemoryVisitRepository::new());
    seed(&*owners, &*visits)?;

    let controller = OwnerController::new(owners, visits, interceptor);
    run_owner_handlers(&controller)?;
    run_store(sink)?;
    Ok(())
}

#[log_execution_time]
fn seed(owners: &dyn OwnerRepository, visits: &dyn VisitRepository) -> ClinicResult<()> {
    let date = |y, m, d| NaiveDate::from_ymd_opt(y, m, d);

    let franklin = owners.save(
        Owner::new("George", "Franklin", "110 W. Liberty St.", "Madison", "6085551023")
            .with_pet(Pet::new("Leo", "cat", date(2010, 9, 7))),
    )?;
    owners.save(
        Owner::new("Betty", "Davis", "638 Cardinal Ave.", "Sun Prairie", "6085551749")
            .with_pet(Pet::new("Basil", "hamster", date(2012, 8, 6))),
    )?;
    owners.save(
        Owner::new("Eduardo", "Rodriquez", "2693 Commerce St.", "McFarland", "6085558763")
            .with_pet(Pet::new("Rosy", "dog", date(2011, 4, 17)))
            .with_pet(Pet::new("Jewel", "dog", date(2010, 3, 7))),
    )?;

    if let Some(leo) = owners
        .find_by_id(franklin)?
        .and_then(|owner| owner.pets.first().and_then(|pet| pet.id))
    {
        for (on, description) in [(date(2013, 1, 1), "rabies shot"), (date(2013, 1, 4), "spayed")] {
            if let Some(on) = on {
                visits.save(Visit::new(leo, on, description))?;
            }
        }
    }
    Ok(())
}

fn run_owner_handlers(controller: &OwnerController) -> ClinicResult<()> {
    controller.init_creation_form()?;
    let created = controller.process_creation_form(OwnerForm {
        first_name: "Jean".to_string(),
        last_name: "Coleman".to_string(),
        address: "105 N. Lake St.".to_string(),
        city: "Monona".to_string(),
        telephone: "6085552654".to_string(),
    })?;
    tracing::info!(view = ?created, "creation form processed");

    controller.init_find_form()?;
    controller.process_find_form(None)?;
    controller.process_find_form(Some("Geo"))?;
    controller.process_find_form(Some("Nobody"))?;

    controller.init_update_owner_form(1)?;
    controller.process_update_owner_form(
        2,
        OwnerForm {
            first_name: "Betty".to_string(),
            last_name: "Davis".to_string(),
            address: "638 Cardinal Ave.".to_string(),
            city: "Waunakee".to_string(),
            telephone: "6085551749".to_string(),
        },
    )?;
    controller.show_owner(1)?;

    if let Err(err) = controller.show_owner(404) {
        tracing::warn!(error = %err, "owner lookup failed");
    }
    Ok(())
}

fn run_store(sink: Arc<dyn ReportSink>) -> ClinicResult<()> {
    Store::new(Cash::new()).buy_something(100)?;

    let store = Store::new(TimedPayment::new(Cash::with_balance(500), sink));
    store.buy_something(100)?;
    if let Err(err) = store.buy_something(1000) {
        tracing::warn!(error = %err, "purchase declined");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use timing::{MemorySink, Outcome};

    #[test]
    fn test_demo_reports_handlers_and_payments() {
        let sink = Arc::new(MemorySink::new());
        run(Interceptor::from_arc(sink.clone()), sink.clone()).unwrap();

        let show = sink
            .measurements_for("clinic::owner_controller::OwnerController::show_owner")
            .unwrap();
        assert_eq!(show.len(), 2);
        assert_eq!(show[1].outcome(), Outcome::Failed);

        let payments = sink.measurements_for(clinic::payment::PAY_OPERATION).unwrap();
        assert_eq!(payments.len(), 2);
        assert_eq!(payments[1].outcome(), Outcome::Failed);
    }
}
