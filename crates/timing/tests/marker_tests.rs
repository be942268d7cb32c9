//! Integration tests for the `#[log_execution_time]` marker
//! Marked methods report through their owner's interceptor; marked free
//! functions report through the process-wide default.

use std::sync::{Arc, OnceLock};
use timing::{
    default_interceptor, install_default_interceptor, log_execution_time, Instrumented,
    Interceptor, MemorySink, Outcome,
};

/// Sink behind the default interceptor of this test binary.
fn default_sink() -> &'static Arc<MemorySink> {
    static SINK: OnceLock<Arc<MemorySink>> = OnceLock::new();
    SINK.get_or_init(|| {
        let sink = Arc::new(MemorySink::new());
        install_default_interceptor(Interceptor::from_arc(sink.clone()))
            .expect("default interceptor installed once");
        sink
    })
}

#[derive(Debug, PartialEq, Eq)]
enum VisitError {
    Closed,
}

struct Ward {
    interceptor: Interceptor,
    visits: Vec<String>,
}

impl Instrumented for Ward {
    fn interceptor(&self) -> &Interceptor {
        &self.interceptor
    }
}

impl Ward {
    fn new() -> (Self, Arc<MemorySink>) {
        let sink = Arc::new(MemorySink::new());
        let ward = Self {
            interceptor: Interceptor::from_arc(sink.clone()),
            visits: Vec::new(),
        };
        (ward, sink)
    }

    #[log_execution_time]
    fn visit_count(&self) -> usize {
        self.visits.len()
    }

    #[log_execution_time]
    fn add_visit(&mut self, description: &str) {
        self.visits.push(description.to_string());
    }

    #[log_execution_time]
    fn schedule(&self, day: u8) -> Result<u8, VisitError> {
        if day > 5 {
            return Err(VisitError::Closed);
        }
        Ok(day)
    }

    #[log_execution_time]
    fn into_visits(self) -> Vec<String> {
        self.visits
    }
}

struct Kennel {
    interceptor: Interceptor,
}

impl Instrumented for Kennel {
    fn interceptor(&self) -> &Interceptor {
        &self.interceptor
    }
}

impl Kennel {
    #[log_execution_time]
    fn admit(&self) -> &'static str {
        "dog"
    }
}

struct Cattery {
    interceptor: Interceptor,
}

impl Instrumented for Cattery {
    fn interceptor(&self) -> &Interceptor {
        &self.interceptor
    }
}

impl Cattery {
    #[log_execution_time]
    fn admit(&self) -> &'static str {
        "cat"
    }
}

#[log_execution_time]
fn parse_weight(raw: &str) -> Result<u32, std::num::ParseIntError> {
    let weight = raw.trim().parse::<u32>()?;
    Ok(weight)
}

#[log_execution_time]
fn greeting(name: &str) -> String {
    format!("Welcome, {name}")
}

#[test]
fn marked_method_reports_through_owner() {
    let (mut ward, sink) = Ward::new();

    ward.add_visit("rabies shot");
    assert_eq!(ward.visit_count(), 1);

    let reports = sink.measurements().unwrap();
    let names: Vec<&str> = reports.iter().map(|m| m.operation()).collect();
    assert_eq!(
        names,
        vec![
            "marker_tests::Ward::add_visit",
            "marker_tests::Ward::visit_count"
        ]
    );
}

#[test]
fn same_method_name_on_different_types_reports_separately() {
    let sink = Arc::new(MemorySink::new());
    let interceptor = Interceptor::from_arc(sink.clone());
    let kennel = Kennel {
        interceptor: interceptor.clone(),
    };
    let cattery = Cattery { interceptor };

    assert_eq!(kennel.admit(), "dog");
    assert_eq!(cattery.admit(), "cat");

    let reports = sink.measurements().unwrap();
    let names: Vec<&str> = reports.iter().map(|m| m.operation()).collect();
    assert_eq!(
        names,
        vec!["marker_tests::Kennel::admit", "marker_tests::Cattery::admit"]
    );
}

#[test]
fn marked_result_method_reports_failure() {
    let (ward, sink) = Ward::new();

    assert_eq!(ward.schedule(2), Ok(2));
    assert_eq!(ward.schedule(6), Err(VisitError::Closed));

    let outcomes: Vec<Outcome> = sink
        .measurements()
        .unwrap()
        .iter()
        .map(|m| m.outcome())
        .collect();
    assert_eq!(outcomes, vec![Outcome::Completed, Outcome::Failed]);
}

#[test]
fn marked_consuming_method_works() {
    let (mut ward, sink) = Ward::new();
    ward.add_visit("checkup");

    assert_eq!(ward.into_visits(), vec!["checkup".to_string()]);
    assert_eq!(sink.measurements_for("marker_tests::Ward::into_visits").unwrap().len(), 1);
}

#[test]
fn marked_free_function_uses_default_interceptor() {
    let sink = default_sink();

    assert_eq!(parse_weight(" 12 "), Ok(12));
    assert!(parse_weight("heavy").is_err());
    assert_eq!(greeting("Leo"), "Welcome, Leo");

    let parse_reports = sink.measurements_for("marker_tests::parse_weight").unwrap();
    assert_eq!(parse_reports.len(), 2);
    assert_eq!(parse_reports[0].outcome(), Outcome::Completed);
    assert_eq!(parse_reports[1].outcome(), Outcome::Failed);

    assert_eq!(
        sink.measurements_for("marker_tests::greeting").unwrap().len(),
        1
    );
    assert!(default_interceptor().is_enabled());
}
