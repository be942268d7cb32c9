//! Pet Clinic - timed handler demo
//!
//! Seeds an in-memory clinic, drives every owner handler and both payment
//! paths once, then prints the collected timing metrics as JSON.

mod demo;

use anyhow::Context;
use serde::Serialize;
use std::sync::Arc;
use timing::{
    install_default_interceptor, BudgetViolation, FanoutSink, Interceptor, MetricsSink,
    MetricsSummary, ReportSink, TimingConfig, TracingSink,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Environment variable naming a JSON timing config file
const CONFIG_ENV: &str = "PETCLINIC_TIMING_CONFIG";

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct TimingReport {
    summary: MetricsSummary,
    violations: Vec<BudgetViolation>,
}

fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    tracing::info!("Starting pet clinic");

    let config = load_config()?;
    let metrics = Arc::new(MetricsSink::from_config(&config));
    let sink: Arc<dyn ReportSink> = Arc::new(
        FanoutSink::new()
            .with(Arc::new(TracingSink::with_budget(config.budget.clone())))
            .with(metrics.clone()),
    );

    let interceptor = Interceptor::from_config(&config, sink.clone());
    install_default_interceptor(interceptor.clone())?;

    demo::run(interceptor, sink)?;

    let report = TimingReport {
        summary: metrics.summary()?,
        violations: metrics.check_budget()?,
    };
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

/// Config path from the first argument, then the environment; defaults otherwise.
fn load_config() -> anyhow::Result<TimingConfig> {
    let Some(path) = std::env::args().nth(1).or_else(|| std::env::var(CONFIG_ENV).ok()) else {
        tracing::info!("No timing config given, using defaults");
        return Ok(TimingConfig::default());
    };

    tracing::info!(path = %path, "Loading timing config");
    TimingConfig::from_path(&path)
        .with_context(|| format!("failed to load timing config from {path}"))
}
