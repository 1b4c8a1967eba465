use agency_commissions::commissions::scenario::{Scenario, ScenarioReport};
use agency_commissions::config::EngineConfig;
use agency_commissions::error::AppError;
use metrics_exporter_prometheus::PrometheusHandle;
use std::path::Path;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use tracing::info;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Shared by every commission request; the engine itself is built per scenario.
#[derive(Clone, Debug)]
pub(crate) struct CommissionState {
    pub(crate) engine: Arc<EngineConfig>,
}

impl CommissionState {
    pub(crate) fn new(engine: EngineConfig) -> Self {
        Self {
            engine: Arc::new(engine),
        }
    }
}

/// Accepts a two-character airline code and normalizes it to upper case.
pub(crate) fn parse_carrier(raw: &str) -> Result<String, String> {
    let code = raw.trim().to_ascii_uppercase();
    if code.len() == 2 && code.chars().all(|c| c.is_ascii_alphanumeric()) {
        Ok(code)
    } else {
        Err(format!("'{raw}' is not a two-character carrier code"))
    }
}

pub(crate) fn evaluate_scenario(
    mut scenario: Scenario,
    carrier: Option<&str>,
    config: EngineConfig,
) -> Result<ScenarioReport, AppError> {
    if let Some(carrier) = carrier {
        scenario.restrict_to_carrier(carrier);
    }

    let report = scenario.evaluate(config)?;
    info!(
        carriers = report.ledger.carrier_amounts.len(),
        "commission scenario evaluated"
    );
    Ok(report)
}

pub(crate) fn evaluate_scenario_file(
    path: &Path,
    carrier: Option<&str>,
    config: EngineConfig,
) -> Result<ScenarioReport, AppError> {
    let scenario = Scenario::load(path)?;
    evaluate_scenario(scenario, carrier, config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn carrier_codes_are_normalized() {
        assert_eq!(parse_carrier(" aa ").as_deref(), Ok("AA"));
        assert_eq!(parse_carrier("9w").as_deref(), Ok("9W"));
    }

    #[test]
    fn malformed_carrier_codes_are_rejected() {
        for raw in ["", "A", "AAL", "A-"] {
            match parse_carrier(raw) {
                Err(message) => assert!(message.contains("carrier code")),
                other => panic!("expected rejection for {raw:?}, got {other:?}"),
            }
        }
    }
}
