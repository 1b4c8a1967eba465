use crate::infra::{evaluate_scenario, evaluate_scenario_file};
use agency_commissions::commissions::engine::{CarrierOutcome, CommissionOutcome};
use agency_commissions::commissions::request::ManualCommission;
use agency_commissions::commissions::scenario::{Scenario, ScenarioReport};
use agency_commissions::config::{AppConfig, EngineConfig};
use agency_commissions::error::AppError;
use clap::Args;
use std::path::PathBuf;

/// Two-component round trip with an any-carrier contract competing against the carrier's own.
pub(crate) const SAMPLE_SCENARIO: &str = include_str!("../demos/sample_scenario.json");

#[derive(Args, Debug)]
pub(crate) struct EvaluateArgs {
    /// Scenario document (JSON) holding reference data, request, and fare path
    #[arg(long)]
    pub(crate) scenario: PathBuf,
    /// Only evaluate this validating carrier
    #[arg(long, value_parser = crate::infra::parse_carrier)]
    pub(crate) carrier: Option<String>,
    /// Print long failure descriptions in the diagnostic trace
    #[arg(long)]
    pub(crate) detailed: bool,
    /// Print the report as JSON instead of text
    #[arg(long)]
    pub(crate) json: bool,
}

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Only evaluate this validating carrier
    #[arg(long, value_parser = crate::infra::parse_carrier)]
    pub(crate) carrier: Option<String>,
    /// Print the report as JSON instead of text
    #[arg(long)]
    pub(crate) json: bool,
}

fn engine_config(detailed: bool) -> Result<EngineConfig, AppError> {
    let mut engine = AppConfig::load()?.engine;
    engine.detailed_diagnostics |= detailed;
    Ok(engine)
}

pub(crate) fn run_evaluate(args: EvaluateArgs) -> Result<(), AppError> {
    let EvaluateArgs {
        scenario,
        carrier,
        detailed,
        json,
    } = args;

    let report = evaluate_scenario_file(&scenario, carrier.as_deref(), engine_config(detailed)?)?;
    print_report(&report, json);
    Ok(())
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let DemoArgs { carrier, json } = args;

    let scenario = Scenario::from_json(SAMPLE_SCENARIO)?;
    if !json {
        println!("Agency commission demo");
        println!(
            "- Agency {} selling {} from {}",
            scenario
                .request
                .agent
                .as_ref()
                .and_then(|agent| agent.agency_location.as_deref())
                .unwrap_or("-"),
            scenario.fare_path.validating_carrier,
            scenario.request.point_of_sale().unwrap_or("-"),
        );
        println!(
            "- {} fare components | {} contracts | {} rules",
            scenario.fare_path.components.len(),
            scenario.reference.contracts.len(),
            scenario.reference.rules.len()
        );
    }

    let report = evaluate_scenario(scenario, carrier.as_deref(), engine_config(true)?)?;
    print_report(&report, json);
    Ok(())
}

fn print_report(report: &ScenarioReport, json: bool) {
    if json {
        match serde_json::to_string_pretty(report) {
            Ok(json) => println!("{json}"),
            Err(err) => println!("Report unavailable: {err}"),
        }
        return;
    }

    for line in render_report(report) {
        println!("{line}");
    }
}

pub(crate) fn render_report(report: &ScenarioReport) -> Vec<String> {
    let mut lines = Vec::new();

    match &report.outcome {
        CommissionOutcome::NotApplicable { reason } => {
            lines.push(format!("\nAgency commission not applicable: {reason}"));
        }
        CommissionOutcome::Evaluated {
            payment_currency,
            carriers,
        } => {
            lines.push(format!("\nCommission summary ({payment_currency})"));
            if carriers.is_empty() {
                lines.push("- No validating carrier evaluated".to_string());
            }
            for (carrier, outcome) in carriers {
                lines.push(match outcome {
                    CarrierOutcome::Commission(commission) => format!(
                        "- {carrier}: {:.2} from contract {} ({})",
                        commission.total,
                        commission.contract,
                        commission.commission_type.label()
                    ),
                    CarrierOutcome::ManualCommission {
                        commission: ManualCommission::Percent(value),
                    } => format!("- {carrier}: agent commission {value:.2}% stands"),
                    CarrierOutcome::ManualCommission {
                        commission: ManualCommission::Amount(value),
                    } => format!("- {carrier}: agent commission amount {value:.2} stands"),
                    CarrierOutcome::NoContracts => format!("- {carrier}: no contracts"),
                    CarrierOutcome::NoCommission => format!("- {carrier}: no commission"),
                });
            }
        }
    }

    for (component, per_carrier) in &report.ledger.component_commissions {
        for (carrier, commission) in per_carrier {
            let rule = commission
                .selection
                .as_ref()
                .map(|selection| format!(" via rule {}", selection.rule_id))
                .unwrap_or_default();
            lines.push(format!(
                "  {component} {carrier}: {:.2}{rule}",
                commission.amount
            ));
        }
    }

    if !report.diagnostics.is_empty() {
        lines.push("\nDiagnostic trace".to_string());
        lines.extend(report.diagnostics.iter().map(|line| format!("  {line}")));
    }

    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sample_scenario_produces_a_commission_summary() {
        let scenario = Scenario::from_json(SAMPLE_SCENARIO).expect("sample parses");
        let report = evaluate_scenario(scenario, None, EngineConfig::default())
            .expect("sample evaluates");

        let lines = render_report(&report);
        assert_eq!(lines[0], "\nCommission summary (EUR)");
        assert!(lines
            .iter()
            .any(|line| line == "- AA: 161.00 from contract 1 (NO PRORATION ALLOWED)"));
        assert!(lines.iter().any(|line| line == "  FC1 AA: 92.00 via rule 101"));
        assert!(lines.iter().any(|line| line == "  FC2 AA: 69.00 via rule 102"));
        assert!(lines.iter().any(|line| line == "\nDiagnostic trace"));
    }

    #[test]
    fn filtered_sample_reports_no_carriers() {
        let scenario = Scenario::from_json(SAMPLE_SCENARIO).expect("sample parses");
        let report = evaluate_scenario(scenario, Some("UA"), EngineConfig::default())
            .expect("sample evaluates");

        let lines = render_report(&report);
        assert!(lines
            .iter()
            .any(|line| line == "- No validating carrier evaluated"));
    }
}
