//! Observation hooks for an evaluation run.
//!
//! Sinks never influence the result. The tracing sink is the default for the service; the
//! recording sink backs the CLI report and the tests.

use serde::Serialize;
use tracing::debug;

use super::applicability::NotApplicableReason;
use super::domain::{CarrierCode, CommissionType, ContractId, ProgramId, RuleId};
use super::itinerary::{FareComponentId, RuleSelection};
use super::request::ManualCommission;
use super::status::{status_label, FailReason};

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum DiagnosticEvent {
    NotApplicable {
        reason: NotApplicableReason,
    },
    ContractNotFound {
        carrier: CarrierCode,
    },
    ContractsFound {
        carrier: CarrierCode,
        contracts: Vec<ContractId>,
    },
    ProgramEvaluated {
        carrier: CarrierCode,
        component: FareComponentId,
        contract: ContractId,
        program: ProgramId,
        /// First failure only, or every failure when full program status is requested.
        failures: Vec<FailReason>,
    },
    RuleEvaluated {
        carrier: CarrierCode,
        component: FareComponentId,
        program: ProgramId,
        rule: RuleId,
        commission_type: CommissionType,
        failure: Option<FailReason>,
    },
    RecordSkipped {
        carrier: CarrierCode,
        detail: String,
    },
    ComponentCommission {
        carrier: CarrierCode,
        component: FareComponentId,
        amount: f64,
        selection: Option<RuleSelection>,
    },
    CarrierCommission {
        carrier: CarrierCode,
        amount: f64,
        contract: ContractId,
        commission_type: CommissionType,
    },
    CommissionNotProcessed {
        carrier: CarrierCode,
    },
    ManualCommissionApplied {
        carrier: CarrierCode,
        commission: ManualCommission,
    },
}

impl DiagnosticEvent {
    /// One-line report text; `detailed` selects the long failure descriptions.
    pub fn render(&self, detailed: bool) -> String {
        match self {
            Self::NotApplicable { reason } => format!("AGENCY COMMISSION NOT APPLICABLE - {reason}"),
            Self::ContractNotFound { carrier } => {
                format!("{carrier}: COMMISSION CONTRACT NOT FOUND")
            }
            Self::ContractsFound { carrier, contracts } => {
                let ids: Vec<String> = contracts.iter().map(ToString::to_string).collect();
                format!("{carrier}: COMMISSION CONTRACTS {}", ids.join(" "))
            }
            Self::ProgramEvaluated {
                carrier,
                component,
                contract,
                program,
                failures,
            } => format!(
                "{carrier} {component} CONTRACT {contract} PROGRAM {program}: {}",
                labels(failures, detailed)
            ),
            Self::RuleEvaluated {
                carrier,
                component,
                program,
                rule,
                commission_type,
                failure,
            } => format!(
                "{carrier} {component} PROGRAM {program} RULE {rule} {}: {}",
                commission_type.label(),
                label(failure, detailed)
            ),
            Self::RecordSkipped { carrier, detail } => format!("{carrier}: SKIPPED {detail}"),
            Self::ComponentCommission {
                carrier,
                component,
                amount,
                selection,
            } => match selection {
                Some(selection) => format!(
                    "{carrier} {component} COMMISSION {amount:.2} RULE {} {} {:.2}",
                    selection.rule_id,
                    selection.commission_type.label(),
                    selection.value
                ),
                None => format!("{carrier} {component} COMMISSION {amount:.2}"),
            },
            Self::CarrierCommission {
                carrier,
                amount,
                contract,
                commission_type,
            } => format!(
                "{carrier}: TOTAL COMMISSION {amount:.2} CONTRACT {contract} {}",
                commission_type.label()
            ),
            Self::CommissionNotProcessed { carrier } => {
                format!("{carrier}: AGENCY COMMISSION NOT PROCESSED")
            }
            Self::ManualCommissionApplied {
                carrier,
                commission,
            } => match commission {
                ManualCommission::Percent(value) => {
                    format!("{carrier}: AGENT COMMISSION {value:.2} PERCENT APPLIED")
                }
                ManualCommission::Amount(value) => {
                    format!("{carrier}: AGENT COMMISSION AMOUNT {value:.2} APPLIED")
                }
            },
        }
    }
}

fn label(failure: &Option<FailReason>, detailed: bool) -> &'static str {
    let status = match failure {
        Some(reason) => Err(*reason),
        None => Ok(()),
    };
    status_label(&status, detailed)
}

fn labels(failures: &[FailReason], detailed: bool) -> String {
    if failures.is_empty() {
        return label(&None, detailed).to_string();
    }
    failures
        .iter()
        .map(|reason| status_label(&Err(*reason), detailed))
        .collect::<Vec<_>>()
        .join(" / ")
}

pub trait DiagnosticSink {
    fn record(&mut self, event: DiagnosticEvent);
}

/// Forwards every event to `tracing` at debug level.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink {
    pub detailed: bool,
}

impl DiagnosticSink for TracingSink {
    fn record(&mut self, event: DiagnosticEvent) {
        debug!(diagnostic = %event.render(self.detailed), "commission diagnostic");
    }
}

#[derive(Debug, Default, Clone)]
pub struct RecordingSink {
    pub events: Vec<DiagnosticEvent>,
}

impl RecordingSink {
    pub fn render(&self, detailed: bool) -> Vec<String> {
        self.events
            .iter()
            .map(|event| event.render(detailed))
            .collect()
    }
}

impl DiagnosticSink for RecordingSink {
    fn record(&mut self, event: DiagnosticEvent) {
        self.events.push(event);
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl DiagnosticSink for NullSink {
    fn record(&mut self, _event: DiagnosticEvent) {}
}
