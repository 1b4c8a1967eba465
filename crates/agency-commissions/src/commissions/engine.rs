use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{debug, info};

use super::amount::AmountCalculator;
use super::applicability::{check_applicability, NotApplicableReason};
use super::collector::RuleCollector;
use super::diagnostics::{DiagnosticEvent, DiagnosticSink, NullSink};
use super::discovery::discover_contracts;
use super::domain::CarrierCode;
use super::itinerary::{CommissionLedger, ComponentCommission, FarePath};
use super::maximizer::{maximize, CarrierCommission};
use super::program_validator::ProgramValidator;
use super::reference::{CommissionDataSource, CurrencyConverter, CurrencyError, Geography};
use super::request::{ManualCommission, PricingRequest};
use super::rule_validator::RuleValidator;
use super::table::MatchTable;
use crate::config::EngineConfig;

#[derive(Debug, thiserror::Error)]
pub enum CommissionError {
    #[error("currency conversion failed: {0}")]
    Currency(#[from] CurrencyError),
    #[error("no payment currency available for the ticketing agent")]
    MissingPaymentCurrency,
}

/// What evaluation concluded for one validating carrier.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "result", rename_all = "snake_case")]
pub enum CarrierOutcome {
    Commission(CarrierCommission),
    /// The engine found nothing; the agent's own commission stands.
    ManualCommission { commission: ManualCommission },
    NoContracts,
    NoCommission,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum CommissionOutcome {
    NotApplicable {
        reason: NotApplicableReason,
    },
    Evaluated {
        payment_currency: String,
        carriers: BTreeMap<CarrierCode, CarrierOutcome>,
    },
}

impl CommissionOutcome {
    pub fn carrier(&self, carrier: &str) -> Option<&CarrierOutcome> {
        match self {
            Self::Evaluated { carriers, .. } => carriers.get(carrier),
            Self::NotApplicable { .. } => None,
        }
    }

    pub fn amount_for(&self, carrier: &str) -> Option<f64> {
        match self.carrier(carrier) {
            Some(CarrierOutcome::Commission(commission)) => Some(commission.total),
            _ => None,
        }
    }
}

/// Agency commission evaluation over shared reference data.
pub struct CommissionEngine<D, C, G> {
    data: Arc<D>,
    converter: Arc<C>,
    geography: Arc<G>,
    config: EngineConfig,
}

impl<D, C, G> CommissionEngine<D, C, G>
where
    D: CommissionDataSource,
    C: CurrencyConverter,
    G: Geography,
{
    pub fn new(data: Arc<D>, converter: Arc<C>, geography: Arc<G>, config: EngineConfig) -> Self {
        Self {
            data,
            converter,
            geography,
            config,
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Evaluates every candidate validating carrier and stores the winners on the fare path.
    ///
    /// Any ledger already on the fare path is replaced, so repeated evaluation of the same
    /// inputs yields the same ledger.
    pub fn evaluate(
        &self,
        request: &PricingRequest,
        fare_path: &mut FarePath,
        sink: &mut dyn DiagnosticSink,
    ) -> Result<CommissionOutcome, CommissionError> {
        fare_path.commissions = CommissionLedger::default();

        let filter = request.diagnostic_filter();
        let mut quiet = NullSink;
        let sink: &mut dyn DiagnosticSink = if filter.allows_passenger(&fare_path.passenger_type) {
            sink
        } else {
            &mut quiet
        };

        let handshakes = request
            .agency_location()
            .map(|agency| self.data.security_handshakes(agency))
            .unwrap_or_default();

        if let Err(reason) = check_applicability(request, fare_path, &handshakes) {
            debug!(%reason, "agency commission not applicable");
            sink.record(DiagnosticEvent::NotApplicable { reason });
            return Ok(CommissionOutcome::NotApplicable { reason });
        }

        let agency = request.agency_location().unwrap_or_default();
        let payment_currency = request
            .payment_currency()
            .ok_or(CommissionError::MissingPaymentCurrency)?
            .to_string();

        let carriers: Vec<CarrierCode> = fare_path
            .candidate_carriers()
            .into_iter()
            .filter(|carrier| filter.allows_carrier(carrier))
            .collect();

        let snapshot: &FarePath = fare_path;
        let mut collector = RuleCollector::new(
            self.data.as_ref(),
            &self.config.vendor,
            ProgramValidator::new(self.geography.as_ref(), request),
            RuleValidator::new(self.geography.as_ref(), self.config.ticket_designator_check),
        )
        .with_full_program_status(self.config.detailed_diagnostics);
        let calculator =
            AmountCalculator::new(self.converter.as_ref(), snapshot, &payment_currency);
        let mut table = MatchTable::new();
        let mut results: BTreeMap<CarrierCode, CarrierOutcome> = BTreeMap::new();

        for carrier in &carriers {
            debug!(carrier = %carrier, agency, "evaluating agency commission");

            let contracts = discover_contracts(
                self.data.as_ref(),
                &self.config.vendor,
                carrier,
                agency,
                request.ticketing_date,
                &handshakes,
            );
            if contracts.is_empty() {
                sink.record(DiagnosticEvent::ContractNotFound {
                    carrier: carrier.clone(),
                });
                let outcome = fallback(request, carrier, CarrierOutcome::NoContracts, sink);
                results.insert(carrier.clone(), outcome);
                continue;
            }

            sink.record(DiagnosticEvent::ContractsFound {
                carrier: carrier.clone(),
                contracts: contracts.iter().map(|contract| contract.id).collect(),
            });
            collector.collect(carrier, &contracts, snapshot, &mut table, sink);

            match maximize(&table, carrier, snapshot, &calculator)? {
                Some(commission) => {
                    for award in &commission.awards {
                        sink.record(DiagnosticEvent::ComponentCommission {
                            carrier: carrier.clone(),
                            component: award.component,
                            amount: award.amount,
                            selection: award.selection.clone(),
                        });
                    }
                    sink.record(DiagnosticEvent::CarrierCommission {
                        carrier: carrier.clone(),
                        amount: commission.total,
                        contract: commission.contract,
                        commission_type: commission.commission_type,
                    });
                    info!(
                        carrier = %carrier,
                        amount = commission.total,
                        contract = %commission.contract,
                        commission_type = commission.commission_type.label(),
                        "agency commission selected"
                    );
                    results.insert(carrier.clone(), CarrierOutcome::Commission(commission));
                }
                None => {
                    sink.record(DiagnosticEvent::CommissionNotProcessed {
                        carrier: carrier.clone(),
                    });
                    let outcome = fallback(request, carrier, CarrierOutcome::NoCommission, sink);
                    results.insert(carrier.clone(), outcome);
                }
            }
        }

        for (carrier, outcome) in &results {
            if let CarrierOutcome::Commission(commission) = outcome {
                fare_path.store_carrier_commission(carrier, commission.total);
                for award in &commission.awards {
                    fare_path.store_component_commission(
                        award.component,
                        carrier,
                        ComponentCommission {
                            amount: award.amount,
                            selection: award.selection.clone(),
                        },
                    );
                }
            }
        }

        Ok(CommissionOutcome::Evaluated {
            payment_currency,
            carriers: results,
        })
    }
}

fn fallback(
    request: &PricingRequest,
    carrier: &str,
    outcome: CarrierOutcome,
    sink: &mut dyn DiagnosticSink,
) -> CarrierOutcome {
    match request.manual_commission() {
        Some(commission) => {
            sink.record(DiagnosticEvent::ManualCommissionApplied {
                carrier: carrier.to_string(),
                commission: commission.clone(),
            });
            CarrierOutcome::ManualCommission {
                commission: commission.clone(),
            }
        }
        None => outcome,
    }
}
