//! Picks the commission that pays the agency the most for one validating carrier.
//!
//! A fare path with a single component takes the best rule of any contract and type. Longer
//! fare paths are evaluated per contract under the no-proration, non-zero-proration and
//! zero-proration combination strategies.

mod single;
mod strategies;

use serde::Serialize;

use super::amount::AmountCalculator;
use super::domain::{CommissionType, ContractId, EPSILON};
use super::itinerary::{FareComponentId, FarePath, RuleSelection};
use super::reference::CurrencyError;
use super::table::MatchTable;

pub use single::best_single_component;
pub use strategies::{best_multiple_components, no_proration, non_zero_proration, zero_proration};

/// Contribution of one fare component to a carrier's commission.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComponentAward {
    pub component: FareComponentId,
    pub amount: f64,
    pub selection: Option<RuleSelection>,
}

/// Winning commission for a validating carrier.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CarrierCommission {
    pub contract: ContractId,
    pub commission_type: CommissionType,
    pub total: f64,
    pub awards: Vec<ComponentAward>,
}

pub fn maximize(
    table: &MatchTable,
    carrier: &str,
    fare_path: &FarePath,
    calculator: &AmountCalculator<'_>,
) -> Result<Option<CarrierCommission>, CurrencyError> {
    match fare_path.components.as_slice() {
        [] => Ok(None),
        [component] => best_single_component(table, carrier, component, calculator),
        _ => best_multiple_components(table, carrier, fare_path, calculator),
    }
}

/// A candidate replaces the running best when strictly greater, or when it carries results
/// totalling zero and the running best is not positive.
pub(crate) fn replaces(candidate: &CarrierCommission, best: Option<&CarrierCommission>) -> bool {
    let running = best.map(|current| current.total).unwrap_or(0.0);
    if candidate.total > running + EPSILON {
        return true;
    }
    !candidate.awards.is_empty() && candidate.total.abs() <= EPSILON && running <= EPSILON
}
