use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};

use super::domain::{CarrierCode, CommissionType, ContractId};
use super::itinerary::FareComponentId;
use super::ordering::{sort_matched, MatchedRule};

/// Outcome of rule collection for one (carrier, component) pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ComponentStatus {
    Commissionable,
    /// No program or rule applied to the component at all.
    NoRules,
    /// Rules were found but every one failed validation.
    RulesFailed,
}

/// How a contract fared on one component.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContractState {
    Absent,
    RulesFailed,
    Matched,
}

type RuleKey = (CarrierCode, FareComponentId, ContractId, CommissionType);
type ComponentKey = (CarrierCode, FareComponentId);

/// Passing rules keyed by (carrier, component, contract, commission type), plus explicit
/// per-component statuses and per-contract failure markers.
#[derive(Debug, Default, Clone)]
pub struct MatchTable {
    rules: BTreeMap<RuleKey, Vec<MatchedRule>>,
    statuses: BTreeMap<ComponentKey, ComponentStatus>,
    failed_contracts: BTreeSet<(CarrierCode, FareComponentId, ContractId)>,
}

impl MatchTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores a sorted rule set; empty sets are ignored so stored sets are never empty.
    pub fn insert_rules(
        &mut self,
        carrier: &str,
        component: FareComponentId,
        contract: ContractId,
        commission_type: CommissionType,
        mut rules: Vec<MatchedRule>,
    ) {
        if rules.is_empty() {
            return;
        }
        sort_matched(&mut rules);
        self.rules.insert(
            (carrier.to_string(), component, contract, commission_type),
            rules,
        );
    }

    pub fn mark_contract_failed(
        &mut self,
        carrier: &str,
        component: FareComponentId,
        contract: ContractId,
    ) {
        self.failed_contracts
            .insert((carrier.to_string(), component, contract));
    }

    pub fn set_status(&mut self, carrier: &str, component: FareComponentId, status: ComponentStatus) {
        self.statuses.insert((carrier.to_string(), component), status);
    }

    /// `None` when the pair was never evaluated.
    pub fn status(&self, carrier: &str, component: FareComponentId) -> Option<ComponentStatus> {
        self.statuses
            .get(&(carrier.to_string(), component))
            .copied()
    }

    pub fn is_commissionable(&self, carrier: &str, component: FareComponentId) -> bool {
        self.status(carrier, component) == Some(ComponentStatus::Commissionable)
    }

    /// True when no contract left an entry on the component, passing or failed.
    pub fn has_no_entries(&self, carrier: &str, component: FareComponentId) -> bool {
        matches!(
            self.status(carrier, component),
            None | Some(ComponentStatus::NoRules)
        )
    }

    pub fn rules(
        &self,
        carrier: &str,
        component: FareComponentId,
        contract: ContractId,
        commission_type: CommissionType,
    ) -> &[MatchedRule] {
        self.rules
            .get(&(carrier.to_string(), component, contract, commission_type))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn top_rule(
        &self,
        carrier: &str,
        component: FareComponentId,
        contract: ContractId,
        commission_type: CommissionType,
    ) -> Option<&MatchedRule> {
        self.rules(carrier, component, contract, commission_type)
            .first()
    }

    pub fn contract_state(
        &self,
        carrier: &str,
        component: FareComponentId,
        contract: ContractId,
    ) -> ContractState {
        let matched = CommissionType::ordered()
            .into_iter()
            .any(|kind| !self.rules(carrier, component, contract, kind).is_empty());

        if matched {
            ContractState::Matched
        } else if self
            .failed_contracts
            .contains(&(carrier.to_string(), component, contract))
        {
            ContractState::RulesFailed
        } else {
            ContractState::Absent
        }
    }

    /// Contracts holding at least one passing rule for the carrier, in id order.
    pub fn contracts_for(&self, carrier: &str) -> BTreeSet<ContractId> {
        self.rules
            .keys()
            .filter(|(key_carrier, ..)| key_carrier == carrier)
            .map(|(_, _, contract, _)| *contract)
            .collect()
    }

    /// Nested view of one component's passing rules: contract, then commission type.
    pub fn component_view(
        &self,
        carrier: &str,
        component: FareComponentId,
    ) -> BTreeMap<ContractId, BTreeMap<CommissionType, &[MatchedRule]>> {
        let mut view: BTreeMap<ContractId, BTreeMap<CommissionType, &[MatchedRule]>> =
            BTreeMap::new();
        for ((key_carrier, key_component, contract, kind), rules) in &self.rules {
            if key_carrier == carrier && *key_component == component {
                view.entry(*contract)
                    .or_default()
                    .insert(*kind, rules.as_slice());
            }
        }
        view
    }
}
