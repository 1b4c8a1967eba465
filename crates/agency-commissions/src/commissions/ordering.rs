use std::cmp::Ordering;
use std::sync::Arc;

use super::domain::{CommissionContract, CommissionProgram, CommissionRule, EPSILON};
use super::itinerary::RuleSelection;

/// A rule that passed validation, together with the program and contract that own it.
#[derive(Debug, Clone)]
pub struct MatchedRule {
    pub rule: Arc<CommissionRule>,
    pub program: Arc<CommissionProgram>,
    pub contract: Arc<CommissionContract>,
    /// Whether the surcharge stays in the net amount the percentage is applied to.
    pub surcharge_applicable: bool,
}

impl MatchedRule {
    pub fn new(
        rule: Arc<CommissionRule>,
        program: Arc<CommissionProgram>,
        contract: Arc<CommissionContract>,
    ) -> Self {
        let surcharge_applicable = rule.surcharge_included.unwrap_or(program.surcharge_included);
        Self {
            rule,
            program,
            contract,
            surcharge_applicable,
        }
    }

    pub fn value(&self) -> f64 {
        self.rule.value
    }

    pub fn selection(&self) -> RuleSelection {
        RuleSelection {
            contract_id: self.contract.id,
            program_id: self.program.id,
            rule_id: self.rule.id,
            commission_type: self.rule.commission_type,
            value: self.rule.value,
            surcharge_applicable: self.surcharge_applicable,
        }
    }
}

/// Highest value first; equal values put surcharge-applicable rules first, then lower rule ids.
pub fn compare_matched(left: &MatchedRule, right: &MatchedRule) -> Ordering {
    let difference = left.value() - right.value();
    if difference.abs() > EPSILON {
        return if difference > 0.0 {
            Ordering::Less
        } else {
            Ordering::Greater
        };
    }

    right
        .surcharge_applicable
        .cmp(&left.surcharge_applicable)
        .then_with(|| left.rule.id.cmp(&right.rule.id))
}

pub fn sort_matched(rules: &mut [MatchedRule]) {
    rules.sort_by(compare_matched);
}
