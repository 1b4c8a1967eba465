use super::super::amount::AmountCalculator;
use super::super::domain::{CommissionType, ContractId, EPSILON};
use super::super::itinerary::FarePath;
use super::super::ordering::MatchedRule;
use super::super::reference::CurrencyError;
use super::super::table::{ContractState, MatchTable};
use super::{replaces, CarrierCommission, ComponentAward};

type Strategy = fn(
    &MatchTable,
    &str,
    ContractId,
    &FarePath,
    &AmountCalculator<'_>,
) -> Result<Option<CarrierCommission>, CurrencyError>;

const STRATEGIES: [Strategy; 3] = [no_proration, non_zero_proration, zero_proration];

/// Best commission over every contract with passing rules; the first contract wins ties.
pub fn best_multiple_components(
    table: &MatchTable,
    carrier: &str,
    fare_path: &FarePath,
    calculator: &AmountCalculator<'_>,
) -> Result<Option<CarrierCommission>, CurrencyError> {
    let mut best: Option<CarrierCommission> = None;

    for contract in table.contracts_for(carrier) {
        let mut contract_best: Option<CarrierCommission> = None;
        for strategy in STRATEGIES {
            if let Some(candidate) = strategy(table, carrier, contract, fare_path, calculator)? {
                if replaces(&candidate, contract_best.as_ref()) {
                    contract_best = Some(candidate);
                }
            }
        }

        if let Some(candidate) = contract_best {
            if replaces(&candidate, best.as_ref()) {
                best = Some(candidate);
            }
        }
    }

    Ok(best)
}

/// Every component must carry a no-proration rule. The lowest of the components' top values
/// is applied to each component's own net amount.
pub fn no_proration(
    table: &MatchTable,
    carrier: &str,
    contract: ContractId,
    fare_path: &FarePath,
    calculator: &AmountCalculator<'_>,
) -> Result<Option<CarrierCommission>, CurrencyError> {
    let mut tops: Vec<&MatchedRule> = Vec::with_capacity(fare_path.components.len());
    for component in &fare_path.components {
        match table.top_rule(carrier, component.id, contract, CommissionType::NoProration) {
            Some(top) => tops.push(top),
            None => return Ok(None),
        }
    }

    let lowest = tops
        .iter()
        .map(|top| top.value())
        .fold(f64::INFINITY, f64::min);

    let mut awards = Vec::with_capacity(tops.len());
    for (component, top) in fare_path.components.iter().zip(&tops) {
        let amount = calculator.percent_of(component, lowest, top.surcharge_applicable)?;
        awards.push(ComponentAward {
            component: component.id,
            amount,
            selection: Some(top.selection()),
        });
    }

    Ok(Some(summarize(contract, CommissionType::NoProration, awards)))
}

/// Every component must carry a non-zero-proration rule; each earns its own top rule.
pub fn non_zero_proration(
    table: &MatchTable,
    carrier: &str,
    contract: ContractId,
    fare_path: &FarePath,
    calculator: &AmountCalculator<'_>,
) -> Result<Option<CarrierCommission>, CurrencyError> {
    let mut awards = Vec::with_capacity(fare_path.components.len());
    for component in &fare_path.components {
        let Some(top) =
            table.top_rule(carrier, component.id, contract, CommissionType::NonZeroProration)
        else {
            return Ok(None);
        };
        awards.push(ComponentAward {
            component: component.id,
            amount: calculator.commission(component, top)?,
            selection: Some(top.selection()),
        });
    }

    Ok(Some(summarize(
        contract,
        CommissionType::NonZeroProration,
        awards,
    )))
}

/// Components no contract applied to, or where this contract's rules all failed, are
/// non-commissionable and earn nothing; a component only another contract covered is skipped.
/// Components holding the contract must carry zero- or non-zero-proration rules, and at least
/// one zero-proration rule must exist. Non-zero-proration rules only pay when no component is
/// non-commissionable.
pub fn zero_proration(
    table: &MatchTable,
    carrier: &str,
    contract: ContractId,
    fare_path: &FarePath,
    calculator: &AmountCalculator<'_>,
) -> Result<Option<CarrierCommission>, CurrencyError> {
    let mut non_commissionable = 0usize;
    let mut has_zero_proration = false;
    let mut eligible = Vec::new();

    for component in &fare_path.components {
        match table.contract_state(carrier, component.id, contract) {
            ContractState::Absent => {
                if table.has_no_entries(carrier, component.id) {
                    non_commissionable += 1;
                }
                continue;
            }
            ContractState::RulesFailed => {
                non_commissionable += 1;
                continue;
            }
            ContractState::Matched => {}
        }

        let zero = table.top_rule(carrier, component.id, contract, CommissionType::ZeroProration);
        let non_zero =
            table.top_rule(carrier, component.id, contract, CommissionType::NonZeroProration);
        if zero.is_none() && non_zero.is_none() {
            return Ok(None);
        }
        has_zero_proration |= zero.is_some();
        eligible.push((component, zero, non_zero));
    }

    if !has_zero_proration || non_commissionable == fare_path.components.len() {
        return Ok(None);
    }

    let mut awards = Vec::with_capacity(eligible.len());
    for (component, zero, non_zero) in eligible {
        let non_zero = non_zero.filter(|_| non_commissionable == 0);

        let mut chosen: Option<(&MatchedRule, f64)> = match zero {
            Some(rule) => Some((rule, calculator.commission(component, rule)?)),
            None => None,
        };
        if let Some(rule) = non_zero {
            let amount = calculator.commission(component, rule)?;
            let raises = chosen
                .map(|(_, current)| amount > current + EPSILON)
                .unwrap_or(true);
            if raises {
                chosen = Some((rule, amount));
            }
        }

        if let Some((rule, amount)) = chosen {
            awards.push(ComponentAward {
                component: component.id,
                amount,
                selection: Some(rule.selection()),
            });
        }
    }

    Ok(Some(summarize(
        contract,
        CommissionType::ZeroProration,
        awards,
    )))
}

fn summarize(
    contract: ContractId,
    commission_type: CommissionType,
    awards: Vec<ComponentAward>,
) -> CarrierCommission {
    CarrierCommission {
        contract,
        commission_type,
        total: awards.iter().map(|award| award.amount).sum(),
        awards,
    }
}
