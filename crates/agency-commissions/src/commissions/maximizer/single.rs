use super::super::amount::AmountCalculator;
use super::super::domain::{CommissionType, EPSILON};
use super::super::itinerary::FareComponent;
use super::super::ordering::MatchedRule;
use super::super::reference::CurrencyError;
use super::super::table::MatchTable;
use super::{replaces, CarrierCommission, ComponentAward};

/// Best rule across every contract and commission type for a one-component fare path.
pub fn best_single_component(
    table: &MatchTable,
    carrier: &str,
    component: &FareComponent,
    calculator: &AmountCalculator<'_>,
) -> Result<Option<CarrierCommission>, CurrencyError> {
    let mut best: Option<CarrierCommission> = None;

    for (contract, by_type) in table.component_view(carrier, component.id) {
        for kind in CommissionType::ordered() {
            let Some(rules) = by_type.get(&kind) else {
                continue;
            };
            let Some((matched, amount)) = pick_rule(rules, component, calculator)? else {
                continue;
            };

            let candidate = CarrierCommission {
                contract,
                commission_type: kind,
                total: amount,
                awards: vec![ComponentAward {
                    component: component.id,
                    amount,
                    selection: Some(matched.selection()),
                }],
            };
            if replaces(&candidate, best.as_ref()) {
                best = Some(candidate);
            }
        }
    }

    Ok(best)
}

/// Rules are sorted by value; only a surcharge-applicable rule can make a lower value pay more.
fn pick_rule<'r>(
    rules: &'r [MatchedRule],
    component: &FareComponent,
    calculator: &AmountCalculator<'_>,
) -> Result<Option<(&'r MatchedRule, f64)>, CurrencyError> {
    let Some((first, rest)) = rules.split_first() else {
        return Ok(None);
    };

    let mut chosen = first;
    let mut amount = calculator.commission(component, first)?;

    if rules.iter().any(|rule| rule.surcharge_applicable) {
        for rule in rest {
            let candidate = calculator.commission(component, rule)?;
            if candidate > amount + EPSILON {
                chosen = rule;
                amount = candidate;
            }
        }
    }

    Ok(Some((chosen, amount)))
}
