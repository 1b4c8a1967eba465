use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use tracing::warn;

use super::diagnostics::{DiagnosticEvent, DiagnosticSink};
use super::domain::{CarrierCode, CommissionContract, CommissionProgram, CommissionType, ContractId};
use super::itinerary::{FareComponent, FareKey, FareMarketKey, FarePath};
use super::ordering::MatchedRule;
use super::program_validator::ProgramValidator;
use super::reference::CommissionDataSource;
use super::rule_validator::RuleValidator;
use super::table::{ComponentStatus, MatchTable};

#[derive(Debug, Clone)]
enum ContractRules {
    Matched(Vec<MatchedRule>),
    RulesFailed,
    NoRules,
}

/// Validates programs and rules for a fare path and fills a [`MatchTable`].
///
/// Program results are memoized per (carrier, fare market) and rule results per
/// (carrier, fare), so components sharing a market or fare are validated once. A collector
/// belongs to a single evaluation and is dropped with it.
pub struct RuleCollector<'a> {
    data: &'a dyn CommissionDataSource,
    vendor: &'a str,
    programs: ProgramValidator<'a>,
    rules: RuleValidator<'a>,
    full_program_status: bool,
    program_memo: HashMap<(CarrierCode, FareMarketKey, ContractId), Vec<Arc<CommissionProgram>>>,
    rule_memo: HashMap<(CarrierCode, FareKey, ContractId), ContractRules>,
}

impl<'a> RuleCollector<'a> {
    pub fn new(
        data: &'a dyn CommissionDataSource,
        vendor: &'a str,
        programs: ProgramValidator<'a>,
        rules: RuleValidator<'a>,
    ) -> Self {
        Self {
            data,
            vendor,
            programs,
            rules,
            full_program_status: false,
            program_memo: HashMap::new(),
            rule_memo: HashMap::new(),
        }
    }

    /// Runs every program check instead of stopping at the first failure, so diagnostics
    /// list all reasons a program was rejected.
    pub fn with_full_program_status(mut self, enabled: bool) -> Self {
        self.full_program_status = enabled;
        self
    }

    pub fn collect(
        &mut self,
        carrier: &str,
        contracts: &[Arc<CommissionContract>],
        fare_path: &FarePath,
        table: &mut MatchTable,
        sink: &mut dyn DiagnosticSink,
    ) {
        for component in &fare_path.components {
            let mut matched_any = false;
            let mut failed_any = false;

            for contract in contracts {
                let programs = self.passing_programs(carrier, contract, fare_path, component, sink);
                match self.passing_rules(carrier, contract, &programs, fare_path, component, sink) {
                    ContractRules::Matched(rules) => {
                        matched_any = true;
                        let mut by_type: BTreeMap<CommissionType, Vec<MatchedRule>> =
                            BTreeMap::new();
                        for rule in rules {
                            by_type
                                .entry(rule.rule.commission_type)
                                .or_default()
                                .push(rule);
                        }
                        for (kind, rules) in by_type {
                            table.insert_rules(carrier, component.id, contract.id, kind, rules);
                        }
                    }
                    ContractRules::RulesFailed => {
                        failed_any = true;
                        table.mark_contract_failed(carrier, component.id, contract.id);
                    }
                    ContractRules::NoRules => {}
                }
            }

            let status = if matched_any {
                ComponentStatus::Commissionable
            } else if failed_any {
                ComponentStatus::RulesFailed
            } else {
                ComponentStatus::NoRules
            };
            table.set_status(carrier, component.id, status);
        }
    }

    fn passing_programs(
        &mut self,
        carrier: &str,
        contract: &Arc<CommissionContract>,
        fare_path: &FarePath,
        component: &FareComponent,
        sink: &mut dyn DiagnosticSink,
    ) -> Vec<Arc<CommissionProgram>> {
        let key = (carrier.to_string(), component.market_key(), contract.id);
        if let Some(programs) = self.program_memo.get(&key) {
            return programs.clone();
        }

        let mut passing = Vec::new();
        for program in self.data.commission_programs(self.vendor, contract.id) {
            if program.contract_id != contract.id {
                skip_record(
                    sink,
                    carrier,
                    format!(
                        "PROGRAM {} LINKED TO CONTRACT {} NOT {}",
                        program.id, program.contract_id, contract.id
                    ),
                );
                continue;
            }

            let failures = if self.full_program_status {
                self.programs.validate_all(&program, fare_path, component)
            } else {
                self.programs
                    .validate(&program, fare_path, component)
                    .err()
                    .into_iter()
                    .collect()
            };
            let passed = failures.is_empty();
            sink.record(DiagnosticEvent::ProgramEvaluated {
                carrier: carrier.to_string(),
                component: component.id,
                contract: contract.id,
                program: program.id,
                failures,
            });
            if passed {
                passing.push(program);
            }
        }

        self.program_memo.insert(key, passing.clone());
        passing
    }

    fn passing_rules(
        &mut self,
        carrier: &str,
        contract: &Arc<CommissionContract>,
        programs: &[Arc<CommissionProgram>],
        fare_path: &FarePath,
        component: &FareComponent,
        sink: &mut dyn DiagnosticSink,
    ) -> ContractRules {
        let key = (carrier.to_string(), component.fare_key(), contract.id);
        if let Some(outcome) = self.rule_memo.get(&key) {
            return outcome.clone();
        }

        let mut evaluated = 0usize;
        let mut matched = Vec::new();
        for program in programs {
            for rule in self.data.commission_rules(self.vendor, program.id) {
                if rule.program_id != program.id {
                    skip_record(
                        sink,
                        carrier,
                        format!(
                            "RULE {} LINKED TO PROGRAM {} NOT {}",
                            rule.id, rule.program_id, program.id
                        ),
                    );
                    continue;
                }

                evaluated += 1;
                let failure = self
                    .rules
                    .validate(&rule, carrier, fare_path, component)
                    .err();
                sink.record(DiagnosticEvent::RuleEvaluated {
                    carrier: carrier.to_string(),
                    component: component.id,
                    program: program.id,
                    rule: rule.id,
                    commission_type: rule.commission_type,
                    failure,
                });
                if failure.is_none() {
                    matched.push(MatchedRule::new(
                        rule,
                        Arc::clone(program),
                        Arc::clone(contract),
                    ));
                }
            }
        }

        let outcome = if !matched.is_empty() {
            ContractRules::Matched(matched)
        } else if evaluated > 0 {
            ContractRules::RulesFailed
        } else {
            ContractRules::NoRules
        };
        self.rule_memo.insert(key, outcome.clone());
        outcome
    }
}

fn skip_record(sink: &mut dyn DiagnosticSink, carrier: &str, detail: String) {
    warn!(carrier, detail = %detail, "skipping commission record with dangling linkage");
    sink.record(DiagnosticEvent::RecordSkipped {
        carrier: carrier.to_string(),
        detail,
    });
}
