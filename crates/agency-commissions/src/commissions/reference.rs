//! Collaborators the engine reads from: commission records, exchange rates, geography.
//!
//! Every lookup is synchronous and side-effect free. The in-memory implementations back the
//! CLI and HTTP surfaces and the test suites.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;

use super::domain::{
    CommissionContract, CommissionProgram, CommissionRule, ContractId, HandshakeRecord, LocKey,
    LocKind, ProgramId,
};

/// Reference-data access for contracts, programs, rules, and security handshakes.
pub trait CommissionDataSource: Send + Sync {
    fn commission_contracts(
        &self,
        vendor: &str,
        carrier: &str,
        agency: &str,
    ) -> Vec<Arc<CommissionContract>>;
    fn commission_programs(&self, vendor: &str, contract: ContractId)
        -> Vec<Arc<CommissionProgram>>;
    fn commission_rules(&self, vendor: &str, program: ProgramId) -> Vec<Arc<CommissionRule>>;
    fn security_handshakes(&self, agency: &str) -> Vec<HandshakeRecord>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoundingMode {
    /// Round half away from zero to the target currency's decimals.
    Standard,
    /// Round to whole units of the target currency.
    NonIata,
}

pub trait CurrencyConverter: Send + Sync {
    fn convert(
        &self,
        amount: f64,
        from: &str,
        to: &str,
        rounding: RoundingMode,
    ) -> Result<f64, CurrencyError>;
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CurrencyError {
    #[error("no exchange rate from {from} to {to}")]
    MissingRate { from: String, to: String },
}

/// Zone and area membership used by program location checks.
pub trait Geography: Send + Sync {
    fn is_in_loc(&self, point: &str, loc: &LocKey) -> bool;
}

/// Serializable bundle of commission records as supplied by a scenario document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReferenceDataSet {
    pub contracts: Vec<CommissionContract>,
    pub programs: Vec<CommissionProgram>,
    pub rules: Vec<CommissionRule>,
    pub handshakes: Vec<HandshakeRecord>,
}

/// Request-scoped cache indexed the way the engine queries it.
#[derive(Debug, Default)]
pub struct InMemoryReferenceData {
    contracts: Vec<Arc<CommissionContract>>,
    programs: BTreeMap<ContractId, Vec<Arc<CommissionProgram>>>,
    rules: BTreeMap<ProgramId, Vec<Arc<CommissionRule>>>,
    handshakes: Vec<HandshakeRecord>,
}

impl InMemoryReferenceData {
    pub fn new(data: ReferenceDataSet) -> Self {
        let mut programs: BTreeMap<ContractId, Vec<Arc<CommissionProgram>>> = BTreeMap::new();
        for program in data.programs {
            programs
                .entry(program.contract_id)
                .or_default()
                .push(Arc::new(program));
        }

        let mut rules: BTreeMap<ProgramId, Vec<Arc<CommissionRule>>> = BTreeMap::new();
        for rule in data.rules {
            rules.entry(rule.program_id).or_default().push(Arc::new(rule));
        }

        Self {
            contracts: data.contracts.into_iter().map(Arc::new).collect(),
            programs,
            rules,
            handshakes: data.handshakes,
        }
    }
}

impl From<ReferenceDataSet> for InMemoryReferenceData {
    fn from(value: ReferenceDataSet) -> Self {
        Self::new(value)
    }
}

impl CommissionDataSource for InMemoryReferenceData {
    fn commission_contracts(
        &self,
        vendor: &str,
        carrier: &str,
        agency: &str,
    ) -> Vec<Arc<CommissionContract>> {
        self.contracts
            .iter()
            .filter(|contract| {
                contract.vendor == vendor
                    && contract.carrier == carrier
                    && contract.requesting_location == agency
            })
            .cloned()
            .collect()
    }

    fn commission_programs(
        &self,
        _vendor: &str,
        contract: ContractId,
    ) -> Vec<Arc<CommissionProgram>> {
        self.programs.get(&contract).cloned().unwrap_or_default()
    }

    fn commission_rules(&self, _vendor: &str, program: ProgramId) -> Vec<Arc<CommissionRule>> {
        self.rules.get(&program).cloned().unwrap_or_default()
    }

    fn security_handshakes(&self, agency: &str) -> Vec<HandshakeRecord> {
        self.handshakes
            .iter()
            .filter(|record| record.agency_location == agency)
            .cloned()
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExchangeRate {
    pub from: String,
    pub to: String,
    pub rate: f64,
}

/// Converter over a fixed rate sheet; inverse rates are derived when only one direction is listed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StaticRateConverter {
    pub rates: Vec<ExchangeRate>,
    /// Decimal places per currency; two when unlisted.
    pub decimals: BTreeMap<String, u32>,
}

impl StaticRateConverter {
    pub fn with_rate(mut self, from: &str, to: &str, rate: f64) -> Self {
        self.rates.push(ExchangeRate {
            from: from.to_string(),
            to: to.to_string(),
            rate,
        });
        self
    }

    fn rate(&self, from: &str, to: &str) -> Option<f64> {
        self.rates
            .iter()
            .find(|rate| rate.from == from && rate.to == to)
            .map(|rate| rate.rate)
            .or_else(|| {
                self.rates
                    .iter()
                    .find(|rate| rate.from == to && rate.to == from && rate.rate != 0.0)
                    .map(|rate| 1.0 / rate.rate)
            })
    }

    fn round(&self, amount: f64, currency: &str, rounding: RoundingMode) -> f64 {
        let decimals = match rounding {
            RoundingMode::Standard => self.decimals.get(currency).copied().unwrap_or(2),
            RoundingMode::NonIata => 0,
        };
        let factor = 10f64.powi(decimals as i32);
        (amount * factor).round() / factor
    }
}

impl CurrencyConverter for StaticRateConverter {
    fn convert(
        &self,
        amount: f64,
        from: &str,
        to: &str,
        rounding: RoundingMode,
    ) -> Result<f64, CurrencyError> {
        if from == to {
            return Ok(amount);
        }

        let rate = self.rate(from, to).ok_or_else(|| CurrencyError::MissingRate {
            from: from.to_string(),
            to: to.to_string(),
        })?;

        Ok(self.round(amount * rate, to, rounding))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeoPoint {
    pub city: String,
    pub state: Option<String>,
    pub country: String,
    pub area: String,
    pub zones: Vec<String>,
}

/// Geography table keyed by airport or city code.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InMemoryGeography {
    points: BTreeMap<String, GeoPoint>,
}

impl InMemoryGeography {
    pub fn with_point(mut self, code: &str, point: GeoPoint) -> Self {
        self.points.insert(code.to_string(), point);
        self
    }
}

impl Geography for InMemoryGeography {
    fn is_in_loc(&self, point: &str, loc: &LocKey) -> bool {
        if point == loc.code {
            return true;
        }

        let Some(geo) = self.points.get(point) else {
            return false;
        };

        match loc.kind {
            LocKind::Airport => false,
            LocKind::City => geo.city == loc.code,
            LocKind::State => geo.state.as_deref() == Some(loc.code.as_str()),
            LocKind::Country => geo.country == loc.code,
            LocKind::Area => geo.area == loc.code,
            LocKind::Zone => geo.zones.iter().any(|zone| zone == &loc.code),
        }
    }
}
