use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Two-letter airline designator.
pub type CarrierCode = String;

/// Pseudo-city code identifying an agency location.
pub type AgencyLocation = String;

/// Contract carrier marker meaning "valid for every validating carrier".
pub const ANY_CARRIER: &str = "**";

/// Tolerance used whenever two commission values or amounts are compared.
pub const EPSILON: f64 = 1e-6;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ContractId(pub i64);

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProgramId(pub i64);

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RuleId(pub i64);

impl fmt::Display for ContractId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Display for ProgramId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Display for RuleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Classification governing how a commission combines across fare components.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CommissionType {
    NoProration,
    NonZeroProration,
    ZeroProration,
    SegmentBonus,
}

impl CommissionType {
    pub const fn ordered() -> [Self; 4] {
        [
            Self::NoProration,
            Self::NonZeroProration,
            Self::ZeroProration,
            Self::SegmentBonus,
        ]
    }

    /// Numeric type id used by the commission reference tables.
    pub const fn type_id(self) -> u8 {
        match self {
            Self::NoProration => 9,
            Self::NonZeroProration => 10,
            Self::ZeroProration => 11,
            Self::SegmentBonus => 12,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::NoProration => "NO PRORATION ALLOWED",
            Self::NonZeroProration => "NON ZERO PRORATION",
            Self::ZeroProration => "ZERO PRORATION",
            Self::SegmentBonus => "SEGMENT BONUS",
        }
    }

    /// Flat-amount types carry a currency instead of a percentage.
    pub const fn is_flat_amount(self) -> bool {
        matches!(self, Self::SegmentBonus)
    }
}

/// Inclusive date range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateWindow {
    pub first: NaiveDate,
    pub last: NaiveDate,
}

impl DateWindow {
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.first <= date && date <= self.last
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LocKind {
    Airport,
    City,
    State,
    Country,
    Area,
    Zone,
}

/// A geographic reference as stored on commission programs.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LocKey {
    pub kind: LocKind,
    pub code: String,
}

impl LocKey {
    pub fn new(kind: LocKind, code: impl Into<String>) -> Self {
        Self {
            kind,
            code: code.into(),
        }
    }
}

impl fmt::Display for LocKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}:{}", self.kind, self.code)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocRestriction {
    pub loc: LocKey,
    #[serde(default)]
    pub exclude: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarketRestriction {
    pub origin: LocKey,
    pub destination: LocKey,
    #[serde(default)]
    pub bidirectional: bool,
    #[serde(default)]
    pub exclude: bool,
}

/// Agreement between a validating carrier and an agency location.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommissionContract {
    pub id: ContractId,
    pub vendor: String,
    pub carrier: CarrierCode,
    pub source_location: AgencyLocation,
    pub requesting_location: AgencyLocation,
    #[serde(default)]
    pub validity: Option<DateWindow>,
    #[serde(default)]
    pub description: String,
    #[serde(default = "default_true")]
    pub active: bool,
    #[serde(default)]
    pub inhibited: bool,
}

impl CommissionContract {
    pub fn is_usable_on(&self, ticketing_date: NaiveDate) -> bool {
        self.active
            && !self.inhibited
            && self
                .validity
                .map(|window| window.contains(ticketing_date))
                .unwrap_or(true)
    }
}

/// Commission program owned by a single contract.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommissionProgram {
    pub id: ProgramId,
    pub contract_id: ContractId,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub effective: Option<NaiveDate>,
    #[serde(default)]
    pub expire: Option<NaiveDate>,
    #[serde(default)]
    pub discontinue: Option<NaiveDate>,
    #[serde(default)]
    pub point_of_sale: Vec<LocRestriction>,
    #[serde(default)]
    pub point_of_origin: Vec<LocRestriction>,
    #[serde(default)]
    pub travel_dates: Vec<DateWindow>,
    #[serde(default)]
    pub ticketing_dates: Option<DateWindow>,
    #[serde(default)]
    pub markets: Vec<MarketRestriction>,
    #[serde(default)]
    pub surcharge_included: bool,
    #[serde(default)]
    pub through_fare: bool,
    #[serde(default)]
    pub max_connection_minutes: Option<u32>,
    #[serde(default)]
    pub land_agreement: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoundTripRequirement {
    /// Journey must return to its origin.
    Required,
    /// Journey must not return to its origin.
    Excluded,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FareAmountLimit {
    pub amount: f64,
    pub currency: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Cabin {
    PremiumFirst,
    First,
    PremiumBusiness,
    Business,
    PremiumEconomy,
    Economy,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CityPair {
    pub origin: String,
    pub destination: String,
}

/// Inclusion and exclusion criteria evaluated by the rule validator.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RuleCriteria {
    pub fare_basis_incl: Vec<char>,
    pub fare_basis_excl: Vec<char>,
    pub fare_basis_fragment_incl: Vec<String>,
    pub fare_basis_fragment_excl: Vec<String>,
    pub booking_code_incl: Vec<String>,
    pub booking_code_excl: Vec<String>,
    pub operating_carrier_incl: Vec<CarrierCode>,
    pub operating_carrier_excl: Vec<CarrierCode>,
    pub marketing_carrier_incl: Vec<CarrierCode>,
    pub marketing_carrier_excl: Vec<CarrierCode>,
    pub ticketing_carrier_incl: Vec<CarrierCode>,
    pub ticketing_carrier_excl: Vec<CarrierCode>,
    pub marketing_governing_required: Vec<CarrierCode>,
    pub marketing_governing_excluded: Vec<CarrierCode>,
    pub operating_governing_required: Vec<CarrierCode>,
    pub operating_governing_excluded: Vec<CarrierCode>,
    pub interline_connection_required: bool,
    pub round_trip: Option<RoundTripRequirement>,
    pub fare_amount_min: Option<FareAmountLimit>,
    pub fare_amount_max: Option<FareAmountLimit>,
    pub cabin_required: Vec<Cabin>,
    pub cabin_excluded: Vec<Cabin>,
    pub required_non_stop: Vec<CityPair>,
    pub connection_airports_required: Vec<String>,
    pub connection_airports_excluded: Vec<String>,
    pub passenger_types_required: Vec<String>,
    pub tour_codes_excluded: Vec<String>,
    pub ticket_designators_required: Vec<String>,
    pub ticket_designators_excluded: Vec<String>,
}

/// Commission rule owned by a single program.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommissionRule {
    pub id: RuleId,
    pub program_id: ProgramId,
    pub commission_type: CommissionType,
    /// Percentage, or a flat amount for segment bonus rules.
    pub value: f64,
    #[serde(default)]
    pub currency: Option<String>,
    /// Overrides the program's surcharge flag when present.
    #[serde(default)]
    pub surcharge_included: Option<bool>,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub criteria: RuleCriteria,
}

/// Security handshake linking a requesting agency to the location that owns its contracts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HandshakeRecord {
    pub agency_location: AgencyLocation,
    pub security_target_location: AgencyLocation,
}

fn default_true() -> bool {
    true
}
