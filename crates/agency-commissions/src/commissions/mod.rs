//! Agency commission evaluation for priced itineraries.
//!
//! For each candidate validating carrier the engine finds the contracts an agency holds with
//! that carrier, validates their programs and rules against each fare component, and picks
//! the combination that earns the agency the most. Results are written back to the fare path.

pub mod amount;
pub mod applicability;
pub mod collector;
pub mod diagnostics;
pub mod discovery;
pub mod domain;
pub mod engine;
pub mod itinerary;
pub mod matching;
pub mod maximizer;
pub mod ordering;
pub mod program_validator;
pub mod reference;
pub mod request;
pub mod rule_validator;
pub mod scenario;
pub mod status;
pub mod table;

#[cfg(test)]
mod tests;

pub use applicability::{check_applicability, NotApplicableReason};
pub use diagnostics::{DiagnosticEvent, DiagnosticSink, NullSink, RecordingSink, TracingSink};
pub use domain::{
    Cabin, CommissionContract, CommissionProgram, CommissionRule, CommissionType, ContractId,
    HandshakeRecord, ProgramId, RuleCriteria, RuleId, ANY_CARRIER, EPSILON,
};
pub use engine::{CarrierOutcome, CommissionEngine, CommissionError, CommissionOutcome};
pub use itinerary::{
    CommissionLedger, ComponentCommission, FareComponent, FareComponentId, FarePath,
    RuleSelection, TravelSegment,
};
pub use maximizer::{CarrierCommission, ComponentAward};
pub use ordering::{compare_matched, MatchedRule};
pub use reference::{
    CommissionDataSource, CurrencyConverter, CurrencyError, Geography, InMemoryGeography,
    InMemoryReferenceData, ReferenceDataSet, StaticRateConverter,
};
pub use request::{ManualCommission, PricingRequest, TicketingAgent, TransactionKind};
pub use scenario::{Scenario, ScenarioError, ScenarioReport};
pub use status::FailReason;
pub use table::{ComponentStatus, MatchTable};
