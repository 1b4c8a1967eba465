use chrono::{NaiveDate, NaiveDateTime};
use std::sync::Arc;

use crate::commissions::domain::{
    Cabin, CommissionContract, CommissionProgram, CommissionRule, CommissionType, ContractId,
    DateWindow, HandshakeRecord, ProgramId, RuleCriteria, RuleId,
};
use crate::commissions::engine::CommissionEngine;
use crate::commissions::itinerary::{FareComponent, FareComponentId, FarePath, TravelSegment};
use crate::commissions::ordering::MatchedRule;
use crate::commissions::reference::{
    InMemoryGeography, InMemoryReferenceData, ReferenceDataSet, StaticRateConverter,
};
use crate::commissions::request::{PricingRequest, TicketingAgent, TransactionKind};
use crate::commissions::table::{ComponentStatus, MatchTable};
use crate::config::EngineConfig;

pub(super) const AGENCY: &str = "A1B2";
pub(super) const OWNER: &str = "HQ01";
pub(super) const CARRIER: &str = "AA";

pub(super) type TestEngine =
    CommissionEngine<InMemoryReferenceData, StaticRateConverter, InMemoryGeography>;

pub(super) fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).expect("valid date")
}

pub(super) fn at(day: u32, hour: u32) -> NaiveDateTime {
    date(2026, 4, day).and_hms_opt(hour, 0, 0).expect("valid time")
}

pub(super) fn segment(from: &str, to: &str, carrier: &str, day: u32, hour: u32) -> TravelSegment {
    TravelSegment {
        origin_airport: from.to_string(),
        destination_airport: to.to_string(),
        board_city: from.to_string(),
        off_city: to.to_string(),
        marketing_carrier: carrier.to_string(),
        operating_carrier: carrier.to_string(),
        departure: at(day, hour),
        arrival: at(day, hour + 2),
    }
}

/// Component `id` flies DFW-LHR, LHR-DFW, then LHR-CDG, with fare basis `Y{id}`.
pub(super) fn component(id: u32, total: f64, surcharge: f64) -> FareComponent {
    let (origin, destination) = match id {
        1 => ("DFW", "LHR"),
        2 => ("LHR", "DFW"),
        _ => ("LHR", "CDG"),
    };

    FareComponent {
        id: FareComponentId(id),
        origin: origin.to_string(),
        destination: destination.to_string(),
        governing_carrier: CARRIER.to_string(),
        fare_basis: format!("Y{id}"),
        booking_code: "Y".to_string(),
        cabin: Cabin::Economy,
        fare_amount: total - surcharge,
        fare_currency: "USD".to_string(),
        total_fare_amount: total,
        surcharge_amount: surcharge,
        ticket_designator: None,
        segments: vec![segment(origin, destination, CARRIER, id * 3, 9)],
    }
}

pub(super) fn fare_path(components: Vec<FareComponent>) -> FarePath {
    FarePath {
        passenger_type: "ADT".to_string(),
        validating_carrier: CARRIER.to_string(),
        alternate_validating_carriers: Vec::new(),
        calculation_currency: "USD".to_string(),
        base_fare_currency: "USD".to_string(),
        non_iata_rounding: false,
        tour_code: None,
        negotiated: false,
        segments: components
            .iter()
            .flat_map(|component| component.segments.clone())
            .collect(),
        components,
        commissions: Default::default(),
    }
}

/// Two components: 2000 and 1000 with no surcharge.
pub(super) fn base_fare_path() -> FarePath {
    fare_path(vec![component(1, 2000.0, 0.0), component(2, 1000.0, 0.0)])
}

/// Two components: 2000 without surcharge and 2000 carrying a 1000 surcharge.
pub(super) fn surcharged_fare_path() -> FarePath {
    fare_path(vec![component(1, 2000.0, 0.0), component(2, 2000.0, 1000.0)])
}

pub(super) fn request() -> PricingRequest {
    PricingRequest {
        agent: Some(TicketingAgent {
            agency_location: Some(AGENCY.to_string()),
            agent_city: "DFW".to_string(),
            currency: "USD".to_string(),
            manual_commission: None,
        }),
        ticketing_date: date(2026, 3, 1),
        transaction: TransactionKind::Pricing,
        currency_override: None,
        no_pnr: false,
        commission_override_keyword: false,
        diagnostic: None,
    }
}

pub(super) fn contract(id: i64) -> CommissionContract {
    CommissionContract {
        id: ContractId(id),
        vendor: "COS".to_string(),
        carrier: CARRIER.to_string(),
        source_location: OWNER.to_string(),
        requesting_location: AGENCY.to_string(),
        validity: Some(DateWindow {
            first: date(2026, 1, 1),
            last: date(2026, 12, 31),
        }),
        description: format!("contract {id}"),
        active: true,
        inhibited: false,
    }
}

pub(super) fn program(id: i64, contract: i64) -> CommissionProgram {
    CommissionProgram {
        id: ProgramId(id),
        contract_id: ContractId(contract),
        name: format!("program {id}"),
        effective: None,
        expire: None,
        discontinue: None,
        point_of_sale: Vec::new(),
        point_of_origin: Vec::new(),
        travel_dates: Vec::new(),
        ticketing_dates: None,
        markets: Vec::new(),
        surcharge_included: false,
        through_fare: false,
        max_connection_minutes: None,
        land_agreement: false,
    }
}

pub(super) fn rule(id: i64, program: i64, kind: CommissionType, value: f64) -> CommissionRule {
    CommissionRule {
        id: RuleId(id),
        program_id: ProgramId(program),
        commission_type: kind,
        value,
        currency: None,
        surcharge_included: None,
        description: String::new(),
        criteria: RuleCriteria::default(),
    }
}

/// Rule that only matches the component whose fare basis is `Y{component}`.
pub(super) fn rule_on(
    id: i64,
    program: i64,
    component: u32,
    kind: CommissionType,
    value: f64,
    surcharge: bool,
) -> CommissionRule {
    let mut rule = rule(id, program, kind, value);
    rule.criteria.fare_basis_fragment_incl = vec![format!("Y{component}")];
    rule.surcharge_included = surcharge.then_some(true);
    rule
}

pub(super) fn handshake() -> HandshakeRecord {
    HandshakeRecord {
        agency_location: AGENCY.to_string(),
        security_target_location: OWNER.to_string(),
    }
}

/// Contract 1 with program 10 holding `rules`, plus the agency handshake.
pub(super) fn reference(rules: Vec<CommissionRule>) -> ReferenceDataSet {
    ReferenceDataSet {
        contracts: vec![contract(1)],
        programs: vec![program(10, 1)],
        rules,
        handshakes: vec![handshake()],
    }
}

pub(super) fn engine(data: ReferenceDataSet) -> TestEngine {
    engine_with(data, EngineConfig::default())
}

pub(super) fn engine_with(data: ReferenceDataSet, config: EngineConfig) -> TestEngine {
    CommissionEngine::new(
        Arc::new(InMemoryReferenceData::new(data)),
        Arc::new(StaticRateConverter::default()),
        Arc::new(InMemoryGeography::default()),
        config,
    )
}

/// Parses "2,3,(4)" into values; parenthesized values are surcharge-applicable.
pub(super) fn values(listing: &str) -> Vec<(f64, bool)> {
    listing.split(',')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(|entry| {
            let surcharge = entry.starts_with('(');
            let number = entry.trim_matches(|c| c == '(' || c == ')');
            (number.parse().expect("numeric rule value"), surcharge)
        })
        .collect()
}

pub(super) fn matched(
    rule_id: i64,
    contract_id: i64,
    kind: CommissionType,
    value: f64,
    surcharge: bool,
) -> MatchedRule {
    let mut commission_rule = rule(rule_id, contract_id * 10, kind, value);
    commission_rule.surcharge_included = Some(surcharge);
    MatchedRule::new(
        Arc::new(commission_rule),
        Arc::new(program(contract_id * 10, contract_id)),
        Arc::new(contract(contract_id)),
    )
}

/// Loads passing rules written as "2,3,(4)" for a component and contract.
pub(super) fn load(
    table: &mut MatchTable,
    component: u32,
    contract_id: i64,
    kind: CommissionType,
    listing: &str,
) {
    let rules = values(listing)
        .into_iter()
        .enumerate()
        .map(|(index, (value, surcharge))| {
            let id = contract_id * 10_000
                + i64::from(kind.type_id()) * 1000
                + i64::from(component) * 100
                + index as i64;
            matched(id, contract_id, kind, value, surcharge)
        })
        .collect();
    table.insert_rules(CARRIER, FareComponentId(component), ContractId(contract_id), kind, rules);
    table.set_status(CARRIER, FareComponentId(component), ComponentStatus::Commissionable);
}

pub(super) fn mark_empty(table: &mut MatchTable, component: u32) {
    table.set_status(CARRIER, FareComponentId(component), ComponentStatus::NoRules);
}

pub(super) fn assert_amount(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < 1e-6,
        "expected {expected}, got {actual}"
    );
}
