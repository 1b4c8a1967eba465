use super::common::*;
use crate::commissions::domain::{
    Cabin, CityPair, CommissionRule, CommissionType, DateWindow, FareAmountLimit, LocKey, LocKind,
    LocRestriction, MarketRestriction, RoundTripRequirement,
};
use crate::commissions::itinerary::FarePath;
use crate::commissions::program_validator::ProgramValidator;
use crate::commissions::reference::{GeoPoint, InMemoryGeography};
use crate::commissions::rule_validator::RuleValidator;
use crate::commissions::status::FailReason;

fn geography() -> InMemoryGeography {
    InMemoryGeography::default()
        .with_point(
            "DFW",
            GeoPoint {
                city: "DFW".to_string(),
                state: Some("TX".to_string()),
                country: "US".to_string(),
                area: "1".to_string(),
                zones: vec!["NAM".to_string()],
            },
        )
        .with_point(
            "LHR",
            GeoPoint {
                city: "LON".to_string(),
                state: None,
                country: "GB".to_string(),
                area: "2".to_string(),
                zones: vec!["EUR".to_string()],
            },
        )
        .with_point(
            "LGW",
            GeoPoint {
                city: "LON".to_string(),
                state: None,
                country: "GB".to_string(),
                area: "2".to_string(),
                zones: vec!["EUR".to_string()],
            },
        )
}

fn loc(kind: LocKind, code: &str) -> LocRestriction {
    LocRestriction {
        loc: LocKey::new(kind, code),
        exclude: false,
    }
}

fn excluded(kind: LocKind, code: &str) -> LocRestriction {
    LocRestriction {
        loc: LocKey::new(kind, code),
        exclude: true,
    }
}

#[test]
fn program_passes_without_restrictions() {
    let geo = geography();
    let request = request();
    let path = base_fare_path();
    let validator = ProgramValidator::new(&geo, &request);

    assert_eq!(validator.validate(&program(10, 1), &path, &path.components[0]), Ok(()));
}

#[test]
fn program_outside_validity_is_not_valid() {
    let geo = geography();
    let request = request();
    let path = base_fare_path();
    let validator = ProgramValidator::new(&geo, &request);

    let mut expired = program(10, 1);
    expired.expire = Some(date(2026, 2, 1));
    assert_eq!(
        validator.validate(&expired, &path, &path.components[0]),
        Err(FailReason::ProgramNotValid)
    );

    let mut discontinued = program(11, 1);
    discontinued.discontinue = Some(date(2026, 2, 28));
    assert_eq!(
        validator.validate(&discontinued, &path, &path.components[0]),
        Err(FailReason::ProgramNotValid)
    );

    let mut future = program(12, 1);
    future.effective = Some(date(2026, 3, 2));
    assert_eq!(
        validator.validate(&future, &path, &path.components[0]),
        Err(FailReason::ProgramNotValid)
    );
}

#[test]
fn point_of_sale_matches_through_geography() {
    let geo = geography();
    let request = request();
    let path = base_fare_path();
    let validator = ProgramValidator::new(&geo, &request);

    let mut in_country = program(10, 1);
    in_country.point_of_sale = vec![loc(LocKind::Country, "US")];
    assert_eq!(validator.validate(&in_country, &path, &path.components[0]), Ok(()));

    let mut abroad = program(11, 1);
    abroad.point_of_sale = vec![loc(LocKind::Zone, "EUR")];
    assert_eq!(
        validator.validate(&abroad, &path, &path.components[0]),
        Err(FailReason::PointOfSale)
    );

    let mut excluded_state = program(12, 1);
    excluded_state.point_of_sale = vec![excluded(LocKind::State, "TX")];
    assert_eq!(
        validator.validate(&excluded_state, &path, &path.components[0]),
        Err(FailReason::PointOfSale)
    );
}

#[test]
fn point_of_origin_uses_journey_origin() {
    let geo = geography();
    let request = request();
    let path = base_fare_path();
    let validator = ProgramValidator::new(&geo, &request);

    let mut from_us = program(10, 1);
    from_us.point_of_origin = vec![loc(LocKind::Area, "1")];
    assert_eq!(validator.validate(&from_us, &path, &path.components[1]), Ok(()));

    let mut from_london = program(11, 1);
    from_london.point_of_origin = vec![loc(LocKind::City, "LON")];
    assert_eq!(
        validator.validate(&from_london, &path, &path.components[1]),
        Err(FailReason::PointOfOrigin)
    );
}

#[test]
fn travel_and_ticketing_windows_are_enforced() {
    let geo = geography();
    let request = request();
    let path = base_fare_path();
    let validator = ProgramValidator::new(&geo, &request);

    let mut travel = program(10, 1);
    travel.travel_dates = vec![DateWindow {
        first: date(2026, 4, 1),
        last: date(2026, 4, 4),
    }];
    assert_eq!(validator.validate(&travel, &path, &path.components[0]), Ok(()));
    assert_eq!(
        validator.validate(&travel, &path, &path.components[1]),
        Err(FailReason::TravelDate)
    );

    let mut ticketing = program(11, 1);
    ticketing.ticketing_dates = Some(DateWindow {
        first: date(2026, 3, 2),
        last: date(2026, 3, 31),
    });
    assert_eq!(
        validator.validate(&ticketing, &path, &path.components[0]),
        Err(FailReason::TicketingDate)
    );
}

#[test]
fn market_is_direction_aware_unless_bidirectional() {
    let geo = geography();
    let request = request();
    let path = base_fare_path();
    let validator = ProgramValidator::new(&geo, &request);

    let mut market = program(10, 1);
    market.markets = vec![MarketRestriction {
        origin: LocKey::new(LocKind::Country, "US"),
        destination: LocKey::new(LocKind::Country, "GB"),
        bidirectional: false,
        exclude: false,
    }];
    assert_eq!(validator.validate(&market, &path, &path.components[0]), Ok(()));
    assert_eq!(
        validator.validate(&market, &path, &path.components[1]),
        Err(FailReason::Market)
    );

    market.markets[0].bidirectional = true;
    assert_eq!(validator.validate(&market, &path, &path.components[1]), Ok(()));

    market.markets[0].exclude = true;
    assert_eq!(
        validator.validate(&market, &path, &path.components[1]),
        Err(FailReason::Market)
    );
}

#[test]
fn connection_time_limit_applies_between_segments() {
    let geo = geography();
    let request = request();
    let mut long_connection = component(1, 1000.0, 0.0);
    long_connection.segments = vec![
        segment("DFW", "JFK", CARRIER, 3, 6),
        segment("JFK", "LHR", CARRIER, 3, 12),
    ];
    let path = fare_path(vec![long_connection]);
    let validator = ProgramValidator::new(&geo, &request);

    let mut program = program(10, 1);
    program.max_connection_minutes = Some(180);
    assert_eq!(
        validator.validate(&program, &path, &path.components[0]),
        Err(FailReason::MaxConnectionTime)
    );

    program.max_connection_minutes = Some(240);
    assert_eq!(validator.validate(&program, &path, &path.components[0]), Ok(()));
}

#[test]
fn validate_all_reports_every_failure_in_order() {
    let geo = geography();
    let request = request();
    let path = base_fare_path();
    let validator = ProgramValidator::new(&geo, &request);

    let mut program = program(10, 1);
    program.expire = Some(date(2026, 1, 31));
    program.point_of_sale = vec![loc(LocKind::Country, "GB")];
    program.ticketing_dates = Some(DateWindow {
        first: date(2025, 1, 1),
        last: date(2025, 12, 31),
    });

    assert_eq!(
        validator.validate_all(&program, &path, &path.components[0]),
        vec![
            FailReason::ProgramNotValid,
            FailReason::PointOfSale,
            FailReason::TicketingDate
        ]
    );
    assert_eq!(
        validator.validate(&program, &path, &path.components[0]),
        Err(FailReason::ProgramNotValid)
    );
}

fn check(rule: &CommissionRule, path: &FarePath) -> Result<(), FailReason> {
    let geo = geography();
    RuleValidator::new(&geo, true).validate(rule, CARRIER, path, &path.components[0])
}

fn plain_rule() -> CommissionRule {
    rule(100, 10, CommissionType::NonZeroProration, 5.0)
}

#[test]
fn rule_without_criteria_passes() {
    assert_eq!(check(&plain_rule(), &base_fare_path()), Ok(()));
}

#[test]
fn fare_basis_checks_first_character_and_fragments() {
    let path = base_fare_path();

    let mut first = plain_rule();
    first.criteria.fare_basis_incl = vec!['B', 'M'];
    assert_eq!(check(&first, &path), Err(FailReason::FareBasisIncl));

    let mut excluded_first = plain_rule();
    excluded_first.criteria.fare_basis_excl = vec!['Y'];
    assert_eq!(check(&excluded_first, &path), Err(FailReason::FareBasisExcl));

    let mut fragment = plain_rule();
    fragment.criteria.fare_basis_fragment_incl = vec!["B%".to_string(), "Y%".to_string()];
    assert_eq!(check(&fragment, &path), Ok(()));

    fragment.criteria.fare_basis_fragment_incl = vec!["Y".to_string()];
    assert_eq!(check(&fragment, &path), Err(FailReason::FareBasisFragmentIncl));

    let mut excluded_fragment = plain_rule();
    excluded_fragment.criteria.fare_basis_fragment_excl = vec!["%1".to_string()];
    assert_eq!(
        check(&excluded_fragment, &path),
        Err(FailReason::FareBasisFragmentExcl)
    );
}

#[test]
fn carriers_are_checked_on_every_segment() {
    let mut mixed = component(1, 1000.0, 0.0);
    mixed.segments = vec![
        segment("DFW", "JFK", CARRIER, 3, 6),
        segment("JFK", "LHR", "BA", 3, 10),
    ];
    let path = fare_path(vec![mixed]);

    let mut marketing = plain_rule();
    marketing.criteria.marketing_carrier_incl = vec![CARRIER.to_string()];
    assert_eq!(check(&marketing, &path), Err(FailReason::MarketingCarrierIncl));

    marketing.criteria.marketing_carrier_incl = vec![CARRIER.to_string(), "BA".to_string()];
    assert_eq!(check(&marketing, &path), Ok(()));

    let mut operating = plain_rule();
    operating.criteria.operating_carrier_excl = vec!["BA".to_string()];
    assert_eq!(check(&operating, &path), Err(FailReason::OperatingCarrierExcl));

    let mut interline = plain_rule();
    interline.criteria.interline_connection_required = true;
    assert_eq!(check(&interline, &path), Ok(()));
    assert_eq!(
        check(&interline, &base_fare_path()),
        Err(FailReason::InterlineConnection)
    );
}

#[test]
fn ticketing_and_governing_carriers() {
    let path = base_fare_path();

    let mut ticketing = plain_rule();
    ticketing.criteria.ticketing_carrier_excl = vec![CARRIER.to_string()];
    assert_eq!(check(&ticketing, &path), Err(FailReason::TicketingCarrierExcl));

    let mut governing = plain_rule();
    governing.criteria.marketing_governing_required = vec!["BA".to_string()];
    assert_eq!(
        check(&governing, &path),
        Err(FailReason::RequiredMarketingGoverningCarrier)
    );

    let mut operating_governing = plain_rule();
    operating_governing.criteria.operating_governing_excluded = vec![CARRIER.to_string()];
    assert_eq!(
        check(&operating_governing, &path),
        Err(FailReason::ExcludedOperatingGoverningCarrier)
    );
}

#[test]
fn round_trip_requirement_uses_journey_shape() {
    let round_trip = base_fare_path();
    let one_way = fare_path(vec![component(1, 1000.0, 0.0)]);

    let mut required = plain_rule();
    required.criteria.round_trip = Some(RoundTripRequirement::Required);
    assert_eq!(check(&required, &round_trip), Ok(()));
    assert_eq!(check(&required, &one_way), Err(FailReason::RoundTrip));

    let mut excluded_trip = plain_rule();
    excluded_trip.criteria.round_trip = Some(RoundTripRequirement::Excluded);
    assert_eq!(check(&excluded_trip, &round_trip), Err(FailReason::RoundTrip));
}

#[test]
fn fare_amount_limits_require_matching_currency() {
    let path = base_fare_path();

    let mut minimum = plain_rule();
    minimum.criteria.fare_amount_min = Some(FareAmountLimit {
        amount: 2500.0,
        currency: "USD".to_string(),
    });
    assert_eq!(check(&minimum, &path), Err(FailReason::FareAmountMin));

    let mut maximum = plain_rule();
    maximum.criteria.fare_amount_max = Some(FareAmountLimit {
        amount: 1500.0,
        currency: "USD".to_string(),
    });
    assert_eq!(check(&maximum, &path), Err(FailReason::FareAmountMax));

    let mut foreign = plain_rule();
    foreign.criteria.fare_amount_min = Some(FareAmountLimit {
        amount: 100.0,
        currency: "EUR".to_string(),
    });
    assert_eq!(check(&foreign, &path), Err(FailReason::FareCurrency));
}

#[test]
fn cabin_and_passenger_and_tour_code() {
    let mut path = base_fare_path();
    path.tour_code = Some("TOUR1".to_string());

    let mut cabin = plain_rule();
    cabin.criteria.cabin_required = vec![Cabin::Business];
    assert_eq!(check(&cabin, &path), Err(FailReason::RequiredCabin));

    let mut passenger = plain_rule();
    passenger.criteria.passenger_types_required = vec!["CNN".to_string()];
    assert_eq!(check(&passenger, &path), Err(FailReason::PassengerType));

    let mut tour = plain_rule();
    tour.criteria.tour_codes_excluded = vec!["TOUR1".to_string()];
    assert_eq!(check(&tour, &path), Err(FailReason::ExcludedTourCode));
}

#[test]
fn non_stop_pair_matches_airport_or_city() {
    let path = base_fare_path();

    let mut by_city = plain_rule();
    by_city.criteria.required_non_stop = vec![CityPair {
        origin: "DFW".to_string(),
        destination: "LON".to_string(),
    }];
    assert_eq!(check(&by_city, &path), Ok(()));

    let mut elsewhere = plain_rule();
    elsewhere.criteria.required_non_stop = vec![CityPair {
        origin: "DFW".to_string(),
        destination: "CDG".to_string(),
    }];
    assert_eq!(check(&elsewhere, &path), Err(FailReason::RequiredNonStop));
}

#[test]
fn connection_airport_lists() {
    let mut connecting = component(1, 1000.0, 0.0);
    connecting.segments = vec![
        segment("DFW", "JFK", CARRIER, 3, 6),
        segment("JFK", "LHR", CARRIER, 3, 10),
    ];
    let connecting = fare_path(vec![connecting]);
    let nonstop = base_fare_path();

    let mut excluded_airport = plain_rule();
    excluded_airport.criteria.connection_airports_excluded = vec!["JFK".to_string()];
    assert_eq!(
        check(&excluded_airport, &connecting),
        Err(FailReason::ExcludedConnectionAirport)
    );
    assert_eq!(check(&excluded_airport, &nonstop), Ok(()));

    let mut excluded_any = plain_rule();
    excluded_any.criteria.connection_airports_excluded = vec!["*ANY*".to_string()];
    assert_eq!(
        check(&excluded_any, &connecting),
        Err(FailReason::ExcludedConnectionAirport)
    );
    assert_eq!(check(&excluded_any, &nonstop), Ok(()));

    let mut required = plain_rule();
    required.criteria.connection_airports_required = vec!["JFK".to_string()];
    assert_eq!(check(&required, &connecting), Ok(()));
    assert_eq!(
        check(&required, &nonstop),
        Err(FailReason::RequiredConnectionAirport)
    );

    required.criteria.connection_airports_required = vec!["ORD".to_string()];
    assert_eq!(
        check(&required, &connecting),
        Err(FailReason::RequiredConnectionAirport)
    );

    required.criteria.connection_airports_required = vec!["*ANY*".to_string()];
    assert_eq!(check(&required, &connecting), Ok(()));
}

#[test]
fn ticket_designator_checks_follow_configuration() {
    let mut designated = base_fare_path();
    designated.components[0].ticket_designator = Some("AGT10".to_string());
    let plain = base_fare_path();
    let geo = geography();

    let mut required = plain_rule();
    required.criteria.ticket_designators_required = vec!["AGT%".to_string()];
    assert_eq!(check(&required, &designated), Ok(()));
    assert_eq!(
        check(&required, &plain),
        Err(FailReason::RequiredTicketDesignator)
    );

    required.criteria.ticket_designators_required = vec!["%".to_string()];
    assert_eq!(check(&required, &designated), Ok(()));
    assert_eq!(
        check(&required, &plain),
        Err(FailReason::RequiredTicketDesignator)
    );

    let mut excluded_any = plain_rule();
    excluded_any.criteria.ticket_designators_excluded = vec!["*ANY*".to_string()];
    assert_eq!(
        check(&excluded_any, &designated),
        Err(FailReason::ExcludedTicketDesignator)
    );
    assert_eq!(check(&excluded_any, &plain), Ok(()));

    let disabled = RuleValidator::new(&geo, false);
    assert_eq!(
        disabled.validate(&required, CARRIER, &plain, &plain.components[0]),
        Ok(())
    );
}

#[test]
fn fail_reasons_carry_long_and_short_texts() {
    assert_eq!(
        FailReason::FareBasisIncl.description(),
        "FAIL - NOT MATCH FARE BASIS"
    );
    assert_eq!(FailReason::FareBasisExcl.short_label(), "FAIL - FARE BASIS");
    assert_eq!(
        FailReason::PointOfSale.to_string(),
        "FAIL - NOT MATCH POINT OF SALE"
    );
    assert!(FailReason::Market.is_program_reason());
    assert!(!FailReason::RequiredCabin.is_program_reason());
}
