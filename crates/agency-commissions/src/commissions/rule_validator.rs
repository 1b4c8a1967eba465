use super::domain::{
    CityPair, CommissionRule, FareAmountLimit, LocKey, LocKind, RoundTripRequirement, RuleCriteria,
    EPSILON,
};
use super::itinerary::{FareComponent, FarePath, TravelSegment};
use super::matching::{is_any, like_match};
use super::reference::Geography;
use super::status::{FailReason, Validation};

/// Evaluates a rule's criteria against one fare component; the first failing criterion wins.
pub struct RuleValidator<'a> {
    geography: &'a dyn Geography,
    ticket_designator_check: bool,
}

impl<'a> RuleValidator<'a> {
    pub fn new(geography: &'a dyn Geography, ticket_designator_check: bool) -> Self {
        Self {
            geography,
            ticket_designator_check,
        }
    }

    pub fn validate(
        &self,
        rule: &CommissionRule,
        carrier: &str,
        fare_path: &FarePath,
        component: &FareComponent,
    ) -> Validation {
        let criteria = &rule.criteria;

        check_fare_basis(criteria, &component.fare_basis)?;
        check_fare_basis_fragment(criteria, &component.fare_basis)?;
        check_include_exclude(
            &criteria.booking_code_incl,
            &criteria.booking_code_excl,
            &component.booking_code,
            FailReason::BookingCodeIncl,
            FailReason::BookingCodeExcl,
        )?;
        check_segment_carriers(
            &criteria.operating_carrier_incl,
            &criteria.operating_carrier_excl,
            component.segments.iter().map(|segment| segment.operating_carrier.as_str()),
            FailReason::OperatingCarrierIncl,
            FailReason::OperatingCarrierExcl,
        )?;
        check_segment_carriers(
            &criteria.marketing_carrier_incl,
            &criteria.marketing_carrier_excl,
            component.segments.iter().map(|segment| segment.marketing_carrier.as_str()),
            FailReason::MarketingCarrierIncl,
            FailReason::MarketingCarrierExcl,
        )?;
        check_include_exclude(
            &criteria.ticketing_carrier_incl,
            &criteria.ticketing_carrier_excl,
            carrier,
            FailReason::TicketingCarrierIncl,
            FailReason::TicketingCarrierExcl,
        )?;
        check_include_exclude(
            &criteria.marketing_governing_required,
            &criteria.marketing_governing_excluded,
            &component.governing_carrier,
            FailReason::RequiredMarketingGoverningCarrier,
            FailReason::ExcludedMarketingGoverningCarrier,
        )?;
        check_include_exclude(
            &criteria.operating_governing_required,
            &criteria.operating_governing_excluded,
            component.operating_governing_carrier(),
            FailReason::RequiredOperatingGoverningCarrier,
            FailReason::ExcludedOperatingGoverningCarrier,
        )?;
        check_interline(criteria, component)?;
        check_round_trip(criteria, fare_path)?;
        check_fare_amount(criteria, component)?;
        check_include_exclude(
            &criteria.cabin_required,
            &criteria.cabin_excluded,
            &component.cabin,
            FailReason::RequiredCabin,
            FailReason::ExcludedCabin,
        )?;
        self.check_non_stop(criteria, component)?;
        check_connection_airports(criteria, component)?;
        check_passenger_type(criteria, fare_path)?;
        check_tour_code(criteria, fare_path)?;

        if self.ticket_designator_check {
            check_ticket_designator(criteria, component)?;
        }

        Ok(())
    }

    fn check_non_stop(&self, criteria: &RuleCriteria, component: &FareComponent) -> Validation {
        if criteria.required_non_stop.is_empty() {
            return Ok(());
        }

        let flown = criteria.required_non_stop.iter().any(|pair| {
            component
                .segments
                .iter()
                .any(|segment| self.segment_flies(segment, pair))
        });

        flown.then_some(()).ok_or(FailReason::RequiredNonStop)
    }

    fn segment_flies(&self, segment: &TravelSegment, pair: &CityPair) -> bool {
        self.point_matches(&segment.origin_airport, &segment.board_city, &pair.origin)
            && self.point_matches(
                &segment.destination_airport,
                &segment.off_city,
                &pair.destination,
            )
    }

    fn point_matches(&self, airport: &str, city: &str, wanted: &str) -> bool {
        airport == wanted
            || city == wanted
            || self
                .geography
                .is_in_loc(airport, &LocKey::new(LocKind::City, wanted))
    }
}

fn check_fare_basis(criteria: &RuleCriteria, fare_basis: &str) -> Validation {
    let first = fare_basis.chars().next();

    if !criteria.fare_basis_incl.is_empty()
        && !first
            .map(|code| criteria.fare_basis_incl.contains(&code))
            .unwrap_or(false)
    {
        return Err(FailReason::FareBasisIncl);
    }

    if first
        .map(|code| criteria.fare_basis_excl.contains(&code))
        .unwrap_or(false)
    {
        return Err(FailReason::FareBasisExcl);
    }

    Ok(())
}

fn check_fare_basis_fragment(criteria: &RuleCriteria, fare_basis: &str) -> Validation {
    if !criteria.fare_basis_fragment_incl.is_empty()
        && !criteria
            .fare_basis_fragment_incl
            .iter()
            .any(|pattern| like_match(pattern, fare_basis))
    {
        return Err(FailReason::FareBasisFragmentIncl);
    }

    if criteria
        .fare_basis_fragment_excl
        .iter()
        .any(|pattern| like_match(pattern, fare_basis))
    {
        return Err(FailReason::FareBasisFragmentExcl);
    }

    Ok(())
}

fn check_include_exclude<T, V>(
    include: &[T],
    exclude: &[T],
    value: &V,
    include_fail: FailReason,
    exclude_fail: FailReason,
) -> Validation
where
    T: PartialEq<V>,
    V: ?Sized,
{
    if !include.is_empty() && !include.iter().any(|entry| entry == value) {
        return Err(include_fail);
    }
    if exclude.iter().any(|entry| entry == value) {
        return Err(exclude_fail);
    }
    Ok(())
}

/// Included carriers must cover every segment; any excluded carrier on a segment fails.
fn check_segment_carriers<'s>(
    include: &[String],
    exclude: &[String],
    carriers: impl Iterator<Item = &'s str> + Clone,
    include_fail: FailReason,
    exclude_fail: FailReason,
) -> Validation {
    if !include.is_empty()
        && !carriers
            .clone()
            .all(|carrier| include.iter().any(|entry| entry == carrier))
    {
        return Err(include_fail);
    }

    if carriers
        .into_iter()
        .any(|carrier| exclude.iter().any(|entry| entry == carrier))
    {
        return Err(exclude_fail);
    }

    Ok(())
}

fn check_interline(criteria: &RuleCriteria, component: &FareComponent) -> Validation {
    if !criteria.interline_connection_required {
        return Ok(());
    }

    let mut carriers = component
        .segments
        .iter()
        .map(|segment| segment.marketing_carrier.as_str());
    let interline = match carriers.next() {
        Some(first) => carriers.any(|carrier| carrier != first),
        None => false,
    };

    interline.then_some(()).ok_or(FailReason::InterlineConnection)
}

fn check_round_trip(criteria: &RuleCriteria, fare_path: &FarePath) -> Validation {
    let passes = match criteria.round_trip {
        None => true,
        Some(RoundTripRequirement::Required) => fare_path.is_round_trip(),
        Some(RoundTripRequirement::Excluded) => !fare_path.is_round_trip(),
    };

    passes.then_some(()).ok_or(FailReason::RoundTrip)
}

fn check_fare_amount(criteria: &RuleCriteria, component: &FareComponent) -> Validation {
    let currency_matches =
        |limit: &FareAmountLimit| limit.currency == component.fare_currency;

    if let Some(min) = &criteria.fare_amount_min {
        if !currency_matches(min) {
            return Err(FailReason::FareCurrency);
        }
        if component.fare_amount < min.amount - EPSILON {
            return Err(FailReason::FareAmountMin);
        }
    }

    if let Some(max) = &criteria.fare_amount_max {
        if !currency_matches(max) {
            return Err(FailReason::FareCurrency);
        }
        if component.fare_amount > max.amount + EPSILON {
            return Err(FailReason::FareAmountMax);
        }
    }

    Ok(())
}

fn check_connection_airports(criteria: &RuleCriteria, component: &FareComponent) -> Validation {
    let connections = component.connection_points();
    let listed = |list: &[String], point: &str| list.iter().any(|entry| entry == point);

    let excluded = criteria.connection_airports_excluded.as_slice();
    if !connections.is_empty() {
        let any_excluded = excluded.iter().any(|entry| is_any(entry));
        if any_excluded || connections.iter().any(|point| listed(excluded, *point)) {
            return Err(FailReason::ExcludedConnectionAirport);
        }
    }

    let required = criteria.connection_airports_required.as_slice();
    if required.is_empty() {
        return Ok(());
    }
    if connections.is_empty() {
        return Err(FailReason::RequiredConnectionAirport);
    }
    if required.iter().any(|entry| is_any(entry))
        || connections.iter().all(|point| listed(required, *point))
    {
        Ok(())
    } else {
        Err(FailReason::RequiredConnectionAirport)
    }
}

fn check_passenger_type(criteria: &RuleCriteria, fare_path: &FarePath) -> Validation {
    if criteria.passenger_types_required.is_empty()
        || criteria
            .passenger_types_required
            .iter()
            .any(|kind| kind == &fare_path.passenger_type)
    {
        Ok(())
    } else {
        Err(FailReason::PassengerType)
    }
}

fn check_tour_code(criteria: &RuleCriteria, fare_path: &FarePath) -> Validation {
    match fare_path.tour_code.as_deref() {
        Some(code)
            if !code.is_empty()
                && criteria.tour_codes_excluded.iter().any(|entry| entry == code) =>
        {
            Err(FailReason::ExcludedTourCode)
        }
        _ => Ok(()),
    }
}

fn check_ticket_designator(criteria: &RuleCriteria, component: &FareComponent) -> Validation {
    let designator = component
        .ticket_designator
        .as_deref()
        .filter(|value| !value.is_empty());
    let matches = |pattern: &String, value: &str| is_any(pattern) || like_match(pattern, value);

    if !criteria.ticket_designators_required.is_empty() {
        let Some(value) = designator else {
            return Err(FailReason::RequiredTicketDesignator);
        };
        if !criteria
            .ticket_designators_required
            .iter()
            .any(|pattern| matches(pattern, value))
        {
            return Err(FailReason::RequiredTicketDesignator);
        }
    }

    if let Some(value) = designator {
        if criteria
            .ticket_designators_excluded
            .iter()
            .any(|pattern| matches(pattern, value))
        {
            return Err(FailReason::ExcludedTicketDesignator);
        }
    }

    Ok(())
}
