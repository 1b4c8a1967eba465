use chrono::NaiveDate;

use super::domain::{CommissionProgram, LocKey, LocRestriction, MarketRestriction};
use super::itinerary::{FareComponent, FarePath};
use super::reference::Geography;
use super::request::PricingRequest;
use super::status::{FailReason, Validation};

/// Checks a commission program against the request and one fare component.
///
/// Checks run in a fixed order: program validity, point of sale, point of origin, travel date,
/// ticketing date, market, connection time.
pub struct ProgramValidator<'a> {
    geography: &'a dyn Geography,
    request: &'a PricingRequest,
}

type ProgramCheck<'a> =
    fn(&ProgramValidator<'a>, &CommissionProgram, &FarePath, &FareComponent) -> Validation;

impl<'a> ProgramValidator<'a> {
    pub fn new(geography: &'a dyn Geography, request: &'a PricingRequest) -> Self {
        Self { geography, request }
    }

    fn checks() -> [ProgramCheck<'a>; 7] {
        [
            Self::check_validity,
            Self::check_point_of_sale,
            Self::check_point_of_origin,
            Self::check_travel_date,
            Self::check_ticketing_date,
            Self::check_market,
            Self::check_connection_time,
        ]
    }

    /// Stops at the first failing check.
    pub fn validate(
        &self,
        program: &CommissionProgram,
        fare_path: &FarePath,
        component: &FareComponent,
    ) -> Validation {
        for check in Self::checks() {
            check(self, program, fare_path, component)?;
        }
        Ok(())
    }

    /// Runs every check and reports all failures in check order.
    pub fn validate_all(
        &self,
        program: &CommissionProgram,
        fare_path: &FarePath,
        component: &FareComponent,
    ) -> Vec<FailReason> {
        Self::checks()
            .into_iter()
            .filter_map(|check| check(self, program, fare_path, component).err())
            .collect()
    }

    fn ticketing_date(&self) -> NaiveDate {
        self.request.ticketing_date
    }

    fn check_validity(
        &self,
        program: &CommissionProgram,
        _fare_path: &FarePath,
        _component: &FareComponent,
    ) -> Validation {
        let date = self.ticketing_date();
        let started = program.effective.map(|day| day <= date).unwrap_or(true);
        let not_expired = program.expire.map(|day| date <= day).unwrap_or(true);
        let not_discontinued = program.discontinue.map(|day| date <= day).unwrap_or(true);

        if started && not_expired && not_discontinued {
            Ok(())
        } else {
            Err(FailReason::ProgramNotValid)
        }
    }

    fn check_point_of_sale(
        &self,
        program: &CommissionProgram,
        _fare_path: &FarePath,
        _component: &FareComponent,
    ) -> Validation {
        if program.point_of_sale.is_empty() {
            return Ok(());
        }

        let points: Vec<&str> = self.request.point_of_sale().into_iter().collect();
        self.restriction_passes(&program.point_of_sale, &points)
            .then_some(())
            .ok_or(FailReason::PointOfSale)
    }

    fn check_point_of_origin(
        &self,
        program: &CommissionProgram,
        fare_path: &FarePath,
        _component: &FareComponent,
    ) -> Validation {
        if program.point_of_origin.is_empty() {
            return Ok(());
        }

        let points: Vec<&str> = fare_path
            .journey_origin()
            .map(|segment| vec![segment.origin_airport.as_str(), segment.board_city.as_str()])
            .unwrap_or_default();
        self.restriction_passes(&program.point_of_origin, &points)
            .then_some(())
            .ok_or(FailReason::PointOfOrigin)
    }

    fn check_travel_date(
        &self,
        program: &CommissionProgram,
        _fare_path: &FarePath,
        component: &FareComponent,
    ) -> Validation {
        if program.travel_dates.is_empty() {
            return Ok(());
        }

        let Some(departure) = component.first_departure() else {
            return Err(FailReason::TravelDate);
        };

        program
            .travel_dates
            .iter()
            .any(|window| window.contains(departure.date()))
            .then_some(())
            .ok_or(FailReason::TravelDate)
    }

    fn check_ticketing_date(
        &self,
        program: &CommissionProgram,
        _fare_path: &FarePath,
        _component: &FareComponent,
    ) -> Validation {
        match program.ticketing_dates {
            Some(window) if !window.contains(self.ticketing_date()) => {
                Err(FailReason::TicketingDate)
            }
            _ => Ok(()),
        }
    }

    fn check_market(
        &self,
        program: &CommissionProgram,
        _fare_path: &FarePath,
        component: &FareComponent,
    ) -> Validation {
        if program.markets.is_empty() {
            return Ok(());
        }

        let matches = |market: &MarketRestriction| self.market_matches(market, component);

        if program
            .markets
            .iter()
            .filter(|market| market.exclude)
            .any(matches)
        {
            return Err(FailReason::Market);
        }

        let mut included = program.markets.iter().filter(|market| !market.exclude).peekable();
        if included.peek().is_none() || included.any(matches) {
            Ok(())
        } else {
            Err(FailReason::Market)
        }
    }

    fn check_connection_time(
        &self,
        program: &CommissionProgram,
        _fare_path: &FarePath,
        component: &FareComponent,
    ) -> Validation {
        let Some(limit) = program.max_connection_minutes else {
            return Ok(());
        };

        if component
            .connection_minutes()
            .into_iter()
            .any(|minutes| minutes > i64::from(limit))
        {
            Err(FailReason::MaxConnectionTime)
        } else {
            Ok(())
        }
    }

    fn market_matches(&self, market: &MarketRestriction, component: &FareComponent) -> bool {
        let forward = self.in_loc(&component.origin, &market.origin)
            && self.in_loc(&component.destination, &market.destination);
        let reverse = market.bidirectional
            && self.in_loc(&component.origin, &market.destination)
            && self.in_loc(&component.destination, &market.origin);
        forward || reverse
    }

    /// Excluded entries veto; when include entries exist one of them must match.
    fn restriction_passes(&self, restrictions: &[LocRestriction], points: &[&str]) -> bool {
        let matches = |restriction: &&LocRestriction| {
            points
                .iter()
                .any(|point| self.in_loc(point, &restriction.loc))
        };

        if restrictions.iter().filter(|entry| entry.exclude).any(|entry| matches(&entry)) {
            return false;
        }

        let mut included = restrictions.iter().filter(|entry| !entry.exclude).peekable();
        included.peek().is_none() || included.any(|entry| matches(&entry))
    }

    fn in_loc(&self, point: &str, loc: &LocKey) -> bool {
        !point.is_empty() && self.geography.is_in_loc(point, loc)
    }
}
