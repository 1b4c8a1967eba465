//! Priced itinerary shapes consumed by the engine and the ledger it writes back.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use super::domain::{Cabin, CarrierCode, CommissionType, ContractId, ProgramId, RuleId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FareComponentId(pub u32);

impl fmt::Display for FareComponentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "FC{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TravelSegment {
    pub origin_airport: String,
    pub destination_airport: String,
    pub board_city: String,
    pub off_city: String,
    pub marketing_carrier: CarrierCode,
    pub operating_carrier: CarrierCode,
    pub departure: NaiveDateTime,
    pub arrival: NaiveDateTime,
}

/// One priced origin-destination usage within a fare path.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FareComponent {
    pub id: FareComponentId,
    pub origin: String,
    pub destination: String,
    pub governing_carrier: CarrierCode,
    pub fare_basis: String,
    pub booking_code: String,
    pub cabin: Cabin,
    pub fare_amount: f64,
    pub fare_currency: String,
    /// Fare total in calculation currency, surcharges included.
    pub total_fare_amount: f64,
    #[serde(default)]
    pub surcharge_amount: f64,
    #[serde(default)]
    pub ticket_designator: Option<String>,
    pub segments: Vec<TravelSegment>,
}

/// Identity of a fare market for memoizing program validation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FareMarketKey {
    pub origin: String,
    pub destination: String,
    pub governing_carrier: CarrierCode,
    legs: Vec<LegKey>,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
struct LegKey {
    origin_airport: String,
    destination_airport: String,
    marketing_carrier: CarrierCode,
    operating_carrier: CarrierCode,
    departure: NaiveDateTime,
    arrival: NaiveDateTime,
}

/// Identity of a fare within a market for memoizing rule validation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FareKey {
    pub market: FareMarketKey,
    pub fare_basis: String,
    booking_code: String,
    cabin: Cabin,
    fare_amount_bits: u64,
    fare_currency: String,
    ticket_designator: Option<String>,
}

impl FareComponent {
    pub fn market_key(&self) -> FareMarketKey {
        FareMarketKey {
            origin: self.origin.clone(),
            destination: self.destination.clone(),
            governing_carrier: self.governing_carrier.clone(),
            legs: self
                .segments
                .iter()
                .map(|segment| LegKey {
                    origin_airport: segment.origin_airport.clone(),
                    destination_airport: segment.destination_airport.clone(),
                    marketing_carrier: segment.marketing_carrier.clone(),
                    operating_carrier: segment.operating_carrier.clone(),
                    departure: segment.departure,
                    arrival: segment.arrival,
                })
                .collect(),
        }
    }

    pub fn fare_key(&self) -> FareKey {
        FareKey {
            market: self.market_key(),
            fare_basis: self.fare_basis.clone(),
            booking_code: self.booking_code.clone(),
            cabin: self.cabin,
            fare_amount_bits: self.fare_amount.to_bits(),
            fare_currency: self.fare_currency.clone(),
            ticket_designator: self.ticket_designator.clone(),
        }
    }

    /// Airports where the component changes planes: each arrival followed by the next departure.
    pub fn connection_points(&self) -> Vec<&str> {
        self.segments
            .windows(2)
            .flat_map(|pair| {
                [
                    pair[0].destination_airport.as_str(),
                    pair[1].origin_airport.as_str(),
                ]
            })
            .collect()
    }

    /// Ground time in minutes between consecutive segments.
    pub fn connection_minutes(&self) -> Vec<i64> {
        self.segments
            .windows(2)
            .map(|pair| (pair[1].departure - pair[0].arrival).num_minutes())
            .collect()
    }

    pub fn first_departure(&self) -> Option<NaiveDateTime> {
        self.segments.first().map(|segment| segment.departure)
    }

    /// Operating carrier of the first segment flown by the governing carrier.
    pub fn operating_governing_carrier(&self) -> &str {
        self.segments
            .iter()
            .find(|segment| segment.marketing_carrier == self.governing_carrier)
            .map(|segment| segment.operating_carrier.as_str())
            .unwrap_or(self.governing_carrier.as_str())
    }
}

/// Rule chosen for a fare component, detached from the reference data it came from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuleSelection {
    pub contract_id: ContractId,
    pub program_id: ProgramId,
    pub rule_id: RuleId,
    pub commission_type: CommissionType,
    pub value: f64,
    pub surcharge_applicable: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComponentCommission {
    pub amount: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub selection: Option<RuleSelection>,
}

/// Commission results attached to a fare path.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CommissionLedger {
    pub carrier_amounts: BTreeMap<CarrierCode, f64>,
    pub component_commissions: BTreeMap<FareComponentId, BTreeMap<CarrierCode, ComponentCommission>>,
}

impl CommissionLedger {
    pub fn is_empty(&self) -> bool {
        self.carrier_amounts.is_empty()
    }

    pub fn amount_for(&self, carrier: &str) -> Option<f64> {
        self.carrier_amounts.get(carrier).copied()
    }

    pub fn component_for(
        &self,
        component: FareComponentId,
        carrier: &str,
    ) -> Option<&ComponentCommission> {
        self.component_commissions
            .get(&component)
            .and_then(|per_carrier| per_carrier.get(carrier))
    }
}

/// Full priced itinerary for one passenger.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FarePath {
    pub passenger_type: String,
    pub validating_carrier: CarrierCode,
    #[serde(default)]
    pub alternate_validating_carriers: Vec<CarrierCode>,
    pub calculation_currency: String,
    pub base_fare_currency: String,
    #[serde(default)]
    pub non_iata_rounding: bool,
    #[serde(default)]
    pub tour_code: Option<String>,
    /// Negotiated (category 35) fare solution.
    #[serde(default)]
    pub negotiated: bool,
    pub segments: Vec<TravelSegment>,
    pub components: Vec<FareComponent>,
    #[serde(default)]
    pub commissions: CommissionLedger,
}

impl FarePath {
    /// Default validating carrier first, then alternates, without repeats.
    pub fn candidate_carriers(&self) -> Vec<CarrierCode> {
        let mut carriers: Vec<CarrierCode> = Vec::new();
        for carrier in std::iter::once(&self.validating_carrier)
            .chain(self.alternate_validating_carriers.iter())
        {
            if !carrier.is_empty() && !carriers.contains(carrier) {
                carriers.push(carrier.clone());
            }
        }
        carriers
    }

    pub fn journey_origin(&self) -> Option<&TravelSegment> {
        self.segments.first()
    }

    pub fn is_round_trip(&self) -> bool {
        match (self.segments.first(), self.segments.last()) {
            (Some(first), Some(last)) if self.segments.len() > 1 => {
                first.board_city == last.off_city
            }
            _ => false,
        }
    }

    pub fn component(&self, id: FareComponentId) -> Option<&FareComponent> {
        self.components.iter().find(|component| component.id == id)
    }

    pub fn store_carrier_commission(&mut self, carrier: &str, amount: f64) {
        self.commissions
            .carrier_amounts
            .insert(carrier.to_string(), amount);
    }

    pub fn store_component_commission(
        &mut self,
        component: FareComponentId,
        carrier: &str,
        commission: ComponentCommission,
    ) {
        self.commissions
            .component_commissions
            .entry(component)
            .or_default()
            .insert(carrier.to_string(), commission);
    }
}
