//! Program and rule validation outcomes with their diagnostic texts.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Why a commission program or rule did not apply to a fare component.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailReason {
    FareBasisIncl,
    FareBasisExcl,
    FareBasisFragmentIncl,
    FareBasisFragmentExcl,
    BookingCodeIncl,
    BookingCodeExcl,
    OperatingCarrierIncl,
    OperatingCarrierExcl,
    MarketingCarrierIncl,
    MarketingCarrierExcl,
    TicketingCarrierIncl,
    TicketingCarrierExcl,
    RequiredMarketingGoverningCarrier,
    ExcludedMarketingGoverningCarrier,
    RequiredOperatingGoverningCarrier,
    ExcludedOperatingGoverningCarrier,
    InterlineConnection,
    RoundTrip,
    FareAmountMin,
    FareAmountMax,
    FareCurrency,
    RequiredCabin,
    ExcludedCabin,
    RequiredNonStop,
    RequiredConnectionAirport,
    ExcludedConnectionAirport,
    PassengerType,
    ExcludedTourCode,
    RequiredTicketDesignator,
    ExcludedTicketDesignator,
    ProgramNotValid,
    PointOfSale,
    PointOfOrigin,
    TravelDate,
    TicketingDate,
    Market,
    MaxConnectionTime,
}

impl FailReason {
    pub const fn is_program_reason(self) -> bool {
        matches!(
            self,
            Self::ProgramNotValid
                | Self::PointOfSale
                | Self::PointOfOrigin
                | Self::TravelDate
                | Self::TicketingDate
                | Self::Market
                | Self::MaxConnectionTime
        )
    }

    /// Detailed diagnostic line.
    pub const fn description(self) -> &'static str {
        match self {
            Self::FareBasisIncl => "FAIL - NOT MATCH FARE BASIS",
            Self::FareBasisExcl => "FAIL - MATCH EXCL FARE BASIS CODE",
            Self::FareBasisFragmentIncl => "FAIL - NOT MATCH FARE BASIS FRAGMENT",
            Self::FareBasisFragmentExcl => "FAIL - MATCH EXCL FARE BASIS FRAGMENT",
            Self::BookingCodeIncl => "FAIL - NOT MATCH CLASS OF SERVICE",
            Self::BookingCodeExcl => "FAIL - MATCH EXCL CLASS OF SERVICE",
            Self::OperatingCarrierIncl => "FAIL - NOT MATCH OPERATING CARRIER",
            Self::OperatingCarrierExcl => "FAIL - MATCH EXCL OPERATING CARRIER",
            Self::MarketingCarrierIncl => "FAIL - NOT MATCH MARKETING CARRIER",
            Self::MarketingCarrierExcl => "FAIL - MATCH EXCL MARKETING CARRIER",
            Self::TicketingCarrierIncl => "FAIL - NOT MATCH TICKETING CARRIER",
            Self::TicketingCarrierExcl => "FAIL - MATCH EXCL TICKETING CARRIER",
            Self::RequiredMarketingGoverningCarrier => "FAIL - NOT MATCH REQ MKT GOV CARRIER",
            Self::ExcludedMarketingGoverningCarrier => "FAIL - MATCH EXCL MKT GOV CARRIER",
            Self::RequiredOperatingGoverningCarrier => "FAIL - NOT MATCH REQ OPER GOV CARRIER",
            Self::ExcludedOperatingGoverningCarrier => "FAIL - MATCH EXCL OPER GOV CARRIER",
            Self::InterlineConnection => "FAIL - NOT INTERLINE CONNECTION",
            Self::RoundTrip => "FAIL - NOT MATCH ROUND TRIP",
            Self::FareAmountMin => "FAIL - NOT MATCH MIN FARE AMOUNT",
            Self::FareAmountMax => "FAIL - NOT MATCH MAX FARE AMOUNT",
            Self::FareCurrency => "FAIL - NOT MATCH FARE CURRENCY",
            Self::RequiredCabin => "FAIL - NOT MATCH CABIN",
            Self::ExcludedCabin => "FAIL - MATCH EXCL CABIN",
            Self::RequiredNonStop => "FAIL - NOT MATCH NON STOP",
            Self::RequiredConnectionAirport => "FAIL - NOT MATCH CONNECTION AIRPORT",
            Self::ExcludedConnectionAirport => "FAIL - MATCH EXCL CONNECTION AIRPORT",
            Self::PassengerType => "FAIL - NOT MATCH PSGR TYPE",
            Self::ExcludedTourCode => "FAIL - MATCH EXCL TOUR CODE",
            Self::RequiredTicketDesignator => "FAIL - NOT MATCH TKT DESIGNATOR",
            Self::ExcludedTicketDesignator => "FAIL - MATCH EXCL TKT DESIGNATOR",
            Self::ProgramNotValid => "FAIL - PROGRAM NOT VALIDATED",
            Self::PointOfSale => "FAIL - NOT MATCH POINT OF SALE",
            Self::PointOfOrigin => "FAIL - NOT MATCH POINT OF ORIGIN",
            Self::TravelDate => "FAIL - NOT MATCH TRAVEL DATE",
            Self::TicketingDate => "FAIL - NOT MATCH TICKETING DATE",
            Self::Market => "FAIL - NOT MATCH MARKET",
            Self::MaxConnectionTime => "FAIL - NOT MATCH CONNECTION TIME",
        }
    }

    /// Condensed line used when several rules are listed together.
    pub const fn short_label(self) -> &'static str {
        match self {
            Self::FareBasisIncl | Self::FareBasisExcl => "FAIL - FARE BASIS",
            Self::FareBasisFragmentIncl | Self::FareBasisFragmentExcl => {
                "FAIL - FARE BASIS FRAGMENT"
            }
            Self::BookingCodeIncl | Self::BookingCodeExcl => "FAIL - CLASS OF SERVICE",
            Self::OperatingCarrierIncl | Self::OperatingCarrierExcl => "FAIL - OPERATING CARRIER",
            Self::MarketingCarrierIncl | Self::MarketingCarrierExcl => "FAIL - MARKETING CARRIER",
            Self::TicketingCarrierIncl | Self::TicketingCarrierExcl => "FAIL - TICKETING CARRIER",
            Self::RequiredMarketingGoverningCarrier | Self::ExcludedMarketingGoverningCarrier => {
                "FAIL - MARKET GOV CARRIER"
            }
            Self::RequiredOperatingGoverningCarrier | Self::ExcludedOperatingGoverningCarrier => {
                "FAIL - OPER GOV CARRIER"
            }
            Self::InterlineConnection => "FAIL - INTERLINE CONNECTION",
            Self::RoundTrip => "FAIL - ROUND TRIP",
            Self::FareAmountMin => "FAIL - MIN FARE AMOUNT",
            Self::FareAmountMax => "FAIL - MAX FARE AMOUNT",
            Self::FareCurrency => "FAIL - FARE CURRENCY",
            Self::RequiredCabin | Self::ExcludedCabin => "FAIL - CABIN",
            Self::RequiredNonStop => "FAIL - NON STOP",
            Self::RequiredConnectionAirport | Self::ExcludedConnectionAirport => {
                "FAIL - CONNECTION AIRPORT"
            }
            Self::PassengerType => "FAIL - PSGR TYPE",
            Self::ExcludedTourCode => "FAIL - TOUR CODE",
            Self::RequiredTicketDesignator | Self::ExcludedTicketDesignator => {
                "FAIL - TKT DESIGNATOR"
            }
            Self::ProgramNotValid => "FAIL - NOT VALIDATED",
            Self::PointOfSale => "FAIL - POINT OF SALE",
            Self::PointOfOrigin => "FAIL - POINT OF ORIGIN",
            Self::TravelDate => "FAIL - TRAVEL DATE",
            Self::TicketingDate => "FAIL - TICKETING DATE",
            Self::Market => "FAIL - MARKET",
            Self::MaxConnectionTime => "FAIL - CONNECTION TIME",
        }
    }
}

impl fmt::Display for FailReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.description())
    }
}

/// Result of a single validator pass.
pub type Validation = Result<(), FailReason>;

pub const PASS_LABEL: &str = "PASS";

pub fn status_label(status: &Validation, detailed: bool) -> &'static str {
    match status {
        Ok(()) => PASS_LABEL,
        Err(reason) if detailed => reason.description(),
        Err(reason) => reason.short_label(),
    }
}
