use serde::{Deserialize, Serialize};
use std::fmt;

use super::domain::HandshakeRecord;
use super::itinerary::FarePath;
use super::request::{PricingRequest, TransactionKind};

/// Why agency commission evaluation was skipped for a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotApplicableReason {
    ExchangeOrNoPnr,
    NotTravelAgency,
    NegotiatedFare,
    ManualCommissionWithOverride,
    TransactionNotSupported,
    NoSecurityHandshake,
}

impl NotApplicableReason {
    pub const fn description(self) -> &'static str {
        match self {
            Self::ExchangeOrNoPnr => "AGENCY COMMISSION NOT SUPPORTED FOR EXCHANGE OR NO PNR ENTRY",
            Self::NotTravelAgency => "REQUEST NOT FROM TRAVEL AGENCY",
            Self::NegotiatedFare => "NEGOTIATED FARE SOLUTION",
            Self::ManualCommissionWithOverride => "AGENT SPECIFIED COMMISSION WITH OVERRIDE",
            Self::TransactionNotSupported => "TRANSACTION TYPE NOT SUPPORTED",
            Self::NoSecurityHandshake => "NO SECURITY HANDSHAKE FOUND",
        }
    }
}

impl fmt::Display for NotApplicableReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.description())
    }
}

/// Gates checked before any contract is looked up, in the order they are listed.
pub fn check_applicability(
    request: &PricingRequest,
    fare_path: &FarePath,
    handshakes: &[HandshakeRecord],
) -> Result<(), NotApplicableReason> {
    if request.transaction == TransactionKind::Exchange || request.no_pnr {
        return Err(NotApplicableReason::ExchangeOrNoPnr);
    }
    if request.agency_location().is_none() {
        return Err(NotApplicableReason::NotTravelAgency);
    }
    if fare_path.negotiated {
        return Err(NotApplicableReason::NegotiatedFare);
    }
    if request.manual_commission().is_some() && request.commission_override_keyword {
        return Err(NotApplicableReason::ManualCommissionWithOverride);
    }
    if !request.transaction.supports_agency_commission() {
        return Err(NotApplicableReason::TransactionNotSupported);
    }
    if handshakes.is_empty() {
        return Err(NotApplicableReason::NoSecurityHandshake);
    }
    Ok(())
}
