use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::domain::{AgencyLocation, CarrierCode};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionKind {
    Pricing,
    /// Multi-itinerary shopping.
    Shopping,
    ItineraryShopping,
    Exchange,
    FareDisplay,
}

impl TransactionKind {
    pub const fn supports_agency_commission(self) -> bool {
        matches!(
            self,
            Self::Pricing | Self::Shopping | Self::ItineraryShopping
        )
    }
}

/// Commission typed in by the agent on the pricing entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind", content = "value")]
pub enum ManualCommission {
    Percent(f64),
    Amount(f64),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TicketingAgent {
    /// Travel agency pseudo-city; absent for airline agents.
    #[serde(default)]
    pub agency_location: Option<AgencyLocation>,
    /// City code of the selling location.
    pub agent_city: String,
    pub currency: String,
    #[serde(default)]
    pub manual_commission: Option<ManualCommission>,
}

/// Narrows a diagnostic run to one carrier or passenger type.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DiagnosticFilter {
    pub carrier: Option<CarrierCode>,
    pub passenger_type: Option<String>,
}

impl DiagnosticFilter {
    pub fn allows_carrier(&self, carrier: &str) -> bool {
        self.carrier
            .as_deref()
            .map(|wanted| wanted == carrier)
            .unwrap_or(true)
    }

    pub fn allows_passenger(&self, passenger_type: &str) -> bool {
        self.passenger_type
            .as_deref()
            .map(|wanted| wanted == passenger_type)
            .unwrap_or(true)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricingRequest {
    #[serde(default)]
    pub agent: Option<TicketingAgent>,
    pub ticketing_date: NaiveDate,
    pub transaction: TransactionKind,
    #[serde(default)]
    pub currency_override: Option<String>,
    #[serde(default)]
    pub no_pnr: bool,
    /// Agent requested the commission override keyword.
    #[serde(default)]
    pub commission_override_keyword: bool,
    #[serde(default)]
    pub diagnostic: Option<DiagnosticFilter>,
}

impl PricingRequest {
    pub fn agency_location(&self) -> Option<&str> {
        self.agent
            .as_ref()
            .and_then(|agent| agent.agency_location.as_deref())
            .filter(|location| !location.is_empty())
    }

    /// Currency commissions are reported in.
    pub fn payment_currency(&self) -> Option<&str> {
        self.currency_override
            .as_deref()
            .filter(|currency| !currency.is_empty())
            .or_else(|| self.agent.as_ref().map(|agent| agent.currency.as_str()))
    }

    pub fn point_of_sale(&self) -> Option<&str> {
        self.agent.as_ref().map(|agent| agent.agent_city.as_str())
    }

    pub fn manual_commission(&self) -> Option<&ManualCommission> {
        self.agent
            .as_ref()
            .and_then(|agent| agent.manual_commission.as_ref())
    }

    pub fn diagnostic_filter(&self) -> DiagnosticFilter {
        self.diagnostic.clone().unwrap_or_default()
    }
}
