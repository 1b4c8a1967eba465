use chrono::NaiveDate;
use std::collections::BTreeMap;
use std::sync::Arc;

use super::domain::{CommissionContract, ContractId, HandshakeRecord, ANY_CARRIER};
use super::reference::CommissionDataSource;

/// Eligible contracts for one carrier and agency, deduplicated and in id order.
///
/// A contract qualifies when it is active, not inhibited, valid on the ticketing date, and owned
/// by a location some handshake record targets. Carrier-agnostic contracts are included.
pub fn discover_contracts(
    data: &dyn CommissionDataSource,
    vendor: &str,
    carrier: &str,
    agency: &str,
    ticketing_date: NaiveDate,
    handshakes: &[HandshakeRecord],
) -> Vec<Arc<CommissionContract>> {
    let mut eligible: BTreeMap<ContractId, Arc<CommissionContract>> = BTreeMap::new();

    let candidates = data
        .commission_contracts(vendor, carrier, agency)
        .into_iter()
        .chain(data.commission_contracts(vendor, ANY_CARRIER, agency));

    for contract in candidates {
        let trusted = handshakes
            .iter()
            .any(|record| record.security_target_location == contract.source_location);
        if trusted && contract.is_usable_on(ticketing_date) {
            eligible.entry(contract.id).or_insert(contract);
        }
    }

    eligible.into_values().collect()
}
