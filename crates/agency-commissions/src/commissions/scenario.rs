//! Self-contained evaluation input: reference data, rates, geography, request, and fare path.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use super::diagnostics::{DiagnosticSink, RecordingSink, TracingSink};
use super::engine::{CommissionEngine, CommissionError, CommissionOutcome};
use super::itinerary::{CommissionLedger, FarePath};
use super::reference::{InMemoryGeography, InMemoryReferenceData, ReferenceDataSet, StaticRateConverter};
use super::request::PricingRequest;
use crate::config::EngineConfig;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scenario {
    #[serde(default)]
    pub reference: ReferenceDataSet,
    #[serde(default)]
    pub geography: InMemoryGeography,
    #[serde(default)]
    pub rates: StaticRateConverter,
    pub request: PricingRequest,
    pub fare_path: FarePath,
}

#[derive(Debug, thiserror::Error)]
pub enum ScenarioError {
    #[error("unable to read scenario {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid scenario document: {0}")]
    Parse(#[from] serde_json::Error),
    #[error(transparent)]
    Commission(#[from] CommissionError),
}

/// Evaluation result returned to the CLI and HTTP callers.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScenarioReport {
    pub outcome: CommissionOutcome,
    pub ledger: CommissionLedger,
    /// Rendered diagnostic lines; only filled when the request asks for a diagnostic.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub diagnostics: Vec<String>,
}

impl Scenario {
    pub fn from_json(text: &str) -> Result<Self, ScenarioError> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn load(path: &Path) -> Result<Self, ScenarioError> {
        let text = fs::read_to_string(path).map_err(|source| ScenarioError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&text)
    }

    /// Narrows evaluation to one validating carrier.
    pub fn restrict_to_carrier(&mut self, carrier: &str) {
        self.request
            .diagnostic
            .get_or_insert_with(Default::default)
            .carrier = Some(carrier.to_string());
    }

    pub fn evaluate(self, config: EngineConfig) -> Result<ScenarioReport, ScenarioError> {
        let detailed = config.detailed_diagnostics;
        let engine = CommissionEngine::new(
            Arc::new(InMemoryReferenceData::new(self.reference)),
            Arc::new(self.rates),
            Arc::new(self.geography),
            config,
        );

        let request = self.request;
        let mut fare_path = self.fare_path;
        let mut recording = RecordingSink::default();
        let mut tracing_sink = TracingSink { detailed };
        let sink: &mut dyn DiagnosticSink = if request.diagnostic.is_some() {
            &mut recording
        } else {
            &mut tracing_sink
        };

        let outcome = engine.evaluate(&request, &mut fare_path, sink)?;

        Ok(ScenarioReport {
            outcome,
            ledger: fare_path.commissions,
            diagnostics: recording.render(detailed),
        })
    }
}
