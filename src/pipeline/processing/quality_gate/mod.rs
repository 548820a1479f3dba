use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::debug;

use crate::constants::*;
use crate::pipeline::processing::coerce::CoercedRecord;

/// Quality gate decision for a record
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum QualityDecision {
    /// Every required field is present
    Accept,
    /// At least one required field is missing; the record is dropped whole
    Drop,
}

/// A required field that was missing after coercion
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct QualityIssue {
    pub field: String,
    pub description: String,
}

/// Quality assessment result for one record
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct QualityAssessment {
    pub line: u64,
    pub decision: QualityDecision,
    pub issues: Vec<QualityIssue>,
}

/// A record that passed the completeness check. Required fields are no
/// longer optional.
#[derive(Debug, Clone, PartialEq)]
pub struct CompleteRecord {
    pub line: u64,
    pub name: Option<String>,
    pub district: String,
    pub accommodation_type: String,
    pub grade_code: Option<String>,
    pub rooms: u32,
    pub aga_division: String,
    pub local_authority: String,
    pub latitude: f64,
    pub longitude: f64,
    pub address: Option<String>,
    pub extra: BTreeMap<String, Option<String>>,
}

/// Trait for the quality checkpoint between coercion and normalization
pub trait QualityGate {
    fn assess(&self, record: &CoercedRecord) -> QualityAssessment;

    /// Convert an accepted record, or return the assessment explaining the drop
    fn admit(&self, record: CoercedRecord) -> Result<CompleteRecord, QualityAssessment>;
}

/// The single quality gate of the registry: a row survives only when
/// rooms, district, type, AGA division, local authority and both
/// coordinates are all present.
#[derive(Debug, Clone, Copy, Default)]
pub struct CompletenessGate;

impl CompletenessGate {
    pub fn new() -> Self {
        Self
    }

    fn missing_fields(record: &CoercedRecord) -> Vec<&'static str> {
        let present = [
            (COL_ROOMS, record.rooms.is_some()),
            (COL_DISTRICT, record.district.is_some()),
            (COL_TYPE, record.accommodation_type.is_some()),
            (COL_AGA_DIVISION, record.aga_division.is_some()),
            (COL_LOCAL_AUTHORITY, record.local_authority.is_some()),
            (COL_LATITUDE, record.latitude.is_some()),
            (COL_LONGITUDE, record.longitude.is_some()),
        ];
        debug_assert_eq!(present.len(), COMPLETENESS_FIELDS.len());

        present
            .iter()
            .filter(|(_, ok)| !ok)
            .map(|(field, _)| *field)
            .collect()
    }
}

impl QualityGate for CompletenessGate {
    fn assess(&self, record: &CoercedRecord) -> QualityAssessment {
        let issues: Vec<QualityIssue> = Self::missing_fields(record)
            .into_iter()
            .map(|field| QualityIssue {
                field: field.to_string(),
                description: format!("Required field '{}' is missing or not parseable", field),
            })
            .collect();

        let decision = if issues.is_empty() {
            QualityDecision::Accept
        } else {
            QualityDecision::Drop
        };

        QualityAssessment {
            line: record.line,
            decision,
            issues,
        }
    }

    fn admit(&self, record: CoercedRecord) -> Result<CompleteRecord, QualityAssessment> {
        let assessment = self.assess(&record);
        if assessment.decision == QualityDecision::Drop {
            return Err(assessment);
        }

        match record {
            CoercedRecord {
                line,
                name,
                district: Some(district),
                accommodation_type: Some(accommodation_type),
                grade_code,
                rooms: Some(rooms),
                aga_division: Some(aga_division),
                local_authority: Some(local_authority),
                latitude: Some(latitude),
                longitude: Some(longitude),
                address,
                extra,
            } => Ok(CompleteRecord {
                line,
                name,
                district,
                accommodation_type,
                grade_code,
                rooms,
                aga_division,
                local_authority,
                latitude,
                longitude,
                address,
                extra,
            }),
            _ => Err(assessment),
        }
    }
}

/// Records split by the gate, in input order
#[derive(Debug, Clone, Default)]
pub struct GateOutcome {
    pub passed: Vec<CompleteRecord>,
    pub dropped: Vec<QualityAssessment>,
}

impl GateOutcome {
    /// How many dropped records lacked each field
    pub fn drop_reasons(&self) -> BTreeMap<String, usize> {
        let mut reasons = BTreeMap::new();
        for assessment in &self.dropped {
            for issue in &assessment.issues {
                *reasons.entry(issue.field.clone()).or_insert(0) += 1;
            }
        }
        reasons
    }
}

/// Run every record through the gate, keeping survivors in input order
pub fn retain_complete<G: QualityGate + ?Sized>(
    gate: &G,
    records: Vec<CoercedRecord>,
) -> GateOutcome {
    let mut outcome = GateOutcome::default();

    for record in records {
        match gate.admit(record) {
            Ok(complete) => {
                crate::observability::metrics::quality_gate::record_accepted();
                outcome.passed.push(complete);
            }
            Err(assessment) => {
                crate::observability::metrics::quality_gate::record_dropped();
                for issue in &assessment.issues {
                    crate::observability::metrics::quality_gate::missing_field(&issue.field);
                }
                debug!(
                    line = assessment.line,
                    missing = ?assessment.issues.iter().map(|i| i.field.as_str()).collect::<Vec<_>>(),
                    "Dropping incomplete record"
                );
                outcome.dropped.push(assessment);
            }
        }
    }

    outcome
}
