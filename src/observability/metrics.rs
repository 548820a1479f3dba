//! Metrics for the normalization run.
//!
//! Everything is recorded through the `metrics` facade. No exporter is
//! installed here; an embedding process can attach any recorder and the
//! calls below start reporting.

use std::fmt;

/// Every metric name the registry emits
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MetricName {
    // Ingest metrics
    IngestRowsRead,
    IngestBytesRead,

    // Quality gate metrics
    QualityGateRecordsAccepted,
    QualityGateRecordsDropped,
    QualityGateMissingFields,

    // Normalize metrics
    NormalizeEntitiesEmitted,
    NormalizeDistinctHotels,
    NormalizeGradeAssigned,

    // Store metrics
    StorePublishSuccess,
    StorePublishError,
    StoreRowsWritten,
}

impl MetricName {
    pub fn as_str(&self) -> &'static str {
        match self {
            MetricName::IngestRowsRead => "registry_ingest_rows_read_total",
            MetricName::IngestBytesRead => "registry_ingest_bytes_read",
            MetricName::QualityGateRecordsAccepted => "registry_quality_gate_records_accepted_total",
            MetricName::QualityGateRecordsDropped => "registry_quality_gate_records_dropped_total",
            MetricName::QualityGateMissingFields => "registry_quality_gate_missing_fields_total",
            MetricName::NormalizeEntitiesEmitted => "registry_normalize_entities_emitted_total",
            MetricName::NormalizeDistinctHotels => "registry_normalize_distinct_hotels",
            MetricName::NormalizeGradeAssigned => "registry_normalize_grade_assigned_total",
            MetricName::StorePublishSuccess => "registry_store_publish_success_total",
            MetricName::StorePublishError => "registry_store_publish_error_total",
            MetricName::StoreRowsWritten => "registry_store_rows_written_total",
        }
    }

    /// Get all metric names as an iterator
    pub fn all_metrics() -> impl Iterator<Item = MetricName> {
        use MetricName::*;
        [
            IngestRowsRead,
            IngestBytesRead,
            QualityGateRecordsAccepted,
            QualityGateRecordsDropped,
            QualityGateMissingFields,
            NormalizeEntitiesEmitted,
            NormalizeDistinctHotels,
            NormalizeGradeAssigned,
            StorePublishSuccess,
            StorePublishError,
            StoreRowsWritten,
        ]
        .into_iter()
    }
}

impl fmt::Display for MetricName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

pub mod ingest {
    use super::MetricName;

    pub fn rows_read(count: usize) {
        ::metrics::counter!(MetricName::IngestRowsRead.as_str()).increment(count as u64);
    }

    pub fn bytes_read(bytes: usize) {
        ::metrics::histogram!(MetricName::IngestBytesRead.as_str()).record(bytes as f64);
    }
}

pub mod quality_gate {
    use super::MetricName;

    pub fn record_accepted() {
        ::metrics::counter!(MetricName::QualityGateRecordsAccepted.as_str()).increment(1);
    }

    pub fn record_dropped() {
        ::metrics::counter!(MetricName::QualityGateRecordsDropped.as_str()).increment(1);
    }

    /// Count one missing required field, labelled by field name
    pub fn missing_field(field: &str) {
        ::metrics::counter!(MetricName::QualityGateMissingFields.as_str(), "field" => field.to_string())
            .increment(1);
    }
}

pub mod normalize {
    use super::MetricName;
    use crate::domain::Grade;

    pub fn entities_emitted(count: usize) {
        ::metrics::counter!(MetricName::NormalizeEntitiesEmitted.as_str()).increment(count as u64);
    }

    pub fn distinct_hotels(count: usize) {
        ::metrics::gauge!(MetricName::NormalizeDistinctHotels.as_str()).set(count as f64);
    }

    pub fn grade_assigned(grade: Grade) {
        ::metrics::counter!(MetricName::NormalizeGradeAssigned.as_str(), "grade" => grade.as_str())
            .increment(1);
    }
}

pub mod store {
    use super::MetricName;

    pub fn publish_success(rows: usize) {
        ::metrics::counter!(MetricName::StorePublishSuccess.as_str()).increment(1);
        ::metrics::counter!(MetricName::StoreRowsWritten.as_str()).increment(rows as u64);
    }

    pub fn publish_error() {
        ::metrics::counter!(MetricName::StorePublishError.as_str()).increment(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_metric_names_are_unique_and_prefixed() {
        let names: Vec<&str> = MetricName::all_metrics().map(|m| m.as_str()).collect();
        let unique: HashSet<&str> = names.iter().copied().collect();
        assert_eq!(names.len(), unique.len());
        assert!(names.iter().all(|n| n.starts_with("registry_")));
    }

    #[test]
    fn test_recording_without_recorder_is_a_no_op() {
        ingest::rows_read(3);
        quality_gate::missing_field("rooms");
        normalize::grade_assigned(crate::domain::Grade::Unrated);
        store::publish_success(2);
    }
}
