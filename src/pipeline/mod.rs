//! The normalization pipeline: raw registry table in, canonical table out.
//!
//! Steps run in a fixed order over the whole snapshot:
//! header canonicalization (in `ingestion`), placeholder and numeric
//! coercion, the completeness gate, id assignment, grade mapping and text
//! normalization. Nothing here touches the filesystem.

pub mod ingestion;
pub mod processing;

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::iter;
use tracing::{debug, info};

use crate::config::NormalizeConfig;
use crate::constants::COL_HOTEL_ID;
use crate::domain::CanonicalTable;
use crate::error::Result;
use crate::pipeline::ingestion::RawTable;
use crate::pipeline::processing::{
    coerce_record, retain_complete, ColumnMap, CompletenessGate, HotelIdAssigner, Normalizer,
    QualityGate, RegistryNormalizer,
};

/// Row counts for one pipeline run
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RunStats {
    pub total_rows: usize,
    pub dropped_rows: usize,
    pub emitted_rows: usize,
    pub distinct_hotels: usize,
    /// Dropped rows per missing field; a row missing two fields counts twice
    pub drop_reasons: BTreeMap<String, usize>,
    pub grade_counts: BTreeMap<String, usize>,
}

#[derive(Debug, Clone)]
pub struct PipelineOutput {
    pub table: CanonicalTable,
    pub stats: RunStats,
}

pub struct Pipeline {
    settings: NormalizeConfig,
    gate: Box<dyn QualityGate>,
    normalizer: Box<dyn Normalizer>,
}

impl Pipeline {
    pub fn new(settings: NormalizeConfig) -> Self {
        Self::with_components(
            settings,
            Box::new(CompletenessGate::new()),
            Box::new(RegistryNormalizer),
        )
    }

    pub fn with_components(
        settings: NormalizeConfig,
        gate: Box<dyn QualityGate>,
        normalizer: Box<dyn Normalizer>,
    ) -> Self {
        Self {
            settings,
            gate,
            normalizer,
        }
    }

    /// Run every step over `table`. Fails only when required columns are
    /// missing; bad cells never abort the run.
    pub fn run(&self, table: RawTable) -> Result<PipelineOutput> {
        table.require_columns()?;
        let map = ColumnMap::resolve(&table)?;
        let total_rows = table.rows.len();

        let coerced = table
            .rows
            .iter()
            .map(|row| coerce_record(&map, row, &self.settings.null_placeholder))
            .collect();

        let outcome = retain_complete(self.gate.as_ref(), coerced);
        let drop_reasons = outcome.drop_reasons();
        let dropped_rows = outcome.dropped.len();
        debug!(passed = outcome.passed.len(), dropped = dropped_rows, "Completeness gate done");

        let mut ids = HotelIdAssigner::new(&self.settings.id_prefix, self.settings.id_width);
        let mut grade_counts = BTreeMap::new();
        let mut entities = Vec::with_capacity(outcome.passed.len());
        for record in outcome.passed {
            let hotel_id = ids.assign(record.name.as_deref());
            let entity = self.normalizer.normalize(record, hotel_id);
            *grade_counts.entry(entity.grade.to_string()).or_insert(0) += 1;
            entities.push(entity);
        }

        let columns = iter::once(COL_HOTEL_ID.to_string())
            .chain(table.columns.into_iter().filter(|c| c != COL_HOTEL_ID))
            .collect();

        let stats = RunStats {
            total_rows,
            dropped_rows,
            emitted_rows: entities.len(),
            distinct_hotels: ids.distinct(),
            drop_reasons,
            grade_counts,
        };

        crate::observability::metrics::normalize::entities_emitted(stats.emitted_rows);
        crate::observability::metrics::normalize::distinct_hotels(stats.distinct_hotels);
        info!(
            total = stats.total_rows,
            emitted = stats.emitted_rows,
            dropped = stats.dropped_rows,
            hotels = stats.distinct_hotels,
            "Normalization finished"
        );

        Ok(PipelineOutput {
            table: CanonicalTable { columns, entities },
            stats,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Grade;
    use crate::error::RegistryError;
    use crate::pipeline::ingestion::read_raw_table;

    const HEADER: &str = "Name,District,Type,Grade,Rooms,AGA Division,PS/MC/UC,Latitude,Logitiute,Address";

    fn run(rows: &[&str]) -> PipelineOutput {
        let csv = iter::once(HEADER).chain(rows.iter().copied()).collect::<Vec<_>>().join("\n");
        let table = read_raw_table(csv.as_bytes()).unwrap();
        Pipeline::new(NormalizeConfig::default()).run(table).unwrap()
    }

    #[test]
    fn test_hotel_id_comes_first_then_source_order() {
        let output = run(&["Lake View Inn, colombo ,hotel,Deluxe,25,X,Y,6.9,79.8,..."]);
        assert_eq!(
            output.table.columns,
            vec![
                "hotel_id",
                "name",
                "district",
                "type",
                "grade",
                "rooms",
                "aga_division",
                "local_authority",
                "latitude",
                "longitude",
                "address"
            ]
        );
    }

    #[test]
    fn test_ids_are_assigned_after_filtering() {
        let output = run(&[
            "Broken,Kandy,Hotel,A,10,X,Y,NULL,80.6,",
            "Sea Breeze,Galle,Villa,B,4,X,Y,6.0,80.2,",
            "Hill Top,Kandy,Hotel,C,12,X,Y,7.3,80.6,",
            "Sea Breeze,Galle,Villa,B,6,X,Y,6.0,80.2,",
        ]);

        let ids: Vec<_> = output
            .table
            .entities
            .iter()
            .map(|e| e.hotel_id.clone().unwrap())
            .collect();
        assert_eq!(ids, vec!["HOTEL_0001", "HOTEL_0002", "HOTEL_0001"]);
        assert_eq!(output.stats.distinct_hotels, 2);
        assert_eq!(output.stats.dropped_rows, 1);
        assert_eq!(output.stats.drop_reasons.get("latitude"), Some(&1));
    }

    #[test]
    fn test_placeholder_text_fields_drop_the_row() {
        let output = run(&[
            "Ghost,NULL,NULL,A,10,NULL,NULL,7.2,80.6,",
            "Hill Top,Kandy,Hotel,C,12,X,Y,7.3,80.6,",
        ]);

        assert_eq!(output.table.entities.len(), 1);
        assert_eq!(output.table.entities[0].district, "Kandy");
        assert!(output.table.entities.iter().all(|e| e.district != "Null"));
        assert_eq!(output.stats.drop_reasons.get("district"), Some(&1));
        assert_eq!(output.stats.drop_reasons.get("local_authority"), Some(&1));
    }

    #[test]
    fn test_grade_counts() {
        let output = run(&[
            "A,Kandy,Hotel,Superior,10,X,Y,7.2,80.6,",
            "B,Kandy,Hotel,,10,X,Y,7.2,80.6,",
            "C,Kandy,Hotel,Luxury,10,X,Y,7.2,80.6,",
        ]);
        let grades: Vec<Grade> = output.table.entities.iter().map(|e| e.grade).collect();
        assert_eq!(grades, vec![Grade::Four, Grade::Unrated, Grade::Unrated]);
        assert_eq!(output.stats.grade_counts.get("UNRATED"), Some(&2));
    }

    #[test]
    fn test_missing_required_column_is_fatal() {
        let table = read_raw_table("Name,District\nA,B\n".as_bytes()).unwrap();
        let err = Pipeline::new(NormalizeConfig::default()).run(table).unwrap_err();
        assert!(matches!(err, RegistryError::MissingColumn(_)));
    }

    #[test]
    fn test_custom_id_settings() {
        let settings = NormalizeConfig {
            id_prefix: "LK-".to_string(),
            id_width: 6,
            ..NormalizeConfig::default()
        };
        let csv = format!("{}\nA,Kandy,Hotel,A,10,X,Y,7.2,80.6,", HEADER);
        let table = read_raw_table(csv.as_bytes()).unwrap();
        let output = Pipeline::new(settings).run(table).unwrap();
        assert_eq!(output.table.entities[0].hotel_id.as_deref(), Some("LK-000001"));
    }
}
