use anyhow::{Context, Result};
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::info;

use crate::domain::Grade;
use crate::explore::{
    district_counts, district_options, grade_distribution, grade_options, map_points,
    mean_rooms_by_grade, rooms_by_district, type_distribution, type_options, CanonicalCache,
    Filters, GradeMean, KeyStats, LabelCount,
};
use crate::infra::export_entities;

/// Values each selector offers, taken from the whole table
#[derive(Debug, Clone, Default, Serialize)]
pub struct FilterOptions {
    pub districts: Vec<String>,
    pub types: Vec<String>,
    pub grades: Vec<Grade>,
}

/// Everything the dashboard shows for one filter selection
#[derive(Debug, Clone, Serialize)]
pub struct DashboardSummary {
    pub filters: Filters,
    pub options: FilterOptions,
    pub key_stats: KeyStats,
    pub rooms_by_district: Vec<LabelCount>,
    pub type_distribution: Vec<LabelCount>,
    pub grade_distribution: Vec<LabelCount>,
    pub district_counts: Vec<LabelCount>,
    pub mean_rooms_by_grade: Vec<GradeMean>,
    pub map_points: usize,
}

/// Use case for reading the canonical store the way the dashboard does
pub struct ExploreUseCase {
    store_path: PathBuf,
    cache: CanonicalCache,
}

impl ExploreUseCase {
    pub fn new(store_path: impl Into<PathBuf>) -> Self {
        Self {
            store_path: store_path.into(),
            cache: CanonicalCache::new(),
        }
    }

    pub fn store_path(&self) -> &Path {
        &self.store_path
    }

    /// Aggregates over the filtered view
    pub fn summarize(&mut self, filters: &Filters) -> Result<DashboardSummary> {
        let entities = self
            .cache
            .get_or_load(&self.store_path)
            .with_context(|| format!("Failed to load canonical store {}", self.store_path.display()))?;
        let view = filters.apply(&entities);

        Ok(DashboardSummary {
            filters: filters.clone(),
            options: FilterOptions {
                districts: district_options(&entities),
                types: type_options(&entities),
                grades: grade_options(&entities),
            },
            key_stats: KeyStats::compute(&view),
            rooms_by_district: rooms_by_district(&view),
            type_distribution: type_distribution(&view),
            grade_distribution: grade_distribution(&view),
            district_counts: district_counts(&view),
            mean_rooms_by_grade: mean_rooms_by_grade(&view),
            map_points: map_points(&view).len(),
        })
    }

    /// Write the filtered view to `destination`; returns the row count
    pub fn export(&mut self, filters: &Filters, destination: &Path) -> Result<usize> {
        let entities = self
            .cache
            .get_or_load(&self.store_path)
            .with_context(|| format!("Failed to load canonical store {}", self.store_path.display()))?;
        let view = filters.apply(&entities);

        let rows = export_entities(destination, &view)
            .with_context(|| format!("Failed to export to {}", destination.display()))?;
        info!("Exported {} rows to {}", rows, destination.display());
        Ok(rows)
    }

    /// Forget the cached table so the next call reads the store again
    pub fn refresh(&mut self) {
        self.cache.invalidate();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::load_entities;
    use std::fs;
    use tempfile::tempdir;

    fn write_store(dir: &Path) -> PathBuf {
        let path = dir.join("cleaned_accommodation.csv");
        fs::write(
            &path,
            "hotel_id,name,type,district,grade,rooms,aga_division,local_authority,latitude,longitude,address\n\
             HOTEL_0001,Lake View Inn,Hotel,Colombo,FIVE,25,X,Y,6.9,79.8,1 Lake Rd\n\
             HOTEL_0002,Sea Breeze,Villa,Galle,UNRATED,4,X,Y,6.0,80.2,\n\
             HOTEL_0003,Hill Top,Hotel,Kandy,THREE,12,X,Y,7.3,80.6,\n",
        )
        .unwrap();
        path
    }

    #[test]
    fn test_summary_over_filtered_view() {
        let dir = tempdir().unwrap();
        let mut explore = ExploreUseCase::new(write_store(dir.path()));

        let summary = explore
            .summarize(&Filters::new().with_types(["Hotel"]))
            .unwrap();

        assert_eq!(summary.key_stats.total_accommodations, 2);
        assert_eq!(summary.key_stats.total_rooms, 37);
        assert_eq!(summary.map_points, 2);
        assert_eq!(summary.grade_distribution[0].label, "THREE");
        assert!(summary.mean_rooms_by_grade.iter().all(|m| m.grade != Grade::Unrated));
        // Options ignore the selection
        assert_eq!(summary.options.districts, vec!["Colombo", "Galle", "Kandy"]);
        assert_eq!(summary.options.grades.len(), 3);
    }

    #[test]
    fn test_export_writes_only_the_filtered_rows() {
        let dir = tempdir().unwrap();
        let mut explore = ExploreUseCase::new(write_store(dir.path()));
        let destination = dir.path().join("export").join("filtered.csv");

        let rows = explore
            .export(&Filters::new().with_districts(["Galle"]), &destination)
            .unwrap();

        assert_eq!(rows, 1);
        let exported = load_entities(&destination).unwrap();
        assert_eq!(exported[0].hotel_id.as_deref(), Some("HOTEL_0002"));
        assert_eq!(exported[0].grade, Grade::Unrated);
    }

    #[test]
    fn test_missing_store_reports_path() {
        let dir = tempdir().unwrap();
        let mut explore = ExploreUseCase::new(dir.path().join("absent.csv"));
        let err = explore.summarize(&Filters::new()).unwrap_err();
        assert!(err.to_string().contains("absent.csv"));
    }
}
