use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap, HashSet};

use crate::domain::{AccommodationEntity, Grade};

/// Headline numbers for the filtered view
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyStats {
    pub total_accommodations: usize,
    pub total_rooms: u64,
    pub districts_covered: usize,
}

impl KeyStats {
    pub fn compute(view: &[&AccommodationEntity]) -> Self {
        let districts: HashSet<&str> = view.iter().map(|e| e.district.as_str()).collect();
        Self {
            total_accommodations: view.len(),
            total_rooms: view.iter().map(|e| u64::from(e.rooms)).sum(),
            districts_covered: districts.len(),
        }
    }
}

/// A labelled count or sum, as one bar or slice of a chart
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabelCount {
    pub label: String,
    pub value: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MapPoint {
    pub latitude: f64,
    pub longitude: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GradeMean {
    pub grade: Grade,
    pub mean_rooms: f64,
}

/// Largest first; ties broken by label so output is stable
fn sorted_desc(totals: HashMap<&str, u64>) -> Vec<LabelCount> {
    let mut rows: Vec<LabelCount> = totals
        .into_iter()
        .map(|(label, value)| LabelCount {
            label: label.to_string(),
            value,
        })
        .collect();
    rows.sort_by(|a, b| b.value.cmp(&a.value).then_with(|| a.label.cmp(&b.label)));
    rows
}

fn count_by<'a, F>(view: &[&'a AccommodationEntity], key: F) -> Vec<LabelCount>
where
    F: Fn(&'a AccommodationEntity) -> &'a str,
{
    let mut totals = HashMap::new();
    for entity in view {
        *totals.entry(key(*entity)).or_insert(0) += 1;
    }
    sorted_desc(totals)
}

/// Total rooms per district
pub fn rooms_by_district(view: &[&AccommodationEntity]) -> Vec<LabelCount> {
    let mut totals = HashMap::new();
    for entity in view {
        *totals.entry(entity.district.as_str()).or_insert(0) += u64::from(entity.rooms);
    }
    sorted_desc(totals)
}

/// Accommodations per type
pub fn type_distribution(view: &[&AccommodationEntity]) -> Vec<LabelCount> {
    count_by(view, |e| e.accommodation_type.as_str())
}

/// Accommodations per district
pub fn district_counts(view: &[&AccommodationEntity]) -> Vec<LabelCount> {
    count_by(view, |e| e.district.as_str())
}

/// Accommodations per grade, in rating-scale order
pub fn grade_distribution(view: &[&AccommodationEntity]) -> Vec<LabelCount> {
    let mut totals: BTreeMap<Grade, u64> = BTreeMap::new();
    for entity in view {
        *totals.entry(entity.grade).or_insert(0) += 1;
    }
    totals
        .into_iter()
        .map(|(grade, value)| LabelCount {
            label: grade.to_string(),
            value,
        })
        .collect()
}

/// Mean room count per grade, in rating-scale order. Grades absent from
/// the view are left out.
pub fn mean_rooms_by_grade(view: &[&AccommodationEntity]) -> Vec<GradeMean> {
    let mut sums: BTreeMap<Grade, (u64, u64)> = BTreeMap::new();
    for entity in view {
        let (rooms, count) = sums.entry(entity.grade).or_insert((0, 0));
        *rooms += u64::from(entity.rooms);
        *count += 1;
    }
    sums.into_iter()
        .map(|(grade, (rooms, count))| GradeMean {
            grade,
            mean_rooms: rooms as f64 / count as f64,
        })
        .collect()
}

pub fn map_points(view: &[&AccommodationEntity]) -> Vec<MapPoint> {
    view.iter()
        .map(|e| MapPoint {
            latitude: e.latitude,
            longitude: e.longitude,
        })
        .collect()
}
