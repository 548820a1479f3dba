use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashSet};

use crate::domain::{AccommodationEntity, Grade};

/// Multi-select filters over district, type and grade.
///
/// Dimensions are AND-combined; an empty selection leaves that dimension
/// unfiltered.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Filters {
    pub districts: BTreeSet<String>,
    pub types: BTreeSet<String>,
    pub grades: BTreeSet<Grade>,
}

impl Filters {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_districts<I, S>(mut self, districts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.districts.extend(districts.into_iter().map(Into::into));
        self
    }

    pub fn with_types<I, S>(mut self, types: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.types.extend(types.into_iter().map(Into::into));
        self
    }

    pub fn with_grades<I>(mut self, grades: I) -> Self
    where
        I: IntoIterator<Item = Grade>,
    {
        self.grades.extend(grades);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.districts.is_empty() && self.types.is_empty() && self.grades.is_empty()
    }

    pub fn matches(&self, entity: &AccommodationEntity) -> bool {
        (self.districts.is_empty() || self.districts.contains(&entity.district))
            && (self.types.is_empty() || self.types.contains(&entity.accommodation_type))
            && (self.grades.is_empty() || self.grades.contains(&entity.grade))
    }

    /// The filtered view, in table order
    pub fn apply<'a>(&self, entities: &'a [AccommodationEntity]) -> Vec<&'a AccommodationEntity> {
        entities.iter().filter(|e| self.matches(e)).collect()
    }
}

/// Distinct values in first-appearance order
fn distinct_in_order<'a, T, F>(entities: &'a [AccommodationEntity], key: F) -> Vec<T>
where
    T: Clone + Eq + std::hash::Hash + 'a,
    F: Fn(&'a AccommodationEntity) -> T,
{
    let mut seen = HashSet::new();
    entities
        .iter()
        .map(key)
        .filter(|value| seen.insert(value.clone()))
        .collect()
}

/// Options offered by the district selector
pub fn district_options(entities: &[AccommodationEntity]) -> Vec<String> {
    distinct_in_order(entities, |e| e.district.clone())
}

/// Options offered by the type selector
pub fn type_options(entities: &[AccommodationEntity]) -> Vec<String> {
    distinct_in_order(entities, |e| e.accommodation_type.clone())
}

/// Options offered by the grade selector
pub fn grade_options(entities: &[AccommodationEntity]) -> Vec<Grade> {
    distinct_in_order(entities, |e| e.grade)
}
