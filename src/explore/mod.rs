//! Data side of the dashboard: filters, aggregates and a session cache over
//! the canonical store. Rendering is left to whatever consumes these values.

pub mod aggregates;
pub mod cache;
pub mod filters;

pub use aggregates::{
    district_counts, grade_distribution, map_points, mean_rooms_by_grade, rooms_by_district,
    type_distribution, GradeMean, KeyStats, LabelCount, MapPoint,
};
pub use cache::CanonicalCache;
pub use filters::{district_options, grade_options, type_options, Filters};
