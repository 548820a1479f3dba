pub mod coerce;
pub mod identity;
pub mod normalize;
pub mod quality_gate;

pub use coerce::{coerce_record, ColumnMap, CoercedRecord};
pub use identity::HotelIdAssigner;
pub use normalize::{grade_for_code, normalize_text, Normalizer, RegistryNormalizer};
pub use quality_gate::{retain_complete, CompleteRecord, CompletenessGate, GateOutcome, QualityGate};
