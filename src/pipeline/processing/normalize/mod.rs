use crate::domain::{AccommodationEntity, Grade};
use crate::pipeline::processing::quality_gate::CompleteRecord;

/// Registry grade codes and the star category each one stands for.
/// Codes are matched case-sensitively after trimming.
pub const GRADE_CODES: &[(&str, Grade)] = &[
    ("Deluxe", Grade::Five),
    ("A", Grade::Five),
    ("Superior", Grade::Four),
    ("B", Grade::Four),
    ("Standard", Grade::Three),
    ("C", Grade::Three),
];

/// Map a raw grade code to its category. Codes match exactly, so padded or
/// differently cased codes, unknown codes and missing codes are all
/// `Grade::Unrated`.
pub fn grade_for_code(code: Option<&str>) -> Grade {
    code.and_then(|code| {
        GRADE_CODES
            .iter()
            .find(|(known, _)| *known == code)
            .map(|(_, grade)| *grade)
    })
    .unwrap_or(Grade::Unrated)
}

/// Capitalize the first character of every whitespace-delimited word and
/// lower-case the rest. Whitespace between words is kept as is.
pub fn title_case(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut at_word_start = true;

    for c in value.chars() {
        if c.is_whitespace() {
            out.push(c);
            at_word_start = true;
        } else if at_word_start {
            // Only take single-character upper-case forms ('ß' stays 'ß')
            let mut upper = c.to_uppercase();
            match (upper.next(), upper.next()) {
                (Some(u), None) => out.push(u),
                _ => out.push(c),
            }
            at_word_start = false;
        } else {
            out.extend(c.to_lowercase());
        }
    }

    out
}

/// Trim and title-case a `type` or `district` value
pub fn normalize_text(value: &str) -> String {
    title_case(value.trim())
}

/// Trait for turning a gate-approved record into a canonical entity
pub trait Normalizer {
    fn normalize(&self, record: CompleteRecord, hotel_id: Option<String>) -> AccommodationEntity;
}

/// Applies the registry's grade mapping and text normalization
#[derive(Debug, Clone, Copy, Default)]
pub struct RegistryNormalizer;

impl Normalizer for RegistryNormalizer {
    fn normalize(&self, record: CompleteRecord, hotel_id: Option<String>) -> AccommodationEntity {
        let grade = grade_for_code(record.grade_code.as_deref());
        crate::observability::metrics::normalize::grade_assigned(grade);

        AccommodationEntity {
            hotel_id,
            name: record.name,
            accommodation_type: normalize_text(&record.accommodation_type),
            district: normalize_text(&record.district),
            grade,
            rooms: record.rooms,
            aga_division: record.aga_division,
            local_authority: record.local_authority,
            latitude: record.latitude,
            longitude: record.longitude,
            address: record.address,
            extra: record.extra,
        }
    }
}
