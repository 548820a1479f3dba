use std::collections::BTreeMap;

use crate::constants::*;
use crate::error::{RegistryError, Result};
use crate::pipeline::ingestion::{RawRecord, RawTable};

/// A source row with placeholder nulls resolved and numeric fields parsed.
/// Text fields are still exactly as they appeared in the source.
#[derive(Debug, Clone, PartialEq)]
pub struct CoercedRecord {
    pub line: u64,
    pub name: Option<String>,
    pub district: Option<String>,
    pub accommodation_type: Option<String>,
    pub grade_code: Option<String>,
    pub rooms: Option<u32>,
    pub aga_division: Option<String>,
    pub local_authority: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub address: Option<String>,
    pub extra: BTreeMap<String, Option<String>>,
}

/// Column positions of the fields the pipeline reads
#[derive(Debug, Clone)]
pub struct ColumnMap {
    name: usize,
    district: usize,
    accommodation_type: usize,
    grade: usize,
    rooms: usize,
    aga_division: usize,
    local_authority: usize,
    latitude: usize,
    longitude: usize,
    address: Option<usize>,
    extra: Vec<(usize, String)>,
}

impl ColumnMap {
    pub fn resolve(table: &RawTable) -> Result<Self> {
        let index = |name: &str| {
            table
                .column_index(name)
                .ok_or_else(|| RegistryError::MissingColumn(name.to_string()))
        };

        let known = [
            COL_HOTEL_ID,
            COL_NAME,
            COL_DISTRICT,
            COL_TYPE,
            COL_GRADE,
            COL_ROOMS,
            COL_AGA_DIVISION,
            COL_LOCAL_AUTHORITY,
            COL_LATITUDE,
            COL_LONGITUDE,
            COL_ADDRESS,
        ];
        let extra = table
            .columns
            .iter()
            .enumerate()
            .filter(|(_, c)| !known.contains(&c.as_str()))
            .map(|(i, c)| (i, c.clone()))
            .collect();

        Ok(Self {
            name: index(COL_NAME)?,
            district: index(COL_DISTRICT)?,
            accommodation_type: index(COL_TYPE)?,
            grade: index(COL_GRADE)?,
            rooms: index(COL_ROOMS)?,
            aga_division: index(COL_AGA_DIVISION)?,
            local_authority: index(COL_LOCAL_AUTHORITY)?,
            latitude: index(COL_LATITUDE)?,
            longitude: index(COL_LONGITUDE)?,
            address: table.column_index(COL_ADDRESS),
            extra,
        })
    }
}

/// The placeholder text becomes a missing value; any other text is kept
pub fn coerce_placeholder<'a>(value: Option<&'a str>, placeholder: &str) -> Option<&'a str> {
    value.filter(|v| v.trim() != placeholder)
}

/// Parse a finite number, or `None` for anything unparseable
pub fn parse_number(value: Option<&str>) -> Option<f64> {
    value
        .and_then(|v| v.trim().parse::<f64>().ok())
        .filter(|n| n.is_finite())
}

/// Room counts must be whole and non-negative; `"25.0"` is accepted as 25
pub fn parse_rooms(value: Option<&str>) -> Option<u32> {
    parse_number(value)
        .filter(|n| *n >= 0.0 && n.fract() == 0.0 && *n <= u32::MAX as f64)
        .map(|n| n as u32)
}

pub fn coerce_record(map: &ColumnMap, raw: &RawRecord, placeholder: &str) -> CoercedRecord {
    // The placeholder is a missing value in every column
    let cell = |i: usize| coerce_placeholder(raw.cells.get(i).and_then(|c| c.as_deref()), placeholder);
    let text = |i: usize| cell(i).map(str::to_string);

    CoercedRecord {
        line: raw.line,
        name: text(map.name),
        district: text(map.district),
        accommodation_type: text(map.accommodation_type),
        grade_code: text(map.grade),
        rooms: parse_rooms(cell(map.rooms)),
        aga_division: text(map.aga_division),
        local_authority: text(map.local_authority),
        latitude: parse_number(cell(map.latitude)),
        longitude: parse_number(cell(map.longitude)),
        address: map.address.and_then(text),
        extra: map
            .extra
            .iter()
            .map(|(i, column)| (column.clone(), text(*i)))
            .collect(),
    }
}
