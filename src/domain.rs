use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use crate::constants::*;

/// Star-rating category of an accommodation.
///
/// Variant order is the display order of the rating scale, so `Ord` sorts
/// grades the way every chart and table lists them.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "UPPERCASE")]
pub enum Grade {
    Three,
    Four,
    Five,
    Unrated,
}

impl Grade {
    pub const ALL: [Grade; 4] = [Grade::Three, Grade::Four, Grade::Five, Grade::Unrated];

    pub fn as_str(&self) -> &'static str {
        match self {
            Grade::Three => "THREE",
            Grade::Four => "FOUR",
            Grade::Five => "FIVE",
            Grade::Unrated => "UNRATED",
        }
    }

    /// Position on the full rating scale ONE < TWO < THREE < FOUR < FIVE < UNRATED.
    /// ONE and TWO are never produced by the registry but keep their slots.
    pub fn rank(&self) -> u8 {
        match self {
            Grade::Three => 3,
            Grade::Four => 4,
            Grade::Five => 5,
            Grade::Unrated => 6,
        }
    }
}

impl fmt::Display for Grade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Grade {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "THREE" => Ok(Grade::Three),
            "FOUR" => Ok(Grade::Four),
            "FIVE" => Ok(Grade::Five),
            "UNRATED" => Ok(Grade::Unrated),
            other => Err(format!("unknown grade '{}'", other)),
        }
    }
}

/// A cleaned accommodation record as stored in the canonical table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccommodationEntity {
    /// `HOTEL_####`; empty only when the source row had no name
    pub hotel_id: Option<String>,
    pub name: Option<String>,
    #[serde(rename = "type")]
    pub accommodation_type: String,
    pub district: String,
    pub grade: Grade,
    pub rooms: u32,
    pub aga_division: String,
    pub local_authority: String,
    pub latitude: f64,
    pub longitude: f64,
    #[serde(default)]
    pub address: Option<String>,
    /// Source columns without a typed field, keyed by canonical header
    #[serde(skip)]
    pub extra: BTreeMap<String, Option<String>>,
}

impl AccommodationEntity {
    /// Render one canonical column as text; `None` is an empty cell
    pub fn field(&self, column: &str) -> Option<String> {
        match column {
            COL_HOTEL_ID => self.hotel_id.clone(),
            COL_NAME => self.name.clone(),
            COL_TYPE => Some(self.accommodation_type.clone()),
            COL_DISTRICT => Some(self.district.clone()),
            COL_GRADE => Some(self.grade.to_string()),
            COL_ROOMS => Some(self.rooms.to_string()),
            COL_AGA_DIVISION => Some(self.aga_division.clone()),
            COL_LOCAL_AUTHORITY => Some(self.local_authority.clone()),
            COL_LATITUDE => Some(self.latitude.to_string()),
            COL_LONGITUDE => Some(self.longitude.to_string()),
            COL_ADDRESS => self.address.clone(),
            other => self.extra.get(other).cloned().flatten(),
        }
    }
}

/// The canonical store contents: the column order and the entities in it
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CanonicalTable {
    pub columns: Vec<String>,
    pub entities: Vec<AccommodationEntity>,
}

impl CanonicalTable {
    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// One rendered row per entity, cells in column order
    pub fn rows(&self) -> impl Iterator<Item = Vec<String>> + '_ {
        self.entities.iter().map(move |entity| {
            self.columns
                .iter()
                .map(|column| entity.field(column).unwrap_or_default())
                .collect()
        })
    }
}
