/// Column names of the canonical store. These are the names the source
/// headers resolve to after canonicalization.
pub const COL_HOTEL_ID: &str = "hotel_id";
pub const COL_NAME: &str = "name";
pub const COL_TYPE: &str = "type";
pub const COL_DISTRICT: &str = "district";
pub const COL_GRADE: &str = "grade";
pub const COL_ROOMS: &str = "rooms";
pub const COL_AGA_DIVISION: &str = "aga_division";
pub const COL_LOCAL_AUTHORITY: &str = "local_authority";
pub const COL_LATITUDE: &str = "latitude";
pub const COL_LONGITUDE: &str = "longitude";
pub const COL_ADDRESS: &str = "address";

// Source headers that need renaming after canonicalization
pub const SOURCE_LOCAL_AUTHORITY: &str = "ps/mc/uc";
pub const SOURCE_LONGITUDE_MISSPELLED: &str = "logitiute";

/// Known source header spellings mapped to their canonical names
pub const HEADER_RENAMES: &[(&str, &str)] = &[
    (SOURCE_LOCAL_AUTHORITY, COL_LOCAL_AUTHORITY),
    (SOURCE_LONGITUDE_MISSPELLED, COL_LONGITUDE),
];

/// Name given to a blank source header, followed by its position
pub const UNNAMED_COLUMN_PREFIX: &str = "unnamed_";

/// Columns the source must carry. `address` and any other columns are passed
/// through when present.
pub const REQUIRED_COLUMNS: &[&str] = &[
    COL_NAME,
    COL_DISTRICT,
    COL_TYPE,
    COL_GRADE,
    COL_ROOMS,
    COL_AGA_DIVISION,
    COL_LOCAL_AUTHORITY,
    COL_LATITUDE,
    COL_LONGITUDE,
];

/// Fields that must be non-null for a record to survive the completeness filter
pub const COMPLETENESS_FIELDS: &[&str] = &[
    COL_ROOMS,
    COL_DISTRICT,
    COL_TYPE,
    COL_AGA_DIVISION,
    COL_LOCAL_AUTHORITY,
    COL_LATITUDE,
    COL_LONGITUDE,
];

/// Field order used when exporting entities that were loaded back from the
/// canonical store.
pub const CANONICAL_COLUMNS: &[&str] = &[
    COL_HOTEL_ID,
    COL_NAME,
    COL_TYPE,
    COL_DISTRICT,
    COL_GRADE,
    COL_ROOMS,
    COL_AGA_DIVISION,
    COL_LOCAL_AUTHORITY,
    COL_LATITUDE,
    COL_LONGITUDE,
    COL_ADDRESS,
];

pub const DEFAULT_NULL_PLACEHOLDER: &str = "NULL";
pub const DEFAULT_ID_PREFIX: &str = "HOTEL_";
pub const DEFAULT_ID_WIDTH: usize = 4;

pub const DEFAULT_CONFIG_PATH: &str = "registry.toml";
pub const DEFAULT_SOURCE_PATH: &str = "Information for Accommodation.csv";
pub const DEFAULT_OUTPUT_PATH: &str = "cleaned_accommodation.csv";
pub const DEFAULT_LOG_DIR: &str = "logs";

// Environment overrides
pub const ENV_SOURCE: &str = "REGISTRY_SOURCE";
pub const ENV_OUTPUT: &str = "REGISTRY_OUTPUT";
pub const ENV_LOG_DIR: &str = "REGISTRY_LOG_DIR";

/// Number of rows echoed to the log after a normalize run
pub const PREVIEW_ROWS: usize = 5;
