use crate::domain::CanonicalTable;
use crate::error::Result;

/// Where the raw registry snapshot comes from
pub trait RawSourcePort {
    /// Human-readable location, used in logs and the run report
    fn describe(&self) -> String;

    /// Read the whole snapshot. A missing source is an error.
    fn read(&self) -> Result<Vec<u8>>;
}

/// Where the canonical table is published
pub trait CanonicalStorePort {
    fn describe(&self) -> String;

    /// Replace the store contents with `table` in one step. On error the
    /// previous contents are left untouched.
    fn publish(&self, table: &CanonicalTable) -> Result<()>;
}
