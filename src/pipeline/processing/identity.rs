use std::collections::HashMap;

/// Assigns `HOTEL_####` identifiers by first appearance of each name.
///
/// The sequence is 1-based and zero-padded to `width` digits. Past
/// `10^width - 1` the number simply grows wider (`HOTEL_10000`), so ids stay
/// unique without ever truncating.
#[derive(Debug, Clone)]
pub struct HotelIdAssigner {
    prefix: String,
    width: usize,
    assigned: HashMap<String, String>,
}

impl HotelIdAssigner {
    pub fn new(prefix: impl Into<String>, width: usize) -> Self {
        Self {
            prefix: prefix.into(),
            width,
            assigned: HashMap::new(),
        }
    }

    pub fn format_id(&self, sequence: usize) -> String {
        format!("{}{:0width$}", self.prefix, sequence, width = self.width)
    }

    /// Id for `name`, minting the next one on first sight. Records without a
    /// name get no id.
    pub fn assign(&mut self, name: Option<&str>) -> Option<String> {
        let name = name?;
        if let Some(id) = self.assigned.get(name) {
            return Some(id.clone());
        }
        let id = self.format_id(self.assigned.len() + 1);
        self.assigned.insert(name.to_string(), id.clone());
        Some(id)
    }

    /// Number of distinct names seen so far
    pub fn distinct(&self) -> usize {
        self.assigned.len()
    }
}
