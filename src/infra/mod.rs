// Infrastructure adapters: CSV files behind the application ports

pub mod csv_source;
pub mod csv_store;

pub use csv_source::CsvFileSource;
pub use csv_store::{export_entities, load_entities, CsvFileStore};
