//! Loading employee payloads into a [`payroll_core::EmployeeStore`].
//!
//! Payload files (JSON arrays or CSV tables) are parsed into raw records,
//! translated through a field-mapping profile chosen from a [`LoaderConfig`],
//! and imported all-or-nothing.

pub mod config;
pub mod csv_loader;
pub mod error;
pub mod json_loader;
pub mod payload;
pub mod report;
pub mod seed;

pub use config::{ConfigError, LoaderConfig, MappingProfile};
pub use csv_loader::parse_rows;
pub use error::LoadError;
pub use json_loader::parse_payload;
pub use payload::{PayloadFormat, load_file};
pub use report::render_table;
pub use seed::seed_store;
