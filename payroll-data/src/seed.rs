//! Built-in seed datasets.
//!
//! Two producers ship sample employees with different field-name
//! conventions: the canonical set (`name`, `grossSalary`, ...) and the
//! localized defaults (`nome`, `salario`, ...). Seeding a store imports both
//! through the same store entry point, each with its own mapping.

use payroll_core::{EmployeeRecord, EmployeeStore, ImportAdapter};
use serde_json::Value;
use tracing::info;

use crate::error::LoadError;
use crate::json_loader::parse_payload;

const CANONICAL_SEED: &str = include_str!("../data/seed_canonical.json");
const LOCALIZED_SEED: &str = include_str!("../data/seed_localized.json");

pub fn canonical_seed() -> Result<Vec<Value>, LoadError> {
    parse_payload(CANONICAL_SEED)
}

pub fn localized_seed() -> Result<Vec<Value>, LoadError> {
    parse_payload(LOCALIZED_SEED)
}

/// Imports the canonical set and then the localized set into `store`.
///
/// Returns the records created, in insertion order.
pub fn seed_store(store: &EmployeeStore) -> Result<Vec<EmployeeRecord>, LoadError> {
    let mut seeded = store.import_raw(&canonical_seed()?, &ImportAdapter::canonical())?;
    seeded.extend(store.import_raw(&localized_seed()?, &ImportAdapter::localized())?);
    info!(count = seeded.len(), "store seeded");
    Ok(seeded)
}
