pub mod calculations;
pub mod import;
pub mod models;
pub mod store;

pub use calculations::{TaxTable, WithholdingCalculator};
pub use import::{FieldMapping, ImportAdapter, InputField, MappingError};
pub use models::*;
pub use store::{EmployeeFilter, EmployeeStore, InputProblem, StoreError};
