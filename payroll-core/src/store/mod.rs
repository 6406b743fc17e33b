mod employee_store;
mod error;
mod filter;

pub use employee_store::EmployeeStore;
pub use error::{InputProblem, StoreError};
pub use filter::EmployeeFilter;
