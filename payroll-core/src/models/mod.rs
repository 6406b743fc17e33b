mod employee;
mod tax_bracket;

pub use employee::{EmployeeId, EmployeeRecord, NewEmployee};
pub use tax_bracket::TaxBracket;
