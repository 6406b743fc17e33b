//! Withholding calculation: the bracket table and the pure functions that
//! derive taxable base and tax withheld from salary inputs.

pub mod common;
pub mod tax_table;
pub mod withholding;

pub use tax_table::{DEPENDENT_DEDUCTION, IRRF_BRACKETS, TableError, TaxTable};
pub use withholding::{WithholdingCalculator, compute_taxable_base, compute_withholding};
