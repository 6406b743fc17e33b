//! Taxable base and withholding calculation.
//!
//! Both steps are pure: the same inputs always give the same outputs and
//! neither step can fail. Results are kept at full precision; callers round
//! with [`round_half_up`](super::common::round_half_up) when displaying.
//!
//! # Example
//!
//! ```
//! use rust_decimal_macros::dec;
//! use payroll_core::calculations::{TaxTable, WithholdingCalculator};
//!
//! let table = TaxTable::irrf();
//! let calculator = WithholdingCalculator::new(&table);
//!
//! let base = calculator.taxable_base(dec!(5000), dec!(550), 2);
//! assert_eq!(base, dec!(4070.82));
//! assert_eq!(calculator.withholding(base), dec!(253.1645));
//! ```

use rust_decimal::Decimal;

use super::tax_table::TaxTable;

/// Calculator over a borrowed [`TaxTable`].
#[derive(Debug, Clone, Copy)]
pub struct WithholdingCalculator<'a> {
    table: &'a TaxTable,
}

impl<'a> WithholdingCalculator<'a> {
    pub fn new(table: &'a TaxTable) -> Self {
        Self { table }
    }

    pub fn table(&self) -> &'a TaxTable {
        self.table
    }

    /// `gross_salary - social_security_discount - dependents * deduction`.
    ///
    /// Not clamped: a negative base is a valid result. Values beyond the
    /// `Decimal` range saturate at `Decimal::MAX` / `Decimal::MIN`.
    pub fn taxable_base(
        &self,
        gross_salary: Decimal,
        social_security_discount: Decimal,
        dependents: i64,
    ) -> Decimal {
        let dependents_deduction =
            Decimal::from(dependents).saturating_mul(self.table.dependent_deduction());
        gross_salary
            .saturating_sub(social_security_discount)
            .saturating_sub(dependents_deduction)
    }

    /// Progressive withholding for `taxable_base`.
    ///
    /// Falls back to zero when no tier matches, which only happens with a
    /// table whose last tier is bounded.
    pub fn withholding(
        &self,
        taxable_base: Decimal,
    ) -> Decimal {
        self.table
            .bracket_for(taxable_base)
            .map_or(Decimal::ZERO, |bracket| bracket.apply(taxable_base))
    }
}

/// Computes the taxable base against the built-in table.
///
/// # Arguments
///
/// * `gross_salary` - Monthly gross salary
/// * `social_security_discount` - Social security contribution already withheld
/// * `dependents` - Number of declared dependents (negative values are not rejected)
///
/// # Returns
///
/// `gross_salary - social_security_discount - dependents * DEPENDENT_DEDUCTION`,
/// unrounded and possibly negative.
pub fn compute_taxable_base(
    gross_salary: Decimal,
    social_security_discount: Decimal,
    dependents: i64,
) -> Decimal {
    let table = TaxTable::irrf();
    WithholdingCalculator::new(&table).taxable_base(gross_salary, social_security_discount, dependents)
}

/// Computes the withholding for `taxable_base` against the built-in table.
///
/// # Arguments
///
/// * `taxable_base` - Result of [`compute_taxable_base`]
///
/// # Returns
///
/// `taxable_base * rate - deduction` for the tier containing the base,
/// unrounded. Zero for any base in the exempt tier, including negative ones.
pub fn compute_withholding(taxable_base: Decimal) -> Decimal {
    let table = TaxTable::irrf();
    WithholdingCalculator::new(&table).withholding(taxable_base)
}
