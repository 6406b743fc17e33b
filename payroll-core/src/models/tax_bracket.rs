use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One tier of a progressive withholding table.
///
/// The withholding for a taxable base inside this tier is computed in one
/// step as `base * tax_rate - deduction`, where `deduction` is chosen so the
/// result is continuous with the tier below.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxBracket {
    pub min_income: Decimal,
    /// `None` marks the unbounded top tier.
    pub max_income: Option<Decimal>,
    pub tax_rate: Decimal,
    pub deduction: Decimal,
}

impl TaxBracket {
    /// Whether `base` does not exceed this tier's upper bound.
    ///
    /// `min_income` is not checked: tiers are scanned in ascending order, so
    /// the first tier passing this test is the one containing `base`.
    pub fn within_upper_bound(
        &self,
        base: Decimal,
    ) -> bool {
        self.max_income.is_none_or(|max| base <= max)
    }

    /// Withholding for `base` if it falls in this tier.
    ///
    /// Saturates at the `Decimal` range instead of overflowing.
    pub fn apply(
        &self,
        base: Decimal,
    ) -> Decimal {
        base.saturating_mul(self.tax_rate)
            .saturating_sub(self.deduction)
    }
}
