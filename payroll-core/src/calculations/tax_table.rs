//! Progressive income-tax withholding table.
//!
//! | Tier | Taxable base          | Rate  | Deduction |
//! |------|-----------------------|-------|-----------|
//! | 1    | up to 2,259.20        | 0%    | 0.00      |
//! | 2    | 2,259.21 – 2,826.65   | 7.5%  | 169.44    |
//! | 3    | 2,826.66 – 3,751.05   | 15%   | 381.44    |
//! | 4    | 3,751.06 – 4,664.68   | 22.5% | 662.77    |
//! | 5    | above 4,664.68        | 27.5% | 896.00    |
//!
//! Each dependent reduces the taxable base by [`DEPENDENT_DEDUCTION`].

use std::borrow::Cow;

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use thiserror::Error;

use crate::models::TaxBracket;

/// Amount subtracted from the taxable base for each dependent.
pub const DEPENDENT_DEDUCTION: Decimal = dec!(189.59);

pub const IRRF_BRACKETS: [TaxBracket; 5] = [
    TaxBracket {
        min_income: dec!(0),
        max_income: Some(dec!(2259.20)),
        tax_rate: dec!(0),
        deduction: dec!(0),
    },
    TaxBracket {
        min_income: dec!(2259.21),
        max_income: Some(dec!(2826.65)),
        tax_rate: dec!(0.075),
        deduction: dec!(169.44),
    },
    TaxBracket {
        min_income: dec!(2826.66),
        max_income: Some(dec!(3751.05)),
        tax_rate: dec!(0.15),
        deduction: dec!(381.44),
    },
    TaxBracket {
        min_income: dec!(3751.06),
        max_income: Some(dec!(4664.68)),
        tax_rate: dec!(0.225),
        deduction: dec!(662.77),
    },
    TaxBracket {
        min_income: dec!(4664.69),
        max_income: None,
        tax_rate: dec!(0.275),
        deduction: dec!(896.00),
    },
];

/// Reasons a custom bracket table is rejected by [`TaxTable::new`].
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TableError {
    #[error("tax table has no brackets")]
    Empty,

    #[error("bracket {index} has an upper bound below its lower bound")]
    InvertedBounds { index: usize },

    #[error("bracket {index} does not start above the previous bracket's upper bound")]
    Unordered { index: usize },

    #[error("only the last bracket may be unbounded (bracket {index} is not last)")]
    UnboundedBeforeLast { index: usize },

    #[error("the last bracket must be unbounded")]
    BoundedLastTier,
}

/// An ordered set of brackets plus the per-dependent deduction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaxTable {
    brackets: Cow<'static, [TaxBracket]>,
    dependent_deduction: Decimal,
}

impl TaxTable {
    /// The built-in table: [`IRRF_BRACKETS`] with [`DEPENDENT_DEDUCTION`].
    pub fn irrf() -> Self {
        Self {
            brackets: Cow::Borrowed(&IRRF_BRACKETS),
            dependent_deduction: DEPENDENT_DEDUCTION,
        }
    }

    /// Builds a custom table.
    ///
    /// Brackets must be non-empty, sorted ascending, non-overlapping, and
    /// only the last one may (and must) have no upper bound.
    pub fn new(
        brackets: Vec<TaxBracket>,
        dependent_deduction: Decimal,
    ) -> Result<Self, TableError> {
        Self::validate(&brackets)?;
        Ok(Self {
            brackets: Cow::Owned(brackets),
            dependent_deduction,
        })
    }

    /// Checks the ordering rules described on [`TaxTable::new`].
    pub fn validate(brackets: &[TaxBracket]) -> Result<(), TableError> {
        let last = brackets.len().checked_sub(1).ok_or(TableError::Empty)?;

        let mut previous_max: Option<Decimal> = None;
        for (index, bracket) in brackets.iter().enumerate() {
            match bracket.max_income {
                Some(max) if max < bracket.min_income => {
                    return Err(TableError::InvertedBounds { index });
                }
                None if index != last => {
                    return Err(TableError::UnboundedBeforeLast { index });
                }
                _ => {}
            }
            if let Some(prev) = previous_max {
                if bracket.min_income <= prev {
                    return Err(TableError::Unordered { index });
                }
            }
            previous_max = bracket.max_income;
        }

        if brackets[last].max_income.is_some() {
            return Err(TableError::BoundedLastTier);
        }
        Ok(())
    }

    /// Skips validation so tests can build tables the public API rejects.
    #[cfg(test)]
    pub(crate) fn unchecked(brackets: Vec<TaxBracket>) -> Self {
        Self {
            brackets: Cow::Owned(brackets),
            dependent_deduction: Decimal::ZERO,
        }
    }

    pub fn brackets(&self) -> &[TaxBracket] {
        &self.brackets
    }

    pub fn dependent_deduction(&self) -> Decimal {
        self.dependent_deduction
    }

    /// The tier whose range contains `base`.
    ///
    /// Tiers are scanned in order and the first one whose upper bound is not
    /// below `base` wins. Bases below zero land in the first tier and bases
    /// falling between two literal bounds (e.g. 2259.205) land in the upper
    /// tier. Returns `None` only for a table with a bounded last tier.
    pub fn bracket_for(
        &self,
        base: Decimal,
    ) -> Option<&TaxBracket> {
        self.brackets.iter().find(|bracket| bracket.within_upper_bound(base))
    }
}

impl Default for TaxTable {
    fn default() -> Self {
        Self::irrf()
    }
}
