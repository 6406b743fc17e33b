use std::fmt;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::calculations::WithholdingCalculator;

/// Store-assigned identifier of an employee record.
///
/// Ids are minted from a per-store monotonic counter and are never reused,
/// even after the record that carried one is deleted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EmployeeId(u64);

impl EmployeeId {
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    pub const fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for EmployeeId {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for EmployeeId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().parse().map(Self)
    }
}

/// User-settable fields of an employee (no id, no derived values).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewEmployee {
    pub name: String,
    pub taxpayer_id: String,
    pub gross_salary: Decimal,
    pub social_security_discount: Decimal,
    pub dependents: i64,
}

/// An employee held by the store, with its derived withholding fields.
///
/// There is no way to build a record other than [`EmployeeRecord::derive`],
/// so `taxable_base` and `tax_withheld` always match the inputs the record
/// was built from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EmployeeRecord {
    id: EmployeeId,
    name: String,
    taxpayer_id: String,
    gross_salary: Decimal,
    social_security_discount: Decimal,
    dependents: i64,
    taxable_base: Decimal,
    tax_withheld: Decimal,
}

impl EmployeeRecord {
    /// Builds a record from its inputs, computing both derived fields.
    pub fn derive(
        id: EmployeeId,
        input: NewEmployee,
        calculator: &WithholdingCalculator<'_>,
    ) -> Self {
        let taxable_base = calculator.taxable_base(
            input.gross_salary,
            input.social_security_discount,
            input.dependents,
        );
        let tax_withheld = calculator.withholding(taxable_base);

        Self {
            id,
            name: input.name,
            taxpayer_id: input.taxpayer_id,
            gross_salary: input.gross_salary,
            social_security_discount: input.social_security_discount,
            dependents: input.dependents,
            taxable_base,
            tax_withheld,
        }
    }

    /// Stamps the id minted at commit time. Derived fields do not depend on
    /// the id, so they stay valid.
    pub(crate) fn assign_id(
        &mut self,
        id: EmployeeId,
    ) {
        self.id = id;
    }

    pub fn id(&self) -> EmployeeId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn taxpayer_id(&self) -> &str {
        &self.taxpayer_id
    }

    pub fn gross_salary(&self) -> Decimal {
        self.gross_salary
    }

    pub fn social_security_discount(&self) -> Decimal {
        self.social_security_discount
    }

    pub fn dependents(&self) -> i64 {
        self.dependents
    }

    pub fn taxable_base(&self) -> Decimal {
        self.taxable_base
    }

    pub fn tax_withheld(&self) -> Decimal {
        self.tax_withheld
    }

    /// The user-settable fields of this record, e.g. to prefill an edit form.
    pub fn inputs(&self) -> NewEmployee {
        NewEmployee {
            name: self.name.clone(),
            taxpayer_id: self.taxpayer_id.clone(),
            gross_salary: self.gross_salary,
            social_security_discount: self.social_security_discount,
            dependents: self.dependents,
        }
    }
}
