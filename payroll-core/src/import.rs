//! Translation of raw, untyped employee records into [`NewEmployee`] inputs.
//!
//! External producers name their fields differently: the canonical dataset
//! uses `name`/`grossSalary`/... while the localized defaults use
//! `nome`/`salario`/... A single [`FieldMapping`] table resolves either
//! convention before a record reaches the store, so there is one ingestion
//! path regardless of the producer.
//!
//! | Field                      | Canonical                 | Localized     |
//! |----------------------------|---------------------------|---------------|
//! | `name`                     | `name`                    | `nome`        |
//! | `taxpayer_id`              | `cpf`, `taxpayerId`       | `cpf`         |
//! | `gross_salary`             | `grossSalary`             | `salario`     |
//! | `social_security_discount` | `socialSecurityDiscount`  | `desconto`    |
//! | `dependents`               | `dependents`              | `dependentes` |

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Number, Value};
use thiserror::Error;

use crate::models::NewEmployee;
use crate::store::{InputProblem, StoreError};

/// Internal field names an external field can be mapped onto.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InputField {
    Name,
    TaxpayerId,
    GrossSalary,
    SocialSecurityDiscount,
    Dependents,
}

impl InputField {
    pub const ALL: [InputField; 5] = [
        Self::Name,
        Self::TaxpayerId,
        Self::GrossSalary,
        Self::SocialSecurityDiscount,
        Self::Dependents,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::TaxpayerId => "taxpayer_id",
            Self::GrossSalary => "gross_salary",
            Self::SocialSecurityDiscount => "social_security_discount",
            Self::Dependents => "dependents",
        }
    }
}

impl fmt::Display for InputField {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum MappingError {
    #[error("no external name is mapped to field '{0}'")]
    Unmapped(InputField),

    #[error("external name '{name}' is mapped to both '{first}' and '{second}'")]
    Conflict {
        name: String,
        first: InputField,
        second: InputField,
    },
}

/// Translation table from external field names to [`InputField`]s.
///
/// Several external names may point at the same field (aliases). If a
/// record carries more than one alias for a field, the alphabetically first
/// key present wins.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldMapping {
    names: HashMap<String, InputField>,
}

impl FieldMapping {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a mapping from `(external, field)` pairs.
    ///
    /// # Errors
    /// * [`MappingError::Conflict`] if one external name targets two fields.
    /// * [`MappingError::Unmapped`] if a field has no external name.
    pub fn from_pairs<I, S>(pairs: I) -> Result<Self, MappingError>
    where
        I: IntoIterator<Item = (S, InputField)>,
        S: Into<String>,
    {
        let mut mapping = Self::new();
        for (name, field) in pairs {
            mapping.insert(name, field)?;
        }
        mapping.validate()?;
        Ok(mapping)
    }

    /// The producer convention of the canonical seed dataset and uploads.
    pub fn canonical() -> Self {
        Self::builtin(&[
            ("name", InputField::Name),
            ("cpf", InputField::TaxpayerId),
            ("taxpayerId", InputField::TaxpayerId),
            ("grossSalary", InputField::GrossSalary),
            ("socialSecurityDiscount", InputField::SocialSecurityDiscount),
            ("dependents", InputField::Dependents),
        ])
    }

    /// The producer convention of the localized default dataset.
    pub fn localized() -> Self {
        Self::builtin(&[
            ("nome", InputField::Name),
            ("cpf", InputField::TaxpayerId),
            ("salario", InputField::GrossSalary),
            ("desconto", InputField::SocialSecurityDiscount),
            ("dependentes", InputField::Dependents),
        ])
    }

    fn builtin(pairs: &[(&str, InputField)]) -> Self {
        let names = pairs
            .iter()
            .map(|(name, field)| ((*name).to_string(), *field))
            .collect();
        Self { names }
    }

    /// Adds one alias. Re-adding the same alias for the same field is a no-op.
    pub fn insert(
        &mut self,
        name: impl Into<String>,
        field: InputField,
    ) -> Result<(), MappingError> {
        let name = name.into();
        match self.names.get(&name) {
            Some(existing) if *existing != field => Err(MappingError::Conflict {
                name,
                first: *existing,
                second: field,
            }),
            _ => {
                self.names.insert(name, field);
                Ok(())
            }
        }
    }

    /// Every field must be reachable through at least one external name.
    pub fn validate(&self) -> Result<(), MappingError> {
        for field in InputField::ALL {
            if !self.names.values().any(|mapped| *mapped == field) {
                return Err(MappingError::Unmapped(field));
            }
        }
        Ok(())
    }

    pub fn field_for(
        &self,
        external: &str,
    ) -> Option<InputField> {
        self.names.get(external).copied()
    }

    /// External names mapped to `field`, sorted.
    pub fn aliases(
        &self,
        field: InputField,
    ) -> Vec<&str> {
        let mut aliases: Vec<&str> = self
            .names
            .iter()
            .filter(|(_, mapped)| **mapped == field)
            .map(|(name, _)| name.as_str())
            .collect();
        aliases.sort_unstable();
        aliases
    }

    fn lookup<'v>(
        &self,
        object: &'v Map<String, Value>,
        field: InputField,
    ) -> Option<&'v Value> {
        self.aliases(field)
            .into_iter()
            .filter_map(|alias| object.get(alias))
            .find(|value| !value.is_null())
    }
}

/// Converts raw records into typed inputs using one [`FieldMapping`].
#[derive(Debug, Clone)]
pub struct ImportAdapter {
    mapping: FieldMapping,
}

impl ImportAdapter {
    pub fn new(mapping: FieldMapping) -> Self {
        Self { mapping }
    }

    pub fn canonical() -> Self {
        Self::new(FieldMapping::canonical())
    }

    pub fn localized() -> Self {
        Self::new(FieldMapping::localized())
    }

    pub fn mapping(&self) -> &FieldMapping {
        &self.mapping
    }

    /// Translates one raw record; `index` is its position in the batch and
    /// is reported in errors.
    pub fn translate(
        &self,
        index: usize,
        raw: &Value,
    ) -> Result<NewEmployee, StoreError> {
        let malformed = |problem| StoreError::MalformedInput { index, problem };

        let object = raw.as_object().ok_or_else(|| {
            malformed(InputProblem::NotAnObject {
                found: json_type(raw),
            })
        })?;

        let value_of = |field: InputField| {
            self.mapping
                .lookup(object, field)
                .ok_or_else(|| malformed(InputProblem::MissingField(field)))
        };

        let name = text(value_of(InputField::Name)?, InputField::Name).map_err(malformed)?;
        if name.trim().is_empty() {
            return Err(malformed(InputProblem::BlankField(InputField::Name)));
        }

        Ok(NewEmployee {
            name,
            taxpayer_id: text(value_of(InputField::TaxpayerId)?, InputField::TaxpayerId)
                .map_err(malformed)?,
            gross_salary: decimal(value_of(InputField::GrossSalary)?, InputField::GrossSalary)
                .map_err(malformed)?,
            social_security_discount: decimal(
                value_of(InputField::SocialSecurityDiscount)?,
                InputField::SocialSecurityDiscount,
            )
            .map_err(malformed)?,
            dependents: integer(value_of(InputField::Dependents)?, InputField::Dependents)
                .map_err(malformed)?,
        })
    }

    /// Translates a whole batch, stopping at the first malformed record.
    pub fn translate_batch(
        &self,
        raws: &[Value],
    ) -> Result<Vec<NewEmployee>, StoreError> {
        raws.iter()
            .enumerate()
            .map(|(index, raw)| self.translate(index, raw))
            .collect()
    }
}

impl Default for ImportAdapter {
    fn default() -> Self {
        Self::canonical()
    }
}

/// Short name of a JSON value's type, as used in error messages.
pub fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

fn wrong_type(
    field: InputField,
    expected: &'static str,
    value: &Value,
) -> InputProblem {
    InputProblem::WrongType {
        field,
        expected,
        found: json_type(value),
    }
}

fn text(
    value: &Value,
    field: InputField,
) -> Result<String, InputProblem> {
    value
        .as_str()
        .map(str::to_string)
        .ok_or_else(|| wrong_type(field, "string", value))
}

/// Parses through the number's textual form so no binary float rounding
/// leaks into the decimal.
fn number_to_decimal(number: &Number) -> Option<Decimal> {
    let text = number.to_string();
    Decimal::from_str(&text)
        .or_else(|_| Decimal::from_scientific(&text))
        .ok()
}

/// Reads a JSON number or numeric string. Text that reads as a finite
/// number but does not fit a `Decimal` is out of range, anything else is the
/// wrong type.
fn numeric(
    value: &Value,
    field: InputField,
    expected: &'static str,
) -> Result<Decimal, InputProblem> {
    match value {
        Value::Number(number) => {
            number_to_decimal(number).ok_or(InputProblem::OutOfRange(field))
        }
        Value::String(s) => {
            let s = s.trim();
            Decimal::from_str(s)
                .or_else(|_| Decimal::from_scientific(s))
                .map_err(|_| {
                    if s.parse::<f64>().is_ok_and(f64::is_finite) {
                        InputProblem::OutOfRange(field)
                    } else {
                        wrong_type(field, expected, value)
                    }
                })
        }
        _ => Err(wrong_type(field, expected, value)),
    }
}

fn decimal(
    value: &Value,
    field: InputField,
) -> Result<Decimal, InputProblem> {
    numeric(value, field, "decimal number")
}

/// Whole numbers only, written either way: `2`, `2.0`, `"2"` or `"2.0"`.
fn integer(
    value: &Value,
    field: InputField,
) -> Result<i64, InputProblem> {
    if let Some(whole) = value.as_i64() {
        return Ok(whole);
    }
    let number = numeric(value, field, "integer")?;
    if !number.fract().is_zero() {
        return Err(wrong_type(field, "integer", value));
    }
    number.to_i64().ok_or(InputProblem::OutOfRange(field))
}
