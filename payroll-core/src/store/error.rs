use thiserror::Error;

use crate::import::InputField;
use crate::models::EmployeeId;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("employee {0} not found")]
    NotFound(EmployeeId),

    /// A raw record could not be turned into an employee. `index` is the
    /// 0-based position of the record in its batch (0 for single records).
    #[error("malformed input in record {index}: {problem}")]
    MalformedInput { index: usize, problem: InputProblem },
}

/// What was wrong with a malformed record.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum InputProblem {
    #[error("expected an object, got {found}")]
    NotAnObject { found: &'static str },

    #[error("missing required field '{0}'")]
    MissingField(InputField),

    #[error("field '{field}' must be a {expected}, got {found}")]
    WrongType {
        field: InputField,
        expected: &'static str,
        found: &'static str,
    },

    #[error("field '{0}' must not be blank")]
    BlankField(InputField),

    /// A number that does not fit the field's numeric type.
    #[error("field '{0}' is a number outside the supported range")]
    OutOfRange(InputField),
}
