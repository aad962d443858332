// Computation request/response shapes shared by client -> coordinator -> worker.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::Matrix;

/// Operations a worker knows how to execute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    Add,
    Multiply,
    Transpose,
}

impl Operation {
    /// Wire tag of the operation.
    pub fn as_str(self) -> &'static str {
        match self {
            Operation::Add => "add",
            Operation::Multiply => "multiply",
            Operation::Transpose => "transpose",
        }
    }

    /// Parses a wire tag. Tags are matched exactly.
    pub fn parse(tag: &str) -> Option<Self> {
        match tag {
            "add" => Some(Operation::Add),
            "multiply" => Some(Operation::Multiply),
            "transpose" => Some(Operation::Transpose),
            _ => None,
        }
    }

    /// Whether the operation reads `mat2`.
    pub fn is_binary(self) -> bool {
        !matches!(self, Operation::Transpose)
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One computation call.
///
/// The operation travels as a raw string so an unrecognised tag reaches the
/// worker and comes back as an error payload rather than a decode failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatrixRequest {
    pub operation: String,
    pub mat1: Matrix,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mat2: Option<Matrix>,
}

impl MatrixRequest {
    pub fn new(operation: Operation, mat1: Matrix, mat2: Option<Matrix>) -> Self {
        Self {
            operation: operation.as_str().to_string(),
            mat1,
            mat2,
        }
    }

    pub fn add(a: Matrix, b: Matrix) -> Self {
        Self::new(Operation::Add, a, Some(b))
    }

    pub fn multiply(a: Matrix, b: Matrix) -> Self {
        Self::new(Operation::Multiply, a, Some(b))
    }

    pub fn transpose(a: Matrix) -> Self {
        Self::new(Operation::Transpose, a, None)
    }
}

/// Result of a computation call. A non-empty `error` makes `result` meaningless.
///
/// Both fields are always written, and both are required on decode: a reply
/// missing either one did not come from a working peer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatrixResponse {
    pub result: Matrix,
    pub error: String,
}

impl MatrixResponse {
    pub fn ok(result: Matrix) -> Self {
        Self {
            result,
            error: String::new(),
        }
    }

    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            result: Matrix::default(),
            error: error.into(),
        }
    }

    pub fn is_error(&self) -> bool {
        !self.error.is_empty()
    }

    /// Splits the response into the matrix or the error description.
    pub fn into_result(self) -> Result<Matrix, String> {
        if self.is_error() {
            Err(self.error)
        } else {
            Ok(self.result)
        }
    }
}
