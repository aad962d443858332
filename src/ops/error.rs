// Validation errors raised by the kernels. Their Display text is the error
// string clients receive, so it must stay stable.

use crate::model::Operation;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum KernelError {
    #[error("Matrix {} not possible. Mismatch between dimensions", noun(.op))]
    DimensionMismatch {
        op: Operation,
        left: (usize, usize),
        right: (usize, usize),
    },

    #[error("matrix is empty")]
    EmptyMatrix,

    #[error("malformed matrix: declared {rows}x{cols} does not match its data")]
    MalformedMatrix { rows: usize, cols: usize },

    #[error("result of {rows}x{cols} exceeds the limit of {limit} elements")]
    ResultTooLarge { rows: usize, cols: usize, limit: usize },

    #[error("missing second operand for {op}")]
    MissingOperand { op: Operation },

    #[error("unknown operation {0}")]
    UnknownOperation(String),
}

fn noun(op: &Operation) -> &'static str {
    match op {
        Operation::Add => "Addition",
        Operation::Multiply => "Multiplication",
        Operation::Transpose => "Transposition",
    }
}
