// Maps a wire request onto the kernels.

use crate::model::{Matrix, MatrixRequest, MatrixResponse, Operation};

use super::{kernels, KernelError};

/// Largest result a worker will allocate, in elements (128 MiB of cells).
pub const MAX_RESULT_CELLS: usize = 1 << 24;

/// Runs the requested operation after checking the tag, operand presence and
/// the declared shapes of every operand the operation reads.
pub fn execute(req: &MatrixRequest) -> Result<Matrix, KernelError> {
    let op = Operation::parse(&req.operation)
        .ok_or_else(|| KernelError::UnknownOperation(req.operation.clone()))?;

    ensure_well_formed(&req.mat1)?;

    if !op.is_binary() {
        ensure_result_fits(req.mat1.cols, req.mat1.rows)?;
        return kernels::transpose(&req.mat1);
    }

    let mat2 = req
        .mat2
        .as_ref()
        .ok_or(KernelError::MissingOperand { op })?;
    ensure_well_formed(mat2)?;

    // Shape mismatches report before the size cap.
    kernels::validate(&req.mat1, mat2, op)?;
    match op {
        Operation::Multiply => ensure_result_fits(req.mat1.rows, mat2.cols)?,
        _ => ensure_result_fits(req.mat1.rows, req.mat1.cols)?,
    }

    match op {
        Operation::Add => kernels::add(&req.mat1, mat2),
        Operation::Multiply => kernels::multiply(&req.mat1, mat2),
        Operation::Transpose => kernels::transpose(&req.mat1),
    }
}

/// Same as [`execute`] but folds the error into the response payload.
pub fn respond(req: &MatrixRequest) -> MatrixResponse {
    match execute(req) {
        Ok(result) => MatrixResponse::ok(result),
        Err(err) => MatrixResponse::failed(err.to_string()),
    }
}

fn ensure_result_fits(rows: usize, cols: usize) -> Result<(), KernelError> {
    match rows.checked_mul(cols) {
        Some(cells) if cells <= MAX_RESULT_CELLS => Ok(()),
        _ => Err(KernelError::ResultTooLarge {
            rows,
            cols,
            limit: MAX_RESULT_CELLS,
        }),
    }
}

fn ensure_well_formed(m: &Matrix) -> Result<(), KernelError> {
    if m.is_well_formed() {
        Ok(())
    } else {
        Err(KernelError::MalformedMatrix {
            rows: m.rows,
            cols: m.cols,
        })
    }
}
