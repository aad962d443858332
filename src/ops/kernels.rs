//! Pure matrix kernels.
//!
//! Arithmetic wraps on overflow: there is no overflow detection, so results for
//! very large magnitudes are taken modulo 2^64 instead of failing.

use crate::model::{Matrix, Operation};

use super::KernelError;

/// Checks that two operands have compatible shapes for `op`.
pub fn validate(a: &Matrix, b: &Matrix, op: Operation) -> Result<(), KernelError> {
    let compatible = match op {
        Operation::Add => a.shape() == b.shape(),
        Operation::Multiply => a.cols == b.rows,
        Operation::Transpose => true,
    };
    if compatible {
        Ok(())
    } else {
        Err(KernelError::DimensionMismatch {
            op,
            left: a.shape(),
            right: b.shape(),
        })
    }
}

/// Elementwise sum of two equally shaped grids.
pub fn add(a: &Matrix, b: &Matrix) -> Result<Matrix, KernelError> {
    validate(a, b, Operation::Add)?;

    let mut sum = Matrix::zeros(a.rows, a.cols);
    for i in 0..a.rows {
        for j in 0..a.cols {
            sum.data[i][j] = a.data[i][j].wrapping_add(b.data[i][j]);
        }
    }
    Ok(sum)
}

/// Standard row-by-column product.
pub fn multiply(a: &Matrix, b: &Matrix) -> Result<Matrix, KernelError> {
    validate(a, b, Operation::Multiply)?;

    let mut product = Matrix::zeros(a.rows, b.cols);
    for i in 0..a.rows {
        for j in 0..b.cols {
            let mut acc: i64 = 0;
            for k in 0..a.cols {
                acc = acc.wrapping_add(a.data[i][k].wrapping_mul(b.data[k][j]));
            }
            product.data[i][j] = acc;
        }
    }
    Ok(product)
}

/// Swaps rows and columns. Only a 0x0 grid is rejected.
pub fn transpose(a: &Matrix) -> Result<Matrix, KernelError> {
    if a.is_empty() {
        return Err(KernelError::EmptyMatrix);
    }

    let mut transposed = Matrix::zeros(a.cols, a.rows);
    for i in 0..a.cols {
        for j in 0..a.rows {
            transposed.data[i][j] = a.data[j][i];
        }
    }
    Ok(transposed)
}
