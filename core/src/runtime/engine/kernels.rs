//! Array kernels shared by every engine.
//!
//! Engines differ in how they execute a kernel ([`Exec`]) and in which
//! operations and dtypes they accept; the arithmetic itself lives here so
//! that every engine produces identical results.

use itertools::Itertools;
use rayon::prelude::*;

use crate::array::{Buffer, DType, NumericArray, Scalar, Shape};
use crate::error::{Error, Result};

/// How a kernel visits its output elements.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Exec {
    /// One element after another on the calling thread.
    Sequential,
    /// Elements are computed data-parallel on the rayon thread pool.
    Parallel,
}
impl Exec {
    /// Computes `f(i)` for every `i` in `0..len`, in order.
    pub fn map<T, F>(self, len: usize, f: F) -> Vec<T>
    where
        T: Send,
        F: Fn(usize) -> T + Send + Sync,
    {
        match self {
            Exec::Sequential => (0..len).map(f).collect(),
            Exec::Parallel => (0..len).into_par_iter().map(f).collect(),
        }
    }
}

/// Elementwise logical operation.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum LogicOp {
    /// Unary negation.
    Not,
    /// Conjunction.
    And,
    /// Disjunction.
    Or,
    /// Exclusive disjunction.
    Xor,
}

/// Elementwise comparison.
#[allow(missing_docs)]
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum CmpOp {
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
}
impl CmpOp {
    /// Compares two scalars.
    pub fn apply(self, lhs: Scalar, rhs: Scalar) -> bool {
        match self {
            CmpOp::Eq => lhs.partial_cmp(&rhs) == Some(std::cmp::Ordering::Equal),
            CmpOp::Ne => lhs.partial_cmp(&rhs) != Some(std::cmp::Ordering::Equal),
            CmpOp::Lt => lhs < rhs,
            CmpOp::Le => lhs <= rhs,
            CmpOp::Gt => lhs > rhs,
            CmpOp::Ge => lhs >= rhs,
        }
    }
}

/// Border handling for [`convolve2d()`].
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum Padding {
    /// No padding; the output shrinks by `kernel_size - 1` along each axis.
    None,
    /// The input is surrounded by this constant, and the output has the same
    /// shape as the input.
    Constant(Scalar),
}

/// Returns an error unless both arrays have the same shape and device.
pub fn check_compatible(a: &NumericArray, b: &NumericArray) -> Result<()> {
    if a.shape() != b.shape() {
        return Err(Error::ShapeMismatch(a.shape().clone(), b.shape().clone()));
    }
    if a.device() != b.device() {
        return Err(Error::DeviceMismatch(a.device(), b.device()));
    }
    Ok(())
}

/// Returns a new array on the same backend and device as `like`.
fn derive(like: &NumericArray, shape: Shape, data: Buffer) -> NumericArray {
    NumericArray::from_parts(like.backend(), like.device(), shape, data)
}

/// Applies a logical operation elementwise. `b` must be `None` exactly when
/// `op` is [`LogicOp::Not`].
pub fn logic(
    exec: Exec,
    op: LogicOp,
    a: &NumericArray,
    b: Option<&NumericArray>,
) -> Result<NumericArray> {
    let lhs = a.data().to_scalars();
    let out = match (op, b) {
        (LogicOp::Not, _) => exec.map(lhs.len(), |i| !lhs[i].is_nonzero()),
        (_, Some(b)) => {
            check_compatible(a, b)?;
            let rhs = b.data().to_scalars();
            exec.map(lhs.len(), |i| {
                let (x, y) = (lhs[i].is_nonzero(), rhs[i].is_nonzero());
                match op {
                    LogicOp::And => x && y,
                    LogicOp::Or => x || y,
                    _ => x ^ y,
                }
            })
        }
        (_, None) => unreachable!("binary logic op without right-hand side"),
    };
    Ok(derive(a, a.shape().clone(), Buffer::from_bools(out)))
}

/// Compares every element against a scalar.
pub fn compare(exec: Exec, a: &NumericArray, op: CmpOp, rhs: Scalar) -> NumericArray {
    let lhs = a.data().to_scalars();
    let out = exec.map(lhs.len(), |i| op.apply(lhs[i], rhs));
    derive(a, a.shape().clone(), Buffer::from_bools(out))
}

/// Compares two arrays elementwise.
pub fn compare_arrays(
    exec: Exec,
    a: &NumericArray,
    b: &NumericArray,
    op: CmpOp,
) -> Result<NumericArray> {
    check_compatible(a, b)?;
    let lhs = a.data().to_scalars();
    let rhs = b.data().to_scalars();
    let out = exec.map(lhs.len(), |i| op.apply(lhs[i], rhs[i]));
    Ok(derive(a, a.shape().clone(), Buffer::from_bools(out)))
}

/// Computes the 2D convolution of `input` with `kernel`, following the
/// direct definition
///
/// ```text
/// output[i, j] = sum over (a, b) of kernel[a, b] * padded[i + a, j + b]
/// ```
///
/// The output has the dtype of `input`.
pub fn convolve2d(
    exec: Exec,
    input: &NumericArray,
    kernel: &NumericArray,
    padding: Padding,
) -> Result<NumericArray> {
    let (rows, cols) = input.shape().as_2d()?;
    let (krows, kcols) = kernel.shape().as_2d()?;
    if krows % 2 == 0 || kcols % 2 == 0 {
        return Err(Error::EvenKernel(kernel.shape().clone()));
    }
    if input.device() != kernel.device() {
        return Err(Error::DeviceMismatch(input.device(), kernel.device()));
    }

    let (pad_rows, pad_cols, out_rows, out_cols, fill) = match padding {
        Padding::None => {
            if krows > rows || kcols > cols {
                return Err(Error::KernelTooLarge {
                    kernel: kernel.shape().clone(),
                    input: input.shape().clone(),
                });
            }
            (0, 0, rows - krows + 1, cols - kcols + 1, Scalar::default())
        }
        Padding::Constant(fill) => (krows / 2, kcols / 2, rows, cols, fill),
    };

    let src = input.data().to_scalars();
    let weights = kernel.data().to_scalars();
    let out = exec.map(out_rows * out_cols, |idx| {
        let (i, j) = (idx / out_cols, idx % out_cols);
        let mut acc = Scalar::default();
        for a in 0..krows {
            // Rows above the input wrap around to huge values and read `fill`.
            let r = (i + a).wrapping_sub(pad_rows);
            for b in 0..kcols {
                let c = (j + b).wrapping_sub(pad_cols);
                let x = if r < rows && c < cols {
                    src[r * cols + c]
                } else {
                    fill
                };
                acc = acc + weights[a * kcols + b] * x;
            }
        }
        acc
    });

    let shape = Shape::new(vec![out_rows, out_cols])?;
    let data = Buffer::from_scalars(input.dtype(), &out);
    Ok(derive(input, shape, data))
}

/// Converts every element to `dtype`.
pub fn cast(a: &NumericArray, dtype: DType) -> NumericArray {
    derive(a, a.shape().clone(), a.data().cast(dtype))
}

/// Counts the elements that are not zero or `false`.
pub fn count_nonzero(a: &NumericArray) -> usize {
    a.data()
        .to_scalars()
        .into_iter()
        .filter(|x| x.is_nonzero())
        .count()
}

/// Adds up every element.
pub fn sum(a: &NumericArray) -> Scalar {
    a.data()
        .to_scalars()
        .into_iter()
        .fold(Scalar::default(), |acc, x| acc + x)
}

/// Returns the positions of every nonzero element, in row-major order.
pub fn argwhere(a: &NumericArray) -> Vec<Vec<usize>> {
    a.data()
        .to_scalars()
        .into_iter()
        .positions(|x| x.is_nonzero())
        .map(|idx| a.shape().unflatten(idx))
        .collect()
}

/// Computes the inner product of two 1D arrays.
pub fn dot(a: &NumericArray, b: &NumericArray) -> Result<Scalar> {
    for v in &[a, b] {
        if v.ndim() != 1 {
            return Err(Error::RankMismatch {
                expected: 1,
                got: v.shape().clone(),
            });
        }
    }
    check_compatible(a, b)?;
    Ok(a.data()
        .to_scalars()
        .into_iter()
        .zip(b.data().to_scalars())
        .fold(Scalar::default(), |acc, (x, y)| acc + x * y))
}
