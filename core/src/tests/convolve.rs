use proptest::prelude::*;

use crate::prelude::*;

fn runtime() -> ArrayRuntime {
    ArrayRuntime::new(&RuntimeConfig::default()).unwrap()
}

/// Sums the 3x3 neighborhood around every cell, treating everything outside
/// the grid as zero.
fn neighborhood_sums(cells: &[Vec<u8>]) -> Vec<i64> {
    let rows = cells.len() as isize;
    let cols = cells[0].len() as isize;
    let mut ret = vec![];
    for r in 0..rows {
        for c in 0..cols {
            let mut sum = 0;
            for dr in -1..=1 {
                for dc in -1..=1 {
                    let (y, x) = (r + dr, c + dc);
                    if (0..rows).contains(&y) && (0..cols).contains(&x) {
                        sum += cells[y as usize][x as usize] as i64;
                    }
                }
            }
            ret.push(sum);
        }
    }
    ret
}

#[test]
fn test_convolve2d_direct_definition() {
    let rt = runtime();
    let input = rt.from_shaped(&[1, 3], &[1, 2, 3], DType::Int32).unwrap();
    let kernel = rt.from_shaped(&[1, 3], &[1, 10, 100], DType::Int32).unwrap();

    let same = rt
        .convolve2d(&input, &kernel, Padding::Constant(Scalar::Int(0)))
        .unwrap();
    let host = rt.to_host(&same).unwrap();
    assert_eq!(Some(&[210, 321, 32][..]), host.as_slice::<i32>());

    let filled = rt
        .convolve2d(&input, &kernel, Padding::Constant(Scalar::Int(5)))
        .unwrap();
    let host = rt.to_host(&filled).unwrap();
    assert_eq!(Some(&[215, 321, 532][..]), host.as_slice::<i32>());

    let valid = rt.convolve2d(&input, &kernel, Padding::None).unwrap();
    assert_eq!(&[1, 1], valid.shape().dims());
    assert_eq!(Scalar::Int(321), rt.sum(&valid).unwrap());
}

#[test]
fn test_convolve2d_rejects_bad_kernels() {
    let rt = runtime();
    let input = rt.ones(&[4, 4], DType::Int16).unwrap();

    let even = rt.ones(&[3, 2], DType::Int16).unwrap();
    let err = rt.convolve2d(&input, &even, Padding::None).unwrap_err();
    assert_eq!(Error::EvenKernel(even.shape().clone()), err);
    assert_eq!(ErrorKind::Validation, err.kind());

    let big = rt.ones(&[5, 5], DType::Int16).unwrap();
    let err = rt.convolve2d(&input, &big, Padding::None).unwrap_err();
    assert_eq!(ErrorKind::Validation, err.kind());
    // With padding, a kernel larger than the input is fine.
    let out = rt
        .convolve2d(&input, &big, Padding::Constant(Scalar::Int(0)))
        .unwrap();
    // Each output sums a 3 or 4 by 3 or 4 window of ones.
    assert_eq!(Scalar::Int(14 * 14), rt.sum(&out).unwrap());

    let flat = rt.ones(&[4], DType::Int16).unwrap();
    let err = rt.convolve2d(&flat, &even, Padding::None).unwrap_err();
    assert_eq!(ErrorKind::Validation, err.kind());
}

proptest! {
    /// A zero-padded all-ones 3x3 kernel sums each neighborhood, on every
    /// engine.
    #[test]
    fn test_convolve2d_counts_neighborhoods(
        cells in (1..12_usize, 1..12_usize).prop_flat_map(|(rows, cols)| {
            prop::collection::vec(prop::collection::vec(0..2_u8, cols), rows)
        })
    ) {
        let rt = runtime();
        let expected = neighborhood_sums(&cells);
        let host = HostArray::from_rows(&cells).unwrap();
        for &backend in &BackendKind::ALL {
            let (shapes, sums) = rt
                .with_backend(backend, |rt| -> Result<_> {
                    // The tensor engine only convolves floats.
                    let dtype = match backend {
                        BackendKind::Tensor => DType::Float32,
                        _ => DType::Int16,
                    };
                    let grid = rt.cast(&rt.from_host(&host)?, dtype)?;
                    let kernel = rt.ones(&[3, 3], dtype)?;
                    let out = rt.convolve2d(&grid, &kernel, Padding::Constant(Scalar::Int(0)))?;
                    let shapes = (grid.shape().clone(), out.shape().clone());
                    let out = rt.to_host(&rt.cast(&out, DType::Int64)?)?;
                    Ok((shapes, out.as_slice::<i64>().unwrap_or_default().to_vec()))
                })
                .unwrap();
            prop_assert_eq!(&shapes.0, &shapes.1);
            prop_assert_eq!(&expected, &sums);
        }
    }
}
