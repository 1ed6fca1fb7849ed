//! Tests for the Thomas algorithm against a naive dense solve.

use aquamath::solve_tridiagonal;
use float_eq::assert_float_eq;
use rand::prelude::*;
use test_case::test_case;

/// Gaussian elimination with partial pivoting on a dense copy of the system.
fn dense_solve(lower: &[f64], diag: &[f64], upper: &[f64], rhs: &[f64]) -> Vec<f64> {
    let n = rhs.len();
    let mut a = vec![vec![0.0; n + 1]; n];
    for i in 0..n {
        a[i][i] = diag[i];
        if i > 0 {
            a[i][i - 1] = lower[i];
        }
        if i + 1 < n {
            a[i][i + 1] = upper[i];
        }
        a[i][n] = rhs[i];
    }

    for col in 0..n {
        let pivot = (col..n)
            .max_by(|&x, &y| a[x][col].abs().total_cmp(&a[y][col].abs()))
            .unwrap_or(col);
        a.swap(col, pivot);
        for row in (col + 1)..n {
            let factor = a[row][col] / a[col][col];
            for k in col..=n {
                a[row][k] -= factor * a[col][k];
            }
        }
    }

    let mut x = vec![0.0; n];
    for i in (0..n).rev() {
        let s: f64 = ((i + 1)..n).map(|k| a[i][k] * x[k]).sum();
        x[i] = (a[i][n] - s) / a[i][i];
    }
    x
}

#[test_case(1; "n1")]
#[test_case(2; "n2")]
#[test_case(10; "n10")]
#[test_case(100; "n100")]
fn matches_dense(n: usize) -> Result<(), String> {
    let mut rng = StdRng::seed_from_u64(42);

    // Diagonally dominant, like the string tension systems.
    let lower = (0..n).map(|_| rng.random_range(-1.0..1.0)).collect::<Vec<f64>>();
    let upper = (0..n).map(|_| rng.random_range(-1.0..1.0)).collect::<Vec<f64>>();
    let diag = (0..n).map(|_| -rng.random_range(2.5..4.0)).collect::<Vec<f64>>();
    let rhs = (0..n).map(|_| rng.random_range(-10.0..10.0)).collect::<Vec<f64>>();

    let x = solve_tridiagonal(&lower, &diag, &upper, &rhs)?;
    let expected = dense_solve(&lower, &diag, &upper, &rhs);

    assert_eq!(x.len(), n);
    for (a, b) in x.iter().zip(expected.iter()) {
        assert_float_eq!(a, b, abs <= 1e-9);
    }

    Ok(())
}

#[test]
fn f32_system() -> Result<(), String> {
    // [2 1 0; 1 2 1; 0 1 2] x = [3 4 3] => x = [1 1 1]
    let x = solve_tridiagonal(&[0.0_f32, 1.0, 1.0], &[2.0, 2.0, 2.0], &[1.0, 1.0, 0.0], &[3.0, 4.0, 3.0])?;
    for v in x {
        assert_float_eq!(v, 1.0, abs <= 1e-6);
    }
    Ok(())
}

#[test]
fn empty() -> Result<(), String> {
    let x = solve_tridiagonal::<f64>(&[], &[], &[], &[])?;
    assert!(x.is_empty());
    Ok(())
}

#[test]
fn singular_systems_are_rejected() {
    // [1 1; 1 1] eliminates to a zero in the second pivot.
    let err = solve_tridiagonal(&[0.0_f64, 1.0], &[1.0, 1.0], &[1.0, 0.0], &[1.0, 2.0]);
    assert!(err.is_err());

    // Two weightless neighbors around a segment leave a zero on the diagonal.
    let err = solve_tridiagonal(&[0.0_f64, 0.5], &[0.0, -2.0], &[0.0, 0.0], &[1.0, 1.0]);
    assert!(err.is_err());

    let err = solve_tridiagonal(&[0.0_f64], &[f64::NAN], &[0.0], &[1.0]);
    assert!(err.is_err());
}
