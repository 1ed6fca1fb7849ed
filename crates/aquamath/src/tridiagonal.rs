//! The Thomas algorithm for tridiagonal linear systems.

/// Solves the tridiagonal system `A x = d` in O(n).
///
/// Row `i` of `A` reads `lower[i] * x[i - 1] + diag[i] * x[i] + upper[i] * x[i + 1] = rhs[i]`. The
/// values `lower[0]` and `upper[n - 1]` are ignored.
///
/// No pivoting is performed, so the system should be diagonally dominant (as the constraint systems
/// in this workspace are).
///
/// # Errors
///
/// - If the four slices do not all have the same length.
/// - If a pivot is zero or not finite.
pub fn solve_tridiagonal<T>(lower: &[T], diag: &[T], upper: &[T], rhs: &[T]) -> Result<Vec<T>, String>
where
    T: num_traits::Float,
{
    let n = rhs.len();
    if lower.len() != n || diag.len() != n || upper.len() != n {
        return Err(format!(
            "Tridiagonal system size mismatch: lower {}, diag {}, upper {}, rhs {}",
            lower.len(),
            diag.len(),
            upper.len(),
            n
        ));
    }
    if n == 0 {
        return Ok(Vec::new());
    }

    // Forward sweep
    let mut c_prime = vec![T::zero(); n];
    let mut d_prime = vec![T::zero(); n];
    let pivot = |i: usize, m: T| {
        if m.is_zero() || !m.is_finite() {
            Err(format!("Tridiagonal system has a singular pivot in row {i}"))
        } else {
            Ok(m)
        }
    };
    let m = pivot(0, diag[0])?;
    c_prime[0] = upper[0] / m;
    d_prime[0] = rhs[0] / m;
    for i in 1..n {
        let m = pivot(i, diag[i] - lower[i] * c_prime[i - 1])?;
        c_prime[i] = if i + 1 < n { upper[i] / m } else { T::zero() };
        d_prime[i] = (rhs[i] - lower[i] * d_prime[i - 1]) / m;
    }

    // Back substitution
    let mut x = d_prime;
    for i in (0..n - 1).rev() {
        x[i] = x[i] - c_prime[i] * x[i + 1];
    }

    Ok(x)
}
