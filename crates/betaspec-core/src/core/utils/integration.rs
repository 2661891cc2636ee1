use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq, Clone, Copy)]
pub enum IntegrationError {
    #[error("Integration requires at least 2 points, but the table has {points}")]
    DegenerateTable { points: usize },
    #[error("Abscissae must be strictly increasing (violated at index {index})")]
    NonIncreasingAbscissa { index: usize },
}

/// Integrates a tabulated function with the composite Simpson rule.
///
/// The grid may be irregularly spaced. Consecutive pairs of intervals are integrated with
/// Simpson's rule for uneven panels; when the number of intervals is odd, the last interval
/// is closed with the matching three-point correction. Two points reduce to the trapezoid rule.
///
/// # Errors
///
/// Returns [`IntegrationError::DegenerateTable`] for fewer than two points and
/// [`IntegrationError::NonIncreasingAbscissa`] when `x` does not strictly increase.
pub fn simpson(table: &[(f64, f64)]) -> Result<f64, IntegrationError> {
    let n = table.len();
    if n < 2 {
        return Err(IntegrationError::DegenerateTable { points: n });
    }

    let mut widths = Vec::with_capacity(n - 1);
    for (index, pair) in table.windows(2).enumerate() {
        let width = pair[1].0 - pair[0].0;
        if !(width > 0.0) {
            return Err(IntegrationError::NonIncreasingAbscissa { index: index + 1 });
        }
        widths.push(width);
    }

    let y = |i: usize| table[i].1;
    let intervals = widths.len();
    if intervals == 1 {
        return Ok(0.5 * widths[0] * (y(0) + y(1)));
    }

    let mut sum = 0.0;
    let mut i = 0;
    while i + 1 < intervals {
        let (h0, h1) = (widths[i], widths[i + 1]);
        let span = h0 + h1;
        sum += span / 6.0
            * ((2.0 - h1 / h0) * y(i) + span * span / (h0 * h1) * y(i + 1)
                + (2.0 - h0 / h1) * y(i + 2));
        i += 2;
    }

    if intervals % 2 == 1 {
        let last = widths[intervals - 1];
        let prev = widths[intervals - 2];
        let alpha = (2.0 * last * last + 3.0 * last * prev) / (6.0 * (prev + last));
        let beta = (last * last + 3.0 * last * prev) / (6.0 * prev);
        let eta = last.powi(3) / (6.0 * prev * (prev + last));
        sum += alpha * y(n - 1) + beta * y(n - 2) - eta * y(n - 3);
    }

    Ok(sum)
}

/// Integrates rows of arbitrary shape by projecting each one onto an `(x, y)` pair.
/// Any other columns in the rows are ignored.
pub fn simpson_by<T, F>(rows: &[T], project: F) -> Result<f64, IntegrationError>
where
    F: Fn(&T) -> (f64, f64),
{
    let table: Vec<(f64, f64)> = rows.iter().map(project).collect();
    simpson(&table)
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOLERANCE: f64 = 1e-12;

    fn grid<F: Fn(f64) -> f64>(xs: &[f64], f: F) -> Vec<(f64, f64)> {
        xs.iter().map(|&x| (x, f(x))).collect()
    }

    #[test]
    fn empty_and_single_point_tables_are_rejected() {
        assert_eq!(
            simpson(&[]),
            Err(IntegrationError::DegenerateTable { points: 0 })
        );
        assert_eq!(
            simpson(&[(1.0, 2.0)]),
            Err(IntegrationError::DegenerateTable { points: 1 })
        );
    }

    #[test]
    fn two_points_with_equal_values_give_the_trapezoid() {
        let result = simpson(&[(1.0, 3.0), (3.5, 3.0)]).unwrap();
        assert!((result - 3.0 * 2.5).abs() < TOLERANCE);
    }

    #[test]
    fn even_interval_count_is_exact_for_cubics() {
        let table = grid(&[0.0, 0.25, 0.5, 0.75, 1.0], |x| x.powi(3) - x);
        let result = simpson(&table).unwrap();
        assert!((result - (0.25 - 0.5)).abs() < TOLERANCE);
    }

    #[test]
    fn odd_interval_count_is_exact_for_quadratics() {
        let table = grid(&[0.0, 1.0, 2.0, 3.0], |x| x * x);
        let result = simpson(&table).unwrap();
        assert!((result - 9.0).abs() < TOLERANCE);
    }

    #[test]
    fn irregular_spacing_is_exact_for_quadratics() {
        let table = grid(&[0.0, 0.1, 0.5, 0.6, 1.3, 2.0], |x| 3.0 * x * x + 1.0);
        let result = simpson(&table).unwrap();
        assert!((result - (8.0 + 2.0)).abs() < 1e-10);
    }

    #[test]
    fn repeated_abscissa_is_rejected() {
        let table = [(0.0, 1.0), (1.0, 1.0), (1.0, 2.0)];
        assert_eq!(
            simpson(&table),
            Err(IntegrationError::NonIncreasingAbscissa { index: 2 })
        );
    }

    #[test]
    fn simpson_by_ignores_extra_columns() {
        let rows = vec![[0.0, 1.0, 99.0], [1.0, 1.0, -5.0], [2.0, 1.0, 7.0]];
        let result = simpson_by(&rows, |row| (row[0], row[1])).unwrap();
        assert!((result - 2.0).abs() < TOLERANCE);
    }
}
