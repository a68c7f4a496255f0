//! Parallel computation implementations for statistical operations
//!
//! Every function reduces each row of a `(outer, horizontal)` matrix to one
//! value, with rows processed in parallel. Non-finite values are skipped; a
//! row without any finite value reduces to NaN.

use ndarray::parallel::prelude::*;
use ndarray::{Array1, Array2, ArrayView1, Axis};

fn reduce_rows_with<F>(data: &Array2<f64>, f: F) -> Vec<f64>
where
    F: Fn(ArrayView1<'_, f64>) -> f64 + Sync + Send,
{
    log::trace!(
        "Reducing {} rows across {} threads",
        data.nrows(),
        rayon::current_num_threads()
    );
    data.axis_iter(Axis(0)).into_par_iter().map(f).collect()
}

/// Weighted mean of each row
pub fn parallel_weighted_mean_rows(data: &Array2<f64>, weights: &Array1<f64>) -> Vec<f64> {
    reduce_rows_with(data, |row| {
        let mut sum = 0.0_f64;
        let mut wsum = 0.0_f64;
        for (&x, &w) in row.iter().zip(weights.iter()) {
            if x.is_finite() {
                sum += x * w;
                wsum += w;
            }
        }
        if wsum > 0.0 {
            sum / wsum
        } else {
            f64::NAN
        }
    })
}

/// Sum of each row
pub fn parallel_sum_rows(data: &Array2<f64>) -> Vec<f64> {
    reduce_rows_with(data, |row| {
        let finite: Vec<f64> = row.iter().copied().filter(|x| x.is_finite()).collect();
        if finite.is_empty() {
            f64::NAN
        } else {
            finite.iter().sum()
        }
    })
}

/// Minimum of each row
pub fn parallel_min_rows(data: &Array2<f64>) -> Vec<f64> {
    reduce_rows_with(data, |row| {
        let result = row
            .iter()
            .copied()
            .filter(|x| x.is_finite())
            .fold(f64::INFINITY, f64::min);
        if result == f64::INFINITY {
            f64::NAN
        } else {
            result
        }
    })
}

/// Maximum of each row
pub fn parallel_max_rows(data: &Array2<f64>) -> Vec<f64> {
    reduce_rows_with(data, |row| {
        let result = row
            .iter()
            .copied()
            .filter(|x| x.is_finite())
            .fold(f64::NEG_INFINITY, f64::max);
        if result == f64::NEG_INFINITY {
            f64::NAN
        } else {
            result
        }
    })
}

/// Percentile `q` (0..=100) of each row, linearly interpolated
pub fn parallel_percentile_rows(data: &Array2<f64>, q: f64) -> Vec<f64> {
    reduce_rows_with(data, |row| {
        let mut finite: Vec<f64> = row.iter().copied().filter(|x| x.is_finite()).collect();
        percentile_of(&mut finite, q)
    })
}

pub(crate) fn percentile_of(values: &mut [f64], q: f64) -> f64 {
    if values.is_empty() {
        return f64::NAN;
    }
    values.sort_by(f64::total_cmp);
    let pos = (q / 100.0).clamp(0.0, 1.0) * (values.len() - 1) as f64;
    let lower = pos.floor() as usize;
    let upper = pos.ceil() as usize;
    let frac = pos - lower as f64;
    values[lower] + (values[upper] - values[lower]) * frac
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_percentile_interpolates() {
        let mut v = vec![4.0, 1.0, 3.0, 2.0];
        assert_eq!(percentile_of(&mut v, 25.0), 1.75);
        assert_eq!(percentile_of(&mut v, 75.0), 3.25);
        assert!(percentile_of(&mut [], 50.0).is_nan());
    }

    #[test]
    fn test_rows_skip_nan() {
        let data = array![[1.0, f64::NAN, 3.0], [f64::NAN, f64::NAN, f64::NAN]];
        let min = parallel_min_rows(&data);
        assert_eq!(min[0], 1.0);
        assert!(min[1].is_nan());
        assert_eq!(parallel_sum_rows(&data)[0], 4.0);
    }
}
