//! Sliding look-back windows over scaled feature rows

use crate::error::{Error, Result};
use ndarray::{s, Array1, Array2, Array3, Axis};

/// One `(input, target)` pair
#[derive(Debug, Clone, PartialEq)]
pub struct WindowSample {
    /// `[look_back, features]` block of consecutive rows
    pub features: Array2<f32>,
    /// Scaled sales of the row right after the block
    pub target: f32,
}

impl WindowSample {
    /// Create a new sample
    pub fn new(features: Array2<f32>, target: f32) -> Self {
        Self { features, target }
    }

    /// Number of time steps
    pub fn look_back(&self) -> usize {
        self.features.nrows()
    }

    /// Number of features per time step
    pub fn num_features(&self) -> usize {
        self.features.ncols()
    }
}

/// Cut `data` into stride-1 windows of `look_back` rows.
///
/// Returns `x` with shape `[n - look_back, look_back, features]` and `y` with
/// shape `[n - look_back]`, where `y[i]` is column 0 of row `i + look_back`.
/// The last `look_back` rows never start a window, and data with at most
/// `look_back` rows yields no samples.
pub fn create_windows(data: &Array2<f32>, look_back: usize) -> Result<(Array3<f32>, Array1<f32>)> {
    if look_back == 0 {
        return Err(Error::Config("look_back must be > 0".to_string()));
    }

    let (rows, num_features) = data.dim();
    let num_samples = rows.saturating_sub(look_back);

    let mut x = Array3::zeros((num_samples, look_back, num_features));
    let mut y = Array1::zeros(num_samples);

    for i in 0..num_samples {
        x.index_axis_mut(Axis(0), i)
            .assign(&data.slice(s![i..i + look_back, ..]));
        y[i] = data[[i + look_back, 0]];
    }

    Ok((x, y))
}

/// Split window arrays into owned samples
pub fn to_samples(x: &Array3<f32>, y: &Array1<f32>) -> Result<Vec<WindowSample>> {
    if x.len_of(Axis(0)) != y.len() {
        return Err(Error::ShapeMismatch {
            expected: vec![x.len_of(Axis(0))],
            found: vec![y.len()],
        });
    }

    Ok(x.outer_iter()
        .zip(y.iter())
        .map(|(features, &target)| WindowSample::new(features.to_owned(), target))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sequential(rows: usize, cols: usize) -> Array2<f32> {
        Array2::from_shape_fn((rows, cols), |(r, c)| (r * 100 + c) as f32)
    }

    #[test]
    fn test_eight_rows_look_back_three() {
        let data = sequential(8, 11);
        let (x, y) = create_windows(&data, 3).unwrap();

        assert_eq!(x.dim(), (5, 3, 11));
        assert_eq!(y.len(), 5);
        for i in 0..5 {
            assert_eq!(y[i], data[[i + 3, 0]]);
        }
    }

    #[test]
    fn test_sample_count_for_every_look_back() {
        let rows = 12;
        let data = sequential(rows, 4);
        for look_back in 1..=rows {
            let (x, y) = create_windows(&data, look_back).unwrap();
            assert_eq!(x.len_of(Axis(0)), rows - look_back);
            assert_eq!(y.len(), rows - look_back);
        }
    }

    #[test]
    fn test_last_row_of_each_window() {
        let data = sequential(10, 3);
        let look_back = 4;
        let (x, _) = create_windows(&data, look_back).unwrap();

        for (i, window) in x.outer_iter().enumerate() {
            assert_eq!(window.row(0), data.row(i));
            assert_eq!(window.row(look_back - 1), data.row(i + look_back - 1));
        }
    }

    #[test]
    fn test_short_input_yields_no_samples() {
        let data = sequential(3, 2);
        let (x, y) = create_windows(&data, 5).unwrap();
        assert_eq!(x.dim(), (0, 5, 2));
        assert!(y.is_empty());
    }

    #[test]
    fn test_zero_look_back_rejected() {
        assert!(create_windows(&sequential(4, 2), 0).is_err());
    }

    #[test]
    fn test_to_samples() {
        let data = sequential(6, 2);
        let (x, y) = create_windows(&data, 2).unwrap();
        let samples = to_samples(&x, &y).unwrap();

        assert_eq!(samples.len(), 4);
        assert_eq!(samples[1].look_back(), 2);
        assert_eq!(samples[1].num_features(), 2);
        assert_eq!(samples[1].target, 300.0);
    }
}
