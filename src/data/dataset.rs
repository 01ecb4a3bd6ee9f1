//! In-memory window dataset and its batcher

use super::window::{to_samples, WindowSample};
use crate::error::Result;
use burn::data::dataloader::batcher::Batcher;
use burn::tensor::{backend::Backend, Tensor, TensorData};
use ndarray::{Array1, Array3};
use rand::{rngs::StdRng, seq::SliceRandom, SeedableRng};

/// Window samples ready for training
#[derive(Debug, Clone, Default)]
pub struct SalesDataset {
    samples: Vec<WindowSample>,
}

impl SalesDataset {
    /// Create a dataset from samples
    pub fn new(samples: Vec<WindowSample>) -> Self {
        Self { samples }
    }

    /// Create a dataset from `x: [n, look_back, features]` and `y: [n]`
    pub fn from_arrays(x: &Array3<f32>, y: &Array1<f32>) -> Result<Self> {
        Ok(Self::new(to_samples(x, y)?))
    }

    /// Number of samples
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Check if empty
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Get a sample by index
    pub fn sample(&self, index: usize) -> Option<&WindowSample> {
        self.samples.get(index)
    }

    /// All samples in order
    pub fn samples(&self) -> &[WindowSample] {
        &self.samples
    }

    /// Split off the trailing `fraction` of samples for validation.
    ///
    /// The split is taken before any shuffling, so validation always covers
    /// the most recent windows.
    pub fn split_validation(&self, fraction: f64) -> (Self, Self) {
        let n = self.samples.len();
        let n_valid = ((n as f64) * fraction.clamp(0.0, 1.0)) as usize;
        let split_idx = n - n_valid;

        (
            Self::new(self.samples[..split_idx].to_vec()),
            Self::new(self.samples[split_idx..].to_vec()),
        )
    }

    /// Shuffle the samples in place
    pub fn shuffle(&mut self, seed: u64) {
        let mut rng = StdRng::seed_from_u64(seed);
        self.samples.shuffle(&mut rng);
    }
}

/// Batch of windows as tensors
#[derive(Clone, Debug)]
pub struct SalesBatch<B: Backend> {
    /// `[batch, look_back, features]`
    pub features: Tensor<B, 3>,
    /// `[batch, 1]`
    pub targets: Tensor<B, 2>,
}

/// Turns window samples into [`SalesBatch`]es on one device
#[derive(Clone, Debug)]
pub struct SalesBatcher<B: Backend> {
    device: B::Device,
}

impl<B: Backend> SalesBatcher<B> {
    pub fn new(device: B::Device) -> Self {
        Self { device }
    }
}

impl<B: Backend> Batcher<WindowSample, SalesBatch<B>> for SalesBatcher<B> {
    fn batch(&self, items: Vec<WindowSample>) -> SalesBatch<B> {
        let batch_size = items.len();
        let (look_back, num_features) = items
            .first()
            .map(|s| s.features.dim())
            .unwrap_or((0, 0));

        let features_flat: Vec<f32> = items
            .iter()
            .flat_map(|s| s.features.iter().copied())
            .collect();
        let targets_flat: Vec<f32> = items.iter().map(|s| s.target).collect();

        let features = Tensor::from_data(
            TensorData::new(features_flat, [batch_size, look_back, num_features]),
            &self.device,
        );
        let targets = Tensor::from_data(TensorData::new(targets_flat, [batch_size, 1]), &self.device);

        SalesBatch { features, targets }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use burn::backend::NdArray;
    use ndarray::Array2;

    type TestBackend = NdArray<f32>;

    fn create_test_samples(n: usize) -> Vec<WindowSample> {
        (0..n)
            .map(|i| WindowSample::new(Array2::from_elem((20, 11), i as f32 * 0.01), i as f32))
            .collect()
    }

    #[test]
    fn test_split_validation_takes_tail() {
        let dataset = SalesDataset::new(create_test_samples(10));
        let (train, valid) = dataset.split_validation(0.2);

        assert_eq!(train.len(), 8);
        assert_eq!(valid.len(), 2);
        assert_eq!(valid.sample(0).unwrap().target, 8.0);

        let (train, valid) = dataset.split_validation(0.0);
        assert_eq!(train.len(), 10);
        assert!(valid.is_empty());
    }

    #[test]
    fn test_shuffle_is_seeded() {
        let mut a = SalesDataset::new(create_test_samples(50));
        let mut b = a.clone();
        a.shuffle(7);
        b.shuffle(7);

        let targets_a: Vec<f32> = a.samples().iter().map(|s| s.target).collect();
        let targets_b: Vec<f32> = b.samples().iter().map(|s| s.target).collect();
        assert_eq!(targets_a, targets_b);
        assert_eq!(a.len(), 50);
    }

    #[test]
    fn test_batcher_shapes() {
        let device = Default::default();
        let batcher = SalesBatcher::<TestBackend>::new(device);
        let batch = batcher.batch(create_test_samples(4));

        assert_eq!(batch.features.dims(), [4, 20, 11]);
        assert_eq!(batch.targets.dims(), [4, 1]);

        let targets: Vec<f32> = batch.targets.into_data().to_vec().unwrap();
        assert_eq!(targets, vec![0.0, 1.0, 2.0, 3.0]);
    }
}
