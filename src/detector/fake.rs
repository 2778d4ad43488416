//! Randomised label source for simulation and demos.

use super::{Frame, Label, LabelSource};
use crate::error::Result;
use parking_lot::Mutex;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Labels a frame with the target object on a coin flip.
///
/// When the coin lands heads the target label is reported with a uniformly
/// random confidence, so roughly half of those reports fall under a 50%
/// threshold. Seed it for reproducible runs.
pub struct FakeLabelSource {
    label: String,
    rng: Mutex<StdRng>,
}

impl FakeLabelSource {
    pub fn new(label: impl Into<String>, seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self {
            label: label.into(),
            rng: Mutex::new(rng),
        }
    }
}

impl LabelSource for FakeLabelSource {
    fn detect_labels(&self, _frame: &Frame, min_confidence: f32) -> Result<Vec<Label>> {
        let mut rng = self.rng.lock();
        let mut labels = Vec::new();
        if rng.gen_bool(0.5) {
            let confidence: f32 = rng.gen_range(0.0..=100.0);
            if confidence >= min_confidence {
                labels.push(Label::new(self.label.clone(), confidence));
            }
        }
        Ok(labels)
    }
}
