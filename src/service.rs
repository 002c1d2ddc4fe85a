use ndarray::{Array3, ArrayView4, Axis};
use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::preprocess::Processor;
use crate::record::Diagnosis;

/// Scores above this are reported as a tumor. Strict: exactly 0.5 is negative.
pub const TUMOR_THRESHOLD: f32 = 0.5;

/// Anything that maps a `(1, H, W, 3)` batch to a tumor probability.
pub trait Scorer {
    fn tumor_probability(&self, batch: ArrayView4<'_, f32>) -> Result<f32>;
}

impl<S: Scorer + ?Sized> Scorer for &S {
    fn tumor_probability(&self, batch: ArrayView4<'_, f32>) -> Result<f32> {
        (**self).tumor_probability(batch)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Prediction {
    pub diagnosis: Diagnosis,
    /// Percentage assigned to `diagnosis`.
    pub confidence: f64,
    /// Raw model output, P(tumor).
    pub probability: f32,
}

impl Prediction {
    pub fn from_probability(p: f32) -> Self {
        let (diagnosis, confidence) = if p > TUMOR_THRESHOLD {
            (Diagnosis::TumorDetected, p as f64 * 100.0)
        } else {
            (Diagnosis::NoTumorDetected, (1.0 - p as f64) * 100.0)
        };
        Self {
            diagnosis,
            confidence,
            probability: p,
        }
    }
}

/// Preprocessor and classifier glued together.
pub struct TumorDetector<S> {
    processor: Processor,
    scorer: S,
}

impl<S: Scorer> TumorDetector<S> {
    pub fn new(processor: Processor, scorer: S) -> Self {
        Self { processor, scorer }
    }

    /// Classify one preprocessed image.
    pub fn classify(&self, tensor: &Array3<f32>) -> Result<Prediction> {
        let expected = self.processor.config.shape();
        if tensor.shape() != expected {
            return Err(Error::Inference(format!(
                "expected input shape {:?}, got {:?}",
                expected,
                tensor.shape()
            )));
        }

        let batch = tensor.view().insert_axis(Axis(0));
        let t = std::time::Instant::now();
        let p = self.scorer.tumor_probability(batch)?;
        debug!(elapsed = ?t.elapsed(), probability = p, "model run");

        if !(0.0..=1.0).contains(&p) {
            return Err(Error::Inference(format!(
                "model returned {p}, expected a probability in [0, 1]"
            )));
        }
        let prediction = Prediction::from_probability(p);
        info!(
            diagnosis = %prediction.diagnosis,
            confidence = prediction.confidence,
            "classified scan"
        );
        Ok(prediction)
    }

    /// Decode, preprocess and classify raw upload bytes.
    pub fn detect(&self, raw: &[u8]) -> Result<Prediction> {
        let tensor = self.processor.preprocess(raw)?;
        self.classify(&tensor)
    }
}
