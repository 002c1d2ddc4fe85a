use std::path::Path;
use std::sync::OnceLock;

use ndarray::{ArrayView4, CowArray};
use ort::execution_providers::{CPUExecutionProvider, CUDAExecutionProvider};
use ort::session::Session;
use ort::session::builder::{GraphOptimizationLevel, SessionBuilder};
use tracing::info;

use crate::error::{Error, Result};
use crate::service::Scorer;

static SHARED: OnceLock<OnnxScorer> = OnceLock::new();

pub struct OnnxModel {
    provider: [ort::execution_providers::ExecutionProviderDispatch; 1],
}

impl OnnxModel {
    pub fn new(cuda: bool) -> Self {
        let provider = if cuda {
            [CUDAExecutionProvider::default().build().error_on_failure()]
        } else {
            [CPUExecutionProvider::default().build()]
        };
        Self { provider }
    }

    pub fn load_model(&self, model_path: &Path) -> Result<Session> {
        let unavailable = |reason: String| Error::ModelUnavailable {
            path: model_path.to_path_buf(),
            reason,
        };
        if !model_path.is_file() {
            return Err(unavailable("no such file".into()));
        }
        let session = SessionBuilder::new()
            .and_then(|b| b.with_execution_providers(self.provider.clone()))
            .and_then(|b| b.with_optimization_level(GraphOptimizationLevel::Level3))
            .and_then(|b| b.commit_from_file(model_path))
            .map_err(|e| unavailable(e.to_string()))?;
        Ok(session)
    }
}

/// Binary classifier exported to ONNX: `(1, 224, 224, 3)` in, `(1, 1)` out.
pub struct OnnxScorer {
    session: Session,
}

impl OnnxScorer {
    pub fn load(model_path: &Path, cuda: bool) -> Result<Self> {
        let t = std::time::Instant::now();
        let session = OnnxModel::new(cuda).load_model(model_path)?;
        info!(path = ?model_path, cuda, elapsed = ?t.elapsed(), "loaded classifier");
        Ok(Self { session })
    }

    /// Process-wide classifier, loaded on first call and kept until exit.
    ///
    /// Later calls return the first session whatever path they pass.
    pub fn shared(model_path: &Path, cuda: bool) -> Result<&'static OnnxScorer> {
        if let Some(scorer) = SHARED.get() {
            return Ok(scorer);
        }
        let scorer = Self::load(model_path, cuda)?;
        Ok(SHARED.get_or_init(|| scorer))
    }
}

impl Scorer for OnnxScorer {
    fn tumor_probability(&self, batch: ArrayView4<'_, f32>) -> Result<f32> {
        let xs = CowArray::from(batch.into_dyn());
        let input_data = ort::inputs![xs.view()]
            .map_err(|e| Error::Inference(format!("ORT input error: {e}")))?;
        let ys = self
            .session
            .run(input_data)
            .map_err(|e| Error::Inference(format!("model run error: {e}")))?;

        let (_name, output) = ys
            .iter()
            .next()
            .ok_or_else(|| Error::Inference("model produced no outputs".into()))?;
        let scores = output
            .try_extract_tensor::<f32>()
            .map_err(|e| Error::Inference(format!("unexpected output type: {e}")))?;
        if scores.len() != 1 {
            return Err(Error::Inference(format!(
                "expected a single score, got output shape {:?}",
                scores.shape()
            )));
        }
        scores
            .iter()
            .next()
            .copied()
            .ok_or_else(|| Error::Inference("empty output tensor".into()))
    }
}
