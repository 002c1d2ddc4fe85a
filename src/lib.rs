pub mod app;
pub mod cli;
pub mod error;
pub mod logging;
pub mod model;
pub mod preprocess;
pub mod record;
pub mod service;
pub mod session;
pub mod store;
pub mod upload;

pub use crate::app::{HistoryView, check_tumor, delete_patient, delete_row, show_history, show_tutorial};
pub use crate::cli::{Args, Command};
pub use crate::error::{Error, Result};
pub use crate::model::{OnnxModel, OnnxScorer};
pub use crate::preprocess::{PreprocessConfig, Processor};
pub use crate::record::{Diagnosis, PatientRecord};
pub use crate::service::{Prediction, Scorer, TumorDetector};
pub use crate::session::{Authenticator, Session, StaticCredentials};
pub use crate::store::PatientStore;
pub use crate::upload::Upload;
