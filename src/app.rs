//! The three screens, each taking the session and store explicitly.

use tracing::warn;

use crate::error::{Error, Result};
use crate::record::PatientRecord;
use crate::service::{Prediction, Scorer, TumorDetector};
use crate::session::Session;
use crate::store::PatientStore;
use crate::upload::Upload;

pub const TUTORIAL: &str = "\
Brain Tumor Detection
  - Upload an MRI image (.jpg, .jpeg or .png) together with the patient's name.
  - Only MRI scans are meaningful input for this classifier.
  - Each scan is reported as either 'Tumor detected' or 'No tumor detected',
    with the confidence in that result.
  - Every result is saved and can be reviewed or deleted from the history.";

pub fn show_tutorial(session: &Session) -> Result<&'static str> {
    session.require()?;
    Ok(TUTORIAL)
}

/// Run one upload through the classifier and save the outcome.
///
/// The name is stored as typed, so deleting it later needs the same text.
/// Nothing is written to the store unless the prediction succeeded.
pub fn check_tumor<S: Scorer>(
    session: &Session,
    store: &PatientStore,
    detector: &TumorDetector<S>,
    patient_name: &str,
    upload: &Upload,
) -> Result<(PatientRecord, Prediction)> {
    session.require()?;
    if patient_name.trim().is_empty() {
        return Err(Error::InvalidRecord("patient name must not be empty".into()));
    }

    let prediction = detector.detect(upload.bytes()).inspect_err(|e| {
        warn!(file = upload.file_name(), error = %e, "scan rejected");
    })?;
    let record = PatientRecord::new(patient_name, prediction.diagnosis, prediction.confidence)?;
    store.append(record.clone())?;
    Ok((record, prediction))
}

#[derive(Debug, Clone, PartialEq)]
pub struct HistoryRow {
    /// 1-based, as shown to the user.
    pub number: usize,
    pub name: String,
    pub prediction: String,
    pub tumor_probability: f64,
    pub no_tumor_probability: f64,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct HistoryView {
    pub rows: Vec<HistoryRow>,
}

impl HistoryView {
    pub fn from_records(records: &[PatientRecord]) -> Self {
        let rows = records
            .iter()
            .enumerate()
            .map(|(i, r)| HistoryRow {
                number: i + 1,
                name: r.name.clone(),
                prediction: r.result.to_string(),
                tumor_probability: r.tumor_probability(),
                no_tumor_probability: r.no_tumor_probability(),
            })
            .collect();
        Self { rows }
    }

    /// Plain-text table; two decimals for the percentages.
    pub fn render(&self) -> String {
        if self.rows.is_empty() {
            return "No tumor check results yet.".to_string();
        }
        let name_width = self
            .rows
            .iter()
            .map(|r| r.name.chars().count())
            .max()
            .unwrap_or(0)
            .max("Patient".len());
        let mut out = format!(
            "{:>3}  {:<name_width$}  {:<17}  {:>9}  {:>12}\n",
            "#", "Patient", "Prediction", "Tumor (%)", "No tumor (%)"
        );
        for row in &self.rows {
            out.push_str(&format!(
                "{:>3}  {:<name_width$}  {:<17}  {:>8.2}%  {:>11.2}%\n",
                row.number, row.name, row.prediction, row.tumor_probability, row.no_tumor_probability
            ));
        }
        out
    }
}

pub fn show_history(session: &Session, store: &PatientStore) -> Result<HistoryView> {
    session.require()?;
    Ok(HistoryView::from_records(&store.load()?))
}

/// Delete every record with this exact name. Returns the number removed.
pub fn delete_patient(session: &Session, store: &PatientStore, name: &str) -> Result<usize> {
    session.require()?;
    store.delete_by_name(name)
}

/// Delete by the 1-based row number shown in the history view.
pub fn delete_row(session: &Session, store: &PatientStore, number: usize) -> Result<PatientRecord> {
    session.require()?;
    match number.checked_sub(1) {
        Some(index) => store.delete_by_index(index),
        None => Err(Error::IndexOutOfRange {
            index: 0,
            len: store.load()?.len(),
        }),
    }
}
