use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Binary outcome of a scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Diagnosis {
    #[serde(rename = "Tumor detected")]
    TumorDetected,
    #[serde(rename = "No tumor detected")]
    NoTumorDetected,
}

impl Diagnosis {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::TumorDetected => "Tumor detected",
            Self::NoTumorDetected => "No tumor detected",
        }
    }
}

impl fmt::Display for Diagnosis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One persisted scan result.
///
/// `confidence` is the percentage assigned to `result`, not the raw tumor
/// probability: a `NoTumorDetected` record at 90.0 means a 10% tumor score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "StoredRecord")]
pub struct PatientRecord {
    pub name: String,
    pub result: Diagnosis,
    pub confidence: f64,
}

/// On-disk shape, checked by `PatientRecord::new` before it is accepted.
#[derive(Deserialize)]
struct StoredRecord {
    name: String,
    result: Diagnosis,
    confidence: f64,
}

impl TryFrom<StoredRecord> for PatientRecord {
    type Error = Error;

    fn try_from(stored: StoredRecord) -> Result<Self> {
        Self::new(stored.name, stored.result, stored.confidence)
    }
}

impl PatientRecord {
    pub fn new(name: impl Into<String>, result: Diagnosis, confidence: f64) -> Result<Self> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(Error::InvalidRecord("patient name must not be empty".into()));
        }
        if !(0.0..=100.0).contains(&confidence) {
            return Err(Error::InvalidRecord(format!(
                "confidence {confidence} is outside [0, 100]"
            )));
        }
        Ok(Self {
            name,
            result,
            confidence,
        })
    }

    pub fn tumor_probability(&self) -> f64 {
        match self.result {
            Diagnosis::TumorDetected => self.confidence,
            Diagnosis::NoTumorDetected => 100.0 - self.confidence,
        }
    }

    pub fn no_tumor_probability(&self) -> f64 {
        100.0 - self.tumor_probability()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_with_display_labels() {
        let record = PatientRecord::new("Alice", Diagnosis::TumorDetected, 87.3).unwrap();
        let json = serde_json::to_string(&record).unwrap();
        assert_eq!(
            json,
            r#"{"name":"Alice","result":"Tumor detected","confidence":87.3}"#
        );
    }

    #[test]
    fn reads_records_written_by_hand() {
        let json = r#"{"name": "Bob", "result": "No tumor detected", "confidence": 64.0}"#;
        let record: PatientRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.result, Diagnosis::NoTumorDetected);
        assert_eq!(record.confidence, 64.0);
    }

    #[test]
    fn invalid_records_do_not_deserialize() {
        for json in [
            r#"{"name": "", "result": "No tumor detected", "confidence": 50.0}"#,
            r#"{"name": "Bob", "result": "Tumor detected", "confidence": 150.0}"#,
            r#"{"name": "Bob", "result": "Tumor detected", "confidence": -1.0}"#,
        ] {
            assert!(serde_json::from_str::<PatientRecord>(json).is_err(), "{json}");
        }
    }

    #[test]
    fn probabilities_follow_the_reported_label() {
        let negative = PatientRecord::new("Bob", Diagnosis::NoTumorDetected, 90.0).unwrap();
        assert_eq!(negative.tumor_probability(), 10.0);
        assert_eq!(negative.no_tumor_probability(), 90.0);

        let positive = PatientRecord::new("Eve", Diagnosis::TumorDetected, 75.0).unwrap();
        assert_eq!(positive.tumor_probability(), 75.0);
        assert_eq!(positive.no_tumor_probability(), 25.0);
    }

    #[test]
    fn rejects_blank_names_and_bad_confidence() {
        assert!(matches!(
            PatientRecord::new("  ", Diagnosis::TumorDetected, 50.0),
            Err(Error::InvalidRecord(_))
        ));
        assert!(matches!(
            PatientRecord::new("Carol", Diagnosis::TumorDetected, 100.5),
            Err(Error::InvalidRecord(_))
        ));
        assert!(matches!(
            PatientRecord::new("Carol", Diagnosis::TumorDetected, f64::NAN),
            Err(Error::InvalidRecord(_))
        ));
    }
}
