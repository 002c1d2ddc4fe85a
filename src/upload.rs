use std::fs;
use std::path::Path;

use crate::error::{Error, Result};

pub const ACCEPTED_EXTENSIONS: [&str; 3] = ["jpg", "jpeg", "png"];

/// An image file handed in by the user.
///
/// Only the declared extension is checked here. Whether the bytes really are
/// an image is left to decoding.
#[derive(Debug, Clone)]
pub struct Upload {
    file_name: String,
    bytes: Vec<u8>,
}

impl Upload {
    pub fn new(file_name: impl Into<String>, bytes: Vec<u8>) -> Result<Self> {
        let file_name = file_name.into();
        if !has_valid_extension(&file_name) || bytes.is_empty() {
            return Err(Error::UnsupportedUpload { file_name });
        }
        Ok(Self { file_name, bytes })
    }

    pub fn from_path(path: &Path) -> Result<Self> {
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        if !has_valid_extension(&file_name) {
            return Err(Error::UnsupportedUpload { file_name });
        }
        let bytes = fs::read(path)?;
        Self::new(file_name, bytes)
    }

    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }
}

fn has_valid_extension(file_name: &str) -> bool {
    match Path::new(file_name).extension().and_then(|ext| ext.to_str()) {
        Some(ext) => ACCEPTED_EXTENSIONS.contains(&ext.to_lowercase().as_str()),
        None => false,
    }
}
