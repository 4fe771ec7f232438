use std::path::Path;

use serde::{Serialize, de::DeserializeOwned};

use crate::error::{DatasetError, Result};

/// Serializes an object to a pretty JSON file, replacing any existing file.
pub fn object_to_json<T: Serialize>(output_path: &Path, object: &T) -> Result<()> {
    let j = serde_json::to_string_pretty(object)?;
    std::fs::write(output_path, j)?;
    Ok(())
}

/// Deserializes an object from a JSON file.
pub fn object_from_json<T: DeserializeOwned>(file_path: &Path) -> Result<T> {
    let contents = std::fs::read_to_string(file_path)?;
    serde_json::from_str(&contents).map_err(|e| DatasetError::MalformedRecord {
        path: file_path.to_path_buf(),
        reason: e.to_string(),
    })
}
