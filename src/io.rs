use std::io::Write;
use std::path::Path;

use serde::{Serialize, de::DeserializeOwned};

use crate::error::Result;
use crate::types::Manifest;

/// Serializes an object to a pretty printed JSON file.
pub fn object_to_json<T: Serialize>(output_path: &Path, object: &T) -> Result<()> {
    let j = serde_json::to_string_pretty(object)?;
    let mut file = std::fs::File::create(output_path)?;
    file.write_all(j.as_bytes())?;
    file.write_all(b"\n")?;
    Ok(())
}

/// Deserializes an object from a JSON file.
pub fn object_from_json<T: DeserializeOwned>(file_path: &Path) -> Result<T> {
    let contents = std::fs::read_to_string(file_path)?;
    Ok(serde_json::from_str(&contents)?)
}

/// Writes `transforms.json`.
pub fn write_manifest(output_path: &Path, manifest: &Manifest) -> Result<()> {
    object_to_json(output_path, manifest)?;
    log::info!(
        "wrote {} frames to {}",
        manifest.frames.len(),
        output_path.display()
    );
    Ok(())
}
