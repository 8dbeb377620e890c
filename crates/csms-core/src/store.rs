use crate::error::{CsmsError, Result};
use crate::paths;
use crate::state::State;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::path::Path;
use tracing::warn;

/// A record persisted as one YAML document under `.csms/<DIR>/<id>.yaml`.
pub trait Record: Serialize + DeserializeOwned {
    const DIR: &'static str;

    fn id(&self) -> &str;

    fn not_found(id: &str) -> CsmsError;
}

pub fn load<T: Record>(root: &Path, id: &str) -> Result<T> {
    if paths::validate_id(id).is_err() {
        return Err(T::not_found(id));
    }
    let path = paths::record_path(root, T::DIR, id);
    if !path.exists() {
        return Err(T::not_found(id));
    }
    let data = std::fs::read_to_string(&path)?;
    Ok(serde_yaml::from_str(&data)?)
}

/// Write the record and bump the store revision.
pub fn save<T: Record>(root: &Path, record: &T) -> Result<()> {
    State::ensure_initialized(root)?;
    paths::validate_id(record.id())?;
    let path = paths::record_path(root, T::DIR, record.id());
    let data = serde_yaml::to_string(record)?;
    crate::io::atomic_write(&path, data.as_bytes())?;
    State::bump(root)?;
    Ok(())
}

pub fn exists<T: Record>(root: &Path, id: &str) -> bool {
    paths::validate_id(id).is_ok() && paths::record_path(root, T::DIR, id).exists()
}

/// Every readable record of type `T`, in directory order. Unparseable files
/// are skipped with a warning.
pub fn list<T: Record>(root: &Path) -> Result<Vec<T>> {
    let dir = root.join(T::DIR);
    if !dir.exists() {
        return Ok(Vec::new());
    }

    let mut records = Vec::new();
    for entry in std::fs::read_dir(&dir)? {
        let entry = entry?;
        let path = entry.path();
        if path.extension().and_then(|e| e.to_str()) != Some("yaml") {
            continue;
        }
        let data = std::fs::read_to_string(&path)?;
        match serde_yaml::from_str::<T>(&data) {
            Ok(r) => records.push(r),
            Err(e) => warn!(path = %path.display(), error = %e, "skipping unreadable record"),
        }
    }
    Ok(records)
}

pub fn remove<T: Record>(root: &Path, id: &str) -> Result<()> {
    State::ensure_initialized(root)?;
    if !exists::<T>(root, id) {
        return Err(T::not_found(id));
    }
    std::fs::remove_file(paths::record_path(root, T::DIR, id))?;
    State::bump(root)?;
    Ok(())
}
