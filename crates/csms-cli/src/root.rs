use std::path::{Path, PathBuf};

/// Resolve the data root.
///
/// Priority:
/// 1. `--root` flag / `CSMS_ROOT` env var (passed in as `explicit`)
/// 2. Walk upward from `cwd` looking for `.csms/`
/// 3. Fall back to `cwd`
pub fn resolve_root(explicit: Option<&Path>) -> PathBuf {
    if let Some(p) = explicit {
        return p.to_path_buf();
    }

    let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
    find_data_root(&cwd).unwrap_or(cwd)
}

fn find_data_root(start: &Path) -> Option<PathBuf> {
    start
        .ancestors()
        .find(|dir| dir.join(csms_core::paths::CSMS_DIR).is_dir())
        .map(Path::to_path_buf)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn explicit_root_wins() {
        let dir = TempDir::new().unwrap();
        let result = resolve_root(Some(dir.path()));
        assert_eq!(result, dir.path());
    }

    #[test]
    fn finds_csms_dir_from_subdirectory() {
        let dir = TempDir::new().unwrap();
        std::fs::create_dir_all(dir.path().join(".csms")).unwrap();
        let subdir = dir.path().join("exports/2025");
        std::fs::create_dir_all(&subdir).unwrap();

        assert_eq!(find_data_root(&subdir).as_deref(), Some(dir.path()));
    }

    #[test]
    fn no_csms_dir_yields_none() {
        let dir = TempDir::new().unwrap();
        assert!(find_data_root(dir.path()).is_none());
    }
}
