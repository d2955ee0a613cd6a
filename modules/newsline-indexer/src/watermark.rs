//! Watermark persistence (spec §4.3, §12.3): the `updated` timestamp of the
//! last article folded into the index. Written atomically via
//! write-temp-then-rename so a crash mid-write never leaves a torn file.

use std::path::{Path, PathBuf};

use crate::error::Result;

pub fn load(path: &Path) -> Result<String> {
    if !path.exists() {
        return Ok(String::new());
    }
    Ok(std::fs::read_to_string(path)?.trim().to_string())
}

pub fn save(path: &Path, watermark: &str) -> Result<()> {
    let tmp: PathBuf = path.with_extension("tmp");
    std::fs::write(&tmp, watermark)?;
    std::fs::rename(&tmp, path)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_loads_as_empty() {
        let w = load(Path::new("/nonexistent/.last_indexed")).unwrap();
        assert_eq!(w, "");
    }

    #[test]
    fn save_then_load_roundtrips() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(".last_indexed");
        save(&path, "2024-01-02T10:00:00Z").unwrap();
        assert_eq!(load(&path).unwrap(), "2024-01-02T10:00:00Z");
    }
}
