use std::path::{Path, PathBuf};

/// Returns the workspace root, i.e. the parent of this crate's manifest
/// directory. The path is fixed at compile time.
pub fn workspace_dir() -> PathBuf {
    let manifest_dir = Path::new(env!("CARGO_MANIFEST_DIR"));
    manifest_dir
        .parent()
        .map(Path::to_path_buf)
        .unwrap_or_else(|| manifest_dir.to_path_buf())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_workspace_dir() {
        let workspace_dir = workspace_dir();
        assert!(workspace_dir.join("Cargo.toml").exists());
        assert!(workspace_dir.join("configs").is_dir());
    }
}
