//! CLI command implementations.

pub mod analyze;
pub mod catalog;

use std::path::{Path, PathBuf};

/// `<dir>/<stem>.<suffix>` next to the input file.
pub(crate) fn sibling_path(file: &Path, suffix: &str) -> PathBuf {
    let mut p = file.to_path_buf();
    let stem = p.file_stem().unwrap_or_default().to_string_lossy();
    p.set_file_name(format!("{}.{}", stem, suffix));
    p
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sibling_path() {
        assert_eq!(
            sibling_path(Path::new("/data/orders.csv"), "quality.json"),
            PathBuf::from("/data/orders.quality.json")
        );
    }
}
