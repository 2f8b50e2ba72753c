use std::path::PathBuf;

/// Fixed destination for finished downloads: `<home>/Desktop/downloads`.
/// Falls back to the current directory when no home directory is known.
pub fn downloads_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("Desktop")
        .join("downloads")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rooted_at_desktop_downloads() {
        let dir = downloads_dir();
        assert!(dir.ends_with("Desktop/downloads"));
    }
}
