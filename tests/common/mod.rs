//! Shared helpers for integration tests.

#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

use fileserve::http::resolver::Resolver;

static NEXT: AtomicU64 = AtomicU64::new(0);

/// A scratch served root, removed on drop.
pub struct TempRoot {
    path: PathBuf,
}

impl TempRoot {
    pub fn new() -> Self {
        let path = std::env::temp_dir().join(format!(
            "fileserve-test-{}-{}",
            std::process::id(),
            NEXT.fetch_add(1, Ordering::SeqCst)
        ));
        std::fs::create_dir_all(&path).unwrap();
        Self { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Writes `contents` to `relative`, creating parent directories.
    pub fn file(&self, relative: &str, contents: impl AsRef<[u8]>) -> &Self {
        let full = self.path.join(relative);
        if let Some(parent) = full.parent() {
            std::fs::create_dir_all(parent).unwrap();
        }
        std::fs::write(full, contents).unwrap();
        self
    }

    pub fn dir(&self, relative: &str) -> &Self {
        std::fs::create_dir_all(self.path.join(relative)).unwrap();
        self
    }

    pub fn resolver(&self) -> Resolver {
        Resolver::new(&self.path, "index.html")
    }
}

impl Drop for TempRoot {
    fn drop(&mut self) {
        let _ = std::fs::remove_dir_all(&self.path);
    }
}

/// Splits a raw response into (status line, content type line, body).
pub fn split_response(raw: &[u8]) -> (String, String, Vec<u8>) {
    let end = raw
        .windows(4)
        .position(|w| w == b"\r\n\r\n")
        .expect("response has no header terminator");
    let head = String::from_utf8(raw[..end].to_vec()).unwrap();
    let mut lines = head.split("\r\n");
    let status = lines.next().unwrap().to_string();
    let content_type = lines.next().unwrap_or_default().to_string();
    assert!(lines.next().is_none(), "unexpected extra header lines");
    (status, content_type, raw[end + 4..].to_vec())
}
