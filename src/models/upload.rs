use std::path::{Path, PathBuf};

use crate::constants::{CSV_EXTENSIONS, IMAGE_EXTENSIONS};

/// How an upload is turned into SQL, decided by extension alone
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileKind {
    Csv,
    Image,
    Unsupported,
}

impl FileKind {
    pub fn from_extension(extension: &str) -> Self {
        let extension = extension.to_ascii_lowercase();
        if CSV_EXTENSIONS.contains(&extension.as_str()) {
            FileKind::Csv
        } else if IMAGE_EXTENSIONS.contains(&extension.as_str()) {
            FileKind::Image
        } else {
            FileKind::Unsupported
        }
    }
}

/// A file written to the uploads directory for the lifetime of one request
///
/// Nothing here deletes it; cleanup is external.
#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub original_name: String,
    pub stored_name: String,
    /// Lower-cased, without the dot; empty when the name has none
    pub extension: String,
    pub path: PathBuf,
}

impl UploadedFile {
    /// Describe a file stored as `<millis>-<original name>` under `uploads_dir`
    pub fn new(uploads_dir: &Path, original_name: &str, millis: i64) -> Self {
        let original_name = base_name(original_name).to_string();
        let stored_name = format!("{}-{}", millis, original_name);
        let extension = Path::new(&original_name)
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase())
            .unwrap_or_default();
        let path = absolute(uploads_dir).join(&stored_name);

        Self {
            original_name,
            stored_name,
            extension,
            path,
        }
    }

    pub fn kind(&self) -> FileKind {
        FileKind::from_extension(&self.extension)
    }

    /// Original name without its extension
    pub fn stem(&self) -> &str {
        Path::new(&self.original_name)
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or(&self.original_name)
    }
}

/// Strip any client-supplied directory components
fn base_name(name: &str) -> &str {
    name.rsplit(['/', '\\']).next().unwrap_or(name)
}

fn absolute(dir: &Path) -> PathBuf {
    if dir.is_absolute() {
        dir.to_path_buf()
    } else {
        std::env::current_dir()
            .map(|cwd| cwd.join(dir))
            .unwrap_or_else(|_| dir.to_path_buf())
    }
}
