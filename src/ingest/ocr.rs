use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;
use tokio::process::Command;

/// Structured failure from an OCR run
#[derive(Error, Debug)]
pub enum OcrError {
    #[error("could not start OCR process: {0}")]
    Spawn(#[from] std::io::Error),

    #[error("OCR process timed out after {0} seconds")]
    TimedOut(u64),

    #[error("OCR process exited with code {exit_code:?}")]
    Failed {
        exit_code: Option<i32>,
        stdout: String,
        stderr: String,
    },

    #[error("OCR process produced no SQL")]
    EmptyOutput { stderr: String },
}

impl OcrError {
    /// Captured process output for debugging, when a process actually ran
    pub fn diagnostics(&self) -> Option<(Option<i32>, &str, &str)> {
        match self {
            OcrError::Failed {
                exit_code,
                stdout,
                stderr,
            } => Some((*exit_code, stdout.as_str(), stderr.as_str())),
            OcrError::EmptyOutput { stderr } => Some((Some(0), "", stderr.as_str())),
            _ => None,
        }
    }
}

/// Capability that extracts a table from an image as a SQL script
#[async_trait]
pub trait OcrExtractor: Send + Sync {
    async fn extract_table_from_image(
        &self,
        image_path: &Path,
        table_name: &str,
    ) -> Result<String, OcrError>;
}

/// Runs `<interpreter> <script> <imagePath> <tableName>` and reads SQL from stdout
#[derive(Debug, Clone)]
pub struct CommandOcr {
    pub interpreter: String,
    pub script: PathBuf,
    pub timeout: Duration,
}

impl CommandOcr {
    pub fn new(interpreter: impl Into<String>, script: impl Into<PathBuf>, timeout: Duration) -> Self {
        Self {
            interpreter: interpreter.into(),
            script: script.into(),
            timeout,
        }
    }
}

#[async_trait]
impl OcrExtractor for CommandOcr {
    async fn extract_table_from_image(
        &self,
        image_path: &Path,
        table_name: &str,
    ) -> Result<String, OcrError> {
        tracing::info!(
            "Running OCR: {} {} {} {}",
            self.interpreter,
            self.script.display(),
            image_path.display(),
            table_name
        );

        let child = Command::new(&self.interpreter)
            .arg(&self.script)
            .arg(image_path)
            .arg(table_name)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()?;

        // Dropping the wait future on timeout kills the child.
        let output = tokio::time::timeout(self.timeout, child.wait_with_output())
            .await
            .map_err(|_| OcrError::TimedOut(self.timeout.as_secs()))??;

        let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
        let stderr = String::from_utf8_lossy(&output.stderr).into_owned();

        tracing::debug!("OCR stdout:\n{}", stdout);
        if !stderr.is_empty() {
            tracing::debug!("OCR stderr:\n{}", stderr);
        }

        if !output.status.success() {
            return Err(OcrError::Failed {
                exit_code: output.status.code(),
                stdout,
                stderr,
            });
        }

        if stdout.trim().is_empty() {
            return Err(OcrError::EmptyOutput { stderr });
        }

        Ok(stdout)
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    fn write_script(dir: &Path, body: &str) -> PathBuf {
        let path = dir.join("ocr.sh");
        std::fs::write(&path, body).unwrap();
        path
    }

    #[tokio::test]
    async fn test_command_ocr_passes_arguments_and_reads_stdout() {
        let dir = tempfile::TempDir::new().unwrap();
        let script = write_script(
            dir.path(),
            "echo \"CREATE TABLE IF NOT EXISTS $2 (src TEXT);\"\necho \"INSERT INTO $2 (src) VALUES ('$1');\"\n",
        );
        let ocr = CommandOcr::new("sh", script, Duration::from_secs(10));

        let sql = ocr
            .extract_table_from_image(Path::new("/tmp/scan.png"), "scan")
            .await
            .unwrap();

        assert!(sql.starts_with("CREATE TABLE IF NOT EXISTS scan (src TEXT);"));
        assert!(sql.contains("VALUES ('/tmp/scan.png')"));
    }

    #[tokio::test]
    async fn test_command_ocr_non_zero_exit() {
        let dir = tempfile::TempDir::new().unwrap();
        let script = write_script(dir.path(), "echo partial\necho 'Traceback: boom' >&2\nexit 3\n");
        let ocr = CommandOcr::new("sh", script, Duration::from_secs(10));

        let err = ocr
            .extract_table_from_image(Path::new("/tmp/scan.png"), "scan")
            .await
            .unwrap_err();

        let (exit_code, stdout, stderr) = err.diagnostics().unwrap();
        assert_eq!(exit_code, Some(3));
        assert_eq!(stdout.trim(), "partial");
        assert!(stderr.contains("boom"));
    }

    #[tokio::test]
    async fn test_command_ocr_empty_output() {
        let dir = tempfile::TempDir::new().unwrap();
        let script = write_script(dir.path(), "exit 0\n");
        let ocr = CommandOcr::new("sh", script, Duration::from_secs(10));

        let err = ocr
            .extract_table_from_image(Path::new("/tmp/scan.png"), "scan")
            .await
            .unwrap_err();

        assert!(matches!(err, OcrError::EmptyOutput { .. }));
    }

    #[tokio::test]
    async fn test_command_ocr_timeout() {
        let dir = tempfile::TempDir::new().unwrap();
        let script = write_script(dir.path(), "sleep 5\n");
        let ocr = CommandOcr::new("sh", script, Duration::from_millis(200));

        let err = ocr
            .extract_table_from_image(Path::new("/tmp/scan.png"), "scan")
            .await
            .unwrap_err();

        assert!(matches!(err, OcrError::TimedOut(_)));
    }

    #[tokio::test]
    async fn test_command_ocr_missing_interpreter() {
        let ocr = CommandOcr::new(
            "definitely-not-an-interpreter",
            "script.py",
            Duration::from_secs(1),
        );

        let err = ocr
            .extract_table_from_image(Path::new("/tmp/scan.png"), "scan")
            .await
            .unwrap_err();

        assert!(matches!(err, OcrError::Spawn(_)));
    }
}
