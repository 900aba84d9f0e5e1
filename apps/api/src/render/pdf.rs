use std::process::Stdio;

use thiserror::Error;
use tokio::process::Command;
use tracing::{debug, info};

const SOURCE_FILE: &str = "resume.tex";
const OUTPUT_FILE: &str = "resume.pdf";

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{engine} failed: {stderr}")]
    Engine { engine: String, stderr: String },
}

/// Compiles LaTeX to PDF with an external engine (`tectonic` by default).
/// Each compilation runs in its own temporary directory, removed afterwards.
#[derive(Debug, Clone)]
pub struct PdfRenderer {
    engine: String,
}

impl PdfRenderer {
    pub fn new(engine: impl Into<String>) -> Self {
        Self {
            engine: engine.into(),
        }
    }

    pub fn engine(&self) -> &str {
        &self.engine
    }

    pub async fn compile(&self, tex: &str) -> Result<Vec<u8>, RenderError> {
        let scratch = tempfile::Builder::new().prefix("resumecraft-").tempdir()?;
        tokio::fs::write(scratch.path().join(SOURCE_FILE), tex).await?;

        debug!("Running {} in {}", self.engine, scratch.path().display());
        let output = Command::new(&self.engine)
            .arg(SOURCE_FILE)
            .current_dir(scratch.path())
            .stdin(Stdio::null())
            .kill_on_drop(true)
            .output()
            .await?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            return Err(RenderError::Engine {
                engine: self.engine.clone(),
                stderr,
            });
        }

        let pdf = tokio::fs::read(scratch.path().join(OUTPUT_FILE)).await?;
        info!("Rendered PDF ({} bytes)", pdf.len());
        Ok(pdf)
    }
}

/// Download name for a resume: `"<full name>.pdf"`, or `"resume.pdf"` when the
/// name is blank. Characters that would break a `Content-Disposition` header
/// are replaced.
pub fn pdf_filename(full_name: &str) -> String {
    let stem: String = full_name
        .trim()
        .chars()
        .map(|c| {
            if c.is_ascii_graphic() && !matches!(c, '"' | '\\' | '/' | ';') || c == ' ' {
                c
            } else {
                '_'
            }
        })
        .collect();
    if stem.is_empty() {
        "resume.pdf".to_string()
    } else {
        format!("{stem}.pdf")
    }
}
