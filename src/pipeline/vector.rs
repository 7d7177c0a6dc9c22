//! Vector page conversion via an external Inkscape executable.
//!
//! Inkscape imports a single PDF page and exports it as EMF, which
//! PowerPoint embeds as a scalable picture. Each page is a separate blocking
//! subprocess. Its stderr goes to a log file inside a private `TempDir`
//! rather than a pipe, so a chatty Inkscape can never block on a full pipe
//! while we poll it for the timeout.

use crate::error::Pdf2PptxError;
use crate::pipeline::render::{GraphicFormat, PageGraphic};
use std::ffi::OsString;
use std::fs::{self, File};
use std::path::{Path, PathBuf};
use std::process::{Child, Command, ExitStatus, Stdio};
use std::time::{Duration, Instant};
use tempfile::TempDir;
use tracing::{debug, info, warn};

/// Longest stderr excerpt carried in an error.
const STDERR_TAIL_CHARS: usize = 600;

const POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Turns one PDF page into a vector picture.
pub trait VectorConverter {
    /// Convert the page at 0-based `index`.
    fn convert_page_to_vector(&self, index: usize) -> Result<PageGraphic, Pdf2PptxError>;
}

/// [`VectorConverter`] backed by the Inkscape command line.
#[derive(Debug)]
pub struct InkscapeConverter {
    program: PathBuf,
    pdf_path: PathBuf,
    timeout: Duration,
    version: String,
    workdir: TempDir,
}

impl InkscapeConverter {
    /// Probe `program --version` and prepare a scratch directory.
    ///
    /// Fails with [`Pdf2PptxError::VectorToolMissing`] when no program is
    /// given, it cannot be started, or it does not answer `--version`.
    pub fn new(
        program: Option<&Path>,
        pdf_path: &Path,
        timeout: Duration,
    ) -> Result<Self, Pdf2PptxError> {
        let program = program.ok_or_else(|| Pdf2PptxError::VectorToolMissing {
            path: None,
            reason: "vector mode needs the Inkscape executable path".into(),
        })?;

        let output = Command::new(program)
            .arg("--version")
            .stdin(Stdio::null())
            .output()
            .map_err(|e| Pdf2PptxError::VectorToolMissing {
                path: Some(program.to_path_buf()),
                reason: e.to_string(),
            })?;

        if !output.status.success() {
            return Err(Pdf2PptxError::VectorToolMissing {
                path: Some(program.to_path_buf()),
                reason: format!("`--version` exited with {}", output.status),
            });
        }

        let version = String::from_utf8_lossy(&output.stdout).trim().to_string();
        info!("Inkscape version: {}", version);

        let workdir = TempDir::new()
            .map_err(|e| Pdf2PptxError::Internal(format!("Failed to create temp dir: {e}")))?;

        Ok(Self {
            program: program.to_path_buf(),
            pdf_path: pdf_path.to_path_buf(),
            timeout,
            version,
            workdir,
        })
    }

    /// The first line Inkscape printed for `--version`.
    pub fn version(&self) -> &str {
        self.version.lines().next().unwrap_or_default()
    }
}

impl VectorConverter for InkscapeConverter {
    fn convert_page_to_vector(&self, index: usize) -> Result<PageGraphic, Pdf2PptxError> {
        let page = index + 1;
        let failed = |detail: String| Pdf2PptxError::VectorConversionFailed { page, detail };

        let out_path = self.workdir.path().join(format!("page-{page}.emf"));
        let log_path = self.workdir.path().join(format!("page-{page}.log"));
        let log = File::create(&log_path).map_err(|e| failed(format!("cannot create log file: {e}")))?;

        let mut export_arg = OsString::from("--export-filename=");
        export_arg.push(&out_path);

        let mut child = Command::new(&self.program)
            .arg(format!("--pdf-page={page}"))
            .arg("--export-type=emf")
            .arg(export_arg)
            .arg(&self.pdf_path)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::from(log))
            .spawn()
            .map_err(|e| failed(format!("cannot start '{}': {e}", self.program.display())))?;

        let started = Instant::now();
        let status = match wait_with_timeout(&mut child, self.timeout)
            .map_err(|e| failed(format!("waiting for Inkscape failed: {e}")))?
        {
            Some(status) => status,
            None => {
                warn!("Inkscape exceeded {}s on page {}; killing it", self.timeout.as_secs(), page);
                let _ = child.kill();
                let _ = child.wait();
                return Err(failed(format!("timed out after {}s", self.timeout.as_secs())));
            }
        };

        if !status.success() {
            return Err(failed(format!(
                "Inkscape exited with {}: {}",
                status,
                stderr_tail(&log_path)
            )));
        }

        let data = fs::read(&out_path).map_err(|e| {
            failed(format!(
                "Inkscape produced no output ({e}): {}",
                stderr_tail(&log_path)
            ))
        })?;
        let _ = fs::remove_file(&out_path);

        debug!(
            "Vectorised page {} → {} bytes EMF in {}ms",
            page,
            data.len(),
            started.elapsed().as_millis()
        );

        Ok(PageGraphic {
            data,
            format: GraphicFormat::Emf,
            pixel_size: None,
        })
    }
}

/// Poll `child` until it exits or `timeout` elapses (`Ok(None)`).
fn wait_with_timeout(child: &mut Child, timeout: Duration) -> std::io::Result<Option<ExitStatus>> {
    let deadline = Instant::now() + timeout;
    loop {
        if let Some(status) = child.try_wait()? {
            return Ok(Some(status));
        }
        if Instant::now() >= deadline {
            return Ok(None);
        }
        std::thread::sleep(POLL_INTERVAL);
    }
}

fn stderr_tail(log_path: &Path) -> String {
    let text = fs::read(log_path)
        .map(|b| String::from_utf8_lossy(&b).trim().to_string())
        .unwrap_or_default();
    if text.is_empty() {
        return "(no stderr output)".to_string();
    }
    let count = text.chars().count();
    if count <= STDERR_TAIL_CHARS {
        text
    } else {
        let tail: String = text.chars().skip(count - STDERR_TAIL_CHARS).collect();
        format!("\u{2026}{tail}")
    }
}
