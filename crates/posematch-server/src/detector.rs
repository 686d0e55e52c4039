use crate::error::{AppError, AppResult};
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use posematch::pose::{JsonLandmarkDetector, PoseDetector};
use posematch::{PmResult, PoseMatchError};
use posematch_protocol::pose::{DetectionPayload, DetectionRequest, LandmarkSet};
use std::io::{BufRead, BufReader, Write};
use std::process::{Child, ChildStdin, ChildStdout, Command, Stdio};
use std::sync::{Arc, Mutex};
use strum_macros::{Display, EnumString};
use tracing::{info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString)]
#[strum(serialize_all = "snake_case")]
pub enum DetectorKind {
    /// Clients send landmark JSON instead of camera images.
    Json,
    /// Images go to an external pose-model process.
    Sidecar,
}

struct SidecarIo {
    child: Child,
    stdin: ChildStdin,
    stdout: BufReader<ChildStdout>,
}

/// Pose model running as a child process. One JSON request per line on
/// stdin, one JSON reply per line on stdout. Calls are serialized.
pub struct SidecarDetector {
    io: Mutex<SidecarIo>,
}

impl SidecarDetector {
    pub fn spawn(command: &[String]) -> AppResult<Self> {
        let (program, args) = command
            .split_first()
            .ok_or_else(|| AppError::Config("--sidecar needs a command".to_string()))?;

        let mut child = Command::new(program)
            .args(args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit())
            .spawn()
            .map_err(|e| AppError::Sidecar(format!("failed to start '{}': {}", program, e)))?;

        let stdin = child
            .stdin
            .take()
            .ok_or_else(|| AppError::Sidecar("sidecar stdin unavailable".to_string()))?;
        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| AppError::Sidecar("sidecar stdout unavailable".to_string()))?;

        info!("🧍 Pose sidecar started: {} (pid {})", program, child.id());
        Ok(Self {
            io: Mutex::new(SidecarIo {
                child,
                stdin,
                stdout: BufReader::new(stdout),
            }),
        })
    }
}

fn detector_err(e: impl std::fmt::Display) -> PoseMatchError {
    PoseMatchError::Detector(e.to_string())
}

impl PoseDetector for SidecarDetector {
    fn detect(&self, image: &[u8], flip: bool) -> PmResult<Option<LandmarkSet>> {
        let mut io = self
            .io
            .lock()
            .map_err(|_| detector_err("sidecar lock poisoned"))?;

        let request = DetectionRequest {
            image: STANDARD.encode(image),
            flip,
        };
        let mut line = serde_json::to_string(&request)?;
        line.push('\n');
        io.stdin.write_all(line.as_bytes()).map_err(detector_err)?;
        io.stdin.flush().map_err(detector_err)?;

        let mut reply = String::new();
        if io.stdout.read_line(&mut reply).map_err(detector_err)? == 0 {
            return Err(detector_err("sidecar closed its output"));
        }

        let payload: DetectionPayload =
            serde_json::from_str(&reply).map_err(|e| detector_err(format!("bad reply: {}", e)))?;
        Ok(payload.landmarks.filter(|set| !set.is_empty()))
    }
}

impl Drop for SidecarDetector {
    fn drop(&mut self) {
        if let Ok(io) = self.io.get_mut() {
            if let Err(e) = io.child.kill() {
                warn!("Failed to stop pose sidecar: {}", e);
            }
            let _ = io.child.wait();
        }
    }
}

pub fn build_detector(kind: DetectorKind, sidecar: &[String]) -> AppResult<Arc<dyn PoseDetector>> {
    match kind {
        DetectorKind::Json => Ok(Arc::new(JsonLandmarkDetector)),
        DetectorKind::Sidecar => Ok(Arc::new(SidecarDetector::spawn(sidecar)?)),
    }
}
