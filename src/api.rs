//! Message boundary between a play connection and its session.

use crate::error::{PmResult, PoseMatchError};
use crate::pose::PoseDetector;
use crate::protocol::{ClientMessage, ServerMessage};
use crate::reference::resolve_reference_path;
use crate::session::Session;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use tracing::{debug, warn};

impl Session {
    /// Dispatches one decoded client message. `Ok(None)` means no reply.
    pub fn handle_message(&mut self, msg: ClientMessage, detector: &dyn PoseDetector) -> PmResult<Option<ServerMessage>> {
        match msg {
            ClientMessage::SongSelection { song_name, app_path } => {
                let path = resolve_reference_path(&app_path, &song_name)?;
                self.select_reference(&song_name, &path)?;
                Ok(None)
            }
            ClientMessage::FrameData {
                frame_number,
                image_data,
                flip,
            } => {
                if self.reference().is_none() {
                    return Err(PoseMatchError::NoReferenceSelected);
                }

                let image = STANDARD
                    .decode(image_data.trim())
                    .map_err(|e| PoseMatchError::Decode(format!("image_data: {}", e)))?;
                let landmarks = detector.detect(&image, flip)?;
                if landmarks.is_none() {
                    debug!("Frame {}: no pose detected", frame_number);
                }

                let report = self.frame(landmarks.as_ref(), frame_number)?;
                Ok(report.to_message())
            }
        }
    }

    /// Parses and handles one text frame. Every failure becomes an
    /// `{"error": ...}` reply; the session stays usable.
    pub fn handle_text(&mut self, text: &str, detector: &dyn PoseDetector) -> Option<ServerMessage> {
        let result = serde_json::from_str::<ClientMessage>(text)
            .map_err(PoseMatchError::from)
            .and_then(|msg| self.handle_message(msg, detector));

        match result {
            Ok(reply) => reply,
            Err(e) => {
                warn!("Message failed: {}", e);
                Some(ServerMessage::error(e.to_string()))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ScoringParams;
    use crate::pose::JsonLandmarkDetector;

    #[test]
    fn test_bad_json_is_an_error_reply() {
        let mut s = Session::new(ScoringParams::default()).unwrap();
        let reply = s.handle_text("not json", &JsonLandmarkDetector);
        assert!(matches!(reply, Some(ServerMessage::Error { .. })));
    }

    #[test]
    fn test_frame_before_song_is_rejected() {
        let mut s = Session::new(ScoringParams::default()).unwrap();
        let raw = r#"{"type": "frame_data", "frame_number": 0, "image_data": "!!!", "flip": false}"#;
        let reply = s.handle_text(raw, &JsonLandmarkDetector);
        assert_eq!(reply, Some(ServerMessage::error("No reference selected")));
    }

    #[test]
    fn test_missing_pose_file_keeps_session_idle() {
        let mut s = Session::new(ScoringParams::default()).unwrap();
        let raw = r#"{"type": "song_selection", "song_name": "Nope", "app_path": "/does/not/exist"}"#;
        let reply = s.handle_text(raw, &JsonLandmarkDetector);
        match reply {
            Some(ServerMessage::Error { error }) => assert!(error.starts_with("Malformed reference")),
            other => panic!("unexpected reply {:?}", other),
        }
        assert!(s.reference().is_none());
    }

    #[test]
    fn test_song_name_outside_pose_dir_is_malformed_reference() {
        let mut s = Session::new(ScoringParams::default()).unwrap();
        let raw = r#"{"type": "song_selection", "song_name": "../../etc/passwd", "app_path": "/game"}"#;
        let reply = s.handle_text(raw, &JsonLandmarkDetector);
        assert_eq!(
            reply,
            Some(ServerMessage::error("Malformed reference: invalid song name '../../etc/passwd'"))
        );
        assert!(s.reference().is_none());
    }
}
