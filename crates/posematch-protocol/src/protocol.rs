use crate::feedback::FeedbackLabel;
use serde::{Deserialize, Serialize};

pub const NO_POSE_DETECTED: &str = "No pose detected";

/// Messages a game client sends over its play connection.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientMessage {
    SongSelection {
        song_name: String,
        app_path: String,
    },
    FrameData {
        frame_number: usize,
        image_data: String,
        #[serde(default)]
        flip: bool,
    },
}

/// Replies sent back on the play connection. The shape depends on the
/// session's strategy; clients key on the field name.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(untagged)]
pub enum ServerMessage {
    DtwScore {
        dtw_score: f32,
    },
    Correctness {
        correctness: f32,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        feedback: Option<FeedbackLabel>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        reference_frame: Option<usize>,
    },
    Error {
        error: String,
    },
}

impl ServerMessage {
    pub fn error(msg: impl Into<String>) -> Self {
        ServerMessage::Error { error: msg.into() }
    }

    pub fn no_pose() -> Self {
        ServerMessage::error(NO_POSE_DETECTED)
    }
}

#[derive(Serialize, Deserialize, Debug)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub strategy: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_messages_are_tagged_by_type() {
        let raw = r#"{"type": "song_selection", "song_name": "HurryUp", "app_path": "/game"}"#;
        let msg: ClientMessage = serde_json::from_str(raw).unwrap();
        assert_eq!(
            msg,
            ClientMessage::SongSelection {
                song_name: "HurryUp".to_string(),
                app_path: "/game".to_string()
            }
        );

        let raw = r#"{"type": "frame_data", "frame_number": 12, "image_data": "AAAA", "flip": true}"#;
        let msg: ClientMessage = serde_json::from_str(raw).unwrap();
        assert!(matches!(
            msg,
            ClientMessage::FrameData {
                frame_number: 12,
                flip: true,
                ..
            }
        ));
    }

    #[test]
    fn test_server_messages_serialize_flat() {
        let json = serde_json::to_value(ServerMessage::DtwScore { dtw_score: 0.5 }).unwrap();
        assert_eq!(json, serde_json::json!({ "dtw_score": 0.5 }));

        let json = serde_json::to_value(ServerMessage::Correctness {
            correctness: 0.0,
            feedback: None,
            reference_frame: None,
        })
        .unwrap();
        assert_eq!(json, serde_json::json!({ "correctness": 0.0 }));

        let json = serde_json::to_value(ServerMessage::no_pose()).unwrap();
        assert_eq!(json, serde_json::json!({ "error": "No pose detected" }));
    }
}
