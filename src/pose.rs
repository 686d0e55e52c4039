pub use posematch_protocol::pose::*;

use crate::error::{PmResult, PoseMatchError};

/// The external pose-estimation model.
///
/// `image` is one encoded still image; `flip` asks for the image to be
/// mirrored horizontally before detection. `Ok(None)` means no pose was found.
pub trait PoseDetector: Send + Sync {
    fn detect(&self, image: &[u8], flip: bool) -> PmResult<Option<LandmarkSet>>;
}

/// Detector for clients that run the pose model themselves: the "image"
/// bytes are a JSON [`DetectionPayload`].
#[derive(Debug, Default, Clone, Copy)]
pub struct JsonLandmarkDetector;

impl PoseDetector for JsonLandmarkDetector {
    fn detect(&self, image: &[u8], flip: bool) -> PmResult<Option<LandmarkSet>> {
        let payload: DetectionPayload = serde_json::from_slice(image)
            .map_err(|e| PoseMatchError::Decode(format!("landmark payload: {}", e)))?;

        Ok(payload
            .landmarks
            .filter(|set| !set.is_empty())
            .map(|set| if flip { set.mirrored() } else { set }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_json_detector_handles_missing_pose() {
        let det = JsonLandmarkDetector;
        assert_eq!(det.detect(br#"{"landmarks": null}"#, false).unwrap(), None);
        assert_eq!(det.detect(br#"{"landmarks": []}"#, false).unwrap(), None);
        assert_eq!(det.detect(b"{}", false).unwrap(), None);
    }

    #[test]
    fn test_json_detector_applies_flip() {
        let det = JsonLandmarkDetector;
        let raw = br#"{"landmarks": [{"x": 0.25, "y": 0.5, "visibility": 0.9}]}"#;
        let plain = det.detect(raw, false).unwrap().unwrap();
        let flipped = det.detect(raw, true).unwrap().unwrap();
        assert_eq!(plain.points[0].x, 0.25);
        assert_eq!(flipped.points[0].x, 0.75);
    }

    #[test]
    fn test_json_detector_rejects_garbage() {
        let err = JsonLandmarkDetector.detect(b"\x89PNG", false).unwrap_err();
        assert!(matches!(err, PoseMatchError::Decode(_)));
    }
}
