//! Calibration payloads exchanged with the UI.
//!
//! Both records arrive as untyped JSON on the change channel and are
//! deserialized here before any collaborator sees them. Deserialization
//! failures are non-fatal to the batch that carried them.

use serde::{Deserialize, Serialize};

/// Calibration pattern printed on the physical board.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum CalibrationBoard {
    Chessboard,
    Charuco,
}

/// Request to begin a calibration session, as submitted by the UI.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalibrationRequest {
    pub video_mode_index: usize,
    pub square_size_in: f64,
    pub marker_size_in: f64,
    pub pattern_width: u32,
    pub pattern_height: u32,
    pub board_type: CalibrationBoard,
    #[serde(default)]
    pub use_mr_cal: bool,
}

/// Capture resolution a calibration applies to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resolution {
    pub width: u32,
    pub height: u32,
}

/// Uploaded calibration coefficients, installed into the camera
/// configuration when they deserialize cleanly.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CameraCalibration {
    pub resolution: Resolution,
    pub camera_intrinsics: Vec<f64>,
    pub dist_coefficients: Vec<f64>,
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn calibration_request_parses_wire_form() {
        let request: CalibrationRequest = serde_json::from_value(json!({
            "videoModeIndex": 2,
            "squareSizeIn": 1.0,
            "markerSizeIn": 0.75,
            "patternWidth": 8,
            "patternHeight": 8,
            "boardType": "charuco"
        }))
        .unwrap();
        assert_eq!(request.video_mode_index, 2);
        assert_eq!(request.board_type, CalibrationBoard::Charuco);
        assert!(!request.use_mr_cal);
    }

    #[test]
    fn calibration_request_rejects_missing_fields() {
        let result: Result<CalibrationRequest, _> =
            serde_json::from_value(json!({"videoModeIndex": 2}));
        assert!(result.is_err());
    }
}
