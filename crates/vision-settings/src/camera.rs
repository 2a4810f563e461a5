//! Camera hardware controls addressed by property name.
//!
//! Properties carrying the `camera` prefix bypass the pipeline settings
//! record entirely and land on the hardware controls of the module's video
//! source. The setter vocabulary is declared statically here; the remainder
//! of the property name is matched case-insensitively against it.

use serde_json::Value;

/// Property-name prefix that routes a change to the camera controls.
pub const CAMERA_PROPERTY_PREFIX: &str = "camera";

/// Hardware knobs of one video source.
///
/// Implementations wrap the real camera driver; the dispatcher only ever
/// calls them from the processing thread.
pub trait CameraControls: Send {
    fn set_exposure(&mut self, value: f64);
    fn set_auto_exposure(&mut self, enabled: bool);
    fn set_brightness(&mut self, value: i32);
    fn set_gain(&mut self, value: i32);
    fn set_red_gain(&mut self, value: i32);
    fn set_blue_gain(&mut self, value: i32);
    fn set_white_balance_temp(&mut self, value: f64);
}

/// Outcome of resolving one camera-prefixed property.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CameraForward {
    /// A setter matched and the value was applied.
    Applied,
    /// A setter matched but the value does not convert to its type.
    BadValue,
    /// No setter carries this name.
    NoMatch,
}

/// Forward one camera setting by name (prefix already stripped).
///
/// A name miss is a quiet outcome; a matched name with an unconvertible
/// value is reported separately so callers can surface it as an error.
pub fn forward_camera_setting(
    controls: &mut dyn CameraControls,
    name: &str,
    value: &Value,
) -> CameraForward {
    let as_int = |value: &Value| value.as_i64().and_then(|v| i32::try_from(v).ok());
    let as_flag = |value: &Value| value.as_bool().or_else(|| value.as_i64().map(|v| v != 0));

    match name.to_ascii_lowercase().as_str() {
        "exposure" => match value.as_f64() {
            Some(v) => controls.set_exposure(v),
            None => return CameraForward::BadValue,
        },
        "autoexposure" => match as_flag(value) {
            Some(v) => controls.set_auto_exposure(v),
            None => return CameraForward::BadValue,
        },
        "brightness" => match as_int(value) {
            Some(v) => controls.set_brightness(v),
            None => return CameraForward::BadValue,
        },
        "gain" => match as_int(value) {
            Some(v) => controls.set_gain(v),
            None => return CameraForward::BadValue,
        },
        "redgain" => match as_int(value) {
            Some(v) => controls.set_red_gain(v),
            None => return CameraForward::BadValue,
        },
        "bluegain" => match as_int(value) {
            Some(v) => controls.set_blue_gain(v),
            None => return CameraForward::BadValue,
        },
        "whitebalancetemp" => match value.as_f64() {
            Some(v) => controls.set_white_balance_temp(v),
            None => return CameraForward::BadValue,
        },
        _ => return CameraForward::NoMatch,
    }
    CameraForward::Applied
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[derive(Default)]
    struct RecordingControls {
        exposure: Option<f64>,
        auto_exposure: Option<bool>,
        brightness: Option<i32>,
        gain: Option<i32>,
    }

    impl CameraControls for RecordingControls {
        fn set_exposure(&mut self, value: f64) {
            self.exposure = Some(value);
        }
        fn set_auto_exposure(&mut self, enabled: bool) {
            self.auto_exposure = Some(enabled);
        }
        fn set_brightness(&mut self, value: i32) {
            self.brightness = Some(value);
        }
        fn set_gain(&mut self, value: i32) {
            self.gain = Some(value);
        }
        fn set_red_gain(&mut self, _value: i32) {}
        fn set_blue_gain(&mut self, _value: i32) {}
        fn set_white_balance_temp(&mut self, _value: f64) {}
    }

    #[test]
    fn matches_case_insensitively() {
        let mut controls = RecordingControls::default();
        assert_eq!(
            forward_camera_setting(&mut controls, "Exposure", &json!(12.5)),
            CameraForward::Applied
        );
        assert_eq!(
            forward_camera_setting(&mut controls, "AutoExposure", &json!(1)),
            CameraForward::Applied
        );
        assert_eq!(controls.exposure, Some(12.5));
        assert_eq!(controls.auto_exposure, Some(true));
    }

    #[test]
    fn unknown_setter_is_a_quiet_miss() {
        let mut controls = RecordingControls::default();
        assert_eq!(
            forward_camera_setting(&mut controls, "Contrast", &json!(1)),
            CameraForward::NoMatch
        );
    }

    #[test]
    fn unconvertible_value_is_distinguished_from_a_name_miss() {
        let mut controls = RecordingControls::default();
        assert_eq!(
            forward_camera_setting(&mut controls, "Brightness", &json!("high")),
            CameraForward::BadValue
        );
        assert_eq!(controls.brightness, None);
    }
}
