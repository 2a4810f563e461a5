//! Per-pipeline configuration records and their field dispatch tables.
//!
//! The UI addresses fields by camelCase wire name and sends untyped JSON
//! values. `set_field` resolves the name against a statically-declared table
//! per settings variant and performs the type-directed conversion for the
//! declared field type. Unknown names and unconvertible values surface as
//! [`SettingsError`] results so a bad write never takes down a batch.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{
    error::SettingsError,
    target::{OffsetPoints, RobotOffsetMode},
    types::{DoubleCouple, IntCouple, OrdinalEnum, Point, ordinal_enum},
};

/// Settings handle shared between the dispatcher and the frame-processing
/// side of a module. Field writes are visible atomically per field; a whole
/// command is not atomic with respect to readers.
pub type SharedSettings = Arc<Mutex<PipelineSettings>>;

/// Lock a shared settings handle, riding through poisoning. A panicking
/// writer leaves the record itself coherent, so keep serving it.
pub fn lock_shared(settings: &SharedSettings) -> MutexGuard<'_, PipelineSettings> {
    settings.lock().unwrap_or_else(PoisonError::into_inner)
}

ordinal_enum! {
    /// Vision algorithm backing a pipeline; ordinal order is the wire order.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
    pub enum PipelineKind {
        #[default]
        Reflective,
        ColoredShape,
        AprilTag,
        Aruco,
        ObjectDetection,
    }
}

ordinal_enum! {
    /// Rotation applied to input frames before processing.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
    pub enum ImageRotation {
        #[default]
        Deg0,
        Deg90,
        Deg180,
        Deg270,
    }
}

ordinal_enum! {
    /// Downscaling applied to the streamed preview.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
    pub enum FrameDivisor {
        #[default]
        Full,
        Half,
        Quarter,
        Sixth,
    }
}

ordinal_enum! {
    /// Which contour wins when several candidates pass filtering.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
    pub enum ContourSortMode {
        #[default]
        Largest,
        Smallest,
        Highest,
        Lowest,
        Rightmost,
        Leftmost,
        Centermost,
    }
}

ordinal_enum! {
    /// Edge or center of the bounding shape used as the target point.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
    pub enum TargetOffsetPoint {
        #[default]
        Center,
        Top,
        Bottom,
        Left,
        Right,
    }
}

ordinal_enum! {
    /// Expected orientation of the physical target.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
    pub enum TargetOrientation {
        Portrait,
        #[default]
        Landscape,
    }
}

/// Fields every pipeline carries regardless of algorithm.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BasicPipelineSettings {
    pub pipeline_nickname: String,
    pub pipeline_index: i32,
    pub pipeline_kind: PipelineKind,
    pub input_should_show: bool,
    pub output_should_show: bool,
    pub led_mode: bool,
    pub input_image_rotation_mode: ImageRotation,
    pub streaming_frame_divisor: FrameDivisor,
}

impl Default for BasicPipelineSettings {
    fn default() -> Self {
        Self {
            pipeline_nickname: "New Pipeline".to_string(),
            pipeline_index: 0,
            pipeline_kind: PipelineKind::default(),
            input_should_show: false,
            output_should_show: true,
            led_mode: true,
            input_image_rotation_mode: ImageRotation::default(),
            streaming_frame_divisor: FrameDivisor::default(),
        }
    }
}

impl BasicPipelineSettings {
    /// Apply one field write addressed by wire name.
    ///
    /// `pipelineIndex` and `pipelineKind` are managed structurally by the
    /// pipeline store and are deliberately absent from the table.
    pub fn set_field(&mut self, field: &str, value: &Value) -> Result<(), SettingsError> {
        match field {
            "pipelineNickname" => self.pipeline_nickname = as_string(field, value)?,
            "inputShouldShow" => self.input_should_show = as_bool(field, value)?,
            "outputShouldShow" => self.output_should_show = as_bool(field, value)?,
            "ledMode" => self.led_mode = as_bool(field, value)?,
            "inputImageRotationMode" => {
                self.input_image_rotation_mode = as_ordinal(field, value)?;
            }
            "streamingFrameDivisor" => self.streaming_frame_divisor = as_ordinal(field, value)?,
            _ => {
                return Err(SettingsError::FieldNotFound {
                    field: field.to_string(),
                });
            }
        }
        Ok(())
    }
}

/// Settings for contour-based pipelines: thresholding, contour filtering,
/// and robot offset-point bookkeeping on top of the basic fields.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdvancedPipelineSettings {
    #[serde(flatten)]
    pub base: BasicPipelineSettings,
    pub hsv_hue: IntCouple,
    pub hsv_saturation: IntCouple,
    pub hsv_value: IntCouple,
    pub hue_inverted: bool,
    pub output_should_draw: bool,
    pub contour_area: DoubleCouple,
    pub contour_ratio: DoubleCouple,
    pub contour_fullness: DoubleCouple,
    pub contour_speckle_percentage: f64,
    pub contour_sort_mode: ContourSortMode,
    pub contour_target_offset_point: TargetOffsetPoint,
    pub contour_target_orientation: TargetOrientation,
    pub corner_detection_exact_side_count: i32,
    pub corner_detection_accuracy_percentage: f64,
    pub offset_robot_offset_mode: RobotOffsetMode,
    pub offset_single_point: Point,
    pub offset_dual_point_a: Point,
    pub offset_dual_point_a_area: f64,
    pub offset_dual_point_b: Point,
    pub offset_dual_point_b_area: f64,
}

impl Default for AdvancedPipelineSettings {
    fn default() -> Self {
        Self {
            base: BasicPipelineSettings::default(),
            hsv_hue: IntCouple::new(50, 180),
            hsv_saturation: IntCouple::new(50, 255),
            hsv_value: IntCouple::new(50, 255),
            hue_inverted: false,
            output_should_draw: true,
            contour_area: DoubleCouple::new(0.0, 100.0),
            contour_ratio: DoubleCouple::new(0.0, 20.0),
            contour_fullness: DoubleCouple::new(0.0, 100.0),
            contour_speckle_percentage: 5.0,
            contour_sort_mode: ContourSortMode::default(),
            contour_target_offset_point: TargetOffsetPoint::default(),
            contour_target_orientation: TargetOrientation::default(),
            corner_detection_exact_side_count: 4,
            corner_detection_accuracy_percentage: 10.0,
            offset_robot_offset_mode: RobotOffsetMode::default(),
            offset_single_point: Point::ZERO,
            offset_dual_point_a: Point::ZERO,
            offset_dual_point_a_area: 0.0,
            offset_dual_point_b: Point::ZERO,
            offset_dual_point_b_area: 0.0,
        }
    }
}

impl AdvancedPipelineSettings {
    /// Apply one field write addressed by wire name, falling back to the
    /// embedded basic fields for names not declared here.
    pub fn set_field(&mut self, field: &str, value: &Value) -> Result<(), SettingsError> {
        match field {
            "hsvHue" => self.hsv_hue = as_int_couple(field, value)?,
            "hsvSaturation" => self.hsv_saturation = as_int_couple(field, value)?,
            "hsvValue" => self.hsv_value = as_int_couple(field, value)?,
            "hueInverted" => self.hue_inverted = as_bool(field, value)?,
            "outputShouldDraw" => self.output_should_draw = as_bool(field, value)?,
            "contourArea" => self.contour_area = as_double_couple(field, value)?,
            "contourRatio" => self.contour_ratio = as_double_couple(field, value)?,
            "contourFullness" => self.contour_fullness = as_double_couple(field, value)?,
            "contourSpecklePercentage" => {
                self.contour_speckle_percentage = as_f64(field, value)?;
            }
            "contourSortMode" => self.contour_sort_mode = as_ordinal(field, value)?,
            "contourTargetOffsetPoint" => {
                self.contour_target_offset_point = as_ordinal(field, value)?;
            }
            "contourTargetOrientation" => {
                self.contour_target_orientation = as_ordinal(field, value)?;
            }
            "cornerDetectionExactSideCount" => {
                self.corner_detection_exact_side_count = as_int(field, value)?;
            }
            "cornerDetectionAccuracyPercentage" => {
                self.corner_detection_accuracy_percentage = as_f64(field, value)?;
            }
            "offsetRobotOffsetMode" => self.offset_robot_offset_mode = as_ordinal(field, value)?,
            "offsetSinglePoint" => self.offset_single_point = as_point(field, value)?,
            "offsetDualPointA" => self.offset_dual_point_a = as_point(field, value)?,
            "offsetDualPointAArea" => self.offset_dual_point_a_area = as_f64(field, value)?,
            "offsetDualPointB" => self.offset_dual_point_b = as_point(field, value)?,
            "offsetDualPointBArea" => self.offset_dual_point_b_area = as_f64(field, value)?,
            _ => return self.base.set_field(field, value),
        }
        Ok(())
    }

    /// Snapshot the stored offset reference points.
    pub fn offset_points(&self) -> OffsetPoints {
        OffsetPoints {
            single: self.offset_single_point,
            dual_a: self.offset_dual_point_a,
            dual_a_area: self.offset_dual_point_a_area,
            dual_b: self.offset_dual_point_b,
            dual_b_area: self.offset_dual_point_b_area,
        }
    }

    /// Write back a full set of offset reference points.
    pub fn set_offset_points(&mut self, points: OffsetPoints) {
        self.offset_single_point = points.single;
        self.offset_dual_point_a = points.dual_a;
        self.offset_dual_point_a_area = points.dual_a_area;
        self.offset_dual_point_b = points.dual_b;
        self.offset_dual_point_b_area = points.dual_b_area;
    }
}

/// Polymorphic settings record bound to one pipeline.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(tag = "settingsVariant", rename_all = "camelCase")]
pub enum PipelineSettings {
    Basic(BasicPipelineSettings),
    Advanced(AdvancedPipelineSettings),
}

impl PipelineSettings {
    pub fn into_shared(self) -> SharedSettings {
        Arc::new(Mutex::new(self))
    }

    pub fn base(&self) -> &BasicPipelineSettings {
        match self {
            PipelineSettings::Basic(settings) => settings,
            PipelineSettings::Advanced(settings) => &settings.base,
        }
    }

    pub fn base_mut(&mut self) -> &mut BasicPipelineSettings {
        match self {
            PipelineSettings::Basic(settings) => settings,
            PipelineSettings::Advanced(settings) => &mut settings.base,
        }
    }

    pub fn nickname(&self) -> &str {
        &self.base().pipeline_nickname
    }

    pub fn set_nickname(&mut self, nickname: String) {
        self.base_mut().pipeline_nickname = nickname;
    }

    pub fn as_advanced_mut(&mut self) -> Option<&mut AdvancedPipelineSettings> {
        match self {
            PipelineSettings::Advanced(settings) => Some(settings),
            PipelineSettings::Basic(_) => None,
        }
    }

    /// Short label for log context.
    pub fn variant_label(&self) -> &'static str {
        match self {
            PipelineSettings::Basic(_) => "basic",
            PipelineSettings::Advanced(_) => "advanced",
        }
    }

    /// Apply one field write through the active variant's dispatch table.
    pub fn set_field(&mut self, field: &str, value: &Value) -> Result<(), SettingsError> {
        match self {
            PipelineSettings::Basic(settings) => settings.set_field(field, value),
            PipelineSettings::Advanced(settings) => settings.set_field(field, value),
        }
    }
}

fn mismatch(field: &str, expected: &'static str, value: &Value) -> SettingsError {
    SettingsError::TypeMismatch {
        field: field.to_string(),
        expected,
        value: value.clone(),
    }
}

fn as_f64(field: &str, value: &Value) -> Result<f64, SettingsError> {
    value
        .as_f64()
        .ok_or_else(|| mismatch(field, "a number", value))
}

fn as_int(field: &str, value: &Value) -> Result<i32, SettingsError> {
    // integer fields take integers only, never truncated floats
    value
        .as_i64()
        .and_then(|v| i32::try_from(v).ok())
        .ok_or_else(|| mismatch(field, "an integer", value))
}

fn as_bool(field: &str, value: &Value) -> Result<bool, SettingsError> {
    value
        .as_bool()
        .or_else(|| value.as_i64().map(|v| v != 0))
        .ok_or_else(|| mismatch(field, "a boolean", value))
}

fn as_string(field: &str, value: &Value) -> Result<String, SettingsError> {
    value
        .as_str()
        .map(str::to_owned)
        .ok_or_else(|| mismatch(field, "a string", value))
}

fn as_ordinal<T: OrdinalEnum>(field: &str, value: &Value) -> Result<T, SettingsError> {
    value
        .as_u64()
        .and_then(|ordinal| T::from_ordinal(ordinal as usize))
        .ok_or_else(|| mismatch(field, "an enum ordinal", value))
}

fn couple_elements(field: &str, value: &Value) -> Result<(f64, f64), SettingsError> {
    let pair = value
        .as_array()
        .filter(|elements| elements.len() == 2)
        .ok_or_else(|| mismatch(field, "a two-element number pair", value))?;
    match (pair[0].as_f64(), pair[1].as_f64()) {
        (Some(first), Some(second)) => Ok((first, second)),
        _ => Err(mismatch(field, "a two-element number pair", value)),
    }
}

fn as_double_couple(field: &str, value: &Value) -> Result<DoubleCouple, SettingsError> {
    let (first, second) = couple_elements(field, value)?;
    Ok(DoubleCouple::new(first, second))
}

fn as_int_couple(field: &str, value: &Value) -> Result<IntCouple, SettingsError> {
    // elements arrive as JSON numbers; truncate toward zero
    let (first, second) = couple_elements(field, value)?;
    Ok(IntCouple::new(first as i32, second as i32))
}

fn as_point(field: &str, value: &Value) -> Result<Point, SettingsError> {
    serde_json::from_value(value.clone()).map_err(|_| mismatch(field, "a point", value))
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::error::SettingsError;

    #[test]
    fn enum_field_resolves_ordinal_in_declared_order() {
        let mut settings = AdvancedPipelineSettings::default();
        settings.set_field("contourSortMode", &json!(2)).unwrap();
        assert_eq!(settings.contour_sort_mode, ContourSortMode::Highest);
    }

    #[test]
    fn enum_field_rejects_out_of_range_ordinal() {
        let mut settings = AdvancedPipelineSettings::default();
        let err = settings.set_field("contourSortMode", &json!(99)).unwrap_err();
        assert!(matches!(err, SettingsError::TypeMismatch { .. }));
    }

    #[test]
    fn double_couple_from_pair() {
        let mut settings = AdvancedPipelineSettings::default();
        settings.set_field("contourArea", &json!([1.0, 2.0])).unwrap();
        assert_eq!(settings.contour_area, DoubleCouple::new(1.0, 2.0));
    }

    #[test]
    fn int_couple_truncates_elements() {
        let mut settings = AdvancedPipelineSettings::default();
        settings.set_field("hsvHue", &json!([10.9, 200.2])).unwrap();
        assert_eq!(settings.hsv_hue, IntCouple::new(10, 200));
    }

    #[test]
    fn int_field_rejects_float_values() {
        let mut settings = AdvancedPipelineSettings::default();
        let err = settings
            .set_field("cornerDetectionExactSideCount", &json!(4.5))
            .unwrap_err();
        assert!(matches!(err, SettingsError::TypeMismatch { .. }));
        settings
            .set_field("cornerDetectionExactSideCount", &json!(6))
            .unwrap();
        assert_eq!(settings.corner_detection_exact_side_count, 6);
    }

    #[test]
    fn bool_field_accepts_nonzero_int() {
        let mut settings = BasicPipelineSettings::default();
        settings.set_field("ledMode", &json!(0)).unwrap();
        assert!(!settings.led_mode);
        settings.set_field("ledMode", &json!(3)).unwrap();
        assert!(settings.led_mode);
        settings.set_field("ledMode", &json!(false)).unwrap();
        assert!(!settings.led_mode);
    }

    #[test]
    fn string_field_requires_a_string() {
        let mut settings = BasicPipelineSettings::default();
        let err = settings.set_field("pipelineNickname", &json!(5)).unwrap_err();
        assert!(matches!(err, SettingsError::TypeMismatch { .. }));
        assert_eq!(settings.pipeline_nickname, "New Pipeline");
    }

    #[test]
    fn unknown_field_is_reported_not_panicked() {
        let mut settings = PipelineSettings::Advanced(AdvancedPipelineSettings::default());
        let err = settings.set_field("noSuchKnob", &json!(1)).unwrap_err();
        assert!(matches!(
            err,
            SettingsError::FieldNotFound { field } if field == "noSuchKnob"
        ));
    }

    #[test]
    fn advanced_falls_back_to_basic_fields() {
        let mut settings = PipelineSettings::Advanced(AdvancedPipelineSettings::default());
        settings
            .set_field("pipelineNickname", &json!("Near Goal"))
            .unwrap();
        assert_eq!(settings.nickname(), "Near Goal");
    }

    #[test]
    fn point_field_assigns_exact_shape() {
        let mut settings = AdvancedPipelineSettings::default();
        settings
            .set_field("offsetSinglePoint", &json!({"x": 3.0, "y": 4.0}))
            .unwrap();
        assert_eq!(settings.offset_single_point, Point::new(3.0, 4.0));
    }

    #[test]
    fn offset_points_round_trip_through_helpers() {
        let mut settings = AdvancedPipelineSettings::default();
        let mut points = settings.offset_points();
        points.single = Point::new(8.0, 9.0);
        points.dual_a_area = 2.5;
        settings.set_offset_points(points);
        assert_eq!(settings.offset_single_point, Point::new(8.0, 9.0));
        assert_eq!(settings.offset_dual_point_a_area, 2.5);
    }
}
