//! Typed form of the fixed command vocabulary.
//!
//! A handful of property names are commands with structural side effects
//! rather than field writes. Each incoming change is resolved against this
//! vocabulary first; `parse` returning `None` means the property falls
//! through to camera forwarding or the generic setter.

use serde_json::Value;

use crate::{
    calibration::{CalibrationRequest, CameraCalibration},
    error::CommandError,
    settings::PipelineKind,
    target::OffsetPointOperation,
    types::OrdinalEnum,
};

/// Structural operation requested by name.
#[derive(Clone, Debug)]
pub enum Command {
    /// Rename the active pipeline's display name.
    RenamePipeline(String),
    /// Create a pipeline of the given kind under the given name.
    CreatePipeline {
        nickname: String,
        kind: PipelineKind,
    },
    /// Delete the currently-selected pipeline.
    DeleteCurrentPipeline,
    /// Switch the active pipeline.
    SelectPipeline(usize),
    /// Begin a calibration session.
    StartCalibration(CalibrationRequest),
    SaveInputSnapshot,
    SaveOutputSnapshot,
    TakeCalibrationSnapshot,
    /// Copy the pipeline at the given index and switch to the copy.
    DuplicatePipeline(usize),
    /// Install uploaded calibration coefficients.
    InstallCalibration(CameraCalibration),
    /// Update robot offset-point bookkeeping on advanced settings.
    RobotOffsetPoint(OffsetPointOperation),
    /// Rebind the selected pipeline to a different algorithm.
    ChangePipelineKind(PipelineKind),
    SetDriverMode(bool),
}

impl Command {
    /// Resolve `prop` against the command vocabulary.
    ///
    /// Returns `None` for non-command properties. `Some(Err(..))` means the
    /// name matched but its payload did not; the change is dropped with a
    /// log entry, never the whole batch.
    pub fn parse(prop: &str, value: &Value) -> Option<Result<Command, CommandError>> {
        let parsed = match prop {
            "pipelineName" => expect_string("pipelineName", value).map(Command::RenamePipeline),
            "newPipelineInfo" => parse_new_pipeline(value),
            "deleteCurrPipeline" => Ok(Command::DeleteCurrentPipeline),
            "changePipeline" => expect_index("changePipeline", value).map(Command::SelectPipeline),
            "startCalibration" => serde_json::from_value(value.clone())
                .map(Command::StartCalibration)
                .map_err(|source| CommandError::Deserialize {
                    prop: "startCalibration",
                    source,
                }),
            "saveInputSnapshot" => Ok(Command::SaveInputSnapshot),
            "saveOutputSnapshot" => Ok(Command::SaveOutputSnapshot),
            "takeCalSnapshot" => Ok(Command::TakeCalibrationSnapshot),
            "duplicatePipeline" => {
                expect_index("duplicatePipeline", value).map(Command::DuplicatePipeline)
            }
            "calibrationUploaded" => serde_json::from_value(value.clone())
                .map(Command::InstallCalibration)
                .map_err(|source| CommandError::Deserialize {
                    prop: "calibrationUploaded",
                    source,
                }),
            "robotOffsetPoint" => {
                expect_ordinal::<OffsetPointOperation>("robotOffsetPoint", value)
                    .map(Command::RobotOffsetPoint)
            }
            "changePipelineType" => expect_ordinal::<PipelineKind>("changePipelineType", value)
                .map(Command::ChangePipelineKind),
            "isDriverMode" => expect_bool("isDriverMode", value).map(Command::SetDriverMode),
            _ => return None,
        };
        Some(parsed)
    }
}

fn malformed(prop: &'static str, reason: impl Into<String>) -> CommandError {
    CommandError::Malformed {
        prop,
        reason: reason.into(),
    }
}

fn expect_string(prop: &'static str, value: &Value) -> Result<String, CommandError> {
    value
        .as_str()
        .map(str::to_owned)
        .ok_or_else(|| malformed(prop, format!("expected a string, got {value}")))
}

fn expect_index(prop: &'static str, value: &Value) -> Result<usize, CommandError> {
    value
        .as_u64()
        .map(|v| v as usize)
        .ok_or_else(|| malformed(prop, format!("expected a pipeline index, got {value}")))
}

fn expect_bool(prop: &'static str, value: &Value) -> Result<bool, CommandError> {
    value
        .as_bool()
        .or_else(|| value.as_i64().map(|v| v != 0))
        .ok_or_else(|| malformed(prop, format!("expected a boolean, got {value}")))
}

fn expect_ordinal<T: OrdinalEnum>(prop: &'static str, value: &Value) -> Result<T, CommandError> {
    value
        .as_u64()
        .and_then(|ordinal| T::from_ordinal(ordinal as usize))
        .ok_or_else(|| malformed(prop, format!("expected a known ordinal, got {value}")))
}

/// Wire form: a `[nickname, kind-ordinal]` pair.
fn parse_new_pipeline(value: &Value) -> Result<Command, CommandError> {
    let pair = value
        .as_array()
        .filter(|elements| elements.len() == 2)
        .ok_or_else(|| malformed("newPipelineInfo", "expected a [name, type] pair"))?;
    let nickname = pair[0]
        .as_str()
        .ok_or_else(|| malformed("newPipelineInfo", "pipeline name must be a string"))?
        .to_string();
    let kind = pair[1]
        .as_u64()
        .and_then(|ordinal| PipelineKind::from_ordinal(ordinal as usize))
        .ok_or_else(|| malformed("newPipelineInfo", "unknown pipeline type ordinal"))?;
    Ok(Command::CreatePipeline { nickname, kind })
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn non_command_property_is_none() {
        assert!(Command::parse("hsvHue", &json!([0, 100])).is_none());
        assert!(Command::parse("cameraExposure", &json!(10.0)).is_none());
    }

    #[test]
    fn rename_requires_a_string() {
        match Command::parse("pipelineName", &json!("Far Goal")) {
            Some(Ok(Command::RenamePipeline(name))) => assert_eq!(name, "Far Goal"),
            other => panic!("unexpected parse: {other:?}"),
        }
        assert!(matches!(
            Command::parse("pipelineName", &json!(3)),
            Some(Err(CommandError::Malformed { .. }))
        ));
    }

    #[test]
    fn new_pipeline_parses_name_and_kind() {
        match Command::parse("newPipelineInfo", &json!(["Loading Zone", 2])) {
            Some(Ok(Command::CreatePipeline { nickname, kind })) => {
                assert_eq!(nickname, "Loading Zone");
                assert_eq!(kind, PipelineKind::AprilTag);
            }
            other => panic!("unexpected parse: {other:?}"),
        }
    }

    #[test]
    fn new_pipeline_rejects_bad_pair() {
        assert!(matches!(
            Command::parse("newPipelineInfo", &json!(["only-name"])),
            Some(Err(CommandError::Malformed { .. }))
        ));
        assert!(matches!(
            Command::parse("newPipelineInfo", &json!(["name", 99])),
            Some(Err(CommandError::Malformed { .. }))
        ));
    }

    #[test]
    fn start_calibration_surfaces_deserialize_errors() {
        assert!(matches!(
            Command::parse("startCalibration", &json!({"videoModeIndex": 1})),
            Some(Err(CommandError::Deserialize { .. }))
        ));
    }

    #[test]
    fn offset_point_operation_from_ordinal() {
        match Command::parse("robotOffsetPoint", &json!(1)) {
            Some(Ok(Command::RobotOffsetPoint(op))) => {
                assert_eq!(op, OffsetPointOperation::TakeSingle);
            }
            other => panic!("unexpected parse: {other:?}"),
        }
        assert!(matches!(
            Command::parse("robotOffsetPoint", &json!(9)),
            Some(Err(CommandError::Malformed { .. }))
        ));
    }

    #[test]
    fn driver_mode_accepts_bool_or_int() {
        assert!(matches!(
            Command::parse("isDriverMode", &json!(true)),
            Some(Ok(Command::SetDriverMode(true)))
        ));
        assert!(matches!(
            Command::parse("isDriverMode", &json!(0)),
            Some(Ok(Command::SetDriverMode(false)))
        ));
    }
}
