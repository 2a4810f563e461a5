//! Seams to the pipeline manager and the owning vision module.
//!
//! The dispatcher never owns pipelines, persistence, or calibration; it
//! drives them through these traits. Implementations are shared across
//! threads and handle their own interior locking.

use serde_json::Value;

use crate::{
    calibration::{CalibrationRequest, CameraCalibration},
    event::OriginContext,
    settings::{PipelineKind, SharedSettings},
    target::ObservedTarget,
};

/// Owns the ordered set of pipelines and which one is active.
///
/// Index renumbering after removal is this collaborator's responsibility;
/// `remove_pipeline` returns the index that should become active.
pub trait PipelineStore: Send + Sync {
    /// Settings of the currently active pipeline.
    fn current_settings(&self) -> SharedSettings;

    /// Index of the pipeline the module is running (or switching to).
    fn requested_index(&self) -> usize;

    /// Append a new pipeline of the given kind and return its settings.
    fn add_pipeline(&self, kind: PipelineKind) -> SharedSettings;

    /// Remove the pipeline at `index`; returns the new active index.
    fn remove_pipeline(&self, index: usize) -> usize;

    /// Switch the active pipeline.
    fn select_pipeline(&self, index: usize);

    /// Copy the pipeline at `index`; returns the copy's index.
    fn duplicate_pipeline(&self, index: usize) -> usize;

    /// Rebind the pipeline at `index` to a different algorithm.
    fn change_pipeline_kind(&self, index: usize, kind: PipelineKind);
}

/// The vision module that owns this dispatcher: persistence, broadcast,
/// calibration lifecycle, snapshots, and the latest detection result.
pub trait VisionModuleHost: Send + Sync {
    /// Persist and notify every client of the full module state.
    fn save_and_broadcast_all(&self);

    /// Persist and notify clients of one field change, excluding the
    /// originating context so the requester is not echoed its own change.
    fn save_and_broadcast_selective(&self, origin: &OriginContext, prop: &str, value: &Value);

    fn start_calibration(&self, request: CalibrationRequest);

    fn save_input_snapshot(&self);

    fn save_output_snapshot(&self);

    fn take_calibration_snapshot(&self);

    /// Install uploaded calibration coefficients into the camera config.
    fn install_calibration(&self, calibration: CameraCalibration);

    fn set_driver_mode(&self, enabled: bool);

    /// Best target from the most recent processed frame, if any.
    fn last_observed_target(&self) -> Option<ObservedTarget>;
}
