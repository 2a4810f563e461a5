//! Event intake and batched application of setting changes.
//!
//! Intake runs on the transport thread and only ever appends to the queue;
//! `process_pending` runs on the module's processing thread, drains the
//! queue once, and applies each change in arrival order. Resolution per
//! change: named command first, then camera forwarding for `camera`-prefixed
//! properties, then the generic field setter. A failing change is logged and
//! skipped so the rest of its batch still applies.

use std::sync::{Arc, Mutex, PoisonError};

use tracing::{debug, error, info, trace};

use crate::{
    camera::{CAMERA_PROPERTY_PREFIX, CameraControls, CameraForward, forward_camera_setting},
    command::Command,
    event::{BROADCAST_INDEX, ChangeEvent, PendingChange},
    module::{PipelineStore, VisionModuleHost},
    queue::ChangeQueue,
    settings::lock_shared,
    target::{OffsetPointOperation, next_offset_points},
};

/// Per-module dispatcher for UI-originated setting changes.
pub struct ChangeDispatcher {
    module_index: usize,
    queue: ChangeQueue,
    pipelines: Arc<dyn PipelineStore>,
    module: Arc<dyn VisionModuleHost>,
    camera: Arc<Mutex<dyn CameraControls>>,
}

impl ChangeDispatcher {
    pub fn new(
        module_index: usize,
        pipelines: Arc<dyn PipelineStore>,
        module: Arc<dyn VisionModuleHost>,
        camera: Arc<Mutex<dyn CameraControls>>,
    ) -> Self {
        Self {
            module_index,
            queue: ChangeQueue::new(),
            pipelines,
            module,
            camera,
        }
    }

    pub fn module_index(&self) -> usize {
        self.module_index
    }

    /// Number of changes waiting for the next `process_pending`.
    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    /// Accept or drop one transport event.
    ///
    /// Events for other modules are dropped silently; the broadcast index
    /// is accepted everywhere. Accepted events are bound to the settings
    /// object active right now, not at drain time.
    pub fn on_change_event(&self, event: &ChangeEvent) {
        if event.camera_index != self.module_index as i32 && event.camera_index != BROADCAST_INDEX {
            return;
        }
        trace!(
            module = self.module_index,
            prop = %event.property_name,
            "queueing setting change"
        );
        let settings = self.pipelines.current_settings();
        self.queue.enqueue(PendingChange::new(
            event.property_name.clone(),
            event.data.clone(),
            settings,
            event.origin_context.clone(),
        ));
        metrics::gauge!("vision_settings_queue_depth").set(self.queue.len() as f64);
    }

    /// Drain the queue once and apply every captured change in order.
    ///
    /// Runs to completion: an individual failure is logged and skipped,
    /// never allowed to drop or reorder the changes behind it.
    pub fn process_pending(&self) {
        let batch = self.queue.drain_all();
        if batch.is_empty() {
            return;
        }
        metrics::gauge!("vision_settings_queue_depth").set(0.0);
        debug!(
            module = self.module_index,
            changes = batch.len(),
            "applying setting changes"
        );
        for change in &batch {
            self.apply(change);
        }
        metrics::counter!("vision_settings_changes_total").increment(batch.len() as u64);
    }

    fn apply(&self, change: &PendingChange) {
        match Command::parse(change.prop_name(), change.value()) {
            Some(Ok(command)) => self.run_command(command, change),
            Some(Err(err)) => {
                metrics::counter!("vision_settings_change_errors_total", "kind" => "command")
                    .increment(1);
                error!(prop = change.prop_name(), %err, "dropping malformed command");
            }
            None => match change.prop_name().strip_prefix(CAMERA_PROPERTY_PREFIX) {
                Some(rest) if !rest.is_empty() => self.forward_camera(rest, change),
                _ => self.set_pipeline_field(change),
            },
        }
    }

    fn run_command(&self, command: Command, change: &PendingChange) {
        match command {
            Command::RenamePipeline(nickname) => {
                info!(module = self.module_index, %nickname, "renaming active pipeline");
                lock_shared(&self.pipelines.current_settings()).set_nickname(nickname);
                self.module.save_and_broadcast_all();
            }
            Command::CreatePipeline { nickname, kind } => {
                info!(module = self.module_index, ?kind, %nickname, "adding pipeline");
                let added = self.pipelines.add_pipeline(kind);
                lock_shared(&added).set_nickname(nickname);
                self.module.save_and_broadcast_all();
            }
            Command::DeleteCurrentPipeline => {
                let index = self.pipelines.requested_index();
                info!(module = self.module_index, index, "deleting current pipeline");
                let new_index = self.pipelines.remove_pipeline(index);
                self.pipelines.select_pipeline(new_index);
                self.module.save_and_broadcast_all();
            }
            Command::SelectPipeline(index) => {
                if index == self.pipelines.requested_index() {
                    debug!(index, "pipeline already active, skipping switch");
                    return;
                }
                self.pipelines.select_pipeline(index);
                self.module.save_and_broadcast_all();
            }
            Command::StartCalibration(request) => {
                info!(module = self.module_index, "starting calibration session");
                self.module.start_calibration(request);
                self.module.save_and_broadcast_all();
            }
            Command::SaveInputSnapshot => self.module.save_input_snapshot(),
            Command::SaveOutputSnapshot => self.module.save_output_snapshot(),
            Command::TakeCalibrationSnapshot => self.module.take_calibration_snapshot(),
            Command::DuplicatePipeline(index) => {
                let new_index = self.pipelines.duplicate_pipeline(index);
                info!(module = self.module_index, index, new_index, "duplicated pipeline");
                self.pipelines.select_pipeline(new_index);
                self.module.save_and_broadcast_all();
            }
            Command::InstallCalibration(calibration) => {
                self.module.install_calibration(calibration);
            }
            Command::RobotOffsetPoint(op) => self.update_offset_point(op, change),
            Command::ChangePipelineKind(kind) => {
                let index = self.pipelines.requested_index();
                info!(module = self.module_index, index, ?kind, "changing pipeline type");
                self.pipelines.change_pipeline_kind(index, kind);
                self.module.save_and_broadcast_all();
            }
            Command::SetDriverMode(enabled) => self.module.set_driver_mode(enabled),
        }
    }

    fn update_offset_point(&self, op: OffsetPointOperation, change: &PendingChange) {
        let target = self.module.last_observed_target();
        let mut settings = change.lock_settings();
        match settings.as_advanced_mut() {
            Some(advanced) => {
                let next = next_offset_points(
                    advanced.offset_robot_offset_mode,
                    advanced.offset_points(),
                    op,
                    target.as_ref(),
                );
                advanced.set_offset_points(next);
            }
            None => trace!(?op, "offset point request on non-advanced settings, ignoring"),
        }
    }

    fn forward_camera(&self, name: &str, change: &PendingChange) {
        let mut controls = self.camera.lock().unwrap_or_else(PoisonError::into_inner);
        match forward_camera_setting(&mut *controls, name, change.value()) {
            CameraForward::Applied => {
                trace!(prop = change.prop_name(), value = %change.value(), "forwarded camera setting");
            }
            CameraForward::BadValue => {
                metrics::counter!("vision_settings_change_errors_total", "kind" => "camera")
                    .increment(1);
                error!(
                    prop = change.prop_name(),
                    value = %change.value(),
                    "camera setting value does not convert"
                );
            }
            CameraForward::NoMatch => {
                trace!(prop = change.prop_name(), "no camera control matches, ignoring");
            }
        }
    }

    fn set_pipeline_field(&self, change: &PendingChange) {
        let (result, variant) = {
            let mut settings = change.lock_settings();
            let result = settings.set_field(change.prop_name(), change.value());
            (result, settings.variant_label())
        };
        match result {
            Ok(()) => {
                trace!(prop = change.prop_name(), value = %change.value(), "set pipeline setting");
                self.module.save_and_broadcast_selective(
                    change.origin(),
                    change.prop_name(),
                    change.value(),
                );
            }
            Err(err) => {
                metrics::counter!("vision_settings_change_errors_total", "kind" => "field")
                    .increment(1);
                error!(
                    prop = change.prop_name(),
                    value = %change.value(),
                    target = variant,
                    %err,
                    "could not set pipeline setting"
                );
            }
        }
    }
}
