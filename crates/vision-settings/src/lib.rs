//! Settings-change dispatch for per-camera vision modules.
//!
//! A UI or network layer emits loosely-typed property-change events; this
//! crate filters them per module, queues them safely across threads, and
//! applies them onto the active pipeline's configuration. A fixed set of
//! named commands (pipeline lifecycle, calibration, snapshots, offset-point
//! bookkeeping) triggers structural side effects instead of field writes.
//!
//! The crate is split into focused submodules:
//! - `settings`: pipeline configuration variants and field dispatch tables.
//! - `command`: the typed command vocabulary and its payload parsing.
//! - `dispatch`: event intake and in-order batch application.
//! - `queue`: the lock-protected FIFO of pending changes.
//! - `event`: wire-level events and their queued form.
//! - `camera`: name-directed forwarding to camera hardware controls.
//! - `target`: observed targets and the offset-point calculator.
//! - `calibration`: typed calibration payloads.
//! - `module`: trait seams to the pipeline store and owning module.
//! - `worker`: background intake/dispatch threads.

pub mod calibration;
pub mod camera;
pub mod command;
pub mod dispatch;
pub mod error;
pub mod event;
pub mod module;
pub mod queue;
pub mod settings;
pub mod target;
pub mod types;
pub mod worker;

pub use camera::{CAMERA_PROPERTY_PREFIX, CameraControls, CameraForward};
pub use command::Command;
pub use dispatch::ChangeDispatcher;
pub use error::{CommandError, SettingsError};
pub use event::{BROADCAST_INDEX, ChangeEvent, OriginContext, PendingChange};
pub use module::{PipelineStore, VisionModuleHost};
pub use queue::ChangeQueue;
pub use settings::{
    AdvancedPipelineSettings, BasicPipelineSettings, PipelineKind, PipelineSettings,
    SharedSettings, lock_shared,
};
pub use target::{ObservedTarget, OffsetPointOperation, OffsetPoints, RobotOffsetMode};
