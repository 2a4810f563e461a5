//! Wire-level change events and their queued form.

use std::{fmt, sync::MutexGuard};

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::settings::{PipelineSettings, SharedSettings, lock_shared};

/// Camera index meaning "every vision module".
pub const BROADCAST_INDEX: i32 = -1;

/// Opaque token identifying a change's requester.
///
/// Carried back on selective broadcasts so the requester is not re-notified
/// of its own change. The default token marks server-local origins.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OriginContext(String);

impl OriginContext {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }
}

impl fmt::Display for OriginContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Property-change request produced by the transport layer.
///
/// Immutable once created; intake filters by `camera_index` and everything
/// else flows through untouched.
#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangeEvent {
    pub camera_index: i32,
    pub property_name: String,
    pub data: Value,
    #[serde(default)]
    pub origin_context: OriginContext,
}

impl ChangeEvent {
    pub fn new(
        camera_index: i32,
        property_name: impl Into<String>,
        data: Value,
        origin_context: OriginContext,
    ) -> Self {
        Self {
            camera_index,
            property_name: property_name.into(),
            data,
            origin_context,
        }
    }
}

/// A change accepted by intake, bound to the settings object that was
/// active at that moment. Owned by the queue until drained.
#[derive(Clone)]
pub struct PendingChange {
    prop_name: String,
    new_value: Value,
    settings: SharedSettings,
    origin: OriginContext,
}

impl PendingChange {
    pub fn new(
        prop_name: String,
        new_value: Value,
        settings: SharedSettings,
        origin: OriginContext,
    ) -> Self {
        Self {
            prop_name,
            new_value,
            settings,
            origin,
        }
    }

    pub fn prop_name(&self) -> &str {
        &self.prop_name
    }

    pub fn value(&self) -> &Value {
        &self.new_value
    }

    pub fn origin(&self) -> &OriginContext {
        &self.origin
    }

    /// Lock the settings object this change was enqueued against.
    pub fn lock_settings(&self) -> MutexGuard<'_, PipelineSettings> {
        lock_shared(&self.settings)
    }
}
