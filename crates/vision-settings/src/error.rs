use serde_json::Value;
use thiserror::Error;

/// Failure applying a generic field write to a settings object.
///
/// Both variants are reported to the caller and logged; neither ever aborts
/// the batch the write arrived in.
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("no settable field `{field}`")]
    FieldNotFound { field: String },
    #[error("cannot convert {value} into {expected} for field `{field}`")]
    TypeMismatch {
        field: String,
        expected: &'static str,
        value: Value,
    },
}

/// Failure turning a named command's payload into its typed form.
#[derive(Debug, Error)]
pub enum CommandError {
    #[error("malformed `{prop}` payload: {reason}")]
    Malformed { prop: &'static str, reason: String },
    #[error("failed to deserialize `{prop}` payload: {source}")]
    Deserialize {
        prop: &'static str,
        #[source]
        source: serde_json::Error,
    },
}
