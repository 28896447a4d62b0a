use thiserror::Error;

/// Failures reading, validating or writing user settings.
#[derive(Error, Debug)]
pub enum SettingsError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("{field} = {value} is out of range ({min}..={max})")]
    OutOfRange {
        field: &'static str,
        value: u32,
        min: u32,
        max: u32,
    },
}

/// Failures pushing an update to the view layer.
///
/// The engine never stops on these; it logs them and keeps ticking.
#[derive(Error, Debug)]
pub enum ViewError {
    #[error("view is disconnected - has the UI exited?")]
    Disconnected,

    #[error("notification failed: {0}")]
    Notification(String),
}
