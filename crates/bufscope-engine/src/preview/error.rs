use bufscope_layout::LayoutError;
use thiserror::Error;

/// Failures the preview reports to its caller.
///
/// Content that cannot be materialized is not an error: the preview logs it
/// and renders without bounds.
#[derive(Debug, Error)]
pub enum PreviewError {
    /// The rendering context or preview program could not be created.
    #[error("failed to acquire rendering context")]
    ContextAcquisition(#[source] anyhow::Error),

    #[error("degenerate vertex layout")]
    Layout(#[from] LayoutError),

    #[error("failed to acquire a GPU handle for {label}")]
    HandleAcquisition {
        label: String,
        #[source]
        source: anyhow::Error,
    },

    #[error("buffer preview used after dispose()")]
    Disposed,

    #[error(transparent)]
    Backend(#[from] anyhow::Error),
}
