use thiserror::Error;

/// Recoverable pixel-access fault raised by an [`crate::ImageSource`] whose
/// backend refuses to hand out pixel data, the analog of a tainted canvas
/// behind cross-origin protection.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("pixel access denied: {reason}")]
pub struct SampleFault {
    /// Backend-specific description of why sampling was refused.
    pub reason: String,
}

impl SampleFault {
    pub fn new(reason: impl Into<String>) -> Self {
        Self { reason: reason.into() }
    }
}

/// Failure classes absorbed by extraction. None of these ever reach the
/// caller; [`crate::PaletteExtractor::extract`] maps every variant to the
/// fallback palette.
#[derive(Error, Debug)]
pub(crate) enum ExtractError {
    /// The source has no resolvable locator.
    #[error("image source has no locator")]
    MissingSource,

    /// The one-shot load signal fired with a failure.
    #[error("image source failed to load")]
    LoadFailed,

    /// The source refused to hand out pixel data.
    #[error(transparent)]
    Sample(#[from] SampleFault),
}
