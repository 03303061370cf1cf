use serde::Serialize;

/// Interstitial page shown after a successful step before moving on.
#[derive(Debug, Serialize)]
pub struct RedirectPageData {
    pub message: String,
    pub target: String,
    pub delay_ms: u64,
    /// `delay_ms` rounded up to whole seconds; `refresh` ignores fractions.
    pub delay_secs: u64,
}

impl RedirectPageData {
    pub fn new(message: impl Into<String>, target: impl Into<String>, delay_ms: u64) -> Self {
        Self {
            message: message.into(),
            target: target.into(),
            delay_ms,
            delay_secs: delay_ms.div_ceil(1000),
        }
    }
}
