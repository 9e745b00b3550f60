//! Presentation state shared by every display

use serde::{Deserialize, Serialize};

/// The one piece of shared state: which image is on screen
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PresentationState {
    /// Last published image URL, `None` until the first publish.
    /// An empty string is the "cleared" value.
    pub current_image: Option<String>,
}

impl PresentationState {
    /// Whether displays should show their placeholder
    pub fn is_blank(&self) -> bool {
        self.current_image.as_deref().map_or(true, str::is_empty)
    }
}
