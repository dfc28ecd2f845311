//! Pointer-driven editors layered over the computed layout.

pub mod crop;
pub mod listeners;
pub mod mat;

pub use crop::{Corner, CropAspect, CropHandle, CropSelector};
pub use listeners::{Listeners, SubscriptionId};
pub use mat::MatBorderEditor;

/// Cursor an editor wants under the pointer, independent of any toolkit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CursorHint {
    #[default]
    Default,
    Move,
    /// Top-left to bottom-right diagonal.
    NwseResize,
    /// Top-right to bottom-left diagonal.
    NeswResize,
    NsResize,
    EwResize,
}

impl CursorHint {
    /// CSS cursor name, `None` for the platform default.
    pub const fn css_name(self) -> Option<&'static str> {
        match self {
            Self::Default => None,
            Self::Move => Some("move"),
            Self::NwseResize => Some("nwse-resize"),
            Self::NeswResize => Some("nesw-resize"),
            Self::NsResize => Some("ns-resize"),
            Self::EwResize => Some("ew-resize"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn css_name_leaves_default_to_platform() {
        assert_eq!(CursorHint::Default.css_name(), None);
        assert_eq!(CursorHint::NwseResize.css_name(), Some("nwse-resize"));
        assert_eq!(CursorHint::EwResize.css_name(), Some("ew-resize"));
    }
}
