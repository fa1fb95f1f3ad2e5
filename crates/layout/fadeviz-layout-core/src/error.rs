use thiserror::Error;

use crate::geometry::Size;

/// Errors produced by layout computations.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum LayoutError {
    #[error("screen size {width}x{height} has no area")]
    DegenerateScreen { width: f32, height: f32 },
    #[error("reference resolution {width}x{height} has no area")]
    DegenerateReference { width: f32, height: f32 },
}

impl LayoutError {
    pub(crate) fn screen(size: Size) -> Self {
        Self::DegenerateScreen {
            width: size.width,
            height: size.height,
        }
    }

    pub(crate) fn reference(size: Size) -> Self {
        Self::DegenerateReference {
            width: size.width,
            height: size.height,
        }
    }
}
