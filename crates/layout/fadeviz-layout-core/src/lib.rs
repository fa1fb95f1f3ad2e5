//! fadeviz-layout-core: screen-responsive layout helpers (engine-agnostic).
//!
//! - [`GridPacker`] picks rows, columns and cell size for a number of items.
//! - [`ui_scale_factor`] and [`PanelOffsets`] keep the slider panel at fixed
//!   pixel margins regardless of canvas scaling.
//! - [`ViewportWatcher`] turns per-tick screen sizes into resize notifications.

pub mod config;
pub mod error;
pub mod geometry;
pub mod grid;
pub mod offsets;
pub mod scale;
pub mod viewport;

pub use config::LayoutConfig;
pub use error::LayoutError;
pub use geometry::{Padding, Size, Vec2};
pub use grid::{GridLayout, GridPacker};
pub use offsets::PanelOffsets;
pub use scale::ui_scale_factor;
pub use viewport::{SubscriptionId, ViewportWatcher};
