//! Host seam for creating and removing item visuals.

use fadeviz_cache_core::FadeTarget;
use fadeviz_layout_core::Vec2;

/// Creates the visual for each scene item and takes it back on removal.
pub trait ItemSpawner {
    type Item: FadeTarget;

    /// Create the visual for item `index`, labelled e.g. `"Item 3"`.
    fn spawn(&mut self, index: usize, label: &str) -> Self::Item;

    /// Take back a visual whose item was removed. Its cache reference has
    /// already been released.
    fn despawn(&mut self, item: Self::Item);

    /// Move an item into its grid cell. `origin` is the cell's top-left corner
    /// and `scale` the item's uniform size in pixels.
    fn place(&mut self, _item: &mut Self::Item, _origin: Vec2, _scale: f32) {}
}
