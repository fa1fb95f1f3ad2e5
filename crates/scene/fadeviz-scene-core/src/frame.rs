use serde::{Deserialize, Serialize};

use fadeviz_cache_core::Level;

/// An item whose level changed.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ItemChange {
    pub index: usize,
    /// Slider value that produced `level`.
    pub slider: f32,
    pub level: Level,
    pub visible: bool,
}

/// What happened since the previous [`FadeScene::step`](crate::FadeScene::step).
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SceneFrame {
    pub epoch: u64,
    pub dt: f32,
    /// New master slider value, if a master transition moved it this tick.
    pub master: Option<f32>,
    /// Level changes in the order they were applied, including those caused
    /// by slider input between steps.
    pub changes: Vec<ItemChange>,
}
