//! fadeviz-scene-core: a fade cache plus the items, sliders and layout around it.
//!
//! [`FadeScene`] owns one [`FadeCache`](fadeviz_cache_core::FadeCache) and a
//! list of items, each with a slider and a
//! [`FadeConsumer`](fadeviz_cache_core::FadeConsumer). A master slider drives
//! every item slider at once. Hosts plug in visuals through [`ItemSpawner`]
//! and render resources through a
//! [`ResourceFactory`](fadeviz_cache_core::ResourceFactory), then call
//! [`FadeScene::step`] once per frame.

pub mod config;
pub mod frame;
pub mod scene;
pub mod spawner;

pub use config::SceneConfig;
pub use frame::{ItemChange, SceneFrame};
pub use scene::{FadeScene, SceneItem};
pub use spawner::ItemSpawner;
