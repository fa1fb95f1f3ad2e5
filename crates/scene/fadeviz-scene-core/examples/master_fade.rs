//! Fade ten items out with the master slider and print each frame as JSON.

use std::rc::Rc;

use fadeviz_cache_core::{FadeTarget, MaterialParams};
use fadeviz_layout_core::Size;
use fadeviz_scene_core::{FadeScene, ItemSpawner, SceneConfig};

struct Swatch {
    shader: Option<String>,
}

impl FadeTarget for Swatch {
    type Resource = Rc<MaterialParams>;

    fn apply_resource(&mut self, resource: Option<&Rc<MaterialParams>>) {
        self.shader = resource.map(|m| m.shader.clone());
    }

    fn set_visible(&mut self, _visible: bool) {}
}

struct Swatches;

impl ItemSpawner for Swatches {
    type Item = Swatch;

    fn spawn(&mut self, _index: usize, _label: &str) -> Swatch {
        Swatch { shader: None }
    }

    fn despawn(&mut self, _item: Swatch) {}
}

fn main() -> anyhow::Result<()> {
    let config = SceneConfig::from_json_str(r#"{ "item_count": 10, "transition": { "seconds": 0.5 } }"#)?;
    let mut scene = FadeScene::with_materials(config, Swatches)?;
    scene.poll_viewport(Size::new(1280.0, 720.0))?;
    println!("grid: {:?}", scene.grid());

    scene.start_master_transition();
    while scene.master().is_transitioning() {
        let frame = scene.step(1.0 / 10.0)?;
        println!("{}", serde_json::to_string(&frame)?);
    }
    println!(
        "item 1 uses {:?}; cache {:?}",
        scene.item(0).and_then(|i| i.target().shader.clone()),
        scene.cache()
    );
    Ok(())
}
