use std::cell::RefCell;
use std::marker::PhantomData;
use std::rc::Rc;

use fadeviz_cache_core::{
    BaseDefinition, FadeTarget, FactoryError, FnFactory, Level, MaterialFactory, MaterialParams,
    Rgba,
};
use fadeviz_layout_core::{Size, Vec2};
use fadeviz_scene_core::{FadeScene, ItemSpawner, SceneConfig};

#[derive(Debug)]
struct Tile<R> {
    label: String,
    resource: Option<R>,
    visible: bool,
    placed: Option<(Vec2, f32)>,
}

impl<R: Clone> FadeTarget for Tile<R> {
    type Resource = R;

    fn apply_resource(&mut self, resource: Option<&R>) {
        self.resource = resource.cloned();
    }

    fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
    }
}

#[derive(Debug)]
struct Tiles<R> {
    despawned: Rc<RefCell<Vec<String>>>,
    _resource: PhantomData<R>,
}

impl<R> Default for Tiles<R> {
    fn default() -> Self {
        Self {
            despawned: Rc::default(),
            _resource: PhantomData,
        }
    }
}

impl<R: Clone> ItemSpawner for Tiles<R> {
    type Item = Tile<R>;

    fn spawn(&mut self, _index: usize, label: &str) -> Tile<R> {
        Tile {
            label: label.to_string(),
            resource: None,
            visible: true,
            placed: None,
        }
    }

    fn despawn(&mut self, item: Tile<R>) {
        assert!(!item.visible, "despawned item still visible");
        self.despawned.borrow_mut().push(item.label);
    }

    fn place(&mut self, item: &mut Tile<R>, origin: Vec2, scale: f32) {
        item.placed = Some((origin, scale));
    }
}

type MaterialTiles = Tiles<Rc<MaterialParams>>;

fn config(items: usize) -> SceneConfig {
    SceneConfig {
        item_count: items,
        ..SceneConfig::default()
    }
}

fn material_scene(items: usize) -> FadeScene<MaterialFactory, MaterialTiles> {
    FadeScene::with_materials(config(items), MaterialTiles::default()).unwrap()
}

#[test]
fn spawns_labelled_opaque_items() {
    let scene = material_scene(50);
    assert_eq!(scene.items().len(), 50);
    assert_eq!(scene.item(0).unwrap().label(), "Item 1");
    assert_eq!(scene.item(49).unwrap().label(), "Item 50");
    for item in scene.items() {
        assert_eq!(item.level(), Level(255));
        assert!(item.target().visible);
        assert_eq!(item.target().resource.as_ref().unwrap().level, Level(255));
        assert_eq!(item.slider().value(), 1.0);
    }
    // opaque holders are never counted
    assert!(scene.cache().tracked_levels().is_empty());
}

#[test]
fn items_at_same_opacity_share_one_resource() {
    let mut scene = material_scene(3);
    assert!(scene.set_item_opacity(0, 0.5).unwrap());
    assert!(scene.set_item_opacity(2, 0.5).unwrap());
    assert!(!scene.set_item_opacity(2, 0.5).unwrap());

    let a = scene.item(0).unwrap().target().resource.clone().unwrap();
    let c = scene.item(2).unwrap().target().resource.clone().unwrap();
    assert!(Rc::ptr_eq(&a, &c));
    assert_eq!(scene.cache().ref_count(Level(128)), 2);

    let frame = scene.step(0.016).unwrap();
    assert_eq!(frame.epoch, 1);
    let indices: Vec<usize> = frame.changes.iter().map(|c| c.index).collect();
    assert_eq!(indices, vec![0, 2]);
    assert!(frame.changes.iter().all(|c| c.level == Level(128) && c.visible));

    // changes are reported once
    assert!(scene.step(0.016).unwrap().changes.is_empty());
    assert!(scene.set_item_opacity(9, 0.5).is_err());
}

#[test]
fn zero_opacity_hides_and_releases() {
    let mut scene = material_scene(2);
    scene.set_item_opacity(1, 0.3).unwrap();
    assert_eq!(scene.cache().tracked_levels(), vec![Level(77)]);
    scene.set_item_opacity(1, 0.0).unwrap();
    let item = scene.item(1).unwrap();
    assert_eq!(item.level(), Level::TRANSPARENT);
    assert!(!item.target().visible);
    assert!(item.target().resource.is_none());
    assert!(scene.cache().tracked_levels().is_empty());
}

#[test]
fn master_slider_drives_every_item() {
    let mut scene = material_scene(4);
    assert!(scene.set_master_opacity(0.25).unwrap());
    assert_eq!(scene.cache().tracked_levels(), vec![Level(64)]);
    assert_eq!(scene.cache().ref_count(Level(64)), 4);
    assert!(scene.items().iter().all(|i| i.slider().value() == 0.25));

    let frame = scene.step(0.0).unwrap();
    assert_eq!(frame.changes.len(), 4);
    assert_eq!(frame.master, None);
}

#[test]
fn item_transition_runs_to_nearest_end() {
    let mut scene = material_scene(1);
    scene.set_item_opacity(0, 0.2).unwrap();
    scene.start_item_transition(0).unwrap();
    assert!(!scene.item(0).unwrap().slider().slider.is_enabled());
    // locked sliders ignore the user
    assert!(!scene.set_item_opacity(0, 0.9).unwrap());

    scene.step(0.25).unwrap();
    let mid = scene.item(0).unwrap().level();
    assert!(mid > Level(51) && mid < Level(255));

    let frame = scene.step(1.0).unwrap();
    assert_eq!(frame.changes.last().unwrap().level, Level(255));
    let item = scene.item(0).unwrap();
    assert_eq!(item.slider().value(), 1.0);
    assert!(item.slider().slider.is_enabled());
    assert!(scene.cache().tracked_levels().is_empty());
}

#[test]
fn master_transition_locks_and_overrides_items() {
    let mut scene = material_scene(3);
    scene.set_item_opacity(0, 0.1).unwrap();
    scene.start_item_transition(0).unwrap();

    scene.start_master_transition();
    assert!(!scene.item(0).unwrap().slider().is_transitioning());
    assert!(scene
        .items()
        .iter()
        .all(|i| !i.slider().slider.is_enabled()));
    assert!(scene.start_item_transition(1).is_err());

    let frame = scene.step(0.5).unwrap();
    assert_eq!(frame.master, Some(0.5));
    assert!(scene.items().iter().all(|i| i.level() == Level(128)));
    assert_eq!(scene.cache().ref_count(Level(128)), 3);

    let frame = scene.step(0.5).unwrap();
    assert_eq!(frame.master, Some(0.0));
    for item in scene.items() {
        assert_eq!(item.level(), Level::TRANSPARENT);
        assert!(!item.target().visible);
        assert!(item.slider().slider.is_enabled());
    }
    assert!(scene.cache().tracked_levels().is_empty());
    assert!(scene.master().slider.is_enabled());
}

#[test]
fn shrinking_releases_from_the_end() {
    let mut scene = material_scene(5);
    for i in 0..5 {
        scene.set_item_opacity(i, 0.5).unwrap();
    }
    assert_eq!(scene.cache().ref_count(Level(128)), 5);
    let despawned = scene.spawner().despawned.clone();

    scene.set_item_count(2).unwrap();
    assert_eq!(scene.items().len(), 2);
    assert_eq!(*despawned.borrow(), vec!["Item 5", "Item 4", "Item 3"]);
    assert_eq!(scene.cache().ref_count(Level(128)), 2);

    scene.set_item_count(4).unwrap();
    assert_eq!(scene.item(3).unwrap().label(), "Item 4");
    assert_eq!(scene.item(3).unwrap().level(), Level(255));
    assert_eq!(scene.cache().total_references(), 2);

    scene.clear().unwrap();
    assert!(scene.cache().tracked_levels().is_empty());
    assert_eq!(despawned.borrow().len(), 7);
}

#[test]
fn change_base_repoints_every_item() {
    let mut scene = material_scene(3);
    scene.set_item_opacity(0, 0.5).unwrap();
    scene.set_item_opacity(1, 0.25).unwrap();
    let before = scene.item(0).unwrap().target().resource.clone().unwrap();

    let red = BaseDefinition {
        color: Rgba::new(1.0, 0.0, 0.0, 1.0),
        ..BaseDefinition::default()
    };
    scene.change_base(red.clone()).unwrap();

    let after = scene.item(0).unwrap().target().resource.clone().unwrap();
    assert!(!Rc::ptr_eq(&before, &after));
    assert_eq!(after.color.g, 0.0);
    assert_eq!(scene.cache().ref_count(Level(128)), 1);
    assert_eq!(scene.cache().ref_count(Level(64)), 1);
    assert_eq!(scene.config().base, red);
    assert_eq!(scene.cache().stats().rebuilds, 1);

    // item 2 never left opacity 1 and follows the new base too
    let opaque = scene.item(2).unwrap().target().resource.clone().unwrap();
    assert_eq!(opaque.level, Level(255));
    assert_eq!(opaque.color, Rgba::new(1.0, 0.0, 0.0, 1.0));
    assert_eq!(opaque.shader, "standard");
}

#[test]
fn change_base_leaves_host_opaque_alone() {
    let factory = FnFactory::new(
        |base: &BaseDefinition, level: Level, _: u16| -> Result<u32, FactoryError> {
            Ok(u32::from(level.value()) + if base.color.g == 0.0 { 1000 } else { 0 })
        },
        |_: u32| {},
    );
    let mut scene = FadeScene::new(config(2), 7u32, factory, Tiles::<u32>::default()).unwrap();
    scene.set_item_opacity(1, 0.5).unwrap();

    scene
        .change_base(BaseDefinition {
            color: Rgba::new(1.0, 0.0, 0.0, 1.0),
            ..BaseDefinition::default()
        })
        .unwrap();
    assert_eq!(scene.item(0).unwrap().target().resource, Some(7));
    assert_eq!(scene.item(1).unwrap().target().resource, Some(1128));

    assert_eq!(scene.replace_opaque(9).unwrap(), 7);
    assert_eq!(scene.item(0).unwrap().target().resource, Some(9));
}

#[test]
fn viewport_places_panel_and_grid() {
    let mut scene = material_scene(6);
    let panel = scene
        .poll_viewport(Size::new(900.0, 600.0))
        .unwrap()
        .expect("first poll lays out");
    assert_eq!(panel.anchored_position, Vec2::new(30.0, 30.0));
    assert!(scene.poll_viewport(Size::new(900.0, 600.0)).unwrap().is_none());

    let grid = scene.grid();
    assert_eq!(grid.cell_count, 6);
    assert!(grid.rows * grid.columns >= 6);
    assert!(scene.items().iter().all(|i| i.target().placed.is_some()));

    // a minimized window lays nothing out
    assert!(scene.poll_viewport(Size::new(0.0, 0.0)).unwrap().is_none());
    assert_eq!(scene.panel(), Some(panel));
}

#[test]
fn dropping_the_scene_releases_everything() {
    let log = Rc::new(RefCell::new((0u32, Vec::<u32>::new())));
    let created = log.clone();
    let destroyed = log.clone();
    let factory = FnFactory::new(
        move |_: &BaseDefinition, level: Level, _: u16| -> Result<u32, FactoryError> {
            created.borrow_mut().0 += 1;
            Ok(u32::from(level.value()))
        },
        move |resource: u32| destroyed.borrow_mut().1.push(resource),
    );

    let mut scene = FadeScene::new(
        config(3),
        255u32,
        factory,
        Tiles::<u32>::default(),
    )
    .unwrap();
    scene.set_item_opacity(0, 0.5).unwrap();
    scene.set_item_opacity(1, 0.5).unwrap();
    scene.set_item_opacity(2, 0.1).unwrap();
    assert_eq!(log.borrow().0, 2);
    drop(scene);

    let mut destroyed = log.borrow().1.clone();
    destroyed.sort_unstable();
    assert_eq!(destroyed, vec![26, 128]);
}

#[test]
fn replacing_opaque_repoints_only_opaque_items() {
    let mut scene = material_scene(2);
    scene.set_item_opacity(1, 0.5).unwrap();
    let faded = scene.item(1).unwrap().target().resource.clone().unwrap();

    let black = Rc::new(MaterialParams {
        color: Rgba::new(0.0, 0.0, 0.0, 1.0),
        shader: "unlit".to_string(),
        level: Level(255),
    });
    let previous = scene.replace_opaque(black.clone()).unwrap();
    assert_eq!(previous.shader, "standard");

    let opaque = scene.item(0).unwrap().target().resource.clone().unwrap();
    assert!(Rc::ptr_eq(&opaque, &black));
    let still_faded = scene.item(1).unwrap().target().resource.clone().unwrap();
    assert!(Rc::ptr_eq(&faded, &still_faded));
}
