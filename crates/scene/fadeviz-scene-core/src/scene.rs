//! The scene: one fade cache, the items drawing from it, their sliders and a
//! master slider, laid out on a grid.
//!
//! Hosts drive it with user input (`set_item_opacity`, `set_master_opacity`,
//! transition buttons), screen sizes (`poll_viewport`) and time (`step`).

use std::fmt;
use std::rc::Rc;

use anyhow::{anyhow, bail, Context, Result};
use log::{debug, warn};

use fadeviz_cache_core::{
    BaseDefinition, FadeCache, FadeConsumer, FadeTarget, Level, MaterialFactory, MaterialParams,
    ResourceFactory,
};
use fadeviz_layout_core::{
    GridLayout, GridPacker, LayoutError, Padding, PanelOffsets, Size, SubscriptionId,
    ViewportWatcher,
};
use fadeviz_transition_core::AnimatedSlider;

use crate::config::SceneConfig;
use crate::frame::{ItemChange, SceneFrame};
use crate::spawner::ItemSpawner;

/// One item: its label, its slider and the consumer driving its visual.
#[derive(Debug)]
pub struct SceneItem<T: FadeTarget> {
    label: String,
    slider: AnimatedSlider,
    consumer: FadeConsumer<T>,
}

impl<T: FadeTarget> SceneItem<T> {
    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn slider(&self) -> &AnimatedSlider {
        &self.slider
    }

    pub fn level(&self) -> Level {
        self.consumer.current_level()
    }

    pub fn target(&self) -> &T {
        self.consumer.target()
    }

    fn change(&self, index: usize) -> ItemChange {
        let level = self.consumer.current_level();
        ItemChange {
            index,
            slider: self.slider.value(),
            level,
            visible: !level.is_transparent(),
        }
    }
}

/// Push `item`'s slider value through its consumer. Returns the change if the
/// level moved.
fn apply_opacity<F, T>(
    cache: &FadeCache<F>,
    index: usize,
    item: &mut SceneItem<T>,
) -> Result<Option<ItemChange>>
where
    T: FadeTarget,
    F: ResourceFactory<Resource = T::Resource>,
{
    let before = item.consumer.current_level();
    let level = item
        .consumer
        .set_opacity(cache, item.slider.value())
        .with_context(|| format!("applying opacity to item {index}"))?;
    Ok((level != before).then(|| item.change(index)))
}

pub struct FadeScene<F, S>
where
    F: ResourceFactory,
    S: ItemSpawner,
    S::Item: FadeTarget<Resource = F::Resource>,
{
    config: SceneConfig,
    cache: FadeCache<F>,
    spawner: S,
    items: Vec<SceneItem<S::Item>>,
    master: AnimatedSlider,
    viewport: ViewportWatcher,
    container: Option<Size>,
    grid: GridLayout,
    panel: Option<PanelOffsets>,
    pending: Vec<ItemChange>,
    epoch: u64,
    /// Set when the scene derives the opaque resource from the base itself.
    opaque_from_base: Option<OpaqueFromBase<F::Resource>>,
}

type OpaqueFromBase<R> = fn(&BaseDefinition, u16) -> R;

fn material_opaque(base: &BaseDefinition, max_level: u16) -> Rc<MaterialParams> {
    Rc::new(base.opaque(max_level))
}

impl<S> FadeScene<MaterialFactory, S>
where
    S: ItemSpawner,
    S::Item: FadeTarget<Resource = Rc<MaterialParams>>,
{
    /// Scene backed by [`MaterialFactory`], opaque material derived from `config.base`.
    pub fn with_materials(config: SceneConfig, spawner: S) -> Result<Self> {
        let opaque = material_opaque(&config.base, config.cache.max_level);
        let mut scene = Self::new(config, opaque, MaterialFactory, spawner)?;
        scene.opaque_from_base = Some(material_opaque as OpaqueFromBase<Rc<MaterialParams>>);
        Ok(scene)
    }
}

impl<F, S> FadeScene<F, S>
where
    F: ResourceFactory,
    S: ItemSpawner,
    S::Item: FadeTarget<Resource = F::Resource>,
{
    /// Build the cache and spawn `config.item_count` opaque items.
    pub fn new(config: SceneConfig, opaque: F::Resource, factory: F, spawner: S) -> Result<Self> {
        config.validate()?;
        let cache = FadeCache::new(config.cache.clone(), config.base.clone(), opaque, factory)
            .context("creating fade cache")?;
        let item_count = config.item_count;
        let mut scene = Self {
            config,
            cache,
            spawner,
            items: Vec::with_capacity(item_count),
            master: AnimatedSlider::new(1.0),
            viewport: ViewportWatcher::new(),
            container: None,
            grid: GridLayout::EMPTY,
            panel: None,
            pending: Vec::new(),
            epoch: 0,
            opaque_from_base: None,
        };
        scene.set_item_count(item_count)?;
        Ok(scene)
    }

    pub fn config(&self) -> &SceneConfig {
        &self.config
    }

    pub fn cache(&self) -> &FadeCache<F> {
        &self.cache
    }

    pub fn spawner(&self) -> &S {
        &self.spawner
    }

    pub fn items(&self) -> &[SceneItem<S::Item>] {
        &self.items
    }

    pub fn item(&self, index: usize) -> Option<&SceneItem<S::Item>> {
        self.items.get(index)
    }

    pub fn master(&self) -> &AnimatedSlider {
        &self.master
    }

    pub fn grid(&self) -> GridLayout {
        self.grid
    }

    pub fn panel(&self) -> Option<PanelOffsets> {
        self.panel
    }

    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    /// Grow or shrink to `count` items. New items are opaque with their slider
    /// at 1; removal starts from the end.
    pub fn set_item_count(&mut self, count: usize) -> Result<()> {
        while self.items.len() > count {
            let index = self.items.len() - 1;
            if let Some(item) = self.items.last_mut() {
                item.consumer
                    .dispose(&self.cache)
                    .with_context(|| format!("disposing item {index}"))?;
            }
            if let Some(item) = self.items.pop() {
                self.spawner.despawn(item.consumer.into_target());
            }
        }

        let locked = self.master.is_transitioning();
        for index in self.items.len()..count {
            let label = format!("Item {}", index + 1);
            let target = self.spawner.spawn(index, &label);
            let consumer = FadeConsumer::with_level(&self.cache, target, self.cache.opaque_level())
                .with_context(|| format!("spawning {label}"))?;
            let mut slider = AnimatedSlider::new(1.0);
            slider.slider.set_enabled(!locked);
            self.items.push(SceneItem {
                label,
                slider,
                consumer,
            });
        }

        debug!(
            "scene holds {} items, {} fade levels tracked",
            self.items.len(),
            self.cache.tracked_levels().len()
        );
        self.relayout();
        Ok(())
    }

    /// User input on item `index`'s slider. Returns `false` if the slider
    /// ignored it (locked by a transition, or unchanged).
    pub fn set_item_opacity(&mut self, index: usize, value: f32) -> Result<bool> {
        let item = self
            .items
            .get_mut(index)
            .ok_or_else(|| anyhow!("no item at index {index}"))?;
        if !item.slider.slider.drag_to(value) {
            return Ok(false);
        }
        if let Some(change) = apply_opacity(&self.cache, index, item)? {
            self.pending.push(change);
        }
        Ok(true)
    }

    /// User input on the master slider; every item slider follows it.
    pub fn set_master_opacity(&mut self, value: f32) -> Result<bool> {
        if !self.master.slider.drag_to(value) {
            return Ok(false);
        }
        let value = self.master.value();
        for (index, item) in self.items.iter_mut().enumerate() {
            if item.slider.slider.set_value(value) {
                if let Some(change) = apply_opacity(&self.cache, index, item)? {
                    self.pending.push(change);
                }
            }
        }
        Ok(true)
    }

    /// Start item `index`'s slider moving to its nearest end.
    pub fn start_item_transition(&mut self, index: usize) -> Result<()> {
        if self.master.is_transitioning() {
            bail!("item {index} is locked while the master slider transitions");
        }
        let item = self
            .items
            .get_mut(index)
            .ok_or_else(|| anyhow!("no item at index {index}"))?;
        item.slider.start(&self.config.transition);
        Ok(())
    }

    /// Start the master slider moving to its nearest end. Running item
    /// transitions stop and item sliders stay locked until it finishes.
    pub fn start_master_transition(&mut self) {
        for item in self.items.iter_mut() {
            item.slider.cancel();
            item.slider.slider.set_enabled(false);
        }
        self.master.start(&self.config.transition);
    }

    /// Affects transitions started from now on.
    pub fn set_transition_seconds(&mut self, seconds: f32) {
        self.config.transition.seconds = seconds;
    }

    /// Advance every running transition by `dt` seconds.
    pub fn step(&mut self, dt: f32) -> Result<SceneFrame> {
        self.epoch = self.epoch.wrapping_add(1);

        let master_was_running = self.master.is_transitioning();
        let master = self.master.tick(dt);
        let unlock = master_was_running && !self.master.is_transitioning();

        for (index, item) in self.items.iter_mut().enumerate() {
            let followed = master.map_or(false, |v| item.slider.slider.set_value(v));
            let ticked = item.slider.tick(dt).is_some();
            if unlock {
                item.slider.slider.set_enabled(true);
            }
            if followed || ticked {
                if let Some(change) = apply_opacity(&self.cache, index, item)? {
                    self.pending.push(change);
                }
            }
        }

        Ok(SceneFrame {
            epoch: self.epoch,
            dt,
            master,
            changes: std::mem::take(&mut self.pending),
        })
    }

    /// Regenerate every fade resource from `base` and repoint all items.
    ///
    /// Scenes built with [`FadeScene::with_materials`] also re-derive the
    /// opaque material. Otherwise the opaque resource belongs to the host,
    /// which must follow up with [`FadeScene::replace_opaque`].
    pub fn change_base(&mut self, base: BaseDefinition) -> Result<()> {
        self.cache
            .rebuild(base.clone())
            .context("rebuilding fade resources")?;
        if let Some(opaque_for) = self.opaque_from_base {
            self.cache
                .set_opaque(opaque_for(&base, self.cache.max_level()))
                .context("re-deriving opaque resource")?;
        }
        self.config.base = base;
        self.refresh_items()
    }

    /// Swap the opaque resource; returns the previous one for the host to free.
    pub fn replace_opaque(&mut self, opaque: F::Resource) -> Result<F::Resource> {
        let previous = self
            .cache
            .set_opaque(opaque)
            .context("replacing opaque resource")?;
        self.refresh_items()?;
        Ok(previous)
    }

    fn refresh_items(&mut self) -> Result<()> {
        for (index, item) in self.items.iter_mut().enumerate() {
            item.consumer
                .refresh_resource(&self.cache)
                .with_context(|| format!("refreshing item {index}"))?;
        }
        Ok(())
    }

    /// Lay the items out inside `container`.
    pub fn resize(&mut self, container: Size) {
        self.container = Some(container);
        self.relayout();
    }

    fn relayout(&mut self) {
        let Some(container) = self.container else {
            return;
        };
        let layout = &self.config.layout;
        let padding = Padding::uniform(layout.cell_padding_px);
        self.grid = GridPacker::pack(
            self.items.len(),
            container,
            padding,
            layout.cell_spacing_px,
        );
        let Some(scale) = self.grid.item_scale(layout.item_scale) else {
            return;
        };
        for (index, item) in self.items.iter_mut().enumerate() {
            if let Some(origin) = self.grid.cell_origin(index, padding, layout.cell_spacing_px) {
                self.spawner
                    .place(item.consumer.target_mut(), origin, scale);
            }
        }
    }

    /// Feed the current screen size. On change, places the slider panel and
    /// lays the grid out in the screen area right of it.
    pub fn poll_viewport(&mut self, screen: Size) -> Result<Option<PanelOffsets>> {
        if !self.viewport.poll(screen) {
            return Ok(None);
        }
        let panel = match PanelOffsets::compute(screen, &self.config.layout) {
            Ok(panel) => panel,
            Err(err @ LayoutError::DegenerateScreen { .. }) => {
                warn!("skipping layout: {err}");
                return Ok(None);
            }
            Err(err) => return Err(err).context("placing slider panel"),
        };
        let grid_width = screen.width * (1.0 - self.config.layout.horizontal_panel_fraction);
        self.resize(Size::new(grid_width, screen.height));
        self.panel = Some(panel);
        Ok(Some(panel))
    }

    pub fn subscribe_viewport(&mut self, callback: impl FnMut(Size) + 'static) -> SubscriptionId {
        self.viewport.subscribe(callback)
    }

    pub fn unsubscribe_viewport(&mut self, id: SubscriptionId) -> bool {
        self.viewport.unsubscribe(id)
    }

    /// Remove every item, releasing all cache references.
    pub fn clear(&mut self) -> Result<()> {
        self.set_item_count(0)
    }
}

impl<F, S> Drop for FadeScene<F, S>
where
    F: ResourceFactory,
    S: ItemSpawner,
    S::Item: FadeTarget<Resource = F::Resource>,
{
    fn drop(&mut self) {
        if let Err(err) = self.clear() {
            warn!("scene teardown incomplete: {err:#}");
        }
    }
}

impl<F, S> fmt::Debug for FadeScene<F, S>
where
    F: ResourceFactory,
    S: ItemSpawner,
    S::Item: FadeTarget<Resource = F::Resource>,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FadeScene")
            .field("items", &self.items.len())
            .field("master", &self.master.value())
            .field("grid", &self.grid)
            .field("cache", &self.cache)
            .field("epoch", &self.epoch)
            .finish()
    }
}
