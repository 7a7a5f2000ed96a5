//! The per-frame simulation loop.
//!
//! One call to [`GameEngine::frame`] is one displayed frame and, unless play
//! is paused, one simulation tick: input, player, camera, physics, creatures,
//! pickups, HUD. Rendering and FPS measurement happen on every frame so a
//! frozen lore or death screen keeps drawing.

use std::sync::mpsc::{self, Receiver};

use hecs::World;
use rand::{rngs::StdRng, SeedableRng};

use engine_core::{Vec3, VisualHandle};
use input::InputSampler;
use physics::PhysicsWorld;
use renderer::{Camera, PendingModel, RenderSurface};

use crate::collectible::{Collectible, CollectibleData};
use crate::config::GameConfig;
use crate::crafting::{CraftingSystem, Inventory, Recipe};
use crate::deformed::Deformed;
use crate::error::GameError;
use crate::factory::Factory;
use crate::level;
use crate::lore::LoreSystem;
use crate::performance::PerformanceGovernor;
use crate::player::Player;
use crate::ui::UiSurface;

/// A creature closer than this catches the player.
pub const CATCH_DISTANCE: f32 = 2.0;
/// The player picks up anything closer than this.
pub const PICKUP_DISTANCE: f32 = 2.0;
/// The HUD warns when a creature is closer than this.
pub const WARNING_DISTANCE: f32 = 15.0;
pub const DEATH_REASON: &str = "You were caught by the deformed!";

/// Whether gameplay advances.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Running,
    /// Paused on a lore panel until [`GameEngine::resume`].
    ReadingLore,
    /// Caught. Only a restart leaves this state.
    Dead,
}

pub fn is_caught(player: Vec3, creature: Vec3) -> bool {
    player.distance(creature) < CATCH_DISTANCE
}

pub struct GameEngine<R: RenderSurface, U: UiSurface> {
    renderer: R,
    ui: U,
    physics: PhysicsWorld,
    /// Creatures and pickups.
    world: World,
    /// Payloads sent by collectible pickup callbacks, drained each tick.
    pickups: Receiver<CollectibleData>,
    player: Player,
    factory: Factory,
    player_model: Option<PendingModel>,
    camera: Camera,
    lore: LoreSystem,
    crafting: CraftingSystem,
    inventory: Inventory,
    inventory_open: bool,
    governor: PerformanceGovernor,
    rng: StdRng,
    state: SessionState,
    loop_started: bool,
}

impl<R: RenderSurface, U: UiSurface> GameEngine<R, U> {
    /// Build a session and start loading the factory and player models.
    pub fn new(config: &GameConfig, renderer: R, ui: U) -> Self {
        let factory_model = PendingModel::spawn(config.factory_model.clone());
        let player_model = PendingModel::spawn(config.player_model.clone());
        Self::with_assets(config, renderer, ui, factory_model, player_model)
    }

    /// Build a session around model loads that are already under way.
    pub fn with_assets(
        config: &GameConfig,
        mut renderer: R,
        ui: U,
        factory_model: PendingModel,
        player_model: PendingModel,
    ) -> Self {
        let mut rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let mut physics = PhysicsWorld::new();

        let factory = Factory::build(&mut physics, &mut renderer, factory_model);
        let player = Player::spawn(&mut physics, &mut renderer, Vec3::from(level::PLAYER_START));

        let mut world = World::new();
        let (pickup_tx, pickups) = mpsc::channel();
        for (position, data) in level::collectibles() {
            let mut collectible =
                Collectible::spawn(&mut physics, &mut renderer, position, data, &mut rng);
            let tx = pickup_tx.clone();
            collectible.set_on_collect(Box::new(move |data: &CollectibleData| {
                if tx.send(data.clone()).is_err() {
                    log::warn!("Pickup of {} dropped: engine gone", data.id);
                }
            }));
            world.spawn((collectible,));
        }
        for (index, position) in level::enemy_spawn_points().enumerate() {
            world.spawn((Deformed::spawn(&mut physics, &mut renderer, position, index),));
        }

        let mut camera = Camera::new(player.eye_position());
        camera.set_aspect(config.window_width, config.window_height);

        let governor =
            PerformanceGovernor::new(config.target_fps, config.physics_hz, config.auto_quality);

        log::info!(
            "GameEngine constructed: {} bodies, {} entities",
            physics.body_count(),
            world.len()
        );

        let mut engine = Self {
            renderer,
            ui,
            physics,
            world,
            pickups,
            player,
            factory,
            player_model: Some(player_model),
            camera,
            lore: LoreSystem::new(),
            crafting: CraftingSystem::new(),
            inventory: Inventory::new(),
            inventory_open: false,
            governor,
            rng,
            state: SessionState::Running,
            loop_started: false,
        };
        engine.apply_quality();
        engine
    }

    /// Run one frame at `now_ms` milliseconds since the session started.
    pub fn frame(&mut self, input: &mut InputSampler, now_ms: f64) {
        if !self.loop_started {
            self.loop_started = true;
            log::info!("Game loop started");
        }

        if let Err(e) = self.renderer.render(&self.camera) {
            log::warn!("Render failed: {}", e);
        }

        if let Some(fps) = self.governor.record_frame(now_ms) {
            if self.governor.adjust_quality(fps, now_ms) {
                self.apply_quality();
            }
        }

        self.poll_assets();

        if self.state != SessionState::Running {
            return;
        }

        let snapshot = input.snapshot();
        self.player.update(&snapshot, &mut self.physics);
        input.reset();

        self.sync_camera();

        self.physics.step(1.0 / self.governor.settings().physics_hz);
        self.player.sync_from_body(&self.physics);

        self.update_enemies();
        self.update_collectibles(now_ms);

        self.ui.update_position(self.player.position());
        self.ui.update_health(self.player.health.display_value());
        self.ui.update_collected(self.collected_count());

        let warn = self
            .nearest_enemy_distance()
            .is_some_and(|d| d < WARNING_DISTANCE);
        self.ui.set_warning_visible(warn);

        if let Err(e) = self.sync_visuals() {
            log::warn!("Visual sync failed: {}", e);
        }
    }

    fn update_enemies(&mut self) {
        let player_position = self.player.position();
        let mut caught_by = None;
        for (_entity, enemy) in self.world.query_mut::<&mut Deformed>() {
            enemy.update(&mut self.physics, player_position, &mut self.rng);
            if is_caught(player_position, enemy.position()) {
                caught_by = Some(enemy.name());
            }
        }
        if let Some(name) = caught_by {
            log::info!("Caught by {}", name);
            self.player_death(DEATH_REASON);
        }
    }

    fn update_collectibles(&mut self, now_ms: f64) {
        let clock = (now_ms / 1000.0) as f32;
        let player_position = self.player.position();

        for (_entity, collectible) in self.world.query_mut::<&mut Collectible>() {
            collectible.update(clock);
            if !collectible.is_collected()
                && collectible.trigger_position().distance(player_position) < PICKUP_DISTANCE
            {
                collectible.collect(&mut self.renderer);
            }
        }

        while let Ok(data) = self.pickups.try_recv() {
            self.on_pickup(data);
        }
    }

    fn on_pickup(&mut self, data: CollectibleData) {
        if data.is_lore {
            let content = data.lore_content.as_deref().unwrap_or_default();
            self.lore.add_lore(&data.id, &data.name, content);
            self.ui.show_lore(&data.name, content);
            if self.state == SessionState::Running {
                self.state = SessionState::ReadingLore;
            }
        } else {
            *self.inventory.entry(data.id).or_insert(0) += 1;
            if self.inventory_open {
                self.ui.set_inventory(true, &self.inventory);
            }
        }
    }

    fn player_death(&mut self, reason: &str) {
        if self.state == SessionState::Dead {
            return;
        }
        self.state = SessionState::Dead;
        log::info!("Player died: {}", reason);
        self.ui.show_death(reason);
    }

    /// Close the lore panel and continue. Death is final.
    pub fn resume(&mut self) {
        match self.state {
            SessionState::ReadingLore => {
                self.state = SessionState::Running;
                self.ui.hide_lore();
            }
            SessionState::Dead => log::debug!("Ignoring resume after death"),
            SessionState::Running => {}
        }
    }

    pub fn toggle_manual_low_perf(&mut self) {
        self.governor.toggle_manual_low_perf();
        self.apply_quality();
    }

    pub fn toggle_inventory(&mut self) {
        self.inventory_open = !self.inventory_open;
        self.ui.set_inventory(self.inventory_open, &self.inventory);
    }

    /// Craft from the session inventory.
    pub fn craft(&mut self, item_id: &str) -> Option<&'static Recipe> {
        let recipe = self.crafting.craft(item_id, &mut self.inventory);
        match recipe {
            Some(r) => log::info!("Crafted {}: {}", r.name, r.effect),
            None => log::info!("Cannot craft {}", item_id),
        }
        if self.inventory_open {
            self.ui.set_inventory(true, &self.inventory);
        }
        recipe
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        self.camera.set_aspect(width, height);
    }

    fn apply_quality(&mut self) {
        let settings = self.governor.settings();
        self.renderer.set_render_scale(settings.render_scale);
        self.renderer.set_shadows_enabled(settings.shadows_enabled);
    }

    fn poll_assets(&mut self) {
        if !self.factory.is_ready() && self.factory.poll(&mut self.physics, &mut self.renderer) {
            self.reposition_player();
        }

        if let Some(pending) = self.player_model.as_mut() {
            if let Some(result) = pending.poll() {
                self.player_model = None;
                match result {
                    Ok(model) => match self.renderer.attach_model(self.player.visual, &model) {
                        Ok(()) => log::info!("Player model attached"),
                        Err(e) => log::warn!("Could not attach player model: {}", e),
                    },
                    Err(e) => log::error!("Error loading player model: {}", e),
                }
            }
        }
    }

    fn reposition_player(&mut self) {
        let spawn = self.factory.spawn_point();
        self.player.teleport(&mut self.physics, spawn);
        self.sync_camera();
        log::info!("Player repositioned to factory at {:?}", spawn);
    }

    fn sync_camera(&mut self) {
        self.camera.transform.position = self.player.eye_position();
        self.camera.set_yaw_pitch(self.player.yaw(), self.player.pitch());
    }

    fn sync_visuals(&mut self) -> Result<(), GameError> {
        self.renderer
            .set_visual_transform(self.player.visual, &self.player.transform)?;
        let mut transforms: Vec<(VisualHandle, engine_core::Transform)> = Vec::new();
        for (_entity, enemy) in self.world.query::<&Deformed>().iter() {
            transforms.push((enemy.visual, enemy.transform));
        }
        for (_entity, collectible) in self.world.query::<&Collectible>().iter() {
            if !collectible.is_collected() {
                transforms.push((collectible.visual, collectible.transform));
            }
        }
        for (visual, transform) in transforms {
            self.renderer.set_visual_transform(visual, &transform)?;
        }
        Ok(())
    }

    /// Distance to the closest creature.
    pub fn nearest_enemy_distance(&self) -> Option<f32> {
        let player_position = self.player.position();
        self.world
            .query::<&Deformed>()
            .iter()
            .map(|(_, enemy)| enemy.position().distance(player_position))
            .min_by(f32::total_cmp)
    }

    pub fn collected_count(&self) -> usize {
        self.world
            .query::<&Collectible>()
            .iter()
            .filter(|(_, c)| c.is_collected())
            .count()
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn ui(&self) -> &U {
        &self.ui
    }

    pub fn player(&self) -> &Player {
        &self.player
    }

    pub fn lore(&self) -> &LoreSystem {
        &self.lore
    }

    pub fn inventory(&self) -> &Inventory {
        &self.inventory
    }

    pub fn is_inventory_open(&self) -> bool {
        self.inventory_open
    }

    pub fn governor(&self) -> &PerformanceGovernor {
        &self.governor
    }

    pub fn factory(&self) -> &Factory {
        &self.factory
    }
}
