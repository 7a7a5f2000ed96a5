//! Pickups scattered around the factory: lore documents and crafting materials.

use engine_core::{Transform, Vec3, VisualHandle};
use physics::{BodyDesc, BodyShape, CollisionGroup, PhysicsBody, PhysicsWorld};
use rand::Rng;
use renderer::{RenderSurface, VisualDesc};

/// Bob amplitude in world units.
pub const BOB_AMPLITUDE: f32 = 0.4;
/// Bob angular rate, applied to the clock in seconds.
pub const BOB_RATE: f32 = 2.0;
/// Secondary tilt as a fraction of the spin rate.
pub const TILT_FACTOR: f32 = 0.3;

const TRIGGER_RADIUS: f32 = 0.4;

/// Identity and payload of a pickup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollectibleData {
    pub id: String,
    pub name: String,
    pub description: String,
    /// Lore items reveal text and pause play; the rest are crafting materials.
    pub is_lore: bool,
    pub lore_content: Option<String>,
}

impl CollectibleData {
    pub fn lore(id: &str, name: &str, description: &str, content: &str) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            description: description.to_string(),
            is_lore: true,
            lore_content: Some(content.to_string()),
        }
    }

    pub fn material(id: &str, name: &str, description: &str) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            description: description.to_string(),
            is_lore: false,
            lore_content: None,
        }
    }
}

/// Invoked once when a pickup is collected. Collectibles live in the hecs
/// world, so the callback has to be shareable across threads.
pub type PickupCallback = Box<dyn FnMut(&CollectibleData) + Send + Sync>;

pub struct Collectible {
    pub data: CollectibleData,
    pub transform: Transform,
    pub body: PhysicsBody,
    pub visual: VisualHandle,
    /// Where the trigger volume sits. The bob never moves it.
    anchor: Vec3,
    spin_rate: f32,
    collected: bool,
    on_collect: Option<PickupCallback>,
}

impl Collectible {
    pub fn spawn(
        physics: &mut PhysicsWorld,
        renderer: &mut impl RenderSurface,
        position: Vec3,
        data: CollectibleData,
        rng: &mut impl Rng,
    ) -> Self {
        let body = physics.add_body(
            BodyDesc::fixed(position, BodyShape::Sphere { radius: TRIGGER_RADIUS })
                .sensor()
                .group(CollisionGroup::Trigger),
        );
        let visual = renderer.create_visual(VisualDesc::Collectible { lore: data.is_lore });
        Self {
            data,
            transform: Transform::from_position(position),
            body,
            visual,
            anchor: position,
            spin_rate: rng.gen_range(0.01..0.04),
            collected: false,
            on_collect: None,
        }
    }

    /// Register the callback run on the first collection.
    pub fn set_on_collect(&mut self, callback: PickupCallback) {
        self.on_collect = Some(callback);
    }

    /// Idle animation: bob on the global clock and spin a little each tick.
    pub fn update(&mut self, clock_seconds: f32) {
        self.transform.position.y = self.anchor.y + (clock_seconds * BOB_RATE).sin() * BOB_AMPLITUDE;
        self.transform.rotate_y(self.spin_rate);
        self.transform.rotate_x(self.spin_rate * TILT_FACTOR);
    }

    /// Mark the pickup collected, hide it and notify the registered callback.
    /// Only the first call does anything; returns whether this call collected.
    pub fn collect(&mut self, renderer: &mut impl RenderSurface) -> bool {
        if self.collected {
            return false;
        }
        self.collected = true;
        if let Err(e) = renderer.set_visual_visible(self.visual, false) {
            log::warn!("Could not hide collectible {}: {}", self.data.id, e);
        }
        if let Some(callback) = self.on_collect.as_mut() {
            callback(&self.data);
        }
        log::debug!("Collected {}", self.data.id);
        true
    }

    pub fn is_collected(&self) -> bool {
        self.collected
    }

    /// Position used for proximity pickup.
    pub fn trigger_position(&self) -> Vec3 {
        self.anchor
    }

    pub fn spin_rate(&self) -> f32 {
        self.spin_rate
    }
}
