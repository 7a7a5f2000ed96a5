//! Collision groups and filtering.

use rapier3d::prelude::*;

/// Collision groups for different entity types.
#[repr(u32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollisionGroup {
    /// Static environment (floor, walls, factory model)
    Environment = 1 << 0,
    /// Player character
    Player = 1 << 1,
    /// Deformed creatures
    Enemy = 1 << 2,
    /// Pickup trigger volumes
    Trigger = 1 << 3,
}

impl CollisionGroup {
    /// Membership and filter pair for this group.
    pub fn groups(self) -> (Group, Group) {
        let membership = Group::from_bits_retain(self as u32);
        let filter = match self {
            CollisionGroup::Environment => Group::ALL,
            // Player and creatures pass through each other; catching is a distance check.
            CollisionGroup::Player => {
                Group::from_bits_retain(Self::Environment as u32 | Self::Trigger as u32)
            }
            CollisionGroup::Enemy => {
                Group::from_bits_retain(Self::Environment as u32 | Self::Enemy as u32)
            }
            CollisionGroup::Trigger => Group::from_bits_retain(Self::Player as u32),
        };
        (membership, filter)
    }

    /// Rapier interaction groups for colliders in this group.
    pub fn interaction_groups(self) -> InteractionGroups {
        let (membership, filter) = self.groups();
        InteractionGroups::new(membership, filter)
    }
}

/// Handles linking a game entity to its physics representation.
#[derive(Debug, Clone, Copy)]
pub struct PhysicsBody {
    pub rigid_body: RigidBodyHandle,
    pub collider: Option<ColliderHandle>,
}

impl PhysicsBody {
    pub fn with_collider(rigid_body: RigidBodyHandle, collider: ColliderHandle) -> Self {
        Self {
            rigid_body,
            collider: Some(collider),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn triggers_only_see_the_player() {
        let (membership, filter) = CollisionGroup::Trigger.groups();
        assert_eq!(membership.bits(), CollisionGroup::Trigger as u32);
        assert_eq!(filter.bits(), CollisionGroup::Player as u32);
    }

    #[test]
    fn enemies_do_not_touch_triggers() {
        let (_, filter) = CollisionGroup::Enemy.groups();
        assert_eq!(filter.bits() & CollisionGroup::Trigger as u32, 0);
    }

    #[test]
    fn player_and_enemies_do_not_collide() {
        let player = CollisionGroup::Player.interaction_groups();
        let enemy = CollisionGroup::Enemy.interaction_groups();
        assert!(!player.test(enemy));
        assert!(CollisionGroup::Environment.interaction_groups().test(enemy));
    }
}
