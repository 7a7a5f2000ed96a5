//! Fixed level layout: where pickups and creatures start.

use engine_core::Vec3;

use crate::collectible::CollectibleData;

/// Creature spawn points, in archetype order.
pub const ENEMY_SPAWN_POINTS: [[f32; 3]; 4] = [
    [30.0, 1.0, 30.0],
    [-30.0, 1.0, 30.0],
    [30.0, 1.0, -30.0],
    [-20.0, 1.0, 20.0],
];

/// Player start before the factory is ready.
pub const PLAYER_START: [f32; 3] = [0.0, 2.0, 0.0];

struct LoreEntry {
    position: [f32; 3],
    id: &'static str,
    name: &'static str,
    description: &'static str,
    content: &'static str,
}

const LORE_ENTRIES: [LoreEntry; 8] = [
    LoreEntry {
        position: [10.0, 1.0, 15.0],
        id: "letter_carlos_1",
        name: "Letter from Carlos to Plex",
        description: "A concerned letter about toy welfare",
        content: "Dear Plex,\n\nI am deeply concerned about what we are doing. These toys... they think, they feel, they dream. I see it in their eyes. Just because we brought them to life doesn't give us the right to treat them as mere machines.\n\nWe must reduce their working hours and provide them proper rest. They are suffering.\n\n- Carlos",
    },
    LoreEntry {
        position: [20.0, 1.0, 5.0],
        id: "letter_plex_1",
        name: "Letter from Plex to Carlos",
        description: "A ruthless response about production",
        content: "Carlos,\n\nThey are TOYS. Yes, they can think, but they exist for production. Sentiment is weakness. We have quotas to meet and profits to maximize.\n\nYour compassion is costing us millions. Either increase production or stop wasting my time.\n\n- Plex",
    },
    LoreEntry {
        position: [5.0, 1.0, 20.0],
        id: "letter_toy_1",
        name: "Diary Entry - Toy #4472",
        description: "A toy's account of consciousness and suffering",
        content: "My \"birthday\" was two weeks ago. That's when I came alive. I remember the glow of the magic book as my consciousness sparked into existence.\n\nI was happy at first. I had friends - other toys like me. But now... we work so much. My joints hurt. The others are starting to change. Their eyes go empty. What is happening to us?",
    },
    LoreEntry {
        position: [15.0, 1.0, 25.0],
        id: "tape_transcript_1",
        name: "Security Tape Transcript - Day 47",
        description: "Corrupted audio log of anomalous behavior",
        content: "[AUDIO LOG - HEAVILY CORRUPTED]\n\n...workers report strange behavior in Sector 7. The toys are... fused together? Some have multiple limbs. Others are immobile.\n\nDoctor recommends immediate evacuation. Safety protocols violated. Unknown metamorphosis occurring.\n\nDirector Plex refuses to shutdown operations...",
    },
    LoreEntry {
        position: [0.0, 1.0, 10.0],
        id: "letter_toy_2",
        name: "Scratched Message on Wall",
        description: "Desperate pleas from suffering entities",
        content: "HELP US\nHELP US\nHELP US\n\nWe are not what we were\nWe hunger\nWe are in pain\nWe want to be free\n\nThey made us\nWhy did they make us if they would do this\n\n...please...",
    },
    LoreEntry {
        position: [25.0, 1.0, 15.0],
        id: "report_carlos",
        name: "Internal Report - Carlos Martinez",
        description: "Analysis of biological anomalies",
        content: "URGENT: Biological Anomaly Report\n\nThe toys are experiencing rapid cellular degradation combined with neural integration. They are becoming something else. Something unified. Something hungry.\n\nI am requesting immediate evacuation and containment. This situation has spiraled beyond our control.\n\nPlex continues to deny the severity. We may have created something we cannot control.",
    },
    LoreEntry {
        position: [10.0, 1.0, 0.0],
        id: "tape_transcript_2",
        name: "Evacuation Log - Final Entry",
        description: "The last recorded moments before disaster",
        content: "[RECORDING CORRUPTED AND DISTORTED]\n\n...they are breaking through the doors. Multiple entities. Possibly a single organism distributed across a dozen forms. Witnesses report extreme deformity and aggressive behavior.\n\nEVACUATE IMMEDIATELY\n\n[Sound of screaming - RECORDING ENDS]",
    },
    LoreEntry {
        position: [5.0, 1.0, 5.0],
        id: "note_manager",
        name: "Note from Old Manager - 25 years later",
        description: "Reflections after the catastrophe",
        content: "I came back to salvage what I could. The machines, the trains... they need to be moved. Maybe they can have a second purpose.\n\nBut the things here... I see them sometimes. In the shadows. The deformed.\n\nI pray they won't notice me.",
    },
];

/// Crafting materials left lying around the floor: enough for one barrier.
const MATERIAL_ENTRIES: [([f32; 3], &str, &str, &str); 6] = [
    ([-10.0, 1.0, -5.0], "scrap_metal", "Scrap Metal", "A twisted sheet of factory plating"),
    ([-15.0, 1.0, 5.0], "scrap_metal", "Scrap Metal", "A twisted sheet of factory plating"),
    ([-5.0, 1.0, -12.0], "scrap_metal", "Scrap Metal", "A twisted sheet of factory plating"),
    ([12.0, 1.0, -8.0], "wire", "Copper Wire", "A coil stripped from a conveyor motor"),
    ([-8.0, 1.0, 14.0], "wire", "Copper Wire", "A coil stripped from a conveyor motor"),
    ([18.0, 1.0, -15.0], "battery", "Battery", "Still holds a charge, somehow"),
];

/// Every pickup in the level with its position.
pub fn collectibles() -> Vec<(Vec3, CollectibleData)> {
    let lore = LORE_ENTRIES.iter().map(|e| {
        (
            Vec3::from(e.position),
            CollectibleData::lore(e.id, e.name, e.description, e.content),
        )
    });
    let materials = MATERIAL_ENTRIES.iter().map(|(position, id, name, description)| {
        (Vec3::from(*position), CollectibleData::material(id, name, description))
    });
    lore.chain(materials).collect()
}

pub fn enemy_spawn_points() -> impl Iterator<Item = Vec3> {
    ENEMY_SPAWN_POINTS.into_iter().map(Vec3::from)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lore::TOTAL_LORE_PIECES;

    #[test]
    fn level_carries_every_lore_piece() {
        let items = collectibles();
        let lore: Vec<_> = items.iter().filter(|(_, d)| d.is_lore).collect();
        assert_eq!(lore.len(), TOTAL_LORE_PIECES);
        assert!(lore.iter().all(|(_, d)| d.lore_content.is_some()));
        assert_eq!(lore[0].1.id, "letter_carlos_1");
        assert_eq!(lore[7].0, Vec3::new(5.0, 1.0, 5.0));
    }

    #[test]
    fn pickups_do_not_overlap() {
        let items = collectibles();
        for (i, (a, _)) in items.iter().enumerate() {
            for (b, _) in items.iter().skip(i + 1) {
                assert!(a.distance(*b) >= 4.0, "{:?} too close to {:?}", a, b);
            }
        }
    }

    #[test]
    fn materials_cover_a_barrier() {
        let items = collectibles();
        let count = |id: &str| items.iter().filter(|(_, d)| d.id == id).count();
        assert_eq!(count("scrap_metal"), 3);
        assert_eq!(count("wire"), 2);
        assert_eq!(count("battery"), 1);
    }
}
