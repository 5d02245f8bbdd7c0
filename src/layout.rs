use std::collections::{BTreeMap, HashMap};

use eframe::egui::{Vec2, vec2};

use crate::family::FamilyMember;
use crate::util::seeded_pair;

pub const GRID_SPACING_X: f32 = 220.0;
pub const GRID_SPACING_Y: f32 = 170.0;
pub const GRID_TOP_MARGIN: f32 = 90.0;

const FREESTYLE_ORIGIN: Vec2 = vec2(80.0, 80.0);
const FREESTYLE_EXTENT: Vec2 = vec2(1200.0, 760.0);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LayoutMode {
    Auto,
    Freestyle,
}

impl LayoutMode {
    pub fn label(self) -> &'static str {
        match self {
            Self::Auto => "Auto",
            Self::Freestyle => "Freestyle",
        }
    }
}

/// Deterministic grid: members grouped by generation row, each row sorted
/// alphabetically and centered around x = 0. Stored positions are ignored.
pub fn grid_layout(members: &[FamilyMember]) -> HashMap<String, Vec2> {
    let mut rows: BTreeMap<i32, Vec<&FamilyMember>> = BTreeMap::new();
    for member in members {
        rows.entry(member.generation_rank()).or_default().push(member);
    }

    let mut positions = HashMap::with_capacity(members.len());
    for (rank, mut row) in rows {
        row.sort_by(|a, b| a.name.cmp(&b.name).then_with(|| a.id.cmp(&b.id)));

        let center = (row.len() as f32 - 1.0) / 2.0;
        let y = GRID_TOP_MARGIN + rank as f32 * GRID_SPACING_Y;
        for (column, member) in row.into_iter().enumerate() {
            let x = (column as f32 - center) * GRID_SPACING_X;
            positions.insert(member.id.clone(), vec2(x, y));
        }
    }

    positions
}

/// Freestyle: persisted positions win; everything else gets session-seeded
/// jitter inside a fixed box, so unplaced cards scatter instead of stacking.
pub fn freestyle_layout(members: &[FamilyMember], seed: u64) -> HashMap<String, Vec2> {
    members
        .iter()
        .map(|member| {
            let position = match member.position {
                Some(stored) => vec2(stored.x, stored.y),
                None => {
                    let (jx, jy) = seeded_pair(seed, &member.id);
                    FREESTYLE_ORIGIN + vec2(jx * FREESTYLE_EXTENT.x, jy * FREESTYLE_EXTENT.y)
                }
            };
            (member.id.clone(), position)
        })
        .collect()
}
