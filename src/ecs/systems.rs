use hecs::World;

use super::components::{BoxGeometry, Clickable, Lifecycle};
use crate::domain::wagers::SelectionPhase;

/// Recompute the per-frame clickability cache for every authoritative box.
///
/// A box is clickable while its right world edge is at least
/// `buffer_columns` box-widths ahead of the now line and it has no recorded
/// outcome. Fillers carry no `Lifecycle`/`Clickable` components and are
/// skipped by construction.
pub fn refresh_clickability(world: &mut World, now_world_x: f64, buffer_columns: u32) {
    for (_, (geometry, lifecycle, clickable)) in
        world.query_mut::<(&BoxGeometry, &Lifecycle, &mut Clickable)>()
    {
        let buffer = buffer_columns as f64 * geometry.width;
        clickable.0 =
            lifecycle.outcome.is_none() && geometry.right_edge() >= now_world_x + buffer;
    }
}

/// Demote every highlighted box back to idle. Runs ahead of a new selection
/// so at most one box carries the highlight affordance.
pub fn clear_highlighted(world: &mut World) {
    for (_, lifecycle) in world.query_mut::<&mut Lifecycle>() {
        if lifecycle.phase == SelectionPhase::Highlighted {
            lifecycle.phase = SelectionPhase::Idle;
        }
    }
}
