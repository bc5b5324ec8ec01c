use hecs::{Entity, World};
use std::collections::{HashMap, HashSet};

use super::components::{BoxGeometry, BoxId, BoxKind, BoxStake, Clickable, FillerCell, Lifecycle};
use super::systems;
use crate::domain::chart::config::EngineTuning;
use crate::domain::chart::culling::WorldBounds;
use crate::domain::events::{CoreEvent, EventQueue};
use crate::domain::logging::{LogComponent, get_logger};
use crate::domain::wagers::{
    AnimationKind, AnimationTimeline, BackendBox, BoxAnimation, BoxStatus, ContractId,
    GridAlignment, SelectionPhase,
};

/// Counters describing one snapshot merge.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MergeOutcome {
    pub added: usize,
    pub updated: usize,
    pub removed: usize,
    pub evicted: usize,
}

/// Flattened per-box record handed to the external renderer after culling.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderBox {
    pub id: ContractId,
    pub geometry: BoxGeometry,
    pub is_empty: bool,
    pub clickable: bool,
    pub phase: SelectionPhase,
    pub outcome: Option<BoxStatus>,
    pub value: f64,
    pub total_trades: u64,
    pub user_trade: Option<f64>,
    pub animation: Option<BoxAnimation>,
}

/// Entity table for every box on the board, authoritative and filler alike.
///
/// Boxes live in a `hecs` world keyed through id→entity indexes; lifecycle
/// state is a tag component per entity, so a box can only ever occupy one
/// phase. The board owns reconciliation against feed snapshots, the
/// selection state machine, distance-based eviction, and the filler grid
/// population.
pub struct WagerBoard {
    world: World,
    backend_index: HashMap<ContractId, Entity>,
    filler_cells: HashMap<(i64, i64), Entity>,
    alignment: Option<GridAlignment>,
    /// Ids whose outcome side effects already ran, so feed replays stay
    /// idempotent.
    processed: HashSet<ContractId>,
}

impl Default for WagerBoard {
    fn default() -> Self {
        Self::new()
    }
}

impl WagerBoard {
    pub fn new() -> Self {
        Self {
            world: World::new(),
            backend_index: HashMap::new(),
            filler_cells: HashMap::new(),
            alignment: None,
            processed: HashSet::new(),
        }
    }

    // --- reconciliation -------------------------------------------------

    /// Merge a full authoritative snapshot.
    ///
    /// Existing boxes are replaced only when a tracked field changed, so
    /// downstream caches are not invalidated for byte-identical records.
    /// Once the population exceeds the configured cap, boxes far enough
    /// behind the camera are evicted; boxes ahead of the camera are never
    /// touched.
    pub fn merge_snapshot(
        &mut self,
        snapshot: &HashMap<ContractId, BackendBox>,
        timeline: &mut AnimationTimeline,
        camera_x: f64,
        viewport_world_width: f64,
        tuning: &EngineTuning,
    ) -> MergeOutcome {
        let mut outcome = MergeOutcome::default();

        // Removal pass: ids the feed no longer knows about.
        let stale: Vec<ContractId> = self
            .backend_index
            .keys()
            .filter(|id| !snapshot.contains_key(*id))
            .cloned()
            .collect();
        for id in stale {
            self.remove_backend_box(&id, timeline);
            outcome.removed += 1;
        }

        for (id, incoming) in snapshot {
            if !box_geometry_is_finite(incoming) {
                get_logger().warn(
                    LogComponent::Ecs("WagerBoard"),
                    &format!("dropping box {} with non-finite fields", id),
                );
                continue;
            }

            if self.alignment.is_none() {
                self.alignment = GridAlignment::from_reference_box(incoming);
            }

            match self.backend_index.get(id).copied() {
                Some(entity) => {
                    if self.apply_if_dirty(entity, incoming) {
                        outcome.updated += 1;
                    }
                }
                None => {
                    self.spawn_backend_box(incoming);
                    outcome.added += 1;
                }
            }
        }

        if self.backend_index.len() > tuning.max_backend_boxes {
            outcome.evicted = self.evict_behind_camera(
                timeline,
                camera_x - tuning.eviction_viewports_behind * viewport_world_width,
            );
        }

        outcome
    }

    fn spawn_backend_box(&mut self, incoming: &BackendBox) {
        let entity = self.world.spawn((
            BoxId(incoming.id.clone()),
            BoxKind::Backend,
            geometry_of(incoming),
            stake_of(incoming),
            Lifecycle { phase: SelectionPhase::Idle, outcome: incoming.status },
            Clickable(false),
        ));
        self.backend_index.insert(incoming.id.clone(), entity);
    }

    /// Dirty-check merge of one existing box. Returns true when anything
    /// tracked actually changed.
    fn apply_if_dirty(&mut self, entity: Entity, incoming: &BackendBox) -> bool {
        let new_geometry = geometry_of(incoming);
        let new_stake = stake_of(incoming);

        let (geometry_dirty, stake_dirty, status_dirty) = {
            let geometry = match self.world.get::<&BoxGeometry>(entity) {
                Ok(g) => *g,
                Err(_) => return false,
            };
            let stake = match self.world.get::<&BoxStake>(entity) {
                Ok(s) => *s,
                Err(_) => return false,
            };
            let lifecycle = match self.world.get::<&Lifecycle>(entity) {
                Ok(l) => *l,
                Err(_) => return false,
            };
            (
                geometry != new_geometry,
                stake != new_stake,
                incoming.status.is_some() && lifecycle.outcome != incoming.status,
            )
        };

        if geometry_dirty || stake_dirty {
            let _ = self.world.insert(entity, (new_geometry, new_stake));
        }
        if status_dirty {
            if let Ok(mut lifecycle) = self.world.get::<&mut Lifecycle>(entity) {
                lifecycle.outcome = incoming.status;
            }
        }
        geometry_dirty || stake_dirty || status_dirty
    }

    fn remove_backend_box(&mut self, id: &ContractId, timeline: &mut AnimationTimeline) {
        if let Some(entity) = self.backend_index.remove(id) {
            let _ = self.world.despawn(entity);
        }
        self.processed.remove(id);
        timeline.clear(id);
    }

    /// Evict authoritative boxes whose right edge fell behind `threshold_x`.
    /// By construction this can only ever drop boxes behind the camera.
    fn evict_behind_camera(
        &mut self,
        timeline: &mut AnimationTimeline,
        threshold_x: f64,
    ) -> usize {
        let doomed: Vec<ContractId> = self
            .world
            .query::<(&BoxId, &BoxKind, &BoxGeometry)>()
            .iter()
            .filter(|(_, (_, kind, geometry))| {
                **kind == BoxKind::Backend && geometry.right_edge() < threshold_x
            })
            .map(|(_, (id, _, _))| id.0.clone())
            .collect();

        for id in &doomed {
            self.remove_backend_box(id, timeline);
        }
        if !doomed.is_empty() {
            get_logger().debug(
                LogComponent::Ecs("WagerBoard"),
                &format!("evicted {} boxes behind x={:.1}", doomed.len(), threshold_x),
            );
        }
        doomed.len()
    }

    // --- selection state machine ----------------------------------------

    /// User clicked a box. Only clickable authoritative boxes with no wager
    /// in flight accept the click; everything else is ignored so a box can
    /// never carry two pending wagers.
    pub fn select_box(
        &mut self,
        id: &ContractId,
        timeline: &mut AnimationTimeline,
        events: &mut EventQueue,
    ) -> bool {
        let Some(entity) = self.backend_index.get(id).copied() else {
            return false;
        };
        let clickable = self.world.get::<&Clickable>(entity).map(|c| c.0).unwrap_or(false);
        if !clickable {
            return false;
        }
        {
            let Ok(lifecycle) = self.world.get::<&Lifecycle>(entity) else {
                return false;
            };
            if matches!(lifecycle.phase, SelectionPhase::Pending | SelectionPhase::Selected)
                || lifecycle.outcome.is_some()
            {
                return false;
            }
        }

        systems::clear_highlighted(&mut self.world);
        if let Ok(mut lifecycle) = self.world.get::<&mut Lifecycle>(entity) {
            lifecycle.phase = SelectionPhase::Pending;
        }
        timeline.clear(id);

        events.push(CoreEvent::SquareSelected { square_id: id.clone() });
        events.push(CoreEvent::SelectionChanged);
        events.push(CoreEvent::SelectionSoundRequested);
        true
    }

    /// Backend accepted the wager: pending resolves into selected and the
    /// select animation starts.
    pub fn confirm_selected_contract(
        &mut self,
        id: &ContractId,
        now_ms: f64,
        timeline: &mut AnimationTimeline,
        events: &mut EventQueue,
    ) {
        let Some(entity) = self.backend_index.get(id).copied() else {
            get_logger().warn(
                LogComponent::Ecs("WagerBoard"),
                &format!("confirm for unknown contract {}", id),
            );
            return;
        };
        if let Ok(mut lifecycle) = self.world.get::<&mut Lifecycle>(entity) {
            lifecycle.phase = SelectionPhase::Selected;
        }
        timeline.start(id, AnimationKind::Select, now_ms);
        events.push(CoreEvent::SelectionChanged);
    }

    /// Backend rejected (or the host withdrew) a pending wager. The box
    /// optionally returns to highlighted so the user can retry it; any
    /// in-flight animation is erased regardless.
    pub fn cancel_pending_contract(
        &mut self,
        id: &ContractId,
        keep_highlight: bool,
        timeline: &mut AnimationTimeline,
        events: &mut EventQueue,
    ) {
        timeline.clear(id);
        let Some(entity) = self.backend_index.get(id).copied() else {
            return;
        };
        if let Ok(mut lifecycle) = self.world.get::<&mut Lifecycle>(entity) {
            lifecycle.phase =
                if keep_highlight { SelectionPhase::Highlighted } else { SelectionPhase::Idle };
        }
        events.push(CoreEvent::SelectionChanged);
    }

    pub fn mark_contract_as_hit(
        &mut self,
        id: &ContractId,
        now_ms: f64,
        timeline: &mut AnimationTimeline,
        events: &mut EventQueue,
    ) {
        self.resolve_outcome(id, BoxStatus::Hit, now_ms, timeline, events);
    }

    pub fn mark_contract_as_missed(
        &mut self,
        id: &ContractId,
        now_ms: f64,
        timeline: &mut AnimationTimeline,
        events: &mut EventQueue,
    ) {
        self.resolve_outcome(id, BoxStatus::Missed, now_ms, timeline, events);
    }

    /// Terminal transition. The box keeps its selected membership with the
    /// outcome layered on top; replayed feed messages are swallowed by the
    /// processed set.
    fn resolve_outcome(
        &mut self,
        id: &ContractId,
        status: BoxStatus,
        now_ms: f64,
        timeline: &mut AnimationTimeline,
        events: &mut EventQueue,
    ) {
        if self.processed.contains(id) {
            return;
        }
        let Some(entity) = self.backend_index.get(id).copied() else {
            get_logger().warn(
                LogComponent::Ecs("WagerBoard"),
                &format!("outcome {} for unknown contract {}", status, id),
            );
            timeline.clear(id);
            return;
        };
        if let Ok(mut lifecycle) = self.world.get::<&mut Lifecycle>(entity) {
            lifecycle.phase = SelectionPhase::Selected;
            lifecycle.outcome = Some(status);
        }
        self.processed.insert(id.clone());
        timeline.start(id, AnimationKind::Activate, now_ms);
        events.push(CoreEvent::SelectionChanged);
    }

    // --- clickability ----------------------------------------------------

    pub fn refresh_clickability(&mut self, now_world_x: f64, buffer_columns: u32) {
        systems::refresh_clickability(&mut self.world, now_world_x, buffer_columns);
    }

    pub fn is_box_clickable(&self, id: &ContractId) -> bool {
        self.backend_index
            .get(id)
            .and_then(|&entity| self.world.get::<&Clickable>(entity).ok().map(|c| c.0))
            .unwrap_or(false)
    }

    /// Clickable boxes with their geometry, for pointer hit testing.
    pub fn clickable_boxes(&self) -> Vec<(ContractId, BoxGeometry)> {
        self.world
            .query::<(&BoxId, &BoxGeometry, &Clickable)>()
            .iter()
            .filter(|(_, (_, _, clickable))| clickable.0)
            .map(|(_, (id, geometry, _))| (id.0.clone(), *geometry))
            .collect()
    }

    // --- filler grid ------------------------------------------------------

    pub fn alignment(&self) -> Option<&GridAlignment> {
        self.alignment.as_ref()
    }

    /// Fill every uncovered grid cell inside `bounds` with a placeholder.
    /// Cells that already hold a filler are left untouched, so existing
    /// placeholders never move or regenerate. Returns how many were spawned.
    pub fn fill_viewport(&mut self, bounds: &WorldBounds) -> usize {
        let Some(alignment) = self.alignment else {
            return 0;
        };

        let mut occupied: HashSet<(i64, i64)> = HashSet::new();
        for (_, (kind, geometry)) in self.world.query::<(&BoxKind, &BoxGeometry)>().iter() {
            if *kind == BoxKind::Backend {
                let covered = alignment.cells_covering_rect(
                    geometry.world_x,
                    geometry.world_y,
                    geometry.width,
                    geometry.height,
                );
                occupied.extend(covered.cells());
            }
        }

        let mut spawned = 0;
        for (ix, iy) in alignment.cells_in(bounds).cells() {
            if occupied.contains(&(ix, iy)) || self.filler_cells.contains_key(&(ix, iy)) {
                continue;
            }
            let (x, y) = alignment.cell_origin(ix, iy);
            let entity = self.world.spawn((
                BoxId(ContractId::new(format!("empty:{}:{}", ix, iy))),
                BoxKind::Filler,
                BoxGeometry {
                    world_x: x,
                    world_y: y,
                    width: alignment.box_width(),
                    height: alignment.box_height(),
                },
                FillerCell { ix, iy },
            ));
            self.filler_cells.insert((ix, iy), entity);
            spawned += 1;
        }
        spawned
    }

    /// Drop fillers far behind the now line or far outside the vertical
    /// corridor around the camera. Returns how many were removed.
    pub fn trim_fillers(
        &mut self,
        now_world_x: f64,
        camera_y: f64,
        viewport_world_width: f64,
        viewport_world_height: f64,
        tuning: &EngineTuning,
    ) -> usize {
        let threshold_x = now_world_x - tuning.filler_trim_viewports_behind * viewport_world_width;
        let y_corridor = tuning.filler_y_viewports * viewport_world_height;

        let doomed: Vec<(i64, i64)> = self
            .world
            .query::<(&FillerCell, &BoxGeometry)>()
            .iter()
            .filter(|(_, (_, geometry))| {
                let (_, center_y) = geometry.center();
                geometry.right_edge() < threshold_x || (center_y - camera_y).abs() > y_corridor
            })
            .map(|(_, (cell, _))| (cell.ix, cell.iy))
            .collect();

        for cell in &doomed {
            if let Some(entity) = self.filler_cells.remove(cell) {
                let _ = self.world.despawn(entity);
            }
        }
        doomed.len()
    }

    pub fn filler_count(&self) -> usize {
        self.filler_cells.len()
    }

    // --- queries ----------------------------------------------------------

    pub fn backend_count(&self) -> usize {
        self.backend_index.len()
    }

    pub fn contains(&self, id: &ContractId) -> bool {
        self.backend_index.contains_key(id)
    }

    pub fn backend_box(&self, id: &ContractId) -> Option<BackendBox> {
        let entity = self.backend_index.get(id).copied()?;
        let geometry = self.world.get::<&BoxGeometry>(entity).ok()?;
        let stake = self.world.get::<&BoxStake>(entity).ok()?;
        let lifecycle = self.world.get::<&Lifecycle>(entity).ok()?;
        Some(BackendBox {
            id: id.clone(),
            world_x: geometry.world_x,
            world_y: geometry.world_y,
            width: geometry.width,
            height: geometry.height,
            value: stake.value,
            total_trades: stake.total_trades,
            user_trade: stake.user_trade,
            status: lifecycle.outcome,
        })
    }

    pub fn backend_boxes(&self) -> Vec<BackendBox> {
        self.world
            .query::<(&BoxId, &BoxKind, &BoxGeometry, &BoxStake, &Lifecycle)>()
            .iter()
            .filter(|(_, (_, kind, ..))| **kind == BoxKind::Backend)
            .map(|(_, (id, _, geometry, stake, lifecycle))| BackendBox {
                id: id.0.clone(),
                world_x: geometry.world_x,
                world_y: geometry.world_y,
                width: geometry.width,
                height: geometry.height,
                value: stake.value,
                total_trades: stake.total_trades,
                user_trade: stake.user_trade,
                status: lifecycle.outcome,
            })
            .collect()
    }

    /// Height of the authoritative grid row, once known.
    pub fn backend_box_height(&self) -> Option<f64> {
        self.alignment.map(|a| a.box_height())
    }

    fn ids_in_phase(&self, wanted: &[SelectionPhase]) -> Vec<ContractId> {
        self.world
            .query::<(&BoxId, &Lifecycle)>()
            .iter()
            .filter(|(_, (_, lifecycle))| wanted.contains(&lifecycle.phase))
            .map(|(_, (id, _))| id.0.clone())
            .collect()
    }

    /// Boxes the user owns: pending wagers, confirmed wagers, and resolved
    /// boxes still layered on top of their selection record.
    pub fn selected_ids(&self) -> Vec<ContractId> {
        self.ids_in_phase(&[SelectionPhase::Pending, SelectionPhase::Selected])
    }

    pub fn pending_ids(&self) -> Vec<ContractId> {
        self.ids_in_phase(&[SelectionPhase::Pending])
    }

    pub fn highlighted_ids(&self) -> Vec<ContractId> {
        self.ids_in_phase(&[SelectionPhase::Highlighted])
    }

    fn ids_with_outcome(&self, wanted: BoxStatus) -> Vec<ContractId> {
        self.world
            .query::<(&BoxId, &Lifecycle)>()
            .iter()
            .filter(|(_, (_, lifecycle))| lifecycle.outcome == Some(wanted))
            .map(|(_, (id, _))| id.0.clone())
            .collect()
    }

    pub fn hit_ids(&self) -> Vec<ContractId> {
        self.ids_with_outcome(BoxStatus::Hit)
    }

    pub fn missed_ids(&self) -> Vec<ContractId> {
        self.ids_with_outcome(BoxStatus::Missed)
    }

    /// Every box intersecting `bounds`, flattened for the renderer.
    pub fn visible_boxes(&self, bounds: &WorldBounds, timeline: &AnimationTimeline) -> Vec<RenderBox> {
        self.world
            .query::<(
                &BoxId,
                &BoxKind,
                &BoxGeometry,
                Option<&BoxStake>,
                Option<&Lifecycle>,
                Option<&Clickable>,
            )>()
            .iter()
            .filter(|(_, (_, _, geometry, ..))| {
                bounds.intersects_rect(
                    geometry.world_x,
                    geometry.world_y,
                    geometry.width,
                    geometry.height,
                )
            })
            .map(|(_, (id, kind, geometry, stake, lifecycle, clickable))| RenderBox {
                id: id.0.clone(),
                geometry: *geometry,
                is_empty: *kind == BoxKind::Filler,
                clickable: clickable.map(|c| c.0).unwrap_or(false),
                phase: lifecycle.map(|l| l.phase).unwrap_or_default(),
                outcome: lifecycle.and_then(|l| l.outcome),
                value: stake.map(|s| s.value).unwrap_or(0.0),
                total_trades: stake.map(|s| s.total_trades).unwrap_or(0),
                user_trade: stake.and_then(|s| s.user_trade),
                animation: timeline.get(&id.0).copied(),
            })
            .collect()
    }
}

fn geometry_of(b: &BackendBox) -> BoxGeometry {
    BoxGeometry { world_x: b.world_x, world_y: b.world_y, width: b.width, height: b.height }
}

fn stake_of(b: &BackendBox) -> BoxStake {
    BoxStake { value: b.value, total_trades: b.total_trades, user_trade: b.user_trade }
}

fn box_geometry_is_finite(b: &BackendBox) -> bool {
    b.world_x.is_finite()
        && b.world_y.is_finite()
        && b.width.is_finite()
        && b.height.is_finite()
        && b.width > 0.0
        && b.height > 0.0
        && b.value.is_finite()
}
