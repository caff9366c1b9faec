//! Fractional indexing for drag-and-drop.
//!
//! A moved note gets a key strictly between the drop target and the next
//! note beyond it, so no other note needs a new key. Repeatedly splitting
//! the same gap eventually runs out of `f64` precision; `new_index` logs
//! when that happens and `rebalance_lane` renumbers a lane on request.

use crate::types::{LaneId, Note, NoteId, NotePatch};
use tracing::warn;

/// A proposed move of one note onto a target position.
#[derive(Clone, Debug, PartialEq)]
pub struct MoveRequest {
    pub source_id: NoteId,
    pub source_lane_id: LaneId,
    pub source_index: f64,
    pub target_lane_id: LaneId,
    pub target_index: f64,
}

/// Direction to look for a neighbour: -1 for before the target, +1 for after.
pub fn direction(request: &MoveRequest) -> f64 {
    let cross_lane = request.target_lane_id != request.source_lane_id;
    if cross_lane || request.source_index > request.target_index {
        -1.0
    } else {
        1.0
    }
}

/// Compute the new index of the moved note.
pub fn new_index(notes: &[Note], request: &MoveRequest) -> f64 {
    let xfactor = direction(request);
    let target = xfactor * request.target_index;

    let neighbour = notes
        .iter()
        .filter(|note| note.id != request.source_id && note.lane_id == request.target_lane_id)
        .map(|note| xfactor * note.index)
        .filter(|scaled| *scaled > target)
        .min_by(|a, b| a.total_cmp(b))
        .map(|scaled| xfactor * scaled);

    match neighbour {
        None => request.target_index + xfactor,
        Some(neighbour) => {
            let mid = (request.target_index + neighbour) / 2.0;
            if gap_collapsed(request.target_index, neighbour, mid) {
                warn!(
                    note = %request.source_id,
                    lane = %request.target_lane_id,
                    target = request.target_index,
                    neighbour,
                    "Fractional index gap exhausted; lane needs rebalancing"
                );
            }
            mid
        }
    }
}

/// True when `mid` is not strictly between `a` and `b`.
pub fn gap_collapsed(a: f64, b: f64, mid: f64) -> bool {
    let (lo, hi) = if a < b { (a, b) } else { (b, a) };
    !(lo < mid && mid < hi)
}

/// Renumber one lane to `1.0, 2.0, ...` in its current order.
///
/// Returns patches only for notes whose index changes. Never called by the
/// store on its own.
pub fn rebalance_lane(notes: &[Note], lane_id: &LaneId) -> Vec<NotePatch> {
    let mut lane: Vec<&Note> = notes.iter().filter(|n| &n.lane_id == lane_id).collect();
    lane.sort_by(|a, b| a.index.total_cmp(&b.index));

    lane.iter()
        .enumerate()
        .filter_map(|(i, note)| {
            let index = (i + 1) as f64;
            if note.index == index {
                None
            } else {
                Some(NotePatch::new(note.id.clone()).with_index(index))
            }
        })
        .collect()
}
