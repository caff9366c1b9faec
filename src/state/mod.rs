//! Notes state: actions, the reducer and reorder-index computation.
//!
//! `reduce` is a pure `(state, action) -> state` function. Side effects
//! (persistence, the change feed) live in `store`, `persist` and `feed`.

pub mod actions;
mod reducer;
pub mod reorder;

pub use actions::{
    add_note, clear_notes, delete_note, update_note, ActionEnvelope, ActionMeta, NoteAction,
};
pub use reducer::reduce;
pub use reorder::{gap_collapsed, new_index, rebalance_lane, MoveRequest};
