//! crates/portfolio_core/src/ranking.rs
//!
//! Ordering and re-ranking of project listings, and recognition of the drag
//! gesture that drives a reorder. Everything here is pure and independent of the
//! pointer library of whatever front end feeds it.

use crate::domain::Project;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RankingError {
    #[error("Index {index} is out of range for a list of {len} projects")]
    IndexOutOfRange { index: usize, len: usize },
}

/// Ranked projects ascending by rank, then unranked ones in their original order.
///
/// Both halves keep the relative order of equal keys.
pub fn initial_order(projects: &[Project]) -> Vec<Project> {
    let (mut ranked, unranked): (Vec<Project>, Vec<Project>) =
        projects.iter().cloned().partition(|p| p.rank.is_some());
    ranked.sort_by_key(|p| p.rank);
    ranked.extend(unranked);
    ranked
}

/// The order used by the public projects section. Same rules as the editor.
pub fn display_order(projects: &[Project]) -> Vec<Project> {
    initial_order(projects)
}

/// Sets `rank = position + 1` on every project.
pub fn assign_ranks(projects: &mut [Project]) {
    for (position, project) in projects.iter_mut().enumerate() {
        project.rank = Some(position as i64 + 1);
    }
}

/// Moves the element at `from` to `to` (list move, not swap) and re-ranks the list.
///
/// Returns `Ok(false)` without touching the list when `from == to`.
pub fn reorder(projects: &mut Vec<Project>, from: usize, to: usize) -> Result<bool, RankingError> {
    let len = projects.len();
    for index in [from, to] {
        if index >= len {
            return Err(RankingError::IndexOutOfRange { index, len });
        }
    }
    if from == to {
        return Ok(false);
    }

    let moved = projects.remove(from);
    projects.insert(to, moved);
    assign_ranks(projects);
    Ok(true)
}

//=========================================================================================
// Drag Gesture Recognition
//=========================================================================================

/// Default pointer travel before a press is treated as a drag.
pub const DEFAULT_DRAG_ACTIVATION_DISTANCE: f64 = 5.0;

/// What a finished press-move-release sequence amounts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Gesture {
    /// The pointer stayed under the activation distance: open the item.
    Click(usize),
    /// The item was dragged onto a different slot.
    Drop { from: usize, to: usize },
    /// Nothing to do (dropped onto itself, or no press in progress).
    None,
}

#[derive(Debug, Clone, Copy)]
struct Press {
    index: usize,
    origin: (f64, f64),
    dragging: bool,
}

/// Tracks one pointer press at a time and classifies it on release.
#[derive(Debug, Clone)]
pub struct DragTracker {
    activation_distance: f64,
    press: Option<Press>,
}

impl DragTracker {
    pub fn new(activation_distance: f64) -> Self {
        Self {
            activation_distance: activation_distance.max(0.0),
            press: None,
        }
    }

    pub fn press(&mut self, index: usize, at: (f64, f64)) {
        self.press = Some(Press {
            index,
            origin: at,
            dragging: false,
        });
    }

    /// Records pointer movement. Once the threshold is crossed the press stays a drag.
    pub fn motion(&mut self, at: (f64, f64)) {
        let threshold = self.activation_distance;
        if let Some(press) = self.press.as_mut() {
            let (dx, dy) = (at.0 - press.origin.0, at.1 - press.origin.1);
            if (dx * dx + dy * dy).sqrt() >= threshold {
                press.dragging = true;
            }
        }
    }

    pub fn is_dragging(&self) -> bool {
        self.press.is_some_and(|press| press.dragging)
    }

    /// Ends the press over `target` (the slot under the pointer, if any).
    pub fn release(&mut self, target: Option<usize>) -> Gesture {
        let Some(press) = self.press.take() else {
            return Gesture::None;
        };
        if !press.dragging {
            return Gesture::Click(press.index);
        }
        match target {
            Some(to) if to != press.index => Gesture::Drop {
                from: press.index,
                to,
            },
            _ => Gesture::None,
        }
    }

    pub fn cancel(&mut self) {
        self.press = None;
    }
}

impl Default for DragTracker {
    fn default() -> Self {
        Self::new(DEFAULT_DRAG_ACTIVATION_DISTANCE)
    }
}
