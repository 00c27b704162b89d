//! Linear undo/redo history.

use bevy::log::{debug, error, warn};

use crate::constants::MAX_HISTORY_SIZE;
use crate::map::{EditError, Map};

use super::action::Action;

/// Applied actions with a cursor between the undoable ones (before it)
/// and the redoable ones (at and after it).
///
/// Recording a new action drops everything after the cursor: history is
/// linear, never branching.
pub struct CommandHistory {
    actions: Vec<Box<dyn Action>>,
    cursor: usize,
    limit: usize,
    /// Cursor position of the last save, `None` once that state is unreachable
    saved_at: Option<usize>,
}

impl Default for CommandHistory {
    fn default() -> Self {
        Self::with_limit(MAX_HISTORY_SIZE)
    }
}

impl CommandHistory {
    /// A history keeping at most `limit` undoable actions (at least one)
    pub fn with_limit(limit: usize) -> Self {
        Self {
            actions: Vec::new(),
            cursor: 0,
            limit: limit.max(1),
            saved_at: Some(0),
        }
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    pub fn can_undo(&self) -> bool {
        self.cursor > 0
    }

    pub fn can_redo(&self) -> bool {
        self.cursor < self.actions.len()
    }

    pub fn undo_count(&self) -> usize {
        self.cursor
    }

    pub fn redo_count(&self) -> usize {
        self.actions.len() - self.cursor
    }

    /// Name of the action the next undo would revert
    pub fn next_undo_name(&self) -> Option<&'static str> {
        self.cursor
            .checked_sub(1)
            .and_then(|i| self.actions.get(i))
            .map(|action| action.name())
    }

    /// Name of the action the next redo would apply
    pub fn next_redo_name(&self) -> Option<&'static str> {
        self.actions.get(self.cursor).map(|action| action.name())
    }

    pub fn is_saved(&self) -> bool {
        self.saved_at == Some(self.cursor)
    }

    pub fn mark_saved(&mut self) {
        self.saved_at = Some(self.cursor);
    }

    /// Forgets every action. The current state stays saved if it was.
    pub fn clear(&mut self) {
        let saved = self.is_saved();
        self.actions.clear();
        self.cursor = 0;
        self.saved_at = saved.then_some(0);
    }

    /// Executes an action and records it.
    ///
    /// If execution fails, whatever it applied is reverted with the
    /// action's own undo and nothing is recorded.
    pub(crate) fn do_action(&mut self, mut action: Box<dyn Action>, map: &mut Map) -> Result<(), EditError> {
        let name = action.name();
        if let Err(err) = action.execute(map) {
            warn!("Rejected action '{}': {}", name, err);
            rollback(action.as_mut(), map);
            return Err(err);
        }

        if self.can_redo() {
            debug!("Discarding {} redoable actions", self.redo_count());
            self.actions.truncate(self.cursor);
            if self.saved_at.is_some_and(|saved| saved > self.cursor) {
                self.saved_at = None;
            }
        }
        self.actions.push(action);
        self.cursor += 1;

        while self.actions.len() > self.limit {
            self.actions.remove(0);
            self.cursor -= 1;
            self.saved_at = self.saved_at.and_then(|saved| saved.checked_sub(1));
        }
        debug!("Applied '{}' ({} undoable)", name, self.cursor);
        Ok(())
    }

    pub(crate) fn undo(&mut self, map: &mut Map) -> Result<(), EditError> {
        if !self.can_undo() {
            return Err(EditError::NothingToUndo);
        }
        let action = &mut self.actions[self.cursor - 1];
        if let Err(err) = action.undo(map) {
            warn!("Failed to undo '{}': {}", action.name(), err);
            return Err(err);
        }
        debug!("Undid '{}'", action.name());
        self.cursor -= 1;
        Ok(())
    }

    pub(crate) fn redo(&mut self, map: &mut Map) -> Result<(), EditError> {
        if !self.can_redo() {
            return Err(EditError::NothingToRedo);
        }
        let action = &mut self.actions[self.cursor];
        if let Err(err) = action.execute(map) {
            warn!("Failed to redo '{}': {}", action.name(), err);
            rollback(action.as_mut(), map);
            return Err(err);
        }
        debug!("Redid '{}'", action.name());
        self.cursor += 1;
        Ok(())
    }
}

fn rollback(action: &mut dyn Action, map: &mut Map) {
    if let Err(err) = action.undo(map) {
        error!("Rolling back '{}' failed: {}", action.name(), err);
    }
}

impl std::fmt::Debug for CommandHistory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CommandHistory")
            .field("actions", &self.actions)
            .field("cursor", &self.cursor)
            .field("limit", &self.limit)
            .field("saved_at", &self.saved_at)
            .finish()
    }
}
