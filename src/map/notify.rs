//! Change notifications emitted by a [`Map`](super::Map).

use super::entity::EntityId;
use super::layer::Layer;

/// What changed in a map
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MapChange {
    EntityAdded(EntityId),
    EntityRemoved(EntityId),
    /// One or more attributes or properties of the entity changed
    EntityChanged(EntityId),
    /// The z-order of a layer changed
    LayerOrderChanged(Layer),
    SelectionChanged,
    /// An action was applied, undone or redone
    HistoryChanged,
}

/// Handle returned by [`Map::subscribe`](super::Map::subscribe)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(pub(crate) u64);

/// Callback receiving a batch of changes, deduplicated, in first-seen order
pub type MapListener = Box<dyn FnMut(&[MapChange]) + Send + Sync>;

/// Registered listeners plus the changes waiting to be delivered
#[derive(Default)]
pub(crate) struct Notifier {
    listeners: Vec<(ListenerId, MapListener)>,
    next_id: u64,
    pending: Vec<MapChange>,
}

impl Notifier {
    pub fn subscribe(&mut self, listener: MapListener) -> ListenerId {
        let id = ListenerId(self.next_id);
        self.next_id += 1;
        self.listeners.push((id, listener));
        id
    }

    pub fn unsubscribe(&mut self, id: ListenerId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(listener_id, _)| *listener_id != id);
        self.listeners.len() != before
    }

    pub fn record(&mut self, change: MapChange) {
        if !self.pending.contains(&change) {
            self.pending.push(change);
        }
    }

    pub fn discard(&mut self) {
        self.pending.clear();
    }

    /// Delivers pending changes to every listener
    pub fn flush(&mut self) {
        if self.pending.is_empty() {
            return;
        }
        let changes = std::mem::take(&mut self.pending);
        for (_, listener) in self.listeners.iter_mut() {
            listener(&changes);
        }
    }
}

impl std::fmt::Debug for Notifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Notifier")
            .field("listeners", &self.listeners.len())
            .field("pending", &self.pending)
            .finish()
    }
}
