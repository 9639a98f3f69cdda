//! Topic-based event bus implementation.

use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

use super::types::{CombatEvent, PlayerEvent, TurnEvent};

/// Topics for event routing.
#[derive(Debug, Clone, Copy, Hash, Eq, PartialEq, Serialize, Deserialize)]
pub enum Topic {
    /// Player movement and reachable-tile updates.
    Player,
    /// Turn changes and game over.
    Turn,
    /// Combat round resets.
    Combat,
}

/// Event wrapper that carries the topic and typed event.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Event {
    Player(PlayerEvent),
    Turn(TurnEvent),
    Combat(CombatEvent),
}

impl Event {
    pub fn topic(&self) -> Topic {
        match self {
            Event::Player(_) => Topic::Player,
            Event::Turn(_) => Topic::Turn,
            Event::Combat(_) => Topic::Combat,
        }
    }
}

/// Topic-based event bus.
///
/// Consumers subscribe to the topics they care about; session workers publish
/// into all of them. One broadcast channel per topic, created up front —
/// the topic set is closed, so there is no lock or lazy channel table.
/// Delivery is in publish order per session because each session has exactly
/// one publishing worker.
#[derive(Debug, Clone)]
pub struct EventBus {
    player_tx: broadcast::Sender<Event>,
    turn_tx: broadcast::Sender<Event>,
    combat_tx: broadcast::Sender<Event>,
}

impl EventBus {
    /// Creates a new event bus with default capacity for each topic.
    pub fn new() -> Self {
        Self::with_capacity(100)
    }

    /// Creates a new event bus with specified capacity per topic.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            player_tx: broadcast::channel(capacity).0,
            turn_tx: broadcast::channel(capacity).0,
            combat_tx: broadcast::channel(capacity).0,
        }
    }

    /// Publish an event to its corresponding topic.
    pub fn publish(&self, event: Event) {
        let topic = event.topic();
        if self.sender(topic).send(event).is_err() {
            // No subscribers for this topic - this is normal, not an error
            tracing::trace!("No subscribers for topic {:?}", topic);
        }
    }

    /// Subscribe to a specific topic.
    ///
    /// Returns a receiver that will only receive events for that topic.
    pub fn subscribe(&self, topic: Topic) -> broadcast::Receiver<Event> {
        self.sender(topic).subscribe()
    }

    fn sender(&self, topic: Topic) -> &broadcast::Sender<Event> {
        match topic {
            Topic::Player => &self.player_tx,
            Topic::Turn => &self.turn_tx,
            Topic::Combat => &self.combat_tx,
        }
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}
