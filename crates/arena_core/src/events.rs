//! Game notifications
//!
//! Simulation code queues [`GameEvent`]s while a frame runs. The queue is
//! dispatched once at the end of the frame: every registered sink sees every
//! event, in the order they were raised, and the events are then kept until
//! the host drains them. Undrained history is capped, oldest events first.

use crate::entity::EnemyType;
use crate::foundation::math::Vec3;
use crate::game::GameState;
use crate::input::ControllerId;

/// Something the outside world may want to react to
#[derive(Debug, Clone, PartialEq)]
pub enum GameEvent {
    /// A new game started
    GameReset {
        /// Players created for the new game
        players: usize,
    },
    /// The state machine moved
    StateChanged {
        /// Previous state
        from: GameState,
        /// New state
        to: GameState,
    },
    /// The director scheduler moved to a new level
    LevelIncreased {
        /// New level
        level: u32,
        /// Time budget assigned to the level
        budget: f32,
        /// Director chosen for the level
        director: &'static str,
    },
    /// A player lost a life
    PlayerKilled {
        /// Player slot
        player: ControllerId,
        /// Lives left after the kill
        lives_remaining: i32,
    },
    /// A player ran out of lives
    PlayerEliminated {
        /// Player slot
        player: ControllerId,
        /// Final score
        score: u64,
    },
    /// An enemy died and was removed
    EnemyDestroyed {
        /// Enemy category
        kind: EnemyType,
        /// Where it died
        position: Vec3,
        /// Player credited with the kill, if any
        credited: Option<ControllerId>,
    },
}

/// Receiver of game events
///
/// Sinks are called synchronously during dispatch and must not panic.
pub trait EventSink {
    /// Handle one event
    fn on_event(&mut self, event: &GameEvent);
}

impl<F: FnMut(&GameEvent)> EventSink for F {
    fn on_event(&mut self, event: &GameEvent) {
        self(event);
    }
}

/// Undrained events kept by [`EventQueue::new`]
pub const DEFAULT_HISTORY: usize = 256;

/// Per-frame event queue with registered sinks
pub struct EventQueue {
    pending: Vec<GameEvent>,
    dispatched: Vec<GameEvent>,
    history: usize,
    sinks: Vec<Box<dyn EventSink>>,
}

impl Default for EventQueue {
    fn default() -> Self {
        Self::with_history(DEFAULT_HISTORY)
    }
}

impl EventQueue {
    /// Create an empty queue with no sinks
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a queue keeping at most `history` undrained events
    pub fn with_history(history: usize) -> Self {
        Self {
            pending: Vec::new(),
            dispatched: Vec::new(),
            history,
            sinks: Vec::new(),
        }
    }

    /// Register a sink for all future dispatches
    pub fn subscribe(&mut self, sink: Box<dyn EventSink>) {
        self.sinks.push(sink);
    }

    /// Queue an event for this frame's dispatch
    pub fn push(&mut self, event: GameEvent) {
        self.pending.push(event);
    }

    /// Events raised since the last dispatch
    pub fn pending(&self) -> &[GameEvent] {
        &self.pending
    }

    /// Deliver pending events to every sink in order
    pub fn dispatch(&mut self) {
        let pending = std::mem::take(&mut self.pending);
        for event in &pending {
            for sink in &mut self.sinks {
                sink.on_event(event);
            }
        }
        self.dispatched.extend(pending);

        if self.dispatched.len() > self.history {
            let excess = self.dispatched.len() - self.history;
            self.dispatched.drain(..excess);
        }
    }

    /// Events already delivered and not yet drained
    pub fn dispatched(&self) -> &[GameEvent] {
        &self.dispatched
    }

    /// Take every dispatched event not yet drained
    pub fn drain(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.dispatched)
    }

    /// Drop queued and undrained events, keeping sinks
    pub fn clear(&mut self) {
        self.pending.clear();
        self.dispatched.clear();
    }

    /// Drop undrained events, keeping anything not yet dispatched
    pub fn clear_dispatched(&mut self) {
        self.dispatched.clear();
    }
}

impl std::fmt::Debug for EventQueue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventQueue")
            .field("pending", &self.pending.len())
            .field("dispatched", &self.dispatched.len())
            .field("history", &self.history)
            .field("sinks", &self.sinks.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn test_dispatch_reaches_every_sink_in_order() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let mut queue = EventQueue::new();

        for tag in ["a", "b"] {
            let seen = Rc::clone(&seen);
            queue.subscribe(Box::new(move |event: &GameEvent| {
                if let GameEvent::GameReset { players } = event {
                    seen.borrow_mut().push((tag, *players));
                }
            }));
        }

        queue.push(GameEvent::GameReset { players: 1 });
        queue.push(GameEvent::GameReset { players: 2 });
        assert!(seen.borrow().is_empty());

        queue.dispatch();
        assert_eq!(*seen.borrow(), vec![("a", 1), ("b", 1), ("a", 2), ("b", 2)]);
    }

    #[test]
    fn test_drain_returns_dispatched_once() {
        let mut queue = EventQueue::new();
        queue.push(GameEvent::GameReset { players: 1 });
        assert!(queue.drain().is_empty());

        queue.dispatch();
        assert_eq!(queue.drain().len(), 1);
        assert!(queue.drain().is_empty());
    }

    #[test]
    fn test_undrained_history_keeps_newest() {
        let mut queue = EventQueue::with_history(3);
        for players in 0..5 {
            queue.push(GameEvent::GameReset { players });
            queue.dispatch();
        }

        let kept: Vec<usize> = queue
            .drain()
            .into_iter()
            .filter_map(|event| match event {
                GameEvent::GameReset { players } => Some(players),
                _ => None,
            })
            .collect();
        assert_eq!(kept, vec![2, 3, 4]);
    }

    #[test]
    fn test_clear_dispatched_keeps_pending() {
        let mut queue = EventQueue::new();
        queue.push(GameEvent::GameReset { players: 1 });
        queue.dispatch();
        queue.push(GameEvent::GameReset { players: 2 });

        queue.clear_dispatched();
        assert!(queue.dispatched().is_empty());
        assert_eq!(queue.pending(), &[GameEvent::GameReset { players: 2 }]);
    }
}
