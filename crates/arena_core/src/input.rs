//! Controller input
//!
//! Device polling lives outside the core. A [`ControllerProvider`] reports
//! the connected controllers and their raw state once per frame; the
//! [`ControllerHub`] keeps the previous frame's state next to it so players
//! and the menu logic can ask for edge-triggered presses.

use std::collections::BTreeMap;

use crate::foundation::math::Vec2;

/// Trigger travel past which the trigger counts as pressed
pub const TRIGGER_THRESHOLD: f32 = 0.5;

/// Stick deflection below which the stick counts as centred
pub const STICK_DEADZONE: f32 = 0.2;

/// Stable controller slot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ControllerId(pub u8);

/// Raw controller state for one frame
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ControllerState {
    /// Movement stick, each axis in `[-1, 1]`
    pub left_stick: Vec2,
    /// Aim stick, each axis in `[-1, 1]`
    pub right_stick: Vec2,
    /// Right trigger travel in `[0, 1]`
    pub right_trigger: f32,
    /// Start button
    pub start: bool,
}

impl ControllerState {
    /// Whether the right trigger is past the press threshold
    pub fn trigger_down(&self) -> bool {
        self.right_trigger > TRIGGER_THRESHOLD
    }
}

/// Source of controller state
pub trait ControllerProvider {
    /// Currently connected controllers with their state this frame
    fn connected_controllers(&mut self) -> Vec<(ControllerId, ControllerState)>;
}

/// One connected controller with this and last frame's state
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GameController {
    id: ControllerId,
    previous: ControllerState,
    current: ControllerState,
}

impl GameController {
    fn new(id: ControllerId, current: ControllerState) -> Self {
        Self {
            id,
            previous: ControllerState::default(),
            current,
        }
    }

    /// Controller slot
    pub fn id(&self) -> ControllerId {
        self.id
    }

    /// State this frame
    pub fn current(&self) -> &ControllerState {
        &self.current
    }

    /// State last frame
    pub fn previous(&self) -> &ControllerState {
        &self.previous
    }

    /// Start is down this frame
    pub fn is_start_held(&self) -> bool {
        self.current.start
    }

    /// Start went down this frame
    pub fn is_start_pressed(&self) -> bool {
        self.current.start && !self.previous.start
    }

    /// Right trigger crossed the threshold this frame
    pub fn is_trigger_pressed(&self) -> bool {
        self.current.trigger_down() && !self.previous.trigger_down()
    }

    /// Movement stick, zeroed inside the deadzone
    pub fn movement(&self) -> Vec2 {
        deadzone(self.current.left_stick)
    }

    /// Aim stick, zeroed inside the deadzone
    pub fn aim(&self) -> Vec2 {
        deadzone(self.current.right_stick)
    }
}

fn deadzone(stick: Vec2) -> Vec2 {
    if stick.norm() < STICK_DEADZONE {
        Vec2::zeros()
    } else {
        stick
    }
}

/// Tracks every connected controller across frames
#[derive(Debug, Clone, Default)]
pub struct ControllerHub {
    controllers: BTreeMap<ControllerId, GameController>,
}

impl ControllerHub {
    /// Create an empty hub
    pub fn new() -> Self {
        Self::default()
    }

    /// Pull this frame's state from `provider`. Controllers that disappeared
    /// are dropped; new ones start with a released previous state.
    pub fn poll(&mut self, provider: &mut dyn ControllerProvider) {
        let connected: BTreeMap<_, _> = provider.connected_controllers().into_iter().collect();

        self.controllers.retain(|id, _| connected.contains_key(id));
        for (id, state) in connected {
            self.controllers
                .entry(id)
                .and_modify(|controller| {
                    controller.previous = controller.current;
                    controller.current = state;
                })
                .or_insert_with(|| GameController::new(id, state));
        }
    }

    /// Controller in a slot, if connected
    pub fn get(&self, id: ControllerId) -> Option<&GameController> {
        self.controllers.get(&id)
    }

    /// Connected controllers in slot order
    pub fn iter(&self) -> impl Iterator<Item = &GameController> {
        self.controllers.values()
    }

    /// Connected slots in order
    pub fn ids(&self) -> Vec<ControllerId> {
        self.controllers.keys().copied().collect()
    }

    /// Number of connected controllers
    pub fn len(&self) -> usize {
        self.controllers.len()
    }

    /// Whether nothing is connected
    pub fn is_empty(&self) -> bool {
        self.controllers.is_empty()
    }

    /// Any controller holds Start
    pub fn any_start_held(&self) -> bool {
        self.iter().any(GameController::is_start_held)
    }

    /// Any controller pressed Start this frame
    pub fn any_start_pressed(&self) -> bool {
        self.iter().any(GameController::is_start_pressed)
    }
}

/// Controller provider driven by code, for tests and bots
#[derive(Debug, Clone, Default)]
pub struct ScriptedControllers {
    states: BTreeMap<ControllerId, ControllerState>,
}

impl ScriptedControllers {
    /// No controllers connected
    pub fn new() -> Self {
        Self::default()
    }

    /// Connect a controller with a neutral state
    pub fn connect(&mut self, id: ControllerId) {
        self.states.entry(id).or_default();
    }

    /// Disconnect a controller
    pub fn disconnect(&mut self, id: ControllerId) {
        self.states.remove(&id);
    }

    /// Set a controller's state, connecting it if needed
    pub fn set_state(&mut self, id: ControllerId, state: ControllerState) {
        self.states.insert(id, state);
    }

    /// Mutable state of a connected controller
    pub fn state_mut(&mut self, id: ControllerId) -> Option<&mut ControllerState> {
        self.states.get_mut(&id)
    }
}

impl ControllerProvider for ScriptedControllers {
    fn connected_controllers(&mut self) -> Vec<(ControllerId, ControllerState)> {
        self.states.iter().map(|(id, state)| (*id, *state)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pressing_start() -> ControllerState {
        ControllerState {
            start: true,
            ..ControllerState::default()
        }
    }

    #[test]
    fn test_start_press_is_edge_triggered() {
        let mut scripted = ScriptedControllers::new();
        scripted.set_state(ControllerId(0), pressing_start());

        let mut hub = ControllerHub::new();
        hub.poll(&mut scripted);
        assert!(hub.any_start_pressed());

        hub.poll(&mut scripted);
        assert!(hub.any_start_held());
        assert!(!hub.any_start_pressed());
    }

    #[test]
    fn test_trigger_edge() {
        let mut scripted = ScriptedControllers::new();
        let id = ControllerId(1);
        scripted.connect(id);

        let mut hub = ControllerHub::new();
        hub.poll(&mut scripted);
        scripted.state_mut(id).unwrap().right_trigger = 1.0;
        hub.poll(&mut scripted);
        assert!(hub.get(id).unwrap().is_trigger_pressed());

        hub.poll(&mut scripted);
        assert!(!hub.get(id).unwrap().is_trigger_pressed());
    }

    #[test]
    fn test_disconnect_drops_controller() {
        let mut scripted = ScriptedControllers::new();
        scripted.connect(ControllerId(0));
        scripted.connect(ControllerId(3));

        let mut hub = ControllerHub::new();
        hub.poll(&mut scripted);
        assert_eq!(hub.ids(), vec![ControllerId(0), ControllerId(3)]);

        scripted.disconnect(ControllerId(0));
        hub.poll(&mut scripted);
        assert_eq!(hub.ids(), vec![ControllerId(3)]);
    }

    #[test]
    fn test_deadzone() {
        let mut scripted = ScriptedControllers::new();
        let id = ControllerId(0);
        scripted.set_state(
            id,
            ControllerState {
                left_stick: Vec2::new(0.1, 0.0),
                right_stick: Vec2::new(0.0, 1.0),
                ..ControllerState::default()
            },
        );

        let mut hub = ControllerHub::new();
        hub.poll(&mut scripted);
        let controller = hub.get(id).unwrap();
        assert_eq!(controller.movement(), Vec2::zeros());
        assert_eq!(controller.aim(), Vec2::new(0.0, 1.0));
    }
}
