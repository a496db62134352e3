//! Per-entity lifecycle state machine
//!
//! Transitions are driven from outside (the AI decision layer); the machine
//! itself never times out or changes state on its own.

use std::collections::VecDeque;

use ahash::AHashMap;

/// Closed set of lifecycle states
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum AiState {
    #[default]
    Idle,
    Move,
    Attack,
    Flee,
    Gather,
    Build,
    Die,
}

impl AiState {
    pub const ALL: [AiState; 7] = [
        AiState::Idle,
        AiState::Move,
        AiState::Attack,
        AiState::Flee,
        AiState::Gather,
        AiState::Build,
        AiState::Die,
    ];

    /// Die is the only state a unit is not expected to leave
    pub fn is_terminal(&self) -> bool {
        matches!(self, AiState::Die)
    }
}

/// Observed hook invocation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StateHook {
    Entered(AiState),
    Exited(AiState),
}

const JOURNAL_LEN: usize = 32;

#[derive(Debug, Clone, PartialEq)]
pub struct State {
    kind: AiState,
    time_in_state: f32,
    times_entered: u32,
}

impl State {
    pub fn new(kind: AiState) -> Self {
        Self {
            kind,
            time_in_state: 0.0,
            times_entered: 0,
        }
    }

    pub fn kind(&self) -> AiState {
        self.kind
    }

    /// Seconds since the state was last entered
    pub fn time_in_state(&self) -> f32 {
        self.time_in_state
    }

    pub fn times_entered(&self) -> u32 {
        self.times_entered
    }

    fn enter(&mut self) {
        self.time_in_state = 0.0;
        self.times_entered += 1;
        match self.kind {
            AiState::Die => tracing::debug!("Entering terminal state"),
            AiState::Idle
            | AiState::Move
            | AiState::Attack
            | AiState::Flee
            | AiState::Gather
            | AiState::Build => {}
        }
    }

    fn update(&mut self, dt: f32) {
        // Dead units stop accruing time so corpses don't age
        match self.kind {
            AiState::Die => {}
            AiState::Idle
            | AiState::Move
            | AiState::Attack
            | AiState::Flee
            | AiState::Gather
            | AiState::Build => self.time_in_state += dt,
        }
    }

    fn exit(&mut self) {}
}

#[derive(Debug, Clone, Default)]
pub struct StateMachine {
    states: AHashMap<AiState, State>,
    current: Option<AiState>,
    active: bool,
    state_changed: bool,
    journal: VecDeque<StateHook>,
}

impl StateMachine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Machine with every state registered, starting in Idle
    pub fn with_all_states() -> Self {
        let mut machine = Self::new();
        for kind in AiState::ALL {
            machine.add_state(State::new(kind));
        }
        machine
    }

    /// Register a state. The first state ever added becomes current and is
    /// entered immediately.
    pub fn add_state(&mut self, state: State) {
        let kind = state.kind();
        self.states.insert(kind, state);

        if self.current.is_none() {
            self.current = Some(kind);
            self.active = true;
            self.enter(kind);
        }
    }

    pub fn has_state(&self, kind: AiState) -> bool {
        self.states.contains_key(&kind)
    }

    /// Transition to `target`.
    ///
    /// A target that was never registered still exits the current state, but
    /// nothing is entered: the machine keeps reporting the old kind with no
    /// active state, and asking for that old kind again is a no-op.
    pub fn change_state(&mut self, target: AiState) {
        if self.current == Some(target) {
            return;
        }

        if let Some(current) = self.current {
            if self.active {
                self.exit(current);
                self.active = false;
            }
        }

        if self.states.contains_key(&target) {
            tracing::debug!("State {:?} -> {:?}", self.current, target);
            self.current = Some(target);
            self.active = true;
            self.state_changed = true;
            self.enter(target);
        } else {
            tracing::warn!(
                "Transition to unregistered state {:?}; machine left with no active state",
                target
            );
        }
    }

    /// Forward to the active state's update hook
    pub fn update(&mut self, dt: f32) {
        if !self.active {
            return;
        }
        if let Some(state) = self.current.and_then(|kind| self.states.get_mut(&kind)) {
            state.update(dt);
        }
    }

    /// Current kind; Idle for a machine with no states yet
    pub fn current_state(&self) -> AiState {
        self.current.unwrap_or_default()
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn current_state_object(&self) -> Option<&State> {
        if !self.active {
            return None;
        }
        self.current.and_then(|kind| self.states.get(&kind))
    }

    /// Returns whether a transition happened since the last call, and resets it
    pub fn take_state_changed(&mut self) -> bool {
        std::mem::take(&mut self.state_changed)
    }

    /// Most recent enter/exit hooks, oldest first
    pub fn journal(&self) -> impl Iterator<Item = &StateHook> + '_ {
        self.journal.iter()
    }

    pub fn clear_journal(&mut self) {
        self.journal.clear();
    }

    fn enter(&mut self, kind: AiState) {
        if let Some(state) = self.states.get_mut(&kind) {
            state.enter();
            self.record(StateHook::Entered(kind));
        }
    }

    fn exit(&mut self, kind: AiState) {
        if let Some(state) = self.states.get_mut(&kind) {
            state.exit();
            self.record(StateHook::Exited(kind));
        }
    }

    fn record(&mut self, hook: StateHook) {
        if self.journal.len() == JOURNAL_LEN {
            self.journal.pop_front();
        }
        self.journal.push_back(hook);
    }
}
