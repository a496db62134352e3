//! AI decision layer: blackboard, behavior trees, lifecycle state machine

pub mod behavior_tree;
pub mod blackboard;
pub mod state_machine;
pub mod system;

pub use behavior_tree::{BehaviorNode, BehaviorStatus, BehaviorTree};
pub use blackboard::{Blackboard, BlackboardKind, BlackboardValue, Intent};
pub use state_machine::{AiState, State, StateHook, StateMachine};
pub use system::{AiComponent, AiSystem};
