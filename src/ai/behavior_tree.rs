//! Behavior trees: Selector / Sequence composites over Condition / Action leaves
//!
//! The tree is re-walked from the root on every [`BehaviorTree::update`].
//! There is no running-node cursor, so a node that returns
//! [`BehaviorStatus::Running`] must be able to tell from the blackboard alone
//! where it left off. Leaf closures are `Fn`, which keeps node-local mutable
//! state out of the tree.

use std::fmt;

use crate::ai::blackboard::Blackboard;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BehaviorStatus {
    Running,
    Success,
    Failure,
}

pub type ConditionFn = Box<dyn Fn(&Blackboard) -> bool>;
pub type ActionFn = Box<dyn Fn(&mut Blackboard) -> BehaviorStatus>;

pub enum BehaviorNode {
    /// "Try until one works": first Success or Running wins
    Selector(Vec<BehaviorNode>),
    /// "All must work": first Failure or Running stops
    Sequence(Vec<BehaviorNode>),
    Condition(ConditionFn),
    Action(ActionFn),
}

impl BehaviorNode {
    pub fn selector(children: Vec<BehaviorNode>) -> Self {
        BehaviorNode::Selector(children)
    }

    pub fn sequence(children: Vec<BehaviorNode>) -> Self {
        BehaviorNode::Sequence(children)
    }

    pub fn condition(predicate: impl Fn(&Blackboard) -> bool + 'static) -> Self {
        BehaviorNode::Condition(Box::new(predicate))
    }

    pub fn action(action: impl Fn(&mut Blackboard) -> BehaviorStatus + 'static) -> Self {
        BehaviorNode::Action(Box::new(action))
    }

    /// Append a child to a composite. Leaves have no children; returns false.
    pub fn add_child(&mut self, child: BehaviorNode) -> bool {
        match self {
            BehaviorNode::Selector(children) | BehaviorNode::Sequence(children) => {
                children.push(child);
                true
            }
            BehaviorNode::Condition(_) | BehaviorNode::Action(_) => false,
        }
    }

    pub fn children(&self) -> &[BehaviorNode] {
        match self {
            BehaviorNode::Selector(children) | BehaviorNode::Sequence(children) => children,
            BehaviorNode::Condition(_) | BehaviorNode::Action(_) => &[],
        }
    }

    pub fn execute(&self, blackboard: &mut Blackboard) -> BehaviorStatus {
        match self {
            BehaviorNode::Selector(children) => {
                for child in children {
                    let status = child.execute(blackboard);
                    if status != BehaviorStatus::Failure {
                        return status;
                    }
                }
                BehaviorStatus::Failure
            }
            BehaviorNode::Sequence(children) => {
                for child in children {
                    let status = child.execute(blackboard);
                    if status != BehaviorStatus::Success {
                        return status;
                    }
                }
                BehaviorStatus::Success
            }
            BehaviorNode::Condition(predicate) => {
                if predicate(blackboard) {
                    BehaviorStatus::Success
                } else {
                    BehaviorStatus::Failure
                }
            }
            BehaviorNode::Action(action) => action(blackboard),
        }
    }

    /// Total number of nodes in this subtree, including self
    pub fn node_count(&self) -> usize {
        1 + self.children().iter().map(BehaviorNode::node_count).sum::<usize>()
    }
}

impl fmt::Debug for BehaviorNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BehaviorNode::Selector(children) => f.debug_tuple("Selector").field(children).finish(),
            BehaviorNode::Sequence(children) => f.debug_tuple("Sequence").field(children).finish(),
            BehaviorNode::Condition(_) => f.write_str("Condition"),
            BehaviorNode::Action(_) => f.write_str("Action"),
        }
    }
}

/// Root holder; an empty tree always fails
#[derive(Debug, Default)]
pub struct BehaviorTree {
    root: Option<BehaviorNode>,
}

impl BehaviorTree {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_root(root: BehaviorNode) -> Self {
        Self { root: Some(root) }
    }

    pub fn set_root(&mut self, root: BehaviorNode) {
        self.root = Some(root);
    }

    pub fn root(&self) -> Option<&BehaviorNode> {
        self.root.as_ref()
    }

    pub fn update(&self, blackboard: &mut Blackboard) -> BehaviorStatus {
        match &self.root {
            Some(root) => root.execute(blackboard),
            None => BehaviorStatus::Failure,
        }
    }
}
