//! The game tree built by one search iteration
//!
//! Nodes live in an arena owned by the [`SearchTree`] and refer to each
//! other by index. A tree is built for a single depth and then dropped.

use crate::eval::{Score, INFINITY};

/// Index of a node within its [`SearchTree`]
pub type NodeId = usize;

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Role {
    Maximizing,
    Minimizing,
}

impl Role {
    pub fn opposite(self) -> Self {
        match self {
            Role::Maximizing => Role::Minimizing,
            Role::Minimizing => Role::Maximizing,
        }
    }

    /// Whether this side strictly prefers a score of `a` over `b`
    pub fn prefers(self, a: Score, b: Score) -> bool {
        match self {
            Role::Maximizing => a > b,
            Role::Minimizing => a < b,
        }
    }

    /// The starting value of a node before any child is folded in
    pub fn worst(self) -> Score {
        match self {
            Role::Maximizing => -INFINITY,
            Role::Minimizing => INFINITY,
        }
    }

    pub fn fold(self, running: Score, value: Score) -> Score {
        match self {
            Role::Maximizing => running.max(value),
            Role::Minimizing => running.min(value),
        }
    }
}

#[derive(Clone, Debug)]
pub struct SearchNode<B> {
    pub state: B,
    pub parent: Option<NodeId>,
    /// Children in the order they were searched
    pub children: Vec<NodeId>,
    /// Distance from the root
    pub level: usize,
    pub role: Role,
    pub static_eval: Score,
    /// Backed-up minimax value
    pub value: Score,
    /// The column played to reach this node, `None` at the root
    pub column: Option<usize>,
    /// The deepest level expanded anywhere below this node
    pub deepest_reached: usize,
}

pub struct SearchTree<B> {
    nodes: Vec<SearchNode<B>>,
}

impl<B> SearchTree<B> {
    pub const ROOT: NodeId = 0;

    /// Creates a tree holding only a maximizing root
    pub fn new(state: B, static_eval: Score) -> Self {
        Self {
            nodes: vec![SearchNode {
                state,
                parent: None,
                children: Vec::new(),
                level: 0,
                role: Role::Maximizing,
                static_eval,
                value: static_eval,
                column: None,
                deepest_reached: 0,
            }],
        }
    }

    /// Appends a child reached by playing `column` from `parent`
    pub fn add_child(&mut self, parent: NodeId, column: usize, state: B, static_eval: Score) -> NodeId {
        let id = self.nodes.len();
        let (level, role) = {
            let parent = &self.nodes[parent];
            (parent.level + 1, parent.role.opposite())
        };
        self.nodes.push(SearchNode {
            state,
            parent: Some(parent),
            children: Vec::new(),
            level,
            role,
            static_eval,
            value: static_eval,
            column: Some(column),
            deepest_reached: level,
        });
        self.nodes[parent].children.push(id);
        id
    }

    pub fn root(&self) -> &SearchNode<B> {
        &self.nodes[Self::ROOT]
    }

    pub fn node(&self, id: NodeId) -> &SearchNode<B> {
        &self.nodes[id]
    }

    pub fn node_mut(&mut self, id: NodeId) -> &mut SearchNode<B> {
        &mut self.nodes[id]
    }

    pub fn children(&self, id: NodeId) -> impl Iterator<Item = &SearchNode<B>> + '_ {
        self.nodes[id].children.iter().map(move |&child| &self.nodes[child])
    }

    /// Picks the move to play from an expanded root
    ///
    /// Among the root's children backing up the root's value, the one with
    /// the highest static evaluation wins, the earliest searched on a tie.
    pub fn best_column(&self) -> Option<usize> {
        let best_value = self.root().value;
        let mut best: Option<&SearchNode<B>> = None;
        for child in self.children(Self::ROOT) {
            if child.value != best_value {
                continue;
            }
            if best.map_or(true, |b| child.static_eval > b.static_eval) {
                best = Some(child);
            }
        }
        best.and_then(|child| child.column)
    }
}
