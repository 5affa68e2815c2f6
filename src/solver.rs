//! An agent to choose moves in Connect 4 under a time limit

use anyhow::{anyhow, Result};
use tracing::{debug, info, trace, warn};

use crate::board::{Board, Player};
use crate::cancel::CancelToken;
use crate::eval::{EvalWeights, Evaluator, Score, INFINITY};
use crate::ordering::MoveSorter;
use crate::tree::{NodeId, Role, SearchTree};
use crate::WIDTH;

/// The depth of the first search iteration
pub const MIN_DEPTH: usize = 4;

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct SolverConfig {
    /// Depth of the first iteration, which always runs to completion
    pub min_depth: usize,
    /// Stop deepening after this depth, `None` to search until cancelled or exhausted
    pub max_depth: Option<usize>,
    /// Treat the search as cancelled once this many nodes have been created
    pub node_limit: Option<usize>,
    pub weights: EvalWeights,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            min_depth: MIN_DEPTH,
            max_depth: None,
            node_limit: None,
            weights: EvalWeights::default(),
        }
    }
}

/// The outcome of one completed search iteration
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct Selection {
    /// The zero-indexed column to play
    pub column: usize,
    /// The backed-up value of the root
    pub value: Score,
    /// The depth this iteration searched to
    pub depth: usize,
    /// The deepest level any expanded line actually reached
    pub deepest_reached: usize,
    /// Every expanded line ended the game before `depth`, so deeper searches change nothing
    pub exhausted: bool,
    /// Nodes created by the current search so far
    pub nodes: usize,
}

// an iteration abandoned because the search was told to stop
struct Interrupted;

/// An agent choosing Connect 4 moves with iterative-deepening alpha-beta search
///
/// # Notes
/// Each iteration builds a fresh game tree to the current depth, scoring the
/// leaves with the blocked-lines heuristic from the point of view of the
/// player to move at the root. The answer of the last fully completed
/// iteration is kept whenever the search is cancelled.
pub struct Solver {
    config: SolverConfig,
    evaluator: Evaluator,
    cancel: CancelToken,

    /// The number of nodes created by this `Solver` so far (for diagnostics only)
    pub node_count: usize,
}

impl Solver {
    /// Creates a new `Solver` with the default configuration
    pub fn new() -> Self {
        let config = SolverConfig::default();
        Self {
            config,
            evaluator: Evaluator::new(config.weights),
            cancel: CancelToken::new(),
            node_count: 0,
        }
    }

    /// Creates a new `Solver` with the given configuration
    pub fn with_config(config: SolverConfig) -> Result<Self> {
        if config.min_depth == 0 {
            return Err(anyhow!("minimum search depth must be at least 1"));
        }
        if let Some(max_depth) = config.max_depth {
            if max_depth < config.min_depth {
                return Err(anyhow!(
                    "maximum search depth {} is below the minimum depth {}",
                    max_depth,
                    config.min_depth
                ));
            }
        }
        Ok(Self {
            config,
            evaluator: Evaluator::new(config.weights),
            cancel: CancelToken::new(),
            node_count: 0,
        })
    }

    /// Replaces the cancellation token polled by this `Solver`
    pub fn with_cancel_token(mut self, cancel: CancelToken) -> Self {
        self.cancel = cancel;
        self
    }

    /// A handle to this `Solver`'s cancellation token
    pub fn cancel_token(&self) -> CancelToken {
        self.cancel.clone()
    }

    /// Returns the best column found before cancellation
    pub fn select_move<B: Board>(&mut self, board: &B) -> Result<usize> {
        Ok(self.solve(board, |_| {})?.column)
    }

    /// Runs the iterative deepening search, calling `on_iteration` after each completed depth
    ///
    /// The first iteration is searched to completion regardless of the
    /// cancellation token, so a playable position always yields a move.
    pub fn solve<B, F>(&mut self, board: &B, mut on_iteration: F) -> Result<Selection>
    where
        B: Board,
        F: FnMut(&Selection),
    {
        check_playable(board)?;

        let start = self.node_count;
        let mut completed: Option<Selection> = None;
        let mut depth = self.config.min_depth;

        loop {
            let interruptible = completed.is_some();
            if interruptible && self.stopped(start) {
                info!(depth, "search stopped before starting iteration");
                break;
            }

            match self.iterate(board, depth, start, interruptible) {
                Err(Interrupted) => {
                    info!(depth, "search stopped mid-iteration, keeping previous result");
                    break;
                }
                Ok(None) => {
                    warn!(depth, "iteration produced no move");
                    break;
                }
                Ok(Some(selection)) => {
                    debug!(
                        depth,
                        column = selection.column,
                        value = selection.value,
                        deepest = selection.deepest_reached,
                        nodes = selection.nodes,
                        "iteration complete"
                    );
                    on_iteration(&selection);
                    completed = Some(selection);

                    if selection.exhausted {
                        info!(
                            depth,
                            deepest = selection.deepest_reached,
                            "game tree exhausted"
                        );
                        break;
                    }
                    if self.config.max_depth.map_or(false, |max| depth >= max) {
                        break;
                    }
                    depth += 1;
                }
            }
        }

        completed.ok_or_else(|| anyhow!("search produced no move"))
    }

    /// Searches exactly one iteration to `depth`, ignoring cancellation
    pub fn search_depth<B: Board>(&mut self, board: &B, depth: usize) -> Result<Selection> {
        check_playable(board)?;
        if depth == 0 {
            return Err(anyhow!("search depth must be at least 1"));
        }
        let start = self.node_count;
        match self.iterate(board, depth, start, false) {
            Ok(Some(selection)) => Ok(selection),
            Ok(None) | Err(Interrupted) => Err(anyhow!("search produced no move")),
        }
    }

    fn stopped(&self, start: usize) -> bool {
        self.cancel.is_cancelled()
            || self
                .config
                .node_limit
                .map_or(false, |limit| self.node_count - start >= limit)
    }

    fn iterate<B: Board>(
        &mut self,
        board: &B,
        depth: usize,
        start: usize,
        interruptible: bool,
    ) -> Result<Option<Selection>, Interrupted> {
        let mut search = Search {
            evaluator: self.evaluator,
            perspective: board.active_player(),
            target_depth: depth,
            cancel: &self.cancel,
            node_budget_end: self.config.node_limit.map(|limit| start + limit),
            interruptible,
            nodes: self.node_count,
        };
        let result = search.run(board);
        self.node_count = search.nodes;
        let nodes = self.node_count - start;

        result.map(|found| {
            found.map(|(column, value, deepest_reached)| Selection {
                column,
                value,
                depth,
                deepest_reached,
                exhausted: depth > deepest_reached,
                nodes,
            })
        })
    }
}

impl Default for Solver {
    fn default() -> Self {
        Self::new()
    }
}

fn check_playable<B: Board>(board: &B) -> Result<()> {
    if board.is_game_over() {
        return Err(anyhow!("Invalid position, game is over"));
    }
    if !(0..WIDTH).any(|column| board.can_drop(column)) {
        return Err(anyhow!("Invalid position, no playable columns"));
    }
    Ok(())
}

/// State of a single fixed-depth iteration
struct Search<'a> {
    evaluator: Evaluator,
    perspective: Player,
    target_depth: usize,
    cancel: &'a CancelToken,
    node_budget_end: Option<usize>,
    interruptible: bool,
    nodes: usize,
}

impl<'a> Search<'a> {
    fn stopped(&self) -> bool {
        self.interruptible
            && (self.cancel.is_cancelled()
                || self.node_budget_end.map_or(false, |end| self.nodes >= end))
    }

    /// Builds and expands a fresh tree, returning the chosen column, root value and deepest level
    fn run<B: Board>(&mut self, board: &B) -> Result<Option<(usize, Score, usize)>, Interrupted> {
        let mut tree = SearchTree::new(board.clone(), self.evaluator.evaluate(board, self.perspective));
        self.nodes += 1;
        if self.stopped() {
            return Err(Interrupted);
        }

        self.expand(&mut tree, SearchTree::<B>::ROOT, -INFINITY, INFINITY)?;
        if self.stopped() {
            return Err(Interrupted);
        }

        for child in tree.children(SearchTree::<B>::ROOT) {
            trace!(
                column = ?child.column,
                eval = child.static_eval,
                value = child.value,
                "root move"
            );
        }

        let column = tree.best_column();
        if self.stopped() {
            return Err(Interrupted);
        }

        let root = tree.root();
        Ok(column.map(|column| (column, root.value, root.deepest_reached)))
    }

    /// Expands `id` to the target depth with fail-hard alpha-beta pruning
    fn expand<B: Board>(
        &mut self,
        tree: &mut SearchTree<B>,
        id: NodeId,
        mut alpha: Score,
        mut beta: Score,
    ) -> Result<(), Interrupted> {
        let (level, role) = {
            let node = tree.node(id);
            (node.level, node.role)
        };

        if level == self.target_depth || tree.node(id).state.is_game_over() {
            make_leaf(tree, id);
            return Ok(());
        }

        let moves = MoveSorter::generate(&tree.node(id).state, role, &self.evaluator, self.perspective);
        if moves.is_empty() {
            debug_assert!(false, "position in play with no legal columns");
            make_leaf(tree, id);
            return Ok(());
        }
        let mut children = Vec::with_capacity(moves.len());
        for candidate in moves {
            children.push(tree.add_child(id, candidate.column, candidate.state, candidate.eval));
            self.nodes += 1;
        }

        let mut value = role.worst();
        let mut deepest = level;
        for child in children {
            if self.stopped() {
                return Err(Interrupted);
            }
            self.expand(tree, child, alpha, beta)?;
            if self.stopped() {
                return Err(Interrupted);
            }

            let child = tree.node(child);
            deepest = deepest.max(child.deepest_reached);
            value = role.fold(value, child.value);

            match role {
                Role::Maximizing => {
                    if value >= beta {
                        break;
                    }
                    alpha = alpha.max(value);
                }
                Role::Minimizing => {
                    if value <= alpha {
                        break;
                    }
                    beta = beta.min(value);
                }
            }
        }

        let node = tree.node_mut(id);
        node.value = value;
        node.deepest_reached = deepest;
        Ok(())
    }
}

fn make_leaf<B>(tree: &mut SearchTree<B>, id: NodeId) {
    let node = tree.node_mut(id);
    node.value = node.static_eval;
    node.deepest_reached = node.level;
}
