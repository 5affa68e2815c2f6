#[cfg(test)]
pub mod test {
    use anyhow::Result;
    use std::thread;
    use std::time::Duration;

    use crate::arrayboard::ArrayBoard;
    use crate::eval::{is_loss, is_win, EvalWeights, Evaluator, Score, WIN_SCORE};
    use crate::lines::{lines_through, Direction, LINES, NUM_LINES};
    use crate::ordering::{Candidate, MoveSorter};
    use crate::tree::{Role, SearchTree};
    use crate::*;

    // plays pseudo-random games to the end, keeping every position along the way
    fn sample_positions(games: usize) -> Vec<ArrayBoard> {
        let mut positions = vec![];
        let mut seed: u64 = 0x2545_f491_4f6c_dd1d;
        for _ in 0..games {
            let mut board = ArrayBoard::new();
            positions.push(board.clone());
            while !board.is_game_over() {
                seed = seed
                    .wrapping_mul(6364136223846793005)
                    .wrapping_add(1442695040888963407);
                let column = (seed >> 33) as usize % WIDTH;
                if board.can_drop(column) {
                    board.drop_piece(column);
                    positions.push(board.clone());
                }
            }
        }
        positions
    }

    fn minimax<B: Board>(
        state: &B,
        level: usize,
        depth: usize,
        role: Role,
        evaluator: &Evaluator,
        perspective: Player,
    ) -> Score {
        if level == depth || state.is_game_over() {
            return evaluator.evaluate(state, perspective);
        }
        let mut value = role.worst();
        for child in MoveSorter::generate(state, role, evaluator, perspective) {
            let child_value = minimax(
                &child.state,
                level + 1,
                depth,
                role.opposite(),
                evaluator,
                perspective,
            );
            value = role.fold(value, child_value);
        }
        value
    }

    // unpruned search with the same ordering and tie-break as the solver
    fn reference_search<B: Board>(board: &B, depth: usize) -> (usize, Score) {
        let evaluator = Evaluator::default();
        let perspective = board.active_player();
        let scored: Vec<(usize, Score, Score)> =
            MoveSorter::generate(board, Role::Maximizing, &evaluator, perspective)
                .into_iter()
                .map(|child| {
                    let value = minimax(
                        &child.state,
                        1,
                        depth,
                        Role::Minimizing,
                        &evaluator,
                        perspective,
                    );
                    (child.column, child.eval, value)
                })
                .collect();

        let best_value = scored.iter().map(|&(_, _, value)| value).max().unwrap();
        let mut best: Option<(usize, Score)> = None;
        for &(column, eval, value) in scored.iter() {
            if value == best_value && best.map_or(true, |(_, best_eval)| eval > best_eval) {
                best = Some((column, eval));
            }
        }
        (best.unwrap().0, best_value)
    }

    #[test]
    pub fn line_table() {
        assert_eq!(NUM_LINES, 69);

        for line in LINES.iter() {
            for &(column, row) in line.cells.iter() {
                assert!(column < WIDTH && row < HEIGHT);
            }
        }
        for column in 0..WIDTH {
            for row in 0..HEIGHT {
                for &id in lines_through(column, row) {
                    assert!(LINES[id as usize].cells.contains(&(column, row)));
                }
            }
        }

        // a corner lies on one horizontal, one vertical and one diagonal line
        assert_eq!(lines_through(0, 0).len(), 3);
        assert_eq!(lines_through(3, 0).len(), 7);
        assert_eq!(lines_through(3, 3).len(), 13);

        let count = |direction: Direction| LINES.iter().filter(|l| l.direction == direction).count();
        assert_eq!(count(Direction::Horizontal), 24);
        assert_eq!(count(Direction::Vertical), 21);
        assert_eq!(count(Direction::DiagonalDown), 12);
        assert_eq!(count(Direction::DiagonalUp), 12);

        for line in LINES.iter() {
            match line.direction {
                Direction::Vertical => assert_eq!(line.weight, 1),
                _ => {
                    let row = line.centre_row().expect("line misses the centre column");
                    assert_eq!(line.weight, [1, 4, 3, 2, 1, 1][row]);
                }
            }
        }
    }

    #[test]
    pub fn diagonal_weights_follow_centre_column() -> Result<()> {
        let weight_of = |first: (usize, usize), last: (usize, usize)| {
            LINES
                .iter()
                .find(|l| l.cells[0] == first && l.cells[CONNECT - 1] == last)
                .map(|l| l.weight)
        };
        assert_eq!(weight_of((1, 3), (4, 0)), Some(4));
        assert_eq!(weight_of((1, 0), (4, 3)), Some(3));
        assert_eq!(weight_of((0, 0), (3, 3)), Some(2));
        assert_eq!(weight_of((0, 2), (3, 5)), Some(1));

        // three lines of weight 1 and the rising diagonal crossing the centre on row 2
        let board = ArrayBoard::from_moves("2")?;
        let evaluator = Evaluator::default();
        assert_eq!(evaluator.evaluate(&board, Player::One), 6);
        assert_eq!(evaluator.evaluate(&board, Player::Two), -6);
        Ok(())
    }

    #[test]
    pub fn empty_board_scores_zero() {
        let evaluator = Evaluator::default();
        let board = ArrayBoard::new();
        assert_eq!(evaluator.evaluate(&board, Player::One), 0);
        assert_eq!(evaluator.evaluate(&board, Player::Two), 0);
    }

    #[test]
    pub fn blocked_lines_counted_once() -> Result<()> {
        let evaluator = Evaluator::default();

        // a vertical line of three player 1 tiles in column 1
        let board = ArrayBoard::from_moves("121212")?;
        let blocked = evaluator.blocked_lines(&board);
        let touched = |column: usize, rows: std::ops::Range<usize>| -> Score {
            let mut ids: Vec<u8> = rows
                .flat_map(|row| lines_through(column, row).iter().copied())
                .collect();
            ids.sort_unstable();
            ids.dedup();
            ids.iter().map(|&id| evaluator.line_weight(id as usize)).sum()
        };
        assert_eq!(blocked.against(Player::Two), touched(0, 0..3));
        assert_eq!(blocked.against(Player::One), touched(1, 0..3));
        Ok(())
    }

    #[test]
    pub fn evaluation_bounds() {
        let evaluator = Evaluator::default();
        let total = evaluator.total_weight();

        for board in sample_positions(200) {
            let one = evaluator.evaluate(&board, Player::One);
            let two = evaluator.evaluate(&board, Player::Two);
            let blocked = evaluator.blocked_lines(&board);
            assert!(blocked.against(Player::One) <= total);
            assert!(blocked.against(Player::Two) <= total);

            match board.state() {
                GameState::Playing => {
                    for &score in [one, two].iter() {
                        assert!(!is_win(score) && !is_loss(score));
                        assert!(score.abs() <= total);
                    }
                    assert_eq!(one, -two);
                }
                GameState::Draw => assert_eq!((one, two), (0, 0)),
                GameState::Won(winner) => {
                    let pieces = board.pieces_played() as Score;
                    assert_eq!(evaluator.evaluate(&board, winner), WIN_SCORE - pieces);
                    assert_eq!(evaluator.evaluate(&board, winner.other()), -WIN_SCORE + pieces);
                }
            }
        }
    }

    #[test]
    pub fn heavier_weights_scale_scores() -> Result<()> {
        let board = ArrayBoard::from_moves("44")?;
        let plain = Evaluator::default();
        let doubled = Evaluator::new(EvalWeights {
            horizontal: 2,
            vertical: 2,
            diagonal: 2,
        });
        let blocked = plain.blocked_lines(&board);
        let blocked_doubled = doubled.blocked_lines(&board);
        assert_eq!(blocked_doubled.against(Player::One), 2 * blocked.against(Player::One));
        assert_eq!(blocked_doubled.against(Player::Two), 2 * blocked.against(Player::Two));
        Ok(())
    }

    #[test]
    pub fn move_ordering() -> Result<()> {
        let board = ArrayBoard::from_moves("4")?;
        let evaluator = Evaluator::default();

        let evals = |role| -> Vec<(usize, Score)> {
            MoveSorter::generate(&board, role, &evaluator, Player::Two)
                .into_iter()
                .map(|c| (c.column, c.eval))
                .collect()
        };
        let descending = evals(Role::Maximizing);
        let ascending = evals(Role::Minimizing);
        assert_eq!(descending.len(), WIDTH);

        for pair in descending.windows(2) {
            assert!(pair[0].1 > pair[1].1 || (pair[0].1 == pair[1].1 && pair[0].0 < pair[1].0));
        }
        for pair in ascending.windows(2) {
            assert!(pair[0].1 < pair[1].1 || (pair[0].1 == pair[1].1 && pair[0].0 < pair[1].0));
        }

        let mut sorter = MoveSorter::new(Role::Maximizing);
        for &(column, eval) in [(0, 5), (1, 9), (2, 5), (3, -1)].iter() {
            sorter.push(Candidate {
                column,
                state: board.clone(),
                eval,
            });
        }
        let order: Vec<usize> = sorter.into_iter().map(|c| c.column).collect();
        assert_eq!(order, vec![1, 0, 2, 3]);
        Ok(())
    }

    #[test]
    pub fn tie_break_prefers_static_eval() {
        let mut tree = SearchTree::new((), 0);
        for &(column, eval, value) in [(4, 3, 10), (2, 8, 10), (6, 8, 10), (0, 20, 5)].iter() {
            let id = tree.add_child(SearchTree::<()>::ROOT, column, (), eval);
            tree.node_mut(id).value = value;
        }
        tree.node_mut(SearchTree::<()>::ROOT).value = 10;

        assert_eq!(tree.best_column(), Some(2));
        for child in tree.children(SearchTree::<()>::ROOT) {
            assert_eq!(child.level, 1);
            assert_eq!(child.role, Role::Minimizing);
            assert_eq!(child.parent, Some(SearchTree::<()>::ROOT));
        }
    }

    #[test]
    pub fn pruning_matches_minimax() -> Result<()> {
        let mut solver = Solver::new();
        // root children share the root's window, so ties at the root value may be bounds
        for board in sample_positions(20)
            .into_iter()
            .filter(|board| !board.is_game_over())
        {
            for depth in 1..=5 {
                let selection = solver.search_depth(&board, depth)?;
                let (column, value) = reference_search(&board, depth);
                assert_eq!(
                    (selection.column, selection.value),
                    (column, value),
                    "position {} at depth {}",
                    board.moves(),
                    depth
                );
            }
        }
        Ok(())
    }

    #[test]
    pub fn takes_immediate_win() -> Result<()> {
        let board = ArrayBoard::from_moves("112233")?;
        let mut solver = Solver::new();
        for depth in 1..=5 {
            let selection = solver.search_depth(&board, depth)?;
            assert_eq!(selection.column, 3);
            assert_eq!(selection.value, WIN_SCORE - 7);
        }
        Ok(())
    }

    #[test]
    pub fn blocks_opponent_win() -> Result<()> {
        // player 1 threatens column 4 along the bottom row
        let board = ArrayBoard::from_moves("17273")?;
        let mut solver = Solver::new();
        for depth in 2..=5 {
            let selection = solver.search_depth(&board, depth)?;
            assert_eq!(selection.column, 3, "depth {}", depth);
            assert!(!is_loss(selection.value));
        }
        Ok(())
    }

    #[test]
    pub fn empty_board_opens_beside_centre() -> Result<()> {
        // columns 2 and 4 each touch a diagonal crossing the centre on row 1
        let mut solver = Solver::new();
        let selection = solver.search_depth(&ArrayBoard::new(), 1)?;
        assert_eq!(selection.column, 2);
        assert_eq!(selection.value, 8);
        Ok(())
    }

    #[test]
    pub fn stops_when_tree_exhausted() -> Result<()> {
        let board = ArrayBoard::from_moves("1112251743457252634171675527543732")?;
        let mut solver = Solver::new();
        let mut iterations = vec![];
        let selection = solver.solve(&board, |s| iterations.push(*s))?;

        assert!(selection.exhausted);
        assert!(selection.depth > selection.deepest_reached);
        assert_eq!(iterations.last(), Some(&selection));
        assert!(iterations[..iterations.len() - 1].iter().all(|s| !s.exhausted));

        for extra in 1..=3 {
            let deeper = solver.search_depth(&board, selection.depth + extra)?;
            assert_eq!(
                (deeper.column, deeper.value, deeper.deepest_reached),
                (selection.column, selection.value, selection.deepest_reached)
            );
        }
        Ok(())
    }

    #[test]
    pub fn cancellation_keeps_last_completed_iteration() -> Result<()> {
        let board = ArrayBoard::from_moves("4453")?;
        let config = SolverConfig {
            max_depth: Some(7),
            ..SolverConfig::default()
        };

        let mut iterations = vec![];
        Solver::with_config(config)?.solve(&board, |s| iterations.push(*s))?;
        assert_eq!(iterations.len(), 4);

        for pair in iterations.windows(2) {
            let (done, next) = (pair[0], pair[1]);
            let limits = [done.nodes + 1, done.nodes + (next.nodes - done.nodes) / 2];
            for &limit in limits.iter() {
                let mut solver = Solver::with_config(SolverConfig {
                    node_limit: Some(limit),
                    ..config
                })?;
                assert_eq!(solver.solve(&board, |_| {})?, done, "node limit {}", limit);
            }
        }
        Ok(())
    }

    #[test]
    pub fn minimum_depth_survives_cancellation() -> Result<()> {
        let board = ArrayBoard::from_moves("4453")?;
        let mut solver = Solver::new();
        solver.cancel_token().cancel();
        let selection = solver.solve(&board, |_| {})?;

        let expected = Solver::new().search_depth(&board, solver::MIN_DEPTH)?;
        assert_eq!(selection, expected);
        Ok(())
    }

    #[test]
    pub fn cancelled_from_another_thread() -> Result<()> {
        let cancel = CancelToken::new();
        let mut solver = Solver::new().with_cancel_token(cancel.clone());

        let timer = thread::spawn(move || {
            thread::sleep(Duration::from_millis(50));
            cancel.cancel();
        });
        let selection = solver.solve(&ArrayBoard::new(), |_| {})?;
        timer.join().unwrap();

        assert!(selection.column < WIDTH);
        assert!(selection.depth >= solver::MIN_DEPTH);
        assert!(solver.cancel_token().is_cancelled());
        Ok(())
    }

    #[test]
    pub fn rejects_finished_games() -> Result<()> {
        let board = ArrayBoard::from_moves("1212121")?;
        assert_eq!(board.state(), GameState::Won(Player::One));
        assert!(Solver::new().select_move(&board).is_err());
        assert!(Solver::new().search_depth(&board, 3).is_err());
        Ok(())
    }

    #[test]
    pub fn config_validation() {
        let zero = SolverConfig {
            min_depth: 0,
            ..SolverConfig::default()
        };
        assert!(Solver::with_config(zero).is_err());

        let inverted = SolverConfig {
            min_depth: 5,
            max_depth: Some(4),
            ..SolverConfig::default()
        };
        assert!(Solver::with_config(inverted).is_err());

        let fixed = SolverConfig {
            min_depth: 3,
            max_depth: Some(3),
            ..SolverConfig::default()
        };
        assert!(Solver::with_config(fixed).is_ok());
    }

    #[test]
    pub fn move_parsing() -> Result<()> {
        assert!(ArrayBoard::from_moves("0").is_err());
        assert!(ArrayBoard::from_moves("8").is_err());
        assert!(ArrayBoard::from_moves("4x").is_err());
        assert!(ArrayBoard::from_moves("1111111").is_err());
        assert!(ArrayBoard::from_moves("12121212").is_err());

        let board = ArrayBoard::from_moves("4453")?;
        assert_eq!(board.moves(), "4453");
        assert_eq!(board.pieces_played(), 4);
        assert_eq!(board.active_player(), Player::One);
        assert_eq!(board.column_height(3), 2);
        assert_eq!(board.cell(3, 0), Some(Player::One));
        assert_eq!(board.cell(3, 1), Some(Player::Two));
        assert_eq!(board.cell(0, 0), None);
        Ok(())
    }

    #[test]
    pub fn detects_diagonal_and_horizontal_wins() -> Result<()> {
        // rising diagonal for player 1 from column 1 to column 4
        let board = ArrayBoard::from_moves("12234334744")?;
        assert_eq!(board.state(), GameState::Won(Player::One));

        let board = ArrayBoard::from_moves("1727374")?;
        assert_eq!(board.state(), GameState::Won(Player::One));
        assert_eq!(board.winner(), Some(Player::One));
        Ok(())
    }
}
