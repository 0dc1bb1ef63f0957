//! Tests for tic-tac-toe rules and the heuristic opponent over every reachable board.

use std::collections::HashSet;

use parlor_engine::{
    Board, HeuristicLineGame, LINES, MoveError, Player, Position, Square, TerminalStatus,
    TicTacToe, TicTacToeState, Variant, session_rng,
};

/// Parses a board written as nine characters: `X`, `O` or `.`.
fn board_of(cells: &str) -> Board {
    let mut squares = [Square::Empty; 9];
    for (i, c) in cells.chars().enumerate() {
        squares[i] = match c {
            'X' => Square::Occupied(Player::X),
            'O' => Square::Occupied(Player::O),
            _ => Square::Empty,
        };
    }
    Board::from_squares(squares)
}

/// Every state reachable from the empty board by legal play.
fn reachable_states() -> Vec<TicTacToeState> {
    let mut seen: HashSet<Board> = HashSet::new();
    let mut found = Vec::new();
    let mut stack = vec![TicTacToeState::new()];
    while let Some(state) = stack.pop() {
        if !seen.insert(state.board().clone()) {
            continue;
        }
        if !TicTacToe.check_terminal(&state).is_terminal() {
            for pos in state.board().empty_positions() {
                stack.push(TicTacToe.apply_move(&state, pos).expect("empty square"));
            }
        }
        found.push(state);
    }
    found
}

fn line_owner(board: &Board) -> Option<Player> {
    LINES.iter().find_map(|line| match board.get(line[0]) {
        Square::Occupied(p) if line.iter().all(|pos| board.get(*pos) == Square::Occupied(p)) => {
            Some(p)
        }
        _ => None,
    })
}

fn completing_moves(board: &Board, player: Player) -> Vec<Position> {
    board
        .empty_positions()
        .into_iter()
        .filter(|pos| {
            let mut squares = *board.squares();
            squares[pos.to_index()] = Square::Occupied(player);
            line_owner(&Board::from_squares(squares)) == Some(player)
        })
        .collect()
}

#[test]
fn test_reachable_state_count() {
    assert_eq!(reachable_states().len(), 5478);
}

#[test]
fn test_terminal_status_matches_lines_for_all_reachable_states() {
    for state in reachable_states() {
        let board = state.board();
        let expected = match line_owner(board) {
            Some(player) => TerminalStatus::Won(player),
            None if board.empty_positions().is_empty() => TerminalStatus::Drawn,
            None => TerminalStatus::Ongoing,
        };
        assert_eq!(TicTacToe.check_terminal(&state), expected, "board:\n{}", board);
    }
}

#[test]
fn test_occupied_square_rejection_is_idempotent() {
    for state in reachable_states() {
        if TicTacToe.check_terminal(&state).is_terminal() {
            continue;
        }
        for pos in Position::ALL {
            if state.board().is_empty(pos) {
                continue;
            }
            let before = state.clone();
            let result = TicTacToe.apply_move(&state, pos);
            assert!(matches!(result, Err(MoveError::OccupiedSlot(_))));
            assert_eq!(state, before);
        }
    }
}

#[test]
fn test_policy_wins_then_blocks_for_all_reachable_states() {
    let mut rng = session_rng(Some(11));
    for state in reachable_states() {
        if TicTacToe.check_terminal(&state).is_terminal() {
            continue;
        }
        let me = state.to_move();
        let board = state.board();
        let choice = HeuristicLineGame
            .choose_for(&state, me, &mut rng)
            .expect("ongoing board has an empty square");

        assert!(board.is_empty(choice), "picked occupied {} on\n{}", choice, board);

        let wins = completing_moves(board, me);
        let threats = completing_moves(board, me.opponent());
        if !wins.is_empty() {
            assert!(wins.contains(&choice), "missed win on\n{}", board);
        } else if !threats.is_empty() {
            assert!(threats.contains(&choice), "missed block on\n{}", board);
        }
    }
}

#[test]
fn test_scenario_first_reply_is_random_empty_square() {
    let state = TicTacToe
        .apply_move(&TicTacToeState::new(), Position::TopLeft)
        .unwrap();
    let pick = |seed| {
        HeuristicLineGame
            .choose_for(&state, Player::O, &mut session_rng(Some(seed)))
            .unwrap()
    };

    // No line to win or block, so the reply is the seeded draw over the
    // eight empty squares in index order.
    let first = pick(42);
    assert_eq!(first, Position::TopRight);
    assert!(state.board().is_empty(first));
    assert_eq!(pick(42), first, "same seed, same reply");
}

#[test]
fn test_scenario_completing_row_wins_immediately() {
    let state = TicTacToeState::from_board(board_of("XX.OO...."));
    assert_eq!(state.to_move(), Player::X);

    let state = TicTacToe.apply_move(&state, Position::TopRight).unwrap();
    assert_eq!(TicTacToe.check_terminal(&state), TerminalStatus::Won(Player::X));
    assert_eq!(TicTacToe.highlight(&state), vec![0, 1, 2]);
}

#[test]
fn test_scenario_full_board_without_line_is_drawn() {
    let state = TicTacToeState::from_board(board_of("XOXXOOOXX"));
    assert_eq!(TicTacToe.check_terminal(&state), TerminalStatus::Drawn);
}

#[test]
fn test_partial_board_without_line_is_ongoing() {
    let state = TicTacToeState::from_board(board_of("XOXOXO..."));
    assert_eq!(TicTacToe.check_terminal(&state), TerminalStatus::Ongoing);
}

#[test]
fn test_scenario_opponent_blocks_open_row() {
    let state = TicTacToeState::from_board(board_of("XX.O....."));
    assert_eq!(state.to_move(), Player::O);

    for seed in 0..20 {
        let choice = HeuristicLineGame
            .choose_for(&state, Player::O, &mut session_rng(Some(seed)))
            .unwrap();
        assert_eq!(choice, Position::TopRight);
    }
}

#[test]
fn test_first_line_in_order_is_highlighted() {
    // X completes the top row and the left column with one move.
    let state = TicTacToeState::from_board(board_of(".XXXOOXOO"));
    let state = TicTacToe.apply_move(&state, Position::TopLeft).unwrap();
    assert_eq!(TicTacToe.check_terminal(&state), TerminalStatus::Won(Player::X));
    assert_eq!(TicTacToe.highlight(&state), vec![0, 1, 2]);
}
