use std::time::{Duration, Instant};

use crate::puzzle::{Board, PuzzleError};

/// Lifecycle of one playthrough. `Won` is terminal until the next
/// [`Game::new_game`] or [`Game::restart`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameState {
    Unstarted,
    Shuffled,
    Playing,
    Won,
}

/// One game session: the live board, the retained shuffle layout (so a
/// restart replays the same puzzle without reshuffling), the move counter,
/// and the wall clock. The board engine itself knows nothing about any of
/// this; the session owns what the presentation layer needs to display.
#[derive(Debug, Clone)]
pub struct Game {
    board: Board,
    initial: Board,
    state: GameState,
    moves: u32,
    started_at: Option<Instant>,
    won_at: Option<Instant>,
}

impl Game {
    /// A session with no puzzle dealt yet; call [`Game::new_game`] to deal.
    pub fn new(size: usize) -> Self {
        let board = Board::solved(size);
        Self {
            initial: board.clone(),
            board,
            state: GameState::Unstarted,
            moves: 0,
            started_at: None,
            won_at: None,
        }
    }

    /// Starts a session from an explicit layout, retaining it as the
    /// restart point.
    pub fn with_layout(board: Board) -> Self {
        let mut game = Self::new(board.size());
        game.initial = board.clone();
        game.deal(board);
        game
    }

    /// Shuffles a fresh board and starts play on it.
    pub fn new_game(&mut self) -> Result<(), PuzzleError> {
        let board = Board::shuffled(self.board.size())?;
        self.initial = board.clone();
        self.deal(board);
        Ok(())
    }

    /// Replays the most recently dealt layout: same tiles, counter and
    /// clock reset.
    pub fn restart(&mut self) {
        self.deal(self.initial.clone());
    }

    fn deal(&mut self, board: Board) {
        self.board = board;
        self.state = GameState::Shuffled;
        self.moves = 0;
        self.started_at = Some(Instant::now());
        self.won_at = None;
    }

    /// Attempts to slide the tile at `tile_index` into the blank. Counts
    /// the move and rechecks the win condition only when the engine
    /// actually moved; illegal requests change nothing, including the
    /// counter.
    pub fn press(&mut self, tile_index: usize) -> bool {
        if matches!(self.state, GameState::Unstarted | GameState::Won) {
            return false;
        }
        if !self.board.try_move(tile_index) {
            return false;
        }
        self.moves += 1;
        if self.board.is_solved() {
            self.won_at = Some(Instant::now());
            self.state = GameState::Won;
        } else {
            self.state = GameState::Playing;
        }
        true
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn state(&self) -> GameState {
        self.state
    }

    pub fn moves(&self) -> u32 {
        self.moves
    }

    /// Time since the deal, frozen at the winning move.
    pub fn elapsed(&self) -> Duration {
        match self.started_at {
            None => Duration::ZERO,
            Some(start) => self
                .won_at
                .unwrap_or_else(Instant::now)
                .duration_since(start),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Solved except for the last tile, one slide away from winning.
    fn one_move_from_won() -> Board {
        Board::from_cells(
            4,
            vec![1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12, 13, 14, 0, 15],
        )
        .unwrap()
    }

    #[test]
    fn fresh_session_rejects_moves() {
        let mut game = Game::new(4);
        assert_eq!(game.state(), GameState::Unstarted);
        assert!(!game.press(14));
        assert_eq!(game.moves(), 0);
        assert_eq!(game.elapsed(), Duration::ZERO);
    }

    #[test]
    fn new_game_deals_a_solvable_shuffle() {
        let mut game = Game::new(4);
        game.new_game().unwrap();
        assert_eq!(game.state(), GameState::Shuffled);
        assert!(game.board().is_solvable());
        assert_eq!(game.moves(), 0);
    }

    #[test]
    fn first_successful_move_starts_play() {
        let mut game = Game::with_layout(one_move_from_won());
        assert_eq!(game.state(), GameState::Shuffled);

        // Illegal: tile 0 is nowhere near the blank at index 14.
        assert!(!game.press(0));
        assert_eq!(game.state(), GameState::Shuffled);
        assert_eq!(game.moves(), 0);

        // Legal but not winning: slide tile 14 (index 13) right.
        assert!(game.press(13));
        assert_eq!(game.state(), GameState::Playing);
        assert_eq!(game.moves(), 1);
    }

    #[test]
    fn winning_move_ends_the_session() {
        let mut game = Game::with_layout(one_move_from_won());
        assert!(game.press(15));
        assert_eq!(game.state(), GameState::Won);
        assert_eq!(game.moves(), 1);
        assert!(game.board().is_solved());

        // Terminal: further presses are ignored.
        assert!(!game.press(14));
        assert_eq!(game.moves(), 1);

        let frozen = game.elapsed();
        assert_eq!(game.elapsed(), frozen);
    }

    #[test]
    fn restart_replays_the_same_layout() {
        let layout = one_move_from_won();
        let mut game = Game::with_layout(layout.clone());
        assert!(game.press(13));
        assert_ne!(game.board(), &layout);

        game.restart();
        assert_eq!(game.board(), &layout);
        assert_eq!(game.state(), GameState::Shuffled);
        assert_eq!(game.moves(), 0);
    }

    #[test]
    fn restart_after_winning_reopens_the_session() {
        let mut game = Game::with_layout(one_move_from_won());
        assert!(game.press(15));
        assert_eq!(game.state(), GameState::Won);

        game.restart();
        assert_eq!(game.state(), GameState::Shuffled);
        assert!(game.press(15));
        assert_eq!(game.state(), GameState::Won);
    }

    #[test]
    fn move_counter_only_counts_real_moves() {
        let mut game = Game::with_layout(one_move_from_won());
        for _ in 0..5 {
            assert!(!game.press(0));
        }
        assert_eq!(game.moves(), 0);
        assert!(game.press(13));
        assert!(game.press(14));
        assert_eq!(game.moves(), 2);
    }
}
