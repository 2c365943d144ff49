//! A terminal 15-puzzle.
//!
//! [`puzzle`] holds the board engine: representation, shuffle with a
//! solvability guarantee, move validation, and win detection, all pure
//! computation over an explicit board. [`game`] layers one session's
//! state on top (move counter, clock, restart layout), and [`ui`] draws
//! it with crossterm.

pub mod game;
pub mod puzzle;
pub mod ui;
