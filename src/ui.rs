use std::io::{self, Write};
use std::time::Duration;

use anyhow::Result;
use crossterm::{
    cursor::{Hide, MoveTo, Show},
    event::{self, Event, KeyCode},
    execute, queue,
    style::Print,
    terminal::{self, Clear, ClearType, EnterAlternateScreen, LeaveAlternateScreen},
};

use crate::game::{Game, GameState};
use crate::puzzle::BLANK;

/// Poll timeout for the event loop; redraws between keystrokes keep the
/// elapsed-time display ticking.
const TICK: Duration = Duration::from_millis(250);

/// Runs the interactive loop, restoring the terminal on the way out even
/// when the loop errors.
pub fn run(game: &mut Game) -> Result<()> {
    let mut stdout = io::stdout();
    terminal::enable_raw_mode()?;
    execute!(stdout, EnterAlternateScreen, Hide)?;
    let outcome = event_loop(game, &mut stdout);
    execute!(stdout, Show, LeaveAlternateScreen)?;
    terminal::disable_raw_mode()?;
    outcome
}

fn event_loop<W: Write>(game: &mut Game, out: &mut W) -> Result<()> {
    loop {
        draw(game, out)?;
        if !event::poll(TICK)? {
            continue;
        }
        if let Event::Key(key) = event::read()? {
            match key.code {
                KeyCode::Char('q') | KeyCode::Esc => return Ok(()),
                KeyCode::Char('n') => game.new_game()?,
                KeyCode::Char('r') => game.restart(),
                code => slide(game, code),
            }
        }
    }
}

/// Resolves an arrow key to the index of the tile it would push into the
/// blank: the up arrow slides the tile below the blank upward, and so on.
/// At a board edge there is no such tile and the key does nothing.
fn slide(game: &mut Game, code: KeyCode) {
    let board = game.board();
    let size = board.size();
    let blank = board.blank_index();
    let (row, col) = (blank / size, blank % size);
    let tile = match code {
        KeyCode::Up if row + 1 < size => blank + size,
        KeyCode::Down if row > 0 => blank - size,
        KeyCode::Left if col + 1 < size => blank + 1,
        KeyCode::Right if col > 0 => blank - 1,
        _ => return,
    };
    game.press(tile);
}

/// Projects the session onto the screen. State flows one way: nothing is
/// ever read back from the terminal.
fn draw<W: Write>(game: &Game, out: &mut W) -> Result<()> {
    queue!(out, Clear(ClearType::All), MoveTo(0, 0), Print("fifteen"))?;

    let board = game.board();
    let size = board.size();
    for row in 0..size {
        let mut line = String::new();
        for col in 0..size {
            let val = board.cells()[row * size + col];
            if val == BLANK {
                line.push_str("  · ");
            } else {
                line.push_str(&format!("{:>3} ", val));
            }
        }
        queue!(out, MoveTo(0, row as u16 + 2), Print(line))?;
    }

    let status = format!(
        "moves: {}   time: {}s",
        game.moves(),
        game.elapsed().as_secs()
    );
    queue!(out, MoveTo(0, size as u16 + 3), Print(status))?;

    let hint = match game.state() {
        GameState::Won => "solved!  n: new game   q: quit",
        _ => "arrows: slide   n: new game   r: restart   q: quit",
    };
    queue!(out, MoveTo(0, size as u16 + 4), Print(hint))?;

    out.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::puzzle::Board;

    fn near_solved_game() -> Game {
        Game::with_layout(
            Board::from_cells(
                4,
                vec![1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12, 13, 14, 0, 15],
            )
            .unwrap(),
        )
    }

    #[test]
    fn arrows_slide_the_neighboring_tile() {
        // Blank at index 14 (row 3, col 2).
        let mut game = near_solved_game();

        // Left pushes the tile right of the blank (index 15) leftward.
        slide(&mut game, KeyCode::Left);
        assert_eq!(game.board().blank_index(), 15);
        assert!(game.board().is_solved());
    }

    #[test]
    fn arrows_at_the_edge_do_nothing() {
        let mut game = near_solved_game();
        // Blank is on the bottom row: no tile below it to push up.
        slide(&mut game, KeyCode::Up);
        assert_eq!(game.board().blank_index(), 14);
        assert_eq!(game.moves(), 0);
    }

    #[test]
    fn draw_renders_without_touching_state() {
        let game = near_solved_game();
        let mut buf: Vec<u8> = Vec::new();
        draw(&game, &mut buf).unwrap();
        let screen = String::from_utf8(buf).unwrap();
        assert!(screen.contains("moves: 0"));
        assert!(screen.contains("13"));
        assert_eq!(game.moves(), 0);
    }
}
