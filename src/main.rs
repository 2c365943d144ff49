use anyhow::Result;
use fifteen::game::Game;
use fifteen::ui;

const BOARD_SIZE: usize = 4;

fn main() -> Result<()> {
    let mut game = Game::new(BOARD_SIZE);
    game.new_game()?;
    ui::run(&mut game)
}
