//! HUD collaborator
//!
//! The score/wave line and the game-over panel live outside the canvas.
//! [`HudSync`] pushes only changes so the DOM is not rewritten every frame.

use crate::sim::{GamePhase, GameState};

/// Text and panel surface next to the canvas
pub trait Hud {
    fn set_info_text(&mut self, text: &str);
    fn show_game_over(&mut self, score: u64, wave: u32);
    fn hide_game_over(&mut self);
}

/// `Score: {score} Wave: {wave}`
pub fn info_text(state: &GameState) -> String {
    format!("Score: {} Wave: {}", state.score, state.wave.current_wave)
}

/// Tracks what the HUD currently shows
#[derive(Debug, Clone, Default)]
pub struct HudSync {
    info: Option<String>,
    game_over_shown: bool,
}

impl HudSync {
    pub fn sync(&mut self, state: &GameState, hud: &mut impl Hud) {
        let text = info_text(state);
        if self.info.as_deref() != Some(text.as_str()) {
            hud.set_info_text(&text);
            self.info = Some(text);
        }

        let game_over = state.phase == GamePhase::GameOver;
        if game_over != self.game_over_shown {
            if game_over {
                hud.show_game_over(state.score, state.wave.current_wave);
            } else {
                hud.hide_game_over();
            }
            self.game_over_shown = game_over;
        }
    }
}
