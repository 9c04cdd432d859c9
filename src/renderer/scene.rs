//! Frame composition
//!
//! Draws the world and overlays for the current phase. Reads `GameState`
//! only; never mutates it.

use std::f32::consts::FRAC_PI_2;

use glam::Vec2;

use super::{Canvas, Color, TextAlign};
use crate::sim::{Bullet, DamageNumber, Enemy, GamePhase, GameState, Player};

const HEALTH_BAR_SIZE: Vec2 = Vec2::new(60.0, 10.0);
const HEALTH_BAR_OFFSET: f32 = 20.0;
/// Invincible player blinks in slices of this many ms of simulation time
const FLASH_INTERVAL_MS: f64 = 100.0;
const FPS_WINDOW: usize = 60;

/// Draw one complete frame. `debug_fps` enables the diagnostic overlay.
pub fn draw_frame(canvas: &mut impl Canvas, state: &GameState, debug_fps: Option<u32>) {
    let size = canvas.size();
    canvas.clear_rect(Vec2::ZERO, size);
    let center = size / 2.0;

    match state.phase {
        GamePhase::Title => {
            draw_title(canvas, state, center);
            return;
        }
        GamePhase::Playing if state.wave.cooldown_active => {
            draw_wave_banner(canvas, state.wave.current_wave, center);
        }
        GamePhase::Playing | GamePhase::GameOver => draw_world(canvas, state),
        GamePhase::Paused => {
            draw_world(canvas, state);
            canvas.fill_text("Paused", center, 48, TextAlign::Center, Color::WHITE);
        }
    }

    if let Some(fps) = debug_fps {
        draw_debug(canvas, state, fps);
    }
}

fn draw_title(canvas: &mut impl Canvas, state: &GameState, center: Vec2) {
    canvas.fill_text(
        "Press Enter to Start",
        center,
        30,
        TextAlign::Center,
        Color::WHITE,
    );
    let previous = format!("Previous Score: {}", state.previous_score.unwrap_or(0));
    canvas.fill_text(
        &previous,
        center + Vec2::new(0.0, 40.0),
        30,
        TextAlign::Center,
        Color::WHITE,
    );
}

fn draw_wave_banner(canvas: &mut impl Canvas, wave: u32, center: Vec2) {
    let title = format!("Wave {} Complete!", wave);
    canvas.fill_text(&title, center, 48, TextAlign::Center, Color::WHITE);
    canvas.fill_text(
        "Next wave starting soon...",
        center + Vec2::new(0.0, 50.0),
        24,
        TextAlign::Center,
        Color::WHITE,
    );
}

fn draw_world(canvas: &mut impl Canvas, state: &GameState) {
    if !player_hidden(&state.player, state.now_ms()) {
        draw_player(canvas, &state.player);
    }
    for bullet in state.bullets.iter().filter(|b| !b.is_destroyed()) {
        draw_bullet(canvas, bullet);
    }
    for enemy in state.enemies.iter().filter(|e| !e.is_destroyed()) {
        canvas.fill_rect(enemy.pos, Vec2::splat(enemy.size()), Color(enemy.stats.color));
    }
    for number in state.damage_numbers.iter().filter(|d| !d.is_destroyed()) {
        draw_damage_number(canvas, number);
    }
}

/// Off-phase of the invincibility blink
fn player_hidden(player: &Player, now_ms: f64) -> bool {
    player.invincible && (now_ms / FLASH_INTERVAL_MS).floor() as u64 % 2 == 0
}

fn draw_player(canvas: &mut impl Canvas, player: &Player) {
    let bar_pos = Vec2::new(
        player.pos.x + player.size / 2.0 - HEALTH_BAR_SIZE.x / 2.0,
        player.pos.y - HEALTH_BAR_OFFSET,
    );
    let pct = (player.health / player.max_health).clamp(0.0, 1.0);
    canvas.fill_rect(bar_pos, HEALTH_BAR_SIZE, Color::RED);
    canvas.fill_rect(
        bar_pos,
        Vec2::new(HEALTH_BAR_SIZE.x * pct, HEALTH_BAR_SIZE.y),
        Color::GREEN,
    );

    // Triangle pointing along the aim direction
    let half = player.size / 2.0;
    canvas.save();
    canvas.translate(player.center());
    canvas.rotate(player.aim.y.atan2(player.aim.x) + FRAC_PI_2);
    canvas.fill_path(
        &[
            Vec2::new(0.0, -half),
            Vec2::new(half, half),
            Vec2::new(-half, half),
        ],
        Color::PLAYER,
    );
    canvas.restore();
}

fn draw_bullet(canvas: &mut impl Canvas, bullet: &Bullet) {
    let color = if bullet.fired_by_player {
        Color::YELLOW
    } else {
        Color::RED
    };
    canvas.fill_rect(bullet.pos, Vec2::splat(bullet.size), color);
}

fn draw_damage_number(canvas: &mut impl Canvas, number: &DamageNumber) {
    canvas.save();
    canvas.set_alpha(number.opacity);
    canvas.fill_text(
        &number.value.to_string(),
        number.pos,
        20,
        TextAlign::Left,
        Color::WHITE,
    );
    canvas.restore();
}

fn draw_debug(canvas: &mut impl Canvas, state: &GameState, fps: u32) {
    canvas.fill_text(
        &format!("FPS: {}", fps),
        Vec2::new(10.0, 20.0),
        14,
        TextAlign::Left,
        Color::DEBUG,
    );

    let player = &state.player;
    canvas.stroke_rect(player.pos, Vec2::splat(player.size), Color::DEBUG);
    for bullet in state.bullets.iter().filter(|b| !b.is_destroyed()) {
        canvas.stroke_rect(bullet.pos, Vec2::splat(bullet.size), Color::DEBUG);
    }
    for enemy in state.enemies.iter().filter(|e| !e.is_destroyed()) {
        draw_enemy_debug(canvas, enemy);
    }
}

fn draw_enemy_debug(canvas: &mut impl Canvas, enemy: &Enemy) {
    canvas.stroke_rect(enemy.pos, Vec2::splat(enemy.size()), Color::DEBUG);
    canvas.fill_text(
        &format!("{:.0}", enemy.health),
        enemy.pos - Vec2::new(0.0, 4.0),
        12,
        TextAlign::Left,
        Color::DEBUG,
    );
}

/// Rolling frame-rate estimate over the last 60 frames
#[derive(Debug, Clone)]
pub struct FpsCounter {
    frame_times: [f64; FPS_WINDOW],
    frame_index: usize,
    fps: u32,
}

impl Default for FpsCounter {
    fn default() -> Self {
        Self {
            frame_times: [0.0; FPS_WINDOW],
            frame_index: 0,
            fps: 0,
        }
    }
}

impl FpsCounter {
    /// Record a frame at `time_ms` and return the current estimate
    pub fn record(&mut self, time_ms: f64) -> u32 {
        self.frame_times[self.frame_index] = time_ms;
        self.frame_index = (self.frame_index + 1) % FPS_WINDOW;

        // Slot after the newest holds the oldest sample
        let oldest = self.frame_times[self.frame_index];
        if oldest > 0.0 {
            let elapsed = time_ms - oldest;
            if elapsed > 0.0 {
                self.fps = ((FPS_WINDOW - 1) as f64 * 1000.0 / elapsed).round() as u32;
            }
        }
        self.fps
    }

    pub fn fps(&self) -> u32 {
        self.fps
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::{EnemyKind, scaled_stats};

    #[derive(Debug, Clone, PartialEq)]
    enum Call {
        Clear,
        Rect(Vec2, Vec2, Color),
        Stroke(Vec2, Vec2),
        Path(Vec<Vec2>, Color),
        Text(String, TextAlign),
        Save,
        Restore,
        Alpha(f32),
        Translate(Vec2),
        Rotate(f32),
    }

    #[derive(Default)]
    struct Recorder {
        calls: Vec<Call>,
    }

    impl Recorder {
        fn texts(&self) -> Vec<&str> {
            self.calls
                .iter()
                .filter_map(|c| match c {
                    Call::Text(t, _) => Some(t.as_str()),
                    _ => None,
                })
                .collect()
        }

        fn rects_of(&self, color: Color) -> usize {
            self.calls
                .iter()
                .filter(|c| matches!(c, Call::Rect(_, _, col) if *col == color))
                .count()
        }
    }

    impl Canvas for Recorder {
        fn size(&self) -> Vec2 {
            Vec2::new(800.0, 600.0)
        }
        fn clear_rect(&mut self, _pos: Vec2, _size: Vec2) {
            self.calls.push(Call::Clear);
        }
        fn fill_rect(&mut self, pos: Vec2, size: Vec2, color: Color) {
            self.calls.push(Call::Rect(pos, size, color));
        }
        fn stroke_rect(&mut self, pos: Vec2, size: Vec2, _color: Color) {
            self.calls.push(Call::Stroke(pos, size));
        }
        fn fill_path(&mut self, points: &[Vec2], color: Color) {
            self.calls.push(Call::Path(points.to_vec(), color));
        }
        fn fill_text(&mut self, text: &str, _pos: Vec2, _px: u32, align: TextAlign, _c: Color) {
            self.calls.push(Call::Text(text.to_string(), align));
        }
        fn save(&mut self) {
            self.calls.push(Call::Save);
        }
        fn restore(&mut self) {
            self.calls.push(Call::Restore);
        }
        fn set_alpha(&mut self, alpha: f32) {
            self.calls.push(Call::Alpha(alpha));
        }
        fn translate(&mut self, offset: Vec2) {
            self.calls.push(Call::Translate(offset));
        }
        fn rotate(&mut self, radians: f32) {
            self.calls.push(Call::Rotate(radians));
        }
    }

    fn state_in(phase: GamePhase) -> GameState {
        let mut state = GameState::new(9, Vec2::new(800.0, 600.0));
        state.phase = phase;
        state
    }

    #[test]
    fn test_title_screen_shows_previous_score() {
        let mut canvas = Recorder::default();
        let mut state = state_in(GamePhase::Title);
        state.previous_score = Some(17);
        draw_frame(&mut canvas, &state, None);
        assert_eq!(canvas.calls[0], Call::Clear);
        assert_eq!(
            canvas.texts(),
            vec!["Press Enter to Start", "Previous Score: 17"]
        );
        assert_eq!(canvas.rects_of(Color::PLAYER), 0);
    }

    #[test]
    fn test_player_triangle_faces_aim() {
        let mut canvas = Recorder::default();
        let state = state_in(GamePhase::Playing);
        draw_frame(&mut canvas, &state, None);

        // Default aim is straight up: no net rotation
        let rotate = canvas
            .calls
            .iter()
            .find_map(|c| match c {
                Call::Rotate(r) => Some(*r),
                _ => None,
            })
            .unwrap();
        assert!(rotate.abs() < 1e-6);
        assert!(canvas.calls.contains(&Call::Translate(state.player.center())));
        assert!(
            canvas
                .calls
                .iter()
                .any(|c| matches!(c, Call::Path(p, Color::PLAYER) if p.len() == 3))
        );
        // Health bar: red background and green fill
        assert_eq!(canvas.rects_of(Color::RED), 1);
        assert_eq!(canvas.rects_of(Color::GREEN), 1);
    }

    #[test]
    fn test_entities_drawn_with_their_colors() {
        let mut canvas = Recorder::default();
        let mut state = state_in(GamePhase::Playing);
        let id = state.next_entity_id();
        state.bullets.push(Bullet::from_player(id, &state.player));
        let stats = scaled_stats(EnemyKind::Tank, 1);
        let id = state.next_entity_id();
        let tank = Enemy::new(id, EnemyKind::Tank, stats, Vec2::new(5.0, 5.0));
        let id = state.next_entity_id();
        let enemy_bullet = Bullet::from_enemy(id, &tank, state.player.pos, 1);
        state.enemies.push(tank);
        state.bullets.push(enemy_bullet);
        state.damage_numbers.push(DamageNumber::new(Vec2::new(5.0, 5.0), 7));

        draw_frame(&mut canvas, &state, None);
        assert_eq!(canvas.rects_of(Color::YELLOW), 1);
        assert_eq!(canvas.rects_of(Color("blue")), 1);
        // Enemy bullet plus the health bar background
        assert_eq!(canvas.rects_of(Color::RED), 2);
        assert!(canvas.texts().contains(&"7"));
        assert!(canvas.calls.contains(&Call::Alpha(1.0)));
    }

    #[test]
    fn test_invincible_player_blinks() {
        let mut state = state_in(GamePhase::Playing);
        state.player.invincible = true;
        assert!(player_hidden(&state.player, 50.0));
        assert!(!player_hidden(&state.player, 150.0));
        assert!(player_hidden(&state.player, 250.0));
        state.player.invincible = false;
        assert!(!player_hidden(&state.player, 50.0));

        // Sim time 0 is an off slice
        state.player.invincible = true;
        let mut canvas = Recorder::default();
        draw_frame(&mut canvas, &state, None);
        assert_eq!(canvas.rects_of(Color::GREEN), 0);
    }

    #[test]
    fn test_overlays() {
        let mut canvas = Recorder::default();
        draw_frame(&mut canvas, &state_in(GamePhase::Paused), None);
        assert_eq!(canvas.texts(), vec!["Paused"]);

        let mut canvas = Recorder::default();
        let mut state = state_in(GamePhase::Playing);
        state.wave.cooldown_active = true;
        draw_frame(&mut canvas, &state, None);
        assert_eq!(
            canvas.texts(),
            vec!["Wave 1 Complete!", "Next wave starting soon..."]
        );
        assert_eq!(canvas.rects_of(Color::GREEN), 0);
    }

    #[test]
    fn test_debug_overlay() {
        let mut state = state_in(GamePhase::Playing);
        let stats = scaled_stats(EnemyKind::Basic, 1);
        let id = state.next_entity_id();
        state
            .enemies
            .push(Enemy::new(id, EnemyKind::Basic, stats, Vec2::ZERO));

        let mut canvas = Recorder::default();
        draw_frame(&mut canvas, &state, None);
        assert!(!canvas.calls.iter().any(|c| matches!(c, Call::Stroke(..))));

        let mut canvas = Recorder::default();
        draw_frame(&mut canvas, &state, Some(60));
        let texts = canvas.texts();
        assert!(texts.contains(&"FPS: 60"));
        assert!(texts.contains(&"15"));
        let strokes = canvas
            .calls
            .iter()
            .filter(|c| matches!(c, Call::Stroke(..)))
            .count();
        assert_eq!(strokes, 2);
    }

    #[test]
    fn test_fps_counter() {
        let mut counter = FpsCounter::default();
        let mut t = 0.0;
        for _ in 0..120 {
            t += 1000.0 / 60.0;
            counter.record(t);
        }
        assert_eq!(counter.fps(), 60);
    }
}
