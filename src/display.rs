/// Rendering layer. All terminal I/O lives here.
///
/// The scene is painted into a [`Canvas`] in logical pixels and then
/// rasterised into the terminal.  HUD fields on the top row are rewritten
/// only when their value changes.  No game logic is performed here.

use std::io::Write;
use std::time::Instant;

use crossterm::{
    cursor,
    style::{self, Color, Print},
    terminal, QueueableCommand,
};
use fuel_rush::canvas::{Canvas, Viewport};
use fuel_rush::config::{
    CANVAS_HEIGHT, CANVAS_WIDTH, CENTER_LINE_X, FUEL_SIZE, TRACK_LEFT, TRACK_RIGHT,
};
use fuel_rush::entities::{theme_for, Car, Enemy, Fuel, GameState, Phase, Rgb, StageTheme};
use fuel_rush::hud::{HudCache, HudField};
use fuel_rush::input::{ButtonLayout, CellRect};

// ── Colour palette ────────────────────────────────────────────────────────────

const C_CAR: Rgb = Rgb(0xFF, 0x00, 0x00);
const C_CAR_WINDOW: Rgb = Rgb(0x87, 0xCE, 0xEB);
const C_TYRE: Rgb = Rgb::BLACK;
const C_ENEMY_WINDOW: Rgb = Rgb(0xAD, 0xD8, 0xE6);
const C_FUEL: Rgb = Rgb(0x00, 0xFF, 0x00);
const C_FUEL_MARK: Rgb = Rgb(0x00, 0x64, 0x00);
const C_GOLD: Color = Color::Rgb { r: 0xFF, g: 0xD7, b: 0x00 };

const C_HUD_SCORE: Color = Color::Yellow;
const C_HUD_STAGE: Color = Color::Cyan;
const C_HUD_LIVES: Color = Color::Red;
const C_HUD_FUEL: Color = Color::Green;
const C_HINT: Color = Color::DarkGrey;
const C_BUTTON: Color = Color::White;
const C_BUTTON_BG: Color = Color::DarkGrey;

/// Alpha of the car on the dim half of the invincibility flicker.
const FLICKER_ALPHA: f32 = 0.5;

// ── Layout ────────────────────────────────────────────────────────────────────

/// Rows above the canvas (HUD).
const TOP_ROWS: u16 = 1;
/// Rows below the canvas (buttons, hint).
const BOTTOM_ROWS: u16 = 2;

const BUTTON_WIDTH: u16 = 9;
const FUEL_BAR_CELLS: u32 = 10;

// Fixed HUD columns so each field can be rewritten on its own.
const HUD_SCORE_COL: u16 = 1;
const HUD_HIGH_COL: u16 = 14;
const HUD_STAGE_COL: u16 = 25;
const HUD_LIVES_COL: u16 = 34;
const HUD_FUEL_COL: u16 = 48;

const HINT: &str = "← → / A D : Steer   Q : Quit";

/// Terminal geometry plus what is already on screen.
pub struct Screen {
    cols: u16,
    rows: u16,
    canvas: Canvas,
    hud: HudCache,
    needs_clear: bool,
}

impl Screen {
    pub fn new(cols: u16, rows: u16) -> Self {
        let viewport = Viewport::fit(cols, rows, TOP_ROWS, BOTTOM_ROWS);
        Screen {
            cols,
            rows,
            canvas: Canvas::new(viewport),
            hud: HudCache::new(),
            needs_clear: true,
        }
    }

    /// Refit the canvas after a terminal resize; everything is redrawn.
    pub fn resize(&mut self, cols: u16, rows: u16) {
        *self = Screen::new(cols, rows);
    }

    /// Force a full redraw on the next frame.
    pub fn invalidate(&mut self) {
        self.needs_clear = true;
    }

    /// On-screen steering buttons, centred under each half of the road.
    pub fn buttons(&self) -> ButtonLayout {
        let vp = self.canvas.viewport();
        let row = self.rows.saturating_sub(BOTTOM_ROWS);
        let centre = |frac: f32| {
            let c = vp.col as f32 + vp.px_width as f32 * frac;
            (c as u16).saturating_sub(BUTTON_WIDTH / 2)
        };
        ButtonLayout {
            left: CellRect { col: centre(0.25), row, width: BUTTON_WIDTH, height: 1 },
            right: CellRect { col: centre(0.75), row, width: BUTTON_WIDTH, height: 1 },
        }
    }
}

fn to_color(c: Rgb) -> Color {
    Color::Rgb { r: c.0, g: c.1, b: c.2 }
}

// ── Public entry points ───────────────────────────────────────────────────────

/// Render the start screen.
pub fn render_title<W: Write>(out: &mut W, screen: &mut Screen, high_score: u32) -> std::io::Result<()> {
    out.queue(terminal::Clear(terminal::ClearType::All))?;
    screen.needs_clear = false;
    screen.hud.invalidate();

    let theme = theme_for(1);
    draw_road(&mut screen.canvas, theme, 0.0);
    let mut lines = vec![
        ("FUEL  RUSH".to_string(), C_GOLD),
        (String::new(), Color::White),
        ("Dodge the traffic,".to_string(), Color::White),
        ("grab the fuel.".to_string(), Color::White),
        (String::new(), Color::White),
    ];
    if high_score > 0 {
        lines.push((format!("Best: {}", high_score), Color::Yellow));
    }
    lines.push(("Space / click to start".to_string(), Color::White));

    flush_canvas(out, &screen.canvas)?;
    draw_message(out, &screen.canvas, &lines)?;
    draw_chrome(out, screen)?;

    out.queue(style::ResetColor)?;
    out.flush()?;
    Ok(())
}

/// Render one complete frame of a run.
pub fn render<W: Write>(
    out: &mut W,
    screen: &mut Screen,
    state: &GameState,
    now: Instant,
) -> std::io::Result<()> {
    if screen.needs_clear {
        out.queue(terminal::Clear(terminal::ClearType::All))?;
        screen.hud.invalidate();
        draw_chrome(out, screen)?;
        screen.needs_clear = false;
    }

    match state.phase {
        Phase::Playing => {
            draw_road(&mut screen.canvas, state.theme(), state.road_offset);
            // Traffic and fuel pass over the car.
            draw_car(&mut screen.canvas, &state.car, now);
            for fuel in &state.fuels {
                draw_fuel(&mut screen.canvas, fuel);
            }
            for enemy in &state.enemies {
                draw_enemy(&mut screen.canvas, enemy);
            }
            flush_canvas(out, &screen.canvas)?;
        }
        Phase::GameOver => {
            screen.canvas.clear(Rgb::BLACK);
            flush_canvas(out, &screen.canvas)?;
            draw_message(out, &screen.canvas, &end_lines(state, "GAME OVER", Color::Red))?;
        }
        Phase::Ending => {
            screen.canvas.clear(Rgb::BLACK);
            flush_canvas(out, &screen.canvas)?;
            let mut lines = vec![("CONGRATULATIONS!".to_string(), C_GOLD)];
            lines.extend(end_lines(state, "All stages cleared!", Color::White));
            draw_message(out, &screen.canvas, &lines)?;
        }
    }

    for field in screen.hud.sync(state) {
        draw_hud_field(out, field)?;
    }

    // Park cursor in a harmless spot and flush
    out.queue(style::ResetColor)?;
    out.queue(cursor::MoveTo(0, screen.rows.saturating_sub(1)))?;
    out.flush()?;
    Ok(())
}

fn end_lines(state: &GameState, headline: &str, color: Color) -> Vec<(String, Color)> {
    let best = if state.score >= state.high_score && state.score > 0 {
        (format!("★ NEW BEST: {} ★", state.score), Color::Yellow)
    } else {
        (format!("Best: {}", state.high_score), Color::DarkGrey)
    };
    vec![
        (headline.to_string(), color),
        (String::new(), Color::White),
        (format!("Score: {}", state.score), Color::Yellow),
        best,
        (String::new(), Color::White),
        ("Space / click to play again".to_string(), Color::White),
    ]
}

// ── Scene → canvas ────────────────────────────────────────────────────────────

fn draw_road(canvas: &mut Canvas, theme: StageTheme, offset: f32) {
    canvas.clear(theme.background);
    canvas.fill_rect(TRACK_LEFT, 0.0, TRACK_RIGHT - TRACK_LEFT, CANVAS_HEIGHT, theme.road);
    canvas.dashed_vline(CENTER_LINE_X, 4.0, offset % 40.0 - 40.0, 20.0, 20.0, Rgb::WHITE);
}

fn draw_car(canvas: &mut Canvas, car: &Car, now: Instant) {
    // Tyres first so the body overlaps their inner edge.
    for (dx, dy) in [
        (-6.0, 5.0),
        (car.w, 5.0),
        (-6.0, car.h - 20.0),
        (car.w, car.h - 20.0),
    ] {
        canvas.fill_rect(car.x + dx, car.y + dy, 6.0, 15.0, C_TYRE);
    }
    if car.flicker_dim(now) {
        canvas.blend_rect(car.x, car.y, car.w, car.h, C_CAR, FLICKER_ALPHA);
    } else {
        canvas.fill_rect(car.x, car.y, car.w, car.h, C_CAR);
    }
    canvas.fill_rect(car.x + 8.0, car.y + 5.0, car.w - 16.0, 15.0, C_CAR_WINDOW);
}

fn draw_enemy(canvas: &mut Canvas, enemy: &Enemy) {
    canvas.fill_rect(enemy.x, enemy.y, enemy.w, enemy.h, enemy.color);
    // Rear window, facing the player.
    canvas.fill_rect(enemy.x + 8.0, enemy.y + enemy.h - 20.0, enemy.w - 16.0, 15.0, C_ENEMY_WINDOW);
}

fn draw_fuel(canvas: &mut Canvas, fuel: &Fuel) {
    canvas.fill_rect(fuel.x, fuel.y, FUEL_SIZE, FUEL_SIZE, C_FUEL);
    canvas.fill_rect(fuel.x + 8.0, fuel.y + 2.0, 4.0, 16.0, C_FUEL_MARK);
    canvas.fill_rect(fuel.x + 5.0, fuel.y + 5.0, 10.0, 3.0, C_FUEL_MARK);
}

// ── Canvas → terminal ─────────────────────────────────────────────────────────

/// Emit the canvas as `▀` half blocks: foreground = top pixel, background =
/// bottom pixel.  Colour commands are only queued when they change.
fn flush_canvas<W: Write>(out: &mut W, canvas: &Canvas) -> std::io::Result<()> {
    let vp = canvas.viewport();
    if vp.is_empty() {
        out.queue(cursor::MoveTo(0, TOP_ROWS))?;
        out.queue(style::SetForegroundColor(Color::Red))?;
        out.queue(Print("Terminal too small"))?;
        return Ok(());
    }

    for row in 0..vp.cell_rows() {
        out.queue(cursor::MoveTo(vp.col, vp.row + row))?;
        let mut last: Option<(Rgb, Rgb)> = None;
        for col in 0..vp.px_width {
            let (top, bottom) = canvas.cell(col, row);
            if last != Some((top, bottom)) {
                out.queue(style::SetForegroundColor(to_color(top)))?;
                out.queue(style::SetBackgroundColor(to_color(bottom)))?;
                last = Some((top, bottom));
            }
            out.queue(Print('▀'))?;
        }
    }
    out.queue(style::ResetColor)?;
    Ok(())
}

/// Centre `lines` over the canvas, starting a little above its middle.
fn draw_message<W: Write>(
    out: &mut W,
    canvas: &Canvas,
    lines: &[(String, Color)],
) -> std::io::Result<()> {
    let vp = canvas.viewport();
    if vp.is_empty() {
        return Ok(());
    }
    let (_, mid_row) = vp.to_cell(CANVAS_WIDTH / 2.0, CANVAS_HEIGHT / 2.0);
    let start_row = mid_row.saturating_sub(lines.len() as u16 / 2).max(vp.row);
    let centre_col = vp.col + vp.px_width / 2;

    out.queue(style::SetBackgroundColor(Color::Black))?;
    for (i, (text, color)) in lines.iter().enumerate() {
        if text.is_empty() {
            continue;
        }
        let width = text.chars().count() as u16;
        out.queue(cursor::MoveTo(centre_col.saturating_sub(width / 2), start_row + i as u16))?;
        out.queue(style::SetForegroundColor(*color))?;
        out.queue(Print(text))?;
    }
    out.queue(style::ResetColor)?;
    Ok(())
}

/// Buttons and controls hint below the canvas.
fn draw_chrome<W: Write>(out: &mut W, screen: &Screen) -> std::io::Result<()> {
    let buttons = screen.buttons();
    for (rect, label) in [(buttons.left, "◀"), (buttons.right, "▶")] {
        let pad = (BUTTON_WIDTH as usize - 1) / 2;
        out.queue(cursor::MoveTo(rect.col, rect.row))?;
        out.queue(style::SetForegroundColor(C_BUTTON))?;
        out.queue(style::SetBackgroundColor(C_BUTTON_BG))?;
        out.queue(Print(format!("{:pad$}{}{:pad$}", "", label, "", pad = pad)))?;
    }
    out.queue(style::ResetColor)?;

    let hint_col = (screen.cols / 2).saturating_sub(HINT.chars().count() as u16 / 2);
    out.queue(cursor::MoveTo(hint_col, screen.rows.saturating_sub(1)))?;
    out.queue(style::SetForegroundColor(C_HINT))?;
    out.queue(Print(HINT))?;
    Ok(())
}

// ── HUD (row 0) ───────────────────────────────────────────────────────────────

fn draw_hud_field<W: Write>(out: &mut W, field: HudField) -> std::io::Result<()> {
    let (col, color, text) = match field {
        HudField::Score(score) => (HUD_SCORE_COL, C_HUD_SCORE, format!("Score:{:>6}", score)),
        HudField::HighScore(best) => (HUD_HIGH_COL, C_HUD_SCORE, format!("Hi:{:>6}", best)),
        HudField::Stage(stage) => (HUD_STAGE_COL, C_HUD_STAGE, format!("Stage {:<2}", stage)),
        HudField::Lives(lives) => {
            let hearts = "♥".repeat(lives.min(5) as usize);
            (HUD_LIVES_COL, C_HUD_LIVES, format!("Lives:{:<5}", hearts))
        }
        HudField::Fuel(pct) => {
            let filled = ((pct * FUEL_BAR_CELLS + 50) / 100).min(FUEL_BAR_CELLS) as usize;
            let bar = format!(
                "{}{}",
                "█".repeat(filled),
                "░".repeat(FUEL_BAR_CELLS as usize - filled)
            );
            (HUD_FUEL_COL, C_HUD_FUEL, format!("Fuel {} {:>3}%", bar, pct))
        }
    };
    out.queue(cursor::MoveTo(col, 0))?;
    out.queue(style::SetForegroundColor(color))?;
    out.queue(Print(text))?;
    Ok(())
}
