use crate::color::Rgb;
use crate::frame::FrameReport;
use crate::model::{MoodLog, Scene, Slider};
use crate::raster::{Pixel, PixelCanvas};
use crate::state::UiState;
use crate::surface::{Align, Point, CANVAS_H, CANVAS_W};
use crate::timeline::{truncate_note, wrap, NOTE_PREVIEW_CHARS};
use crossterm::{
    cursor,
    event::{DisableFocusChange, DisableMouseCapture, EnableFocusChange, EnableMouseCapture},
    execute, queue,
    style::{Color, Print, ResetColor, SetBackgroundColor, SetForegroundColor},
    terminal::{
        self, BeginSynchronizedUpdate, Clear, ClearType, DisableLineWrap, EnableLineWrap,
        EndSynchronizedUpdate, EnterAlternateScreen, LeaveAlternateScreen,
    },
};
use std::cmp::{max, min};
use std::io::{self, Write};

/// Upper half block: foreground paints the top pixel, background the bottom.
const HALF_BLOCK: char = '▀';
const RECENT_SHOWN: usize = 3;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct Cell {
    pub(crate) ch: char,
    pub(crate) fg: Color,
    pub(crate) bg: Color,
}

impl Default for Cell {
    fn default() -> Self {
        Self {
            ch: ' ',
            fg: Color::White,
            bg: Color::Black,
        }
    }
}

pub(crate) struct CellBuffer {
    pub(crate) w: u16,
    pub(crate) h: u16,
    pub(crate) cells: Vec<Cell>,
}

impl CellBuffer {
    pub(crate) fn new(w: u16, h: u16) -> Self {
        Self {
            w,
            h,
            cells: vec![Cell::default(); (w as usize) * (h as usize)],
        }
    }
    pub(crate) fn idx(&self, x: u16, y: u16) -> usize {
        (y as usize) * (self.w as usize) + (x as usize)
    }
    pub(crate) fn get(&self, x: u16, y: u16) -> Option<Cell> {
        (x < self.w && y < self.h).then(|| self.cells[self.idx(x, y)])
    }
    pub(crate) fn set(&mut self, x: u16, y: u16, c: Cell) {
        if x < self.w && y < self.h {
            let i = self.idx(x, y);
            self.cells[i] = c;
        }
    }
    pub(crate) fn clear(&mut self, bg: Color) {
        for c in &mut self.cells {
            *c = Cell { bg, ..Cell::default() };
        }
    }
}

pub(crate) struct Terminal {
    pub(crate) out: io::Stdout,
    pub(crate) cols: u16,
    pub(crate) rows: u16,
    pub(crate) prev: CellBuffer,
    pub(crate) cur: CellBuffer,
    pub(crate) canvas: PixelCanvas,
}

impl Terminal {
    pub(crate) fn begin() -> anyhow::Result<Self> {
        let mut out = io::stdout();
        execute!(
            out,
            EnterAlternateScreen,
            cursor::Hide,
            DisableLineWrap,
            EnableMouseCapture,
            EnableFocusChange,
            terminal::Clear(ClearType::All)
        )?;
        terminal::enable_raw_mode()?;

        let (cols, rows) = terminal::size()?;
        let layout = Layout::compute(cols, rows);
        Ok(Self {
            out,
            cols,
            rows,
            prev: CellBuffer::new(cols, rows),
            cur: CellBuffer::new(cols, rows),
            canvas: layout.canvas.new_canvas(),
        })
    }

    pub(crate) fn end(&mut self) -> anyhow::Result<()> {
        queue!(
            self.out,
            BeginSynchronizedUpdate,
            ResetColor,
            Clear(ClearType::All),
            DisableMouseCapture,
            DisableFocusChange,
            cursor::Show,
            EnableLineWrap,
            EndSynchronizedUpdate,
            LeaveAlternateScreen
        )?;
        self.out.flush()?;
        terminal::disable_raw_mode()?;
        Ok(())
    }

    pub(crate) fn resize_if_needed(&mut self) -> anyhow::Result<bool> {
        let (c, r) = terminal::size()?;
        if c == self.cols && r == self.rows {
            return Ok(false);
        }
        tracing::debug!(cols = c, rows = r, "terminal resized");
        self.cols = c;
        self.rows = r;
        self.prev = CellBuffer::new(c, r);
        self.cur = CellBuffer::new(c, r);
        Ok(true)
    }

    pub(crate) fn layout(&self) -> Layout {
        Layout::compute(self.cols, self.rows)
    }

    pub(crate) fn present(&mut self, diff_only: bool) -> anyhow::Result<()> {
        queue!(self.out, BeginSynchronizedUpdate)?;

        let mut last_fg = None;
        let mut last_bg = None;

        for y in 0..self.rows {
            for x in 0..self.cols {
                let i = self.cur.idx(x, y);
                let c = self.cur.cells[i];
                if diff_only && c == self.prev.cells[i] {
                    continue;
                }

                queue!(self.out, cursor::MoveTo(x, y))?;

                if last_fg != Some(c.fg) {
                    queue!(self.out, SetForegroundColor(c.fg))?;
                    last_fg = Some(c.fg);
                }
                if last_bg != Some(c.bg) {
                    queue!(self.out, SetBackgroundColor(c.bg))?;
                    last_bg = Some(c.bg);
                }

                queue!(self.out, Print(c.ch))?;
            }
        }

        queue!(self.out, ResetColor, EndSynchronizedUpdate)?;
        self.out.flush()?;
        self.prev.cells.copy_from_slice(&self.cur.cells);
        Ok(())
    }
}

/* -----------------------------
   Layout: text panel left, canvas right
------------------------------ */

/// Where the scene lands on screen, in cells, and at what scale.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct Viewport {
    pub(crate) x: u16,
    pub(crate) y: u16,
    pub(crate) cols: u16,
    pub(crate) rows: u16,
    pub(crate) scale: f32,
}

impl Viewport {
    /// Pixel grid size: one pixel per column, two per row.
    pub(crate) fn pixel_size(&self) -> (u32, u32) {
        (self.cols as u32, self.rows as u32 * 2)
    }

    pub(crate) fn new_canvas(&self) -> PixelCanvas {
        let (w, h) = self.pixel_size();
        PixelCanvas::new(w, h, self.scale)
    }

    /// Cell under the mouse back to logical canvas coordinates, taking the
    /// cell center. `None` outside the viewport.
    pub(crate) fn to_logical(&self, col: u16, row: u16) -> Option<Point> {
        if self.scale <= 0.0
            || col < self.x
            || row < self.y
            || col >= self.x + self.cols
            || row >= self.y + self.rows
        {
            return None;
        }
        let px = (col - self.x) as f32 + 0.5;
        let py = ((row - self.y) * 2) as f32 + 1.0;
        Some(Point::new(px / self.scale, py / self.scale))
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct Layout {
    pub(crate) panel_w: u16,
    pub(crate) canvas: Viewport,
}

impl Layout {
    pub(crate) fn compute(cols: u16, rows: u16) -> Self {
        let panel_w = min(max(34, cols as i32 / 3), cols as i32 - 10).max(0) as u16;
        let avail_w = cols.saturating_sub(panel_w);
        // bottom row is the key help line
        let avail_h = rows.saturating_sub(1);

        let scale = (avail_w as f32 / CANVAS_W).min(avail_h as f32 * 2.0 / CANVAS_H);
        let scale = scale.max(0.0);
        let w = ((CANVAS_W * scale).floor() as u16).min(avail_w);
        let h = (((CANVAS_H * scale) / 2.0).ceil() as u16).min(avail_h);

        Self {
            panel_w,
            canvas: Viewport {
                x: panel_w + (avail_w - w) / 2,
                y: (avail_h - h) / 2,
                cols: w,
                rows: h,
                scale,
            },
        }
    }
}

/* -----------------------------
   Half-block encoding: 1×2 pixels per cell
------------------------------ */

fn to_color(p: Pixel, enable_color: bool) -> Color {
    if enable_color {
        Color::Rgb { r: p.r, g: p.g, b: p.b }
    } else {
        gray_ramp(p.rgb())
    }
}

/// The 24-step grayscale ramp at the top of the 256-color palette.
fn gray_ramp(c: Rgb) -> Color {
    let luma = 0.299 * c.r as f32 + 0.587 * c.g as f32 + 0.114 * c.b as f32;
    Color::AnsiValue(232 + (luma / 255.0 * 23.0).round() as u8)
}

pub(crate) fn canvas_to_cells(canvas: &PixelCanvas, out: &mut CellBuffer, vp: Viewport, enable_color: bool) {
    for cy in 0..vp.rows {
        for cx in 0..vp.cols {
            let top = canvas.get(cx as u32, cy as u32 * 2);
            let bottom = canvas.get(cx as u32, cy as u32 * 2 + 1);
            out.set(
                vp.x + cx,
                vp.y + cy,
                Cell {
                    ch: HALF_BLOCK,
                    fg: to_color(top, enable_color),
                    bg: to_color(bottom, enable_color),
                },
            );
        }
    }

    // labels land on top as plain characters, clipped to the viewport
    for label in &canvas.labels {
        let row = (label.y / 2.0).floor() as i32;
        if row < 0 || row >= vp.rows as i32 {
            continue;
        }
        let len = label.text.chars().count() as i32;
        let start = match label.align {
            Align::Left => label.x.floor() as i32,
            Align::Center => label.x.floor() as i32 - len / 2,
        };
        let fg = if enable_color {
            Color::Rgb { r: label.color.r, g: label.color.g, b: label.color.b }
        } else {
            gray_ramp(label.color)
        };
        for (i, ch) in label.text.chars().enumerate() {
            let col = start + i as i32;
            if col < 0 || col >= vp.cols as i32 {
                continue;
            }
            let (x, y) = (vp.x + col as u16, vp.y + row as u16);
            let bg = out.get(x, y).map_or(Color::Black, |c| c.bg);
            out.set(x, y, Cell { ch, fg, bg });
        }
    }
}

/* -----------------------------
   UI panel (text + meters)
------------------------------ */

pub(crate) fn draw_text(buf: &mut CellBuffer, x: u16, y: u16, s: &str, fg: Color, bg: Color) {
    for (i, ch) in s.chars().enumerate() {
        let xx = x.saturating_add(i as u16);
        if xx >= buf.w || y >= buf.h {
            break;
        }
        buf.set(xx, y, Cell { ch, fg, bg });
    }
}

fn bar(value01: f32, width: usize) -> String {
    let v = value01.clamp(0.0, 1.0);
    let fill = (v * width as f32 + 0.5) as usize;
    let mut s = String::new();
    s.push('[');
    for i in 0..width {
        s.push(if i < fill { '█' } else { '·' });
    }
    s.push(']');
    s
}

/// One line per recent entry: "Mon dd hh:mm  M 70  F 50  S 10", note below.
pub(crate) fn recent_lines(log: &MoodLog) -> Vec<String> {
    if log.entries.is_empty() {
        return vec!["No mood logs yet".to_string()];
    }
    let mut out = Vec::new();
    for e in log.recent(RECENT_SHOWN) {
        let when = e.timestamp.with_timezone(&chrono::Local).format("%b %d %H:%M");
        out.push(format!("{when}  M {}  F {}  S {}", e.motivation, e.focus, e.stress));
        if !e.note.is_empty() {
            out.push(format!("  \"{}\"", truncate_note(&e.note, NOTE_PREVIEW_CHARS)));
        }
    }
    out
}

pub(crate) fn ui_panel(buf: &mut CellBuffer, st: &UiState, report: &FrameReport, log: &MoodLog, toast: Option<&str>) {
    let bg = Color::Black;
    let fg = Color::White;
    let hi = Color::Yellow;
    let dim = Color::DarkGrey;

    draw_text(buf, 1, 0, "Moodbloom", hi, bg);

    let m = report.mood;
    let status = [
        format!("Motivation {:>3}", m.motivation),
        format!("Focus      {:>3}", m.focus),
        format!("Calm       {:>3}", m.calm()),
        format!("Flower is {}", report.expression.label()),
    ];
    for (i, line) in status.iter().enumerate() {
        draw_text(buf, 1, 2 + i as u16, line, fg, bg);
    }

    for (i, slider) in Slider::ALL.iter().enumerate() {
        let selected = *slider == st.selected;
        let v = st.mood.get(*slider);
        let line = format!(
            "{} {} {:<10} {} {:>3}",
            if selected { ">" } else { " " },
            i + 1,
            slider.label(),
            bar(v as f32 / 100.0, 12),
            v
        );
        draw_text(buf, 1, 7 + i as u16, &line, if selected { hi } else { fg }, bg);
    }

    let mut y = 11;
    let mut weather = Vec::new();
    if report.raining {
        weather.push("rain");
    }
    if report.blooming {
        weather.push("petals");
    }
    if !weather.is_empty() {
        draw_text(buf, 1, y, &format!("Weather: {}", weather.join(" + ")), dim, bg);
    }
    y += 2;

    draw_text(buf, 1, y, "Recent", fg, bg);
    y += 1;
    let max_w = Layout::compute(buf.w, buf.h).panel_w as usize;
    for line in recent_lines(log) {
        let clipped: String = line.chars().take(max_w.saturating_sub(2)).collect();
        draw_text(buf, 1, y, &clipped, dim, bg);
        y += 1;
    }

    if let Some(text) = toast {
        draw_text(buf, 1, buf.h.saturating_sub(3), text, Color::Green, bg);
    }

    let help = match st.scene {
        Scene::Main => "Keys: ↑↓ select | ←→ adjust | shift ±10 | l log | s strategies | x clear | h help | q quit",
        Scene::Help => "Help: esc back | h close | q quit",
        Scene::Journal { .. } => "Journal: type a note | enter save | esc cancel",
        Scene::Strategies { .. } => "Strategies: ↑↓ select | enter open | esc back",
        Scene::Strategy { .. } => "Strategy: enter complete | esc back",
        Scene::ConfirmClear => "Clear all logs? y yes | n no",
    };
    draw_text(buf, 1, buf.h.saturating_sub(1), help, fg, bg);
}

/// Bordered box centered on screen. Body lines past the box are dropped.
pub(crate) fn draw_box(buf: &mut CellBuffer, title: &str, body: &str) {
    let (w, h) = (buf.w, buf.h);
    let fg = Color::White;
    let bg = Color::Black;

    let bw = min(64, w.saturating_sub(4));
    let bh = min(20, h.saturating_sub(4));
    if bw < 2 || bh < 2 {
        return;
    }
    let x0 = (w - bw) / 2;
    let y0 = (h - bh) / 2;

    for y in y0..y0 + bh {
        for x in x0..x0 + bw {
            buf.set(x, y, Cell { ch: ' ', fg, bg });
        }
    }
    let border = |buf: &mut CellBuffer, x, y, ch| buf.set(x, y, Cell { ch, fg, bg });
    for x in x0..x0 + bw {
        border(buf, x, y0, '─');
        border(buf, x, y0 + bh - 1, '─');
    }
    for y in y0..y0 + bh {
        border(buf, x0, y, '│');
        border(buf, x0 + bw - 1, y, '│');
    }
    border(buf, x0, y0, '┌');
    border(buf, x0 + bw - 1, y0, '┐');
    border(buf, x0, y0 + bh - 1, '└');
    border(buf, x0 + bw - 1, y0 + bh - 1, '┘');

    draw_text(buf, x0 + 2, y0 + 1, title, Color::Yellow, bg);

    let inner = bw.saturating_sub(4) as usize;
    let mut yy = y0 + 3;
    for line in body.lines().flat_map(|l| wrap(l, inner)) {
        if yy >= y0 + bh - 1 {
            break;
        }
        draw_text(buf, x0 + 2, yy, &line, fg, bg);
        yy += 1;
    }
}
