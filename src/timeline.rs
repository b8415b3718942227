//! History strip along the bottom of the canvas, one segment per logged
//! mood, tinted by stress, with a hover card for the segment under the
//! pointer.

use crate::color::{hsb_mix, lerp_color, Rgb, Rgba};
use crate::model::HistoryEntry;
use crate::surface::{rounded_rect, Align, Point, Surface, CANVAS_H, CANVAS_W};

pub(crate) const NOTE_PREVIEW_CHARS: usize = 50;
pub(crate) const MIN_SEGMENT_W: f32 = 2.0;
pub(crate) const PLACEHOLDER: &str = "No mood logs yet. Press L to log one.";

#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct Strip {
    pub(crate) x: f32,
    pub(crate) y: f32,
    pub(crate) w: f32,
    pub(crate) h: f32,
}

/// Sits on the soil band, below the grass.
pub(crate) const STRIP: Strip = Strip {
    x: 10.0,
    y: CANVAS_H - 34.0,
    w: CANVAS_W - 20.0,
    h: 24.0,
};

const CARD_PAD: f32 = 8.0;
const CARD_MARGIN: f32 = 4.0;

impl Strip {
    fn contains_y(&self, y: f32) -> bool {
        y >= self.y && y <= self.y + self.h
    }
}

/// `None` for an empty history; callers must not divide by the count.
pub(crate) fn segment_width(strip_w: f32, count: usize) -> Option<f32> {
    if count == 0 {
        return None;
    }
    Some((strip_w / count as f32).max(MIN_SEGMENT_W))
}

/// Segment under `pointer_x`, clamped into the history.
pub(crate) fn hovered_index(pointer_x: f32, strip: &Strip, count: usize) -> Option<usize> {
    let seg_w = segment_width(strip.w, count)?;
    let raw = ((pointer_x - strip.x) / seg_w).floor();
    let max = (count - 1) as f32;
    Some(raw.clamp(0.0, max) as usize)
}

/// Same stress-to-gray mapping the plant uses, with its own endpoints.
pub(crate) fn stress_color(stress: u8) -> Rgb {
    let s = stress.min(100) as f32 / 100.0;
    hsb_mix((200.0, 40.0, 90.0), (0.0, 0.0, 30.0), s)
}

pub(crate) fn truncate_note(note: &str, max_chars: usize) -> String {
    if note.chars().count() > max_chars {
        let mut s: String = note.chars().take(max_chars).collect();
        s.push_str("...");
        s
    } else {
        note.to_string()
    }
}

pub(crate) fn tooltip_lines(index: usize, e: &HistoryEntry) -> Vec<String> {
    let mut lines = vec![
        format!("Entry #{}", index + 1),
        format!("Motivation: {}", e.motivation),
        format!("Focus: {}", e.focus),
        format!("Stress: {}", e.stress),
    ];
    if !e.note.trim().is_empty() {
        lines.push(format!("\"{}\"", truncate_note(e.note.trim(), NOTE_PREVIEW_CHARS)));
    }
    lines
}

/// Draws the strip and, if hovered, the card. Returns the hovered index.
pub(crate) fn draw_timeline<S: Surface + ?Sized>(
    s: &mut S,
    history: &[HistoryEntry],
    pointer: Option<Point>,
) -> Option<usize> {
    let strip = STRIP;
    let bg = Rgb::gray(250).alpha(0.85);
    s.fill_path(&rounded_rect(strip.x, strip.y, strip.w, strip.h, 8.0), bg);

    let seg_w = match segment_width(strip.w, history.len()) {
        Some(w) => w,
        None => {
            let mid = Point::new(strip.x + strip.w / 2.0, strip.y + strip.h / 2.0);
            s.draw_text(mid, PLACEHOLDER, Align::Center, Rgb::gray(110));
            return None;
        }
    };

    let inset = 3.0;
    for (i, e) in history.iter().enumerate() {
        let x = strip.x + i as f32 * seg_w;
        if x >= strip.x + strip.w {
            break;
        }
        let w = seg_w.min(strip.x + strip.w - x);
        s.fill_rect(x, strip.y + inset, w, strip.h - inset * 2.0, stress_color(e.stress).into());
    }

    let pointer = pointer.filter(|p| p.in_canvas() && strip.contains_y(p.y))?;
    let idx = hovered_index(pointer.x, &strip, history.len())?;

    let x0 = strip.x + idx as f32 * seg_w;
    let (y0, y1) = (strip.y + 1.0, strip.y + strip.h - 1.0);
    let x1 = (x0 + seg_w).min(strip.x + strip.w);
    let outline = Rgba::from(lerp_color(stress_color(history[idx].stress), Rgb::gray(0), 0.7));
    s.stroke_line(Point::new(x0, y0), Point::new(x1, y0), 2.0, outline);
    s.stroke_line(Point::new(x1, y0), Point::new(x1, y1), 2.0, outline);
    s.stroke_line(Point::new(x1, y1), Point::new(x0, y1), 2.0, outline);
    s.stroke_line(Point::new(x0, y1), Point::new(x0, y0), 2.0, outline);

    draw_card(s, pointer, &tooltip_lines(idx, &history[idx]));
    Some(idx)
}

/// Card origin near the pointer, pulled back inside the canvas.
pub(crate) fn card_origin(pointer: Point, w: f32, h: f32) -> Point {
    let x = (pointer.x + 12.0).clamp(CARD_MARGIN, (CANVAS_W - w - CARD_MARGIN).max(CARD_MARGIN));
    let y = (STRIP.y - h - 8.0).clamp(CARD_MARGIN, (CANVAS_H - h - CARD_MARGIN).max(CARD_MARGIN));
    Point::new(x, y)
}

/// Greedy word wrap on char counts. Runs of spaces are kept; a word
/// longer than `width` is split across lines.
pub(crate) fn wrap(line: &str, width: usize) -> Vec<String> {
    if width == 0 || line.chars().count() <= width {
        return vec![line.to_string()];
    }
    let mut out = Vec::new();
    let mut cur = String::new();
    for word in line.split(' ') {
        let mut word: Vec<char> = word.chars().collect();
        if word.len() > width {
            if !cur.is_empty() {
                out.push(std::mem::take(&mut cur));
            }
            while word.len() > width {
                out.push(word.drain(..width).collect());
            }
            if word.is_empty() {
                continue;
            }
        }
        let need = if cur.is_empty() { 0 } else { 1 } + word.len();
        if !cur.is_empty() && cur.chars().count() + need > width {
            out.push(std::mem::take(&mut cur));
        }
        if !cur.is_empty() {
            cur.push(' ');
        }
        cur.extend(word);
    }
    if !cur.is_empty() || out.is_empty() {
        out.push(cur);
    }
    out
}

/// Sized from the surface's text metrics so every line keeps its own row
/// and stays on the card, however coarse the output grid is.
fn draw_card<S: Surface + ?Sized>(s: &mut S, pointer: Point, lines: &[String]) {
    let (lh, cw) = (s.line_height(), s.char_width());
    let max_w = CANVAS_W - CARD_MARGIN * 2.0;
    let max_chars = ((max_w - CARD_PAD * 2.0) / cw).floor().max(1.0) as usize;
    let rows: Vec<(usize, String)> = lines
        .iter()
        .enumerate()
        .flat_map(|(i, l)| wrap(l, max_chars).into_iter().map(move |r| (i, r)))
        .collect();

    let widest = rows.iter().map(|(_, r)| r.chars().count()).max().unwrap_or(0);
    let w = (widest as f32 * cw + CARD_PAD * 2.0).min(max_w);
    let h = CARD_PAD * 2.0 + lh * rows.len() as f32;
    let at = card_origin(pointer, w, h);
    s.fill_path(&rounded_rect(at.x, at.y, w, h, 6.0), Rgb::gray(255).alpha(0.95));
    for (n, (i, row)) in rows.iter().enumerate() {
        let color = if *i == 0 { Rgb::gray(20) } else { Rgb::gray(70) };
        let y = at.y + CARD_PAD + lh * n as f32;
        s.draw_text(Point::new(at.x + CARD_PAD, y), row, Align::Left, color);
    }
}
