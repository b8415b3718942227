use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub(crate) const LOG_VERSION: u32 = 1;
pub(crate) const MAX_LOG_ENTRIES: usize = 120;

/// The three user-set mood inputs, each held in [0, 100].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub(crate) struct MoodState {
    pub(crate) motivation: u8,
    pub(crate) focus: u8,
    pub(crate) stress: u8,
}

impl Default for MoodState {
    fn default() -> Self {
        Self {
            motivation: 70,
            focus: 50,
            stress: 10,
        }
    }
}

impl MoodState {
    /// Out-of-range values are clamped rather than rejected.
    pub(crate) fn new(motivation: i32, focus: i32, stress: i32) -> Self {
        Self {
            motivation: clamp_level(motivation),
            focus: clamp_level(focus),
            stress: clamp_level(stress),
        }
    }

    /// Re-clamp after deserializing or receiving values from outside.
    pub(crate) fn clamped(self) -> Self {
        Self::new(
            self.motivation as i32,
            self.focus as i32,
            self.stress as i32,
        )
    }

    pub(crate) fn get(&self, slider: Slider) -> u8 {
        match slider {
            Slider::Motivation => self.motivation,
            Slider::Focus => self.focus,
            Slider::Stress => self.stress,
        }
    }

    pub(crate) fn adjust(&mut self, slider: Slider, delta: i32) {
        let v = clamp_level(self.get(slider) as i32 + delta);
        match slider {
            Slider::Motivation => self.motivation = v,
            Slider::Focus => self.focus = v,
            Slider::Stress => self.stress = v,
        }
    }

    /// Calm is what the status panel shows instead of raw stress.
    pub(crate) fn calm(&self) -> u8 {
        100 - self.stress
    }
}

fn clamp_level(v: i32) -> u8 {
    v.clamp(0, 100) as u8
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Slider {
    Motivation,
    Focus,
    Stress,
}

impl Slider {
    pub(crate) const ALL: [Slider; 3] = [Slider::Motivation, Slider::Focus, Slider::Stress];

    pub(crate) fn label(self) -> &'static str {
        match self {
            Slider::Motivation => "Motivation",
            Slider::Focus => "Focus",
            Slider::Stress => "Stress",
        }
    }

    pub(crate) fn next(self) -> Self {
        match self {
            Slider::Motivation => Slider::Focus,
            Slider::Focus => Slider::Stress,
            Slider::Stress => Slider::Motivation,
        }
    }

    pub(crate) fn prev(self) -> Self {
        match self {
            Slider::Motivation => Slider::Stress,
            Slider::Focus => Slider::Motivation,
            Slider::Stress => Slider::Focus,
        }
    }
}

/// One logged mood snapshot. Older logs wrote the short field names.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub(crate) struct HistoryEntry {
    #[serde(alias = "mot")]
    pub(crate) motivation: u8,
    #[serde(alias = "foc")]
    pub(crate) focus: u8,
    #[serde(alias = "st")]
    pub(crate) stress: u8,
    #[serde(default)]
    pub(crate) note: String,
    pub(crate) timestamp: DateTime<Utc>,
}

impl HistoryEntry {
    pub(crate) fn new(mood: MoodState, note: impl Into<String>, timestamp: DateTime<Utc>) -> Self {
        Self {
            motivation: mood.motivation,
            focus: mood.focus,
            stress: mood.stress,
            note: note.into(),
            timestamp,
        }
    }
}

/// Append-bounded log, oldest entry first.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub(crate) struct MoodLog {
    pub(crate) version: u32,
    pub(crate) entries: Vec<HistoryEntry>,
}

impl Default for MoodLog {
    fn default() -> Self {
        Self {
            version: LOG_VERSION,
            entries: Vec::new(),
        }
    }
}

impl MoodLog {
    pub(crate) fn push(&mut self, entry: HistoryEntry) {
        self.entries.push(entry);
        if self.entries.len() > MAX_LOG_ENTRIES {
            let excess = self.entries.len() - MAX_LOG_ENTRIES;
            self.entries.drain(..excess);
        }
    }

    pub(crate) fn clear(&mut self) {
        self.entries.clear();
    }

    /// Newest first.
    pub(crate) fn recent(&self, n: usize) -> impl Iterator<Item = &HistoryEntry> {
        self.entries.iter().rev().take(n)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum Scene {
    Main,
    Help,
    Journal { draft: String },
    Strategies { cursor: usize },
    Strategy { index: usize },
    ConfirmClear,
}
