use crate::model::{HistoryEntry, MoodState, Scene, Slider};
use crate::strategy::CATALOG;
use chrono::{DateTime, Utc};
use std::time::{Duration, Instant};

pub(crate) const TOAST_TTL: Duration = Duration::from_secs(3);
pub(crate) const NOTE_MAX_CHARS: usize = 280;
const BIG_STEP: i32 = 10;

#[derive(Clone, Debug, PartialEq)]
pub(crate) enum Action {
    Select(Slider),
    SelectNext,
    SelectPrev,
    Nudge(i32),
    JournalOpen,
    JournalChar(char),
    JournalBackspace,
    JournalCommit,
    StrategiesOpen,
    StrategiesMove(i32),
    StrategyOpen,
    StrategyComplete,
    ClearAsk,
    ClearConfirm,
    HelpToggle,
    Back,
    Quit,
}

impl Action {
    pub(crate) fn nudge_big(up: bool) -> Self {
        Action::Nudge(if up { BIG_STEP } else { -BIG_STEP })
    }
}

/// What the app has to do outside the UI state after an action.
#[derive(Clone, Debug, PartialEq)]
pub(crate) enum Effect {
    None,
    Append(HistoryEntry),
    Clear,
    Quit,
}

#[derive(Clone, Debug)]
pub(crate) struct Toast {
    pub(crate) text: &'static str,
    pub(crate) shown_at: Instant,
}

#[derive(Clone, Debug)]
pub(crate) struct UiState {
    pub(crate) mood: MoodState,
    pub(crate) selected: Slider,
    pub(crate) scene: Scene,
    pub(crate) toast: Option<Toast>,
}

impl UiState {
    pub(crate) fn new(mood: MoodState) -> Self {
        Self {
            mood: mood.clamped(),
            selected: Slider::Motivation,
            scene: Scene::Main,
            toast: None,
        }
    }

    pub(crate) fn toast_text(&self, now: Instant) -> Option<&'static str> {
        self.toast
            .as_ref()
            .filter(|t| now.saturating_duration_since(t.shown_at) < TOAST_TTL)
            .map(|t| t.text)
    }

    fn show_toast(&mut self, text: &'static str, now: Instant) {
        self.toast = Some(Toast { text, shown_at: now });
    }

    pub(crate) fn apply(&mut self, action: Action, ts: DateTime<Utc>, now: Instant) -> Effect {
        match action {
            Action::Select(s) => self.selected = s,
            Action::SelectNext => self.selected = self.selected.next(),
            Action::SelectPrev => self.selected = self.selected.prev(),
            Action::Nudge(delta) => self.mood.adjust(self.selected, delta),
            Action::JournalOpen => {
                self.scene = Scene::Journal { draft: String::new() };
            }
            Action::JournalChar(ch) => {
                if let Scene::Journal { draft } = &mut self.scene {
                    if draft.chars().count() < NOTE_MAX_CHARS {
                        draft.push(ch);
                    }
                }
            }
            Action::JournalBackspace => {
                if let Scene::Journal { draft } = &mut self.scene {
                    draft.pop();
                }
            }
            Action::JournalCommit => {
                if let Scene::Journal { draft } = &self.scene {
                    let entry = HistoryEntry::new(self.mood, draft.trim(), ts);
                    self.scene = Scene::Main;
                    self.show_toast("Mood logged successfully!", now);
                    return Effect::Append(entry);
                }
            }
            Action::StrategiesOpen => {
                self.scene = Scene::Strategies { cursor: 0 };
            }
            Action::StrategiesMove(delta) => {
                if let Scene::Strategies { cursor } = &mut self.scene {
                    let len = CATALOG.len() as i32;
                    *cursor = (*cursor as i32 + delta).rem_euclid(len) as usize;
                }
            }
            Action::StrategyOpen => {
                if let Scene::Strategies { cursor } = self.scene {
                    self.scene = Scene::Strategy { index: cursor };
                }
            }
            Action::StrategyComplete => {
                if let Scene::Strategy { index } = self.scene {
                    if let Some(s) = CATALOG.get(index) {
                        s.complete(&mut self.mood);
                        tracing::info!(strategy = s.title, "strategy completed");
                        self.show_toast("Great job completing the strategy!", now);
                    }
                    self.scene = Scene::Main;
                }
            }
            Action::ClearAsk => self.scene = Scene::ConfirmClear,
            Action::ClearConfirm => {
                if self.scene == Scene::ConfirmClear {
                    self.scene = Scene::Main;
                    self.show_toast("All logs cleared!", now);
                    return Effect::Clear;
                }
            }
            Action::HelpToggle => {
                self.scene = match self.scene {
                    Scene::Help => Scene::Main,
                    _ => Scene::Help,
                };
            }
            Action::Back => {
                self.scene = match self.scene {
                    Scene::Strategy { index } => Scene::Strategies { cursor: index },
                    _ => Scene::Main,
                };
            }
            Action::Quit => return Effect::Quit,
        }
        Effect::None
    }
}
