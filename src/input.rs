use crate::model::{Scene, Slider};
use crate::state::Action;
use crossterm::event::{self, Event, KeyCode, KeyEventKind, KeyModifiers, MouseEventKind};
use std::time::Duration;

#[derive(Clone, Debug, PartialEq)]
pub(crate) enum InputEvent {
    Key { key: KeyCode, mods: KeyModifiers },
    /// Mouse position in terminal cells.
    Pointer { col: u16, row: u16 },
    PointerLost,
}

pub(crate) fn collect_input_nonblocking(max_frame_time: Duration) -> anyhow::Result<Vec<InputEvent>> {
    let mut out = Vec::new();

    // poll with a tiny timeout so we stay responsive
    let timeout = std::cmp::min(Duration::from_millis(1), max_frame_time);
    while event::poll(timeout)? {
        match event::read()? {
            Event::Key(k) if k.kind == KeyEventKind::Press || k.kind == KeyEventKind::Repeat => {
                out.push(InputEvent::Key {
                    key: k.code,
                    mods: k.modifiers,
                });
            }
            Event::Mouse(m) => {
                if matches!(m.kind, MouseEventKind::Moved | MouseEventKind::Drag(_)) {
                    out.push(InputEvent::Pointer {
                        col: m.column,
                        row: m.row,
                    });
                }
            }
            Event::FocusLost => out.push(InputEvent::PointerLost),
            _ => {}
        }
        if out.len() >= 32 {
            break;
        }
    }
    Ok(out)
}

pub(crate) fn map_key_to_action(scene: &Scene, key: KeyCode, mods: KeyModifiers) -> Option<Action> {
    if key == KeyCode::Char('c') && mods.contains(KeyModifiers::CONTROL) {
        return Some(Action::Quit);
    }

    if matches!(scene, Scene::Journal { .. }) {
        return match key {
            KeyCode::Enter => Some(Action::JournalCommit),
            KeyCode::Esc => Some(Action::Back),
            KeyCode::Backspace => Some(Action::JournalBackspace),
            KeyCode::Char(ch) if !ch.is_control() => Some(Action::JournalChar(ch)),
            _ => None,
        };
    }

    // Global
    match key {
        KeyCode::Char('q') | KeyCode::Char('Q') => return Some(Action::Quit),
        KeyCode::Char('h') | KeyCode::Char('H') | KeyCode::Char('?') => {
            return Some(Action::HelpToggle)
        }
        KeyCode::Esc => return Some(Action::Back),
        _ => {}
    }

    let shift = mods.contains(KeyModifiers::SHIFT);
    match scene {
        Scene::Main => match key {
            KeyCode::Up => Some(Action::SelectPrev),
            KeyCode::Down => Some(Action::SelectNext),
            KeyCode::Char('1') => Some(Action::Select(Slider::Motivation)),
            KeyCode::Char('2') => Some(Action::Select(Slider::Focus)),
            KeyCode::Char('3') => Some(Action::Select(Slider::Stress)),
            KeyCode::Left if shift => Some(Action::nudge_big(false)),
            KeyCode::Right if shift => Some(Action::nudge_big(true)),
            KeyCode::Left => Some(Action::Nudge(-1)),
            KeyCode::Right => Some(Action::Nudge(1)),
            KeyCode::PageDown => Some(Action::nudge_big(false)),
            KeyCode::PageUp => Some(Action::nudge_big(true)),
            KeyCode::Char('l') | KeyCode::Char('L') => Some(Action::JournalOpen),
            KeyCode::Char('s') | KeyCode::Char('S') => Some(Action::StrategiesOpen),
            KeyCode::Char('x') | KeyCode::Char('X') => Some(Action::ClearAsk),
            _ => None,
        },
        Scene::Strategies { .. } => match key {
            KeyCode::Up => Some(Action::StrategiesMove(-1)),
            KeyCode::Down => Some(Action::StrategiesMove(1)),
            KeyCode::Enter => Some(Action::StrategyOpen),
            _ => None,
        },
        Scene::Strategy { .. } => match key {
            KeyCode::Enter | KeyCode::Char('c') | KeyCode::Char('C') => Some(Action::StrategyComplete),
            _ => None,
        },
        Scene::ConfirmClear => match key {
            KeyCode::Char('y') | KeyCode::Char('Y') => Some(Action::ClearConfirm),
            KeyCode::Char('n') | KeyCode::Char('N') => Some(Action::Back),
            _ => None,
        },
        Scene::Help | Scene::Journal { .. } => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(scene: &Scene, k: KeyCode) -> Option<Action> {
        map_key_to_action(scene, k, KeyModifiers::NONE)
    }

    #[test]
    fn main_scene_keys() {
        let s = Scene::Main;
        assert_eq!(key(&s, KeyCode::Right), Some(Action::Nudge(1)));
        assert_eq!(key(&s, KeyCode::PageDown), Some(Action::Nudge(-10)));
        assert_eq!(
            map_key_to_action(&s, KeyCode::Right, KeyModifiers::SHIFT),
            Some(Action::Nudge(10))
        );
        assert_eq!(key(&s, KeyCode::Char('2')), Some(Action::Select(Slider::Focus)));
        assert_eq!(key(&s, KeyCode::Char('L')), Some(Action::JournalOpen));
        assert_eq!(key(&s, KeyCode::Char('x')), Some(Action::ClearAsk));
        assert_eq!(key(&s, KeyCode::Char('y')), None);
    }

    #[test]
    fn journal_captures_letters() {
        let s = Scene::Journal { draft: String::new() };
        assert_eq!(key(&s, KeyCode::Char('q')), Some(Action::JournalChar('q')));
        assert_eq!(key(&s, KeyCode::Char('h')), Some(Action::JournalChar('h')));
        assert_eq!(key(&s, KeyCode::Enter), Some(Action::JournalCommit));
        assert_eq!(key(&s, KeyCode::Esc), Some(Action::Back));
        assert_eq!(
            map_key_to_action(&s, KeyCode::Char('c'), KeyModifiers::CONTROL),
            Some(Action::Quit)
        );
    }

    #[test]
    fn confirm_clear_only_on_yes() {
        let s = Scene::ConfirmClear;
        assert_eq!(key(&s, KeyCode::Char('y')), Some(Action::ClearConfirm));
        assert_eq!(key(&s, KeyCode::Char('n')), Some(Action::Back));
        assert_eq!(key(&s, KeyCode::Enter), None);
    }

    #[test]
    fn strategy_navigation() {
        let list = Scene::Strategies { cursor: 0 };
        assert_eq!(key(&list, KeyCode::Down), Some(Action::StrategiesMove(1)));
        assert_eq!(key(&list, KeyCode::Enter), Some(Action::StrategyOpen));
        let detail = Scene::Strategy { index: 2 };
        assert_eq!(key(&detail, KeyCode::Enter), Some(Action::StrategyComplete));
        assert_eq!(key(&detail, KeyCode::Esc), Some(Action::Back));
    }
}
