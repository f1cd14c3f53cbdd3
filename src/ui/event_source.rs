use std::time::Duration;

use anyhow::Result;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::{
    domain::events::{AppEvent, KeyInput},
    usecases::contracts::AppEventSource,
};

/// Also the tick period that drives simulated delivery.
const EVENT_POLL_TIMEOUT: Duration = Duration::from_millis(100);

#[derive(Default)]
pub struct CrosstermEventSource;

impl AppEventSource for CrosstermEventSource {
    fn next_event(&mut self) -> Result<Option<AppEvent>> {
        if !event::poll(EVENT_POLL_TIMEOUT)? {
            return Ok(Some(AppEvent::Tick));
        }

        match event::read()? {
            Event::Key(key) => Ok(map_key_event(key)),
            // Redraw happens on every loop iteration anyway.
            Event::Resize(..) => Ok(Some(AppEvent::Tick)),
            _ => Ok(None),
        }
    }
}

/// Translates a crossterm key press into the shell's key vocabulary.
fn map_key_event(key: KeyEvent) -> Option<AppEvent> {
    if key.kind != KeyEventKind::Press {
        return None;
    }

    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    if ctrl && key.code == KeyCode::Char('c') {
        return Some(AppEvent::QuitRequested);
    }

    let name = match key.code {
        KeyCode::Char(ch) => ch.to_string(),
        KeyCode::Enter => "enter".to_owned(),
        KeyCode::Esc => "esc".to_owned(),
        KeyCode::Backspace => "backspace".to_owned(),
        KeyCode::Delete => "delete".to_owned(),
        KeyCode::Tab => "tab".to_owned(),
        KeyCode::BackTab => "backtab".to_owned(),
        KeyCode::Up => "up".to_owned(),
        KeyCode::Down => "down".to_owned(),
        KeyCode::Left => "left".to_owned(),
        KeyCode::Right => "right".to_owned(),
        KeyCode::Home => "home".to_owned(),
        KeyCode::End => "end".to_owned(),
        _ => return None,
    };

    Some(AppEvent::InputKey(KeyInput::new(name, ctrl)))
}

#[cfg(test)]
pub struct MockEventSource {
    queue: std::collections::VecDeque<AppEvent>,
}

#[cfg(test)]
impl MockEventSource {
    pub fn from(events: Vec<AppEvent>) -> Self {
        Self {
            queue: events.into(),
        }
    }
}

#[cfg(test)]
impl AppEventSource for MockEventSource {
    fn next_event(&mut self) -> Result<Option<AppEvent>> {
        Ok(self.queue.pop_front())
    }
}

#[cfg(test)]
mod tests {
    use crossterm::event::KeyEventState;

    use super::*;

    fn press(code: KeyCode, modifiers: KeyModifiers) -> KeyEvent {
        KeyEvent {
            code,
            modifiers,
            kind: KeyEventKind::Press,
            state: KeyEventState::NONE,
        }
    }

    #[test]
    fn ctrl_c_requests_quit() {
        let event = map_key_event(press(KeyCode::Char('c'), KeyModifiers::CONTROL));

        assert_eq!(event, Some(AppEvent::QuitRequested));
    }

    #[test]
    fn plain_q_is_left_to_the_shell() {
        let event = map_key_event(press(KeyCode::Char('q'), KeyModifiers::NONE));

        assert_eq!(event, Some(AppEvent::InputKey(KeyInput::plain("q"))));
    }

    #[test]
    fn named_keys_are_mapped() {
        let cases = [
            (KeyCode::Enter, "enter"),
            (KeyCode::Esc, "esc"),
            (KeyCode::Backspace, "backspace"),
            (KeyCode::BackTab, "backtab"),
            (KeyCode::Up, "up"),
            (KeyCode::End, "end"),
        ];

        for (code, name) in cases {
            assert_eq!(
                map_key_event(press(code, KeyModifiers::NONE)),
                Some(AppEvent::InputKey(KeyInput::plain(name)))
            );
        }
    }

    #[test]
    fn release_events_and_unknown_keys_are_ignored() {
        let mut release = press(KeyCode::Char('j'), KeyModifiers::NONE);
        release.kind = KeyEventKind::Release;

        assert_eq!(map_key_event(release), None);
        assert_eq!(map_key_event(press(KeyCode::F(5), KeyModifiers::NONE)), None);
    }

    #[test]
    fn mock_source_replays_events_in_order() {
        let mut source = MockEventSource::from(vec![AppEvent::Tick, AppEvent::QuitRequested]);

        assert_eq!(source.next_event().expect("event"), Some(AppEvent::Tick));
        assert_eq!(
            source.next_event().expect("event"),
            Some(AppEvent::QuitRequested)
        );
        assert_eq!(source.next_event().expect("event"), None);
    }
}
