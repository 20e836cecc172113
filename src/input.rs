use crossterm::event::{self, Event, KeyCode, KeyEventKind, KeyModifiers};
use life_braille::{ShapeCatalog, SpeedLevel};
use std::time::Duration;

#[derive(Clone, Debug)]
pub(crate) struct InputEvent {
    pub(crate) key: KeyCode,
    pub(crate) mods: KeyModifiers,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Command {
    MoveCursor(isize, isize),
    Toggle,
    Stamp(char),
    Speed(SpeedLevel),
    Quit,
}

/// Wait up to `wait` for the first key, then drain whatever else is queued.
pub(crate) fn collect_input(wait: Duration) -> anyhow::Result<Vec<InputEvent>> {
    let mut out = Vec::new();
    let mut timeout = wait;
    while event::poll(timeout)? {
        if let Event::Key(k) = event::read()? {
            if k.kind == KeyEventKind::Press || k.kind == KeyEventKind::Repeat {
                out.push(InputEvent {
                    key: k.code,
                    mods: k.modifiers,
                });
                if out.len() >= 32 {
                    break;
                }
            }
        }
        timeout = Duration::ZERO;
    }
    Ok(out)
}

pub(crate) fn map_event(catalog: &ShapeCatalog, step: u16, ev: &InputEvent) -> Option<Command> {
    let step = step as isize;
    match ev.key {
        KeyCode::Char('c') if ev.mods.contains(KeyModifiers::CONTROL) => Some(Command::Quit),
        KeyCode::Esc | KeyCode::Char('q') => Some(Command::Quit),
        KeyCode::Left => Some(Command::MoveCursor(-step, 0)),
        KeyCode::Right => Some(Command::MoveCursor(step, 0)),
        KeyCode::Up => Some(Command::MoveCursor(0, -step)),
        KeyCode::Down => Some(Command::MoveCursor(0, step)),
        KeyCode::Char(' ') => Some(Command::Toggle),
        KeyCode::Char(ch) if ch.is_ascii_digit() => {
            let level = ch.to_digit(10)? as u8;
            SpeedLevel::new(level).map(Command::Speed)
        }
        KeyCode::Char(ch) => catalog.find(ch).map(|s| Command::Stamp(s.key)),
        _ => None,
    }
}
