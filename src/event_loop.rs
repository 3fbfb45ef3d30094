use std::io;
use std::time::Duration;

use crossterm::event::{Event, KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEventKind};

use crate::window::WindowManager;
use crate::window::decorator::TerminalDecorator;

pub enum ControlFlow {
    Continue,
    Quit,
}

/// Where input events come from. Real runs poll crossterm; tests script a
/// queue.
pub trait EventSource {
    fn poll(&mut self, timeout: Duration) -> io::Result<bool>;
    fn read(&mut self) -> io::Result<Event>;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct CrosstermEvents;

impl EventSource for CrosstermEvents {
    fn poll(&mut self, timeout: Duration) -> io::Result<bool> {
        crossterm::event::poll(timeout)
    }

    fn read(&mut self) -> io::Result<Event> {
        crossterm::event::read()
    }
}

/// Drives the demo UI thread: poll, dispatch, repeat.
///
/// The handler gets `Some(event)` for input and `None` when the poll
/// interval elapses, which is where callers draw.
pub struct EventLoop<S> {
    source: S,
    poll_interval: Duration,
}

impl<S: EventSource> EventLoop<S> {
    pub fn new(source: S, poll_interval: Duration) -> Self {
        Self {
            source,
            poll_interval,
        }
    }

    pub fn run<F>(&mut self, mut handler: F) -> io::Result<()>
    where
        F: FnMut(Option<Event>) -> io::Result<ControlFlow>,
    {
        loop {
            if let ControlFlow::Quit = handler(None)? {
                break;
            }

            if self.source.poll(self.poll_interval)? {
                // Drain bursts (drags produce one event per cell) before the
                // next draw so rendering never lags the pointer.
                loop {
                    let event = self.source.read()?;
                    if let ControlFlow::Quit = handler(Some(event))? {
                        return Ok(());
                    }
                    if !self.source.poll(Duration::from_millis(0))? {
                        break;
                    }
                }
            }
        }
        Ok(())
    }
}

fn is_quit(key: &KeyEvent) -> bool {
    matches!(key.code, KeyCode::Char('q'))
        || (key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL))
}

/// Translate one terminal event into window manager calls. Mouse cells are
/// converted to pixels through `decorator`; Escape cancels the running
/// gesture.
pub fn route_event(
    windows: &mut WindowManager,
    decorator: &TerminalDecorator,
    event: &Event,
) -> ControlFlow {
    match event {
        Event::Mouse(mouse) => {
            let at = decorator.cell_to_point(mouse.column, mouse.row);
            match mouse.kind {
                MouseEventKind::Down(MouseButton::Left) => {
                    if let Some((id, region)) = windows.pointer_down_at(at) {
                        tracing::trace!(window_id = %id, ?region, "pointer down");
                    }
                }
                MouseEventKind::Drag(MouseButton::Left) | MouseEventKind::Moved => {
                    windows.pointer_move(at);
                }
                MouseEventKind::Up(MouseButton::Left) => {
                    windows.pointer_up();
                }
                _ => {}
            }
            ControlFlow::Continue
        }
        Event::Key(key) if key.code == KeyCode::Esc => {
            windows.cancel_gesture();
            ControlFlow::Continue
        }
        Event::Key(key) if is_quit(key) => ControlFlow::Quit,
        _ => ControlFlow::Continue,
    }
}
