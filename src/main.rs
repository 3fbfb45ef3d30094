use std::io;
use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use crossterm::event::{self, Event, KeyCode};
use crossterm::terminal::{EnterAlternateScreen, LeaveAlternateScreen};
use crossterm::{execute, terminal};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use ratatui::prelude::Rect;
use ratatui::style::{Color, Style};

use dom_wm::colors::Rgba;
use dom_wm::event_loop::{ControlFlow, CrosstermEvents, EventLoop, route_event};
use dom_wm::theme::ThemeRegistry;
use dom_wm::window::decorator::{Renderer, TerminalDecorator};
use dom_wm::{SharedViewport, WindowConfig, WindowManager};

const WINDOW_TYPES: [&str; 3] = ["Notes", "Inbox", "Palette"];

#[derive(Parser, Debug)]
#[command(about = "Drive the dom-wm window state machine from a terminal")]
struct Args {
    /// Pixel width of one terminal cell.
    #[arg(long, default_value_t = 8)]
    cell_width: u32,
    /// Pixel height of one terminal cell.
    #[arg(long, default_value_t = 16)]
    cell_height: u32,
    /// Windows opened at startup.
    #[arg(long, default_value_t = 3)]
    windows: usize,
    /// Write logs here instead of discarding them behind the alternate screen.
    #[arg(long)]
    log_file: Option<PathBuf>,
}

fn main() -> io::Result<()> {
    let args = Args::parse();
    dom_wm::tracing_sub::init(args.log_file.as_deref())?;

    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, event::EnableMouseCapture)?;
    terminal::enable_raw_mode()?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run(&mut terminal, &args);

    terminal::disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        event::DisableMouseCapture,
        LeaveAlternateScreen
    )?;
    terminal.show_cursor()?;

    result
}

fn area_of(cols: u16, rows: u16) -> Rect {
    Rect::new(0, 0, cols, rows)
}

fn build_manager(viewport: SharedViewport) -> WindowManager {
    let mut themes = ThemeRegistry::new();
    themes.register_base("ocean", Rgba::rgb(0x2b, 0x6c, 0xb0));
    themes.register_base("forest", Rgba::rgb(0x2f, 0x85, 0x5a));

    let mut windows = WindowManager::new(viewport).with_theme_provider(themes);
    windows.register_window_type(
        "Notes",
        WindowConfig::new()
            .named_theme("ocean")
            .content("<p>Drag the header to move. Grab an edge to resize.</p>"),
    );
    windows.register_window_type(
        "Inbox",
        WindowConfig::new()
            .named_theme("forest")
            .size(360, 240)
            .content("<p>Escape cancels a drag in progress.</p>"),
    );
    windows.register_window_type(
        "Palette",
        WindowConfig::new()
            .base_color(Rgba::rgb(0x8e, 0x44, 0xad))
            .resizable(false)
            .allow_maximize(false)
            .size(280, 200)
            .content("<p>Fixed size. Close with x.</p>"),
    );
    windows
}

fn run(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>, args: &Args) -> io::Result<()> {
    let decorator = TerminalDecorator::new(args.cell_width, args.cell_height);
    let size = terminal.size()?;
    let viewport = SharedViewport::new(decorator.viewport_for(area_of(size.width, size.height)));
    let mut windows = build_manager(viewport.clone());
    let mut opened = 0usize;
    for _ in 0..args.windows {
        windows.create_window_by_type(WINDOW_TYPES[opened % WINDOW_TYPES.len()]);
        opened += 1;
    }

    let mut event_loop = EventLoop::new(CrosstermEvents, Duration::from_millis(16));
    event_loop.run(|event| {
        let Some(event) = event else {
            terminal.draw(|frame| {
                let area = frame.area();
                let buffer = frame.buffer_mut();
                for snapshot in windows.snapshots() {
                    let style = windows.style_for(snapshot.id).unwrap_or_default();
                    decorator.render(buffer, &snapshot, &style);
                }
                let status = format!(
                    " {} windows | n: new window | Esc: cancel gesture | q: quit ",
                    windows.len()
                );
                let row = area.bottom().saturating_sub(1);
                buffer.set_string(
                    area.x,
                    row,
                    status,
                    Style::default().fg(Color::Black).bg(Color::Gray),
                );
            })?;
            return Ok(ControlFlow::Continue);
        };
        match &event {
            Event::Resize(cols, rows) => {
                viewport.set(decorator.viewport_for(area_of(*cols, *rows)));
                Ok(ControlFlow::Continue)
            }
            Event::Key(key) if key.code == KeyCode::Char('n') => {
                windows.create_window_by_type(WINDOW_TYPES[opened % WINDOW_TYPES.len()]);
                opened += 1;
                Ok(ControlFlow::Continue)
            }
            _ => Ok(route_event(&mut windows, &decorator, &event)),
        }
    })
}
