use std::collections::BTreeMap;
use std::io;
use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

use clap::Parser;
use dom_wm::layout::floating::{
    HitRegion, ResizeEdge, header_buttons, header_rect, resize_handles_for_region,
};
use dom_wm::window::Gesture;
use dom_wm::{Bounds, Point, Size, WindowConfig, WindowId, WindowManager, WindowMode};

#[derive(Parser, Debug)]
#[command(
    name = "gesture-bench",
    version = env!("CARGO_PKG_VERSION"),
    about = "Replay random pointer gestures against a window manager and check its invariants"
)]
struct BenchCli {
    /// Number of pointer-down to pointer-up gestures to replay.
    #[arg(short = 'g', long = "gestures", default_value_t = 20_000)]
    gestures: u64,

    /// Pointer-move frames per gesture.
    #[arg(short = 'f', long = "frames", default_value_t = 24)]
    frames_per_gesture: u32,

    /// Live windows kept on screen.
    #[arg(short = 'w', long = "windows", default_value_t = 6)]
    windows: usize,

    /// Viewport width in pixels.
    #[arg(long, default_value_t = 1280)]
    width: u32,

    /// Viewport height in pixels.
    #[arg(long, default_value_t = 800)]
    height: u32,

    /// PRNG seed. Defaults to the clock.
    #[arg(long)]
    seed: Option<u64>,
}

struct BenchConfig {
    gestures: u64,
    frames_per_gesture: u32,
    windows: usize,
    viewport: Size,
    seed: u64,
}

impl TryFrom<&BenchCli> for BenchConfig {
    type Error = String;

    fn try_from(cli: &BenchCli) -> Result<Self, Self::Error> {
        if cli.gestures == 0 {
            return Err("gestures must be at least 1".to_string());
        }
        if !(1..=64).contains(&cli.windows) {
            return Err("windows must be between 1 and 64".to_string());
        }
        if cli.width < 400 || cli.height < 300 {
            return Err("viewport must be at least 400x300".to_string());
        }
        Ok(Self {
            gestures: cli.gestures,
            frames_per_gesture: cli.frames_per_gesture.max(1),
            windows: cli.windows,
            viewport: Size::new(cli.width, cli.height),
            seed: cli.seed.unwrap_or_else(seed_from_clock),
        })
    }
}

fn seed_from_clock() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or(0)
        ^ 0xA5A5_A5A5_1234_5678
}

fn main() -> io::Result<()> {
    let args = BenchCli::parse();
    let config = BenchConfig::try_from(&args)
        .map_err(|msg| io::Error::new(io::ErrorKind::InvalidInput, msg))?;

    let stats = run_benchmark(&config);
    println!("{}", stats.final_report(&config));

    if stats.violations.is_empty() {
        Ok(())
    } else {
        Err(io::Error::other(format!(
            "{} invariant violations",
            stats.violation_count
        )))
    }
}

struct Lcg {
    state: u64,
}

impl Lcg {
    fn new(seed: u64) -> Self {
        Self { state: seed }
    }

    fn next(&mut self) -> u32 {
        self.state = self.state.wrapping_mul(6364136223846793005).wrapping_add(1);
        (self.state >> 32) as u32
    }

    fn below(&mut self, bound: u32) -> u32 {
        if bound == 0 { 0 } else { self.next() % bound }
    }

    fn delta(&mut self, spread: u32) -> i32 {
        self.below(spread * 2 + 1) as i32 - spread as i32
    }
}

fn run_benchmark(config: &BenchConfig) -> BenchStats {
    let mut stats = BenchStats::new();
    let mut rng = Lcg::new(config.seed);
    let mut wm = WindowManager::new(config.viewport);
    for _ in 0..config.windows {
        wm.create_window(WindowConfig::new());
    }

    for _ in 0..config.gestures {
        if wm.len() < config.windows {
            wm.create_window(WindowConfig::new());
        }
        let order = wm.draw_order();
        let pick = order[rng.below(order.len() as u32) as usize];
        let Some(press) = press_point(&wm, pick, &mut rng) else {
            continue;
        };

        let gesture_start = Instant::now();
        let hit = wm.pointer_down_at(press);
        stats.record_press(hit.map(|(_, region)| region));
        check_invariants(&wm, config.viewport, false, None, &mut stats);

        let anchor = wm.active_gesture().and_then(|gesture| match gesture {
            Gesture::Resize(drag) if drag.edge == ResizeEdge::West => {
                Some((drag.id, drag.start_bounds.right()))
            }
            _ => None,
        });
        let mut pointer = press;
        let spread = config.viewport.width / 8;
        for _ in 0..config.frames_per_gesture {
            pointer.x += rng.delta(spread);
            pointer.y += rng.delta(spread);
            wm.pointer_move(pointer);
            stats.frames += 1;
            check_invariants(&wm, config.viewport, true, anchor, &mut stats);
        }
        if rng.below(10) == 0 {
            wm.cancel_gesture();
            stats.cancelled += 1;
        } else {
            wm.pointer_up();
        }
        check_invariants(&wm, config.viewport, false, None, &mut stats);
        stats.record_gesture(gesture_start.elapsed());
    }

    stats.mark_completed();
    stats
}

/// Somewhere worth pressing on window `id`: a header control, a resize
/// affordance or the title bar.
fn press_point(wm: &WindowManager, id: WindowId, rng: &mut Lcg) -> Option<Point> {
    let window = wm.window(id)?;
    let header_height = wm.config().header_height;
    let rect = window.visible_bounds(header_height);
    let flags = window.chrome_flags();

    let mut targets: Vec<Bounds> = Vec::new();
    let title_bar = header_rect(rect, header_height);
    targets.push(Bounds {
        width: title_bar.width / 2,
        ..title_bar
    });
    targets.extend(
        resize_handles_for_region(rect, flags)
            .into_iter()
            .map(|handle| handle.rect),
    );
    // closing is rare so the population stays mostly stable
    for button in header_buttons(rect, header_height, flags) {
        if button.region != HitRegion::Close || rng.below(20) == 0 {
            targets.push(button.rect);
        }
    }
    // weight drags and resizes over toggles
    let target = if rng.below(3) == 0 {
        targets[rng.below(targets.len() as u32) as usize]
    } else {
        targets[rng.below(targets.len().min(5) as u32) as usize]
    };
    Some(Point::new(
        target.x + (target.width / 2) as i32,
        target.y + (target.height / 2) as i32,
    ))
}

fn check_invariants(
    wm: &WindowManager,
    viewport: Size,
    moved: bool,
    west_anchor: Option<(WindowId, i32)>,
    stats: &mut BenchStats,
) {
    let mut seen_z = BTreeMap::new();
    for window in wm.windows() {
        let b = window.bounds();
        let min = window.min_size();
        if b.width < min.width || b.height < min.height {
            stats.violation(format!("{} below min size: {b:?}", window.id()));
        }
        if window.mode() == WindowMode::Normal && (b.x < 0 || b.y < 0) {
            stats.violation(format!("{} off the top/left edge: {b:?}", window.id()));
        }
        if let Some(other) = seen_z.insert(window.z_index(), window.id()) {
            stats.violation(format!(
                "{} and {other} share z-index {}",
                window.id(),
                window.z_index()
            ));
        }
    }

    // a drag only pulls its window on screen once the pointer has moved
    match wm.active_gesture() {
        Some(Gesture::Drag(drag)) if moved => {
            if let Some(window) = wm.window(drag.id) {
                let b = window.bounds();
                let fits_x = b.width > viewport.width || b.right() <= viewport.width as i32;
                let fits_y = b.height > viewport.height || b.bottom() <= viewport.height as i32;
                if !fits_x || !fits_y {
                    stats.violation(format!("{} dragged off screen: {b:?}", drag.id));
                }
            }
        }
        _ => {}
    }

    if let Some((id, right)) = west_anchor
        && let Some(window) = wm.window(id)
        && window.mode() == WindowMode::Normal
        && window.bounds().right() != right
    {
        stats.violation(format!(
            "{id} west resize moved right edge {right} -> {}",
            window.bounds().right()
        ));
    }
}

const MAX_REPORTED_VIOLATIONS: usize = 10;

struct BenchStats {
    start: Instant,
    completed_at: Option<Instant>,
    gestures: u64,
    frames: u64,
    cancelled: u64,
    presses: BTreeMap<&'static str, u64>,
    slowest_gesture: Duration,
    violation_count: u64,
    violations: Vec<String>,
}

impl BenchStats {
    fn new() -> Self {
        Self {
            start: Instant::now(),
            completed_at: None,
            gestures: 0,
            frames: 0,
            cancelled: 0,
            presses: BTreeMap::new(),
            slowest_gesture: Duration::ZERO,
            violation_count: 0,
            violations: Vec::new(),
        }
    }

    fn elapsed(&self) -> Duration {
        match self.completed_at {
            Some(done) => done.duration_since(self.start),
            None => self.start.elapsed(),
        }
    }

    fn mark_completed(&mut self) {
        self.completed_at = Some(Instant::now());
    }

    fn record_press(&mut self, region: Option<HitRegion>) {
        let label = match region {
            None => "miss",
            Some(HitRegion::Close) => "close",
            Some(HitRegion::Minimize) => "minimize",
            Some(HitRegion::Maximize) => "maximize",
            Some(HitRegion::Header) => "drag",
            Some(HitRegion::Resize(_)) => "resize",
            Some(HitRegion::Content) => "content",
        };
        *self.presses.entry(label).or_default() += 1;
    }

    fn record_gesture(&mut self, took: Duration) {
        self.gestures = self.gestures.saturating_add(1);
        if took > self.slowest_gesture {
            self.slowest_gesture = took;
        }
    }

    fn violation(&mut self, message: String) {
        self.violation_count += 1;
        if self.violations.len() < MAX_REPORTED_VIOLATIONS {
            self.violations.push(message);
        }
    }

    fn final_report(&self, config: &BenchConfig) -> String {
        let elapsed = self.elapsed().as_secs_f64();
        let frames_per_sec = if elapsed > 0.0 {
            self.frames as f64 / elapsed
        } else {
            0.0
        };
        let presses = self
            .presses
            .iter()
            .map(|(label, count)| format!("{label} {count}"))
            .collect::<Vec<_>>()
            .join(", ");
        let violations = if self.violations.is_empty() {
            "none".to_string()
        } else {
            self.violations.join("\n  ")
        };

        indoc::formatdoc!(
            r#"
            Gesture bench (seed {seed:#x}, viewport {viewport}).
            Gestures: {gestures} ({cancelled} cancelled) | Frames: {frames} (~{fps:.0}/s)
            Elapsed: {elapsed:.2}s | Slowest gesture: {slowest:.3} ms
            Presses: {presses}
            Violations ({count}): {violations}
            "#,
            seed = config.seed,
            viewport = config.viewport,
            gestures = self.gestures,
            cancelled = self.cancelled,
            frames = self.frames,
            fps = frames_per_sec,
            elapsed = elapsed,
            slowest = self.slowest_gesture.as_secs_f64() * 1_000.0,
            presses = presses,
            count = self.violation_count,
            violations = violations,
        )
    }
}
