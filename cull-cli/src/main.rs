mod app;
mod tui;
mod ui;

use std::io::{self, stdout};
use std::time::{Duration, Instant};

use clap::Parser;
use color_eyre::Result;
use crossterm::{
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use cull_core::{Controller, SimHost, Timing};
use ratatui::{Terminal, backend::CrosstermBackend, style::Style, widgets::Widget};
use tracing_subscriber::EnvFilter;

use app::{Action, AppMode, AppState};
use tui::{AppEvent, EventHandler, handle_key};
use ui::{AppLayout, ChromeBar, Footer, Header, HelpView, ListView, Theme};

/// CULL - batch deletion against a simulated host page
#[derive(Parser, Debug)]
#[command(name = "cull")]
#[command(about = "Exercise the CULL batch-deletion controller against a simulated host page")]
#[command(version)]
struct Args {
    /// Number of items on the simulated host page
    #[arg(short, long, default_value_t = 12)]
    items: usize,

    /// Make every Nth item's delete flow time out (0 = never fail)
    #[arg(long, default_value_t = 0)]
    fail_every: usize,

    /// Auto re-render the host page every N milliseconds (0 = manual only)
    #[arg(long, default_value_t = 0)]
    churn_ms: u64,

    /// Shrink all controller timers for quick demonstration
    #[arg(long)]
    fast: bool,
}

fn main() -> Result<()> {
    color_eyre::install()?;

    // Diagnostics only when RUST_LOG is set; redirect stderr to keep the
    // screen clean, e.g. `RUST_LOG=cull_core=debug cull 2>cull.log`
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let args = Args::parse();

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    // Run app
    let result = run_app(&mut terminal, &args);

    // Restore terminal
    disable_raw_mode()?;
    execute!(io::stdout(), LeaveAlternateScreen)?;

    result
}

fn build_host(args: &Args) -> SimHost {
    let mut host = SimHost::new(args.items);
    if args.fail_every > 0 {
        for (idx, id) in host.item_ids().into_iter().enumerate() {
            if (idx + 1) % args.fail_every == 0 {
                host.fail_delete(id.as_str());
            }
        }
    }
    host
}

fn timing(args: &Args) -> Timing {
    if args.fast {
        Timing {
            armed_window: Duration::from_millis(1200),
            inter_item_pause: Duration::from_millis(400),
            settle_hold: Duration::from_millis(800),
            resync_debounce: Duration::from_millis(150),
        }
    } else {
        Timing::default()
    }
}

fn run_app(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>, args: &Args) -> Result<()> {
    let theme = Theme::default();
    let controller = Controller::with_timing(build_host(args), timing(args));
    let churn = (args.churn_ms > 0).then(|| Duration::from_millis(args.churn_ms));
    let mut state = AppState::new(controller, churn, Instant::now());
    let event_handler = EventHandler::new(50); // 50ms tick rate

    loop {
        // Draw UI
        terminal.draw(|frame| {
            let area = frame.area();
            let layout = AppLayout::new(area);

            // Background
            frame
                .buffer_mut()
                .set_style(area, Style::default().bg(theme.bg));

            // Update visible height for scrolling
            state.visible_height = layout.list.height as usize;

            Header::new(&state, &theme).render(layout.header, frame.buffer_mut());
            ChromeBar::new(&state, &theme).render(layout.chrome, frame.buffer_mut());
            ListView::new(&state, &theme).render(layout.list, frame.buffer_mut());

            if state.mode == AppMode::Help {
                HelpView::new(&theme).render(area, frame.buffer_mut());
            }

            Footer::new(&state, &theme).render(layout.footer, frame.buffer_mut());
        })?;

        // Advance churn and controller deadlines
        state.tick(Instant::now());

        // Handle events
        match event_handler.next()? {
            AppEvent::Key(key) => {
                let action = handle_key(key, state.mode);
                handle_action(&mut state, action, Instant::now());
            }
            AppEvent::Resize(_, _) => {
                // Terminal will redraw on next loop
            }
            AppEvent::Tick => {}
        }

        if state.should_quit {
            break;
        }
    }

    Ok(())
}

fn handle_action(state: &mut AppState, action: Action, now: Instant) {
    match action {
        Action::MoveUp => state.move_up(),
        Action::MoveDown => state.move_down(),
        Action::GoToFirst => state.go_to_first(),
        Action::GoToLast => state.go_to_last(),
        Action::ToggleMode => state.toggle_mode(now),
        Action::ClickItem => state.click_item(now),
        Action::PressAction => state.press_action(now),
        Action::ForceRerender => state.rerender_host(now),
        Action::ToggleAnchors => state.toggle_anchors(now),
        Action::ShowHelp => state.show_help(),
        Action::HideHelp => state.hide_help(),
        Action::Quit => state.quit(),
        Action::Tick => {}
    }
}
