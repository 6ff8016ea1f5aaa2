use anyhow::Result;
use crossterm::{
    event::{self, Event, KeyEventKind},
    execute, terminal,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen},
};
use moodlog::api::{HttpApi, wait_until_healthy};
use moodlog::app::{App, AppMsg, Effect, Remote, channel};
use moodlog::config::{HEALTH_ATTEMPTS, HEALTH_DELAY, TICK_INTERVAL, resolve_api_url};
use moodlog::ui;
use ratatui::{Terminal, backend::CrosstermBackend};
use std::io;
use std::time::Instant;
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt};

/// Restores the terminal when dropped, so an early return or a panic never
/// leaves the shell in raw mode.
struct TerminalGuard;

impl TerminalGuard {
    fn enter() -> Result<Self> {
        terminal::enable_raw_mode()?;
        execute!(io::stdout(), EnterAlternateScreen)?;
        Ok(Self)
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = terminal::disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
    }
}

fn install_panic_hook() {
    let default_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let _ = terminal::disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        default_hook(info);
    }));
}

#[tokio::main]
async fn main() -> Result<()> {
    fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("warn".parse()?))
        .with_writer(io::stderr)
        .init();

    let base_url = resolve_api_url();
    info!("using journal service at {base_url}");
    let api = HttpApi::new(base_url);

    let (tx, mut rx) = channel();
    let remote = Remote::new(api.clone(), tx.clone());

    // Bounded readiness probe; the UI starts immediately and the outcome
    // arrives as a message like any other fetch.
    tokio::spawn(async move {
        let healthy = wait_until_healthy(&api, HEALTH_ATTEMPTS, HEALTH_DELAY).await;
        let _ = tx.send(AppMsg::HealthChecked(healthy));
    });
    remote.reload_all();

    install_panic_hook();
    let _guard = TerminalGuard::enter()?;
    let mut terminal = Terminal::new(CrosstermBackend::new(io::stdout()))?;

    let mut app = App::new();
    while !app.should_quit {
        let now = Instant::now();
        app.notices.prune(now);
        terminal.draw(|f| ui::draw(f, &app))?;

        let mut effects = Vec::new();
        if event::poll(TICK_INTERVAL)? {
            if let Event::Key(key) = event::read()? {
                if key.kind != KeyEventKind::Release {
                    effects.push(app.handle_key(key, now));
                }
            }
        }
        while let Ok(msg) = rx.try_recv() {
            effects.push(app.handle_msg(msg, now));
        }

        for effect in effects {
            match effect {
                Effect::Submit(entry) => remote.submit(entry),
                Effect::Reload => remote.reload_all(),
                Effect::None => {}
            }
        }
    }

    Ok(())
}
