/*
 *  main.rs
 *
 *  timeclock - full-screen zener clock
 *  (c) 2020-26 Stuart Hunter
 *
 *	This program is free software: you can redistribute it and/or modify
 *	it under the terms of the GNU General Public License as published by
 *	the Free Software Foundation, either version 3 of the License, or
 *	(at your option) any later version.
 *
 *	This program is distributed in the hope that it will be useful,
 *	but WITHOUT ANY WARRANTY; without even the implied warranty of
 *	MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
 *	GNU General Public License for more details.
 *
 *	See <http://www.gnu.org/licenses/> to get a copy of the GNU General
 *	Public License.
 *
 */

use std::fs::OpenOptions;
use std::time::Instant;

use anyhow::Context;
use env_logger::{Env, Target};
use log::{error, info};
use tokio::sync::mpsc;

#[cfg(unix)] // Only compile this block on Unix-like systems
use tokio::signal::unix::{signal, SignalKind};

use timeclock::config::{self, Config};
use timeclock::display::components::SystemClock;
use timeclock::display::drivers::TerminalSurface;
use timeclock::display::{DisplayScheduler, RenderSurface};
use timeclock::input::{self, HostEvent, VisibilityTracker};

include!(concat!(env!("OUT_DIR"), "/build_info.rs"));

type TerminalScheduler = DisplayScheduler<SystemClock, TerminalSurface>;

/// Single cooperative loop: timer deadlines and host events are served from
/// this one task, so scheduler state never sees concurrent access.
async fn display_loop(scheduler: &mut TerminalScheduler, mut events: mpsc::UnboundedReceiver<HostEvent>) {
    let mut tracker = VisibilityTracker::default();
    scheduler.set_visibility(tracker.visibility(), Instant::now());

    info!("Entering main display loop");
    loop {
        let deadline = scheduler.next_deadline();

        tokio::select! {
            ev = events.recv() => {
                match ev {
                    None | Some(HostEvent::Quit) => break,
                    Some(HostEvent::Toggle) => {
                        scheduler.toggle_theme().map(|_| ()).unwrap_or_else(|e|
                            error!("Failed to apply theme colors: {}", e));
                    }
                    Some(HostEvent::Focus(focused)) => {
                        scheduler.set_visibility(tracker.set_focus(focused), Instant::now());
                    }
                    Some(HostEvent::TogglePause) => {
                        scheduler.set_visibility(tracker.toggle_pause(), Instant::now());
                    }
                    Some(HostEvent::Resize(cols, rows)) => {
                        let surface = scheduler.surface_mut();
                        surface.resize(cols, rows);
                        surface.flush().unwrap_or_else(|e|
                            error!("Failed to redraw after resize: {}", e));
                    }
                }
            }
            _ = wait_until(deadline) => {
                scheduler.poll(Instant::now());
            }
        }
    }
}

/// Sleep until the next timer deadline; park forever while inactive
async fn wait_until(deadline: Option<Instant>) {
    match deadline {
        Some(d) => tokio::time::sleep_until(tokio::time::Instant::from_std(d)).await,
        None => std::future::pending::<()>().await,
    }
}

/// Asynchronously waits for a SIGINT, SIGTERM, or SIGHUP signal.
///
/// Raw mode swallows Ctrl-C as a key, so these mostly arrive from outside.
#[cfg(unix)]
async fn signal_handler() -> Result<(), std::io::Error> {
    let mut sigint = signal(SignalKind::interrupt())?;
    let mut sigterm = signal(SignalKind::terminate())?;
    let mut sighup = signal(SignalKind::hangup())?;

    tokio::select! {
        _ = sigint.recv() => {
            info!("SIGINT received. Initiating graceful shutdown.");
        }
        _ = sigterm.recv() => {
            info!("SIGTERM received. Initiating graceful shutdown.");
        }
        _ = sighup.recv() => {
            info!("SIGHUP received. Initiating graceful shutdown.");
        }
    }
    Ok(())
}

#[cfg(not(unix))]
async fn signal_handler() -> Result<(), std::io::Error> {
    tokio::signal::ctrl_c().await?;
    info!("Ctrl-C received. Initiating graceful shutdown.");
    Ok(())
}

fn init_logging(cfg: &Config) -> anyhow::Result<()> {
    let mut builder = env_logger::Builder::from_env(Env::default().default_filter_or(cfg.log_level()));
    builder.format_timestamp_secs();
    if let Some(path) = cfg.log_file.as_ref() {
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .with_context(|| format!("cannot open log file {}", path.display()))?;
        builder.target(Target::Pipe(Box::new(file)));
    }
    builder.init();
    Ok(())
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let (cfg, cli) = config::load().context("failed to load configuration")?;

    if cli.dump_config {
        // Pretty YAML of effective config (nice for debugging)
        println!("{}", serde_yaml::to_string(&cfg)?);
        return Ok(());
    }

    init_logging(&cfg)?;

    info!("{} v.{} built {}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"), BUILD_DATE);

    let surface = TerminalSurface::stdout().context("failed to take over the terminal")?;
    let mut scheduler = DisplayScheduler::with_jitter(
        cfg.scheduler_config(),
        SystemClock,
        surface,
        cfg.build_jitter(),
    );

    let (tx, rx) = mpsc::unbounded_channel();
    // blocked in event::read until process exit, never joined
    let _reader = input::spawn_reader(tx);

    tokio::select! {
        // Handle Unix signals for graceful shutdown
        res = signal_handler() => {
            if let Err(e) = res {
                error!("Signal handler failed: {}", e);
            }
        }
        _ = display_loop(&mut scheduler, rx) => {
            info!("Closed display loop.");
        }
    }

    info!("Main application exiting. Restoring terminal.");
    scheduler.into_surface().restore();

    Ok(())
}
