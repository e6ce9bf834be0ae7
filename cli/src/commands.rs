//! Interactive shell: a live detector on the system clock, driven by typed
//! commands and a background tick task.

use std::sync::Arc;
use std::time::Duration;

use clap::{Parser, Subcommand};
use ghostwatch_core::{GhostTotemDetector, Verdict};
use ghostwatch_types::DetectorConfig;
use tokio::sync::RwLock;
use tokio::task::JoinHandle;

use crate::scripted::ScriptedClient;

pub struct Shell {
    pub detector: GhostTotemDetector,
    pub client: ScriptedClient,
}

impl Shell {
    pub fn new(config: DetectorConfig, name: &str) -> Self {
        Self {
            detector: GhostTotemDetector::new(config),
            client: ScriptedClient::new(name),
        }
    }

    pub fn tick(&mut self) -> Option<Verdict> {
        let verdict = self.detector.tick(&mut self.client);
        self.flush();
        verdict
    }

    /// Print everything the detector sent since the last flush.
    pub fn flush(&mut self) {
        for output in self.client.drain_outputs() {
            println!("{}", output.render());
        }
    }
}

/// Tick the shared detector at the configured tick length until aborted.
pub fn spawn_ticker(shell: Arc<RwLock<Shell>>) -> JoinHandle<()> {
    tokio::spawn(async move {
        let tick_millis = shell.read().await.detector.config().tick_millis;
        let mut interval = tokio::time::interval(Duration::from_millis(tick_millis));
        loop {
            interval.tick().await;
            shell.write().await.tick();
        }
    })
}

#[derive(Parser)]
#[command(about = "ghostwatch shell")]
struct ShellCli {
    #[command(subcommand)]
    command: Option<ShellCommand>,
}

#[derive(Subcommand)]
enum ShellCommand {
    /// Toggle chat macro mode
    Macro,
    /// Toggle clipboard mode
    Clipboard,
    /// Put a totem in hand
    Hold {
        #[arg(long)]
        offhand: bool,
    },
    Drop,
    Wipe,
    Kill,
    Respawn,
    Spectate,
    /// Feed a chat line, e.g. chat "Steve was killed by Alex"
    Chat { line: String },
    Health { value: f32 },
    /// Server-confirmed revive
    Pop,
    Nearby { names: Vec<String> },
    Status,
    Exit,
}

/// Handle one shell line. Returns `Ok(true)` when the shell should quit.
pub async fn respond(line: &str, shell: Arc<RwLock<Shell>>) -> Result<bool, String> {
    let mut args = shlex::split(line).ok_or("error: Invalid quoting")?;
    args.insert(0, "gd".to_string());
    let cli = ShellCli::try_parse_from(args).map_err(|e| e.to_string())?;

    let mut s = shell.write().await;
    let Shell { detector, client } = &mut *s;
    match cli.command {
        Some(ShellCommand::Macro) => {
            detector.toggle_macro_mode(client);
        }
        Some(ShellCommand::Clipboard) => {
            detector.toggle_clipboard_mode(client);
        }
        Some(ShellCommand::Hold { offhand }) => client.hold_totem(offhand),
        Some(ShellCommand::Drop) => client.drop_totems(),
        Some(ShellCommand::Wipe) => client.wipe_inventory(detector.config().main_inventory_slots),
        Some(ShellCommand::Kill) => client.kill(),
        Some(ShellCommand::Respawn) => client.respawn(),
        Some(ShellCommand::Spectate) => client.spectate(),
        Some(ShellCommand::Chat { line }) => {
            detector.on_chat_line(client, &line);
        }
        Some(ShellCommand::Health { value }) => {
            if let Some(player) = client.player_mut() {
                player.health = value;
            }
            detector.on_health_update(client, value);
        }
        Some(ShellCommand::Pop) => detector.on_legitimate_revive_pop(),
        Some(ShellCommand::Nearby { names }) => client.set_nearby(&names),
        Some(ShellCommand::Status) => print_status(detector, client),
        Some(ShellCommand::Exit) => return Ok(true),
        None => {}
    }
    s.flush();
    Ok(false)
}

fn print_status(detector: &GhostTotemDetector, client: &ScriptedClient) {
    println!("mode: {}", detector.delivery_mode());
    println!("ticks: {}", detector.tick_count());
    match detector.tracker().session() {
        Some(session) => println!("tracking: {} since tick {}", session.hand, session.equip_tick),
        None => println!("tracking: no"),
    }
    if detector.warning_active() {
        println!("warning: totem in inventory but not in hand");
    }
    if let Some(player) = &client.player {
        println!(
            "player: {} health={} mode={:?} main={:?} off={:?}",
            player.name, player.health, player.game_mode, player.main_hand, player.off_hand
        );
    }

    let diagnostics = detector.diagnostics();
    println!(
        "verdicts: {} ghost, {} ordinary, {} undelivered",
        diagnostics.ghost_verdicts, diagnostics.ordinary_deaths, diagnostics.failed_deliveries
    );
    if let Some(time) = diagnostics.last_ghost_totem_time {
        println!("last ghost: {}", time.format("%H:%M:%S%.3f"));
    }
    if let Some(held) = diagnostics.ghost_totem_hold_ms {
        println!("last hold: {held}ms");
    }
}
