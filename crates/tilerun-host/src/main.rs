use std::process::ExitCode;

use tokio::sync::mpsc;
use tracing_subscriber::EnvFilter;

use tilerun_platformer::config::TilerunConfig;
use tilerun_platformer::game_loop::LoopCommand;

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    tracing::info!("Tilerun host starting");

    let config = TilerunConfig::load();
    let level_spec = std::env::var("TILERUN_LEVEL").ok();

    let (cmd_tx, cmd_rx) = mpsc::unbounded_channel();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::info!("Interrupt received, stopping");
            let _ = cmd_tx.send(LoopCommand::Stop);
        }
    });

    match tilerun_host::run(config, level_spec.as_deref(), cmd_rx).await {
        Ok(summary) => {
            tracing::info!(
                ticks = summary.ticks,
                state = %summary.final_state,
                reason = ?summary.reason,
                "Tilerun host finished"
            );
            ExitCode::SUCCESS
        },
        Err(e) => {
            tracing::error!(error = %e, "Failed to start session");
            ExitCode::FAILURE
        },
    }
}
