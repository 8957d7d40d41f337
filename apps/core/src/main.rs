// Huddle breakout planner
// Reads a meeting transcript and prints the proposed breakout rooms as JSON.

use anyhow::{anyhow, Context};
use huddle_core::telemetry::{self, LogFormat};
use huddle_core::{plan_breakouts, BreakoutConfig, SessionTranscript};
use tracing::{error, info};

fn main() -> anyhow::Result<()> {
    telemetry::init_tracing(LogFormat::from_env()).map_err(|e| anyhow!(e))?;

    let path = std::env::args()
        .nth(1)
        .context("usage: huddle <transcript.json>")?;

    let config = BreakoutConfig::from_env().context("Failed to load breakout configuration")?;
    info!(?config, "Configuration loaded");

    let transcript = match SessionTranscript::load(&path) {
        Ok(transcript) => transcript,
        Err(e) => {
            error!("Failed to load transcript {}: {}", path, e);
            return Err(e.into());
        }
    };

    let plan = plan_breakouts(&config, &transcript.participants, &transcript.messages);
    println!("{}", serde_json::to_string_pretty(&plan)?);
    Ok(())
}
