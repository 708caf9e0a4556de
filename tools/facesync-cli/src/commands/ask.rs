//! Ask the dialogue model for a reply.

use facesync_common::config::AppConfig;
use facesync_dialogue::{DialogueClient, FALLBACK_REPLY};

pub async fn run(
    config: &AppConfig,
    prompt: String,
    model: Option<String>,
    fallback: bool,
) -> anyhow::Result<()> {
    let client = DialogueClient::new(&config.dialogue)?;

    match client.generate(&prompt, model.as_deref()).await {
        Ok(reply) => println!("{reply}"),
        Err(e) if fallback => {
            tracing::warn!(error = %e, "Dialogue failed, using fallback reply");
            println!("{FALLBACK_REPLY}");
        }
        Err(e) => return Err(e.into()),
    }
    Ok(())
}
