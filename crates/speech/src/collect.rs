//! Collecting an engine's viseme stream while it synthesizes.

use facesync_animation_model::viseme::VisemeEvent;
use facesync_common::error::FacesyncResult;

use crate::engine::{SpeechAudio, SpeechEngine, SpeechRequest, VisemeSink};

/// Channel capacity between an engine and its collector.
pub const VISEME_CHANNEL_CAPACITY: usize = 64;

/// Everything an engine produced for one request.
#[derive(Debug, Clone, PartialEq)]
pub struct CollectedSpeech {
    pub audio: SpeechAudio,
    /// Viseme events in arrival order.
    pub events: Vec<VisemeEvent>,
}

/// Run `engine` on `request`, draining its viseme events concurrently.
///
/// Returns once the engine has finished and every event it sent has been
/// received. An engine failure is returned as-is; events collected before
/// the failure are discarded.
pub async fn collect_visemes<E: SpeechEngine>(
    engine: &E,
    request: &SpeechRequest,
) -> FacesyncResult<CollectedSpeech> {
    let (sink, mut rx) = VisemeSink::channel(VISEME_CHANNEL_CAPACITY);

    let synthesis = engine.speak(request, sink);
    let drain = async {
        let mut events = Vec::new();
        while let Some(event) = rx.recv().await {
            events.push(event);
        }
        events
    };

    let (audio, events) = tokio::join!(synthesis, drain);
    let audio = audio?;

    tracing::debug!(
        engine = engine.name(),
        events = events.len(),
        audio_bytes = audio.len(),
        "Collected viseme stream"
    );

    Ok(CollectedSpeech { audio, events })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::AudioFormat;
    use crate::scripted::ScriptedEngine;
    use crate::ssml::VoiceConfig;
    use facesync_animation_model::viseme::VisemeAnimation;
    use facesync_common::error::FacesyncError;

    fn events(count: u32) -> Vec<VisemeEvent> {
        (0..count)
            .map(|i| VisemeEvent {
                audio_offset_ticks: u64::from(i) * 500_000,
                viseme_id: i,
                animation: VisemeAnimation::default(),
            })
            .collect()
    }

    fn request() -> SpeechRequest {
        SpeechRequest::new("Hello", VoiceConfig::default())
    }

    #[tokio::test]
    async fn test_collects_every_event_in_order() {
        // More events than the channel holds, so the engine has to wait on
        // the collector.
        let engine = ScriptedEngine::new(
            events(200),
            SpeechAudio::new(AudioFormat::Mp3, vec![1, 2, 3]),
        );

        let collected = collect_visemes(&engine, &request()).await.unwrap();
        assert_eq!(collected.events.len(), 200);
        assert!(collected
            .events
            .iter()
            .enumerate()
            .all(|(i, e)| e.viseme_id == i as u32));
        assert_eq!(collected.audio.data, vec![1, 2, 3]);
    }

    #[tokio::test]
    async fn test_engine_failure_is_returned() {
        let engine = ScriptedEngine::failing("quota exceeded");
        let err = collect_visemes(&engine, &request()).await.unwrap_err();

        assert!(matches!(err, FacesyncError::Speech { .. }));
        assert!(err.to_string().contains("quota exceeded"));
    }

    #[tokio::test]
    async fn test_no_events_is_not_an_error() {
        let engine = ScriptedEngine::new(vec![], SpeechAudio::new(AudioFormat::Mp3, vec![]));
        let collected = collect_visemes(&engine, &request()).await.unwrap();
        assert!(collected.events.is_empty());
        assert!(collected.audio.is_empty());
    }
}
