use std::path::PathBuf;

use facesync_processing_core::PipelineConfig;
use facesync_speech::{text_to_speech, ScriptedEngine, VoiceConfig};

fn fixture_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join("..")
        .join("fixtures")
        .join("sample-utterance")
        .join("visemes.jsonl")
}

#[tokio::test]
async fn scripted_fixture_produces_full_timeline() {
    let engine = ScriptedEngine::load(&fixture_path(), None).expect("fixture should load");

    let synthesis = text_to_speech(
        &engine,
        "I'm sorry to hear that. How long has it been bothering you?",
        &VoiceConfig::default(),
        &PipelineConfig::default(),
        Some(11),
    )
    .await
    .expect("synthesis should succeed");

    assert_eq!(synthesis.blend_data.len(), 210);
    let spans: Vec<(usize, usize)> = synthesis
        .pauses
        .iter()
        .map(|p| (p.start_index, p.end_index))
        .collect();
    assert_eq!(spans, vec![(61, 119), (181, 209)]);

    let ssml = engine.spoken_ssml();
    assert_eq!(ssml.len(), 1);
    assert!(ssml[0].contains("I&apos;m sorry to hear that."));
}

#[tokio::test]
async fn scripted_fixture_is_reproducible_for_a_seed() {
    let engine = ScriptedEngine::load(&fixture_path(), None).expect("fixture should load");
    let voice = VoiceConfig::default();
    let config = PipelineConfig::default();

    let first = text_to_speech(&engine, "Hello", &voice, &config, Some(3))
        .await
        .unwrap();
    let second = text_to_speech(&engine, "Hello", &voice, &config, Some(3))
        .await
        .unwrap();

    assert_eq!(
        serde_json::to_string(&first.blend_data).unwrap(),
        serde_json::to_string(&second.blend_data).unwrap()
    );
    assert_eq!(first.pauses, second.pauses);
}

#[tokio::test]
async fn concurrent_requests_keep_their_own_tuning() {
    let engine = ScriptedEngine::load(&fixture_path(), None).expect("fixture should load");
    let voice = VoiceConfig::default();
    let loud = PipelineConfig {
        intensity: 3.0,
        idle_synthesis_enabled: false,
        ..Default::default()
    };
    let quiet = PipelineConfig {
        intensity: 0.5,
        idle_synthesis_enabled: false,
        ..Default::default()
    };

    let (a, b) = tokio::join!(
        text_to_speech(&engine, "one", &voice, &loud, Some(1)),
        text_to_speech(&engine, "two", &voice, &quiet, Some(1)),
    );
    let (a, b) = (a.unwrap(), b.unwrap());

    let jaw = |frames: &[facesync_animation_model::frame::Frame]| {
        frames[10].weight("jawOpen").unwrap_or(0.0)
    };
    assert!(jaw(&a.blend_data) > jaw(&b.blend_data));
    assert!(a.pauses.is_empty() && b.pauses.is_empty());
}
