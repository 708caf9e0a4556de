//! FaceSync Speech
//!
//! The boundary between a speech engine and the animation pipeline:
//!
//! - **SSML:** Render the voice request that asks for facial-expression visemes
//! - **Engine:** The async [`SpeechEngine`] trait and its viseme sink
//! - **Collect:** Drain viseme events while the engine synthesizes
//! - **Scripted:** Replay a recorded event stream (tests, offline tooling)
//! - **Synthesis:** Text in, audio plus processed timeline out
//!
//! Engines push events as they arrive; once synthesis completes the
//! collected stream is materialized and handed to the synchronous pipeline.

pub mod collect;
pub mod engine;
pub mod scripted;
pub mod ssml;
pub mod synthesis;

pub use collect::{collect_visemes, CollectedSpeech};
pub use engine::{AudioFormat, SpeechAudio, SpeechEngine, SpeechRequest, VisemeSink};
pub use scripted::ScriptedEngine;
pub use ssml::{build_ssml, VoiceConfig};
pub use synthesis::{audio_file_name, text_to_speech, SpeechSynthesis};
