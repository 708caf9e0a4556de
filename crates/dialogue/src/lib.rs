//! FaceSync Dialogue
//!
//! Produces the assistant's spoken replies by prompting a local
//! language model (an Ollama-style `generate` endpoint) with a fixed
//! conversational persona.

pub mod client;
pub mod persona;

pub use client::{DialogueClient, GenerateRequest, GenerateResponse, FALLBACK_REPLY};
pub use persona::{build_prompt, PERSONA_PROMPT};
