//! SSML rendering for viseme-producing synthesis requests.

use facesync_common::config::SpeechSettings;
use serde::{Deserialize, Serialize};

/// Voice selection for one request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoiceConfig {
    /// Engine voice name, e.g. `en-US-AriaNeural`.
    pub name: String,
    /// Speaking style passed to `mstts:express-as`.
    pub style: String,
    /// `xml:lang` of the document.
    pub language: String,
}

impl Default for VoiceConfig {
    fn default() -> Self {
        Self::from(&SpeechSettings::default())
    }
}

impl From<&SpeechSettings> for VoiceConfig {
    fn from(settings: &SpeechSettings) -> Self {
        Self {
            name: settings.voice.clone(),
            style: settings.style.clone(),
            language: settings.language.clone(),
        }
    }
}

/// Render the SSML document for `text`.
///
/// The document requests `FacialExpression` visemes so the engine reports
/// blendshape animation alongside the audio. `text` is escaped; voice fields
/// are inserted as attribute values and escaped the same way.
pub fn build_ssml(text: &str, voice: &VoiceConfig) -> String {
    format!(
        concat!(
            r#"<speak version="1.0" xmlns="http://www.w3.org/2001/10/synthesis" "#,
            r#"xmlns:mstts="http://www.w3.org/2001/mstts" xml:lang="{lang}">"#,
            r#"<voice name="{name}">"#,
            r#"<mstts:express-as style="{style}">"#,
            r#"<mstts:viseme type="FacialExpression"/>"#,
            "{text}",
            "</mstts:express-as>",
            "</voice>",
            "</speak>"
        ),
        lang = escape_xml(&voice.language),
        name = escape_xml(&voice.name),
        style = escape_xml(&voice.style),
        text = escape_xml(text),
    )
}

fn escape_xml(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_voice() {
        let voice = VoiceConfig::default();
        assert_eq!(voice.name, "en-US-AriaNeural");
        assert_eq!(voice.style, "empathetic");
        assert_eq!(voice.language, "en-US");
    }

    #[test]
    fn test_ssml_requests_facial_expression_visemes() {
        let ssml = build_ssml("Hello there", &VoiceConfig::default());

        assert!(ssml.starts_with("<speak "));
        assert!(ssml.contains(r#"xmlns:mstts="http://www.w3.org/2001/mstts""#));
        assert!(ssml.contains(r#"xml:lang="en-US""#));
        assert!(ssml.contains(r#"<voice name="en-US-AriaNeural">"#));
        assert!(ssml.contains(r#"<mstts:express-as style="empathetic">"#));
        assert!(ssml.contains(r#"<mstts:viseme type="FacialExpression"/>Hello there</mstts:express-as>"#));
        assert!(ssml.ends_with("</voice></speak>"));
    }

    #[test]
    fn test_text_is_escaped() {
        let ssml = build_ssml(r#"Tom & "Jerry" <3 it's"#, &VoiceConfig::default());
        assert!(ssml.contains("Tom &amp; &quot;Jerry&quot; &lt;3 it&apos;s"));
        assert!(!ssml.contains("<3"));
    }

    #[test]
    fn test_voice_from_settings() {
        let settings = SpeechSettings {
            voice: "en-GB-SoniaNeural".to_string(),
            style: "cheerful".to_string(),
            language: "en-GB".to_string(),
        };
        let ssml = build_ssml("Hi", &VoiceConfig::from(&settings));
        assert!(ssml.contains(r#"<voice name="en-GB-SoniaNeural">"#));
        assert!(ssml.contains(r#"style="cheerful""#));
    }
}
