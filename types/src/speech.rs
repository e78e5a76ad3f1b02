/// One ordered fragment of the speech response.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub enum SpeechFragment {
    /// Literal text to synthesize.
    Text(String),
    /// Reference to a pre-recorded audio clip.
    Audio(String),
}

/// Append-only builder for the spoken response.
///
/// Fragments accumulate in order across every action bundle applied during
/// a request; `render` wraps them in a single `<speak>` root element for
/// the target voice platform.
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct SpeechBuilder {
    fragments: Vec<SpeechFragment>,
}

impl SpeechBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(&mut self, text: impl Into<String>) -> &mut Self {
        self.fragments.push(SpeechFragment::Text(text.into()));
        self
    }

    pub fn audio(&mut self, src: impl Into<String>) -> &mut Self {
        self.fragments.push(SpeechFragment::Audio(src.into()));
        self
    }

    pub fn is_empty(&self) -> bool {
        self.fragments.is_empty()
    }

    pub fn fragments(&self) -> &[SpeechFragment] {
        &self.fragments
    }

    /// Renders the accumulated fragments as an SSML document.
    pub fn render(&self) -> String {
        let mut out = String::from("<speak>");
        for fragment in &self.fragments {
            match fragment {
                SpeechFragment::Text(text) => out.push_str(text),
                SpeechFragment::Audio(src) => {
                    out.push_str("<audio src=\"");
                    out.push_str(src);
                    out.push_str("\" />");
                }
            }
        }
        out.push_str("</speak>");
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_text_and_audio_in_order() {
        let mut speech = SpeechBuilder::new();
        speech.text("Hello world");
        speech.audio("https://example.com/a.wav");
        assert_eq!(
            speech.render(),
            "<speak>Hello world<audio src=\"https://example.com/a.wav\" /></speak>"
        );
    }

    #[test]
    fn empty_builder_renders_bare_root() {
        assert_eq!(SpeechBuilder::new().render(), "<speak></speak>");
    }
}
