//! Tags describing what kind of text is being parsed.

use std::{fmt, str::FromStr};

use crate::error::UnknownSourceType;

/// The kind of content handed to the parser.
///
/// The source type selects the pre-processing applied before tokenization:
/// markdown loses fenced code and link targets, code has its identifiers
/// split, posts drop URLs and mentions, and transcripts drop spoken fillers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SourceType {
    /// Speech-to-text output.
    VoiceTranscript,
    /// Program source code.
    Code,
    /// Markdown documents.
    #[default]
    Markdown,
    /// Short social media posts.
    Post,
}

impl SourceType {
    /// Returns the wire name of this source type.
    pub fn as_str(self) -> &'static str {
        match self {
            SourceType::VoiceTranscript => "voice_transcript",
            SourceType::Code => "code",
            SourceType::Markdown => "markdown",
            SourceType::Post => "post",
        }
    }
}

impl fmt::Display for SourceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SourceType {
    type Err = UnknownSourceType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "voice_transcript" | "voice" | "transcript" => Ok(SourceType::VoiceTranscript),
            "code" => Ok(SourceType::Code),
            "markdown" | "md" => Ok(SourceType::Markdown),
            "post" => Ok(SourceType::Post),
            _ => Err(UnknownSourceType(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_wire_names() {
        assert_eq!("voice_transcript".parse(), Ok(SourceType::VoiceTranscript));
        assert_eq!("code".parse(), Ok(SourceType::Code));
        assert_eq!("Markdown".parse(), Ok(SourceType::Markdown));
        assert_eq!("post".parse(), Ok(SourceType::Post));
    }

    #[test]
    fn test_unknown_source_type() {
        let err = "tweet-thread".parse::<SourceType>().unwrap_err();
        assert_eq!(err, UnknownSourceType("tweet-thread".to_string()));
    }

    #[test]
    fn test_display_matches_wire_name() {
        assert_eq!(SourceType::VoiceTranscript.to_string(), "voice_transcript");
    }
}
