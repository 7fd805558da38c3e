//! Containerfiles embedded into the binary at compile time.

use anyhow::{Result, anyhow};
use rust_embed::RustEmbed;

#[derive(RustEmbed)]
#[folder = "containerfiles/"]
#[prefix = "containerfiles/"]
struct Containerfiles;

/// The Containerfile for the Whisper transcription image.
pub fn whisper_containerfile() -> Result<String> {
    let path = "containerfiles/whisper/Containerfile";
    Containerfiles::get(path)
        .ok_or_else(|| anyhow!("embedded asset '{path}' not found"))
        .and_then(|file| {
            String::from_utf8(file.data.to_vec())
                .map_err(|e| anyhow!("failed to decode '{path}': {e}"))
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_whisper_containerfile_embedded() {
        let content = whisper_containerfile().unwrap();
        assert!(content.contains("openai-whisper"));
        assert!(content.contains("ffmpeg"));
        assert!(content.contains("ENTRYPOINT [\"whisper\"]"));
    }
}
