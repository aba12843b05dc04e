use std::path::Path;

use anyhow::{Context, Result, anyhow};
use tokio::process::Command;

/// Run the configured external transcriber with the audio file path as its
/// final argument. A clean exit's stdout is the transcription; a nonzero
/// exit is a hard failure. The command string may carry leading arguments
/// ("python transcribe.py").
pub async fn transcribe(command: &str, audio_path: &Path) -> Result<String> {
    let mut parts = command.split_whitespace();
    let program = parts
        .next()
        .ok_or_else(|| anyhow!("transcriber command is empty"))?;

    let output = Command::new(program)
        .args(parts)
        .arg(audio_path)
        .output()
        .await
        .with_context(|| format!("failed to launch transcriber '{program}'"))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(anyhow!(
            "transcription failed ({}): {}",
            output.status,
            stderr.trim()
        ));
    }

    Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn clean_exit_yields_trimmed_stdout() {
        let tmp = tempfile::tempdir().unwrap();
        let audio = tmp.path().join("clip.wav");
        std::fs::write(&audio, b"").unwrap();
        // `echo` stands in for the transcriber: it prints its argument.
        let text = transcribe("echo transcribed", &audio).await.unwrap();
        assert!(text.starts_with("transcribed"));
    }

    #[tokio::test]
    async fn nonzero_exit_is_a_hard_failure() {
        let tmp = tempfile::tempdir().unwrap();
        let audio = tmp.path().join("clip.wav");
        std::fs::write(&audio, b"").unwrap();
        let err = transcribe("false", &audio).await.unwrap_err();
        assert!(err.to_string().contains("transcription failed"));
    }

    #[tokio::test]
    async fn missing_binary_reports_launch_failure() {
        let err = transcribe("definitely-not-a-real-binary", Path::new("x.wav"))
            .await
            .unwrap_err();
        assert!(err.to_string().contains("failed to launch"));
    }
}
