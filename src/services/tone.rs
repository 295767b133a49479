//! Completion tone synthesis and playback

use std::{f64::consts::PI, process::Stdio};

use tokio::{io::AsyncWriteExt, process::Command};
use tracing::{debug, warn};

pub const TONE_FREQUENCY_HZ: f64 = 800.0;
pub const TONE_DURATION_SECS: f64 = 0.2;
pub const SAMPLE_RATE: u32 = 44_100;

/// Capability to play a short beep. Fire-and-forget.
pub trait TonePlayer: Send + Sync {
    fn play(&self, volume: u8);
}

/// Render the completion tone as a mono 16-bit PCM WAV file
pub fn synthesize_tone(volume: u8) -> Vec<u8> {
    let gain = f64::from(volume.min(100)) / 100.0;
    let sample_count = (f64::from(SAMPLE_RATE) * TONE_DURATION_SECS).round() as u32;
    let data_len = sample_count * 2;

    let mut wav = Vec::with_capacity(44 + data_len as usize);
    wav.extend_from_slice(b"RIFF");
    wav.extend_from_slice(&(36 + data_len).to_le_bytes());
    wav.extend_from_slice(b"WAVE");

    wav.extend_from_slice(b"fmt ");
    wav.extend_from_slice(&16u32.to_le_bytes());
    wav.extend_from_slice(&1u16.to_le_bytes()); // PCM
    wav.extend_from_slice(&1u16.to_le_bytes()); // mono
    wav.extend_from_slice(&SAMPLE_RATE.to_le_bytes());
    wav.extend_from_slice(&(SAMPLE_RATE * 2).to_le_bytes());
    wav.extend_from_slice(&2u16.to_le_bytes());
    wav.extend_from_slice(&16u16.to_le_bytes());

    wav.extend_from_slice(b"data");
    wav.extend_from_slice(&data_len.to_le_bytes());
    for n in 0..sample_count {
        let t = f64::from(n) / f64::from(SAMPLE_RATE);
        let sample = (2.0 * PI * TONE_FREQUENCY_HZ * t).sin() * gain * f64::from(i16::MAX);
        wav.extend_from_slice(&(sample.round() as i16).to_le_bytes());
    }

    wav
}

/// Plays the tone by piping it into an external audio command such as
/// `aplay -q -`
#[derive(Debug, Clone)]
pub struct CommandTonePlayer {
    program: String,
    args: Vec<String>,
}

impl CommandTonePlayer {
    /// Build from a whitespace-separated command line
    pub fn from_command_line(command: &str) -> Option<Self> {
        let mut parts = command.split_whitespace().map(str::to_string);
        let program = parts.next()?;
        Some(Self {
            program,
            args: parts.collect(),
        })
    }

    async fn run(&self, wav: Vec<u8>) -> Result<(), String> {
        let mut child = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| format!("Failed to spawn {}: {}", self.program, e))?;

        if let Some(mut stdin) = child.stdin.take() {
            stdin
                .write_all(&wav)
                .await
                .map_err(|e| format!("Failed to write tone to {}: {}", self.program, e))?;
        }

        let output = child
            .wait_with_output()
            .await
            .map_err(|e| format!("Failed to wait for {}: {}", self.program, e))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(format!("{} failed: {}", self.program, stderr.trim()));
        }

        Ok(())
    }
}

impl TonePlayer for CommandTonePlayer {
    fn play(&self, volume: u8) {
        let player = self.clone();
        let wav = synthesize_tone(volume);

        tokio::spawn(async move {
            match player.run(wav).await {
                Ok(()) => debug!("Tone played at volume {}", volume),
                Err(e) => warn!("Tone playback skipped: {}", e),
            }
        });
    }
}

/// Tone player for hosts without an audio command
#[derive(Debug, Default)]
pub struct SilentTonePlayer;

impl TonePlayer for SilentTonePlayer {
    fn play(&self, volume: u8) {
        debug!("No audio output configured, skipping tone at volume {}", volume);
    }
}
