//! Audio capture and playback
//!
//! Capture hardware is an external collaborator: this module defines the
//! capture trait and frame types, a file-backed capture backend, and the
//! bounded playback helper. No platform microphone backend is built in.

pub mod capture;
pub mod playback;

pub use capture::{AudioCapture, AudioClip, AudioFrame, CaptureSource, FileCapture, VoiceInput};
pub use playback::play;

use crate::error::{DiaryError, Result};

impl AudioClip {
    /// Encode the clip as a 16-bit mono WAV byte buffer for upload to the
    /// transcription capability.
    pub fn encode_wav(&self) -> Result<Vec<u8>> {
        let spec = hound::WavSpec {
            channels: 1,
            sample_rate: self.sample_rate,
            bits_per_sample: 16,
            sample_format: hound::SampleFormat::Int,
        };

        let mut cursor = std::io::Cursor::new(Vec::new());
        {
            let mut writer = hound::WavWriter::new(&mut cursor, spec)
                .map_err(|e| DiaryError::AudioCapture(e.to_string()))?;
            for sample in &self.samples {
                writer
                    .write_sample(*sample)
                    .map_err(|e| DiaryError::AudioCapture(e.to_string()))?;
            }
            writer
                .finalize()
                .map_err(|e| DiaryError::AudioCapture(e.to_string()))?;
        }

        Ok(cursor.into_inner())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encode_wav_produces_riff_header() {
        let clip = AudioClip {
            samples: vec![0i16; 160],
            sample_rate: 16000,
        };

        let wav = clip.encode_wav().unwrap();
        assert_eq!(&wav[..4], b"RIFF");
        assert_eq!(&wav[8..12], b"WAVE");
        // 44-byte header + 2 bytes per sample
        assert_eq!(wav.len(), 44 + 160 * 2);
    }
}
