//! Clip playback via `rodio`.
//!
//! [`ClipPlayback`] owns the output stream and must stay on the audio
//! thread. Decoding is separate ([`decode_clip`]) so it can run on a
//! blocking pool without touching the stream.

use std::io::Cursor;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use rodio::buffer::SamplesBuffer;
use rodio::{Decoder, OutputStream, OutputStreamHandle, Sink, Source};
use tensu_core::CompletionSignal;

use crate::error::VoiceError;

/// Sample rate of the one-sample unlock buffer.
const SILENCE_SAMPLE_RATE: u32 = 22_050;

/// A fully decoded clip, ready to be appended to a sink.
#[derive(Debug, Clone)]
pub struct DecodedClip {
    pub channels: u16,
    pub sample_rate: u32,
    pub samples: Vec<f32>,
}

/// Decode mp3 (or any enabled format) bytes into f32 samples.
pub fn decode_clip(bytes: Vec<u8>) -> Result<DecodedClip, VoiceError> {
    let decoder = Decoder::new(Cursor::new(bytes)).map_err(|e| VoiceError::Decode(e.to_string()))?;
    let channels = decoder.channels();
    let sample_rate = decoder.sample_rate();
    let samples: Vec<f32> = decoder.convert_samples::<f32>().collect();
    if samples.is_empty() {
        return Err(VoiceError::Decode("clip contains no audio".into()));
    }
    Ok(DecodedClip {
        channels,
        sample_rate,
        samples,
    })
}

struct ActiveSink {
    sink: Arc<Sink>,
    /// Cleared by `stop`; the completion watcher only reports natural end
    /// while this is still set.
    is_playing: Arc<AtomicBool>,
}

/// Thread-confined rodio output.
///
/// The stream is opened lazily by [`ClipPlayback::open`], which is what
/// resuming the session means for this adapter.
#[derive(Default)]
pub struct ClipPlayback {
    stream: Option<(OutputStream, OutputStreamHandle)>,
    current: Option<ActiveSink>,
}

impl ClipPlayback {
    /// Open the default output device if not already open.
    pub fn open(&mut self) -> Result<(), VoiceError> {
        if self.stream.is_some() {
            return Ok(());
        }
        let stream = OutputStream::try_default()
            .map_err(|e| VoiceError::OutputStreamError(e.to_string()))?;
        self.stream = Some(stream);
        tracing::info!("Audio output opened on default device");
        Ok(())
    }

    pub const fn is_open(&self) -> bool {
        self.stream.is_some()
    }

    fn new_sink(&self) -> Result<Sink, VoiceError> {
        let (_, handle) = self.stream.as_ref().ok_or(VoiceError::SessionNotRunning)?;
        Sink::try_new(handle).map_err(|e| VoiceError::OutputStreamError(e.to_string()))
    }

    /// Play a clip, replacing whatever is playing. `rate` scales tempo and
    /// pitch together; there is no pitch preservation.
    pub fn play(
        &mut self,
        clip: DecodedClip,
        volume: f32,
        rate: f32,
        done: CompletionSignal,
    ) -> Result<(), VoiceError> {
        self.stop();

        let sink = self.new_sink()?;
        sink.set_volume(volume.clamp(0.0, 1.0));
        sink.set_speed(rate.max(0.1));
        sink.append(SamplesBuffer::new(clip.channels, clip.sample_rate, clip.samples));

        let active = ActiveSink {
            sink: Arc::new(sink),
            is_playing: Arc::new(AtomicBool::new(true)),
        };
        Self::spawn_completion_watcher(&active, done);
        self.current = Some(active);

        tracing::debug!(volume, rate, "Clip playback started");
        Ok(())
    }

    /// Block a helper thread until the sink drains or is stopped. Only a
    /// natural drain fires `done`; a stop drops it.
    fn spawn_completion_watcher(active: &ActiveSink, done: CompletionSignal) {
        let sink = Arc::clone(&active.sink);
        let is_playing = Arc::clone(&active.is_playing);
        std::thread::spawn(move || {
            sink.sleep_until_end();
            if is_playing.swap(false, Ordering::SeqCst) {
                tracing::debug!("Clip finished naturally");
                done.finish();
            }
        });
    }

    /// Stop and rewind. The sink is dropped so the next play starts fresh.
    pub fn stop(&mut self) {
        if let Some(active) = self.current.take() {
            active.is_playing.store(false, Ordering::SeqCst);
            active.sink.stop();
            tracing::debug!("Clip playback stopped");
        }
    }

    /// Push a one-sample silent buffer through the stream.
    pub fn play_silence(&self) -> Result<(), VoiceError> {
        let sink = self.new_sink()?;
        sink.append(SamplesBuffer::new(1, SILENCE_SAMPLE_RATE, vec![0.0_f32]));
        sink.detach();
        Ok(())
    }

    /// Muted play/pause cycle on a throwaway sink.
    pub fn prime(&self) -> Result<(), VoiceError> {
        let sink = self.new_sink()?;
        sink.set_volume(0.0);
        sink.append(SamplesBuffer::new(1, SILENCE_SAMPLE_RATE, vec![0.0_f32]));
        sink.play();
        sink.pause();
        sink.stop();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn garbage_bytes_do_not_decode() {
        let err = decode_clip(b"definitely not an mp3".to_vec()).unwrap_err();
        assert!(matches!(err, VoiceError::Decode(_)));
    }

    #[test]
    fn empty_bytes_do_not_decode() {
        assert!(decode_clip(Vec::new()).is_err());
    }

    #[test]
    fn closed_playback_refuses_silence() {
        let playback = ClipPlayback::default();
        assert!(!playback.is_open());
        assert!(matches!(
            playback.play_silence(),
            Err(VoiceError::SessionNotRunning)
        ));
    }

    #[test]
    fn completion_stays_pending_until_finished() {
        let (done, completion) = tensu_core::Completion::channel();
        let mut wait = tokio_test::task::spawn(completion.wait());
        tokio_test::assert_pending!(wait.poll());

        done.finish();
        assert!(wait.is_woken());
        tokio_test::assert_ready_eq!(wait.poll(), true);
    }

    #[test]
    fn dropped_completion_reads_as_stopped() {
        let (done, completion) = tensu_core::Completion::channel();
        let mut wait = tokio_test::task::spawn(completion.wait());
        tokio_test::assert_pending!(wait.poll());

        drop(done);
        tokio_test::assert_ready_eq!(wait.poll(), false);
    }
}
