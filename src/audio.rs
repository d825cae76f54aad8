use rodio::source::{SineWave, Source};
use rodio::{OutputStream, OutputStreamHandle, Sink};
use std::time::Duration;

/// Length of every blip
const BLIP_DURATION: Duration = Duration::from_millis(60);

/// Audio manager for playing sound effects.
///
/// Sounds are synthesized, so there are no asset files to go missing.
pub struct AudioManager {
    _stream: OutputStream,
    stream_handle: OutputStreamHandle,
    volume: f32,
}

impl AudioManager {
    /// Opens the default output device
    pub fn new(volume: f32) -> Result<Self, Box<dyn std::error::Error>> {
        let (stream, stream_handle) = OutputStream::try_default()?;
        Ok(Self {
            _stream: stream,
            stream_handle,
            volume,
        })
    }

    /// Short high blip when a laser leaves the ship
    pub fn play_fire_sound(&self) {
        self.play_tone(880.0, self.volume);
    }

    /// Lower, louder blip for a destroyed enemy
    pub fn play_hit_sound(&self) {
        self.play_tone(220.0, self.volume * 2.0);
    }

    fn play_tone(&self, frequency: f32, volume: f32) {
        // Ignore errors for sound playback - don't want to crash the game
        match Sink::try_new(&self.stream_handle) {
            Ok(sink) => {
                sink.set_volume(volume);
                sink.append(SineWave::new(frequency).take_duration(BLIP_DURATION));
                sink.detach();
            }
            Err(err) => log::debug!("Skipping sound: {err}"),
        }
    }
}
