//=========================================================================
// Audio Device
//=========================================================================
//
// Mixer backend abstraction.
//
// A device exposes a fixed number of sound channels plus one music
// stream. `AudioManager` owns the device and decides what plays where.
//
//=========================================================================

//=== External Dependencies ===============================================

use log::debug;

//=== Internal Dependencies ===============================================

use crate::core::resources::Asset;
use crate::error::AudioError;

//=== Loop ================================================================

/// How many times a sound or track repeats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Loop {
    /// Play once.
    #[default]
    Once,
    /// Play once, then repeat `n` more times.
    Times(u32),
    /// Repeat until halted.
    Forever,
}

//=== AudioDevice =========================================================

pub trait AudioDevice {
    /// Opens the mixer with `channels` sound channels.
    fn open(&mut self, channels: usize) -> Result<(), AudioError>;

    /// Releases the mixer. Must be a no-op when not open.
    fn close(&mut self);

    fn is_open(&self) -> bool;

    //--- Channels ---------------------------------------------------------

    fn play(&mut self, channel: usize, sound: &Asset, repeat: Loop) -> Result<(), AudioError>;

    fn halt(&mut self, channel: usize);

    fn is_playing(&self, channel: usize) -> bool;

    /// Applies to every channel.
    fn set_sound_volume(&mut self, volume: u8);

    //--- Music ------------------------------------------------------------

    fn play_music(&mut self, music: &Asset, repeat: Loop) -> Result<(), AudioError>;

    fn halt_music(&mut self);

    fn pause_music(&mut self);

    fn resume_music(&mut self);

    fn is_music_playing(&self) -> bool;

    fn set_music_volume(&mut self, volume: u8);
}

//=== SilentAudioDevice ===================================================

/// Device that produces no sound.
///
/// This is the only backend shipped with the crate: `AudioManager` tracks
/// channels, caches and volumes against it, but nothing is mixed or played.
/// Implement [`AudioDevice`] over a real mixer to hear anything.
///
/// One-shot and finitely repeated sounds finish immediately; `Forever`
/// sounds keep their channel busy until halted. Music plays until halted.
#[derive(Debug, Default)]
pub struct SilentAudioDevice {
    open: bool,
    channels: Vec<bool>,
    music: MusicState,
    sound_volume: u8,
    music_volume: u8,
    opened: u32,
    closed: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MusicState {
    #[default]
    Stopped,
    Playing,
    Paused,
}

impl SilentAudioDevice {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn music_state(&self) -> MusicState {
        self.music
    }

    pub fn sound_volume(&self) -> u8 {
        self.sound_volume
    }

    pub fn music_volume(&self) -> u8 {
        self.music_volume
    }

    /// Number of successful `open` calls.
    pub fn open_count(&self) -> u32 {
        self.opened
    }

    /// Number of `close` calls that released an open device.
    pub fn close_count(&self) -> u32 {
        self.closed
    }

    fn check_channel(&self, channel: usize) -> Result<(), AudioError> {
        if !self.open {
            return Err(AudioError::DeviceClosed);
        }
        if channel >= self.channels.len() {
            return Err(AudioError::InvalidChannel {
                channel,
                available: self.channels.len(),
            });
        }
        Ok(())
    }
}

impl AudioDevice for SilentAudioDevice {
    fn open(&mut self, channels: usize) -> Result<(), AudioError> {
        if channels == 0 {
            return Err(AudioError::DeviceOpen("at least one channel is required".into()));
        }
        self.open = true;
        self.channels = vec![false; channels];
        self.opened += 1;
        debug!(target: "audio", "Silent device opened with {} channels", channels);
        Ok(())
    }

    fn close(&mut self) {
        if !self.open {
            return;
        }
        self.open = false;
        self.channels.clear();
        self.music = MusicState::Stopped;
        self.closed += 1;
    }

    fn is_open(&self) -> bool {
        self.open
    }

    fn play(&mut self, channel: usize, _sound: &Asset, repeat: Loop) -> Result<(), AudioError> {
        self.check_channel(channel)?;
        self.channels[channel] = repeat == Loop::Forever;
        Ok(())
    }

    fn halt(&mut self, channel: usize) {
        if let Some(playing) = self.channels.get_mut(channel) {
            *playing = false;
        }
    }

    fn is_playing(&self, channel: usize) -> bool {
        self.channels.get(channel).copied().unwrap_or(false)
    }

    fn set_sound_volume(&mut self, volume: u8) {
        self.sound_volume = volume;
    }

    fn play_music(&mut self, _music: &Asset, _repeat: Loop) -> Result<(), AudioError> {
        if !self.open {
            return Err(AudioError::DeviceClosed);
        }
        self.music = MusicState::Playing;
        Ok(())
    }

    fn halt_music(&mut self) {
        self.music = MusicState::Stopped;
    }

    fn pause_music(&mut self) {
        if self.music == MusicState::Playing {
            self.music = MusicState::Paused;
        }
    }

    fn resume_music(&mut self) {
        if self.music == MusicState::Paused {
            self.music = MusicState::Playing;
        }
    }

    fn is_music_playing(&self) -> bool {
        self.music == MusicState::Playing
    }

    fn set_music_volume(&mut self, volume: u8) {
        self.music_volume = volume;
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_channels_cannot_open() {
        let mut device = SilentAudioDevice::new();

        assert!(matches!(device.open(0), Err(AudioError::DeviceOpen(_))));
        assert!(!device.is_open());
        assert_eq!(device.open_count(), 0);
    }

    #[test]
    fn close_without_open_is_a_no_op() {
        let mut device = SilentAudioDevice::new();

        device.close();

        assert_eq!(device.close_count(), 0);
    }

    #[test]
    fn silent_device_reports_nothing_playing() {
        let mut device = SilentAudioDevice::new();
        device.open(4).unwrap();

        assert!((0..4).all(|channel| !device.is_playing(channel)));
        assert!(!device.is_music_playing());
        assert_eq!(device.music_state(), MusicState::Stopped);

        device.close();
        assert_eq!(device.close_count(), 1);
        assert!(!device.is_playing(0));
    }
}
