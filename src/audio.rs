//! Sound bank for UI clicks and creature cries.
//!
//! One bank is created per session by the binary and handed to the effect
//! handler; clips are loaded on first use and kept until the bank is dropped.

use std::collections::HashMap;
use std::io::Cursor;
use std::path::PathBuf;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;

use crate::api::{cry_url, Transport};
use crate::error::AudioError;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UiSound {
    Click,
    Tab,
    Select,
    Deny,
}

impl UiSound {
    pub fn file_name(&self) -> &'static str {
        match self {
            UiSound::Click => "pipboy-click.wav",
            UiSound::Tab => "pipboy-tab.wav",
            UiSound::Select => "pipboy-select.wav",
            UiSound::Deny => "pipboy-deny.wav",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
enum ClipKey {
    Ui(UiSound),
    Cry(u32),
}

pub type Clip = Arc<Vec<u8>>;

pub struct SoundBank {
    transport: Arc<dyn Transport>,
    sound_dir: PathBuf,
    volume: f32,
    clips: Mutex<HashMap<ClipKey, Clip>>,
}

impl SoundBank {
    pub fn new(transport: Arc<dyn Transport>, sound_dir: impl Into<PathBuf>, volume: f32) -> Self {
        Self {
            transport,
            sound_dir: sound_dir.into(),
            volume: volume.clamp(0.0, 1.0),
            clips: Mutex::new(HashMap::new()),
        }
    }

    pub fn volume(&self) -> f32 {
        self.volume
    }

    pub async fn ui_clip(&self, sound: UiSound) -> Result<Clip, AudioError> {
        let key = ClipKey::Ui(sound);
        if let Some(clip) = self.cached(&key).await {
            return Ok(clip);
        }
        let path = self.sound_dir.join(sound.file_name());
        let bytes = tokio::fs::read(&path).await.map_err(|source| AudioError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Ok(self.store(key, bytes).await)
    }

    /// Loads a creature cry, preferring the URL embedded in its record.
    pub async fn cry_clip(
        &self,
        id: u32,
        name: &str,
        url: Option<&str>,
    ) -> Result<Clip, AudioError> {
        let key = ClipKey::Cry(id);
        if let Some(clip) = self.cached(&key).await {
            return Ok(clip);
        }
        let url = url.map(str::to_string).unwrap_or_else(|| cry_url(name));
        let bytes = self.transport.get(&url).await?;
        Ok(self.store(key, bytes).await)
    }

    pub async fn cached_count(&self) -> usize {
        self.clips.lock().await.len()
    }

    async fn cached(&self, key: &ClipKey) -> Option<Clip> {
        self.clips.lock().await.get(key).cloned()
    }

    async fn store(&self, key: ClipKey, bytes: Vec<u8>) -> Clip {
        let clip = Arc::new(bytes);
        self.clips.lock().await.insert(key, clip.clone());
        clip
    }
}

/// Plays a clip on the blocking pool, resolving once playback ends.
pub async fn play(clip: Clip, volume: f32) -> Result<(), AudioError> {
    tokio::task::spawn_blocking(move || play_clip(clip, volume))
        .await
        .map_err(|err| AudioError::Playback(err.to_string()))?
}

/// Decodes and plays a clip to completion. Blocks the calling thread.
pub fn play_clip(clip: Clip, volume: f32) -> Result<(), AudioError> {
    let cursor = Cursor::new(clip.as_ref().clone());
    let (_stream, handle) =
        rodio::OutputStream::try_default().map_err(|err| AudioError::Playback(err.to_string()))?;
    let sink = rodio::Sink::try_new(&handle).map_err(|err| AudioError::Playback(err.to_string()))?;
    let source = rodio::Decoder::new(cursor).map_err(|err| AudioError::Playback(err.to_string()))?;
    sink.set_volume(volume);
    sink.append(source);
    sink.sleep_until_end();
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex as StdMutex;

    use async_trait::async_trait;

    use super::*;
    use crate::error::TransportError;

    #[derive(Default)]
    struct RecordingTransport {
        urls: StdMutex<Vec<String>>,
    }

    #[async_trait]
    impl Transport for RecordingTransport {
        async fn get(&self, url: &str) -> Result<Vec<u8>, TransportError> {
            self.urls.lock().unwrap().push(url.to_string());
            Ok(url.as_bytes().to_vec())
        }
    }

    #[test]
    fn volume_is_clamped() {
        let transport = Arc::new(RecordingTransport::default());
        assert_eq!(SoundBank::new(transport.clone(), "sounds", 3.0).volume(), 1.0);
        assert_eq!(SoundBank::new(transport, "sounds", -1.0).volume(), 0.0);
    }

    #[tokio::test]
    async fn cry_falls_back_to_name_url_and_is_cached() {
        let transport = Arc::new(RecordingTransport::default());
        let bank = SoundBank::new(transport.clone(), "sounds", 0.5);

        let clip = bank.cry_clip(122, "mr-mime", None).await.unwrap();
        assert_eq!(
            clip.as_slice(),
            b"https://play.pokemonshowdown.com/audio/cries/mrmime.mp3"
        );
        bank.cry_clip(122, "mr-mime", None).await.unwrap();
        bank.cry_clip(1, "bulbasaur", Some("https://cries.test/1.ogg"))
            .await
            .unwrap();

        let urls = transport.urls.lock().unwrap().clone();
        assert_eq!(
            urls,
            vec![
                "https://play.pokemonshowdown.com/audio/cries/mrmime.mp3".to_string(),
                "https://cries.test/1.ogg".to_string(),
            ]
        );
        assert_eq!(bank.cached_count().await, 2);
    }

    #[tokio::test]
    async fn missing_ui_clip_reports_path() {
        let transport = Arc::new(RecordingTransport::default());
        let bank = SoundBank::new(transport, "/nonexistent/pipdex-sounds", 0.5);
        let error = bank.ui_clip(UiSound::Deny).await.unwrap_err();
        assert!(error.to_string().contains("pipboy-deny.wav"));
    }
}
