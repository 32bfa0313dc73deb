//! Per-user voice preferences for text-to-speech

use crate::error::{HoardError, HoardResult};
use crate::store::{Record, RecordStore};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Voice used when a user has not chosen one
pub const DEFAULT_VOICE: &str = "en-US";

/// Accepted playback speed range
pub const SPEED_RANGE: std::ops::RangeInclusive<f32> = 0.25..=4.0;

/// Voice settings of one user within one guild
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VoicePreference {
    #[serde(rename = "g")]
    pub gid: u64,

    #[serde(rename = "u")]
    pub uid: u64,

    #[serde(rename = "v", default = "default_voice")]
    pub voice: String,

    #[serde(rename = "s", default = "default_speed")]
    pub speed: f32,
}

fn default_voice() -> String {
    DEFAULT_VOICE.to_string()
}

fn default_speed() -> f32 {
    1.0
}

impl VoicePreference {
    /// Default preference for a user
    pub fn new(gid: u64, uid: u64) -> Self {
        Self {
            gid,
            uid,
            voice: default_voice(),
            speed: default_speed(),
        }
    }
}

impl Record for VoicePreference {
    type Key = (u64, u64);

    fn key(&self) -> (u64, u64) {
        (self.gid, self.uid)
    }
}

/// Voice preferences of every user, backed by one file
#[derive(Debug)]
pub struct PreferenceBook {
    store: RecordStore<VoicePreference>,
}

impl PreferenceBook {
    pub fn new(store: RecordStore<VoicePreference>) -> Self {
        Self { store }
    }

    pub fn open(path: impl Into<PathBuf>, max_bytes: u64) -> Self {
        Self::new(RecordStore::open(path, max_bytes))
    }

    pub fn store(&self) -> &RecordStore<VoicePreference> {
        &self.store
    }

    /// Preference of a user, or the default if none is stored
    pub fn get(&mut self, gid: u64, uid: u64) -> VoicePreference {
        self.store
            .get(&(gid, uid))
            .unwrap_or_else(|| VoicePreference::new(gid, uid))
    }

    pub fn set_voice(&mut self, gid: u64, uid: u64, voice: &str) -> HoardResult<()> {
        self.update(gid, uid, Some(voice), None)
    }

    pub fn set_speed(&mut self, gid: u64, uid: u64, speed: f32) -> HoardResult<()> {
        self.update(gid, uid, None, Some(speed))
    }

    /// Change voice and speed together
    ///
    /// Both values are checked before anything is written, and the result
    /// is saved in one write.
    pub fn update(
        &mut self,
        gid: u64,
        uid: u64,
        voice: Option<&str>,
        speed: Option<f32>,
    ) -> HoardResult<()> {
        let voice = voice.map(check_voice).transpose()?;
        let speed = speed.map(check_speed).transpose()?;

        let mut pref = self.get(gid, uid);
        if let Some(voice) = voice {
            pref.voice = voice;
        }
        if let Some(speed) = speed {
            pref.speed = speed;
        }
        self.store.upsert(pref)
    }

    /// Drop a user's stored preference; returns whether one existed
    pub fn reset(&mut self, gid: u64, uid: u64) -> HoardResult<bool> {
        self.store.remove(&(gid, uid))
    }
}

fn check_voice(voice: &str) -> HoardResult<String> {
    let voice = voice.trim();
    if voice.is_empty() {
        return Err(HoardError::User("Voice name must not be empty".to_string()));
    }
    Ok(voice.to_string())
}

fn check_speed(speed: f32) -> HoardResult<f32> {
    if !SPEED_RANGE.contains(&speed) {
        return Err(HoardError::User(format!(
            "Speed {} is outside {}..={}",
            speed,
            SPEED_RANGE.start(),
            SPEED_RANGE.end()
        )));
    }
    Ok(speed)
}
