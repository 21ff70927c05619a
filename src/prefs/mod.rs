pub mod storage;

use tracing::info;

use crate::prefs::storage::{Storage, StorageError};

pub const ACCESS_TOKEN_KEY: &str = "spotifyAccessToken";
pub const AUTH_TYPE_KEY: &str = "spotifyAuthType";
pub const TEMP_ID_KEY: &str = "spotifyTempId";
pub const LIBRARY_IMAGE_KEY: &str = "libraryImage";

/// Keys removed on sign-out. Preferences are not among them.
pub const AUTH_KEYS: [&str; 3] = [AUTH_TYPE_KEY, TEMP_ID_KEY, ACCESS_TOKEN_KEY];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Preference {
    TrackNameScrolling,
    LyricsMenu,
}

impl Preference {
    pub const ALL: [Preference; 2] = [Preference::TrackNameScrolling, Preference::LyricsMenu];

    pub fn key(self) -> &'static str {
        match self {
            Preference::TrackNameScrolling => "trackNameScrollingEnabled",
            Preference::LyricsMenu => "lyricsMenuEnabled",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Preference::TrackNameScrolling => "Track Name Scrolling",
            Preference::LyricsMenu => "Lyrics Menu Option",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            Preference::TrackNameScrolling => {
                "Enable or disable the scrolling animation for the track name in the player."
            }
            Preference::LyricsMenu => "Enable or disable the lyrics menu option in the player.",
        }
    }
}

/// The two user flags plus the storage they live in.
#[derive(Debug)]
pub struct PreferenceStore {
    storage: Storage,
    track_name_scrolling: bool,
    lyrics_menu: bool,
}

impl PreferenceStore {
    /// Reads both flags, writing `true` for any that was never stored.
    pub fn load(mut storage: Storage) -> Result<Self, StorageError> {
        let track_name_scrolling = read_or_default(&mut storage, Preference::TrackNameScrolling)?;
        let lyrics_menu = read_or_default(&mut storage, Preference::LyricsMenu)?;

        Ok(Self {
            storage,
            track_name_scrolling,
            lyrics_menu,
        })
    }

    pub fn get(&self, preference: Preference) -> bool {
        match preference {
            Preference::TrackNameScrolling => self.track_name_scrolling,
            Preference::LyricsMenu => self.lyrics_menu,
        }
    }

    /// The flag only changes once it is on disk.
    pub fn set(&mut self, preference: Preference, enabled: bool) -> Result<(), StorageError> {
        self.storage.set(preference.key(), enabled.to_string())?;
        match preference {
            Preference::TrackNameScrolling => self.track_name_scrolling = enabled,
            Preference::LyricsMenu => self.lyrics_menu = enabled,
        }
        Ok(())
    }

    pub fn toggle(&mut self, preference: Preference) -> Result<bool, StorageError> {
        let enabled = !self.get(preference);
        self.set(preference, enabled)?;
        Ok(enabled)
    }

    pub fn storage(&self) -> &Storage {
        &self.storage
    }

    pub fn storage_mut(&mut self) -> &mut Storage {
        &mut self.storage
    }

    /// Forgets the credentials. Preferences stay as they are.
    pub fn sign_out(&mut self) -> Result<(), StorageError> {
        for key in AUTH_KEYS {
            self.storage.remove(key)?;
        }
        info!("Signed out");
        Ok(())
    }
}

fn read_or_default(storage: &mut Storage, preference: Preference) -> Result<bool, StorageError> {
    match storage.get(preference.key()) {
        Some(value) => Ok(value == "true"),
        None => {
            storage.set(preference.key(), "true")?;
            Ok(true)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absent_flags_default_to_true_and_are_persisted() {
        let prefs = PreferenceStore::load(Storage::in_memory()).unwrap();

        assert!(prefs.get(Preference::TrackNameScrolling));
        assert!(prefs.get(Preference::LyricsMenu));
        assert_eq!(prefs.storage().get("trackNameScrollingEnabled"), Some("true"));
        assert_eq!(prefs.storage().get("lyricsMenuEnabled"), Some("true"));
    }

    #[test]
    fn stored_values_win() {
        let mut storage = Storage::in_memory();
        storage.set("lyricsMenuEnabled", "false").unwrap();

        let prefs = PreferenceStore::load(storage).unwrap();

        assert!(!prefs.get(Preference::LyricsMenu));
        assert!(prefs.get(Preference::TrackNameScrolling));
    }

    #[test]
    fn toggles_are_persisted_immediately() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        let mut prefs = PreferenceStore::load(Storage::open(&path).unwrap()).unwrap();

        assert!(!prefs.toggle(Preference::TrackNameScrolling).unwrap());

        let reloaded = PreferenceStore::load(Storage::open(&path).unwrap()).unwrap();
        assert!(!reloaded.get(Preference::TrackNameScrolling));
        assert!(reloaded.get(Preference::LyricsMenu));
    }

    #[test]
    fn failed_write_keeps_the_old_value() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        let mut prefs = PreferenceStore::load(Storage::open(&path).unwrap()).unwrap();

        std::fs::remove_file(&path).unwrap();
        std::fs::create_dir(&path).unwrap();

        assert!(prefs.toggle(Preference::LyricsMenu).is_err());
        assert!(prefs.get(Preference::LyricsMenu));
        assert_eq!(prefs.storage().get("lyricsMenuEnabled"), Some("true"));
    }

    #[test]
    fn sign_out_keeps_preferences() {
        let mut storage = Storage::in_memory();
        storage.set(ACCESS_TOKEN_KEY, "token").unwrap();
        storage.set(AUTH_TYPE_KEY, "token").unwrap();
        storage.set(TEMP_ID_KEY, "tmp").unwrap();
        let mut prefs = PreferenceStore::load(storage).unwrap();
        prefs.set(Preference::LyricsMenu, false).unwrap();

        prefs.sign_out().unwrap();

        for key in AUTH_KEYS {
            assert_eq!(prefs.storage().get(key), None);
        }
        assert_eq!(prefs.storage().get("lyricsMenuEnabled"), Some("false"));
        assert_eq!(prefs.storage().get("trackNameScrollingEnabled"), Some("true"));
    }
}
