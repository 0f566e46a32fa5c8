//! Signed-in user and account settings.
//!
//! [`AuthClient`] mirrors the hosted auth object: fetch the current user,
//! patch their settings, sign out. [`MemoryAuth`] keeps the profile in
//! process; [`FileAuth`] persists it as JSON (`null` once signed out).

use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::{Mutex, MutexGuard};

use crate::error::{QuireError, Result};

/// Interface languages a user can pick.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    De,
    En,
    Fr,
    Es,
    It,
}

impl Language {
    pub const ALL: [Language; 5] = [
        Language::De,
        Language::En,
        Language::Fr,
        Language::Es,
        Language::It,
    ];

    pub fn code(&self) -> &'static str {
        match self {
            Language::De => "de",
            Language::En => "en",
            Language::Fr => "fr",
            Language::Es => "es",
            Language::It => "it",
        }
    }

    /// Name of the language in that language.
    pub fn native_name(&self) -> &'static str {
        match self {
            Language::De => "Deutsch",
            Language::En => "English",
            Language::Fr => "Français",
            Language::Es => "Español",
            Language::It => "Italiano",
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Language {
    type Err = QuireError;

    fn from_str(s: &str) -> Result<Self> {
        Language::ALL
            .into_iter()
            .find(|l| l.code().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| QuireError::InvalidSetting {
                key: "preferred_language",
                value: s.to_string(),
            })
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    Light,
    Dark,
}

impl Theme {
    pub fn as_str(&self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Theme {
    type Err = QuireError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "light" => Ok(Theme::Light),
            "dark" => Ok(Theme::Dark),
            _ => Err(QuireError::InvalidSetting {
                key: "theme",
                value: s.to_string(),
            }),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    pub email: String,
    #[serde(default)]
    pub full_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preferred_language: Option<Language>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub theme: Option<Theme>,
}

impl UserProfile {
    pub fn new(email: &str, full_name: &str) -> Self {
        UserProfile {
            email: email.to_string(),
            full_name: full_name.to_string(),
            preferred_language: None,
            theme: None,
        }
    }
}

/// Settings a user may change about themselves.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SettingsPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub preferred_language: Option<Language>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub theme: Option<Theme>,
}

impl SettingsPatch {
    pub fn is_empty(&self) -> bool {
        self.full_name.is_none() && self.preferred_language.is_none() && self.theme.is_none()
    }

    pub fn apply(self, user: &mut UserProfile) {
        if let Some(full_name) = self.full_name {
            user.full_name = full_name;
        }
        if let Some(language) = self.preferred_language {
            user.preferred_language = Some(language);
        }
        if let Some(theme) = self.theme {
            user.theme = Some(theme);
        }
    }
}

pub trait AuthClient: Send + Sync {
    /// The signed-in user, or [`QuireError::NotSignedIn`].
    fn me(&self) -> Result<UserProfile>;

    /// Apply `patch` to the signed-in user and return the result.
    fn update_me(&self, patch: SettingsPatch) -> Result<UserProfile>;

    fn logout(&self) -> Result<()>;
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

#[derive(Debug, Default)]
pub struct MemoryAuth {
    user: Mutex<Option<UserProfile>>,
}

impl MemoryAuth {
    pub fn signed_in(user: UserProfile) -> Self {
        MemoryAuth {
            user: Mutex::new(Some(user)),
        }
    }

    pub fn signed_out() -> Self {
        Self::default()
    }
}

impl AuthClient for MemoryAuth {
    fn me(&self) -> Result<UserProfile> {
        lock(&self.user).clone().ok_or(QuireError::NotSignedIn)
    }

    fn update_me(&self, patch: SettingsPatch) -> Result<UserProfile> {
        let mut guard = lock(&self.user);
        let user = guard.as_mut().ok_or(QuireError::NotSignedIn)?;
        patch.apply(user);
        Ok(user.clone())
    }

    fn logout(&self) -> Result<()> {
        lock(&self.user).take();
        Ok(())
    }
}

/// Profile persisted to a JSON file.
///
/// A missing file means a first run: the profile is seeded from `seed` and
/// written out. Signing out writes `null`, which sticks until [`FileAuth::login`].
#[derive(Debug)]
pub struct FileAuth {
    path: PathBuf,
    seed: UserProfile,
    inner: MemoryAuth,
}

impl FileAuth {
    pub fn open(path: &Path, seed: UserProfile) -> Result<Self> {
        let user = if path.exists() {
            let content = fs::read_to_string(path)?;
            serde_json::from_str::<Option<UserProfile>>(&content)?
        } else {
            Some(seed.clone())
        };
        let auth = FileAuth {
            path: path.to_path_buf(),
            seed,
            inner: MemoryAuth {
                user: Mutex::new(user),
            },
        };
        if !path.exists() {
            auth.persist()?;
        }
        Ok(auth)
    }

    /// Sign back in as the seed profile.
    pub fn login(&self) -> Result<UserProfile> {
        *lock(&self.inner.user) = Some(self.seed.clone());
        self.persist()?;
        Ok(self.seed.clone())
    }

    fn persist(&self) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(&*lock(&self.inner.user))?;
        fs::write(&self.path, json + "\n")?;
        Ok(())
    }
}

impl AuthClient for FileAuth {
    fn me(&self) -> Result<UserProfile> {
        self.inner.me()
    }

    fn update_me(&self, patch: SettingsPatch) -> Result<UserProfile> {
        let user = self.inner.update_me(patch)?;
        self.persist()?;
        Ok(user)
    }

    fn logout(&self) -> Result<()> {
        self.inner.logout()?;
        tracing::info!("signed out");
        self.persist()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_language_and_theme_parse() {
        assert_eq!("FR".parse::<Language>().unwrap(), Language::Fr);
        assert_eq!(Language::De.native_name(), "Deutsch");
        assert_eq!("dark".parse::<Theme>().unwrap(), Theme::Dark);
        assert!(matches!(
            "klingon".parse::<Language>(),
            Err(QuireError::InvalidSetting { key: "preferred_language", .. })
        ));
        assert!("sepia".parse::<Theme>().is_err());
    }

    #[test]
    fn test_update_me_only_changes_given_settings() {
        let auth = MemoryAuth::signed_in(UserProfile::new("a@x", "Ada"));
        let user = auth
            .update_me(SettingsPatch {
                theme: Some(Theme::Dark),
                ..Default::default()
            })
            .unwrap();
        assert_eq!(user.theme, Some(Theme::Dark));
        assert_eq!(user.preferred_language, None);
        assert_eq!(user.full_name, "Ada");
        assert_eq!(auth.me().unwrap(), user);
    }

    #[test]
    fn test_logout_signs_out() {
        let auth = MemoryAuth::signed_in(UserProfile::new("a@x", ""));
        auth.logout().unwrap();
        assert!(matches!(auth.me(), Err(QuireError::NotSignedIn)));
        assert!(matches!(
            auth.update_me(SettingsPatch::default()),
            Err(QuireError::NotSignedIn)
        ));
    }

    #[test]
    fn test_profile_wire_format() {
        let mut user = UserProfile::new("a@x", "Ada");
        user.preferred_language = Some(Language::It);
        let json = serde_json::to_string(&user).unwrap();
        assert_eq!(
            json,
            r#"{"email":"a@x","full_name":"Ada","preferred_language":"it"}"#
        );
    }

    #[test]
    fn test_file_auth_persists_settings_and_logout() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("profile.json");
        let seed = UserProfile::new("a@x", "Ada");

        let auth = FileAuth::open(&path, seed.clone()).unwrap();
        assert!(path.exists());
        auth.update_me(SettingsPatch {
            preferred_language: Some(Language::Es),
            ..Default::default()
        })
        .unwrap();

        let reopened = FileAuth::open(&path, seed.clone()).unwrap();
        assert_eq!(reopened.me().unwrap().preferred_language, Some(Language::Es));

        reopened.logout().unwrap();
        let signed_out = FileAuth::open(&path, seed.clone()).unwrap();
        assert!(matches!(signed_out.me(), Err(QuireError::NotSignedIn)));

        signed_out.login().unwrap();
        let back = FileAuth::open(&path, seed).unwrap();
        assert_eq!(back.me().unwrap().email, "a@x");
    }
}
