use std::{
    fs,
    io::ErrorKind,
    path::PathBuf,
};

use super::ProfileRepository;
use crate::{
    error::AppResult,
    models::{UserId, UserProfile},
};

/// Stores one pretty-printed JSON document per user under a root directory
#[derive(Debug, Clone)]
pub struct ProfileStore {
    root: PathBuf,
}

impl ProfileStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Location of the document for `user_id`
    pub fn path_for(&self, user_id: &UserId) -> PathBuf {
        self.root.join(format!("user_{}.json", user_id))
    }
}

impl ProfileRepository for ProfileStore {
    fn load(&self, user_id: &UserId) -> AppResult<UserProfile> {
        let path = self.path_for(user_id);

        match fs::read_to_string(&path) {
            Ok(contents) => {
                let profile: UserProfile = serde_json::from_str(&contents)?;
                tracing::debug!(
                    user_id = %user_id,
                    history = profile.history.len(),
                    "Loaded profile"
                );
                Ok(profile)
            }
            Err(e) if e.kind() == ErrorKind::NotFound => {
                tracing::info!(user_id = %user_id, "No stored profile, starting a new one");
                Ok(UserProfile::new())
            }
            Err(e) => {
                tracing::error!(user_id = %user_id, path = %path.display(), error = %e, "Failed to read profile");
                Err(e.into())
            }
        }
    }

    fn save(&self, user_id: &UserId, profile: &UserProfile) -> AppResult<()> {
        fs::create_dir_all(&self.root)?;

        let path = self.path_for(user_id);
        let json = serde_json::to_string_pretty(profile)?;

        // Write next to the target and rename so readers never see a half-written document
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, json)?;
        fs::rename(&tmp, &path)?;

        tracing::debug!(user_id = %user_id, path = %path.display(), "Saved profile");
        Ok(())
    }
}
