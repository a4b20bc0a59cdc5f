//! Avatar image persistence.
//!
//! The photobooth posts whole-canvas snapshots and the settings page posts
//! a cropped square; both arrive as base64 payloads, optionally wrapped in
//! a data URL. Decoded images land under `<data_dir>/avatars/` with a
//! percent-encoded filename and the filename is recorded on the user row.

use std::path::{Path, PathBuf};

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use log::info;

use crate::game::errors::GameError;
use crate::game::storage::{tx_get_user, tx_put_user, GameStore};
use crate::logutil::escape_log;
use crate::validation::safe_filename;

/// Decoded image cap. Canvas snapshots run well under this.
pub const MAX_AVATAR_BYTES: usize = 5 * 1024 * 1024;

/// Which of the two stored images a payload replaces.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AvatarKind {
    /// Whole photobooth snapshot (`<user>.png`).
    Full,
    /// Cropped square for the profile header (`<user>_profile.png`).
    Cropped,
}

impl AvatarKind {
    fn filename(self, username: &str) -> String {
        match self {
            AvatarKind::Full => format!("{}.png", safe_filename(username)),
            AvatarKind::Cropped => format!("{}_profile.png", safe_filename(username)),
        }
    }
}

/// Strip an optional `data:*;base64,` prefix and decode the payload.
fn decode_payload(payload: &str) -> Result<Vec<u8>, GameError> {
    let trimmed = payload.trim();
    let encoded = match (trimmed.starts_with("data:"), trimmed.find("base64,")) {
        (true, Some(idx)) => &trimmed[idx + "base64,".len()..],
        _ => trimmed,
    };
    if encoded.is_empty() {
        return Err(GameError::Validation("Image payload is empty.".to_string()));
    }
    let bytes = STANDARD
        .decode(encoded)
        .map_err(|e| GameError::Validation(format!("Invalid image payload: {}", e)))?;
    if bytes.is_empty() {
        return Err(GameError::Validation("Image payload is empty.".to_string()));
    }
    if bytes.len() > MAX_AVATAR_BYTES {
        return Err(GameError::Validation(format!(
            "Image too large (max {} bytes).",
            MAX_AVATAR_BYTES
        )));
    }
    Ok(bytes)
}

fn avatars_dir(data_dir: &Path) -> PathBuf {
    data_dir.join("avatars")
}

/// Decode and store an avatar image, then record its filename on the user.
/// Returns the stored filename.
pub async fn save_avatar(
    store: &GameStore,
    data_dir: &Path,
    username: &str,
    payload: &str,
    kind: AvatarKind,
) -> Result<String, GameError> {
    // Fail before any disk IO if the user is gone.
    store.get_user(username)?;
    let bytes = decode_payload(payload)?;

    let dir = avatars_dir(data_dir);
    tokio::fs::create_dir_all(&dir).await?;
    let filename = kind.filename(username);
    tokio::fs::write(dir.join(&filename), &bytes).await?;

    let stored = filename.clone();
    store.commit_with_retry("save_avatar", move |tx| {
        let mut user = tx_get_user(tx, username)?;
        match kind {
            AvatarKind::Full => user.avatar_image = Some(stored.clone()),
            AvatarKind::Cropped => user.profile_image = Some(stored.clone()),
        }
        user.touch();
        tx_put_user(tx, &user)?;
        Ok(())
    })?;

    info!(
        "{} saved {:?} avatar ({} bytes)",
        escape_log(username),
        kind,
        bytes.len()
    );
    Ok(filename)
}

/// Best-effort removal of both stored images for a user (account deletion).
pub async fn remove_avatars(data_dir: &Path, username: &str) {
    let dir = avatars_dir(data_dir);
    for kind in [AvatarKind::Full, AvatarKind::Cropped] {
        let _ = tokio::fs::remove_file(dir.join(kind.filename(username))).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::ledger::register_user;
    use crate::game::storage::GameStoreBuilder;
    use crate::game::types::GameRules;
    use tempfile::TempDir;

    const PNG_STUB: &[u8] = &[0x89, b'P', b'N', b'G', 0x0d, 0x0a, 0x1a, 0x0a];

    #[test]
    fn decode_handles_raw_and_data_url_payloads() {
        let encoded = STANDARD.encode(PNG_STUB);
        assert_eq!(decode_payload(&encoded).expect("raw"), PNG_STUB);

        let data_url = format!("data:image/png;base64,{}", encoded);
        assert_eq!(decode_payload(&data_url).expect("data url"), PNG_STUB);

        assert!(matches!(
            decode_payload(""),
            Err(GameError::Validation(_))
        ));
        assert!(matches!(
            decode_payload("not@base64!"),
            Err(GameError::Validation(_))
        ));
    }

    #[tokio::test]
    async fn save_avatar_writes_file_and_updates_record() {
        let dir = TempDir::new().expect("tempdir");
        let store = GameStoreBuilder::new(dir.path().join("db"))
            .open()
            .expect("store");
        register_user(&store, "alice", "hunter22", &GameRules::default()).expect("alice");

        let payload = format!("data:image/png;base64,{}", STANDARD.encode(PNG_STUB));
        let filename = save_avatar(&store, dir.path(), "alice", &payload, AvatarKind::Cropped)
            .await
            .expect("save");
        assert_eq!(filename, "alice_profile.png");

        let on_disk = std::fs::read(dir.path().join("avatars").join(&filename)).expect("file");
        assert_eq!(on_disk, PNG_STUB);
        assert_eq!(
            store.get_user("alice").expect("user").profile_image,
            Some(filename)
        );
    }

    #[tokio::test]
    async fn save_avatar_for_unknown_user_is_not_found() {
        let dir = TempDir::new().expect("tempdir");
        let store = GameStoreBuilder::new(dir.path().join("db"))
            .open()
            .expect("store");
        let payload = STANDARD.encode(PNG_STUB);
        let result =
            save_avatar(&store, dir.path(), "nobody99", &payload, AvatarKind::Full).await;
        assert!(matches!(result, Err(GameError::NotFound(_))));
    }
}
