//! On-disk JSON persistence (C7).
//!
//! Every scope's state — memory metadata, waypoints, temporal facts — is a
//! plain pretty-printed JSON document, overwritten wholesale on every
//! mutation. There is no transactional write discipline: a crash mid-write
//! may leave truncated state, which is accepted as a trade-off (see design
//! notes). Directories are created with `0700` permissions and files with
//! `0600` on Unix, matching the hardening convention the rest of the corpus
//! applies to on-disk secrets and local data.

use std::path::Path;

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::error::StorageError;

/// Create `dir` (and parents) if missing, hardened to `0700` on Unix.
pub fn ensure_dir_hardened(dir: &Path) -> Result<(), StorageError> {
    std::fs::create_dir_all(dir)?;
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let perms = std::fs::Permissions::from_mode(0o700);
        std::fs::set_permissions(dir, perms)?;
    }
    Ok(())
}

/// Write `contents` to `path`, then harden the file to `0600` on Unix.
pub fn write_file_hardened(path: &Path, contents: &str) -> Result<(), StorageError> {
    std::fs::write(path, contents)?;
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let perms = std::fs::Permissions::from_mode(0o600);
        std::fs::set_permissions(path, perms)?;
    }
    Ok(())
}

/// Load a JSON document from `path`, defaulting if the file is absent or
/// empty (first run on a fresh scope directory).
pub fn load_json<T>(path: &Path) -> Result<T, StorageError>
where
    T: DeserializeOwned + Default,
{
    if !path.exists() || std::fs::metadata(path)?.len() == 0 {
        return Ok(T::default());
    }
    let raw = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&raw)?)
}

/// Serialize `value` as pretty-printed JSON and write it to `path`,
/// hardened to `0600`.
pub fn save_json<T: Serialize>(path: &Path, value: &T) -> Result<(), StorageError> {
    let json = serde_json::to_string_pretty(value)?;
    write_file_hardened(path, &json)
}
