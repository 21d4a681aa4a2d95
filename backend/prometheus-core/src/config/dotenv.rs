//! `.env` discovery for the startup collaborator.

use std::path::PathBuf;

use log::{debug, info, warn};

/// Load `.env` from the current directory, then from the executable's directory.
///
/// Returns the path of the file that was loaded. A missing file is not an
/// error; existing process variables always win.
pub fn load_dotenv() -> Option<PathBuf> {
    if let Ok(path) = dotenvy::dotenv() {
        info!("Loaded .env from: {:?}", path);
        return Some(path);
    }

    let env_path = std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(|dir| dir.join(".env")))
        .filter(|path| path.exists());

    if let Some(env_path) = env_path {
        match dotenvy::from_path(&env_path) {
            Ok(()) => {
                info!("Loaded .env from: {:?}", env_path);
                return Some(env_path);
            }
            Err(e) => {
                warn!("Failed to parse .env at {:?}: {}", env_path, e);
            }
        }
    }

    debug!("No .env file found - using existing environment variables");
    None
}
