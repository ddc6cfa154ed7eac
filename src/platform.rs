// Platform-specific locations for settings and the click-history database.
//
// Linux:   $XDG_CONFIG_HOME/restaurant-recommender, $XDG_DATA_HOME/restaurant-recommender
// macOS:   ~/Library/Application Support/RestaurantRecommender
// Windows: %APPDATA%/RestaurantRecommender

use std::env;
use std::path::PathBuf;

#[cfg(not(any(target_os = "macos", target_os = "windows")))]
const APP_DIR: &str = "restaurant-recommender";

#[cfg(any(target_os = "macos", target_os = "windows"))]
const APP_DIR: &str = "RestaurantRecommender";

/// File name of the SQLite database holding persisted client state.
pub const DATABASE_FILE: &str = "restaurant-recommender.db";

fn home_dir() -> PathBuf {
    PathBuf::from(env::var("HOME").unwrap_or_else(|_| String::from("/tmp")))
}

/// Returns `$VAR/<app>` when `var` is set and non-empty.
#[cfg(not(target_os = "macos"))]
fn from_env(var: &str) -> Option<PathBuf> {
    env::var(var)
        .ok()
        .filter(|v| !v.is_empty())
        .map(|v| PathBuf::from(v).join(APP_DIR))
}

/// Returns the directory holding `settings.json`.
pub fn get_config_dir() -> PathBuf {
    #[cfg(target_os = "macos")]
    {
        home_dir().join("Library").join("Application Support").join(APP_DIR)
    }
    #[cfg(target_os = "windows")]
    {
        from_env("APPDATA")
            .unwrap_or_else(|| home_dir().join("AppData").join("Roaming").join(APP_DIR))
    }
    #[cfg(not(any(target_os = "macos", target_os = "windows")))]
    {
        from_env("XDG_CONFIG_HOME").unwrap_or_else(|| home_dir().join(".config").join(APP_DIR))
    }
}

/// Returns the directory holding the persisted click history.
pub fn get_data_dir() -> PathBuf {
    #[cfg(target_os = "macos")]
    {
        home_dir().join("Library").join("Application Support").join(APP_DIR)
    }
    #[cfg(target_os = "windows")]
    {
        from_env("APPDATA")
            .unwrap_or_else(|| home_dir().join("AppData").join("Roaming").join(APP_DIR))
    }
    #[cfg(not(any(target_os = "macos", target_os = "windows")))]
    {
        from_env("XDG_DATA_HOME")
            .unwrap_or_else(|| home_dir().join(".local").join("share").join(APP_DIR))
    }
}

/// Default location of the database file.
pub fn default_database_path() -> PathBuf {
    get_data_dir().join(DATABASE_FILE)
}
