// Platform directories for tabkeys state.
//
// `TABKEYS_CONFIG_DIR` and `TABKEYS_DATA_DIR` override the defaults, which
// follow each OS's conventions.

use std::env;
use std::path::PathBuf;

const APP_DIR: &str = "tabkeys";

fn home() -> PathBuf {
    env::var_os("HOME")
        .or_else(|| env::var_os("USERPROFILE"))
        .map(PathBuf::from)
        .unwrap_or_else(env::temp_dir)
}

/// Where `settings.json` lives.
pub fn config_dir() -> PathBuf {
    if let Some(dir) = env::var_os("TABKEYS_CONFIG_DIR") {
        return PathBuf::from(dir);
    }
    if cfg!(target_os = "macos") {
        home().join("Library").join("Application Support").join(APP_DIR)
    } else if cfg!(target_os = "windows") {
        env::var_os("APPDATA").map(PathBuf::from).unwrap_or_else(home).join(APP_DIR)
    } else {
        env::var_os("XDG_CONFIG_HOME")
            .map(PathBuf::from)
            .unwrap_or_else(|| home().join(".config"))
            .join(APP_DIR)
    }
}

/// Where the state database lives.
pub fn data_dir() -> PathBuf {
    if let Some(dir) = env::var_os("TABKEYS_DATA_DIR") {
        return PathBuf::from(dir);
    }
    if cfg!(target_os = "linux") {
        env::var_os("XDG_DATA_HOME")
            .map(PathBuf::from)
            .unwrap_or_else(|| home().join(".local").join("share"))
            .join(APP_DIR)
    } else {
        config_dir()
    }
}
