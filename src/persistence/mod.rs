use std::{
    fs,
    path::{
        Path,
        PathBuf,
    },
};

use serde::{
    Deserialize,
    Serialize,
};

use crate::core::TorchLearnError;

const APP_NAME: &str = "torchlearn";

pub fn get_app_data_dir() -> PathBuf {
    if let Some(data_dir) = dirs::data_local_dir() {
        let app_dir = data_dir.join(APP_NAME);
        let _ = fs::create_dir_all(&app_dir);
        app_dir
    } else {
        PathBuf::from(".")
    }
}

pub fn get_data_file_path(filename: &str) -> PathBuf {
    get_app_data_dir().join(filename)
}

pub fn save_json<T: Serialize>(data: &T, filename: &str) -> Result<(), TorchLearnError> {
    save_json_to(data, &get_data_file_path(filename))
}

pub fn save_json_to<T: Serialize>(data: &T, path: &Path) -> Result<(), TorchLearnError> {
    let json = serde_json::to_string_pretty(data)?;
    fs::write(path, json)?;
    log::info!("Data saved to: {}", path.display());
    Ok(())
}

/// Missing files yield `T::default()`.
pub fn load_json_from<T: for<'de> Deserialize<'de> + Default>(
    path: &Path,
) -> Result<T, TorchLearnError> {
    if !path.exists() {
        return Ok(T::default());
    }

    let json = fs::read_to_string(path)?;
    let data: T = serde_json::from_str(&json)?;
    log::info!("Data loaded from: {}", path.display());
    Ok(data)
}

pub fn load_json_or_default<T: for<'de> Deserialize<'de> + Default>(filename: &str) -> T {
    match load_json_from::<T>(&get_data_file_path(filename)) {
        Ok(data) => data,
        Err(e) => {
            log::warn!("Failed to load {}: {}. Using defaults.", filename, e);
            T::default()
        }
    }
}
