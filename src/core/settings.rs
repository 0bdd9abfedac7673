use std::{
    env,
    path::PathBuf,
    sync::Arc,
    time::Duration,
};

use serde::{
    Deserialize,
    Serialize,
};

use super::TorchLearnError;
use crate::source::{
    gemini::{
        api_key_from_env,
        GeminiConfig,
    },
    CardSource,
    DatasetSource,
    GeminiSource,
};

pub const SETTINGS_FILE: &str = "settings.json";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    /// Gemini when an API key is available, the dataset otherwise.
    #[default]
    Auto,
    Gemini,
    Dataset,
}

impl SourceKind {
    fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "auto" => Some(SourceKind::Auto),
            "gemini" => Some(SourceKind::Gemini),
            "dataset" | "offline" | "local" => Some(SourceKind::Dataset),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub source: SourceKind,
    pub gemini_model: String,
    pub temperature: f32,
    pub request_timeout_secs: u64,
    pub dataset_path: Option<PathBuf>,
    pub dark_mode: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            source: SourceKind::Auto,
            gemini_model: "gemini-2.5-flash".to_string(),
            temperature: 0.7,
            request_timeout_secs: 60,
            dataset_path: None,
            dark_mode: true,
        }
    }
}

impl Settings {
    /// Applies `TORCHLEARN_SOURCE` and `TORCHLEARN_MODEL` on top of the
    /// stored settings.
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(value) = env::var("TORCHLEARN_SOURCE") {
            match SourceKind::parse(&value) {
                Some(kind) => self.source = kind,
                None => log::warn!("Ignoring unknown TORCHLEARN_SOURCE value {:?}", value),
            }
        }

        if let Ok(model) = env::var("TORCHLEARN_MODEL") {
            if !model.trim().is_empty() {
                self.gemini_model = model.trim().to_string();
            }
        }

        self
    }

    /// Resolves `Auto` against the availability of an API key.
    pub fn effective_source(&self, api_key: Option<&str>) -> SourceKind {
        match self.source {
            SourceKind::Auto if api_key.is_some() => SourceKind::Gemini,
            SourceKind::Auto => SourceKind::Dataset,
            kind => kind,
        }
    }

    pub fn build_source(&self) -> Result<Arc<dyn CardSource>, TorchLearnError> {
        let api_key = api_key_from_env();

        match self.effective_source(api_key.as_deref()) {
            SourceKind::Gemini => {
                log::info!("Using Gemini ({}) as card source", self.gemini_model);
                let config = GeminiConfig {
                    api_key,
                    model: self.gemini_model.clone(),
                    temperature: self.temperature,
                    timeout: Duration::from_secs(self.request_timeout_secs.max(1)),
                };
                Ok(Arc::new(GeminiSource::new(config)?))
            }
            _ => {
                let source = match &self.dataset_path {
                    Some(path) => DatasetSource::from_file(path)?,
                    None => DatasetSource::bundled()?,
                };
                log::info!("Using offline dataset ({} cards) as card source", source.len());
                Ok(Arc::new(source))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_settings_fill_defaults() {
        let settings: Settings =
            serde_json::from_str(r#"{ "source": "dataset", "dark_mode": false }"#).unwrap();
        assert_eq!(settings.source, SourceKind::Dataset);
        assert!(!settings.dark_mode);
        assert_eq!(settings.gemini_model, "gemini-2.5-flash");
        assert_eq!(settings.request_timeout_secs, 60);
    }

    #[test]
    fn test_effective_source() {
        let settings = Settings::default();
        assert_eq!(settings.effective_source(Some("key")), SourceKind::Gemini);
        assert_eq!(settings.effective_source(None), SourceKind::Dataset);

        let forced = Settings { source: SourceKind::Gemini, ..Settings::default() };
        assert_eq!(forced.effective_source(None), SourceKind::Gemini);
    }

    #[test]
    fn test_source_kind_parsing() {
        assert_eq!(SourceKind::parse(" Offline "), Some(SourceKind::Dataset));
        assert_eq!(SourceKind::parse("GEMINI"), Some(SourceKind::Gemini));
        assert_eq!(SourceKind::parse("bogus"), None);
    }

    #[test]
    fn test_dataset_source_from_settings() {
        let settings = Settings { source: SourceKind::Dataset, ..Settings::default() };
        let source = settings.build_source().unwrap();
        assert_eq!(source.name(), "Offline dataset");
    }
}
