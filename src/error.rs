//! Error types shared by the scene, the loaders and the scroll plumbing.

use thiserror::Error;

/// Everything in the scene that can fail without taking the render loop down.
///
/// None of these are retried: a failed model load stays failed for the session
/// and a missing scroll container simply leaves the camera uncoupled.
#[derive(Debug, Error)]
pub enum SceneError {
    /// The asset could not be fetched from disk or over the network.
    #[error("failed to load asset `{path}`: {source}")]
    AssetLoad {
        path: String,
        #[source]
        source: anyhow::Error,
    },

    /// The asset was fetched but is not a usable glTF scene.
    #[error("failed to parse asset `{path}`: {reason}")]
    AssetParse { path: String, reason: String },

    /// No element matched the scroll container selector at mount time.
    #[error("no scroll container matches `{selector}`")]
    MissingContainer { selector: String },

    /// Registering a DOM listener failed.
    #[error("could not register listener: {0}")]
    Listener(String),

    /// An update rule produced a transform with NaN or infinite components.
    #[error("entity `{entity}` produced a non-finite transform")]
    NonFiniteTransform { entity: String },
}

impl SceneError {
    pub fn asset_load(path: &str, source: impl Into<anyhow::Error>) -> Self {
        Self::AssetLoad {
            path: path.to_string(),
            source: source.into(),
        }
    }

    pub fn asset_parse(path: &str, reason: impl ToString) -> Self {
        Self::AssetParse {
            path: path.to_string(),
            reason: reason.to_string(),
        }
    }

    /// True for the asset variants; those keep the entity out of the scene.
    pub fn is_asset_error(&self) -> bool {
        matches!(self, Self::AssetLoad { .. } | Self::AssetParse { .. })
    }
}
