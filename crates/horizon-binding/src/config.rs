//! Declarative binding configuration.
//!
//! A [`BindingConfig`] names the record properties an adapter reads and the
//! columns it shows, so a control's bindings can live in a TOML or JSON file
//! next to the rest of an application's settings.
//!
//! ```ignore
//! use horizon_binding::config::BindingConfig;
//! use horizon_binding::model::ListViewSource;
//!
//! let config = BindingConfig::from_toml_str(r#"
//! text_property = "name"
//! small_image_property = "icon"
//!
//! [[columns]]
//! text = "Size"
//! property = "size"
//! size = 80
//! "#)?;
//!
//! let files = ListViewSource::new();
//! config.apply_to_list_view(&files);
//! ```
//!
//! Every field is optional. Applying a config only touches the settings it
//! names; an empty `columns` list leaves existing columns alone.

use std::path::Path;
use std::sync::Arc;

use horizon_binding_core::logging::targets;
use serde::{Deserialize, Serialize};

use crate::model::{
    BindableDataColumn, BindableDataProvider, ListViewColumn, ListViewSource, TextListSource,
    TreeItemSource,
};

/// Errors raised while loading a [`BindingConfig`].
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The file could not be read.
    #[error("failed to read binding config '{path}': {source}")]
    Io {
        /// The path that was read.
        path: String,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The file extension is neither `toml` nor `json`.
    #[error("unsupported binding config format '{0}'")]
    UnsupportedFormat(String),

    /// Malformed TOML.
    #[error("invalid TOML binding config: {0}")]
    Toml(#[from] toml::de::Error),

    /// Malformed JSON.
    #[error("invalid JSON binding config: {0}")]
    Json(#[from] serde_json::Error),
}

/// One configured column.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColumnConfig {
    /// Header text.
    pub text: String,
    /// Record property shown in the column.
    pub property: String,
    /// Width in pixels. The column default when absent.
    pub size: Option<i32>,
}

/// Property names and columns for one adapter.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BindingConfig {
    /// Record property supplying item or node text. For a list view this is
    /// the first column's property.
    pub text_property: Option<String>,
    /// Record property supplying a text list's check state.
    pub checked_property: Option<String>,
    /// Record property supplying a list view's small icon.
    pub small_image_property: Option<String>,
    /// Record property supplying a list view's large icon.
    pub large_image_property: Option<String>,
    /// Record property supplying a tree node's icon.
    pub image_property: Option<String>,
    /// Record property supplying a tree node's children.
    pub children_property: Option<String>,
    /// Column indexes shown as list-view details.
    pub data_columns: Option<Vec<usize>>,
    /// Columns of a list view or data grid. Empty leaves existing columns
    /// alone.
    pub columns: Vec<ColumnConfig>,
}

impl BindingConfig {
    /// Parses a TOML document.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(s)?)
    }

    /// Parses a JSON document.
    pub fn from_json_str(s: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(s)?)
    }

    /// Loads a `.toml` or `.json` file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let config = match path.extension().and_then(|e| e.to_str()) {
            Some("toml") => Self::from_toml_str(&text)?,
            Some("json") => Self::from_json_str(&text)?,
            other => return Err(ConfigError::UnsupportedFormat(other.unwrap_or("").to_string())),
        };
        tracing::debug!(target: targets::CONFIG, path = %path.display(), columns = config.columns.len(), "loaded binding config");
        Ok(config)
    }

    /// Serializes to a TOML document.
    pub fn to_toml_string(&self) -> Result<String, toml::ser::Error> {
        toml::to_string(self)
    }

    /// Assigns the text and checked properties.
    pub fn apply_to_text_list(&self, source: &TextListSource) {
        if let Some(name) = &self.text_property {
            source.set_text_property(name.as_str());
        }
        if let Some(name) = &self.checked_property {
            source.set_checked_property(name.as_str());
        }
    }

    /// Assigns the text and image properties, replaces the columns and sets
    /// the detail columns.
    pub fn apply_to_list_view(&self, source: &ListViewSource) {
        if !self.columns.is_empty() {
            let columns = source.columns();
            columns.clear();
            for column in &self.columns {
                let mut built = ListViewColumn::new(column.text.as_str())
                    .with_text_property(column.property.as_str());
                if let Some(size) = column.size {
                    built = built.with_size(size);
                }
                columns.add(Arc::new(built));
            }
        }
        // The first column shows the primary text; its property doubles as
        // the adapter's text property.
        if let Some(name) = &self.text_property {
            if let Some(first) = source.columns().get(0) {
                first.set_text_property(name.as_str());
            }
        }
        if let Some(name) = &self.small_image_property {
            source.set_small_image_property(name.as_str());
        }
        if let Some(name) = &self.large_image_property {
            source.set_large_image_property(name.as_str());
        }
        if let Some(data_columns) = &self.data_columns {
            source.set_data_columns(data_columns.clone());
        }
        tracing::debug!(target: targets::CONFIG, columns = source.columns().len(), "applied list view config");
    }

    /// Assigns the text, image and children properties.
    pub fn apply_to_tree(&self, source: &TreeItemSource) {
        if let Some(name) = &self.text_property {
            source.set_text_property(name.as_str());
        }
        if let Some(name) = &self.image_property {
            source.set_image_property(name.as_str());
        }
        if let Some(name) = &self.children_property {
            source.set_children_property(name.as_str());
        }
    }

    /// Replaces the provider's columns with the configured ones.
    pub fn apply_to_data_provider(&self, provider: &BindableDataProvider) {
        if self.columns.is_empty() {
            return;
        }
        provider.clear_columns();
        for column in &self.columns {
            let built = BindableDataColumn::new(column.text.as_str())
                .with_value_property(column.property.as_str());
            if let Some(size) = column.size {
                built.set_size(size);
            }
            provider.add_column(Arc::new(built));
        }
        tracing::debug!(target: targets::CONFIG, columns = provider.column_count(), "applied data grid config");
    }
}
