use std::fs;
use std::path::Path;

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::html::escape;
use crate::size::{ImageSize, SizeProfile};
use crate::{Result, AVATAR_SIZE_NAME, META_KEY, POST_TYPE, SHORTCODE_TAG};

static DEFAULT_PLUGIN_URL: Lazy<Url> = Lazy::new(|| {
    Url::parse("http://localhost/wp-content/plugins/wp-bubble-chat/").unwrap()
});
const DEFAULT_PLACEHOLDER_PATH: &str = "images/no-image.png";

/// Installation-specific knobs. Every field may be left out of a
/// settings file, in which case the default is used.
#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(default)]
pub struct Settings {
    pub post_type: String,
    pub meta_key: String,
    pub shortcode_tag: String,
    pub avatar_size: SizeProfile,
    /// Base URL the plugin's static files are served from.
    pub plugin_url: Url,
    /// Placeholder image, relative to `plugin_url`.
    pub placeholder_path: String,
}

impl Settings {
    /// Read settings from a JSON file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref())?;
        let settings: Settings = serde_json::from_str(&content)?;
        log::info!(
            "settings: loaded from {}, shortcode [{}]",
            path.as_ref().display(),
            settings.shortcode_tag
        );
        Ok(settings)
    }

    pub fn avatar_size_name(&self) -> ImageSize {
        ImageSize::named(self.avatar_size.name.clone())
    }

    pub fn placeholder_url(&self) -> Result<Url> {
        Ok(self.plugin_url.join(&self.placeholder_path)?)
    }

    /// The tag shown when no avatar can be resolved.
    pub fn placeholder_tag(&self) -> String {
        let src = match self.placeholder_url() {
            Ok(url) => url.to_string(),
            Err(e) => {
                log::warn!("settings: bad placeholder url: {}", e);
                self.placeholder_path.clone()
            }
        };
        format!(
            "<img src=\"{}\" alt=\"No Image\" style=\"width: {}px;\">",
            escape(&src),
            self.avatar_size.width
        )
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            post_type: POST_TYPE.to_owned(),
            meta_key: META_KEY.to_owned(),
            shortcode_tag: SHORTCODE_TAG.to_owned(),
            avatar_size: SizeProfile::new(AVATAR_SIZE_NAME, 50, 50, true),
            plugin_url: DEFAULT_PLUGIN_URL.clone(),
            placeholder_path: DEFAULT_PLACEHOLDER_PATH.to_owned(),
        }
    }
}
