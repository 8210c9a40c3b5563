use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Name of the size that always means "the uploaded original".
pub const FULL_SIZE: &str = "full";

/// Requested rendering size of an image.
///
/// Either a profile registered in a [`SizeRegistry`] or explicit pixels
/// (width first). In JSON this is a plain string or a `[w, h]` pair.
#[derive(Eq, PartialEq, Clone, Debug, Deserialize, Serialize)]
#[serde(untagged)]
pub enum ImageSize {
    Named(String),
    Dimensions(u32, u32),
}

impl ImageSize {
    pub fn named(name: impl Into<String>) -> Self {
        ImageSize::Named(name.into())
    }

    pub fn is_empty(&self) -> bool {
        match self {
            ImageSize::Named(name) => name.trim().is_empty(),
            ImageSize::Dimensions(width, height) => *width == 0 && *height == 0,
        }
    }

    /// Suffix used in the `size-*` class of a rendered tag.
    pub fn class_name(&self) -> String {
        match self {
            ImageSize::Named(name) => name.clone(),
            ImageSize::Dimensions(width, height) => {
                format!("{}x{}", width, height)
            }
        }
    }
}

impl fmt::Display for ImageSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.class_name())
    }
}

#[derive(Eq, PartialEq, Clone, Debug, Deserialize, Serialize)]
pub struct SizeProfile {
    pub name: String,
    pub width: u32,
    pub height: u32,
    /// Crop to fill the box exactly instead of scaling to fit inside it.
    #[serde(default)]
    pub crop: bool,
}

impl SizeProfile {
    pub fn new(
        name: impl Into<String>,
        width: u32,
        height: u32,
        crop: bool,
    ) -> Self {
        Self {
            name: name.into(),
            width,
            height,
            crop,
        }
    }

    /// Dimensions of an `original_width × original_height` image rendered
    /// with this profile. Images are never upscaled.
    pub fn fit(&self, original_width: u32, original_height: u32) -> (u32, u32) {
        if self.crop {
            return (
                self.width.min(original_width),
                self.height.min(original_height),
            );
        }
        constrain(original_width, original_height, self.width, self.height)
    }
}

/// Scale `width × height` down to fit inside the box, keeping the aspect
/// ratio. A zero box edge leaves that direction unconstrained.
fn constrain(
    width: u32,
    height: u32,
    max_width: u32,
    max_height: u32,
) -> (u32, u32) {
    if width == 0 || height == 0 {
        return (width, height);
    }

    let width_ratio = if max_width > 0 && width > max_width {
        max_width as f64 / width as f64
    } else {
        1.0
    };
    let height_ratio = if max_height > 0 && height > max_height {
        max_height as f64 / height as f64
    } else {
        1.0
    };

    let ratio = width_ratio.min(height_ratio);
    if ratio >= 1.0 {
        return (width, height);
    }

    let scaled_width = ((width as f64 * ratio).round() as u32).max(1);
    let scaled_height = ((height as f64 * ratio).round() as u32).max(1);
    (scaled_width, scaled_height)
}

/// Image sizes known to the host.
#[derive(Clone, Debug)]
pub struct SizeRegistry {
    profiles: BTreeMap<String, SizeProfile>,
}

impl SizeRegistry {
    pub fn empty() -> Self {
        Self {
            profiles: BTreeMap::new(),
        }
    }

    /// Register or replace a named size.
    pub fn add_image_size(
        &mut self,
        name: impl Into<String>,
        width: u32,
        height: u32,
        crop: bool,
    ) {
        let profile = SizeProfile::new(name, width, height, crop);
        log::debug!(
            "sizes: registering {} ({}x{}, crop: {})",
            profile.name,
            profile.width,
            profile.height,
            profile.crop
        );
        self.profiles
            .insert(profile.name.clone(), profile);
    }

    pub fn add_profile(&mut self, profile: &SizeProfile) {
        self.add_image_size(
            profile.name.clone(),
            profile.width,
            profile.height,
            profile.crop,
        );
    }

    pub fn get(&self, name: &str) -> Option<&SizeProfile> {
        self.profiles.get(name)
    }

    /// Rendered dimensions of an image for the requested size.
    ///
    /// Unknown names and [`FULL_SIZE`] keep the original dimensions.
    /// Explicit pixels scale the image to fit inside them.
    pub fn dimensions(
        &self,
        size: &ImageSize,
        original_width: u32,
        original_height: u32,
    ) -> (u32, u32) {
        match size {
            ImageSize::Named(name) if name == FULL_SIZE => {
                (original_width, original_height)
            }
            ImageSize::Named(name) => match self.profiles.get(name) {
                Some(profile) => profile.fit(original_width, original_height),
                None => (original_width, original_height),
            },
            ImageSize::Dimensions(width, height) => {
                constrain(original_width, original_height, *width, *height)
            }
        }
    }
}

impl Default for SizeRegistry {
    /// The sizes every host installation starts with.
    fn default() -> Self {
        let mut registry = Self::empty();
        registry.add_image_size("thumbnail", 150, 150, true);
        registry.add_image_size("medium", 300, 300, false);
        registry.add_image_size("large", 1024, 1024, false);
        registry
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(ImageSize::named("wpbc_avatar"), 400, 300, (50, 50))]
    #[case(ImageSize::named("wpbc_avatar"), 30, 80, (30, 50))]
    #[case(ImageSize::named("medium"), 600, 300, (300, 150))]
    #[case(ImageSize::named("medium"), 200, 100, (200, 100))]
    #[case(ImageSize::named("full"), 640, 480, (640, 480))]
    #[case(ImageSize::named("unknown"), 640, 480, (640, 480))]
    #[case(ImageSize::Dimensions(64, 64), 128, 256, (32, 64))]
    #[case(ImageSize::Dimensions(0, 100), 400, 200, (200, 100))]
    fn computes_rendered_dimensions(
        #[case] size: ImageSize,
        #[case] width: u32,
        #[case] height: u32,
        #[case] expected: (u32, u32),
    ) {
        let mut registry = SizeRegistry::default();
        registry.add_image_size("wpbc_avatar", 50, 50, true);
        assert_eq!(registry.dimensions(&size, width, height), expected);
    }

    #[test]
    fn size_deserializes_from_name_or_pair() {
        let named: ImageSize = serde_json::from_str("\"wpbc_avatar\"").unwrap();
        assert_eq!(named, ImageSize::named("wpbc_avatar"));

        let pair: ImageSize = serde_json::from_str("[64, 48]").unwrap();
        assert_eq!(pair, ImageSize::Dimensions(64, 48));
        assert_eq!(pair.class_name(), "64x48");
    }

    #[test]
    fn blank_sizes_are_empty() {
        assert!(ImageSize::named(" ").is_empty());
        assert!(ImageSize::Dimensions(0, 0).is_empty());
        assert!(!ImageSize::Dimensions(0, 10).is_empty());
    }
}
