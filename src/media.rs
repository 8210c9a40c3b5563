use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use url::Url;

use crate::html::escape;
use crate::id::AttachmentId;
use crate::size::{ImageSize, SizeRegistry};

/// An uploaded image as the media library knows it.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct Attachment {
    pub id: AttachmentId,
    pub url: Url,
    pub width: u32,
    pub height: u32,
    #[serde(default)]
    pub alt: String,
}

/// An image resolved for a particular size.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ImageSrc {
    pub url: Url,
    pub width: u32,
    pub height: u32,
}

/// Access to uploaded images, provided by the host.
pub trait MediaLibrary {
    fn attachment(&self, id: AttachmentId) -> Option<Attachment>;

    fn sizes(&self) -> &SizeRegistry;

    /// URL and dimensions of the image rendered at `size`.
    fn image_src(
        &self,
        id: AttachmentId,
        size: &ImageSize,
    ) -> Option<ImageSrc> {
        let attachment = self.attachment(id)?;
        let (width, height) =
            self.sizes()
                .dimensions(size, attachment.width, attachment.height);

        let url = if (width, height) == (attachment.width, attachment.height) {
            attachment.url
        } else {
            sized_url(&attachment.url, width, height)
        };
        Some(ImageSrc { url, width, height })
    }

    /// A complete `<img>` tag, or `None` when the image cannot be found.
    fn image_tag(&self, id: AttachmentId, size: &ImageSize) -> Option<String> {
        let attachment = self.attachment(id)?;
        let src = self.image_src(id, size)?;
        let class = crate::html::sanitize_class(&size.class_name());
        Some(format!(
            "<img width=\"{}\" height=\"{}\" src=\"{}\" class=\"attachment-{} size-{}\" alt=\"{}\" />",
            src.width,
            src.height,
            escape(src.url.as_str()),
            class,
            class,
            escape(&attachment.alt)
        ))
    }
}

/// URL of a resized copy: `photo.jpg` becomes `photo-50x50.jpg`.
fn sized_url(url: &Url, width: u32, height: u32) -> Url {
    let mut sized = url.clone();
    let path = url.path();
    let (dir, file) = match path.rfind('/') {
        Some(slash) => path.split_at(slash + 1),
        None => ("", path),
    };
    let file = match file.rfind('.') {
        Some(dot) if dot > 0 => {
            format!("{}-{}x{}{}", &file[..dot], width, height, &file[dot..])
        }
        _ => format!("{}-{}x{}", file, width, height),
    };
    sized.set_path(&format!("{}{}", dir, file));
    sized
}

/// Images kept in memory, resized according to a [`SizeRegistry`].
#[derive(Clone, Debug, Default)]
pub struct MemoryMediaLibrary {
    attachments: BTreeMap<AttachmentId, Attachment>,
    sizes: SizeRegistry,
}

impl MemoryMediaLibrary {
    pub fn new(sizes: SizeRegistry) -> Self {
        Self {
            attachments: BTreeMap::new(),
            sizes,
        }
    }

    pub fn insert(&mut self, attachment: Attachment) {
        self.attachments
            .insert(attachment.id, attachment);
    }

    pub fn remove(&mut self, id: AttachmentId) -> Option<Attachment> {
        self.attachments.remove(&id)
    }

    pub fn sizes_mut(&mut self) -> &mut SizeRegistry {
        &mut self.sizes
    }
}

impl MediaLibrary for MemoryMediaLibrary {
    fn attachment(&self, id: AttachmentId) -> Option<Attachment> {
        self.attachments.get(&id).cloned()
    }

    fn sizes(&self) -> &SizeRegistry {
        &self.sizes
    }
}
