use crate::hooks::Hooks;
use crate::id::AvatarId;
use crate::media::MediaLibrary;
use crate::settings::Settings;
use crate::size::ImageSize;
use crate::storage::RecordStore;

/// Turns an avatar id into an `<img>` tag.
///
/// Resolution never fails: whatever stands in the way of a real image
/// (no id, unknown or unpublished record, no image set, image gone from
/// the media library, store errors) yields the placeholder tag.
pub struct ImageResolver<'a> {
    store: &'a dyn RecordStore,
    media: &'a dyn MediaLibrary,
    hooks: &'a Hooks,
    settings: &'a Settings,
}

impl<'a> ImageResolver<'a> {
    pub fn new(
        store: &'a dyn RecordStore,
        media: &'a dyn MediaLibrary,
        hooks: &'a Hooks,
        settings: &'a Settings,
    ) -> Self {
        Self {
            store,
            media,
            hooks,
            settings,
        }
    }

    /// The tag for `icon_id` at `size`, or at the default avatar size when
    /// no size (or a blank one) is given.
    pub fn resolve(
        &self,
        icon_id: AvatarId,
        size: Option<&ImageSize>,
    ) -> String {
        let size = match size {
            Some(size) if !size.is_empty() => size.clone(),
            _ => self
                .hooks
                .avatar_default_size
                .filter(self.settings.avatar_size_name()),
        };

        match self.lookup(icon_id, &size) {
            Some(tag) => tag,
            None => self.placeholder(),
        }
    }

    pub fn placeholder(&self) -> String {
        self.hooks
            .avatar_default_image
            .filter(self.settings.placeholder_tag())
    }

    fn lookup(&self, icon_id: AvatarId, size: &ImageSize) -> Option<String> {
        if icon_id.is_none() {
            return None;
        }

        let record = match self.store.get(icon_id) {
            Ok(Some(record)) => record,
            Ok(None) => {
                log::debug!("resolver: avatar {} does not exist", icon_id);
                return None;
            }
            Err(e) => {
                log::warn!(
                    "resolver: failed to load avatar {}: {}",
                    icon_id,
                    e
                );
                return None;
            }
        };

        let image = match record.renderable_image() {
            Some(image) => image,
            None => {
                log::debug!(
                    "resolver: avatar {} is {} and has image {:?}",
                    icon_id,
                    record.status.as_str(),
                    record.image_ref
                );
                return None;
            }
        };

        match self.media.image_tag(image, size) {
            Some(tag) if !tag.trim().is_empty() => Some(tag),
            _ => {
                log::debug!(
                    "resolver: image {} of avatar {} renders nothing at {}",
                    image,
                    icon_id,
                    size
                );
                None
            }
        }
    }
}
