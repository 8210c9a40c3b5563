//! Editor-facing side of chat avatars: the save path of the avatar image
//! field and the markup the host shows around it.
use crate::html::{escape, sanitize_class_list};
use crate::id::{AttachmentId, AvatarId};
use crate::media::MediaLibrary;
use crate::record::AvatarRecord;
use crate::resolver::ImageResolver;
use crate::settings::Settings;
use crate::size::ImageSize;
use crate::storage::RecordStore;
use crate::Result;

pub const NONCE_ACTION: &str = "wpbc_save_meta_box_data";
pub const NONCE_FIELD: &str = "wpbc_meta_box_nonce";

pub const AVATAR_COLUMN: &str = "avatar";
pub const SHORTCODE_COLUMN: &str = "bubble_chat_code";

const THUMBNAIL_SIZE: &str = "thumbnail";

/// Anti-forgery and permission checks, provided by the host.
pub trait RequestGuard {
    fn verify_nonce(&self, nonce: &str, action: &str) -> bool;

    fn can_edit(&self, id: AvatarId) -> bool;

    /// Hidden form field carrying a fresh nonce for `action`.
    fn nonce_field(&self, action: &str, name: &str) -> String;
}

/// The avatar form as submitted by the editor.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SaveRequest {
    pub post_id: AvatarId,
    pub post_type: Option<String>,
    pub nonce: Option<String>,
    /// Raw value of the hidden image field, if it was sent at all.
    pub image_field: Option<String>,
    pub autosave: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SkipReason {
    MissingNonce,
    InvalidNonce,
    Autosave,
    Forbidden,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SaveOutcome {
    /// A check failed; nothing was written.
    Skipped(SkipReason),
    Stored(AttachmentId),
    Cleared,
}

/// Persist the image field of a submitted avatar form.
///
/// Checks run before any write, so a rejected request never leaves a
/// partial update behind. A blank, zero or non-numeric value clears the
/// field.
pub fn save_post(
    store: &mut dyn RecordStore,
    guard: &dyn RequestGuard,
    settings: &Settings,
    request: &SaveRequest,
) -> Result<SaveOutcome> {
    let nonce = match request.nonce.as_deref() {
        Some(nonce) => nonce,
        None => return Ok(skip(request, SkipReason::MissingNonce)),
    };
    if !guard.verify_nonce(nonce, NONCE_ACTION) {
        return Ok(skip(request, SkipReason::InvalidNonce));
    }
    if request.autosave {
        return Ok(skip(request, SkipReason::Autosave));
    }
    if request.post_type.as_deref() == Some(settings.post_type.as_str())
        && !guard.can_edit(request.post_id)
    {
        return Ok(skip(request, SkipReason::Forbidden));
    }

    let image = request
        .image_field
        .as_deref()
        .and_then(AttachmentId::sanitize);
    match image {
        Some(image) => {
            store.set_image_ref(request.post_id, image)?;
            log::info!(
                "admin: avatar {} now uses image {}",
                request.post_id,
                image
            );
            Ok(SaveOutcome::Stored(image))
        }
        None => {
            store.clear_image_ref(request.post_id)?;
            log::info!("admin: avatar {} has no image", request.post_id);
            Ok(SaveOutcome::Cleared)
        }
    }
}

fn skip(request: &SaveRequest, reason: SkipReason) -> SaveOutcome {
    log::debug!("admin: not saving avatar {}: {:?}", request.post_id, reason);
    SaveOutcome::Skipped(reason)
}

/// Insert the avatar column before `title` and the directive column
/// before `date`.
pub fn posts_columns(columns: Vec<(String, String)>) -> Vec<(String, String)> {
    let mut new_columns = Vec::with_capacity(columns.len() + 2);
    for (name, label) in columns {
        if name == "title" {
            new_columns.push((AVATAR_COLUMN.to_owned(), "Avatar".to_owned()));
        } else if name == "date" {
            new_columns
                .push((SHORTCODE_COLUMN.to_owned(), "Shortcode".to_owned()));
        }
        new_columns.push((name, label));
    }
    new_columns
}

/// Read-only admin markup for avatar records.
pub struct AdminView<'a> {
    store: &'a dyn RecordStore,
    media: &'a dyn MediaLibrary,
    resolver: ImageResolver<'a>,
    settings: &'a Settings,
}

impl<'a> AdminView<'a> {
    pub fn new(
        store: &'a dyn RecordStore,
        media: &'a dyn MediaLibrary,
        resolver: ImageResolver<'a>,
        settings: &'a Settings,
    ) -> Self {
        Self {
            store,
            media,
            resolver,
            settings,
        }
    }

    /// Cell content of one of the added list columns.
    pub fn column_html(&self, column: &str, id: AvatarId) -> Option<String> {
        match column {
            AVATAR_COLUMN => Some(
                self.resolver
                    .resolve(id, Some(&self.settings.avatar_size_name())),
            ),
            SHORTCODE_COLUMN => self.shortcode_snippet(id),
            _ => None,
        }
    }

    /// A directive editors can copy into their content.
    pub fn shortcode_snippet(&self, id: AvatarId) -> Option<String> {
        if id.is_none() {
            return None;
        }
        let record = match self.store.get(id) {
            Ok(Some(record)) => record,
            Ok(None) => return None,
            Err(e) => {
                log::warn!("admin: failed to load avatar {}: {}", id, e);
                return None;
            }
        };
        Some(format!(
            "<code>[{} icon=\"{}\" name=\"{}\" pos=\"l|r\"]Chat text.[/{}]</code>",
            self.settings.shortcode_tag,
            record.id,
            escape(&record.title),
            self.settings.shortcode_tag
        ))
    }

    /// The snippet shown under the title field, for avatar records only.
    pub fn edit_form_after_title(
        &self,
        post_type: &str,
        id: AvatarId,
    ) -> Option<String> {
        if post_type != self.settings.post_type {
            return None;
        }
        self.shortcode_snippet(id)
    }

    /// The avatar image box of the edit screen.
    pub fn meta_box_html(
        &self,
        record: &AvatarRecord,
        guard: &dyn RequestGuard,
    ) -> String {
        let value = record
            .image_ref
            .map(|image| image.to_string())
            .unwrap_or_default();
        let thumbnail = record.image_ref.and_then(|image| {
            self.media
                .image_src(image, &ImageSize::named(THUMBNAIL_SIZE))
        });

        let (image_class, image_item, display) = match thumbnail {
            Some(src) => (
                "wpbc_upload_image_button",
                format!(
                    "<img src=\"{}\" style=\"max-width:95%;display:block;\" />",
                    escape(src.url.as_str())
                ),
                "inline-block",
            ),
            None => (
                "wpbc_upload_image_button button",
                "Upload image".to_owned(),
                "none",
            ),
        };

        let meta_key = escape(&self.settings.meta_key);
        let mut html = guard.nonce_field(NONCE_ACTION, NONCE_FIELD);
        html.push_str("\n<div>\n");
        html.push_str(&format!(
            "\t<a href=\"#\" class=\"{}\">{}</a>\n",
            sanitize_class_list(image_class),
            image_item
        ));
        html.push_str(&format!(
            "\t<input type=\"hidden\" name=\"{}\" id=\"{}\" value=\"{}\" />\n",
            meta_key,
            meta_key,
            escape(&value)
        ));
        html.push_str(&format!(
            "\t<a href=\"#\" class=\"wpbc_remove_image_button\" style=\"display:inline-block;display:{}\">Remove avatar image</a>\n",
            display
        ));
        html.push_str("</div>");
        html
    }
}
