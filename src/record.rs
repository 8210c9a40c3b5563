use serde::{Deserialize, Serialize};

use crate::id::{AttachmentId, AvatarId};

/// Lifecycle flag of an avatar record, as the host stores it.
#[derive(Eq, PartialEq, Clone, Copy, Debug, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PostStatus {
    Publish,
    #[default]
    Draft,
    Pending,
    Private,
    Trash,
}

impl PostStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PostStatus::Publish => "publish",
            PostStatus::Draft => "draft",
            PostStatus::Pending => "pending",
            PostStatus::Private => "private",
            PostStatus::Trash => "trash",
        }
    }
}

#[derive(Eq, PartialEq, Clone, Debug, Deserialize, Serialize)]
pub struct AvatarRecord {
    pub id: AvatarId,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_ref: Option<AttachmentId>,
    #[serde(default)]
    pub status: PostStatus,
}

impl AvatarRecord {
    pub fn new(
        id: AvatarId,
        title: impl Into<String>,
        status: PostStatus,
    ) -> Self {
        Self {
            id,
            title: title.into(),
            image_ref: None,
            status,
        }
    }

    pub fn is_published(&self) -> bool {
        self.status == PostStatus::Publish
    }

    /// The image to render, if this record may show one at all.
    pub fn renderable_image(&self) -> Option<AttachmentId> {
        if !self.is_published() {
            return None;
        }
        self.image_ref
    }
}
