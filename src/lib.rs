//! Chat bubbles for page content.
//!
//! Editors keep a list of chat avatars (a title plus an optional image) and
//! write `[chat icon="7" name="Bot" pos="r"]Hello[/chat]` in their pages.
//! The content pass replaces every such directive with a bubble: the avatar
//! image, the name and the enclosed text.
//!
//! ```
//! use bubble_chat::{BubbleChat, ContentRenderer, Settings, Shortcodes};
//!
//! let chat = BubbleChat::in_memory(Settings::default());
//! let mut shortcodes = Shortcodes::new();
//! chat.register_shortcode(&mut shortcodes);
//!
//! let html = shortcodes.render_content(r#"[chat name="Bot"]Hello[/chat]"#);
//! assert!(html.contains("wpbc-pos-l"));
//! assert!(html.contains(">Hello</div>"));
//! ```

pub mod admin;
pub mod directive;
mod errors;
pub mod hooks;
pub mod html;
pub mod id;
pub mod media;
mod plugin;
pub mod record;
pub mod render;
pub mod resolver;
pub mod settings;
pub mod shortcode;
pub mod size;
pub mod storage;

pub use errors::{BubbleChatError, Result};
pub use plugin::BubbleChat;

pub use directive::{BubbleDirective, Position};
pub use hooks::{Filter, Hooks, OutputContext};
pub use id::{AttachmentId, AvatarId};
pub use media::{Attachment, MediaLibrary, MemoryMediaLibrary};
pub use record::{AvatarRecord, PostStatus};
pub use settings::Settings;
pub use shortcode::{Attributes, ContentRenderer, PlainText, Shortcodes};
pub use size::{ImageSize, SizeProfile, SizeRegistry};
pub use storage::{FileRecordStore, MemoryRecordStore, RecordStore};

/// Host content type of chat avatars.
pub const POST_TYPE: &str = "wp_bubble_chat";
/// Record field holding the avatar image.
pub const META_KEY: &str = "wpbc_avatar_img";
/// Image size every avatar is rendered at.
pub const AVATAR_SIZE_NAME: &str = "wpbc_avatar";
pub const SHORTCODE_TAG: &str = "chat";

#[cfg(test)]
pub(crate) fn initialize() {
    use std::sync::Once;
    static INIT: Once = Once::new();

    INIT.call_once(|| {
        let _ = env_logger::builder()
            .is_test(true)
            .try_init();
        log::info!("Initializing bubble-chat tests");
    });
}
