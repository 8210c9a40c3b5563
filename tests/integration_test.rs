use bubble_chat::admin::{RequestGuard, SaveOutcome, SaveRequest};
use bubble_chat::{
    Attachment, AttachmentId, AvatarId, BubbleChat, ContentRenderer,
    FileRecordStore, MediaLibrary, MemoryMediaLibrary, MemoryRecordStore,
    PostStatus, RecordStore, Settings, Shortcodes, SizeRegistry,
};
use rstest::rstest;
use tempdir::TempDir;
use url::Url;

struct AllowAll;

impl RequestGuard for AllowAll {
    fn verify_nonce(&self, nonce: &str, _: &str) -> bool {
        nonce == "valid"
    }

    fn can_edit(&self, _: AvatarId) -> bool {
        true
    }

    fn nonce_field(&self, _: &str, name: &str) -> String {
        format!("<input type=\"hidden\" name=\"{}\" value=\"valid\" />", name)
    }
}

fn save_request(id: AvatarId, field: Option<&str>) -> SaveRequest {
    SaveRequest {
        post_id: id,
        post_type: Some(bubble_chat::POST_TYPE.to_owned()),
        nonce: Some("valid".to_owned()),
        image_field: field.map(str::to_owned),
        autosave: false,
    }
}

fn bot_image() -> Attachment {
    Attachment {
        id: AttachmentId(42),
        url: Url::parse("https://example.com/uploads/bot.png").unwrap(),
        width: 200,
        height: 200,
        alt: "Bot".to_owned(),
    }
}

type MemoryChat = BubbleChat<MemoryRecordStore, MemoryMediaLibrary>;

/// A chat with avatar 1 published and showing image 42.
fn chat_with_bot() -> MemoryChat {
    let mut chat = BubbleChat::in_memory(Settings::default());
    chat.media_mut().insert(bot_image());
    let id = chat
        .store_mut()
        .create("Bot", PostStatus::Publish)
        .unwrap()
        .id;
    chat.save_post(&AllowAll, &save_request(id, Some("42")))
        .unwrap();
    chat
}

fn expand(chat: &MemoryChat, text: &str) -> String {
    let mut shortcodes = Shortcodes::new();
    chat.register_shortcode(&mut shortcodes);
    shortcodes.render_content(text)
}

#[test]
fn empty_icon_renders_the_placeholder() {
    let chat = BubbleChat::in_memory(Settings::default());
    let html = expand(&chat, "[chat icon=\"0\" name=\"Bot\"]Hello[/chat]");

    let expected = format!(
        "<div class=\"wpbc-outer wpbc-pos-l\">\n\
         <div class=\"wpbc-avatar\">\n\
         <div class=\"wpbc-avatar-image\">{}</div>\n\
         <div class=\"wpbc-avatar-name\">Bot</div>\n\
         </div>\n\
         <div class=\"wpbc-avatar-text\"><div class=\"wpbc-avatar-text-inner\">Hello</div></div>\n\
         </div><!-- //.wpbc-outer -->\n",
        chat.settings().placeholder_tag()
    );
    assert_eq!(html, expected);
    assert!(html.contains("images/no-image.png"));
}

#[test]
fn published_avatar_renders_its_image() {
    let chat = chat_with_bot();
    let html = expand(&chat, "[chat icon=\"1\" foo=\"bar\"]Hi[/chat]");

    let image = chat
        .media()
        .image_tag(AttachmentId(42), &chat.settings().avatar_size_name())
        .unwrap();
    assert!(image.contains("bot-50x50.png"));
    assert!(html.contains(&format!(
        "<div class=\"wpbc-avatar-image\">{}</div>",
        image
    )));
    assert!(html.contains("<div class=\"wpbc-avatar-name\"></div>"));
    assert!(html.starts_with("<div class=\"wpbc-outer wpbc-pos-l\">"));
    assert!(!html.contains("foo"));
}

#[rstest]
#[case("pos=\"r\"", "wpbc-pos-r")]
#[case("pos=\"R \"", "wpbc-pos-r")]
#[case("pos=\"l\"", "wpbc-pos-l")]
#[case("pos=\"right\"", "wpbc-pos-l")]
#[case("", "wpbc-pos-l")]
fn position_picks_the_side(#[case] attribute: &str, #[case] class: &str) {
    let chat = BubbleChat::in_memory(Settings::default());
    let html = expand(&chat, &format!("[chat {}]Hi[/chat]", attribute));
    assert!(
        html.starts_with(&format!("<div class=\"wpbc-outer {}\">", class)),
        "{}",
        html
    );
}

#[test]
fn rendering_is_deterministic() {
    let chat = chat_with_bot();
    let text = "Intro [chat icon=1 name=Bot pos=r]Hello[/chat] outro";
    assert_eq!(expand(&chat, text), expand(&chat, text));
}

#[test]
fn nested_directives_are_expanded_by_the_host() {
    let chat = chat_with_bot();
    let html = expand(
        &chat,
        "[chat name=\"Outer\"]before [chat name=\"Inner\" pos=\"r\"]deep[/chat][/chat]",
    );

    assert_eq!(html.matches("<div class=\"wpbc-outer ").count(), 2);
    assert!(html.contains("<div class=\"wpbc-avatar-name\">Outer</div>"));
    assert!(html.contains("<div class=\"wpbc-avatar-name\">Inner</div>"));
    assert!(html.contains("wpbc-pos-r"));
    assert!(html.contains("deep"));
}

#[test]
fn save_path_stores_and_clears_through_the_plugin() {
    let mut chat = chat_with_bot();
    let id = AvatarId(1);
    assert_eq!(
        chat.store().get(id).unwrap().unwrap().image_ref,
        Some(AttachmentId(42))
    );

    let outcome = chat
        .save_post(&AllowAll, &save_request(id, Some("")))
        .unwrap();
    assert_eq!(outcome, SaveOutcome::Cleared);
    assert_eq!(chat.store().get(id).unwrap().unwrap().image_ref, None);

    let html = expand(&chat, "[chat icon=\"1\"]Hi[/chat]");
    assert!(html.contains(&chat.settings().placeholder_tag()));
}

#[test]
fn save_path_persists_to_disk() {
    let dir = TempDir::new("bubble_chat_integration").unwrap();
    let path = dir.path().join("avatars.json");
    let settings = Settings::default();

    let mut sizes = SizeRegistry::default();
    sizes.add_profile(&settings.avatar_size);
    let mut media = MemoryMediaLibrary::new(sizes);
    media.insert(bot_image());

    let mut store =
        FileRecordStore::open("avatars".to_owned(), &path).unwrap();
    let id = store
        .create("Bot", PostStatus::Publish)
        .unwrap()
        .id;
    let mut chat = BubbleChat::new(settings.clone(), store, media.clone());
    chat.save_post(&AllowAll, &save_request(id, Some("42")))
        .unwrap();

    let reopened =
        FileRecordStore::open("avatars".to_owned(), &path).unwrap();
    assert_eq!(
        reopened.get(id).unwrap().unwrap().image_ref,
        Some(AttachmentId(42))
    );
    let mut chat = BubbleChat::new(settings, reopened, media);
    assert!(chat
        .avatar_image(id, None)
        .contains("bot-50x50.png"));

    chat.save_post(&AllowAll, &save_request(id, None))
        .unwrap();
    let reopened =
        FileRecordStore::open("avatars".to_owned(), &path).unwrap();
    assert_eq!(reopened.get(id).unwrap().unwrap().image_ref, None);
}

#[test]
fn admin_snippet_round_trips_into_a_bubble() {
    let chat = chat_with_bot();
    let snippet = chat
        .admin()
        .shortcode_snippet(AvatarId(1))
        .unwrap();
    let directive = snippet
        .trim_start_matches("<code>")
        .trim_end_matches("</code>")
        .replace("l|r", "r");

    let html = expand(&chat, &directive);
    assert!(html.contains("bot-50x50.png"));
    assert!(html.contains("<div class=\"wpbc-avatar-name\">Bot</div>"));
    assert!(html.contains("Chat text."));
}
