use crate::admin::{self, AdminView, RequestGuard, SaveOutcome, SaveRequest};
use crate::directive::BubbleDirective;
use crate::hooks::Hooks;
use crate::id::AvatarId;
use crate::media::{MediaLibrary, MemoryMediaLibrary};
use crate::render::BubbleRenderer;
use crate::resolver::ImageResolver;
use crate::settings::Settings;
use crate::shortcode::{Attributes, ContentRenderer, Shortcodes};
use crate::size::{ImageSize, SizeRegistry};
use crate::storage::{MemoryRecordStore, RecordStore};
use crate::Result;

/// Everything the host wires together: settings, hooks, the avatar store
/// and the media library.
pub struct BubbleChat<S, M> {
    settings: Settings,
    hooks: Hooks,
    store: S,
    media: M,
}

impl BubbleChat<MemoryRecordStore, MemoryMediaLibrary> {
    /// Self-contained setup with in-memory collaborators and the avatar
    /// size already registered.
    pub fn in_memory(settings: Settings) -> Self {
        let mut sizes = SizeRegistry::default();
        sizes.add_profile(&settings.avatar_size);
        Self::new(
            settings,
            MemoryRecordStore::new(),
            MemoryMediaLibrary::new(sizes),
        )
    }
}

impl<S, M> BubbleChat<S, M>
where
    S: RecordStore,
    M: MediaLibrary,
{
    pub fn new(settings: Settings, store: S, media: M) -> Self {
        Self {
            settings,
            hooks: Hooks::default(),
            store,
            media,
        }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn hooks(&self) -> &Hooks {
        &self.hooks
    }

    pub fn hooks_mut(&mut self) -> &mut Hooks {
        &mut self.hooks
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    pub fn media(&self) -> &M {
        &self.media
    }

    pub fn media_mut(&mut self) -> &mut M {
        &mut self.media
    }

    /// Make the avatar size known to the host's image sizes.
    pub fn register_image_size(&self, sizes: &mut SizeRegistry) {
        sizes.add_profile(&self.settings.avatar_size);
    }

    /// Hook the bubble into the host's content pass under the configured
    /// tag.
    pub fn register_shortcode<'a>(&'a self, shortcodes: &mut Shortcodes<'a>) {
        shortcodes.add(
            &self.settings.shortcode_tag,
            move |attributes, content, host| {
                self.handle_shortcode(attributes, content, host)
            },
        );
    }

    pub fn resolver(&self) -> ImageResolver<'_> {
        ImageResolver::new(
            &self.store,
            &self.media,
            &self.hooks,
            &self.settings,
        )
    }

    pub fn avatar_image(
        &self,
        id: AvatarId,
        size: Option<&ImageSize>,
    ) -> String {
        self.resolver().resolve(id, size)
    }

    pub fn render(
        &self,
        directive: &BubbleDirective,
        host: &dyn ContentRenderer,
    ) -> String {
        BubbleRenderer::new(self.resolver(), &self.hooks, &self.settings)
            .render(directive, host)
    }

    pub fn handle_shortcode(
        &self,
        attributes: &Attributes,
        content: Option<&str>,
        host: &dyn ContentRenderer,
    ) -> String {
        let directive = BubbleDirective::parse(attributes, content);
        self.render(&directive, host)
    }

    pub fn save_post(
        &mut self,
        guard: &dyn RequestGuard,
        request: &SaveRequest,
    ) -> Result<SaveOutcome> {
        admin::save_post(&mut self.store, guard, &self.settings, request)
    }

    pub fn admin(&self) -> AdminView<'_> {
        AdminView::new(
            &self.store,
            &self.media,
            self.resolver(),
            &self.settings,
        )
    }
}
