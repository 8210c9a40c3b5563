use crate::directive::BubbleDirective;
use crate::hooks::{Hooks, OutputContext};
use crate::resolver::ImageResolver;
use crate::settings::Settings;
use crate::shortcode::ContentRenderer;

/// Composes the bubble fragment for one directive.
pub struct BubbleRenderer<'a> {
    resolver: ImageResolver<'a>,
    hooks: &'a Hooks,
    settings: &'a Settings,
}

impl<'a> BubbleRenderer<'a> {
    pub fn new(
        resolver: ImageResolver<'a>,
        hooks: &'a Hooks,
        settings: &'a Settings,
    ) -> Self {
        Self {
            resolver,
            hooks,
            settings,
        }
    }

    /// Render `directive`. Enclosed content is handed to `host` rather than
    /// expanded here, so directives nested in it are the host's business.
    pub fn render(
        &self,
        directive: &BubbleDirective,
        host: &dyn ContentRenderer,
    ) -> String {
        let size = self
            .hooks
            .avatar_size
            .filter(self.settings.avatar_size_name());
        let avatar_img = self
            .resolver
            .resolve(directive.icon_id, Some(&size));
        let avatar_name = self
            .hooks
            .the_title
            .filter(directive.name.clone());

        let raw_content = directive
            .content
            .as_deref()
            .unwrap_or_default();
        let content = host.render_content(raw_content);

        let mut html = String::new();
        html.push_str(&format!(
            "<div class=\"wpbc-outer {}\">\n",
            directive.position.css_class()
        ));
        html.push_str("<div class=\"wpbc-avatar\">\n");
        html.push_str(&format!(
            "<div class=\"wpbc-avatar-image\">{}</div>\n",
            avatar_img
        ));
        html.push_str(&format!(
            "<div class=\"wpbc-avatar-name\">{}</div>\n",
            avatar_name
        ));
        html.push_str("</div>\n");
        html.push_str(&format!(
            "<div class=\"wpbc-avatar-text\"><div class=\"wpbc-avatar-text-inner\">{}</div></div>\n",
            content
        ));
        html.push_str("</div><!-- //.wpbc-outer -->\n");

        let context = OutputContext {
            position: directive.position,
            avatar_img,
            name: directive.name.clone(),
            content: raw_content.to_owned(),
        };
        self.hooks.output.apply(html, &context)
    }
}
