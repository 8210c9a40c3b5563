use std::collections::BTreeMap;
use std::fmt;

use crate::directive::Position;
use crate::html::escape;
use crate::size::ImageSize;

pub const AVATAR_DEFAULT_SIZE: &str = "wpbc_avatar_default_size";
pub const AVATAR_DEFAULT_IMAGE: &str = "wpbc_avatar_default_image";
pub const AVATAR_SIZE: &str = "wpbc_avatar_size";
pub const OUTPUT: &str = "wpbc_output";
pub const THE_TITLE: &str = "the_title";

/// Priority used when a callback is added without one.
pub const DEFAULT_PRIORITY: i32 = 10;

type Callback<T, C> = Box<dyn Fn(T, &C) -> T + Send + Sync>;

/// A named interception point.
///
/// Callbacks run in ascending priority; callbacks sharing a priority run in
/// the order they were added. Each one receives the value returned by the
/// previous one together with a read-only context.
pub struct Filter<T, C = ()> {
    name: &'static str,
    callbacks: BTreeMap<i32, Vec<Callback<T, C>>>,
}

impl<T, C> Filter<T, C> {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            callbacks: BTreeMap::new(),
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn add<F>(&mut self, callback: F)
    where
        F: Fn(T, &C) -> T + Send + Sync + 'static,
    {
        self.add_with_priority(DEFAULT_PRIORITY, callback);
    }

    pub fn add_with_priority<F>(&mut self, priority: i32, callback: F)
    where
        F: Fn(T, &C) -> T + Send + Sync + 'static,
    {
        log::debug!("hooks: {} gets a callback at {}", self.name, priority);
        self.callbacks
            .entry(priority)
            .or_default()
            .push(Box::new(callback));
    }

    /// Drop every callback, including the built-in ones.
    pub fn clear(&mut self) {
        self.callbacks.clear();
    }

    pub fn len(&self) -> usize {
        self.callbacks.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn apply(&self, value: T, context: &C) -> T {
        self.callbacks
            .values()
            .flatten()
            .fold(value, |value, callback| callback(value, context))
    }
}

impl<T> Filter<T, ()> {
    pub fn filter(&self, value: T) -> T {
        self.apply(value, &())
    }
}

impl<T, C> fmt::Debug for Filter<T, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Filter")
            .field("name", &self.name)
            .field("callbacks", &self.len())
            .finish()
    }
}

/// What the output hook gets to see besides the composed fragment.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OutputContext {
    pub position: Position,
    pub avatar_img: String,
    /// Display name as written in the directive, before formatting.
    pub name: String,
    /// Enclosed content as written in the directive, before rendering.
    pub content: String,
}

/// Every extension point of the bubble pipeline.
#[derive(Debug)]
pub struct Hooks {
    /// Size used by the resolver when the caller asks for none.
    pub avatar_default_size: Filter<ImageSize>,
    /// Tag rendered whenever no avatar can be resolved.
    pub avatar_default_image: Filter<String>,
    /// Size the renderer asks the resolver for.
    pub avatar_size: Filter<ImageSize>,
    /// Display-name formatting.
    pub the_title: Filter<String>,
    /// Post-processing of the final fragment.
    pub output: Filter<String, OutputContext>,
}

impl Hooks {
    /// Hooks with no callbacks at all, not even the title formatting.
    pub fn bare() -> Self {
        Self {
            avatar_default_size: Filter::new(AVATAR_DEFAULT_SIZE),
            avatar_default_image: Filter::new(AVATAR_DEFAULT_IMAGE),
            avatar_size: Filter::new(AVATAR_SIZE),
            the_title: Filter::new(THE_TITLE),
            output: Filter::new(OUTPUT),
        }
    }
}

impl Default for Hooks {
    fn default() -> Self {
        let mut hooks = Self::bare();
        hooks
            .the_title
            .add(|title, _| format_title(&title));
        hooks
    }
}

/// Standard title pass: surrounding whitespace goes, markup is escaped.
pub fn format_title(title: &str) -> String {
    escape(title.trim())
}
