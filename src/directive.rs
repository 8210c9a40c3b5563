use std::fmt;

use crate::id::AvatarId;
use crate::shortcode::Attributes;

const ICON_ATTR: &str = "icon";
const NAME_ATTR: &str = "name";
const POS_ATTR: &str = "pos";

const DEFAULT_ICON: &str = "0";
const DEFAULT_NAME: &str = "";
const DEFAULT_POS: &str = "l";

/// Side of the page the avatar sits on.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Position {
    #[default]
    Left,
    Right,
}

impl Position {
    /// Anything but `r` is left.
    pub fn from_attr(raw: &str) -> Self {
        if raw.trim().eq_ignore_ascii_case("r") {
            Position::Right
        } else {
            Position::Left
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Position::Left => "l",
            Position::Right => "r",
        }
    }

    pub fn css_class(&self) -> &'static str {
        match self {
            Position::Left => "wpbc-pos-l",
            Position::Right => "wpbc-pos-r",
        }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One `[chat]` occurrence with its defaults filled in.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct BubbleDirective {
    pub icon_id: AvatarId,
    pub name: String,
    pub position: Position,
    pub content: Option<String>,
}

impl BubbleDirective {
    /// Build a directive from parsed attributes. Never fails: missing,
    /// malformed and unknown attributes all fall back to the defaults.
    pub fn parse(attributes: &Attributes, content: Option<&str>) -> Self {
        let icon = attributes
            .get(ICON_ATTR)
            .unwrap_or(DEFAULT_ICON);
        let name = attributes
            .get(NAME_ATTR)
            .unwrap_or(DEFAULT_NAME);
        let pos = attributes
            .get(POS_ATTR)
            .unwrap_or(DEFAULT_POS);

        Self {
            icon_id: AvatarId::from_attr(icon),
            name: name.to_owned(),
            position: Position::from_attr(pos),
            content: content.map(str::to_owned),
        }
    }
}
