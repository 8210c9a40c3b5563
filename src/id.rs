use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::BubbleChatError;

/// Identifier of a chat avatar record.
///
/// Zero is never assigned by a store and stands for "no avatar".
#[derive(
    Eq,
    PartialEq,
    Ord,
    PartialOrd,
    Hash,
    Clone,
    Copy,
    Debug,
    Default,
    Deserialize,
    Serialize,
)]
#[serde(transparent)]
pub struct AvatarId(pub u64);

/// Identifier of an uploaded image in the host's media library.
#[derive(
    Eq, PartialEq, Ord, PartialOrd, Hash, Clone, Copy, Debug, Deserialize,
    Serialize,
)]
#[serde(transparent)]
pub struct AttachmentId(pub u64);

impl AvatarId {
    pub const NONE: AvatarId = AvatarId(0);

    /// Coerce a directive attribute into an id.
    ///
    /// Leading digits win (`"12abc"` is 12); anything that does not start
    /// with a non-negative number is 0. A number too large for `i64` is
    /// treated as "no avatar" too.
    pub fn from_attr(raw: &str) -> Self {
        match int_cast(raw) {
            Some(value) if value > 0 => AvatarId(value as u64),
            _ => AvatarId::NONE,
        }
    }

    pub fn is_none(&self) -> bool {
        self.0 == 0
    }
}

impl AttachmentId {
    /// Sanitize a submitted form value to a non-negative id.
    ///
    /// Negative numbers are folded to their absolute value, blank or
    /// non-numeric input yields `None`, as does zero.
    pub fn sanitize(raw: &str) -> Option<Self> {
        let value = int_cast(raw)?.unsigned_abs();
        if value == 0 {
            return None;
        }
        Some(AttachmentId(value))
    }
}

/// Integer cast of a loosely formatted string.
///
/// Skips leading whitespace, accepts one optional sign and then as many
/// digits as follow. Returns `None` when no digit is found or the number
/// does not fit into `i64`.
pub(crate) fn int_cast(raw: &str) -> Option<i64> {
    let trimmed = raw.trim_start();
    let (negative, rest) = match trimmed.as_bytes().first() {
        Some(b'-') => (true, &trimmed[1..]),
        Some(b'+') => (false, &trimmed[1..]),
        _ => (false, trimmed),
    };

    let digits = rest
        .bytes()
        .take_while(|b| b.is_ascii_digit())
        .count();
    if digits == 0 {
        return None;
    }

    let magnitude: i64 = rest[..digits].parse().ok()?;
    if negative {
        Some(-magnitude)
    } else {
        Some(magnitude)
    }
}

impl fmt::Display for AvatarId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Display for AttachmentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for AvatarId {
    type Err = BubbleChatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value = s
            .trim()
            .parse::<u64>()
            .map_err(|_| BubbleChatError::Parse)?;
        Ok(AvatarId(value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("7", AvatarId(7))]
    #[case("  42", AvatarId(42))]
    #[case("+3", AvatarId(3))]
    #[case("12abc", AvatarId(12))]
    #[case("0", AvatarId::NONE)]
    #[case("", AvatarId::NONE)]
    #[case("abc", AvatarId::NONE)]
    #[case("-5", AvatarId::NONE)]
    #[case("99999999999999999999", AvatarId::NONE)]
    fn coerces_directive_attribute(
        #[case] raw: &str,
        #[case] expected: AvatarId,
    ) {
        assert_eq!(AvatarId::from_attr(raw), expected);
    }

    #[rstest]
    #[case("42", Some(AttachmentId(42)))]
    #[case("-42", Some(AttachmentId(42)))]
    #[case(" 8 ", Some(AttachmentId(8)))]
    #[case("0", None)]
    #[case("", None)]
    #[case("   ", None)]
    #[case("image", None)]
    fn sanitizes_submitted_attachment(
        #[case] raw: &str,
        #[case] expected: Option<AttachmentId>,
    ) {
        assert_eq!(AttachmentId::sanitize(raw), expected);
    }

    #[test]
    fn parses_and_displays() {
        let id: AvatarId = " 15 ".parse().unwrap();
        assert_eq!(id, AvatarId(15));
        assert_eq!(id.to_string(), "15");
        assert!("x".parse::<AvatarId>().is_err());
    }
}
