//! LIBRAS hand-shape glyphs for small integers.
//!
//! Numbers 1 to 10 have a single hand shape. 11 to 25 are written as the
//! tens shape followed by the unit shape, so 14 is `👆🤟` and 20 is `✌️✊`.

use std::borrow::Cow;
use std::ops::RangeInclusive;

pub const MIN_REPRESENTABLE: u32 = 1;
pub const MAX_REPRESENTABLE: u32 = 25;

const GLYPHS: [&str; MAX_REPRESENTABLE as usize] = [
    "👆",
    "✌️",
    "👌",
    "🤟",
    "🖐️",
    "🤙",
    "👇",
    "🤘",
    "👊",
    "✊",
    "👆👆",
    "👆✌️",
    "👆👌",
    "👆🤟",
    "👆🖐️",
    "👆🤙",
    "👆👇",
    "👆🤘",
    "👆👊",
    "✌️✊",
    "✌️👆",
    "✌️✌️",
    "✌️👌",
    "✌️🤟",
    "✌️🖐️",
];

pub fn representable_range() -> RangeInclusive<u32> {
    MIN_REPRESENTABLE..=MAX_REPRESENTABLE
}

pub fn is_representable(n: u32) -> bool {
    representable_range().contains(&n)
}

/// Returns the glyph for `n`, or `None` when `n` has no sign in the table.
pub fn glyph(n: u32) -> Option<&'static str> {
    if is_representable(n) {
        Some(GLYPHS[(n - MIN_REPRESENTABLE) as usize])
    } else {
        None
    }
}

/// Glyph for `n` when one exists, otherwise its decimal digits.
pub fn render(n: u32) -> Cow<'static, str> {
    match glyph(n) {
        Some(g) => Cow::Borrowed(g),
        None => Cow::Owned(n.to_string()),
    }
}

pub fn count_representable<I>(values: I) -> usize
where
    I: IntoIterator<Item = u32>,
{
    values.into_iter().filter(|v| is_representable(*v)).count()
}
