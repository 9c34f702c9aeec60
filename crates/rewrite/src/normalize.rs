use std::borrow::Cow;

/// First code point of the Mathematical Bold capital block (`𝐀`).
const BOLD_CAPITAL_A: u32 = 0x1D400;
/// First code point of the Mathematical Bold small block (`𝐚`).
const BOLD_SMALL_A: u32 = 0x1D41A;
/// One past the last Mathematical Bold small letter (`𝐳`).
const BOLD_END: u32 = 0x1D434;

/// Map a single decorative code point to its ASCII letter.
///
/// Returns `None` for anything outside the normalization table.
#[must_use]
pub fn to_ascii(c: char) -> Option<char> {
    let cp = c as u32;
    let ascii = match cp {
        BOLD_CAPITAL_A..BOLD_SMALL_A => b'A' + (cp - BOLD_CAPITAL_A) as u8,
        BOLD_SMALL_A..BOLD_END => b'a' + (cp - BOLD_SMALL_A) as u8,
        _ => return None,
    };
    Some(char::from(ascii))
}

/// Replace every decorative code point in `text` with its ASCII equivalent.
///
/// All other characters pass through untouched. The output never contains a
/// table key, so a second pass is a no-op. Borrows when nothing changes.
#[must_use]
pub fn normalize(text: &str) -> Cow<'_, str> {
    if !text.chars().any(|c| to_ascii(c).is_some()) {
        return Cow::Borrowed(text);
    }
    Cow::Owned(text.chars().map(|c| to_ascii(c).unwrap_or(c)).collect())
}
