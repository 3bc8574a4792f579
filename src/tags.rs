//! Layer-name tag parsing.
//!
//! Export directives are embedded in free-text layer names as bracket- or
//! paren-delimited tags: `(bone)`, `[merge]`, `(slot)`, `[skin:Alt]` and so
//! on. Both delimiter forms are matched uniformly and case-insensitively.

use std::sync::LazyLock;

use regex::Regex;

static BONE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\(bone\)|\[bone\]").unwrap());
static MERGE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\(merge\)|\[merge\]").unwrap());
static SLOT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\(slot\)|\[slot\]").unwrap());
static SKIN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\(skin(?::([^)]*))?\)|\[skin(?::([^\]]*))?\]").unwrap());

/// The kinds of tag a layer name can carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TagKind {
    Bone,
    Merge,
    Slot,
    Skin,
}

impl TagKind {
    fn pattern(self) -> &'static Regex {
        match self {
            TagKind::Bone => &BONE_RE,
            TagKind::Merge => &MERGE_RE,
            TagKind::Slot => &SLOT_RE,
            TagKind::Skin => &SKIN_RE,
        }
    }
}

/// True if the name carries a `(bone)` or `[bone]` tag.
pub fn has_bone_tag(name: &str) -> bool {
    BONE_RE.is_match(name)
}

/// True if the name carries a `(merge)` or `[merge]` tag.
///
/// A merge tag on a group forces it to be exported as a single flattened
/// image instead of being recursed into.
pub fn has_merge_tag(name: &str) -> bool {
    MERGE_RE.is_match(name)
}

/// True if the name carries a `(slot)` or `[slot]` tag.
pub fn has_slot_tag(name: &str) -> bool {
    SLOT_RE.is_match(name)
}

/// Extract the skin tag value from a name.
///
/// Returns `None` when no skin tag is present, `Some("")` for a bare
/// `[skin]`/`(skin)` tag, and the trimmed value for `[skin:Value]`. Only
/// the first tag counts if several are present.
pub fn skin_tag(name: &str) -> Option<String> {
    let caps = SKIN_RE.captures(name)?;
    let value = caps
        .get(1)
        .or_else(|| caps.get(2))
        .map(|m| m.as_str().trim())
        .unwrap_or("");
    Some(value.to_string())
}

/// True if the name contains the literal `[ignore]` marker.
///
/// Unlike the other tags this is a case-sensitive substring check; the
/// asymmetry matches long-standing exporter behaviour and is relied on by
/// existing documents.
pub fn has_ignore_marker(name: &str) -> bool {
    name.contains("[ignore]")
}

/// Remove every instance of the given tags (both delimiter forms) and trim
/// the surrounding whitespace, yielding the clean display/file name.
pub fn strip_tags(name: &str, kinds: &[TagKind]) -> String {
    let mut cleaned = name.to_string();
    for kind in kinds {
        cleaned = kind.pattern().replace_all(&cleaned, "").trim().to_string();
    }
    cleaned
}
