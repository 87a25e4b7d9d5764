//! Standard attribute names and key validation

use super::error::ModelError;

pub const BORDER_COLOR: &str = "borderColor";
pub const FILL_COLOR: &str = "fillColor";
pub const TEXT_COLOR: &str = "textColor";
/// `"true"` places a child of the root on the left side
pub const LEFT_SIDE: &str = "leftSide";
/// `"true"` hides the children in editors
pub const COLLAPSED: &str = "collapsed";
/// UID referenced by `TOPIC` extras
pub const TOPIC_LINK_UID: &str = "topicLinkUID";
pub const EMOTICON: &str = "mmd.emoticon";
pub const ALIGN: &str = "align";
pub const NOTE_ENCRYPTED: &str = "extras.note.encrypted";
pub const NOTE_ENCRYPTED_HINT: &str = "extras.note.encrypted.hint";

/// Document attribute naming the tool that wrote the file
pub const GENERATOR_ID: &str = "generatorId";

pub const STANDARD: [&str; 10] = [
    BORDER_COLOR,
    FILL_COLOR,
    TEXT_COLOR,
    LEFT_SIDE,
    COLLAPSED,
    TOPIC_LINK_UID,
    EMOTICON,
    ALIGN,
    NOTE_ENCRYPTED,
    NOTE_ENCRYPTED_HINT,
];

/// Check that a key can be written as `key=`value``
pub fn is_valid_key(key: &str) -> bool {
    !key.is_empty()
        && !key
            .chars()
            .any(|c| c.is_whitespace() || c.is_control() || matches!(c, '=' | ',' | '`'))
}

pub fn validate_key(key: &str) -> Result<(), ModelError> {
    if is_valid_key(key) {
        Ok(())
    } else {
        Err(ModelError::invalid_key(key))
    }
}
