//! Typed payloads attached to topics

use std::collections::BTreeMap;
use std::fmt;

use url::form_urlencoded;

use super::error::ModelError;

/// Kind of an extra; the declaration order is the order extras are written
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "UPPERCASE"))]
pub enum ExtraType {
    File,
    Link,
    Note,
    Topic,
}

impl ExtraType {
    pub const ALL: [ExtraType; 4] = [Self::File, Self::Link, Self::Note, Self::Topic];

    /// Name used on `- TYPE` lines
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::File => "FILE",
            Self::Link => "LINK",
            Self::Note => "NOTE",
            Self::Topic => "TOPIC",
        }
    }

    /// Parse a type name, ignoring surrounding whitespace
    pub fn parse(name: &str) -> Option<Self> {
        let name = name.trim();
        Self::ALL.into_iter().find(|ty| ty.as_str() == name)
    }
}

impl fmt::Display for ExtraType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Parameter carrying the line to open a file at
pub const FILE_PARAM_LINE: &str = "line";
/// Parameter asking hosts to open a file with the system viewer
pub const FILE_PARAM_USE_SYSTEM: &str = "useSystem";

/// A file reference with query parameters
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FileLink {
    uri: String,
    params: BTreeMap<String, String>,
}

impl FileLink {
    /// Link to `uri`; surrounding whitespace is dropped
    pub fn new(uri: impl AsRef<str>) -> Self {
        Self {
            uri: uri.as_ref().trim().to_string(),
            params: BTreeMap::new(),
        }
    }

    /// Parse `path?key=value&...`; `None` for a blank path
    ///
    /// The query starts after the last `?`, so a path that contains `?`
    /// is written with a trailing `?` even without parameters.
    pub fn parse(text: &str) -> Option<Self> {
        let text = text.trim();
        let (uri, query) = match text.rfind('?') {
            Some(index) => (&text[..index], Some(&text[index + 1..])),
            None => (text, None),
        };
        let uri = uri.trim();
        if uri.is_empty() {
            return None;
        }
        let params = query
            .map(|q| form_urlencoded::parse(q.as_bytes()).into_owned().collect())
            .unwrap_or_default();
        Some(Self {
            uri: uri.to_string(),
            params,
        })
    }

    pub fn uri(&self) -> &str {
        &self.uri
    }

    pub fn params(&self) -> &BTreeMap<String, String> {
        &self.params
    }

    pub fn param(&self, key: &str) -> Option<&str> {
        self.params.get(key).map(String::as_str)
    }

    pub fn with_param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.insert(key.into(), value.into());
        self
    }

    pub fn set_param(&mut self, key: impl Into<String>, value: Option<String>) -> Option<String> {
        let key = key.into();
        match value {
            Some(value) => self.params.insert(key, value),
            None => self.params.remove(&key),
        }
    }

    /// Line number to open the file at
    pub fn line(&self) -> Option<u32> {
        self.param(FILE_PARAM_LINE)?.trim().parse().ok()
    }

    pub fn with_line(self, line: u32) -> Self {
        self.with_param(FILE_PARAM_LINE, line.to_string())
    }

    pub fn use_system(&self) -> bool {
        self.param(FILE_PARAM_USE_SYSTEM)
            .is_some_and(|v| v.trim().eq_ignore_ascii_case("true"))
    }

    pub fn with_use_system(self, flag: bool) -> Self {
        self.with_param(FILE_PARAM_USE_SYSTEM, flag.to_string())
    }

    /// Lower-cased extension of the last path segment, empty if none
    pub fn extension(&self) -> String {
        let name = self.uri.rsplit(['/', '\\']).next().unwrap_or_default();
        match name.rfind('.') {
            Some(index) if index > 0 => name[index + 1..].to_lowercase(),
            _ => String::new(),
        }
    }

    /// Check if the link points at another mind map document
    pub fn is_mmd_file(&self) -> bool {
        self.extension() == "mmd"
    }

    /// Text written into the document
    pub fn to_body(&self) -> String {
        if self.params.is_empty() {
            return if self.uri.contains('?') {
                format!("{}?", self.uri)
            } else {
                self.uri.clone()
            };
        }
        let query = form_urlencoded::Serializer::new(String::new())
            .extend_pairs(&self.params)
            .finish();
        format!("{}?{}", self.uri, query)
    }
}

/// A payload attached to a topic; a topic holds at most one per type
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Extra {
    File(FileLink),
    /// External URI
    Link(String),
    /// Free multi-line text
    Note(String),
    /// UID of the target topic
    Topic(String),
}

impl Extra {
    pub fn extra_type(&self) -> ExtraType {
        match self {
            Self::File(_) => ExtraType::File,
            Self::Link(_) => ExtraType::Link,
            Self::Note(_) => ExtraType::Note,
            Self::Topic(_) => ExtraType::Topic,
        }
    }

    pub fn note(text: impl Into<String>) -> Self {
        Self::Note(text.into())
    }

    /// Link to an external URI; surrounding whitespace is dropped
    pub fn link(uri: impl AsRef<str>) -> Self {
        Self::Link(uri.as_ref().trim().to_string())
    }

    pub fn file(link: FileLink) -> Self {
        Self::File(link)
    }

    /// Link to the topic carrying `uid`; surrounding whitespace is dropped
    pub fn topic_link(uid: impl AsRef<str>) -> Self {
        Self::Topic(uid.as_ref().trim().to_string())
    }

    /// Check that the extra reads back unchanged from its written body
    ///
    /// File paths, links and UIDs must be non-blank and carry no
    /// surrounding whitespace. Notes are always valid.
    pub fn validate(&self) -> Result<(), ModelError> {
        let (what, value) = match self {
            Self::Note(_) => return Ok(()),
            Self::File(link) => ("file path", link.uri()),
            Self::Link(uri) => ("link", uri.as_str()),
            Self::Topic(uid) => ("topic UID", uid.as_str()),
        };
        if value.is_empty() {
            Err(ModelError::InvalidExtra(format!("empty {what}")))
        } else if value.trim() != value {
            Err(ModelError::InvalidExtra(format!("{what} `{value}` has surrounding whitespace")))
        } else {
            Ok(())
        }
    }

    /// Build an extra from its written body
    ///
    /// Notes keep the body verbatim. Other types are trimmed and rejected
    /// when blank.
    pub fn from_body(extra_type: ExtraType, body: &str) -> Option<Self> {
        match extra_type {
            ExtraType::Note => Some(Self::Note(body.to_string())),
            ExtraType::File => FileLink::parse(body).map(Self::File),
            ExtraType::Link | ExtraType::Topic => {
                let body = body.trim();
                if body.is_empty() {
                    None
                } else if extra_type == ExtraType::Link {
                    Some(Self::Link(body.to_string()))
                } else {
                    Some(Self::Topic(body.to_string()))
                }
            }
        }
    }

    /// Text written into the document
    pub fn to_body(&self) -> String {
        match self {
            Self::File(link) => link.to_body(),
            Self::Link(text) | Self::Note(text) | Self::Topic(text) => text.clone(),
        }
    }
}
