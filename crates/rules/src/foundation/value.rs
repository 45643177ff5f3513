//! Dynamic input values
//!
//! Inputs arrive as loosely typed data: decoded form fields, JSON bodies,
//! uploaded files. [`Value`] is the single representation every rule sees.
//! Conversions from `serde_json::Value` and the common scalars are provided,
//! so most callers never build a `Value` by hand.
//!
//! # Examples
//!
//! ```
//! use nebula_rules::foundation::{Value, ValueKind};
//! use serde_json::json;
//!
//! let value = Value::from(json!({"tags": ["a", "b"]}));
//! assert_eq!(value.kind(), ValueKind::Object);
//! assert!(Value::from("   ").is_blank());
//! ```

use indexmap::IndexMap;
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::io::{self, Read};
use std::sync::Arc;

/// Insertion-ordered map of field key to value.
pub type Inputs = IndexMap<String, Value>;

// ============================================================================
// UPLOADED FILES
// ============================================================================

/// Outcome of an upload as reported by the transport layer.
///
/// The numeric codes follow the conventional upload error table so that an
/// HTTP body parser can map its own status straight through [`UploadStatus::from_code`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum UploadStatus {
    /// The file arrived intact.
    #[default]
    Ok,
    /// The file exceeds the server-wide size limit.
    ExceedsServerLimit,
    /// The file exceeds the limit declared by the form.
    ExceedsFormLimit,
    /// Only part of the file was received.
    Partial,
    /// No file was sent for this field.
    NoFile,
    /// The server has no temporary directory to stage the file.
    MissingTempDir,
    /// The staged file could not be written.
    WriteFailed,
    /// An extension stopped the upload.
    Extension,
}

impl UploadStatus {
    /// Returns the numeric status code.
    #[must_use]
    pub const fn code(self) -> u8 {
        match self {
            Self::Ok => 0,
            Self::ExceedsServerLimit => 1,
            Self::ExceedsFormLimit => 2,
            Self::Partial => 3,
            Self::NoFile => 4,
            Self::MissingTempDir => 6,
            Self::WriteFailed => 7,
            Self::Extension => 8,
        }
    }

    /// Maps a numeric status code back to a status.
    #[must_use]
    pub const fn from_code(code: u8) -> Option<Self> {
        Some(match code {
            0 => Self::Ok,
            1 => Self::ExceedsServerLimit,
            2 => Self::ExceedsFormLimit,
            3 => Self::Partial,
            4 => Self::NoFile,
            6 => Self::MissingTempDir,
            7 => Self::WriteFailed,
            8 => Self::Extension,
            _ => return None,
        })
    }

    /// Returns true if the upload completed.
    #[must_use]
    pub const fn is_ok(self) -> bool {
        matches!(self, Self::Ok)
    }
}

/// The minimal capability set a file-like input must expose.
///
/// Rules never depend on a concrete file type: anything that can report its
/// byte size, its upload status and hand out a reader can be validated.
pub trait UploadedFile: fmt::Debug + Send + Sync {
    /// Size of the content in bytes.
    fn size(&self) -> u64;

    /// Upload status; [`UploadStatus::NoFile`] marks an empty file slot.
    fn status(&self) -> UploadStatus;

    /// Opens the content for reading.
    fn stream(&self) -> io::Result<Box<dyn Read + '_>>;

    /// File name as sent by the client, if any.
    fn client_filename(&self) -> Option<&str> {
        None
    }

    /// Media type as sent by the client, if any.
    fn client_media_type(&self) -> Option<&str> {
        None
    }
}

/// An uploaded file held entirely in memory.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InMemoryFile {
    data: Vec<u8>,
    status: UploadStatus,
    filename: Option<String>,
    media_type: Option<String>,
}

impl InMemoryFile {
    /// Creates a successfully uploaded file with the given content.
    pub fn new(data: impl Into<Vec<u8>>) -> Self {
        Self {
            data: data.into(),
            ..Self::default()
        }
    }

    /// Creates the empty slot a form submits when no file was chosen.
    #[must_use]
    pub fn no_file() -> Self {
        Self {
            status: UploadStatus::NoFile,
            ..Self::default()
        }
    }

    /// Sets the upload status.
    #[must_use = "builder methods must be chained or built"]
    pub fn with_status(mut self, status: UploadStatus) -> Self {
        self.status = status;
        self
    }

    /// Sets the client file name.
    #[must_use = "builder methods must be chained or built"]
    pub fn with_filename(mut self, filename: impl Into<String>) -> Self {
        self.filename = Some(filename.into());
        self
    }

    /// Sets the client media type.
    #[must_use = "builder methods must be chained or built"]
    pub fn with_media_type(mut self, media_type: impl Into<String>) -> Self {
        self.media_type = Some(media_type.into());
        self
    }
}

impl UploadedFile for InMemoryFile {
    fn size(&self) -> u64 {
        self.data.len() as u64
    }

    fn status(&self) -> UploadStatus {
        self.status
    }

    fn stream(&self) -> io::Result<Box<dyn Read + '_>> {
        Ok(Box::new(io::Cursor::new(self.data.as_slice())))
    }

    fn client_filename(&self) -> Option<&str> {
        self.filename.as_deref()
    }

    fn client_media_type(&self) -> Option<&str> {
        self.media_type.as_deref()
    }
}

// ============================================================================
// VALUE
// ============================================================================

/// Lightweight classification of a [`Value`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueKind {
    Null,
    Bool,
    Integer,
    Float,
    Text,
    Array,
    Object,
    File,
}

impl ValueKind {
    /// Returns the lowercase name used in messages and logs.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Bool => "boolean",
            Self::Integer => "integer",
            Self::Float => "float",
            Self::Text => "string",
            Self::Array => "array",
            Self::Object => "object",
            Self::File => "file",
        }
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A dynamically typed input value.
#[derive(Debug, Clone, Default)]
pub enum Value {
    /// Absent or explicit null.
    #[default]
    Null,
    /// Boolean value.
    Bool(bool),
    /// Signed integer.
    Integer(i64),
    /// Floating point number.
    Float(f64),
    /// UTF-8 text.
    Text(String),
    /// Ordered list of values.
    Array(Vec<Value>),
    /// Ordered key-value map (a record).
    Object(IndexMap<String, Value>),
    /// Uploaded file handle.
    File(Arc<dyn UploadedFile>),
}

impl Value {
    /// Returns the kind of this value.
    #[must_use]
    pub fn kind(&self) -> ValueKind {
        match self {
            Self::Null => ValueKind::Null,
            Self::Bool(_) => ValueKind::Bool,
            Self::Integer(_) => ValueKind::Integer,
            Self::Float(_) => ValueKind::Float,
            Self::Text(_) => ValueKind::Text,
            Self::Array(_) => ValueKind::Array,
            Self::Object(_) => ValueKind::Object,
            Self::File(_) => ValueKind::File,
        }
    }

    /// Returns true for [`Value::Null`].
    #[must_use]
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Returns true if the value counts as "not provided".
    ///
    /// Null, whitespace-only text, empty arrays and objects, and file slots
    /// reporting [`UploadStatus::NoFile`] are blank. Everything else,
    /// including `false` and `0`, is a provided value.
    #[must_use]
    pub fn is_blank(&self) -> bool {
        match self {
            Self::Null => true,
            Self::Text(s) => s.trim().is_empty(),
            Self::Array(items) => items.is_empty(),
            Self::Object(map) => map.is_empty(),
            Self::File(file) => file.status() == UploadStatus::NoFile,
            Self::Bool(_) | Self::Integer(_) | Self::Float(_) => false,
        }
    }

    /// Returns true if the value is a live handle rather than plain data.
    #[must_use]
    pub fn is_object_ref(&self) -> bool {
        matches!(self, Self::File(_))
    }

    /// Returns true for integers and floats.
    #[must_use]
    pub fn is_number(&self) -> bool {
        matches!(self, Self::Integer(_) | Self::Float(_))
    }

    /// Borrows the text content.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the numeric content of integers and floats.
    #[must_use]
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Integer(n) => Some(*n as f64),
            Self::Float(n) => Some(*n),
            _ => None,
        }
    }

    /// Borrows the array content.
    #[must_use]
    pub fn as_array(&self) -> Option<&[Value]> {
        match self {
            Self::Array(items) => Some(items),
            _ => None,
        }
    }

    /// Borrows the object content.
    #[must_use]
    pub fn as_object(&self) -> Option<&IndexMap<String, Value>> {
        match self {
            Self::Object(map) => Some(map),
            _ => None,
        }
    }

    /// Borrows the file handle.
    #[must_use]
    pub fn as_file(&self) -> Option<&dyn UploadedFile> {
        match self {
            Self::File(file) => Some(file.as_ref()),
            _ => None,
        }
    }

    /// Renders a scalar as text, the way it would have arrived in a form.
    ///
    /// Returns `None` for null, collections and files.
    #[must_use]
    pub fn to_text(&self) -> Option<String> {
        match self {
            Self::Text(s) => Some(s.clone()),
            Self::Integer(n) => Some(n.to_string()),
            Self::Float(n) => Some(n.to_string()),
            Self::Bool(b) => Some(b.to_string()),
            Self::Null | Self::Array(_) | Self::Object(_) | Self::File(_) => None,
        }
    }

    /// Converts into a `serde_json::Value`.
    ///
    /// Files become `{ "size": .., "error": .. }`; non-finite floats become null.
    #[must_use]
    pub fn to_json(&self) -> serde_json::Value {
        use serde_json::Value as Json;

        match self {
            Self::Null => Json::Null,
            Self::Bool(b) => Json::Bool(*b),
            Self::Integer(n) => Json::from(*n),
            Self::Float(n) => serde_json::Number::from_f64(*n).map_or(Json::Null, Json::Number),
            Self::Text(s) => Json::String(s.clone()),
            Self::Array(items) => Json::Array(items.iter().map(Self::to_json).collect()),
            Self::Object(map) => Json::Object(
                map.iter()
                    .map(|(k, v)| (k.clone(), v.to_json()))
                    .collect(),
            ),
            Self::File(file) => serde_json::json!({
                "size": file.size(),
                "error": file.status().code(),
            }),
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Null, Self::Null) => true,
            (Self::Bool(a), Self::Bool(b)) => a == b,
            (Self::Integer(a), Self::Integer(b)) => a == b,
            (Self::Float(a), Self::Float(b)) => a == b,
            (Self::Text(a), Self::Text(b)) => a == b,
            (Self::Array(a), Self::Array(b)) => a == b,
            (Self::Object(a), Self::Object(b)) => a == b,
            (Self::File(a), Self::File(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }
}

// ============================================================================
// CONVERSIONS
// ============================================================================

impl From<serde_json::Value> for Value {
    fn from(json: serde_json::Value) -> Self {
        use serde_json::Value as Json;

        match json {
            Json::Null => Self::Null,
            Json::Bool(b) => Self::Bool(b),
            Json::Number(n) => match n.as_i64() {
                Some(i) => Self::Integer(i),
                None => Self::Float(n.as_f64().unwrap_or(f64::NAN)),
            },
            Json::String(s) => Self::Text(s),
            Json::Array(items) => Self::Array(items.into_iter().map(Self::from).collect()),
            Json::Object(map) => Self::Object(map.into_iter().map(|(k, v)| (k, v.into())).collect()),
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self::Text(s.to_owned())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Self::Integer(n)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Self::Integer(i64::from(n))
    }
}

impl From<u32> for Value {
    fn from(n: u32) -> Self {
        Self::Integer(i64::from(n))
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Self::Float(n)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(items: Vec<T>) -> Self {
        Self::Array(items.into_iter().map(Into::into).collect())
    }
}

impl From<IndexMap<String, Value>> for Value {
    fn from(map: IndexMap<String, Value>) -> Self {
        Self::Object(map)
    }
}

impl From<InMemoryFile> for Value {
    fn from(file: InMemoryFile) -> Self {
        Self::File(Arc::new(file))
    }
}

impl From<Arc<dyn UploadedFile>> for Value {
    fn from(file: Arc<dyn UploadedFile>) -> Self {
        Self::File(file)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Null, Into::into)
    }
}

/// Converts a JSON object into an input map.
///
/// Non-object JSON yields an empty map.
#[must_use]
pub fn inputs_from_json(json: serde_json::Value) -> Inputs {
    match Value::from(json) {
        Value::Object(map) => map,
        _ => Inputs::new(),
    }
}

// ============================================================================
// SERDE
// ============================================================================

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Null => serializer.serialize_unit(),
            Self::Bool(b) => serializer.serialize_bool(*b),
            Self::Integer(n) => serializer.serialize_i64(*n),
            Self::Float(n) => serializer.serialize_f64(*n),
            Self::Text(s) => serializer.serialize_str(s),
            Self::Array(items) => items.serialize(serializer),
            Self::Object(map) => map.serialize(serializer),
            Self::File(file) => {
                let mut map = serializer.serialize_map(Some(2))?;
                map.serialize_entry("size", &file.size())?;
                map.serialize_entry("error", &file.status().code())?;
                map.end()
            }
        }
    }
}

impl<'de> Deserialize<'de> for Value {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        serde_json::Value::deserialize(deserializer).map(Self::from)
    }
}
