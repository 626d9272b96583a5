use serde::de::{Deserializer, MapAccess, Visitor};
use serde::Deserialize;
use std::fmt;
use std::marker::PhantomData;
use std::path::PathBuf;
use url::Url;

use super::loader::LoadError;

// ============================================================================
// Raw Document Shape
// ============================================================================

/// The source document as it appears on the wire.
#[derive(Debug, Deserialize)]
pub struct RawDataset {
    #[serde(rename = "@version", default)]
    pub version: Option<String>,
    /// category label → subcategory label → entries
    pub emojis: OrderedMap<OrderedMap<Vec<RawEmoji>>>,
}

/// One entry in a subcategory list. Unknown fields are ignored.
#[derive(Debug, Deserialize)]
pub struct RawEmoji {
    #[serde(default)]
    pub emoji: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
}

/// A JSON object deserialized into a `Vec` so key order survives.
///
/// Dataset order is defined by the source's key order, which a `HashMap` or
/// `BTreeMap` would discard.
#[derive(Debug, Default)]
pub struct OrderedMap<V>(pub Vec<(String, V)>);

impl<'de, V: Deserialize<'de>> Deserialize<'de> for OrderedMap<V> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct OrderedMapVisitor<V>(PhantomData<V>);

        impl<'de, V: Deserialize<'de>> Visitor<'de> for OrderedMapVisitor<V> {
            type Value = OrderedMap<V>;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a JSON object")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
                let mut entries = Vec::with_capacity(map.size_hint().unwrap_or(0));
                while let Some((key, value)) = map.next_entry::<String, V>()? {
                    entries.push((key, value));
                }
                Ok(OrderedMap(entries))
            }
        }

        deserializer.deserialize_map(OrderedMapVisitor(PhantomData))
    }
}

// ============================================================================
// Dataset Source
// ============================================================================

/// Where to read the dataset from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DatasetSource {
    /// `http` or `https` URL fetched with the shared HTTP client.
    Url(Url),
    /// Local file path.
    File(PathBuf),
}

impl DatasetSource {
    /// Interpret a configured source string.
    ///
    /// Anything that does not parse as an absolute URL is treated as a file
    /// path, so `./categories.min.json` and `/usr/share/...` both work.
    /// `file://` URLs become paths; other schemes are rejected.
    pub fn parse(value: &str) -> Result<Self, LoadError> {
        let value = value.trim();
        if value.is_empty() {
            return Err(LoadError::InvalidSource("empty dataset source".to_string()));
        }

        match Url::parse(value) {
            Ok(url) => match url.scheme() {
                "http" | "https" => Ok(Self::Url(url)),
                "file" => url.to_file_path().map(Self::File).map_err(|()| {
                    LoadError::InvalidSource(format!("not a local file URL: {}", value))
                }),
                // Windows drive letters ("C:\...") parse as one-letter schemes
                scheme if scheme.len() == 1 => Ok(Self::File(PathBuf::from(value))),
                scheme => Err(LoadError::InvalidSource(format!(
                    "unsupported URL scheme '{}'",
                    scheme
                ))),
            },
            Err(_) => Ok(Self::File(PathBuf::from(value))),
        }
    }
}

impl fmt::Display for DatasetSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Url(url) => write!(f, "{}", url),
            Self::File(path) => write!(f, "{}", path.display()),
        }
    }
}
