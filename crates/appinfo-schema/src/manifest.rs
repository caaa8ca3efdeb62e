use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::fs;
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ManifestError {
    #[error("failed to read manifest file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse manifest: {0}")]
    ParseJson(#[from] serde_json::Error),
    #[error("manifest root must be a JSON object")]
    NotAnObject,
    #[error("manifest field '{path}' {problem}")]
    Shape { path: String, problem: &'static str },
}

impl ManifestError {
    fn missing(path: impl Into<String>) -> Self {
        Self::Shape {
            path: path.into(),
            problem: "is missing",
        }
    }

    fn wrong_type(path: impl Into<String>, expected: &'static str) -> Self {
        Self::Shape {
            path: path.into(),
            problem: expected,
        }
    }
}

/// Where the resource manifest lives inside the JSON document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Layout {
    /// Legacy `appinfo.json`: `resources` sits at the document root.
    AppInfo,
    /// `package.json`: manifest fields are nested under `pebble`.
    Package,
}

impl Layout {
    fn detect(root: &serde_json::Map<String, Value>) -> Self {
        match root.get(PACKAGE_KEY) {
            Some(Value::Object(_)) => Self::Package,
            _ => Self::AppInfo,
        }
    }

    fn prefix(self) -> &'static str {
        match self {
            Self::AppInfo => "",
            Self::Package => "pebble.",
        }
    }
}

impl fmt::Display for Layout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AppInfo => f.write_str("appinfo"),
            Self::Package => f.write_str("package"),
        }
    }
}

const PACKAGE_KEY: &str = "pebble";

/// Declared type of a media resource.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ResourceType {
    Bitmap,
    Png,
    PngTrans,
    Pbi,
    Pbi8,
    Font,
    Raw,
    Other(String),
}

impl ResourceType {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Bitmap => "bitmap",
            Self::Png => "png",
            Self::PngTrans => "png-trans",
            Self::Pbi => "pbi",
            Self::Pbi8 => "pbi8",
            Self::Font => "font",
            Self::Raw => "raw",
            Self::Other(s) => s,
        }
    }
}

impl From<&str> for ResourceType {
    fn from(s: &str) -> Self {
        match s {
            "bitmap" => Self::Bitmap,
            "png" => Self::Png,
            "png-trans" => Self::PngTrans,
            "pbi" => Self::Pbi,
            "pbi8" => Self::Pbi8,
            "font" => Self::Font,
            "raw" => Self::Raw,
            other => Self::Other(other.to_owned()),
        }
    }
}

impl From<String> for ResourceType {
    fn from(s: String) -> Self {
        match Self::from(s.as_str()) {
            Self::Other(_) => Self::Other(s),
            known => known,
        }
    }
}

impl From<ResourceType> for String {
    fn from(ty: ResourceType) -> Self {
        match ty {
            ResourceType::Other(s) => s,
            known => known.as_str().to_owned(),
        }
    }
}

impl fmt::Display for ResourceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Read-only typed view of one `resources.media` entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MediaResource {
    #[serde(rename = "type")]
    pub kind: ResourceType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_platforms: Option<Vec<String>>,
}

/// A resource manifest document, kept as raw JSON so that fields this crate
/// does not interpret, and their order, survive a rewrite.
#[derive(Debug, Clone, PartialEq)]
pub struct AppInfo {
    root: Value,
    layout: Layout,
}

impl AppInfo {
    pub fn from_value(root: Value) -> Result<Self, ManifestError> {
        let Value::Object(map) = &root else {
            return Err(ManifestError::NotAnObject);
        };
        let layout = Layout::detect(map);
        Ok(Self { root, layout })
    }

    pub fn layout(&self) -> Layout {
        self.layout
    }

    pub fn as_value(&self) -> &Value {
        &self.root
    }

    /// Dotted path of the media array, e.g. `pebble.resources.media`.
    pub fn media_path(&self) -> String {
        format!("{}resources.media", self.layout.prefix())
    }

    fn body(&self) -> &Value {
        match self.layout {
            Layout::AppInfo => &self.root,
            Layout::Package => &self.root[PACKAGE_KEY],
        }
    }

    fn body_mut(&mut self) -> &mut Value {
        match self.layout {
            Layout::AppInfo => &mut self.root,
            Layout::Package => &mut self.root[PACKAGE_KEY],
        }
    }

    pub fn media(&self) -> Result<&Vec<Value>, ManifestError> {
        let prefix = self.layout.prefix();
        let resources = self
            .body()
            .get("resources")
            .ok_or_else(|| ManifestError::missing(format!("{prefix}resources")))?;
        if !resources.is_object() {
            return Err(ManifestError::wrong_type(
                format!("{prefix}resources"),
                "must be an object",
            ));
        }
        match resources.get("media") {
            Some(Value::Array(media)) => Ok(media),
            Some(_) => Err(ManifestError::wrong_type(
                self.media_path(),
                "must be an array",
            )),
            None => Err(ManifestError::missing(self.media_path())),
        }
    }

    pub fn media_mut(&mut self) -> Result<&mut Vec<Value>, ManifestError> {
        // Run the read-only lookup first so error paths are reported identically.
        self.media()?;
        let path = self.media_path();
        match self.body_mut()["resources"].get_mut("media") {
            Some(Value::Array(media)) => Ok(media),
            _ => Err(ManifestError::missing(path)),
        }
    }

    /// Typed view of every media entry, in manifest order.
    pub fn resources(&self) -> Result<Vec<MediaResource>, ManifestError> {
        let path = self.media_path();
        self.media()?
            .iter()
            .enumerate()
            .map(|(i, entry)| {
                entry_type(entry, &path, i)?;
                MediaResource::deserialize(entry).map_err(|_| {
                    ManifestError::wrong_type(format!("{path}[{i}]"), "is not a valid media entry")
                })
            })
            .collect()
    }

    /// The manifest's `targetPlatforms` list, if it declares one.
    pub fn target_platforms(&self) -> Option<Vec<String>> {
        let platforms = self.body().get("targetPlatforms")?.as_array()?;
        Some(
            platforms
                .iter()
                .filter_map(|v| v.as_str().map(str::to_owned))
                .collect(),
        )
    }

    pub fn to_json_pretty(&self) -> Result<String, ManifestError> {
        let mut out = serde_json::to_string_pretty(&self.root)?;
        out.push('\n');
        Ok(out)
    }
}

/// The `type` string of media entry `index`, or a shape error naming it.
pub(crate) fn entry_type<'a>(
    entry: &'a Value,
    media_path: &str,
    index: usize,
) -> Result<&'a str, ManifestError> {
    let Value::Object(fields) = entry else {
        return Err(ManifestError::wrong_type(
            format!("{media_path}[{index}]"),
            "must be an object",
        ));
    };
    match fields.get("type") {
        Some(Value::String(ty)) => Ok(ty),
        Some(_) => Err(ManifestError::wrong_type(
            format!("{media_path}[{index}].type"),
            "must be a string",
        )),
        None => Err(ManifestError::missing(format!(
            "{media_path}[{index}].type"
        ))),
    }
}

pub fn parse_manifest_str(input: &str) -> Result<AppInfo, ManifestError> {
    AppInfo::from_value(serde_json::from_str(input)?)
}

pub fn parse_manifest_file(path: impl AsRef<Path>) -> Result<AppInfo, ManifestError> {
    let content = fs::read_to_string(path)?;
    parse_manifest_str(&content)
}
