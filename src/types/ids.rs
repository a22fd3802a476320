use super::ValidationError;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Maximum length Google Sheets accepts for a sheet (tab) title.
const SHEET_TITLE_MAX_CHARS: usize = 100;

/// Identifier of a spreadsheet, as it appears in `/d/<id>/` of its URL.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SpreadsheetId(String);

impl SpreadsheetId {
    /// Extracts the ID from a spreadsheet URL such as
    /// `https://docs.google.com/spreadsheets/d/<id>/edit?usp=sharing`.
    pub fn from_url(url: &str) -> Result<Self, ValidationError> {
        lazy_static::lazy_static! {
            static ref ID_REGEX: Regex = Regex::new(r"/d/([A-Za-z0-9_-]+)")
                .expect("Failed to compile spreadsheet ID regex - this is a bug in the code");
        }

        ID_REGEX
            .captures(url.trim())
            .and_then(|captures| captures.get(1))
            .map(|id| Self(id.as_str().to_string()))
            .ok_or_else(|| ValidationError::InvalidSpreadsheetUrl(url.to_string()))
    }

    /// Accepts a bare ID. Only URL-safe base64 characters are allowed.
    pub fn parse(input: &str) -> Result<Self, ValidationError> {
        let input = input.trim();
        if input.is_empty() {
            return Err(ValidationError::EmptyField("spreadsheet_id"));
        }
        if !input
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
        {
            return Err(ValidationError::InvalidSpreadsheetId(input.to_string()));
        }
        Ok(Self(input.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SpreadsheetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Serialize for SpreadsheetId {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        self.0.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for SpreadsheetId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        SpreadsheetId::parse(&s).map_err(serde::de::Error::custom)
    }
}

/// Title of a single sheet (tab) inside a spreadsheet.
///
/// Captures are filed under the hostname of the page they came from, so most
/// titles look like `example.com` or `docs.rs`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SheetTitle(String);

impl SheetTitle {
    pub fn new(title: impl Into<String>) -> Result<Self, ValidationError> {
        let title = title.into();

        if title.trim().is_empty() {
            return Err(ValidationError::EmptyField("sheet_title"));
        }

        if title.chars().count() > SHEET_TITLE_MAX_CHARS {
            return Err(ValidationError::InvalidSheetTitle {
                title,
                reason: format!("longer than {} characters", SHEET_TITLE_MAX_CHARS),
            });
        }

        if title.contains(['[', ']', '*', '?', '/', '\\', ':']) {
            return Err(ValidationError::InvalidSheetTitle {
                title,
                reason: "contains a character Sheets does not allow in titles".to_string(),
            });
        }

        Ok(Self(title))
    }

    /// Derives the sheet title for a page from its hostname.
    pub fn from_page_url(url: &url::Url) -> Result<Self, ValidationError> {
        match url.host_str() {
            Some(host) if !host.is_empty() => Self::new(host.to_string()),
            _ => Err(ValidationError::InvalidUrl {
                url: url.to_string(),
                reason: "URL has no hostname".to_string(),
            }),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// A1 reference covering the header cells, e.g. `example.com!A1:D1`.
    pub fn header_range(&self) -> String {
        format!("{}!A1:D1", self.0)
    }

    /// A1 reference used as the append anchor, e.g. `example.com!A:A`.
    pub fn append_range(&self) -> String {
        format!("{}!A:A", self.0)
    }
}

impl fmt::Display for SheetTitle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Serialize for SheetTitle {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        self.0.serialize(serializer)
    }
}
