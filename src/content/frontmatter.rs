//! Front-matter parsing

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use indexmap::IndexMap;
use serde::de::{self, Deserializer, SeqAccess, Visitor};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Front-matter delimiter line
const DELIMITER: &str = "---";

/// Errors raised by [`FrontMatter::parse`]
#[derive(Error, Debug)]
pub enum FrontMatterError {
    #[error("front-matter block is not closed by a '---' line")]
    Unterminated,

    #[error("invalid YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

/// A YAML scalar read as text, so `readingTime: 5` and `readingTime: "5 min"`
/// both land in a string field
struct Scalar(Option<String>);

struct ScalarVisitor;

impl<'de> Visitor<'de> for ScalarVisitor {
    type Value = Option<String>;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("a string, number or boolean")
    }

    fn visit_str<E: de::Error>(self, value: &str) -> Result<Self::Value, E> {
        Ok(Some(value.to_string()))
    }

    fn visit_string<E: de::Error>(self, value: String) -> Result<Self::Value, E> {
        Ok(Some(value))
    }

    fn visit_bool<E: de::Error>(self, value: bool) -> Result<Self::Value, E> {
        Ok(Some(value.to_string()))
    }

    fn visit_i64<E: de::Error>(self, value: i64) -> Result<Self::Value, E> {
        Ok(Some(value.to_string()))
    }

    fn visit_u64<E: de::Error>(self, value: u64) -> Result<Self::Value, E> {
        Ok(Some(value.to_string()))
    }

    fn visit_f64<E: de::Error>(self, value: f64) -> Result<Self::Value, E> {
        Ok(Some(value.to_string()))
    }

    fn visit_none<E: de::Error>(self) -> Result<Self::Value, E> {
        Ok(None)
    }

    fn visit_unit<E: de::Error>(self) -> Result<Self::Value, E> {
        Ok(None)
    }

    fn visit_some<D: Deserializer<'de>>(self, deserializer: D) -> Result<Self::Value, D::Error> {
        deserializer.deserialize_any(ScalarVisitor)
    }
}

impl<'de> Deserialize<'de> for Scalar {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(ScalarVisitor).map(Scalar)
    }
}

fn string_scalar<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Scalar::deserialize(deserializer).map(|s| s.0)
}

/// Custom deserializer that handles both a single string and a list of strings
fn string_or_vec<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    struct StringOrVec;

    impl<'de> Visitor<'de> for StringOrVec {
        type Value = Vec<String>;

        fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
            formatter.write_str("a string or a list of strings")
        }

        fn visit_str<E: de::Error>(self, value: &str) -> Result<Self::Value, E> {
            Ok(vec![value.to_string()])
        }

        fn visit_string<E: de::Error>(self, value: String) -> Result<Self::Value, E> {
            Ok(vec![value])
        }

        fn visit_seq<S>(self, mut seq: S) -> Result<Self::Value, S::Error>
        where
            S: SeqAccess<'de>,
        {
            let mut vec = Vec::new();
            while let Some(Scalar(item)) = seq.next_element::<Scalar>()? {
                vec.extend(item);
            }
            Ok(vec)
        }

        fn visit_none<E: de::Error>(self) -> Result<Self::Value, E> {
            Ok(Vec::new())
        }

        fn visit_unit<E: de::Error>(self) -> Result<Self::Value, E> {
            Ok(Vec::new())
        }
    }

    deserializer.deserialize_any(StringOrVec)
}

/// Front-matter data from a post
///
/// Every field is optional here; the repository decides which ones a post
/// cannot do without.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FrontMatter {
    #[serde(deserialize_with = "string_scalar", skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(deserialize_with = "string_scalar", skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(deserialize_with = "string_scalar", skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(deserialize_with = "string_scalar", skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    #[serde(
        rename = "readingTime",
        alias = "reading_time",
        deserialize_with = "string_scalar",
        skip_serializing_if = "Option::is_none"
    )]
    pub reading_time: Option<String>,
    #[serde(deserialize_with = "string_scalar", skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(deserialize_with = "string_or_vec")]
    pub tags: Vec<String>,

    /// Keys the blog does not know about, in source order
    #[serde(flatten)]
    pub extra: IndexMap<String, serde_yaml::Value>,
}

impl FrontMatter {
    /// Split raw document text into front matter and body.
    ///
    /// A document that does not open with a `---` line has no front matter:
    /// the result is `FrontMatter::default()` and the whole text as body.
    /// An opening delimiter without a closing one, or YAML that does not
    /// parse, is an error.
    pub fn parse(content: &str) -> Result<(Self, &str), FrontMatterError> {
        let content = content.trim_start_matches('\u{feff}');
        let Some(rest) = strip_opening_delimiter(content.trim_start()) else {
            return Ok((FrontMatter::default(), content));
        };

        let mut offset = 0;
        for line in rest.split_inclusive('\n') {
            if line.trim_end() == DELIMITER {
                let yaml = &rest[..offset];
                let body = rest[offset + line.len()..].trim_start_matches(['\n', '\r']);
                return Ok((Self::from_yaml(yaml)?, body));
            }
            offset += line.len();
        }

        Err(FrontMatterError::Unterminated)
    }

    fn from_yaml(yaml: &str) -> Result<Self, FrontMatterError> {
        // A block of blanks and comments is an empty YAML document, which
        // serde_yaml refuses to turn into a struct
        let is_empty = yaml.lines().all(|line| {
            let line = line.trim();
            line.is_empty() || line.starts_with('#')
        });
        if is_empty {
            return Ok(FrontMatter::default());
        }

        Ok(serde_yaml::from_str(yaml)?)
    }

    /// Parse the date string into a timestamp
    pub fn parse_date(&self) -> Option<NaiveDateTime> {
        self.date.as_deref().and_then(parse_date_string)
    }
}

/// Returns the text after the opening `---` line, if there is one
fn strip_opening_delimiter(content: &str) -> Option<&str> {
    let rest = content.strip_prefix(DELIMITER)?;
    let rest = rest.trim_start_matches([' ', '\t']);
    if let Some(rest) = rest.strip_prefix("\r\n") {
        Some(rest)
    } else if let Some(rest) = rest.strip_prefix('\n') {
        Some(rest)
    } else if rest.is_empty() {
        Some(rest)
    } else {
        None
    }
}

/// Parse a date string in various formats.
///
/// Offsets are dropped after parsing so the calendar date stays the one the
/// author wrote.
pub fn parse_date_string(s: &str) -> Option<NaiveDateTime> {
    let s = s.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.naive_local());
    }

    let datetime_formats = [
        "%Y-%m-%d %H:%M:%S",
        "%Y/%m/%d %H:%M:%S",
        "%Y-%m-%d %H:%M",
        "%Y/%m/%d %H:%M",
        "%Y-%m-%dT%H:%M:%S",
        "%Y-%m-%dT%H:%M:%S%.f",
        "%Y-%m-%dT%H:%M",
    ];
    for fmt in datetime_formats {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(dt);
        }
    }

    let date_formats = ["%Y-%m-%d", "%Y/%m/%d", "%B %d, %Y", "%b %d, %Y"];
    for fmt in date_formats {
        if let Ok(d) = NaiveDate::parse_from_str(s, fmt) {
            return d.and_hms_opt(0, 0, 0);
        }
    }

    None
}
