//! Catalog item representation.

use std::path::PathBuf;

use serde::{Deserialize, Deserializer, Serialize};

use crate::error::{Error, Result};
use crate::fs::sanitize_path_component;

/// An audiobook in the remote library.
///
/// Identity is the ISBN; every other field is descriptive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogItem {
    /// Unique identifier.
    pub isbn: String,

    /// Book title.
    pub title: String,

    /// Authors in credit order. The library reports either a single string
    /// or a list.
    #[serde(default, deserialize_with = "string_or_list")]
    pub authors: Vec<String>,

    /// Series name, if the book belongs to one.
    #[serde(default, deserialize_with = "non_empty_string")]
    pub series: Option<String>,

    /// Position within the series ("2", "2.5", ...).
    #[serde(default, deserialize_with = "string_or_number")]
    pub series_num: Option<String>,
}

impl CatalogItem {
    /// Create an item with a single author and no series.
    pub fn new(isbn: impl Into<String>, title: impl Into<String>, author: impl Into<String>) -> Self {
        Self {
            isbn: isbn.into(),
            title: title.into(),
            authors: vec![author.into()],
            series: None,
            series_num: None,
        }
    }

    /// Authors joined for display and for the top-level folder name.
    pub fn author_line(&self) -> Option<String> {
        let authors: Vec<&str> = self
            .authors
            .iter()
            .map(|a| a.trim())
            .filter(|a| !a.is_empty())
            .collect();

        if authors.is_empty() {
            None
        } else {
            Some(authors.join(", "))
        }
    }

    /// Relative storage path: `authors/series/"series_num - title"`.
    ///
    /// Missing components are omitted rather than left empty. Fails with
    /// [`Error::MissingAuthors`] when the item has no author.
    pub fn relative_path(&self) -> Result<PathBuf> {
        self.storage_path(None)
    }

    /// Like [`relative_path`](Self::relative_path) with the ISBN appended to
    /// the last component, for editions that share author and title.
    pub fn disambiguated_relative_path(&self) -> Result<PathBuf> {
        self.storage_path(Some(&self.isbn))
    }

    fn storage_path(&self, suffix: Option<&str>) -> Result<PathBuf> {
        let authors = self
            .author_line()
            .ok_or_else(|| Error::MissingAuthors(self.isbn.clone()))?;

        let mut path = PathBuf::from(sanitize_path_component(&authors)?);

        if let Some(series) = self.series.as_deref() {
            path.push(sanitize_path_component(series)?);
        }

        let mut leaf = match self.series_num.as_deref() {
            Some(num) => format!("{} - {}", num, self.title),
            None => self.title.clone(),
        };
        if let Some(suffix) = suffix {
            leaf = format!("{} ({})", leaf, suffix);
        }
        path.push(sanitize_path_component(&leaf)?);

        Ok(path)
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum OneOrMany {
    One(String),
    Many(Vec<String>),
}

fn string_or_list<'de, D>(deserializer: D) -> std::result::Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<OneOrMany>::deserialize(deserializer)? {
        Some(OneOrMany::One(author)) => vec![author],
        Some(OneOrMany::Many(authors)) => authors,
        None => Vec::new(),
    })
}

fn non_empty_string<'de, D>(deserializer: D) -> std::result::Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value.filter(|s| !s.trim().is_empty()))
}

#[derive(Deserialize)]
#[serde(untagged)]
enum StringOrNumber {
    Str(String),
    Int(i64),
    Float(f64),
}

fn string_or_number<'de, D>(deserializer: D) -> std::result::Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = match Option::<StringOrNumber>::deserialize(deserializer)? {
        Some(StringOrNumber::Str(s)) => Some(s),
        Some(StringOrNumber::Int(n)) => Some(n.to_string()),
        Some(StringOrNumber::Float(n)) => Some(n.to_string()),
        None => None,
    };
    Ok(value.filter(|s| !s.trim().is_empty()))
}
