use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::search::Item;

#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct Member {
    pub name: String,
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
}

impl Member {
    /// The visible text of a member card, in display order.
    pub fn segments(&self) -> Vec<String> {
        let mut out = vec![self.name.trim().to_string()];
        for field in [&self.role, &self.email, &self.phone] {
            if let Some(value) = field.as_deref().map(str::trim) {
                if !value.is_empty() {
                    out.push(value.to_string());
                }
            }
        }
        out.extend(
            self.tags
                .iter()
                .map(|t| t.trim())
                .filter(|t| !t.is_empty())
                .map(str::to_string),
        );
        out
    }

    pub fn to_item(&self) -> Item {
        Item::new(self.segments())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RosterFormat {
    Yaml,
    Json,
    Lines,
}

impl RosterFormat {
    pub fn from_path(path: &Path) -> Self {
        match path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase())
            .as_deref()
        {
            Some("yml") | Some("yaml") => Self::Yaml,
            Some("json") => Self::Json,
            _ => Self::Lines,
        }
    }
}

#[derive(Debug, Error)]
pub enum RosterError {
    #[error("failed to read roster file: {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse YAML roster: {source}")]
    Yaml {
        #[source]
        source: serde_yaml::Error,
    },

    #[error("failed to parse JSON roster: {source}")]
    Json {
        #[source]
        source: serde_json::Error,
    },

    #[error("member #{index} has an empty name")]
    EmptyName { index: usize },
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct Roster {
    #[serde(default)]
    pub title: Option<String>,
    pub members: Vec<Member>,
}

/// A roster file is either `{ title, members: [...] }` or a bare list.
#[derive(Deserialize)]
#[serde(untagged)]
enum RosterDocument {
    Full(Roster),
    Bare(Vec<Member>),
}

impl From<RosterDocument> for Roster {
    fn from(doc: RosterDocument) -> Self {
        match doc {
            RosterDocument::Full(roster) => roster,
            RosterDocument::Bare(members) => Roster {
                title: None,
                members,
            },
        }
    }
}

impl Roster {
    pub fn parse(contents: &str, format: RosterFormat) -> Result<Self, RosterError> {
        let roster: Roster = match format {
            RosterFormat::Yaml => serde_yaml::from_str::<RosterDocument>(contents)
                .map_err(|source| RosterError::Yaml { source })?
                .into(),
            RosterFormat::Json => serde_json::from_str::<RosterDocument>(contents)
                .map_err(|source| RosterError::Json { source })?
                .into(),
            RosterFormat::Lines => Self::from_lines(contents),
        };
        roster.validate()?;
        Ok(roster)
    }

    /// One member per non-blank line; `#` starts a comment line.
    fn from_lines(contents: &str) -> Self {
        let members = contents
            .lines()
            .map(str::trim)
            .filter(|l| !l.is_empty() && !l.starts_with('#'))
            .map(|l| Member {
                name: l.to_string(),
                ..Default::default()
            })
            .collect();
        Self {
            title: None,
            members,
        }
    }

    pub(crate) fn validate(&self) -> Result<(), RosterError> {
        for (index, m) in self.members.iter().enumerate() {
            if m.name.trim().is_empty() {
                return Err(RosterError::EmptyName { index });
            }
        }
        Ok(())
    }

    pub async fn load(path: &str) -> Result<Self, RosterError> {
        let contents =
            tokio::fs::read_to_string(path)
                .await
                .map_err(|source| RosterError::Read {
                    path: path.to_string(),
                    source,
                })?;
        let format = RosterFormat::from_path(Path::new(path));
        log::debug!("parsing roster {path} as {format:?}");
        Self::parse(&contents, format)
    }

    pub fn items(&self) -> Vec<Item> {
        self.members.iter().map(Member::to_item).collect()
    }
}
