//! Core type definitions for the catalog.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A subject identifier.
///
/// Identifiers are always positive. Raw request values go through
/// [`SubjectId::try_from_raw`], which rejects zero, negatives and values
/// outside the `u32` range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SubjectId(u32);

impl SubjectId {
    /// Creates a new SubjectId, rejecting zero.
    pub fn new(value: u32) -> Result<Self, &'static str> {
        if value == 0 {
            return Err("subject id must be a positive integer");
        }
        Ok(Self(value))
    }

    /// Converts a raw request integer into a SubjectId.
    pub fn try_from_raw(value: i64) -> Result<Self, &'static str> {
        if value <= 0 {
            return Err("subject id must be a positive integer");
        }
        let value = u32::try_from(value).map_err(|_| "subject id is out of range")?;
        Ok(Self(value))
    }

    /// Returns the numeric value.
    pub fn get(self) -> u32 {
        self.0
    }
}

impl fmt::Display for SubjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<SubjectId> for u32 {
    fn from(id: SubjectId) -> Self {
        id.0
    }
}

/// The kind of work a subject describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum SubjectType {
    Book,
    Anime,
    Music,
    Game,
    Real,
}

impl SubjectType {
    /// Returns the numeric code used on the wire and in storage.
    pub fn code(self) -> u8 {
        match self {
            SubjectType::Book => 1,
            SubjectType::Anime => 2,
            SubjectType::Music => 3,
            SubjectType::Game => 4,
            SubjectType::Real => 6,
        }
    }
}

impl TryFrom<u8> for SubjectType {
    type Error = String;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        match code {
            1 => Ok(SubjectType::Book),
            2 => Ok(SubjectType::Anime),
            3 => Ok(SubjectType::Music),
            4 => Ok(SubjectType::Game),
            6 => Ok(SubjectType::Real),
            other => Err(format!("unknown subject type: {other}")),
        }
    }
}

impl From<SubjectType> for u8 {
    fn from(value: SubjectType) -> Self {
        value.code()
    }
}

/// A user-contributed tag stored on the subject record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tag {
    pub name: String,
    pub count: u32,
}

impl Tag {
    pub fn new(name: impl Into<String>, count: u32) -> Self {
        Self {
            name: name.into(),
            count,
        }
    }
}

/// A curated meta tag, fetched separately from the subject record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetaTag {
    pub name: String,
    pub count: u32,
}

impl MetaTag {
    pub fn new(name: impl Into<String>, count: u32) -> Self {
        Self {
            name: name.into(),
            count,
        }
    }
}

/// The canonical stored record for a subject.
///
/// A record is either substantive or a redirect stub pointing at the
/// subject it was merged into.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Subject {
    pub id: SubjectId,
    pub subject_type: SubjectType,
    pub name: String,
    pub name_cn: String,
    pub summary: String,
    pub nsfw: bool,
    pub locked: bool,
    /// Air or release date (`YYYY-MM-DD`), if known.
    pub date: Option<String>,
    pub platform: u16,
    pub volumes: u32,
    pub eps: u32,
    pub tags: Vec<Tag>,
    /// Target of a merge. `None` for substantive records.
    pub redirect: Option<SubjectId>,
}

impl Subject {
    /// Creates a substantive record with empty descriptive fields.
    pub fn new(id: SubjectId, subject_type: SubjectType, name: impl Into<String>) -> Self {
        Self {
            id,
            subject_type,
            name: name.into(),
            name_cn: String::new(),
            summary: String::new(),
            nsfw: false,
            locked: false,
            date: None,
            platform: 0,
            volumes: 0,
            eps: 0,
            tags: Vec::new(),
            redirect: None,
        }
    }

    /// Creates a redirect stub pointing at `target`.
    pub fn redirect_stub(id: SubjectId, subject_type: SubjectType, target: SubjectId) -> Self {
        Self {
            redirect: Some(target),
            ..Self::new(id, subject_type, "")
        }
    }

    pub fn with_nsfw(mut self, nsfw: bool) -> Self {
        self.nsfw = nsfw;
        self
    }

    pub fn with_tags(mut self, tags: Vec<Tag>) -> Self {
        self.tags = tags;
        self
    }

    /// Returns true when this record has been merged into another subject.
    pub fn is_redirect(&self) -> bool {
        self.redirect.is_some()
    }
}

/// Episode categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum EpisodeType {
    Normal,
    Special,
    Opening,
    Ending,
    Mad,
    Other,
}

impl EpisodeType {
    pub fn code(self) -> u8 {
        match self {
            EpisodeType::Normal => 0,
            EpisodeType::Special => 1,
            EpisodeType::Opening => 2,
            EpisodeType::Ending => 3,
            EpisodeType::Mad => 4,
            EpisodeType::Other => 6,
        }
    }
}

impl TryFrom<u8> for EpisodeType {
    type Error = String;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        match code {
            0 => Ok(EpisodeType::Normal),
            1 => Ok(EpisodeType::Special),
            2 => Ok(EpisodeType::Opening),
            3 => Ok(EpisodeType::Ending),
            4 => Ok(EpisodeType::Mad),
            6 => Ok(EpisodeType::Other),
            other => Err(format!("unknown episode type: {other}")),
        }
    }
}

impl From<EpisodeType> for u8 {
    fn from(value: EpisodeType) -> Self {
        value.code()
    }
}

/// Filter applied when counting episodes of a subject.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EpisodeFilter {
    /// Only count episodes of this type. `None` counts every type.
    pub episode_type: Option<EpisodeType>,
}

/// Visibility filter passed to the subject reader.
///
/// Derived from the caller's access context. Records that do not pass the
/// filter are indistinguishable from records that do not exist.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SubjectFilter {
    /// Required value of the `nsfw` flag. `None` places no restriction.
    pub nsfw: Option<bool>,
}

impl SubjectFilter {
    /// A filter that lets every record through.
    pub fn unrestricted() -> Self {
        Self { nsfw: None }
    }

    /// Builds the filter for a caller that may or may not see adult content.
    pub fn for_access(allow_nsfw: bool) -> Self {
        if allow_nsfw {
            Self::unrestricted()
        } else {
            Self { nsfw: Some(false) }
        }
    }

    /// Returns true when the record is visible under this filter.
    pub fn allows(&self, subject: &Subject) -> bool {
        self.nsfw.map_or(true, |nsfw| subject.nsfw == nsfw)
    }
}
