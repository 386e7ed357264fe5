//! Source row and destination document shapes

use serde::{Deserialize, Serialize};

/// Source columns that are never mapped into documents.
///
/// `FirstAppearance` carries corrupted records in the dataset export (the
/// encoding issue could not be resolved with any of the usual codecs), so the
/// column is excluded by name here rather than silently dropped inside a
/// generic cleaning step. [`CharacterRow`] has no field for it, which makes it
/// impossible for the value to reach a [`HeroDocument`].
pub const EXCLUDED_COLUMNS: &[&str] = &["FirstAppearance"];

/// One record of the source character table.
///
/// Deserialized from CSV by header name, not by column position, so a
/// reordered source export cannot silently shift values between fields.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CharacterRow {
    /// Unique character identifier in the source dataset
    #[serde(rename = "ID")]
    pub id: i64,

    /// Character name
    #[serde(rename = "Name")]
    pub name: String,

    /// Public/secret identity status
    #[serde(rename = "Identity")]
    pub identity: String,

    /// Moral alignment (e.g., "Good", "Bad", "Neutral")
    #[serde(rename = "Alignment")]
    pub alignment: String,

    /// Living status
    #[serde(rename = "Status")]
    pub status: String,

    /// Eye color
    #[serde(rename = "EyeColor")]
    pub eye_color: String,

    /// Hair color
    #[serde(rename = "HairColor")]
    pub hair_color: String,

    /// Gender
    #[serde(rename = "Gender")]
    pub gender: String,

    /// Number of comic appearances; absent for some characters
    #[serde(rename = "Appearances")]
    pub appearances: Option<u32>,

    /// Year of introduction; absent for some characters
    #[serde(rename = "Year")]
    pub year: Option<i32>,

    /// Publisher universe (e.g., "Marvel", "DC")
    #[serde(rename = "Universe")]
    pub universe: String,
}

/// Character traits grouped under `attributes` in the destination document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Attributes {
    pub identity: String,
    pub alignment: String,
    pub status: String,
}

/// Appearance traits grouped under `physicalAttributes`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PhysicalAttributes {
    pub eye_color: String,
    pub hair_color: String,
    pub gender: String,
}

/// The unit loaded into the destination collection.
///
/// Insert-only: once written, a document is never updated. The `id` field is
/// covered by a unique index in the destination, so reloading the same batch
/// is a no-op rather than an error.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HeroDocument {
    pub id: i64,
    pub name: String,
    pub attributes: Attributes,
    pub physical_attributes: PhysicalAttributes,
    /// Missing source counts are stored as 0, never null or omitted
    pub appearances_count: u32,
    pub year: Option<i32>,
    pub universe: String,
    /// ISO 8601 calendar date of the run this document was produced by;
    /// identical for every document of one batch
    pub date_migrated: String,
}
