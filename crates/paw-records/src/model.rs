// model.rs — Durable entities: Animal, Sighting, Report.
//
// Identity rules:
//   - AnimalId is a small positive integer allocated by the store, in
//     insertion order. It never changes.
//   - Sightings and Reports get a random UUID when they are built, before
//     they reach a store.
//
// A Sighting may point at an animal that does not exist yet (someone saw a
// "new face"). That reference is an AnimalRef::Pending carrying its own id,
// so the record never dangles and curators can find it later.

use std::fmt;
use std::num::ParseIntError;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// A string did not name any variant of a closed vocabulary.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown {kind}: {value:?}")]
pub struct UnknownVariant {
    pub kind: &'static str,
    pub value: String,
}

/// Stable identity of a registered animal.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct AnimalId(u64);

impl AnimalId {
    pub fn new(raw: u64) -> Self {
        Self(raw)
    }

    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for AnimalId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for AnimalId {
    type Err = ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().parse::<u64>().map(AnimalId)
    }
}

/// Placeholder identity for a proposed-but-not-yet-registered animal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PendingProfileId(Uuid);

impl PendingProfileId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for PendingProfileId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for PendingProfileId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// What a Sighting is about.
///
/// Serializes as `{"kind": "known", "id": 1}` or
/// `{"kind": "pending", "id": "<uuid>"}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "id", rename_all = "snake_case")]
pub enum AnimalRef {
    /// A registered animal.
    Known(AnimalId),
    /// A new face awaiting curation.
    Pending(PendingProfileId),
}

impl AnimalRef {
    pub fn is_pending(&self) -> bool {
        matches!(self, AnimalRef::Pending(_))
    }
}

impl fmt::Display for AnimalRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AnimalRef::Known(id) => write!(f, "animal {}", id),
            AnimalRef::Pending(id) => write!(f, "pending profile {}", id),
        }
    }
}

/// Sterilization status shown on an animal's profile.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SterilizationStatus {
    #[default]
    Unknown,
    Sterilized,
    NotSterilized,
}

impl SterilizationStatus {
    pub const ALL: [SterilizationStatus; 3] = [
        SterilizationStatus::Unknown,
        SterilizationStatus::Sterilized,
        SterilizationStatus::NotSterilized,
    ];

    /// Wire name (matches the serde representation).
    pub fn key(&self) -> &'static str {
        match self {
            SterilizationStatus::Unknown => "unknown",
            SterilizationStatus::Sterilized => "sterilized",
            SterilizationStatus::NotSterilized => "not_sterilized",
        }
    }

    /// Label shown to campus users.
    pub fn label(&self) -> &'static str {
        match self {
            SterilizationStatus::Unknown => "未知",
            SterilizationStatus::Sterilized => "已绝育",
            SterilizationStatus::NotSterilized => "未绝育",
        }
    }
}

impl fmt::Display for SterilizationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for SterilizationStatus {
    type Err = UnknownVariant;

    /// Accepts either the wire name or the display label.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        Self::ALL
            .into_iter()
            .find(|status| status.key() == s || status.label() == s)
            .ok_or_else(|| UnknownVariant {
                kind: "sterilization status",
                value: s.to_string(),
            })
    }
}

/// A registered stray.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Animal {
    pub id: AnimalId,

    /// Name campus users know it by (e.g., "大黄").
    pub name: String,

    /// Free-text breed/color descriptor (e.g., "橘猫").
    #[serde(default)]
    pub species_tag: String,

    /// Free-text temperament tags (e.g., "亲人、贪吃").
    #[serde(default)]
    pub traits: String,

    #[serde(default)]
    pub sterilization_status: SterilizationStatus,

    #[serde(default)]
    pub description: String,

    /// Opaque media-storage reference for the profile photo.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub photo_ref: Option<String>,

    /// When the profile was registered.
    pub registered_at: DateTime<Utc>,
}

/// An animal profile before the store has assigned it an id.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NewAnimal {
    pub name: String,
    pub species_tag: String,
    pub traits: String,
    pub sterilization_status: SterilizationStatus,
    pub description: String,
    pub photo_ref: Option<String>,
}

impl NewAnimal {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn with_species(mut self, species_tag: impl Into<String>) -> Self {
        self.species_tag = species_tag.into();
        self
    }

    pub fn with_traits(mut self, traits: impl Into<String>) -> Self {
        self.traits = traits.into();
        self
    }

    pub fn with_status(mut self, status: SterilizationStatus) -> Self {
        self.sterilization_status = status;
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_photo(mut self, photo_ref: impl Into<String>) -> Self {
        self.photo_ref = Some(photo_ref.into());
        self
    }

    /// Bind this draft to the identity the store allocated for it.
    pub fn into_animal(self, id: AnimalId, registered_at: DateTime<Utc>) -> Animal {
        Animal {
            id,
            name: self.name,
            species_tag: self.species_tag,
            traits: self.traits,
            sterilization_status: self.sterilization_status,
            description: self.description,
            photo_ref: self.photo_ref,
            registered_at,
        }
    }
}

/// One anonymous observation of an animal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sighting {
    pub id: Uuid,

    pub animal: AnimalRef,

    /// Server time of submission. Never supplied by the client.
    pub timestamp: DateTime<Utc>,

    /// Coarse campus spot (e.g., "图书馆草坪"). Never coordinates.
    pub location_label: String,

    #[serde(default)]
    pub note: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub photo_ref: Option<String>,
}

impl Sighting {
    /// Build a sighting stamped with a fresh id and the current server time.
    pub fn new(
        animal: AnimalRef,
        location_label: impl Into<String>,
        note: impl Into<String>,
        photo_ref: Option<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            animal,
            timestamp: Utc::now(),
            location_label: location_label.into(),
            note: note.into(),
            photo_ref,
        }
    }
}

/// Moderation/welfare flag categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportCategory {
    InjuredOrSick,
    NotSterilized,
    HumanContactIncident,
    InappropriateContent,
    Other,
}

impl ReportCategory {
    pub const ALL: [ReportCategory; 5] = [
        ReportCategory::InjuredOrSick,
        ReportCategory::NotSterilized,
        ReportCategory::HumanContactIncident,
        ReportCategory::InappropriateContent,
        ReportCategory::Other,
    ];

    pub fn key(&self) -> &'static str {
        match self {
            ReportCategory::InjuredOrSick => "injured_or_sick",
            ReportCategory::NotSterilized => "not_sterilized",
            ReportCategory::HumanContactIncident => "human_contact_incident",
            ReportCategory::InappropriateContent => "inappropriate_content",
            ReportCategory::Other => "other",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ReportCategory::InjuredOrSick => "动物受伤/生病",
            ReportCategory::NotSterilized => "未绝育提醒",
            ReportCategory::HumanContactIncident => "人类恶意接触",
            ReportCategory::InappropriateContent => "内容不当",
            ReportCategory::Other => "其他",
        }
    }
}

impl fmt::Display for ReportCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for ReportCategory {
    type Err = UnknownVariant;

    /// Accepts either the wire name or the display label.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        Self::ALL
            .into_iter()
            .find(|category| category.key() == s || category.label() == s)
            .ok_or_else(|| UnknownVariant {
                kind: "report category",
                value: s.to_string(),
            })
    }
}

/// A moderation or welfare flag, optionally about one animal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Report {
    pub id: Uuid,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub animal_id: Option<AnimalId>,

    pub category: ReportCategory,

    /// May be empty: the category alone is actionable.
    #[serde(default)]
    pub detail: String,

    pub timestamp: DateTime<Utc>,
}

impl Report {
    pub fn new(
        category: ReportCategory,
        detail: impl Into<String>,
        animal_id: Option<AnimalId>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            animal_id,
            category,
            detail: detail.into(),
            timestamp: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn animal_ref_serializes_tagged() {
        let known = serde_json::to_string(&AnimalRef::Known(AnimalId::new(7))).unwrap();
        assert_eq!(known, r#"{"kind":"known","id":7}"#);

        let pending = AnimalRef::Pending(PendingProfileId::new());
        let json = serde_json::to_string(&pending).unwrap();
        assert!(json.contains("\"pending\""));
        let restored: AnimalRef = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, pending);
    }

    #[test]
    fn category_parses_key_and_label() {
        assert_eq!(
            "injured_or_sick".parse::<ReportCategory>().unwrap(),
            ReportCategory::InjuredOrSick
        );
        assert_eq!(
            "人类恶意接触".parse::<ReportCategory>().unwrap(),
            ReportCategory::HumanContactIncident
        );
        let err = "spam".parse::<ReportCategory>().unwrap_err();
        assert_eq!(err.value, "spam");
    }

    #[test]
    fn category_serializes_as_snake_case() {
        let json = serde_json::to_string(&ReportCategory::InappropriateContent).unwrap();
        assert_eq!(json, "\"inappropriate_content\"");
    }

    #[test]
    fn sterilization_status_defaults_to_unknown() {
        assert_eq!(SterilizationStatus::default(), SterilizationStatus::Unknown);
        assert_eq!(
            "已绝育".parse::<SterilizationStatus>().unwrap(),
            SterilizationStatus::Sterilized
        );
    }

    #[test]
    fn sighting_ids_are_unique() {
        let a = Sighting::new(AnimalRef::Known(AnimalId::new(1)), "宿舍区", "", None);
        let b = Sighting::new(AnimalRef::Known(AnimalId::new(1)), "宿舍区", "", None);
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn optional_photo_omitted_from_json() {
        let s = Sighting::new(AnimalRef::Known(AnimalId::new(1)), "操场看台", "hi", None);
        let json = serde_json::to_string(&s).unwrap();
        assert!(!json.contains("photo_ref"));
        let restored: Sighting = serde_json::from_str(&json).unwrap();
        assert!(restored.photo_ref.is_none());
    }

    #[test]
    fn animal_id_parses_from_text() {
        assert_eq!(" 12 ".parse::<AnimalId>().unwrap(), AnimalId::new(12));
        assert!("abc".parse::<AnimalId>().is_err());
    }
}
