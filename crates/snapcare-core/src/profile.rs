//! User health profile.
//!
//! One JSON document under [`PROFILE_KEY`]. The profile screen shows it one
//! section at a time as label/value rows.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{Result, ValidationError};
use crate::storage::json_path;
use crate::storage::kv::{load_json, save_json, KvStore};

pub const PROFILE_KEY: &str = "profile";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Identification {
    pub name: String,
    pub email: String,
    pub date_of_birth: String,
    pub gender: String,
    pub blood_type: String,
    pub height: String,
    pub weight: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Condition {
    pub id: String,
    pub condition: String,
    /// Free text, usually a year.
    pub diagnosed: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Mild,
    Moderate,
    Severe,
}

impl FromStr for Severity {
    type Err = ValidationError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "mild" => Ok(Severity::Mild),
            "moderate" => Ok(Severity::Moderate),
            "severe" => Ok(Severity::Severe),
            other => Err(ValidationError::InvalidValue {
                field: "severity".into(),
                message: format!("'{other}' is not mild, moderate or severe"),
            }),
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Severity::Mild => "Mild",
            Severity::Moderate => "Moderate",
            Severity::Severe => "Severe",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Allergy {
    pub id: String,
    pub allergen: String,
    pub severity: Severity,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Medication {
    pub id: String,
    pub name: String,
    pub dosage: String,
    /// Free text such as "Once daily" or "As needed".
    pub frequency: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NotificationPrefs {
    pub medication_reminders: bool,
    pub appointment_reminders: bool,
}

impl Default for NotificationPrefs {
    fn default() -> Self {
        Self {
            medication_reminders: true,
            appointment_reminders: true,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Profile {
    pub identification: Identification,
    pub medical_history: Vec<Condition>,
    pub allergies: Vec<Allergy>,
    pub medications: Vec<Medication>,
    pub notifications: NotificationPrefs,
}

/// Tabs of the profile screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProfileSection {
    Identification,
    MedicalHistory,
    Allergies,
    Medications,
    Notifications,
}

impl ProfileSection {
    pub const ALL: [ProfileSection; 5] = [
        ProfileSection::Identification,
        ProfileSection::MedicalHistory,
        ProfileSection::Allergies,
        ProfileSection::Medications,
        ProfileSection::Notifications,
    ];

    pub fn title(&self) -> &'static str {
        match self {
            ProfileSection::Identification => "Identification",
            ProfileSection::MedicalHistory => "Medical History",
            ProfileSection::Allergies => "Allergies",
            ProfileSection::Medications => "Medications",
            ProfileSection::Notifications => "Notifications",
        }
    }
}

impl FromStr for ProfileSection {
    type Err = ValidationError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "identification" => Ok(ProfileSection::Identification),
            "medical_history" => Ok(ProfileSection::MedicalHistory),
            "allergies" => Ok(ProfileSection::Allergies),
            "medications" => Ok(ProfileSection::Medications),
            "notifications" => Ok(ProfileSection::Notifications),
            other => Err(ValidationError::InvalidValue {
                field: "section".into(),
                message: format!("unknown profile section '{other}'"),
            }),
        }
    }
}

fn on_off(flag: bool) -> String {
    if flag { "On" } else { "Off" }.to_string()
}

fn new_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

fn required(field: &str, value: &str) -> std::result::Result<String, ValidationError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(ValidationError::EmptyField(field.into()));
    }
    Ok(value.to_string())
}

impl Profile {
    /// Label/value rows for one section, in display order.
    pub fn rows(&self, section: ProfileSection) -> Vec<(String, String)> {
        match section {
            ProfileSection::Identification => {
                let id = &self.identification;
                [
                    ("Name", &id.name),
                    ("Email", &id.email),
                    ("Date of Birth", &id.date_of_birth),
                    ("Gender", &id.gender),
                    ("Blood Type", &id.blood_type),
                    ("Height", &id.height),
                    ("Weight", &id.weight),
                ]
                .into_iter()
                .map(|(label, value)| (label.to_string(), value.clone()))
                .collect()
            }
            ProfileSection::MedicalHistory => self
                .medical_history
                .iter()
                .map(|c| (c.condition.clone(), format!("Diagnosed {}", c.diagnosed)))
                .collect(),
            ProfileSection::Allergies => self
                .allergies
                .iter()
                .map(|a| (a.allergen.clone(), a.severity.to_string()))
                .collect(),
            ProfileSection::Medications => self
                .medications
                .iter()
                .map(|m| (m.name.clone(), format!("{}, {}", m.dosage, m.frequency)))
                .collect(),
            ProfileSection::Notifications => vec![
                (
                    "Medication reminders".to_string(),
                    on_off(self.notifications.medication_reminders),
                ),
                (
                    "Appointment reminders".to_string(),
                    on_off(self.notifications.appointment_reminders),
                ),
            ],
        }
    }

    /// Set a scalar field by dot path, e.g. `identification.name`.
    pub fn set(&mut self, key: &str, value: &str) -> std::result::Result<(), ValidationError> {
        let mut json = serde_json::to_value(&*self).map_err(|e| ValidationError::InvalidValue {
            field: key.to_string(),
            message: e.to_string(),
        })?;
        json_path::set(&mut json, key, value)?;
        *self = serde_json::from_value(json).map_err(|e| ValidationError::InvalidValue {
            field: key.to_string(),
            message: e.to_string(),
        })?;
        Ok(())
    }

    pub fn add_condition(
        &mut self,
        condition: &str,
        diagnosed: &str,
    ) -> std::result::Result<&Condition, ValidationError> {
        self.medical_history.push(Condition {
            id: new_id(),
            condition: required("condition", condition)?,
            diagnosed: diagnosed.trim().to_string(),
        });
        Ok(&self.medical_history[self.medical_history.len() - 1])
    }

    pub fn add_allergy(
        &mut self,
        allergen: &str,
        severity: Severity,
    ) -> std::result::Result<&Allergy, ValidationError> {
        self.allergies.push(Allergy {
            id: new_id(),
            allergen: required("allergen", allergen)?,
            severity,
        });
        Ok(&self.allergies[self.allergies.len() - 1])
    }

    pub fn add_medication(
        &mut self,
        name: &str,
        dosage: &str,
        frequency: &str,
    ) -> std::result::Result<&Medication, ValidationError> {
        self.medications.push(Medication {
            id: new_id(),
            name: required("name", name)?,
            dosage: dosage.trim().to_string(),
            frequency: frequency.trim().to_string(),
        });
        Ok(&self.medications[self.medications.len() - 1])
    }
}

pub struct ProfileStore<S> {
    store: S,
}

impl<S: KvStore> ProfileStore<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Stored profile, or an empty one. An unreadable document is logged
    /// and replaced by the default in memory (the stored copy is left alone
    /// until the next save).
    pub fn load_or_default(&self) -> Result<Profile> {
        match load_json::<Profile, _>(&self.store, PROFILE_KEY) {
            Ok(profile) => Ok(profile.unwrap_or_default()),
            Err(crate::error::StorageError::CorruptBlob { message, .. }) => {
                tracing::warn!(%message, "stored profile is unreadable, using defaults");
                Ok(Profile::default())
            }
            Err(e) => Err(e.into()),
        }
    }

    pub fn save(&mut self, profile: &Profile) -> Result<()> {
        save_json(&mut self.store, PROFILE_KEY, profile)?;
        tracing::debug!("profile saved");
        Ok(())
    }

    /// Load, apply `edit`, save.
    pub fn update<T>(
        &mut self,
        edit: impl FnOnce(&mut Profile) -> std::result::Result<T, ValidationError>,
    ) -> Result<T> {
        let mut profile = self.load_or_default()?;
        let out = edit(&mut profile)?;
        self.save(&profile)?;
        Ok(out)
    }
}
