//! Health profile commands.
//!
//! The profile is one JSON document in the key-value store; every edit
//! loads it, changes one thing, and writes it back.

use clap::Subcommand;
use snapcare_core::profile::Severity;
use snapcare_core::{Profile, ProfileSection, ProfileStore};

use super::{open_store, CmdResult};

#[derive(Subcommand)]
pub enum ProfileAction {
    /// Show the profile, or one section of it
    Show {
        /// identification, medical-history, allergies, medications, notifications
        #[arg(long)]
        section: Option<ProfileSection>,
        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },
    /// Set a field by dot-separated key (e.g. "identification.name")
    Set {
        key: String,
        value: String,
    },
    /// Record a diagnosed condition
    AddCondition {
        condition: String,
        /// When it was diagnosed (free text, e.g. "2019")
        #[arg(long, default_value = "")]
        diagnosed: String,
    },
    /// Record an allergy
    AddAllergy {
        allergen: String,
        /// mild, moderate or severe
        #[arg(long, default_value = "mild")]
        severity: Severity,
    },
    /// Record a medication
    AddMedication {
        name: String,
        #[arg(long, default_value = "")]
        dosage: String,
        #[arg(long, default_value = "")]
        frequency: String,
    },
}

pub fn run(action: ProfileAction) -> CmdResult {
    let mut store = ProfileStore::new(open_store()?);

    match action {
        ProfileAction::Show { section, json } => {
            let profile = store.load_or_default()?;
            if json {
                println!("{}", serde_json::to_string_pretty(&profile)?);
            } else {
                let sections = match section {
                    Some(s) => vec![s],
                    None => ProfileSection::ALL.to_vec(),
                };
                print_sections(&profile, &sections);
            }
        }
        ProfileAction::Set { key, value } => {
            store.update(|p| p.set(&key, &value))?;
            println!("ok");
        }
        ProfileAction::AddCondition {
            condition,
            diagnosed,
        } => {
            let id = store.update(|p| Ok(p.add_condition(&condition, &diagnosed)?.id.clone()))?;
            println!("Condition added: {id}");
        }
        ProfileAction::AddAllergy { allergen, severity } => {
            let id = store.update(|p| Ok(p.add_allergy(&allergen, severity)?.id.clone()))?;
            println!("Allergy added: {id}");
        }
        ProfileAction::AddMedication {
            name,
            dosage,
            frequency,
        } => {
            let id =
                store.update(|p| Ok(p.add_medication(&name, &dosage, &frequency)?.id.clone()))?;
            println!("Medication added: {id}");
        }
    }
    Ok(())
}

fn print_sections(profile: &Profile, sections: &[ProfileSection]) {
    for (i, section) in sections.iter().enumerate() {
        if i > 0 {
            println!();
        }
        println!("{}", section.title());
        let rows = profile.rows(*section);
        if rows.is_empty() {
            println!("  (none)");
        }
        for (label, value) in rows {
            println!("  {label}: {value}");
        }
    }
}
