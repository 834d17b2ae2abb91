//! Daily programme grid.
//!
//! Slots are given in whole hours.  A slot whose `end_hour` is lower than
//! its `start_hour` wraps past midnight; `end_hour = 0` or `24` means
//! midnight.  Slots may overlap, in which case the one listed last wins.

use std::path::Path;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgrammeSlot {
    /// Human label, e.g. "7h - 13h".
    pub label: String,
    pub start_hour: u8,
    pub end_hour: u8,
    pub title: String,
    #[serde(default)]
    pub items: Vec<String>,
}

impl ProgrammeSlot {
    pub fn contains_hour(&self, hour: u8) -> bool {
        let hour = hour % 24;
        let start = self.start_hour % 24;
        let end = self.end_hour % 24;
        if start == end {
            return true;
        }
        if start < end {
            (start..end).contains(&hour)
        } else {
            hour >= start || hour < end
        }
    }
}

/// The slot on air at `hour` (0–23).
pub fn slot_at(slots: &[ProgrammeSlot], hour: u8) -> Option<&ProgrammeSlot> {
    slots.iter().rev().find(|slot| slot.contains_hour(hour))
}

fn slot(label: &str, start_hour: u8, end_hour: u8, title: &str, items: &[&str]) -> ProgrammeSlot {
    ProgrammeSlot {
        label: label.to_string(),
        start_hour,
        end_hour,
        title: title.to_string(),
        items: items.iter().map(|s| s.to_string()).collect(),
    }
}

pub fn default_schedule() -> Vec<ProgrammeSlot> {
    vec![
        slot(
            "7h - 13h",
            7,
            13,
            "« Dieu tu es mon Dieu je te cherche dès l'aube »",
            &[
                "7h : Prière de l'angélus",
                "Chapelet - Mystères Joyeux",
                "Le Saint du jour",
                "L'Évangile du jour",
                "12h : Prière de l'angélus",
                "Mystères douloureux",
            ],
        ),
        slot(
            "13h - 00h",
            13,
            0,
            "« Louez le Seigneur »",
            &[
                "Une journée de louange non-stop",
                "15h : Chapelet à la miséricorde divine",
                "18h : Les mystères glorieux",
                "Vendredi 10h - 15h : Aux pieds de la croix avec Jésus",
                "Vendredi 14h30 : Le chemin de croix",
                "Samedi 10h - 15h : Le samedi de la Vierge Marie",
                "Dimanche 10h - 15h : Les plus beaux cantiques liturgiques",
            ],
        ),
        slot(
            "22h - 1h",
            22,
            1,
            "Live TikTok / Twitch / Discord",
            &["La libre antenne", "22h : Psaumes des complies"],
        ),
        slot(
            "1h - 7h",
            1,
            7,
            "Heaven Night",
            &[
                "3h : Chapelet à la miséricorde divine",
                "5h : Les mystères lumineux",
                "Ambiance nocturne spirituelle",
            ],
        ),
    ]
}

// ── TOML loader ───────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
struct TomlScheduleFile {
    slot: Vec<ProgrammeSlot>,
}

pub fn load_schedule_from_toml(path: &Path) -> anyhow::Result<Vec<ProgrammeSlot>> {
    let content = std::fs::read_to_string(path)?;
    parse_schedule_from_toml_str(&content)
}

pub fn parse_schedule_from_toml_str(content: &str) -> anyhow::Result<Vec<ProgrammeSlot>> {
    let file: TomlScheduleFile = toml::from_str(content)?;
    if let Some(bad) = file
        .slot
        .iter()
        .find(|s| s.start_hour > 24 || s.end_hour > 24)
    {
        anyhow::bail!("slot '{}' has an hour outside 0-24", bad.label);
    }
    Ok(file.slot)
}

/// The configured schedule file when present and valid, otherwise the
/// built-in grid.
pub fn load_schedule(path: &Path) -> Vec<ProgrammeSlot> {
    if !path.exists() {
        return default_schedule();
    }
    match load_schedule_from_toml(path) {
        Ok(slots) if !slots.is_empty() => slots,
        Ok(_) => default_schedule(),
        Err(e) => {
            tracing::warn!("ignoring schedule file {:?}: {}", path, e);
            default_schedule()
        }
    }
}
