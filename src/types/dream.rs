//! Dream records from the precomputed reference table.

use serde::{Deserialize, Serialize};

/// Tag-list columns carried by every dream record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TagField {
    Emotions,
    Settings,
    Characters,
    Objects,
    Activities,
    Colors,
    Themes,
}

impl TagField {
    /// All tag fields in table column order.
    pub const ALL: [Self; 7] = [
        Self::Emotions,
        Self::Settings,
        Self::Characters,
        Self::Objects,
        Self::Activities,
        Self::Colors,
        Self::Themes,
    ];

    /// Column name in the dream table file.
    pub const fn column(self) -> &'static str {
        match self {
            Self::Emotions => "emotions",
            Self::Settings => "settings",
            Self::Characters => "characters",
            Self::Objects => "objects",
            Self::Activities => "activities",
            Self::Colors => "colors",
            Self::Themes => "themes",
        }
    }
}

impl std::fmt::Display for TagField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.column())
    }
}

/// One row of the dream table.
///
/// Tag lists are ordered as stored but treated as multisets when counting.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct DreamRecord {
    /// Row identifier assigned during preparation (absent in older tables)
    pub dream_id: Option<u64>,
    pub original_text: String,
    pub clean_text: String,
    pub mood_valence: f64,
    pub mood_arousal: f64,
    pub emotions: Vec<String>,
    pub settings: Vec<String>,
    pub characters: Vec<String>,
    pub objects: Vec<String>,
    pub activities: Vec<String>,
    pub colors: Vec<String>,
    pub themes: Vec<String>,
}

impl DreamRecord {
    /// Tags stored under `field`.
    pub fn tags(&self, field: TagField) -> &[String] {
        match field {
            TagField::Emotions => &self.emotions,
            TagField::Settings => &self.settings,
            TagField::Characters => &self.characters,
            TagField::Objects => &self.objects,
            TagField::Activities => &self.activities,
            TagField::Colors => &self.colors,
            TagField::Themes => &self.themes,
        }
    }

    /// Mutable access to the tags stored under `field`.
    pub fn tags_mut(&mut self, field: TagField) -> &mut Vec<String> {
        match field {
            TagField::Emotions => &mut self.emotions,
            TagField::Settings => &mut self.settings,
            TagField::Characters => &mut self.characters,
            TagField::Objects => &mut self.objects,
            TagField::Activities => &mut self.activities,
            TagField::Colors => &mut self.colors,
            TagField::Themes => &mut self.themes,
        }
    }
}
