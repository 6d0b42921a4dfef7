//! Languages a finding template can be translated into.

use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(
    Debug, Clone, Copy, Serialize, Deserialize, sqlx::Type, PartialEq, Eq, PartialOrd, Ord, Hash,
)]
#[sqlx(type_name = "language_code")]
pub enum Language {
    #[sqlx(rename = "en")]
    #[serde(rename = "en")]
    English,
    #[sqlx(rename = "es")]
    #[serde(rename = "es")]
    Spanish,
    #[sqlx(rename = "fr")]
    #[serde(rename = "fr")]
    French,
    #[sqlx(rename = "de")]
    #[serde(rename = "de")]
    German,
    #[sqlx(rename = "it")]
    #[serde(rename = "it")]
    Italian,
    #[sqlx(rename = "pt")]
    #[serde(rename = "pt")]
    Portuguese,
}

impl Language {
    pub const ALL: [Language; 6] = [
        Self::English,
        Self::Spanish,
        Self::French,
        Self::German,
        Self::Italian,
        Self::Portuguese,
    ];

    /// Two-letter code used in URLs and storage.
    pub fn code(&self) -> &'static str {
        match self {
            Self::English => "en",
            Self::Spanish => "es",
            Self::French => "fr",
            Self::German => "de",
            Self::Italian => "it",
            Self::Portuguese => "pt",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::English => "English",
            Self::Spanish => "Spanish",
            Self::French => "French",
            Self::German => "German",
            Self::Italian => "Italian",
            Self::Portuguese => "Portuguese",
        }
    }

    /// Languages from [`Language::ALL`] that are not in `taken`, in declaration order.
    pub fn remaining(taken: &[Language]) -> Vec<Language> {
        Self::ALL
            .into_iter()
            .filter(|lang| !taken.contains(lang))
            .collect()
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}
