//! Politique de normalisation des noms saisis par l'utilisateur
//!
//! Les noms stockés viennent d'OSM et sont supposés en « Title Case ». La
//! saisie libre est donc découpée sur les virgules, rognée puis mise en
//! Title Case avant la comparaison exacte avec les noms stockés. Les deux
//! transformations sont configurables.

use serde::{Deserialize, Serialize};

/// Rognage des espaces autour de chaque nom saisi
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrimMode {
    /// Aucun rognage
    None,
    /// Espaces de tête uniquement
    #[default]
    Leading,
    /// Espaces de tête et de fin
    Both,
}

/// Règles appliquées à la saisie avant recherche du nom
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchPolicy {
    pub trim: TrimMode,
    pub title_case: bool,
}

impl Default for MatchPolicy {
    fn default() -> Self {
        Self {
            trim: TrimMode::Leading,
            title_case: true,
        }
    }
}

impl MatchPolicy {
    /// Politique neutre : le nom est comparé tel quel
    pub fn exact() -> Self {
        Self {
            trim: TrimMode::None,
            title_case: false,
        }
    }

    /// Normalise un nom saisi
    pub fn normalize(&self, raw: &str) -> String {
        let trimmed = match self.trim {
            TrimMode::None => raw,
            TrimMode::Leading => raw.trim_start(),
            TrimMode::Both => raw.trim(),
        };

        if self.title_case {
            title_case(trimmed)
        } else {
            trimmed.to_string()
        }
    }

    /// Découpe une ligne « a, b, c » en noms normalisés, entrées vides ignorées
    pub fn split_names(&self, line: &str) -> Vec<String> {
        line.split(',')
            .filter(|part| !part.trim().is_empty())
            .map(|part| self.normalize(part))
            .collect()
    }
}

/// Met en majuscule la première lettre de chaque mot, le reste en minuscules
///
/// Un mot commence en début de chaîne, après un espace ou après un tiret.
/// Apostrophes et chiffres restent dans le mot : `king's road` donne
/// `King's Road`, `church-lane 2nd` donne `Church-Lane 2nd`.
pub fn title_case(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut word_start = true;

    for c in s.chars() {
        if c.is_alphabetic() {
            if word_start {
                out.extend(c.to_uppercase());
            } else {
                out.extend(c.to_lowercase());
            }
            word_start = false;
        } else {
            out.push(c);
            if c.is_whitespace() || c == '-' {
                word_start = true;
            } else if c.is_alphanumeric() || c == '\'' || c == '\u{2019}' {
                word_start = false;
            }
        }
    }

    out
}
