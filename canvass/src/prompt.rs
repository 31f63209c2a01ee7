//! Saisie interactive d'un lot de statuts

use std::io::{self, BufRead, Write};

use crate::matching::MatchPolicy;
use crate::road::Status;

pub const DELIVERED_PROMPT: &str = "Newly delivered road names, comma separated:";
pub const ARRANGED_PROMPT: &str = "Newly arranged road names, comma separated:";

/// Noms saisis pour un lot, déjà normalisés
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Batch {
    pub delivered: Vec<String>,
    pub arranged: Vec<String>,
}

impl Batch {
    /// Entrées dans l'ordre d'application : distribuées puis arrangées
    pub fn entries(&self) -> impl Iterator<Item = (&str, Status)> {
        self.delivered
            .iter()
            .map(|name| (name.as_str(), Status::Delivered))
            .chain(self.arranged.iter().map(|name| (name.as_str(), Status::Arranged)))
    }

    pub fn is_empty(&self) -> bool {
        self.delivered.is_empty() && self.arranged.is_empty()
    }
}

/// Pose les deux questions et lit une ligne pour chacune
///
/// Une fin d'entrée équivaut à une réponse vide.
pub fn prompt_batch<R: BufRead, W: Write>(
    input: &mut R,
    output: &mut W,
    policy: &MatchPolicy,
) -> io::Result<Batch> {
    let delivered = ask(input, output, DELIVERED_PROMPT)?;
    let arranged = ask(input, output, ARRANGED_PROMPT)?;

    Ok(Batch {
        delivered: policy.split_names(&delivered),
        arranged: policy.split_names(&arranged),
    })
}

fn ask<R: BufRead, W: Write>(input: &mut R, output: &mut W, question: &str) -> io::Result<String> {
    write!(output, "{question}")?;
    output.flush()?;

    let mut line = String::new();
    input.read_line(&mut line)?;
    Ok(line.trim_end_matches(&['\r', '\n'][..]).to_string())
}
