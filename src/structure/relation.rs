use std::collections::BTreeMap;

use serde::Deserialize;

/// Relation declarations of a model structure, flattened to pairs.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Relations {
    pub has_many: Vec<RelationPair>,
    pub belongs_to: Vec<RelationPair>,
    pub belongs_to_many: Vec<RelationPair>,
}

/// A single `{"Model": "Related"}` declaration entry.
#[derive(Clone, Debug, PartialEq)]
pub struct RelationPair {
    pub model: String,
    pub related: String,
}

#[derive(Clone, Debug, Default, Deserialize)]
pub(crate) struct RawRelations {
    #[serde(default, rename = "hasMany")]
    pub has_many: Vec<BTreeMap<String, String>>,
    #[serde(default, rename = "belongsTo")]
    pub belongs_to: Vec<BTreeMap<String, String>>,
    #[serde(default, rename = "belongsToMany")]
    pub belongs_to_many: Vec<BTreeMap<String, String>>,
}

impl Relations {
    /// Models the given model declares a `hasMany` relation towards.
    pub fn children_of<'a>(&'a self, model: &'a str) -> impl Iterator<Item = &'a str> {
        Self::declared_by(&self.has_many, model)
    }

    /// Models the given model declares a `belongsTo` relation towards.
    pub fn parents_of<'a>(&'a self, model: &'a str) -> impl Iterator<Item = &'a str> {
        Self::declared_by(&self.belongs_to, model)
    }

    /// Opposite sides of every `belongsToMany` pair the given model is part
    /// of, whichever side of the declaration it appears on.
    pub fn partners_of<'a>(&'a self, model: &'a str) -> impl Iterator<Item = &'a str> {
        self.belongs_to_many.iter().filter_map(move |pair| {
            if pair.model == model {
                Some(pair.related.as_str())
            } else if pair.related == model {
                Some(pair.model.as_str())
            } else {
                None
            }
        })
    }

    fn declared_by<'a>(
        pairs: &'a [RelationPair],
        model: &'a str,
    ) -> impl Iterator<Item = &'a str> {
        pairs
            .iter()
            .filter(move |pair| pair.model == model)
            .map(|pair| pair.related.as_str())
    }
}

impl From<RawRelations> for Relations {
    fn from(raw: RawRelations) -> Self {
        Self {
            has_many: flatten_pairs(raw.has_many),
            belongs_to: flatten_pairs(raw.belongs_to),
            belongs_to_many: flatten_pairs(raw.belongs_to_many),
        }
    }
}

fn flatten_pairs(entries: Vec<BTreeMap<String, String>>) -> Vec<RelationPair> {
    entries
        .into_iter()
        .flat_map(|entry| {
            entry
                .into_iter()
                .map(|(model, related)| RelationPair { model, related })
        })
        .collect()
}
