use std::{collections::BTreeMap, fs, path::Path};

use serde::Deserialize;

use super::{FieldDef, RawRelations, Relations};
use crate::Error;

/// Parsed model structure document: model names with their field
/// descriptors, plus the relation declarations connecting them.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ModelStructure {
    pub models: BTreeMap<String, Vec<FieldDef>>,
    pub relations: Relations,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct RawStructure {
    #[serde(default)]
    pub models: BTreeMap<String, Vec<String>>,
    #[serde(default)]
    pub relations: RawRelations,
}

impl ModelStructure {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, Error> {
        let path = path.as_ref();
        let json = fs::read_to_string(path).map_err(|source| Error::StructureFile {
            path: path.to_path_buf(),
            source,
        })?;
        let raw: RawStructure = serde_json::from_str(&json).map_err(|source| Error::Json {
            path: path.to_path_buf(),
            source,
        })?;
        raw.try_into()
    }
}

impl TryFrom<RawStructure> for ModelStructure {
    type Error = Error;

    fn try_from(raw: RawStructure) -> Result<Self, Self::Error> {
        let models = raw
            .models
            .into_iter()
            .map(|(name, descriptors)| {
                let fields = descriptors
                    .iter()
                    .map(|descriptor| {
                        descriptor.parse().map_err(|err| match err {
                            Error::Structure(msg) => {
                                Error::Structure(format!("model `{name}`: {msg}"))
                            }
                            other => other,
                        })
                    })
                    .collect::<Result<Vec<FieldDef>, _>>()?;
                Ok((name, fields))
            })
            .collect::<Result<BTreeMap<_, _>, Error>>()?;
        Ok(Self {
            models,
            relations: raw.relations.into(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::structure::{FieldKind, RelationPair};
    use pretty_assertions::assert_eq;

    fn parse(json: &str) -> Result<ModelStructure, Error> {
        let raw: RawStructure = serde_json::from_str(json).unwrap();
        raw.try_into()
    }

    #[test]
    fn test_parse_document() {
        let structure = parse(
            r#"
            {
                "models": {
                    "Post": ["title:string", "body:text"],
                    "Tag": ["name:string"]
                },
                "relations": {
                    "belongsToMany": [{ "Post": "Tag" }]
                }
            }
            "#,
        )
        .unwrap();

        assert_eq!(structure.models.len(), 2);
        let post = &structure.models["Post"];
        assert_eq!(post[0].name, "title");
        assert_eq!(post[0].kind, FieldKind::String);
        assert_eq!(post[1].kind, FieldKind::Text);
        assert_eq!(
            structure.relations.belongs_to_many,
            vec![RelationPair {
                model: "Post".to_owned(),
                related: "Tag".to_owned(),
            }]
        );
    }

    #[test]
    fn test_relations_key_is_optional() {
        let structure = parse(r#"{ "models": { "Post": ["title:string"] } }"#).unwrap();
        assert_eq!(structure.relations, Relations::default());
    }

    #[test]
    fn test_bad_descriptor_names_the_model() {
        let err = parse(r#"{ "models": { "Post": ["title"] } }"#).unwrap_err();
        assert_eq!(
            err.to_string(),
            "invalid model structure: model `Post`: field descriptor `title` is missing a type"
        );
    }

    #[test]
    fn test_load_missing_file() {
        let err = ModelStructure::load("/no/such/model_structure.json").unwrap_err();
        assert!(matches!(err, Error::StructureFile { .. }));
    }
}
