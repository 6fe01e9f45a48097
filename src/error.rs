use std::{io, path::PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    /// The model structure file could not be read.
    #[error("cannot read model structure `{}`: {source}", path.display())]
    StructureFile { path: PathBuf, source: io::Error },

    /// The model structure file exists but does not parse.
    #[error("malformed JSON in `{}`: {source}", path.display())]
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },

    /// A field or relation declaration that cannot be resolved.
    #[error("invalid model structure: {0}")]
    Structure(String),

    /// The live schema could not be inspected.
    #[error("schema introspection failed: {0}")]
    Introspection(String),

    /// Generated tokens did not form a valid source file.
    #[error("generated source failed to parse: {0}")]
    Render(#[from] syn::Error),

    #[error(transparent)]
    Io(#[from] io::Error),
}
