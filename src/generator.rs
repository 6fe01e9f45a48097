use std::collections::BTreeSet;

use chrono::{Duration, NaiveDateTime};
use rand::Rng;

use crate::{
    naming::PivotIdentity, EntityTransformer, Error, MigrationPlanner, MigrationWriter,
    ModelStructure, OutputFile, SchemaInspector,
};

/// How the caller's file layer should apply a produced file.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WritePolicy {
    /// Write unconditionally, replacing any existing file.
    Overwrite,
    /// Leave an already existing file untouched.
    SkipIfExists,
}

/// A produced source file paired with its write policy.
#[derive(Clone, Debug, PartialEq)]
pub struct ScaffoldFile {
    pub name: String,
    pub content: String,
    pub policy: WritePolicy,
}

impl ScaffoldFile {
    fn new(file: OutputFile, policy: WritePolicy) -> Self {
        Self {
            name: file.name,
            content: file.content,
            policy,
        }
    }
}

/// Everything one run produces. Entity files belong in the entity directory
/// and migration files in the migration directory. Before the migration
/// files are applied, existing migrations whose file name contains an entry
/// of `purged_migrations` must be deleted, so a re-run replaces its own
/// output instead of accumulating duplicates.
#[derive(Clone, Debug, Default)]
pub struct ScaffoldOutput {
    pub entities: Vec<ScaffoldFile>,
    pub migrations: Vec<ScaffoldFile>,
    pub purged_migrations: Vec<String>,
}

pub struct Generator;

impl Generator {
    /// Runs the full pipeline: an entity file per model, create or alter
    /// migrations diffed against `schema`, and a pivot table and entity per
    /// unique many to many pair. Pivot migrations are stamped 1 to 60
    /// seconds after `now` so they sort behind the model migrations of the
    /// same run.
    pub fn generate(
        structure: &ModelStructure,
        schema: &impl SchemaInspector,
        now: NaiveDateTime,
        rng: &mut impl Rng,
    ) -> Result<ScaffoldOutput, Error> {
        let writer = EntityTransformer::transform(structure);

        let mut entities = Vec::new();
        for file in writer.write_entities()? {
            entities.push(ScaffoldFile::new(file, WritePolicy::Overwrite));
        }
        for file in writer.write_pivot_entities()? {
            entities.push(ScaffoldFile::new(file, WritePolicy::SkipIfExists));
        }
        entities.push(ScaffoldFile::new(
            writer.write_index_file()?,
            WritePolicy::Overwrite,
        ));
        entities.push(ScaffoldFile::new(
            writer.write_prelude()?,
            WritePolicy::Overwrite,
        ));

        let mut migrations = Vec::new();
        let mut purged_migrations = Vec::new();
        for (model, fields) in &structure.models {
            if let Some(planned) = MigrationPlanner::plan_model(model, fields, schema)? {
                purged_migrations.push(planned.migration_name().to_owned());
                migrations.push(ScaffoldFile::new(
                    MigrationWriter::write(&planned, now)?,
                    WritePolicy::Overwrite,
                ));
            }
        }

        let mut seen = BTreeSet::new();
        for pair in &structure.relations.belongs_to_many {
            let pivot = PivotIdentity::new(&pair.model, &pair.related);
            if !seen.insert(pivot.table()) {
                continue;
            }
            // Purged even when the pivot table exists, so files left from
            // earlier runs go away.
            purged_migrations.push(pivot.table());
            if let Some(planned) = MigrationPlanner::plan_pivot(&pivot, schema)? {
                let stamp = now + Duration::seconds(rng.gen_range(1..=60));
                migrations.push(ScaffoldFile::new(
                    MigrationWriter::write(&planned, stamp)?,
                    WritePolicy::Overwrite,
                ));
            }
        }

        Ok(ScaffoldOutput {
            entities,
            migrations,
            purged_migrations,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{structure::RawStructure, SchemaSnapshot};
    use chrono::NaiveDate;
    use rand::{rngs::StdRng, SeedableRng};

    fn structure(json: &str) -> ModelStructure {
        serde_json::from_str::<RawStructure>(json)
            .unwrap()
            .try_into()
            .unwrap()
    }

    fn now() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 1, 15)
            .unwrap()
            .and_hms_opt(12, 30, 45)
            .unwrap()
    }

    #[test]
    fn test_generate_model_artifacts() {
        let structure = structure(
            r#"{"models": {"Post": ["title:string", "body:text"]}, "relations": {}}"#,
        );
        let output = Generator::generate(
            &structure,
            &SchemaSnapshot::new(),
            now(),
            &mut StdRng::seed_from_u64(7),
        )
        .unwrap();

        let names: Vec<_> = output.entities.iter().map(|file| file.name.as_str()).collect();
        assert_eq!(names, ["posts.rs", "mod.rs", "prelude.rs"]);
        assert!(output
            .entities
            .iter()
            .all(|file| file.policy == WritePolicy::Overwrite));
        assert!(output.entities[0].content.contains("pub title: String"));
        assert!(output.entities[0].content.contains("pub body: String"));

        assert_eq!(output.migrations.len(), 1);
        assert_eq!(
            output.migrations[0].name,
            "m20240115_123045_create_posts_table.rs"
        );
        assert_eq!(output.purged_migrations, ["create_posts_table"]);
    }

    #[test]
    fn test_generate_pivot_artifacts() {
        let structure = structure(
            r#"{
                "models": {"Post": ["title:string"], "Tag": ["name:string"]},
                "relations": {"belongsToMany": [{"Post": "Tag"}, {"Tag": "Post"}]}
            }"#,
        );
        let output = Generator::generate(
            &structure,
            &SchemaSnapshot::new(),
            now(),
            &mut StdRng::seed_from_u64(7),
        )
        .unwrap();

        let pivot_entity = output
            .entities
            .iter()
            .find(|file| file.name == "post_tag.rs")
            .unwrap();
        assert_eq!(pivot_entity.policy, WritePolicy::SkipIfExists);

        // One pivot migration for the flipped duplicate declarations, stamped
        // after the model migrations.
        assert_eq!(output.migrations.len(), 3);
        let pivot_migration = &output.migrations[2];
        assert!(pivot_migration.name.ends_with("_create_post_tag_table.rs"));
        assert!(pivot_migration.name.as_str() > "m20240115_123045_");
        assert_eq!(
            output.purged_migrations,
            ["create_posts_table", "create_tags_table", "post_tag"]
        );
    }

    #[test]
    fn test_generate_purges_pivot_even_when_table_exists() {
        let structure = structure(
            r#"{
                "models": {"Post": ["title:string"], "Tag": ["name:string"]},
                "relations": {"belongsToMany": [{"Post": "Tag"}]}
            }"#,
        );
        let mut schema = SchemaSnapshot::new();
        schema.add_table("posts", ["id", "title", "created_at", "updated_at"]);
        schema.add_table("tags", ["id", "name", "created_at", "updated_at"]);
        schema.add_table("post_tag", ["id", "post_id", "tag_id"]);
        let output = Generator::generate(
            &structure,
            &schema,
            now(),
            &mut StdRng::seed_from_u64(7),
        )
        .unwrap();

        assert!(output.migrations.is_empty());
        assert_eq!(output.purged_migrations, ["post_tag"]);
        assert!(output
            .entities
            .iter()
            .any(|file| file.name == "post_tag.rs"));
    }

    #[test]
    fn test_generate_alter_only_missing_columns() {
        let structure = structure(
            r#"{"models": {"User": ["name:string", "email:string"]}, "relations": {}}"#,
        );
        let mut schema = SchemaSnapshot::new();
        schema.add_table("users", ["id", "name"]);
        let output = Generator::generate(
            &structure,
            &schema,
            now(),
            &mut StdRng::seed_from_u64(7),
        )
        .unwrap();

        assert_eq!(output.migrations.len(), 1);
        assert_eq!(
            output.migrations[0].name,
            "m20240115_123045_add_email_to_users_table.rs"
        );
        assert_eq!(output.purged_migrations, ["add_email_to_users_table"]);
    }
}
