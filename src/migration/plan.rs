use heck::ToUpperCamelCase;
use proc_macro2::Ident;
use quote::format_ident;

use crate::{
    naming::{self, PivotIdentity},
    Column, Error, FieldDef, FieldKind, SchemaInspector,
};

/// A migration file yet to be rendered: which table it touches, whether it
/// creates or extends it, and the columns and constraints involved.
#[derive(Clone, Debug)]
pub struct PlannedMigration {
    pub(crate) migration_name: String,
    pub(crate) table_name: String,
    pub(crate) action: TableAction,
    pub(crate) columns: Vec<Column>,
    pub(crate) foreign_keys: Vec<ForeignKeyDef>,
}

#[derive(Clone, Debug, PartialEq)]
pub enum TableAction {
    Create,
    AddColumns,
}

#[derive(Clone, Debug)]
pub struct ForeignKeyDef {
    pub(crate) column: String,
    pub(crate) ref_table: String,
    pub(crate) cascade_delete: bool,
}

impl PlannedMigration {
    pub fn migration_name(&self) -> &str {
        &self.migration_name
    }

    pub fn get_table_iden(&self) -> Ident {
        format_ident!("{}", self.table_name.to_upper_camel_case())
    }
}

impl ForeignKeyDef {
    pub fn get_name(&self, table_name: &str) -> String {
        format!("fk-{}-{}", table_name, self.column)
    }

    pub fn get_column_camel_case(&self) -> Ident {
        format_ident!("{}", self.column.to_upper_camel_case())
    }

    pub fn get_ref_table_camel_case(&self) -> Ident {
        format_ident!("{}", self.ref_table.to_upper_camel_case())
    }
}

pub struct MigrationPlanner;

impl MigrationPlanner {
    /// Decides what migration a model needs against the live schema: a
    /// fresh create when its table is absent, an additive alter when only
    /// some declared fields are missing, nothing when the table is up to
    /// date.
    pub fn plan_model(
        model: &str,
        fields: &[FieldDef],
        schema: &impl SchemaInspector,
    ) -> Result<Option<PlannedMigration>, Error> {
        let table_name = naming::table_name(model);
        if !schema.has_table(&table_name)? {
            let mut columns = vec![Column::id()];
            columns.extend(fields.iter().map(Column::from));
            columns.extend(Column::timestamps());
            return Ok(Some(PlannedMigration {
                migration_name: format!("create_{table_name}_table"),
                foreign_keys: Self::foreign_keys_of(fields.iter(), false),
                table_name,
                action: TableAction::Create,
                columns,
            }));
        }

        let mut missing = Vec::new();
        for field in fields {
            if !schema.has_column(&table_name, &field.name)? {
                missing.push(field);
            }
        }
        if missing.is_empty() {
            return Ok(None);
        }
        let field_names = missing
            .iter()
            .map(|field| field.name.as_str())
            .collect::<Vec<_>>()
            .join("_");
        Ok(Some(PlannedMigration {
            migration_name: format!("add_{field_names}_to_{table_name}_table"),
            foreign_keys: Self::foreign_keys_of(missing.iter().copied(), false),
            table_name,
            action: TableAction::AddColumns,
            columns: missing.into_iter().map(Column::from).collect(),
        }))
    }

    /// Plans the create migration for a many to many pair, unless its pivot
    /// table already exists.
    pub fn plan_pivot(
        pivot: &PivotIdentity,
        schema: &impl SchemaInspector,
    ) -> Result<Option<PlannedMigration>, Error> {
        let table_name = pivot.table();
        if schema.has_table(&table_name)? {
            return Ok(None);
        }
        let foreign_key = |column: String, ref_table: String| ForeignKeyDef {
            column,
            ref_table,
            cascade_delete: true,
        };
        Ok(Some(PlannedMigration {
            migration_name: format!("create_{table_name}_table"),
            columns: vec![
                Column::id(),
                Column::foreign_key(&pivot.left_column()),
                Column::foreign_key(&pivot.right_column()),
            ],
            foreign_keys: vec![
                foreign_key(pivot.left_column(), pivot.left_table()),
                foreign_key(pivot.right_column(), pivot.right_table()),
            ],
            table_name,
            action: TableAction::Create,
        }))
    }

    fn foreign_keys_of<'a>(
        fields: impl Iterator<Item = &'a FieldDef>,
        cascade_delete: bool,
    ) -> Vec<ForeignKeyDef> {
        fields
            .filter(|field| field.kind == FieldKind::Foreign)
            .map(|field| ForeignKeyDef {
                column: field.name.clone(),
                ref_table: naming::foreign_key_target(&field.name),
                cascade_delete,
            })
            .collect()
    }
}
