use std::collections::BTreeSet;

use chrono::NaiveDateTime;
use proc_macro2::TokenStream;
use quote::{format_ident, quote};
use tracing::info;

use crate::{
    util::{finish, render_block},
    Error, ForeignKeyDef, OutputFile, PlannedMigration, TableAction,
};

pub struct MigrationWriter;

impl MigrationWriter {
    /// Renders a planned migration into a timestamped source file.
    pub fn write(planned: &PlannedMigration, timestamp: NaiveDateTime) -> Result<OutputFile, Error> {
        let file_name = format!(
            "m{}_{}.rs",
            timestamp.format("%Y%m%d_%H%M%S"),
            planned.migration_name
        );
        info!("Generating {}", file_name);

        let blocks = Self::gen_code_blocks(planned)
            .into_iter()
            .map(render_block)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(OutputFile {
            name: file_name,
            content: finish(blocks.join("\n\n")),
        })
    }

    /// Regenerates the migrator `lib.rs` from the migration modules present
    /// in the migration directory, in file name order.
    pub fn write_index_file(modules: &[String]) -> Result<OutputFile, Error> {
        info!("Generating lib.rs");
        let mod_idents: Vec<_> = modules
            .iter()
            .map(|module| format_ident!("{module}"))
            .collect();
        let boxed = mod_idents.iter().map(|module| {
            quote! { Box::new(#module::Migration) }
        });
        let mut code_blocks = vec![quote! { pub use sea_orm_migration::prelude::*; }];
        if !mod_idents.is_empty() {
            code_blocks.push(quote! { #(mod #mod_idents;)* });
        }
        code_blocks.push(quote! { pub struct Migrator; });
        code_blocks.push(quote! {
            #[async_trait::async_trait]
            impl MigratorTrait for Migrator {
                fn migrations() -> Vec<Box<dyn MigrationTrait>> {
                    vec![#(#boxed),*]
                }
            }
        });
        let blocks = code_blocks
            .into_iter()
            .map(render_block)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(OutputFile {
            name: "lib.rs".to_owned(),
            content: finish(blocks.join("\n\n")),
        })
    }

    pub fn gen_code_blocks(planned: &PlannedMigration) -> Vec<TokenStream> {
        let mut code_blocks = vec![
            Self::gen_import(planned),
            Self::gen_migration_struct(),
            Self::gen_impl_migration_trait(planned),
        ];
        code_blocks.extend(Self::gen_iden_enums(planned));
        code_blocks
    }

    fn gen_import(planned: &PlannedMigration) -> TokenStream {
        if Self::guards_foreign_keys(planned) {
            quote! {
                use sea_orm_migration::prelude::*;
                use sea_orm_migration::sea_orm::DbBackend;
            }
        } else {
            quote! {
                use sea_orm_migration::prelude::*;
            }
        }
    }

    fn gen_migration_struct() -> TokenStream {
        quote! {
            #[derive(DeriveMigrationName)]
            pub struct Migration;
        }
    }

    fn gen_impl_migration_trait(planned: &PlannedMigration) -> TokenStream {
        let up = Self::gen_up(planned);
        let down = Self::gen_down(planned);
        quote! {
            #[async_trait::async_trait]
            impl MigrationTrait for Migration {
                async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
                    #up
                }

                async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
                    #down
                }
            }
        }
    }

    fn gen_up(planned: &PlannedMigration) -> TokenStream {
        let table_iden = planned.get_table_iden();
        match planned.action {
            TableAction::Create => {
                let col_defs = planned
                    .columns
                    .iter()
                    .map(|col| col.get_col_def(&table_iden));
                let fk_defs = planned
                    .foreign_keys
                    .iter()
                    .map(|fk| Self::gen_foreign_key_create(planned, fk));
                quote! {
                    manager
                        .create_table(
                            Table::create()
                                .table(#table_iden::Table)
                                .if_not_exists()
                                #(.col(#col_defs))*
                                #(.foreign_key(#fk_defs))*
                                .to_owned(),
                        )
                        .await
                }
            }
            TableAction::AddColumns => {
                let col_defs = planned
                    .columns
                    .iter()
                    .map(|col| col.get_col_def(&table_iden));
                let alter = quote! {
                    manager
                        .alter_table(
                            Table::alter()
                                .table(#table_iden::Table)
                                #(.add_column(#col_defs))*
                                .to_owned(),
                        )
                };
                if planned.foreign_keys.is_empty() {
                    quote! { #alter.await }
                } else {
                    let fk_stmts = planned.foreign_keys.iter().map(|fk| {
                        let fk_def = Self::gen_foreign_key_create(planned, fk);
                        quote! {
                            manager
                                .create_foreign_key(#fk_def.to_owned())
                                .await?;
                        }
                    });
                    quote! {
                        #alter.await?;
                        #(#fk_stmts)*
                        Ok(())
                    }
                }
            }
        }
    }

    fn gen_down(planned: &PlannedMigration) -> TokenStream {
        let table_iden = planned.get_table_iden();
        match planned.action {
            TableAction::Create => quote! {
                manager
                    .drop_table(Table::drop().table(#table_iden::Table).to_owned())
                    .await
            },
            TableAction::AddColumns => {
                let col_drops = planned.columns.iter().map(|col| {
                    let variant = col.get_name_camel_case();
                    quote! { .drop_column(#table_iden::#variant) }
                });
                let alter = quote! {
                    manager
                        .alter_table(
                            Table::alter()
                                .table(#table_iden::Table)
                                #(#col_drops)*
                                .to_owned(),
                        )
                        .await
                };
                if !Self::guards_foreign_keys(planned) {
                    return alter;
                }
                let fk_drops = planned.foreign_keys.iter().map(|fk| {
                    let fk_name = fk.get_name(&planned.table_name);
                    quote! {
                        manager
                            .drop_foreign_key(
                                ForeignKey::drop()
                                    .table(#table_iden::Table)
                                    .name(#fk_name)
                                    .to_owned(),
                            )
                            .await?;
                    }
                });
                quote! {
                    if manager.get_database_backend() != DbBackend::Sqlite {
                        #(#fk_drops)*
                    }
                    #alter
                }
            }
        }
    }

    fn gen_foreign_key_create(planned: &PlannedMigration, fk: &ForeignKeyDef) -> TokenStream {
        let table_iden = planned.get_table_iden();
        let fk_name = fk.get_name(&planned.table_name);
        let column = fk.get_column_camel_case();
        let ref_iden = fk.get_ref_table_camel_case();
        let mut def = quote! {
            ForeignKey::create()
                .name(#fk_name)
                .from(#table_iden::Table, #table_iden::#column)
                .to(#ref_iden::Table, #ref_iden::Id)
        };
        if fk.cascade_delete {
            def = quote! { #def.on_delete(ForeignKeyAction::Cascade) };
        }
        def
    }

    fn gen_iden_enums(planned: &PlannedMigration) -> Vec<TokenStream> {
        let table_iden = planned.get_table_iden();
        let mut variants = Vec::new();
        // A self referencing constraint in an alter needs an Id variant the
        // added columns alone would not provide.
        let needs_id = planned
            .foreign_keys
            .iter()
            .any(|fk| fk.ref_table == planned.table_name)
            && !planned.columns.iter().any(|col| col.name == "id");
        if needs_id {
            variants.push(quote! { Id });
        }
        variants.extend(planned.columns.iter().map(|col| {
            let variant = col.get_name_camel_case();
            if col.is_snake_case_name() {
                quote! { #variant }
            } else {
                let raw = &col.name;
                quote! {
                    #[sea_orm(iden = #raw)]
                    #variant
                }
            }
        }));
        let mut enums = vec![quote! {
            #[derive(DeriveIden)]
            pub enum #table_iden {
                Table,
                #(#variants,)*
            }
        }];
        let mut seen = BTreeSet::new();
        for fk in &planned.foreign_keys {
            if fk.ref_table != planned.table_name && seen.insert(fk.ref_table.as_str()) {
                let ref_iden = fk.get_ref_table_camel_case();
                enums.push(quote! {
                    #[derive(DeriveIden)]
                    pub enum #ref_iden {
                        Table,
                        Id,
                    }
                });
            }
        }
        enums
    }

    fn guards_foreign_keys(planned: &PlannedMigration) -> bool {
        planned.action == TableAction::AddColumns && !planned.foreign_keys.is_empty()
    }
}
