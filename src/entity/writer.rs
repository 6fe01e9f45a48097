use proc_macro2::TokenStream;
use quote::quote;
use syn::{punctuated::Punctuated, token::Comma};
use tracing::info;

use crate::{
    util::{finish, render_block},
    Entity, Error,
};

#[derive(Clone, Debug)]
pub struct EntityWriter {
    pub(crate) entities: Vec<Entity>,
    pub(crate) pivots: Vec<Entity>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct OutputFile {
    pub name: String,
    pub content: String,
}

impl EntityWriter {
    pub fn entities(&self) -> &[Entity] {
        &self.entities
    }

    pub fn pivots(&self) -> &[Entity] {
        &self.pivots
    }

    /// Renders one source file per model entity.
    pub fn write_entities(&self) -> Result<Vec<OutputFile>, Error> {
        self.entities.iter().map(Self::write_entity_file).collect()
    }

    /// Renders one source file per pivot entity.
    pub fn write_pivot_entities(&self) -> Result<Vec<OutputFile>, Error> {
        self.pivots.iter().map(Self::write_entity_file).collect()
    }

    /// The `mod.rs` tying every generated entity module together.
    pub fn write_index_file(&self) -> Result<OutputFile, Error> {
        let mut lines = Vec::new();
        Self::write_doc_comment(&mut lines);
        lines.push(render_block(quote! { pub mod prelude; })?);
        lines.push("".to_owned());
        for entity in self.entities.iter().chain(&self.pivots) {
            lines.push(render_block(Self::gen_mod(entity))?);
        }
        Ok(OutputFile {
            name: "mod.rs".to_owned(),
            content: finish(lines.join("\n")),
        })
    }

    pub fn write_prelude(&self) -> Result<OutputFile, Error> {
        let mut lines = Vec::new();
        Self::write_doc_comment(&mut lines);
        for entity in self.entities.iter().chain(&self.pivots) {
            lines.push(render_block(Self::gen_prelude_use(entity))?);
        }
        Ok(OutputFile {
            name: "prelude.rs".to_owned(),
            content: finish(lines.join("\n")),
        })
    }

    fn write_entity_file(entity: &Entity) -> Result<OutputFile, Error> {
        let entity_file = format!("{}.rs", entity.get_table_name_snake_case());
        info!("Generating {}", entity_file);

        let mut lines = Vec::new();
        Self::write_doc_comment(&mut lines);
        Self::write(&mut lines, Self::gen_code_blocks(entity))?;
        Ok(OutputFile {
            name: entity_file,
            content: finish(lines.join("\n")),
        })
    }

    pub fn write(lines: &mut Vec<String>, code_blocks: Vec<TokenStream>) -> Result<(), Error> {
        let blocks = code_blocks
            .into_iter()
            .map(render_block)
            .collect::<Result<Vec<_>, _>>()?;
        lines.push(blocks.join("\n\n"));
        Ok(())
    }

    pub fn write_doc_comment(lines: &mut Vec<String>) {
        let ver = env!("CARGO_PKG_VERSION");
        lines.push(format!("//! `SeaORM` Entity. Generated by sea-scaffold {ver}"));
        lines.push("".to_owned());
    }

    pub fn gen_code_blocks(entity: &Entity) -> Vec<TokenStream> {
        let mut code_blocks = vec![
            Self::gen_import(),
            Self::gen_compact_model_struct(entity),
            Self::gen_compact_relation_enum(entity),
        ];
        code_blocks.extend(Self::gen_impl_related(entity));
        code_blocks.extend(Self::gen_impl_conjunct_related(entity));
        code_blocks.push(Self::gen_impl_active_model_behavior());
        code_blocks
    }

    pub fn gen_import() -> TokenStream {
        quote! {
            use sea_orm::entity::prelude::*;
        }
    }

    pub fn gen_compact_model_struct(entity: &Entity) -> TokenStream {
        let table_name = entity.table_name.as_str();
        let column_names_snake_case = entity.get_column_names_snake_case();
        let column_rs_types = entity.get_column_rs_types();
        let if_eq_needed = entity.get_eq_needed();
        let attrs: Vec<TokenStream> = entity
            .columns
            .iter()
            .map(|col| {
                let mut attrs: Punctuated<_, Comma> = Punctuated::new();
                if !col.is_snake_case_name() {
                    let column_name = &col.name;
                    attrs.push(quote! { column_name = #column_name });
                }
                if col.primary_key {
                    attrs.push(quote! { primary_key });
                    if !col.auto_increment {
                        attrs.push(quote! { auto_increment = false });
                    }
                }
                if let Some(ts) = col.get_col_type_attrs() {
                    attrs.extend([ts]);
                    if col.is_nullable() {
                        attrs.push(quote! { nullable });
                    }
                }
                if col.is_unique() {
                    attrs.push(quote! { unique });
                }
                if !attrs.is_empty() {
                    let mut ts = TokenStream::new();
                    for (i, attr) in attrs.into_iter().enumerate() {
                        if i > 0 {
                            ts = quote! { #ts, };
                        }
                        ts = quote! { #ts #attr };
                    }
                    quote! {
                        #[sea_orm(#ts)]
                    }
                } else {
                    TokenStream::new()
                }
            })
            .collect();

        quote! {
            #[derive(Clone, Debug, PartialEq, DeriveEntityModel #if_eq_needed)]
            #[sea_orm(table_name = #table_name)]
            pub struct Model {
                #(
                    #attrs
                    pub #column_names_snake_case: #column_rs_types,
                )*
            }
        }
    }

    pub fn gen_compact_relation_enum(entity: &Entity) -> TokenStream {
        let relation_enum_name = entity.get_relation_enum_name();
        let attrs = entity.get_relation_attrs();
        quote! {
            #[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
            pub enum Relation {
                #(
                    #attrs
                    #relation_enum_name,
                )*
            }
        }
    }

    pub fn gen_impl_related(entity: &Entity) -> Vec<TokenStream> {
        entity
            .relations
            .iter()
            // A conjunct impl for the same target supersedes the plain one.
            .filter(|rel| {
                !entity
                    .conjunct_relations
                    .iter()
                    .any(|conjunct| conjunct.to == rel.ref_table)
            })
            .map(|rel| {
                let enum_name = rel.get_ref_table_camel_case();
                let module_name = rel.get_ref_table_snake_case();
                quote! {
                    impl Related<super::#module_name::Entity> for Entity {
                        fn to() -> RelationDef {
                            Relation::#enum_name.def()
                        }
                    }
                }
            })
            .collect()
    }

    pub fn gen_impl_conjunct_related(entity: &Entity) -> Vec<TokenStream> {
        let table_name_camel_case = entity.get_table_name_camel_case_ident();
        let via_snake_case = entity.get_conjunct_relations_via_snake_case();
        let to_snake_case = entity.get_conjunct_relations_to_snake_case();
        let to_camel_case = entity.get_conjunct_relations_to_camel_case();
        via_snake_case
            .into_iter()
            .zip(to_snake_case)
            .zip(to_camel_case)
            .map(|((via_snake_case, to_snake_case), to_camel_case)| {
                quote! {
                    impl Related<super::#to_snake_case::Entity> for Entity {
                        fn to() -> RelationDef {
                            super::#via_snake_case::Relation::#to_camel_case.def()
                        }

                        fn via() -> Option<RelationDef> {
                            Some(super::#via_snake_case::Relation::#table_name_camel_case.def().rev())
                        }
                    }
                }
            })
            .collect()
    }

    pub fn gen_impl_active_model_behavior() -> TokenStream {
        quote! {
            impl ActiveModelBehavior for ActiveModel {}
        }
    }

    pub fn gen_mod(entity: &Entity) -> TokenStream {
        let table_name_snake_case_ident = entity.get_table_name_snake_case_ident();
        quote! {
            pub mod #table_name_snake_case_ident;
        }
    }

    pub fn gen_prelude_use(entity: &Entity) -> TokenStream {
        let table_name_snake_case_ident = entity.get_table_name_snake_case_ident();
        let table_name_camel_case_ident = entity.get_table_name_camel_case_ident();
        quote! {
            pub use super::#table_name_snake_case_ident::Entity as #table_name_camel_case_ident;
        }
    }
}
