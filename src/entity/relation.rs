use heck::{ToSnakeCase, ToUpperCamelCase};
use proc_macro2::{Ident, TokenStream};
use quote::{format_ident, quote};

#[derive(Clone, Debug, PartialEq)]
pub enum RelationType {
    HasMany,
    BelongsTo,
}

/// One variant of a generated entity's `Relation` enum.
#[derive(Clone, Debug)]
pub struct Relation {
    pub(crate) ref_table: String,
    pub(crate) rel_type: RelationType,
    pub(crate) from_column: Option<String>,
    pub(crate) on_delete_cascade: bool,
}

impl Relation {
    pub fn get_ref_table_snake_case(&self) -> Ident {
        format_ident!("{}", self.ref_table.to_snake_case())
    }

    pub fn get_ref_table_camel_case(&self) -> Ident {
        format_ident!("{}", self.ref_table.to_upper_camel_case())
    }

    pub fn get_attrs(&self) -> TokenStream {
        let ref_entity = format!("super::{}::Entity", self.ref_table.to_snake_case());
        match self.rel_type {
            RelationType::HasMany => quote! {
                #[sea_orm(has_many = #ref_entity)]
            },
            RelationType::BelongsTo => {
                let from = match &self.from_column {
                    Some(column) => format!("Column::{}", column.to_upper_camel_case()),
                    None => format!("Column::{}Id", self.ref_table.to_upper_camel_case()),
                };
                let to = format!("super::{}::Column::Id", self.ref_table.to_snake_case());
                if self.on_delete_cascade {
                    quote! {
                        #[sea_orm(
                            belongs_to = #ref_entity,
                            from = #from,
                            to = #to,
                            on_delete = "Cascade"
                        )]
                    }
                } else {
                    quote! {
                        #[sea_orm(
                            belongs_to = #ref_entity,
                            from = #from,
                            to = #to
                        )]
                    }
                }
            }
        }
    }
}
