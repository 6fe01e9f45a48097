use heck::{ToSnakeCase, ToUpperCamelCase};
use proc_macro2::{Ident, Literal, TokenStream};
use quote::{format_ident, quote};

use crate::{util::escape_rust_keyword, DefaultValue, FieldDef, FieldKind, FieldModifier};

#[derive(Clone, Debug)]
pub struct Column {
    pub(crate) name: String,
    pub(crate) kind: FieldKind,
    pub(crate) modifiers: Vec<FieldModifier>,
    pub(crate) primary_key: bool,
    pub(crate) auto_increment: bool,
}

impl Column {
    /// The surrogate `id` column every generated table starts with.
    pub fn id() -> Self {
        Self {
            name: "id".to_owned(),
            kind: FieldKind::BigUnsigned,
            modifiers: Vec::new(),
            primary_key: true,
            auto_increment: true,
        }
    }

    /// The `created_at` / `updated_at` pair appended to every model table.
    pub fn timestamps() -> [Self; 2] {
        let timestamp = |name: &str| Self {
            name: name.to_owned(),
            kind: FieldKind::Timestamp,
            modifiers: vec![FieldModifier::Nullable],
            primary_key: false,
            auto_increment: false,
        };
        [timestamp("created_at"), timestamp("updated_at")]
    }

    /// A `<side>_id` pivot column carrying one half of a many to many pair.
    pub fn foreign_key(name: &str) -> Self {
        Self {
            name: name.to_owned(),
            kind: FieldKind::BigUnsigned,
            modifiers: Vec::new(),
            primary_key: false,
            auto_increment: false,
        }
    }

    pub fn get_name_snake_case(&self) -> Ident {
        format_ident!("{}", escape_rust_keyword(self.name.to_snake_case()))
    }

    pub fn get_name_camel_case(&self) -> Ident {
        format_ident!("{}", self.name.to_upper_camel_case())
    }

    pub fn is_snake_case_name(&self) -> bool {
        self.name.to_snake_case() == self.name
    }

    pub fn is_nullable(&self) -> bool {
        self.modifiers.contains(&FieldModifier::Nullable)
    }

    pub fn is_unique(&self) -> bool {
        self.modifiers.contains(&FieldModifier::Unique)
    }

    pub fn get_rs_type(&self) -> TokenStream {
        let ty = match &self.kind {
            FieldKind::String | FieldKind::Text | FieldKind::Custom(_) => quote!(String),
            FieldKind::Integer => quote!(i32),
            FieldKind::SmallInteger => quote!(i16),
            FieldKind::BigInteger => quote!(i64),
            FieldKind::Unsigned => quote!(u32),
            FieldKind::BigUnsigned | FieldKind::Foreign => quote!(u64),
            FieldKind::Boolean => quote!(bool),
            FieldKind::Date => quote!(Date),
            FieldKind::DateTime | FieldKind::Timestamp => quote!(DateTime),
            FieldKind::Time => quote!(Time),
            FieldKind::Float => quote!(f32),
            FieldKind::Double => quote!(f64),
            FieldKind::Decimal(_) => quote!(Decimal),
            FieldKind::Json => quote!(Json),
            FieldKind::Uuid => quote!(Uuid),
        };
        match self.is_nullable() {
            true => quote!(Option<#ty>),
            false => ty,
        }
    }

    /// Extra `column_type` tokens for kinds the derive macro cannot infer
    /// back from the Rust type alone.
    pub fn get_col_type_attrs(&self) -> Option<TokenStream> {
        match &self.kind {
            FieldKind::Text => Some(quote! { column_type = "Text" }),
            FieldKind::Decimal(Some((precision, scale))) => {
                let col_type = format!("Decimal(Some(({precision}, {scale})))");
                Some(quote! { column_type = #col_type })
            }
            FieldKind::Custom(ty) => {
                let col_type = format!("custom(\"{ty}\")");
                Some(quote! { column_type = #col_type })
            }
            _ => None,
        }
    }

    /// The `ColumnDef` builder chain for this column in a migration, rooted
    /// at the given table iden enum.
    pub fn get_col_def(&self, table_iden: &Ident) -> TokenStream {
        let variant = self.get_name_camel_case();
        let col_type = match &self.kind {
            FieldKind::String => quote!(string()),
            FieldKind::Text => quote!(text()),
            FieldKind::Integer => quote!(integer()),
            FieldKind::SmallInteger => quote!(small_integer()),
            FieldKind::BigInteger => quote!(big_integer()),
            FieldKind::Unsigned => quote!(unsigned()),
            FieldKind::BigUnsigned | FieldKind::Foreign => quote!(big_unsigned()),
            FieldKind::Boolean => quote!(boolean()),
            FieldKind::Date => quote!(date()),
            FieldKind::DateTime => quote!(date_time()),
            FieldKind::Time => quote!(time()),
            FieldKind::Timestamp => quote!(timestamp()),
            FieldKind::Float => quote!(float()),
            FieldKind::Double => quote!(double()),
            FieldKind::Decimal(None) => quote!(decimal()),
            FieldKind::Decimal(Some((precision, scale))) => {
                let precision = Literal::u32_unsuffixed(*precision);
                let scale = Literal::u32_unsuffixed(*scale);
                quote!(decimal_len(#precision, #scale))
            }
            FieldKind::Json => quote!(json()),
            FieldKind::Uuid => quote!(uuid()),
            FieldKind::Custom(ty) => quote!(custom(Alias::new(#ty))),
        };
        let mut def = quote! { ColumnDef::new(#table_iden::#variant).#col_type };
        if !self.is_nullable() {
            def = quote! { #def.not_null() };
        }
        if self.auto_increment {
            def = quote! { #def.auto_increment() };
        }
        if self.primary_key {
            def = quote! { #def.primary_key() };
        }
        for modifier in &self.modifiers {
            match modifier {
                FieldModifier::Nullable => {}
                FieldModifier::Unique => def = quote! { #def.unique_key() },
                FieldModifier::Default(value) => {
                    let literal = default_literal(value);
                    def = quote! { #def.default(#literal) };
                }
            }
        }
        def
    }
}

fn default_literal(value: &DefaultValue) -> TokenStream {
    match value {
        DefaultValue::Int(value) => {
            let literal = Literal::i64_unsuffixed(*value);
            quote! { #literal }
        }
        DefaultValue::Float(value) => {
            let literal = Literal::f64_unsuffixed(*value);
            quote! { #literal }
        }
        DefaultValue::Text(value) => quote! { #value },
    }
}

impl From<&FieldDef> for Column {
    fn from(field: &FieldDef) -> Self {
        Self {
            name: field.name.clone(),
            kind: field.kind.clone(),
            modifiers: field.modifiers.clone(),
            primary_key: false,
            auto_increment: false,
        }
    }
}
