use heck::{ToSnakeCase, ToUpperCamelCase};
use proc_macro2::Ident;
use quote::format_ident;

/// A many to many association reached through a pivot entity.
#[derive(Clone, Debug)]
pub struct ConjunctRelation {
    pub(crate) via: String,
    pub(crate) to: String,
}

impl ConjunctRelation {
    pub fn get_via_snake_case(&self) -> Ident {
        format_ident!("{}", self.via.to_snake_case())
    }

    pub fn get_to_snake_case(&self) -> Ident {
        format_ident!("{}", self.to.to_snake_case())
    }

    pub fn get_to_camel_case(&self) -> Ident {
        format_ident!("{}", self.to.to_upper_camel_case())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_conjunct_relation_idents() {
        let conjunct = ConjunctRelation {
            via: "post_tag".to_owned(),
            to: "tags".to_owned(),
        };
        assert_eq!(conjunct.get_via_snake_case().to_string(), "post_tag");
        assert_eq!(conjunct.get_to_snake_case().to_string(), "tags");
        assert_eq!(conjunct.get_to_camel_case().to_string(), "Tags");
    }
}
