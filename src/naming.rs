use heck::{ToSnakeCase, ToUpperCamelCase};
use inflector::Inflector;

/// Table backing a model: snake case, pluralized. `UserProfile` -> `user_profiles`.
pub fn table_name(model: &str) -> String {
    ToSnakeCase::to_snake_case(model).to_plural()
}

/// Singular snake form used for pivot identities. `UserProfile` -> `user_profile`.
pub fn singular_snake(model: &str) -> String {
    ToSnakeCase::to_snake_case(model).to_singular()
}

/// Table referenced by a `foreign` field: the field name with a trailing
/// `_id` stripped, pluralized. `author_id` -> `authors`.
pub fn foreign_key_target(field: &str) -> String {
    let base = field.strip_suffix("_id").unwrap_or(field);
    base.to_plural()
}

/// Canonical identity of a many-to-many pair. Both sides are singularized,
/// snake cased and sorted, so `(A, B)` and `(B, A)` collapse onto one pivot.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub struct PivotIdentity {
    pub(crate) left: String,
    pub(crate) right: String,
}

impl PivotIdentity {
    pub fn new(model_a: &str, model_b: &str) -> Self {
        let mut names = [singular_snake(model_a), singular_snake(model_b)];
        names.sort();
        let [left, right] = names;
        Self { left, right }
    }

    pub fn table(&self) -> String {
        format!("{}_{}", self.left, self.right)
    }

    pub fn entity_name(&self) -> String {
        self.table().to_upper_camel_case()
    }

    pub fn left_column(&self) -> String {
        format!("{}_id", self.left)
    }

    pub fn right_column(&self) -> String {
        format!("{}_id", self.right)
    }

    pub fn left_table(&self) -> String {
        self.left.to_plural()
    }

    pub fn right_table(&self) -> String {
        self.right.to_plural()
    }
}
