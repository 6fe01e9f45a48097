use std::str::FromStr;

use crate::Error;

/// One `"name:type[|modifier...]"` entry of a model's field list.
#[derive(Clone, Debug, PartialEq)]
pub struct FieldDef {
    pub name: String,
    pub kind: FieldKind,
    pub modifiers: Vec<FieldModifier>,
}

#[derive(Clone, Debug, PartialEq)]
pub enum FieldKind {
    String,
    Text,
    Integer,
    SmallInteger,
    BigInteger,
    Unsigned,
    BigUnsigned,
    Boolean,
    Date,
    DateTime,
    Time,
    Timestamp,
    Float,
    Double,
    Decimal(Option<(u32, u32)>),
    Json,
    Uuid,
    /// Unsigned big integer plus a foreign key constraint inferred from the
    /// field name.
    Foreign,
    /// Unrecognized type token, passed through as a custom column type.
    Custom(String),
}

#[derive(Clone, Debug, PartialEq)]
pub enum FieldModifier {
    Nullable,
    Unique,
    Default(DefaultValue),
}

#[derive(Clone, Debug, PartialEq)]
pub enum DefaultValue {
    Int(i64),
    Float(f64),
    Text(String),
}

impl DefaultValue {
    fn parse(raw: &str) -> Self {
        if let Ok(value) = raw.parse::<i64>() {
            Self::Int(value)
        } else if let Ok(value) = raw.parse::<f64>() {
            Self::Float(value)
        } else {
            Self::Text(raw.to_owned())
        }
    }
}

impl FieldDef {
    pub fn is_nullable(&self) -> bool {
        self.modifiers.contains(&FieldModifier::Nullable)
    }

    pub fn is_unique(&self) -> bool {
        self.modifiers.contains(&FieldModifier::Unique)
    }

    pub fn default_value(&self) -> Option<&DefaultValue> {
        self.modifiers.iter().find_map(|modifier| match modifier {
            FieldModifier::Default(value) => Some(value),
            _ => None,
        })
    }
}

impl FromStr for FieldDef {
    type Err = Error;

    fn from_str(descriptor: &str) -> Result<Self, Self::Err> {
        let (name, rest) = descriptor.split_once(':').ok_or_else(|| {
            Error::Structure(format!("field descriptor `{descriptor}` is missing a type"))
        })?;
        if name.is_empty() {
            return Err(Error::Structure(format!(
                "field descriptor `{descriptor}` is missing a name"
            )));
        }
        let mut parts = rest.split('|');
        let kind = match parts.next() {
            Some(token) if !token.is_empty() => FieldKind::parse(token),
            _ => {
                return Err(Error::Structure(format!(
                    "field descriptor `{descriptor}` is missing a type"
                )));
            }
        };
        let modifiers = parts
            .map(|modifier| FieldModifier::parse(name, modifier))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self {
            name: name.to_owned(),
            kind,
            modifiers,
        })
    }
}

impl FieldKind {
    fn parse(token: &str) -> Self {
        if let Some(precision_scale) = parse_decimal_params(token) {
            return Self::Decimal(Some(precision_scale));
        }
        match token {
            "string" => Self::String,
            "text" => Self::Text,
            "integer" => Self::Integer,
            "smallInteger" | "small_integer" => Self::SmallInteger,
            "bigInteger" | "big_integer" => Self::BigInteger,
            "unsignedInteger" | "unsigned_integer" => Self::Unsigned,
            "unsignedBigInteger" | "unsigned_big_integer" => Self::BigUnsigned,
            "boolean" | "bool" => Self::Boolean,
            "date" => Self::Date,
            "dateTime" | "datetime" => Self::DateTime,
            "time" => Self::Time,
            "timestamp" => Self::Timestamp,
            "float" => Self::Float,
            "double" => Self::Double,
            "decimal" => Self::Decimal(None),
            "json" => Self::Json,
            "uuid" => Self::Uuid,
            "foreign" => Self::Foreign,
            _ => Self::Custom(token.to_owned()),
        }
    }
}

fn parse_decimal_params(token: &str) -> Option<(u32, u32)> {
    let inner = token.strip_prefix("decimal(")?.strip_suffix(')')?;
    let (precision, scale) = inner.split_once(',')?;
    Some((
        precision.trim().parse().ok()?,
        scale.trim().parse().ok()?,
    ))
}

impl FieldModifier {
    fn parse(field: &str, modifier: &str) -> Result<Self, Error> {
        match modifier {
            "nullable" => Ok(Self::Nullable),
            "unique" => Ok(Self::Unique),
            _ => match modifier.strip_prefix("default:") {
                Some(raw) => Ok(Self::Default(DefaultValue::parse(raw))),
                None => Err(Error::Structure(format!(
                    "unknown modifier `{modifier}` on field `{field}`"
                ))),
            },
        }
    }
}
