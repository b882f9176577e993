//! Row, schema and value types shared by storage and the SQL front end.
//!
//! `Value` is a tagged-sum over the two column types the engine persists,
//! `Integer` and `Text`; a table's schema is validated against those two
//! at every entry point.

use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::cmp::Ordering;
use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Integer(i64),
    Text(String),
}

// `Value` is persisted as a bare JSON scalar (`1` or `"Alice"`), not as an
// externally-tagged enum (`{"Integer":1}`): the on-disk row payload is a
// plain JSON object of column name to scalar value.
impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            Value::Integer(n) => serializer.serialize_i64(*n),
            Value::Text(s) => serializer.serialize_str(s),
        }
    }
}

impl<'de> Deserialize<'de> for Value {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        struct ValueVisitor;

        impl<'de> Visitor<'de> for ValueVisitor {
            type Value = Value;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a JSON integer or string")
            }

            fn visit_i64<E: de::Error>(self, v: i64) -> std::result::Result<Value, E> {
                Ok(Value::Integer(v))
            }

            fn visit_u64<E: de::Error>(self, v: u64) -> std::result::Result<Value, E> {
                i64::try_from(v)
                    .map(Value::Integer)
                    .map_err(|_| E::custom("integer out of range for i64"))
            }

            fn visit_str<E: de::Error>(self, v: &str) -> std::result::Result<Value, E> {
                Ok(Value::Text(v.to_string()))
            }

            fn visit_string<E: de::Error>(self, v: String) -> std::result::Result<Value, E> {
                Ok(Value::Text(v))
            }
        }

        deserializer.deserialize_any(ValueVisitor)
    }
}

impl Value {
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Integer(_) => "int",
            Value::Text(_) => "text",
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Integer(n) => Some(*n),
            Value::Text(_) => None,
        }
    }

    /// Ordering used by the executor's `ORDER BY`: integers numerically,
    /// text lexicographically by UTF-8 code unit. Returns `None` for
    /// cross-type comparisons so callers can decide how to treat them.
    pub fn partial_cmp_typed(&self, other: &Value) -> Option<Ordering> {
        match (self, other) {
            (Value::Integer(a), Value::Integer(b)) => Some(a.cmp(b)),
            (Value::Text(a), Value::Text(b)) => Some(a.as_bytes().cmp(b.as_bytes())),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Integer(n) => write!(f, "{n}"),
            Value::Text(s) => write!(f, "{s}"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ColumnType {
    Int,
    Text,
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ColumnType::Int => write!(f, "INT"),
            ColumnType::Text => write!(f, "TEXT"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnDef {
    pub name: String,
    pub col_type: ColumnType,
}

/// Ordered, immutable column list. The first column is always the table's
/// integer primary key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Schema {
    pub columns: Vec<ColumnDef>,
}

impl Schema {
    pub fn new(columns: Vec<ColumnDef>) -> crate::error::Result<Self> {
        let mut seen = std::collections::HashSet::new();
        for c in &columns {
            if !seen.insert(c.name.as_str()) {
                return Err(crate::error::Error::schema(format!(
                    "duplicate column '{}'",
                    c.name
                )));
            }
        }
        if columns.is_empty() {
            return Err(crate::error::Error::schema("table must have at least one column"));
        }
        if columns[0].col_type != ColumnType::Int {
            return Err(crate::error::Error::schema(
                "primary key (first column) must be INT",
            ));
        }
        Ok(Schema { columns })
    }

    pub fn pk_name(&self) -> &str {
        &self.columns[0].name
    }

    pub fn position(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c.name == name)
    }

    pub fn get(&self, name: &str) -> Option<&ColumnDef> {
        self.columns.iter().find(|c| c.name == name)
    }
}

/// Ordered column-name -> value mapping.
///
/// A `Vec` of pairs rather than a `HashMap` because the column order is
/// part of the row's identity (projection, JSON round-trip, `SELECT *`).
#[derive(Debug, Clone, PartialEq)]
pub struct Row(pub Vec<(String, Value)>);

// Persisted as a JSON object (`{"id":1,"name":"Alice"}`), not the
// array-of-pairs shape a derived newtype `Serialize` over `Vec<(String,
// Value)>` would produce. Column order is preserved because `serde_json`
// writes (and reads) map entries in the order `serialize_entry`/
// `next_entry` sees them, not alphabetically.
impl Serialize for Row {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        use serde::ser::SerializeMap;
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (name, value) in &self.0 {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for Row {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        struct RowVisitor;

        impl<'de> Visitor<'de> for RowVisitor {
            type Value = Row;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a JSON object mapping column names to values")
            }

            fn visit_map<A: de::MapAccess<'de>>(
                self,
                mut map: A,
            ) -> std::result::Result<Row, A::Error> {
                let mut fields = Vec::with_capacity(map.size_hint().unwrap_or(0));
                while let Some((key, value)) = map.next_entry::<String, Value>()? {
                    fields.push((key, value));
                }
                Ok(Row(fields))
            }
        }

        deserializer.deserialize_map(RowVisitor)
    }
}

impl Row {
    pub fn new(fields: Vec<(String, Value)>) -> Self {
        Row(fields)
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.0.iter().find(|(n, _)| n == name).map(|(_, v)| v)
    }

    pub fn set(&mut self, name: &str, value: Value) -> bool {
        for (n, v) in self.0.iter_mut() {
            if n == name {
                *v = value;
                return true;
            }
        }
        false
    }

    pub fn pk_value(&self, schema: &Schema) -> crate::error::Result<i64> {
        self.get(schema.pk_name())
            .and_then(Value::as_i64)
            .ok_or_else(|| crate::error::Error::schema("row is missing its primary key"))
    }

    /// Validate this row against `schema`: every declared column must be
    /// present and type-match; no extra columns are tolerated.
    pub fn validate(&self, schema: &Schema) -> crate::error::Result<()> {
        if self.0.len() != schema.columns.len() {
            return Err(crate::error::Error::schema(format!(
                "expected {} columns, got {}",
                schema.columns.len(),
                self.0.len()
            )));
        }
        for col in &schema.columns {
            let value = self
                .get(&col.name)
                .ok_or_else(|| crate::error::Error::schema(format!("missing column '{}'", col.name)))?;
            let matches = matches!(
                (col.col_type, value),
                (ColumnType::Int, Value::Integer(_)) | (ColumnType::Text, Value::Text(_))
            );
            if !matches {
                return Err(crate::error::Error::type_error(format!(
                    "column '{}' expects {} but got {}",
                    col.name,
                    col.col_type,
                    value.type_name()
                )));
            }
        }
        Ok(())
    }

    /// Project a subset of columns, in the requested order.
    pub fn project(&self, columns: &[String]) -> Row {
        let fields = columns
            .iter()
            .filter_map(|name| self.get(name).map(|v| (name.clone(), v.clone())))
            .collect();
        Row(fields)
    }
}
