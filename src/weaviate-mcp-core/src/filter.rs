//! Boolean `where` filter tree.
//!
//! A [`WhereFilter`] is either a combinator (`And` / `Or`) over one or more
//! child filters, or a leaf condition on a property path carrying exactly one
//! typed value. The same tree is serialized two ways:
//! - as REST JSON (`operator`, `path`, `operands`, `value*`) through serde
//! - as a GraphQL object literal through [`WhereFilter::to_graphql`]

use chrono::{DateTime, SecondsFormat, Utc};
use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};
use std::fmt;
use thiserror::Error;

use crate::graphql::{display_list, quote, string_list};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FilterOperator {
    And,
    Or,
    Equal,
    NotEqual,
    GreaterThan,
    GreaterThanEqual,
    LessThan,
    LessThanEqual,
    Like,
    WithinGeoRange,
    IsNull,
    ContainsAny,
    ContainsAll,
    ContainsNone,
}

impl FilterOperator {
    pub fn is_combinator(self) -> bool {
        matches!(self, FilterOperator::And | FilterOperator::Or)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            FilterOperator::And => "And",
            FilterOperator::Or => "Or",
            FilterOperator::Equal => "Equal",
            FilterOperator::NotEqual => "NotEqual",
            FilterOperator::GreaterThan => "GreaterThan",
            FilterOperator::GreaterThanEqual => "GreaterThanEqual",
            FilterOperator::LessThan => "LessThan",
            FilterOperator::LessThanEqual => "LessThanEqual",
            FilterOperator::Like => "Like",
            FilterOperator::WithinGeoRange => "WithinGeoRange",
            FilterOperator::IsNull => "IsNull",
            FilterOperator::ContainsAny => "ContainsAny",
            FilterOperator::ContainsAll => "ContainsAll",
            FilterOperator::ContainsNone => "ContainsNone",
        }
    }
}

impl fmt::Display for FilterOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoCoordinates {
    pub latitude: f64,
    pub longitude: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoDistance {
    pub max: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeoRange {
    pub geo_coordinates: GeoCoordinates,
    pub distance: GeoDistance,
}

impl GeoRange {
    pub fn new(latitude: f64, longitude: f64, max_distance: f64) -> Self {
        Self {
            geo_coordinates: GeoCoordinates {
                latitude,
                longitude,
            },
            distance: GeoDistance { max: max_distance },
        }
    }
}

/// The single value carried by a leaf condition
#[derive(Debug, Clone, PartialEq)]
pub enum FilterValue {
    Int(i64),
    Number(f64),
    Boolean(bool),
    String(String),
    Text(String),
    Date(DateTime<Utc>),
    GeoRange(GeoRange),
    IntArray(Vec<i64>),
    NumberArray(Vec<f64>),
    BooleanArray(Vec<bool>),
    StringArray(Vec<String>),
    TextArray(Vec<String>),
    DateArray(Vec<DateTime<Utc>>),
}

impl FilterValue {
    /// Wire name of the value slot this variant occupies
    pub fn field_name(&self) -> &'static str {
        match self {
            FilterValue::Int(_) => "valueInt",
            FilterValue::Number(_) => "valueNumber",
            FilterValue::Boolean(_) => "valueBoolean",
            FilterValue::String(_) => "valueString",
            FilterValue::Text(_) => "valueText",
            FilterValue::Date(_) => "valueDate",
            FilterValue::GeoRange(_) => "valueGeoRange",
            FilterValue::IntArray(_) => "valueIntArray",
            FilterValue::NumberArray(_) => "valueNumberArray",
            FilterValue::BooleanArray(_) => "valueBooleanArray",
            FilterValue::StringArray(_) => "valueStringArray",
            FilterValue::TextArray(_) => "valueTextArray",
            FilterValue::DateArray(_) => "valueDateArray",
        }
    }

    /// NaN and infinities have no GraphQL or JSON literal
    pub fn is_finite(&self) -> bool {
        match self {
            FilterValue::Number(v) => v.is_finite(),
            FilterValue::NumberArray(v) => v.iter().all(|n| n.is_finite()),
            FilterValue::GeoRange(v) => {
                v.geo_coordinates.latitude.is_finite()
                    && v.geo_coordinates.longitude.is_finite()
                    && v.distance.max.is_finite()
            }
            _ => true,
        }
    }

    pub fn to_graphql(&self) -> String {
        match self {
            FilterValue::Int(v) => v.to_string(),
            FilterValue::Number(v) => v.to_string(),
            FilterValue::Boolean(v) => v.to_string(),
            FilterValue::String(v) | FilterValue::Text(v) => quote(v),
            FilterValue::Date(v) => quote(&format_date(v)),
            FilterValue::GeoRange(v) => format!(
                "{{geoCoordinates: {{latitude: {}, longitude: {}}}, distance: {{max: {}}}}}",
                v.geo_coordinates.latitude, v.geo_coordinates.longitude, v.distance.max
            ),
            FilterValue::IntArray(v) => display_list(v),
            FilterValue::NumberArray(v) => display_list(v),
            FilterValue::BooleanArray(v) => display_list(v),
            FilterValue::StringArray(v) | FilterValue::TextArray(v) => string_list(v),
            FilterValue::DateArray(v) => {
                let dates: Vec<String> = v.iter().map(format_date).collect();
                string_list(&dates)
            }
        }
    }
}

fn format_date(date: &DateTime<Utc>) -> String {
    date.to_rfc3339_opts(SecondsFormat::AutoSi, true)
}

impl Serialize for FilterValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            FilterValue::Int(v) => v.serialize(serializer),
            FilterValue::Number(v) => v.serialize(serializer),
            FilterValue::Boolean(v) => v.serialize(serializer),
            FilterValue::String(v) | FilterValue::Text(v) => v.serialize(serializer),
            FilterValue::Date(v) => format_date(v).serialize(serializer),
            FilterValue::GeoRange(v) => v.serialize(serializer),
            FilterValue::IntArray(v) => v.serialize(serializer),
            FilterValue::NumberArray(v) => v.serialize(serializer),
            FilterValue::BooleanArray(v) => v.serialize(serializer),
            FilterValue::StringArray(v) | FilterValue::TextArray(v) => v.serialize(serializer),
            FilterValue::DateArray(v) => {
                let dates: Vec<String> = v.iter().map(format_date).collect();
                dates.serialize(serializer)
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FilterError {
    #[error("{0} filter requires at least one operand")]
    EmptyOperands(FilterOperator),

    #[error("{0} filter requires a non-empty property path")]
    EmptyPath(FilterOperator),

    #[error("{operator} filter requires exactly one value field, got {count}")]
    ValueCount { operator: FilterOperator, count: usize },

    #[error("{0} filter cannot carry a value")]
    UnexpectedValue(FilterOperator),

    #[error("{0} filter cannot carry operands")]
    UnexpectedOperands(FilterOperator),

    #[error("{0} is not a combinator operator")]
    NotACombinator(FilterOperator),

    #[error("{0} is a combinator operator and cannot be used on a property")]
    NotACondition(FilterOperator),

    #[error("{0} filter value must be a finite number")]
    NonFiniteNumber(FilterOperator),
}

#[derive(Debug, Clone, PartialEq)]
enum Node {
    Operands(Vec<WhereFilter>),
    Condition { path: Vec<String>, value: FilterValue },
}

/// A validated filter tree node.
///
/// Construction goes through [`WhereFilter::combine`], [`WhereFilter::condition`]
/// or deserialization, all of which enforce:
/// - combinators hold at least one operand and no value
/// - conditions hold a non-empty path and exactly one value
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(try_from = "RawFilter")]
pub struct WhereFilter {
    operator: FilterOperator,
    node: Node,
}

impl WhereFilter {
    pub fn combine(
        operator: FilterOperator,
        operands: Vec<WhereFilter>,
    ) -> Result<Self, FilterError> {
        if !operator.is_combinator() {
            return Err(FilterError::NotACombinator(operator));
        }
        if operands.is_empty() {
            return Err(FilterError::EmptyOperands(operator));
        }
        Ok(Self {
            operator,
            node: Node::Operands(operands),
        })
    }

    pub fn and(operands: Vec<WhereFilter>) -> Result<Self, FilterError> {
        Self::combine(FilterOperator::And, operands)
    }

    pub fn or(operands: Vec<WhereFilter>) -> Result<Self, FilterError> {
        Self::combine(FilterOperator::Or, operands)
    }

    pub fn condition<P, S>(
        operator: FilterOperator,
        path: P,
        value: FilterValue,
    ) -> Result<Self, FilterError>
    where
        P: IntoIterator<Item = S>,
        S: Into<String>,
    {
        if operator.is_combinator() {
            return Err(FilterError::NotACondition(operator));
        }
        let path: Vec<String> = path.into_iter().map(Into::into).collect();
        if path.is_empty() {
            return Err(FilterError::EmptyPath(operator));
        }
        if !value.is_finite() {
            return Err(FilterError::NonFiniteNumber(operator));
        }
        Ok(Self {
            operator,
            node: Node::Condition { path, value },
        })
    }

    pub fn operator(&self) -> FilterOperator {
        self.operator
    }

    /// Child filters; empty for conditions
    pub fn operands(&self) -> &[WhereFilter] {
        match &self.node {
            Node::Operands(operands) => operands,
            Node::Condition { .. } => &[],
        }
    }

    /// Property path; empty for combinators
    pub fn path(&self) -> &[String] {
        match &self.node {
            Node::Operands(_) => &[],
            Node::Condition { path, .. } => path,
        }
    }

    pub fn value(&self) -> Option<&FilterValue> {
        match &self.node {
            Node::Operands(_) => None,
            Node::Condition { value, .. } => Some(value),
        }
    }

    /// Render as a GraphQL input object literal
    pub fn to_graphql(&self) -> String {
        let mut out = String::new();
        self.write_graphql(&mut out);
        out
    }

    fn write_graphql(&self, out: &mut String) {
        out.push_str("{operator: ");
        out.push_str(self.operator.as_str());
        match &self.node {
            Node::Operands(operands) => {
                out.push_str(", operands: [");
                for (i, operand) in operands.iter().enumerate() {
                    if i > 0 {
                        out.push_str(", ");
                    }
                    operand.write_graphql(out);
                }
                out.push(']');
            }
            Node::Condition { path, value } => {
                out.push_str(", path: ");
                out.push_str(&string_list(path));
                out.push_str(", ");
                out.push_str(value.field_name());
                out.push_str(": ");
                out.push_str(&value.to_graphql());
            }
        }
        out.push('}');
    }
}

impl Serialize for WhereFilter {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(3))?;
        map.serialize_entry("operator", &self.operator)?;
        match &self.node {
            Node::Operands(operands) => map.serialize_entry("operands", operands)?,
            Node::Condition { path, value } => {
                map.serialize_entry("path", path)?;
                map.serialize_entry(value.field_name(), value)?;
            }
        }
        map.end()
    }
}

/// Wire shape accepted on input, validated into a [`WhereFilter`]
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawFilter {
    operator: FilterOperator,
    #[serde(default)]
    path: Vec<String>,
    #[serde(default)]
    operands: Vec<WhereFilter>,
    #[serde(default)]
    value_int: Option<i64>,
    #[serde(default)]
    value_number: Option<f64>,
    #[serde(default)]
    value_boolean: Option<bool>,
    #[serde(default)]
    value_string: Option<String>,
    #[serde(default)]
    value_text: Option<String>,
    #[serde(default)]
    value_date: Option<DateTime<Utc>>,
    #[serde(default)]
    value_geo_range: Option<GeoRange>,
    #[serde(default)]
    value_int_array: Option<Vec<i64>>,
    #[serde(default)]
    value_number_array: Option<Vec<f64>>,
    #[serde(default)]
    value_boolean_array: Option<Vec<bool>>,
    #[serde(default)]
    value_string_array: Option<Vec<String>>,
    #[serde(default)]
    value_text_array: Option<Vec<String>>,
    #[serde(default)]
    value_date_array: Option<Vec<DateTime<Utc>>>,
}

impl RawFilter {
    fn take_values(&mut self) -> Vec<FilterValue> {
        let candidates = [
            self.value_int.take().map(FilterValue::Int),
            self.value_number.take().map(FilterValue::Number),
            self.value_boolean.take().map(FilterValue::Boolean),
            self.value_string.take().map(FilterValue::String),
            self.value_text.take().map(FilterValue::Text),
            self.value_date.take().map(FilterValue::Date),
            self.value_geo_range.take().map(FilterValue::GeoRange),
            self.value_int_array.take().map(FilterValue::IntArray),
            self.value_number_array.take().map(FilterValue::NumberArray),
            self.value_boolean_array.take().map(FilterValue::BooleanArray),
            self.value_string_array.take().map(FilterValue::StringArray),
            self.value_text_array.take().map(FilterValue::TextArray),
            self.value_date_array.take().map(FilterValue::DateArray),
        ];
        candidates.into_iter().flatten().collect()
    }
}

impl TryFrom<RawFilter> for WhereFilter {
    type Error = FilterError;

    fn try_from(mut raw: RawFilter) -> Result<Self, Self::Error> {
        let operator = raw.operator;
        let mut values = raw.take_values();

        if operator.is_combinator() {
            if !values.is_empty() {
                return Err(FilterError::UnexpectedValue(operator));
            }
            return WhereFilter::combine(operator, raw.operands);
        }

        if !raw.operands.is_empty() {
            return Err(FilterError::UnexpectedOperands(operator));
        }
        if values.len() != 1 {
            return Err(FilterError::ValueCount {
                operator,
                count: values.len(),
            });
        }
        match values.pop() {
            Some(value) => WhereFilter::condition(operator, raw.path, value),
            None => Err(FilterError::ValueCount { operator, count: 0 }),
        }
    }
}
