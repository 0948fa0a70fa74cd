//! Grant and compiled-profile data types
//!
//! The serialized forms use the profile wire keys: a raw grant is
//! `{"AuthObject": ..., "AuthFieldValue": {...}}`, a compiled entry is
//! `{"AuthObject": ..., "AuthFieldValueComposition": [...]}`, and a
//! compiled profile is a bare array of entries. Attribute values are
//! either the wildcard sentinel `"*"` or an array whose elements are
//! scalars and select-option records.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::select_option::SelectOption;
use crate::value::Value;

/// Sentinel meaning "attribute unconstrained, any value permitted"
pub const WILDCARD: &str = "*";

/// Map from attribute name to its allowed-value specification.
///
/// Insertion order is preserved; it is irrelevant for matching but keeps
/// compilation and serialization deterministic.
pub type AttributeMap = IndexMap<String, AttributeSpec>;

/// One raw grant fragment, scoped to a single authorization object.
///
/// Produced by an external grant source (roles, entitlement records) and
/// immutable once produced. Many raw grants combine into an identity's
/// full entitlement via [`compile_profile`](crate::compile_profile).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawGrant {
    /// The resource-type this grant applies to
    #[serde(rename = "AuthObject")]
    pub auth_object: String,

    /// Allowed values per attribute
    #[serde(rename = "AuthFieldValue")]
    pub auth_field_value: AttributeMap,
}

impl RawGrant {
    pub fn new(auth_object: impl Into<String>, auth_field_value: AttributeMap) -> Self {
        Self {
            auth_object: auth_object.into(),
            auth_field_value,
        }
    }
}

/// Allowed values for one attribute: the wildcard sentinel or an ordered
/// list of tokens.
///
/// Any bare string deserializes into `Wildcard`, but only the reserved
/// `"*"` grants anything; other bare strings are unsatisfiable specs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AttributeSpec {
    Wildcard(String),
    List(Vec<AttributeToken>),
}

impl AttributeSpec {
    /// The reserved wildcard spec
    pub fn wildcard() -> Self {
        AttributeSpec::Wildcard(WILDCARD.to_string())
    }

    /// True when this spec is the reserved wildcard marker
    pub fn is_wildcard(&self) -> bool {
        matches!(self, AttributeSpec::Wildcard(marker) if marker == WILDCARD)
    }
}

/// One element of an attribute value list: an exact-match scalar or a
/// select-option predicate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AttributeToken {
    Select(SelectOption),
    Scalar(Value),
}

impl From<SelectOption> for AttributeToken {
    fn from(option: SelectOption) -> Self {
        AttributeToken::Select(option)
    }
}

impl From<Value> for AttributeToken {
    fn from(value: Value) -> Self {
        AttributeToken::Scalar(value)
    }
}

impl From<&str> for AttributeToken {
    fn from(value: &str) -> Self {
        AttributeToken::Scalar(value.into())
    }
}

impl From<i64> for AttributeToken {
    fn from(value: i64) -> Self {
        AttributeToken::Scalar(value.into())
    }
}

impl From<i32> for AttributeToken {
    fn from(value: i32) -> Self {
        AttributeToken::Scalar(value.into())
    }
}

/// Compiled permissions for one authorization object.
///
/// Holds one composition per contributing raw grant. Compositions are
/// OR-alternatives: any single one satisfying a request grants access,
/// and attribute values are never unioned across grants.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompiledObjectEntry {
    #[serde(rename = "AuthObject")]
    pub auth_object: String,

    #[serde(rename = "AuthFieldValueComposition")]
    pub compositions: Vec<AttributeMap>,
}

/// The per-identity, per-object grouped structure consumed by the
/// evaluator at request time.
///
/// Authorization object names are unique within a profile; entry order
/// follows the order raw grants were supplied. Immutable after
/// compilation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(transparent)]
pub struct CompiledProfile(pub(crate) Vec<CompiledObjectEntry>);

impl CompiledProfile {
    /// Finds the entry for an authorization object, if granted at all.
    pub fn find(&self, auth_object: &str) -> Option<&CompiledObjectEntry> {
        self.0.iter().find(|entry| entry.auth_object == auth_object)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &CompiledObjectEntry> {
        self.0.iter()
    }
}
