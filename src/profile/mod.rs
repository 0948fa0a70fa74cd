//! Profile module: raw grant fragments and their compilation into the
//! structure the evaluator checks at request time.
//!
//! A raw profile is a sequence of grant fragments, each scoped to one
//! authorization object. Compilation flattens all fragments and groups
//! them by object, keeping every fragment as a separate composition:
//!
//! ```text
//! [{"AuthObject": "blog", "AuthFieldValue": {"Action": ["Post"]}},
//!  {"AuthObject": "blog", "AuthFieldValue": {"Action": "*"}}]
//!         |
//!         v
//! [{"AuthObject": "blog",
//!   "AuthFieldValueComposition": [{"Action": ["Post"]}, {"Action": "*"}]}]
//! ```

mod compiler;
mod types;

pub use compiler::compile_profile;
pub use types::{
    AttributeMap, AttributeSpec, AttributeToken, CompiledObjectEntry, CompiledProfile, RawGrant,
    WILDCARD,
};
