//! # Attribute-Based Authorization Engine (authcheck)
//!
//! Decides whether a requested action on an authorization object with a
//! set of attribute values is permitted by an identity's compiled
//! permission profile. Support for:
//! - Profile compilation with per-grant OR-compositions
//! - Wildcard attribute grants
//! - Select-option predicates (ranges, string patterns, regular
//!   expressions) for non-enumerable values
//! - Process-wide diagnostic tracing through the `tracing` facade
//! - Thread-safe concurrent checks against an immutable profile
//!
//! ## Example
//!
//! ```rust
//! use authcheck::{compile_profile, Authorization, RawGrant, RequiredPermission};
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! // Raw grants come from an external grant source, one group per role
//! let grants: Vec<RawGrant> = serde_json::from_str(r#"[
//!     {
//!         "AuthObject": "blog",
//!         "AuthFieldValue": {
//!             "Tag": ["DB", "JS"],
//!             "ID": [{"Operator": "Between", "Option": "Include", "Low": 1000000, "High": 1999999}],
//!             "Action": "*"
//!         }
//!     }
//! ]"#)?;
//!
//! let profile = compile_profile(vec![grants])?;
//! let authority = Authorization::new("vincezk", profile)?;
//!
//! let request: RequiredPermission = serde_json::from_value(
//!     serde_json::json!({"Tag": "DB", "ID": 1500000, "Action": "Post"}),
//! )?;
//! assert!(authority.check("blog", &request));
//!
//! let request: RequiredPermission = serde_json::from_value(
//!     serde_json::json!({"Tag": "Angular", "ID": 1500000, "Action": "Post"}),
//! )?;
//! assert!(!authority.check("blog", &request));
//! # Ok(())
//! # }
//! # example().unwrap();
//! ```

pub mod authorization;
pub mod error;
pub mod profile;
pub mod select_option;
pub mod trace;
pub mod value;

pub use authorization::{Authorization, RequiredPermission};
pub use error::{AuthError, Result};
pub use profile::{
    compile_profile, AttributeMap, AttributeSpec, AttributeToken, CompiledObjectEntry,
    CompiledProfile, RawGrant, WILDCARD,
};
pub use select_option::{CacheStats, Inclusion, Operator, PatternCache, SelectOption};
pub use trace::{set_trace_enabled, trace_enabled};
pub use value::Value;
