//! Authorization evaluator: the per-request check entry point

use indexmap::IndexMap;

use crate::error::{AuthError, Result};
use crate::profile::{AttributeMap, AttributeSpec, AttributeToken, CompiledProfile, WILDCARD};
use crate::select_option::{CacheStats, PatternCache};
use crate::trace;
use crate::value::Value;

/// Attribute values a request must be granted, keyed by attribute name.
///
/// Insertion order decides which failing attribute a trace record names
/// first; it does not affect the decision.
pub type RequiredPermission = IndexMap<String, Value>;

/// An identity bound to its compiled permission profile.
///
/// Constructed once per session or request context and queried
/// repeatedly. Immutable after construction; [`check`](Self::check)
/// takes `&self` and is safe to call from concurrent threads.
///
/// # Examples
///
/// ```
/// use authcheck::{compile_profile, Authorization, RawGrant, RequiredPermission};
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let grants: Vec<RawGrant> = serde_json::from_str(
///     r#"[{"AuthObject": "user", "AuthFieldValue": {"Action": ["Display"], "Group": "*"}}]"#,
/// )?;
/// let authority = Authorization::new("vincezk", compile_profile(vec![grants])?)?;
///
/// let required: RequiredPermission =
///     serde_json::from_value(serde_json::json!({"Group": "Admin", "Action": "Display"}))?;
/// assert!(authority.check("user", &required));
///
/// let required: RequiredPermission =
///     serde_json::from_value(serde_json::json!({"Group": "Admin", "Action": "Delete"}))?;
/// assert!(!authority.check("user", &required));
/// # Ok(())
/// # }
/// # example().unwrap();
/// ```
#[derive(Debug)]
pub struct Authorization {
    id: String,
    profile: CompiledProfile,
    pattern_cache: PatternCache,
}

impl Authorization {
    /// Binds an identification to its compiled profile.
    ///
    /// # Errors
    ///
    /// Fails fast with [`AuthError::EmptyIdentity`] or
    /// [`AuthError::EmptyProfile`] instead of deferring bad construction
    /// data to the first check.
    pub fn new(id: impl Into<String>, profile: CompiledProfile) -> Result<Self> {
        let id = id.into();
        if id.is_empty() {
            return Err(AuthError::EmptyIdentity);
        }
        if profile.is_empty() {
            return Err(AuthError::EmptyProfile);
        }

        Ok(Self {
            id,
            profile,
            pattern_cache: PatternCache::new(),
        })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn profile(&self) -> &CompiledProfile {
        &self.profile
    }

    /// Statistics of the compiled-pattern cache backing `Matches`
    /// predicates
    pub fn pattern_cache_stats(&self) -> CacheStats {
        self.pattern_cache.stats()
    }

    /// Checks whether the requested access on `auth_object` is granted.
    ///
    /// The request passes iff at least one composition of the matching
    /// object entry satisfies ALL required attributes. Within a
    /// composition an attribute is satisfied by the wildcard marker, by
    /// exact scalar equality with one listed value, or by one matching
    /// select option. A composition that says nothing about a required
    /// attribute fails it: absence is deny, not "don't care".
    ///
    /// Total over well-formed input: an unknown object, an uncovered
    /// value or an empty request all yield `false`, never an error.
    /// Evaluation short-circuits at the first failing attribute per
    /// composition and at the first fully satisfied composition.
    pub fn check(&self, auth_object: &str, required: &RequiredPermission) -> bool {
        let tracing_on = trace::trace_enabled();
        if tracing_on {
            tracing::debug!(
                id = %self.id,
                auth_object,
                required = %serde_json::to_string(required).unwrap_or_default(),
                "authorization check"
            );
        }

        if auth_object.is_empty() || required.is_empty() {
            return false;
        }

        let Some(entry) = self.profile.find(auth_object) else {
            if tracing_on {
                tracing::warn!(id = %self.id, auth_object, "authorization object is not granted");
            }
            return false;
        };

        let mut failures = Vec::new();
        for (index, composition) in entry.compositions.iter().enumerate() {
            match self.first_failure(composition, required) {
                None => return true,
                Some(failure) => {
                    if tracing_on {
                        failures.push((index, failure));
                    }
                }
            }
        }

        if tracing_on {
            for (index, (field, value, granted)) in failures {
                tracing::warn!(
                    id = %self.id,
                    auth_object,
                    composition = index,
                    field,
                    required = %value,
                    granted = %granted_repr(granted),
                    "required field value is not granted"
                );
            }
        }
        false
    }

    /// Returns the first required attribute this composition does not
    /// satisfy, or `None` when the composition covers the whole request.
    fn first_failure<'a>(
        &self,
        composition: &'a AttributeMap,
        required: &'a RequiredPermission,
    ) -> Option<(&'a str, &'a Value, Option<&'a AttributeSpec>)> {
        for (field, value) in required {
            let spec = composition.get(field);
            if !self.attribute_satisfied(spec, value) {
                return Some((field.as_str(), value, spec));
            }
        }
        None
    }

    fn attribute_satisfied(&self, spec: Option<&AttributeSpec>, value: &Value) -> bool {
        match spec {
            None => false,
            Some(AttributeSpec::Wildcard(marker)) => marker == WILDCARD,
            Some(AttributeSpec::List(tokens)) => tokens.iter().any(|token| match token {
                AttributeToken::Scalar(granted) => granted == value,
                AttributeToken::Select(option) => option.matches_cached(value, &self.pattern_cache),
            }),
        }
    }
}

fn granted_repr(spec: Option<&AttributeSpec>) -> String {
    match spec {
        None => "<nothing granted for this field>".to_string(),
        Some(spec) => serde_json::to_string(spec).unwrap_or_default(),
    }
}
