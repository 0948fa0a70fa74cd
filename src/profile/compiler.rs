//! Profile compilation: flattening raw grant groups into a checkable
//! profile

use super::types::{CompiledObjectEntry, CompiledProfile, RawGrant};
use crate::error::{AuthError, Result};

/// Compiles raw grant groups into a [`CompiledProfile`].
///
/// Grant groups (typically one group per role) are flattened in supply
/// order, then grouped by authorization object. Each grant keeps its
/// attribute map as a separate composition under its object's entry;
/// grants are never merged field by field, so no attribute combination
/// is granted that a single grant did not hold on its own.
///
/// Grouping scans the output linearly per grant, which is O(G * E) for
/// G grants and E distinct objects. Entitlement sets are tens to low
/// hundreds of grants, so no index is kept.
///
/// # Errors
///
/// Returns [`AuthError::MissingAuthObject`] when a grant carries an
/// empty authorization object name. Malformed grants are rejected, not
/// dropped.
///
/// # Examples
///
/// ```
/// use authcheck::{compile_profile, RawGrant};
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let role_a: Vec<RawGrant> = serde_json::from_str(
///     r#"[{"AuthObject": "blog", "AuthFieldValue": {"Action": ["Post"]}}]"#,
/// )?;
/// let role_b: Vec<RawGrant> = serde_json::from_str(
///     r#"[{"AuthObject": "blog", "AuthFieldValue": {"Action": "*"}}]"#,
/// )?;
///
/// let profile = compile_profile(vec![role_a, role_b])?;
/// assert_eq!(profile.len(), 1);
/// assert_eq!(profile.find("blog").unwrap().compositions.len(), 2);
/// # Ok(())
/// # }
/// # example().unwrap();
/// ```
pub fn compile_profile(raw_grant_groups: Vec<Vec<RawGrant>>) -> Result<CompiledProfile> {
    let mut compiled = CompiledProfile::default();

    for (position, grant) in raw_grant_groups.into_iter().flatten().enumerate() {
        if grant.auth_object.is_empty() {
            return Err(AuthError::MissingAuthObject { position });
        }

        match compiled
            .0
            .iter_mut()
            .find(|entry| entry.auth_object == grant.auth_object)
        {
            Some(entry) => entry.compositions.push(grant.auth_field_value),
            None => compiled.0.push(CompiledObjectEntry {
                auth_object: grant.auth_object,
                compositions: vec![grant.auth_field_value],
            }),
        }
    }

    Ok(compiled)
}
