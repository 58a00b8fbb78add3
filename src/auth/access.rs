use crate::{backend::UserProfile, config::TenantId};

/// A session may stay signed in on this site iff the user is a super admin or
/// belongs to the configured tenant. The role comparison is exact.
#[must_use]
pub fn is_authorized_for_site(profile: &UserProfile, tenant: &TenantId) -> bool {
    profile.role.is_super_admin() || tenant.matches(profile.tenant_id.as_deref())
}
