use async_graphql::{Context, Error, ErrorExtensions, Guard, Result};

use crate::auth::{Permission, RequestContext};

/// Rejects the field unless the requester holds `permission`.
pub struct PermissionGuard {
    permission: Permission,
}

impl PermissionGuard {
    pub fn new(permission: Permission) -> Self {
        Self { permission }
    }
}

impl Guard for PermissionGuard {
    async fn check(&self, ctx: &Context<'_>) -> Result<()> {
        let request_ctx = ctx.data_opt::<RequestContext>();
        if request_ctx.is_some_and(|request_ctx| request_ctx.has_permission(self.permission)) {
            return Ok(());
        }

        tracing::warn!(
            permission = %self.permission,
            user_id = ?request_ctx.and_then(RequestContext::user_id),
            "permission denied"
        );
        Err(permission_denied(&[self.permission]))
    }
}

pub(crate) fn permission_denied(permissions: &[Permission]) -> Error {
    let names = permissions
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ");
    Error::new(format!("You need one of the following permissions: {names}"))
        .extend_with(|_, e| e.set("code", "PERMISSION_DENIED"))
}
