//! Request extractors.

use axum::extract::FromRequestParts;
use axum::http::StatusCode;
use axum::http::request::Parts;
use uuid::Uuid;

/// Tenant scope extracted from the `X-Tenant-Id` header.
///
/// Authentication happens upstream; by the time a request reaches this
/// layer the gateway has already resolved and validated the tenant.
#[derive(Debug, Clone, Copy)]
pub struct Tenant(pub Uuid);

impl<S> FromRequestParts<S> for Tenant
where
    S: Send + Sync,
{
    type Rejection = (StatusCode, &'static str);

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get("x-tenant-id")
            .and_then(|v| v.to_str().ok())
            .ok_or((StatusCode::BAD_REQUEST, "missing X-Tenant-Id header"))?;

        let tenant_id = header
            .parse::<Uuid>()
            .map_err(|_| (StatusCode::BAD_REQUEST, "invalid X-Tenant-Id header"))?;

        Ok(Self(tenant_id))
    }
}
