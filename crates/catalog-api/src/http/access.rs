//! Caller access context.

use std::convert::Infallible;

use axum::{async_trait, extract::FromRequestParts, http::request::Parts};

use catalog_domain::model::SubjectFilter;

/// What the current caller is allowed to see.
///
/// An authentication layer in front of the router inserts this into the
/// request extensions. Requests without one are treated as anonymous.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AccessContext {
    pub allow_nsfw: bool,
}

impl AccessContext {
    pub fn anonymous() -> Self {
        Self::default()
    }

    pub fn with_nsfw() -> Self {
        Self { allow_nsfw: true }
    }

    /// Visibility filter handed to the subject reader.
    pub fn subject_filter(&self) -> SubjectFilter {
        SubjectFilter::for_access(self.allow_nsfw)
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for AccessContext
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(parts
            .extensions
            .get::<AccessContext>()
            .copied()
            .unwrap_or_default())
    }
}
