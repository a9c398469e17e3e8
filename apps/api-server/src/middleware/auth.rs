//! Authentication extractors.

use actix_web::{FromRequest, HttpRequest, dev::Payload, http::header, web};
use futures::future::LocalBoxFuture;

use scribe_core::domain::User;
use scribe_core::error::DomainError;
use scribe_core::permissions::Actor;
use scribe_core::ports::{AuthError, TokenClaims};

use super::error::AppError;
use crate::state::AppState;

pub const ROLE_USER: &str = "user";
pub const ROLE_SUPERUSER: &str = "superuser";

/// Roles embedded in the tokens issued for `user`.
pub fn roles_for(user: &User) -> Vec<String> {
    let mut roles = vec![ROLE_USER.to_string()];
    if user.is_superuser {
        roles.push(ROLE_SUPERUSER.to_string());
    }
    roles
}

fn bearer_token(req: &HttpRequest) -> Result<&str, AuthError> {
    let value = req
        .headers()
        .get(header::AUTHORIZATION)
        .ok_or(AuthError::MissingAuth)?;

    let value = value
        .to_str()
        .map_err(|_| AuthError::InvalidToken("Invalid authorization header".to_string()))?;

    value
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .ok_or_else(|| AuthError::InvalidToken("Expected Bearer token".to_string()))
}

/// Claims of the request's bearer token, validated.
fn identify(req: &HttpRequest) -> Result<TokenClaims, AppError> {
    let Some(state) = req.app_data::<web::Data<AppState>>() else {
        tracing::error!("AppState not found in app data");
        return Err(AppError::Internal("Server configuration error".to_string()));
    };

    let token = bearer_token(req)?;
    Ok(state.tokens.validate_token(token)?)
}

/// The active user behind the bearer token, freshly loaded.
///
/// A token whose user was deleted or no longer exists is rejected with 401;
/// storage failures while loading the user surface as they are.
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub user: User,
    pub actor: Actor,
}

impl FromRequest for CurrentUser {
    type Error = AppError;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let claims = identify(req);
        let state = req.app_data::<web::Data<AppState>>().cloned();

        Box::pin(async move {
            let claims = claims?;
            let state = state
                .ok_or_else(|| AppError::Internal("Server configuration error".to_string()))?;

            let user = state
                .services
                .users
                .get_user_by_id(claims.user_id)
                .await
                .map_err(|e| match e {
                    DomainError::NotFound { .. } => {
                        tracing::debug!(user_id = %claims.user_id, "Token user is gone or deleted");
                        AppError::Unauthorized("Could not validate credentials".to_string())
                    }
                    other => AppError::from(other),
                })?;

            let actor = Actor::from(&user);
            Ok(CurrentUser { user, actor })
        })
    }
}

#[cfg(test)]
mod tests {
    use actix_web::test::TestRequest;

    use super::*;

    #[test]
    fn bearer_token_is_parsed() {
        let req = TestRequest::default()
            .insert_header((header::AUTHORIZATION, "Bearer abc.def.ghi"))
            .to_http_request();
        assert_eq!(bearer_token(&req).unwrap(), "abc.def.ghi");
    }

    #[test]
    fn missing_or_malformed_header_is_rejected() {
        let req = TestRequest::default().to_http_request();
        assert!(matches!(bearer_token(&req), Err(AuthError::MissingAuth)));

        let req = TestRequest::default()
            .insert_header((header::AUTHORIZATION, "Basic dXNlcjpwYXNz"))
            .to_http_request();
        assert!(matches!(bearer_token(&req), Err(AuthError::InvalidToken(_))));
    }

    #[test]
    fn superusers_carry_both_roles() {
        let mut user = User::new("a@example.com".into(), "hash".into());
        assert_eq!(roles_for(&user), vec![ROLE_USER]);

        user.is_superuser = true;
        assert_eq!(roles_for(&user), vec![ROLE_USER, ROLE_SUPERUSER]);
    }
}
