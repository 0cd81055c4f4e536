use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::backend::Backend;
use crate::config::Config;
use crate::error::{AppError, AppResult};
use crate::models::{AuthUser, Credentials, Session};

/// Audience the identity service stamps on signed-in users' tokens
pub const TOKEN_AUDIENCE: &str = "authenticated";

/// Access token claims issued by the identity service
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid, // user id
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub aud: String,
    #[serde(default)]
    pub role: Option<String>,
    pub exp: i64, // expiration timestamp
    #[serde(default)]
    pub iat: i64, // issued at timestamp
}

pub struct AuthService;

impl AuthService {
    /// Password sign-in against the identity service
    pub async fn login(backend: &dyn Backend, credentials: &Credentials) -> AppResult<Session> {
        let email = credentials.email.trim();
        if email.is_empty() || credentials.password.is_empty() {
            return Err(AppError::Validation(
                "Email and password are required".to_string(),
            ));
        }

        let session = backend.sign_in(email, &credentials.password).await?;
        tracing::info!(user_id = %session.user.id, "Operator signed in");
        Ok(session)
    }

    pub async fn logout(backend: &dyn Backend, access_token: &str) -> AppResult<()> {
        backend.sign_out(access_token).await?;
        tracing::info!("Operator signed out");
        Ok(())
    }

    /// Verify and decode an HS256 access token with the project's JWT secret
    pub fn decode_token(token: &str, secret: &str) -> AppResult<Claims> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_audience(&[TOKEN_AUDIENCE]);

        let token_data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(secret.as_bytes()),
            &validation,
        )?;

        Ok(token_data.claims)
    }

    /// Resolve the operator behind a bearer token.
    /// Verified locally when the JWT secret is configured, otherwise by the identity service.
    pub async fn verify_token(
        backend: &dyn Backend,
        config: &Config,
        token: &str,
    ) -> AppResult<AuthUser> {
        if let Some(secret) = &config.supabase_jwt_secret {
            let claims = Self::decode_token(token, secret)?;
            return Ok(AuthUser {
                id: claims.sub,
                email: claims.email,
                access_token: token.to_string(),
            });
        }

        let user = backend.user(token).await?;
        Ok(AuthUser::from_user(user, token))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::{InMemoryBackend, UnconfiguredBackend};
    use jsonwebtoken::{encode, EncodingKey, Header};
    use time::{Duration, OffsetDateTime};

    const SECRET: &str = "super-secret-jwt-token-with-at-least-32-characters";

    fn token(audience: &str, expires_in: Duration) -> (Uuid, String) {
        let now = OffsetDateTime::now_utc();
        let id = Uuid::new_v4();
        let claims = Claims {
            sub: id,
            email: "owner@example.com".to_string(),
            aud: audience.to_string(),
            role: Some("authenticated".to_string()),
            exp: (now + expires_in).unix_timestamp(),
            iat: now.unix_timestamp(),
        };
        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(SECRET.as_bytes()),
        )
        .unwrap();
        (id, token)
    }

    fn config_with_secret() -> Config {
        Config {
            supabase_jwt_secret: Some(SECRET.to_string()),
            ..Config::default()
        }
    }

    #[tokio::test]
    async fn test_local_verification_accepts_valid_token() {
        let (id, token) = token(TOKEN_AUDIENCE, Duration::hours(1));
        let user = AuthService::verify_token(&UnconfiguredBackend, &config_with_secret(), &token)
            .await
            .unwrap();
        assert_eq!(user.id, id);
        assert_eq!(user.email, "owner@example.com");
        assert_eq!(user.access_token, token);
    }

    #[test]
    fn test_expired_token_is_rejected() {
        let (_, token) = token(TOKEN_AUDIENCE, Duration::hours(-2));
        assert!(matches!(
            AuthService::decode_token(&token, SECRET),
            Err(AppError::TokenExpired)
        ));
    }

    #[test]
    fn test_wrong_audience_or_secret_is_rejected() {
        let (_, anon) = token("anon", Duration::hours(1));
        assert!(AuthService::decode_token(&anon, SECRET).is_err());

        let (_, valid) = token(TOKEN_AUDIENCE, Duration::hours(1));
        assert!(AuthService::decode_token(&valid, "another-secret").is_err());
    }

    #[tokio::test]
    async fn test_remote_verification_uses_identity_service() {
        let backend = InMemoryBackend::new();
        let registered = backend.register_user("owner@example.com", "hunter22").await;
        let session = AuthService::login(
            &backend,
            &Credentials {
                email: " owner@example.com ".to_string(),
                password: "hunter22".to_string(),
            },
        )
        .await
        .unwrap();

        let user = AuthService::verify_token(&backend, &Config::default(), &session.access_token)
            .await
            .unwrap();
        assert_eq!(user.id, registered.id);

        AuthService::logout(&backend, &session.access_token)
            .await
            .unwrap();
        assert_eq!(
            AuthService::verify_token(&backend, &Config::default(), &session.access_token).await,
            Err(AppError::InvalidToken)
        );
    }

    #[tokio::test]
    async fn test_login_validates_and_reports_unconfigured() {
        let blank = Credentials {
            email: "".to_string(),
            password: "x".to_string(),
        };
        assert!(matches!(
            AuthService::login(&UnconfiguredBackend, &blank).await,
            Err(AppError::Validation(_))
        ));

        let credentials = Credentials {
            email: "owner@example.com".to_string(),
            password: "x".to_string(),
        };
        assert_eq!(
            AuthService::login(&UnconfiguredBackend, &credentials).await,
            Err(AppError::NotConfigured)
        );
    }
}
