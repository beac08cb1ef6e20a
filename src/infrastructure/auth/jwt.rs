use jsonwebtoken::{decode, Algorithm, TokenData, Validation};

use crate::entities::token::Claims;
use crate::errors::AuthError;
use crate::settings::{AppConfig, JwtKeys};

const JWT_ALGORITHM: Algorithm = Algorithm::HS512;

/// Verifies session tokens issued by the auth provider. Never mints them.
#[derive(Clone, Debug)]
pub struct JwtService {
    keys: JwtKeys,
}

impl JwtService {
    pub fn new(config: &AppConfig) -> Self {
        JwtService {
            keys: JwtKeys::from(config),
        }
    }

    pub fn decode_jwt(&self, token: &str) -> Result<TokenData<Claims>, AuthError> {
        let mut validation = Validation::new(JWT_ALGORITHM);
        validation.validate_exp = true;

        decode::<Claims>(token, &self.keys.decoding, &validation).map_err(AuthError::from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::AppEnvironment;
    use chrono::Utc;
    use jsonwebtoken::{encode, EncodingKey, Header};

    const SECRET: &str = "test_secret_that_is_at_least_thirty_two_chars";

    fn config() -> AppConfig {
        AppConfig {
            env: AppEnvironment::Testing,
            name: "Blog-API".into(),
            port: 0,
            host: "127.0.0.1".into(),
            worker_count: 1,
            database_url: "postgres://localhost/blog_test".into(),
            database_max_connections: 1,
            cors_allowed_origins: vec!["*".into()],
            jwt_secret: SECRET.into(),
            site_url: "https://i.in".into(),
            feed_title: "Blog".into(),
            feed_description: "notes".into(),
            feed_language: "zh-cn".into(),
            feed_copyright_holder: "i.in".into(),
        }
    }

    fn mint(exp_offset: i64, secret: &str) -> String {
        let now = Utc::now().timestamp();
        let claims = Claims {
            sub: "user-1".into(),
            email: Some("me@i.in".into()),
            name: Some("ichiyo".into()),
            exp: (now + exp_offset) as usize,
            iat: now as usize,
        };
        encode(&Header::new(JWT_ALGORITHM), &claims, &EncodingKey::from_secret(secret.as_bytes())).unwrap()
    }

    #[test]
    fn accepts_token_signed_with_shared_secret() {
        let decoded = JwtService::new(&config()).decode_jwt(&mint(3600, SECRET)).unwrap();
        assert_eq!(decoded.claims.sub, "user-1");
    }

    #[test]
    fn rejects_expired_and_foreign_tokens() {
        let service = JwtService::new(&config());

        assert!(matches!(service.decode_jwt(&mint(-3600, SECRET)), Err(AuthError::TokenExpired)));
        assert!(matches!(
            service.decode_jwt(&mint(3600, "another_secret_that_is_also_long_enough")),
            Err(AuthError::InvalidToken)
        ));
        assert!(matches!(service.decode_jwt("garbage"), Err(AuthError::InvalidToken)));
    }
}
