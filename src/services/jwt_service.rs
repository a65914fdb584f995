//! Servicio JWT
//!
//! Generación y validación de tokens de acceso.

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use uuid::Uuid;

use crate::middleware::auth::Claims;
use crate::utils::errors::{AppError, AppResult};

/// Configuración JWT
pub struct JwtConfig {
    pub secret: String,
    pub algorithm: Algorithm,
    pub access_token_duration: Duration,
}

impl JwtConfig {
    pub fn new(secret: String, expiration_hours: i64) -> Self {
        Self {
            secret,
            algorithm: Algorithm::HS256,
            access_token_duration: Duration::hours(expiration_hours),
        }
    }
}

/// Servicio JWT
pub struct JwtService {
    config: JwtConfig,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
}

impl JwtService {
    pub fn new(secret: &str, expiration_hours: i64) -> Self {
        let config = JwtConfig::new(secret.to_string(), expiration_hours);
        let encoding_key = EncodingKey::from_secret(config.secret.as_ref());
        let decoding_key = DecodingKey::from_secret(config.secret.as_ref());

        Self {
            config,
            encoding_key,
            decoding_key,
        }
    }

    /// Genera un token de acceso para el usuario
    pub fn generate_access_token(&self, user_id: Uuid, username: &str) -> AppResult<String> {
        let now = Utc::now();
        let exp = now + self.config.access_token_duration;

        let claims = Claims {
            sub: user_id.to_string(),
            username: username.to_string(),
            exp: exp.timestamp(),
            iat: now.timestamp(),
        };

        encode(&Header::new(self.config.algorithm), &claims, &self.encoding_key)
            .map_err(|e| AppError::Jwt(format!("Error generating access token: {}", e)))
    }

    /// Valida y decodifica un token
    pub fn validate_token(&self, token: &str) -> AppResult<Claims> {
        let validation = Validation::new(self.config.algorithm);

        decode::<Claims>(token, &self.decoding_key, &validation)
            .map(|data| data.claims)
            .map_err(|e| AppError::Jwt(format!("Invalid token: {}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_and_validate_token() {
        let jwt_service = JwtService::new("secreto-de-prueba", 24);
        let user_id = Uuid::new_v4();

        let token = jwt_service
            .generate_access_token(user_id, "jperez")
            .unwrap();
        assert!(!token.is_empty());

        let claims = jwt_service.validate_token(&token).unwrap();
        assert_eq!(claims.sub, user_id.to_string());
        assert_eq!(claims.username, "jperez");
        assert!(claims.exp > claims.iat);
    }

    #[test]
    fn test_token_with_wrong_secret_is_rejected() {
        let jwt_service = JwtService::new("secreto-a", 24);
        let other_service = JwtService::new("secreto-b", 24);

        let token = jwt_service
            .generate_access_token(Uuid::new_v4(), "jperez")
            .unwrap();
        assert!(other_service.validate_token(&token).is_err());
    }
}
