use std::env;

use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use uuid::Uuid;

use crate::{error::AppError, models::user::Claims};

// Tokens are valid for one day; the session row is what keeps longer-lived
// socket logins alive.
const TOKEN_LIFETIME_DAYS: i64 = 1;

fn secret_key() -> Result<String, AppError> {
    env::var("JWT_SECRET_KEY")
        .map_err(|_| AppError::Internal("JWT_SECRET_KEY is not configured".to_string()))
}

/// Generates a JWT for the user.
pub fn create_jwt(user_id: Uuid) -> Result<String, AppError> {
    let claims = Claims {
        sub: user_id.to_string(),
        exp: (chrono::Utc::now() + chrono::Duration::days(TOKEN_LIFETIME_DAYS)).timestamp()
            as usize,
    };

    let secret = secret_key()?;
    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| AppError::Internal(format!("failed to sign token: {}", e)))
}

/// Validates a JWT and returns the user id it was issued for.
pub fn validate_token(token: &str) -> Option<Uuid> {
    let secret = env::var("JWT_SECRET_KEY").ok()?;
    let validation = Validation::new(Algorithm::HS256);

    match decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &validation,
    ) {
        Ok(data) => Uuid::parse_str(&data.claims.sub).ok(),
        Err(_) => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn token_round_trip() {
        env::set_var("JWT_SECRET_KEY", "test-secret-for-jwt-round-trip");

        let user_id = Uuid::new_v4();
        let token = create_jwt(user_id).expect("token creation");
        assert_eq!(validate_token(&token), Some(user_id));

        assert_eq!(validate_token("not-a-token"), None);
    }
}
