use anyhow::{anyhow, Context, Result};
use chrono::{Duration, Utc};
use hmac::{Hmac, Mac};
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sha2::Sha256;

use crate::models::dto::ValidationError;

type HmacSha256 = Hmac<Sha256>;

/// How long a signed token stays valid
pub const JWT_LIFETIME_DAYS: i64 = 2;

/// Kind of failure reported to API clients
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ServiceError {
    ValidationError,
    CommonError,
    ServiceError,
}

/// One invalid field, as shown to API clients
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ValidationErrorField {
    pub property: String,
    pub value: Value,
    pub messages: Vec<String>,
}

/// Error body returned to API clients
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ErrorObject {
    pub error_type: ServiceError,
    pub message: String,
    pub details: Vec<ValidationErrorField>,
}

pub fn create_error_object(
    service_error: ServiceError,
    message: impl Into<String>,
    details: Vec<ValidationErrorField>,
) -> ErrorObject {
    ErrorObject {
        error_type: service_error,
        message: message.into(),
        details,
    }
}

/// Flatten validation errors into the client facing field list
pub fn transform_errors(errors: &[ValidationError]) -> Vec<ValidationErrorField> {
    errors
        .iter()
        .map(|error| ValidationErrorField {
            property: error.property.clone(),
            value: error.value.clone(),
            messages: error.constraints.values().cloned().collect(),
        })
        .collect()
}

/// Full message of an error, including its causes
pub fn get_error_message(error: &anyhow::Error) -> String {
    format!("{error:#}")
}

/// Hex encoded HMAC-SHA256 of `line` keyed with `salt`
pub fn create_sha256(line: &str, salt: &str) -> Result<String> {
    let mut mac = HmacSha256::new_from_slice(salt.as_bytes())
        .map_err(|_| anyhow!("Invalid HMAC key"))?;
    mac.update(line.as_bytes());
    Ok(hex::encode(mac.finalize().into_bytes()))
}

/// Sign `payload` (a JSON object) with `iat` and a two day `exp` added
pub fn create_jwt<T: Serialize>(algorithm: Algorithm, secret: &str, payload: &T) -> Result<String> {
    let mut claims = match serde_json::to_value(payload).context("Failed to serialize JWT payload")? {
        Value::Object(claims) => claims,
        other => anyhow::bail!("JWT payload must be an object, got {other}"),
    };

    let now = Utc::now();
    claims.insert("iat".to_string(), now.timestamp().into());
    claims.insert(
        "exp".to_string(),
        (now + Duration::days(JWT_LIFETIME_DAYS)).timestamp().into(),
    );

    encode(
        &Header::new(algorithm),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .context("Failed to sign JWT")
}

pub fn get_full_server_path(host: &str, port: u16) -> String {
    format!("http://{host}:{port}")
}
