use std::time::{SystemTime, UNIX_EPOCH};

use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode, errors::Error};
use uuid::Uuid;

use crate::{model::employee::EmployeeCredentials, models::Claims};

fn now() -> usize {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs() as usize)
        .unwrap_or_default()
}

pub fn claims_for(employee: &EmployeeCredentials, ttl: usize) -> Claims {
    Claims {
        sub: employee.id,
        emp_id: employee.emp_id.clone(),
        name: employee.emp_name.clone(),
        designation: employee.designation.clone(),
        exp: now() + ttl,
        jti: Uuid::new_v4().to_string(),
    }
}

pub fn generate_token(claims: &Claims, secret: &str) -> Result<String, Error> {
    encode(
        &Header::default(),
        claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
}

pub fn verify_token(token: &str, secret: &str) -> Result<Claims, Error> {
    decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .map(|data| data.claims)
}
