// src/models/auth.rs

use serde::Deserialize;
use validator::Validate;

/// DTO for both the player gate and the admin gate.
#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(length(min = 1, max = 128))]
    pub password: String,
}
