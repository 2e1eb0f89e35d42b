use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Employee {
    pub employee_id: String,
    pub full_name: String,
    pub department: String,
    pub username: String,
    /// Argon2 PHC string, never sent to clients
    #[serde(skip_serializing, default)]
    pub password_hash: String,
    pub photo_reference: Option<String>,
}

/// Profile fields accepted at registration, before the password is hashed.
#[derive(Debug, Clone)]
pub struct NewEmployee {
    pub username: String,
    pub password: String,
    pub employee_id: String,
    pub full_name: String,
    pub department: String,
    pub photo_reference: Option<String>,
}
