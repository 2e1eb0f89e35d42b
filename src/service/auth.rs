use std::sync::Arc;

use tracing::{debug, info, instrument};

use crate::{
    auth::{
        auth::AuthUser,
        jwt::{generate_access_token, verify_token},
        password::{hash_password, verify_password},
    },
    config::Config,
    error::{AppError, AppResult},
    model::employee::{Employee, NewEmployee},
    models::LoginResponse,
    store::{CredentialStore, StoreError},
    utils::photo,
};

pub struct AuthService {
    store: Arc<dyn CredentialStore>,
    jwt_secret: String,
    token_ttl: usize,
    photo_base_url: String,
}

impl AuthService {
    pub fn new(store: Arc<dyn CredentialStore>, config: &Config) -> Self {
        Self {
            store,
            jwt_secret: config.jwt_secret.clone(),
            token_ttl: config.access_token_ttl,
            photo_base_url: config.photo_base_url.clone(),
        }
    }

    pub fn token_ttl(&self) -> usize {
        self.token_ttl
    }

    #[instrument(name = "auth_register", skip(self, new), fields(username = %new.username, employee_id = %new.employee_id))]
    pub async fn register(&self, new: NewEmployee) -> AppResult<Employee> {
        let username = new.username.trim();
        let employee_id = new.employee_id.trim();

        let required = [
            ("username", username),
            ("password", new.password.as_str()),
            ("employee_id", employee_id),
            ("full_name", new.full_name.trim()),
            ("department", new.department.trim()),
        ];
        if let Some((field, _)) = required.iter().find(|(_, v)| v.is_empty()) {
            return Err(AppError::validation(format!("{field} must not be empty")));
        }

        if self.store.find_by_username(username).await?.is_some() {
            info!("Username already exists");
            return Err(AppError::Conflict("Username already exists".to_string()));
        }

        let employee = Employee {
            employee_id: employee_id.to_string(),
            full_name: new.full_name.trim().to_string(),
            department: new.department.trim().to_string(),
            username: username.to_string(),
            password_hash: hash_password(&new.password)?,
            photo_reference: new.photo_reference,
        };

        match self.store.insert_employee(&employee).await {
            Ok(()) => {
                info!("Employee registered");
                Ok(employee)
            }
            // lost a race on username, or the employee id is taken
            Err(StoreError::Duplicate) => Err(AppError::Conflict(
                "Username or employee id already exists".to_string(),
            )),
            Err(e) => Err(e.into()),
        }
    }

    #[instrument(name = "auth_login", skip(self, password))]
    pub async fn login(&self, username: &str, password: &str) -> AppResult<LoginResponse> {
        let employee = match self.store.find_by_username(username.trim()).await? {
            Some(employee) => employee,
            None => {
                info!("Invalid credentials: user not found");
                return Err(AppError::InvalidCredentials);
            }
        };

        if !verify_password(password, &employee.password_hash)? {
            info!("Invalid credentials: password mismatch");
            return Err(AppError::InvalidCredentials);
        }

        debug!("Password verified, issuing token");

        let (token, _) = generate_access_token(
            employee.username.clone(),
            employee.employee_id.clone(),
            &self.jwt_secret,
            self.token_ttl,
        )
        .map_err(|e| AppError::Internal(format!("Failed to sign token: {e}")))?;

        Ok(LoginResponse {
            token,
            photo_url: self.photo_url(&employee),
            full_name: employee.full_name,
            department: employee.department,
        })
    }

    /// Verifies signature and expiry; every failure is `Unauthorized`.
    pub fn authenticate(&self, token: &str) -> AppResult<AuthUser> {
        let token = token.trim();
        if token.is_empty() {
            return Err(AppError::Unauthorized("Missing token".to_string()));
        }

        let claims = verify_token(token, &self.jwt_secret).map_err(|e| {
            debug!(error = %e, "Token rejected");
            AppError::Unauthorized("Invalid or expired token".to_string())
        })?;

        Ok(AuthUser {
            username: claims.sub,
            employee_id: claims.employee_id,
        })
    }

    /// Points the employee at a new photo. Returns the updated employee and
    /// the reference it replaced, if any.
    #[instrument(name = "auth_update_photo", skip(self))]
    pub async fn update_photo(
        &self,
        username: &str,
        photo_reference: &str,
    ) -> AppResult<(Employee, Option<String>)> {
        let mut employee = self
            .store
            .find_by_username(username)
            .await?
            .ok_or_else(|| AppError::not_found("Employee not found"))?;

        if !self.store.set_photo(username, photo_reference).await? {
            return Err(AppError::not_found("Employee not found"));
        }

        let previous = employee.photo_reference.replace(photo_reference.to_string());
        Ok((employee, previous))
    }

    pub fn photo_url(&self, employee: &Employee) -> Option<String> {
        employee
            .photo_reference
            .as_deref()
            .map(|reference| photo::public_url(&self.photo_base_url, reference))
    }
}
