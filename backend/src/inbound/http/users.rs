//! Account API handlers.
//!
//! ```text
//! POST /api/v1/register {"username":"alice","password":"correct horse"}
//! POST /api/v1/login {"username":"alice","password":"correct horse"}
//! ```

use actix_web::{HttpResponse, post, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{
    CredentialsValidationError, Error, LoginCredentials, Registration, UserValidationError,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{
    FieldName, PASSWORD, USERNAME, ValidationCode, field_error, require,
};

/// Request body shared by `POST /api/v1/register` and `POST /api/v1/login`.
///
/// Example JSON:
/// `{"username":"alice","password":"correct horse"}`
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
pub struct CredentialsRequest {
    #[schema(example = "alice")]
    pub username: Option<String>,
    #[schema(example = "correct horse")]
    pub password: Option<String>,
}

impl CredentialsRequest {
    fn into_parts(self) -> Result<(String, String), Error> {
        let username = require(self.username, USERNAME)?;
        let password = require(self.password, PASSWORD)?;
        Ok((username, password))
    }
}

/// Response body for a successful registration.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegisterResponse {
    #[schema(example = "User registered successfully.")]
    pub message: String,
    /// Identifier to send as `user_id` when posting.
    #[schema(example = "3fa85f64-5717-4562-b3fc-2c963f66afa6")]
    pub user_id: String,
}

/// Response body for a successful login.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    /// Opaque bearer token for the `Authorization` header.
    pub token: String,
    pub user_id: String,
    /// Expiry instant in RFC 3339 form.
    pub expires_at: String,
}

fn credentials_error(err: CredentialsValidationError) -> Error {
    let (field, code): (FieldName, ValidationCode) = match &err {
        CredentialsValidationError::EmptyUsername => (USERNAME, ValidationCode::EmptyValue),
        CredentialsValidationError::InvalidUsername(UserValidationError::UsernameTooLong {
            ..
        }) => (USERNAME, ValidationCode::TooLong),
        CredentialsValidationError::InvalidUsername(_) => (USERNAME, ValidationCode::InvalidFormat),
        CredentialsValidationError::EmptyPassword => (PASSWORD, ValidationCode::EmptyValue),
        CredentialsValidationError::PasswordTooLong { .. } => (PASSWORD, ValidationCode::TooLong),
    };
    field_error(field, code, err.to_string())
}

/// Create an account.
#[utoipa::path(
    post,
    path = "/api/v1/register",
    request_body = CredentialsRequest,
    responses(
        (status = 201, description = "Account created", body = RegisterResponse),
        (status = 400, description = "Missing or invalid fields, or username taken", body = ErrorSchema),
        (status = 503, description = "Storage unavailable", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "register",
    security([])
)]
#[post("/register")]
pub async fn register(
    state: web::Data<HttpState>,
    payload: web::Json<CredentialsRequest>,
) -> ApiResult<HttpResponse> {
    let (username, password) = payload.into_inner().into_parts()?;
    let registration =
        Registration::try_from_parts(&username, &password).map_err(credentials_error)?;
    let user_id = state.accounts.register(&registration).await?;
    Ok(HttpResponse::Created().json(RegisterResponse {
        message: "User registered successfully.".to_owned(),
        user_id: user_id.to_string(),
    }))
}

/// Exchange credentials for a bearer token.
#[utoipa::path(
    post,
    path = "/api/v1/login",
    request_body = CredentialsRequest,
    responses(
        (status = 200, description = "Login success", body = LoginResponse),
        (status = 400, description = "Missing or invalid fields", body = ErrorSchema),
        (status = 401, description = "Invalid username or password", body = ErrorSchema),
        (status = 503, description = "Storage unavailable", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "login",
    security([])
)]
#[post("/login")]
pub async fn login(
    state: web::Data<HttpState>,
    payload: web::Json<CredentialsRequest>,
) -> ApiResult<web::Json<LoginResponse>> {
    let (username, password) = payload.into_inner().into_parts()?;
    let credentials =
        LoginCredentials::try_from_parts(&username, &password).map_err(credentials_error)?;
    let issued = state.accounts.login(&credentials).await?;
    Ok(web::Json(LoginResponse {
        token: issued.token.as_str().to_owned(),
        user_id: issued.user_id.to_string(),
        expires_at: issued.expires_at.to_rfc3339(),
    }))
}
