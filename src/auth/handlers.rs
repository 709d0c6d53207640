use actix_web::{HttpResponse, web};
use tracing::{debug, error, info, instrument};

use crate::{
    auth::{jwt::generate_access_token, password::verify_password},
    config::Config,
    error::ApiError,
    models::{LoginReqDto, LoginResponse},
    store::UserStore,
};

#[instrument(name = "auth_login", skip_all, fields(username = %user.username))]
pub async fn authenticate<S: UserStore>(
    store: &S,
    config: &Config,
    user: &LoginReqDto,
) -> Result<LoginResponse, ApiError> {
    info!("Login request received");

    // 1️⃣ Basic validation
    if user.username.trim().is_empty() || user.password.is_empty() {
        info!("Validation failed: empty username or password");
        return Err(ApiError::bad_request("Username or password required"));
    }

    // 2️⃣ Fetch user
    let username = user.username.trim().to_lowercase();
    let db_user = match store.find_credentials(&username).await {
        Ok(Some(found)) => {
            debug!(user_id = found.id, "User found");
            found
        }
        Ok(None) => {
            info!("Invalid credentials: user not found");
            return Err(ApiError::Unauthorized("Invalid credentials".into()));
        }
        Err(e) => {
            error!(error = %e, "Database error while fetching user");
            return Err(ApiError::Internal);
        }
    };

    // 3️⃣ Verify password
    if let Err(e) = verify_password(&user.password, &db_user.password_hash) {
        info!(error = %e, "Invalid credentials: password mismatch");
        return Err(ApiError::Unauthorized("Invalid credentials".into()));
    }

    // 4️⃣ Generate access token
    let access_token = generate_access_token(
        db_user.id,
        db_user.username,
        db_user.role_id,
        db_user.employee_id,
        &config.jwt_secret,
        config.access_token_ttl,
    )
    .map_err(|e| {
        error!(error = %e, "Failed to sign access token");
        ApiError::Internal
    })?;

    info!("Login successful");
    Ok(LoginResponse { access_token })
}

#[utoipa::path(
    post,
    path = "/auth/login",
    request_body = LoginReqDto,
    responses(
        (status = 200, description = "Access token issued", body = LoginResponse),
        (status = 400, description = "Username or password missing"),
        (status = 401, description = "Invalid credentials")
    ),
    tag = "Auth"
)]
pub async fn login<S: UserStore + 'static>(
    user: web::Json<LoginReqDto>,
    store: web::Data<S>,
    config: web::Data<Config>,
) -> Result<HttpResponse, ApiError> {
    let tokens = authenticate(store.get_ref(), config.get_ref(), &user).await?;
    Ok(HttpResponse::Ok().json(tokens))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::{jwt::verify_token, password::hash_password};
    use crate::model::user::UserCredentials;
    use crate::store::memory::MemoryStore;

    fn store_with_user() -> MemoryStore {
        let store = MemoryStore::new();
        store.add_user(UserCredentials {
            id: 3,
            username: "hr.lead".into(),
            password_hash: hash_password("pa55word").unwrap(),
            role_id: 2,
            employee_id: Some(8),
        });
        store
    }

    fn dto(username: &str, password: &str) -> LoginReqDto {
        LoginReqDto {
            username: username.into(),
            password: password.into(),
        }
    }

    #[actix_web::test]
    async fn login_issues_token_with_employee_link() {
        let store = store_with_user();
        let config = Config::for_tests();
        let resp = authenticate(&store, &config, &dto(" HR.Lead ", "pa55word"))
            .await
            .unwrap();
        let claims = verify_token(&resp.access_token, &config.jwt_secret).unwrap();
        assert_eq!(claims.user_id, 3);
        assert_eq!(claims.role, 2);
        assert_eq!(claims.employee_id, Some(8));
    }

    #[actix_web::test]
    async fn login_rejects_bad_credentials() {
        let store = store_with_user();
        let config = Config::for_tests();
        let wrong = authenticate(&store, &config, &dto("hr.lead", "nope")).await;
        assert!(matches!(wrong, Err(ApiError::Unauthorized(_))));
        let unknown = authenticate(&store, &config, &dto("ghost", "pa55word")).await;
        assert!(matches!(unknown, Err(ApiError::Unauthorized(_))));
        let empty = authenticate(&store, &config, &dto("  ", "")).await;
        assert!(matches!(empty, Err(ApiError::BadRequest(_))));
    }
}
