use actix_web::{HttpResponse, web};

use crate::auth::auth::AuthUser;
use crate::error::ApiError;
use crate::service::user::{self, CreateUserRequest, CreateUserResponse};
use crate::store::UserStore;

/// Create a staff member: login account plus employee compensation record
#[utoipa::path(
    post,
    path = "/user/create",
    request_body = CreateUserRequest,
    responses(
        (status = 201, description = "User and employee created", body = CreateUserResponse),
        (status = 400, description = "Invalid staff details"),
        (status = 409, description = "Username already exists", body = Object, example = json!({
            "message": "Username already exists"
        })),
        (status = 500, description = "Internal server error")
    ),
    security(("bearer_auth" = [])),
    tag = "User"
)]
pub async fn create_user<S: UserStore + 'static>(
    auth: AuthUser,
    store: web::Data<S>,
    payload: web::Json<CreateUserRequest>,
) -> Result<HttpResponse, ApiError> {
    auth.require_hr_or_admin()?;

    let ids = user::create_user(store.get_ref(), payload.into_inner()).await?;
    Ok(HttpResponse::Created().json(CreateUserResponse::from(ids)))
}
