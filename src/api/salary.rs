use actix_web::{HttpResponse, web};
use chrono::Local;

use crate::auth::auth::AuthUser;
use crate::error::ApiError;
use crate::service::salary::{self, CreateSalaryRequest, UpdateSalaryRequest};
use crate::store::{EmployeeStore, SalaryStore};

#[utoipa::path(
    post,
    path = "/salary/create",
    request_body = CreateSalaryRequest,
    responses(
        (status = 200, description = "Salary computed and linked to the employee"),
        (status = 400, description = "Year is not 4 digits or a line item amount is not a decimal", body = Object, example = json!({
            "message": "Year must be 4 in length. E.g. 1998"
        })),
        (status = 404, description = "Employee not found", body = Object, example = json!({
            "message": "Employee not found"
        })),
        (status = 500, description = "Internal server error")
    ),
    security(("bearer_auth" = [])),
    tag = "Salary"
)]
pub async fn create_salary<S: EmployeeStore + SalaryStore + 'static>(
    auth: AuthUser,
    store: web::Data<S>,
    payload: web::Json<CreateSalaryRequest>,
) -> Result<HttpResponse, ApiError> {
    auth.require_hr_or_admin()?;

    salary::create_salary(store.get_ref(), payload.into_inner()).await?;
    Ok(HttpResponse::Ok().finish())
}

#[utoipa::path(
    post,
    path = "/salary/update",
    request_body = UpdateSalaryRequest,
    responses(
        (status = 200, description = "Deductions and extra incomes replaced"),
        (status = 400, description = "Outside the current month and year", body = Object, example = json!({
            "message": "Salary can only be edited within the current month and year"
        })),
        (status = 500, description = "Internal server error")
    ),
    security(("bearer_auth" = [])),
    tag = "Salary"
)]
pub async fn update_salary<S: SalaryStore + 'static>(
    auth: AuthUser,
    store: web::Data<S>,
    payload: web::Json<UpdateSalaryRequest>,
) -> Result<HttpResponse, ApiError> {
    auth.require_hr_or_admin()?;

    let today = Local::now().date_naive();
    salary::update_salary(store.get_ref(), payload.into_inner(), today).await?;
    Ok(HttpResponse::Ok().finish())
}

#[utoipa::path(
    get,
    path = "/salary/{salary_id}",
    params(
        ("salary_id", Path, description = "Salary ID")
    ),
    responses(
        (status = 200, body = crate::model::salary::Salary),
        (status = 404, description = "Salary not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Salary"
)]
pub async fn get_salary<S: SalaryStore + 'static>(
    auth: AuthUser,
    store: web::Data<S>,
    path: web::Path<u64>,
) -> Result<HttpResponse, ApiError> {
    auth.require_hr_or_admin()?;

    let salary = salary::get_salary(store.get_ref(), path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(salary))
}
