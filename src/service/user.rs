use derive_more::Display;
use serde::{Deserialize, Serialize};
use tracing::{error, info, instrument, warn};
use utoipa::ToSchema;

use crate::auth::password::hash_password;
use crate::error::{ApiError, StoreError};
use crate::model::employee::NewEmployee;
use crate::model::money::{Amount, MoneyError, Percentage};
use crate::model::role::Role;
use crate::model::user::{NewStaff, StaffIds};
use crate::store::UserStore;

#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateUserRequest {
    #[schema(example = "aina")]
    pub username: String,
    #[schema(example = "changeme123")]
    pub password: String,
    #[schema(example = 3)]
    pub role_id: u8,
    #[schema(example = "Nurul Aina")]
    pub full_name: String,
    #[schema(example = "aina@company.com")]
    pub email: String,
    #[schema(example = "3000")]
    pub basic_pay: String,
    #[schema(example = "11")]
    pub employee_epf_percentage: String,
    #[schema(example = "13")]
    pub company_epf_percentage: String,
    #[schema(example = "0.5")]
    pub socso_percentage: String,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateUserResponse {
    pub user_id: u64,
    pub employee_id: u64,
}

impl From<StaffIds> for CreateUserResponse {
    fn from(ids: StaffIds) -> Self {
        Self {
            user_id: ids.user_id,
            employee_id: ids.employee_id,
        }
    }
}

#[derive(Debug, Display, PartialEq)]
pub enum StaffValidationError {
    #[display(fmt = "Username and password must not be empty")]
    MissingCredentials,
    #[display(fmt = "Full name and email must not be empty")]
    MissingProfile,
    #[display(fmt = "Unknown role id {}", _0)]
    UnknownRole(u8),
    #[display(fmt = "basicPay must not be negative")]
    NegativePay,
    #[display(fmt = "{}: {}", field, source)]
    Money { field: &'static str, source: MoneyError },
}

/// Validated, normalized staff record without the password hash.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidStaff {
    pub username: String,
    pub role: Role,
    pub employee: NewEmployee,
}

fn money<T>(field: &'static str, parsed: Result<T, MoneyError>) -> Result<T, StaffValidationError> {
    parsed.map_err(|source| StaffValidationError::Money { field, source })
}

pub fn validate_staff(req: &CreateUserRequest) -> Result<ValidStaff, StaffValidationError> {
    let username = req.username.trim().to_lowercase();
    if username.is_empty() || req.password.is_empty() {
        return Err(StaffValidationError::MissingCredentials);
    }
    if req.full_name.trim().is_empty() || req.email.trim().is_empty() {
        return Err(StaffValidationError::MissingProfile);
    }
    let role = Role::from_id(req.role_id).ok_or(StaffValidationError::UnknownRole(req.role_id))?;

    let basic_pay = money("basicPay", Amount::parse(&req.basic_pay))?;
    if basic_pay.value() < 0.0 {
        return Err(StaffValidationError::NegativePay);
    }

    Ok(ValidStaff {
        username,
        role,
        employee: NewEmployee {
            full_name: req.full_name.trim().to_string(),
            email: req.email.trim().to_string(),
            basic_pay,
            employee_epf_percentage: money(
                "employeeEpfPercentage",
                Percentage::parse(&req.employee_epf_percentage),
            )?,
            company_epf_percentage: money(
                "companyEpfPercentage",
                Percentage::parse(&req.company_epf_percentage),
            )?,
            socso_percentage: money("socsoPercentage", Percentage::parse(&req.socso_percentage))?,
        },
    })
}

#[instrument(name = "CREATE_USER", skip_all, fields(username = %req.username))]
pub async fn create_user<S: UserStore>(store: &S, req: CreateUserRequest) -> Result<StaffIds, ApiError> {
    info!("Receive request to create user");

    let valid = validate_staff(&req).map_err(|e| {
        warn!(error = %e, "Rejected staff payload");
        ApiError::bad_request(e.to_string())
    })?;

    let password_hash = hash_password(&req.password).map_err(|e| {
        error!(error = %e, "Failed to hash password");
        ApiError::Internal
    })?;

    let staff = NewStaff {
        username: valid.username,
        password_hash,
        role_id: valid.role.id(),
        employee: valid.employee,
    };

    match store.create_staff(&staff).await {
        Ok(ids) => {
            info!(user_id = ids.user_id, employee_id = ids.employee_id, "User created");
            Ok(ids)
        }
        Err(StoreError::Duplicate) => Err(ApiError::Conflict("Username already exists".into())),
        Err(e) => {
            error!(error = %e, "Failed to create user");
            Err(ApiError::Internal)
        }
    }
}
