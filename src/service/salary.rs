//! Monthly salary computation and line-item edits.
//!
//! Every store call is guarded individually. Failures are logged inside the
//! operation's span and surfaced as `ApiError::Internal`, so callers never see
//! store detail. A create that fails while linking the salary to the employee
//! leaves the salary row behind unlinked; this is logged, not compensated.

use chrono::{Datelike, NaiveDate};
use serde::Deserialize;
use tracing::{error, info, instrument, warn};
use utoipa::ToSchema;

use crate::error::ApiError;
use crate::model::salary::{LineItem, Month, MonthInput, NewSalary, Salary, SalaryFigures, YearInput};
use crate::store::{EmployeeStore, SalaryStore};

pub const YEAR_LENGTH_MESSAGE: &str = "Year must be 4 in length. E.g. 1998";
pub const EDIT_WINDOW_CLOSED_MESSAGE: &str =
    "Salary can only be edited within the current month and year";

#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateSalaryRequest {
    #[schema(example = 1)]
    pub employee_id: u64,
    #[schema(example = "October")]
    pub month: Month,
    #[schema(example = 2026, value_type = i32)]
    pub year: YearInput,
    #[serde(default)]
    pub deductions: Vec<LineItem>,
    #[serde(default)]
    pub extra_incomes: Vec<LineItem>,
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateSalaryRequest {
    #[schema(example = 12)]
    pub salary_id: u64,
    #[schema(example = "October", value_type = Month)]
    pub month: MonthInput,
    #[schema(example = 2026, value_type = i32)]
    pub year: YearInput,
    #[serde(default)]
    pub deductions: Vec<LineItem>,
    #[serde(default)]
    pub extra_incomes: Vec<LineItem>,
}

/// Computes and stores a salary for `req.month`/`req.year`, then links it
/// into the employee's history. Returns the new salary id.
#[instrument(name = "CREATE_SALARY", skip_all, fields(employee_id = req.employee_id))]
pub async fn create_salary<S>(store: &S, req: CreateSalaryRequest) -> Result<u64, ApiError>
where
    S: EmployeeStore + SalaryStore,
{
    info!(month = %req.month, year = %req.year.rendered(), "Receive request to create salary");

    let Some(year) = req.year.four_digit() else {
        warn!(year = %req.year.rendered(), "Rejected year that is not 4 digits");
        return Err(ApiError::bad_request(YEAR_LENGTH_MESSAGE));
    };

    // 1) employee compensation
    let employee = match store.find_employee(req.employee_id).await {
        Ok(Some(employee)) => employee,
        Ok(None) => {
            info!("Employee not found");
            return Err(ApiError::not_found("Employee not found"));
        }
        Err(e) => {
            error!(error = %e, "Failed to get employee salary details");
            return Err(ApiError::Internal);
        }
    };

    // 2) net pay
    let figures = SalaryFigures::compute(&employee, &req.deductions, &req.extra_incomes);

    // 3) persist
    let new_salary = NewSalary {
        month: req.month,
        year,
        figures,
        deductions: req.deductions,
        extra_incomes: req.extra_incomes,
    };
    let salary_id = store.insert_salary(&new_salary).await.map_err(|e| {
        error!(error = %e, "Failed to create new salary");
        ApiError::Internal
    })?;

    // 4) link into history
    store
        .push_salary_history(employee.id, salary_id)
        .await
        .map_err(|e| {
            error!(error = %e, salary_id, "Failed to save salary to employee, salary left unlinked");
            ApiError::Internal
        })?;

    info!(salary_id, net_pay = %new_salary.figures.net_pay, "Updated employee salary history");
    Ok(salary_id)
}

/// True when `month`/`year` name the calendar month containing `today`.
pub fn within_edit_window(month: &MonthInput, year: &YearInput, today: NaiveDate) -> bool {
    month
        .month()
        .is_some_and(|m| m.index0() == today.month0() as usize)
        && year.as_i32() == Some(today.year())
}

/// Replaces the deductions and extra incomes of a salary in the current
/// month. Computed amounts, net pay included, are left as they were.
#[instrument(name = "UPDATE_SALARY", skip_all, fields(salary_id = req.salary_id))]
pub async fn update_salary<S>(store: &S, req: UpdateSalaryRequest, today: NaiveDate) -> Result<(), ApiError>
where
    S: SalaryStore,
{
    info!(month = %req.month.rendered(), year = %req.year.rendered(), "Receive request to update salary");

    if !within_edit_window(&req.month, &req.year, today) {
        warn!("Trying to edit salary that's not within current month or year");
        return Err(ApiError::bad_request(EDIT_WINDOW_CLOSED_MESSAGE));
    }

    store
        .update_line_items(req.salary_id, &req.deductions, &req.extra_incomes)
        .await
        .map_err(|e| {
            error!(error = %e, "Failed to update salary");
            ApiError::Internal
        })
}

#[instrument(name = "GET_SALARY", skip(store))]
pub async fn get_salary<S: SalaryStore>(store: &S, salary_id: u64) -> Result<Salary, ApiError> {
    match store.find_salary(salary_id).await {
        Ok(Some(salary)) => Ok(salary),
        Ok(None) => Err(ApiError::not_found("Salary not found")),
        Err(e) => {
            error!(error = %e, "Failed to fetch salary");
            Err(ApiError::Internal)
        }
    }
}
