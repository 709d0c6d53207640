//! Persistence seams.
//!
//! Handlers and services only talk to these traits. `mysql::MySqlStore` is
//! the production implementation; tests run against `memory::MemoryStore`.
//! Futures are not required to be `Send`, actix runs each request on the
//! worker that accepted it.
#![allow(async_fn_in_trait)]

use chrono::NaiveDateTime;

use crate::error::StoreResult;
use crate::model::employee::Employee;
use crate::model::inventory::{Checkout, InventoryFilter, InventoryItem, NewInventoryItem};
use crate::model::salary::{LineItem, NewSalary, Salary};
use crate::model::user::{NewStaff, StaffIds, UserCredentials};

#[cfg(test)]
pub mod memory;
pub mod mysql;

pub trait EmployeeStore {
    async fn find_employee(&self, id: u64) -> StoreResult<Option<Employee>>;

    /// Appends to `salary_history` in a single store operation.
    async fn push_salary_history(&self, employee_id: u64, salary_id: u64) -> StoreResult<()>;
}

pub trait SalaryStore {
    async fn insert_salary(&self, salary: &NewSalary) -> StoreResult<u64>;

    async fn find_salary(&self, id: u64) -> StoreResult<Option<Salary>>;

    /// Overwrites the line items only. Unknown ids are a no-op.
    async fn update_line_items(
        &self,
        salary_id: u64,
        deductions: &[LineItem],
        extra_incomes: &[LineItem],
    ) -> StoreResult<()>;
}

pub trait UserStore {
    async fn find_credentials(&self, username: &str) -> StoreResult<Option<UserCredentials>>;

    /// Creates the employee and the linked user together.
    /// Fails with `StoreError::Duplicate` when the username is taken.
    async fn create_staff(&self, staff: &NewStaff) -> StoreResult<StaffIds>;
}

pub trait InventoryStore {
    async fn insert_item(&self, item: &NewInventoryItem) -> StoreResult<u64>;

    async fn list_items(&self, filter: InventoryFilter) -> StoreResult<(Vec<InventoryItem>, i64)>;

    async fn find_item(&self, id: u64) -> StoreResult<Option<InventoryItem>>;

    /// Marks the item borrowed if it is currently available.
    async fn borrow_item(&self, id: u64, employee_id: u64, at: NaiveDateTime) -> StoreResult<Checkout>;

    /// Closes the open borrow entry if the item is currently borrowed.
    async fn return_item(&self, id: u64, at: NaiveDateTime) -> StoreResult<Checkout>;
}
