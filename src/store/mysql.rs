use chrono::{NaiveDate, NaiveDateTime};
use sqlx::types::Json;
use sqlx::{FromRow, MySqlPool};
use std::str::FromStr;
use tracing::debug;

use crate::error::{StoreError, StoreResult};
use crate::model::employee::Employee;
use crate::model::inventory::{BorrowRecord, Checkout, InventoryFilter, InventoryItem, NewInventoryItem};
use crate::model::money::{Amount, Percentage};
use crate::model::salary::{LineItem, Month, NewSalary, Salary, SalaryFigures};
use crate::model::user::{NewStaff, StaffIds, UserCredentials};
use crate::store::{EmployeeStore, InventoryStore, SalaryStore, UserStore};

#[derive(Clone)]
pub struct MySqlStore {
    pool: MySqlPool,
}

impl MySqlStore {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    async fn item_exists(&self, id: u64) -> StoreResult<bool> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM inventory WHERE id = ?")
            .bind(id)
            .fetch_one(&self.pool)
            .await?;
        Ok(count > 0)
    }
}

fn corrupt(what: &str, e: impl std::fmt::Display) -> StoreError {
    StoreError::Corrupt(format!("{what}: {e}"))
}

#[derive(FromRow)]
struct EmployeeRow {
    id: u64,
    full_name: String,
    email: String,
    basic_pay: String,
    employee_epf_percentage: String,
    company_epf_percentage: String,
    socso_percentage: String,
    salary_history: Json<Vec<u64>>,
}

impl TryFrom<EmployeeRow> for Employee {
    type Error = StoreError;

    fn try_from(row: EmployeeRow) -> Result<Self, Self::Error> {
        Ok(Employee {
            id: row.id,
            full_name: row.full_name,
            email: row.email,
            basic_pay: Amount::parse(&row.basic_pay).map_err(|e| corrupt("employees.basic_pay", e))?,
            employee_epf_percentage: Percentage::parse(&row.employee_epf_percentage)
                .map_err(|e| corrupt("employees.employee_epf_percentage", e))?,
            company_epf_percentage: Percentage::parse(&row.company_epf_percentage)
                .map_err(|e| corrupt("employees.company_epf_percentage", e))?,
            socso_percentage: Percentage::parse(&row.socso_percentage)
                .map_err(|e| corrupt("employees.socso_percentage", e))?,
            salary_history: row.salary_history.0,
        })
    }
}

#[derive(FromRow)]
struct SalaryRow {
    id: u64,
    month: String,
    year: i32,
    basic_pay: String,
    employee_epf_amount: String,
    company_epf_amount: String,
    socso_amount: String,
    net_pay: String,
    deductions: Json<Vec<LineItem>>,
    extra_incomes: Json<Vec<LineItem>>,
}

impl TryFrom<SalaryRow> for Salary {
    type Error = StoreError;

    fn try_from(row: SalaryRow) -> Result<Self, Self::Error> {
        let amount = |column: &str, raw: &str| {
            Amount::parse(raw).map_err(|e| corrupt(&format!("salaries.{column}"), e))
        };
        Ok(Salary {
            id: row.id,
            month: Month::from_str(&row.month).map_err(|e| corrupt("salaries.month", e))?,
            year: row.year,
            basic_pay: amount("basic_pay", &row.basic_pay)?,
            employee_epf_amount: amount("employee_epf_amount", &row.employee_epf_amount)?,
            company_epf_amount: amount("company_epf_amount", &row.company_epf_amount)?,
            socso_amount: amount("socso_amount", &row.socso_amount)?,
            net_pay: amount("net_pay", &row.net_pay)?,
            deductions: row.deductions.0,
            extra_incomes: row.extra_incomes.0,
        })
    }
}

#[derive(FromRow)]
struct InventoryRow {
    id: u64,
    name: String,
    inventory_type: String,
    description: Option<String>,
    location: Option<String>,
    is_available: bool,
    last_borrowed_by: Option<u64>,
    last_borrowed_date: Option<NaiveDateTime>,
    purchased_on: Option<NaiveDate>,
    purchase_price: Option<String>,
    purchase_at: Option<String>,
    created_at: NaiveDateTime,
    updated_at: NaiveDateTime,
}

impl TryFrom<InventoryRow> for InventoryItem {
    type Error = StoreError;

    fn try_from(row: InventoryRow) -> Result<Self, Self::Error> {
        let purchase_price = row
            .purchase_price
            .as_deref()
            .map(Amount::parse)
            .transpose()
            .map_err(|e| corrupt("inventory.purchase_price", e))?;
        Ok(InventoryItem {
            id: row.id,
            name: row.name,
            inventory_type: row.inventory_type,
            description: row.description,
            location: row.location,
            is_available: row.is_available,
            last_borrowed_by: row.last_borrowed_by,
            last_borrowed_date: row.last_borrowed_date,
            purchased_on: row.purchased_on,
            purchase_price,
            purchase_at: row.purchase_at,
            history: Vec::new(),
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

#[derive(FromRow)]
struct BorrowRow {
    borrowed_by: u64,
    borrowed_on: NaiveDateTime,
    returned_on: Option<NaiveDateTime>,
}

const INVENTORY_COLUMNS: &str = "id, name, inventory_type, description, location, is_available, \
    last_borrowed_by, last_borrowed_date, purchased_on, purchase_price, purchase_at, \
    created_at, updated_at";

impl EmployeeStore for MySqlStore {
    async fn find_employee(&self, id: u64) -> StoreResult<Option<Employee>> {
        let row = sqlx::query_as::<_, EmployeeRow>(
            r#"
            SELECT id, full_name, email, basic_pay, employee_epf_percentage,
                   company_epf_percentage, socso_percentage, salary_history
            FROM employees
            WHERE id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(Employee::try_from).transpose()
    }

    async fn push_salary_history(&self, employee_id: u64, salary_id: u64) -> StoreResult<()> {
        let result = sqlx::query(
            r#"
            UPDATE employees
            SET salary_history = JSON_ARRAY_APPEND(salary_history, '$', ?)
            WHERE id = ?
            "#,
        )
        .bind(salary_id)
        .bind(employee_id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::Missing("employee"));
        }
        Ok(())
    }
}

impl SalaryStore for MySqlStore {
    async fn insert_salary(&self, salary: &NewSalary) -> StoreResult<u64> {
        let SalaryFigures {
            basic_pay,
            employee_epf_amount,
            company_epf_amount,
            socso_amount,
            net_pay,
        } = &salary.figures;

        let result = sqlx::query(
            r#"
            INSERT INTO salaries
            (month, year, basic_pay, employee_epf_amount, company_epf_amount,
             socso_amount, net_pay, deductions, extra_incomes)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(salary.month.as_ref())
        .bind(salary.year)
        .bind(basic_pay.as_str())
        .bind(employee_epf_amount.as_str())
        .bind(company_epf_amount.as_str())
        .bind(socso_amount.as_str())
        .bind(net_pay.as_str())
        .bind(Json(&salary.deductions))
        .bind(Json(&salary.extra_incomes))
        .execute(&self.pool)
        .await?;

        Ok(result.last_insert_id())
    }

    async fn find_salary(&self, id: u64) -> StoreResult<Option<Salary>> {
        let row = sqlx::query_as::<_, SalaryRow>(
            r#"
            SELECT id, month, year, basic_pay, employee_epf_amount, company_epf_amount,
                   socso_amount, net_pay, deductions, extra_incomes
            FROM salaries
            WHERE id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(Salary::try_from).transpose()
    }

    async fn update_line_items(
        &self,
        salary_id: u64,
        deductions: &[LineItem],
        extra_incomes: &[LineItem],
    ) -> StoreResult<()> {
        let result = sqlx::query(
            r#"
            UPDATE salaries
            SET deductions = ?, extra_incomes = ?
            WHERE id = ?
            "#,
        )
        .bind(Json(deductions))
        .bind(Json(extra_incomes))
        .bind(salary_id)
        .execute(&self.pool)
        .await?;

        debug!(salary_id, rows = result.rows_affected(), "Salary line items written");
        Ok(())
    }
}

impl UserStore for MySqlStore {
    async fn find_credentials(&self, username: &str) -> StoreResult<Option<UserCredentials>> {
        let row = sqlx::query_as::<_, (u64, String, String, u8, Option<u64>)>(
            r#"
            SELECT id, username, password, role_id, employee_id
            FROM users
            WHERE username = ?
            "#,
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|(id, username, password_hash, role_id, employee_id)| UserCredentials {
            id,
            username,
            password_hash,
            role_id,
            employee_id,
        }))
    }

    async fn create_staff(&self, staff: &NewStaff) -> StoreResult<StaffIds> {
        let mut tx = self.pool.begin().await?;
        let employee = &staff.employee;

        let employee_id = sqlx::query(
            r#"
            INSERT INTO employees
            (full_name, email, basic_pay, employee_epf_percentage,
             company_epf_percentage, socso_percentage, salary_history)
            VALUES (?, ?, ?, ?, ?, ?, JSON_ARRAY())
            "#,
        )
        .bind(&employee.full_name)
        .bind(&employee.email)
        .bind(employee.basic_pay.as_str())
        .bind(employee.employee_epf_percentage.as_str())
        .bind(employee.company_epf_percentage.as_str())
        .bind(employee.socso_percentage.as_str())
        .execute(&mut *tx)
        .await?
        .last_insert_id();

        let user_id = sqlx::query(
            r#"
            INSERT INTO users (username, password, role_id, employee_id)
            VALUES (?, ?, ?, ?)
            "#,
        )
        .bind(&staff.username)
        .bind(&staff.password_hash)
        .bind(staff.role_id)
        .bind(employee_id)
        .execute(&mut *tx)
        .await?
        .last_insert_id();

        tx.commit().await?;
        Ok(StaffIds { user_id, employee_id })
    }
}

impl InventoryStore for MySqlStore {
    async fn insert_item(&self, item: &NewInventoryItem) -> StoreResult<u64> {
        let result = sqlx::query(
            r#"
            INSERT INTO inventory
            (name, inventory_type, description, location, purchased_on, purchase_price, purchase_at)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&item.name)
        .bind(&item.inventory_type)
        .bind(item.description.as_deref())
        .bind(item.location.as_deref())
        .bind(item.purchased_on)
        .bind(item.purchase_price.as_ref().map(Amount::as_str))
        .bind(item.purchase_at.as_deref())
        .execute(&self.pool)
        .await?;

        Ok(result.last_insert_id())
    }

    async fn list_items(&self, filter: InventoryFilter) -> StoreResult<(Vec<InventoryItem>, i64)> {
        let where_clause = if filter.available.is_some() {
            "WHERE is_available = ?"
        } else {
            ""
        };

        let count_sql = format!("SELECT COUNT(*) FROM inventory {where_clause}");
        let mut count_query = sqlx::query_scalar::<_, i64>(&count_sql);
        if let Some(available) = filter.available {
            count_query = count_query.bind(available);
        }
        let total = count_query.fetch_one(&self.pool).await?;

        let data_sql = format!(
            "SELECT {INVENTORY_COLUMNS} FROM inventory {where_clause} ORDER BY id DESC LIMIT ? OFFSET ?"
        );
        debug!(
            sql = %data_sql,
            available = ?filter.available,
            limit = filter.limit,
            offset = filter.offset,
            "Fetching inventory"
        );
        let mut data_query = sqlx::query_as::<_, InventoryRow>(&data_sql);
        if let Some(available) = filter.available {
            data_query = data_query.bind(available);
        }
        let rows = data_query
            .bind(filter.limit)
            .bind(filter.offset)
            .fetch_all(&self.pool)
            .await?;

        let items = rows
            .into_iter()
            .map(InventoryItem::try_from)
            .collect::<StoreResult<Vec<_>>>()?;
        Ok((items, total))
    }

    async fn find_item(&self, id: u64) -> StoreResult<Option<InventoryItem>> {
        let sql = format!("SELECT {INVENTORY_COLUMNS} FROM inventory WHERE id = ?");
        let Some(row) = sqlx::query_as::<_, InventoryRow>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
        else {
            return Ok(None);
        };

        let mut item = InventoryItem::try_from(row)?;
        item.history = sqlx::query_as::<_, BorrowRow>(
            r#"
            SELECT borrowed_by, borrowed_on, returned_on
            FROM inventory_history
            WHERE inventory_id = ?
            ORDER BY id
            "#,
        )
        .bind(id)
        .fetch_all(&self.pool)
        .await?
        .into_iter()
        .map(|r| BorrowRecord {
            borrowed_by: r.borrowed_by,
            borrowed_on: r.borrowed_on,
            returned_on: r.returned_on,
        })
        .collect();

        Ok(Some(item))
    }

    async fn borrow_item(&self, id: u64, employee_id: u64, at: NaiveDateTime) -> StoreResult<Checkout> {
        let mut tx = self.pool.begin().await?;

        let flipped = sqlx::query(
            r#"
            UPDATE inventory
            SET is_available = FALSE, last_borrowed_by = ?, last_borrowed_date = ?
            WHERE id = ? AND is_available = TRUE
            "#,
        )
        .bind(employee_id)
        .bind(at)
        .bind(id)
        .execute(&mut *tx)
        .await?
        .rows_affected();

        if flipped == 0 {
            tx.rollback().await?;
            return Ok(if self.item_exists(id).await? {
                Checkout::AlreadyInState
            } else {
                Checkout::NoSuchItem
            });
        }

        sqlx::query(
            r#"
            INSERT INTO inventory_history (inventory_id, borrowed_by, borrowed_on)
            VALUES (?, ?, ?)
            "#,
        )
        .bind(id)
        .bind(employee_id)
        .bind(at)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(Checkout::Done)
    }

    async fn return_item(&self, id: u64, at: NaiveDateTime) -> StoreResult<Checkout> {
        let mut tx = self.pool.begin().await?;

        let flipped = sqlx::query(
            "UPDATE inventory SET is_available = TRUE WHERE id = ? AND is_available = FALSE",
        )
        .bind(id)
        .execute(&mut *tx)
        .await?
        .rows_affected();

        if flipped == 0 {
            tx.rollback().await?;
            return Ok(if self.item_exists(id).await? {
                Checkout::AlreadyInState
            } else {
                Checkout::NoSuchItem
            });
        }

        sqlx::query(
            r#"
            UPDATE inventory_history
            SET returned_on = ?
            WHERE inventory_id = ? AND returned_on IS NULL
            "#,
        )
        .bind(at)
        .bind(id)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(Checkout::Done)
    }
}
