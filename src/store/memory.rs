use chrono::NaiveDateTime;
use std::sync::Mutex;

use crate::error::{StoreError, StoreResult};
use crate::model::employee::Employee;
use crate::model::inventory::{BorrowRecord, Checkout, InventoryFilter, InventoryItem, NewInventoryItem};
use crate::model::salary::{LineItem, NewSalary, Salary};
use crate::model::user::{NewStaff, StaffIds, UserCredentials};
use crate::store::{EmployeeStore, InventoryStore, SalaryStore, UserStore};

/// Which store calls should fail with a database error.
#[derive(Debug, Default, Clone, Copy)]
pub struct FailPoints {
    pub find_employee: bool,
    pub push_history: bool,
    pub insert_salary: bool,
    pub update_salary: bool,
}

#[derive(Default)]
struct Inner {
    employees: Vec<Employee>,
    salaries: Vec<Salary>,
    users: Vec<UserCredentials>,
    items: Vec<InventoryItem>,
    next_id: u64,
}

impl Inner {
    fn next_id(&mut self) -> u64 {
        self.next_id += 1;
        self.next_id
    }
}

#[derive(Default)]
pub struct MemoryStore {
    inner: Mutex<Inner>,
    pub fail: Mutex<FailPoints>,
}

fn injected() -> StoreError {
    StoreError::Database(sqlx::Error::PoolTimedOut)
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_employee(&self, mut employee: Employee) -> u64 {
        let mut inner = self.inner.lock().unwrap();
        employee.id = inner.next_id();
        let id = employee.id;
        inner.employees.push(employee);
        id
    }

    pub fn add_user(&self, user: UserCredentials) {
        self.inner.lock().unwrap().users.push(user);
    }

    pub fn employee(&self, id: u64) -> Option<Employee> {
        self.inner.lock().unwrap().employees.iter().find(|e| e.id == id).cloned()
    }

    pub fn salaries(&self) -> Vec<Salary> {
        self.inner.lock().unwrap().salaries.clone()
    }

    pub fn put_salary(&self, mut salary: Salary) -> u64 {
        let mut inner = self.inner.lock().unwrap();
        salary.id = inner.next_id();
        let id = salary.id;
        inner.salaries.push(salary);
        id
    }

    pub fn set_fail(&self, f: impl FnOnce(&mut FailPoints)) {
        f(&mut self.fail.lock().unwrap());
    }

    fn fails(&self) -> FailPoints {
        *self.fail.lock().unwrap()
    }
}

impl EmployeeStore for MemoryStore {
    async fn find_employee(&self, id: u64) -> StoreResult<Option<Employee>> {
        if self.fails().find_employee {
            return Err(injected());
        }
        Ok(self.employee(id))
    }

    async fn push_salary_history(&self, employee_id: u64, salary_id: u64) -> StoreResult<()> {
        if self.fails().push_history {
            return Err(injected());
        }
        let mut inner = self.inner.lock().unwrap();
        let employee = inner
            .employees
            .iter_mut()
            .find(|e| e.id == employee_id)
            .ok_or(StoreError::Missing("employee"))?;
        employee.salary_history.push(salary_id);
        Ok(())
    }
}

impl SalaryStore for MemoryStore {
    async fn insert_salary(&self, salary: &NewSalary) -> StoreResult<u64> {
        if self.fails().insert_salary {
            return Err(injected());
        }
        let f = salary.figures.clone();
        Ok(self.put_salary(Salary {
            id: 0,
            month: salary.month,
            year: salary.year,
            basic_pay: f.basic_pay,
            employee_epf_amount: f.employee_epf_amount,
            company_epf_amount: f.company_epf_amount,
            socso_amount: f.socso_amount,
            net_pay: f.net_pay,
            deductions: salary.deductions.clone(),
            extra_incomes: salary.extra_incomes.clone(),
        }))
    }

    async fn find_salary(&self, id: u64) -> StoreResult<Option<Salary>> {
        Ok(self.salaries().into_iter().find(|s| s.id == id))
    }

    async fn update_line_items(
        &self,
        salary_id: u64,
        deductions: &[LineItem],
        extra_incomes: &[LineItem],
    ) -> StoreResult<()> {
        if self.fails().update_salary {
            return Err(injected());
        }
        let mut inner = self.inner.lock().unwrap();
        if let Some(salary) = inner.salaries.iter_mut().find(|s| s.id == salary_id) {
            salary.deductions = deductions.to_vec();
            salary.extra_incomes = extra_incomes.to_vec();
        }
        Ok(())
    }
}

impl UserStore for MemoryStore {
    async fn find_credentials(&self, username: &str) -> StoreResult<Option<UserCredentials>> {
        let inner = self.inner.lock().unwrap();
        Ok(inner.users.iter().find(|u| u.username == username).cloned())
    }

    async fn create_staff(&self, staff: &NewStaff) -> StoreResult<StaffIds> {
        let mut inner = self.inner.lock().unwrap();
        if inner.users.iter().any(|u| u.username == staff.username) {
            return Err(StoreError::Duplicate);
        }
        let e = &staff.employee;
        let employee_id = inner.next_id();
        inner.employees.push(Employee {
            id: employee_id,
            full_name: e.full_name.clone(),
            email: e.email.clone(),
            basic_pay: e.basic_pay.clone(),
            employee_epf_percentage: e.employee_epf_percentage.clone(),
            company_epf_percentage: e.company_epf_percentage.clone(),
            socso_percentage: e.socso_percentage.clone(),
            salary_history: Vec::new(),
        });
        let user_id = inner.next_id();
        inner.users.push(UserCredentials {
            id: user_id,
            username: staff.username.clone(),
            password_hash: staff.password_hash.clone(),
            role_id: staff.role_id,
            employee_id: Some(employee_id),
        });
        Ok(StaffIds { user_id, employee_id })
    }
}

impl InventoryStore for MemoryStore {
    async fn insert_item(&self, item: &NewInventoryItem) -> StoreResult<u64> {
        let mut inner = self.inner.lock().unwrap();
        let id = inner.next_id();
        let now = NaiveDateTime::default();
        inner.items.push(InventoryItem {
            id,
            name: item.name.clone(),
            inventory_type: item.inventory_type.clone(),
            description: item.description.clone(),
            location: item.location.clone(),
            is_available: true,
            last_borrowed_by: None,
            last_borrowed_date: None,
            purchased_on: item.purchased_on,
            purchase_price: item.purchase_price.clone(),
            purchase_at: item.purchase_at.clone(),
            history: Vec::new(),
            created_at: now,
            updated_at: now,
        });
        Ok(id)
    }

    async fn list_items(&self, filter: InventoryFilter) -> StoreResult<(Vec<InventoryItem>, i64)> {
        let inner = self.inner.lock().unwrap();
        let matching: Vec<_> = inner
            .items
            .iter()
            .rev()
            .filter(|i| filter.available.is_none_or(|a| i.is_available == a))
            .cloned()
            .collect();
        let total = matching.len() as i64;
        let page = matching
            .into_iter()
            .skip(filter.offset as usize)
            .take(filter.limit as usize)
            .map(|mut i| {
                i.history.clear();
                i
            })
            .collect();
        Ok((page, total))
    }

    async fn find_item(&self, id: u64) -> StoreResult<Option<InventoryItem>> {
        let inner = self.inner.lock().unwrap();
        Ok(inner.items.iter().find(|i| i.id == id).cloned())
    }

    async fn borrow_item(&self, id: u64, employee_id: u64, at: NaiveDateTime) -> StoreResult<Checkout> {
        let mut inner = self.inner.lock().unwrap();
        let Some(item) = inner.items.iter_mut().find(|i| i.id == id) else {
            return Ok(Checkout::NoSuchItem);
        };
        if !item.is_available {
            return Ok(Checkout::AlreadyInState);
        }
        item.is_available = false;
        item.last_borrowed_by = Some(employee_id);
        item.last_borrowed_date = Some(at);
        item.history.push(BorrowRecord {
            borrowed_by: employee_id,
            borrowed_on: at,
            returned_on: None,
        });
        Ok(Checkout::Done)
    }

    async fn return_item(&self, id: u64, at: NaiveDateTime) -> StoreResult<Checkout> {
        let mut inner = self.inner.lock().unwrap();
        let Some(item) = inner.items.iter_mut().find(|i| i.id == id) else {
            return Ok(Checkout::NoSuchItem);
        };
        if item.is_available {
            return Ok(Checkout::AlreadyInState);
        }
        item.is_available = true;
        for record in item.history.iter_mut().filter(|r| r.returned_on.is_none()) {
            record.returned_on = Some(at);
        }
        Ok(Checkout::Done)
    }
}
