use crate::model::inventory::{BorrowRecord, InventoryItem};
use crate::model::salary::{LineItem, Month, Salary};
use crate::models::{LoginReqDto, LoginResponse};
use crate::service::inventory::{
    BorrowRequest, CreateInventoryRequest, InventoryListResponse, InventoryQuery, ReturnRequest,
};
use crate::service::salary::{CreateSalaryRequest, UpdateSalaryRequest};
use crate::service::user::{CreateUserRequest, CreateUserResponse};
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi, openapi};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "HR Payroll API",
        version = "1.0.0",
        description = r#"
## HR Administration Backend

Employee compensation records, monthly salary computation and office inventory borrowing.

### 🔹 Key Features
- **Salary**
  - Compute net pay from basic pay, EPF and SOCSO rates, deductions and extra incomes
  - Edit deductions and extra incomes within the current month
- **Staff**
  - Create a login account together with the employee's compensation record
- **Inventory**
  - Register items, borrow and return them, view borrowing history

### 💰 Money
All monetary values are decimal **strings** in requests and responses.

### 🔐 Security
Every endpoint except login needs a **JWT Bearer** token.
"#,
    ),
    paths(
        crate::auth::handlers::login,

        crate::api::salary::create_salary,
        crate::api::salary::update_salary,
        crate::api::salary::get_salary,

        crate::api::user::create_user,

        crate::api::inventory::create_item,
        crate::api::inventory::list_items,
        crate::api::inventory::get_item,
        crate::api::inventory::borrow_item,
        crate::api::inventory::return_item
    ),
    components(
        schemas(
            LoginReqDto,
            LoginResponse,
            Month,
            LineItem,
            Salary,
            CreateSalaryRequest,
            UpdateSalaryRequest,
            CreateUserRequest,
            CreateUserResponse,
            BorrowRecord,
            InventoryItem,
            InventoryListResponse,
            InventoryQuery,
            CreateInventoryRequest,
            BorrowRequest,
            ReturnRequest
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Auth", description = "Login"),
        (name = "Salary", description = "Salary computation APIs"),
        (name = "User", description = "Staff account APIs"),
        (name = "Inventory", description = "Inventory borrowing APIs"),
    )
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
    }
}
