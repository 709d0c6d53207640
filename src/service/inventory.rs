use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use tracing::{error, info, instrument, warn};
use utoipa::{IntoParams, ToSchema};

use crate::auth::auth::AuthUser;
use crate::error::{ApiError, StoreError};
use crate::model::inventory::{Checkout, InventoryFilter, InventoryItem, NewInventoryItem};
use crate::model::money::Amount;
use crate::store::{EmployeeStore, InventoryStore};

#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateInventoryRequest {
    #[schema(example = "ThinkPad T14")]
    pub name: String,
    #[schema(example = "laptop")]
    pub inventory_type: String,
    pub description: Option<String>,
    #[schema(example = "HQ level 3")]
    pub location: Option<String>,
    #[schema(example = "2025-02-01", format = "date", value_type = Option<String>)]
    pub purchased_on: Option<NaiveDate>,
    #[schema(example = "4200.00", value_type = Option<String>)]
    pub purchase_price: Option<Amount>,
    #[schema(example = "Low Yat Plaza")]
    pub purchase_at: Option<String>,
}

#[derive(Debug, Deserialize, IntoParams, ToSchema)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct InventoryQuery {
    /// Only items with this availability
    pub available: Option<bool>,
    #[schema(example = 1)]
    /// Pagination page number (start with 1)
    pub page: Option<u32>,
    #[schema(example = 20)]
    pub per_page: Option<u32>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct InventoryListResponse {
    pub data: Vec<InventoryItem>,
    #[schema(example = 1)]
    pub page: u32,
    #[schema(example = 20)]
    pub per_page: u32,
    #[schema(example = 1)]
    pub total: i64,
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BorrowRequest {
    #[schema(example = 1)]
    pub inventory_id: u64,
    #[schema(example = 7)]
    pub employee_id: u64,
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReturnRequest {
    #[schema(example = 1)]
    pub inventory_id: u64,
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn internal(action: &'static str) -> impl FnOnce(StoreError) -> ApiError {
    move |e| {
        error!(error = %e, "Failed to {action}");
        ApiError::Internal
    }
}

#[instrument(name = "CREATE_INVENTORY", skip_all, fields(name = %req.name))]
pub async fn create_item<S: InventoryStore>(store: &S, req: CreateInventoryRequest) -> Result<u64, ApiError> {
    let name = req.name.trim().to_string();
    let inventory_type = req.inventory_type.trim().to_string();
    if name.is_empty() || inventory_type.is_empty() {
        return Err(ApiError::bad_request("name and inventoryType are required"));
    }

    let item = NewInventoryItem {
        name,
        inventory_type,
        description: non_blank(req.description),
        location: non_blank(req.location),
        purchased_on: req.purchased_on,
        purchase_price: req.purchase_price,
        purchase_at: non_blank(req.purchase_at),
    };

    let id = store.insert_item(&item).await.map_err(internal("create inventory item"))?;
    info!(inventory_id = id, "Inventory item created");
    Ok(id)
}

#[instrument(name = "LIST_INVENTORY", skip(store))]
pub async fn list_items<S: InventoryStore>(store: &S, query: InventoryQuery) -> Result<InventoryListResponse, ApiError> {
    let page = query.page.unwrap_or(1).max(1);
    let per_page = query.per_page.unwrap_or(20).clamp(1, 100);
    let filter = InventoryFilter {
        available: query.available,
        limit: per_page,
        offset: (page - 1).saturating_mul(per_page),
    };

    let (data, total) = store.list_items(filter).await.map_err(internal("list inventory"))?;
    Ok(InventoryListResponse {
        data,
        page,
        per_page,
        total,
    })
}

#[instrument(name = "GET_INVENTORY", skip(store))]
pub async fn get_item<S: InventoryStore>(store: &S, inventory_id: u64) -> Result<InventoryItem, ApiError> {
    store
        .find_item(inventory_id)
        .await
        .map_err(internal("fetch inventory item"))?
        .ok_or_else(|| ApiError::not_found("Inventory item not found"))
}

#[instrument(
    name = "BORROW_INVENTORY",
    skip_all,
    fields(inventory_id = req.inventory_id, employee_id = req.employee_id)
)]
pub async fn borrow_item<S>(store: &S, caller: &AuthUser, req: BorrowRequest, at: NaiveDateTime) -> Result<(), ApiError>
where
    S: InventoryStore + EmployeeStore,
{
    if caller.is_employee() && caller.employee_id != Some(req.employee_id) {
        warn!(
            caller = caller.user_id,
            username = %caller.username,
            "Employee tried to borrow on behalf of someone else"
        );
        return Err(ApiError::Forbidden("Employees may only borrow for themselves".into()));
    }

    if store
        .find_employee(req.employee_id)
        .await
        .map_err(internal("look up borrower"))?
        .is_none()
    {
        return Err(ApiError::not_found("Employee not found"));
    }

    match store
        .borrow_item(req.inventory_id, req.employee_id, at)
        .await
        .map_err(internal("borrow inventory item"))?
    {
        Checkout::Done => {
            info!("Inventory item borrowed");
            Ok(())
        }
        Checkout::AlreadyInState => Err(ApiError::Conflict("Inventory item is already borrowed".into())),
        Checkout::NoSuchItem => Err(ApiError::not_found("Inventory item not found")),
    }
}

#[instrument(name = "RETURN_INVENTORY", skip_all, fields(inventory_id = req.inventory_id))]
pub async fn return_item<S: InventoryStore>(store: &S, req: ReturnRequest, at: NaiveDateTime) -> Result<(), ApiError> {
    match store
        .return_item(req.inventory_id, at)
        .await
        .map_err(internal("return inventory item"))?
    {
        Checkout::Done => {
            info!("Inventory item returned");
            Ok(())
        }
        Checkout::AlreadyInState => Err(ApiError::Conflict("Inventory item is not borrowed".into())),
        Checkout::NoSuchItem => Err(ApiError::not_found("Inventory item not found")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::employee::Employee;
    use crate::model::money::Percentage;
    use crate::model::role::Role;
    use crate::store::memory::MemoryStore;

    fn at(hour: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, 10, 14)
            .unwrap()
            .and_hms_opt(hour, 0, 0)
            .unwrap()
    }

    fn caller(role: Role, employee_id: Option<u64>) -> AuthUser {
        AuthUser {
            user_id: 100,
            username: "caller".into(),
            role,
            employee_id,
        }
    }

    fn laptop() -> CreateInventoryRequest {
        CreateInventoryRequest {
            name: "ThinkPad T14".into(),
            inventory_type: "laptop".into(),
            description: Some("  ".into()),
            location: Some("HQ".into()),
            purchased_on: None,
            purchase_price: Some(Amount::parse("4200.00").unwrap()),
            purchase_at: None,
        }
    }

    fn seeded() -> (MemoryStore, u64) {
        let store = MemoryStore::new();
        let employee_id = store.add_employee(Employee {
            id: 0,
            full_name: "Hafiz".into(),
            email: "hafiz@company.com".into(),
            basic_pay: Amount::parse("2500").unwrap(),
            employee_epf_percentage: Percentage::parse("11").unwrap(),
            company_epf_percentage: Percentage::parse("13").unwrap(),
            socso_percentage: Percentage::parse("0.5").unwrap(),
            salary_history: vec![],
        });
        (store, employee_id)
    }

    #[actix_web::test]
    async fn create_requires_name_and_type() {
        let (store, ..) = seeded();
        let mut req = laptop();
        req.inventory_type = " ".into();
        assert!(matches!(create_item(&store, req).await, Err(ApiError::BadRequest(_))));

        let id = create_item(&store, laptop()).await.unwrap();
        let item = get_item(&store, id).await.unwrap();
        assert!(item.is_available);
        assert_eq!(item.description, None);
        assert_eq!(item.purchase_price.unwrap().as_str(), "4200.00");
    }

    #[actix_web::test]
    async fn borrow_then_return_cycle() {
        let (store, employee_id) = seeded();
        let id = create_item(&store, laptop()).await.unwrap();
        let hr = caller(Role::Hr, None);

        borrow_item(&store, &hr, BorrowRequest { inventory_id: id, employee_id }, at(9))
            .await
            .unwrap();
        let second = borrow_item(&store, &hr, BorrowRequest { inventory_id: id, employee_id }, at(10)).await;
        assert_eq!(second, Err(ApiError::Conflict("Inventory item is already borrowed".into())));

        let item = get_item(&store, id).await.unwrap();
        assert!(!item.is_available);
        assert_eq!(item.last_borrowed_by, Some(employee_id));
        assert_eq!(item.last_borrowed_date, Some(at(9)));

        return_item(&store, ReturnRequest { inventory_id: id }, at(17)).await.unwrap();
        let item = get_item(&store, id).await.unwrap();
        assert!(item.is_available);
        assert_eq!(item.history.len(), 1);
        assert_eq!(item.history[0].returned_on, Some(at(17)));

        let again = return_item(&store, ReturnRequest { inventory_id: id }, at(18)).await;
        assert_eq!(again, Err(ApiError::Conflict("Inventory item is not borrowed".into())));
    }

    #[actix_web::test]
    async fn employees_borrow_only_for_themselves() {
        let (store, employee_id) = seeded();
        let id = create_item(&store, laptop()).await.unwrap();

        let other = caller(Role::Employee, Some(employee_id + 50));
        let err = borrow_item(&store, &other, BorrowRequest { inventory_id: id, employee_id }, at(9)).await;
        assert!(matches!(err, Err(ApiError::Forbidden(_))));

        let me = caller(Role::Employee, Some(employee_id));
        borrow_item(&store, &me, BorrowRequest { inventory_id: id, employee_id }, at(9))
            .await
            .unwrap();
    }

    #[actix_web::test]
    async fn unknown_item_or_borrower_is_not_found() {
        let (store, employee_id) = seeded();
        let admin = caller(Role::Admin, None);
        let id = create_item(&store, laptop()).await.unwrap();

        let no_item = borrow_item(&store, &admin, BorrowRequest { inventory_id: 999, employee_id }, at(9)).await;
        assert_eq!(no_item, Err(ApiError::not_found("Inventory item not found")));

        let no_employee = borrow_item(&store, &admin, BorrowRequest { inventory_id: id, employee_id: 999 }, at(9)).await;
        assert_eq!(no_employee, Err(ApiError::not_found("Employee not found")));

        let no_return = return_item(&store, ReturnRequest { inventory_id: 999 }, at(9)).await;
        assert_eq!(no_return, Err(ApiError::not_found("Inventory item not found")));
    }

    #[actix_web::test]
    async fn listing_paginates_and_filters() {
        let (store, employee_id) = seeded();
        let hr = caller(Role::Hr, None);
        let mut ids = Vec::new();
        for _ in 0..3 {
            ids.push(create_item(&store, laptop()).await.unwrap());
        }
        borrow_item(&store, &hr, BorrowRequest { inventory_id: ids[0], employee_id }, at(9))
            .await
            .unwrap();

        let page = list_items(&store, InventoryQuery { available: None, page: Some(1), per_page: Some(2) })
            .await
            .unwrap();
        assert_eq!(page.total, 3);
        assert_eq!(page.data.len(), 2);
        assert_eq!(page.data[0].id, ids[2]);

        let available = list_items(&store, InventoryQuery { available: Some(true), page: None, per_page: Some(500) })
            .await
            .unwrap();
        assert_eq!(available.total, 2);
        assert_eq!(available.per_page, 100);
        assert!(available.data.iter().all(|i| i.is_available));
    }
}
