use crate::model::employee::NewEmployee;

/// Login lookup result.
#[derive(Debug, Clone)]
pub struct UserCredentials {
    pub id: u64,
    pub username: String,
    pub password_hash: String,
    pub role_id: u8,
    pub employee_id: Option<u64>,
}

/// A user account together with the employee record it is linked to.
#[derive(Debug, Clone)]
pub struct NewStaff {
    pub username: String,
    pub password_hash: String,
    pub role_id: u8,
    pub employee: NewEmployee,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StaffIds {
    pub user_id: u64,
    pub employee_id: u64,
}
