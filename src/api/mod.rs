pub mod inventory;
pub mod salary;
pub mod user;
