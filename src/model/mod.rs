pub mod employee;
pub mod inventory;
pub mod money;
pub mod role;
pub mod salary;
pub mod user;
