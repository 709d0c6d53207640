//! Request-scoped business rules, generic over the store traits.

pub mod inventory;
pub mod salary;
pub mod user;
