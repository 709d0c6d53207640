use crate::model::money::{Amount, Percentage};

#[derive(Debug, Clone, PartialEq)]
pub struct Employee {
    pub id: u64,
    pub full_name: String,
    pub email: String,
    pub basic_pay: Amount,
    pub employee_epf_percentage: Percentage,
    pub company_epf_percentage: Percentage,
    pub socso_percentage: Percentage,
    /// Salary ids, oldest first. Only ever appended to.
    pub salary_history: Vec<u64>,
}

/// Compensation details for an employee that does not exist yet.
#[derive(Debug, Clone, PartialEq)]
pub struct NewEmployee {
    pub full_name: String,
    pub email: String,
    pub basic_pay: Amount,
    pub employee_epf_percentage: Percentage,
    pub company_epf_percentage: Percentage,
    pub socso_percentage: Percentage,
}
