use serde::{Deserialize, Serialize};
use strum::IntoEnumIterator;
use strum_macros::{AsRefStr, Display, EnumIter, EnumString};
use utoipa::ToSchema;

use crate::model::employee::Employee;
use crate::model::money::Amount;

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    ToSchema,
    Display,
    EnumString,
    EnumIter,
    AsRefStr,
)]
pub enum Month {
    January,
    February,
    March,
    April,
    May,
    June,
    July,
    August,
    September,
    October,
    November,
    December,
}

impl Month {
    /// Zero-based position in the calendar, January = 0.
    pub fn index0(self) -> usize {
        Month::iter().position(|m| m == self).unwrap_or_default()
    }
}

/// Month named by an edit request. Names outside the calendar are kept so
/// they fail the edit window like any other month.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum MonthInput {
    Known(Month),
    Unknown(String),
}

impl MonthInput {
    pub fn month(&self) -> Option<Month> {
        match self {
            MonthInput::Known(m) => Some(*m),
            MonthInput::Unknown(_) => None,
        }
    }

    pub fn rendered(&self) -> String {
        match self {
            MonthInput::Known(m) => m.to_string(),
            MonthInput::Unknown(s) => s.clone(),
        }
    }
}

impl From<Month> for MonthInput {
    fn from(month: Month) -> Self {
        MonthInput::Known(month)
    }
}

/// Year exactly as the client sent it, a JSON number or string.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum YearInput {
    Number(i64),
    Text(String),
}

impl YearInput {
    pub fn rendered(&self) -> String {
        match self {
            YearInput::Number(n) => n.to_string(),
            YearInput::Text(s) => s.clone(),
        }
    }

    /// Numeric value, if the input is an integer at all.
    pub fn as_i32(&self) -> Option<i32> {
        match self {
            YearInput::Number(n) => i32::try_from(*n).ok(),
            YearInput::Text(s) => s.trim().parse().ok(),
        }
    }

    /// Value of a year that renders as exactly four digits.
    pub fn four_digit(&self) -> Option<i32> {
        let rendered = self.rendered();
        if rendered.len() != 4 || !rendered.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        rendered.parse().ok()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct LineItem {
    #[schema(example = "bonus")]
    pub description: String,
    #[schema(example = "200", value_type = String)]
    pub amount: Amount,
}

pub fn sum_of_money(items: &[LineItem]) -> f64 {
    items.iter().map(|item| item.amount.value()).sum()
}

/// Amounts derived from an employee's compensation at creation time.
#[derive(Debug, Clone, PartialEq)]
pub struct SalaryFigures {
    pub basic_pay: Amount,
    pub employee_epf_amount: Amount,
    pub company_epf_amount: Amount,
    pub socso_amount: Amount,
    pub net_pay: Amount,
}

impl SalaryFigures {
    /// net = basic - employee EPF - SOCSO - deductions + extras.
    ///
    /// Company EPF is the employer's share and is recorded but not deducted.
    pub fn compute(employee: &Employee, deductions: &[LineItem], extra_incomes: &[LineItem]) -> Self {
        let basic_salary = employee.basic_pay.value();
        let employee_epf = employee.employee_epf_percentage.fraction() * basic_salary;
        let company_epf = employee.company_epf_percentage.fraction() * basic_salary;
        let socso = employee.socso_percentage.fraction() * basic_salary;
        let net_pay = basic_salary - employee_epf - socso - sum_of_money(deductions)
            + sum_of_money(extra_incomes);

        Self {
            basic_pay: Amount::from_f64(basic_salary),
            employee_epf_amount: Amount::from_f64(employee_epf),
            company_epf_amount: Amount::from_f64(company_epf),
            socso_amount: Amount::from_f64(socso),
            net_pay: Amount::from_f64(net_pay),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewSalary {
    pub month: Month,
    pub year: i32,
    pub figures: SalaryFigures,
    pub deductions: Vec<LineItem>,
    pub extra_incomes: Vec<LineItem>,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Salary {
    #[schema(example = 1)]
    pub id: u64,
    pub month: Month,
    #[schema(example = 2026)]
    pub year: i32,
    #[schema(example = "3000", value_type = String)]
    pub basic_pay: Amount,
    #[schema(example = "330", value_type = String)]
    pub employee_epf_amount: Amount,
    #[schema(example = "390", value_type = String)]
    pub company_epf_amount: Amount,
    #[schema(example = "15", value_type = String)]
    pub socso_amount: Amount,
    #[schema(example = "2855", value_type = String)]
    pub net_pay: Amount,
    pub deductions: Vec<LineItem>,
    pub extra_incomes: Vec<LineItem>,
}
