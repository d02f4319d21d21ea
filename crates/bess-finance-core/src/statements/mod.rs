pub mod cash_flow;
pub mod debt_schedule;
pub mod income;

pub use cash_flow::{build_cash_flows, CashFlowStatement};
pub use debt_schedule::{build_debt_schedule, DebtSchedule, DebtTerms};
pub use income::{build_income_statement, IncomeStatement};
