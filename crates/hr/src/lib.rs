//! HR records: employees and their monthly salary entries.
//!
//! Pure data and input rules (no IO, no HTTP, no storage).

pub mod employee;
pub mod salary;

pub use employee::{Employee, EmployeeChanges, EmployeeId, NewEmployee};
pub use salary::{
    NewSalary, Salary, SalaryAmounts, SalaryChanges, SalaryPeriod, listing_order, sort_for_listing,
};
