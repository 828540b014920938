//! Monthly salary records, keyed by `(tenant, employee, year, month)`.

use std::cmp::Ordering;

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use technia_core::{DomainError, DomainResult, TenantId};

use crate::EmployeeId;

pub const YEAR_MIN: i32 = 2020;
pub const YEAR_MAX: i32 = 2030;

/// The (year, month) a salary is due for.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SalaryPeriod {
    pub year: i32,
    pub month: i32,
}

impl SalaryPeriod {
    pub const fn new(year: i32, month: i32) -> Self {
        Self { year, month }
    }

    pub fn validated(self) -> DomainResult<Self> {
        if !(YEAR_MIN..=YEAR_MAX).contains(&self.year) {
            return Err(DomainError::validation(format!(
                "due_year must be between {YEAR_MIN} and {YEAR_MAX}"
            )));
        }
        if !(1..=12).contains(&self.month) {
            return Err(DomainError::validation("due_month must be between 1 and 12"));
        }
        Ok(self)
    }
}

impl core::fmt::Display for SalaryPeriod {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}/{}", self.month, self.year)
    }
}

/// Salary components. Each is optional and, when present, non-negative.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SalaryAmounts {
    pub gross_salary: Option<Decimal>,
    pub insurance: Option<Decimal>,
    pub taxes: Option<Decimal>,
    pub net_salary: Option<Decimal>,
}

impl SalaryAmounts {
    pub fn validated(self) -> DomainResult<Self> {
        for (field, value) in [
            ("gross_salary", self.gross_salary),
            ("insurance", self.insurance),
            ("taxes", self.taxes),
            ("net_salary", self.net_salary),
        ] {
            if value.is_some_and(|v| v < Decimal::ZERO) {
                return Err(DomainError::validation(format!("{field} must not be negative")));
            }
        }
        Ok(self)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Salary {
    pub tenant_id: TenantId,
    pub employee_id: EmployeeId,
    pub period: SalaryPeriod,
    pub amounts: SalaryAmounts,
    pub due_date: Option<NaiveDate>,
    pub date_added: DateTime<Utc>,
}

impl Salary {
    pub fn apply(&mut self, changes: SalaryChanges) {
        let a = changes.amounts;
        if a.gross_salary.is_some() {
            self.amounts.gross_salary = a.gross_salary;
        }
        if a.insurance.is_some() {
            self.amounts.insurance = a.insurance;
        }
        if a.taxes.is_some() {
            self.amounts.taxes = a.taxes;
        }
        if a.net_salary.is_some() {
            self.amounts.net_salary = a.net_salary;
        }
        if changes.due_date.is_some() {
            self.due_date = changes.due_date;
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewSalary {
    pub period: SalaryPeriod,
    pub amounts: SalaryAmounts,
    pub due_date: Option<NaiveDate>,
}

impl NewSalary {
    pub fn validated(self) -> DomainResult<Self> {
        Ok(Self {
            period: self.period.validated()?,
            amounts: self.amounts.validated()?,
            due_date: self.due_date,
        })
    }

    pub fn into_salary(self, tenant_id: TenantId, employee_id: EmployeeId, date_added: DateTime<Utc>) -> Salary {
        Salary {
            tenant_id,
            employee_id,
            period: self.period,
            amounts: self.amounts,
            due_date: self.due_date,
            date_added,
        }
    }
}

/// Partial salary update; the period itself is the key and cannot change.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SalaryChanges {
    pub amounts: SalaryAmounts,
    pub due_date: Option<NaiveDate>,
}

impl SalaryChanges {
    pub fn validated(self) -> DomainResult<Self> {
        Ok(Self {
            amounts: self.amounts.validated()?,
            due_date: self.due_date,
        })
    }
}

/// Listing order: newest period first, then employee id ascending.
pub fn listing_order(a: &Salary, b: &Salary) -> Ordering {
    b.period
        .cmp(&a.period)
        .then_with(|| a.employee_id.cmp(&b.employee_id))
}

pub fn sort_for_listing(salaries: &mut [Salary]) {
    salaries.sort_by(listing_order);
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;
    use rust_decimal::Decimal;

    use super::*;

    fn salary(employee: i32, year: i32, month: i32) -> Salary {
        NewSalary {
            period: SalaryPeriod::new(year, month),
            amounts: SalaryAmounts::default(),
            due_date: None,
        }
        .into_salary(TenantId::new("technia.io"), EmployeeId::new(employee), Utc::now())
    }

    #[test]
    fn period_bounds() {
        assert!(SalaryPeriod::new(2019, 5).validated().is_err());
        assert!(SalaryPeriod::new(2031, 5).validated().is_err());
        assert!(SalaryPeriod::new(2024, 0).validated().is_err());
        assert!(SalaryPeriod::new(2024, 13).validated().is_err());
        assert!(SalaryPeriod::new(2020, 1).validated().is_ok());
        assert!(SalaryPeriod::new(2030, 12).validated().is_ok());
    }

    #[test]
    fn negative_amounts_are_rejected_zero_is_fine() {
        let neg = SalaryAmounts {
            taxes: Some(Decimal::new(-1, 2)),
            ..Default::default()
        };
        assert!(neg.validated().is_err());

        let zero = SalaryAmounts {
            insurance: Some(Decimal::ZERO),
            ..Default::default()
        };
        assert!(zero.validated().is_ok());
    }

    #[test]
    fn listing_is_newest_first_then_by_employee() {
        let mut rows = vec![
            salary(2, 2024, 1),
            salary(1, 2024, 3),
            salary(3, 2023, 12),
            salary(1, 2024, 1),
        ];
        sort_for_listing(&mut rows);
        let keys: Vec<_> = rows
            .iter()
            .map(|s| (s.employee_id.get(), s.period.year, s.period.month))
            .collect();
        assert_eq!(keys, vec![(1, 2024, 3), (1, 2024, 1), (2, 2024, 1), (3, 2023, 12)]);
    }

    #[test]
    fn apply_updates_only_supplied_amounts() {
        let mut s = salary(1, 2024, 6);
        s.amounts.gross_salary = Some(Decimal::new(5000, 0));
        s.apply(SalaryChanges {
            amounts: SalaryAmounts {
                net_salary: Some(Decimal::new(4200, 0)),
                ..Default::default()
            },
            due_date: None,
        });
        assert_eq!(s.amounts.gross_salary, Some(Decimal::new(5000, 0)));
        assert_eq!(s.amounts.net_salary, Some(Decimal::new(4200, 0)));
    }

    proptest! {
        #[test]
        fn listing_order_never_puts_older_before_newer(
            rows in proptest::collection::vec((1..5i32, 2020..=2030i32, 1..=12i32), 0..20)
        ) {
            let mut salaries: Vec<Salary> = rows.iter().map(|(e, y, m)| salary(*e, *y, *m)).collect();
            sort_for_listing(&mut salaries);
            for pair in salaries.windows(2) {
                prop_assert!(pair[0].period >= pair[1].period);
            }
        }
    }
}
