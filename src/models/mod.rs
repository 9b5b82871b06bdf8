mod bill;
mod income;
mod profile;

pub(crate) use bill::{add_months, Bill, Category, DEFAULT_DUE_DAY};
pub(crate) use income::{Income, DEFAULT_SALARY_DAY, DEFAULT_VALE_DAY};
pub(crate) use profile::Profile;
