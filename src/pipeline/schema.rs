//! Column names of the churn dataset and the filterable fields

use std::fmt;

use serde::Serialize;

pub const CUSTOMER_ID: &str = "customerID";
pub const TOTAL_CHARGES: &str = "TotalCharges";
pub const MONTHLY_CHARGES: &str = "MonthlyCharges";
pub const TENURE: &str = "tenure";
pub const CHURN: &str = "Churn";
pub const CONTRACT: &str = "Contract";
pub const PAYMENT_METHOD: &str = "PaymentMethod";
pub const SENIOR_CITIZEN: &str = "SeniorCitizen";
pub const INTERNET_SERVICE: &str = "InternetService";

/// Columns the pipeline reads. Everything else is carried along untouched.
pub const REQUIRED_COLUMNS: [&str; 8] = [
    TOTAL_CHARGES,
    MONTHLY_CHARGES,
    TENURE,
    CHURN,
    CONTRACT,
    PAYMENT_METHOD,
    SENIOR_CITIZEN,
    INTERNET_SERVICE,
];

/// A categorical field exposed as a dashboard filter
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum FilterField {
    Contract,
    PaymentMethod,
    SeniorCitizen,
    InternetService,
}

impl FilterField {
    /// Every filter, in sidebar order
    pub const ALL: [FilterField; 4] = [
        FilterField::Contract,
        FilterField::PaymentMethod,
        FilterField::SeniorCitizen,
        FilterField::InternetService,
    ];

    /// Name of the backing column
    pub fn column(self) -> &'static str {
        match self {
            FilterField::Contract => CONTRACT,
            FilterField::PaymentMethod => PAYMENT_METHOD,
            FilterField::SeniorCitizen => SENIOR_CITIZEN,
            FilterField::InternetService => INTERNET_SERVICE,
        }
    }

    /// Human-readable label for menus and tables
    pub fn label(self) -> &'static str {
        match self {
            FilterField::Contract => "Contract Type",
            FilterField::PaymentMethod => "Payment Method",
            FilterField::SeniorCitizen => "Senior Citizen",
            FilterField::InternetService => "Internet Service",
        }
    }
}

impl fmt::Display for FilterField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.column())
    }
}
