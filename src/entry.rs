//! Expense entry form: "TODAY I spent 250 UPI on Groceries. Description - veggies".

use crate::categories;
use crate::models::{NewExpense, PaymentMode};
use chrono::{Days, NaiveDate};
use serde::Deserialize;
use thiserror::Error;

/// Integer digits the amount field accepts.
pub const MAX_AMOUNT_DIGITS: usize = 12;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DayChoice {
    #[default]
    #[serde(alias = "TODAY")]
    Today,
    #[serde(alias = "YESTERDAY")]
    Yesterday,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ExpenseInput {
    #[serde(default)]
    pub day: DayChoice,
    pub amount: String,
    #[serde(default = "default_category")]
    pub category: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub mode: PaymentMode,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExpenseInputError {
    #[error("amount is required")]
    MissingAmount,
    #[error("amount may only contain digits and one decimal point")]
    MalformedAmount,
    #[error("amount must be greater than zero")]
    NonPositiveAmount,
    #[error("amount is too large")]
    AmountTooLarge,
    #[error("unknown category {0:?}")]
    UnknownCategory(String),
}

impl ExpenseInput {
    pub fn into_new_expense(self, today: NaiveDate) -> Result<NewExpense, ExpenseInputError> {
        let amount = parse_amount(&self.amount)?;
        let category = categories::find(self.category.trim())
            .ok_or_else(|| ExpenseInputError::UnknownCategory(self.category.clone()))?;

        let date = match self.day {
            DayChoice::Today => today,
            DayChoice::Yesterday => today.checked_sub_days(Days::new(1)).unwrap_or(today),
        };
        let description = self
            .description
            .map(|text| text.trim().to_string())
            .filter(|text| !text.is_empty());

        Ok(NewExpense {
            date,
            amount,
            category: category.value.to_string(),
            description,
            mode: self.mode,
        })
    }
}

/// Digits with at most one decimal point, as the amount field accepts them.
pub fn parse_amount(raw: &str) -> Result<f64, ExpenseInputError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(ExpenseInputError::MissingAmount);
    }
    let well_formed = raw.chars().all(|c| c.is_ascii_digit() || c == '.')
        && raw.matches('.').count() <= 1
        && raw != ".";
    if !well_formed {
        return Err(ExpenseInputError::MalformedAmount);
    }
    let integer_digits = raw.split('.').next().unwrap_or_default().trim_start_matches('0');
    if integer_digits.len() > MAX_AMOUNT_DIGITS {
        return Err(ExpenseInputError::AmountTooLarge);
    }

    let amount: f64 = raw
        .parse()
        .map_err(|_| ExpenseInputError::MalformedAmount)?;
    if !amount.is_finite() {
        return Err(ExpenseInputError::AmountTooLarge);
    }
    if amount <= 0.0 {
        return Err(ExpenseInputError::NonPositiveAmount);
    }
    Ok(amount)
}

fn default_category() -> String {
    categories::DEFAULT_CATEGORY.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 1).unwrap()
    }

    #[test]
    fn amounts_follow_the_input_mask() {
        assert_eq!(parse_amount("250"), Ok(250.0));
        assert_eq!(parse_amount("12.5"), Ok(12.5));
        assert_eq!(parse_amount(".5"), Ok(0.5));
        assert_eq!(parse_amount("7."), Ok(7.0));
        assert_eq!(parse_amount(""), Err(ExpenseInputError::MissingAmount));
        assert_eq!(parse_amount("."), Err(ExpenseInputError::MalformedAmount));
        assert_eq!(parse_amount("1.2.3"), Err(ExpenseInputError::MalformedAmount));
        assert_eq!(parse_amount("-4"), Err(ExpenseInputError::MalformedAmount));
        assert_eq!(parse_amount("1e3"), Err(ExpenseInputError::MalformedAmount));
        assert_eq!(parse_amount("0.00"), Err(ExpenseInputError::NonPositiveAmount));
        assert_eq!(parse_amount("000000000000000250"), Ok(250.0));
        assert_eq!(parse_amount("999999999999.99"), Ok(999_999_999_999.99));
        assert_eq!(parse_amount("1000000000000"), Err(ExpenseInputError::AmountTooLarge));
        assert_eq!(
            parse_amount(&"9".repeat(400)),
            Err(ExpenseInputError::AmountTooLarge)
        );
    }

    #[test]
    fn yesterday_crosses_month_boundary() {
        let input: ExpenseInput = serde_json::from_value(serde_json::json!({
            "day": "YESTERDAY",
            "amount": "99",
            "category": "Transport",
            "description": "   ",
            "mode": "CASH"
        }))
        .unwrap();

        let expense = input.into_new_expense(today()).unwrap();
        assert_eq!(expense.date, NaiveDate::from_ymd_opt(2024, 2, 29).unwrap());
        assert_eq!(expense.mode, PaymentMode::Cash);
        assert!(expense.description.is_none());
    }

    #[test]
    fn defaults_and_unknown_categories() {
        let input: ExpenseInput =
            serde_json::from_value(serde_json::json!({ "amount": "10" })).unwrap();
        let expense = input.into_new_expense(today()).unwrap();
        assert_eq!(expense.date, today());
        assert_eq!(expense.category, "Groceries");
        assert_eq!(expense.mode, PaymentMode::Upi);

        let input: ExpenseInput = serde_json::from_value(serde_json::json!({
            "amount": "10",
            "category": "Yachts"
        }))
        .unwrap();
        assert_eq!(
            input.into_new_expense(today()),
            Err(ExpenseInputError::UnknownCategory("Yachts".to_string()))
        );
    }
}
