use crate::models::BudgetSummary;
use serde::Serialize;

pub const NO_BUDGET_MESSAGE: &str = "No budget set. Use /budget to set your monthly budget.";

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum BudgetPanel {
    NoBudget {
        message: &'static str,
    },
    Progress {
        spent: f64,
        budget: f64,
        day: u32,
        days_in_period: u32,
        budget_percentage: f64,
        /// Width of the progress fill, capped at 100.
        fill_percentage: f64,
        date_percentage: f64,
        over_budget: bool,
        overage: Option<f64>,
        custom_period: bool,
        period_start: Option<String>,
        period_end: Option<String>,
    },
}

impl BudgetPanel {
    pub fn from_summary(summary: &BudgetSummary) -> Self {
        let budget = match summary.budget {
            Some(budget) if budget > 0.0 => budget,
            _ => {
                return Self::NoBudget {
                    message: NO_BUDGET_MESSAGE,
                };
            }
        };

        let over_budget = summary.budget_percentage > 100.0;
        Self::Progress {
            spent: summary.total_expenses,
            budget,
            day: summary.current_date,
            days_in_period: summary.days_in_month,
            budget_percentage: summary.budget_percentage,
            fill_percentage: summary.budget_percentage.clamp(0.0, 100.0),
            date_percentage: summary.date_percentage.clamp(0.0, 100.0),
            over_budget,
            overage: over_budget.then(|| summary.total_expenses - budget),
            custom_period: summary.custom_period.unwrap_or(false),
            period_start: summary.period_start.clone(),
            period_end: summary.period_end.clone(),
        }
    }
}
