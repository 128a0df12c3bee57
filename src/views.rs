//! One loader per Mini App screen.
//!
//! Loaders fetch what a screen needs through [`FinanceApi`] and shape it for
//! display. Date-bounded screens resolve the billing period first.

use crate::budget::BudgetPanel;
use crate::calendar::CalendarGrid;
use crate::categories;
use crate::client::{ClientError, FinanceApi};
use crate::entry::{ExpenseInput, ExpenseInputError};
use crate::missions::{MissionCard, mission_cards};
use crate::models::{Expense, NewExpense, OnboardingProgress, PaymentMode};
use crate::onboarding::{self, OnboardingStep, PLEDGE_STEP, PLEDGE_TEXT, PledgeError};
use crate::period::{BillingPeriodConfig, ResolvedPeriod};
use chrono::{DateTime, Datelike, Local, NaiveDate};
use serde::Serialize;
use serde_json::{Value, json};
use thiserror::Error;
use tracing::warn;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PeriodSource {
    Custom,
    Calendar,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PeriodView {
    pub source: PeriodSource,
    pub start_day: Option<u32>,
    pub end_day: Option<u32>,
    #[serde(flatten)]
    pub period: ResolvedPeriod,
    pub days: i64,
}

impl PeriodView {
    pub fn resolve(config: BillingPeriodConfig, reference: NaiveDate) -> Self {
        let period = config.resolve(reference);
        Self {
            source: if config.is_custom() {
                PeriodSource::Custom
            } else {
                PeriodSource::Calendar
            },
            start_day: config.start_day,
            end_day: config.end_day,
            period,
            days: period.num_days(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExpenseRow {
    pub id: Option<i64>,
    pub date: NaiveDate,
    pub amount: f64,
    pub category: Option<String>,
    pub emoji: &'static str,
    pub description: Option<String>,
    pub mode: Option<PaymentMode>,
}

impl From<Expense> for ExpenseRow {
    fn from(expense: Expense) -> Self {
        let emoji = expense
            .category
            .as_deref()
            .map_or(categories::UNKNOWN_EMOJI, categories::emoji_for);
        Self {
            id: expense.id,
            date: expense.date,
            amount: expense.amount,
            category: expense.category,
            emoji,
            description: expense.description,
            mode: expense.mode,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExpenseTable {
    pub period: PeriodView,
    pub rows: Vec<ExpenseRow>,
    pub total: f64,
}

/// Part of a screen that loads on its own and fails on its own.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Section<T> {
    Loaded { data: T },
    Failed { message: String },
}

impl<T> Section<T> {
    fn from_result(name: &str, result: Result<T, ClientError>) -> Self {
        match result {
            Ok(data) => Section::Loaded { data },
            Err(err) => {
                warn!("{name} section failed: {err}");
                Section::Failed {
                    message: err.to_string(),
                }
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardView {
    pub period: Section<PeriodView>,
    pub budget: Section<BudgetPanel>,
    pub calendar: Section<CalendarGrid>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OnboardingView {
    pub progress: OnboardingProgress,
    pub current_step: Option<&'static OnboardingStep>,
    pub next_step: Option<&'static OnboardingStep>,
    pub previous_step: Option<&'static OnboardingStep>,
    pub complete: bool,
    pub percentage: f64,
    pub seconds_remaining: u32,
}

impl OnboardingView {
    pub fn new(progress: OnboardingProgress) -> Self {
        Self {
            current_step: onboarding::current_step(&progress),
            next_step: onboarding::next_step(&progress),
            previous_step: onboarding::previous_step(&progress),
            complete: onboarding::is_complete(&progress),
            percentage: onboarding::progress_percentage(&progress),
            seconds_remaining: onboarding::estimated_seconds_remaining(&progress),
            progress,
        }
    }
}

/// How much of a partially typed pledge is right so far.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PledgeInputView {
    pub accepted: String,
    pub complete: bool,
}

impl PledgeInputView {
    pub fn new(input: &str) -> Self {
        let accepted = onboarding::accept_pledge_input(input);
        let complete = accepted == PLEDGE_TEXT;
        Self { accepted, complete }
    }
}

#[derive(Debug, Error)]
pub enum ExpenseSubmitError {
    #[error(transparent)]
    Rejected(#[from] ExpenseInputError),
    #[error(transparent)]
    Upstream(#[from] ClientError),
}

#[derive(Debug, Error)]
pub enum PledgeSubmitError {
    #[error(transparent)]
    Rejected(#[from] PledgeError),
    #[error(transparent)]
    Upstream(#[from] ClientError),
}

pub async fn load_period<A: FinanceApi>(
    api: &A,
    reference: NaiveDate,
) -> Result<PeriodView, ClientError> {
    let config = api.fetch_settings().await?;
    Ok(PeriodView::resolve(config, reference))
}

pub async fn load_expense_table<A: FinanceApi>(
    api: &A,
    reference: NaiveDate,
) -> Result<ExpenseTable, ClientError> {
    let period = load_period(api, reference).await?;
    let expenses = match period.source {
        PeriodSource::Custom => {
            api.fetch_expenses_between(period.period.start_date, period.period.end_date)
                .await?
        }
        PeriodSource::Calendar => {
            api.fetch_month_expenses(reference.year(), reference.month())
                .await?
        }
    };

    let rows: Vec<ExpenseRow> = expenses.into_iter().map(ExpenseRow::from).collect();
    let total = rows.iter().map(|row| row.amount).sum();
    Ok(ExpenseTable {
        period,
        rows,
        total,
    })
}

/// Period, budget and calendar load concurrently; a failing section does not
/// take the others down with it.
pub async fn load_dashboard<A: FinanceApi>(
    api: &A,
    reference: NaiveDate,
    today: NaiveDate,
) -> DashboardView {
    let (year, month) = (reference.year(), reference.month());
    let (period, budget, entry_days) = tokio::join!(
        load_period(api, reference),
        api.fetch_budget(year, month),
        api.fetch_entry_days(year, month),
    );

    DashboardView {
        period: Section::from_result("period", period),
        budget: Section::from_result(
            "budget",
            budget.map(|summary| BudgetPanel::from_summary(&summary)),
        ),
        calendar: Section::from_result(
            "calendar",
            entry_days.map(|days| CalendarGrid::build(year, month, &days, today)),
        ),
    }
}

/// Validates the form input and records the expense it describes.
pub async fn record_expense<A: FinanceApi>(
    api: &A,
    input: ExpenseInput,
    today: NaiveDate,
) -> Result<NewExpense, ExpenseSubmitError> {
    let expense = input.into_new_expense(today)?;
    api.submit_expense(&expense).await?;
    Ok(expense)
}

/// Stores a new month start and returns the period it yields for `reference`.
pub async fn save_month_start<A: FinanceApi>(
    api: &A,
    month_start: Option<u32>,
    reference: NaiveDate,
) -> Result<PeriodView, ClientError> {
    let config = api.save_settings(month_start).await?;
    Ok(PeriodView::resolve(config, reference))
}

pub async fn load_missions<A: FinanceApi>(api: &A) -> Result<Vec<MissionCard>, ClientError> {
    let counters = api.fetch_missions().await?;
    Ok(mission_cards(&counters))
}

pub async fn load_onboarding<A: FinanceApi>(api: &A) -> Result<OnboardingView, ClientError> {
    let progress = api.fetch_onboarding().await?;
    Ok(OnboardingView::new(progress))
}

pub async fn complete_step<A: FinanceApi>(
    api: &A,
    step: &OnboardingStep,
    step_data: Value,
) -> Result<Option<OnboardingView>, ClientError> {
    let step_data = match step_data {
        Value::Null => Value::Object(Default::default()),
        data => data,
    };
    let progress = api.complete_onboarding_step(step.id, step_data).await?;
    Ok(progress.map(OnboardingView::new))
}

/// Moves the user to `step`, keeping the rest of their stored progress.
pub async fn go_to_step<A: FinanceApi>(
    api: &A,
    step: &OnboardingStep,
) -> Result<Option<OnboardingView>, ClientError> {
    let mut progress = api.fetch_onboarding().await?;
    progress.current_step = step.id;
    let updated = api.update_onboarding(progress).await?;
    Ok(updated.map(OnboardingView::new))
}

/// Validates the typed pledge and completes the pledge step with it.
pub async fn submit_pledge<A: FinanceApi>(
    api: &A,
    text: &str,
    now: DateTime<Local>,
) -> Result<Option<OnboardingView>, PledgeSubmitError> {
    let pledge = onboarding::validate_pledge(text)?;
    let step_data = json!({
        "pledge_text": pledge,
        "completed_at": now.to_rfc3339(),
    });
    let progress = api.complete_onboarding_step(PLEDGE_STEP, step_data).await?;
    Ok(progress.map(OnboardingView::new))
}
