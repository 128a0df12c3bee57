use crate::categories::{self, Category};
use crate::client::FinanceApi;
use crate::entry::ExpenseInput;
use crate::errors::AppError;
use crate::missions::MissionCard;
use crate::models::{NewExpense, UserRecord};
use crate::onboarding::{OnboardingStep, StepRef};
use crate::period::BillingPeriodConfig;
use crate::state::AppState;
use crate::ui::render_index;
use crate::views::{
    self, DashboardView, ExpenseTable, OnboardingView, PeriodView, PledgeInputView,
};
use axum::{
    Json,
    extract::{Query, State},
    response::Html,
};
use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::info;

/// `?on=YYYY-MM-DD` overrides the reference date, which defaults to today.
#[derive(Debug, Default, Deserialize)]
pub struct ReferenceQuery {
    pub on: Option<NaiveDate>,
}

impl ReferenceQuery {
    fn reference(&self) -> NaiveDate {
        self.on.unwrap_or_else(today)
    }
}

#[derive(Debug, Deserialize)]
pub struct SettingsRequest {
    pub month_start: Option<u32>,
}

#[derive(Debug, Deserialize)]
pub struct CompleteStepRequest {
    pub step: StepRef,
    #[serde(default)]
    pub step_data: Value,
}

#[derive(Debug, Deserialize)]
pub struct GoToStepRequest {
    pub step: StepRef,
}

#[derive(Debug, Deserialize)]
pub struct PledgeRequest {
    pub text: String,
}

#[derive(Debug, Serialize)]
pub struct SubmittedExpense {
    pub expense: NewExpense,
}

pub async fn index(State(state): State<AppState>) -> Html<String> {
    let name = state.config.session.display_name.as_deref().unwrap_or("there");
    Html(render_index(today(), name))
}

pub async fn get_categories() -> Json<&'static [Category]> {
    Json(categories::all())
}

pub async fn get_user(State(state): State<AppState>) -> Result<Json<UserRecord>, AppError> {
    Ok(Json(state.api.fetch_user().await?))
}

pub async fn get_period(
    State(state): State<AppState>,
    Query(query): Query<ReferenceQuery>,
) -> Result<Json<PeriodView>, AppError> {
    let view = views::load_period(&state.api, query.reference()).await?;
    Ok(Json(view))
}

pub async fn get_expenses(
    State(state): State<AppState>,
    Query(query): Query<ReferenceQuery>,
) -> Result<Json<ExpenseTable>, AppError> {
    let table = views::load_expense_table(&state.api, query.reference()).await?;
    Ok(Json(table))
}

pub async fn add_expense(
    State(state): State<AppState>,
    Json(payload): Json<ExpenseInput>,
) -> Result<Json<SubmittedExpense>, AppError> {
    let expense = views::record_expense(&state.api, payload, today()).await?;
    info!(
        "recorded {} expense of {} on {}",
        expense.category, expense.amount, expense.date
    );
    Ok(Json(SubmittedExpense { expense }))
}

pub async fn get_dashboard(
    State(state): State<AppState>,
    Query(query): Query<ReferenceQuery>,
) -> Json<DashboardView> {
    Json(views::load_dashboard(&state.api, query.reference(), today()).await)
}

pub async fn get_missions(State(state): State<AppState>) -> Result<Json<Vec<MissionCard>>, AppError> {
    Ok(Json(views::load_missions(&state.api).await?))
}

pub async fn get_onboarding(State(state): State<AppState>) -> Result<Json<OnboardingView>, AppError> {
    Ok(Json(views::load_onboarding(&state.api).await?))
}

pub async fn complete_step(
    State(state): State<AppState>,
    Json(payload): Json<CompleteStepRequest>,
) -> Result<Json<Option<OnboardingView>>, AppError> {
    let step = known_step(&payload.step)?;
    let view = views::complete_step(&state.api, step, payload.step_data).await?;
    info!("completed onboarding step {}", step.key);
    Ok(Json(view))
}

pub async fn go_to_step(
    State(state): State<AppState>,
    Json(payload): Json<GoToStepRequest>,
) -> Result<Json<Option<OnboardingView>>, AppError> {
    let step = known_step(&payload.step)?;
    Ok(Json(views::go_to_step(&state.api, step).await?))
}

pub async fn check_pledge_input(Json(payload): Json<PledgeRequest>) -> Json<PledgeInputView> {
    Json(PledgeInputView::new(&payload.text))
}

pub async fn submit_pledge(
    State(state): State<AppState>,
    Json(payload): Json<PledgeRequest>,
) -> Result<Json<Option<OnboardingView>>, AppError> {
    let view = views::submit_pledge(&state.api, &payload.text, Local::now()).await?;
    info!("pledge accepted");
    Ok(Json(view))
}

pub async fn save_settings(
    State(state): State<AppState>,
    Json(payload): Json<SettingsRequest>,
) -> Result<Json<PeriodView>, AppError> {
    // Reject bad input here so it is not reported as an upstream failure.
    if let Some(start) = payload.month_start {
        BillingPeriodConfig::starting_on(start)?;
    }
    let view = views::save_month_start(&state.api, payload.month_start, today()).await?;
    info!("month start set to {:?}", view.start_day);
    Ok(Json(view))
}

fn known_step(step: &StepRef) -> Result<&'static OnboardingStep, AppError> {
    step.find()
        .ok_or_else(|| AppError::bad_request(format!("unknown onboarding step {step}")))
}

fn today() -> NaiveDate {
    Local::now().date_naive()
}
