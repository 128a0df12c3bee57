//! HTTP client for the remote finance API.

use crate::config::AppConfig;
use crate::models::{
    BudgetSummary, EntryDaysEnvelope, Expense, ExpensesEnvelope, MissionCounters, NewExpense,
    OnboardingAction, OnboardingEnvelope, OnboardingProgress, OnboardingUpdateResponse,
    SettingsEnvelope, UserRecord, UserSettings,
};
use crate::period::{BillingPeriodConfig, PeriodError, derive_end_day};
use chrono::NaiveDate;
use reqwest::{Client, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::future::Future;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, warn};

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("request to {path} timed out")]
    Timeout { path: String },
    #[error("could not reach the finance API: {0}")]
    Network(#[source] reqwest::Error),
    #[error("HTTP {status}: {body}")]
    Status { status: StatusCode, body: String },
    #[error("unexpected response from {path}: {message}")]
    Decode { path: String, message: String },
    #[error("invalid settings: {0}")]
    Invalid(#[from] PeriodError),
}

/// Operations the screens need from the finance API.
pub trait FinanceApi {
    fn fetch_user(&self) -> impl Future<Output = Result<UserRecord, ClientError>> + Send;

    fn fetch_settings(&self) -> impl Future<Output = Result<BillingPeriodConfig, ClientError>> + Send;

    /// Saves the custom month start; `None` goes back to calendar months.
    fn save_settings(
        &self,
        month_start: Option<u32>,
    ) -> impl Future<Output = Result<BillingPeriodConfig, ClientError>> + Send;

    fn fetch_expenses_between(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> impl Future<Output = Result<Vec<Expense>, ClientError>> + Send;

    fn fetch_month_expenses(
        &self,
        year: i32,
        month: u32,
    ) -> impl Future<Output = Result<Vec<Expense>, ClientError>> + Send;

    fn submit_expense(
        &self,
        expense: &NewExpense,
    ) -> impl Future<Output = Result<(), ClientError>> + Send;

    fn fetch_entry_days(
        &self,
        year: i32,
        month: u32,
    ) -> impl Future<Output = Result<Vec<u32>, ClientError>> + Send;

    fn fetch_budget(
        &self,
        year: i32,
        month: u32,
    ) -> impl Future<Output = Result<BudgetSummary, ClientError>> + Send;

    fn fetch_missions(&self) -> impl Future<Output = Result<MissionCounters, ClientError>> + Send;

    fn fetch_onboarding(
        &self,
    ) -> impl Future<Output = Result<OnboardingProgress, ClientError>> + Send;

    fn complete_onboarding_step(
        &self,
        step: u32,
        step_data: Value,
    ) -> impl Future<Output = Result<Option<OnboardingProgress>, ClientError>> + Send;

    fn update_onboarding(
        &self,
        progress: OnboardingProgress,
    ) -> impl Future<Output = Result<Option<OnboardingProgress>, ClientError>> + Send;
}

#[derive(Clone)]
pub struct ApiClient {
    http: Client,
    base_url: String,
    user_id: i64,
    authorization: String,
    dev_bypass: bool,
    timeout: Duration,
    onboarding_timeout: Duration,
}

impl ApiClient {
    pub fn new(config: &AppConfig) -> Result<Self, ClientError> {
        let http = Client::builder().build().map_err(ClientError::Network)?;
        Ok(Self {
            http,
            base_url: config.api_url.clone(),
            user_id: config.session.user_id,
            authorization: format!("tma {}", config.session.init_data),
            dev_bypass: config.session.dev_bypass,
            timeout: config.request_timeout,
            onboarding_timeout: config.onboarding_timeout,
        })
    }

    async fn get<T: DeserializeOwned>(
        &self,
        suffix: &str,
        query: &[(&str, String)],
        timeout: Duration,
    ) -> Result<T, ClientError> {
        let path = self.user_path(suffix);
        debug!("GET {path}");
        let request = self.http.get(self.url(&path)).query(query);
        self.send(request, path, timeout).await
    }

    async fn post<B, T>(&self, suffix: &str, body: &B, timeout: Duration) -> Result<T, ClientError>
    where
        B: serde::Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let path = self.user_path(suffix);
        debug!("POST {path}");
        let request = self.http.post(self.url(&path)).json(body);
        self.send(request, path, timeout).await
    }

    /// POST whose response body, if any, is not needed.
    async fn post_discarding<B>(&self, suffix: &str, body: &B) -> Result<(), ClientError>
    where
        B: serde::Serialize + ?Sized,
    {
        let path = self.user_path(suffix);
        debug!("POST {path}");
        let request = self.http.post(self.url(&path)).json(body);
        self.send_raw(request, &path, self.timeout).await?;
        Ok(())
    }

    async fn send<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
        path: String,
        timeout: Duration,
    ) -> Result<T, ClientError> {
        let body = self.send_raw(request, &path, timeout).await?;
        serde_json::from_str(&body).map_err(|err| {
            warn!("failed to decode {path}: {err}");
            ClientError::Decode {
                path,
                message: err.to_string(),
            }
        })
    }

    async fn send_raw(
        &self,
        request: RequestBuilder,
        path: &str,
        timeout: Duration,
    ) -> Result<String, ClientError> {
        let mut request = request
            .header(reqwest::header::AUTHORIZATION, &self.authorization)
            .timeout(timeout);
        if self.dev_bypass {
            request = request.header("X-Dev-Bypass", "true");
        }

        let response = request
            .send()
            .await
            .map_err(|err| transport_error(err, path))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|err| transport_error(err, path))?;

        if !status.is_success() {
            warn!("{path} answered {status}");
            return Err(ClientError::Status { status, body });
        }
        Ok(body)
    }

    fn user_path(&self, suffix: &str) -> String {
        format!("/api/user/{}{suffix}", self.user_id)
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }
}

impl FinanceApi for ApiClient {
    async fn fetch_user(&self) -> Result<UserRecord, ClientError> {
        self.get("", &[], self.timeout).await
    }

    async fn fetch_settings(&self) -> Result<BillingPeriodConfig, ClientError> {
        let envelope: SettingsEnvelope = self.get("/settings", &[], self.timeout).await?;
        let settings = envelope.settings;
        Ok(BillingPeriodConfig::from_settings(
            settings.month_start,
            settings.month_end,
        )?)
    }

    async fn save_settings(
        &self,
        month_start: Option<u32>,
    ) -> Result<BillingPeriodConfig, ClientError> {
        let config = match month_start {
            Some(start) => BillingPeriodConfig::starting_on(start)?,
            None => BillingPeriodConfig::calendar_month(),
        };
        let body = UserSettings {
            month_start,
            month_end: month_start.map(derive_end_day),
        };
        self.post_discarding("/settings", &body).await?;
        Ok(config)
    }

    async fn fetch_expenses_between(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<Expense>, ClientError> {
        let query = [("start", start.to_string()), ("end", end.to_string())];
        let envelope: ExpensesEnvelope = self.get("/expenses/range", &query, self.timeout).await?;
        Ok(envelope.expenses)
    }

    async fn fetch_month_expenses(&self, year: i32, month: u32) -> Result<Vec<Expense>, ClientError> {
        let envelope: ExpensesEnvelope = self
            .get("/expenses/current-month", &month_query(year, month), self.timeout)
            .await?;
        Ok(envelope.expenses)
    }

    async fn submit_expense(&self, expense: &NewExpense) -> Result<(), ClientError> {
        self.post_discarding("/expenses", expense).await
    }

    async fn fetch_entry_days(&self, year: i32, month: u32) -> Result<Vec<u32>, ClientError> {
        let envelope: EntryDaysEnvelope = self
            .get("/expenses/dates", &month_query(year, month), self.timeout)
            .await?;
        Ok(envelope.days)
    }

    async fn fetch_budget(&self, year: i32, month: u32) -> Result<BudgetSummary, ClientError> {
        self.get("/budget/current-month", &month_query(year, month), self.timeout)
            .await
    }

    async fn fetch_missions(&self) -> Result<MissionCounters, ClientError> {
        self.get("/missions", &[], self.timeout).await
    }

    async fn fetch_onboarding(&self) -> Result<OnboardingProgress, ClientError> {
        let envelope: OnboardingEnvelope =
            self.get("/onboarding", &[], self.onboarding_timeout).await?;
        Ok(envelope.onboarding)
    }

    async fn complete_onboarding_step(
        &self,
        step: u32,
        step_data: Value,
    ) -> Result<Option<OnboardingProgress>, ClientError> {
        let action = OnboardingAction::Complete { step, step_data };
        let response: OnboardingUpdateResponse =
            self.post("/onboarding", &action, self.timeout).await?;
        Ok(response.user.and_then(|user| user.onboarding_progress))
    }

    async fn update_onboarding(
        &self,
        progress: OnboardingProgress,
    ) -> Result<Option<OnboardingProgress>, ClientError> {
        let action = OnboardingAction::Update { progress };
        let response: OnboardingUpdateResponse =
            self.post("/onboarding", &action, self.timeout).await?;
        Ok(response.user.and_then(|user| user.onboarding_progress))
    }
}

fn month_query(year: i32, month: u32) -> [(&'static str, String); 2] {
    [("year", year.to_string()), ("month", month.to_string())]
}

fn transport_error(err: reqwest::Error, path: &str) -> ClientError {
    if err.is_timeout() {
        warn!("{path} timed out");
        ClientError::Timeout {
            path: path.to_string(),
        }
    } else {
        warn!("request to {path} failed: {err}");
        ClientError::Network(err)
    }
}
