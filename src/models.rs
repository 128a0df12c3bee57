use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize, de};
use serde_json::{Map, Value};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserRecord {
    pub id: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct UserSettings {
    pub month_start: Option<u32>,
    pub month_end: Option<u32>,
}

#[derive(Debug, Deserialize)]
pub struct SettingsEnvelope {
    pub settings: UserSettings,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PaymentMode {
    #[default]
    #[serde(rename = "UPI")]
    Upi,
    #[serde(rename = "CASH")]
    Cash,
    #[serde(rename = "DEBIT CARD")]
    DebitCard,
    #[serde(rename = "CREDIT CARD")]
    CreditCard,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Expense {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(deserialize_with = "flexible_date")]
    pub date: NaiveDate,
    #[serde(deserialize_with = "flexible_amount")]
    pub amount: f64,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub mode: Option<PaymentMode>,
}

#[derive(Debug, Deserialize)]
pub struct ExpensesEnvelope {
    pub expenses: Vec<Expense>,
}

#[derive(Debug, Deserialize)]
pub struct EntryDaysEnvelope {
    pub days: Vec<u32>,
}

/// Expense as submitted to the finance API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewExpense {
    pub date: NaiveDate,
    pub amount: f64,
    pub category: String,
    pub description: Option<String>,
    pub mode: PaymentMode,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BudgetSummary {
    pub total_expenses: f64,
    pub budget: Option<f64>,
    pub current_date: u32,
    pub days_in_month: u32,
    pub budget_percentage: f64,
    pub date_percentage: f64,
    #[serde(default)]
    pub is_family: Option<bool>,
    #[serde(default)]
    pub family_members: Option<u32>,
    #[serde(default)]
    pub custom_period: Option<bool>,
    #[serde(default)]
    pub period_start: Option<String>,
    #[serde(default)]
    pub period_end: Option<String>,
}

/// Raw mission counters; every field must be present.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MissionCounters {
    pub baby_steps: u32,
    pub junior_analyst: u32,
    pub budget_set: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OnboardingProgress {
    pub current_step: u32,
    pub completed_steps: Vec<u32>,
    pub total_steps: u32,
    #[serde(default)]
    pub step_data: Map<String, Value>,
}

#[derive(Debug, Deserialize)]
pub struct OnboardingEnvelope {
    pub onboarding: OnboardingProgress,
}

#[derive(Debug, Deserialize)]
pub struct OnboardingUpdateResponse {
    #[serde(default)]
    pub user: Option<OnboardingUser>,
}

#[derive(Debug, Deserialize)]
pub struct OnboardingUser {
    #[serde(default)]
    pub onboarding_progress: Option<OnboardingProgress>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "action", rename_all = "lowercase")]
pub enum OnboardingAction {
    Complete {
        step: u32,
        #[serde(rename = "stepData")]
        step_data: Value,
    },
    Update {
        progress: OnboardingProgress,
    },
}

/// Accepts `YYYY-MM-DD` or a timestamp whose first ten characters are one.
fn flexible_date<'de, D>(deserializer: D) -> Result<NaiveDate, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    let day = raw.get(..10).unwrap_or(&raw);
    NaiveDate::parse_from_str(day, "%Y-%m-%d")
        .map_err(|err| de::Error::custom(format!("invalid date {raw:?}: {err}")))
}

/// Amounts arrive either as JSON numbers or as numeric strings.
fn flexible_amount<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Amount {
        Number(f64),
        Text(String),
    }

    let value = match Amount::deserialize(deserializer)? {
        Amount::Number(value) => value,
        Amount::Text(text) => text
            .trim()
            .parse::<f64>()
            .map_err(|err| de::Error::custom(format!("invalid amount {text:?}: {err}")))?,
    };

    if value.is_finite() {
        Ok(value)
    } else {
        Err(de::Error::custom("amount must be finite"))
    }
}
