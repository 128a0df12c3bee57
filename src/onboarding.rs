//! Onboarding steps and the pledge the user types to finish them.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::OnboardingProgress;

pub const PLEDGE_TEXT: &str =
    "I pledge, to act always, keeping my long term financial well being in mind";

pub const PLEDGE_STEP: u32 = 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct OnboardingStep {
    pub id: u32,
    pub key: &'static str,
    pub title: &'static str,
    pub description: &'static str,
    pub required: bool,
    pub skippable: bool,
    pub estimated_seconds: u32,
}

pub static STEPS: [OnboardingStep; 2] = [
    OnboardingStep {
        id: 0,
        key: "welcome",
        title: "Welcome",
        description: "Get started with your expense tracking journey",
        required: true,
        skippable: false,
        estimated_seconds: 30,
    },
    OnboardingStep {
        id: PLEDGE_STEP,
        key: "pledge",
        title: "Take the Pledge",
        description: "Commit to financial responsibility",
        required: true,
        skippable: false,
        estimated_seconds: 45,
    },
];

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PledgeError {
    #[error("Please enter the pledge text")]
    Empty,
    #[error("Please enter the exact pledge text")]
    Mismatch,
}

/// A step named either by id or by key.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum StepRef {
    Id(u32),
    Key(String),
}

impl StepRef {
    pub fn find(&self) -> Option<&'static OnboardingStep> {
        match self {
            StepRef::Id(id) => step_by_id(*id),
            StepRef::Key(key) => step_by_key(key),
        }
    }
}

impl std::fmt::Display for StepRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StepRef::Id(id) => write!(f, "{id}"),
            StepRef::Key(key) => write!(f, "{key:?}"),
        }
    }
}

pub fn step_by_id(id: u32) -> Option<&'static OnboardingStep> {
    STEPS.iter().find(|step| step.id == id)
}

pub fn step_by_key(key: &str) -> Option<&'static OnboardingStep> {
    STEPS.iter().find(|step| step.key == key)
}

pub fn current_step(progress: &OnboardingProgress) -> Option<&'static OnboardingStep> {
    step_by_id(progress.current_step)
}

pub fn next_step(progress: &OnboardingProgress) -> Option<&'static OnboardingStep> {
    progress.current_step.checked_add(1).and_then(step_by_id)
}

pub fn previous_step(progress: &OnboardingProgress) -> Option<&'static OnboardingStep> {
    progress.current_step.checked_sub(1).and_then(step_by_id)
}

pub fn is_step_completed(progress: &OnboardingProgress, step_id: u32) -> bool {
    progress.completed_steps.contains(&step_id)
}

pub fn is_complete(progress: &OnboardingProgress) -> bool {
    required_steps().all(|step| is_step_completed(progress, step.id))
}

pub fn progress_percentage(progress: &OnboardingProgress) -> f64 {
    let total = required_steps().count();
    if total == 0 {
        return 0.0;
    }
    let done = required_steps()
        .filter(|step| is_step_completed(progress, step.id))
        .count();
    done as f64 / total as f64 * 100.0
}

pub fn estimated_seconds_remaining(progress: &OnboardingProgress) -> u32 {
    required_steps()
        .filter(|step| step.id >= progress.current_step && !is_step_completed(progress, step.id))
        .map(|step| step.estimated_seconds)
        .sum()
}

/// Longest prefix of `input` that matches the pledge character by character.
pub fn accept_pledge_input(input: &str) -> String {
    input
        .chars()
        .zip(PLEDGE_TEXT.chars())
        .take_while(|(typed, expected)| typed == expected)
        .map(|(typed, _)| typed)
        .collect()
}

pub fn validate_pledge(text: &str) -> Result<&str, PledgeError> {
    let text = text.trim();
    if text.is_empty() {
        return Err(PledgeError::Empty);
    }
    if text != PLEDGE_TEXT {
        return Err(PledgeError::Mismatch);
    }
    Ok(text)
}

fn required_steps() -> impl Iterator<Item = &'static OnboardingStep> {
    STEPS.iter().filter(|step| step.required)
}
