use crate::models::MissionCounters;
use serde::Serialize;

/// Days of expenses counted toward the Junior Budget Analyst mission.
const ANALYST_EXPENSE_DAYS: u32 = 7;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MissionId {
    BabySteps,
    JuniorAnalyst,
}

#[derive(Debug, Clone, Copy)]
pub struct Mission {
    pub id: MissionId,
    pub key: &'static str,
    pub title: &'static str,
    pub description: &'static str,
    pub icon: &'static str,
    pub target: u32,
    pub feature: &'static str,
}

pub static MISSIONS: [Mission; 2] = [
    Mission {
        id: MissionId::BabySteps,
        key: "babySteps",
        title: "Baby Steps",
        description: "Record expenses for 3+ days to unlock Calendar View",
        icon: "👶",
        target: 3,
        feature: "Calendar View",
    },
    Mission {
        id: MissionId::JuniorAnalyst,
        key: "juniorAnalyst",
        title: "Junior Budget Analyst",
        description: "Record expenses for 7+ days AND set a monthly budget with /budget to unlock Budget View",
        icon: "📊",
        target: ANALYST_EXPENSE_DAYS + 1,
        feature: "Budget View",
    },
];

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MissionCard {
    pub id: &'static str,
    pub title: &'static str,
    pub description: &'static str,
    pub icon: &'static str,
    pub progress: u32,
    pub target: u32,
    pub percentage: u32,
    pub completed: bool,
    pub unlocked: bool,
    pub feature: &'static str,
    pub feature_unlocked: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub budget_set: Option<bool>,
}

impl Mission {
    pub fn progress(&self, counters: &MissionCounters) -> u32 {
        match self.id {
            MissionId::BabySteps => counters.baby_steps,
            MissionId::JuniorAnalyst => {
                counters.junior_analyst.min(ANALYST_EXPENSE_DAYS) + u32::from(counters.budget_set)
            }
        }
    }

    pub fn card(&self, counters: &MissionCounters) -> MissionCard {
        let progress = self.progress(counters);
        let completed = progress >= self.target;
        MissionCard {
            id: self.key,
            title: self.title,
            description: self.description,
            icon: self.icon,
            progress,
            target: self.target,
            percentage: percentage(progress, self.target),
            completed,
            unlocked: true,
            feature: self.feature,
            feature_unlocked: completed,
            budget_set: (self.id == MissionId::JuniorAnalyst).then_some(counters.budget_set),
        }
    }
}

pub fn mission_cards(counters: &MissionCounters) -> Vec<MissionCard> {
    MISSIONS.iter().map(|mission| mission.card(counters)).collect()
}

fn percentage(progress: u32, target: u32) -> u32 {
    if target == 0 {
        return 100;
    }
    let ratio = (f64::from(progress) / f64::from(target) * 100.0).min(100.0);
    ratio.round() as u32
}
