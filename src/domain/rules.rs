// ============================================================
// BUSINESS RULES & PRIORITY WEIGHTS
// ============================================================
// Catalogued configuration that travels with an exported dataset.
// Nothing here evaluates a rule.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use uuid::Uuid;

use super::error::{AppError, Result};
use super::value::AttributeValue;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RuleType {
    CoRun,
    SlotRestriction,
    LoadLimit,
    PhaseWindow,
    PatternMatch,
    Precedence,
}

impl RuleType {
    pub const ALL: [RuleType; 6] = [
        RuleType::CoRun,
        RuleType::SlotRestriction,
        RuleType::LoadLimit,
        RuleType::PhaseWindow,
        RuleType::PatternMatch,
        RuleType::Precedence,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            RuleType::CoRun => "Co-Run Tasks",
            RuleType::SlotRestriction => "Slot Restriction",
            RuleType::LoadLimit => "Load Limit",
            RuleType::PhaseWindow => "Phase Window",
            RuleType::PatternMatch => "Pattern Match",
            RuleType::Precedence => "Precedence",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            RuleType::CoRun => "Tasks that must run together",
            RuleType::SlotRestriction => "Limit available slots for groups",
            RuleType::LoadLimit => "Maximum load per worker group",
            RuleType::PhaseWindow => "Restrict tasks to specific phases",
            RuleType::PatternMatch => "Rules based on data patterns",
            RuleType::Precedence => "Task execution order",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rule {
    pub id: String,
    #[serde(rename = "type")]
    pub rule_type: RuleType,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub parameters: BTreeMap<String, AttributeValue>,
    #[serde(default = "default_enabled")]
    pub enabled: bool,
}

fn default_enabled() -> bool {
    true
}

/// Fields a caller supplies for a new rule; the id is assigned on insert
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuleDraft {
    #[serde(rename = "type")]
    pub rule_type: RuleType,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub parameters: BTreeMap<String, AttributeValue>,
}

/// Ordered rule collection
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RuleSet {
    rules: Vec<Rule>,
}

impl RuleSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a JSON array of rules
    pub fn from_json(raw: &str) -> Result<Self> {
        let rules: Vec<Rule> = serde_json::from_str(raw)
            .map_err(|e| AppError::ParseError(format!("Invalid rules JSON: {}", e)))?;
        Ok(Self { rules })
    }

    /// Insert an enabled rule and return its generated id
    pub fn add(&mut self, draft: RuleDraft) -> Result<String> {
        if draft.name.trim().is_empty() {
            return Err(AppError::ValidationError(
                "Rule name must not be empty".to_string(),
            ));
        }

        let id = format!("rule-{}", Uuid::new_v4());
        self.rules.push(Rule {
            id: id.clone(),
            rule_type: draft.rule_type,
            name: draft.name.trim().to_string(),
            description: draft.description,
            parameters: draft.parameters,
            enabled: true,
        });
        Ok(id)
    }

    /// Replace the rule with the given id. The stored id never changes.
    pub fn update(&mut self, id: &str, rule: Rule) -> Result<()> {
        let slot = self
            .rules
            .iter_mut()
            .find(|r| r.id == id)
            .ok_or_else(|| AppError::NotFound(format!("Rule '{}'", id)))?;
        *slot = Rule {
            id: slot.id.clone(),
            ..rule
        };
        Ok(())
    }

    pub fn remove(&mut self, id: &str) -> Result<Rule> {
        let pos = self
            .rules
            .iter()
            .position(|r| r.id == id)
            .ok_or_else(|| AppError::NotFound(format!("Rule '{}'", id)))?;
        Ok(self.rules.remove(pos))
    }

    /// Flip the enabled flag, returning the new state
    pub fn toggle(&mut self, id: &str) -> Result<bool> {
        let rule = self
            .rules
            .iter_mut()
            .find(|r| r.id == id)
            .ok_or_else(|| AppError::NotFound(format!("Rule '{}'", id)))?;
        rule.enabled = !rule.enabled;
        Ok(rule.enabled)
    }

    pub fn get(&self, id: &str) -> Option<&Rule> {
        self.rules.iter().find(|r| r.id == id)
    }

    pub fn enabled(&self) -> Vec<&Rule> {
        self.rules.iter().filter(|r| r.enabled).collect()
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

pub const CRITERION_PRIORITY_LEVEL: &str = "Priority Level";
pub const CRITERION_TASK_FULFILLMENT: &str = "Task Fulfillment";
pub const CRITERION_SKILL_MATCH: &str = "Skill Match";
pub const CRITERION_LOAD_BALANCE: &str = "Load Balance";
pub const CRITERION_PHASE_PREFERENCE: &str = "Phase Preference";

/// Named weighting profile
#[derive(Debug, Clone, Copy)]
pub struct WeightPreset {
    pub key: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    weights: [f64; 5],
}

pub const PRESETS: &[WeightPreset] = &[
    WeightPreset {
        key: "maximize-fulfillment",
        name: "Maximize Fulfillment",
        description: "Prioritize completing as many requested tasks as possible",
        weights: [0.4, 0.3, 0.15, 0.1, 0.05],
    },
    WeightPreset {
        key: "fair-distribution",
        name: "Fair Distribution",
        description: "Balance workload evenly across all workers",
        weights: [0.15, 0.2, 0.2, 0.35, 0.1],
    },
    WeightPreset {
        key: "skill-optimization",
        name: "Skill Optimization",
        description: "Match tasks to workers with the best skill fit",
        weights: [0.2, 0.2, 0.4, 0.15, 0.05],
    },
];

const CRITERIA: [&str; 5] = [
    CRITERION_PRIORITY_LEVEL,
    CRITERION_TASK_FULFILLMENT,
    CRITERION_SKILL_MATCH,
    CRITERION_LOAD_BALANCE,
    CRITERION_PHASE_PREFERENCE,
];

/// Relative importance of each allocation criterion
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PriorityWeights {
    weights: BTreeMap<String, f64>,
}

impl Default for PriorityWeights {
    fn default() -> Self {
        Self::from_array([0.3, 0.25, 0.2, 0.15, 0.1])
    }
}

impl PriorityWeights {
    fn from_array(values: [f64; 5]) -> Self {
        let weights = CRITERIA
            .iter()
            .zip(values)
            .map(|(name, w)| (name.to_string(), w))
            .collect();
        Self { weights }
    }

    pub fn preset(key: &str) -> Result<Self> {
        PRESETS
            .iter()
            .find(|p| p.key == key)
            .map(|p| Self::from_array(p.weights))
            .ok_or_else(|| AppError::NotFound(format!("Weight preset '{}'", key)))
    }

    /// Set one criterion; weights are clamped to `0.0..=1.0`
    pub fn set(&mut self, criterion: &str, weight: f64) -> Result<()> {
        if !weight.is_finite() {
            return Err(AppError::ValidationError(format!(
                "Weight for '{}' must be a finite number",
                criterion
            )));
        }
        self.weights
            .insert(criterion.to_string(), weight.clamp(0.0, 1.0));
        Ok(())
    }

    pub fn get(&self, criterion: &str) -> Option<f64> {
        self.weights.get(criterion).copied()
    }

    pub fn total(&self) -> f64 {
        self.weights.values().sum()
    }

    /// Scale weights so they sum to 1.0. All-zero weights are left untouched.
    pub fn normalize(&mut self) {
        let total = self.total();
        if total <= 0.0 {
            return;
        }
        for w in self.weights.values_mut() {
            *w /= total;
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.weights.iter().map(|(k, v)| (k.as_str(), *v))
    }
}
