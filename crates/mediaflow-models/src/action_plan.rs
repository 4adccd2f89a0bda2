//! Action-plan models derived from a transcript.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Priority of a derived todo entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema, Default)]
#[serde(rename_all = "lowercase")]
pub enum TodoPriority {
    High,
    #[default]
    Medium,
    Low,
}

impl TodoPriority {
    pub fn as_str(&self) -> &'static str {
        match self {
            TodoPriority::High => "high",
            TodoPriority::Medium => "medium",
            TodoPriority::Low => "low",
        }
    }

    /// Parse a wire value. Case-sensitive.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "high" => Some(TodoPriority::High),
            "medium" => Some(TodoPriority::Medium),
            "low" => Some(TodoPriority::Low),
            _ => None,
        }
    }
}

impl fmt::Display for TodoPriority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Category of a derived todo entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema, Default)]
#[serde(rename_all = "lowercase")]
pub enum TodoCategory {
    #[default]
    Learning,
    Action,
    Research,
    Practice,
}

impl TodoCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            TodoCategory::Learning => "learning",
            TodoCategory::Action => "action",
            TodoCategory::Research => "research",
            TodoCategory::Practice => "practice",
        }
    }

    /// Parse a wire value. Case-sensitive.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "learning" => Some(TodoCategory::Learning),
            "action" => Some(TodoCategory::Action),
            "research" => Some(TodoCategory::Research),
            "practice" => Some(TodoCategory::Practice),
            _ => None,
        }
    }
}

impl fmt::Display for TodoCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One actionable task extracted from a transcript.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct TodoItem {
    pub task: String,
    #[serde(default)]
    pub priority: TodoPriority,
    #[serde(default)]
    pub category: TodoCategory,
}

/// Prioritized tasks plus key takeaways for one transcript.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ActionPlan {
    pub todos: Vec<TodoItem>,
    #[serde(default)]
    pub key_takeaways: Vec<String>,
}
