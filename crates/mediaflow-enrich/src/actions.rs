//! Action-plan generation with a fixed fallback.

use serde::Deserialize;
use tracing::{debug, warn};

use mediaflow_models::{ActionPlan, TodoCategory, TodoItem, TodoPriority};

use crate::client::LlmClient;
use crate::extract::{first_balanced_object, strip_code_fences};

/// Candidate JSON parsed from the model response, before validation.
#[derive(Debug, Deserialize)]
struct RawActionPlan {
    todos: Option<Vec<RawTodo>>,
    #[serde(default)]
    key_takeaways: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct RawTodo {
    task: Option<String>,
    priority: Option<String>,
    category: Option<String>,
}

impl LlmClient {
    /// Generate 5-10 prioritized tasks plus key takeaways for a
    /// transcript.
    ///
    /// Never fails: model or parse problems fall back to a fixed generic
    /// plan.
    pub async fn generate_action_items(&self, transcript: &str) -> ActionPlan {
        let prompt = build_action_prompt(transcript);

        match self.complete(&prompt).await {
            Ok(text) => match parse_action_plan(&text) {
                Some(plan) => {
                    debug!("Model action plan accepted ({} todos)", plan.todos.len());
                    plan
                }
                None => {
                    warn!("Model action plan malformed, using fallback plan");
                    fallback_action_plan()
                }
            },
            Err(e) => {
                warn!("Model call failed, using fallback plan: {}", e);
                fallback_action_plan()
            }
        }
    }
}

fn build_action_prompt(transcript: &str) -> String {
    format!(
        r#"Based on this audio transcription, generate a practical to-do list of action items the listener should complete after watching/listening. Focus on key takeaways, action steps, and important tasks mentioned.

Transcription: "{transcript}"

Respond ONLY with valid JSON (no markdown, no code blocks, no explanations):
{{
  "todos": [
    {{
      "task": "Clear, actionable task description",
      "priority": "high/medium/low",
      "category": "learning/action/research/practice"
    }}
  ],
  "key_takeaways": ["takeaway 1", "takeaway 2", "takeaway 3"]
}}

Generate 5-10 relevant todos based on the content."#
    )
}

/// Parse a model response into an action plan; `None` when the todos
/// array is missing or empty.
fn parse_action_plan(response: &str) -> Option<ActionPlan> {
    let cleaned = strip_code_fences(response);
    let candidate = first_balanced_object(cleaned)?;
    let raw: RawActionPlan = serde_json::from_str(candidate).ok()?;

    let todos: Vec<TodoItem> = raw
        .todos?
        .into_iter()
        .filter_map(|t| {
            let task = t.task.filter(|s| !s.is_empty())?;
            Some(TodoItem {
                task,
                priority: t
                    .priority
                    .as_deref()
                    .and_then(TodoPriority::parse)
                    .unwrap_or_default(),
                category: t
                    .category
                    .as_deref()
                    .and_then(TodoCategory::parse)
                    .unwrap_or_default(),
            })
        })
        .collect();

    if todos.is_empty() {
        return None;
    }

    Some(ActionPlan {
        todos,
        key_takeaways: raw.key_takeaways,
    })
}

/// Fixed generic plan used when the model cannot provide one.
fn fallback_action_plan() -> ActionPlan {
    ActionPlan {
        todos: vec![
            TodoItem {
                task: "Review the main points from this audio".to_string(),
                priority: TodoPriority::High,
                category: TodoCategory::Learning,
            },
            TodoItem {
                task: "Take notes on key concepts discussed".to_string(),
                priority: TodoPriority::Medium,
                category: TodoCategory::Learning,
            },
            TodoItem {
                task: "Research topics mentioned for deeper understanding".to_string(),
                priority: TodoPriority::Medium,
                category: TodoCategory::Research,
            },
        ],
        key_takeaways: vec![
            "Review the audio content".to_string(),
            "Apply learned concepts".to_string(),
            "Follow up on action items".to_string(),
        ],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_valid_plan() {
        let response = r#"{
  "todos": [
    {"task": "Practice the breathing exercise", "priority": "high", "category": "practice"},
    {"task": "Read the referenced paper", "priority": "low", "category": "research"}
  ],
  "key_takeaways": ["Breathing matters"]
}"#;
        let plan = parse_action_plan(response).unwrap();
        assert_eq!(plan.todos.len(), 2);
        assert_eq!(plan.todos[0].priority, TodoPriority::High);
        assert_eq!(plan.todos[1].category, TodoCategory::Research);
        assert_eq!(plan.key_takeaways, vec!["Breathing matters"]);
    }

    #[test]
    fn test_parse_defaults_unknown_priority() {
        let response = r#"{"todos": [{"task": "Do it", "priority": "urgent", "category": "chores"}]}"#;
        let plan = parse_action_plan(response).unwrap();
        assert_eq!(plan.todos[0].priority, TodoPriority::Medium);
        assert_eq!(plan.todos[0].category, TodoCategory::Learning);
    }

    #[test]
    fn test_parse_rejects_empty_todos() {
        assert!(parse_action_plan(r#"{"todos": []}"#).is_none());
        assert!(parse_action_plan(r#"{"key_takeaways": ["x"]}"#).is_none());
        assert!(parse_action_plan("not json at all").is_none());
    }

    #[test]
    fn test_fallback_plan_shape() {
        let plan = fallback_action_plan();
        assert_eq!(plan.todos.len(), 3);
        assert_eq!(plan.key_takeaways.len(), 3);
        assert_eq!(plan.todos[0].priority, TodoPriority::High);
    }
}
