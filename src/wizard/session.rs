use std::fmt;

use chrono::{DateTime, Local};
use uuid::Uuid;

use crate::gh::RepoContext;
use crate::release::ReleasePlan;

use super::menu::{WorkflowAction, WorkflowKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperationResult {
    Success,
    Error,
}

impl OperationResult {
    pub fn as_str(&self) -> &'static str {
        match self {
            OperationResult::Success => "success",
            OperationResult::Error => "error",
        }
    }
}

impl fmt::Display for OperationResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// State shared by the workflows of one wizard run.
#[derive(Debug, Clone)]
pub struct WizardSession {
    pub id: String,
    pub started_at: DateTime<Local>,
    pub current_workflow: Option<WorkflowKind>,
    pub workflow_context: Option<String>,
    pub last_operation: Option<&'static str>,
    pub operation_result: Option<OperationResult>,
    pub operations: u32,
    /// Parent issue from the last create workflow.
    pub last_created_issue: Option<u64>,
    /// Plan from the last release preview.
    pub release_plan: Option<ReleasePlan>,
    pub repo: Option<RepoContext>,
}

impl Default for WizardSession {
    fn default() -> Self {
        Self::new()
    }
}

impl WizardSession {
    pub fn new() -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            started_at: Local::now(),
            current_workflow: None,
            workflow_context: None,
            last_operation: None,
            operation_result: None,
            operations: 0,
            last_created_issue: None,
            release_plan: None,
            repo: None,
        }
    }

    /// First 8 characters of the id, for display.
    pub fn short_id(&self) -> &str {
        self.id.get(..8).unwrap_or(&self.id)
    }

    pub fn begin(&mut self, action: WorkflowAction, context: &str) {
        self.current_workflow = Some(action.kind());
        self.workflow_context = Some(context.to_string());
        self.last_operation = Some(action.name());
        self.operation_result = None;
    }

    pub fn finish(&mut self, result: OperationResult) {
        self.current_workflow = None;
        self.operation_result = Some(result);
        self.operations += 1;
    }
}
