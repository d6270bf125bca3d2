//! Pipeline stage machine.
//!
//! The pipeline is a strict linear sequence; a fatal error at any point
//! transitions to [`PipelineStage::Failed`] and halts. There is no
//! automatic retry; re-running the whole pipeline is the recovery path,
//! made safe by the idempotent-ensure policy.

use std::fmt;

/// Completed stages of the deployment pipeline, in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineStage {
    NotStarted,
    PrerequisitesChecked,
    ConfigResolved,
    ResourceGroupReady,
    ImagePublished,
    InstanceCreated,
    ReadinessChecked,
    Done,
    Failed,
}

impl PipelineStage {
    /// The linear happy path, `NotStarted` through `Done`.
    pub const SEQUENCE: [Self; 8] = [
        Self::NotStarted,
        Self::PrerequisitesChecked,
        Self::ConfigResolved,
        Self::ResourceGroupReady,
        Self::ImagePublished,
        Self::InstanceCreated,
        Self::ReadinessChecked,
        Self::Done,
    ];

    /// The stage that follows on success. `Done` and `Failed` are terminal.
    pub const fn next(self) -> Self {
        match self {
            Self::NotStarted => Self::PrerequisitesChecked,
            Self::PrerequisitesChecked => Self::ConfigResolved,
            Self::ConfigResolved => Self::ResourceGroupReady,
            Self::ResourceGroupReady => Self::ImagePublished,
            Self::ImagePublished => Self::InstanceCreated,
            Self::InstanceCreated => Self::ReadinessChecked,
            Self::ReadinessChecked => Self::Done,
            Self::Done => Self::Done,
            Self::Failed => Self::Failed,
        }
    }

    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Done | Self::Failed)
    }
}

impl fmt::Display for PipelineStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::NotStarted => "not-started",
            Self::PrerequisitesChecked => "prerequisites-checked",
            Self::ConfigResolved => "config-resolved",
            Self::ResourceGroupReady => "resource-group-ready",
            Self::ImagePublished => "image-published",
            Self::InstanceCreated => "instance-created",
            Self::ReadinessChecked => "readiness-checked",
            Self::Done => "done",
            Self::Failed => "failed",
        };
        write!(f, "{}", name)
    }
}
