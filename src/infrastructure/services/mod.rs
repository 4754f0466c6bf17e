//! Infrastructure services

mod assistant_service;
mod settings_service;

pub use assistant_service::{
    AssistantService, RagAnswer, TextReport, TroubleshootReport, WorkflowRequirements,
};
pub use settings_service::{SettingsService, CACHE_KEY, SETTINGS_KEY};
