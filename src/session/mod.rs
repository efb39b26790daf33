//! Workflow state: form, request gate, displayed report and view settings.

mod form;
mod theme;
mod view;
mod workflow;

pub use form::{ReportForm, SourceInput};
pub use theme::{Settings, ThemeStore};
pub use view::{ViewGuard, ViewState};
pub use workflow::{
    GenerationOutput, PendingRequest, RequestKind, RequestSource, Step, Workflow, LOADING_EXTRACT,
    LOADING_GENERATE, LOADING_REFINE,
};
