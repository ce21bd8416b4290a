//! SpeedPlan Agent - the Plan Requester
//!
//! Turns a [`PlanRequest`](speedplan_core::PlanRequest) into a single call to a
//! generative-language service and maps the structured answer into a
//! [`SpeedAuditPlan`](speedplan_core::SpeedAuditPlan).
//!
//! The request has two halves:
//!
//! 1. **Prompt** (`prompt::build_prompt`): WordPress + Elementor performance
//!    brief with the site URL, hosting and notes substituted in
//! 2. **Response schema** (`prompt::response_schema`): constrains the answer to
//!    `estimatedCurrentScore`, `summary` and `tasks`, with every task field
//!    required and the closed sets spelled out as enums
//!
//! Decoding is low temperature and the answer must be JSON. Nothing is
//! retried; any failure is reported once to the caller.

pub mod prompt;
pub mod providers;

pub use providers::gemini::GeminiPlanSource;
