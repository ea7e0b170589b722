pub mod crypto;
pub mod deadline;
pub mod eligibility;
pub mod forms;
