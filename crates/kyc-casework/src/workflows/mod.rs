pub mod checklist;
pub mod stage;
