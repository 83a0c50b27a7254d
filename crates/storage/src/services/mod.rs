pub mod points;
pub mod ranking_computation;
pub mod registration_rules;
pub mod results;
pub mod slug;
