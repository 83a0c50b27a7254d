pub mod athlete;
pub mod auth;
pub mod common;
pub mod content;
pub mod national_team;
pub mod news;
pub mod protocol;
pub mod ranking;
pub mod region;
pub mod registration;
pub mod result;
pub mod tournament;
