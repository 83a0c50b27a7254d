pub mod athletes;
pub mod auth;
pub mod coaches;
pub mod documents;
pub mod gallery;
pub mod judges;
pub mod national_team;
pub mod news;
pub mod partners;
pub mod protocols;
pub mod ranking;
pub mod regions;
pub mod registrations;
pub mod slides;
pub mod staff;
pub mod tournaments;
