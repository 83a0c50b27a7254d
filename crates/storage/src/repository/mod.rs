pub mod athlete;
pub mod coach;
pub mod document;
pub mod gallery;
pub mod judge;
pub mod national_team;
pub mod news;
pub mod partner;
pub mod protocol;
pub mod ranking;
pub mod region;
pub mod registration;
pub mod result;
pub mod slide;
pub mod staff;
pub mod tournament;
