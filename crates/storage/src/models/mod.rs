mod actor;
mod athlete;
mod coach;
mod content;
mod enums;
mod judge;
mod national_team;
mod news;
mod region;
mod registration;
mod result;
mod tournament;

pub use actor::ActorContext;
pub use athlete::{Athlete, AthleteCoach};
pub use coach::Coach;
pub use content::{
    Document, DocumentSection, GalleryItem, MediaType, Partner, Protocol, ProtocolEntry, Slide,
    StaffDepartment, StaffMember,
};
pub use enums::{AgeCategory, AuditAction, BowType, Gender, RegistrationStatus, Role};
pub use judge::Judge;
pub use national_team::NationalTeamMembership;
pub use news::News;
pub use region::{Region, RegionCounts, User};
pub use registration::{
    AthleteRegistration, Registration, RegistrationAuditLog, RegistrationDocument,
    RegistrationJudge,
};
pub use result::{RankingEntry, TournamentResult};
pub use tournament::{Tournament, TournamentCategory, TournamentStatus};
