pub mod invite;
pub mod link;
pub mod token;

pub use invite::Entity as InviteEntity;
pub use link::Entity as LinkEntity;
pub use token::Entity as TokenEntity;
