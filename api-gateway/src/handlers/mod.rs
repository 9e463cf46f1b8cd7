pub mod attachments;
pub mod courses;
pub mod groups;
pub mod health;
pub mod tickets;
pub mod users;
