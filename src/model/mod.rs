pub mod cricket_match;
pub mod player;
pub mod response;
pub mod schema;
pub mod team;
