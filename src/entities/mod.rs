pub mod prelude;

pub mod animes;
pub mod users;
