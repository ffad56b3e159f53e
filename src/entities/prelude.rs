pub use super::animes::Entity as Animes;
pub use super::users::Entity as Users;
