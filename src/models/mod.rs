pub mod anime;

pub use anime::{AnimePatch, AnimeRecord, NewAnime, ValidationErrors};
