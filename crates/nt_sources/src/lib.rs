pub mod sources;

pub use sources::guardian::{GuardianConfig, GuardianSource};
pub use sources::newsapi::{NewsApiConfig, NewsApiSource};

pub mod prelude {
    pub use super::sources::{GuardianSource, NewsApiSource};
    pub use nt_core::{Article, NewsQuery, NewsSource, Result, Error};
}
