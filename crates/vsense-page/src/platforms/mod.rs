//! Built-in platform adapters

pub mod instagram;
pub mod linkedin;
pub mod youtube;

pub use instagram::InstagramAdapter;
pub use linkedin::LinkedinAdapter;
pub use youtube::YoutubeAdapter;
