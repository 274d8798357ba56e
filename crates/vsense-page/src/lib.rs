//! Host page access, video detection, and field extraction per platform

pub mod document;
pub mod fixture;
pub mod locate;
pub mod platform;
pub mod platforms;
pub mod registry;
pub mod strategy;

pub use document::{Document, ElementRef, VideoProbe};
pub use fixture::{ElementFixture, FixtureError, PageFixture, StaticDocument, VideoState};
pub use locate::{Locate, PageView};
pub use platform::{PlatformAdapter, VideoContext};
pub use platforms::{InstagramAdapter, LinkedinAdapter, YoutubeAdapter};
pub use registry::PlatformRegistry;
pub use strategy::{Cascade, ExtractionStrategy, RawFields};
