//! Configuration section definitions.

mod markup;
mod scripts;
mod serve;
mod site;
mod styles;

pub use markup::MarkupConfig;
pub use scripts::ScriptsConfig;
pub use serve::ServeConfig;
pub use site::SiteConfig;
pub use styles::StylesConfig;
