//! Configuration module

mod site;

pub use site::AssistantConfig;
pub use site::RemoteConfig;
pub use site::ServerConfig;
pub use site::SiteConfig;
pub use site::CONFIG_FILE;
