// Build identity reported by GET /version

use serde::Serialize;

pub const PKG_NAME: &str = env!("CARGO_PKG_NAME");
pub const PKG_VERSION: &str = env!("CARGO_PKG_VERSION");

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BuildInfo {
    pub name: &'static str,
    pub version: &'static str,
}

pub const BUILD_INFO: BuildInfo = BuildInfo {
    name: PKG_NAME,
    version: PKG_VERSION,
};
