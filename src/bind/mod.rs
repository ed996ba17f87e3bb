//! Everything that turns stored zones into files the name server reads.
pub mod classify;
pub mod render;
pub mod serial;
pub mod writer;

/// Subdirectories of the zones root.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DirectoryKind {
    Master,
    Slave,
    Forward,
    Reverse,
}

impl DirectoryKind {
    pub const ALL: [DirectoryKind; 4] = [
        DirectoryKind::Master,
        DirectoryKind::Slave,
        DirectoryKind::Forward,
        DirectoryKind::Reverse,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            DirectoryKind::Master => "master",
            DirectoryKind::Slave => "slave",
            DirectoryKind::Forward => "forward",
            DirectoryKind::Reverse => "reverse",
        }
    }
}
