use thiserror::Error;

/// CLI-level error categories mapped to exit codes.
#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Validation(#[from] cotacoes_core::ValidationError),

    #[error("{}: {}", .0, .0.cause())]
    Load(#[from] cotacoes_core::LoadError),

    #[error("{surface} request was superseded before it completed")]
    Superseded { surface: cotacoes_core::SurfaceKind },

    #[error(transparent)]
    Serialization(#[from] serde_json::Error),

    #[error(transparent)]
    Client(#[from] cotacoes_core::HttpError),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl CliError {
    pub const fn exit_code(&self) -> u8 {
        match self {
            Self::Validation(_) => 2,
            Self::Load(_) => 3,
            Self::Superseded { .. } => 3,
            Self::Serialization(_) => 4,
            Self::Client(_) | Self::Io(_) => 10,
        }
    }
}
