use thiserror::Error;

/// User-facing messages. The mobile UI shows them verbatim.
pub mod messages {
    pub const INVALID_CREDENTIALS: &str = "Credenciales inválidas. Por favor intenta de nuevo.";
    pub const NOT_AUTHORIZED: &str = "Usuario no autorizado en la base de datos.";
    pub const SAVE_FAILED: &str = "Error al guardar";
    pub const LOAD_FAILED: &str = "Error al cargar los datos";
    pub const PROFILE_FAILED: &str = "Error al actualizar el perfil";
    pub const UPLOAD_FAILED: &str = "Error al subir imagen";
    pub const PASSWORD_MISMATCH: &str = "Las contraseñas no coinciden";
    pub const PASSWORD_TOO_SHORT: &str = "Debe tener al menos 6 caracteres";
    pub const STALE_SESSION: &str = "Error. Por seguridad, re-inicia sesión e intenta de nuevo.";
    pub const NO_ACCESS: &str = "No tienes acceso a este módulo";
    pub const SESSION_REQUIRED: &str = "Sesión no válida o expirada";
}

#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Not found: {entity} with {field}={value}")]
    NotFound {
        entity: &'static str,
        field: &'static str,
        value: String,
    },

    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    Unauthorized(String),

    #[error("{0}")]
    Forbidden(String),

    /// The provider refuses a sensitive operation until the user signs in again
    #[error("{}", messages::STALE_SESSION)]
    StaleSession,

    /// A create/update call failed; carries the localized message for the screen
    #[error("{0}")]
    WriteFailed(&'static str),

    #[error("{}", messages::UPLOAD_FAILED)]
    UploadFailed,

    /// A single-document read failed at the backend, as opposed to a missing document
    #[error("{}", messages::LOAD_FAILED)]
    Unavailable,
}

impl DomainError {
    pub fn not_found(entity: &'static str, value: impl Into<String>) -> Self {
        DomainError::NotFound {
            entity,
            field: "id",
            value: value.into(),
        }
    }
}

#[derive(Debug, Error)]
pub enum InfraError {
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Recent sign-in required")]
    RecentLoginRequired,

    #[error("Backend error: {0}")]
    Backend(String),

    #[error("Upload error: {0}")]
    Upload(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error(transparent)]
    Infra(#[from] InfraError),
}

pub type DomainResult<T> = Result<T, DomainError>;
pub type InfraResult<T> = Result<T, InfraError>;
pub type AppResult<T> = Result<T, AppError>;
