// ============================================================================
// ERRORS - Tipos de fallo compartidos por servicios, stores y view models
// ============================================================================

/// Error del núcleo de descubrimiento
#[derive(Debug, Clone, PartialEq)]
pub enum AppError {
    /// La petición nunca obtuvo respuesta (offline, CORS, DNS...)
    Network(String),
    /// La respuesta llegó con un status de error
    Http { status: u16, message: String },
    /// No se pudo decodificar el cuerpo de la respuesta
    Parse(String),
    /// Falta la URL del backend o credenciales; la función queda desactivada
    Config(String),
    /// Rechazado antes de cualquier llamada de red
    Validation(String),
}

impl AppError {
    /// Mensaje para los paneles de error en línea
    pub fn user_message(&self) -> String {
        match self {
            AppError::Network(_) => "Unable to reach the server. Check your connection and try again.".to_string(),
            AppError::Http { status, .. } if *status == 401 || *status == 403 => {
                "Your session has expired. Please sign in again.".to_string()
            }
            AppError::Http { .. } => "The server returned an error. Please try again.".to_string(),
            AppError::Parse(_) => "Received an unexpected response from the server.".to_string(),
            AppError::Config(msg) => msg.clone(),
            AppError::Validation(msg) => msg.clone(),
        }
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AppError::Network(msg) => write!(f, "Network error: {}", msg),
            AppError::Http { status, message } => write!(f, "HTTP {}: {}", status, message),
            AppError::Parse(msg) => write!(f, "Parse error: {}", msg),
            AppError::Config(msg) => write!(f, "Configuration error: {}", msg),
            AppError::Validation(msg) => write!(f, "Validation error: {}", msg),
        }
    }
}

impl std::error::Error for AppError {}

impl From<serde_json::Error> for AppError {
    fn from(e: serde_json::Error) -> Self {
        AppError::Parse(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_includes_status() {
        let err = AppError::Http { status: 502, message: "Bad Gateway".to_string() };
        assert_eq!(err.to_string(), "HTTP 502: Bad Gateway");
    }

    #[test]
    fn auth_failures_ask_for_sign_in() {
        let err = AppError::Http { status: 401, message: "Unauthorized".to_string() };
        assert!(err.user_message().contains("sign in"));
    }

    #[test]
    fn json_errors_become_parse_errors() {
        let err: AppError = serde_json::from_str::<u32>("nope").unwrap_err().into();
        assert!(matches!(err, AppError::Parse(_)));
    }
}
