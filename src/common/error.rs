use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

// Taxonomia de erros da aplicação. Falhas de repositório sobem direto para quem chamou;
// não existe retry em lugar nenhum.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Erro de validação")]
    ValidationError(#[from] validator::ValidationErrors),

    #[error("Perfil não encontrado")]
    ProfileNotFound,

    // Não é uma falha para o cliente: o usuário ainda precisa criar ou entrar em um mess.
    #[error("Perfil sem mess associado")]
    MessNotAssigned,

    #[error("Recurso não encontrado: {0}")]
    NotFound(&'static str),

    #[error("Violação de restrição: {0}")]
    ConstraintViolation(String),

    #[error("Permissão negada: {0}")]
    PermissionDenied(String),

    #[error("Falha de comunicação com o banco: {0}")]
    NetworkFailure(String),

    #[error("Token inválido")]
    InvalidToken,

    #[error("Erro de banco de dados: {0}")]
    DatabaseError(sqlx::Error),

    #[error("Erro interno do servidor")]
    InternalServerError(#[from] anyhow::Error),
}

impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        match &err {
            sqlx::Error::RowNotFound => return AppError::NotFound("registro"),
            sqlx::Error::PoolTimedOut
            | sqlx::Error::PoolClosed
            | sqlx::Error::Io(_)
            | sqlx::Error::Tls(_) => return AppError::NetworkFailure(err.to_string()),
            // SQLSTATE classe 23: violação de integridade (check, unique, fk, not null)
            sqlx::Error::Database(db_err) if db_err.code().is_some_and(|c| c.starts_with("23")) => {
                return AppError::ConstraintViolation(db_err.message().to_string());
            }
            _ => {}
        }
        AppError::DatabaseError(err)
    }
}

// Resposta de erro da API: status + código estável + mensagem legível.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub code: &'static str,
    pub error: String,
    pub details: Option<serde_json::Value>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = match self.details {
            Some(details) => json!({ "code": self.code, "error": self.error, "details": details }),
            None => json!({ "code": self.code, "error": self.error }),
        };
        (self.status, Json(body)).into_response()
    }
}

impl AppError {
    pub fn to_api_error(&self) -> ApiError {
        let simple = |status: StatusCode, code: &'static str, error: String| ApiError {
            status,
            code,
            error,
            details: None,
        };

        match self {
            AppError::ValidationError(errors) => {
                let mut details = serde_json::Map::new();
                for (field, field_errors) in errors.field_errors() {
                    let messages: Vec<String> = field_errors
                        .iter()
                        .map(|e| {
                            e.message
                                .as_ref()
                                .map(|m| m.to_string())
                                .unwrap_or_else(|| e.code.to_string())
                        })
                        .collect();
                    details.insert(field.to_string(), json!(messages));
                }
                ApiError {
                    status: StatusCode::UNPROCESSABLE_ENTITY,
                    code: "validation_failed",
                    error: "Um ou mais campos são inválidos.".into(),
                    details: Some(serde_json::Value::Object(details)),
                }
            }
            AppError::ProfileNotFound => simple(
                StatusCode::NOT_FOUND,
                "profile_not_found",
                "Perfil não encontrado.".into(),
            ),
            AppError::MessNotAssigned => simple(
                StatusCode::NOT_FOUND,
                "mess_not_assigned",
                "Crie ou entre em um mess para continuar.".into(),
            ),
            AppError::NotFound(entity) => simple(
                StatusCode::NOT_FOUND,
                "not_found",
                format!("Recurso não encontrado: {}.", entity),
            ),
            AppError::ConstraintViolation(msg) => {
                simple(StatusCode::BAD_REQUEST, "constraint_violation", msg.clone())
            }
            AppError::PermissionDenied(msg) => {
                simple(StatusCode::FORBIDDEN, "permission_denied", msg.clone())
            }
            AppError::InvalidToken => simple(
                StatusCode::UNAUTHORIZED,
                "invalid_token",
                "Token de autenticação inválido ou ausente.".into(),
            ),
            AppError::NetworkFailure(msg) => {
                tracing::warn!("Backend indisponível: {}", msg);
                simple(
                    StatusCode::SERVICE_UNAVAILABLE,
                    "backend_unavailable",
                    "Serviço temporariamente indisponível. Tente novamente.".into(),
                )
            }
            // DatabaseError e InternalServerError viram 500; o detalhe fica só no log.
            e => {
                tracing::error!("Erro Interno do Servidor: {}", e);
                simple(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal_error",
                    "Ocorreu um erro inesperado.".into(),
                )
            }
        }
    }
}

impl From<AppError> for ApiError {
    fn from(err: AppError) -> Self {
        err.to_api_error()
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        self.to_api_error().into_response()
    }
}
