use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

// Nosso tipo de erro, com `thiserror` para melhor ergonomia.
// Cada condição é etiquetada na camada que a detecta — nada de inspecionar
// substrings de mensagens mais acima na pilha.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Credencial ausente ou inválida")]
    Unauthorized,

    #[error("O usuário não tem privilégios de administrador")]
    Forbidden,

    #[error("Erro de validação: {0}")]
    Validation(String),

    #[error("Erro de validação")]
    ValidationErrors(#[from] validator::ValidationErrors),

    #[error("{0} não encontrado")]
    NotFound(&'static str),

    #[error("Violação de integridade referencial: {0}")]
    ReferenceViolation(String),

    #[error("A operação excedeu o tempo limite")]
    Timeout,

    #[error("Tipo de arquivo não suportado: {0}")]
    UnsupportedMediaType(String),

    #[error("Requisição inválida: {0}")]
    BadRequest(String),

    // Erros de banco não reclassificados pelo repositório viram 500.
    #[error("Erro de banco de dados")]
    Database(#[from] sqlx::Error),

    // Variante genérica para qualquer outro erro inesperado.
    #[error("Erro interno do servidor")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    fn status(&self) -> StatusCode {
        match self {
            AppError::Unauthorized => StatusCode::UNAUTHORIZED,
            AppError::Forbidden => StatusCode::FORBIDDEN,
            AppError::Validation(_) | AppError::ValidationErrors(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::ReferenceViolation(_) => StatusCode::CONFLICT,
            // 504 e não 500: o cliente pode tentar de novo.
            AppError::Timeout => StatusCode::GATEWAY_TIMEOUT,
            AppError::UnsupportedMediaType(_) => StatusCode::UNSUPPORTED_MEDIA_TYPE,
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Database(_) | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn label(&self) -> &'static str {
        match self {
            AppError::Unauthorized => "Unauthorized",
            AppError::Forbidden => "Forbidden",
            AppError::Validation(_) | AppError::ValidationErrors(_) => "Validation",
            AppError::NotFound(_) => "Not Found",
            AppError::ReferenceViolation(_) => "Reference Violation",
            AppError::Timeout => "Gateway Timeout",
            AppError::UnsupportedMediaType(_) => "Unsupported Media Type",
            AppError::BadRequest(_) => "Bad Request",
            AppError::Database(_) | AppError::Internal(_) => "Internal Server Error",
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Detalhes de validação campo a campo, quando o `validator` os fornece.
        if let AppError::ValidationErrors(errors) = &self {
            let mut details = std::collections::HashMap::new();
            for (field, field_errors) in errors.field_errors() {
                let messages: Vec<String> = field_errors
                    .iter()
                    .filter_map(|e| e.message.as_ref().map(|m| m.to_string()))
                    .collect();
                details.insert(field.to_string(), messages);
            }
            let body = Json(json!({
                "error": "Validation",
                "message": "Um ou mais campos são inválidos.",
                "details": details,
            }));
            return (StatusCode::BAD_REQUEST, body).into_response();
        }

        let status = self.status();
        if status == StatusCode::INTERNAL_SERVER_ERROR {
            // O `tracing` registra o detalhe; o cliente recebe só o rótulo.
            tracing::error!("Erro interno do servidor: {:?}", self);
        }

        let body = Json(json!({
            "error": self.label(),
            "message": self.to_string(),
        }));
        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timeout_vira_504_e_nao_500() {
        let response = AppError::Timeout.into_response();
        assert_eq!(response.status(), StatusCode::GATEWAY_TIMEOUT);
    }

    #[test]
    fn violacao_de_referencia_vira_409() {
        let err = AppError::ReferenceViolation("restaurante 7".into());
        assert_eq!(err.status(), StatusCode::CONFLICT);
    }

    #[test]
    fn erro_de_banco_degrada_para_500() {
        let err = AppError::Database(sqlx::Error::PoolClosed);
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.label(), "Internal Server Error");
    }
}
