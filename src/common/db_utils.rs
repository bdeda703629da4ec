use crate::common::error::AppError;

// ---
// Helper: reclassificação de erros do banco
// ---
/// Converte um erro do sqlx em `ReferenceViolation` quando se trata de uma
/// violação de chave estrangeira; qualquer outro erro segue o caminho
/// normal (`AppError::Database`). A detecção acontece aqui, uma única vez,
/// pelo código do erro — nunca por substring de mensagem rio acima.
pub(crate) fn map_fk_violation(e: sqlx::Error, message: impl Into<String>) -> AppError {
    if let sqlx::Error::Database(db_err) = &e {
        if db_err.is_foreign_key_violation() {
            return AppError::ReferenceViolation(message.into());
        }
    }
    e.into()
}
