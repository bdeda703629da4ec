// src/common/timeout.rs

use std::future::Future;
use std::time::Duration;

use crate::common::error::AppError;

/// Prazo para uma única ida e volta ao banco de dados.
pub const DB_DEADLINE_MS: u64 = 8_000;

/// Prazo para uma operação composta no nível do handler (uma ou mais idas
/// ao banco mais processamento local).
pub const HANDLER_DEADLINE_MS: u64 = 20_000;

/// Executa uma operação já construída contra o prazo informado.
///
/// A operação é lançada como task própria e corremos contra o relógio:
/// quem terminar primeiro vence. Se o prazo vencer, devolvemos
/// `AppError::Timeout` e ABANDONAMOS a task — ela não é abortada, então o
/// banco pode completar o trabalho depois que o cliente já recebeu 504.
/// Essa conclusão tardia é ignorada por quem chamou; uma escrita que
/// "dá certo depois" do timeout é uma inconsistência conhecida e aceita.
pub async fn run_with_deadline<F, T>(deadline_ms: u64, operation: F) -> Result<T, AppError>
where
    F: Future<Output = Result<T, AppError>> + Send + 'static,
    T: Send + 'static,
{
    let handle = tokio::spawn(operation);

    match tokio::time::timeout(Duration::from_millis(deadline_ms), handle).await {
        Ok(joined) => joined.map_err(|e| anyhow::anyhow!("Falha na task da operação: {}", e))?,
        Err(_elapsed) => {
            tracing::warn!("Operação excedeu o prazo de {}ms; task abandonada", deadline_ms);
            Err(AppError::Timeout)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Arc;

    #[tokio::test]
    async fn operacao_rapida_passa_direto() {
        let result = run_with_deadline(1_000, async { Ok::<_, AppError>(42) }).await;
        assert_eq!(result.unwrap(), 42);
    }

    #[tokio::test]
    async fn erro_da_operacao_e_propagado() {
        let result =
            run_with_deadline(1_000, async { Err::<(), _>(AppError::NotFound("Restaurante")) })
                .await;
        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[tokio::test(start_paused = true)]
    async fn prazo_vencido_vira_timeout() {
        let result = run_with_deadline(10, async {
            tokio::time::sleep(Duration::from_millis(50)).await;
            Ok::<_, AppError>(())
        })
        .await;
        assert!(matches!(result, Err(AppError::Timeout)));
    }

    #[tokio::test(start_paused = true)]
    async fn conclusao_tardia_e_ignorada_mas_acontece() {
        let completed = Arc::new(AtomicBool::new(false));
        let flag = completed.clone();

        let result = run_with_deadline(10, async move {
            tokio::time::sleep(Duration::from_millis(50)).await;
            flag.store(true, Ordering::SeqCst);
            Ok::<_, AppError>("tarde demais")
        })
        .await;

        // Quem chamou já recebeu Timeout...
        assert!(matches!(result, Err(AppError::Timeout)));
        assert!(!completed.load(Ordering::SeqCst));

        // ...mas a task abandonada ainda completa em segundo plano.
        tokio::time::sleep(Duration::from_millis(100)).await;
        assert!(completed.load(Ordering::SeqCst));
    }
}
