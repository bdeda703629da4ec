// src/services/ingest.rs

use serde_json::{Map, Value};

use crate::{
    common::error::AppError,
    models::restaurant::{NewRestaurant, RestaurantPayload},
    services::restaurant_service::RestaurantService,
};

pub const MEDIA_CSV: &str = "text/csv";
pub const MEDIA_JSON: &str = "application/json";

/// Erro associado a uma linha do arquivo. `row` é 1-based; `None` indica o
/// erro sintético do insert em lote (não pertence a nenhuma linha).
#[derive(Debug, serde::Serialize)]
pub struct RowError {
    pub row: Option<usize>,
    pub message: String,
    pub data: Option<Value>,
}

/// Relatório terminal do upload, no formato
/// `{ message, successCount, errorCount, errors }`.
#[derive(Debug, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadReport {
    pub message: String,
    pub success_count: u64,
    pub error_count: usize,
    pub errors: Vec<RowError>,
}

pub struct UploadOutcome {
    /// `false` quando nenhuma linha válida sobrou para inserir — o handler
    /// responde como erro do cliente, com o mesmo corpo de relatório.
    pub had_valid_rows: bool,
    pub report: UploadReport,
}

/// Resultado do parse, antes do insert.
struct ParsedBatch {
    rows_read: usize,
    batch: Vec<NewRestaurant>,
    errors: Vec<RowError>,
}

#[derive(Clone)]
pub struct IngestService {
    restaurants: RestaurantService,
}

impl IngestService {
    pub fn new(restaurants: RestaurantService) -> Self {
        Self { restaurants }
    }

    /// Pipeline completo: parse do arquivo, validação linha a linha e um
    /// único insert em lote. Erros de linha e falha do insert não são
    /// mutuamente exclusivos — ambos podem aparecer no mesmo relatório.
    pub async fn run(&self, media_type: &str, bytes: &[u8]) -> Result<UploadOutcome, AppError> {
        let parsed = parse_batch(media_type, bytes)?;
        let had_valid_rows = !parsed.batch.is_empty();

        let mut errors = parsed.errors;
        let mut inserted = 0u64;

        if had_valid_rows {
            match self.restaurants.bulk_insert(parsed.batch).await {
                Ok(count) => inserted = count,
                Err(e) => errors.push(RowError {
                    row: None,
                    message: format!("Falha no insert em lote: {}", e),
                    data: None,
                }),
            }
        }

        tracing::info!(
            rows = parsed.rows_read,
            inserted,
            errors = errors.len(),
            "Upload em massa processado"
        );

        let report = UploadReport {
            message: format!(
                "Processadas {} linhas. Inseridas com sucesso: {}. Erros: {}.",
                parsed.rows_read,
                inserted,
                errors.len()
            ),
            success_count: inserted,
            error_count: errors.len(),
            errors,
        };

        Ok(UploadOutcome { had_valid_rows, report })
    }
}

/// Faz o parse do arquivo no formato declarado. Qualquer outro tipo é
/// recusado antes de qualquer processamento de linha.
fn parse_batch(media_type: &str, bytes: &[u8]) -> Result<ParsedBatch, AppError> {
    match media_type {
        MEDIA_CSV => parse_csv(bytes),
        MEDIA_JSON => parse_json(bytes),
        other => Err(AppError::UnsupportedMediaType(format!(
            "'{}'. Apenas CSV ou JSON são aceitos.",
            other
        ))),
    }
}

/// Caminho CSV: cabeçalho define as chaves (aparadas, sensíveis a
/// maiúsculas), linhas em branco são puladas, cada linha é processada
/// de forma independente e na ordem do arquivo.
fn parse_csv(bytes: &[u8]) -> Result<ParsedBatch, AppError> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::Headers)
        .flexible(true)
        .from_reader(bytes);

    let headers = reader
        .headers()
        .map_err(|e| AppError::BadRequest(format!("Falha ao ler o cabeçalho do CSV: {}", e)))?
        .clone();

    let mut batch = Vec::new();
    let mut errors = Vec::new();
    let mut rows_read = 0usize;

    for (index, record) in reader.records().enumerate() {
        let row = index + 1;
        rows_read += 1;

        let record = match record {
            Ok(record) => record,
            // Arquivo truncado ou linha malformada: erro da linha, nunca pânico.
            Err(e) => {
                errors.push(RowError {
                    row: Some(row),
                    message: format!("Linha malformada: {}", e),
                    data: None,
                });
                continue;
            }
        };

        let mut object = Map::new();
        for (key, value) in headers.iter().zip(record.iter()) {
            object.insert(key.to_string(), Value::String(value.to_string()));
        }
        let value = Value::Object(object);

        match clean_row(row, &value) {
            Ok(new) => batch.push(new),
            Err(error) => errors.push(error),
        }
    }

    Ok(ParsedBatch { rows_read, batch, errors })
}

/// Caminho JSON: o topo precisa ser um array de objetos; cada elemento
/// passa pela MESMA função de limpeza do caminho CSV (paridade de
/// validação).
fn parse_json(bytes: &[u8]) -> Result<ParsedBatch, AppError> {
    let value: Value = serde_json::from_slice(bytes)
        .map_err(|e| AppError::BadRequest(format!("JSON inválido: {}", e)))?;

    let Value::Array(items) = value else {
        return Err(AppError::BadRequest(
            "O arquivo JSON deve conter um array de objetos de restaurante.".into(),
        ));
    };

    let mut batch = Vec::new();
    let mut errors = Vec::new();

    for (index, item) in items.iter().enumerate() {
        let row = index + 1;
        match clean_row(row, item) {
            Ok(new) => batch.push(new),
            Err(error) => errors.push(error),
        }
    }

    Ok(ParsedBatch { rows_read: items.len(), batch, errors })
}

/// Limpeza e validação de uma linha, compartilhada pelos dois formatos:
/// name/address obrigatórios; nota e contagem de avaliações com padrão 0;
/// latitude/longitude com padrão nulo (coordenada ruim nunca derruba a
/// linha); strings vazias viram nulo.
fn clean_row(row: usize, value: &Value) -> Result<NewRestaurant, RowError> {
    let payload = RestaurantPayload {
        name: field_str(value, "name").unwrap_or_default(),
        logo_url: field_str(value, "logo_url"),
        website_url: field_str(value, "website_url"),
        reviews_count: field_i32(value, "reviews_count"),
        average_rating: field_f64(value, "average_rating"),
        address: field_str(value, "address").unwrap_or_default(),
        maps_url: field_str(value, "maps_url"),
        latitude: field_f64(value, "latitude"),
        longitude: field_f64(value, "longitude"),
    };

    NewRestaurant::from_payload(payload).map_err(|_| RowError {
        row: Some(row),
        message: "Campo obrigatório ausente ou vazio (name ou address)".into(),
        data: Some(value.clone()),
    })
}

// Campo textual: aparado; vazio ou ausente vira None.
fn field_str(value: &Value, key: &str) -> Option<String> {
    let text = value.get(key)?.as_str()?.trim();
    if text.is_empty() {
        None
    } else {
        Some(text.to_string())
    }
}

// Campo numérico: aceita número JSON ou string numérica (CSV).
fn field_f64(value: &Value, key: &str) -> Option<f64> {
    let field = value.get(key)?;
    field
        .as_f64()
        .or_else(|| field.as_str().and_then(|s| s.trim().parse().ok()))
}

fn field_i32(value: &Value, key: &str) -> Option<i32> {
    let field = value.get(key)?;
    field
        .as_i64()
        // Fora da faixa de i32 não é uma contagem plausível; cai no padrão.
        .and_then(|n| i32::try_from(n).ok())
        .or_else(|| field.as_str().and_then(|s| s.trim().parse().ok()))
}

#[cfg(test)]
mod tests {
    use super::*;

    const CSV: &str = "\
name , address,average_rating,reviews_count,latitude,longitude,logo_url
Cantina da Nona,Rua A 1,9.0,12,-23.55,-46.63,
,Rua B 2,8.0,5,,,
Bar do Zé,,x,y,abc,,
Pizzaria Bella,Rua C 3,,,,,
";

    #[test]
    fn csv_valida_linha_a_linha_com_indice_1_based() {
        let parsed = parse_csv(CSV.as_bytes()).unwrap();

        // 4 linhas lidas, 2 válidas (1 e 4), 2 rejeitadas (2 sem name,
        // 3 sem address).
        assert_eq!(parsed.rows_read, 4);
        assert_eq!(parsed.batch.len(), 2);
        assert_eq!(parsed.errors.len(), 2);
        assert_eq!(parsed.errors[0].row, Some(2));
        assert_eq!(parsed.errors[1].row, Some(3));
    }

    #[test]
    fn csv_coage_numericos_e_normaliza_vazios() {
        let parsed = parse_csv(CSV.as_bytes()).unwrap();

        let primeira = &parsed.batch[0];
        assert_eq!(primeira.name, "Cantina da Nona");
        assert_eq!(primeira.average_rating, 9.0); // crua; a escala é da leitura
        assert_eq!(primeira.reviews_count, 12);
        assert_eq!(primeira.latitude, Some(-23.55));
        assert_eq!(primeira.logo_url, None); // string vazia vira nulo

        // Numéricos ilegíveis caem nos padrões: 0 para nota/contagem,
        // nulo para coordenadas.
        let ultima = &parsed.batch[1];
        assert_eq!(ultima.average_rating, 0.0);
        assert_eq!(ultima.reviews_count, 0);
        assert_eq!(ultima.latitude, None);
        assert_eq!(ultima.longitude, None);
    }

    #[test]
    fn json_exige_array_no_topo() {
        let result = parse_batch(MEDIA_JSON, br#"{"name":"Bar"}"#);
        assert!(matches!(result, Err(AppError::BadRequest(_))));
    }

    #[test]
    fn json_passa_pela_mesma_validacao_de_linha() {
        let body = br#"[
            {"name": "Cantina da Nona", "address": "Rua A 1", "average_rating": 9.0},
            {"name": "", "address": "Rua B 2"},
            {"address": "Rua C 3"}
        ]"#;
        let parsed = parse_json(body).unwrap();

        assert_eq!(parsed.rows_read, 3);
        assert_eq!(parsed.batch.len(), 1);
        assert_eq!(parsed.errors.len(), 2);
        assert_eq!(parsed.errors[0].row, Some(2));
        assert_eq!(parsed.batch[0].average_rating, 9.0);
    }

    #[test]
    fn contagem_fora_da_faixa_de_i32_cai_no_padrao() {
        // 5 bilhões não cabe em i32; virar um número negativo seria pior
        // que descartar o campo.
        let body = r#"[
            {"name": "Cantina da Nona", "address": "Rua A 1", "reviews_count": 5000000000},
            {"name": "Bar do Zé", "address": "Rua B 2", "reviews_count": -3000000000}
        ]"#;
        let parsed = parse_json(body.as_bytes()).unwrap();

        assert_eq!(parsed.batch.len(), 2);
        assert_eq!(parsed.batch[0].reviews_count, 0);
        assert_eq!(parsed.batch[1].reviews_count, 0);
    }

    #[test]
    fn tipo_de_arquivo_desconhecido_e_recusado_antes_do_parse() {
        let result = parse_batch("application/pdf", b"%PDF-1.4");
        assert!(matches!(result, Err(AppError::UnsupportedMediaType(_))));
    }

    #[test]
    fn csv_truncado_gera_erro_de_linha_e_nao_panico() {
        // Aspas abertas e stream cortado no meio.
        let truncated = "name,address\n\"Cantina,Rua A 1\nBar do Zé,Rua B 2";
        let parsed = parse_csv(truncated.as_bytes()).unwrap();
        assert!(!parsed.errors.is_empty());
    }

    #[test]
    fn relatorio_serializa_em_camel_case() {
        let report = UploadReport {
            message: "ok".into(),
            success_count: 3,
            error_count: 1,
            errors: vec![RowError { row: Some(2), message: "x".into(), data: None }],
        };
        let json = serde_json::to_value(&report).unwrap();
        assert!(json.get("successCount").is_some());
        assert!(json.get("errorCount").is_some());
        assert_eq!(json["errors"][0]["row"], 2);
    }
}
