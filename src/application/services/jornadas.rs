use std::sync::Arc;

use chrono::NaiveDate;

use super::load;
use crate::domain::jornada::{build_listing, Jornada, JornadaListing, JornadaQuery};
use crate::domain::ports::{decode_all, Collection, Document, DocumentStore, OrderBy};

const CSV_HEADER: [&str; 12] = [
    "Fecha",
    "Nombre",
    "Cliente",
    "Centro de Costo",
    "Entrada",
    "Salida",
    "Horas Trabajadas",
    "Horas Diurnas",
    "Horas Nocturnas",
    "Extras Diurnas",
    "Extras Nocturnas",
    "Valor Pago",
];

pub struct JornadasService {
    documents: Arc<dyn DocumentStore>,
}

impl JornadasService {
    pub fn new(documents: Arc<dyn DocumentStore>) -> Self {
        Self { documents }
    }

    pub fn source() -> (Collection, Option<OrderBy>) {
        (Collection::RegistrosJornadas, Some(OrderBy::desc("fecha")))
    }

    pub async fn listing(&self, query: JornadaQuery, today: NaiveDate) -> JornadaListing {
        let (collection, order) = Self::source();
        let docs = load(self.documents.as_ref(), collection, order.as_ref()).await;
        project_jornadas(&docs, query, today)
    }

    /// The listing as currently filtered, as CSV
    pub async fn export_csv(&self, query: JornadaQuery, today: NaiveDate) -> String {
        jornadas_csv(&self.listing(query, today).await.records)
    }
}

pub fn project_jornadas(docs: &[Document], query: JornadaQuery, today: NaiveDate) -> JornadaListing {
    let records: Vec<Jornada> = decode_all(Collection::RegistrosJornadas, docs);
    build_listing(&records, query, today)
}

fn csv_field(value: &str) -> String {
    if value.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

/// At most two decimals, no trailing zeros
fn hours(value: f64) -> String {
    let text = format!("{:.2}", value);
    let text = text.trim_end_matches('0').trim_end_matches('.');
    if text == "-0" {
        "0".to_string()
    } else {
        text.to_string()
    }
}

pub fn jornadas_csv(records: &[Jornada]) -> String {
    let mut out = CSV_HEADER.join(",");
    out.push_str("\r\n");
    for j in records {
        let row = [
            csv_field(&j.fecha),
            csv_field(&j.nombre),
            csv_field(&j.cliente),
            csv_field(&j.centro_costo_nombre),
            csv_field(&j.hora_inicio),
            csv_field(&j.hora_fin),
            hours(j.horas_trabajadas),
            hours(j.horas_diurnas),
            hours(j.horas_nocturnas),
            hours(j.horas_extras_diurnas),
            hours(j.horas_extras_nocturnas),
            ((j.valor_pago + 0.5).floor() as i64).to_string(),
        ];
        out.push_str(&row.join(","));
        out.push_str("\r\n");
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::services::fixtures::seed;
    use crate::infrastructure::MemoryBackend;
    use serde_json::json;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 10).unwrap()
    }

    #[tokio::test]
    async fn default_listing_is_current_quincena_sorted() {
        let backend = MemoryBackend::new("test");
        seed(
            &backend,
            Collection::RegistrosJornadas,
            &[
                ("j1", json!({"fecha": "2024-06-03", "cliente": "Zeta", "nombre": "Luis", "valorPago": 10.4})),
                ("j2", json!({"fecha": "2024-06-05", "cliente": "Alfa", "nombre": "Ana", "valorPago": 20})),
                ("j3", json!({"fecha": "2024-05-20", "cliente": "Alfa", "nombre": "Eva", "valorPago": 99})),
            ],
        );

        let listing = JornadasService::new(backend.backend().documents)
            .listing(JornadaQuery::default(), today())
            .await;

        assert!(!listing.manual_filter);
        let ids: Vec<&str> = listing.records.iter().map(|j| j.id.as_str()).collect();
        assert_eq!(ids, ["j2", "j1"]);
        assert_eq!(listing.stats.nomina, 30);
        assert_eq!(listing.options.clientes, ["Alfa", "Zeta"]);
    }

    #[tokio::test]
    async fn export_uses_active_filters() {
        let backend = MemoryBackend::new("test");
        seed(
            &backend,
            Collection::RegistrosJornadas,
            &[
                ("j1", json!({"fecha": "2024-05-03", "cliente": "Alfa, S.A.", "nombre": "Ana", "horasTrabajadas": 7.5, "valorPago": 1200.5})),
                ("j2", json!({"fecha": "2024-05-04", "cliente": "Beta", "nombre": "Luis"})),
            ],
        );

        let csv = JornadasService::new(backend.backend().documents)
            .export_csv(
                JornadaQuery {
                    client: Some("Alfa, S.A.".into()),
                    ..JornadaQuery::default()
                },
                today(),
            )
            .await;

        let lines: Vec<&str> = csv.split("\r\n").collect();
        assert_eq!(lines[0].split(',').count(), CSV_HEADER.len());
        assert_eq!(lines[1], "2024-05-03,Ana,\"Alfa, S.A.\",,,,7.5,0,0,0,0,1201");
        assert_eq!(lines[2], "");
    }

    #[test]
    fn hours_keep_two_decimals_at_most() {
        assert_eq!(hours(8.0), "8");
        assert_eq!(hours(7.333), "7.33");
        assert_eq!(hours(0.5), "0.5");
    }
}
