//! Admin data export.
//!
//! Streams a snapshot of customers or products as a JSON or CSV download.
//! CSV output quotes any field containing a comma, quote, or newline and
//! doubles embedded quotes, per RFC 4180.

use axum::{
    extract::{Path, Query, State},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::db::{CustomerRepository, ProductRepository};
use crate::error::AppError;
use crate::middleware::RequireAdmin;
use crate::state::AppState;

#[derive(Debug, Clone, Copy, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    #[default]
    Json,
    Csv,
}

#[derive(Debug, Default, Deserialize)]
pub struct ExportQuery {
    #[serde(default)]
    pub format: ExportFormat,
}

/// One exported customer. Orders and credentials are deliberately absent.
#[derive(Debug, Serialize)]
struct CustomerExport {
    username: String,
    email: String,
    phone: String,
}

/// One exported product.
#[derive(Debug, Serialize)]
struct ProductExport {
    name: String,
    description: String,
    price: String,
    quantity: i32,
    category: String,
}

/// `GET /api/admin/export/{data_type}?format=json|csv`
#[instrument(skip(state, _admin))]
pub async fn export(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(data_type): Path<String>,
    Query(query): Query<ExportQuery>,
) -> Result<Response, AppError> {
    let (json, csv) = match data_type.as_str() {
        "customers" => {
            let rows = CustomerRepository::new(state.pool()).all().await?;
            let records: Vec<CustomerExport> = rows
                .into_iter()
                .map(|row| CustomerExport {
                    username: row.username,
                    email: row.email,
                    phone: row.phone,
                })
                .collect();
            (
                to_json(&records)?,
                to_csv(
                    &["username", "email", "phone"],
                    records.iter().map(|r| {
                        vec![r.username.clone(), r.email.clone(), r.phone.clone()]
                    }),
                ),
            )
        }
        "products" => {
            let rows = ProductRepository::new(state.pool()).list(None).await?;
            let records: Vec<ProductExport> = rows
                .into_iter()
                .map(|row| ProductExport {
                    name: row.name,
                    description: row.description,
                    price: row.price.to_string(),
                    quantity: row.quantity,
                    category: row.category,
                })
                .collect();
            (
                to_json(&records)?,
                to_csv(
                    &["name", "description", "price", "quantity", "category"],
                    records.iter().map(|r| {
                        vec![
                            r.name.clone(),
                            r.description.clone(),
                            r.price.clone(),
                            r.quantity.to_string(),
                            r.category.clone(),
                        ]
                    }),
                ),
            )
        }
        other => {
            return Err(AppError::BadRequest(format!(
                "unknown export type '{other}'; expected 'customers' or 'products'"
            )));
        }
    };

    let (body, content_type, ext) = match query.format {
        ExportFormat::Json => (json, "application/json", "json"),
        ExportFormat::Csv => (csv, "text/csv", "csv"),
    };

    Ok((
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, content_type.to_owned()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename={data_type}_export.{ext}"),
            ),
        ],
        body,
    )
        .into_response())
}

fn to_json<T: Serialize>(records: &T) -> Result<String, AppError> {
    serde_json::to_string_pretty(records)
        .map_err(|e| AppError::Internal(format!("export serialization failed: {e}")))
}

/// Render rows as CSV with a header line.
fn to_csv<I>(header: &[&str], rows: I) -> String
where
    I: Iterator<Item = Vec<String>>,
{
    let mut out = String::new();
    out.push_str(&join_record(header.iter().map(|s| (*s).to_owned())));
    out.push_str("\r\n");
    for row in rows {
        out.push_str(&join_record(row.into_iter()));
        out.push_str("\r\n");
    }
    out
}

fn join_record<I: Iterator<Item = String>>(fields: I) -> String {
    fields
        .map(|field| csv_escape(&field))
        .collect::<Vec<_>>()
        .join(",")
}

fn csv_escape(field: &str) -> String {
    if field.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_owned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_field_untouched() {
        assert_eq!(csv_escape("Apples"), "Apples");
    }

    #[test]
    fn test_comma_field_quoted() {
        assert_eq!(csv_escape("fresh, crisp"), "\"fresh, crisp\"");
    }

    #[test]
    fn test_embedded_quotes_doubled() {
        assert_eq!(csv_escape("the \"best\""), "\"the \"\"best\"\"\"");
    }

    #[test]
    fn test_newline_field_quoted() {
        assert_eq!(csv_escape("line1\nline2"), "\"line1\nline2\"");
    }

    #[test]
    fn test_csv_has_header_and_rows() {
        let csv = to_csv(
            &["name", "price"],
            vec![vec!["Apples".to_owned(), "45000".to_owned()]].into_iter(),
        );
        assert_eq!(csv, "name,price\r\nApples,45000\r\n");
    }
}
