use anyhow::{Context, Result};
use calamine::{open_workbook_auto, Data, Reader};

use crate::models::RawRecord;

/// Load the first sheet of a spreadsheet into raw records.
///
/// The header row is matched case/whitespace-insensitively and drives an
/// explicit column-to-field mapping; columns missing from the file leave the
/// corresponding fields absent. Fully empty rows are skipped.
pub fn load_records(path: &str) -> Result<Vec<RawRecord>> {
    let mut workbook =
        open_workbook_auto(path).with_context(|| format!("Failed to open spreadsheet: {}", path))?;

    let sheet_name = workbook
        .sheet_names()
        .first()
        .context("Spreadsheet has no sheets")?
        .clone();

    let range = workbook
        .worksheet_range(&sheet_name)
        .with_context(|| format!("Failed to read sheet: {}", sheet_name))?;

    let mut rows = range.rows().enumerate();
    let headers: Vec<String> = match rows.next() {
        Some((_, header)) => header
            .iter()
            .map(|c| cell_to_string(c).trim().to_lowercase())
            .collect(),
        None => return Ok(Vec::new()),
    };

    let mut records = Vec::new();
    for (row_idx, row) in rows {
        if row.iter().all(|c| cell_to_string(c).trim().is_empty()) {
            continue;
        }

        // Header occupies spreadsheet row 1, so data rows are offset by one
        let mut record = RawRecord {
            row: row_idx + 1,
            ..RawRecord::default()
        };

        for (col, header) in headers.iter().enumerate() {
            let value = row.get(col).map(cell_to_string).unwrap_or_default();
            let value = value.trim();
            if value.is_empty() {
                continue;
            }
            let field = match header.as_str() {
                "cpf/cnpj" => &mut record.tax_id,
                "nome/razão social" | "nome razão social" => &mut record.legal_name,
                "nome fantasia" => &mut record.trade_name,
                "data nasc." => &mut record.birth_date,
                "data cadastro" => &mut record.registration_date,
                "plano" => &mut record.plan_name,
                "plano valor" => &mut record.plan_value,
                "vencimento" => &mut record.due_day,
                "isento" => &mut record.exempt,
                "endereço" => &mut record.street,
                "número" => &mut record.number,
                "complemento" => &mut record.complement,
                "bairro" => &mut record.neighborhood,
                "cep" => &mut record.postal_code,
                "cidade" => &mut record.city,
                "uf" => &mut record.state,
                "status" => &mut record.status,
                "celulares" => &mut record.mobiles,
                "telefones" => &mut record.phones,
                "emails" => &mut record.emails,
                _ => continue,
            };
            *field = Some(value.to_string());
        }

        records.push(record);
    }

    tracing::info!("Loaded {} rows from {}", records.len(), path);
    Ok(records)
}

fn cell_to_string(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(s) => s.clone(),
        Data::Int(n) => n.to_string(),
        Data::Float(f) => {
            // Excel stores ids and whole numbers as floats; keep them integral
            if f.fract() == 0.0 {
                (*f as i64).to_string()
            } else {
                f.to_string()
            }
        }
        Data::Bool(b) => b.to_string(),
        Data::DateTime(dt) => dt
            .as_datetime()
            .map(|d| d.format("%Y-%m-%d %H:%M:%S").to_string())
            .unwrap_or_default(),
        Data::DateTimeIso(s) => s.clone(),
        Data::DurationIso(s) => s.clone(),
        Data::Error(_) => String::new(),
    }
}
