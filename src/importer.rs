use sqlx::{PgPool, Postgres, Transaction};

use crate::errors::ImportError;
use crate::lookup::LookupCache;
use crate::models::{CleanRecord, ContactKind, RawRecord, RowFailure, RunReport};
use crate::normalize::normalize_record;

/// Reconciles normalized records against the destination schema.
///
/// Clients are found-or-created by CPF/CNPJ, contacts are attached
/// idempotently on the (client, type, value) triple, and contracts are
/// upserted on the (client, plan) key. All writes for one record happen in a
/// single transaction, so a failed record never leaves a half-created client
/// or contract behind.
pub struct Importer {
    pool: PgPool,
    lookups: LookupCache,
}

impl Importer {
    pub async fn new(pool: PgPool) -> Result<Self, ImportError> {
        let lookups = LookupCache::init(&pool).await?;
        Ok(Self { pool, lookups })
    }

    /// Process records in source order, accumulating the run report.
    ///
    /// Per-record errors become report failures; a connectivity error also
    /// stops the loop, since every remaining record would fail the same way.
    pub async fn run(&mut self, records: &[RawRecord]) -> RunReport {
        let mut report = RunReport::default();
        for raw in records {
            match self.import_record(raw).await {
                Ok(()) => {
                    report.imported += 1;
                    tracing::info!("Row {} imported", raw.row);
                }
                Err(e) => {
                    let fatal = e.is_fatal();
                    if fatal {
                        tracing::error!("Row {}: {} - halting run", raw.row, e);
                        report.halted = Some(e.to_string());
                    } else {
                        tracing::warn!("Row {} failed: {}", raw.row, e);
                    }
                    report.failures.push(RowFailure {
                        row: raw.row,
                        reason: e.to_string(),
                        raw: raw.clone(),
                    });
                    if fatal {
                        break;
                    }
                }
            }
        }
        report
    }

    /// Import one record end to end.
    ///
    /// Lookup-table entries (plans, statuses) are resolved before the record
    /// transaction opens and commit independently; the in-memory cache must
    /// never hold an id that a rollback could erase.
    pub async fn import_record(&mut self, raw: &RawRecord) -> Result<(), ImportError> {
        let record = normalize_record(raw)?;

        let plan_id = self
            .lookups
            .plan_id(
                &self.pool,
                record.plan_name.as_deref(),
                record.plan_value.as_ref(),
            )
            .await?;
        let status_id = self
            .lookups
            .status_id(&self.pool, record.status.as_deref())
            .await?;

        let mut tx = self.pool.begin().await?;

        let client_id = find_or_create_client(&mut tx, &record).await?;

        for (kind, values) in [
            (ContactKind::Mobile, &record.mobiles),
            (ContactKind::Phone, &record.phones),
            (ContactKind::Email, &record.emails),
        ] {
            let type_id = self.lookups.contact_type_id(kind);
            for value in values {
                attach_contact(&mut tx, client_id, type_id, value).await?;
            }
        }

        upsert_contract(&mut tx, client_id, plan_id, status_id, &record).await?;

        tx.commit().await?;
        Ok(())
    }
}

/// Find the client by tax id, inserting a new row when absent.
async fn find_or_create_client(
    tx: &mut Transaction<'_, Postgres>,
    record: &CleanRecord,
) -> Result<i32, ImportError> {
    let existing: Option<(i32,)> =
        sqlx::query_as("SELECT id FROM tbl_clientes WHERE cpf_cnpj = $1 LIMIT 1")
            .bind(&record.tax_id)
            .fetch_optional(&mut **tx)
            .await?;

    if let Some((id,)) = existing {
        return Ok(id);
    }

    let (id,): (i32,) = sqlx::query_as(
        r#"
        INSERT INTO tbl_clientes
            (nome_razao_social, nome_fantasia, cpf_cnpj, data_nascimento, data_cadastro)
        VALUES ($1, $2, $3, $4, $5)
        RETURNING id
        "#,
    )
    .bind(&record.legal_name)
    .bind(&record.trade_name)
    .bind(&record.tax_id)
    .bind(record.birth_date)
    .bind(record.registration_date)
    .fetch_one(&mut **tx)
    .await?;

    tracing::debug!("Created client {} for tax id {}", id, record.tax_id);
    Ok(id)
}

/// Insert a contact unless the (client, type, value) triple already exists.
async fn attach_contact(
    tx: &mut Transaction<'_, Postgres>,
    client_id: i32,
    type_id: i32,
    value: &str,
) -> Result<(), ImportError> {
    let exists: Option<(i32,)> = sqlx::query_as(
        "SELECT 1 FROM tbl_cliente_contatos WHERE cliente_id = $1 AND tipo_contato_id = $2 AND contato = $3",
    )
    .bind(client_id)
    .bind(type_id)
    .bind(value)
    .fetch_optional(&mut **tx)
    .await?;

    if exists.is_none() {
        sqlx::query(
            "INSERT INTO tbl_cliente_contatos (cliente_id, tipo_contato_id, contato) VALUES ($1, $2, $3)",
        )
        .bind(client_id)
        .bind(type_id)
        .bind(value)
        .execute(&mut **tx)
        .await?;
    }
    Ok(())
}

/// Upsert the contract on its (client, plan) key: update mutable fields in
/// place on collision, insert otherwise.
async fn upsert_contract(
    tx: &mut Transaction<'_, Postgres>,
    client_id: i32,
    plan_id: i32,
    status_id: i32,
    record: &CleanRecord,
) -> Result<(), ImportError> {
    let existing: Option<(i32,)> = sqlx::query_as(
        "SELECT id FROM tbl_cliente_contratos WHERE cliente_id = $1 AND plano_id = $2 LIMIT 1",
    )
    .bind(client_id)
    .bind(plan_id)
    .fetch_optional(&mut **tx)
    .await?;

    match existing {
        Some((contract_id,)) => {
            sqlx::query(
                r#"
                UPDATE tbl_cliente_contratos
                SET dia_vencimento = $1, isento = $2,
                    endereco_logradouro = $3, endereco_numero = $4,
                    endereco_complemento = $5, endereco_bairro = $6,
                    endereco_cep = $7, endereco_cidade = $8, endereco_uf = $9,
                    status_id = $10
                WHERE id = $11
                "#,
            )
            .bind(record.due_day)
            .bind(record.exempt)
            .bind(&record.street)
            .bind(&record.number)
            .bind(&record.complement)
            .bind(&record.neighborhood)
            .bind(&record.postal_code)
            .bind(&record.city)
            .bind(&record.state_code)
            .bind(status_id)
            .bind(contract_id)
            .execute(&mut **tx)
            .await?;
            tracing::debug!("Updated contract {} (client {})", contract_id, client_id);
        }
        None => {
            sqlx::query(
                r#"
                INSERT INTO tbl_cliente_contratos
                    (cliente_id, plano_id, dia_vencimento, isento,
                     endereco_logradouro, endereco_numero, endereco_complemento,
                     endereco_bairro, endereco_cep, endereco_cidade, endereco_uf,
                     status_id)
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
                "#,
            )
            .bind(client_id)
            .bind(plan_id)
            .bind(record.due_day)
            .bind(record.exempt)
            .bind(&record.street)
            .bind(&record.number)
            .bind(&record.complement)
            .bind(&record.neighborhood)
            .bind(&record.postal_code)
            .bind(&record.city)
            .bind(&record.state_code)
            .bind(status_id)
            .execute(&mut **tx)
            .await?;
            tracing::debug!("Created contract for client {} plan {}", client_id, plan_id);
        }
    }
    Ok(())
}
