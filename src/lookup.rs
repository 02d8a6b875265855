use bigdecimal::BigDecimal;
use sqlx::PgPool;
use std::collections::HashMap;

use crate::errors::ImportError;
use crate::models::ContactKind;

/// Label applied when the source row has no plan description.
pub const DEFAULT_PLAN: &str = "Plano Padrão";
/// Label applied when the source row has no contract status.
pub const DEFAULT_STATUS: &str = "Desconhecido";

/// Run-scoped cache of natural-key labels to surrogate ids.
///
/// Plans and statuses are preloaded wholesale at init and lazily created on
/// first miss; contact types are seeded up front from the enumerated set,
/// matched on the stable `codigo` column. The cache assumes exclusive
/// ownership of its backing tables for the duration of the run; a unique-key
/// conflict from a concurrent writer is logged and resolved by re-selecting,
/// never masked.
pub struct LookupCache {
    contact_types: HashMap<ContactKind, i32>,
    plans: HashMap<String, i32>,
    statuses: HashMap<String, i32>,
}

impl LookupCache {
    /// Load existing lookup rows and seed the three canonical contact types.
    pub async fn init(pool: &PgPool) -> Result<Self, ImportError> {
        let rows: Vec<(i32, String)> = sqlx::query_as("SELECT id, codigo FROM tbl_tipos_contato")
            .fetch_all(pool)
            .await?;
        let mut contact_types = HashMap::new();
        for (id, code) in rows {
            match ContactKind::from_code(&code) {
                Some(kind) => {
                    contact_types.insert(kind, id);
                }
                None => tracing::warn!("Ignoring unknown contact type code: {}", code),
            }
        }
        for kind in ContactKind::ALL {
            if !contact_types.contains_key(&kind) {
                let (id,): (i32,) = sqlx::query_as(
                    "INSERT INTO tbl_tipos_contato (codigo, tipo_contato) VALUES ($1, $2) RETURNING id",
                )
                .bind(kind.code())
                .bind(kind.label())
                .fetch_one(pool)
                .await?;
                tracing::info!("Seeded contact type '{}' (id {})", kind.code(), id);
                contact_types.insert(kind, id);
            }
        }

        let plans: HashMap<String, i32> =
            sqlx::query_as::<_, (String, i32)>("SELECT descricao, id FROM tbl_planos")
                .fetch_all(pool)
                .await?
                .into_iter()
                .collect();
        let statuses: HashMap<String, i32> =
            sqlx::query_as::<_, (String, i32)>("SELECT status, id FROM tbl_status_contrato")
                .fetch_all(pool)
                .await?
                .into_iter()
                .collect();

        tracing::info!("Lookup cache initialized");
        Ok(Self {
            contact_types,
            plans,
            statuses,
        })
    }

    /// Surrogate id for an enumerated contact type. Every kind is seeded in
    /// `init`, so lookups always hit.
    pub fn contact_type_id(&self, kind: ContactKind) -> i32 {
        self.contact_types[&kind]
    }

    /// Resolve (or create) a plan by description. Absent descriptions map to
    /// the default plan; absent values default to zero at this point.
    pub async fn plan_id(
        &mut self,
        pool: &PgPool,
        description: Option<&str>,
        value: Option<&BigDecimal>,
    ) -> Result<i32, ImportError> {
        let description = description.unwrap_or(DEFAULT_PLAN);
        if let Some(id) = self.plans.get(description) {
            return Ok(*id);
        }

        let value = value.cloned().unwrap_or_else(|| BigDecimal::from(0));
        let insert: Result<(i32,), ImportError> =
            sqlx::query_as("INSERT INTO tbl_planos (descricao, valor) VALUES ($1, $2) RETURNING id")
                .bind(description)
                .bind(&value)
                .fetch_one(pool)
                .await
                .map_err(ImportError::from);
        let id = match insert {
            Ok((id,)) => id,
            Err(ImportError::Conflict(msg)) => {
                // Concurrent writer created the same plan between our preload
                // and this insert; surface it and take the existing row.
                tracing::warn!("Duplicate plan '{}' detected: {}", description, msg);
                let (id,): (i32,) = sqlx::query_as("SELECT id FROM tbl_planos WHERE descricao = $1")
                    .bind(description)
                    .fetch_one(pool)
                    .await?;
                id
            }
            Err(e) => return Err(e),
        };

        self.plans.insert(description.to_string(), id);
        Ok(id)
    }

    /// Resolve (or create) a contract status by label, defaulting absent
    /// labels to "Desconhecido".
    pub async fn status_id(
        &mut self,
        pool: &PgPool,
        label: Option<&str>,
    ) -> Result<i32, ImportError> {
        let label = label.unwrap_or(DEFAULT_STATUS);
        if let Some(id) = self.statuses.get(label) {
            return Ok(*id);
        }

        let insert: Result<(i32,), ImportError> =
            sqlx::query_as("INSERT INTO tbl_status_contrato (status) VALUES ($1) RETURNING id")
                .bind(label)
                .fetch_one(pool)
                .await
                .map_err(ImportError::from);
        let id = match insert {
            Ok((id,)) => id,
            Err(ImportError::Conflict(msg)) => {
                tracing::warn!("Duplicate status '{}' detected: {}", label, msg);
                let (id,): (i32,) =
                    sqlx::query_as("SELECT id FROM tbl_status_contrato WHERE status = $1")
                        .bind(label)
                        .fetch_one(pool)
                        .await?;
                id
            }
            Err(e) => return Err(e),
        };

        self.statuses.insert(label.to_string(), id);
        Ok(id)
    }
}
