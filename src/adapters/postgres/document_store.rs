//! PostgreSQL implementation of DocumentStore.
//!
//! Schema lives in `migrations/0001_document_control.sql`. A change set is
//! applied in one transaction. Version updates are guarded by
//! `WHERE revision = $n`; edge mutations lock the single
//! `dependency_graph_revision` row with `FOR UPDATE` and bump it.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Postgres, Row, Transaction};
use uuid::Uuid;

use crate::domain::audit::{DependencyAuditEntry, TransitionRecord};
use crate::domain::dependency::{Dependency, GraphNode, GraphSnapshot};
use crate::domain::document::{
    AuditHead, DocumentStatus, DocumentVersion, DocumentVersionParts, Revision, VersionNumber,
};
use crate::domain::foundation::{
    AuditEntryId, BaseNumber, DependencyId, DocumentVersionId, DomainError, ErrorCode,
    StateMachine, Timestamp, TransitionId, UserId, WorkflowInstanceId,
};
use crate::domain::workflow::{ChangeSet, WorkflowInstance};
use crate::ports::{DocumentStore, DueKind};

const VERSION_COLUMNS: &str = r#"
    id, base_number, version_major, version_minor, title, status,
    author_id, reviewer_id, approver_id, effective_date, obsolescence_date,
    supersedes_id, obsolescence_reason, change_reason, revision,
    audit_sequence, audit_hash, created_at, updated_at
"#;

const WORKFLOW_COLUMNS: &str = r#"
    id, document_version_id, workflow_type, current_state, assignee_id,
    due_date, is_terminated, created_at, updated_at
"#;

const TRANSITION_COLUMNS: &str = r#"
    id, workflow_instance_id, document_version_id, sequence, from_state,
    to_state, actor_id, comment, occurred_at, previous_hash, hash
"#;

const DEPENDENCY_COLUMNS: &str = r#"
    id, document_version_id, depends_on_version_id, dependency_type,
    is_active, created_by, created_at, deactivated_at
"#;

const UNIQUE_VIOLATION: &str = "23505";

/// PostgreSQL implementation of DocumentStore.
#[derive(Clone)]
pub struct PostgresDocumentStore {
    pool: PgPool,
}

impl PostgresDocumentStore {
    /// Creates a new PostgresDocumentStore.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl DocumentStore for PostgresDocumentStore {
    async fn find_version(
        &self,
        id: DocumentVersionId,
    ) -> Result<Option<DocumentVersion>, DomainError> {
        let row = sqlx::query(&format!(
            "SELECT {} FROM document_versions WHERE id = $1",
            VERSION_COLUMNS
        ))
        .bind(id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| db_error("fetch document version", e))?;

        row.map(|row| row_to_version(&row)).transpose()
    }

    async fn find_family(&self, base_number: &BaseNumber) -> Result<Vec<DocumentVersion>, DomainError> {
        let rows = sqlx::query(&format!(
            r#"
            SELECT {} FROM document_versions
            WHERE base_number = $1
            ORDER BY version_major DESC, version_minor DESC
            "#,
            VERSION_COLUMNS
        ))
        .bind(base_number.as_str())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| db_error("fetch version family", e))?;

        rows.iter().map(row_to_version).collect()
    }

    async fn find_due(
        &self,
        kind: DueKind,
        today: NaiveDate,
    ) -> Result<Vec<DocumentVersion>, DomainError> {
        let (status, date_column) = match kind {
            DueKind::Activation => (DocumentStatus::ApprovedPendingEffective, "effective_date"),
            DueKind::Retirement => (DocumentStatus::ScheduledForObsolescence, "obsolescence_date"),
        };

        let rows = sqlx::query(&format!(
            r#"
            SELECT {columns} FROM document_versions
            WHERE status = $1 AND {date} <= $2
            ORDER BY {date} ASC, created_at ASC
            "#,
            columns = VERSION_COLUMNS,
            date = date_column
        ))
        .bind(status.as_str())
        .bind(today)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| db_error("fetch due versions", e))?;

        rows.iter().map(row_to_version).collect()
    }

    async fn find_active_workflow(
        &self,
        version_id: DocumentVersionId,
    ) -> Result<Option<WorkflowInstance>, DomainError> {
        let row = sqlx::query(&format!(
            r#"
            SELECT {} FROM workflow_instances
            WHERE document_version_id = $1 AND NOT is_terminated
            "#,
            WORKFLOW_COLUMNS
        ))
        .bind(version_id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| db_error("fetch active workflow", e))?;

        row.map(|row| row_to_workflow(&row)).transpose()
    }

    async fn history(
        &self,
        version_id: DocumentVersionId,
    ) -> Result<Vec<TransitionRecord>, DomainError> {
        let rows = sqlx::query(&format!(
            r#"
            SELECT {} FROM transitions
            WHERE document_version_id = $1
            ORDER BY sequence ASC
            "#,
            TRANSITION_COLUMNS
        ))
        .bind(version_id.as_uuid())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| db_error("fetch transition history", e))?;

        rows.iter().map(row_to_transition).collect()
    }

    async fn dependency_audit(
        &self,
        version_id: DocumentVersionId,
    ) -> Result<Vec<DependencyAuditEntry>, DomainError> {
        let rows = sqlx::query(
            r#"
            SELECT id, dependency_id, document_version_id, depends_on_version_id,
                   change, actor_id, comment, occurred_at
            FROM dependency_audit
            WHERE document_version_id = $1
            ORDER BY occurred_at ASC
            "#,
        )
        .bind(version_id.as_uuid())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| db_error("fetch dependency audit", e))?;

        rows.iter().map(row_to_audit_entry).collect()
    }

    async fn load_graph(&self) -> Result<GraphSnapshot, DomainError> {
        let mut tx = self.pool.begin().await.map_err(|e| db_error("begin transaction", e))?;
        sqlx::query("SET TRANSACTION ISOLATION LEVEL REPEATABLE READ READ ONLY")
            .execute(&mut *tx)
            .await
            .map_err(|e| db_error("set isolation level", e))?;

        let revision: i64 =
            sqlx::query_scalar("SELECT revision FROM dependency_graph_revision WHERE id = 1")
                .fetch_one(&mut *tx)
                .await
                .map_err(|e| db_error("fetch graph revision", e))?;

        let node_rows = sqlx::query(
            "SELECT id, base_number, version_major, version_minor, status FROM document_versions",
        )
        .fetch_all(&mut *tx)
        .await
        .map_err(|e| db_error("fetch graph nodes", e))?;

        let edge_rows = sqlx::query(&format!(
            "SELECT {} FROM dependencies ORDER BY created_at ASC",
            DEPENDENCY_COLUMNS
        ))
        .fetch_all(&mut *tx)
        .await
        .map_err(|e| db_error("fetch graph edges", e))?;

        tx.commit().await.map_err(|e| db_error("commit transaction", e))?;

        let nodes = node_rows
            .iter()
            .map(|row| {
                Ok(GraphNode {
                    id: DocumentVersionId::from_uuid(col(row, "id")?),
                    base_number: BaseNumber::new(col::<String>(row, "base_number")?)?,
                    version: version_number(row)?,
                    status: parse_status(&col::<String>(row, "status")?)?,
                })
            })
            .collect::<Result<Vec<_>, DomainError>>()?;
        let edges = edge_rows
            .iter()
            .map(row_to_dependency)
            .collect::<Result<Vec<_>, DomainError>>()?;

        Ok(GraphSnapshot {
            revision: to_revision(revision)?,
            nodes,
            edges,
        })
    }

    async fn find_dependency(&self, id: DependencyId) -> Result<Option<Dependency>, DomainError> {
        let row = sqlx::query(&format!(
            "SELECT {} FROM dependencies WHERE id = $1",
            DEPENDENCY_COLUMNS
        ))
        .bind(id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| db_error("fetch dependency", e))?;

        row.map(|row| row_to_dependency(&row)).transpose()
    }

    async fn commit(&self, changes: ChangeSet) -> Result<(), DomainError> {
        let mut tx = self.pool.begin().await.map_err(|e| db_error("begin transaction", e))?;

        let touches_edges = changes.touches_edges();
        if touches_edges || changes.expected_graph_revision.is_some() {
            let current: i64 = sqlx::query_scalar(
                "SELECT revision FROM dependency_graph_revision WHERE id = 1 FOR UPDATE",
            )
            .fetch_one(&mut *tx)
            .await
            .map_err(|e| db_error("lock graph revision", e))?;

            if let Some(expected) = changes.expected_graph_revision {
                if to_revision(current)? != expected {
                    return Err(DomainError::conflict("dependency graph")
                        .with_detail("expected_revision", expected.to_string())
                        .with_detail("actual_revision", current.to_string()));
                }
            }
        }

        for version in &changes.inserted_versions {
            insert_version(&mut tx, version).await?;
        }

        // Versions leaving a family slot are written before the ones taking it.
        let mut updates: Vec<&DocumentVersion> = changes.updated_versions.iter().collect();
        updates.sort_by_key(|v| !v.status().is_terminal());
        for version in updates {
            update_version(&mut tx, version).await?;
        }

        let mut workflows: Vec<&WorkflowInstance> = changes.workflows.iter().collect();
        workflows.sort_by_key(|wf| !wf.is_terminated);
        for workflow in workflows {
            upsert_workflow(&mut tx, workflow).await?;
        }

        for record in &changes.transitions {
            insert_transition(&mut tx, record).await?;
        }

        for edge in &changes.deactivated_edges {
            let result = sqlx::query(
                r#"
                UPDATE dependencies SET is_active = FALSE, deactivated_at = $2
                WHERE id = $1 AND is_active
                "#,
            )
            .bind(edge.id.as_uuid())
            .bind(edge.deactivated_at.map(|t| *t.as_datetime()))
            .execute(&mut *tx)
            .await
            .map_err(|e| db_error("deactivate dependency", e))?;

            if result.rows_affected() == 0 {
                return Err(DomainError::conflict(format!("dependency {}", edge.id)));
            }
        }

        for edge in &changes.inserted_edges {
            sqlx::query(
                r#"
                INSERT INTO dependencies (
                    id, document_version_id, depends_on_version_id, dependency_type,
                    is_active, created_by, created_at, deactivated_at
                ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
                "#,
            )
            .bind(edge.id.as_uuid())
            .bind(edge.document_version_id.as_uuid())
            .bind(edge.depends_on_version_id.as_uuid())
            .bind(edge.dependency_type.as_str())
            .bind(edge.is_active)
            .bind(edge.created_by.as_str())
            .bind(edge.created_at.as_datetime())
            .bind(edge.deactivated_at.map(|t| *t.as_datetime()))
            .execute(&mut *tx)
            .await
            .map_err(|e| db_error("insert dependency", e))?;
        }

        for entry in &changes.dependency_audit {
            sqlx::query(
                r#"
                INSERT INTO dependency_audit (
                    id, dependency_id, document_version_id, depends_on_version_id,
                    change, actor_id, comment, occurred_at
                ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
                "#,
            )
            .bind(entry.id.as_uuid())
            .bind(entry.dependency_id.as_uuid())
            .bind(entry.document_version_id.as_uuid())
            .bind(entry.depends_on_version_id.as_uuid())
            .bind(entry.change.as_str())
            .bind(entry.actor_id.as_str())
            .bind(entry.comment.as_deref())
            .bind(entry.timestamp.as_datetime())
            .execute(&mut *tx)
            .await
            .map_err(|e| db_error("insert dependency audit", e))?;
        }

        if touches_edges {
            sqlx::query("UPDATE dependency_graph_revision SET revision = revision + 1 WHERE id = 1")
                .execute(&mut *tx)
                .await
                .map_err(|e| db_error("bump graph revision", e))?;
        }

        tx.commit().await.map_err(|e| db_error("commit transaction", e))?;
        Ok(())
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// Writes
// ════════════════════════════════════════════════════════════════════════════════

async fn insert_version(
    tx: &mut Transaction<'_, Postgres>,
    version: &DocumentVersion,
) -> Result<(), DomainError> {
    let head = version.audit_head();
    sqlx::query(
        r#"
        INSERT INTO document_versions (
            id, base_number, version_major, version_minor, title, status,
            author_id, reviewer_id, approver_id, effective_date, obsolescence_date,
            supersedes_id, obsolescence_reason, change_reason, revision,
            audit_sequence, audit_hash, created_at, updated_at
        ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17, $18, $19)
        "#,
    )
    .bind(version.id().as_uuid())
    .bind(version.base_number().as_str())
    .bind(to_db_int(version.version().major)?)
    .bind(to_db_int(version.version().minor)?)
    .bind(version.title())
    .bind(version.status().as_str())
    .bind(version.author_id().as_str())
    .bind(version.reviewer_id().map(|u| u.as_str()))
    .bind(version.approver_id().map(|u| u.as_str()))
    .bind(version.effective_date())
    .bind(version.obsolescence_date())
    .bind(version.supersedes_id().map(|id| *id.as_uuid()))
    .bind(version.obsolescence_reason())
    .bind(version.change_reason())
    .bind(to_db_bigint(version.revision().as_u64())?)
    .bind(head.map(|h| to_db_bigint(h.sequence)).transpose()?)
    .bind(head.map(|h| h.hash.as_str()))
    .bind(version.created_at().as_datetime())
    .bind(version.updated_at().as_datetime())
    .execute(&mut **tx)
    .await
    .map_err(|e| db_error("insert document version", e))?;

    Ok(())
}

async fn update_version(
    tx: &mut Transaction<'_, Postgres>,
    version: &DocumentVersion,
) -> Result<(), DomainError> {
    let head = version.audit_head();
    let result = sqlx::query(
        r#"
        UPDATE document_versions SET
            title = $3,
            status = $4,
            reviewer_id = $5,
            approver_id = $6,
            effective_date = $7,
            obsolescence_date = $8,
            obsolescence_reason = $9,
            audit_sequence = $10,
            audit_hash = $11,
            updated_at = $12,
            revision = revision + 1
        WHERE id = $1 AND revision = $2
        "#,
    )
    .bind(version.id().as_uuid())
    .bind(to_db_bigint(version.revision().as_u64())?)
    .bind(version.title())
    .bind(version.status().as_str())
    .bind(version.reviewer_id().map(|u| u.as_str()))
    .bind(version.approver_id().map(|u| u.as_str()))
    .bind(version.effective_date())
    .bind(version.obsolescence_date())
    .bind(version.obsolescence_reason())
    .bind(head.map(|h| to_db_bigint(h.sequence)).transpose()?)
    .bind(head.map(|h| h.hash.as_str()))
    .bind(version.updated_at().as_datetime())
    .execute(&mut **tx)
    .await
    .map_err(|e| db_error("update document version", e))?;

    if result.rows_affected() == 0 {
        return Err(DomainError::conflict(format!("document_version {}", version.id())));
    }
    Ok(())
}

async fn upsert_workflow(
    tx: &mut Transaction<'_, Postgres>,
    workflow: &WorkflowInstance,
) -> Result<(), DomainError> {
    sqlx::query(
        r#"
        INSERT INTO workflow_instances (
            id, document_version_id, workflow_type, current_state, assignee_id,
            due_date, is_terminated, created_at, updated_at
        ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
        ON CONFLICT (id) DO UPDATE SET
            current_state = EXCLUDED.current_state,
            assignee_id = EXCLUDED.assignee_id,
            due_date = EXCLUDED.due_date,
            is_terminated = EXCLUDED.is_terminated,
            updated_at = EXCLUDED.updated_at
        "#,
    )
    .bind(workflow.id.as_uuid())
    .bind(workflow.document_version_id.as_uuid())
    .bind(workflow.workflow_type.as_str())
    .bind(workflow.current_state.as_str())
    .bind(workflow.assignee_id.as_ref().map(|u| u.as_str()))
    .bind(workflow.due_date)
    .bind(workflow.is_terminated)
    .bind(workflow.created_at.as_datetime())
    .bind(workflow.updated_at.as_datetime())
    .execute(&mut **tx)
    .await
    .map_err(|e| db_error("upsert workflow instance", e))?;

    Ok(())
}

async fn insert_transition(
    tx: &mut Transaction<'_, Postgres>,
    record: &TransitionRecord,
) -> Result<(), DomainError> {
    sqlx::query(
        r#"
        INSERT INTO transitions (
            id, workflow_instance_id, document_version_id, sequence, from_state,
            to_state, actor_id, comment, occurred_at, previous_hash, hash
        ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
        "#,
    )
    .bind(record.id.as_uuid())
    .bind(record.workflow_instance_id.as_uuid())
    .bind(record.document_version_id.as_uuid())
    .bind(to_db_bigint(record.sequence)?)
    .bind(record.from_state.as_str())
    .bind(record.to_state.as_str())
    .bind(record.actor_id.as_str())
    .bind(record.comment.as_deref())
    .bind(record.timestamp.as_datetime())
    .bind(record.previous_hash.as_deref())
    .bind(record.hash.as_str())
    .execute(&mut **tx)
    .await
    .map_err(|e| db_error("insert transition", e))?;

    Ok(())
}

// ════════════════════════════════════════════════════════════════════════════════
// Row mapping
// ════════════════════════════════════════════════════════════════════════════════

fn row_to_version(row: &PgRow) -> Result<DocumentVersion, DomainError> {
    let audit_sequence: Option<i64> = col(row, "audit_sequence")?;
    let audit_hash: Option<String> = col(row, "audit_hash")?;
    let audit_head = match (audit_sequence, audit_hash) {
        (Some(sequence), Some(hash)) => Some(AuditHead {
            sequence: to_u64(sequence, "audit_sequence")?,
            hash,
        }),
        _ => None,
    };

    Ok(DocumentVersion::reconstitute(DocumentVersionParts {
        id: DocumentVersionId::from_uuid(col(row, "id")?),
        base_number: BaseNumber::new(col::<String>(row, "base_number")?)?,
        version: version_number(row)?,
        title: col(row, "title")?,
        status: parse_status(&col::<String>(row, "status")?)?,
        author_id: UserId::new(col::<String>(row, "author_id")?)?,
        reviewer_id: optional_user(col(row, "reviewer_id")?)?,
        approver_id: optional_user(col(row, "approver_id")?)?,
        effective_date: col(row, "effective_date")?,
        obsolescence_date: col(row, "obsolescence_date")?,
        supersedes_id: col::<Option<Uuid>>(row, "supersedes_id")?.map(DocumentVersionId::from_uuid),
        obsolescence_reason: col(row, "obsolescence_reason")?,
        change_reason: col(row, "change_reason")?,
        revision: to_revision(col(row, "revision")?)?,
        audit_head,
        created_at: timestamp(row, "created_at")?,
        updated_at: timestamp(row, "updated_at")?,
    }))
}

fn row_to_workflow(row: &PgRow) -> Result<WorkflowInstance, DomainError> {
    Ok(WorkflowInstance {
        id: WorkflowInstanceId::from_uuid(col(row, "id")?),
        document_version_id: DocumentVersionId::from_uuid(col(row, "document_version_id")?),
        workflow_type: col::<String>(row, "workflow_type")?.parse()?,
        current_state: parse_status(&col::<String>(row, "current_state")?)?,
        assignee_id: optional_user(col(row, "assignee_id")?)?,
        due_date: col(row, "due_date")?,
        is_terminated: col(row, "is_terminated")?,
        created_at: timestamp(row, "created_at")?,
        updated_at: timestamp(row, "updated_at")?,
    })
}

fn row_to_transition(row: &PgRow) -> Result<TransitionRecord, DomainError> {
    Ok(TransitionRecord {
        id: TransitionId::from_uuid(col(row, "id")?),
        workflow_instance_id: WorkflowInstanceId::from_uuid(col(row, "workflow_instance_id")?),
        document_version_id: DocumentVersionId::from_uuid(col(row, "document_version_id")?),
        sequence: to_u64(col(row, "sequence")?, "sequence")?,
        from_state: parse_status(&col::<String>(row, "from_state")?)?,
        to_state: parse_status(&col::<String>(row, "to_state")?)?,
        actor_id: UserId::new(col::<String>(row, "actor_id")?)?,
        comment: col(row, "comment")?,
        timestamp: timestamp(row, "occurred_at")?,
        previous_hash: col(row, "previous_hash")?,
        hash: col(row, "hash")?,
    })
}

fn row_to_dependency(row: &PgRow) -> Result<Dependency, DomainError> {
    let deactivated_at: Option<DateTime<Utc>> = col(row, "deactivated_at")?;
    Ok(Dependency {
        id: DependencyId::from_uuid(col(row, "id")?),
        document_version_id: DocumentVersionId::from_uuid(col(row, "document_version_id")?),
        depends_on_version_id: DocumentVersionId::from_uuid(col(row, "depends_on_version_id")?),
        dependency_type: col::<String>(row, "dependency_type")?.parse()?,
        is_active: col(row, "is_active")?,
        created_by: UserId::new(col::<String>(row, "created_by")?)?,
        created_at: timestamp(row, "created_at")?,
        deactivated_at: deactivated_at.map(Timestamp::from_datetime),
    })
}

fn row_to_audit_entry(row: &PgRow) -> Result<DependencyAuditEntry, DomainError> {
    Ok(DependencyAuditEntry {
        id: AuditEntryId::from_uuid(col(row, "id")?),
        dependency_id: DependencyId::from_uuid(col(row, "dependency_id")?),
        document_version_id: DocumentVersionId::from_uuid(col(row, "document_version_id")?),
        depends_on_version_id: DocumentVersionId::from_uuid(col(row, "depends_on_version_id")?),
        change: col::<String>(row, "change")?.parse()?,
        actor_id: UserId::new(col::<String>(row, "actor_id")?)?,
        comment: col(row, "comment")?,
        timestamp: timestamp(row, "occurred_at")?,
    })
}

// ════════════════════════════════════════════════════════════════════════════════
// Helpers
// ════════════════════════════════════════════════════════════════════════════════

fn col<'r, T>(row: &'r PgRow, name: &str) -> Result<T, DomainError>
where
    T: sqlx::Decode<'r, Postgres> + sqlx::Type<Postgres>,
{
    row.try_get(name)
        .map_err(|e| DomainError::database(format!("Failed to read column '{}': {}", name, e)))
}

fn timestamp(row: &PgRow, name: &str) -> Result<Timestamp, DomainError> {
    col::<DateTime<Utc>>(row, name).map(Timestamp::from_datetime)
}

fn version_number(row: &PgRow) -> Result<VersionNumber, DomainError> {
    let major: i32 = col(row, "version_major")?;
    let minor: i32 = col(row, "version_minor")?;
    let convert = |value: i32, field: &str| {
        u32::try_from(value).map_err(|_| {
            DomainError::new(
                ErrorCode::InternalError,
                format!("Negative {} in database: {}", field, value),
            )
        })
    };
    Ok(VersionNumber::new(
        convert(major, "version_major")?,
        convert(minor, "version_minor")?,
    ))
}

fn parse_status(value: &str) -> Result<DocumentStatus, DomainError> {
    value.parse::<DocumentStatus>().map_err(|e| {
        DomainError::new(
            ErrorCode::InternalError,
            format!("Invalid status in database: {}", e),
        )
    })
}

fn optional_user(value: Option<String>) -> Result<Option<UserId>, DomainError> {
    value.map(UserId::new).transpose().map_err(DomainError::from)
}

fn to_u64(value: i64, field: &str) -> Result<u64, DomainError> {
    u64::try_from(value).map_err(|_| {
        DomainError::new(
            ErrorCode::InternalError,
            format!("Negative {} in database: {}", field, value),
        )
    })
}

fn to_revision(value: i64) -> Result<Revision, DomainError> {
    to_u64(value, "revision").map(Revision::from_u64)
}

fn to_db_int(value: u32) -> Result<i32, DomainError> {
    i32::try_from(value)
        .map_err(|_| DomainError::new(ErrorCode::ValidationFailed, "Version number too large"))
}

fn to_db_bigint(value: u64) -> Result<i64, DomainError> {
    i64::try_from(value)
        .map_err(|_| DomainError::new(ErrorCode::InternalError, "Counter exceeds database range"))
}

/// Unique-constraint violations mean another writer got there first.
fn db_error(action: &str, err: sqlx::Error) -> DomainError {
    if let sqlx::Error::Database(db) = &err {
        if db.code().as_deref() == Some(UNIQUE_VIOLATION) {
            return DomainError::conflict(db.constraint().unwrap_or(action).to_string());
        }
    }
    DomainError::database(format!("Failed to {}: {}", action, err))
}
