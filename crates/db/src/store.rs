//! Postgres implementation of the core [`LifecycleStore`].
//!
//! Every `apply_*` is a conditional update: the status column is part of the
//! `WHERE` clause, so a write that raced another transition touches zero rows
//! and is reported as [`CoreError::StaleState`]. Side effects run in the same
//! transaction as the status write; a failed effect drops the transaction and
//! leaves the entity untouched.

use async_trait::async_trait;
use uuid::Uuid;

use clubdesk_core::error::CoreError;
use clubdesk_core::executor::{
    BucketTransition, ItemCascade, ItemRequestDecision, LifecycleStore, ProjectEffect,
    ProjectTransition,
};
use clubdesk_core::policy::{
    BucketSnapshot, ItemRequestSnapshot, ProjectSnapshot, ReimbursementSnapshot,
};
use clubdesk_core::status::{BucketStatus, ItemRequestStatus, ProjectStatus, ReimbursementStatus};
use clubdesk_core::types::EntityId;

use crate::DbPool;

/// [`LifecycleStore`] backed by the shared connection pool.
#[derive(Clone)]
pub struct PgLifecycleStore {
    pool: DbPool,
}

impl PgLifecycleStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn db_err(err: sqlx::Error) -> CoreError {
    CoreError::Internal(err.to_string())
}

/// Lifecycle timestamp column written alongside a project status change.
fn project_stamp_column(to: ProjectStatus) -> Option<&'static str> {
    match to {
        ProjectStatus::Approved => Some("approved_at"),
        ProjectStatus::Active => Some("started_at"),
        ProjectStatus::PendingReturn => Some("return_initiated_at"),
        ProjectStatus::Completed => Some("completed_at"),
        ProjectStatus::Closed => Some("closed_at"),
        ProjectStatus::PendingApproval | ProjectStatus::Rejected => None,
    }
}

#[async_trait]
impl LifecycleStore for PgLifecycleStore {
    async fn load_project(&self, id: EntityId) -> Result<ProjectSnapshot, CoreError> {
        let row: Option<(Uuid, String, i64)> = sqlx::query_as(
            "SELECT p.lead_id, p.status, \
                 (SELECT COUNT(*) FROM inventory_requests r \
                  WHERE r.project_id = p.id AND r.status = 'pending_return') \
             FROM projects p WHERE p.id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_err)?;

        let (lead_id, status, outstanding) = row.ok_or(CoreError::NotFound {
            entity: ProjectStatus::ENTITY,
            id,
        })?;
        Ok(ProjectSnapshot {
            id,
            lead_id,
            status: ProjectStatus::parse(&status)?,
            outstanding_returns: outstanding as u32,
        })
    }

    async fn apply_project(
        &self,
        id: EntityId,
        expected: ProjectStatus,
        transition: &ProjectTransition,
    ) -> Result<(), CoreError> {
        let mut tx = self.pool.begin().await.map_err(db_err)?;

        let stamp = project_stamp_column(transition.to)
            .map(|column| format!(", {column} = NOW()"))
            .unwrap_or_default();
        let query = format!(
            "UPDATE projects SET status = $1, updated_at = NOW(){stamp} \
             WHERE id = $2 AND status = $3"
        );
        let updated = sqlx::query(&query)
            .bind(transition.to.as_str())
            .bind(id)
            .bind(expected.as_str())
            .execute(&mut *tx)
            .await
            .map_err(db_err)?
            .rows_affected();

        if updated == 0 {
            let actual: Option<(String,)> =
                sqlx::query_as("SELECT status FROM projects WHERE id = $1")
                    .bind(id)
                    .fetch_optional(&mut *tx)
                    .await
                    .map_err(db_err)?;
            return Err(match actual {
                None => CoreError::NotFound {
                    entity: ProjectStatus::ENTITY,
                    id,
                },
                Some((actual,)) => CoreError::StaleState {
                    entity: ProjectStatus::ENTITY,
                    expected: expected.to_string(),
                    actual,
                },
            });
        }

        match transition.effect {
            Some(ProjectEffect::FulfillPendingRequests) => {
                // Decrement stock per item, guarded so no row goes negative.
                let stocked = sqlx::query(
                    "UPDATE inventory_items i \
                     SET available_quantity = i.available_quantity - r.total, \
                         updated_at = NOW() \
                     FROM ( \
                         SELECT item_id, SUM(quantity)::INT AS total \
                         FROM inventory_requests \
                         WHERE project_id = $1 AND status = 'pending' \
                         GROUP BY item_id \
                     ) r \
                     WHERE i.id = r.item_id AND i.available_quantity >= r.total",
                )
                .bind(id)
                .execute(&mut *tx)
                .await
                .map_err(db_err)?
                .rows_affected();

                let (requested,): (i64,) = sqlx::query_as(
                    "SELECT COUNT(DISTINCT item_id) FROM inventory_requests \
                     WHERE project_id = $1 AND status = 'pending'",
                )
                .bind(id)
                .fetch_one(&mut *tx)
                .await
                .map_err(db_err)?;

                if stocked != requested as u64 {
                    // Dropping the transaction rolls the status write back.
                    return Err(CoreError::Dependency(
                        "insufficient stock to fulfill pending inventory requests".into(),
                    ));
                }

                sqlx::query(
                    "UPDATE inventory_requests \
                     SET status = 'fulfilled', updated_at = NOW() \
                     WHERE project_id = $1 AND status = 'pending'",
                )
                .bind(id)
                .execute(&mut *tx)
                .await
                .map_err(db_err)?;
            }
            Some(ProjectEffect::RejectPendingRequests) => {
                sqlx::query(
                    "UPDATE inventory_requests \
                     SET status = 'rejected', updated_at = NOW() \
                     WHERE project_id = $1 AND status = 'pending'",
                )
                .bind(id)
                .execute(&mut *tx)
                .await
                .map_err(db_err)?;
            }
            Some(ProjectEffect::BeginReturnOfNonPerishables) => {
                sqlx::query(
                    "UPDATE inventory_requests r \
                     SET status = 'pending_return', updated_at = NOW() \
                     FROM inventory_items i \
                     WHERE r.item_id = i.id AND r.project_id = $1 \
                       AND r.status = 'fulfilled' AND NOT i.is_perishable",
                )
                .bind(id)
                .execute(&mut *tx)
                .await
                .map_err(db_err)?;
            }
            None => {}
        }

        tx.commit().await.map_err(db_err)?;
        tracing::debug!(project_id = %id, from = %expected, to = %transition.to, "project transition committed");
        Ok(())
    }

    async fn load_bucket(&self, id: EntityId) -> Result<BucketSnapshot, CoreError> {
        let row: Option<(Uuid, String)> =
            sqlx::query_as("SELECT created_by, status FROM procurement_buckets WHERE id = $1")
                .bind(id)
                .fetch_optional(&self.pool)
                .await
                .map_err(db_err)?;

        let (created_by, status) = row.ok_or(CoreError::NotFound {
            entity: BucketStatus::ENTITY,
            id,
        })?;
        Ok(BucketSnapshot {
            id,
            created_by,
            status: BucketStatus::parse(&status)?,
        })
    }

    async fn apply_bucket(
        &self,
        id: EntityId,
        expected: BucketStatus,
        transition: &BucketTransition,
    ) -> Result<(), CoreError> {
        let mut tx = self.pool.begin().await.map_err(db_err)?;

        let updated = sqlx::query(
            "UPDATE procurement_buckets SET status = $1, updated_at = NOW() \
             WHERE id = $2 AND status = $3",
        )
        .bind(transition.to.as_str())
        .bind(id)
        .bind(expected.as_str())
        .execute(&mut *tx)
        .await
        .map_err(db_err)?
        .rows_affected();

        if updated == 0 {
            let actual: Option<(String,)> =
                sqlx::query_as("SELECT status FROM procurement_buckets WHERE id = $1")
                    .bind(id)
                    .fetch_optional(&mut *tx)
                    .await
                    .map_err(db_err)?;
            return Err(match actual {
                None => CoreError::NotFound {
                    entity: BucketStatus::ENTITY,
                    id,
                },
                Some((actual,)) => CoreError::StaleState {
                    entity: BucketStatus::ENTITY,
                    expected: expected.to_string(),
                    actual,
                },
            });
        }

        // Item requests advance in lockstep with their bucket.
        let cascade = match transition.cascade {
            Some(ItemCascade::ApprovedToOrdered) => Some(("approved", "ordered")),
            Some(ItemCascade::OrderedToReceived) => Some(("ordered", "received")),
            None => None,
        };
        if let Some((from, to)) = cascade {
            sqlx::query(
                "UPDATE item_requests SET status = $1, updated_at = NOW() \
                 WHERE bucket_id = $2 AND status = $3",
            )
            .bind(to)
            .bind(id)
            .bind(from)
            .execute(&mut *tx)
            .await
            .map_err(db_err)?;
        }

        tx.commit().await.map_err(db_err)?;
        tracing::debug!(bucket_id = %id, from = %expected, to = %transition.to, "bucket transition committed");
        Ok(())
    }

    async fn load_item_request(&self, id: EntityId) -> Result<ItemRequestSnapshot, CoreError> {
        let row: Option<(Uuid, String, String)> = sqlx::query_as(
            "SELECT r.bucket_id, r.status, b.status \
             FROM item_requests r \
             JOIN procurement_buckets b ON b.id = r.bucket_id \
             WHERE r.id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_err)?;

        let (bucket_id, status, bucket_status) = row.ok_or(CoreError::NotFound {
            entity: ItemRequestStatus::ENTITY,
            id,
        })?;
        Ok(ItemRequestSnapshot {
            id,
            bucket_id,
            status: ItemRequestStatus::parse(&status)?,
            bucket_status: BucketStatus::parse(&bucket_status)?,
        })
    }

    async fn apply_item_request(
        &self,
        id: EntityId,
        expected: ItemRequestStatus,
        decision: &ItemRequestDecision,
    ) -> Result<(), CoreError> {
        // The bucket status is re-checked inside the update so a decision
        // cannot land after the bucket left `closed`.
        let updated = sqlx::query(
            "UPDATE item_requests r \
             SET status = $1, rejection_reason = COALESCE($2, r.rejection_reason), \
                 updated_at = NOW() \
             FROM procurement_buckets b \
             WHERE r.id = $3 AND r.bucket_id = b.id \
               AND r.status = $4 AND b.status = 'closed'",
        )
        .bind(decision.to.as_str())
        .bind(decision.rejection_reason.as_deref())
        .bind(id)
        .bind(expected.as_str())
        .execute(&self.pool)
        .await
        .map_err(db_err)?
        .rows_affected();

        if updated == 0 {
            let snapshot = self.load_item_request(id).await?;
            if snapshot.status != expected {
                return Err(CoreError::StaleState {
                    entity: ItemRequestStatus::ENTITY,
                    expected: expected.to_string(),
                    actual: snapshot.status.to_string(),
                });
            }
            return Err(CoreError::StaleState {
                entity: BucketStatus::ENTITY,
                expected: BucketStatus::Closed.to_string(),
                actual: snapshot.bucket_status.to_string(),
            });
        }
        Ok(())
    }

    async fn load_reimbursement(&self, id: EntityId) -> Result<ReimbursementSnapshot, CoreError> {
        let row: Option<(Uuid, String)> =
            sqlx::query_as("SELECT requested_by, status FROM reimbursements WHERE id = $1")
                .bind(id)
                .fetch_optional(&self.pool)
                .await
                .map_err(db_err)?;

        let (requested_by, status) = row.ok_or(CoreError::NotFound {
            entity: ReimbursementStatus::ENTITY,
            id,
        })?;
        Ok(ReimbursementSnapshot {
            id,
            requested_by,
            status: ReimbursementStatus::parse(&status)?,
        })
    }

    async fn apply_reimbursement(
        &self,
        id: EntityId,
        expected: ReimbursementStatus,
        to: ReimbursementStatus,
    ) -> Result<(), CoreError> {
        let stamp = match to {
            ReimbursementStatus::Approved | ReimbursementStatus::Rejected => {
                ", decided_at = NOW()"
            }
            ReimbursementStatus::Paid => ", paid_at = NOW()",
            ReimbursementStatus::Pending => "",
        };
        let query = format!(
            "UPDATE reimbursements SET status = $1, updated_at = NOW(){stamp} \
             WHERE id = $2 AND status = $3"
        );
        let updated = sqlx::query(&query)
            .bind(to.as_str())
            .bind(id)
            .bind(expected.as_str())
            .execute(&self.pool)
            .await
            .map_err(db_err)?
            .rows_affected();

        if updated == 0 {
            let actual: Option<(String,)> =
                sqlx::query_as("SELECT status FROM reimbursements WHERE id = $1")
                    .bind(id)
                    .fetch_optional(&self.pool)
                    .await
                    .map_err(db_err)?;
            return Err(match actual {
                None => CoreError::NotFound {
                    entity: ReimbursementStatus::ENTITY,
                    id,
                },
                Some((actual,)) => CoreError::StaleState {
                    entity: ReimbursementStatus::ENTITY,
                    expected: expected.to_string(),
                    actual,
                },
            });
        }
        Ok(())
    }
}
