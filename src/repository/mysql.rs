use async_trait::async_trait;
use sqlx::MySqlPool;
use tracing::debug;

use crate::error::AppResult;
use crate::model::employee::{ApproverRow, EmployeeCredentials};
use crate::model::leave_request::{IncomingLeave, LeaveCounts, LeaveRequest, NewLeaveRequest};
use crate::model::leave_type::LeaveType;
use crate::repository::{DeviceTokenStore, EmployeeStore, LeaveStore};
use crate::workflow::{ApproverPair, Decision, LeaveStatus};

const LEAVE_COLUMNS: &str = r#"
    id, employee_id, employee_name, leave_type,
    from_date, to_date, in_time, out_time,
    reason, remarks, request_type, status,
    created_at, updated_at
"#;

/// `?, ?, ?` for an IN list of `n` values.
fn placeholders(n: usize) -> String {
    vec!["?"; n].join(", ")
}

/// Keeps the first occurrence of each token.
fn dedup_tokens(tokens: Vec<String>) -> Vec<String> {
    let mut out: Vec<String> = Vec::with_capacity(tokens.len());
    for token in tokens {
        if !token.trim().is_empty() && !out.contains(&token) {
            out.push(token);
        }
    }
    out
}

/// MySQL-backed store. Cheap to clone; clones share the pool.
#[derive(Clone)]
pub struct MySqlStore {
    pool: MySqlPool,
}

impl MySqlStore {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl EmployeeStore for MySqlStore {
    async fn find_credentials(&self, emp_id: &str) -> AppResult<Option<EmployeeCredentials>> {
        let creds = sqlx::query_as::<_, EmployeeCredentials>(
            r#"
            SELECT
                e.id, e.emp_id, e.emp_name, e.designation, e.password,
                e.role_id, e.fcm_token,
                f.name AS fla,
                s.name AS sla
            FROM seg_employee_details e
            LEFT JOIN fla_master f ON e.fla = f.id
            LEFT JOIN sla_master s ON e.sla = s.id
            WHERE e.emp_id = ?
            LIMIT 1
            "#,
        )
        .bind(emp_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(creds)
    }

    async fn employee_exists(&self, emp_id: &str) -> AppResult<bool> {
        let id = sqlx::query_scalar::<_, u64>(
            "SELECT id FROM seg_employee_details WHERE emp_id = ? LIMIT 1",
        )
        .bind(emp_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(id.is_some())
    }

    async fn update_password(&self, emp_id: &str, password_hash: &str) -> AppResult<()> {
        sqlx::query("UPDATE seg_employee_details SET password = ? WHERE emp_id = ?")
            .bind(password_hash)
            .bind(emp_id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn save_device_token(&self, emp_id: &str, token: &str) -> AppResult<u64> {
        let result = sqlx::query("UPDATE seg_employee_details SET fcm_token = ? WHERE emp_id = ?")
            .bind(token)
            .bind(emp_id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }
}

#[async_trait]
impl LeaveStore for MySqlStore {
    async fn insert_leave(&self, new: &NewLeaveRequest) -> AppResult<LeaveRequest> {
        // Dropping `tx` on an early return rolls the insert back.
        let mut tx = self.pool.begin().await?;

        let result = sqlx::query(
            r#"
            INSERT INTO leave_request (
                employee_id, employee_name, leave_type,
                from_date, to_date, in_time, out_time,
                reason, remarks, request_type, status
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&new.employee_id)
        .bind(&new.employee_name)
        .bind(&new.leave_type)
        .bind(new.from_date)
        .bind(new.to_date)
        .bind(new.in_time)
        .bind(new.out_time)
        .bind(&new.reason)
        .bind(&new.remarks)
        .bind(&new.request_type)
        .bind(LeaveStatus::Pending.as_str())
        .execute(&mut *tx)
        .await?;

        let id = result.last_insert_id();
        let sql = format!("SELECT {LEAVE_COLUMNS} FROM leave_request WHERE id = ?");
        let leave = sqlx::query_as::<_, LeaveRequest>(&sql)
            .bind(id)
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;
        debug!(leave_id = id, "Leave request committed");

        Ok(leave)
    }

    async fn find_leave(&self, id: u64) -> AppResult<Option<LeaveRequest>> {
        let sql = format!("SELECT {LEAVE_COLUMNS} FROM leave_request WHERE id = ?");
        let leave = sqlx::query_as::<_, LeaveRequest>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(leave)
    }

    async fn approvers_for(&self, applicant_emp_id: &str) -> AppResult<Option<ApproverPair>> {
        let row = sqlx::query_as::<_, ApproverRow>(
            r#"
            SELECT
                fm.emp_id AS fla_emp_id,
                fm.name   AS fla_name,
                sm.emp_id AS sla_emp_id,
                sm.name   AS sla_name
            FROM seg_employee_details sd
            LEFT JOIN fla_master fm ON sd.fla = fm.id
            LEFT JOIN sla_master sm ON sd.sla = sm.id
            WHERE sd.emp_id = ?
            LIMIT 1
            "#,
        )
        .bind(applicant_emp_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.and_then(ApproverRow::into_pair))
    }

    async fn apply_transition(
        &self,
        id: u64,
        expected: LeaveStatus,
        decision: &Decision,
    ) -> AppResult<bool> {
        // Compare-and-swap on status. A concurrent writer makes this match zero rows.
        let result = sqlx::query(
            r#"
            UPDATE leave_request
            SET status = ?,
                remarks = COALESCE(?, remarks),
                updated_at = CURRENT_TIMESTAMP
            WHERE id = ?
            AND status = ?
            "#,
        )
        .bind(decision.next_status.as_str())
        .bind(decision.remarks.as_deref())
        .bind(id)
        .bind(expected.as_str())
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn leaves_for_applicant(&self, emp_id: &str) -> AppResult<Vec<LeaveRequest>> {
        let sql = format!(
            "SELECT {LEAVE_COLUMNS} FROM leave_request WHERE employee_id = ? ORDER BY created_at DESC"
        );
        let leaves = sqlx::query_as::<_, LeaveRequest>(&sql)
            .bind(emp_id)
            .fetch_all(&self.pool)
            .await?;
        Ok(leaves)
    }

    async fn incoming_for_approver(&self, approver_emp_id: &str) -> AppResult<Vec<IncomingLeave>> {
        let rows = sqlx::query_as::<_, IncomingLeave>(
            r#"
            SELECT
                lr.id            AS leave_id,
                lr.employee_id   AS applicant_emp_id,
                lr.employee_name AS applicant_name,
                lr.leave_type,
                lr.from_date,
                lr.to_date,
                lr.status,
                fm.emp_id        AS fla_emp_id,
                fm.name          AS fla_name,
                sm.emp_id        AS sla_emp_id,
                sm.name          AS sla_name,
                lr.reason,
                lr.remarks
            FROM leave_request lr
            JOIN seg_employee_details sd ON lr.employee_id = sd.emp_id
            JOIN fla_master fm ON sd.fla = fm.id
            JOIN sla_master sm ON sd.sla = sm.id
            WHERE fm.emp_id = ? OR sm.emp_id = ?
            ORDER BY lr.from_date DESC
            "#,
        )
        .bind(approver_emp_id)
        .bind(approver_emp_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(IncomingLeave::with_same_approver_flag)
            .collect())
    }

    async fn leave_counts(&self, emp_id: &str) -> AppResult<LeaveCounts> {
        let (approved, rejected) = sqlx::query_as::<_, (i64, i64)>(
            r#"
            SELECT
                COUNT(CASE WHEN status = ? THEN 1 END) AS approved,
                COUNT(CASE WHEN status = ? THEN 1 END) AS rejected
            FROM leave_request
            WHERE employee_id = ?
            "#,
        )
        .bind(LeaveStatus::Approved.as_str())
        .bind(LeaveStatus::Rejected.as_str())
        .bind(emp_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(LeaveCounts { approved, rejected })
    }

    async fn all_leaves(&self) -> AppResult<Vec<LeaveRequest>> {
        let sql = format!("SELECT {LEAVE_COLUMNS} FROM leave_request ORDER BY created_at DESC");
        let leaves = sqlx::query_as::<_, LeaveRequest>(&sql)
            .fetch_all(&self.pool)
            .await?;
        Ok(leaves)
    }

    async fn leave_types(&self) -> AppResult<Vec<LeaveType>> {
        let types =
            sqlx::query_as::<_, LeaveType>("SELECT id, leave_type FROM leave_master ORDER BY id")
                .fetch_all(&self.pool)
                .await?;
        Ok(types)
    }
}

#[async_trait]
impl DeviceTokenStore for MySqlStore {
    async fn device_tokens_for(&self, emp_ids: &[String]) -> AppResult<Vec<String>> {
        if emp_ids.is_empty() {
            return Ok(Vec::new());
        }

        let sql = format!(
            "SELECT fcm_token FROM seg_employee_details WHERE emp_id IN ({}) AND fcm_token IS NOT NULL",
            placeholders(emp_ids.len())
        );
        let mut q = sqlx::query_scalar::<_, String>(&sql);
        for emp_id in emp_ids {
            q = q.bind(emp_id);
        }

        Ok(dedup_tokens(q.fetch_all(&self.pool).await?))
    }

    async fn clear_device_tokens(&self, tokens: &[String]) -> AppResult<u64> {
        if tokens.is_empty() {
            return Ok(0);
        }

        let sql = format!(
            "UPDATE seg_employee_details SET fcm_token = NULL WHERE fcm_token IN ({})",
            placeholders(tokens.len())
        );
        let mut q = sqlx::query(&sql);
        for token in tokens {
            q = q.bind(token);
        }

        Ok(q.execute(&self.pool).await?.rows_affected())
    }
}
