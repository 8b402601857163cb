//! Staff credential store
//!
//! Persists staff identities with their password hashes, plus the ordered
//! shift and leave sub-records. Read methods never return the hash except
//! [`StaffRepository::get_credentials`], which exists for the login path.

use std::collections::HashMap;
use std::str::FromStr;

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use sqlx::{FromRow, Sqlite};
use tracing::instrument;

use crate::domain::{
    LeaveId, LeaveRequest, LeaveStatus, NewStaff, Shift, ShiftId, ShiftStatus, Staff,
    StaffChanges, StaffId, StaffRole, StaffStatus,
};
use crate::errors::{Error, Result};
use crate::storage::DbPool;

const STAFF_COLUMNS: &str = "id, first_name, last_name, email, password_hash, role, department, specialization, contact_number, status, created_at";

#[derive(Debug, Clone, FromRow)]
struct StaffRow {
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password_hash: String,
    pub role: String,
    pub department: String,
    pub specialization: Option<String>,
    pub contact_number: String,
    pub status: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, FromRow)]
struct ShiftRow {
    pub id: String,
    pub staff_id: String,
    pub shift_date: NaiveDate,
    pub start_time: String,
    pub end_time: String,
    pub status: String,
}

#[derive(Debug, Clone, FromRow)]
struct LeaveRow {
    pub id: String,
    pub staff_id: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub reason: String,
    pub status: String,
}

#[async_trait]
pub trait StaffRepository: Send + Sync {
    /// Insert a new staff member. Fails with `Conflict` if the email is taken.
    async fn create_staff(&self, staff: NewStaff) -> Result<Staff>;

    async fn get_staff(&self, id: &StaffId) -> Result<Option<Staff>>;

    /// Look up by already-normalized email.
    async fn find_by_email(&self, email: &str) -> Result<Option<Staff>>;

    /// Staff record plus stored password hash, for credential checks only.
    async fn get_credentials(&self, email: &str) -> Result<Option<(Staff, String)>>;

    /// All staff in creation order.
    async fn list_staff(&self) -> Result<Vec<Staff>>;

    async fn count_staff(&self) -> Result<i64>;

    /// Apply allow-listed changes. Fails with `NotFound` or `Conflict`.
    async fn update_staff(&self, id: &StaffId, changes: StaffChanges) -> Result<Staff>;

    async fn delete_staff(&self, id: &StaffId) -> Result<()>;

    /// Append a shift and return the full ordered shift list.
    async fn append_shift(&self, id: &StaffId, shift: Shift) -> Result<Vec<Shift>>;

    /// Append a leave request and return the full ordered leave list.
    async fn append_leave(&self, id: &StaffId, leave: LeaveRequest) -> Result<Vec<LeaveRequest>>;
}

#[derive(Debug, Clone)]
pub struct SqlxStaffRepository {
    pool: DbPool,
}

impl SqlxStaffRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &DbPool {
        &self.pool
    }

    fn row_to_staff(
        row: StaffRow,
        shifts: Vec<Shift>,
        leaves: Vec<LeaveRequest>,
    ) -> Result<(Staff, String)> {
        let role = StaffRole::from_str(&row.role)
            .map_err(|e| Error::internal(format!("Corrupt staff row {}: {}", row.id, e)))?;
        let status = StaffStatus::from_str(&row.status)
            .map_err(|e| Error::internal(format!("Corrupt staff row {}: {}", row.id, e)))?;

        let staff = Staff {
            id: StaffId::from_string(row.id),
            first_name: row.first_name,
            last_name: row.last_name,
            email: row.email,
            role,
            department: row.department,
            specialization: row.specialization,
            contact_number: row.contact_number,
            status,
            shifts,
            leaves,
            created_at: row.created_at,
        };
        Ok((staff, row.password_hash))
    }

    fn row_to_shift(row: ShiftRow) -> Result<Shift> {
        let status = ShiftStatus::from_str(&row.status)
            .map_err(|e| Error::internal(format!("Corrupt shift row {}: {}", row.id, e)))?;
        Ok(Shift {
            id: ShiftId::from_string(row.id),
            date: row.shift_date,
            start_time: row.start_time,
            end_time: row.end_time,
            status,
        })
    }

    fn row_to_leave(row: LeaveRow) -> Result<LeaveRequest> {
        let status = LeaveStatus::from_str(&row.status)
            .map_err(|e| Error::internal(format!("Corrupt leave row {}: {}", row.id, e)))?;
        Ok(LeaveRequest {
            id: LeaveId::from_string(row.id),
            start_date: row.start_date,
            end_date: row.end_date,
            reason: row.reason,
            status,
        })
    }

    async fn load_shifts<'e, E>(executor: E, staff_id: &str) -> Result<Vec<Shift>>
    where
        E: sqlx::Executor<'e, Database = Sqlite>,
    {
        let rows = sqlx::query_as::<_, ShiftRow>(
            "SELECT id, staff_id, shift_date, start_time, end_time, status FROM staff_shifts WHERE staff_id = ? ORDER BY position",
        )
        .bind(staff_id)
        .fetch_all(executor)
        .await
        .map_err(|e| Error::database(e, "Failed to fetch shifts"))?;

        rows.into_iter().map(Self::row_to_shift).collect()
    }

    async fn load_leaves<'e, E>(executor: E, staff_id: &str) -> Result<Vec<LeaveRequest>>
    where
        E: sqlx::Executor<'e, Database = Sqlite>,
    {
        let rows = sqlx::query_as::<_, LeaveRow>(
            "SELECT id, staff_id, start_date, end_date, reason, status FROM staff_leaves WHERE staff_id = ? ORDER BY position",
        )
        .bind(staff_id)
        .fetch_all(executor)
        .await
        .map_err(|e| Error::database(e, "Failed to fetch leave requests"))?;

        rows.into_iter().map(Self::row_to_leave).collect()
    }

    async fn hydrate(&self, row: StaffRow) -> Result<(Staff, String)> {
        let shifts = Self::load_shifts(&self.pool, &row.id).await?;
        let leaves = Self::load_leaves(&self.pool, &row.id).await?;
        Self::row_to_staff(row, shifts, leaves)
    }

    async fn fetch_row_by_email(&self, email: &str) -> Result<Option<StaffRow>> {
        sqlx::query_as::<_, StaffRow>(&format!("SELECT {STAFF_COLUMNS} FROM staff WHERE email = ?"))
            .bind(email)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| Error::database(e, "Failed to fetch staff by email"))
    }
}

fn map_write_error(err: sqlx::Error, context: &str) -> Error {
    let error = Error::database(err, context);
    if error.is_unique_violation() {
        Error::conflict("Staff already exists", "staff")
    } else {
        error
    }
}

#[async_trait]
impl StaffRepository for SqlxStaffRepository {
    #[instrument(skip(self, staff), fields(staff_id = %staff.id, role = %staff.role), name = "db_create_staff")]
    async fn create_staff(&self, staff: NewStaff) -> Result<Staff> {
        sqlx::query(
            r#"
            INSERT INTO staff (id, first_name, last_name, email, password_hash, role, department, specialization, contact_number, status, created_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&staff.id)
        .bind(&staff.first_name)
        .bind(&staff.last_name)
        .bind(&staff.email)
        .bind(&staff.password_hash)
        .bind(staff.role.as_str())
        .bind(&staff.department)
        .bind(&staff.specialization)
        .bind(&staff.contact_number)
        .bind(staff.status.as_str())
        .bind(Utc::now())
        .execute(&self.pool)
        .await
        .map_err(|e| map_write_error(e, "Failed to create staff"))?;

        self.get_staff(&staff.id)
            .await?
            .ok_or_else(|| Error::internal("Staff not found after creation"))
    }

    #[instrument(skip(self), fields(staff_id = %id), name = "db_get_staff")]
    async fn get_staff(&self, id: &StaffId) -> Result<Option<Staff>> {
        let row = sqlx::query_as::<_, StaffRow>(&format!("SELECT {STAFF_COLUMNS} FROM staff WHERE id = ?"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| Error::database(e, "Failed to fetch staff"))?;

        match row {
            Some(row) => Ok(Some(self.hydrate(row).await?.0)),
            None => Ok(None),
        }
    }

    #[instrument(skip(self), name = "db_find_staff_by_email")]
    async fn find_by_email(&self, email: &str) -> Result<Option<Staff>> {
        match self.fetch_row_by_email(email).await? {
            Some(row) => Ok(Some(self.hydrate(row).await?.0)),
            None => Ok(None),
        }
    }

    #[instrument(skip(self), name = "db_get_staff_credentials")]
    async fn get_credentials(&self, email: &str) -> Result<Option<(Staff, String)>> {
        match self.fetch_row_by_email(email).await? {
            Some(row) => Ok(Some(self.hydrate(row).await?)),
            None => Ok(None),
        }
    }

    #[instrument(skip(self), name = "db_list_staff")]
    async fn list_staff(&self) -> Result<Vec<Staff>> {
        let rows = sqlx::query_as::<_, StaffRow>(&format!(
            "SELECT {STAFF_COLUMNS} FROM staff ORDER BY created_at, rowid"
        ))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| Error::database(e, "Failed to list staff"))?;

        let shift_rows = sqlx::query_as::<_, ShiftRow>(
            "SELECT id, staff_id, shift_date, start_time, end_time, status FROM staff_shifts ORDER BY staff_id, position",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| Error::database(e, "Failed to list shifts"))?;

        let leave_rows = sqlx::query_as::<_, LeaveRow>(
            "SELECT id, staff_id, start_date, end_date, reason, status FROM staff_leaves ORDER BY staff_id, position",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| Error::database(e, "Failed to list leave requests"))?;

        let mut shifts: HashMap<String, Vec<Shift>> = HashMap::new();
        for row in shift_rows {
            let owner = row.staff_id.clone();
            shifts.entry(owner).or_default().push(Self::row_to_shift(row)?);
        }

        let mut leaves: HashMap<String, Vec<LeaveRequest>> = HashMap::new();
        for row in leave_rows {
            let owner = row.staff_id.clone();
            leaves.entry(owner).or_default().push(Self::row_to_leave(row)?);
        }

        rows.into_iter()
            .map(|row| {
                let own_shifts = shifts.remove(&row.id).unwrap_or_default();
                let own_leaves = leaves.remove(&row.id).unwrap_or_default();
                Self::row_to_staff(row, own_shifts, own_leaves).map(|(staff, _)| staff)
            })
            .collect()
    }

    async fn count_staff(&self) -> Result<i64> {
        sqlx::query_scalar("SELECT COUNT(*) FROM staff")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| Error::database(e, "Failed to count staff"))
    }

    #[instrument(skip(self, changes), fields(staff_id = %id), name = "db_update_staff")]
    async fn update_staff(&self, id: &StaffId, changes: StaffChanges) -> Result<Staff> {
        let result = sqlx::query(
            r#"
            UPDATE staff SET
                first_name = COALESCE(?, first_name),
                last_name = COALESCE(?, last_name),
                email = COALESCE(?, email),
                password_hash = COALESCE(?, password_hash),
                role = COALESCE(?, role),
                department = COALESCE(?, department),
                specialization = CASE WHEN ? THEN ? ELSE specialization END,
                contact_number = COALESCE(?, contact_number),
                status = COALESCE(?, status)
            WHERE id = ?
            "#,
        )
        .bind(&changes.first_name)
        .bind(&changes.last_name)
        .bind(&changes.email)
        .bind(&changes.password_hash)
        .bind(changes.role.map(|r| r.as_str()))
        .bind(&changes.department)
        .bind(changes.specialization.is_some())
        .bind(changes.specialization.clone().flatten())
        .bind(&changes.contact_number)
        .bind(changes.status.map(|s| s.as_str()))
        .bind(id)
        .execute(&self.pool)
        .await
        .map_err(|e| map_write_error(e, "Failed to update staff"))?;

        if result.rows_affected() == 0 {
            return Err(Error::not_found("Staff", id.as_str()));
        }

        self.get_staff(id).await?.ok_or_else(|| Error::not_found("Staff", id.as_str()))
    }

    #[instrument(skip(self), fields(staff_id = %id), name = "db_delete_staff")]
    async fn delete_staff(&self, id: &StaffId) -> Result<()> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| Error::database(e, "Failed to begin delete transaction"))?;

        sqlx::query("DELETE FROM staff_shifts WHERE staff_id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await
            .map_err(|e| Error::database(e, "Failed to delete shifts"))?;

        sqlx::query("DELETE FROM staff_leaves WHERE staff_id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await
            .map_err(|e| Error::database(e, "Failed to delete leave requests"))?;

        let result = sqlx::query("DELETE FROM staff WHERE id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await
            .map_err(|e| Error::database(e, "Failed to delete staff"))?;

        if result.rows_affected() == 0 {
            // Dropping the transaction rolls it back
            return Err(Error::not_found("Staff", id.as_str()));
        }

        tx.commit().await.map_err(|e| Error::database(e, "Failed to commit staff deletion"))?;
        Ok(())
    }

    #[instrument(skip(self, shift), fields(staff_id = %id, shift_id = %shift.id), name = "db_append_shift")]
    async fn append_shift(&self, id: &StaffId, shift: Shift) -> Result<Vec<Shift>> {
        // One statement: the write lock is held before the position is read
        let result = sqlx::query(
            r#"
            INSERT INTO staff_shifts (id, staff_id, position, shift_date, start_time, end_time, status)
            SELECT ?, ?, (SELECT COALESCE(MAX(position), -1) + 1 FROM staff_shifts WHERE staff_id = ?), ?, ?, ?, ?
            WHERE EXISTS (SELECT 1 FROM staff WHERE id = ?)
            "#,
        )
        .bind(&shift.id)
        .bind(id)
        .bind(id)
        .bind(shift.date)
        .bind(&shift.start_time)
        .bind(&shift.end_time)
        .bind(shift.status.as_str())
        .bind(id)
        .execute(&self.pool)
        .await
        .map_err(|e| Error::database(e, "Failed to append shift"))?;

        if result.rows_affected() == 0 {
            return Err(Error::not_found("Staff", id.as_str()));
        }

        Self::load_shifts(&self.pool, id.as_str()).await
    }

    #[instrument(skip(self, leave), fields(staff_id = %id, leave_id = %leave.id), name = "db_append_leave")]
    async fn append_leave(&self, id: &StaffId, leave: LeaveRequest) -> Result<Vec<LeaveRequest>> {
        let result = sqlx::query(
            r#"
            INSERT INTO staff_leaves (id, staff_id, position, start_date, end_date, reason, status)
            SELECT ?, ?, (SELECT COALESCE(MAX(position), -1) + 1 FROM staff_leaves WHERE staff_id = ?), ?, ?, ?, ?
            WHERE EXISTS (SELECT 1 FROM staff WHERE id = ?)
            "#,
        )
        .bind(&leave.id)
        .bind(id)
        .bind(id)
        .bind(leave.start_date)
        .bind(leave.end_date)
        .bind(&leave.reason)
        .bind(leave.status.as_str())
        .bind(id)
        .execute(&self.pool)
        .await
        .map_err(|e| Error::database(e, "Failed to append leave request"))?;

        if result.rows_affected() == 0 {
            return Err(Error::not_found("Staff", id.as_str()));
        }

        Self::load_leaves(&self.pool, id.as_str()).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::test_helpers::{file_pool, memory_pool};
    use std::sync::Arc;

    fn new_staff(email: &str, role: StaffRole) -> NewStaff {
        NewStaff {
            id: StaffId::new(),
            first_name: "Joy".to_string(),
            last_name: "Tanaka".to_string(),
            email: email.to_string(),
            password_hash: "$argon2id$v=19$m=19456,t=2,p=1$c2FsdHNhbHQ$aGFzaGhhc2hoYXNo".to_string(),
            role,
            department: "ICU".to_string(),
            specialization: None,
            contact_number: "555-0100".to_string(),
            status: StaffStatus::Active,
        }
    }

    fn shift(day: u32) -> Shift {
        Shift {
            id: ShiftId::new(),
            date: NaiveDate::from_ymd_opt(2024, 4, day).unwrap(),
            start_time: "08:00".to_string(),
            end_time: "16:00".to_string(),
            status: ShiftStatus::Scheduled,
        }
    }

    #[tokio::test]
    async fn create_and_fetch() {
        let repo = SqlxStaffRepository::new(memory_pool().await);
        let created = repo.create_staff(new_staff("a@h.com", StaffRole::Nurse)).await.unwrap();

        assert_eq!(created.email, "a@h.com");
        assert!(created.shifts.is_empty());

        let fetched = repo.get_staff(&created.id).await.unwrap().unwrap();
        assert_eq!(fetched, created);
        assert_eq!(repo.find_by_email("a@h.com").await.unwrap().unwrap().id, created.id);
        assert!(repo.find_by_email("b@h.com").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn duplicate_email_is_conflict() {
        let repo = SqlxStaffRepository::new(memory_pool().await);
        repo.create_staff(new_staff("a@h.com", StaffRole::Nurse)).await.unwrap();
        let err = repo.create_staff(new_staff("a@h.com", StaffRole::Admin)).await.unwrap_err();
        assert!(matches!(err, Error::Conflict { .. }));
    }

    #[tokio::test]
    async fn credentials_include_hash() {
        let repo = SqlxStaffRepository::new(memory_pool().await);
        let payload = new_staff("a@h.com", StaffRole::Nurse);
        let expected_hash = payload.password_hash.clone();
        repo.create_staff(payload).await.unwrap();

        let (_, hash) = repo.get_credentials("a@h.com").await.unwrap().unwrap();
        assert_eq!(hash, expected_hash);
    }

    #[tokio::test]
    async fn update_only_touches_given_fields() {
        let repo = SqlxStaffRepository::new(memory_pool().await);
        let created = repo.create_staff(new_staff("a@h.com", StaffRole::Nurse)).await.unwrap();

        let updated = repo
            .update_staff(
                &created.id,
                StaffChanges {
                    department: Some("Pediatrics".to_string()),
                    status: Some(StaffStatus::OnLeave),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.department, "Pediatrics");
        assert_eq!(updated.status, StaffStatus::OnLeave);
        assert_eq!(updated.first_name, created.first_name);
        assert_eq!(updated.email, created.email);
    }

    #[tokio::test]
    async fn update_missing_is_not_found() {
        let repo = SqlxStaffRepository::new(memory_pool().await);
        let err = repo
            .update_staff(&StaffId::new(), StaffChanges { department: Some("x".into()), ..Default::default() })
            .await
            .unwrap_err();
        assert!(matches!(err, Error::NotFound { .. }));
    }

    #[tokio::test]
    async fn update_to_taken_email_is_conflict() {
        let repo = SqlxStaffRepository::new(memory_pool().await);
        repo.create_staff(new_staff("a@h.com", StaffRole::Nurse)).await.unwrap();
        let b = repo.create_staff(new_staff("b@h.com", StaffRole::Nurse)).await.unwrap();

        let err = repo
            .update_staff(&b.id, StaffChanges { email: Some("a@h.com".into()), ..Default::default() })
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Conflict { .. }));
    }

    #[tokio::test]
    async fn shifts_append_in_order() {
        let repo = SqlxStaffRepository::new(memory_pool().await);
        let created = repo.create_staff(new_staff("a@h.com", StaffRole::Nurse)).await.unwrap();

        let first = shift(1);
        let second = shift(2);
        let after_one = repo.append_shift(&created.id, first.clone()).await.unwrap();
        assert_eq!(after_one, vec![first.clone()]);

        let after_two = repo.append_shift(&created.id, second.clone()).await.unwrap();
        assert_eq!(after_two, vec![first, second]);

        let fetched = repo.get_staff(&created.id).await.unwrap().unwrap();
        assert_eq!(fetched.shifts, after_two);
    }

    #[tokio::test]
    async fn leaves_append_in_order() {
        let repo = SqlxStaffRepository::new(memory_pool().await);
        let created = repo.create_staff(new_staff("a@h.com", StaffRole::Nurse)).await.unwrap();

        let leave = |reason: &str| LeaveRequest {
            id: LeaveId::new(),
            start_date: NaiveDate::from_ymd_opt(2024, 5, 1).unwrap(),
            end_date: NaiveDate::from_ymd_opt(2024, 5, 3).unwrap(),
            reason: reason.to_string(),
            status: LeaveStatus::Pending,
        };

        repo.append_leave(&created.id, leave("conference")).await.unwrap();
        let leaves = repo.append_leave(&created.id, leave("family")).await.unwrap();
        let reasons: Vec<_> = leaves.iter().map(|l| l.reason.as_str()).collect();
        assert_eq!(reasons, vec!["conference", "family"]);
    }

    #[tokio::test]
    async fn append_to_missing_staff_is_not_found() {
        let repo = SqlxStaffRepository::new(memory_pool().await);
        let err = repo.append_shift(&StaffId::new(), shift(1)).await.unwrap_err();
        assert!(matches!(err, Error::NotFound { .. }));
    }

    #[tokio::test]
    async fn delete_removes_staff_and_children() {
        let repo = SqlxStaffRepository::new(memory_pool().await);
        let created = repo.create_staff(new_staff("a@h.com", StaffRole::Nurse)).await.unwrap();
        repo.append_shift(&created.id, shift(1)).await.unwrap();

        repo.delete_staff(&created.id).await.unwrap();
        assert!(repo.get_staff(&created.id).await.unwrap().is_none());

        let orphans: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM staff_shifts")
            .fetch_one(repo.pool())
            .await
            .unwrap();
        assert_eq!(orphans, 0);

        let err = repo.delete_staff(&created.id).await.unwrap_err();
        assert!(matches!(err, Error::NotFound { .. }));
    }

    #[tokio::test]
    async fn list_groups_sub_records_per_staff() {
        let repo = SqlxStaffRepository::new(memory_pool().await);
        let a = repo.create_staff(new_staff("a@h.com", StaffRole::Nurse)).await.unwrap();
        let b = repo.create_staff(new_staff("b@h.com", StaffRole::Admin)).await.unwrap();
        repo.append_shift(&b.id, shift(3)).await.unwrap();

        let all = repo.list_staff().await.unwrap();
        assert_eq!(all.len(), 2);
        let listed_a = all.iter().find(|s| s.id == a.id).unwrap();
        let listed_b = all.iter().find(|s| s.id == b.id).unwrap();
        assert!(listed_a.shifts.is_empty());
        assert_eq!(listed_b.shifts.len(), 1);
        assert_eq!(repo.count_staff().await.unwrap(), 2);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_appends_on_file_database_all_land() {
        let (_dir, pool) = file_pool().await;
        let repo = Arc::new(SqlxStaffRepository::new(pool));

        let mut ids = Vec::new();
        for n in 0..4 {
            let created =
                repo.create_staff(new_staff(&format!("nurse{}@h.com", n), StaffRole::Nurse)).await.unwrap();
            ids.push(created.id);
        }

        let mut handles = Vec::new();
        for i in 0..32u32 {
            let repo = repo.clone();
            let id = ids[i as usize % ids.len()].clone();
            handles.push(tokio::spawn(async move {
                if i % 2 == 0 {
                    repo.append_shift(&id, shift(i % 28 + 1)).await.map(|_| ())
                } else {
                    let leave = LeaveRequest {
                        id: LeaveId::new(),
                        start_date: NaiveDate::from_ymd_opt(2024, 6, 1).unwrap(),
                        end_date: NaiveDate::from_ymd_opt(2024, 6, 2).unwrap(),
                        reason: format!("leave {}", i),
                        status: LeaveStatus::Pending,
                    };
                    repo.append_leave(&id, leave).await.map(|_| ())
                }
            }));
        }
        for handle in handles {
            handle.await.unwrap().unwrap();
        }

        for id in &ids {
            let staff = repo.get_staff(id).await.unwrap().unwrap();
            assert_eq!(staff.shifts.len(), 4);
            assert_eq!(staff.leaves.len(), 4);

            let positions: Vec<i64> = sqlx::query_scalar(
                "SELECT position FROM staff_shifts WHERE staff_id = ? ORDER BY position",
            )
            .bind(id)
            .fetch_all(repo.pool())
            .await
            .unwrap();
            assert_eq!(positions, vec![0, 1, 2, 3]);
        }
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_creates_with_same_email_insert_once() {
        let (_dir, pool) = file_pool().await;
        let repo = Arc::new(SqlxStaffRepository::new(pool));

        let mut handles = Vec::new();
        for _ in 0..8 {
            let repo = repo.clone();
            handles.push(tokio::spawn(async move {
                repo.create_staff(new_staff("same@h.com", StaffRole::Nurse)).await
            }));
        }

        let mut created = 0;
        for handle in handles {
            match handle.await.unwrap() {
                Ok(_) => created += 1,
                Err(err) => assert!(matches!(err, Error::Conflict { .. }), "unexpected error: {err}"),
            }
        }
        assert_eq!(created, 1);
        assert_eq!(repo.count_staff().await.unwrap(), 1);
    }
}
