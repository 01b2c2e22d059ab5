use async_trait::async_trait;
use sqlx::postgres::{PgPoolOptions, PgRow};
use sqlx::{PgPool, Row};

use crate::database::{Store, identifier_taken};
use crate::error::ApiError;
use crate::identity::{Enrollment, Role};
use crate::model::class_item::{Class, ClassDraft, ClassUpdate};
use crate::model::parent::{Parent, ParentProfile, ParentUpdate};
use crate::model::person::{Gender, Status};
use crate::model::staff::{
    EmergencyContact, StaffCategory, StaffKind, StaffMember, StaffProfile, StaffUpdate,
};
use crate::model::student::{Student, StudentProfile, StudentUpdate};
use crate::model::summary::Summary;

/// Tables created at start-up, in dependency order.
static SCHEMA: &[(&str, &str)] = &[
    (
        "classes",
        "CREATE TABLE IF NOT EXISTS classes(
            id INTEGER PRIMARY KEY GENERATED ALWAYS AS IDENTITY,
            name TEXT NOT NULL,
            sections TEXT[] NOT NULL DEFAULT '{}',
            display_order INTEGER NOT NULL DEFAULT 0,
            created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
            updated_at TIMESTAMPTZ NOT NULL DEFAULT now()
        );",
    ),
    (
        "parents",
        "CREATE TABLE IF NOT EXISTS parents(
            id INTEGER PRIMARY KEY GENERATED ALWAYS AS IDENTITY,
            p_id INTEGER NOT NULL CONSTRAINT parents_p_id_key UNIQUE,
            email TEXT NOT NULL CONSTRAINT parents_email_key UNIQUE,
            password_hash TEXT NOT NULL,
            full_name TEXT NOT NULL,
            cnic TEXT NOT NULL CONSTRAINT parents_cnic_key UNIQUE,
            phone TEXT NOT NULL,
            address TEXT NOT NULL,
            occupation TEXT,
            gender TEXT NOT NULL,
            created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
            updated_at TIMESTAMPTZ NOT NULL DEFAULT now()
        );",
    ),
    (
        "students",
        "CREATE TABLE IF NOT EXISTS students(
            id INTEGER PRIMARY KEY GENERATED ALWAYS AS IDENTITY,
            gr_number INTEGER NOT NULL CONSTRAINT students_gr_number_key UNIQUE,
            email TEXT NOT NULL CONSTRAINT students_email_key UNIQUE,
            password_hash TEXT NOT NULL,
            first_name TEXT NOT NULL,
            last_name TEXT NOT NULL,
            phone TEXT,
            date_of_birth DATE,
            class_id INTEGER NOT NULL CONSTRAINT students_class_id_fkey
                REFERENCES classes (id) ON DELETE RESTRICT,
            section TEXT,
            roll_number TEXT,
            address TEXT,
            guardian_name TEXT,
            guardian_phone TEXT,
            guardian_relation TEXT,
            enrollment_date DATE,
            status TEXT NOT NULL DEFAULT 'active',
            blood_group TEXT,
            previous_school TEXT,
            parent_id INTEGER CONSTRAINT students_parent_id_fkey
                REFERENCES parents (id) ON DELETE SET NULL,
            created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
            updated_at TIMESTAMPTZ NOT NULL DEFAULT now()
        );",
    ),
    (
        "staff",
        "CREATE TABLE IF NOT EXISTS staff(
            id INTEGER PRIMARY KEY GENERATED ALWAYS AS IDENTITY,
            kind TEXT NOT NULL,
            first_name TEXT NOT NULL,
            last_name TEXT NOT NULL,
            email TEXT NOT NULL,
            phone TEXT,
            date_of_birth DATE,
            qualification TEXT,
            experience INTEGER CHECK (experience >= 0),
            subject TEXT,
            address TEXT,
            salary DOUBLE PRECISION CHECK (salary >= 0),
            joining_date DATE,
            status TEXT NOT NULL DEFAULT 'active',
            ec_name TEXT,
            ec_phone TEXT,
            ec_relation TEXT,
            nic_number TEXT,
            gender TEXT,
            staff_category TEXT,
            created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
            updated_at TIMESTAMPTZ NOT NULL DEFAULT now(),
            CONSTRAINT staff_kind_email_key UNIQUE (kind, email)
        );",
    ),
    (
        "sequences",
        "CREATE TABLE IF NOT EXISTS sequences(
            name TEXT PRIMARY KEY,
            value INTEGER NOT NULL
        );",
    ),
    // Seed the counters from existing rows so a database that predates them keeps counting up.
    (
        "student sequence",
        "INSERT INTO sequences (name, value)
            SELECT 'student', COALESCE(MAX(gr_number), 0) FROM students
            ON CONFLICT (name) DO NOTHING;",
    ),
    (
        "parent sequence",
        "INSERT INTO sequences (name, value)
            SELECT 'parent', COALESCE(MAX(p_id), 0) FROM parents
            ON CONFLICT (name) DO NOTHING;",
    ),
];

pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub async fn connect(url: &str, max_connections: u32) -> Result<Self, String> {
        let pool = match PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(url)
            .await
        {
            Ok(p) => p,
            Err(e) => {
                return Err(format!("{e}"));
            }
        };

        let store = Self { pool };
        store.init_schema().await?;
        Ok(store)
    }

    async fn init_schema(&self) -> Result<(), String> {
        let mut transaction = match self.pool.begin().await {
            Ok(t) => t,
            Err(e) => return Err(format!("Could not begin schema transaction: {e}")),
        };

        for (name, statement) in SCHEMA {
            if let Err(e) = sqlx::query(statement).execute(&mut *transaction).await {
                return Err(format!("Could not create {name}: {e}"));
            }
        }

        if let Err(e) = transaction.commit().await {
            return Err(format!("Could not commit table-creation transaction: {e}"));
        }
        Ok(())
    }
}

fn parse_column<T: std::str::FromStr<Err = String>>(value: &str) -> Result<T, ApiError> {
    value.parse::<T>().map_err(ApiError::Store)
}

fn class_from_row(row: &PgRow) -> Result<Class, ApiError> {
    Ok(Class {
        id: row.try_get("id")?,
        name: row.try_get("name")?,
        sections: row.try_get("sections")?,
        order: row.try_get("display_order")?,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}

fn student_from_row(row: &PgRow) -> Result<Student, ApiError> {
    let status: String = row.try_get("status")?;
    Ok(Student {
        id: row.try_get("id")?,
        gr_number: row.try_get("gr_number")?,
        email: row.try_get("email")?,
        password_hash: row.try_get("password_hash")?,
        profile: StudentProfile {
            first_name: row.try_get("first_name")?,
            last_name: row.try_get("last_name")?,
            phone: row.try_get("phone")?,
            date_of_birth: row.try_get("date_of_birth")?,
            class_id: row.try_get("class_id")?,
            section: row.try_get("section")?,
            roll_number: row.try_get("roll_number")?,
            address: row.try_get("address")?,
            guardian_name: row.try_get("guardian_name")?,
            guardian_phone: row.try_get("guardian_phone")?,
            guardian_relation: row.try_get("guardian_relation")?,
            enrollment_date: row.try_get("enrollment_date")?,
            status: parse_column::<Status>(&status)?,
            blood_group: row.try_get("blood_group")?,
            previous_school: row.try_get("previous_school")?,
            parent_id: row.try_get("parent_id")?,
        },
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}

fn parent_from_row(row: &PgRow) -> Result<Parent, ApiError> {
    let gender: String = row.try_get("gender")?;
    Ok(Parent {
        id: row.try_get("id")?,
        p_id: row.try_get("p_id")?,
        email: row.try_get("email")?,
        password_hash: row.try_get("password_hash")?,
        profile: ParentProfile {
            full_name: row.try_get("full_name")?,
            cnic: row.try_get("cnic")?,
            phone: row.try_get("phone")?,
            address: row.try_get("address")?,
            occupation: row.try_get("occupation")?,
            gender: parse_column(&gender)?,
        },
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}

fn staff_from_row(row: &PgRow) -> Result<StaffMember, ApiError> {
    let status: String = row.try_get("status")?;
    let gender: Option<String> = row.try_get("gender")?;
    let category: Option<String> = row.try_get("staff_category")?;

    let ec_name: Option<String> = row.try_get("ec_name")?;
    let ec_phone: Option<String> = row.try_get("ec_phone")?;
    let ec_relation: Option<String> = row.try_get("ec_relation")?;
    let emergency_contact = match (ec_name, ec_phone, ec_relation) {
        (Some(name), Some(phone), Some(relation)) => Some(EmergencyContact {
            name,
            phone,
            relation,
        }),
        _ => None,
    };

    Ok(StaffMember {
        id: row.try_get("id")?,
        profile: StaffProfile {
            first_name: row.try_get("first_name")?,
            last_name: row.try_get("last_name")?,
            email: row.try_get("email")?,
            phone: row.try_get("phone")?,
            date_of_birth: row.try_get("date_of_birth")?,
            qualification: row.try_get("qualification")?,
            experience: row.try_get("experience")?,
            subject: row.try_get("subject")?,
            address: row.try_get("address")?,
            salary: row.try_get("salary")?,
            joining_date: row.try_get("joining_date")?,
            status: parse_column(&status)?,
            emergency_contact,
            nic_number: row.try_get("nic_number")?,
            gender: gender.as_deref().map(parse_column::<Gender>).transpose()?,
            staff_category: category.as_deref().and_then(StaffCategory::parse),
        },
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}

/// Client-facing error for a constraint violation, keyed on SQLSTATE and constraint name.
/// `None` means the failure is not the client's and is reported as a store error.
fn classify_violation(code: Option<&str>, constraint: Option<&str>, identifier: i32) -> Option<ApiError> {
    let error = match (code?, constraint?) {
        ("23505", "students_gr_number_key") => identifier_taken(Role::Student, identifier),
        ("23505", "parents_p_id_key") => identifier_taken(Role::Parent, identifier),
        ("23505", "students_email_key" | "parents_email_key") => {
            ApiError::Duplicate("Email is already in use".into())
        }
        ("23505", "parents_cnic_key") => {
            ApiError::Duplicate("A parent with this CNIC already exists".into())
        }
        ("23503", "students_class_id_fkey") => ApiError::Validation("Class does not exist".into()),
        ("23503", "students_parent_id_fkey") => ApiError::Validation("Parent does not exist".into()),
        _ => return None,
    };
    Some(error)
}

fn classify_staff_violation(constraint: Option<&str>, kind: StaffKind) -> Option<ApiError> {
    (constraint == Some("staff_kind_email_key")).then(|| {
        ApiError::Duplicate(format!("Another {} already uses this email", kind.as_str()))
    })
}

fn map_write_error(e: sqlx::Error, identifier: i32) -> ApiError {
    let mapped = match &e {
        sqlx::Error::Database(db) => {
            classify_violation(db.code().as_deref(), db.constraint(), identifier)
        }
        _ => None,
    };
    mapped.unwrap_or_else(|| e.into())
}

fn map_staff_error(e: sqlx::Error, kind: StaffKind) -> ApiError {
    let mapped = match &e {
        sqlx::Error::Database(db) => classify_staff_violation(db.constraint(), kind),
        _ => None,
    };
    mapped.unwrap_or_else(|| e.into())
}

#[async_trait]
impl Store for PgStore {
    async fn next_identifier(&self, role: Role) -> Result<i32, ApiError> {
        // The row lock taken by the upsert serializes concurrent callers.
        let row = sqlx::query(
            "INSERT INTO sequences (name, value) VALUES ($1, 1)
            ON CONFLICT (name) DO UPDATE SET value = sequences.value + 1
            RETURNING value;",
        )
        .bind(role.sequence())
        .fetch_one(&self.pool)
        .await?;

        Ok(row.try_get("value")?)
    }

    async fn list_classes(&self) -> Result<Vec<Class>, ApiError> {
        let rows = sqlx::query(
            "SELECT * FROM classes ORDER BY display_order ASC, created_at DESC, id DESC;",
        )
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(class_from_row).collect()
    }

    async fn get_class(&self, id: i32) -> Result<Option<Class>, ApiError> {
        let row = sqlx::query("SELECT * FROM classes WHERE id = $1;")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        row.as_ref().map(class_from_row).transpose()
    }

    async fn insert_class(&self, draft: ClassDraft) -> Result<Class, ApiError> {
        let row = sqlx::query(
            "INSERT INTO classes (name, sections, display_order) VALUES ($1, $2, 0) RETURNING *;",
        )
        .bind(draft.name)
        .bind(draft.sections)
        .fetch_one(&self.pool)
        .await?;

        class_from_row(&row)
    }

    async fn update_class(&self, id: i32, changes: &ClassUpdate) -> Result<Option<Class>, ApiError> {
        let row = sqlx::query(
            "UPDATE classes SET
                name = COALESCE($2, name),
                sections = COALESCE($3, sections),
                updated_at = now()
            WHERE id = $1 RETURNING *;",
        )
        .bind(id)
        .bind(changes.name.clone())
        .bind(changes.sections.clone())
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(class_from_row).transpose()
    }

    async fn set_class_order(&self, id: i32, order: i32) -> Result<bool, ApiError> {
        let result = sqlx::query(
            "UPDATE classes SET display_order = $2, updated_at = now() WHERE id = $1;",
        )
        .bind(id)
        .bind(order)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn delete_class(&self, id: i32) -> Result<bool, ApiError> {
        let result = sqlx::query("DELETE FROM classes WHERE id = $1;")
            .bind(id)
            .execute(&self.pool)
            .await;

        match result {
            Ok(r) => Ok(r.rows_affected() > 0),
            Err(sqlx::Error::Database(db)) if db.code().as_deref() == Some("23503") => Err(
                ApiError::Validation("Class still has students assigned".into()),
            ),
            Err(e) => Err(e.into()),
        }
    }

    async fn list_students(&self, parent_id: Option<i32>) -> Result<Vec<Student>, ApiError> {
        let rows = sqlx::query(
            "SELECT * FROM students WHERE ($1::INTEGER IS NULL OR parent_id = $1)
            ORDER BY created_at DESC, id DESC;",
        )
        .bind(parent_id)
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(student_from_row).collect()
    }

    async fn insert_student(&self, enrollment: Enrollment<StudentProfile>) -> Result<Student, ApiError> {
        let identifier = enrollment.identifier;
        let p = enrollment.profile;

        let row = sqlx::query(
            "INSERT INTO students (
                gr_number, email, password_hash, first_name, last_name, phone, date_of_birth,
                class_id, section, roll_number, address, guardian_name, guardian_phone,
                guardian_relation, enrollment_date, status, blood_group, previous_school, parent_id
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17, $18, $19)
            RETURNING *;",
        )
        .bind(identifier)
        .bind(enrollment.email)
        .bind(enrollment.password_hash)
        .bind(p.first_name)
        .bind(p.last_name)
        .bind(p.phone)
        .bind(p.date_of_birth)
        .bind(p.class_id)
        .bind(p.section)
        .bind(p.roll_number)
        .bind(p.address)
        .bind(p.guardian_name)
        .bind(p.guardian_phone)
        .bind(p.guardian_relation)
        .bind(p.enrollment_date)
        .bind(p.status.as_str())
        .bind(p.blood_group)
        .bind(p.previous_school)
        .bind(p.parent_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_write_error(e, identifier))?;

        student_from_row(&row)
    }

    async fn update_student(&self, id: i32, changes: &StudentUpdate) -> Result<Option<Student>, ApiError> {
        let mut transaction = self.pool.begin().await?;

        let current = sqlx::query("SELECT * FROM students WHERE id = $1 FOR UPDATE;")
            .bind(id)
            .fetch_optional(&mut *transaction)
            .await?;
        let Some(current) = current else {
            return Ok(None);
        };

        // Cleared fields must reach the row as NULL, so the merged profile is written whole.
        let mut student = student_from_row(&current)?;
        changes.apply(&mut student.profile);
        let p = student.profile;

        let row = sqlx::query(
            "UPDATE students SET
                first_name = $2, last_name = $3, phone = $4, date_of_birth = $5, class_id = $6,
                section = $7, roll_number = $8, address = $9, guardian_name = $10,
                guardian_phone = $11, guardian_relation = $12, enrollment_date = $13, status = $14,
                blood_group = $15, previous_school = $16, parent_id = $17, updated_at = now()
            WHERE id = $1 RETURNING *;",
        )
        .bind(id)
        .bind(p.first_name)
        .bind(p.last_name)
        .bind(p.phone)
        .bind(p.date_of_birth)
        .bind(p.class_id)
        .bind(p.section)
        .bind(p.roll_number)
        .bind(p.address)
        .bind(p.guardian_name)
        .bind(p.guardian_phone)
        .bind(p.guardian_relation)
        .bind(p.enrollment_date)
        .bind(p.status.as_str())
        .bind(p.blood_group)
        .bind(p.previous_school)
        .bind(p.parent_id)
        .fetch_one(&mut *transaction)
        .await
        .map_err(|e| map_write_error(e, student.gr_number))?;

        transaction.commit().await?;
        student_from_row(&row).map(Some)
    }

    async fn delete_student(&self, id: i32) -> Result<bool, ApiError> {
        let result = sqlx::query("DELETE FROM students WHERE id = $1;")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn find_student_by_email(&self, email: &str) -> Result<Option<Student>, ApiError> {
        let row = sqlx::query("SELECT * FROM students WHERE email = $1;")
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;

        row.as_ref().map(student_from_row).transpose()
    }

    async fn list_parents(&self) -> Result<Vec<Parent>, ApiError> {
        let rows = sqlx::query("SELECT * FROM parents ORDER BY full_name ASC, id ASC;")
            .fetch_all(&self.pool)
            .await?;

        rows.iter().map(parent_from_row).collect()
    }

    async fn get_parent(&self, id: i32) -> Result<Option<Parent>, ApiError> {
        let row = sqlx::query("SELECT * FROM parents WHERE id = $1;")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        row.as_ref().map(parent_from_row).transpose()
    }

    async fn insert_parent(&self, enrollment: Enrollment<ParentProfile>) -> Result<Parent, ApiError> {
        let identifier = enrollment.identifier;
        let p = enrollment.profile;

        let row = sqlx::query(
            "INSERT INTO parents (
                p_id, email, password_hash, full_name, cnic, phone, address, occupation, gender
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9) RETURNING *;",
        )
        .bind(identifier)
        .bind(enrollment.email)
        .bind(enrollment.password_hash)
        .bind(p.full_name)
        .bind(p.cnic)
        .bind(p.phone)
        .bind(p.address)
        .bind(p.occupation)
        .bind(p.gender.as_str())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_write_error(e, identifier))?;

        parent_from_row(&row)
    }

    async fn update_parent(&self, id: i32, changes: &ParentUpdate) -> Result<Option<Parent>, ApiError> {
        let mut transaction = self.pool.begin().await?;

        let current = sqlx::query("SELECT * FROM parents WHERE id = $1 FOR UPDATE;")
            .bind(id)
            .fetch_optional(&mut *transaction)
            .await?;
        let Some(current) = current else {
            return Ok(None);
        };

        let mut parent = parent_from_row(&current)?;
        changes.apply(&mut parent.profile);
        let p = parent.profile;

        let row = sqlx::query(
            "UPDATE parents SET
                full_name = $2, cnic = $3, phone = $4, address = $5, occupation = $6, gender = $7,
                updated_at = now()
            WHERE id = $1 RETURNING *;",
        )
        .bind(id)
        .bind(p.full_name)
        .bind(p.cnic)
        .bind(p.phone)
        .bind(p.address)
        .bind(p.occupation)
        .bind(p.gender.as_str())
        .fetch_one(&mut *transaction)
        .await
        .map_err(|e| map_write_error(e, parent.p_id))?;

        transaction.commit().await?;
        parent_from_row(&row).map(Some)
    }

    async fn delete_parent(&self, id: i32) -> Result<bool, ApiError> {
        let result = sqlx::query("DELETE FROM parents WHERE id = $1;")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn find_parent_by_email(&self, email: &str) -> Result<Option<Parent>, ApiError> {
        let row = sqlx::query("SELECT * FROM parents WHERE email = $1;")
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;

        row.as_ref().map(parent_from_row).transpose()
    }

    async fn list_staff(&self, kind: StaffKind) -> Result<Vec<StaffMember>, ApiError> {
        let rows = sqlx::query("SELECT * FROM staff WHERE kind = $1 ORDER BY created_at DESC, id DESC;")
            .bind(kind.as_str())
            .fetch_all(&self.pool)
            .await?;

        rows.iter().map(staff_from_row).collect()
    }

    async fn insert_staff(&self, kind: StaffKind, profile: StaffProfile) -> Result<StaffMember, ApiError> {
        let p = profile;
        let (ec_name, ec_phone, ec_relation) = match p.emergency_contact {
            Some(ec) => (Some(ec.name), Some(ec.phone), Some(ec.relation)),
            None => (None, None, None),
        };

        let row = sqlx::query(
            "INSERT INTO staff (
                kind, first_name, last_name, email, phone, date_of_birth, qualification, experience,
                subject, address, salary, joining_date, status, ec_name, ec_phone, ec_relation,
                nic_number, gender, staff_category
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17, $18, $19)
            RETURNING *;",
        )
        .bind(kind.as_str())
        .bind(p.first_name)
        .bind(p.last_name)
        .bind(p.email)
        .bind(p.phone)
        .bind(p.date_of_birth)
        .bind(p.qualification)
        .bind(p.experience)
        .bind(p.subject)
        .bind(p.address)
        .bind(p.salary)
        .bind(p.joining_date)
        .bind(p.status.as_str())
        .bind(ec_name)
        .bind(ec_phone)
        .bind(ec_relation)
        .bind(p.nic_number)
        .bind(p.gender.map(|g| g.as_str()))
        .bind(p.staff_category.map(|c| c.as_str()))
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_staff_error(e, kind))?;

        staff_from_row(&row)
    }

    async fn update_staff(
        &self,
        kind: StaffKind,
        id: i32,
        changes: &StaffUpdate,
    ) -> Result<Option<StaffMember>, ApiError> {
        let mut transaction = self.pool.begin().await?;

        let current = sqlx::query("SELECT * FROM staff WHERE kind = $1 AND id = $2 FOR UPDATE;")
            .bind(kind.as_str())
            .bind(id)
            .fetch_optional(&mut *transaction)
            .await?;
        let Some(current) = current else {
            return Ok(None);
        };

        let mut member = staff_from_row(&current)?;
        changes.apply(&mut member.profile);
        let p = member.profile;
        let (ec_name, ec_phone, ec_relation) = match p.emergency_contact {
            Some(ec) => (Some(ec.name), Some(ec.phone), Some(ec.relation)),
            None => (None, None, None),
        };

        let row = sqlx::query(
            "UPDATE staff SET
                first_name = $3, last_name = $4, email = $5, phone = $6, date_of_birth = $7,
                qualification = $8, experience = $9, subject = $10, address = $11, salary = $12,
                joining_date = $13, status = $14, ec_name = $15, ec_phone = $16,
                ec_relation = $17, nic_number = $18, gender = $19, staff_category = $20,
                updated_at = now()
            WHERE kind = $1 AND id = $2 RETURNING *;",
        )
        .bind(kind.as_str())
        .bind(id)
        .bind(p.first_name)
        .bind(p.last_name)
        .bind(p.email)
        .bind(p.phone)
        .bind(p.date_of_birth)
        .bind(p.qualification)
        .bind(p.experience)
        .bind(p.subject)
        .bind(p.address)
        .bind(p.salary)
        .bind(p.joining_date)
        .bind(p.status.as_str())
        .bind(ec_name)
        .bind(ec_phone)
        .bind(ec_relation)
        .bind(p.nic_number)
        .bind(p.gender.map(|g| g.as_str()))
        .bind(p.staff_category.map(|c| c.as_str()))
        .fetch_one(&mut *transaction)
        .await
        .map_err(|e| map_staff_error(e, kind))?;

        transaction.commit().await?;
        staff_from_row(&row).map(Some)
    }

    async fn delete_staff(&self, kind: StaffKind, id: i32) -> Result<bool, ApiError> {
        let result = sqlx::query("DELETE FROM staff WHERE kind = $1 AND id = $2;")
            .bind(kind.as_str())
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn summary(&self) -> Result<Summary, ApiError> {
        let row = sqlx::query(
            "SELECT
                (SELECT COUNT(*) FROM students) AS students,
                (SELECT COUNT(*) FROM classes) AS classes,
                (SELECT COUNT(*) FROM staff WHERE kind = 'teacher') AS teachers,
                (SELECT COUNT(*) FROM parents) AS parents,
                (SELECT COUNT(*) FROM staff WHERE kind = 'employee') AS employees;",
        )
        .fetch_one(&self.pool)
        .await?;

        Ok(Summary {
            students: row.try_get("students")?,
            classes: row.try_get("classes")?,
            teachers: row.try_get("teachers")?,
            parents: row.try_get("parents")?,
            employees: row.try_get("employees")?,
        })
    }
}
