use std::str::FromStr;
use std::time::Duration;

use chrono::Utc;
use r2d2::Pool;
use r2d2_sqlite::SqliteConnectionManager;
use rusqlite::types::{FromSql, FromSqlError, FromSqlResult, ToSql, ToSqlOutput, ValueRef};
use rusqlite::{params, params_from_iter, Connection, OptionalExtension, Row, TransactionBehavior};
use tracing::debug;

use super::schema::{FILE_PRAGMAS, SCHEMA};
use super::{
    NewActivity, NewInterview, NewJobOffer, NewRecruit, NewRecruiter, NewUser,
    PendingApplication, Store, StoreError, UnitOfWork, SEARCH_PAGE_SIZE,
};
use crate::config::DatabaseConfig;
use crate::talent::domain::{
    ActivityLog, Application, ApplicationId, ApplicationStatus, Company, CompanyDraft, CompanyId,
    Interview, InterviewId, JobOffer, JobOfferFilter, JobOfferId, JobOfferListing, Recruit,
    RecruitId, Recruiter, RecruiterId, RecruiterRole, Role, UnknownVariant, User, UserId,
};

const USER_COLUMNS: &str = "id, email, password_hash, role, created_at";
const RECRUITER_COLUMNS: &str =
    "id, user_id, company_id, role, firstname, lastname, phone, created_at";
const RECRUIT_COLUMNS: &str = "id, user_id, firstname, lastname, email_address, phone, created_at";
const COMPANY_COLUMNS: &str =
    "id, name, industry, phone_number, email_address, address, website, created_at";
const JOB_OFFER_COLUMNS: &str =
    "j.id, j.company_id, j.title, j.description, j.location, j.salary, j.experience, j.created_at";
const APPLICATION_COLUMNS: &str = "a.id, a.recruit_id, a.job_offer_id, a.status, a.created_at";
const INTERVIEW_COLUMNS: &str = "i.id, i.application_id, i.recruit_id, i.job_offer_id, \
     i.location, i.date, i.phone, i.email, i.online, i.start_time, i.join_meeting_url, \
     i.start_meeting_url, i.created_at, i.updated_at";

/// SQLite-backed store over an r2d2 connection pool.
#[derive(Clone)]
pub struct SqliteStore {
    pool: Pool<SqliteConnectionManager>,
}

impl SqliteStore {
    pub fn open(config: &DatabaseConfig) -> Result<Self, StoreError> {
        if config.is_in_memory() {
            return Self::in_memory();
        }

        let manager = SqliteConnectionManager::file(&config.url)
            .with_init(|conn| conn.execute_batch(FILE_PRAGMAS));
        let pool = Pool::builder()
            .max_size(config.pool_size.max(1))
            .connection_timeout(Duration::from_secs(5))
            .build(manager)?;
        pool.get()?.execute_batch(SCHEMA)?;

        debug!(path = %config.url, pool_size = config.pool_size, "opened sqlite store");
        Ok(Self { pool })
    }

    /// Private in-memory database. The pool holds exactly one connection that
    /// is never recycled, so the data lives as long as the store.
    pub fn in_memory() -> Result<Self, StoreError> {
        let manager = SqliteConnectionManager::memory().with_init(|conn| conn.execute_batch(SCHEMA));
        let pool = Pool::builder()
            .max_size(1)
            .min_idle(Some(1))
            .idle_timeout(None)
            .max_lifetime(None)
            .connection_timeout(Duration::from_secs(5))
            .build(manager)?;
        Ok(Self { pool })
    }
}

impl Store for SqliteStore {
    fn read<T, E, F>(&self, work: F) -> Result<T, E>
    where
        F: FnOnce(&dyn UnitOfWork) -> Result<T, E>,
        E: From<StoreError>,
    {
        let mut conn = self.pool.get().map_err(StoreError::from)?;
        let tx = conn.transaction().map_err(StoreError::from)?;
        let unit = SqliteUnit::new(&tx);
        work(&unit)
    }

    fn write<T, E, F>(&self, work: F) -> Result<T, E>
    where
        F: FnOnce(&dyn UnitOfWork) -> Result<T, E>,
        E: From<StoreError>,
    {
        let mut conn = self.pool.get().map_err(StoreError::from)?;
        let tx = conn
            .transaction_with_behavior(TransactionBehavior::Immediate)
            .map_err(StoreError::from)?;
        let value = work(&SqliteUnit::new(&tx))?;
        tx.commit().map_err(StoreError::from)?;
        Ok(value)
    }
}

struct SqliteUnit<'a> {
    conn: &'a Connection,
}

impl<'a> SqliteUnit<'a> {
    fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    fn query_one<T>(
        &self,
        sql: &str,
        params: impl rusqlite::Params,
        map: fn(&Row<'_>) -> rusqlite::Result<T>,
    ) -> Result<Option<T>, StoreError> {
        Ok(self.conn.query_row(sql, params, map).optional()?)
    }

    fn query_all<T>(
        &self,
        sql: &str,
        params: impl rusqlite::Params,
        map: fn(&Row<'_>) -> rusqlite::Result<T>,
    ) -> Result<Vec<T>, StoreError> {
        let mut stmt = self.conn.prepare(sql)?;
        let rows = stmt.query_map(params, map)?;
        Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
    }
}

fn row_to_user(row: &Row<'_>) -> rusqlite::Result<User> {
    Ok(User {
        id: row.get(0)?,
        email: row.get(1)?,
        password_hash: row.get(2)?,
        role: row.get(3)?,
        created_at: row.get(4)?,
    })
}

fn row_to_recruiter(row: &Row<'_>) -> rusqlite::Result<Recruiter> {
    Ok(Recruiter {
        id: row.get(0)?,
        user_id: row.get(1)?,
        company_id: row.get(2)?,
        role: row.get(3)?,
        firstname: row.get(4)?,
        lastname: row.get(5)?,
        phone: row.get(6)?,
        created_at: row.get(7)?,
    })
}

fn row_to_recruit(row: &Row<'_>) -> rusqlite::Result<Recruit> {
    Ok(Recruit {
        id: row.get(0)?,
        user_id: row.get(1)?,
        firstname: row.get(2)?,
        lastname: row.get(3)?,
        email_address: row.get(4)?,
        phone: row.get(5)?,
        created_at: row.get(6)?,
    })
}

fn row_to_company(row: &Row<'_>) -> rusqlite::Result<Company> {
    Ok(Company {
        id: row.get(0)?,
        name: row.get(1)?,
        industry: row.get(2)?,
        phone_number: row.get(3)?,
        email_address: row.get(4)?,
        address: row.get(5)?,
        website: row.get(6)?,
        created_at: row.get(7)?,
    })
}

fn row_to_job_offer(row: &Row<'_>) -> rusqlite::Result<JobOffer> {
    Ok(JobOffer {
        id: row.get(0)?,
        company_id: row.get(1)?,
        title: row.get(2)?,
        description: row.get(3)?,
        location: row.get(4)?,
        salary: row.get(5)?,
        experience: row.get(6)?,
        created_at: row.get(7)?,
    })
}

fn row_to_listing(row: &Row<'_>) -> rusqlite::Result<JobOfferListing> {
    Ok(JobOfferListing {
        offer: row_to_job_offer(row)?,
        company_name: row.get(8)?,
    })
}

fn row_to_application(row: &Row<'_>) -> rusqlite::Result<Application> {
    Ok(Application {
        id: row.get(0)?,
        recruit_id: row.get(1)?,
        job_offer_id: row.get(2)?,
        status: row.get(3)?,
        created_at: row.get(4)?,
    })
}

fn row_to_interview(row: &Row<'_>) -> rusqlite::Result<Interview> {
    Ok(Interview {
        id: row.get(0)?,
        application_id: row.get(1)?,
        recruit_id: row.get(2)?,
        job_offer_id: row.get(3)?,
        location: row.get(4)?,
        date: row.get(5)?,
        phone: row.get(6)?,
        email: row.get(7)?,
        online: row.get(8)?,
        start_time: row.get(9)?,
        join_meeting_url: row.get(10)?,
        start_meeting_url: row.get(11)?,
        created_at: row.get(12)?,
        updated_at: row.get(13)?,
    })
}

fn row_to_activity(row: &Row<'_>) -> rusqlite::Result<ActivityLog> {
    Ok(ActivityLog {
        id: row.get(0)?,
        user_id: row.get(1)?,
        action: row.get(2)?,
        description: row.get(3)?,
        created_at: row.get(4)?,
    })
}

/// `%term%` with LIKE wildcards in the term escaped.
fn contains_pattern(term: &str) -> String {
    let mut pattern = String::with_capacity(term.len() + 2);
    pattern.push('%');
    for ch in term.trim().chars() {
        if matches!(ch, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(ch);
    }
    pattern.push('%');
    pattern
}

impl UnitOfWork for SqliteUnit<'_> {
    fn insert_user(&self, user: &NewUser<'_>) -> Result<User, StoreError> {
        let created_at = Utc::now();
        self.conn.execute(
            "INSERT INTO users (email, password_hash, role, created_at) VALUES (?1, ?2, ?3, ?4)",
            params![user.email, user.password_hash, user.role, created_at],
        )?;
        Ok(User {
            id: self.conn.last_insert_rowid(),
            email: user.email.to_string(),
            password_hash: user.password_hash.to_string(),
            role: user.role,
            created_at,
        })
    }

    fn user(&self, id: UserId) -> Result<Option<User>, StoreError> {
        self.query_one(
            &format!("SELECT {USER_COLUMNS} FROM users WHERE id = ?1"),
            params![id],
            row_to_user,
        )
    }

    fn user_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        self.query_one(
            &format!("SELECT {USER_COLUMNS} FROM users WHERE email = ?1"),
            params![email],
            row_to_user,
        )
    }

    fn users(&self) -> Result<Vec<User>, StoreError> {
        self.query_all(
            &format!("SELECT {USER_COLUMNS} FROM users ORDER BY id"),
            [],
            row_to_user,
        )
    }

    fn save_user(&self, user: &User) -> Result<(), StoreError> {
        self.conn.execute(
            "UPDATE users SET email = ?2, password_hash = ?3, role = ?4 WHERE id = ?1",
            params![user.id, user.email, user.password_hash, user.role],
        )?;
        Ok(())
    }

    fn delete_user(&self, id: UserId) -> Result<usize, StoreError> {
        Ok(self
            .conn
            .execute("DELETE FROM users WHERE id = ?1", params![id])?)
    }

    fn insert_recruiter(&self, recruiter: &NewRecruiter<'_>) -> Result<Recruiter, StoreError> {
        let created_at = Utc::now();
        self.conn.execute(
            "INSERT INTO recruiters (user_id, company_id, role, firstname, lastname, phone, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                recruiter.user_id,
                recruiter.company_id,
                recruiter.role,
                recruiter.firstname,
                recruiter.lastname,
                recruiter.phone,
                created_at
            ],
        )?;
        Ok(Recruiter {
            id: self.conn.last_insert_rowid(),
            user_id: recruiter.user_id,
            company_id: recruiter.company_id,
            role: recruiter.role,
            firstname: recruiter.firstname.to_string(),
            lastname: recruiter.lastname.to_string(),
            phone: recruiter.phone.map(str::to_string),
            created_at,
        })
    }

    fn recruiter(&self, id: RecruiterId) -> Result<Option<Recruiter>, StoreError> {
        self.query_one(
            &format!("SELECT {RECRUITER_COLUMNS} FROM recruiters WHERE id = ?1"),
            params![id],
            row_to_recruiter,
        )
    }

    fn recruiter_for_user(&self, user_id: UserId) -> Result<Option<Recruiter>, StoreError> {
        self.query_one(
            &format!("SELECT {RECRUITER_COLUMNS} FROM recruiters WHERE user_id = ?1"),
            params![user_id],
            row_to_recruiter,
        )
    }

    fn save_recruiter(&self, recruiter: &Recruiter) -> Result<(), StoreError> {
        self.conn.execute(
            "UPDATE recruiters
             SET company_id = ?2, role = ?3, firstname = ?4, lastname = ?5, phone = ?6
             WHERE id = ?1",
            params![
                recruiter.id,
                recruiter.company_id,
                recruiter.role,
                recruiter.firstname,
                recruiter.lastname,
                recruiter.phone
            ],
        )?;
        Ok(())
    }

    fn delete_recruiter(&self, id: RecruiterId) -> Result<usize, StoreError> {
        Ok(self
            .conn
            .execute("DELETE FROM recruiters WHERE id = ?1", params![id])?)
    }

    fn insert_recruit(&self, recruit: &NewRecruit<'_>) -> Result<Recruit, StoreError> {
        let created_at = Utc::now();
        self.conn.execute(
            "INSERT INTO recruits (user_id, firstname, lastname, email_address, phone, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                recruit.user_id,
                recruit.firstname,
                recruit.lastname,
                recruit.email_address,
                recruit.phone,
                created_at
            ],
        )?;
        Ok(Recruit {
            id: self.conn.last_insert_rowid(),
            user_id: recruit.user_id,
            firstname: recruit.firstname.to_string(),
            lastname: recruit.lastname.to_string(),
            email_address: recruit.email_address.to_string(),
            phone: recruit.phone.map(str::to_string),
            created_at,
        })
    }

    fn recruit(&self, id: RecruitId) -> Result<Option<Recruit>, StoreError> {
        self.query_one(
            &format!("SELECT {RECRUIT_COLUMNS} FROM recruits WHERE id = ?1"),
            params![id],
            row_to_recruit,
        )
    }

    fn recruit_for_user(&self, user_id: UserId) -> Result<Option<Recruit>, StoreError> {
        self.query_one(
            &format!("SELECT {RECRUIT_COLUMNS} FROM recruits WHERE user_id = ?1"),
            params![user_id],
            row_to_recruit,
        )
    }

    fn save_recruit(&self, recruit: &Recruit) -> Result<(), StoreError> {
        self.conn.execute(
            "UPDATE recruits
             SET firstname = ?2, lastname = ?3, email_address = ?4, phone = ?5
             WHERE id = ?1",
            params![
                recruit.id,
                recruit.firstname,
                recruit.lastname,
                recruit.email_address,
                recruit.phone
            ],
        )?;
        Ok(())
    }

    fn delete_recruit(&self, id: RecruitId) -> Result<usize, StoreError> {
        Ok(self
            .conn
            .execute("DELETE FROM recruits WHERE id = ?1", params![id])?)
    }

    fn insert_company(&self, company: &CompanyDraft) -> Result<Company, StoreError> {
        let created_at = Utc::now();
        self.conn.execute(
            "INSERT INTO companies
             (name, industry, phone_number, email_address, address, website, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                company.name,
                company.industry,
                company.phone_number,
                company.email_address,
                company.address,
                company.website,
                created_at
            ],
        )?;
        Ok(Company {
            id: self.conn.last_insert_rowid(),
            name: company.name.clone(),
            industry: company.industry.clone(),
            phone_number: company.phone_number.clone(),
            email_address: company.email_address.clone(),
            address: company.address.clone(),
            website: company.website.clone(),
            created_at,
        })
    }

    fn company(&self, id: CompanyId) -> Result<Option<Company>, StoreError> {
        self.query_one(
            &format!("SELECT {COMPANY_COLUMNS} FROM companies WHERE id = ?1"),
            params![id],
            row_to_company,
        )
    }

    fn companies(&self) -> Result<Vec<Company>, StoreError> {
        self.query_all(
            &format!("SELECT {COMPANY_COLUMNS} FROM companies ORDER BY id"),
            [],
            row_to_company,
        )
    }

    fn save_company(&self, company: &Company) -> Result<(), StoreError> {
        self.conn.execute(
            "UPDATE companies
             SET name = ?2, industry = ?3, phone_number = ?4, email_address = ?5,
                 address = ?6, website = ?7
             WHERE id = ?1",
            params![
                company.id,
                company.name,
                company.industry,
                company.phone_number,
                company.email_address,
                company.address,
                company.website
            ],
        )?;
        Ok(())
    }

    fn delete_company(&self, id: CompanyId) -> Result<usize, StoreError> {
        Ok(self
            .conn
            .execute("DELETE FROM companies WHERE id = ?1", params![id])?)
    }

    fn insert_job_offer(&self, offer: &NewJobOffer<'_>) -> Result<JobOffer, StoreError> {
        let created_at = Utc::now();
        self.conn.execute(
            "INSERT INTO job_offers
             (company_id, title, description, location, salary, experience, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                offer.company_id,
                offer.title,
                offer.description,
                offer.location,
                offer.salary,
                offer.experience,
                created_at
            ],
        )?;
        Ok(JobOffer {
            id: self.conn.last_insert_rowid(),
            company_id: offer.company_id,
            title: offer.title.to_string(),
            description: offer.description.to_string(),
            location: offer.location.to_string(),
            salary: offer.salary,
            experience: offer.experience.to_string(),
            created_at,
        })
    }

    fn job_offer(&self, id: JobOfferId) -> Result<Option<JobOffer>, StoreError> {
        self.query_one(
            &format!("SELECT {JOB_OFFER_COLUMNS} FROM job_offers j WHERE j.id = ?1"),
            params![id],
            row_to_job_offer,
        )
    }

    fn job_offer_in_company(
        &self,
        id: JobOfferId,
        company_id: CompanyId,
    ) -> Result<Option<JobOffer>, StoreError> {
        self.query_one(
            &format!(
                "SELECT {JOB_OFFER_COLUMNS} FROM job_offers j WHERE j.id = ?1 AND j.company_id = ?2"
            ),
            params![id, company_id],
            row_to_job_offer,
        )
    }

    fn job_offers_in_company(&self, company_id: CompanyId) -> Result<Vec<JobOffer>, StoreError> {
        self.query_all(
            &format!(
                "SELECT {JOB_OFFER_COLUMNS} FROM job_offers j WHERE j.company_id = ?1 ORDER BY j.id"
            ),
            params![company_id],
            row_to_job_offer,
        )
    }

    fn search_job_offers(
        &self,
        filter: &JobOfferFilter,
    ) -> Result<Vec<JobOfferListing>, StoreError> {
        let mut clauses = Vec::new();
        let mut values = Vec::new();
        for (column, term) in [
            ("j.title", &filter.title),
            ("j.location", &filter.location),
            ("c.name", &filter.company),
        ] {
            if let Some(term) = term.as_deref().filter(|term| !term.trim().is_empty()) {
                clauses.push(format!("{column} LIKE ? ESCAPE '\\'"));
                values.push(contains_pattern(term));
            }
        }

        let condition = if clauses.is_empty() {
            String::new()
        } else {
            format!("WHERE {}", clauses.join(" AND "))
        };
        let page = filter.page.unwrap_or(1).max(1);
        let offset = u64::from(page - 1) * u64::from(SEARCH_PAGE_SIZE);
        let sql = format!(
            "SELECT {JOB_OFFER_COLUMNS}, COALESCE(c.name, '')
             FROM job_offers j LEFT JOIN companies c ON c.id = j.company_id
             {condition}
             ORDER BY j.id
             LIMIT {SEARCH_PAGE_SIZE} OFFSET {offset}"
        );

        self.query_all(&sql, params_from_iter(values.iter()), row_to_listing)
    }

    fn save_job_offer(&self, offer: &JobOffer) -> Result<usize, StoreError> {
        Ok(self.conn.execute(
            "UPDATE job_offers
             SET title = ?3, description = ?4, location = ?5, salary = ?6, experience = ?7
             WHERE id = ?1 AND company_id = ?2",
            params![
                offer.id,
                offer.company_id,
                offer.title,
                offer.description,
                offer.location,
                offer.salary,
                offer.experience
            ],
        )?)
    }

    fn delete_job_offer(
        &self,
        id: JobOfferId,
        company_id: CompanyId,
    ) -> Result<usize, StoreError> {
        Ok(self.conn.execute(
            "DELETE FROM job_offers WHERE id = ?1 AND company_id = ?2",
            params![id, company_id],
        )?)
    }

    fn insert_application(
        &self,
        recruit_id: RecruitId,
        job_offer_id: JobOfferId,
        status: ApplicationStatus,
    ) -> Result<Application, StoreError> {
        let created_at = Utc::now();
        self.conn.execute(
            "INSERT INTO applications (recruit_id, job_offer_id, status, created_at)
             VALUES (?1, ?2, ?3, ?4)",
            params![recruit_id, job_offer_id, status, created_at],
        )?;
        Ok(Application {
            id: self.conn.last_insert_rowid(),
            recruit_id,
            job_offer_id,
            status,
            created_at,
        })
    }

    fn application(&self, id: ApplicationId) -> Result<Option<Application>, StoreError> {
        self.query_one(
            &format!("SELECT {APPLICATION_COLUMNS} FROM applications a WHERE a.id = ?1"),
            params![id],
            row_to_application,
        )
    }

    fn applications(&self) -> Result<Vec<Application>, StoreError> {
        self.query_all(
            &format!("SELECT {APPLICATION_COLUMNS} FROM applications a ORDER BY a.id"),
            [],
            row_to_application,
        )
    }

    fn applications_for_recruit(
        &self,
        recruit_id: RecruitId,
    ) -> Result<Vec<Application>, StoreError> {
        self.query_all(
            &format!(
                "SELECT {APPLICATION_COLUMNS} FROM applications a WHERE a.recruit_id = ?1 ORDER BY a.id"
            ),
            params![recruit_id],
            row_to_application,
        )
    }

    fn applications_for_offer(
        &self,
        job_offer_id: JobOfferId,
        company_id: CompanyId,
    ) -> Result<Vec<Application>, StoreError> {
        self.query_all(
            &format!(
                "SELECT {APPLICATION_COLUMNS}
                 FROM applications a JOIN job_offers j ON j.id = a.job_offer_id
                 WHERE a.job_offer_id = ?1 AND j.company_id = ?2
                 ORDER BY a.id"
            ),
            params![job_offer_id, company_id],
            row_to_application,
        )
    }

    fn pending_applications(
        &self,
        job_offer_id: JobOfferId,
        company_id: CompanyId,
    ) -> Result<Vec<PendingApplication>, StoreError> {
        self.query_all(
            "SELECT a.id, r.user_id
             FROM applications a
             JOIN job_offers j ON j.id = a.job_offer_id
             LEFT JOIN recruits r ON r.id = a.recruit_id
             WHERE a.job_offer_id = ?1 AND j.company_id = ?2 AND a.status = 'pending'
             ORDER BY a.id",
            params![job_offer_id, company_id],
            |row| {
                Ok(PendingApplication {
                    application_id: row.get(0)?,
                    recruit_user_id: row.get(1)?,
                })
            },
        )
    }

    fn reject_pending_applications(
        &self,
        job_offer_id: JobOfferId,
        company_id: CompanyId,
    ) -> Result<usize, StoreError> {
        Ok(self.conn.execute(
            "UPDATE applications SET status = 'rejected'
             WHERE job_offer_id = ?1 AND status = 'pending'
               AND EXISTS (SELECT 1 FROM job_offers j WHERE j.id = ?1 AND j.company_id = ?2)",
            params![job_offer_id, company_id],
        )?)
    }

    fn set_application_status(
        &self,
        id: ApplicationId,
        status: ApplicationStatus,
    ) -> Result<usize, StoreError> {
        Ok(self.conn.execute(
            "UPDATE applications SET status = ?2 WHERE id = ?1",
            params![id, status],
        )?)
    }

    fn delete_application(&self, id: ApplicationId) -> Result<usize, StoreError> {
        Ok(self
            .conn
            .execute("DELETE FROM applications WHERE id = ?1", params![id])?)
    }

    fn insert_interview(&self, interview: &NewInterview) -> Result<Interview, StoreError> {
        let created_at = Utc::now();
        self.conn.execute(
            "INSERT INTO interviews
             (application_id, recruit_id, job_offer_id, location, date, phone, email, online,
              start_time, join_meeting_url, start_meeting_url, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?12)",
            params![
                interview.application_id,
                interview.recruit_id,
                interview.job_offer_id,
                interview.location,
                interview.date,
                interview.phone,
                interview.email,
                interview.online,
                interview.start_time,
                interview.join_meeting_url,
                interview.start_meeting_url,
                created_at
            ],
        )?;
        Ok(Interview {
            id: self.conn.last_insert_rowid(),
            application_id: interview.application_id,
            recruit_id: interview.recruit_id,
            job_offer_id: interview.job_offer_id,
            location: interview.location.clone(),
            date: interview.date,
            phone: interview.phone.clone(),
            email: interview.email.clone(),
            online: interview.online,
            start_time: interview.start_time.clone(),
            join_meeting_url: interview.join_meeting_url.clone(),
            start_meeting_url: interview.start_meeting_url.clone(),
            created_at,
            updated_at: created_at,
        })
    }

    fn interview(&self, id: InterviewId) -> Result<Option<Interview>, StoreError> {
        self.query_one(
            &format!("SELECT {INTERVIEW_COLUMNS} FROM interviews i WHERE i.id = ?1"),
            params![id],
            row_to_interview,
        )
    }

    fn interviews(&self) -> Result<Vec<Interview>, StoreError> {
        self.query_all(
            &format!("SELECT {INTERVIEW_COLUMNS} FROM interviews i ORDER BY i.date, i.id"),
            [],
            row_to_interview,
        )
    }

    fn interviews_for_recruit(&self, recruit_id: RecruitId) -> Result<Vec<Interview>, StoreError> {
        self.query_all(
            &format!(
                "SELECT {INTERVIEW_COLUMNS} FROM interviews i
                 WHERE i.recruit_id = ?1 ORDER BY i.date, i.id"
            ),
            params![recruit_id],
            row_to_interview,
        )
    }

    fn interviews_for_offer(
        &self,
        job_offer_id: JobOfferId,
        company_id: CompanyId,
    ) -> Result<Vec<Interview>, StoreError> {
        self.query_all(
            &format!(
                "SELECT {INTERVIEW_COLUMNS}
                 FROM interviews i JOIN job_offers j ON j.id = i.job_offer_id
                 WHERE i.job_offer_id = ?1 AND j.company_id = ?2
                 ORDER BY i.date, i.id"
            ),
            params![job_offer_id, company_id],
            row_to_interview,
        )
    }

    fn save_interview(&self, interview: &Interview) -> Result<Interview, StoreError> {
        let updated_at = Utc::now();
        self.conn.execute(
            "UPDATE interviews
             SET location = ?2, date = ?3, phone = ?4, email = ?5, online = ?6, start_time = ?7,
                 join_meeting_url = ?8, start_meeting_url = ?9, updated_at = ?10
             WHERE id = ?1",
            params![
                interview.id,
                interview.location,
                interview.date,
                interview.phone,
                interview.email,
                interview.online,
                interview.start_time,
                interview.join_meeting_url,
                interview.start_meeting_url,
                updated_at
            ],
        )?;
        Ok(Interview {
            updated_at,
            ..interview.clone()
        })
    }

    fn delete_interview(&self, id: InterviewId) -> Result<usize, StoreError> {
        Ok(self
            .conn
            .execute("DELETE FROM interviews WHERE id = ?1", params![id])?)
    }

    fn record_activity(&self, entry: &NewActivity<'_>) -> Result<(), StoreError> {
        self.conn.execute(
            "INSERT INTO activity_logs (user_id, action, description, created_at)
             VALUES (?1, ?2, ?3, ?4)",
            params![
                entry.user_id,
                entry.action.as_str(),
                entry.description,
                Utc::now()
            ],
        )?;
        Ok(())
    }

    fn recent_activity(&self, limit: usize) -> Result<Vec<ActivityLog>, StoreError> {
        let limit = i64::try_from(limit).unwrap_or(i64::MAX);
        self.query_all(
            "SELECT id, user_id, action, description, created_at
             FROM activity_logs ORDER BY id DESC LIMIT ?1",
            params![limit],
            row_to_activity,
        )
    }
}

fn parse_tag<T>(value: ValueRef<'_>) -> FromSqlResult<T>
where
    T: FromStr<Err = UnknownVariant>,
{
    value
        .as_str()?
        .parse()
        .map_err(|err: UnknownVariant| FromSqlError::Other(Box::new(err)))
}

impl ToSql for Role {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.as_str()))
    }
}

impl FromSql for Role {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        parse_tag(value)
    }
}

impl ToSql for RecruiterRole {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.as_str()))
    }
}

impl FromSql for RecruiterRole {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        parse_tag(value)
    }
}

impl ToSql for ApplicationStatus {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.as_str()))
    }
}

impl FromSql for ApplicationStatus {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        parse_tag(value)
    }
}
