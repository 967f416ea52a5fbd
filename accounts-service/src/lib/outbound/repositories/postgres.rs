use async_trait::async_trait;
use chrono::DateTime;
use chrono::Utc;
use sqlx::PgPool;
use sqlx::Postgres;
use sqlx::QueryBuilder;
use uuid::Uuid;

use crate::domain::user::models::EmailAddress;
use crate::domain::user::models::NewUser;
use crate::domain::user::models::User;
use crate::domain::user::models::UserFilter;
use crate::domain::user::models::UserId;
use crate::domain::user::models::Username;
use crate::domain::user::ports::UserRepository;
use crate::user::errors::UserError;

const SELECT_ACCOUNT: &str = r#"
    SELECT id, username, email, password_hash, phone, first_name, last_name,
           role, created_at, updated_at
    FROM accounts
"#;

#[derive(Debug, sqlx::FromRow)]
struct AccountRow {
    id: Uuid,
    username: String,
    email: String,
    password_hash: String,
    phone: Option<String>,
    first_name: Option<String>,
    last_name: Option<String>,
    role: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<AccountRow> for User {
    type Error = UserError;

    fn try_from(r: AccountRow) -> Result<Self, Self::Error> {
        Ok(User {
            id: UserId(r.id),
            username: Username::new(r.username)?,
            email: EmailAddress::new(r.email)?,
            password_hash: r.password_hash,
            phone: r.phone,
            first_name: r.first_name,
            last_name: r.last_name,
            role: r.role.parse()?,
            created_at: r.created_at,
            updated_at: r.updated_at,
        })
    }
}

pub struct PostgresUserRepository {
    pool: PgPool,
}

impl PostgresUserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn find_one(&self, column: &str, value: String) -> Result<Option<User>, UserError> {
        let sql = format!("{SELECT_ACCOUNT} WHERE {column} = $1");

        sqlx::query_as::<_, AccountRow>(&sql)
            .bind(value)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| UserError::DatabaseError(e.to_string()))?
            .map(User::try_from)
            .transpose()
    }
}

/// Map unique violations on username/email to their domain errors.
fn map_write_error(e: sqlx::Error, user: &User) -> UserError {
    if let Some(db_err) = e.as_database_error() {
        if db_err.is_unique_violation() {
            if db_err.constraint() == Some("accounts_username_key") {
                return UserError::UsernameAlreadyExists(user.username.as_str().to_string());
            }
            if db_err.constraint() == Some("accounts_email_key") {
                return UserError::EmailAlreadyExists(user.email.as_str().to_string());
            }
        }
    }
    UserError::DatabaseError(e.to_string())
}

/// `%needle%` for ILIKE, with the pattern metacharacters escaped.
fn like_pattern(needle: &str) -> String {
    let escaped = needle
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    format!("%{escaped}%")
}

fn rows_into_users(rows: Vec<AccountRow>) -> Result<Vec<User>, UserError> {
    rows.into_iter().map(User::try_from).collect()
}

#[async_trait]
impl UserRepository for PostgresUserRepository {
    async fn create(&self, user: NewUser) -> Result<User, UserError> {
        let user = User::register(user);

        sqlx::query(
            r#"
            INSERT INTO accounts (id, username, email, password_hash, role, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(user.id.0)
        .bind(user.username.as_str())
        .bind(user.email.as_str())
        .bind(&user.password_hash)
        .bind(user.role.as_str())
        .bind(user.created_at)
        .bind(user.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| map_write_error(e, &user))?;

        Ok(user)
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserError> {
        let sql = format!("{SELECT_ACCOUNT} WHERE id = $1");

        sqlx::query_as::<_, AccountRow>(&sql)
            .bind(id.0)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| UserError::DatabaseError(e.to_string()))?
            .map(User::try_from)
            .transpose()
    }

    async fn find_by_username(&self, username: &Username) -> Result<Option<User>, UserError> {
        self.find_one("username", username.as_str().to_string())
            .await
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, UserError> {
        self.find_one("email", email.to_string()).await
    }

    async fn update(&self, mut user: User) -> Result<User, UserError> {
        user.updated_at = Utc::now();

        let result = sqlx::query(
            r#"
            UPDATE accounts
            SET username = $2, email = $3, password_hash = $4, phone = $5,
                first_name = $6, last_name = $7, role = $8, updated_at = $9
            WHERE id = $1
            "#,
        )
        .bind(user.id.0)
        .bind(user.username.as_str())
        .bind(user.email.as_str())
        .bind(&user.password_hash)
        .bind(&user.phone)
        .bind(&user.first_name)
        .bind(&user.last_name)
        .bind(user.role.as_str())
        .bind(user.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| map_write_error(e, &user))?;

        if result.rows_affected() == 0 {
            return Err(UserError::NotFound(user.id.to_string()));
        }

        Ok(user)
    }

    async fn delete(&self, id: &UserId) -> Result<(), UserError> {
        let result = sqlx::query("DELETE FROM accounts WHERE id = $1")
            .bind(id.0)
            .execute(&self.pool)
            .await
            .map_err(|e| UserError::DatabaseError(e.to_string()))?;

        if result.rows_affected() == 0 {
            return Err(UserError::NotFound(id.to_string()));
        }

        Ok(())
    }

    async fn list(&self, limit: i64, offset: i64) -> Result<Vec<User>, UserError> {
        let sql = format!("{SELECT_ACCOUNT} ORDER BY created_at DESC LIMIT $1 OFFSET $2");

        let rows = sqlx::query_as::<_, AccountRow>(&sql)
            .bind(limit)
            .bind(offset)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| UserError::DatabaseError(e.to_string()))?;

        rows_into_users(rows)
    }

    async fn count(&self) -> Result<i64, UserError> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM accounts")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| UserError::DatabaseError(e.to_string()))
    }

    async fn filter(&self, filter: &UserFilter) -> Result<Vec<User>, UserError> {
        let mut query: QueryBuilder<Postgres> = QueryBuilder::new(SELECT_ACCOUNT);
        query.push(" WHERE 1=1");

        if let Some(username) = &filter.username {
            query.push(" AND username ILIKE ").push_bind(like_pattern(username));
        }
        if let Some(email) = &filter.email {
            query.push(" AND email ILIKE ").push_bind(like_pattern(email));
        }
        if let Some(phone) = &filter.phone {
            query.push(" AND phone ILIKE ").push_bind(like_pattern(phone));
        }
        if let Some(t) = filter.created_before {
            query.push(" AND created_at < ").push_bind(t);
        }
        if let Some(t) = filter.created_after {
            query.push(" AND created_at > ").push_bind(t);
        }
        if let Some(t) = filter.updated_before {
            query.push(" AND updated_at < ").push_bind(t);
        }
        if let Some(t) = filter.updated_after {
            query.push(" AND updated_at > ").push_bind(t);
        }

        query
            .push(" ORDER BY created_at DESC LIMIT ")
            .push_bind(filter.limit)
            .push(" OFFSET ")
            .push_bind(filter.offset);

        let rows = query
            .build_query_as::<AccountRow>()
            .fetch_all(&self.pool)
            .await
            .map_err(|e| UserError::DatabaseError(e.to_string()))?;

        rows_into_users(rows)
    }
}
