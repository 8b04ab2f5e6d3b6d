use sqlx::sqlite::SqliteConnectOptions;
use sqlx::{Row, SqlitePool};
use std::str::FromStr;
use std::sync::Arc;

use shared::{Activity, Camper, SignupWithActivity};

/// DbConnection manages database operations
#[derive(Clone)]
pub struct DbConnection {
    pool: Arc<SqlitePool>,
}

impl DbConnection {
    /// Create a new database connection
    pub async fn new(url: &str) -> sqlx::Result<Self> {
        // Create the database file if it doesn't exist and keep SQLite's
        // foreign key enforcement on so cascades and constraints apply
        let options = SqliteConnectOptions::from_str(url)?
            .create_if_missing(true)
            .foreign_keys(true);

        let pool = SqlitePool::connect_with(options).await?;

        // Setup database schema
        Self::setup_schema(&pool).await?;

        Ok(Self { pool: Arc::new(pool) })
    }

    /// Initialize a test database with a unique name
    #[cfg(test)]
    pub async fn init_test() -> sqlx::Result<Self> {
        // Generate a unique database name so every test gets its own store
        let test_id = uuid::Uuid::new_v4().to_string();
        let db_url = format!("sqlite:file:memdb_{}?mode=memory&cache=shared", test_id);

        Self::new(&db_url).await
    }

    /// Set up the required database schema
    async fn setup_schema(pool: &SqlitePool) -> sqlx::Result<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS activities (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                name TEXT NOT NULL,
                difficulty INTEGER NOT NULL
            );
            "#,
        )
        .execute(pool)
        .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS campers (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                name TEXT NOT NULL,
                age INTEGER NOT NULL
            );
            "#,
        )
        .execute(pool)
        .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS signups (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                time INTEGER NOT NULL,
                camper_id INTEGER NOT NULL REFERENCES campers (id) ON DELETE CASCADE,
                activity_id INTEGER NOT NULL REFERENCES activities (id) ON DELETE CASCADE
            );
            "#,
        )
        .execute(pool)
        .await?;

        Ok(())
    }

    /// List all campers ordered by id
    pub async fn list_campers(&self) -> sqlx::Result<Vec<Camper>> {
        let rows = sqlx::query("SELECT id, name, age FROM campers ORDER BY id")
            .fetch_all(&*self.pool)
            .await?;

        let campers = rows
            .iter()
            .map(|row| Camper {
                id: row.get("id"),
                name: row.get("name"),
                age: row.get("age"),
            })
            .collect();
        Ok(campers)
    }

    /// Retrieve a camper by its id
    pub async fn get_camper(&self, id: i64) -> sqlx::Result<Option<Camper>> {
        let row = sqlx::query("SELECT id, name, age FROM campers WHERE id = ?")
            .bind(id)
            .fetch_optional(&*self.pool)
            .await?;

        Ok(row.map(|r| Camper {
            id: r.get("id"),
            name: r.get("name"),
            age: r.get("age"),
        }))
    }

    /// Insert a camper and return it with its assigned id
    pub async fn insert_camper(&self, name: &str, age: i64) -> sqlx::Result<Camper> {
        let result = sqlx::query("INSERT INTO campers (name, age) VALUES (?, ?)")
            .bind(name)
            .bind(age)
            .execute(&*self.pool)
            .await?;

        Ok(Camper {
            id: result.last_insert_rowid(),
            name: name.to_string(),
            age,
        })
    }

    /// Overwrite a camper's mutable fields
    pub async fn update_camper(&self, camper: &Camper) -> sqlx::Result<()> {
        sqlx::query("UPDATE campers SET name = ?, age = ? WHERE id = ?")
            .bind(&camper.name)
            .bind(camper.age)
            .bind(camper.id)
            .execute(&*self.pool)
            .await?;
        Ok(())
    }

    /// List a camper's signups with each signup's activity expanded
    pub async fn signups_for_camper(&self, camper_id: i64) -> sqlx::Result<Vec<SignupWithActivity>> {
        let rows = sqlx::query(
            r#"
            SELECT
                s.id,
                s.time,
                s.camper_id,
                s.activity_id,
                a.name AS activity_name,
                a.difficulty AS activity_difficulty
            FROM signups s
            JOIN activities a ON a.id = s.activity_id
            WHERE s.camper_id = ?
            ORDER BY s.id
            "#,
        )
        .bind(camper_id)
        .fetch_all(&*self.pool)
        .await?;

        let signups = rows
            .iter()
            .map(|row| SignupWithActivity {
                id: row.get("id"),
                time: row.get("time"),
                camper_id: row.get("camper_id"),
                activity_id: row.get("activity_id"),
                activity: Activity {
                    id: row.get("activity_id"),
                    name: row.get("activity_name"),
                    difficulty: row.get("activity_difficulty"),
                },
            })
            .collect();
        Ok(signups)
    }

    /// List all activities ordered by id
    pub async fn list_activities(&self) -> sqlx::Result<Vec<Activity>> {
        let rows = sqlx::query("SELECT id, name, difficulty FROM activities ORDER BY id")
            .fetch_all(&*self.pool)
            .await?;

        let activities = rows
            .iter()
            .map(|row| Activity {
                id: row.get("id"),
                name: row.get("name"),
                difficulty: row.get("difficulty"),
            })
            .collect();
        Ok(activities)
    }

    /// Retrieve an activity by its id
    pub async fn get_activity(&self, id: i64) -> sqlx::Result<Option<Activity>> {
        let row = sqlx::query("SELECT id, name, difficulty FROM activities WHERE id = ?")
            .bind(id)
            .fetch_optional(&*self.pool)
            .await?;

        Ok(row.map(|r| Activity {
            id: r.get("id"),
            name: r.get("name"),
            difficulty: r.get("difficulty"),
        }))
    }

    /// Insert an activity and return it with its assigned id.
    /// The API exposes no activity creation; outside of tests the
    /// activities table is populated out of band.
    #[cfg(test)]
    pub async fn insert_activity(&self, name: &str, difficulty: i64) -> sqlx::Result<Activity> {
        let result = sqlx::query("INSERT INTO activities (name, difficulty) VALUES (?, ?)")
            .bind(name)
            .bind(difficulty)
            .execute(&*self.pool)
            .await?;

        Ok(Activity {
            id: result.last_insert_rowid(),
            name: name.to_string(),
            difficulty,
        })
    }

    /// Delete an activity by its id.
    /// Returns true if the activity existed. Its signups go with it
    /// through the ON DELETE CASCADE constraint.
    pub async fn delete_activity(&self, id: i64) -> sqlx::Result<bool> {
        let result = sqlx::query("DELETE FROM activities WHERE id = ?")
            .bind(id)
            .execute(&*self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Insert a signup and return its assigned id
    pub async fn insert_signup(
        &self,
        time: i64,
        camper_id: i64,
        activity_id: i64,
    ) -> sqlx::Result<i64> {
        let result = sqlx::query("INSERT INTO signups (time, camper_id, activity_id) VALUES (?, ?, ?)")
            .bind(time)
            .bind(camper_id)
            .bind(activity_id)
            .execute(&*self.pool)
            .await?;
        Ok(result.last_insert_rowid())
    }
}
