use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;
use std::str::FromStr;
use thiserror::Error;

use crate::lookup::CacheLookup;
use crate::models::{Business, Location, Movie, NewLocation, WeatherDay};

#[derive(Error, Debug)]
pub enum DatabaseError {
    #[error("Database query failed: {0}")]
    QueryFailed(#[from] sqlx::Error),
}

/// The cache store. One table per domain, dependent rows keyed by location id.
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Opens a pool for `database_url`, creating the SQLite file if needed.
    pub async fn connect(database_url: &str) -> Result<Self, DatabaseError> {
        let options = SqliteConnectOptions::from_str(database_url)?.create_if_missing(true);
        let pool = SqlitePoolOptions::new().connect_with(options).await?;
        Ok(Self::new(pool))
    }

    pub async fn init_tables(&self) -> Result<(), DatabaseError> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS locations (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                search_query TEXT NOT NULL UNIQUE,
                formatted_query TEXT NOT NULL,
                latitude REAL NOT NULL,
                longitude REAL NOT NULL
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS weather (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                forecast TEXT NOT NULL,
                time TEXT NOT NULL,
                location_id INTEGER NOT NULL REFERENCES locations(id)
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS yelp (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                name TEXT NOT NULL,
                image_url TEXT NOT NULL,
                price TEXT,
                rating REAL NOT NULL,
                url TEXT NOT NULL,
                location_id INTEGER NOT NULL REFERENCES locations(id)
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS movies (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                title TEXT NOT NULL,
                overview TEXT NOT NULL,
                average_votes REAL NOT NULL,
                total_votes INTEGER NOT NULL,
                image_url TEXT NOT NULL,
                popularity REAL NOT NULL,
                released_on TEXT NOT NULL,
                location_id INTEGER NOT NULL REFERENCES locations(id)
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        // Create indexes
        sqlx::query("CREATE INDEX IF NOT EXISTS idx_weather_location_id ON weather(location_id)")
            .execute(&self.pool)
            .await?;

        sqlx::query("CREATE INDEX IF NOT EXISTS idx_yelp_location_id ON yelp(location_id)")
            .execute(&self.pool)
            .await?;

        sqlx::query("CREATE INDEX IF NOT EXISTS idx_movies_location_id ON movies(location_id)")
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    // Locations
    pub async fn find_location(
        &self,
        search_query: &str,
    ) -> Result<CacheLookup<Location>, DatabaseError> {
        let row = sqlx::query_as::<_, Location>(
            "SELECT id, search_query, formatted_query, latitude, longitude FROM locations WHERE search_query = $1",
        )
        .bind(search_query)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.into())
    }

    pub async fn find_location_by_id(&self, id: i64) -> Result<Option<Location>, DatabaseError> {
        let row = sqlx::query_as::<_, Location>(
            "SELECT id, search_query, formatted_query, latitude, longitude FROM locations WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }

    /// Inserts a location and returns the stored row.
    ///
    /// When a row with the same `search_query` already exists the insert is a
    /// no-op and the existing row is returned: the first write wins.
    pub async fn insert_location(&self, location: &NewLocation) -> Result<Location, DatabaseError> {
        sqlx::query(
            r#"
            INSERT INTO locations (search_query, formatted_query, latitude, longitude)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT(search_query) DO NOTHING
            "#,
        )
        .bind(&location.search_query)
        .bind(&location.formatted_query)
        .bind(location.latitude)
        .bind(location.longitude)
        .execute(&self.pool)
        .await?;

        let stored = sqlx::query_as::<_, Location>(
            "SELECT id, search_query, formatted_query, latitude, longitude FROM locations WHERE search_query = $1",
        )
        .bind(&location.search_query)
        .fetch_one(&self.pool)
        .await?;

        Ok(stored)
    }

    // Weather
    pub async fn find_weather(
        &self,
        location_id: i64,
    ) -> Result<CacheLookup<Vec<WeatherDay>>, DatabaseError> {
        let rows = sqlx::query_as::<_, WeatherDay>(
            "SELECT time, forecast FROM weather WHERE location_id = $1 ORDER BY id",
        )
        .bind(location_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(CacheLookup::from_rows(rows))
    }

    pub async fn insert_weather(
        &self,
        location_id: i64,
        days: &[WeatherDay],
    ) -> Result<(), DatabaseError> {
        let mut tx = self.pool.begin().await?;

        for day in days {
            sqlx::query("INSERT INTO weather (forecast, time, location_id) VALUES ($1, $2, $3)")
                .bind(&day.forecast)
                .bind(&day.time)
                .bind(location_id)
                .execute(&mut *tx)
                .await?;
        }

        tx.commit().await?;
        Ok(())
    }

    // Businesses
    pub async fn find_businesses(
        &self,
        location_id: i64,
    ) -> Result<CacheLookup<Vec<Business>>, DatabaseError> {
        let rows = sqlx::query_as::<_, Business>(
            "SELECT name, image_url, price, rating, url FROM yelp WHERE location_id = $1 ORDER BY id",
        )
        .bind(location_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(CacheLookup::from_rows(rows))
    }

    pub async fn insert_businesses(
        &self,
        location_id: i64,
        businesses: &[Business],
    ) -> Result<(), DatabaseError> {
        let mut tx = self.pool.begin().await?;

        for business in businesses {
            sqlx::query(
                r#"
                INSERT INTO yelp (name, image_url, price, rating, url, location_id)
                VALUES ($1, $2, $3, $4, $5, $6)
                "#,
            )
            .bind(&business.name)
            .bind(&business.image_url)
            .bind(&business.price)
            .bind(business.rating)
            .bind(&business.url)
            .bind(location_id)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(())
    }

    // Movies
    pub async fn find_movies(
        &self,
        location_id: i64,
    ) -> Result<CacheLookup<Vec<Movie>>, DatabaseError> {
        let rows = sqlx::query_as::<_, Movie>(
            r#"
            SELECT title, overview, average_votes, total_votes, image_url, popularity, released_on
            FROM movies WHERE location_id = $1 ORDER BY id
            "#,
        )
        .bind(location_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(CacheLookup::from_rows(rows))
    }

    pub async fn insert_movies(
        &self,
        location_id: i64,
        movies: &[Movie],
    ) -> Result<(), DatabaseError> {
        let mut tx = self.pool.begin().await?;

        for movie in movies {
            sqlx::query(
                r#"
                INSERT INTO movies (
                    title, overview, average_votes, total_votes,
                    image_url, popularity, released_on, location_id
                )
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
                "#,
            )
            .bind(&movie.title)
            .bind(&movie.overview)
            .bind(movie.average_votes)
            .bind(movie.total_votes)
            .bind(&movie.image_url)
            .bind(movie.popularity)
            .bind(&movie.released_on)
            .bind(location_id)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(())
    }

    pub async fn health_check(&self) -> Result<(), DatabaseError> {
        sqlx::query("SELECT 1")
            .fetch_one(&self.pool)
            .await?;
        Ok(())
    }

    /// Single-connection in-memory store; every connection to `:memory:` is a new database.
    #[cfg(test)]
    pub async fn in_memory() -> Self {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .expect("in-memory sqlite");
        let database = Self::new(pool);
        database.init_tables().await.expect("create tables");
        database
    }

    #[cfg(test)]
    pub async fn row_count(&self, table: &str) -> i64 {
        sqlx::query_scalar::<_, i64>(&format!("SELECT COUNT(*) FROM {}", table))
            .fetch_one(&self.pool)
            .await
            .expect("count rows")
    }

    #[cfg(test)]
    pub async fn execute_raw(&self, sql: &str) {
        sqlx::query(sql)
            .execute(&self.pool)
            .await
            .expect("execute statement");
    }

    #[cfg(test)]
    pub async fn close(&self) {
        self.pool.close().await;
    }
}
