use std::fs::create_dir_all;
use std::path::Path;

use chrono::{DateTime, Utc};
use diesel::result::DatabaseErrorKind;
use diesel::{prelude::*, sql_query};
use diesel::{Connection, SqliteConnection};
use diesel_migrations::{embed_migrations, EmbeddedMigrations, MigrationHarness};

use crate::error::{Error, Result};

pub struct Conn(SqliteConnection);

impl Drop for Conn {
    fn drop(&mut self) {
        // if this fails, we don't really care at this point
        // the goal is just to have the optimize pragma run when the program
        // ends, so that it can potentially update some of the tables based on
        // the queries used during this session.
        // See: https://sqlite.org/pragma.html#pragma_optimize
        let _ = sql_query("PRAGMA optimize;").execute(&mut self.0);
    }
}

pub fn establish_connection(database_url: impl AsRef<Path>) -> anyhow::Result<Conn> {
    let database_url = database_url.as_ref();

    // The database and potentially its parent folders may not yet exist.  SQLite can handle
    // creating the file fine, but we need to make sure all of the parent folders also exist.
    // (An empty parent means a bare filename or the ":memory:" database - nothing to create.)
    if let Some(parent) = database_url.parent() {
        if !parent.as_os_str().is_empty() {
            create_dir_all(parent)?;
        }
    }

    // it seems kind of pointless to accept a path (which may not be utf-8) only to convert it lossily
    // into a string (which will be utf-8, but may not be exactly the path specified).  However, SQLite
    // only accepts utf-8 or utf-16 paths, and it's easier to type things elsewhere if we assume that the
    // database url is a real path
    // See: https://github.com/diesel-rs/diesel/discussions/3069
    let database_url = database_url.to_string_lossy();

    log::trace!("Connecting to SQLite DB at {database_url}");
    let mut conn = SqliteConnection::establish(&database_url)?;
    sql_query(
        "PRAGMA application_id = 0x5d11a7f2;
        PRAGMA foreign_keys = TRUE;
        PRAGMA ignore_check_constraints = FALSE;",
    )
    .execute(&mut conn)?;
    log::trace!("Connection to SQLite DB successful");
    run_migrations(&mut conn)?;
    Ok(Conn(conn))
}

pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!();

fn run_migrations(db: &mut SqliteConnection) -> anyhow::Result<()> {
    let migrated = match db.run_pending_migrations(MIGRATIONS) {
        Ok(migrations) => migrations.len(),
        Err(_) => anyhow::bail!("Could not update database to the latest version"),
    };

    if migrated > 0 {
        // a migration has occurred, so the data may be in a different format to when the last
        // analysis was done.  Run optimize now to update that analysis.
        // See: https://sqlite.org/pragma.html#pragma_optimize
        sql_query("PRAGMA optimize;").execute(db)?;
        log::trace!("Ran {migrated} migration(s) to update SQLite DB schema to latest version",);
    }

    Ok(())
}

#[derive(Queryable, Identifiable, Selectable, Debug, PartialEq, Clone)]
#[diesel(table_name = super::schema::projects)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct Project {
    pub id: i32,
    pub name: String,
    pub description: Option<String>,
}

/// A completed interval of work.  Immutable once inserted; both instants
/// are UTC-normalized.
#[derive(Queryable, Identifiable, Selectable, Associations, Debug, PartialEq, Clone)]
#[diesel(table_name = super::schema::stints)]
#[diesel(belongs_to(Project))]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct Stint {
    pub id: i32,
    pub project_id: i32,
    pub description: String,
    pub comment: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub started_at: chrono::DateTime<chrono::Utc>,
    pub ended_at: chrono::DateTime<chrono::Utc>,
}

/// A single-use bookmark: "work started here, the stint will be logged
/// later".  Deleted by the stint insertion that consumes it.
#[derive(Queryable, Identifiable, Selectable, Debug, PartialEq, Clone)]
#[diesel(table_name = super::schema::marks)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct Mark {
    pub id: i32,
    pub marked_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Insertable)]
#[diesel(table_name = super::schema::stints)]
pub struct NewStint<'a> {
    pub project_id: i32,
    pub description: &'a str,
    pub comment: Option<&'a str>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub started_at: chrono::DateTime<chrono::Utc>,
    pub ended_at: chrono::DateTime<chrono::Utc>,
}

pub fn create_project(
    conn: &mut Conn,
    name: &str,
    description: Option<&str>,
) -> Result<Project> {
    use super::schema::projects;

    diesel::insert_into(projects::table)
        .values((
            projects::name.eq(name),
            projects::description.eq(description),
        ))
        .returning(Project::as_returning())
        .get_result(&mut conn.0)
        .map_err(|err| match err {
            diesel::result::Error::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
                Error::DuplicateProject(name.to_owned())
            }
            err => err.into(),
        })
}

pub fn lookup_project(conn: &mut Conn, name: &str) -> Result<Project> {
    use super::schema::projects;

    projects::table
        .filter(projects::name.eq(name))
        .select(Project::as_select())
        .first(&mut conn.0)
        .optional()?
        .ok_or_else(|| Error::UnknownProject(name.to_owned()))
}

/// The most recently completed stint as of `now`, ordered by end time.
pub fn latest_completed_stint(
    conn: &mut Conn,
    now: chrono::DateTime<chrono::Utc>,
) -> Result<Option<Stint>> {
    use super::schema::stints;

    Ok(stints::table
        .filter(stints::ended_at.le(now))
        .order(stints::ended_at.desc())
        .select(Stint::as_select())
        .first(&mut conn.0)
        .optional()?)
}

/// The most recent mark set strictly after `instant`.  Marks at or before
/// `instant` are superseded and never surfaced.
pub fn latest_mark_after(
    conn: &mut Conn,
    instant: chrono::DateTime<chrono::Utc>,
) -> Result<Option<Mark>> {
    use super::schema::marks;

    Ok(marks::table
        .filter(marks::marked_at.gt(instant))
        .order(marks::marked_at.desc())
        .select(Mark::as_select())
        .first(&mut conn.0)
        .optional()?)
}

pub fn insert_mark(conn: &mut Conn, when: DateTime<Utc>) -> Result<Mark> {
    use super::schema::marks;

    Ok(diesel::insert_into(marks::table)
        .values(marks::marked_at.eq(when))
        .returning(Mark::as_returning())
        .get_result(&mut conn.0)?)
}

/// Inserts a stint and, when the start came from a mark, deletes that mark
/// in the same transaction.  A second invocation racing for the same mark
/// fails cleanly instead of consuming it twice.
pub fn insert_stint(
    conn: &mut Conn,
    new_stint: &NewStint,
    consume_mark: Option<&Mark>,
) -> Result<Stint> {
    use super::schema::marks;
    use super::schema::stints;

    conn.0.transaction(|conn| {
        let stint = diesel::insert_into(stints::table)
            .values(new_stint)
            .returning(Stint::as_returning())
            .get_result(conn)?;

        if let Some(mark) = consume_mark {
            let deleted = diesel::delete(marks::table.filter(marks::id.eq(mark.id)))
                .execute(conn)?;
            if deleted < 1 {
                // someone else already used this mark; roll the stint back
                return Err(Error::NoMarkAvailable);
            }
        }

        Ok(stint)
    })
}

pub type StintTuple = (Stint, Project);

/// The one overlap query shared by listing and aggregation: every stint
/// whose start or end falls inside `[earliest, latest)`, with its project,
/// sorted by start ascending.  A stint that fully contains the window
/// without either endpoint inside it is not selected.
pub fn stints_in_window(
    conn: &mut Conn,
    earliest: chrono::DateTime<chrono::Utc>,
    latest: chrono::DateTime<chrono::Utc>,
) -> Result<Vec<StintTuple>> {
    use super::schema::projects;
    use super::schema::stints;

    Ok(stints::table
        .inner_join(projects::table)
        .filter(
            (stints::started_at
                .ge(earliest)
                .and(stints::started_at.lt(latest)))
            .or(stints::ended_at.ge(earliest).and(stints::ended_at.lt(latest))),
        )
        .order(stints::started_at.asc())
        .select((Stint::as_select(), Project::as_select()))
        .load(&mut conn.0)?)
}
