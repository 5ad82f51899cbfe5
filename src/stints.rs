// SPDX-License-Identifier: MPL-2.0

//! The persistence boundary: SQLite-backed storage of projects, stints,
//! and marks, plus the thin [`Stints`] wrapper the commands work through.

mod db;
mod schema;

use chrono::{DateTime, Utc};

pub use db::{establish_connection, Conn, Mark, Project, Stint, StintTuple};

use crate::{
    error::Result,
    locate::Location,
    resolve::{Predecessors, Resolved},
};

pub struct Stints<'a> {
    db: &'a mut Conn,
}

impl<'a> Stints<'a> {
    pub fn new(db: &'a mut Conn) -> Self {
        Self { db }
    }

    /// Creates a new project.  Project names are unique; a duplicate name
    /// is a conflict error.
    pub fn create_project(&mut self, name: &str, description: Option<&str>) -> Result<Project> {
        db::create_project(self.db, name, description)
    }

    pub fn lookup_project(&mut self, name: &str) -> Result<Project> {
        db::lookup_project(self.db, name)
    }

    /// Records a mark at `when`.  Any older mark is superseded from this
    /// point on, though it stays in the table until cleaned up by hand.
    pub fn set_mark(&mut self, when: DateTime<Utc>) -> Result<Mark> {
        db::insert_mark(self.db, when)
    }

    /// Inserts the stint described by `resolved`, deleting the consumed
    /// mark (if any) in the same transaction.
    pub fn add_stint(
        &mut self,
        resolved: &Resolved,
        project: &Project,
        description: &str,
        comment: Option<&str>,
        location: Option<Location>,
    ) -> Result<Stint> {
        db::insert_stint(
            self.db,
            &db::NewStint {
                project_id: project.id,
                description,
                comment,
                latitude: location.map(|l| l.latitude),
                longitude: location.map(|l| l.longitude),
                started_at: resolved.start,
                ended_at: resolved.end,
            },
            resolved.consume_mark.as_ref(),
        )
    }

    /// Every stint whose start or end falls inside `[earliest, latest)`,
    /// with its project, sorted by start ascending.  This is the single
    /// selection predicate behind both listing and aggregation.
    pub fn in_window(
        &mut self,
        earliest: DateTime<Utc>,
        latest: DateTime<Utc>,
    ) -> Result<Vec<StintTuple>> {
        db::stints_in_window(self.db, earliest, latest)
    }
}

impl Predecessors for Stints<'_> {
    fn latest_completed_stint(&mut self, now: DateTime<Utc>) -> Result<Option<DateTime<Utc>>> {
        Ok(db::latest_completed_stint(self.db, now)?.map(|stint| stint.ended_at))
    }

    fn latest_mark_after(&mut self, instant: DateTime<Utc>) -> Result<Option<Mark>> {
        db::latest_mark_after(self.db, instant)
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, TimeZone};

    use super::*;
    use crate::error::Error;

    fn test_db() -> Conn {
        establish_connection(":memory:").unwrap()
    }

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 4, 5, 14, 0, 0).unwrap()
    }

    fn resolved(start: DateTime<Utc>, end: DateTime<Utc>, consume_mark: Option<Mark>) -> Resolved {
        Resolved {
            start,
            end,
            consume_mark,
        }
    }

    #[test]
    fn duplicate_project_names_are_a_conflict() {
        let mut conn = test_db();
        let mut stints = Stints::new(&mut conn);
        stints.create_project("acme", None).unwrap();
        let err = stints.create_project("acme", Some("again")).unwrap_err();
        assert!(matches!(err, Error::DuplicateProject(name) if name == "acme"));
    }

    #[test]
    fn unknown_projects_are_not_found() {
        let mut conn = test_db();
        let mut stints = Stints::new(&mut conn);
        let err = stints.lookup_project("nope").unwrap_err();
        assert!(matches!(err, Error::UnknownProject(name) if name == "nope"));
    }

    #[test]
    fn latest_completed_stint_is_ordered_by_end() {
        let mut conn = test_db();
        let mut stints = Stints::new(&mut conn);
        let project = stints.create_project("acme", None).unwrap();

        let early = resolved(now() - Duration::hours(6), now() - Duration::hours(5), None);
        let late = resolved(now() - Duration::hours(3), now() - Duration::hours(1), None);
        stints.add_stint(&late, &project, "late", None, None).unwrap();
        stints.add_stint(&early, &project, "early", None, None).unwrap();

        let end = stints.latest_completed_stint(now()).unwrap().unwrap();
        assert_eq!(end, now() - Duration::hours(1));
    }

    #[test]
    fn stints_ending_in_the_future_are_not_completed() {
        let mut conn = test_db();
        let mut stints = Stints::new(&mut conn);
        let project = stints.create_project("acme", None).unwrap();

        let future = resolved(now() + Duration::hours(1), now() + Duration::hours(2), None);
        stints.add_stint(&future, &project, "later", None, None).unwrap();

        assert_eq!(stints.latest_completed_stint(now()).unwrap(), None);
    }

    #[test]
    fn only_marks_after_the_given_instant_are_surfaced() {
        let mut conn = test_db();
        let mut stints = Stints::new(&mut conn);

        stints.set_mark(now() - Duration::hours(5)).unwrap();
        let newer = stints.set_mark(now() - Duration::hours(1)).unwrap();

        let found = stints
            .latest_mark_after(now() - Duration::hours(2))
            .unwrap()
            .unwrap();
        assert_eq!(found, newer);

        assert_eq!(stints.latest_mark_after(now()).unwrap(), None);
    }

    #[test]
    fn consuming_a_mark_deletes_it_with_the_stint_insert() {
        let mut conn = test_db();
        let mut stints = Stints::new(&mut conn);
        let project = stints.create_project("acme", None).unwrap();

        let mark = stints.set_mark(now() - Duration::hours(1)).unwrap();
        let resolved = resolved(mark.marked_at, now(), Some(mark));
        stints
            .add_stint(&resolved, &project, "marked work", None, None)
            .unwrap();

        // the mark is single-use: it never shows up again, for any instant
        let epoch = Utc.with_ymd_and_hms(1970, 1, 1, 0, 0, 0).unwrap();
        assert_eq!(stints.latest_mark_after(epoch).unwrap(), None);
    }

    #[test]
    fn consuming_a_mark_twice_rolls_the_stint_back() {
        let mut conn = test_db();
        let mut stints = Stints::new(&mut conn);
        let project = stints.create_project("acme", None).unwrap();

        let mark = stints.set_mark(now() - Duration::hours(1)).unwrap();
        let first = resolved(mark.marked_at, now(), Some(mark.clone()));
        stints.add_stint(&first, &project, "first", None, None).unwrap();

        let second = resolved(mark.marked_at, now(), Some(mark));
        let err = stints
            .add_stint(&second, &project, "second", None, None)
            .unwrap_err();
        assert!(matches!(err, Error::NoMarkAvailable));

        // the failed insert must not have left a stint behind
        let epoch = Utc.with_ymd_and_hms(1970, 1, 1, 0, 0, 0).unwrap();
        let all = stints.in_window(epoch, now() + Duration::days(1)).unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].0.description, "first");
    }

    #[test]
    fn stints_store_location_when_available() {
        let mut conn = test_db();
        let mut stints = Stints::new(&mut conn);
        let project = stints.create_project("acme", None).unwrap();

        let located = resolved(now() - Duration::hours(1), now(), None);
        let stint = stints
            .add_stint(
                &located,
                &project,
                "on site",
                Some("client visit"),
                Some(Location {
                    latitude: 52.52,
                    longitude: 13.405,
                }),
            )
            .unwrap();

        assert_eq!(stint.latitude, Some(52.52));
        assert_eq!(stint.longitude, Some(13.405));
        assert_eq!(stint.comment.as_deref(), Some("client visit"));
    }
}
