//! Test utilities for the backend crate.
//!
//! Shared by unit tests (in `src/`) and integration tests (in `tests/`).
//! Only compiled for tests or with the `test-support` feature.

use std::sync::{Mutex, MutexGuard};

use chrono::{DateTime, Local, TimeDelta, TimeZone, Utc};
use mockable::Clock;

use crate::domain::{
    Group, GroupId, GroupSlug, Post, PostId, User, UserId, UserSummary, Username,
};

/// A clock that only moves when told to.
#[derive(Debug)]
pub struct MutableClock(Mutex<DateTime<Utc>>);

impl MutableClock {
    /// Start the clock at `now`.
    pub fn new(now: DateTime<Utc>) -> Self {
        Self(Mutex::new(now))
    }

    /// Start the clock at a fixed, arbitrary instant.
    pub fn fixed() -> Self {
        Self::new(epoch())
    }

    /// Move the clock forward by `seconds`.
    pub fn advance_seconds(&self, seconds: i64) {
        *self.lock_clock() += TimeDelta::seconds(seconds);
    }

    fn lock_clock(&self) -> MutexGuard<'_, DateTime<Utc>> {
        match self.0.lock() {
            Ok(guard) => guard,
            Err(_) => panic!("clock mutex"),
        }
    }
}

impl Clock for MutableClock {
    fn local(&self) -> DateTime<Local> {
        self.utc().with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        *self.lock_clock()
    }
}

/// A fixed instant used as the base time in fixtures.
pub fn epoch() -> DateTime<Utc> {
    match Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0) {
        chrono::LocalResult::Single(instant) => instant,
        _ => panic!("fixture epoch must be unambiguous"),
    }
}

/// A username known to be valid.
pub fn username(name: &str) -> Username {
    match Username::new(name) {
        Ok(username) => username,
        Err(err) => panic!("fixture username {name:?} is invalid: {err}"),
    }
}

/// A non-staff user with a random id.
pub fn user(name: &str) -> User {
    User::new(UserId::random(), username(name), false)
}

/// A group with the given id and slug.
pub fn group(id: i32, slug: &str) -> Group {
    let slug = match GroupSlug::new(slug) {
        Ok(slug) => slug,
        Err(err) => panic!("fixture slug {slug:?} is invalid: {err}"),
    };
    Group {
        id: GroupId::new(id),
        title: format!("Group {slug}"),
        slug,
        description: String::new(),
    }
}

/// A post by `author` published `minutes` after [`epoch`].
pub fn post(id: i32, author: &User, minutes: i64) -> Post {
    Post {
        id: PostId::new(id),
        text: format!("post {id}"),
        pub_date: epoch() + TimeDelta::minutes(minutes),
        author: UserSummary {
            id: author.id(),
            username: author.username().clone(),
        },
        group: None,
        image: None,
    }
}
