//! Test utilities for the backend crate.
//!
//! This module provides shared helpers for both unit tests (in `src/`) and
//! integration tests (in `tests/`). It is compiled for unit tests and when the
//! `test-support` feature is enabled.

pub mod cap_fs {
    //! Capability-safe filesystem helpers for tests.
    //!
    //! The backend forbids direct `std::fs` calls; tests write their fixture
    //! files through `cap_std::fs::Dir` as well.

    use std::io;
    use std::path::Path;

    use cap_std::{ambient_authority, fs::Dir};

    /// Write `contents` to `name` inside `directory`, creating the directory
    /// when needed.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use membership_portal::test_support::cap_fs::write_file;
    ///
    /// let root = tempfile::tempdir()?;
    /// write_file(root.path(), "signin.html", b"<h1>Sign in</h1>")?;
    /// assert!(root.path().join("signin.html").exists());
    /// # Ok::<(), std::io::Error>(())
    /// ```
    pub fn write_file(directory: &Path, name: &str, contents: &[u8]) -> io::Result<()> {
        Dir::create_ambient_dir_all(directory, ambient_authority())?;
        let directory = Dir::open_ambient_dir(directory, ambient_authority())?;
        directory.write(name, contents)
    }
}

pub mod doubles {
    //! Deterministic stand-ins for the clock and the password hasher.

    use async_trait::async_trait;
    use chrono::{DateTime, Local, TimeZone, Utc};
    use mockable::Clock;

    use crate::domain::PlainPassword;
    use crate::domain::ports::{PasswordHashError, PasswordHasher};

    /// Clock frozen at one instant.
    #[derive(Debug, Clone, Copy)]
    pub struct FixedClock(pub DateTime<Utc>);

    impl FixedClock {
        /// Noon on 10 March 2025, the instant most fixtures assume.
        pub fn fixture() -> Self {
            Self(
                Utc.with_ymd_and_hms(2025, 3, 10, 12, 0, 0)
                    .single()
                    .unwrap_or_default(),
            )
        }
    }

    impl Clock for FixedClock {
        fn local(&self) -> DateTime<Local> {
            self.0.with_timezone(&Local)
        }

        fn utc(&self) -> DateTime<Utc> {
            self.0
        }
    }

    /// Reversible "hasher" that keeps test suites fast.
    ///
    /// # Examples
    /// ```
    /// use membership_portal::test_support::doubles::PlaintextHasher;
    ///
    /// assert_eq!(PlaintextHasher::hash_of("hunter2"), "plain:hunter2");
    /// ```
    #[derive(Debug, Clone, Copy, Default)]
    pub struct PlaintextHasher;

    impl PlaintextHasher {
        const PREFIX: &'static str = "plain:";

        /// The stored form of `password`.
        pub fn hash_of(password: &str) -> String {
            format!("{}{password}", Self::PREFIX)
        }
    }

    #[async_trait]
    impl PasswordHasher for PlaintextHasher {
        async fn hash(&self, password: &PlainPassword) -> Result<String, PasswordHashError> {
            Ok(Self::hash_of(password.expose()))
        }

        async fn verify(
            &self,
            password: &PlainPassword,
            hash: &str,
        ) -> Result<bool, PasswordHashError> {
            Ok(hash
                .strip_prefix(Self::PREFIX)
                .is_some_and(|stored| stored == password.expose()))
        }
    }
}

pub mod portal {
    //! In-memory implementation of every repository port.
    //!
    //! One [`InMemoryPortal`] holds all tables behind a mutex so foreign keys,
    //! the unique email constraint and the dashboard counts behave like the
    //! PostgreSQL adapters. Clones share the same tables.

    use std::sync::{Arc, Mutex, MutexGuard};

    use async_trait::async_trait;
    use chrono::{DateTime, Utc};

    use crate::domain::ports::{
        AlumniRepository, BranchRepository, EventRepository, LoginRecord, NewsRepository,
        RecordPersistenceError, StatsRepository, StatsRepositoryError, UserPersistenceError,
        UserRepository,
    };
    use crate::domain::{
        AccessRecord, AccountStatus, Alumnus, Branch, BranchDraft, BranchId, DashboardCounts,
        Event, NewAlumnus, NewEvent, NewNews, NewUser, News, StatsSnapshot, User, UserId,
        UserReplacement,
    };

    #[derive(Debug, Clone)]
    struct StoredUser {
        user: User,
        password_hash: String,
    }

    #[derive(Debug, Default)]
    struct Tables {
        users: Vec<StoredUser>,
        branches: Vec<Branch>,
        events: Vec<Event>,
        news: Vec<News>,
        alumni: Vec<Alumnus>,
        snapshots: Vec<StatsSnapshot>,
        next_id: i32,
    }

    impl Tables {
        fn next_id(&mut self) -> i32 {
            self.next_id += 1;
            self.next_id
        }

        fn branch_exists(&self, id: BranchId) -> bool {
            self.branches.iter().any(|branch| branch.id == id)
        }

        fn user_exists(&self, id: UserId) -> bool {
            self.users.iter().any(|stored| stored.user.id == id)
        }

        fn email_taken(&self, email: &str, except: Option<UserId>) -> bool {
            self.users
                .iter()
                .any(|stored| stored.user.email == email && Some(stored.user.id) != except)
        }

        fn check_branch(&self, id: BranchId) -> Result<(), RecordPersistenceError> {
            if self.branch_exists(id) {
                Ok(())
            } else {
                Err(RecordPersistenceError::missing_reference(format!("branch {id}")))
            }
        }

        fn check_user(&self, id: UserId) -> Result<(), RecordPersistenceError> {
            if self.user_exists(id) {
                Ok(())
            } else {
                Err(RecordPersistenceError::missing_reference(format!("user {id}")))
            }
        }

        fn check_optional_branch(&self, id: Option<BranchId>) -> Result<(), UserPersistenceError> {
            match id {
                Some(id) if !self.branch_exists(id) => Err(
                    UserPersistenceError::missing_reference(format!("branch {id}")),
                ),
                _ => Ok(()),
            }
        }
    }

    /// Shared in-memory tables implementing the repository ports.
    #[derive(Debug, Clone)]
    pub struct InMemoryPortal {
        tables: Arc<Mutex<Tables>>,
        now: DateTime<Utc>,
    }

    impl InMemoryPortal {
        /// Empty tables; `now` stamps new accounts.
        pub fn new(now: DateTime<Utc>) -> Self {
            Self {
                tables: Arc::new(Mutex::new(Tables::default())),
                now,
            }
        }

        fn tables(&self) -> MutexGuard<'_, Tables> {
            self.tables
                .lock()
                .unwrap_or_else(std::sync::PoisonError::into_inner)
        }

        /// Insert a branch directly.
        pub fn seed_branch(&self, name: &str) -> Branch {
            let mut tables = self.tables();
            let branch = Branch {
                id: BranchId::new(tables.next_id()),
                name: name.to_owned(),
                university: None,
                province: None,
                member_count: 0,
                alumni_count: 0,
            };
            tables.branches.push(branch.clone());
            branch
        }

        /// Insert an account directly, storing `password_hash` verbatim.
        pub fn seed_user(&self, user: &NewUser) -> User {
            let mut tables = self.tables();
            let stored = StoredUser {
                user: User {
                    id: UserId::new(tables.next_id()),
                    name: user.name.clone(),
                    email: user.email.clone(),
                    role: user.profile.role,
                    branch_id: user.profile.branch_id,
                    is_bec_member: user.profile.is_bec_member,
                    nec_position: user.profile.nec_position.clone(),
                    bec_position: user.profile.bec_position.clone(),
                    status: user.profile.status,
                    created_at: self.now,
                },
                password_hash: user.password_hash.clone(),
            };
            tables.users.push(stored.clone());
            stored.user
        }

        /// Insert an event directly.
        pub fn seed_event(&self, event: &NewEvent) -> Event {
            let mut tables = self.tables();
            let event = Event {
                id: tables.next_id(),
                title: event.title.clone(),
                date: event.date,
                branch_id: event.branch_id,
                created_by: event.created_by,
                event_type: event.event_type.clone(),
            };
            tables.events.push(event.clone());
            event
        }

        /// Change an account's status in place.
        pub fn set_status(&self, id: UserId, status: AccountStatus) {
            let mut tables = self.tables();
            if let Some(stored) = tables.users.iter_mut().find(|stored| stored.user.id == id) {
                stored.user.status = status;
            }
        }

        /// Remove an account, leaving any session that names it dangling.
        pub fn remove_user(&self, id: UserId) {
            self.tables().users.retain(|stored| stored.user.id != id);
        }

        /// Number of stored accounts.
        pub fn user_count(&self) -> usize {
            self.tables().users.len()
        }

        fn counts_at(&self, now: DateTime<Utc>) -> DashboardCounts {
            let tables = self.tables();
            let count = |n: usize| i64::try_from(n).unwrap_or(i64::MAX);
            DashboardCounts {
                total_users: count(tables.users.len()),
                total_events: count(tables.events.len()),
                total_branches: count(tables.branches.len()),
                total_alumni: count(tables.alumni.len()),
                total_news: count(tables.news.len()),
                active_users: count(
                    tables
                        .users
                        .iter()
                        .filter(|stored| stored.user.status.is_active())
                        .count(),
                ),
                upcoming_events: count(
                    tables.events.iter().filter(|event| event.date > now).count(),
                ),
            }
        }
    }

    #[async_trait]
    impl UserRepository for InMemoryPortal {
        async fn list(&self) -> Result<Vec<User>, UserPersistenceError> {
            let mut users: Vec<User> = self
                .tables()
                .users
                .iter()
                .map(|stored| stored.user.clone())
                .collect();
            users.sort_by_key(|user| user.id);
            Ok(users)
        }

        async fn find_by_id(&self, id: UserId) -> Result<Option<User>, UserPersistenceError> {
            Ok(self
                .tables()
                .users
                .iter()
                .find(|stored| stored.user.id == id)
                .map(|stored| stored.user.clone()))
        }

        async fn find_login_record(
            &self,
            email: &str,
        ) -> Result<Option<LoginRecord>, UserPersistenceError> {
            Ok(self
                .tables()
                .users
                .iter()
                .find(|stored| stored.user.email == email)
                .map(|stored| {
                    LoginRecord::for_user(stored.user.clone(), stored.password_hash.clone())
                }))
        }

        async fn find_access_record(
            &self,
            id: UserId,
        ) -> Result<Option<AccessRecord>, UserPersistenceError> {
            Ok(self
                .tables()
                .users
                .iter()
                .find(|stored| stored.user.id == id)
                .map(|stored| AccessRecord {
                    id: stored.user.id,
                    role: stored.user.role.as_str().to_owned(),
                    status: stored.user.status.as_str().to_owned(),
                    branch_id: stored.user.branch_id,
                }))
        }

        async fn insert(&self, user: &NewUser) -> Result<User, UserPersistenceError> {
            {
                let tables = self.tables();
                if tables.email_taken(&user.email, None) {
                    return Err(UserPersistenceError::duplicate_email(user.email.clone()));
                }
                tables.check_optional_branch(user.profile.branch_id)?;
            }
            Ok(self.seed_user(user))
        }

        async fn replace(
            &self,
            id: UserId,
            replacement: &UserReplacement,
        ) -> Result<Option<User>, UserPersistenceError> {
            let mut tables = self.tables();
            if !tables.user_exists(id) {
                return Ok(None);
            }
            if tables.email_taken(&replacement.email, Some(id)) {
                return Err(UserPersistenceError::duplicate_email(
                    replacement.email.clone(),
                ));
            }
            tables.check_optional_branch(replacement.profile.branch_id)?;
            let Some(stored) = tables.users.iter_mut().find(|stored| stored.user.id == id) else {
                return Ok(None);
            };
            let profile = &replacement.profile;
            stored.user = User {
                name: replacement.name.clone(),
                email: replacement.email.clone(),
                role: profile.role,
                branch_id: profile.branch_id,
                is_bec_member: profile.is_bec_member,
                nec_position: profile.nec_position.clone(),
                bec_position: profile.bec_position.clone(),
                status: profile.status,
                ..stored.user.clone()
            };
            Ok(Some(stored.user.clone()))
        }
    }

    #[async_trait]
    impl BranchRepository for InMemoryPortal {
        async fn list(&self) -> Result<Vec<Branch>, RecordPersistenceError> {
            let mut branches = self.tables().branches.clone();
            branches.sort_by_key(|branch| branch.id);
            Ok(branches)
        }

        async fn find_by_id(&self, id: BranchId) -> Result<Option<Branch>, RecordPersistenceError> {
            Ok(self
                .tables()
                .branches
                .iter()
                .find(|branch| branch.id == id)
                .cloned())
        }

        async fn insert(&self, draft: &BranchDraft) -> Result<Branch, RecordPersistenceError> {
            let mut tables = self.tables();
            let branch = Branch {
                id: BranchId::new(tables.next_id()),
                name: draft.name.clone(),
                university: draft.university.clone(),
                province: draft.province.clone(),
                member_count: draft.member_count,
                alumni_count: draft.alumni_count,
            };
            tables.branches.push(branch.clone());
            Ok(branch)
        }

        async fn replace(
            &self,
            id: BranchId,
            draft: &BranchDraft,
        ) -> Result<Option<Branch>, RecordPersistenceError> {
            let mut tables = self.tables();
            Ok(tables
                .branches
                .iter_mut()
                .find(|branch| branch.id == id)
                .map(|branch| {
                    *branch = Branch {
                        id,
                        name: draft.name.clone(),
                        university: draft.university.clone(),
                        province: draft.province.clone(),
                        member_count: draft.member_count,
                        alumni_count: draft.alumni_count,
                    };
                    branch.clone()
                }))
        }
    }

    #[async_trait]
    impl EventRepository for InMemoryPortal {
        async fn list(&self) -> Result<Vec<Event>, RecordPersistenceError> {
            let mut events = self.tables().events.clone();
            events.sort_by_key(|event| (event.date, event.id));
            Ok(events)
        }

        async fn find_by_id(&self, id: i32) -> Result<Option<Event>, RecordPersistenceError> {
            Ok(self
                .tables()
                .events
                .iter()
                .find(|event| event.id == id)
                .cloned())
        }

        async fn insert(&self, event: &NewEvent) -> Result<Event, RecordPersistenceError> {
            {
                let tables = self.tables();
                tables.check_branch(event.branch_id)?;
                tables.check_user(event.created_by)?;
            }
            Ok(self.seed_event(event))
        }
    }

    #[async_trait]
    impl NewsRepository for InMemoryPortal {
        async fn list(&self) -> Result<Vec<News>, RecordPersistenceError> {
            let mut news = self.tables().news.clone();
            news.sort_by(|a, b| b.publish_date.cmp(&a.publish_date).then(b.id.cmp(&a.id)));
            Ok(news)
        }

        async fn find_by_id(&self, id: i32) -> Result<Option<News>, RecordPersistenceError> {
            Ok(self
                .tables()
                .news
                .iter()
                .find(|article| article.id == id)
                .cloned())
        }

        async fn insert(&self, news: &NewNews) -> Result<News, RecordPersistenceError> {
            let mut tables = self.tables();
            tables.check_branch(news.branch_id)?;
            tables.check_user(news.author_id)?;
            let article = News {
                id: tables.next_id(),
                title: news.title.clone(),
                content: news.content.clone(),
                branch_id: news.branch_id,
                author_id: news.author_id,
                publish_date: news.publish_date,
            };
            tables.news.push(article.clone());
            Ok(article)
        }
    }

    #[async_trait]
    impl AlumniRepository for InMemoryPortal {
        async fn list(&self) -> Result<Vec<Alumnus>, RecordPersistenceError> {
            let mut alumni = self.tables().alumni.clone();
            alumni.sort_by(|a, b| {
                b.graduation_date
                    .cmp(&a.graduation_date)
                    .then(a.id.cmp(&b.id))
            });
            Ok(alumni)
        }

        async fn find_by_id(&self, id: i32) -> Result<Option<Alumnus>, RecordPersistenceError> {
            Ok(self
                .tables()
                .alumni
                .iter()
                .find(|alumnus| alumnus.id == id)
                .cloned())
        }

        async fn insert(&self, alumnus: &NewAlumnus) -> Result<Alumnus, RecordPersistenceError> {
            let mut tables = self.tables();
            tables.check_user(alumnus.user_id)?;
            tables.check_branch(alumnus.branch_id)?;
            let record = Alumnus {
                id: tables.next_id(),
                user_id: alumnus.user_id,
                branch_id: alumnus.branch_id,
                graduation_date: alumnus.graduation_date,
                degree: alumnus.degree.clone(),
                current_status: alumnus.current_status.clone(),
            };
            tables.alumni.push(record.clone());
            Ok(record)
        }
    }

    #[async_trait]
    impl StatsRepository for InMemoryPortal {
        async fn dashboard_counts(
            &self,
            now: DateTime<Utc>,
        ) -> Result<DashboardCounts, StatsRepositoryError> {
            Ok(self.counts_at(now))
        }

        async fn latest_snapshot(&self) -> Result<Option<StatsSnapshot>, StatsRepositoryError> {
            Ok(self
                .tables()
                .snapshots
                .iter()
                .max_by_key(|snapshot| (snapshot.captured_at, snapshot.id))
                .copied())
        }

        async fn record_snapshot(
            &self,
            counts: &DashboardCounts,
            captured_at: DateTime<Utc>,
        ) -> Result<StatsSnapshot, StatsRepositoryError> {
            let mut tables = self.tables();
            let snapshot = StatsSnapshot {
                id: tables.next_id(),
                captured_at,
                counts: *counts,
            };
            tables.snapshots.push(snapshot);
            Ok(snapshot)
        }
    }
}

pub mod http {
    //! Wiring of an [`HttpState`] over the in-memory adapters.

    use std::sync::Arc;

    use chrono::{DateTime, Utc};

    use super::doubles::{FixedClock, PlaintextHasher};
    use super::portal::InMemoryPortal;
    use crate::domain::dashboard_service::DashboardSources;
    use crate::domain::{AccountService, DashboardService, NewUser, Role, User, UserProfile};
    use crate::inbound::http::state::{HttpState, HttpStatePorts};
    use crate::outbound::storage::ObjectFileStore;

    /// Everything an in-process test app needs.
    #[derive(Clone)]
    pub struct TestPortal {
        /// Shared tables.
        pub portal: InMemoryPortal,
        /// Object store behind the upload endpoints.
        pub files: Arc<ObjectFileStore>,
        /// Frozen clock.
        pub clock: FixedClock,
    }

    impl TestPortal {
        /// Empty tables, an in-memory object store and the fixture clock.
        pub fn new() -> Self {
            let clock = FixedClock::fixture();
            Self {
                portal: InMemoryPortal::new(clock.0),
                files: Arc::new(ObjectFileStore::in_memory()),
                clock,
            }
        }

        /// The frozen instant.
        pub fn now(&self) -> DateTime<Utc> {
            self.clock.0
        }

        /// Insert an active account with `role` whose password is `password`.
        pub fn account(&self, email: &str, role: Role, password: &str) -> User {
            self.portal.seed_user(&NewUser {
                name: email.split('@').next().unwrap_or(email).to_owned(),
                email: email.to_owned(),
                password_hash: PlaintextHasher::hash_of(password),
                profile: UserProfile {
                    role,
                    ..UserProfile::default()
                },
            })
        }

        /// Handler state over the in-memory adapters.
        pub fn state(&self) -> HttpState {
            let portal = Arc::new(self.portal.clone());
            let accounts = Arc::new(AccountService::new(
                Arc::clone(&portal),
                Arc::new(PlaintextHasher),
            ));
            let dashboard = Arc::new(DashboardService::new(
                DashboardSources {
                    users: portal.clone(),
                    branches: portal.clone(),
                    events: portal.clone(),
                    news: portal.clone(),
                    alumni: portal.clone(),
                    stats: portal.clone(),
                },
                Arc::new(self.clock),
            ));
            HttpState::new(HttpStatePorts {
                login: accounts.clone(),
                identity: accounts.clone(),
                users: accounts.clone(),
                user_commands: accounts,
                branches: portal.clone(),
                events: portal.clone(),
                news: portal.clone(),
                alumni: portal,
                dashboard,
                files: self.files.clone(),
            })
            .with_clock(Arc::new(self.clock))
        }
    }

    impl Default for TestPortal {
        fn default() -> Self {
            Self::new()
        }
    }
}
