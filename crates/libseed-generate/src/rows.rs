use chrono::{NaiveDate, TimeDelta};
use fake::Fake;
use fake::faker::internet::en::Password;
use fake::faker::lorem::en::Sentence;
use fake::faker::name::en::Name;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use libseed_core::{DateWindow, Value};

use crate::catalog::{Entity, GENRES, SeedRow};
use crate::foreign::{ParentRange, pick_existing_id};

const BIRTH_YEAR_MIN: i64 = 1900;
const BIRTH_YEAR_MAX: i64 = 2000;
const ISBN_DIGITS: usize = 13;
const ADMIN_PROBABILITY: f64 = 0.05;
const RETURNED_PROBABILITY: f64 = 0.7;
const COPY_STATUS: &str = "available";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthorRow {
    pub name: String,
    pub birth_year: i64,
}

impl SeedRow for AuthorRow {
    const ENTITY: Entity = Entity::Authors;

    fn values(&self) -> Vec<Value> {
        vec![Value::from(self.name.as_str()), Value::Int(self.birth_year)]
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenreRow {
    pub name: &'static str,
}

impl SeedRow for GenreRow {
    const ENTITY: Entity = Entity::Genres;

    fn values(&self) -> Vec<Value> {
        vec![Value::from(self.name)]
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookRow {
    pub isbn: String,
    pub title: String,
    pub author_id: i64,
    pub genre_id: i64,
    pub edition: String,
}

impl SeedRow for BookRow {
    const ENTITY: Entity = Entity::Books;

    fn values(&self) -> Vec<Value> {
        vec![
            Value::from(self.isbn.as_str()),
            Value::from(self.title.as_str()),
            Value::Int(self.author_id),
            Value::Int(self.genre_id),
            Value::from(self.edition.as_str()),
        ]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UserRole {
    User,
    Admin,
}

impl UserRole {
    pub fn as_str(self) -> &'static str {
        match self {
            UserRole::User => "user",
            UserRole::Admin => "admin",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserRow {
    pub name: String,
    pub email: String,
    pub password: String,
    pub role: UserRole,
}

impl SeedRow for UserRow {
    const ENTITY: Entity = Entity::Users;

    fn values(&self) -> Vec<Value> {
        vec![
            Value::from(self.name.as_str()),
            Value::from(self.email.as_str()),
            Value::from(self.password.as_str()),
            Value::from(self.role.as_str()),
        ]
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookCopyRow {
    pub book_id: i64,
    pub barcode: String,
    pub status: &'static str,
}

impl SeedRow for BookCopyRow {
    const ENTITY: Entity = Entity::BookCopies;

    fn values(&self) -> Vec<Value> {
        vec![
            Value::Int(self.book_id),
            Value::from(self.barcode.as_str()),
            Value::from(self.status),
        ]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransactionStatus {
    Borrowed,
    Returned,
}

impl TransactionStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            TransactionStatus::Borrowed => "borrowed",
            TransactionStatus::Returned => "returned",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionRow {
    pub user_id: i64,
    pub copy_id: i64,
    pub issue_date: NaiveDate,
    pub return_date: Option<NaiveDate>,
    pub status: TransactionStatus,
}

impl SeedRow for TransactionRow {
    const ENTITY: Entity = Entity::Transactions;

    fn values(&self) -> Vec<Value> {
        vec![
            Value::Int(self.user_id),
            Value::Int(self.copy_id),
            Value::Text(format_date(self.issue_date)),
            Value::from(self.return_date.map(format_date)),
            Value::from(self.status.as_str()),
        ]
    }
}

fn format_date(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// `user<sequence>@example.com`; unique as long as sequences are.
pub fn user_email(sequence: u64) -> String {
    format!("user{sequence}@example.com")
}

/// `BC` followed by the sequence zero-padded to seven digits.
pub fn copy_barcode(sequence: u64) -> String {
    format!("BC{sequence:07}")
}

/// Deterministic row source shared by every stage of one run.
pub struct RowFactory {
    rng: ChaCha8Rng,
    window: DateWindow,
}

impl RowFactory {
    pub fn new(seed: u64, window: DateWindow) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
            window,
        }
    }

    pub fn author(&mut self) -> AuthorRow {
        AuthorRow {
            name: Name().fake_with_rng(&mut self.rng),
            birth_year: self.rng.random_range(BIRTH_YEAR_MIN..=BIRTH_YEAR_MAX),
        }
    }

    pub fn genres() -> Vec<GenreRow> {
        GENRES.into_iter().map(|name| GenreRow { name }).collect()
    }

    pub fn book(&mut self, authors: ParentRange, genres: ParentRange) -> BookRow {
        let isbn = (0..ISBN_DIGITS)
            .map(|_| char::from(b'0' + self.rng.random_range(0..10_u8)))
            .collect();
        let title: String = Sentence(3..4).fake_with_rng(&mut self.rng);
        let edition = format!(
            "{}.{}",
            self.rng.random_range(1..=5_u8),
            self.rng.random_range(0..=9_u8)
        );
        BookRow {
            isbn,
            title,
            author_id: pick_existing_id(authors, &mut self.rng),
            genre_id: pick_existing_id(genres, &mut self.rng),
            edition,
        }
    }

    /// `sequence` is 1-based and determines the email.
    pub fn user(&mut self, sequence: u64) -> UserRow {
        let role = if self.rng.random_bool(ADMIN_PROBABILITY) {
            UserRole::Admin
        } else {
            UserRole::User
        };
        UserRow {
            name: Name().fake_with_rng(&mut self.rng),
            email: user_email(sequence),
            password: Password(8..16).fake_with_rng(&mut self.rng),
            role,
        }
    }

    /// `sequence` is 1-based and determines the barcode.
    pub fn book_copy(&mut self, sequence: u64, books: ParentRange) -> BookCopyRow {
        BookCopyRow {
            book_id: pick_existing_id(books, &mut self.rng),
            barcode: copy_barcode(sequence),
            status: COPY_STATUS,
        }
    }

    pub fn transaction(&mut self, users: ParentRange, copies: ParentRange) -> TransactionRow {
        let user_id = pick_existing_id(users, &mut self.rng);
        let copy_id = pick_existing_id(copies, &mut self.rng);
        let DateWindow { start, end } = self.window;
        let issue_date = self.date_between(start, end);
        let return_date = self
            .rng
            .random_bool(RETURNED_PROBABILITY)
            .then(|| self.date_between(issue_date, end));
        let status = if return_date.is_some() {
            TransactionStatus::Returned
        } else {
            TransactionStatus::Borrowed
        };
        TransactionRow {
            user_id,
            copy_id,
            issue_date,
            return_date,
            status,
        }
    }

    /// Uniform day in `[from, to]`; `from` must not be after `to`.
    fn date_between(&mut self, from: NaiveDate, to: NaiveDate) -> NaiveDate {
        let span = (to - from).num_days().max(0);
        from + TimeDelta::days(self.rng.random_range(0..=span))
    }
}
