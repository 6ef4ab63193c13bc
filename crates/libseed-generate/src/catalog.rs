use serde::{Deserialize, Serialize};

use libseed_core::Value;

/// Fixed genre catalog, inserted once in this order.
pub const GENRES: [&str; 10] = [
    "Fiction",
    "Non-Fiction",
    "Fantasy",
    "Science Fiction",
    "Mystery",
    "Thriller",
    "Romance",
    "Biography",
    "History",
    "Children",
];

/// Tables populated by the seeder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Entity {
    Authors,
    Genres,
    Books,
    Users,
    BookCopies,
    Transactions,
}

impl Entity {
    /// Parents always come before the tables that reference them.
    pub const LOAD_ORDER: [Entity; 6] = [
        Entity::Authors,
        Entity::Genres,
        Entity::Books,
        Entity::Users,
        Entity::BookCopies,
        Entity::Transactions,
    ];

    pub fn table_name(self) -> &'static str {
        self.spec().table
    }

    pub fn spec(self) -> &'static TableSpec {
        match self {
            Entity::Authors => &AUTHORS,
            Entity::Genres => &GENRES_TABLE,
            Entity::Books => &BOOKS,
            Entity::Users => &USERS,
            Entity::BookCopies => &BOOK_COPIES,
            Entity::Transactions => &TRANSACTIONS,
        }
    }

    /// Tables this entity holds foreign keys into.
    pub fn parents(self) -> &'static [Entity] {
        match self {
            Entity::Authors | Entity::Genres | Entity::Users => &[],
            Entity::Books => &[Entity::Authors, Entity::Genres],
            Entity::BookCopies => &[Entity::Books],
            Entity::Transactions => &[Entity::Users, Entity::BookCopies],
        }
    }
}

impl std::fmt::Display for Entity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.table_name())
    }
}

/// What to do when an inserted row violates a uniqueness constraint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConflictPolicy {
    /// Let the store reject the statement; the run aborts.
    Fail,
    /// Drop conflicting rows on `column` and keep the rest of the batch.
    IgnoreOnUnique { column: &'static str },
}

impl ConflictPolicy {
    /// Trailing clause appended to the INSERT, if any.
    pub fn clause(self) -> Option<String> {
        match self {
            ConflictPolicy::Fail => None,
            ConflictPolicy::IgnoreOnUnique { column } => {
                Some(format!("ON CONFLICT ({column}) DO NOTHING"))
            }
        }
    }
}

/// Target table, its insert columns and its declared conflict policy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableSpec {
    pub table: &'static str,
    pub columns: &'static [&'static str],
    pub conflict: ConflictPolicy,
}

impl TableSpec {
    /// `INSERT INTO <table> (<columns>)`, without the VALUES list.
    pub fn insert_prefix(&self) -> String {
        format!("INSERT INTO {} ({})", self.table, self.columns.join(", "))
    }
}

static AUTHORS: TableSpec = TableSpec {
    table: "authors",
    columns: &["name", "birth_year"],
    conflict: ConflictPolicy::Fail,
};

static GENRES_TABLE: TableSpec = TableSpec {
    table: "genres",
    columns: &["name"],
    conflict: ConflictPolicy::Fail,
};

static BOOKS: TableSpec = TableSpec {
    table: "books",
    columns: &["isbn", "title", "author_id", "genre_id", "edition"],
    conflict: ConflictPolicy::Fail,
};

static USERS: TableSpec = TableSpec {
    table: "users",
    columns: &["name", "email", "password", "role"],
    conflict: ConflictPolicy::IgnoreOnUnique { column: "email" },
};

static BOOK_COPIES: TableSpec = TableSpec {
    table: "book_copies",
    columns: &["book_id", "barcode", "status"],
    conflict: ConflictPolicy::Fail,
};

static TRANSACTIONS: TableSpec = TableSpec {
    table: "transactions",
    columns: &["user_id", "copy_id", "issue_date", "return_date", "status"],
    conflict: ConflictPolicy::Fail,
};

/// A generated row bound to the table it is inserted into.
pub trait SeedRow {
    const ENTITY: Entity;

    /// Column values in the order of the entity's `TableSpec::columns`.
    fn values(&self) -> Vec<Value>;
}
