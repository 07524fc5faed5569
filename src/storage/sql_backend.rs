use std::{
    collections::BTreeMap,
    fs,
    path::Path,
    sync::{Mutex, MutexGuard, PoisonError},
};

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension, Row};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::{
    currency::{normalize_currency, normalize_language},
    domain::{Amounted, Config, ConfigDefaults, RecurrenceInterval, RecurringTemplate, Transaction},
    errors::{Entity, Result, StoreError, ValidationError},
    recurrence::expand,
    validation::validate_categories,
};

use super::{
    check_balance, check_balances, check_start_date, prepare_new_transaction, prepare_template,
    prepare_updated_transaction, skip_retained_occurrence, Storage, StoreOptions,
};

const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS expenses (
    id TEXT PRIMARY KEY,
    recurring_id TEXT,
    description TEXT NOT NULL,
    "from" TEXT,
    "to" TEXT,
    method TEXT,
    note TEXT,
    category TEXT NOT NULL,
    amount REAL NOT NULL,
    currency TEXT NOT NULL,
    date TEXT NOT NULL
);
CREATE INDEX IF NOT EXISTS idx_expenses_date ON expenses(date);
CREATE INDEX IF NOT EXISTS idx_expenses_recurring ON expenses(recurring_id);

CREATE TABLE IF NOT EXISTS recurring_expenses (
    id TEXT PRIMARY KEY,
    description TEXT NOT NULL,
    amount REAL NOT NULL,
    currency TEXT NOT NULL,
    "from" TEXT,
    "to" TEXT,
    method TEXT,
    note TEXT,
    category TEXT NOT NULL,
    start_date TEXT NOT NULL,
    interval TEXT NOT NULL,
    occurrences INTEGER NOT NULL
);

CREATE TABLE IF NOT EXISTS config (
    id TEXT PRIMARY KEY DEFAULT 'default',
    categories TEXT NOT NULL,
    currency TEXT NOT NULL,
    start_date INTEGER NOT NULL,
    voucher_counter INTEGER NOT NULL DEFAULT 0,
    receipt_counter INTEGER NOT NULL DEFAULT 0,
    opening_balance REAL NOT NULL DEFAULT 0
);
"#;

/// Columns added after the first release, applied when missing.
const MIGRATIONS: &[(&str, &str, &str)] = &[
    (
        "config",
        "use_manual_balances",
        "ALTER TABLE config ADD COLUMN use_manual_balances INTEGER NOT NULL DEFAULT 0",
    ),
    (
        "config",
        "manual_balances",
        "ALTER TABLE config ADD COLUMN manual_balances TEXT NOT NULL DEFAULT '{}'",
    ),
    (
        "config",
        "language",
        "ALTER TABLE config ADD COLUMN language TEXT NOT NULL DEFAULT ''",
    ),
];

const CONFIG_ID: &str = "default";

const SELECT_TRANSACTION: &str = r#"SELECT id, recurring_id, description, "from", "to", method, note, category, amount, currency, date FROM expenses"#;
const INSERT_TRANSACTION: &str = r#"INSERT INTO expenses (id, recurring_id, description, "from", "to", method, note, category, amount, currency, date) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)"#;
const SELECT_TEMPLATE: &str = r#"SELECT id, description, amount, currency, "from", "to", method, note, category, start_date, interval, occurrences FROM recurring_expenses"#;

/// Values kept next to the connection so adds don't re-read the config row.
#[derive(Debug, Default)]
struct CachedDefaults {
    currency: Option<String>,
    start_date: Option<u32>,
}

#[derive(Debug)]
struct SqlInner {
    conn: Connection,
    cache: CachedDefaults,
}

/// SQLite-backed store. Recurring template changes run in one SQL transaction
/// together with the instances they create or delete.
#[derive(Debug)]
pub struct SqlStore {
    inner: Mutex<SqlInner>,
    options: StoreOptions,
}

impl SqlStore {
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        Self::open_with(path, StoreOptions::default())
    }

    pub fn open_with(path: impl AsRef<Path>, options: StoreOptions) -> Result<Self> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(StoreError::io("create database directory"))?;
        }
        let conn = Connection::open(path).map_err(StoreError::db("open database"))?;
        info!(path = %path.display(), "sqlite store opened");
        Self::from_connection(conn, options)
    }

    pub fn open_in_memory() -> Result<Self> {
        Self::open_in_memory_with(StoreOptions::default())
    }

    pub fn open_in_memory_with(options: StoreOptions) -> Result<Self> {
        let conn = Connection::open_in_memory().map_err(StoreError::db("open database"))?;
        Self::from_connection(conn, options)
    }

    fn from_connection(conn: Connection, options: StoreOptions) -> Result<Self> {
        init_schema(&conn)?;
        Ok(Self {
            inner: Mutex::new(SqlInner {
                conn,
                cache: CachedDefaults::default(),
            }),
            options,
        })
    }

    fn lock(&self) -> MutexGuard<'_, SqlInner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn now(&self) -> DateTime<Utc> {
        self.options.clock.now()
    }

    /// Reads the config row, filling the cache on the way.
    fn load_config(&self, inner: &mut SqlInner) -> Result<Config> {
        let config = ensure_config(&inner.conn, &self.options.defaults)?;
        inner.cache.currency = Some(config.currency.clone());
        inner.cache.start_date = Some(config.start_date);
        Ok(config)
    }

    fn default_currency(&self, inner: &mut SqlInner) -> Result<String> {
        match &inner.cache.currency {
            Some(currency) => Ok(currency.clone()),
            None => Ok(self.load_config(inner)?.currency),
        }
    }

    /// Runs a single-column update against the config row, creating it first if needed.
    fn set_config_value<P: rusqlite::ToSql>(
        &self,
        inner: &mut SqlInner,
        column: &'static str,
        value: P,
    ) -> Result<()> {
        ensure_config(&inner.conn, &self.options.defaults)?;
        let sql = format!("UPDATE config SET {column} = ?1 WHERE id = ?2");
        inner
            .conn
            .execute(&sql, params![value, CONFIG_ID])
            .map_err(StoreError::db("update config"))?;
        debug!(column, "config updated");
        Ok(())
    }
}

impl Storage for SqlStore {
    fn config(&self) -> Result<Config> {
        let mut inner = self.lock();
        let mut config = self.load_config(&mut inner)?;
        config.recurring_expenses = load_templates(&inner.conn)?;
        Ok(config)
    }

    fn currency(&self) -> Result<String> {
        let mut inner = self.lock();
        self.default_currency(&mut inner)
    }

    fn start_date(&self) -> Result<u32> {
        let mut inner = self.lock();
        match inner.cache.start_date {
            Some(start_date) => Ok(start_date),
            None => Ok(self.load_config(&mut inner)?.start_date),
        }
    }

    fn update_categories(&self, categories: Vec<String>) -> Result<()> {
        let categories = validate_categories(&categories)?;
        let encoded =
            serde_json::to_string(&categories).map_err(StoreError::serde("encode categories"))?;
        let mut inner = self.lock();
        self.set_config_value(&mut inner, "categories", encoded)
    }

    fn update_currency(&self, currency: &str) -> Result<()> {
        let currency = normalize_currency(currency)?;
        let mut inner = self.lock();
        self.set_config_value(&mut inner, "currency", &currency)?;
        inner.cache.currency = Some(currency);
        Ok(())
    }

    fn update_start_date(&self, start_date: u32) -> Result<()> {
        let start_date = check_start_date(start_date)?;
        let mut inner = self.lock();
        self.set_config_value(&mut inner, "start_date", start_date)?;
        inner.cache.start_date = Some(start_date);
        Ok(())
    }

    fn update_language(&self, language: &str) -> Result<()> {
        let language = normalize_language(language)?;
        let mut inner = self.lock();
        self.set_config_value(&mut inner, "language", language)
    }

    fn update_opening_balance(&self, balance: f64) -> Result<()> {
        let balance = check_balance(balance)?;
        let mut inner = self.lock();
        self.set_config_value(&mut inner, "opening_balance", balance)
    }

    fn update_use_manual_balances(&self, enabled: bool) -> Result<()> {
        let mut inner = self.lock();
        self.set_config_value(&mut inner, "use_manual_balances", enabled)
    }

    fn update_manual_balances(&self, balances: BTreeMap<String, f64>) -> Result<()> {
        check_balances(&balances)?;
        let encoded = serde_json::to_string(&balances)
            .map_err(StoreError::serde("encode manual balances"))?;
        let mut inner = self.lock();
        self.set_config_value(&mut inner, "manual_balances", encoded)
    }

    fn transactions(&self) -> Result<Vec<Transaction>> {
        let inner = self.lock();
        let sql = format!("{SELECT_TRANSACTION} ORDER BY date DESC, id ASC");
        let mut stmt = inner
            .conn
            .prepare(&sql)
            .map_err(StoreError::db("list transactions"))?;
        let rows = stmt
            .query_map([], read_transaction)
            .map_err(StoreError::db("list transactions"))?;
        rows.collect::<rusqlite::Result<Vec<_>>>()
            .map_err(StoreError::db("list transactions"))
    }

    fn transaction(&self, id: &str) -> Result<Transaction> {
        let inner = self.lock();
        let sql = format!("{SELECT_TRANSACTION} WHERE id = ?1");
        inner
            .conn
            .query_row(&sql, params![id], read_transaction)
            .optional()
            .map_err(StoreError::db("get transaction"))?
            .ok_or_else(|| StoreError::not_found(Entity::Transaction, id))
    }

    fn add_transaction(&self, mut transaction: Transaction) -> Result<Transaction> {
        let now = self.now();
        let mut inner = self.lock();
        let currency = self.default_currency(&mut inner)?;
        prepare_new_transaction(&mut transaction, &currency, now)?;
        ensure_config(&inner.conn, &self.options.defaults)?;

        if transaction.has_id() {
            if transaction_exists(&inner.conn, &transaction.id)? {
                return Err(ValidationError::DuplicateId(transaction.id).into());
            }
        } else {
            transaction.id = next_transaction_id(&inner.conn, transaction.is_gain())?;
        }
        insert_transaction(&inner.conn, &transaction)?;
        debug!(id = %transaction.id, amount = transaction.amount, "transaction added");
        Ok(transaction)
    }

    fn remove_transaction(&self, id: &str) -> Result<()> {
        let inner = self.lock();
        let removed = inner
            .conn
            .execute("DELETE FROM expenses WHERE id = ?1", params![id])
            .map_err(StoreError::db("delete transaction"))?;
        if removed == 0 {
            return Err(StoreError::not_found(Entity::Transaction, id));
        }
        debug!(id, "transaction removed");
        Ok(())
    }

    fn remove_transactions(&self, ids: &[String]) -> Result<usize> {
        if ids.is_empty() {
            return Ok(0);
        }
        let mut inner = self.lock();
        let tx = inner
            .conn
            .transaction()
            .map_err(StoreError::db("begin transaction"))?;
        let mut removed = 0;
        {
            let mut stmt = tx
                .prepare("DELETE FROM expenses WHERE id = ?1")
                .map_err(StoreError::db("delete transactions"))?;
            for id in ids {
                removed += stmt
                    .execute(params![id])
                    .map_err(StoreError::db("delete transactions"))?;
            }
        }
        tx.commit().map_err(StoreError::db("commit"))?;
        debug!(requested = ids.len(), removed, "transactions removed");
        Ok(removed)
    }

    fn update_transaction(&self, id: &str, mut transaction: Transaction) -> Result<Transaction> {
        let mut inner = self.lock();
        let currency = self.default_currency(&mut inner)?;
        prepare_updated_transaction(id, &mut transaction, &currency)?;
        let changed = inner
            .conn
            .execute(
                r#"UPDATE expenses SET recurring_id = ?1, description = ?2, "from" = ?3, "to" = ?4, method = ?5, note = ?6, category = ?7, amount = ?8, currency = ?9, date = ?10 WHERE id = ?11"#,
                params![
                    transaction.recurring_id,
                    transaction.description,
                    transaction.from,
                    transaction.to,
                    transaction.method,
                    transaction.note,
                    transaction.category,
                    transaction.amount,
                    transaction.currency.as_deref().unwrap_or_default(),
                    transaction.date,
                    id,
                ],
            )
            .map_err(StoreError::db("update transaction"))?;
        if changed == 0 {
            return Err(StoreError::not_found(Entity::Transaction, id));
        }
        debug!(id, "transaction updated");
        Ok(transaction)
    }

    fn recurring_templates(&self) -> Result<Vec<RecurringTemplate>> {
        let inner = self.lock();
        load_templates(&inner.conn)
    }

    fn recurring_template(&self, id: &str) -> Result<RecurringTemplate> {
        let inner = self.lock();
        let sql = format!("{SELECT_TEMPLATE} WHERE id = ?1");
        inner
            .conn
            .query_row(&sql, params![id], read_template)
            .optional()
            .map_err(StoreError::db("get recurring template"))?
            .ok_or_else(|| StoreError::not_found(Entity::RecurringTemplate, id))
    }

    fn add_recurring_template(&self, mut template: RecurringTemplate) -> Result<RecurringTemplate> {
        let now = self.now();
        let mut guard = self.lock();
        let currency = self.default_currency(&mut guard)?;
        prepare_template(&mut template, &currency)?;
        ensure_config(&guard.conn, &self.options.defaults)?;

        let inner = &mut *guard;
        let tx = inner
            .conn
            .transaction()
            .map_err(StoreError::db("begin transaction"))?;
        template.id = template.id.trim().to_string();
        if template.id.is_empty() {
            template.id = Uuid::new_v4().to_string();
        } else if template_exists(&tx, &template.id)? {
            return Err(ValidationError::DuplicateId(template.id).into());
        }

        tx.execute(
            r#"INSERT INTO recurring_expenses (id, description, amount, currency, "from", "to", method, note, category, start_date, interval, occurrences) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)"#,
            params![
                template.id,
                template.description,
                template.amount,
                template.currency.as_deref().unwrap_or_default(),
                template.from,
                template.to,
                template.method,
                template.note,
                template.category,
                template.start_date,
                template.interval.as_str(),
                template.occurrences,
            ],
        )
        .map_err(StoreError::db("insert recurring template"))?;

        let count = insert_instances(&tx, expand(&template, false, now))?;
        tx.commit().map_err(StoreError::db("commit"))?;
        info!(id = %template.id, instances = count, "recurring template added");
        Ok(template)
    }

    fn update_recurring_template(
        &self,
        id: &str,
        mut template: RecurringTemplate,
        update_all: bool,
    ) -> Result<RecurringTemplate> {
        let now = self.now();
        let mut guard = self.lock();
        let currency = self.default_currency(&mut guard)?;
        prepare_template(&mut template, &currency)?;
        template.id = id.to_string();

        let inner = &mut *guard;
        let tx = inner
            .conn
            .transaction()
            .map_err(StoreError::db("begin transaction"))?;
        let changed = tx
            .execute(
                r#"UPDATE recurring_expenses SET description = ?1, amount = ?2, currency = ?3, "from" = ?4, "to" = ?5, method = ?6, note = ?7, category = ?8, start_date = ?9, interval = ?10, occurrences = ?11 WHERE id = ?12"#,
                params![
                    template.description,
                    template.amount,
                    template.currency.as_deref().unwrap_or_default(),
                    template.from,
                    template.to,
                    template.method,
                    template.note,
                    template.category,
                    template.start_date,
                    template.interval.as_str(),
                    template.occurrences,
                    id,
                ],
            )
            .map_err(StoreError::db("update recurring template"))?;
        if changed == 0 {
            return Err(StoreError::not_found(Entity::RecurringTemplate, id));
        }

        let kept_one_at_now = if update_all {
            tx.execute("DELETE FROM expenses WHERE recurring_id = ?1", params![id])
                .map_err(StoreError::db("delete instances"))?;
            false
        } else {
            tx.execute(
                "DELETE FROM expenses WHERE recurring_id = ?1 AND date > ?2",
                params![id, now],
            )
            .map_err(StoreError::db("delete instances"))?;
            tx.query_row(
                "SELECT EXISTS(SELECT 1 FROM expenses WHERE recurring_id = ?1 AND date = ?2)",
                params![id, now],
                |row| row.get::<_, bool>(0),
            )
            .map_err(StoreError::db("delete instances"))?
        };

        let mut instances = expand(&template, !update_all, now);
        skip_retained_occurrence(&mut instances, now, kept_one_at_now);
        let count = insert_instances(&tx, instances)?;
        tx.commit().map_err(StoreError::db("commit"))?;
        info!(id, update_all, instances = count, "recurring template updated");
        Ok(template)
    }

    fn remove_recurring_template(&self, id: &str, remove_all: bool) -> Result<()> {
        let now = self.now();
        let mut guard = self.lock();
        let tx = guard
            .conn
            .transaction()
            .map_err(StoreError::db("begin transaction"))?;
        let removed = tx
            .execute("DELETE FROM recurring_expenses WHERE id = ?1", params![id])
            .map_err(StoreError::db("delete recurring template"))?;
        if removed == 0 {
            return Err(StoreError::not_found(Entity::RecurringTemplate, id));
        }
        let instances = if remove_all {
            tx.execute("DELETE FROM expenses WHERE recurring_id = ?1", params![id])
        } else {
            tx.execute(
                "DELETE FROM expenses WHERE recurring_id = ?1 AND date > ?2",
                params![id, now],
            )
        }
        .map_err(StoreError::db("delete instances"))?;
        tx.commit().map_err(StoreError::db("commit"))?;
        info!(id, remove_all, instances, "recurring template removed");
        Ok(())
    }
}

fn init_schema(conn: &Connection) -> Result<()> {
    conn.execute_batch(SCHEMA)
        .map_err(StoreError::db("create schema"))?;
    for (table, column, statement) in MIGRATIONS {
        if column_exists(conn, table, column)? {
            continue;
        }
        conn.execute_batch(statement)
            .map_err(StoreError::db("migrate schema"))?;
        info!(table, column, "added column");
    }
    Ok(())
}

fn column_exists(conn: &Connection, table: &str, column: &str) -> Result<bool> {
    conn.query_row(
        "SELECT EXISTS(SELECT 1 FROM pragma_table_info(?1) WHERE name = ?2)",
        params![table, column],
        |row| row.get::<_, bool>(0),
    )
    .map_err(StoreError::db("inspect schema"))
}

/// Reads the config row, inserting the defaults when it is missing.
fn ensure_config(conn: &Connection, defaults: &ConfigDefaults) -> Result<Config> {
    let row = conn
        .query_row(
            "SELECT categories, currency, start_date, language, voucher_counter, receipt_counter, opening_balance, use_manual_balances, manual_balances FROM config WHERE id = ?1",
            params![CONFIG_ID],
            |row| {
                Ok((
                    row.get::<_, String>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, u32>(2)?,
                    row.get::<_, String>(3)?,
                    row.get::<_, u32>(4)?,
                    row.get::<_, u32>(5)?,
                    row.get::<_, f64>(6)?,
                    row.get::<_, bool>(7)?,
                    row.get::<_, String>(8)?,
                ))
            },
        )
        .optional()
        .map_err(StoreError::db("read config"))?;

    let Some(row) = row else {
        let config = Config::from_defaults(defaults);
        let categories = serde_json::to_string(&config.categories)
            .map_err(StoreError::serde("encode categories"))?;
        conn.execute(
            "INSERT INTO config (id, categories, currency, start_date, language) VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                CONFIG_ID,
                categories,
                config.currency,
                config.start_date,
                config.language
            ],
        )
        .map_err(StoreError::db("insert default config"))?;
        info!("created default configuration row");
        return Ok(config);
    };
    let (
        categories,
        currency,
        start_date,
        language,
        vouchers,
        receipts,
        opening,
        manual,
        balances,
    ) = row;

    let mut config = Config::from_defaults(defaults);
    config.categories =
        serde_json::from_str(&categories).map_err(StoreError::serde("decode categories"))?;
    config.currency = currency;
    config.start_date = start_date;
    config.language = if language.is_empty() {
        defaults.language.to_string()
    } else {
        language
    };
    config.voucher_counter = vouchers;
    config.receipt_counter = receipts;
    config.opening_balance = opening;
    config.use_manual_balances = manual;
    config.manual_balances =
        serde_json::from_str(&balances).map_err(StoreError::serde("decode manual balances"))?;
    Ok(config)
}

/// Bumps the matching counter and returns an ID no row uses yet.
fn next_transaction_id(conn: &Connection, is_gain: bool) -> Result<String> {
    let column = if is_gain {
        "receipt_counter"
    } else {
        "voucher_counter"
    };
    let sql = format!(
        "UPDATE config SET {column} = {column} + 1 WHERE id = ?1 AND {column} < ?2 RETURNING {column}"
    );
    loop {
        let counter: u32 = conn
            .query_row(&sql, params![CONFIG_ID, u32::MAX], |row| row.get(0))
            .optional()
            .map_err(StoreError::db("advance id counter"))?
            .ok_or(ValidationError::CounterExhausted)?;
        let id = crate::domain::generate_transaction_id(is_gain, counter);
        if !transaction_exists(conn, &id)? {
            return Ok(id);
        }
        warn!(%id, "generated id already in use, skipping");
    }
}

fn transaction_exists(conn: &Connection, id: &str) -> Result<bool> {
    conn.query_row(
        "SELECT EXISTS(SELECT 1 FROM expenses WHERE id = ?1)",
        params![id],
        |row| row.get::<_, bool>(0),
    )
    .map_err(StoreError::db("check transaction id"))
}

fn template_exists(conn: &Connection, id: &str) -> Result<bool> {
    conn.query_row(
        "SELECT EXISTS(SELECT 1 FROM recurring_expenses WHERE id = ?1)",
        params![id],
        |row| row.get::<_, bool>(0),
    )
    .map_err(StoreError::db("check recurring template id"))
}

fn insert_transaction(conn: &Connection, transaction: &Transaction) -> Result<()> {
    conn.execute(INSERT_TRANSACTION, transaction_params(transaction).as_slice())
        .map_err(StoreError::db("insert transaction"))?;
    Ok(())
}

/// Assigns IDs and inserts `instances` with one prepared statement.
fn insert_instances(conn: &Connection, instances: Vec<Transaction>) -> Result<usize> {
    if instances.is_empty() {
        return Ok(0);
    }
    let mut stmt = conn
        .prepare(INSERT_TRANSACTION)
        .map_err(StoreError::db("insert instances"))?;
    let count = instances.len();
    for mut instance in instances {
        instance.id = next_transaction_id(conn, instance.is_gain())?;
        stmt.execute(transaction_params(&instance).as_slice())
            .map_err(StoreError::db("insert instances"))?;
    }
    Ok(count)
}

fn transaction_params(transaction: &Transaction) -> [&dyn rusqlite::ToSql; 11] {
    [
        &transaction.id,
        &transaction.recurring_id,
        &transaction.description,
        &transaction.from,
        &transaction.to,
        &transaction.method,
        &transaction.note,
        &transaction.category,
        &transaction.amount,
        &transaction.currency,
        &transaction.date,
    ]
}

fn load_templates(conn: &Connection) -> Result<Vec<RecurringTemplate>> {
    let sql = format!("{SELECT_TEMPLATE} ORDER BY start_date ASC, id ASC");
    let mut stmt = conn
        .prepare(&sql)
        .map_err(StoreError::db("list recurring templates"))?;
    let rows = stmt
        .query_map([], read_template)
        .map_err(StoreError::db("list recurring templates"))?;
    rows.collect::<rusqlite::Result<Vec<_>>>()
        .map_err(StoreError::db("list recurring templates"))
}

fn read_transaction(row: &Row<'_>) -> rusqlite::Result<Transaction> {
    Ok(Transaction {
        id: row.get(0)?,
        recurring_id: row.get(1)?,
        description: row.get(2)?,
        from: row.get(3)?,
        to: row.get(4)?,
        method: row.get(5)?,
        note: row.get(6)?,
        category: row.get(7)?,
        amount: row.get(8)?,
        currency: row.get(9)?,
        date: row.get(10)?,
    })
}

fn read_template(row: &Row<'_>) -> rusqlite::Result<RecurringTemplate> {
    Ok(RecurringTemplate {
        id: row.get(0)?,
        description: row.get(1)?,
        amount: row.get(2)?,
        currency: row.get(3)?,
        from: row.get(4)?,
        to: row.get(5)?,
        method: row.get(6)?,
        note: row.get(7)?,
        category: row.get(8)?,
        start_date: row.get(9)?,
        interval: RecurrenceInterval::from(row.get::<_, String>(10)?),
        occurrences: row.get(11)?,
    })
}
