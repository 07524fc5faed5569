use std::{
    collections::{BTreeMap, HashSet},
    fs::{self, File},
    io::Write,
    path::{Path, PathBuf},
    sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard},
};

use chrono::{DateTime, Utc};
use serde::{de::DeserializeOwned, Serialize};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::{
    currency::{normalize_currency, normalize_language},
    domain::{position_by_id, Amounted, Config, RecurringTemplate, Transaction},
    errors::{Entity, Result, StoreError, ValidationError},
    recurrence::expand,
    validation::validate_categories,
};

use super::{
    check_balance, check_balances, check_start_date, prepare_new_transaction, prepare_template,
    prepare_updated_transaction, skip_retained_occurrence, sort_newest_first, Storage,
    StoreOptions,
};

pub const TRANSACTIONS_FILE: &str = "expenses.json";
pub const CONFIG_FILE: &str = "config.json";
const TMP_SUFFIX: &str = "tmp";

#[derive(Debug, Clone)]
struct StoreState {
    config: Config,
    transactions: Vec<Transaction>,
}

/// File-backed store holding everything in memory behind one reader/writer lock.
///
/// Every write serializes the affected document to a temporary file, renames
/// it over the original, and only then replaces the in-memory copy. Recurring
/// template changes write the configuration (which holds the rule) before the
/// transactions; a crash between the two leaves the rule without its
/// instances.
#[derive(Debug)]
pub struct JsonStore {
    dir: PathBuf,
    transactions_path: PathBuf,
    config_path: PathBuf,
    options: StoreOptions,
    state: RwLock<StoreState>,
}

impl JsonStore {
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self> {
        Self::open_with(dir, StoreOptions::default())
    }

    /// Opens the store in `dir`, creating missing files from the defaults.
    pub fn open_with(dir: impl Into<PathBuf>, options: StoreOptions) -> Result<Self> {
        let dir = dir.into();
        ensure_dir(&dir)?;
        let transactions_path = dir.join(TRANSACTIONS_FILE);
        let config_path = dir.join(CONFIG_FILE);

        let mut config = match read_json::<Config>(&config_path, "read config")? {
            Some(config) => config,
            None => {
                let config = Config::from_defaults(&options.defaults);
                write_json(&config_path, &config, "write config")?;
                info!(path = %config_path.display(), "created default configuration");
                config
            }
        };
        if config.language.is_empty() {
            config.language = options.defaults.language.to_string();
        }

        let transactions =
            match read_json::<Vec<Transaction>>(&transactions_path, "read transactions")? {
                Some(transactions) => transactions,
                None => {
                    let empty: Vec<Transaction> = Vec::new();
                    write_json(&transactions_path, &empty, "write transactions")?;
                    Vec::new()
                }
            };

        info!(
            dir = %dir.display(),
            transactions = transactions.len(),
            templates = config.recurring_expenses.len(),
            "json store opened"
        );
        Ok(Self {
            dir,
            transactions_path,
            config_path,
            options,
            state: RwLock::new(StoreState {
                config,
                transactions,
            }),
        })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn read(&self) -> RwLockReadGuard<'_, StoreState> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, StoreState> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }

    fn now(&self) -> DateTime<Utc> {
        self.options.clock.now()
    }

    fn persist_config(&self, config: &Config) -> Result<()> {
        write_json(&self.config_path, config, "write config")
    }

    fn persist_transactions(&self, transactions: &[Transaction]) -> Result<()> {
        write_json(&self.transactions_path, transactions, "write transactions")
    }

    /// Applies `mutate` to a copy of the configuration and commits it once written.
    fn update_config<F>(&self, mutate: F) -> Result<()>
    where
        F: FnOnce(&mut Config) -> Result<()>,
    {
        let mut state = self.write();
        let mut config = state.config.clone();
        mutate(&mut config)?;
        self.persist_config(&config)?;
        state.config = config;
        Ok(())
    }

    /// Commits the configuration first, then the transactions.
    fn commit(
        &self,
        state: &mut StoreState,
        config: Option<Config>,
        transactions: Option<Vec<Transaction>>,
    ) -> Result<()> {
        if let Some(config) = config {
            self.persist_config(&config)?;
            state.config = config;
        }
        if let Some(transactions) = transactions {
            self.persist_transactions(&transactions)?;
            state.transactions = transactions;
        }
        Ok(())
    }
}

impl Storage for JsonStore {
    fn config(&self) -> Result<Config> {
        Ok(self.read().config.clone())
    }

    fn update_categories(&self, categories: Vec<String>) -> Result<()> {
        let categories = validate_categories(&categories)?;
        self.update_config(|config| {
            config.categories = categories;
            Ok(())
        })
    }

    fn update_currency(&self, currency: &str) -> Result<()> {
        let currency = normalize_currency(currency)?;
        self.update_config(|config| {
            config.currency = currency;
            Ok(())
        })
    }

    fn update_start_date(&self, start_date: u32) -> Result<()> {
        let start_date = check_start_date(start_date)?;
        self.update_config(|config| {
            config.start_date = start_date;
            Ok(())
        })
    }

    fn update_language(&self, language: &str) -> Result<()> {
        let language = normalize_language(language)?;
        self.update_config(|config| {
            config.language = language;
            Ok(())
        })
    }

    fn update_opening_balance(&self, balance: f64) -> Result<()> {
        let balance = check_balance(balance)?;
        self.update_config(|config| {
            config.opening_balance = balance;
            Ok(())
        })
    }

    fn update_use_manual_balances(&self, enabled: bool) -> Result<()> {
        self.update_config(|config| {
            config.use_manual_balances = enabled;
            Ok(())
        })
    }

    fn update_manual_balances(&self, balances: BTreeMap<String, f64>) -> Result<()> {
        check_balances(&balances)?;
        self.update_config(|config| {
            config.manual_balances = balances;
            Ok(())
        })
    }

    fn transactions(&self) -> Result<Vec<Transaction>> {
        let mut transactions = self.read().transactions.clone();
        sort_newest_first(&mut transactions);
        Ok(transactions)
    }

    fn transaction(&self, id: &str) -> Result<Transaction> {
        self.read()
            .transactions
            .iter()
            .find(|transaction| transaction.id == id)
            .cloned()
            .ok_or_else(|| StoreError::not_found(Entity::Transaction, id))
    }

    fn add_transaction(&self, mut transaction: Transaction) -> Result<Transaction> {
        let now = self.now();
        let mut state = self.write();
        prepare_new_transaction(&mut transaction, &state.config.currency, now)?;

        let taken: HashSet<&str> = state.transactions.iter().map(|t| t.id.as_str()).collect();
        let mut config = state.config.clone();
        let counters_moved = if transaction.has_id() {
            if taken.contains(transaction.id.as_str()) {
                return Err(ValidationError::DuplicateId(transaction.id).into());
            }
            false
        } else {
            assign_id(&mut config, &taken, &mut transaction)?;
            true
        };
        drop(taken);

        let mut transactions = state.transactions.clone();
        transactions.push(transaction.clone());
        self.commit(
            &mut state,
            counters_moved.then_some(config),
            Some(transactions),
        )?;
        debug!(id = %transaction.id, amount = transaction.amount, "transaction added");
        Ok(transaction)
    }

    fn remove_transaction(&self, id: &str) -> Result<()> {
        let mut state = self.write();
        let index = position_by_id(&state.transactions, id)
            .ok_or_else(|| StoreError::not_found(Entity::Transaction, id))?;
        let mut transactions = state.transactions.clone();
        transactions.remove(index);
        self.commit(&mut state, None, Some(transactions))?;
        debug!(id, "transaction removed");
        Ok(())
    }

    fn remove_transactions(&self, ids: &[String]) -> Result<usize> {
        let targets: HashSet<&str> = ids.iter().map(String::as_str).collect();
        let mut state = self.write();
        let mut transactions = state.transactions.clone();
        let before = transactions.len();
        transactions.retain(|transaction| !targets.contains(transaction.id.as_str()));
        let removed = before - transactions.len();
        if removed > 0 {
            self.commit(&mut state, None, Some(transactions))?;
        }
        debug!(requested = ids.len(), removed, "transactions removed");
        Ok(removed)
    }

    fn update_transaction(&self, id: &str, mut transaction: Transaction) -> Result<Transaction> {
        let mut state = self.write();
        prepare_updated_transaction(id, &mut transaction, &state.config.currency)?;
        let index = position_by_id(&state.transactions, id)
            .ok_or_else(|| StoreError::not_found(Entity::Transaction, id))?;
        let mut transactions = state.transactions.clone();
        transactions[index] = transaction.clone();
        self.commit(&mut state, None, Some(transactions))?;
        debug!(id, "transaction updated");
        Ok(transaction)
    }

    fn recurring_templates(&self) -> Result<Vec<RecurringTemplate>> {
        Ok(self.read().config.recurring_expenses.clone())
    }

    fn recurring_template(&self, id: &str) -> Result<RecurringTemplate> {
        self.read()
            .config
            .recurring_expenses
            .iter()
            .find(|template| template.id == id)
            .cloned()
            .ok_or_else(|| StoreError::not_found(Entity::RecurringTemplate, id))
    }

    fn add_recurring_template(&self, mut template: RecurringTemplate) -> Result<RecurringTemplate> {
        let now = self.now();
        let mut state = self.write();
        prepare_template(&mut template, &state.config.currency)?;
        template.id = template.id.trim().to_string();
        if template.id.is_empty() {
            template.id = Uuid::new_v4().to_string();
        } else if position_by_id(&state.config.recurring_expenses, &template.id).is_some() {
            return Err(ValidationError::DuplicateId(template.id).into());
        }

        let mut config = state.config.clone();
        config.recurring_expenses.push(template.clone());
        let mut transactions = state.transactions.clone();
        let instances = expand(&template, false, now);
        let count = instances.len();
        append_instances(&mut config, &mut transactions, instances)?;

        self.commit(&mut state, Some(config), Some(transactions))?;
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
        let mut state = self.write();
        prepare_template(&mut template, &state.config.currency)?;
        template.id = id.to_string();
        let index = position_by_id(&state.config.recurring_expenses, id)
            .ok_or_else(|| StoreError::not_found(Entity::RecurringTemplate, id))?;

        let mut config = state.config.clone();
        config.recurring_expenses[index] = template.clone();

        let mut transactions = state.transactions.clone();
        let kept_one_at_now = !update_all
            && transactions
                .iter()
                .any(|transaction| transaction.belongs_to(id) && transaction.date == now);
        transactions.retain(|transaction| {
            !(transaction.belongs_to(id) && (update_all || transaction.date > now))
        });

        let mut instances = expand(&template, !update_all, now);
        skip_retained_occurrence(&mut instances, now, kept_one_at_now);
        let count = instances.len();
        append_instances(&mut config, &mut transactions, instances)?;

        self.commit(&mut state, Some(config), Some(transactions))?;
        info!(id, update_all, instances = count, "recurring template updated");
        Ok(template)
    }

    fn remove_recurring_template(&self, id: &str, remove_all: bool) -> Result<()> {
        let now = self.now();
        let mut state = self.write();
        let index = position_by_id(&state.config.recurring_expenses, id)
            .ok_or_else(|| StoreError::not_found(Entity::RecurringTemplate, id))?;

        let mut config = state.config.clone();
        config.recurring_expenses.remove(index);
        let mut transactions = state.transactions.clone();
        transactions.retain(|transaction| {
            !(transaction.belongs_to(id) && (remove_all || transaction.date > now))
        });

        self.commit(&mut state, Some(config), Some(transactions))?;
        info!(id, remove_all, "recurring template removed");
        Ok(())
    }
}

/// Gives `transaction` the next unused counter ID.
fn assign_id(
    config: &mut Config,
    taken: &HashSet<&str>,
    transaction: &mut Transaction,
) -> std::result::Result<(), ValidationError> {
    loop {
        let candidate = config.next_transaction_id(transaction.is_gain())?;
        if !taken.contains(candidate.as_str()) {
            transaction.id = candidate;
            return Ok(());
        }
        warn!(id = %candidate, "generated id already in use, skipping");
    }
}

fn append_instances(
    config: &mut Config,
    transactions: &mut Vec<Transaction>,
    instances: Vec<Transaction>,
) -> std::result::Result<(), ValidationError> {
    let existing: Vec<String> = transactions.iter().map(|t| t.id.clone()).collect();
    let taken: HashSet<&str> = existing.iter().map(String::as_str).collect();
    for mut instance in instances {
        assign_id(config, &taken, &mut instance)?;
        transactions.push(instance);
    }
    Ok(())
}

fn ensure_dir(dir: &Path) -> Result<()> {
    fs::create_dir_all(dir).map_err(StoreError::io("create data directory"))
}

fn read_json<T: DeserializeOwned>(path: &Path, operation: &'static str) -> Result<Option<T>> {
    if !path.exists() {
        return Ok(None);
    }
    let data = fs::read_to_string(path).map_err(StoreError::io(operation))?;
    if data.trim().is_empty() {
        return Ok(None);
    }
    serde_json::from_str(&data)
        .map(Some)
        .map_err(StoreError::serde(operation))
}

fn write_json<T: Serialize + ?Sized>(
    path: &Path,
    value: &T,
    operation: &'static str,
) -> Result<()> {
    let json = serde_json::to_string_pretty(value).map_err(StoreError::serde(operation))?;
    let tmp = tmp_path(path);
    write_atomic(&tmp, &json).map_err(StoreError::io(operation))?;
    fs::rename(&tmp, path).map_err(StoreError::io(operation))
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut tmp = path.to_path_buf();
    let ext = match path.extension().and_then(|ext| ext.to_str()) {
        Some(existing) => format!("{}.{}", existing, TMP_SUFFIX),
        None => TMP_SUFFIX.to_string(),
    };
    tmp.set_extension(ext);
    tmp
}

fn write_atomic(path: &Path, data: &str) -> std::io::Result<()> {
    let mut file = File::create(path)?;
    file.write_all(data.as_bytes())?;
    file.sync_all()
}
