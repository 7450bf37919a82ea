//! The desk is the interface a front end talks to. It binds the store, the
//! identity collection, the session, the rate board and the ledger, and it
//! owns the one piece of cross-component state: the rate catalog most
//! recently shown, which is the catalog any calculation must price against.

use derive_more::{Display, Error};
use log::{error, info};
use serde::{Deserialize, Serialize};

use crate::convert::{convert, minimum_amount, Direction, LOCAL_CURRENCY};
use crate::identity::{IdentityError, IdentityStore, RegisterRequest, SessionUser};
use crate::ledger::{Ledger, LedgerStats, Transaction};
use crate::rates::{ExchangeRate, RateBoard};
use crate::session::Session;
use crate::store::{StorageBackend, Store, StoreError};

#[derive(Clone, Debug, Display, Error, PartialEq)]
pub enum DeskError {
    #[display("email already registered")]
    DuplicateEmail,
    #[display("email or credential did not match")]
    InvalidCredentials,
    #[display("validation failed: {_0}")]
    Validation(#[error(not(source))] String),
    #[display("corrupt value under key {_0}")]
    StorageCorrupt(#[error(not(source))] String),
    #[display("storage failed for key {_0}")]
    Storage(#[error(not(source))] String),
    #[display("no rate catalog available")]
    RateUnavailable,
    #[display("authentication required")]
    NotAuthenticated,
    #[display("administrator access required")]
    NotAuthorized,
}

impl From<StoreError> for DeskError {
    fn from(value: StoreError) -> Self {
        match value {
            StoreError::Corrupt { key } => DeskError::StorageCorrupt(key),
            StoreError::Io { key } => DeskError::Storage(key),
        }
    }
}

impl From<IdentityError> for DeskError {
    fn from(value: IdentityError) -> Self {
        match value {
            IdentityError::DuplicateEmail => DeskError::DuplicateEmail,
            IdentityError::InvalidCredentials => DeskError::InvalidCredentials,
            IdentityError::Validation(message) => DeskError::Validation(message),
            IdentityError::Storage(err) => err.into(),
        }
    }
}

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct CreateTransactionRequest {
    pub direction: Direction,
    pub currency: String,
    pub amount: f64,
    pub payment_method: String,
}

impl CreateTransactionRequest {
    pub fn validate(&self) -> Result<(), DeskError> {
        if self.currency.trim().is_empty() {
            return Err(DeskError::Validation("currency is required".to_string()));
        }
        if self.payment_method.trim().is_empty() {
            return Err(DeskError::Validation(
                "payment method is required".to_string(),
            ));
        }
        if !self.amount.is_finite() || self.amount <= 0.0 {
            return Err(DeskError::Validation(
                "amount must be greater than zero".to_string(),
            ));
        }
        let minimum = minimum_amount(self.direction);
        if self.amount < minimum {
            let denomination = match self.direction {
                Direction::Buy => LOCAL_CURRENCY,
                Direction::Sell => self.currency.as_str(),
            };
            return Err(DeskError::Validation(format!(
                "minimum amount is {minimum} {denomination}"
            )));
        }
        Ok(())
    }
}

/// What a calculation comes back as before anything is recorded.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
pub struct ConversionPreview {
    pub direction: Direction,
    pub source_currency: String,
    pub target_currency: String,
    pub source_amount: f64,
    pub rate_applied: f64,
    pub converted_amount: f64,
}

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct DatabaseDump {
    pub users: Vec<SessionUser>,
    pub transactions: Vec<Transaction>,
}

pub struct Desk<B: StorageBackend> {
    store: Store<B>,
    session: Session,
    board: RateBoard,
    current_rates: Option<Vec<ExchangeRate>>,
}

impl<B: StorageBackend> Desk<B> {
    pub fn new(backend: B) -> Self {
        let mut store = Store::new(backend);
        if let Err(err) = IdentityStore::bootstrap(&mut store) {
            // Not fatal: the next mutating call rewrites the collection.
            error!("DESK: Administrator bootstrap failed: {err}");
        }
        let session = Session::load(&mut store);

        Self {
            store,
            session,
            board: RateBoard::new(),
            current_rates: None,
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn register(&mut self, request: &RegisterRequest) -> Result<SessionUser, DeskError> {
        let user = IdentityStore::register(&mut self.store, request)?;
        self.session.start(&mut self.store, user.clone())?;
        Ok(user)
    }

    pub fn login(&mut self, email: &str, credential: &str) -> Result<SessionUser, DeskError> {
        let user = IdentityStore::login(&self.store, email, credential)?;
        self.session.start(&mut self.store, user.clone())?;
        Ok(user)
    }

    pub fn logout(&mut self) {
        if let Some(user) = self.session.current() {
            info!("DESK: Logging out {}", user.email);
        }
        self.session.clear(&mut self.store);
    }

    /// Returns a freshly perturbed catalog and makes it the board every
    /// subsequent calculation prices against.
    pub fn fetch_rates(&mut self) -> Vec<ExchangeRate> {
        let rates = self.board.fluctuated();
        self.current_rates = Some(rates.clone());
        rates
    }

    /// The price for one currency on the current board. Fails when no board
    /// has been fetched yet or the code is not on it.
    pub fn quote(&self, code: &str, direction: Direction) -> Result<f64, DeskError> {
        let rates = self
            .current_rates
            .as_ref()
            .ok_or(DeskError::RateUnavailable)?;
        let rate = rates
            .iter()
            .find(|r| r.code == code)
            .ok_or(DeskError::RateUnavailable)?;
        Ok(match direction {
            Direction::Buy => rate.buy_price,
            Direction::Sell => rate.sell_price,
        })
    }

    pub fn preview(
        &self,
        request: &CreateTransactionRequest,
    ) -> Result<ConversionPreview, DeskError> {
        request.validate()?;
        let rate = self.quote(&request.currency, request.direction)?;

        let (source_currency, target_currency) = match request.direction {
            Direction::Buy => (LOCAL_CURRENCY.to_string(), request.currency.clone()),
            Direction::Sell => (request.currency.clone(), LOCAL_CURRENCY.to_string()),
        };
        Ok(ConversionPreview {
            direction: request.direction,
            source_currency,
            target_currency,
            source_amount: request.amount,
            rate_applied: rate,
            converted_amount: convert(request.amount, rate, request.direction),
        })
    }

    pub fn create_transaction(
        &mut self,
        request: &CreateTransactionRequest,
    ) -> Result<Transaction, DeskError> {
        request.validate()?;
        let user = self
            .session
            .current()
            .ok_or(DeskError::NotAuthenticated)?
            .clone();
        let rate = self.quote(&request.currency, request.direction)?;

        let transaction = Transaction::create(
            user.id,
            request.direction,
            &request.currency,
            request.amount,
            rate,
            request.payment_method.clone(),
        );
        Ledger::record(&mut self.store, transaction.clone())?;
        Ok(transaction)
    }

    pub fn history(&self) -> Result<Vec<Transaction>, DeskError> {
        let user = self.session.current().ok_or(DeskError::NotAuthenticated)?;
        Ok(Ledger::list_by_user(&self.store, &user.id))
    }

    pub fn admin_transactions(&self) -> Result<Vec<Transaction>, DeskError> {
        self.require_admin()?;
        Ok(Ledger::list_all(&self.store))
    }

    pub fn admin_stats(&self) -> Result<LedgerStats, DeskError> {
        self.require_admin()?;
        Ok(Ledger::stats(&self.store))
    }

    /// Everything the store holds, credentials stripped.
    pub fn admin_database(&self) -> Result<DatabaseDump, DeskError> {
        self.require_admin()?;
        Ok(DatabaseDump {
            users: IdentityStore::all_users(&self.store)
                .into_iter()
                .map(SessionUser::from)
                .collect(),
            transactions: Ledger::list_all(&self.store),
        })
    }

    fn require_admin(&self) -> Result<(), DeskError> {
        if !self.session.is_authenticated() {
            return Err(DeskError::NotAuthenticated);
        }
        if !self.session.is_admin() {
            return Err(DeskError::NotAuthorized);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::{CreateTransactionRequest, Desk, DeskError};
    use crate::convert::Direction;
    use crate::identity::RegisterRequest;
    use crate::store::MemoryStorage;

    fn register_request(email: &str) -> RegisterRequest {
        RegisterRequest {
            full_name: "Budi Santoso".to_string(),
            email: email.to_string(),
            phone: "081234567890".to_string(),
            address: "Jl. Sudirman 1".to_string(),
            id_number: "3174012345678901".to_string(),
            credential: "rahasia1".to_string(),
        }
    }

    fn buy_request(amount: f64) -> CreateTransactionRequest {
        CreateTransactionRequest {
            direction: Direction::Buy,
            currency: "USD".to_string(),
            amount,
            payment_method: "transfer".to_string(),
        }
    }

    fn desk_with_user() -> Desk<MemoryStorage> {
        let mut desk = Desk::new(MemoryStorage::new());
        desk.register(&register_request("budi@example.com")).unwrap();
        desk
    }

    #[test]
    fn test_that_register_logs_the_new_user_in() {
        let desk = desk_with_user();
        assert!(desk.session().is_authenticated());
        assert!(!desk.session().is_admin());
    }

    #[test]
    fn test_that_seeded_admin_can_login_immediately() {
        let mut desk = Desk::new(MemoryStorage::new());
        let user = desk.login("admin@dolarasia.com", "admin123").unwrap();
        assert!(user.is_admin);
        assert!(desk.session().is_admin());
    }

    #[test]
    fn test_that_quote_requires_a_fetched_board() {
        let desk = desk_with_user();
        assert_eq!(
            desk.quote("USD", Direction::Buy),
            Err(DeskError::RateUnavailable)
        );
    }

    #[test]
    fn test_that_quote_fails_for_unknown_currency() {
        let mut desk = desk_with_user();
        desk.fetch_rates();
        assert_eq!(
            desk.quote("CHF", Direction::Buy),
            Err(DeskError::RateUnavailable)
        );
    }

    #[test]
    fn test_that_transaction_prices_against_the_shown_board() {
        let mut desk = desk_with_user();
        let rates = desk.fetch_rates();
        let shown = rates.iter().find(|r| r.code == "USD").unwrap().buy_price;

        let tx = desk.create_transaction(&buy_request(100_000.0)).unwrap();
        assert_eq!(tx.rate_applied, shown);
        assert_eq!(tx.source_currency, "IDR");
        assert_eq!(tx.target_currency, "USD");
    }

    #[test]
    fn test_that_transactions_require_authentication() {
        let mut desk = Desk::new(MemoryStorage::new());
        desk.fetch_rates();
        let res = desk.create_transaction(&buy_request(100_000.0));
        assert_eq!(res, Err(DeskError::NotAuthenticated));
    }

    #[test]
    fn test_that_below_minimum_amounts_are_rejected_per_direction() {
        let mut desk = desk_with_user();
        desk.fetch_rates();

        let res = desk.create_transaction(&buy_request(49_999.0));
        assert!(matches!(res, Err(DeskError::Validation(_))));

        let sell = CreateTransactionRequest {
            direction: Direction::Sell,
            currency: "USD".to_string(),
            amount: 9.0,
            payment_method: "cash".to_string(),
        };
        assert!(matches!(
            desk.create_transaction(&sell),
            Err(DeskError::Validation(_))
        ));
    }

    #[test]
    fn test_that_preview_does_not_record_anything() {
        let mut desk = desk_with_user();
        desk.fetch_rates();

        let preview = desk.preview(&buy_request(100_000.0)).unwrap();
        assert!(preview.converted_amount > 0.0);
        assert!(desk.history().unwrap().is_empty());
    }

    #[test]
    fn test_that_history_only_shows_the_session_users_records() {
        let mut desk = desk_with_user();
        desk.fetch_rates();
        desk.create_transaction(&buy_request(100_000.0)).unwrap();

        desk.logout();
        desk.register(&register_request("siti@example.com")).unwrap();
        desk.fetch_rates();
        desk.create_transaction(&buy_request(200_000.0)).unwrap();

        let history = desk.history().unwrap();
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].source_amount, 200_000.0);
    }

    #[test]
    fn test_that_admin_views_are_gated() {
        let mut desk = desk_with_user();
        assert_eq!(desk.admin_transactions().err(), Some(DeskError::NotAuthorized));

        desk.logout();
        assert_eq!(
            desk.admin_transactions().err(),
            Some(DeskError::NotAuthenticated)
        );

        desk.login("admin@dolarasia.com", "admin123").unwrap();
        assert!(desk.admin_transactions().is_ok());
    }

    #[test]
    fn test_that_admin_database_strips_credentials() {
        let mut desk = desk_with_user();
        desk.logout();
        desk.login("admin@dolarasia.com", "admin123").unwrap();

        let dump = desk.admin_database().unwrap();
        assert_eq!(dump.users.len(), 2);
        let serialized = serde_json::to_string(&dump).unwrap();
        assert!(!serialized.contains("admin123"));
        assert!(!serialized.contains("rahasia1"));
    }

    #[test]
    fn test_that_admin_stats_count_recorded_transactions() {
        let mut desk = desk_with_user();
        desk.fetch_rates();
        desk.create_transaction(&buy_request(100_000.0)).unwrap();
        desk.create_transaction(&buy_request(60_000.0)).unwrap();

        desk.logout();
        desk.login("admin@dolarasia.com", "admin123").unwrap();
        let stats = desk.admin_stats().unwrap();
        assert_eq!(stats.total, 2);
        assert_eq!(stats.pending, 2);
    }
}
