use thiserror::Error;

/// Application-wide error type - single point of truth
#[derive(Error, Debug)]
pub enum AppError {
    /// Database operations
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// File I/O operations
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration issues
    #[error("Configuration error: {0}")]
    Config(String),

    /// Data validation/parsing
    #[error("Invalid data: {0}")]
    InvalidData(String),

    /// Token script could not be decoded
    #[error("Token error: {0}")]
    Token(#[from] TokenError),

    /// Transaction envelope could not be parsed or resolved
    #[error("BEEF error: {0}")]
    Beef(#[from] BeefError),

    /// Lookup service contract violations
    #[error("Lookup error: {0}")]
    Lookup(#[from] LookupError),

    /// Index already holds a record for this outpoint
    #[error("Duplicate outpoint: {txid}.{output_index}")]
    DuplicateOutpoint { txid: String, output_index: u32 },

    /// Admission arithmetic left the u64 range
    #[error("Amount overflow while totalling asset {asset_id}")]
    AmountOverflow { asset_id: String },
}

/// Token script decoding errors
///
/// The admission engine treats every variant as "not a token". The lookup
/// service surfaces them verbatim because an admitted output must decode.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TokenError {
    /// Script is not a lock-then-data-then-drop template
    #[error("Not a push-drop script: {0}")]
    NotPushDrop(String),

    /// Field count outside 2..=4
    #[error("Invalid field count: {0} (expected 2 to 4)")]
    InvalidFieldCount(usize),

    /// Amount field is not a positive base-10 integer
    #[error("Invalid amount: {0:?}")]
    InvalidAmount(String),

    /// A text field is not valid UTF-8
    #[error("Field {index} is not valid UTF-8")]
    InvalidEncoding { index: usize },

    /// Locking key push is not a valid secp256k1 public key
    #[error("Invalid owner key: {0}")]
    InvalidOwnerKey(String),
}

/// BEEF envelope errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BeefError {
    /// Unrecognised version prefix
    #[error("Unsupported BEEF version: 0x{0:08x}")]
    UnsupportedVersion(u32),

    /// Ran out of bytes mid-structure
    #[error("Truncated BEEF: {0}")]
    Truncated(String),

    /// Structure is present but malformed
    #[error("Malformed BEEF: {0}")]
    Malformed(String),

    /// Bundle contains no transactions
    #[error("BEEF contains no transactions")]
    Empty,

    /// Transaction referenced by txid is not carried in full
    #[error("Transaction not found in BEEF: {txid}")]
    TransactionNotFound { txid: String },

    /// Input index outside the transaction's inputs
    #[error("Input {index} out of range (transaction has {count} inputs)")]
    InputOutOfRange { index: u32, count: usize },

    /// Output index outside the transaction's outputs
    #[error("Output {index} out of range in {txid}")]
    OutputOutOfRange { txid: String, index: u32 },

    /// Merkle path does not contain the requested leaf
    #[error("Merkle path has no leaf for {txid}")]
    LeafNotFound { txid: String },
}

/// Lookup service contract errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LookupError {
    /// Query addressed to another lookup service
    #[error("Lookup service not supported: {service} (expected {expected})")]
    UnsupportedService { service: String, expected: String },

    /// Query body missing or JSON null
    #[error("A valid query must be provided")]
    MissingQuery,

    /// Query body present but not understood
    #[error("Invalid query: {0}")]
    InvalidQuery(String),

    /// Framework delivered the admission in a mode this service does not accept
    #[error("Invalid payload mode: {0} (expected locking-script)")]
    InvalidPayloadMode(String),
}

/// Application-wide result type - single point of truth
pub type AppResult<T> = Result<T, AppError>;

/// Result type for token decoding
pub type TokenResult<T> = Result<T, TokenError>;

/// Result type for envelope parsing
pub type BeefResult<T> = Result<T, BeefError>;

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::InvalidData(format!("JSON error: {}", err))
    }
}

impl From<hex::FromHexError> for AppError {
    fn from(err: hex::FromHexError) -> Self {
        AppError::InvalidData(format!("Hex error: {}", err))
    }
}

impl From<base64::DecodeError> for AppError {
    fn from(err: base64::DecodeError) -> Self {
        AppError::InvalidData(format!("Base64 error: {}", err))
    }
}

impl From<config::ConfigError> for AppError {
    fn from(err: config::ConfigError) -> Self {
        AppError::Config(err.to_string())
    }
}
