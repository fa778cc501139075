use bcrypt::BcryptError;
use mongodb::bson;
use tokio::task::JoinError;

#[cfg(feature = "kafka")]
use rdkafka::{error::KafkaError, message::OwnedMessage};

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ErrorCode {
    ConfigurationInvalid            = 0500,
    UnableToReadCredentials         = 0501,
    MongoDBError                    = 0503,
    InvalidBSON                     = 0504,
    InvalidJSON                     = 0505,
    KafkaSendError                  = 0506,
    NotificationFailed              = 0507,
    HashThreadingIssue              = 0508,
    HashingError                    = 0509,
    InvalidPHCFormat                = 0510,
    UnknownAlgorithmVariant         = 0511,
    TokenEncodingError              = 0512,
    FieldMandatory                  = 2000,
    PasswordTooShort                = 2002,
    PasswordTooLong                 = 2003,
    MissingUppercase                = 2004,
    MissingLowercase                = 2005,
    MissingNumber                   = 2006,
    MissingSymbol                   = 2007,
    PasswordUsedBefore              = 2012,
    EmailInUse                      = 2013,
    InvalidCredentials              = 2101,
    AccountLocked                   = 2102,
    PasswordExpired                 = 2104,
    InvalidCode                     = 2105,
    CodeExpired                     = 2106,
    CodeAttemptsExceeded            = 2107,
    ResetNotVerified                = 2200,
    ResetWindowExpired              = 2202,
    TokenMissing                    = 2300,
    TokenExpired                    = 2301,
    TokenInvalid                    = 2302,
    TokenRevoked                    = 2303,
    AccountGone                     = 2304,
}

///
/// The failure taxonomy exposed to the transport layer.
///
/// Everything except Internal carries a client-safe message. Internal failures must be
/// surfaced as an opaque error - the detail has already been logged server-side.
///
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ErrorKind {
    Validation,
    Authentication,
    Locked,
    Expired,
    NotFound,
    Internal,
}

impl ErrorCode {
    pub fn with_msg(&self, message: &str) -> AuthError {
        AuthError::new(*self, message)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct AuthError {
    error_code: ErrorCode,
    message: String,
}

impl AuthError {
    pub fn new(error_code: ErrorCode, message: &str) -> Self {
        AuthError { error_code, message: message.to_string() }
    }

    pub fn error_code(&self) -> ErrorCode {
        self.error_code
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn kind(&self) -> ErrorKind {
        use ErrorCode::*;

        match self.error_code {
            ConfigurationInvalid    |
            UnableToReadCredentials |
            MongoDBError            |
            InvalidBSON             |
            InvalidJSON             |
            KafkaSendError          |
            NotificationFailed      |
            HashThreadingIssue      |
            HashingError            |
            InvalidPHCFormat        |
            UnknownAlgorithmVariant |
            TokenEncodingError => ErrorKind::Internal,

            FieldMandatory     |
            PasswordTooShort   |
            PasswordTooLong    |
            MissingUppercase   |
            MissingLowercase   |
            MissingNumber      |
            MissingSymbol      |
            PasswordUsedBefore |
            EmailInUse => ErrorKind::Validation,

            // The session guard failures all collapse to Authentication so a caller
            // cannot probe which of token/signature/account was at fault.
            InvalidCredentials   |
            InvalidCode          |
            CodeAttemptsExceeded |
            TokenMissing         |
            TokenInvalid         |
            TokenExpired         |
            TokenRevoked         |
            AccountGone => ErrorKind::Authentication,

            AccountLocked => ErrorKind::Locked,

            PasswordExpired    |
            CodeExpired        |
            ResetWindowExpired => ErrorKind::Expired,

            ResetNotVerified => ErrorKind::NotFound,
        }
    }
}

impl From<config::ConfigError> for AuthError {
    fn from(error: config::ConfigError) -> Self {
        ErrorCode::ConfigurationInvalid.with_msg(&format!("The service configuration is not correct: {}", error))
    }
}

impl From<argon2::Error> for AuthError {
    fn from(error: argon2::Error) -> Self {
        ErrorCode::HashingError.with_msg(&format!("Invalid configuration for algorithm: {}", error))
    }
}

impl From<argon2::password_hash::Error> for AuthError {
    fn from(error: argon2::password_hash::Error) -> Self {
        ErrorCode::HashingError.with_msg(&format!("Unable to hash secret: {}", error))
    }
}

impl From<BcryptError> for AuthError {
    fn from(error: BcryptError) -> Self {
        ErrorCode::HashingError.with_msg(&format!("Unable to hash secret: {}", error))
    }
}

impl From<serde_json::Error> for AuthError {
    fn from(error: serde_json::Error) -> Self {
        ErrorCode::InvalidJSON.with_msg(&format!("Unable to convert to json: {}", error))
    }
}

impl From<mongodb::error::Error> for AuthError {
    fn from(error: mongodb::error::Error) -> Self {
        ErrorCode::MongoDBError.with_msg(&format!("MongoDB error: {}", error))
    }
}

impl From<bson::ser::Error> for AuthError {
    fn from(error: bson::ser::Error) -> Self {
        ErrorCode::InvalidBSON.with_msg(&format!("Unable to serialise BSON: {}", error))
    }
}

impl From<bson::de::Error> for AuthError {
    fn from(error: bson::de::Error) -> Self {
        ErrorCode::InvalidBSON.with_msg(&format!("Unable to deserialise BSON: {}", error))
    }
}

impl From<JoinError> for AuthError {
    fn from(error: JoinError) -> Self {
        ErrorCode::HashThreadingIssue.with_msg(&format!("Unable to hash: {}", error))
    }
}

impl From<jsonwebtoken::errors::Error> for AuthError {
    fn from(error: jsonwebtoken::errors::Error) -> Self {
        ErrorCode::TokenEncodingError.with_msg(&format!("Unable to encode token: {}", error))
    }
}

#[cfg(feature = "kafka")]
impl From<(KafkaError, OwnedMessage)> for AuthError {
    fn from((error, message): (KafkaError, OwnedMessage)) -> Self {
        ErrorCode::KafkaSendError.with_msg(&format!("Kafka error: {}, message: {:?}", error, message))
    }
}
