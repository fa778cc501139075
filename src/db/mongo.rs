use std::fs;
use async_trait::async_trait;
use tracing::{debug, info};
use mongodb::error::ErrorKind;
use mongodb::{Client, Database, bson::{self, Document, doc}, options::ClientOptions};
use super::{CredentialStore, prelude::*};
use crate::model::account::Account;
use crate::utils::config::Configuration;
use crate::utils::errors::{ErrorCode, AuthError};

///
/// Run any schema-like updates against MongoDB that haven't been run yet.
///
pub async fn update_mongo(db: &Database) -> Result<(), AuthError> {
    create_init_indexes(db).await?;
    Ok(())
}

async fn create_init_indexes(db: &Database) -> Result<(), AuthError> {
    // Note: the current driver doesn't yet support creating indexes on collections, so the dbcommand must be used instead.
    // https://docs.mongodb.com/manual/reference/command/createIndexes/#createindexes

    db.run_command(doc! { "createIndexes": ACCOUNTS, "indexes": [
        { "key": { ACCOUNT_ID: 1 }, "name": "idx_account_id", "unique": true },
        { "key": { EMAIL: 1 },      "name": "idx_email",      "unique": true } ] }, None).await?;

    Ok(())
}

///
/// Indicates if the MongoDB error is from a duplicate key violation.
///
pub fn is_duplicate_err(err: &mongodb::error::Error) -> bool {
    let ec = err.clone();
    match *ec.kind {
        ErrorKind::Write(sub_err) => match sub_err {
            mongodb::error::WriteFailure::WriteError(we) => we.code == 11000 /* Duplicate insert */,
            _ => false,
        },
        _ => false
    }
}

pub async fn get_mongo_db(app_name: &str, config: &Configuration) -> Result<Database, AuthError> {

    let uri = match &config.mongo_credentials {
        Some(filename) => {
            debug!("Loading MongoDB credentials from secrets file {}", filename);

            // Read username and password from a secrets file.
            let credentials = fs::read_to_string(filename)
                .map_err(|err| AuthError::new(ErrorCode::UnableToReadCredentials, &format!("Unable to read credentials from {}: {}", filename, err)))?;
            let mut credentials = credentials.lines();
            let uri = config.mongo_uri.replace("$USERNAME", credentials.next().unwrap_or_default());
            uri.replace("$PASSWORD", credentials.next().unwrap_or_default())
        },
        None => config.mongo_uri.clone(),
    };

    // Parse the uri now.
    let mut client_options = ClientOptions::parse(&uri).await?;

    // Manually set an option.
    client_options.app_name = Some(app_name.to_string());

    // Get a handle to the deployment.
    let client = Client::with_options(client_options)?;

    info!("Connecting to MongoDB...");

    let db = client.database(&config.db_name);
    ping(&db).await?;

    info!("Connected to MongoDB");
    Ok(db)
}

pub async fn ping(db: &Database) -> Result<Document, AuthError> {
    Ok(db.run_command(doc! { "ping": 1 }, None).await?)
}

///
/// The production credential store - one document per account in the Accounts collection.
///
pub struct MongoCredentialStore {
    db: Database,
}

impl MongoCredentialStore {
    pub fn new(db: Database) -> Self {
        MongoCredentialStore { db }
    }
}

#[async_trait]
impl CredentialStore for MongoCredentialStore {
    async fn find_by_email(&self, email: &str) -> Result<Option<Account>, AuthError> {
        Ok(self.db.collection::<Account>(ACCOUNTS)
            .find_one(doc!{ EMAIL: email }, None)
            .await?)
    }

    async fn find_by_id(&self, account_id: &str) -> Result<Option<Account>, AuthError> {
        Ok(self.db.collection::<Account>(ACCOUNTS)
            .find_one(doc!{ ACCOUNT_ID: account_id }, None)
            .await?)
    }

    async fn insert(&self, account: &Account) -> Result<(), AuthError> {
        match self.db.collection::<Account>(ACCOUNTS).insert_one(account, None).await {
            Ok(_) => Ok(()),
            Err(err) => {
                match is_duplicate_err(&err) {
                    true  => Err(ErrorCode::EmailInUse.with_msg("an account with that email already exists")),
                    false => Err(AuthError::from(err)),
                }
            },
        }
    }

    async fn save(&self, account: &Account) -> Result<(), AuthError> {
        let filter = doc!{ ACCOUNT_ID: &account.account_id };

        self.db.collection::<Document>(ACCOUNTS)
            .replace_one(filter, bson::to_document(account)?, None)
            .await?;

        Ok(())
    }
}
