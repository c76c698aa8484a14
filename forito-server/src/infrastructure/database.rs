use anyhow::{Context, Result};
use bson::doc;
use mongodb::{Client, Database};
use tracing::info;

pub(crate) async fn connect(uri: &str, db_name: &str) -> Result<Database> {
    let client = Client::with_uri_str(uri)
        .await
        .context("failed to create MongoDB client")?;
    let database = client.database(db_name);

    database
        .run_command(doc! { "ping": 1 })
        .await
        .context("MongoDB ping failed")?;

    info!("connected to MongoDB database '{db_name}'");
    Ok(database)
}
