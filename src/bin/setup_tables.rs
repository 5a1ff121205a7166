//! CLI tool to create the DynamoDB users table
//!
//! Usage:
//!   cargo run --bin setup_tables
//!
//! For local development with DynamoDB Local:
//!   DYNAMODB_ENDPOINT_URL=http://localhost:8000 cargo run --bin setup_tables

use anyhow::Result;
use aws_sdk_dynamodb::types::{
    AttributeDefinition, BillingMode, KeySchemaElement, KeyType, ProvisionedThroughput,
    ScalarAttributeType,
};
use clap::Parser;
use user_service::{config::create_dynamodb_client, db::codec::USER_ID, Settings};

/// Create the DynamoDB users table
#[derive(Parser, Debug)]
#[command(name = "setup_tables")]
#[command(about = "Create the DynamoDB users table")]
struct Args {
    /// DynamoDB endpoint URL (for local development)
    #[arg(long)]
    endpoint_url: Option<String>,

    /// Table name (overrides DYNAMODB_USERS_TABLE env var)
    #[arg(long)]
    table: Option<String>,

    /// Provisioned read capacity; on-demand billing when omitted
    #[arg(long, requires = "write_capacity")]
    read_capacity: Option<i64>,

    /// Provisioned write capacity; on-demand billing when omitted
    #[arg(long, requires = "read_capacity")]
    write_capacity: Option<i64>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let mut settings = Settings::load()?;

    if let Some(url) = args.endpoint_url {
        settings.dynamodb_endpoint_url = Some(url);
    }
    if let Some(table) = args.table {
        settings.users_table = table;
    }
    if let Some(ref url) = settings.dynamodb_endpoint_url {
        println!("Using DynamoDB endpoint: {}", url);
    }

    let client = create_dynamodb_client(&settings).await;
    let capacity = args.read_capacity.zip(args.write_capacity);

    match create_users_table(&client, &settings.users_table, capacity).await {
        Ok(true) => println!("Created table: {}", settings.users_table),
        Ok(false) => println!("Table already exists: {}", settings.users_table),
        Err(e) => {
            eprintln!("Failed to create table {}: {}", settings.users_table, e);
            return Err(e);
        }
    }

    Ok(())
}

/// Create the users table keyed by `userId`. Returns false if it exists.
async fn create_users_table(
    client: &aws_sdk_dynamodb::Client,
    table_name: &str,
    capacity: Option<(i64, i64)>,
) -> Result<bool> {
    // list_tables is paginated; walk every page
    let existing: Vec<String> = client
        .list_tables()
        .into_paginator()
        .items()
        .send()
        .try_collect()
        .await?;
    if existing.iter().any(|name| name == table_name) {
        return Ok(false);
    }

    let mut request = client
        .create_table()
        .table_name(table_name)
        .attribute_definitions(
            AttributeDefinition::builder()
                .attribute_name(USER_ID)
                .attribute_type(ScalarAttributeType::S)
                .build()?,
        )
        .key_schema(
            KeySchemaElement::builder()
                .attribute_name(USER_ID)
                .key_type(KeyType::Hash)
                .build()?,
        );

    request = match capacity {
        Some((read, write)) => request.billing_mode(BillingMode::Provisioned).provisioned_throughput(
            ProvisionedThroughput::builder()
                .read_capacity_units(read)
                .write_capacity_units(write)
                .build()?,
        ),
        None => request.billing_mode(BillingMode::PayPerRequest),
    };

    request.send().await?;

    Ok(true)
}
