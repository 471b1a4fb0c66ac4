//! Quickstart Example
//!
//! Insert, query, update and delete a document through the Data API.
//!
//! Configure with environment variables, e.g.
//!   DOCFETCH_ENDPOINT=https://data.mongodb-api.com/app/<app-id>/endpoint/data/v1
//!   DOCFETCH_DATA_SOURCE=Cluster0
//!   DOCFETCH_API_KEY=...
//!
//! Run with: cargo run -p docfetch-rs --example quickstart

use docfetch::{doc, Client, FindOptions, UpdateOptions};
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize)]
struct Note {
    title: String,
    body: String,
    #[serde(default)]
    pinned: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    println!("docfetch quickstart\n");

    let client = Client::from_env()?;
    let notes = client.db("quickstart").collection_with_type::<Note>("notes");

    // Insert
    let note = Note {
        title: "hello".to_string(),
        body: "The quick brown fox jumps over the lazy dog.".to_string(),
        pinned: false,
    };
    match notes.insert_one(&note, None).await? {
        Ok(inserted) => println!("Inserted: {}", inserted.inserted_id),
        Err(error) => anyhow::bail!("insert failed ({}): {}", error.code, error.message),
    }

    // Update
    let updated = notes
        .update_one(
            doc! { "title": "hello" },
            doc! { "$set": { "pinned": true } },
            UpdateOptions::default().with_label("quickstart-pin"),
        )
        .await?
        .map_err(|e| anyhow::anyhow!("update failed ({}): {}", e.code, e.message))?;
    println!("Matched {}, modified {}", updated.matched_count, updated.modified_count);

    // Query
    let pinned = notes
        .find(
            doc! { "pinned": true },
            FindOptions::default().with_sort(doc! { "title": 1 }).with_limit(10),
        )
        .await?
        .map_err(|e| anyhow::anyhow!("find failed ({}): {}", e.code, e.message))?;
    println!("\nPinned notes:");
    for (i, note) in pinned.iter().enumerate() {
        println!("  {}. {} - {}", i + 1, note.title, note.body);
    }

    // Clean up
    let deleted = notes
        .delete_many(doc! { "title": "hello" }, None)
        .await?
        .map_err(|e| anyhow::anyhow!("delete failed ({}): {}", e.code, e.message))?;
    println!("\nDeleted {} note(s)", deleted.deleted_count);

    Ok(())
}
