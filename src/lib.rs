pub mod client;
pub mod config;
pub mod data_sources;
pub mod diagnostics;
pub mod driver;
pub mod error;
pub mod mapping;
pub mod provider;
pub mod resources;
pub mod schema;
pub mod state;

use config::Args;
use provider::Provider;

pub async fn run(config: Args) -> Result<(), ()> {
    match config {
        Args::Schema => print_schema(),
        Args::Run(args) => driver::run(args).await,
    }
}

fn print_schema() -> Result<(), ()> {
    match serde_json::to_string_pretty(&Provider::new().schemas()) {
        Ok(schema) => {
            println!("{schema}");
            Ok(())
        }
        Err(error) => {
            tracing::error!(reason = %error, "Could not serialize provider schema");
            Err(())
        }
    }
}
