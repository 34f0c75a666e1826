//! Print the OpenAPI document as JSON for client generators.
//!
//! ```sh
//! cargo run --manifest-path backend/Cargo.toml --bin openapi-dump > openapi.json
//! ```

use bitacora::ApiDoc;
use utoipa::OpenApi;

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;
    println!("{}", ApiDoc::openapi().to_pretty_json()?);
    Ok(())
}
