// Export the OpenAPI document as JSON
//
// Usage: cargo run --bin export-openapi > docs/openapi.json

use sourcecoop_server::openapi::ApiDoc;

fn main() {
    println!("{}", ApiDoc::to_json());
}
