// Export OpenAPI specification as JSON
//
// Usage: cargo run --bin export-openapi > docs/api/openapi.json
//
// Generates the OpenAPI spec without starting the API server.

use waypoint_api::openapi::ApiDoc;

fn main() {
    println!("{}", ApiDoc::to_json());
}
