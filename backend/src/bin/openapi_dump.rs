//! Print the OpenAPI document as YAML.

use backend::doc::ApiDoc;
use utoipa::OpenApi;

fn main() {
    println!(
        "{}",
        ApiDoc::openapi()
            .to_yaml()
            .expect("OpenAPI document serialises")
    );
}
