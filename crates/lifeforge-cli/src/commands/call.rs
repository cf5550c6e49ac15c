//! `forge call`: untyped proxy call against a running server.

use lifeforge_client::ApiClient;

use super::print_json;

pub async fn run(
    client: &ApiClient,
    path: &str,
    input: &str,
    mutation: bool,
) -> Result<serde_json::Value, String> {
    let input: serde_json::Value =
        serde_json::from_str(input).map_err(|e| format!("Invalid JSON input: {}", e))?;

    let node = client.untyped(path);
    let result = if mutation {
        node.mutate(&input).await
    } else {
        node.query(&input).await
    }
    .map_err(|e| e.to_string())?;

    print_json(&result);
    Ok(result)
}
