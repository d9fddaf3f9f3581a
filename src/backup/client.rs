use log::{info, warn};
use serde::Deserialize;
use serde_json::{json, Value};
use url::Url;

#[derive(Deserialize)]
struct GalleryResponse {
    data: Option<GalleryData>,
}

#[derive(Deserialize)]
struct GalleryData {
    id: Option<Value>,
}

pub fn registration_url(server: &Url) -> Result<Url, url::ParseError> {
    server.join("/api/gallery")
}

pub fn registration_body(gallery: &str) -> serde_json::Value {
    json!({
        "data": {
            "type": "gallery",
            "attributes": {
                "gallery": gallery,
                "images": [],
            }
        }
    })
}

/// Pulls the gallery id out of a registration response. Anything without one
/// means we could not sync. Servers hand back either a string or a number.
pub fn gallery_id(body: &str) -> Option<String> {
    match serde_json::from_str::<GalleryResponse>(body).ok()?.data?.id? {
        Value::String(id) if !id.is_empty() => Some(id),
        Value::Number(id) if id.as_f64() != Some(0.0) => Some(id.to_string()),
        _ => None,
    }
}

/// Registers `gallery` with the server. `None` means offline: the request
/// failed or the server did not hand back an id.
pub async fn register_gallery(client: &reqwest::Client, server: &Url, gallery: &str) -> Option<String> {
    let url = match registration_url(server) {
        Ok(url) => url,
        Err(e) => {
            warn!("Cannot build gallery URL from {}: {}", server, e);
            return None;
        }
    };

    let response = client
        .put(url.clone())
        .json(&registration_body(gallery))
        .send()
        .await;

    let body = match response {
        Ok(res) => match res.text().await {
            Ok(body) => body,
            Err(e) => {
                warn!("Failed to read gallery response from {}: {}", url, e);
                return None;
            }
        },
        Err(e) => {
            warn!("Failed to send gallery registration to {}: {}", url, e);
            return None;
        }
    };

    let id = gallery_id(&body);
    match &id {
        Some(id) => info!("Gallery registered as {}", id),
        None => warn!("Gallery registration returned no id"),
    }
    id
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn body_matches_api_shape() {
        let body = registration_body("horse!battery staple");
        assert_eq!(body["data"]["type"], "gallery");
        assert_eq!(body["data"]["attributes"]["gallery"], "horse!battery staple");
        assert!(body["data"]["attributes"]["images"].as_array().unwrap().is_empty());
    }

    #[test]
    fn id_is_read_from_data() {
        assert_eq!(gallery_id(r#"{"data":{"id":"g-17"}}"#), Some("g-17".to_string()));
        assert_eq!(gallery_id(r#"{"data":{"id":17}}"#), Some("17".to_string()));
    }

    #[test]
    fn missing_id_means_offline() {
        assert_eq!(gallery_id(r#"{"data":{}}"#), None);
        assert_eq!(gallery_id(r#"{"errors":[]}"#), None);
        assert_eq!(gallery_id(r#"{"data":{"id":""}}"#), None);
        assert_eq!(gallery_id(r#"{"data":{"id":0}}"#), None);
        assert_eq!(gallery_id(r#"{"data":{"id":null}}"#), None);
        assert_eq!(gallery_id(r#"{"data":{"id":false}}"#), None);
        assert_eq!(gallery_id(r#"{"data":null}"#), None);
        assert_eq!(gallery_id("<html>bad gateway</html>"), None);
    }

    #[test]
    fn url_is_rooted_at_server() {
        let server = Url::parse("http://localhost:8080/some/page").unwrap();
        assert_eq!(
            registration_url(&server).unwrap().as_str(),
            "http://localhost:8080/api/gallery"
        );
    }
}
