//! The hosted realtime database the catalogue is published to.

use std::collections::BTreeMap;

use async_trait::async_trait;
use reqwest::{Client, IntoUrl, Url};
use tracing::debug;

use super::{annotate, Car, Error, ListingSource};

pub(crate) const DEFAULT_API_BASE: &str =
    "https://thecars-api-default-rtdb.asia-southeast1.firebasedatabase.app";

const CARS_DOCUMENT: &str = "cars.json";

pub(crate) struct FirebaseListings {
    api_base: Url,
    client: Client,
}

impl FirebaseListings {
    pub(crate) fn with_api_base<U: IntoUrl>(api_base: U) -> Result<FirebaseListings, Error> {
        let mut api_base = api_base.into_url().map_err(Error::InvalidApiBase)?;

        // Url::join replaces the last segment unless the path ends with a slash
        if !api_base.path().ends_with('/') {
            let path = format!("{}/", api_base.path());
            api_base.set_path(&path);
        }

        Ok(FirebaseListings {
            api_base,
            client: Client::new(),
        })
    }

    pub(crate) fn api_base(&self) -> &Url {
        &self.api_base
    }

    fn cars_url(&self) -> Result<Url, Error> {
        Ok(self.api_base.join(CARS_DOCUMENT)?)
    }

    /// Decodes a `cars.json` body.
    pub(crate) fn decode(body: &str) -> Result<Vec<Car>, Error> {
        let document: Option<BTreeMap<String, Car>> = serde_json::from_str(body)?;

        Ok(annotate(document))
    }
}

#[async_trait]
impl ListingSource for FirebaseListings {
    async fn fetch_all(&self) -> Result<Vec<Car>, Error> {
        let url = self.cars_url()?;

        debug!(%url, "fetching listings");

        let res = self.client.get(url).send().await?;

        let status = res.status();

        if !status.is_success() {
            return Err(Error::UnexpectedStatus(status));
        }

        let body = res.text().await?;

        let cars = Self::decode(&body)?;

        debug!(count = cars.len(), "fetched listings");

        Ok(cars)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::StatusCode;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    /// Answers a single request on a local port with `status` and `body`.
    async fn serve_once(status: &'static str, body: &'static str) -> FirebaseListings {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        tokio::spawn(async move {
            let (mut stream, _) = listener.accept().await.unwrap();

            let mut request = Vec::new();
            let mut buf = [0u8; 1024];

            while !request.windows(4).any(|w| w == b"\r\n\r\n") {
                let n = stream.read(&mut buf).await.unwrap();
                if n == 0 {
                    break;
                }
                request.extend_from_slice(&buf[..n]);
            }

            let request = String::from_utf8_lossy(&request);
            assert!(request.starts_with("GET /cars.json "), "{}", request);

            let response = format!(
                "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                status,
                body.len(),
                body
            );

            stream.write_all(response.as_bytes()).await.unwrap();
            stream.shutdown().await.unwrap();
        });

        local_listings(&format!("http://{}", addr))
    }

    fn local_listings(api_base: &str) -> FirebaseListings {
        let mut listings = FirebaseListings::with_api_base(api_base).unwrap();

        // Local requests must not be routed through a proxy from the environment
        listings.client = Client::builder().no_proxy().build().unwrap();

        listings
    }

    #[tokio::test]
    async fn test_fetch_all_over_http() {
        let listings = serve_once(
            "200 OK",
            r#"{"-Nx1": {"brand": "Honda", "model": "Brio", "year": 2016, "price": 7000, "type": "Hatchback"}}"#,
        )
        .await;

        let cars = listings.fetch_all().await.unwrap();

        assert_eq!(cars.len(), 1);
        assert_eq!(cars[0].id, "-Nx1");
        assert_eq!(cars[0].model, "Brio");
    }

    #[tokio::test]
    async fn test_fetch_all_null_document() {
        let listings = serve_once("200 OK", "null").await;

        assert!(listings.fetch_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_fetch_all_error_status() {
        let listings = serve_once("500 Internal Server Error", r#"{"error": "down"}"#).await;

        let result = listings.fetch_all().await;

        assert!(
            matches!(result, Err(Error::UnexpectedStatus(StatusCode::INTERNAL_SERVER_ERROR))),
            "{:?}",
            result
        );
    }

    #[tokio::test]
    async fn test_fetch_all_malformed_body() {
        let listings = serve_once("200 OK", "<html>maintenance</html>").await;

        let result = listings.fetch_all().await;

        assert!(matches!(result, Err(Error::MalformedDocument(_))), "{:?}", result);
    }

    #[tokio::test]
    async fn test_fetch_all_connection_refused() {
        // Bind and release a port so nothing is listening on it
        let addr = {
            let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
            listener.local_addr().unwrap()
        };

        let listings = local_listings(&format!("http://{}", addr));

        let result = listings.fetch_all().await;

        assert!(matches!(result, Err(Error::RequestFailed(_))), "{:?}", result);
    }

    #[tokio::test]
    async fn test_fetch_one_over_http() {
        let listings = serve_once(
            "200 OK",
            r#"{"-a": {"brand": "Honda", "model": "Brio"}, "-b": {"brand": "Toyota", "model": "Fortuner"}}"#,
        )
        .await;

        let car = listings.fetch_one("-b").await.unwrap();

        assert_eq!(car.map(|c| c.model), Some("Fortuner".to_string()));
    }

    #[test]
    fn test_cars_url() {
        let listings = FirebaseListings::with_api_base(DEFAULT_API_BASE).unwrap();

        assert_eq!(
            listings.cars_url().unwrap().as_str(),
            "https://thecars-api-default-rtdb.asia-southeast1.firebasedatabase.app/cars.json"
        );

        let listings = FirebaseListings::with_api_base("http://localhost:9000/v1").unwrap();

        assert_eq!(
            listings.cars_url().unwrap().as_str(),
            "http://localhost:9000/v1/cars.json"
        );
    }

    #[test]
    fn test_invalid_api_base() {
        let result = FirebaseListings::with_api_base("not a url");

        assert!(matches!(result, Err(Error::InvalidApiBase(_))));
    }

    #[test]
    fn test_decode() {
        let cars = FirebaseListings::decode(
            r#"{"k1": {"brand": "Daihatsu", "model": "Xenia", "price": 9000, "type": "SUV"}}"#,
        )
        .unwrap();

        assert_eq!(cars.len(), 1);
        assert_eq!(cars[0].id, "k1");
        assert_eq!(cars[0].year, 0);

        assert!(FirebaseListings::decode("null").unwrap().is_empty());

        let malformed = FirebaseListings::decode(r#"{"k1": {"model": "Xenia"}}"#);
        assert!(matches!(malformed, Err(Error::MalformedDocument(_))));
    }
}
