//! # Backend REST Client
//!
//! Thin async wrapper over the two endpoints the intake flow needs.
//!
//! ## Endpoints
//! ```text
//! ┌──────────────────────────────────────────────────────────────────┐
//! │  POST {base}/compras       CreateCompraRequest → CompraCreated   │
//! │  GET  {base}/proveedores                       → [Proveedor]     │
//! └──────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Failure Handling
//! Every failure is returned to the caller as-is; there is no retry and no
//! offline queue. A non-2xx answer becomes [`ClientError::Api`] carrying
//! the backend's own message so the screen can show it verbatim.

use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION};
use reqwest::{Response, StatusCode};
use serde::de::DeserializeOwned;
use tracing::{debug, info, warn};
use url::Url;

use compras_core::CreateCompraRequest;

use crate::config::ApiSettings;
use crate::error::{ClientError, ClientResult};
use crate::models::{CompraCreated, ErrorBody, Proveedor};

const COMPRAS_PATH: &str = "compras";
const PROVEEDORES_PATH: &str = "proveedores";

/// HTTP client bound to one backend base URL.
#[derive(Debug, Clone)]
pub struct ComprasClient {
    http: reqwest::Client,
    base: Url,
    timeout_secs: u64,
}

impl ComprasClient {
    /// Builds a client from API settings.
    pub fn new(settings: &ApiSettings) -> ClientResult<Self> {
        let base = settings.base()?;

        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        if let Some(token) = settings.token.as_deref() {
            let value = HeaderValue::from_str(&format!("Bearer {token}"))
                .map_err(|_| ClientError::InvalidConfig("API token contains invalid characters".into()))?;
            headers.insert(AUTHORIZATION, value);
        }

        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(settings.timeout_secs))
            .default_headers(headers)
            .build()
            .map_err(|e| ClientError::Http(e.to_string()))?;

        debug!(base = %base, "Backend client ready");

        Ok(ComprasClient {
            http,
            base,
            timeout_secs: settings.timeout_secs,
        })
    }

    // =========================================================================
    // Endpoints
    // =========================================================================

    /// Submits a purchase with all of its pending products.
    pub async fn create_compra(&self, request: &CreateCompraRequest) -> ClientResult<CompraCreated> {
        let url = self.base.join(COMPRAS_PATH)?;
        info!(
            items = request.productos.len(),
            total = %request.total(),
            "Submitting purchase"
        );

        let response = self
            .http
            .post(url)
            .json(request)
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;

        let created: CompraCreated = self.read_json(response).await?;
        info!(idcompra = created.idcompra, "Purchase created");
        Ok(created)
    }

    /// Lists the suppliers a purchase can be booked against.
    pub async fn list_proveedores(&self) -> ClientResult<Vec<Proveedor>> {
        let url = self.base.join(PROVEEDORES_PATH)?;
        debug!(url = %url, "Fetching suppliers");

        let response = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;

        self.read_json(response).await
    }

    // =========================================================================
    // Response Handling
    // =========================================================================

    async fn read_json<T: DeserializeOwned>(&self, response: Response) -> ClientResult<T> {
        let status = response.status();
        let body = response.text().await.map_err(|e| self.transport_error(e))?;

        if !status.is_success() {
            let message = rejection_message(status, &body);
            warn!(status = status.as_u16(), %message, "Backend rejected request");
            return Err(ClientError::Api {
                status: status.as_u16(),
                message,
            });
        }

        Ok(serde_json::from_str(&body)?)
    }

    fn transport_error(&self, err: reqwest::Error) -> ClientError {
        if err.is_timeout() {
            warn!(timeout_secs = self.timeout_secs, "Backend request timed out");
            ClientError::Timeout(self.timeout_secs)
        } else {
            warn!(error = %err, "Backend request failed");
            ClientError::Http(err.to_string())
        }
    }
}

fn rejection_message(status: StatusCode, body: &str) -> String {
    let message = ErrorBody::message_from(body);
    if message.is_empty() {
        status
            .canonical_reason()
            .unwrap_or("Unknown error")
            .to_string()
    } else {
        message
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use compras_core::{CompraItemPayload, ProductRef, UnidadMedida};
    use rust_decimal::Decimal;
    use serde_json::json;
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn settings(server: &MockServer) -> ApiSettings {
        ApiSettings {
            base_url: format!("{}/api", server.uri()),
            timeout_secs: 5,
            token: Some("tok-123".into()),
        }
    }

    fn request() -> CreateCompraRequest {
        CreateCompraRequest {
            idproveedor: Some(8),
            nro_factura: Some("001-001-0000123".into()),
            fecha: NaiveDate::from_ymd_opt(2026, 10, 19).unwrap(),
            productos: vec![CompraItemPayload {
                producto: ProductRef::Existing(17),
                cantidad: Decimal::new(5, 0),
                precio: Decimal::new(2500, 0),
                precio_compra_caja: None,
                cant_p_caja: None,
                cant_cajas: None,
                precio_venta: Decimal::new(3500, 0),
                precio_venta_caja: None,
                fecha_vencimiento: None,
                nombre_producto: "Galletitas".into(),
                unidad_medida: UnidadMedida::Unidad,
                iva: "10".into(),
            }],
        }
    }

    #[tokio::test]
    async fn test_create_compra_posts_payload() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/compras"))
            .and(header("authorization", "Bearer tok-123"))
            .and(body_partial_json(json!({
                "idproveedor": 8,
                "fecha": "2026-10-19",
                "productos": [{ "idproducto": 17, "cantidad": 5.0, "cant_cajas": null }]
            })))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({ "idcompra": 99 })))
            .expect(1)
            .mount(&server)
            .await;

        let client = ComprasClient::new(&settings(&server)).unwrap();
        let created = client.create_compra(&request()).await.unwrap();

        assert_eq!(created.idcompra, 99);
    }

    #[tokio::test]
    async fn test_backend_rejection_keeps_message() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/compras"))
            .respond_with(
                ResponseTemplate::new(422).set_body_json(json!({ "message": "factura duplicada" })),
            )
            .mount(&server)
            .await;

        let client = ComprasClient::new(&settings(&server)).unwrap();
        let err = client.create_compra(&request()).await.unwrap_err();

        match err {
            ClientError::Api { status, message } => {
                assert_eq!(status, 422);
                assert_eq!(message, "factura duplicada");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_server_error_without_body_uses_reason() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/proveedores"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let client = ComprasClient::new(&settings(&server)).unwrap();
        let err = client.list_proveedores().await.unwrap_err();

        assert!(!err.is_rejection());
        assert_eq!(err.to_string(), "Backend returned 503: Service Unavailable");
    }

    #[tokio::test]
    async fn test_list_proveedores() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/proveedores"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                { "idproveedor": 1, "nombre": "Distribuidora Sur", "ruc": "80012345-6" },
                { "idproveedor": 2, "nombre": "Mayorista Norte" }
            ])))
            .mount(&server)
            .await;

        let client = ComprasClient::new(&settings(&server)).unwrap();
        let proveedores = client.list_proveedores().await.unwrap();

        assert_eq!(proveedores.len(), 2);
        assert_eq!(proveedores[0].ruc.as_deref(), Some("80012345-6"));
        assert_eq!(proveedores[1].ruc, None);
    }

    #[tokio::test]
    async fn test_undecodable_success_body() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/compras"))
            .respond_with(ResponseTemplate::new(200).set_body_string("ok"))
            .mount(&server)
            .await;

        let client = ComprasClient::new(&settings(&server)).unwrap();
        let err = client.create_compra(&request()).await.unwrap_err();

        assert!(matches!(err, ClientError::Decode(_)));
    }

    #[tokio::test]
    async fn test_slow_backend_times_out() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/proveedores"))
            .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(3)))
            .mount(&server)
            .await;

        let mut settings = settings(&server);
        settings.timeout_secs = 1;
        let client = ComprasClient::new(&settings).unwrap();
        let err = client.list_proveedores().await.unwrap_err();

        assert!(matches!(err, ClientError::Timeout(1)));
    }
}
