//! REST client for the load balancer controller.
//!
//! Logs in once with `POST /login`, keeps the `csrftoken` and `sessionid`
//! cookies, and replays them (plus the tenant header) on every call.

use std::collections::HashSet;
use std::time::Duration;

use reqwest::blocking::{Client, RequestBuilder, Response};
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{debug, warn};

use crate::config::ControllerSettings;

use super::{
    CertificateAssociation, CertificateSummary, ControllerApi, NewCertificate, ServiceError,
    ServiceResult, SessionInfo,
};

const CERTIFICATE_PATH: &str = "/api/sslkeyandcertificate";
const PAGE_SIZE: usize = 200;

/// Cookies issued by a successful login.
#[derive(Debug, Clone)]
struct Session {
    csrf_token: String,
    session_id: String,
}

/// Controller API over HTTP(S).
pub struct HttpController {
    client: Client,
    base_url: String,
    tenant: String,
    session: Session,
}

#[derive(Debug, Deserialize)]
struct Page<T> {
    #[serde(default = "Vec::new")]
    results: Vec<T>,
    #[serde(default)]
    next: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CertificateObject {
    uuid: String,
    name: String,
    #[serde(default)]
    certificate: Option<CertificateDetails>,
}

#[derive(Debug, Deserialize)]
struct CertificateDetails {
    #[serde(default)]
    not_after: Option<String>,
}

impl From<CertificateObject> for CertificateSummary {
    fn from(obj: CertificateObject) -> Self {
        Self {
            id: obj.uuid,
            name: obj.name,
            expires: obj.certificate.and_then(|c| c.not_after),
        }
    }
}

impl HttpController {
    /// Connect and log in to the controller described by `settings`.
    pub fn connect(settings: &ControllerSettings) -> ServiceResult<Self> {
        let timeout = Duration::from_secs(settings.timeout_secs);
        let client = Client::builder()
            .user_agent("lbcerts")
            .timeout(timeout)
            .danger_accept_invalid_certs(!settings.verify_tls)
            .build()
            .map_err(transport_error)?;
        let base_url = settings.address.trim_end_matches('/').to_string();

        let session = login(&client, &base_url, &settings.username, &settings.password)?;
        debug!("Logged in to controller {}", base_url);

        Ok(Self {
            client,
            base_url,
            tenant: settings.tenant.clone(),
            session,
        })
    }

    /// Get the controller base URL.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Turn a `next` link into a path on this controller.
    ///
    /// Absolute links must point back at `base_url`; the session cookies are
    /// never sent anywhere else.
    fn next_path(&self, next: &str) -> ServiceResult<String> {
        if !next.starts_with("http://") && !next.starts_with("https://") {
            return Ok(next.to_string());
        }
        match next.strip_prefix(&self.base_url) {
            Some(path) if path.is_empty() || path.starts_with('/') => Ok(path.to_string()),
            _ => Err(ServiceError::Protocol {
                message: format!("refusing to follow page link off the controller: {}", next),
            }),
        }
    }

    fn authorized(&self, builder: RequestBuilder, tenant: &str) -> RequestBuilder {
        builder
            .header(
                "Cookie",
                format!(
                    "csrftoken={}; sessionid={}",
                    self.session.csrf_token, self.session.session_id
                ),
            )
            .header("X-CSRFToken", &self.session.csrf_token)
            .header("X-Avi-Tenant", tenant)
            .header("Referer", &self.base_url)
    }

    fn get_json<T: DeserializeOwned>(&self, path: &str, tenant: &str, what: &str) -> ServiceResult<T> {
        let url = self.url(path);
        debug!("GET {}", url);
        let response = self
            .authorized(self.client.get(&url), tenant)
            .send()
            .map_err(transport_error)?;
        decode(check_status(response, what)?)
    }

    fn patch(&self, path: &str, body: &Value, what: &str) -> ServiceResult<()> {
        let url = self.url(path);
        debug!("PATCH {}", url);
        let response = self
            .authorized(self.client.patch(&url), &self.tenant)
            .json(body)
            .send()
            .map_err(transport_error)?;
        check_status(response, what).map(|_| ())
    }
}

impl ControllerApi for HttpController {
    fn list_certificates(&self, tenant: &str) -> ServiceResult<Vec<CertificateSummary>> {
        let mut next = Some(format!("{}?page_size={}", CERTIFICATE_PATH, PAGE_SIZE));
        let mut seen = HashSet::new();
        let mut certificates = Vec::new();

        while let Some(path) = next {
            if !seen.insert(path.clone()) {
                warn!("Controller repeated page link {}, stopping", path);
                break;
            }
            let page: Page<CertificateObject> = self.get_json(&path, tenant, "certificates")?;
            certificates.extend(page.results.into_iter().map(CertificateSummary::from));
            next = page.next.map(|link| self.next_path(&link)).transpose()?;
        }

        Ok(certificates)
    }

    fn create_certificate(&self, certificate: &NewCertificate) -> ServiceResult<CertificateSummary> {
        let url = self.url(CERTIFICATE_PATH);
        debug!("POST {} ({:?})", url, certificate);
        let body = json!({
            "name": certificate.name,
            "type": "SSL_CERTIFICATE_TYPE_VIRTUALSERVICE",
            "key": certificate.key_data,
            "key_passphrase": certificate.passphrase,
            "certificate": { "certificate": certificate.cert_data },
        });
        let response = self
            .authorized(self.client.post(&url), &self.tenant)
            .json(&body)
            .send()
            .map_err(transport_error)?;
        let created: CertificateObject = decode(check_status(response, "certificate")?)?;
        Ok(created.into())
    }

    fn associate_certificates(&self, association: &CertificateAssociation) -> ServiceResult<()> {
        self.patch(
            &object_path("pool", &association.pool_id),
            &json!({ "replace": { "ssl_key_and_certificate_ref": name_ref(&association.pool_cert) } }),
            &format!("pool {}", association.pool_id),
        )?;
        self.patch(
            &object_path("virtualservice", &association.vip_id),
            &json!({ "replace": { "ssl_key_and_certificate_refs": [name_ref(&association.vip_cert)] } }),
            &format!("virtual service {}", association.vip_id),
        )
    }

    fn get_pool_certificate(&self, pool_id: &str) -> ServiceResult<Option<String>> {
        let pool: Value = self.get_json(
            &format!("{}?include_name", object_path("pool", pool_id)),
            &self.tenant,
            &format!("pool {}", pool_id),
        )?;
        Ok(pool
            .get("ssl_key_and_certificate_ref")
            .and_then(Value::as_str)
            .and_then(ref_name))
    }

    fn get_vip_certificate(&self, vip_id: &str) -> ServiceResult<Option<String>> {
        let vs: Value = self.get_json(
            &format!("{}?include_name", object_path("virtualservice", vip_id)),
            &self.tenant,
            &format!("virtual service {}", vip_id),
        )?;
        Ok(vs
            .get("ssl_key_and_certificate_refs")
            .and_then(Value::as_array)
            .and_then(|refs| refs.first())
            .and_then(Value::as_str)
            .and_then(ref_name))
    }

    fn session_info(&self) -> ServiceResult<SessionInfo> {
        Ok(SessionInfo {
            controller_address: self.base_url.clone(),
            anti_forgery_token: self.session.csrf_token.clone(),
            session_id: self.session.session_id.clone(),
            tenant: self.tenant.clone(),
        })
    }
}

fn login(client: &Client, base_url: &str, username: &str, password: &str) -> ServiceResult<Session> {
    let response = client
        .post(format!("{}/login", base_url))
        .json(&json!({ "username": username, "password": password }))
        .send()
        .map_err(transport_error)?;
    let response = check_status(response, "login")?;

    let mut csrf_token = None;
    let mut session_id = None;
    for value in response.headers().get_all("set-cookie") {
        let Ok(value) = value.to_str() else { continue };
        match parse_cookie(value) {
            Some(("csrftoken", v)) => csrf_token = Some(v.to_string()),
            Some(("sessionid", v)) => session_id = Some(v.to_string()),
            _ => {}
        }
    }

    let session_id = session_id.ok_or_else(|| ServiceError::Protocol {
        message: "login response did not set a session cookie".to_string(),
    })?;
    if csrf_token.is_none() {
        warn!("Controller login did not issue a CSRF token");
    }

    Ok(Session {
        csrf_token: csrf_token.unwrap_or_default(),
        session_id,
    })
}

/// Split the `name=value` pair off a `Set-Cookie` header.
fn parse_cookie(header: &str) -> Option<(&str, &str)> {
    let pair = header.split(';').next()?;
    let (name, value) = pair.split_once('=')?;
    Some((name.trim(), value.trim()))
}

/// `/api/<kind>/<id>` with the id percent-encoded as one path segment.
fn object_path(kind: &str, id: &str) -> String {
    format!("/api/{}/{}", kind, urlencoding::encode(id))
}

/// Reference to a certificate by name, resolved by the controller.
fn name_ref(name: &str) -> String {
    format!("{}/?name={}", CERTIFICATE_PATH, urlencoding::encode(name))
}

/// Extract the object name from an `include_name` reference (`<url>#<name>`).
fn ref_name(reference: &str) -> Option<String> {
    reference
        .split_once('#')
        .map(|(_, name)| name.to_string())
        .filter(|name| !name.is_empty())
}

fn transport_error(err: reqwest::Error) -> ServiceError {
    ServiceError::Unavailable {
        message: err.to_string(),
    }
}

fn check_status(response: Response, what: &str) -> ServiceResult<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    if status == StatusCode::NOT_FOUND {
        return Err(ServiceError::NotFound {
            what: what.to_string(),
        });
    }
    let message = response.text().unwrap_or_default();
    Err(ServiceError::Rejected {
        status: status.as_u16(),
        message: message.trim().to_string(),
    })
}

fn decode<T: DeserializeOwned>(response: Response) -> ServiceResult<T> {
    response.json().map_err(|e| ServiceError::Protocol {
        message: e.to_string(),
    })
}
