//! services/cookie_service.rs
//! Lectura de las cookies de sesión de HoYoLAB.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{anyhow, Context, Result};
use chrono::Utc;
use reqwest::Url;

use crate::config::app_config::CookieSourceConfig;
use crate::config::services_config::COOKIE_ORIGIN;
use crate::models::checkin_model::CredentialPair;

/// Par actual y par legacy, (ltuid, ltoken).
const CURRENT_PAIR: (&str, &str) = ("ltuid_v2", "ltoken_v2");
const LEGACY_PAIR: (&str, &str) = ("ltuid", "ltoken");

/// Fuente de cookies equivalente a un cookie jar del navegador.
pub trait CookieSource: Send + Sync {
    fn get(&self, url: &str, name: &str) -> Result<Option<String>>;

    /// Varias cookies del mismo origen, en el orden de `names`.
    fn get_many(&self, url: &str, names: &[&str]) -> Result<Vec<Option<String>>> {
        names.iter().map(|name| self.get(url, name)).collect()
    }
}

/// Cookies exportadas en formato Netscape (cookies.txt).
/// Se relee el archivo en cada consulta (una sola vez con `get_many`).
pub struct CookieJarFile {
    path: PathBuf,
}

impl CookieJarFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        CookieJarFile { path: path.into() }
    }
}

impl CookieSource for CookieJarFile {
    fn get(&self, url: &str, name: &str) -> Result<Option<String>> {
        Ok(self.get_many(url, &[name])?.pop().flatten())
    }

    fn get_many(&self, url: &str, names: &[&str]) -> Result<Vec<Option<String>>> {
        let host = host_of(url)?;
        let content = std::fs::read_to_string(&self.path)
            .with_context(|| format!("No se pudo leer {}", self.path.display()))?;
        let now = Utc::now().timestamp();

        let live: Vec<JarCookie> = content
            .lines()
            .filter_map(parse_jar_line)
            .filter(|c| domain_matches(&c.domain, &host))
            .filter(|c| c.expires == 0 || c.expires >= now)
            .collect();

        Ok(names
            .iter()
            .map(|name| {
                live.iter()
                    .find(|c| c.name == *name)
                    .map(|c| c.value.clone())
            })
            .collect())
    }
}

/// Header `Cookie:` crudo, p.ej. "ltuid_v2=1; ltoken_v2=abc". No depende del origen.
pub struct StaticCookieSource {
    raw: String,
}

impl StaticCookieSource {
    pub fn new(raw: impl Into<String>) -> Self {
        StaticCookieSource { raw: raw.into() }
    }

    pub fn empty() -> Self {
        Self::new("")
    }
}

impl CookieSource for StaticCookieSource {
    fn get(&self, _url: &str, name: &str) -> Result<Option<String>> {
        Ok(parse_cookie(&self.raw, name))
    }
}

pub fn cookie_source_from_config(config: &CookieSourceConfig) -> Arc<dyn CookieSource> {
    match config {
        CookieSourceConfig::JarFile(path) => Arc::new(CookieJarFile::new(path.clone())),
        CookieSourceConfig::Raw(raw) => Arc::new(StaticCookieSource::new(raw.clone())),
        CookieSourceConfig::None => Arc::new(StaticCookieSource::empty()),
    }
}

#[derive(Clone)]
pub struct CookieService {
    source: Arc<dyn CookieSource>,
    origin: String,
}

impl CookieService {
    pub fn new(source: Arc<dyn CookieSource>) -> Self {
        CookieService {
            source,
            origin: COOKIE_ORIGIN.to_string(),
        }
    }

    /// Devuelve el par actual, o el legacy si el actual no está completo.
    /// Cualquier fallo de lectura se trata igual que "sin credenciales".
    pub fn get_credentials(&self) -> Option<CredentialPair> {
        match self.lookup() {
            Ok(creds) => creds,
            Err(e) => {
                log::error!("(get_credentials) Error leyendo cookies: {:?}", e);
                None
            }
        }
    }

    fn lookup(&self) -> Result<Option<CredentialPair>> {
        // una sola lectura de la fuente para los dos pares
        let mut values = self
            .source
            .get_many(
                &self.origin,
                &[CURRENT_PAIR.0, CURRENT_PAIR.1, LEGACY_PAIR.0, LEGACY_PAIR.1],
            )?
            .into_iter();
        let mut next = || values.next().flatten();
        let current = (next(), next());
        let legacy = (next(), next());

        if let Some(pair) = into_pair(current) {
            return Ok(Some(pair));
        }
        log::info!("(get_credentials) Sin cookies v2, probando cookies legacy...");
        Ok(into_pair(legacy))
    }
}

fn into_pair(values: (Option<String>, Option<String>)) -> Option<CredentialPair> {
    match values {
        (Some(session_id), Some(session_token)) => Some(CredentialPair {
            session_id,
            session_token,
        }),
        _ => None,
    }
}

/// Busca `name=` en un string de cookies separado por ';'.
pub fn parse_cookie(cookie_str: &str, name: &str) -> Option<String> {
    let prefix = format!("{}=", name);
    cookie_str
        .split(';')
        .map(str::trim)
        .find_map(|p| p.strip_prefix(prefix.as_str()))
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

#[derive(Debug, PartialEq, Eq)]
struct JarCookie {
    domain: String,
    expires: i64,
    name: String,
    value: String,
}

fn parse_jar_line(line: &str) -> Option<JarCookie> {
    let line = line.trim_end_matches(['\r', '\n']);
    // "#HttpOnly_" es una cookie, el resto de líneas con '#' son comentarios
    let line = match line.strip_prefix("#HttpOnly_") {
        Some(rest) => rest,
        None if line.starts_with('#') || line.trim().is_empty() => return None,
        None => line,
    };

    let fields: Vec<&str> = line.split('\t').collect();
    if fields.len() < 7 {
        return None;
    }
    let expires = fields[4].trim().parse::<i64>().ok()?;
    Some(JarCookie {
        domain: fields[0].trim().to_ascii_lowercase(),
        expires,
        name: fields[5].to_string(),
        value: fields[6].to_string(),
    })
}

fn host_of(url: &str) -> Result<String> {
    let parsed = Url::parse(url).with_context(|| format!("Origen inválido: {}", url))?;
    parsed
        .host_str()
        .map(str::to_ascii_lowercase)
        .ok_or_else(|| anyhow!("El origen no tiene host: {}", url))
}

fn domain_matches(cookie_domain: &str, host: &str) -> bool {
    let domain = cookie_domain.trim_start_matches('.');
    host == domain || host.ends_with(&format!(".{}", domain))
}
