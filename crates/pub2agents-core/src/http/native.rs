//! reqwest client and request throttle

use super::{HttpError, HttpResponse};
use reqwest::{Client, RequestBuilder};
use serde::Serialize;
use std::sync::Mutex;
use std::time::Duration;
use tokio::time::Instant;

pub struct HttpClient {
    client: Client,
    user_agent: String,
}

impl HttpClient {
    pub fn new(user_agent: &str, timeout: Duration) -> Result<Self, HttpError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| HttpError::Setup {
                message: e.to_string(),
            })?;

        Ok(Self {
            client,
            user_agent: user_agent.to_string(),
        })
    }

    pub async fn get(&self, url: &str) -> Result<HttpResponse, HttpError> {
        self.send(self.client.get(url)).await
    }

    pub async fn get_with_params(
        &self,
        url: &str,
        params: &[(&str, &str)],
    ) -> Result<HttpResponse, HttpError> {
        let url =
            reqwest::Url::parse_with_params(url, params).map_err(|_| HttpError::InvalidUrl {
                url: url.to_string(),
            })?;

        self.get(url.as_str()).await
    }

    /// POST a JSON body with extra headers (e.g. `Authorization`)
    pub async fn post_json<T: Serialize + ?Sized>(
        &self,
        url: &str,
        headers: &[(&str, &str)],
        body: &T,
    ) -> Result<HttpResponse, HttpError> {
        let mut request = self.client.post(url).json(body);
        for (name, value) in headers {
            request = request.header(*name, *value);
        }
        self.send(request).await
    }

    async fn send(&self, request: RequestBuilder) -> Result<HttpResponse, HttpError> {
        let request = request
            .header("User-Agent", &self.user_agent)
            .build()
            .map_err(|e| HttpError::Transport {
                url: e.url().map(|u| u.to_string()).unwrap_or_default(),
                message: e.to_string(),
            })?;
        let url = request.url().to_string();

        let response = self.client.execute(request).await.map_err(|e| {
            if e.is_timeout() {
                HttpError::Timeout { url: url.clone() }
            } else {
                HttpError::Transport {
                    url: url.clone(),
                    message: e.to_string(),
                }
            }
        })?;

        let status = response.status().as_u16();
        if status == 429 {
            return Err(HttpError::RateLimited { url });
        }

        let body = response.text().await.map_err(|e| HttpError::Body {
            url: url.clone(),
            message: e.to_string(),
        })?;

        Ok(HttpResponse { status, body })
    }
}

/// Enforces a minimum interval between consecutive requests
#[derive(Debug)]
pub struct Throttle {
    interval: Duration,
    last: Mutex<Option<Instant>>,
}

impl Throttle {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            last: Mutex::new(None),
        }
    }

    /// Wait until the interval since the previous call has elapsed
    pub async fn wait(&self) {
        let delay = {
            let mut last = match self.last.lock() {
                Ok(guard) => guard,
                Err(poisoned) => poisoned.into_inner(),
            };
            let now = Instant::now();
            let delay = last
                .map(|prev| self.interval.saturating_sub(now.saturating_duration_since(prev)))
                .unwrap_or(Duration::ZERO);
            *last = Some(now + delay);
            delay
        };

        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_throttle_spaces_calls() {
        let throttle = Throttle::new(Duration::from_millis(200));
        let start = Instant::now();
        throttle.wait().await;
        throttle.wait().await;
        throttle.wait().await;
        assert!(start.elapsed() >= Duration::from_millis(400));
    }

    #[tokio::test]
    async fn test_zero_interval_never_sleeps() {
        let throttle = Throttle::new(Duration::ZERO);
        throttle.wait().await;
        throttle.wait().await;
    }

    #[test]
    fn test_client_builds() {
        assert!(HttpClient::new("pub2agents-test", Duration::from_secs(5)).is_ok());
    }
}
