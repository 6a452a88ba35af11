use std::time::Duration;

use model::{feature::UnitFeature, unit::Unit, WithId};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tokio::time::sleep;

use crate::{http::HttpClient, FetchError, ReqwestClient};

/// How often and how patiently to request a units endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total number of requests, including the first one.
    pub attempts: u32,
    /// Time budget of a single request.
    pub timeout: Duration,
    /// Attempt `n` (counting from 0) is followed by a `backoff_unit * 2^n` pause.
    pub backoff_unit: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            attempts: 3,
            timeout: Duration::from_secs(2),
            backoff_unit: Duration::from_secs(1),
        }
    }
}

impl RetryPolicy {
    pub fn backoff(&self, attempt: u32) -> Duration {
        self.backoff_unit.saturating_mul(2u32.saturating_pow(attempt))
    }
}

/// Fetches unit lists, retrying transport failures with exponential backoff.
///
/// A fetch never fails: when no attempt yields a valid list the caller's
/// fallback is returned, or an empty list without one.
pub struct Fetcher<H: HttpClient> {
    client: H,
    policy: RetryPolicy,
}

impl Fetcher<ReqwestClient> {
    pub fn with_policy(policy: RetryPolicy) -> Result<Self, FetchError> {
        Ok(Self::new(ReqwestClient::with_timeout(policy.timeout)?, policy))
    }
}

impl<H: HttpClient> Fetcher<H> {
    pub fn new(client: H, policy: RetryPolicy) -> Self {
        Self { client, policy }
    }

    pub fn client(&self) -> &H {
        &self.client
    }

    /// Fetches a JSON array of basic units.
    pub async fn fetch_units(&self, url: &str, fallback: Option<&[Unit]>) -> Vec<Unit> {
        self.fetch_list(url, json_array)
            .await
            .unwrap_or_else(|| fallback.map(<[Unit]>::to_vec).unwrap_or_default())
    }

    /// Fetches a feature collection and returns its features.
    pub async fn fetch_features(
        &self,
        url: &str,
        fallback: Option<&[WithId<UnitFeature>]>,
    ) -> Vec<WithId<UnitFeature>> {
        self.fetch_list(url, collection_features)
            .await
            .unwrap_or_else(|| {
                fallback
                    .map(<[WithId<UnitFeature>]>::to_vec)
                    .unwrap_or_default()
            })
    }

    /// `None` when the attempts are used up or the payload is unusable.
    async fn fetch_list<T, X>(&self, url: &str, extract: X) -> Option<Vec<T>>
    where
        T: DeserializeOwned,
        X: Fn(Value) -> Result<Vec<Value>, Value>,
    {
        for attempt in 0..self.policy.attempts {
            let payload = match self.client.get_json(url).await {
                Ok(payload) => payload,
                Err(why) => {
                    log::warn!(
                        "Request to '{}' failed (attempt {}/{}): {}",
                        url,
                        attempt + 1,
                        self.policy.attempts,
                        why
                    );
                    if attempt + 1 < self.policy.attempts {
                        sleep(self.policy.backoff(attempt)).await;
                    }
                    continue;
                }
            };

            // a well formed response of the wrong shape will not get better
            let elements = match extract(payload) {
                Ok(elements) => elements,
                Err(payload) => {
                    log::error!("Unexpected response format from '{}': {}", url, payload);
                    return None;
                }
            };

            return match elements
                .into_iter()
                .map(serde_json::from_value)
                .collect::<Result<Vec<T>, _>>()
            {
                Ok(items) => Some(items),
                Err(why) => {
                    log::error!("Invalid element in response from '{}': {}", url, why);
                    None
                }
            };
        }
        None
    }
}

fn json_array(payload: Value) -> Result<Vec<Value>, Value> {
    match payload {
        Value::Array(elements) => Ok(elements),
        other => Err(other),
    }
}

fn collection_features(payload: Value) -> Result<Vec<Value>, Value> {
    match payload {
        Value::Object(mut members) => match members.remove("features") {
            Some(Value::Array(features)) => Ok(features),
            Some(other) => {
                members.insert("features".to_owned(), other);
                Err(Value::Object(members))
            }
            None => Err(Value::Object(members)),
        },
        other => Err(other),
    }
}

#[cfg(test)]
mod tests {
    use model::{unit::Affiliation, ExampleData};
    use serde_json::json;

    use super::*;
    use crate::http::tests::ScriptedClient;

    fn policy() -> RetryPolicy {
        RetryPolicy {
            attempts: 3,
            timeout: Duration::from_millis(10),
            backoff_unit: Duration::from_millis(1),
        }
    }

    fn fallback() -> Vec<Unit> {
        vec![
            Unit::new("U1", Affiliation::Friendly, 1.0, 1.0).unwrap(),
            Unit::new("U2", Affiliation::Hostile, 2.0, 2.0).unwrap(),
        ]
    }

    fn unit_json(callsign: &str) -> Value {
        json!({ "callsign": callsign, "affiliation": "neutral", "latitude": 3.0, "longitude": 4.0 })
    }

    #[test]
    fn backoff_doubles_per_attempt() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.backoff(0), Duration::from_secs(1));
        assert_eq!(policy.backoff(1), Duration::from_secs(2));
        assert_eq!(policy.backoff(2), Duration::from_secs(4));
    }

    #[tokio::test]
    async fn exhausted_attempts_return_fallback() {
        let fetcher = Fetcher::new(ScriptedClient::failing(), policy());
        let fallback = fallback();
        let units = fetcher.fetch_units("http://units", Some(&fallback)).await;
        assert_eq!(units, fallback);
        assert_eq!(fetcher.client().calls(), 3);
    }

    #[tokio::test]
    async fn exhausted_attempts_without_fallback_return_nothing() {
        let fetcher = Fetcher::new(ScriptedClient::failing(), policy());
        assert!(fetcher.fetch_units("http://units", None).await.is_empty());
        assert_eq!(fetcher.client().calls(), 3);
    }

    #[tokio::test]
    async fn object_payload_aborts_after_one_attempt() {
        let fetcher = Fetcher::new(
            ScriptedClient::new(vec![Ok(json!({ "detail": "nope" }))]),
            policy(),
        );
        let fallback = fallback();
        let units = fetcher.fetch_units("http://units", Some(&fallback)).await;
        assert_eq!(units, fallback);
        assert_eq!(fetcher.client().calls(), 1);

        let fetcher = Fetcher::new(
            ScriptedClient::new(vec![Ok(json!({ "detail": "nope" }))]),
            policy(),
        );
        assert!(fetcher.fetch_units("http://units", None).await.is_empty());
        assert_eq!(fetcher.client().calls(), 1);
    }

    #[tokio::test]
    async fn recovers_after_transient_failure() {
        let fetcher = Fetcher::new(
            ScriptedClient::new(vec![
                Err(FetchError::Other("timeout".to_owned())),
                Ok(json!([unit_json("A"), unit_json("B")])),
            ]),
            policy(),
        );
        let units = fetcher.fetch_units("http://units", Some(&fallback())).await;
        let callsigns = units.iter().map(Unit::callsign).collect::<Vec<_>>();
        assert_eq!(callsigns, vec!["A", "B"]);
        assert_eq!(fetcher.client().calls(), 2);
    }

    #[tokio::test]
    async fn first_valid_list_is_returned_immediately() {
        let fetcher = Fetcher::new(
            ScriptedClient::new(vec![Ok(json!([])), Ok(json!([unit_json("late")]))]),
            policy(),
        );
        assert!(fetcher
            .fetch_units("http://units", Some(&fallback()))
            .await
            .is_empty());
        assert_eq!(fetcher.client().calls(), 1);
    }

    #[tokio::test]
    async fn invalid_element_aborts_with_fallback() {
        let fetcher = Fetcher::new(
            ScriptedClient::new(vec![Ok(json!([
                unit_json("A"),
                { "callsign": "B", "affiliation": "friendly", "latitude": 100.0, "longitude": 0.0 }
            ]))]),
            policy(),
        );
        let fallback = fallback();
        assert_eq!(
            fetcher.fetch_units("http://units", Some(&fallback)).await,
            fallback
        );
        assert_eq!(fetcher.client().calls(), 1);
    }

    #[tokio::test]
    async fn fetches_collection_features() {
        let fetcher = Fetcher::new(
            ScriptedClient::new(vec![Ok(json!({
                "type": "FeatureCollection",
                "features": [{
                    "id": "67e55044-10b1-426f-9247-bb680e5fe0c8",
                    "type": "Feature",
                    "geometry": { "type": "Point", "coordinates": [13.38272, 52.46385] },
                    "properties": { "sidc": "SFGPUCIZ--------", "uniqueDesignation": "Friendly-1" }
                }]
            }))]),
            policy(),
        );
        let features = fetcher.fetch_features("http://units", None).await;
        assert_eq!(features.len(), 1);
        assert_eq!(features[0].content, UnitFeature::example_data());
    }

    #[tokio::test]
    async fn bare_array_is_not_a_collection() {
        let fetcher = Fetcher::new(ScriptedClient::new(vec![Ok(json!([]))]), policy());
        assert!(fetcher.fetch_features("http://units", None).await.is_empty());
        assert_eq!(fetcher.client().calls(), 1);
    }
}
