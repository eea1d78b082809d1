//! Helpers shared by every handler that calls the oracle.

use std::future::Future;
use std::time::Duration;

use crate::ports::OracleError;

const UNAVAILABLE_REPLY: &str =
    "Sorry, I couldn't reach the assistant just now. Nothing was lost; please send that again.";
const MALFORMED_REPLY: &str =
    "Sorry, I didn't quite catch that. Nothing was changed; could you say it another way?";

/// Awaits `call` for at most `limit`. Expiry is reported as unavailability.
pub(crate) async fn bounded<T, F>(limit: Duration, call: F) -> Result<T, OracleError>
where
    F: Future<Output = Result<T, OracleError>>,
{
    match tokio::time::timeout(limit, call).await {
        Ok(result) => result,
        Err(_) => Err(OracleError::unavailable(format!(
            "no answer within {} ms",
            limit.as_millis()
        ))),
    }
}

/// The assistant turn appended when an oracle call fails.
pub(crate) fn apology(error: &OracleError) -> &'static str {
    match error {
        OracleError::Unavailable(_) => UNAVAILABLE_REPLY,
        OracleError::MalformedResponse(_) => MALFORMED_REPLY,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn timeout_becomes_unavailable() {
        let result: Result<(), _> = bounded(Duration::from_millis(10), async {
            tokio::time::sleep(Duration::from_millis(200)).await;
            Ok(())
        })
        .await;
        assert!(matches!(result, Err(OracleError::Unavailable(_))));
    }

    #[tokio::test]
    async fn passes_through_in_time_results() {
        let result = bounded(Duration::from_secs(1), async { Ok::<_, OracleError>(7) }).await;
        assert_eq!(result, Ok(7));
    }

    #[test]
    fn apology_depends_on_failure_kind() {
        assert_ne!(
            apology(&OracleError::unavailable("x")),
            apology(&OracleError::malformed("x"))
        );
    }
}
