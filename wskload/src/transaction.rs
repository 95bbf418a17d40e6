use crate::transport::{Invocation, Transport, TransportError};
use tokio::time::Instant;
use wskload_core::RequestOutcome;

/// Times a single invocation and turns it into a [`RequestOutcome`].
///
/// With the `metrics` feature the latency and a success/error counter are recorded against the
/// `metrics` facade, labelled by action.
pub async fn transaction_hook<T>(
    transport: &T,
    invocation: &Invocation<'_>,
) -> Result<RequestOutcome, TransportError>
where
    T: Transport,
{
    let start = Instant::now();
    let res = transport.invoke(invocation).await;
    let elapsed = start.elapsed();

    #[cfg(feature = "metrics")]
    {
        metrics::histogram!("wskload_request_latency", "action" => invocation.action.to_string())
            .record(elapsed.as_secs_f64());
    }

    match res {
        Ok(status) => {
            let outcome = RequestOutcome {
                action: invocation.action.to_string(),
                status,
                latency: elapsed,
            };

            #[cfg(feature = "metrics")]
            {
                let name = if outcome.is_expected() {
                    "wskload_request_success"
                } else {
                    "wskload_request_error"
                };
                metrics::counter!(name, "action" => invocation.action.to_string()).increment(1);
            }

            Ok(outcome)
        }
        Err(err) => {
            #[cfg(feature = "metrics")]
            metrics::counter!("wskload_request_error", "action" => invocation.action.to_string())
                .increment(1);

            Err(err)
        }
    }
}
