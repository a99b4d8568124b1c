use std::{
    future::Future,
    str::FromStr,
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc,
    },
    time::Duration,
};

use thiserror::Error;
use tokio::sync::oneshot;
use tracing::{debug, instrument, warn};

use crate::wordle::Word;

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// What the oracle may say about a question.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Answer {
    Affirmative,
    Negative,
    Uncertain,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("`{0}` is not yes, no or maybe")]
pub struct UnrecognizedAnswer(String);

impl FromStr for Answer {
    type Err = UnrecognizedAnswer;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let word = s
            .trim()
            .trim_end_matches(['.', '!'])
            .to_lowercase();

        match word.as_str() {
            "yes" | "affirmative" => Ok(Self::Affirmative),
            "no" | "negative" => Ok(Self::Negative),
            "maybe" | "uncertain" => Ok(Self::Uncertain),
            _ => Err(UnrecognizedAnswer(s.to_owned())),
        }
    }
}

impl Answer {
    /// Reads a raw oracle response. Anything that isn't exactly one of the three answers
    /// counts as a no.
    pub fn classify(response: &str) -> Self {
        response.parse().unwrap_or_else(|err: UnrecognizedAnswer| {
            warn!(%err, "treating oracle response as negative");
            Self::Negative
        })
    }
}

impl std::fmt::Display for Answer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Affirmative => "Yes",
            Self::Negative => "No",
            Self::Uncertain => "Maybe",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OracleRequest {
    solution: String,
    question: String,
}

impl OracleRequest {
    pub fn new(solution: &Word, question: &str) -> Result<Self, OracleError> {
        let question = question.trim();
        if question.is_empty() {
            return Err(OracleError::EmptyQuestion);
        }

        Ok(Self {
            solution: solution.to_string(),
            question: question.to_owned(),
        })
    }

    pub fn solution(&self) -> &str {
        &self.solution
    }

    pub fn question(&self) -> &str {
        &self.question
    }

    /// Instructions for a language model answering on the oracle's behalf.
    pub fn prompt(&self) -> String {
        format!(
            "You are an agent in a game that can only answer any question with YES, NO or \
             MAYBE. Refrain from answering in any other way. Help the player find the \
             correct word by answering their questions. For example: a user question may \
             be 'is it a fruit?'; if the correct answer is apple then you would answer YES. \
             If the question for apple is 'is it tasty?', you could answer MAYBE. If they \
             ask 'is it a vehicle?', the answer is NO.\n\
             Given that the correct word is {}, the player asks the following question \
             about the correct word:\n{}",
            self.solution.to_lowercase(),
            self.question.to_lowercase()
        )
    }
}

/// Whatever actually answers questions, usually a remote service.
pub trait OracleGateway: Send + Sync + 'static {
    type Error: std::error::Error + Send + Sync + 'static;

    /// The raw text of the answer.
    fn ask(
        &self,
        request: &OracleRequest,
    ) -> impl Future<Output = Result<String, Self::Error>> + Send;
}

#[derive(Debug, Error)]
pub enum OracleError {
    #[error("oracle unavailable: {0}")]
    Unavailable(#[source] Box<dyn std::error::Error + Send + Sync>),

    #[error("oracle didn't answer within {0:?}")]
    TimedOut(Duration),

    #[error("still waiting on the previous question")]
    InFlight,

    #[error("question is empty")]
    EmptyQuestion,

    #[error("oracle task stopped before answering")]
    Aborted,
}

/// Sends questions to a gateway one at a time.
///
/// Each question runs on its own task and reports back over a single channel. Asking
/// while a question is still out fails with [`OracleError::InFlight`]; nothing is
/// retried and a sent question is never cancelled.
pub struct Oracle<G> {
    gateway: Arc<G>,
    in_flight: Arc<AtomicBool>,
    timeout: Duration,
}

/// Clears the in-flight flag when the task finishes, even by panicking.
struct InFlightGuard(Arc<AtomicBool>);

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

impl<G: OracleGateway> Oracle<G> {
    pub fn new(gateway: G, timeout: Duration) -> Self {
        Self {
            gateway: Arc::new(gateway),
            in_flight: Arc::new(AtomicBool::new(false)),
            timeout,
        }
    }

    pub fn is_busy(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    /// Sends `request` off and returns a handle to its answer.
    ///
    /// Must be called within a tokio runtime.
    #[instrument(skip_all, fields(question = request.question()))]
    pub fn send(&self, request: OracleRequest) -> Result<PendingAnswer, OracleError> {
        if self
            .in_flight
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            debug!("question already in flight");
            return Err(OracleError::InFlight);
        }

        let guard = InFlightGuard(Arc::clone(&self.in_flight));
        let gateway = Arc::clone(&self.gateway);
        let timeout = self.timeout;
        let (tx, rx) = oneshot::channel();

        tokio::spawn(async move {
            let result = match tokio::time::timeout(timeout, gateway.ask(&request)).await {
                Ok(Ok(response)) => Ok(Answer::classify(&response)),
                Ok(Err(err)) => {
                    warn!(%err, "oracle request failed");
                    Err(OracleError::Unavailable(Box::new(err)))
                }
                Err(_) => {
                    warn!(?timeout, "oracle request timed out");
                    Err(OracleError::TimedOut(timeout))
                }
            };

            drop(guard);
            // nobody may be waiting any more
            let _ = tx.send(result);
        });

        Ok(PendingAnswer { rx })
    }

    pub async fn ask(&self, request: OracleRequest) -> Result<Answer, OracleError> {
        self.send(request)?.answer().await
    }
}

pub struct PendingAnswer {
    rx: oneshot::Receiver<Result<Answer, OracleError>>,
}

impl PendingAnswer {
    pub async fn answer(self) -> Result<Answer, OracleError> {
        self.rx.await.unwrap_or(Err(OracleError::Aborted))
    }
}
