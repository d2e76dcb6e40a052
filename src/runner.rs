use std::io::{self, Write};

use anyhow::{Context, Result};
use serde::Serialize;
use serde_json::Value;

use crate::client::{ApiClient, Exchange};
use crate::config::HarnessConfig;
use crate::model::{TestResult, Verdict};
use crate::report::{self, Summary};

pub mod cases;
pub mod classify;

use self::cases::{AUTHENTICATED, Case, Payload, UNAUTHORIZED};
use self::classify::{CardAudience, SigninOutcome};

/// Which half of the suite ran after signin.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Branch {
    /// Signin produced a session; the protected endpoints were exercised with it.
    Authenticated,
    /// No session; the protected endpoints were probed for access control only.
    Unauthorized,
}

struct Bodies {
    credentials: Value,
    draw: Value,
    new_card: Value,
}

pub struct ContractRunner {
    config: HarnessConfig,
    client: ApiClient,
    bodies: Bodies,
    results: Vec<TestResult>,
    branch: Option<Branch>,
    signed_in_user: Option<String>,
    out: Box<dyn Write>,
}

impl ContractRunner {
    /// Runner that logs progress to standard output.
    pub fn new(config: HarnessConfig) -> Result<Self> {
        Self::with_output(config, Box::new(io::stdout()))
    }

    pub fn with_output(config: HarnessConfig, out: Box<dyn Write>) -> Result<Self> {
        config.validate()?;
        let client = ApiClient::new(&config)?;
        let bodies = Bodies {
            credentials: serde_json::to_value(&config.credentials)
                .context("encode credentials")?,
            draw: serde_json::to_value(&config.draw).context("encode draw fixture")?,
            new_card: serde_json::to_value(&config.new_card).context("encode card fixture")?,
        };
        Ok(Self {
            config,
            client,
            bodies,
            results: Vec::new(),
            branch: None,
            signed_in_user: None,
            out,
        })
    }

    pub fn api_base(&self) -> &str {
        self.client.api_base()
    }

    pub fn results(&self) -> &[TestResult] {
        &self.results
    }

    pub fn branch(&self) -> Option<Branch> {
        self.branch
    }

    pub fn summary(&self) -> Summary {
        Summary::from_results(&self.results, self.branch)
    }

    /// Execute the whole suite in its fixed order and return every result.
    ///
    /// Failures are recorded, never raised: a dead server yields a list of
    /// failed results, not an error.
    pub fn run_all(&mut self) -> &[TestResult] {
        let api_base = self.client.api_base().to_string();
        self.emit(|out| report::write_banner(out, &api_base));

        self.run_case(Case::CardsAnonymous);
        self.run_case(Case::Signup);

        if self.signin() {
            tracing::info!("signin produced a session; running authenticated cases");
            self.branch = Some(Branch::Authenticated);
            for case in AUTHENTICATED {
                self.run_case(case);
            }
        } else {
            tracing::info!("no session; probing protected endpoints without cookies");
            self.branch = Some(Branch::Unauthorized);
            self.emit(report::write_unauthorized_notice);
            for case in UNAUTHORIZED {
                self.run_case(case);
            }
        }

        let summary = self.summary();
        let results = std::mem::take(&mut self.results);
        self.emit(|out| report::write_summary(out, &summary, &results));
        self.results = results;

        &self.results
    }

    fn emit(&mut self, f: impl FnOnce(&mut dyn Write) -> io::Result<()>) {
        let res = f(self.out.as_mut()).and_then(|_| self.out.flush());
        if let Err(err) = res {
            tracing::warn!(error = %err, "failed to write progress output");
        }
    }

    fn record(&mut self, case: Case, verdict: Verdict) {
        let result = TestResult::new(case.name(), verdict);
        self.emit(|out| report::write_result(out, &result));
        self.results.push(result);
    }

    fn exchange(&self, case: Case) -> Result<Exchange> {
        let body = match case.payload() {
            Payload::Empty => None,
            Payload::Credentials => Some(&self.bodies.credentials),
            Payload::Draw => Some(&self.bodies.draw),
            Payload::NewCard => Some(&self.bodies.new_card),
        };
        self.client
            .send(case.method(), case.path(), body, case.auth())
            .inspect_err(|err| {
                tracing::warn!(case = case.name(), error = %format!("{:#}", err), "transport failure")
            })
    }

    fn run_case(&mut self, case: Case) {
        let verdict = match self.exchange(case) {
            Ok(ex) => self.classify(case, &ex),
            Err(err) => classify::transport_failure(&err),
        };
        self.record(case, verdict);
    }

    fn classify(&self, case: Case, ex: &Exchange) -> Verdict {
        let min = self.config.min_demo_cards;
        match case {
            Case::CardsAnonymous => classify::card_listing(ex, min, CardAudience::Anonymous),
            Case::CardsAuthenticated => classify::card_listing(ex, min, CardAudience::FreeUser),
            Case::Signup => classify::signup(ex),
            Case::Signin => classify::signin(ex).0,
            Case::AuthUser => classify::auth_user(ex, self.signed_in_user.as_deref()),
            Case::SaveDraw => classify::save_draw(ex),
            Case::ListDraws => classify::list_draws(ex),
            Case::AdminListCards => classify::admin_list_cards(ex),
            Case::AdminCreateCard => classify::admin_create_card(ex),
            Case::AuthUserUnauthorized => classify::anonymous_user(ex),
            Case::SaveDrawUnauthorized
            | Case::ListDrawsUnauthorized
            | Case::AdminListCardsUnauthorized
            | Case::AdminCreateCardUnauthorized => classify::expect_unauthorized(ex),
        }
    }

    /// Run the signin case. Returns true only when a session was established;
    /// an unconfirmed email records a pass but still returns false.
    fn signin(&mut self) -> bool {
        let (verdict, authenticated) = match self.exchange(Case::Signin) {
            Err(err) => (classify::transport_failure(&err), false),
            Ok(ex) => match classify::signin(&ex) {
                (verdict, SigninOutcome::Authenticated { user_id }) => {
                    match self.client.adopt_cookies(&ex) {
                        Ok(_) => {
                            self.signed_in_user = user_id;
                            (verdict, true)
                        }
                        Err(err) => (
                            Verdict::fail(
                                format!("Could not store session cookies: {:#}", err),
                                verdict.sample,
                            ),
                            false,
                        ),
                    }
                }
                (verdict, _) => (verdict, false),
            },
        };
        self.record(Case::Signin, verdict);
        authenticated
    }
}
