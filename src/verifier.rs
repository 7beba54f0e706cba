//! Best-effort source verification with a block-explorer service.
//!
//! The explorer interaction itself lives in an external tool; this module
//! assembles the request and decides what a failed attempt means for the
//! caller.

use alloy::{dyn_abi::DynSolValue, primitives::Address};
use eyre::{bail, Context};
use owo_colors::OwoColorize;
use tokio::{process::Command, runtime::Builder};
use tracing::error;

use crate::{artifact::Artifact, config::Verify};

/// Runs the `verify` command.
pub fn verify(config: &Verify) -> eyre::Result<()> {
    let runtime = Builder::new_multi_thread().enable_all().build()?;
    runtime.block_on(verify_impl(config))
}

async fn verify_impl(config: &Verify) -> eyre::Result<()> {
    let address: Address = config
        .address
        .parse()
        .wrap_err("invalid contract address")?;
    let artifact = Artifact::load(&config.artifacts, &config.contract)?;
    let args = artifact.coerce_args(&config.args)?;

    let chain_id = config.network.config().chain_id;
    let mut service = ForgeVerifier::new(config.contract.as_str(), chain_id)
        .with_program(config.verifier.as_str());
    if let Some(url) = &config.verifier_url {
        service = service.with_verifier_url(url.as_str());
    }

    println!(
        "verifying {} on {}",
        address.bright_purple(),
        config.network
    );
    if verify_contract(&service, address, &args).await.is_verified() {
        println!("{}", "source verified!".bright_green());
    }

    Ok(())
}

/// Submits a deployed contract's source for verification.
#[allow(async_fn_in_trait)]
pub trait VerificationService {
    /// Asks the service to verify the contract at `address`, deployed with
    /// the given constructor arguments.
    async fn verify(
        &self,
        address: Address,
        constructor_args: &[DynSolValue],
    ) -> eyre::Result<()>;
}

/// Outcome of a verification attempt.
#[derive(Debug)]
pub enum Verification {
    /// The service accepted the contract.
    Verified,
    /// The delegated call failed; the reason is kept for the caller.
    Failed(eyre::Report),
}

impl Verification {
    pub fn is_verified(&self) -> bool {
        matches!(self, Verification::Verified)
    }

    /// Converts the outcome into a result, for callers that want to escalate
    /// a failed verification instead of carrying on.
    pub fn into_result(self) -> eyre::Result<()> {
        match self {
            Verification::Verified => Ok(()),
            Verification::Failed(report) => Err(report),
        }
    }
}

/// What to do when the service reports a failure.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FailurePolicy {
    /// Write one error log line and carry on.
    #[default]
    LogAndContinue,
    /// Report the failure only through the returned [`Verification`].
    Silent,
}

/// Verifies the contract at `address` with the given service.
///
/// Verification is best effort: a failure of the delegated call never
/// propagates. Under the default [`FailurePolicy::LogAndContinue`] the
/// failure is recorded as a single error log line; the returned
/// [`Verification`] carries the reason either way.
pub async fn verify_contract<S>(
    service: &S,
    address: Address,
    constructor_args: &[DynSolValue],
) -> Verification
where
    S: VerificationService,
{
    verify_contract_with_policy(service, address, constructor_args, FailurePolicy::default())
        .await
}

/// [`verify_contract`] with an explicit failure policy.
pub async fn verify_contract_with_policy<S>(
    service: &S,
    address: Address,
    constructor_args: &[DynSolValue],
    policy: FailurePolicy,
) -> Verification
where
    S: VerificationService,
{
    match service.verify(address, constructor_args).await {
        Ok(()) => Verification::Verified,
        Err(report) => {
            if policy == FailurePolicy::LogAndContinue {
                error!("verification of {address} failed: {report:#}");
            }
            Verification::Failed(report)
        }
    }
}

/// [`VerificationService`] that drives `forge verify-contract`.
pub struct ForgeVerifier {
    program: String,
    contract: String,
    chain_id: u64,
    verifier_url: Option<String>,
}

impl ForgeVerifier {
    /// Verifier for `contract` on the network with `chain_id`, driving the
    /// `forge` binary from `PATH`.
    pub fn new(contract: impl Into<String>, chain_id: u64) -> Self {
        Self {
            program: "forge".to_owned(),
            contract: contract.into(),
            chain_id,
            verifier_url: None,
        }
    }

    /// Overrides the verifier binary.
    pub fn with_program(mut self, program: impl Into<String>) -> Self {
        self.program = program.into();
        self
    }

    /// Points the tool at a custom explorer API endpoint.
    pub fn with_verifier_url(mut self, url: impl Into<String>) -> Self {
        self.verifier_url = Some(url.into());
        self
    }
}

impl VerificationService for ForgeVerifier {
    async fn verify(
        &self,
        address: Address,
        constructor_args: &[DynSolValue],
    ) -> eyre::Result<()> {
        let mut command = Command::new(&self.program);
        command
            .arg("verify-contract")
            .arg(address.to_string())
            .arg(&self.contract)
            .arg("--chain-id")
            .arg(self.chain_id.to_string())
            .arg("--watch");
        if !constructor_args.is_empty() {
            let encoded = DynSolValue::Tuple(constructor_args.to_vec()).abi_encode_params();
            command.arg("--constructor-args").arg(hex::encode(encoded));
        }
        if let Some(url) = &self.verifier_url {
            command.arg("--verifier-url").arg(url);
        }

        let output = command
            .output()
            .await
            .wrap_err_with(|| format!("could not run {}", self.program))?;
        if !output.status.success() {
            bail!(
                "{} rejected {address}: {}",
                self.program,
                String::from_utf8_lossy(&output.stderr).trim(),
            );
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::{
        io,
        sync::{
            atomic::{AtomicUsize, Ordering},
            Arc, Mutex,
        },
    };

    use alloy::{dyn_abi::DynSolValue, primitives::Address};
    use eyre::bail;
    use tracing_subscriber::fmt::MakeWriter;

    use super::{
        verify_contract, verify_contract_with_policy, FailurePolicy, ForgeVerifier,
        VerificationService,
    };

    struct FakeService {
        error: Option<String>,
        calls: AtomicUsize,
    }

    impl FakeService {
        fn succeeding() -> Self {
            Self {
                error: None,
                calls: AtomicUsize::new(0),
            }
        }

        fn failing(message: &str) -> Self {
            Self {
                error: Some(message.to_owned()),
                calls: AtomicUsize::new(0),
            }
        }
    }

    impl VerificationService for FakeService {
        async fn verify(
            &self,
            _address: Address,
            _constructor_args: &[DynSolValue],
        ) -> eyre::Result<()> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            match &self.error {
                Some(message) => bail!("{message}"),
                None => Ok(()),
            }
        }
    }

    #[derive(Clone, Default)]
    struct Capture(Arc<Mutex<Vec<u8>>>);

    impl Capture {
        fn contents(&self) -> String {
            String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
        }
    }

    impl io::Write for Capture {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    impl<'a> MakeWriter<'a> for Capture {
        type Writer = Capture;

        fn make_writer(&'a self) -> Self::Writer {
            self.clone()
        }
    }

    /// Runs `run` with the default subscriber swapped for one writing into
    /// the returned buffer.
    fn capture_logs(run: impl FnOnce()) -> String {
        let capture = Capture::default();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(capture.clone())
            .with_ansi(false)
            .finish();
        tracing::subscriber::with_default(subscriber, run);
        capture.contents()
    }

    fn block_on<F: std::future::Future>(future: F) -> F::Output {
        tokio::runtime::Builder::new_current_thread()
            .build()
            .unwrap()
            .block_on(future)
    }

    #[tokio::test]
    async fn success_reports_verified() {
        let service = FakeService::succeeding();
        let outcome = verify_contract(&service, Address::ZERO, &[]).await;

        assert!(outcome.is_verified());
        assert!(outcome.into_result().is_ok());
        assert_eq!(1, service.calls.load(Ordering::SeqCst));
    }

    #[tokio::test]
    async fn failure_does_not_propagate() {
        let service = FakeService::failing("explorer unavailable");
        let outcome = verify_contract(&service, Address::ZERO, &[]).await;

        assert!(!outcome.is_verified());
        let err = outcome.into_result().unwrap_err();
        assert!(format!("{err:#}").contains("explorer unavailable"));
    }

    #[test]
    fn failure_logs_exactly_once() {
        let service = FakeService::failing("explorer unavailable");
        let logs = capture_logs(|| {
            let outcome = block_on(verify_contract(&service, Address::ZERO, &[]));
            assert!(!outcome.is_verified());
        });

        let lines: Vec<_> = logs.lines().filter(|line| !line.is_empty()).collect();
        assert_eq!(1, lines.len());
        assert!(lines[0].contains("explorer unavailable"));
    }

    #[test]
    fn success_logs_nothing() {
        let service = FakeService::succeeding();
        let logs = capture_logs(|| {
            let outcome = block_on(verify_contract(&service, Address::ZERO, &[]));
            assert!(outcome.is_verified());
        });

        assert!(logs.is_empty());
    }

    #[test]
    fn silent_policy_logs_nothing() {
        let service = FakeService::failing("explorer unavailable");
        let logs = capture_logs(|| {
            let outcome = block_on(verify_contract_with_policy(
                &service,
                Address::ZERO,
                &[],
                FailurePolicy::Silent,
            ));
            assert!(!outcome.is_verified());
        });

        assert!(logs.is_empty());
    }

    #[tokio::test]
    async fn missing_verifier_binary_is_a_delegated_failure() {
        let verifier =
            ForgeVerifier::new("Vault", 14).with_program("definitely-not-a-real-binary");
        let result = verifier.verify(Address::ZERO, &[]).await;

        assert!(result.is_err());
    }
}
