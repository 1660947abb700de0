// # sitebuilderctl - Site Builder Provisioning CLI
//
// This binary is a THIN integration layer:
// - DO NOT add provisioning logic here
// - All lifecycle logic lives in the provider crates
// - Configuration is via environment variables ONLY
//
// The CLI is responsible for:
// 1. Reading configuration from environment variables
// 2. Initializing logging and the runtime
// 3. Registering providers
// 4. Dispatching one lifecycle operation and printing its JSON result
//
// ## Configuration
//
// ### Provider
// - `SITEBUILDER_PROVIDER_TYPE`: Provider type (duda)
//
// ### Duda
// - `SITEBUILDER_DUDA_USERNAME`: API username
// - `SITEBUILDER_DUDA_PASSWORD`: API password
// - `SITEBUILDER_DUDA_TEMPLATE`: Default template id or name (optional)
// - `SITEBUILDER_DUDA_UNPUBLISHED_SSO_TARGET`: SSO destination for unpublished sites (optional)
// - `SITEBUILDER_DUDA_PUBLISHED_SSO_TARGET`: SSO destination for published sites (optional)
// - `SITEBUILDER_DUDA_DEFAULT_PERMISSIONS`: Comma-separated default permissions (optional)
// - `SITEBUILDER_DUDA_DELETE_ON_TERMINATE`: Delete the account on terminate (true/false)
//
// ### Logging
// - `SITEBUILDER_LOG_LEVEL`: trace, debug, info, warn, error (logs go to stderr)
//
// ## Example
//
// ```bash
// export SITEBUILDER_DUDA_USERNAME=apiuser
// export SITEBUILDER_DUDA_PASSWORD=secret123
//
// sitebuilderctl get-info '{"site_builder_user_id":"x@y.com","account_reference":"site123"}'
// echo '{"account_reference":"site123"}' | sitebuilderctl suspend -
// ```

use anyhow::{Context, Result};
use serde_json::{Value, json};
use sitebuilder_core::{
    AccountIdentifier, ChangePackageParams, CreateParams, DudaConfig, Error, ProviderConfig,
    ProviderRegistry, SiteBuilderProvider, SsoTarget, TemplateRef, UnsuspendParams,
};
use std::env;
use std::io::Read;
use std::process::ExitCode;
use std::str::FromStr;
use tracing::{Level, error, info};
use tracing_subscriber::FmtSubscriber;

const USAGE: &str = "Usage: sitebuilderctl <operation> <params-json | ->\n\
    Operations: about, create, get-info, login, change-package, suspend, unsuspend, terminate";

/// Exit codes for the possible outcomes of one invocation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CtlExitCode {
    /// Operation succeeded
    Success = 0,
    /// Configuration, usage or parameter error
    ConfigError = 1,
    /// The provider reported a normalized error
    ProviderError = 2,
    /// Runtime or transport failure
    RuntimeError = 3,
}

impl From<CtlExitCode> for ExitCode {
    fn from(code: CtlExitCode) -> Self {
        ExitCode::from(code as u8)
    }
}

/// Lifecycle operation selected on the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Operation {
    About,
    Create,
    GetInfo,
    Login,
    ChangePackage,
    Suspend,
    Unsuspend,
    Terminate,
}

impl FromStr for Operation {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "about" => Ok(Operation::About),
            "create" => Ok(Operation::Create),
            "get-info" => Ok(Operation::GetInfo),
            "login" => Ok(Operation::Login),
            "change-package" => Ok(Operation::ChangePackage),
            "suspend" => Ok(Operation::Suspend),
            "unsuspend" => Ok(Operation::Unsuspend),
            "terminate" => Ok(Operation::Terminate),
            _ => anyhow::bail!("Unknown operation '{}'", s),
        }
    }
}

/// Application configuration
struct Config {
    provider_type: String,
    duda: DudaConfig,
    log_level: String,
}

impl Config {
    /// Load configuration from environment variables
    fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration through a variable lookup
    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let optional = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let template = optional("SITEBUILDER_DUDA_TEMPLATE")
            .map(|raw| TemplateRef::from_str(&raw))
            .transpose()?;

        let unpublished_sso_target_destination = optional("SITEBUILDER_DUDA_UNPUBLISHED_SSO_TARGET")
            .map(|raw| SsoTarget::from_str(&raw))
            .transpose()?;

        let published_sso_target_destination = optional("SITEBUILDER_DUDA_PUBLISHED_SSO_TARGET")
            .map(|raw| SsoTarget::from_str(&raw))
            .transpose()?;

        let delete_on_terminate = match optional("SITEBUILDER_DUDA_DELETE_ON_TERMINATE") {
            None => false,
            Some(raw) => parse_flag(&raw).with_context(|| {
                format!(
                    "SITEBUILDER_DUDA_DELETE_ON_TERMINATE '{}' is not a boolean",
                    raw
                )
            })?,
        };

        Ok(Self {
            provider_type: optional("SITEBUILDER_PROVIDER_TYPE")
                .unwrap_or_else(|| "duda".to_string()),
            duda: DudaConfig {
                username: lookup("SITEBUILDER_DUDA_USERNAME").unwrap_or_default(),
                password: lookup("SITEBUILDER_DUDA_PASSWORD").unwrap_or_default(),
                template,
                unpublished_sso_target_destination,
                published_sso_target_destination,
                default_permissions: optional("SITEBUILDER_DUDA_DEFAULT_PERMISSIONS"),
                delete_on_terminate,
            },
            log_level: optional("SITEBUILDER_LOG_LEVEL").unwrap_or_else(|| "info".to_string()),
        })
    }

    /// Validate the configuration
    fn validate(&self) -> Result<()> {
        match self.provider_type.as_str() {
            "duda" => {}
            _ => anyhow::bail!(
                "SITEBUILDER_PROVIDER_TYPE '{}' is not supported. \
                Supported providers: duda",
                self.provider_type
            ),
        }

        if self.duda.username.is_empty() {
            anyhow::bail!(
                "SITEBUILDER_DUDA_USERNAME is required. \
                Set it via: export SITEBUILDER_DUDA_USERNAME=your_api_user"
            );
        }

        if self.duda.password.is_empty() {
            anyhow::bail!(
                "SITEBUILDER_DUDA_PASSWORD is required. \
                Set it via: export SITEBUILDER_DUDA_PASSWORD=your_api_password"
            );
        }

        self.provider_config().validate()?;

        match self.log_level.to_lowercase().as_str() {
            "trace" | "debug" | "info" | "warn" | "error" => {}
            _ => anyhow::bail!(
                "SITEBUILDER_LOG_LEVEL '{}' is not valid. \
                Valid levels: trace, debug, info, warn, error",
                self.log_level
            ),
        }

        Ok(())
    }

    fn provider_config(&self) -> ProviderConfig {
        ProviderConfig::Duda(self.duda.clone())
    }
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

/// Read the parameter document from the argument, or stdin for `-`
fn read_params(arg: &str) -> Result<Value> {
    let raw = if arg == "-" {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .context("Failed to read parameters from stdin")?;
        buf
    } else {
        arg.to_string()
    };

    serde_json::from_str(&raw).context("Parameters are not valid JSON")
}

fn main() -> ExitCode {
    let args: Vec<String> = env::args().skip(1).collect();

    let (operation, params) = match parse_args(&args) {
        Ok(parsed) => parsed,
        Err(e) => {
            eprintln!("{}\n\n{}", e, USAGE);
            return CtlExitCode::ConfigError.into();
        }
    };

    // Load configuration from environment
    let config = match Config::from_env() {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            return CtlExitCode::ConfigError.into();
        }
    };

    if let Err(e) = config.validate() {
        eprintln!("Configuration validation error: {}", e);
        return CtlExitCode::ConfigError.into();
    }

    let log_level = match config.log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    // stdout carries the JSON result only
    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_writer(std::io::stderr)
        .finish();

    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set tracing subscriber: {}", e);
        return CtlExitCode::ConfigError.into();
    }

    let rt = match tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            error!("Failed to create tokio runtime: {}", e);
            return CtlExitCode::RuntimeError.into();
        }
    };

    let outcome = rt.block_on(run(&config, operation, params));
    report(outcome).into()
}

fn parse_args(args: &[String]) -> Result<(Operation, Value)> {
    match args {
        [operation] if operation == "about" => Ok((Operation::About, Value::Null)),
        [operation, params] => Ok((operation.parse()?, read_params(params)?)),
        _ => anyhow::bail!("Expected an operation and its parameters"),
    }
}

/// Create the configured provider and run one operation
async fn run(
    config: &Config,
    operation: Operation,
    params: Value,
) -> sitebuilder_core::Result<Value> {
    let registry = ProviderRegistry::new();

    #[cfg(feature = "duda")]
    {
        sitebuilder_provider_duda::register(&registry);
    }

    let provider = registry.create_provider(&config.provider_config())?;
    info!(
        "Running {:?} with provider {}",
        operation,
        provider.provider_name()
    );

    dispatch(provider.as_ref(), operation, params).await
}

/// Deserialize, validate and execute one operation
async fn dispatch(
    provider: &dyn SiteBuilderProvider,
    operation: Operation,
    params: Value,
) -> sitebuilder_core::Result<Value> {
    let result = match operation {
        Operation::About => serde_json::to_value(provider.about())?,
        Operation::Create => {
            let params: CreateParams = parse(params)?;
            params.validate()?;
            serde_json::to_value(provider.create(&params).await?)?
        }
        Operation::GetInfo => {
            let params: AccountIdentifier = parse(params)?;
            params.validate()?;
            serde_json::to_value(provider.get_info(&params).await?)?
        }
        Operation::Login => {
            let params: AccountIdentifier = parse(params)?;
            params.validate()?;
            serde_json::to_value(provider.login(&params).await?)?
        }
        Operation::ChangePackage => {
            let params: ChangePackageParams = parse(params)?;
            params.validate()?;
            serde_json::to_value(provider.change_package(&params).await?)?
        }
        Operation::Suspend => {
            let params: AccountIdentifier = parse(params)?;
            params.validate()?;
            serde_json::to_value(provider.suspend(&params).await?)?
        }
        Operation::Unsuspend => {
            let params: UnsuspendParams = parse(params)?;
            params.validate()?;
            serde_json::to_value(provider.unsuspend(&params).await?)?
        }
        Operation::Terminate => {
            let params: AccountIdentifier = parse(params)?;
            params.validate()?;
            serde_json::to_value(provider.terminate(&params).await?)?
        }
    };

    Ok(result)
}

fn parse<T: serde::de::DeserializeOwned>(params: Value) -> sitebuilder_core::Result<T> {
    serde_json::from_value(params)
        .map_err(|e| Error::invalid_input(format!("Invalid parameters: {}", e)))
}

/// Print the outcome and pick the exit code
fn report(outcome: sitebuilder_core::Result<Value>) -> CtlExitCode {
    match outcome {
        Ok(result) => {
            print_json(&result);
            CtlExitCode::Success
        }
        Err(e) if e.is_normalized() => {
            error!("Operation failed: {}", e);
            print_json(&error_document(&e));
            exit_code_for(&e)
        }
        Err(e) => {
            error!("Operation aborted: {}", e);
            eprintln!("Error: {}", e);
            CtlExitCode::RuntimeError
        }
    }
}

fn error_document(err: &Error) -> Value {
    json!({
        "status": "error",
        "message": err.to_string(),
        "data": err.data(),
    })
}

fn exit_code_for(err: &Error) -> CtlExitCode {
    match err {
        Error::InvalidInput(_) | Error::Config(_) => CtlExitCode::ConfigError,
        _ if err.is_normalized() => CtlExitCode::ProviderError,
        _ => CtlExitCode::RuntimeError,
    }
}

fn print_json(value: &Value) {
    match serde_json::to_string_pretty(value) {
        Ok(text) => println!("{}", text),
        Err(e) => eprintln!("Failed to render result: {}", e),
    }
}
