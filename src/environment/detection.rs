//! Environment detectors.
//!
//! A detector is a one-shot closure producing the environment label.
//! Besides arbitrary closures, a detector can read the label from a
//! process environment variable such as `APP_ENV`.

/// A one-shot environment detector.
pub type Detector = Box<dyn FnOnce() -> anyhow::Result<String>>;

/// Run a detector and validate its output.
///
/// Returns the trimmed label, or a message describing why detection failed.
pub(crate) fn run(detector: Detector) -> Result<String, String> {
    let detected = detector()
        .map_err(|e| format!("environment detector function failed to execute: {:#}", e))?;

    let detected = detected.trim();
    if detected.is_empty() {
        return Err("environment detector function returned invalid value".to_string());
    }

    Ok(detected.to_string())
}

/// Build a detector that reads the label from a process environment variable.
///
/// # Example
///
/// ```
/// use bootchain::environment::env_var_detector;
/// use bootchain::Environment;
///
/// let environment = Environment::from_detector(env_var_detector("BOOTCHAIN_DOC_UNSET_VAR"));
/// assert!(environment.is("production").is_err());
/// ```
pub fn env_var_detector(var: impl Into<String>) -> Detector {
    let var = var.into();
    Box::new(move || detect_with_env(&var, |key| std::env::var(key)))
}

/// Detect with a custom env var lookup (for testing).
///
/// A missing, non-unicode, or blank variable is a detection failure.
pub fn detect_with_env<F>(var: &str, env_fn: F) -> anyhow::Result<String>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    match env_fn(var) {
        Ok(value) if !value.trim().is_empty() => Ok(value.trim().to_string()),
        Ok(_) => anyhow::bail!("environment variable {} is blank", var),
        Err(std::env::VarError::NotPresent) => {
            anyhow::bail!("environment variable {} is not set", var)
        }
        Err(e) => anyhow::bail!("environment variable {} is unreadable: {}", var, e),
    }
}
