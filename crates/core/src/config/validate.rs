use super::{types::Config, ConfigError};

/// Validate configuration
/// Currently validates:
/// - Server port is not 0
/// - Notifier text settings are non-empty
/// - Routes API key is present
/// - Executor allows at least one attempt
/// - LLM provider settings are usable
/// - Transport credentials are present when a transport is configured
pub fn validate_config(config: &Config) -> Result<(), ConfigError> {
    if config.server.port == 0 {
        return Err(invalid("server.port cannot be 0"));
    }

    if config.notifier.company_name.trim().is_empty() {
        return Err(invalid("notifier.company_name cannot be empty"));
    }
    if config.notifier.email_subject.trim().is_empty() {
        return Err(invalid("notifier.email_subject cannot be empty"));
    }

    if config.routes.api_key.trim().is_empty() {
        return Err(invalid("routes.api_key is required"));
    }

    if config.executor.max_attempts == 0 {
        return Err(invalid("executor.max_attempts must be at least 1"));
    }
    if config.executor.step_timeout_secs == 0 {
        return Err(invalid("executor.step_timeout_secs cannot be 0"));
    }

    if let Some(llm) = &config.llm {
        llm.validate()
            .map_err(|e| ConfigError::ValidationError(format!("llm: {}", e)))?;
    }

    if let Some(email) = &config.email {
        if email.api_key.trim().is_empty() {
            return Err(invalid("email.api_key is required when [email] is set"));
        }
        if !email.from_email.contains('@') {
            return Err(invalid("email.from_email must be an email address"));
        }
    }

    if let Some(sms) = &config.sms {
        if sms.account_sid.trim().is_empty() || sms.auth_token.trim().is_empty() {
            return Err(invalid(
                "sms.account_sid and sms.auth_token are required when [sms] is set",
            ));
        }
    }

    Ok(())
}

fn invalid(message: &str) -> ConfigError {
    ConfigError::ValidationError(message.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::load_config_from_str;

    fn config(extra: &str) -> Config {
        let toml = format!("[routes]\napi_key = \"maps-key\"\n{}", extra);
        load_config_from_str(&toml).unwrap()
    }

    #[test]
    fn test_validate_valid_config() {
        assert!(validate_config(&config("")).is_ok());
    }

    #[test]
    fn test_validate_port_zero_fails() {
        let config = config("[server]\nport = 0\n");
        let result = validate_config(&config);
        assert!(matches!(result, Err(ConfigError::ValidationError(_))));
    }

    #[test]
    fn test_validate_empty_routes_key_fails() {
        let config = load_config_from_str("[routes]\napi_key = \"  \"\n").unwrap();
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_validate_empty_subject_fails() {
        let config = config("[notifier]\nemail_subject = \"\"\n");
        let err = validate_config(&config).unwrap_err();
        assert!(err.to_string().contains("email_subject"));
    }

    #[test]
    fn test_validate_zero_attempts_fails() {
        let config = config("[executor]\nmax_attempts = 0\n");
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_validate_openai_without_key_fails() {
        let config = config("[llm]\nprovider = \"open_ai\"\n");
        let err = validate_config(&config).unwrap_err();
        assert!(err.to_string().contains("llm"));
    }

    #[test]
    fn test_validate_ollama_without_key_passes() {
        let config = config("[llm]\nprovider = \"ollama\"\nmodel = \"llama3\"\n");
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn test_validate_sms_without_token_fails() {
        let config = config("[sms]\naccount_sid = \"AC1\"\nauth_token = \"\"\n");
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_validate_email_bad_sender_fails() {
        let config = config("[email]\napi_key = \"sg\"\nfrom_email = \"nobody\"\n");
        assert!(validate_config(&config).is_err());
    }
}
