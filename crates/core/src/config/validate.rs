use super::{types::EngineConfig, ConfigError};

/// Validate configuration
/// Currently validates:
/// - Heap capacity and admission threshold
/// - Page limit ordering and plateau parameters
/// - Fallback threshold floor against the evaluation threshold
/// - Scoring weights are non-negative
pub fn validate_config(config: &EngineConfig) -> Result<(), ConfigError> {
    if config.heap.capacity == 0 {
        return Err(ConfigError::ValidationError(
            "heap.capacity cannot be 0".to_string(),
        ));
    }
    if config.heap.admission_threshold < 0.0 {
        return Err(ConfigError::ValidationError(
            "heap.admission_threshold cannot be negative".to_string(),
        ));
    }

    if config.budget.page_limit_initial == 0 {
        return Err(ConfigError::ValidationError(
            "budget.page_limit_initial cannot be 0".to_string(),
        ));
    }
    if config.budget.page_limit_max < config.budget.page_limit_initial {
        return Err(ConfigError::ValidationError(
            "budget.page_limit_max cannot be below budget.page_limit_initial".to_string(),
        ));
    }
    if config.budget.plateau_window < 2 {
        return Err(ConfigError::ValidationError(
            "budget.plateau_window must be at least 2".to_string(),
        ));
    }
    if config.budget.plateau_epsilon < 0.0 {
        return Err(ConfigError::ValidationError(
            "budget.plateau_epsilon cannot be negative".to_string(),
        ));
    }

    if config.evaluation.batch_size == 0 {
        return Err(ConfigError::ValidationError(
            "evaluation.batch_size cannot be 0".to_string(),
        ));
    }
    if config.fallback.threshold_floor > config.evaluation.quality_threshold {
        return Err(ConfigError::ValidationError(
            "fallback.threshold_floor cannot exceed evaluation.quality_threshold".to_string(),
        ));
    }

    config
        .scoring
        .weights
        .validate()
        .map_err(|e| ConfigError::ValidationError(e.to_string()))?;

    Ok(())
}
