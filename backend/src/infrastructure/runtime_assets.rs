pub const DEFAULT_CONFIG_JSON: &str = include_str!("../../templates/config/config.json");
pub const DEFAULT_ENV_EXAMPLE: &str = include_str!("../../templates/config/env.example");
